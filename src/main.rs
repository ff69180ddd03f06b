use std::path::Path;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use serde::de::DeserializeOwned;
use tracing_subscriber::EnvFilter;

use ectopo::api::{api_client, get_template_service};
use ectopo::cli::{Cli, Command, PlanArgs, RolesArgs, TemplateCommand};
use ectopo::config::{self, Settings};
use ectopo::output;
use ectopo::topology::{MigrationContext, Representation, decide_node_role_mode, use_node_roles};
use ectopo::{DeploymentConfig, DeploymentState, Error, Planner};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        let diagnostic = err.diagnostic();
        return Err(eyre!(diagnostic.detail).wrap_err(diagnostic.summary));
    }

    Ok(())
}

async fn run(cli: Cli) -> Result<(), Error> {
    match cli.command {
        Command::Plan(args) => {
            let settings = cli.connection.settings(None).or(config::load()?);
            plan(args, &settings).await
        }
        Command::Template { command } => match command {
            TemplateCommand::Show(args) => {
                let settings = cli
                    .connection
                    .settings(args.region.as_deref())
                    .or(config::load()?);
                let region = required_region(&settings)?;
                let client = api_client(settings.api_key.clone(), settings.endpoint())?;
                let template = client.get_template(&args.id, region).await?;
                println!("{}", output::render_template(&template, args.format)?);
                Ok(())
            }
            TemplateCommand::List(args) => {
                let settings = cli
                    .connection
                    .settings(args.region.as_deref())
                    .or(config::load()?);
                let region = required_region(&settings)?;
                let client = api_client(settings.api_key.clone(), settings.endpoint())?;
                let templates = client.list_templates(region).await?;
                tracing::info!(count = templates.len(), "templates listed");
                println!("{}", output::template_table(&templates));
                Ok(())
            }
        },
        Command::Roles(args) => roles(args),
    }
}

async fn plan(args: PlanArgs, settings: &Settings) -> Result<(), Error> {
    let config: DeploymentConfig = read_json(&args.config)?;
    let state: Option<DeploymentState> = args.state.as_deref().map(read_json).transpose()?;
    let template = args.template_file.as_deref().map(read_json).transpose()?;

    let service = get_template_service(template, settings.api_key.clone(), settings.endpoint())?;
    let planner = Planner::new(service);

    let payload = match &state {
        Some(state) => planner.update_payload(&config, state).await?,
        None => planner.create_payload(&config).await?,
    };

    println!("{}", output::render_payload(&payload, args.format)?);

    if let Some(path) = args.state_out {
        let next = DeploymentState::flatten(&config, &payload);
        std::fs::write(&path, output::to_json(&next)?)?;
        tracing::info!(path = %path.display(), "state written");
    }

    Ok(())
}

fn roles(args: RolesArgs) -> Result<(), Error> {
    let mode = decide_node_role_mode(args.from.as_deref(), &args.to)?;
    let prior = args.from.as_ref().map(|_| {
        if args.node_types {
            Representation::NodeTypes
        } else {
            Representation::NodeRoles
        }
    });
    let context = MigrationContext {
        prior,
        size_changed: args.size_changed,
        roles_declared: false,
    };

    let representation = if use_node_roles(mode, &context) {
        "node_roles"
    } else {
        "node_type"
    };
    println!("mode: {:?}\nrepresentation: {}", mode, representation);
    Ok(())
}

fn required_region(settings: &Settings) -> Result<&str, Error> {
    settings
        .region
        .as_deref()
        .ok_or_else(|| Error::Config("no region given; use --region or EC_REGION".to_string()))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, Error> {
    let data = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}
