use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Settings;
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Args, Debug)]
pub struct ConnectionArgs {
    #[arg(long, global = true, env = "EC_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, global = true, env = "EC_ENDPOINT")]
    pub endpoint: Option<String>,
}

impl ConnectionArgs {
    pub fn settings(&self, region: Option<&str>) -> Settings {
        Settings {
            endpoint: self.endpoint.clone(),
            api_key: self.api_key.clone(),
            region: region.map(str::to_string),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the Elasticsearch payload for a deployment
    Plan(PlanArgs),
    Template {
        #[command(subcommand)]
        command: TemplateCommand,
    },
    /// Show how node capabilities are expressed across a version change
    Roles(RolesArgs),
}

#[derive(Subcommand, Debug)]
pub enum TemplateCommand {
    Show(TemplateShowArgs),
    List(TemplateListArgs),
}

#[derive(clap::Args, Debug)]
pub struct PlanArgs {
    /// Declared deployment (JSON)
    #[arg(long)]
    pub config: PathBuf,

    /// State recorded by the previous apply (JSON)
    #[arg(long)]
    pub state: Option<PathBuf>,

    /// Use a template from disk instead of the API
    #[arg(long)]
    pub template_file: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Write the state that applying this payload would record
    #[arg(long)]
    pub state_out: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct TemplateShowArgs {
    pub id: String,

    #[arg(long, env = "EC_REGION")]
    pub region: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

#[derive(clap::Args, Debug)]
pub struct TemplateListArgs {
    #[arg(long, env = "EC_REGION")]
    pub region: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct RolesArgs {
    /// Version currently deployed; omit for a new deployment
    #[arg(long)]
    pub from: Option<String>,

    #[arg(long)]
    pub to: String,

    /// Previous state recorded legacy node types
    #[arg(long)]
    pub node_types: bool,

    /// A topology size changes in the same plan
    #[arg(long)]
    pub size_changed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serial_test::serial;

    #[test]
    fn test_plan_args() {
        let cli = Cli::parse_from([
            "ectopo",
            "plan",
            "--config=deployment.json",
            "--state=state.json",
            "--format=table",
        ]);

        if let Command::Plan(args) = cli.command {
            assert_eq!(args.config, PathBuf::from("deployment.json"));
            assert_eq!(args.state, Some(PathBuf::from("state.json")));
            assert_eq!(args.format, OutputFormat::Table);
            assert!(args.template_file.is_none());
            assert!(args.state_out.is_none());
        } else {
            panic!("Expected Plan command, got {:?}", cli.command);
        }
    }

    #[test]
    fn test_plan_format_defaults_to_json() {
        let cli = Cli::parse_from(["ectopo", "plan", "--config=deployment.json"]);

        if let Command::Plan(args) = cli.command {
            assert_eq!(args.format, OutputFormat::Json);
        } else {
            panic!("Expected Plan command, got {:?}", cli.command);
        }
    }

    #[test]
    fn test_plan_requires_config() {
        assert!(Cli::try_parse_from(["ectopo", "plan"]).is_err());
    }

    #[test]
    fn test_template_show_args() {
        let cli = Cli::parse_from([
            "ectopo",
            "template",
            "show",
            "aws-io-optimized-v2",
            "--region=us-east-1",
        ]);

        if let Command::Template {
            command: TemplateCommand::Show(args),
        } = cli.command
        {
            assert_eq!(args.id, "aws-io-optimized-v2");
            assert_eq!(args.region, Some("us-east-1".to_string()));
        } else {
            panic!("Expected Template Show command, got {:?}", cli.command);
        }
    }

    #[test]
    fn test_roles_args() {
        let cli = Cli::parse_from(["ectopo", "roles", "--from=7.9.3", "--to=7.10.0"]);

        if let Command::Roles(args) = cli.command {
            assert_eq!(args.from, Some("7.9.3".to_string()));
            assert_eq!(args.to, "7.10.0");
            assert!(!args.node_types);
            assert!(!args.size_changed);
        } else {
            panic!("Expected Roles command, got {:?}", cli.command);
        }
    }

    #[test]
    #[serial]
    fn test_no_connection_flags_provided() {
        let key_backup = std::env::var("EC_API_KEY").ok();
        let endpoint_backup = std::env::var("EC_ENDPOINT").ok();
        unsafe {
            std::env::remove_var("EC_API_KEY");
            std::env::remove_var("EC_ENDPOINT");
        }

        let cli = Cli::parse_from(["ectopo", "template", "list"]);

        unsafe {
            if let Some(key) = key_backup {
                std::env::set_var("EC_API_KEY", key);
            }
            if let Some(endpoint) = endpoint_backup {
                std::env::set_var("EC_ENDPOINT", endpoint);
            }
        }

        assert!(cli.connection.api_key.is_none());
        assert!(cli.connection.endpoint.is_none());
    }

    #[test]
    #[serial]
    fn test_cli_flag_takes_precedence_over_env() {
        let key_backup = std::env::var("EC_API_KEY").ok();

        unsafe {
            std::env::set_var("EC_API_KEY", "env_key");
        }

        let cli = Cli::parse_from(["ectopo", "template", "list", "--api-key=cli_key"]);

        unsafe {
            match key_backup {
                Some(key) => std::env::set_var("EC_API_KEY", key),
                None => std::env::remove_var("EC_API_KEY"),
            }
        }

        assert_eq!(cli.connection.api_key, Some("cli_key".to_string()));
    }

    #[test]
    #[serial]
    fn test_region_from_env_var_fallback() {
        let region_backup = std::env::var("EC_REGION").ok();

        unsafe {
            std::env::set_var("EC_REGION", "gcp-us-central1");
        }

        let cli = Cli::parse_from(["ectopo", "template", "list"]);

        unsafe {
            match region_backup {
                Some(region) => std::env::set_var("EC_REGION", region),
                None => std::env::remove_var("EC_REGION"),
            }
        }

        if let Command::Template {
            command: TemplateCommand::List(args),
        } = cli.command
        {
            assert_eq!(args.region, Some("gcp-us-central1".to_string()));
        } else {
            panic!("Expected Template List command, got {:?}", cli.command);
        }
    }

    #[test]
    #[serial]
    fn test_endpoint_flag_becomes_setting() {
        let endpoint_backup = std::env::var("EC_ENDPOINT").ok();
        unsafe {
            std::env::remove_var("EC_ENDPOINT");
        }

        let cli = Cli::parse_from([
            "ectopo",
            "--endpoint=https://ece.internal:12443",
            "template",
            "list",
        ]);

        unsafe {
            if let Some(endpoint) = endpoint_backup {
                std::env::set_var("EC_ENDPOINT", endpoint);
            }
        }

        let settings = cli.connection.settings(Some("ece-region"));
        assert_eq!(settings.endpoint(), "https://ece.internal:12443");
        assert_eq!(settings.region.as_deref(), Some("ece-region"));
    }
}
