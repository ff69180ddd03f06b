pub mod state;

pub use state::DeploymentState;
