use clap::Parser;
use mockserve_core::MockConfig;
use std::path::PathBuf;

/// Command line arguments of the `mockserve` binary.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "mockserve")]
#[command(about = "HTTP mock server with switchable route collections")]
#[command(version)]
pub struct Args {
    /// Glob pattern of route definition files (.json, .jsonc, .yaml, .yml)
    #[arg(short, long, value_name = "GLOB")]
    pub routes: String,

    /// Glob pattern of collection definition files
    #[arg(short, long, value_name = "GLOB")]
    pub collections: String,

    /// Settings file providing defaults for port, delay and selected collection
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Port to listen on [default: 3000]
    #[arg(short, long, env = "MOCKSERVE_PORT")]
    pub port: Option<u16>,

    /// Default response delay in milliseconds
    #[arg(short, long, value_name = "MS", env = "MOCKSERVE_DELAY")]
    pub delay: Option<u64>,

    /// Collection to serve at startup
    #[arg(short, long, value_name = "ID", env = "MOCKSERVE_SELECTED")]
    pub selected: Option<String>,
}

impl Args {
    /// Overlay the flags that were given on top of `config`.
    pub fn apply(&self, mut config: MockConfig) -> MockConfig {
        if let Some(port) = self.port {
            config.port = Some(port);
        }
        if let Some(delay) = self.delay {
            config.delay = Some(delay);
        }
        if let Some(selected) = &self.selected {
            config.selected = Some(selected.clone());
        }
        config
    }
}
