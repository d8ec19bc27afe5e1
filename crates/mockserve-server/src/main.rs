use anyhow::Context;
use clap::Parser;
use mockserve_core::config::parser::{load_definitions, load_settings};
use mockserve_core::MockConfig;
use mockserve_server::cli::Args;
use mockserve_server::MockServer;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .init();

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Startup errors were already logged by the server
            if err.downcast_ref::<mockserve_server::StartupError>().is_none() {
                tracing::error!("{err:#}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let file_config = match &args.config {
        Some(path) => load_settings(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => MockConfig::default(),
    };
    let config = args.apply(file_config);

    let routes = load_definitions(&args.routes).context("Failed to load routes")?;
    let collections =
        load_definitions(&args.collections).context("Failed to load collections")?;

    MockServer::new(config).start(&routes, &collections).await?;
    Ok(())
}
