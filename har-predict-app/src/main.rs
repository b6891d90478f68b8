use anyhow::{Context, Result};
use clap::Parser;
use har_predict_app::{commands, report, Cli};
use har_predict_core::AppConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::debug!("{:?}", e);
        eprintln!("{}", report::render_error(&e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = AppConfig::load(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    cli.apply(&mut config);
    config.validate()?;

    let api = commands::connect(&config, cli.flow_flags()).await?;

    if cli.analyze {
        commands::analyze::run(&config, api).await?;
    } else {
        commands::predict::run(&config, api).await?;
    }

    Ok(())
}
