use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use chainrisk_analyzer::config::Config;
use chainrisk_analyzer::pipeline::AnalysisPipeline;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    // Initialize structured logging (set RUST_LOG=info for output)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    tracing::info!("ChainRisk Analyzer starting");

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());
    let config = Config::load_or_default(&config_path)?;
    tracing::info!("Configuration loaded from {}", config_path);

    // Build the analysis pipeline (sanctions list, fetch client, engine)
    let pipeline = Arc::new(AnalysisPipeline::init(&config)?);
    tracing::info!(
        sanctioned_addresses = pipeline.sanction_count(),
        "Analysis pipeline initialized"
    );

    // One-shot mode: analyze a single address and print the report
    if let Some(address) = std::env::args().nth(2) {
        let report = pipeline.analyze(&address).await;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if !config.api.enabled {
        tracing::warn!("API disabled and no address argument given, nothing to do");
        return Ok(());
    }

    chainrisk_analyzer::api::serve(pipeline, &config.api.host, config.api.port).await?;

    tracing::info!("ChainRisk Analyzer stopped gracefully");
    Ok(())
}
