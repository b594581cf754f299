use std::path::Path;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use appd_backend_export::cli::Cli;
use appd_backend_export::config::AppConfig;
use appd_backend_export::error::ExportResult;
use appd_backend_export::export::sink::CsvSink;
use appd_backend_export::export::walker::Extractor;
use appd_backend_export::services::auth;
use appd_backend_export::services::controller::ControllerClient;

fn setup_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_new(&config.log.level).unwrap_or_else(|_| EnvFilter::new("info"));

    match config.log.format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_target(false))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_target(false))
                .init();
        }
    }
}

async fn run_export(config: &AppConfig) -> ExportResult<()> {
    let client = auth::build_client(&config.controller)?;
    let session = auth::authenticate(&client, &config.controller).await?;
    let controller = ControllerClient::new(client, &config.controller.base_url, session);

    let extractor = Extractor::new(&controller, &config.export)?;
    let mut sink = CsvSink::create(Path::new(&config.export.output_path))?;

    let summary = extractor.run(&mut sink).await?;
    info!(
        "Exported {} backends across {} tiers in {} applications to {}",
        summary.backends,
        summary.tiers,
        summary.applications,
        sink.path().display()
    );
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(&cli)
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {e}"))?;

    setup_logging(&config);

    let run_id = Uuid::new_v4();
    info!(
        "Starting backend export v{} (run {run_id})",
        env!("CARGO_PKG_VERSION")
    );

    if let Err(e) = run_export(&config).await {
        error!("Export aborted: {e}");
        return Err(e.into());
    }

    Ok(())
}
