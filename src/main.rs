use clap::Parser;
use flight_etl::domain::ports::Storage;
use flight_etl::utils::{logger, validation::Validate};
use flight_etl::{CliConfig, EtlEngine, EtlError, FlightPipeline, LocalStorage, Settings, SimulatedRetriever};

fn load_settings(path: &str) -> Result<Settings, EtlError> {
    let mut settings = Settings::from_file(path)?;
    settings.apply_env_overrides();
    settings.validate()?;
    Ok(settings)
}

fn report_fatal(e: &EtlError) {
    tracing::error!(
        "❌ Fatal error: {} (Category: {:?})",
        e,
        e.category()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
}

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Loading settings from {}", config.settings);
    let settings = match load_settings(&config.settings) {
        Ok(settings) => settings,
        Err(e) => {
            report_fatal(&e);
            std::process::exit(1);
        }
    };
    tracing::debug!("Settings: {:?}", settings);

    let storage = LocalStorage::new(".");

    tracing::info!("Reading input from {}", config.input);
    let input = match storage.read_file(&config.input).await {
        Ok(bytes) => bytes,
        Err(e) => {
            report_fatal(&e);
            std::process::exit(1);
        }
    };

    let pipeline = FlightPipeline::new(storage, SimulatedRetriever::new(), settings);
    let engine = EtlEngine::new(pipeline);

    match engine.run_from_bytes(&input).await {
        Ok(summary) => {
            if summary.is_partial() {
                tracing::warn!(
                    "⚠️ {} of {} routes failed and {} responses were skipped",
                    summary.failed_routes,
                    summary.requested_routes,
                    summary.skipped_responses
                );
            }
            tracing::info!("✅ Done.");
            println!(
                "✅ Wrote {} records to {}",
                summary.records_written, summary.output_path
            );
        }
        Err(e) => {
            report_fatal(&e);
            std::process::exit(1);
        }
    }
}
