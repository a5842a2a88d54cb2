mod acquire;
mod config;
mod model;
mod parser;
mod pipeline;
mod storage;
mod utils;

use acquire::{
    ApiAcquirer, ChromeRenderer, PriceAcquirer, ReqwestTransport, ScrapeAcquirer, ScrapeJob,
};
use config::{
    AppConfig, CONFIG_PATH_ENV, CREDENTIALS_ENV, Strategy, load_config, resolve_credentials,
};
use model::AppError;
use pipeline::{RunSummary, run_once};
use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use storage::{GoogleSheetsClient, SheetSynchronizer};
use tracing::{error, info};
use utils::capture_timestamp;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Set panic hook to log details about any panic
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("😱 Panic occurred: {:?}", panic_info);
    }));

    info!("{}", "=".repeat(50));
    info!("Price Capture - Starting");
    info!("Timestamp: {}", capture_timestamp());
    info!("{}", "=".repeat(50));

    match run().await {
        Ok(_) => {
            info!("Price Capture - Completed Successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Fatal error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<RunSummary, AppError> {
    let config_path = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config.json".into());
    let config = load_config(&config_path)?;

    // Fail on a bad destination or missing credentials before spending time fetching.
    let destination = config.destination();
    destination.validate()?;
    let credentials = resolve_credentials(
        env::var(CREDENTIALS_ENV).ok(),
        config.credentials_file.clone(),
    );
    let synchronizer = SheetSynchronizer::new(GoogleSheetsClient::new(&credentials)?);

    let acquirer = build_acquirer(&config)?;
    Ok(run_once(acquirer.as_ref(), &synchronizer, &destination).await?)
}

fn build_acquirer(config: &AppConfig) -> Result<Box<dyn PriceAcquirer>, AppError> {
    match config.strategy {
        Strategy::Api => Ok(Box::new(ApiAcquirer::new(
            ReqwestTransport::new()?,
            config.api_endpoint()?,
            config.product_codes.clone(),
        ))),
        Strategy::Scrape => Ok(Box::new(ScrapeAcquirer::new(
            Arc::new(ChromeRenderer::new()),
            ScrapeJob {
                target_url: config.target_url()?.to_string(),
                settle_delay: Duration::from_secs(config.scrape_delay),
                selector_groups: config.selector_groups.clone(),
                max_products: config.max_products,
            },
        ))),
    }
}
