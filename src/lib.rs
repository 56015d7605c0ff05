pub mod cli;
pub mod core;
pub mod providers;
pub mod service;

use crate::cli::{ConsoleApp, RunOutcome};
use crate::core::config::AppConfig;
use crate::providers::PrivatBankClient;
use crate::service::RateService;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

/// Options collected from the command line.
#[derive(Debug, Default, Clone)]
pub struct RunOptions {
    pub config_path: Option<String>,
    pub days: Option<i64>,
    pub output_path: Option<String>,
}

pub async fn run(options: RunOptions) -> Result<RunOutcome> {
    info!("pbfx starting...");

    let config = match options.config_path.as_deref() {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let provider = PrivatBankClient::new(&config.provider.base_url);
    let service = RateService::new(Arc::new(provider)).with_concurrency(config.concurrency());
    let output_path = options.output_path.unwrap_or(config.output_path);

    let app = ConsoleApp::new(service, output_path).with_days(options.days);
    Ok(app.run().await)
}
