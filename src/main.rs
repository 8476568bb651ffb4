use std::io::Read;

use anyhow::Context;
use sheets_action::{adapters::config::app_config, SpreadsheetClient};
use tracing::{error, info, instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Registry};

#[tokio::main]
#[instrument]
async fn main() -> anyhow::Result<()> {
    setup_tracing();
    setup_panic_hook();

    let config_path = app_config::config_path();
    let config = app_config::load_config(&config_path)
        .map_err(|report| anyhow::anyhow!("{report:?}"))?;

    let action = match std::env::args().nth(1) {
        Some(action) => action,
        None => {
            let mut action = String::new();
            std::io::stdin()
                .read_to_string(&mut action)
                .context("Failed to read the action from stdin")?;
            action
        }
    };

    info!(config_path = %config_path, "Starting sheets-action");

    let client = SpreadsheetClient::connect(&config.sheets)
        .await
        .map_err(|report| {
            error!("Setup failed: {report:?}");
            anyhow::anyhow!("{report:#}")
        })?;

    let result = client.execute_json(&action).await;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn setup_tracing() {
    let level = std::env::var("SHEETS_ACTION_LOG")
        .ok()
        .and_then(|level| level.parse().ok())
        .unwrap_or(tracing::Level::TRACE);

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    Registry::default()
        .with(
            tracing_subscriber::filter::Targets::new().with_target("sheets_action", level),
        )
        .with(stderr_layer)
        .init();
}

fn setup_panic_hook() {
    tracing::trace!("Setting panic hook");
    std::panic::set_hook(Box::new(|info| {
        tracing::error!("panic: {info}");
    }));
}
