//! Warehouse Fulfillment Service
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌─────────────┐    ┌────────────┐
//! │  Config  │───▶│ Gateway  │───▶│ Fulfillment │───▶│ PostgreSQL │
//! │  (YAML)  │    │  (axum)  │    │  (service)  │    │   (sqlx)   │
//! └──────────┘    └──────────┘    └─────────────┘    └────────────┘
//! ```
//!
//! Usage: `warehouse_fulfillment [--env dev] [--port 8080]`

use std::sync::Arc;

use anyhow::Context;
use warehouse_fulfillment::gateway::{self, state::AppState};
use warehouse_fulfillment::{AppConfig, Database, FulfillmentService, PgFulfillmentStore};

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

/// Get port override from command line (--port argument)
fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let mut app_config = AppConfig::load(&env)?;
    if let Some(port) = get_port_override() {
        app_config.gateway.port = port;
    }
    let _log_guard = warehouse_fulfillment::logging::init_logging(&app_config);

    tracing::info!(
        git_hash = env!("GIT_HASH"),
        "Starting warehouse fulfillment service in {} mode",
        env
    );

    let db = Database::connect(&app_config.database)
        .await
        .context("Failed to connect to PostgreSQL")?;
    if app_config.database.init_schema {
        db.init_schema()
            .await
            .context("Failed to initialize warehouse schema")?;
    }
    let db = Arc::new(db);

    let store = Arc::new(PgFulfillmentStore::new(db.pool().clone()));
    let fulfillment = Arc::new(FulfillmentService::new(store));
    let state = Arc::new(AppState::new(fulfillment, Some(db)));

    gateway::run_server(&app_config.bind_addr(), state).await
}
