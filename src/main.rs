// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Parser;
use flow_endpoint_node::{
    api::{start_server, AppState, RequestHandler},
    config::EndpointConfig,
    flow::ScreenResolver,
    storage::open_store,
    version,
};
use std::{env, sync::Arc};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    println!("🚀 Starting {}...\n", version::get_version_string());
    println!("📦 BUILD VERSION: {}", version::VERSION);
    println!();

    let config = EndpointConfig::parse();
    info!("Configuration: {:?}", config);

    let store = open_store(&config.store_url).await?;
    println!("✅ Appointment store ready ({})", store.backend_name());

    let private_key = match config.load_private_key()? {
        Some(key) => {
            println!("🔑 Private key loaded ({} bits)", key.size_bits());
            Some(Arc::new(key))
        }
        None => {
            warn!("PRIVATE_KEY / PRIVATE_KEY_PATH not set");
            println!("⚠️  No private key configured - flow requests will fail with 500");
            None
        }
    };

    let catalog = config.load_catalog()?;
    let resolver = ScreenResolver::new(store.clone(), catalog);
    let handler = RequestHandler::new(private_key, config.app_secret(), resolver);
    let state = AppState::new(handler, store);

    let addr = config.listen_addr();
    let separator = "=".repeat(60);
    println!("\n{}", separator);
    println!("🎉 Flow endpoint is running");
    println!("{}", separator);
    println!("  Flow:         POST http://{}/", addr);
    println!("  Health:       http://{}/health", addr);
    println!("  Appointments: http://{}/appointments", addr);
    println!("\nPress Ctrl+C to shutdown...");
    println!("{}\n", separator);

    start_server(addr, state).await?;

    println!("👋 Goodbye!");
    Ok(())
}
