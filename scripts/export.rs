//! Run with: cargo run --bin export [choice]
//!
//! Exports every trial document nested under the chosen participant
//! collection to a timestamped JSON file in ./data, for offline analysis.

use std::env;
use std::io;
use std::path::Path;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use ctx_admin::config;
use ctx_admin::modules::export::flow;
use ctx_admin::modules::prune::flow::select_collection;
use ctx_admin::services::store::MongoStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    // Same choice tokens as the pruner; participants by default.
    let choice = env::args().nth(1).unwrap_or_else(|| "1".to_string());
    let target = select_collection(&choice)?;

    println!("Connecting to MongoDB...");
    let db = config::database::connect()
        .await
        .context("Could not initialize the store client; check MONGODB_URI and MONGODB_DATABASE")?;
    let store = MongoStore::new(db);

    println!("Collecting trials from '{}'...", target.collection_name());
    let records = flow::collect_trials(&store, target)
        .await
        .context("Failed to collect trial documents")?;

    if records.is_empty() {
        println!("No trial documents found. Nothing to export.");
        return Ok(());
    }

    let path = flow::write_json(&records, target, Path::new("data"))?;
    println!("✓ Exported {} trial record(s) to {}", records.len(), path.display());

    Ok(())
}
