//! Run with: cargo run --bin prune

use std::io::{self, BufRead, Write};

use anyhow::Context;
use tracing::error;
use tracing_subscriber::EnvFilter;

use ctx_admin::config;
use ctx_admin::modules::prune::flow;
use ctx_admin::modules::prune::model::{PruneReport, PROLIFIC_ID_LEN};
use ctx_admin::services::store::MongoStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    println!("Which collection should be checked?");
    println!("  1) participants");
    println!("  2) participants_finished");
    print!("Choice: ");
    io::stdout().flush()?;

    let mut choice = String::new();
    io::stdin().lock().read_line(&mut choice)?;
    let target = flow::select_collection(choice.trim())?;

    println!("\nConnecting to MongoDB...");
    let db = config::database::connect()
        .await
        .context("Could not initialize the store client; check MONGODB_URI and MONGODB_DATABASE")?;
    let store = MongoStore::new(db);

    println!("Checking collection '{}'...", target.collection_name());
    let candidates = match flow::list_candidates(&store, target, PROLIFIC_ID_LEN).await {
        Ok(candidates) => candidates,
        Err(e) => {
            error!(
                collection = target.collection_name(),
                error = %e,
                "listing failed; nothing was deleted"
            );
            return Ok(());
        }
    };

    if candidates.is_empty() {
        println!(
            "No documents found with ID length != {}. Nothing to delete.",
            PROLIFIC_ID_LEN
        );
        return Ok(());
    }

    let confirmed = flow::confirm_deletion(
        &candidates,
        io::stdin().lock(),
        io::stdout().lock(),
    )?;
    if !confirmed {
        println!("Deletion cancelled by user.");
        return Ok(());
    }

    println!(
        "\nStarting recursive deletion of {} document(s)...",
        candidates.len()
    );
    let outcomes = flow::prune_all(&store, target, &candidates).await;
    let report = PruneReport::from_outcomes(&outcomes);
    println!("\n{}", report);

    Ok(())
}
