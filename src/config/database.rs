use anyhow::Context;
use mongodb::{Client, Database};
use std::env;

pub async fn connect() -> anyhow::Result<Database> {
    let uri = env::var("MONGODB_URI").context("MONGODB_URI must be set")?;
    let db_name = env::var("MONGODB_DATABASE").unwrap_or_else(|_| "ctx".to_string());

    let client = Client::with_uri_str(&uri)
        .await
        .context("Failed to connect to MongoDB")?;

    Ok(client.database(&db_name))
}
