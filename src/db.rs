use anyhow::{Context, Result};
use mongodb::{bson::doc, options::ClientOptions, Client, Database};
use secrecy::ExposeSecret;

use crate::config::Settings;

/// Connect to MongoDB and verify the deployment is reachable before any
/// traffic is served.
pub async fn connect(settings: &Settings) -> Result<Database> {
    let mut options = ClientOptions::parse(settings.database.uri.expose_secret())
        .await
        .context("Failed to parse MongoDB connection string")?;
    options.app_name = Some(env!("CARGO_PKG_NAME").to_string());

    let client = Client::with_options(options).context("Failed to create MongoDB client")?;
    let database = client.database(&settings.database.database_name);

    database
        .run_command(doc! { "ping": 1 }, None)
        .await
        .context("Failed to reach MongoDB")?;

    Ok(database)
}
