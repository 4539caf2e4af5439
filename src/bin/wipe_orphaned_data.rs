//! Find and remove document/blob data whose uid has no identity record.
//!
//! Accepts the explicit key file when present and falls back to ambient
//! credentials otherwise.

use anyhow::Result;
use clap::Parser;
use lifeguardian_core::config::{Config, CredentialSource};
use lifeguardian_core::firebase::{
    FirestoreClient, IdentityClient, ServiceAccountKey, StorageClient, TokenProvider,
};
use lifeguardian_core::service::ReconcileService;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "wipe_orphaned_data", about = "Remove orphaned user data")]
struct Args {}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lifeguardian_core=info,wipe_orphaned_data=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let _args = Args::try_parse().unwrap_or_else(|e| {
        let _ = e.print();
        std::process::exit(1);
    });

    if let Err(e) = run().await {
        error!("orphan scan failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let credentials = CredentialSource::resolve(false)?;
    let config = Config::from_env(credentials)?;

    let key = ServiceAccountKey::load(&config.firebase.credentials)?;
    let token = TokenProvider::new(key);
    let service = ReconcileService::new(
        IdentityClient::new(&config.firebase, token.clone()),
        FirestoreClient::new(&config.firebase, token.clone()),
        StorageClient::new(&config.firebase, token),
    );

    let report = service.run().await?;
    if report.is_clean() {
        info!("system clean, no orphaned data found");
    } else {
        info!(
            documents = report.documents_removed,
            blob_prefixes = report.blob_prefixes_removed,
            "orphan cleanup complete"
        );
    }
    Ok(())
}
