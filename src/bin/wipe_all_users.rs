//! Delete every identity record, document collection and blob object.
//!
//! Irreversible. Requires an explicit service-account key file next to
//! the working directory; ambient credentials are deliberately refused.

use anyhow::Result;
use clap::Parser;
use lifeguardian_core::config::{Config, CredentialSource};
use lifeguardian_core::firebase::{
    FirestoreClient, IdentityClient, ServiceAccountKey, StorageClient, TokenProvider,
};
use lifeguardian_core::service::WipeService;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "wipe_all_users",
    about = "Delete every user across all three stores"
)]
struct Args {}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lifeguardian_core=info,wipe_all_users=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let _args = Args::try_parse().unwrap_or_else(|e| {
        let _ = e.print();
        std::process::exit(1);
    });

    if let Err(e) = run().await {
        error!("wipe failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Hard gate: the wipe only runs with an explicit key file present.
    let credentials = CredentialSource::resolve(true)?;
    let config = Config::from_env(credentials)?;

    let key = ServiceAccountKey::load(&config.firebase.credentials)?;
    let token = TokenProvider::new(key);
    let service = WipeService::new(
        IdentityClient::new(&config.firebase, token.clone()),
        FirestoreClient::new(&config.firebase, token.clone()),
        StorageClient::new(&config.firebase, token),
    );

    let report = service.run().await;
    info!(
        users_deleted = report.users_deleted,
        users_failed = report.users_failed,
        collections_deleted = report.collections_deleted.len(),
        collections_empty = report.collections_empty.len(),
        storage_cleared = report.storage_cleared,
        "wipe finished, system should now have 0 users"
    );
    Ok(())
}
