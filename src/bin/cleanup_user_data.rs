//! Delete one user's document and blob data by email or uid.
//!
//! Usage: cleanup_user_data <emailOrUid>

use anyhow::Result;
use clap::Parser;
use lifeguardian_core::config::{Config, CredentialSource};
use lifeguardian_core::firebase::{
    FirestoreClient, IdentityClient, ServiceAccountKey, StorageClient, TokenProvider,
};
use lifeguardian_core::service::CleanupService;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "cleanup_user_data",
    about = "Delete one user's document and blob data"
)]
struct Args {
    /// Email or uid of the account to clean up
    email_or_uid: String,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lifeguardian_core=info,cleanup_user_data=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let args = Args::try_parse().unwrap_or_else(|e| {
        let _ = e.print();
        std::process::exit(1);
    });

    if let Err(e) = run(args).await {
        error!("cleanup failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let credentials = CredentialSource::resolve(false)?;
    let config = Config::from_env(credentials)?;

    let key = ServiceAccountKey::load(&config.firebase.credentials)?;
    let token = TokenProvider::new(key);
    let service = CleanupService::new(
        IdentityClient::new(&config.firebase, token.clone()),
        FirestoreClient::new(&config.firebase, token.clone()),
        StorageClient::new(&config.firebase, token),
    );

    service.cleanup(&args.email_or_uid).await?;
    Ok(())
}
