//! Reset a user's password by email.
//!
//! Usage: reset_password <email> <newPassword>

use anyhow::Result;
use clap::Parser;
use lifeguardian_core::config::{Config, CredentialSource};
use lifeguardian_core::domain::UpdatePasswordInput;
use lifeguardian_core::firebase::{IdentityClient, ServiceAccountKey, TokenProvider};
use lifeguardian_core::service::PasswordService;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "reset_password", about = "Reset a user's password by email")]
struct Args {
    /// Email of the account to update
    email: String,
    /// Replacement password
    new_password: String,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lifeguardian_core=info,reset_password=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let args = Args::try_parse().unwrap_or_else(|e| {
        let _ = e.print();
        std::process::exit(1);
    });

    if let Err(e) = run(args).await {
        error!("error updating password: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let credentials = CredentialSource::resolve(false)?;
    let config = Config::from_env(credentials)?;

    let key = ServiceAccountKey::load(&config.firebase.credentials)?;
    let identity = IdentityClient::new(&config.firebase, TokenProvider::new(key));
    let service = PasswordService::new(identity);

    let uid = service
        .update_password(&UpdatePasswordInput {
            email: args.email,
            new_password: args.new_password,
        })
        .await?;

    info!(uid = %uid, "password updated successfully");
    Ok(())
}
