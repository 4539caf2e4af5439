use anyhow::Result;
use lifeguardian_core::{
    config::{Config, CredentialSource},
    server,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lifeguardian_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let credentials = CredentialSource::resolve(false)?;
    let config = Config::from_env(credentials)?;

    info!("Starting LifeGuardian Account Backend");
    info!("HTTP server listening on {}", config.http_addr());

    // Run the server
    server::run(config).await
}
