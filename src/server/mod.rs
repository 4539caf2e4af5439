//! Server initialization and routing

use crate::api;
use crate::config::Config;
use crate::email::{EmailProvider, SmtpEmailProvider};
use crate::firebase::{IdentityClient, ServiceAccountKey, TokenProvider};
use crate::service::{OtpService, PasswordService};
use crate::state::AppState;
use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Build the callable router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(api::health::health))
        .route(
            "/updateUserPassword",
            post(api::password::update_user_password),
        )
        .route("/sendOTPEmail", post(api::otp::send_otp_email))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Build the application state from configuration: one token provider,
/// one client per store, one SMTP relay.
pub fn build_state(config: Config) -> Result<AppState> {
    let key = ServiceAccountKey::load(&config.firebase.credentials)?;
    let token = TokenProvider::new(key);
    let identity = IdentityClient::new(&config.firebase, token);

    let mailer: Arc<dyn EmailProvider> = Arc::new(SmtpEmailProvider::from_config(&config.smtp)?);

    let password_service = Arc::new(PasswordService::new(identity));
    let otp_service = Arc::new(OtpService::new(mailer));

    Ok(AppState::new(
        Arc::new(config),
        password_service,
        otp_service,
    ))
}

/// Run the HTTP server
pub async fn run(config: Config) -> Result<()> {
    let http_addr = config.http_addr();
    let state = build_state(config)?;
    let app = router(state);

    let listener = TcpListener::bind(&http_addr).await?;
    info!("HTTP server listening on {}", http_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
