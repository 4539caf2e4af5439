//! Application state shared across handlers
//!
//! The store clients are constructed once at startup with explicit
//! credentials and injected here; handlers never re-initialize backends.

use crate::config::Config;
use crate::service::{OtpService, PasswordService};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub password_service: Arc<PasswordService>,
    pub otp_service: Arc<OtpService>,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        password_service: Arc<PasswordService>,
        otp_service: Arc<OtpService>,
    ) -> Self {
        Self {
            config,
            password_service,
            otp_service,
        }
    }
}
