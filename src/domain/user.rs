//! Callable inputs and identity batch results

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Input for the `updateUserPassword` callable and the reset_password tool
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdatePasswordInput {
    /// Absent fields deserialize to empty strings so that missing
    /// arguments surface as invalid-argument, not a body parse failure
    #[serde(default)]
    #[validate(email(message = "a valid email is required"))]
    pub email: String,

    /// The replacement credential. Strength is enforced by the identity
    /// backend, not here.
    #[serde(default, rename = "newPassword")]
    #[validate(length(min = 1, message = "newPassword is required"))]
    pub new_password: String,
}

/// Input for the `sendOTPEmail` callable
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendOtpInput {
    #[serde(default)]
    #[validate(email(message = "a valid email is required"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "otp is required"))]
    pub otp: String,
}

/// Per-record failure detail from an identity batch delete
#[derive(Debug, Clone, Serialize)]
pub struct BatchDeleteError {
    pub index: usize,
    pub uid: Option<String>,
    pub message: String,
}

/// Outcome of one identity batch-delete call
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchDeleteResult {
    pub success_count: usize,
    pub failure_count: usize,
    pub errors: Vec<BatchDeleteError>,
}
