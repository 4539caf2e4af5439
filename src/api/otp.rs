//! OTP email callable handler

use crate::api::SuccessResponse;
use crate::domain::SendOtpInput;
use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, Json};

/// `sendOTPEmail` callable: dispatch the fixed OTP template to one address
pub async fn send_otp_email(
    State(state): State<AppState>,
    Json(input): Json<SendOtpInput>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.otp_service.send_otp(&input).await?;

    Ok(Json(SuccessResponse::ok()))
}
