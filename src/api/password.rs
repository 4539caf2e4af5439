//! Password update callable handler

use crate::api::SuccessMessage;
use crate::domain::UpdatePasswordInput;
use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, Json};

/// `updateUserPassword` callable: look one identity up by email and
/// overwrite its password credential
pub async fn update_user_password(
    State(state): State<AppState>,
    Json(input): Json<UpdatePasswordInput>,
) -> Result<Json<SuccessMessage>, AppError> {
    state.password_service.update_password(&input).await?;

    Ok(Json(SuccessMessage::new("Password updated successfully")))
}
