//! One-time-passcode notification procedure

use crate::domain::SendOtpInput;
use crate::email::{templates, EmailProvider};
use crate::error::{AppError, Result};
use std::sync::Arc;
use tracing::info;
use validator::Validate;

/// Renders the fixed OTP template and dispatches it through the relay.
///
/// Stateless: the code is neither persisted nor checked here; expiry is
/// advisory text in the email body only.
pub struct OtpService {
    mailer: Arc<dyn EmailProvider>,
}

impl OtpService {
    pub fn new(mailer: Arc<dyn EmailProvider>) -> Self {
        Self { mailer }
    }

    pub async fn send_otp(&self, input: &SendOtpInput) -> Result<()> {
        input.validate()?;

        let message = templates::otp_message(&input.email, &input.otp);
        let result = self
            .mailer
            .send(&message)
            .await
            .map_err(|e| AppError::Email(e.to_string()))?;

        if !result.success {
            return Err(AppError::Email(
                result.error.unwrap_or_else(|| "send failed".to_string()),
            ));
        }

        info!(email = %input.email, "OTP email dispatched");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EmailSendResult;
    use crate::email::provider::MockEmailProvider;

    #[tokio::test]
    async fn test_send_otp_success() {
        let mut mock = MockEmailProvider::new();
        mock.expect_send()
            .withf(|message| message.html_body.contains("123456"))
            .times(1)
            .returning(|_| Ok(EmailSendResult::success(None)));

        let service = OtpService::new(Arc::new(mock));
        let input = SendOtpInput {
            email: "a@x.com".to_string(),
            otp: "123456".to_string(),
        };

        assert!(service.send_otp(&input).await.is_ok());
    }

    #[tokio::test]
    async fn test_relay_failure_is_internal() {
        let mut mock = MockEmailProvider::new();
        mock.expect_send().returning(|_| {
            Err(crate::email::EmailProviderError::ConnectionError(
                "connection refused".to_string(),
            ))
        });

        let service = OtpService::new(Arc::new(mock));
        let input = SendOtpInput {
            email: "a@x.com".to_string(),
            otp: "123456".to_string(),
        };

        let err = service.send_otp(&input).await.unwrap_err();
        assert!(matches!(err, AppError::Email(_)));
        assert_eq!(err.code(), "internal");
    }

    #[tokio::test]
    async fn test_invalid_email_skips_relay() {
        // No expectations set: any send call would panic the mock.
        let mock = MockEmailProvider::new();
        let service = OtpService::new(Arc::new(mock));
        let input = SendOtpInput {
            email: "not-an-email".to_string(),
            otp: "123456".to_string(),
        };

        let err = service.send_otp(&input).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }
}
