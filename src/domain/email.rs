//! Email domain types

use serde::{Deserialize, Serialize};
use validator::Validate;

/// SMTP configuration for email sending
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct SmtpConfig {
    /// SMTP server host
    #[validate(length(min = 1, max = 255))]
    pub host: String,

    /// SMTP server port (typically 587 for TLS, 465 for SSL, 25 for unencrypted)
    pub port: u16,

    /// Username for authentication (optional)
    pub username: Option<String>,

    /// Password for authentication
    pub password: Option<String>,

    /// Use TLS encryption
    #[serde(default = "default_true")]
    pub use_tls: bool,

    /// From email address
    #[validate(email)]
    pub from_email: String,

    /// From name (optional)
    pub from_name: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Email address with optional display name
#[derive(Debug, Clone)]
pub struct EmailAddress {
    pub email: String,
    pub name: Option<String>,
}

impl EmailAddress {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
        }
    }

    pub fn with_name(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: Some(name.into()),
        }
    }
}

/// Email message to be sent
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: Vec<EmailAddress>,
    pub subject: String,
    pub html_body: String,
    pub text_body: Option<String>,
}

impl EmailMessage {
    pub fn new(to: EmailAddress, subject: impl Into<String>, html_body: impl Into<String>) -> Self {
        Self {
            to: vec![to],
            subject: subject.into(),
            html_body: html_body.into(),
            text_body: None,
        }
    }

    pub fn with_text_body(mut self, text_body: impl Into<String>) -> Self {
        self.text_body = Some(text_body.into());
        self
    }
}

/// Result of sending an email
#[derive(Debug)]
pub struct EmailSendResult {
    pub success: bool,
    pub message_id: Option<String>,
    pub error: Option<String>,
}

impl EmailSendResult {
    pub fn success(message_id: Option<String>) -> Self {
        Self {
            success: true,
            message_id,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message_id: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_address() {
        let addr = EmailAddress::new("test@example.com");
        assert_eq!(addr.email, "test@example.com");
        assert!(addr.name.is_none());

        let addr = EmailAddress::with_name("test@example.com", "Test User");
        assert_eq!(addr.email, "test@example.com");
        assert_eq!(addr.name.unwrap(), "Test User");
    }

    #[test]
    fn test_email_message() {
        let msg = EmailMessage::new(
            EmailAddress::new("to@example.com"),
            "Subject",
            "<p>Hello</p>",
        );

        assert_eq!(msg.to.len(), 1);
        assert_eq!(msg.subject, "Subject");
        assert_eq!(msg.html_body, "<p>Hello</p>");
        assert!(msg.text_body.is_none());

        let msg = msg.with_text_body("Hello");
        assert_eq!(msg.text_body.unwrap(), "Hello");
    }

    #[test]
    fn test_email_send_result() {
        let success = EmailSendResult::success(Some("msg-123".to_string()));
        assert!(success.success);
        assert_eq!(success.message_id.unwrap(), "msg-123");
        assert!(success.error.is_none());

        let failure = EmailSendResult::failure("Connection refused");
        assert!(!failure.success);
        assert!(failure.message_id.is_none());
        assert_eq!(failure.error.unwrap(), "Connection refused");
    }

    #[test]
    fn test_smtp_config_validation() {
        let config = SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            username: None,
            password: None,
            use_tls: true,
            from_email: "valid@example.com".to_string(),
            from_name: None,
        };

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_smtp_config_invalid_email() {
        let config = SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            username: None,
            password: None,
            use_tls: true,
            from_email: "not-an-email".to_string(),
            from_name: None,
        };

        assert!(config.validate().is_err());
    }
}
