//! Fixed email templates
//!
//! Variables use {{variable_name}} syntax. The OTP expiry wording is
//! advisory text only; nothing here persists or checks the code.

use crate::domain::{EmailAddress, EmailMessage};

const OTP_SUBJECT: &str = "Your LifeGuardian verification code";

const OTP_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<body style="font-family: Arial, sans-serif; background-color: #f5f5f5; padding: 24px;">
  <div style="max-width: 480px; margin: 0 auto; background: #ffffff; border-radius: 8px; padding: 32px;">
    <h2 style="color: #1a73e8; margin-top: 0;">LifeGuardian</h2>
    <p>Your one-time verification code is:</p>
    <p style="font-size: 32px; font-weight: bold; letter-spacing: 6px; text-align: center; margin: 24px 0;">{{otp}}</p>
    <p>This code expires in 10 minutes. If you did not request it, you can ignore this email.</p>
  </div>
</body>
</html>"#;

const OTP_TEMPLATE_TEXT: &str = "Your LifeGuardian verification code is: {{otp}}\n\nThis code expires in 10 minutes. If you did not request it, you can ignore this email.\n";

/// Render a variable into a template
fn render(template: &str, key: &str, value: &str) -> String {
    template.replace(&format!("{{{{{}}}}}", key), value)
}

/// Build the OTP notification for one recipient
pub fn otp_message(email: &str, otp: &str) -> EmailMessage {
    EmailMessage::new(
        EmailAddress::new(email),
        OTP_SUBJECT,
        render(OTP_TEMPLATE, "otp", otp),
    )
    .with_text_body(render(OTP_TEMPLATE_TEXT, "otp", otp))
}
