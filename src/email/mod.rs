//! Email sending for the LifeGuardian backend
//!
//! A single SMTP relay (via lettre) behind the [`EmailProvider`] trait,
//! plus the fixed one-time-passcode template.

pub mod provider;
pub mod smtp;
pub mod templates;

pub use provider::{EmailProvider, EmailProviderError};
pub use smtp::SmtpEmailProvider;
