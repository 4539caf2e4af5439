//! Account lifecycle procedures
//!
//! Each procedure is a flat sequential flow over the store clients; none
//! compose with each other at runtime.

pub mod cleanup;
pub mod otp;
pub mod password;
pub mod reconcile;
pub mod wipe;

pub use cleanup::CleanupService;
pub use otp::OtpService;
pub use password::PasswordService;
pub use reconcile::ReconcileService;
pub use wipe::WipeService;

/// Top-level collection holding one document per account uid
pub const USERS_COLLECTION: &str = "users";

/// Blob prefix under which all per-user objects live
pub const USERS_PREFIX: &str = "users/";
