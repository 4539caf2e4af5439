//! Password reset procedure

use crate::domain::UpdatePasswordInput;
use crate::error::Result;
use crate::firebase::IdentityClient;
use tracing::info;
use validator::Validate;

/// Resets a user's password credential by email.
///
/// Single attempt, synchronous: look the identity up by email, then
/// overwrite its credential. No other fields change.
pub struct PasswordService {
    identity: IdentityClient,
}

impl PasswordService {
    pub fn new(identity: IdentityClient) -> Self {
        Self { identity }
    }

    /// Validate the input, locate the identity and replace its credential.
    /// Returns the uid of the updated record.
    pub async fn update_password(&self, input: &UpdatePasswordInput) -> Result<String> {
        input.validate()?;

        info!(email = %input.email, "looking up user");
        let user = self.identity.get_user_by_email(&input.email).await?;

        info!(uid = %user.local_id, "found user, updating password");
        self.identity
            .update_password(&user.local_id, &input.new_password)
            .await?;

        Ok(user.local_id)
    }
}
