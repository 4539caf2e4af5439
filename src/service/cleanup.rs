//! Single-user data cleanup procedure
//!
//! Removes one user's document subtree and blob objects, resolving the
//! uid from an email when the identity record may already be gone.

use crate::error::{AppError, Result};
use crate::firebase::{FirestoreClient, IdentityClient, StorageClient};
use crate::service::{USERS_COLLECTION, USERS_PREFIX};
use tracing::{error, info};

pub struct CleanupService {
    identity: IdentityClient,
    firestore: FirestoreClient,
    storage: StorageClient,
}

impl CleanupService {
    pub fn new(
        identity: IdentityClient,
        firestore: FirestoreClient,
        storage: StorageClient,
    ) -> Self {
        Self {
            identity,
            firestore,
            storage,
        }
    }

    /// Resolve an email or uid argument to a uid.
    ///
    /// Emails are resolved through the identity store first; if the
    /// identity was already deleted, the document store is consulted (the
    /// document id is the uid).
    pub async fn resolve_uid(&self, email_or_uid: &str) -> Result<String> {
        if !email_or_uid.contains('@') {
            info!(uid = %email_or_uid, "using provided uid");
            return Ok(email_or_uid.to_string());
        }

        info!(email = %email_or_uid, "searching identity store");
        match self.identity.get_user_by_email(email_or_uid).await {
            Ok(user) => {
                info!(uid = %user.local_id, "found uid in identity store");
                Ok(user.local_id)
            }
            Err(AppError::NotFound(_)) => {
                info!("user not in identity store, checking document store");
                self.firestore
                    .find_uid_by_email(USERS_COLLECTION, email_or_uid)
                    .await?
                    .inspect(|uid| info!(uid = %uid, "found uid in document store"))
                    .ok_or_else(|| {
                        AppError::NotFound(format!(
                            "No user found with email {} in identity or document store",
                            email_or_uid
                        ))
                    })
            }
            Err(e) => Err(e),
        }
    }

    /// Delete one user's document subtree and blob objects, best-effort:
    /// a failure in either store is logged and does not stop the other.
    /// Returns the resolved uid.
    pub async fn cleanup(&self, email_or_uid: &str) -> Result<String> {
        let uid = self.resolve_uid(email_or_uid).await?;
        info!(uid = %uid, "starting cleanup");

        let doc_name = self.firestore.document_name(USERS_COLLECTION, &uid);
        match self.firestore.recursive_delete_document(&doc_name).await {
            Ok(deleted) => info!(deleted, "document data deleted"),
            Err(e) => error!("error deleting document data: {}", e),
        }

        let prefix = format!("{}{}/", USERS_PREFIX, uid);
        match self.storage.delete_prefix(&prefix).await {
            Ok(deleted) => info!(deleted, "blob objects deleted"),
            Err(e) => error!("error deleting blob objects: {}", e),
        }

        info!(uid = %uid, "cleanup complete");
        Ok(uid)
    }
}
