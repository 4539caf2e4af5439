//! Bulk wipe procedure
//!
//! Deletes every identity record, every document in the known top-level
//! collections and every blob under the shared prefix. Destructive and
//! irreversible; each stage is wrapped so one failing stage cannot
//! prevent the next from attempting.

use crate::domain::WipeReport;
use crate::error::Result;
use crate::firebase::identity::LIST_PAGE_SIZE;
use crate::firebase::{FirestoreClient, IdentityClient, StorageClient};
use crate::service::USERS_PREFIX;
use tracing::{error, info};

/// Top-level collections covered by a wipe. Collections added to the live
/// system later will survive until this list is updated.
pub const WIPE_COLLECTIONS: [&str; 3] = ["users", "groups", "invite_codes"];

pub struct WipeService {
    identity: IdentityClient,
    firestore: FirestoreClient,
    storage: StorageClient,
}

impl WipeService {
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

    /// Run the full wipe. Stage failures are logged, never propagated, so
    /// the report always describes everything that was attempted.
    pub async fn run(&self) -> WipeReport {
        info!("starting total wipe");
        let mut report = WipeReport::default();

        if let Err(e) = self.wipe_identities(&mut report).await {
            error!("identity wipe failed: {}", e);
        }
        if let Err(e) = self.wipe_collections(&mut report).await {
            error!("collection wipe failed: {}", e);
        }
        if let Err(e) = self.wipe_blobs(&mut report).await {
            error!("blob wipe failed: {}", e);
        }

        info!(
            users_deleted = report.users_deleted,
            users_failed = report.users_failed,
            "wipe complete"
        );
        report
    }

    async fn wipe_identities(&self, report: &mut WipeReport) -> Result<()> {
        info!("scanning identity records");
        let uids = self.identity.list_all_uids().await?;
        if uids.is_empty() {
            info!("no users found in the identity store");
            return Ok(());
        }

        info!(count = uids.len(), "deleting identity records");
        for chunk in uids.chunks(LIST_PAGE_SIZE) {
            match self.identity.batch_delete(chunk).await {
                Ok(result) => {
                    info!(
                        succeeded = result.success_count,
                        failed = result.failure_count,
                        "deleted batch"
                    );
                    for err in &result.errors {
                        error!(
                            uid = err.uid.as_deref().unwrap_or("?"),
                            index = err.index,
                            "batch delete error: {}",
                            err.message
                        );
                    }
                    report.users_deleted += result.success_count;
                    report.users_failed += result.failure_count;
                }
                // A failed chunk does not abort the remaining chunks
                Err(e) => {
                    error!("batch delete call failed: {}", e);
                    report.users_failed += chunk.len();
                }
            }
        }

        Ok(())
    }

    async fn wipe_collections(&self, report: &mut WipeReport) -> Result<()> {
        info!("deleting document collections");
        for collection in WIPE_COLLECTIONS {
            if self.firestore.collection_is_empty(collection).await? {
                info!("'{}' is already empty", collection);
                report.collections_empty.push(collection.to_string());
                continue;
            }

            info!("deleting '{}' collection", collection);
            let deleted = self.firestore.delete_collection(collection).await?;
            info!(deleted, "'{}' deleted", collection);
            report.collections_deleted.push(collection.to_string());
        }

        Ok(())
    }

    async fn wipe_blobs(&self, report: &mut WipeReport) -> Result<()> {
        info!("clearing blob prefix '{}'", USERS_PREFIX);
        let deleted = self.storage.delete_prefix(USERS_PREFIX).await?;
        info!(deleted, "blob prefix cleared");
        report.storage_cleared = true;
        Ok(())
    }
}
