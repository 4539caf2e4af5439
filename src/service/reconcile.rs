//! Orphan reconciliation procedure
//!
//! Cross-references the document and blob stores against the identity
//! store and removes records whose uid no longer has an identity. Running
//! twice in a row with no intervening writes is a no-op the second time.

use crate::domain::ReconcileReport;
use crate::error::Result;
use crate::firebase::{document_id, uid_segment, FirestoreClient, IdentityClient, StorageClient};
use crate::service::{USERS_COLLECTION, USERS_PREFIX};
use std::collections::BTreeSet;
use tracing::{info, warn};

pub struct ReconcileService {
    identity: IdentityClient,
    firestore: FirestoreClient,
    storage: StorageClient,
}

impl ReconcileService {
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

    /// Scan both stores and delete orphaned records.
    ///
    /// Identity lookup failures other than not-found abort the whole run;
    /// a half-finished reconciliation is safe to re-run.
    pub async fn run(&self) -> Result<ReconcileReport> {
        info!("scanning for orphaned data");
        let mut report = ReconcileReport::default();

        self.reconcile_documents(&mut report).await?;
        self.reconcile_blobs(&mut report).await?;

        if report.is_clean() {
            info!("system clean, no orphaned data found");
        } else {
            info!(
                orphans = report.orphans_removed(),
                "orphan cleanup complete"
            );
        }

        Ok(report)
    }

    async fn reconcile_documents(&self, report: &mut ReconcileReport) -> Result<()> {
        info!("checking document store '{}'", USERS_COLLECTION);
        let documents = self.firestore.list_documents(USERS_COLLECTION).await?;
        if documents.is_empty() {
            info!("'{}' collection is empty", USERS_COLLECTION);
            return Ok(());
        }

        for doc in documents {
            let uid = document_id(&doc.name).to_string();
            if self.identity.user_exists(&uid).await? {
                continue;
            }

            warn!(uid = %uid, "orphaned document found, deleting");
            match self.firestore.recursive_delete_document(&doc.name).await {
                Ok(deleted) => info!(uid = %uid, deleted, "document subtree deleted"),
                Err(e) => {
                    // Fallback accepts losing sub-collection data rather
                    // than leaving the top-level orphan in place.
                    warn!(uid = %uid, error = %e, "recursive delete failed, deleting top-level document only");
                    self.firestore.delete_document(&doc.name).await?;
                }
            }
            report.documents_removed += 1;
        }

        Ok(())
    }

    async fn reconcile_blobs(&self, report: &mut ReconcileReport) -> Result<()> {
        info!("checking blob store '{}'", USERS_PREFIX);
        let objects = self.storage.list_objects(USERS_PREFIX).await?;
        if objects.is_empty() {
            info!("'{}' prefix is empty", USERS_PREFIX);
            return Ok(());
        }

        // Group objects by the uid segment of their path
        let uids: BTreeSet<String> = objects
            .iter()
            .filter_map(|name| uid_segment(name))
            .map(str::to_string)
            .collect();

        for uid in uids {
            if self.identity.user_exists(&uid).await? {
                continue;
            }

            warn!(uid = %uid, "orphaned objects found, deleting");
            let deleted = self
                .storage
                .delete_prefix(&format!("{}{}/", USERS_PREFIX, uid))
                .await?;
            info!(uid = %uid, deleted, "objects deleted");
            report.blob_prefixes_removed += 1;
        }

        Ok(())
    }
}
