//! Maintenance procedure reports

use serde::Serialize;

/// Outcome of a reconciliation run
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconcileReport {
    /// Orphaned user documents removed from the document store
    pub documents_removed: usize,
    /// Orphaned `users/{uid}/` prefixes cleared from the blob store
    pub blob_prefixes_removed: usize,
}

impl ReconcileReport {
    /// Total orphans removed across both stores
    pub fn orphans_removed(&self) -> usize {
        self.documents_removed + self.blob_prefixes_removed
    }

    /// A clean system is a report of zero orphans, not an error
    pub fn is_clean(&self) -> bool {
        self.orphans_removed() == 0
    }
}

/// Outcome of a bulk wipe run
#[derive(Debug, Clone, Default, Serialize)]
pub struct WipeReport {
    /// Identity records deleted across all batches
    pub users_deleted: usize,
    /// Identity records that failed to delete
    pub users_failed: usize,
    /// Collections that were non-empty and got recursively deleted
    pub collections_deleted: Vec<String>,
    /// Collections skipped because they were already empty
    pub collections_empty: Vec<String>,
    /// Whether the blob prefix sweep completed
    pub storage_cleared: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconcile_report_clean() {
        let report = ReconcileReport::default();
        assert!(report.is_clean());
        assert_eq!(report.orphans_removed(), 0);
    }

    #[test]
    fn test_reconcile_report_counts_both_stores() {
        let report = ReconcileReport {
            documents_removed: 2,
            blob_prefixes_removed: 1,
        };
        assert!(!report.is_clean());
        assert_eq!(report.orphans_removed(), 3);
    }

    #[test]
    fn test_wipe_report_default() {
        let report = WipeReport::default();
        assert_eq!(report.users_deleted, 0);
        assert!(report.collections_deleted.is_empty());
        assert!(!report.storage_cleared);
    }
}
