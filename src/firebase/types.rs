//! Wire types for the store APIs

use serde::{Deserialize, Serialize};

// ============================================================================
// Identity Toolkit
// ============================================================================

/// An identity record as returned by lookup and listing calls
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityUser {
    pub local_id: String,
    pub email: Option<String>,
    #[serde(default)]
    pub disabled: bool,
}

/// Body for `accounts:lookup`
#[derive(Debug, Default, Serialize)]
pub struct LookupRequest {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub email: Vec<String>,
    #[serde(rename = "localId", skip_serializing_if = "Vec::is_empty")]
    pub local_id: Vec<String>,
}

/// Response of `accounts:lookup`; an absent `users` array means not found
#[derive(Debug, Deserialize)]
pub struct LookupResponse {
    #[serde(default)]
    pub users: Vec<IdentityUser>,
}

/// Body for `accounts:update`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest<'a> {
    pub local_id: &'a str,
    pub password: &'a str,
    pub return_secure_token: bool,
}

/// One page of `accounts:batchGet`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersPage {
    #[serde(default)]
    pub users: Vec<IdentityUser>,
    pub next_page_token: Option<String>,
}

/// Body for `accounts:batchDelete`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchDeleteRequest<'a> {
    pub local_ids: &'a [String],
    pub force: bool,
}

/// Per-record failure reported by `accounts:batchDelete`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchDeleteErrorInfo {
    #[serde(default)]
    pub index: usize,
    pub local_id: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// Response of `accounts:batchDelete`
#[derive(Debug, Deserialize)]
pub struct BatchDeleteResponse {
    #[serde(default)]
    pub errors: Vec<BatchDeleteErrorInfo>,
}

/// Error envelope returned by the identity API on non-2xx responses
#[derive(Debug, Deserialize)]
pub struct ApiErrorEnvelope {
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
}

// ============================================================================
// Firestore
// ============================================================================

/// A document reference; `name` is the full resource path
#[derive(Debug, Clone, Deserialize)]
pub struct FirestoreDocument {
    pub name: String,
}

/// One page of a collection listing
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDocumentsResponse {
    #[serde(default)]
    pub documents: Vec<FirestoreDocument>,
    pub next_page_token: Option<String>,
}

/// One page of `:listCollectionIds`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCollectionIdsResponse {
    #[serde(default)]
    pub collection_ids: Vec<String>,
    pub next_page_token: Option<String>,
}

/// One element of a `:runQuery` response stream
#[derive(Debug, Deserialize)]
pub struct RunQueryElement {
    pub document: Option<FirestoreDocument>,
}

// ============================================================================
// Cloud Storage
// ============================================================================

/// A blob object; `name` is the `/`-separated object path
#[derive(Debug, Clone, Deserialize)]
pub struct StorageObject {
    pub name: String,
}

/// One page of an object listing
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListObjectsResponse {
    #[serde(default)]
    pub items: Vec<StorageObject>,
    pub next_page_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_response_missing_users_means_not_found() {
        let response: LookupResponse = serde_json::from_str("{}").unwrap();
        assert!(response.users.is_empty());
    }

    #[test]
    fn test_identity_user_wire_names() {
        let user: IdentityUser = serde_json::from_str(
            r#"{"localId": "uid-1", "email": "a@x.com", "disabled": false}"#,
        )
        .unwrap();
        assert_eq!(user.local_id, "uid-1");
        assert_eq!(user.email.as_deref(), Some("a@x.com"));
    }

    #[test]
    fn test_lookup_request_skips_empty_fields() {
        let request = LookupRequest {
            email: vec!["a@x.com".to_string()],
            local_id: vec![],
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("email"));
        assert!(!json.contains("localId"));
    }

    #[test]
    fn test_batch_delete_response_defaults() {
        let response: BatchDeleteResponse = serde_json::from_str("{}").unwrap();
        assert!(response.errors.is_empty());
    }

    #[test]
    fn test_run_query_element_without_document() {
        // Trailing elements of a runQuery stream carry only a read time
        let element: RunQueryElement =
            serde_json::from_str(r#"{"readTime": "2024-01-01T00:00:00Z"}"#).unwrap();
        assert!(element.document.is_none());
    }
}
