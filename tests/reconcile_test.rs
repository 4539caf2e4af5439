//! Reconciliation procedure tests (using WireMock for all three stores)

use lifeguardian_core::config::{CredentialSource, FirebaseConfig};
use lifeguardian_core::firebase::{FirestoreClient, IdentityClient, StorageClient, TokenProvider};
use lifeguardian_core::service::ReconcileService;
use serde_json::json;
use std::path::PathBuf;
use wiremock::matchers::{body_partial_json, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DOCS_ROOT: &str = "/v1/projects/test/databases/(default)/documents";

fn doc_name(suffix: &str) -> String {
    format!("projects/test/databases/(default)/documents/{}", suffix)
}

fn create_service(base_url: &str) -> ReconcileService {
    let config = FirebaseConfig {
        project_id: "test".to_string(),
        storage_bucket: "test-bucket".to_string(),
        identity_url: base_url.to_string(),
        firestore_url: base_url.to_string(),
        storage_url: base_url.to_string(),
        credentials: CredentialSource::Explicit(PathBuf::from("unused.json")),
    };
    let token = TokenProvider::with_token("test-token");
    ReconcileService::new(
        IdentityClient::new(&config, token.clone()),
        FirestoreClient::new(&config, token.clone()),
        StorageClient::new(&config, token),
    )
}

/// Identity lookups: alice exists, bob does not
async fn mount_identity(mock_server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/v1/projects/test/accounts:lookup"))
        .and(body_partial_json(json!({"localId": ["alice"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [{"localId": "alice"}]
        })))
        .mount(mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/projects/test/accounts:lookup"))
        .and(body_partial_json(json!({"localId": ["bob"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_reconcile_removes_orphaned_document_subtree_and_blobs() {
    let mock_server = MockServer::start().await;
    mount_identity(&mock_server).await;

    // Document scan: one live document, one orphan with a sub-collection
    Mock::given(method("GET"))
        .and(path(format!("{}/users", DOCS_ROOT)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [
                {"name": doc_name("users/alice")},
                {"name": doc_name("users/bob")}
            ]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("{}/users/bob:listCollectionIds", DOCS_ROOT)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "collectionIds": ["journal"]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{}/users/bob/journal", DOCS_ROOT)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [{"name": doc_name("users/bob/journal/entry-1")}]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!(
            "{}/users/bob/journal/entry-1:listCollectionIds",
            DOCS_ROOT
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path(format!("{}/users/bob", DOCS_ROOT)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path(format!("{}/users/bob/journal/entry-1", DOCS_ROOT)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Blob scan: alice's object must survive, bob's two must go
    Mock::given(method("GET"))
        .and(path("/storage/v1/b/test-bucket/o"))
        .and(query_param("prefix", "users/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"name": "users/alice/c.txt"},
                {"name": "users/bob/a.txt"},
                {"name": "users/bob/b.txt"}
            ]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/storage/v1/b/test-bucket/o"))
        .and(query_param("prefix", "users/bob/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"name": "users/bob/a.txt"},
                {"name": "users/bob/b.txt"}
            ]
        })))
        .mount(&mock_server)
        .await;

    // Only bob's objects may be deleted; any other delete has no mock and
    // would fail the run
    Mock::given(method("DELETE"))
        .and(path_regex(r"^/storage/v1/b/test-bucket/o/users(%2F|/)bob.*"))
        .respond_with(ResponseTemplate::new(204))
        .expect(2)
        .mount(&mock_server)
        .await;

    let service = create_service(&mock_server.uri());

    let report = service.run().await.unwrap();
    assert_eq!(report.documents_removed, 1);
    assert_eq!(report.blob_prefixes_removed, 1);
    assert_eq!(report.orphans_removed(), 2);
}

#[tokio::test]
async fn test_reconcile_clean_system_reports_zero() {
    let mock_server = MockServer::start().await;

    // A system with no intervening writes after a previous run: both
    // stores come back empty and the report is clean
    Mock::given(method("GET"))
        .and(path(format!("{}/users", DOCS_ROOT)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/storage/v1/b/test-bucket/o"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&mock_server)
        .await;

    let service = create_service(&mock_server.uri());

    let report = service.run().await.unwrap();
    assert!(report.is_clean());
    assert_eq!(report.orphans_removed(), 0);
}

#[tokio::test]
async fn test_reconcile_is_idempotent_when_only_live_data_remains() {
    let mock_server = MockServer::start().await;
    mount_identity(&mock_server).await;

    Mock::given(method("GET"))
        .and(path(format!("{}/users", DOCS_ROOT)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [{"name": doc_name("users/alice")}]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/storage/v1/b/test-bucket/o"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"name": "users/alice/c.txt"}]
        })))
        .mount(&mock_server)
        .await;

    let service = create_service(&mock_server.uri());

    // Two consecutive runs with no intervening writes both report clean
    let first = service.run().await.unwrap();
    let second = service.run().await.unwrap();
    assert!(first.is_clean());
    assert!(second.is_clean());
}

#[tokio::test]
async fn test_reconcile_aborts_on_identity_lookup_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/users", DOCS_ROOT)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [{"name": doc_name("users/alice")}]
        })))
        .mount(&mock_server)
        .await;

    // Any lookup error other than not-found is fail-fast
    Mock::given(method("POST"))
        .and(path("/v1/projects/test/accounts:lookup"))
        .respond_with(ResponseTemplate::new(503).set_body_string("quota exceeded"))
        .mount(&mock_server)
        .await;

    let service = create_service(&mock_server.uri());

    assert!(service.run().await.is_err());
}

#[tokio::test]
async fn test_reconcile_falls_back_to_top_level_delete() {
    let mock_server = MockServer::start().await;
    mount_identity(&mock_server).await;

    Mock::given(method("GET"))
        .and(path(format!("{}/users", DOCS_ROOT)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [{"name": doc_name("users/bob")}]
        })))
        .mount(&mock_server)
        .await;

    // Subtree expansion fails; the procedure settles for the top-level
    // document
    Mock::given(method("POST"))
        .and(path(format!("{}/users/bob:listCollectionIds", DOCS_ROOT)))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path(format!("{}/users/bob", DOCS_ROOT)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/storage/v1/b/test-bucket/o"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&mock_server)
        .await;

    let service = create_service(&mock_server.uri());

    let report = service.run().await.unwrap();
    assert_eq!(report.documents_removed, 1);
}
