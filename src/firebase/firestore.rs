//! Firestore REST client
//!
//! Collection scans, point deletes and recursive subtree deletion. The
//! REST surface has no server-side recursive delete, so the client expands
//! the subtree itself over an explicit work list before deleting.

use crate::config::FirebaseConfig;
use crate::error::{AppError, Result};
use crate::firebase::token::TokenProvider;
use crate::firebase::types::*;
use reqwest::Client;
use serde_json::json;

const SCAN_PAGE_SIZE: usize = 300;

/// Final path segment of a document resource name, i.e. the document id
pub fn document_id(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

/// Document store client
#[derive(Clone)]
pub struct FirestoreClient {
    base_url: String,
    project_id: String,
    http_client: Client,
    token: TokenProvider,
}

impl FirestoreClient {
    /// Create a new document store client
    pub fn new(config: &FirebaseConfig, token: TokenProvider) -> Self {
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: config.firestore_url.clone(),
            project_id: config.project_id.clone(),
            http_client,
            token,
        }
    }

    /// Resource path of the default database root
    fn database_root(&self) -> String {
        format!(
            "projects/{}/databases/(default)/documents",
            self.project_id
        )
    }

    /// Full resource name of `collection_id/{doc_id}` under the root
    pub fn document_name(&self, collection_id: &str, doc_id: &str) -> String {
        format!("{}/{}/{}", self.database_root(), collection_id, doc_id)
    }

    /// List every document of a top-level collection (full scan)
    pub async fn list_documents(&self, collection_id: &str) -> Result<Vec<FirestoreDocument>> {
        self.list_documents_under(&self.database_root(), collection_id)
            .await
    }

    /// List every document of `parent/{collection_id}`, following the
    /// continuation token until exhausted
    async fn list_documents_under(
        &self,
        parent: &str,
        collection_id: &str,
    ) -> Result<Vec<FirestoreDocument>> {
        let token = self.token.token().await?;
        let url = format!("{}/v1/{}/{}", self.base_url, parent, collection_id);
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![("pageSize", SCAN_PAGE_SIZE.to_string())];
            if let Some(ref t) = page_token {
                query.push(("pageToken", t.clone()));
            }

            let response = self
                .http_client
                .get(&url)
                .bearer_auth(&token)
                .query(&query)
                .send()
                .await
                .map_err(|e| AppError::Firestore(format!("Failed to list documents: {}", e)))?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(AppError::Firestore(format!(
                    "Failed to list documents: {} - {}",
                    status, body
                )));
            }

            let page: ListDocumentsResponse = response.json().await.map_err(|e| {
                AppError::Firestore(format!("Failed to parse document listing: {}", e))
            })?;

            documents.extend(page.documents);

            match page.next_page_token {
                Some(t) if !t.is_empty() => page_token = Some(t),
                _ => break,
            }
        }

        Ok(documents)
    }

    /// Whether a top-level collection has at least one document
    pub async fn collection_is_empty(&self, collection_id: &str) -> Result<bool> {
        let token = self.token.token().await?;
        let url = format!(
            "{}/v1/{}/{}",
            self.base_url,
            self.database_root(),
            collection_id
        );

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&token)
            .query(&[("pageSize", "1")])
            .send()
            .await
            .map_err(|e| AppError::Firestore(format!("Failed to check collection: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Firestore(format!(
                "Failed to check collection: {} - {}",
                status, body
            )));
        }

        let page: ListDocumentsResponse = response
            .json()
            .await
            .map_err(|e| AppError::Firestore(format!("Failed to parse document listing: {}", e)))?;

        Ok(page.documents.is_empty())
    }

    /// Find the document id of the first `collection_id` document whose
    /// `email` field equals the given value
    pub async fn find_uid_by_email(
        &self,
        collection_id: &str,
        email: &str,
    ) -> Result<Option<String>> {
        let token = self.token.token().await?;
        let url = format!("{}/v1/{}:runQuery", self.base_url, self.database_root());

        let body = json!({
            "structuredQuery": {
                "from": [{"collectionId": collection_id}],
                "where": {
                    "fieldFilter": {
                        "field": {"fieldPath": "email"},
                        "op": "EQUAL",
                        "value": {"stringValue": email}
                    }
                },
                "limit": 1
            }
        });

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Firestore(format!("Failed to query documents: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Firestore(format!(
                "Failed to query documents: {} - {}",
                status, body
            )));
        }

        let elements: Vec<RunQueryElement> = response
            .json()
            .await
            .map_err(|e| AppError::Firestore(format!("Failed to parse query response: {}", e)))?;

        Ok(elements
            .into_iter()
            .find_map(|e| e.document)
            .map(|doc| document_id(&doc.name).to_string()))
    }

    /// List the sub-collection ids of a document
    async fn list_collection_ids(&self, document_name: &str) -> Result<Vec<String>> {
        let token = self.token.token().await?;
        let url = format!(
            "{}/v1/{}:listCollectionIds",
            self.base_url, document_name
        );
        let mut ids = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut body = json!({"pageSize": SCAN_PAGE_SIZE});
            if let Some(ref t) = page_token {
                body["pageToken"] = json!(t);
            }

            let response = self
                .http_client
                .post(&url)
                .bearer_auth(&token)
                .json(&body)
                .send()
                .await
                .map_err(|e| {
                    AppError::Firestore(format!("Failed to list sub-collections: {}", e))
                })?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(AppError::Firestore(format!(
                    "Failed to list sub-collections: {} - {}",
                    status, body
                )));
            }

            let page: ListCollectionIdsResponse = response.json().await.map_err(|e| {
                AppError::Firestore(format!("Failed to parse sub-collection listing: {}", e))
            })?;

            ids.extend(page.collection_ids);

            match page.next_page_token {
                Some(t) if !t.is_empty() => page_token = Some(t),
                _ => break,
            }
        }

        Ok(ids)
    }

    /// Delete a single document by full resource name
    pub async fn delete_document(&self, document_name: &str) -> Result<()> {
        let token = self.token.token().await?;
        let url = format!("{}/v1/{}", self.base_url, document_name);

        let response = self
            .http_client
            .delete(&url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| AppError::Firestore(format!("Failed to delete document: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Firestore(format!(
                "Failed to delete document: {} - {}",
                status, body
            )));
        }

        Ok(())
    }

    /// Delete a document and every document beneath it.
    ///
    /// The subtree is expanded over an explicit work list (no call-stack
    /// recursion); documents are independent records, so deletion order
    /// within the subtree does not matter. Returns the number of documents
    /// deleted.
    pub async fn recursive_delete_document(&self, document_name: &str) -> Result<usize> {
        let mut pending = vec![document_name.to_string()];
        let mut discovered = Vec::new();

        while let Some(name) = pending.pop() {
            for collection_id in self.list_collection_ids(&name).await? {
                let children = self.list_documents_under(&name, &collection_id).await?;
                pending.extend(children.into_iter().map(|doc| doc.name));
            }
            discovered.push(name);
        }

        for name in &discovered {
            self.delete_document(name).await?;
        }

        Ok(discovered.len())
    }

    /// Recursively delete every document of a top-level collection.
    /// Returns the number of documents deleted, sub-documents included.
    pub async fn delete_collection(&self, collection_id: &str) -> Result<usize> {
        let documents = self.list_documents(collection_id).await?;
        let mut deleted = 0;
        for doc in documents {
            deleted += self.recursive_delete_document(&doc.name).await?;
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_id_extracts_final_segment() {
        assert_eq!(
            document_id("projects/p/databases/(default)/documents/users/uid-42"),
            "uid-42"
        );
    }

    #[test]
    fn test_document_id_on_bare_name() {
        assert_eq!(document_id("uid-42"), "uid-42");
    }
}
