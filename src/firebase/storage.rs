//! Cloud Storage JSON API client
//!
//! Prefix listing and deletion for blob objects. The backend has no
//! server-side prefix delete; `delete_prefix` lists and deletes each
//! object, which is what the managed SDKs do under the hood as well.

use crate::config::FirebaseConfig;
use crate::error::{AppError, Result};
use crate::firebase::token::TokenProvider;
use crate::firebase::types::*;
use reqwest::Client;

/// The uid segment of an object path following the `users/{uid}/...`
/// convention, i.e. the second `/`-separated component
pub fn uid_segment(name: &str) -> Option<&str> {
    name.split('/').nth(1).filter(|s| !s.is_empty())
}

/// Blob store client
#[derive(Clone)]
pub struct StorageClient {
    base_url: String,
    bucket: String,
    http_client: Client,
    token: TokenProvider,
}

impl StorageClient {
    /// Create a new blob store client
    pub fn new(config: &FirebaseConfig, token: TokenProvider) -> Self {
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: config.storage_url.clone(),
            bucket: config.storage_bucket.clone(),
            http_client,
            token,
        }
    }

    fn objects_url(&self) -> String {
        format!("{}/storage/v1/b/{}/o", self.base_url, self.bucket)
    }

    /// List the names of every object under a prefix
    pub async fn list_objects(&self, prefix: &str) -> Result<Vec<String>> {
        let token = self.token.token().await?;
        let mut names = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![("prefix", prefix.to_string())];
            if let Some(ref t) = page_token {
                query.push(("pageToken", t.clone()));
            }

            let response = self
                .http_client
                .get(self.objects_url())
                .bearer_auth(&token)
                .query(&query)
                .send()
                .await
                .map_err(|e| AppError::Storage(format!("Failed to list objects: {}", e)))?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(AppError::Storage(format!(
                    "Failed to list objects: {} - {}",
                    status, body
                )));
            }

            let page: ListObjectsResponse = response
                .json()
                .await
                .map_err(|e| AppError::Storage(format!("Failed to parse object listing: {}", e)))?;

            names.extend(page.items.into_iter().map(|o| o.name));

            match page.next_page_token {
                Some(t) if !t.is_empty() => page_token = Some(t),
                _ => break,
            }
        }

        Ok(names)
    }

    /// Delete a single object by name
    pub async fn delete_object(&self, name: &str) -> Result<()> {
        let token = self.token.token().await?;
        let url = format!("{}/{}", self.objects_url(), urlencoding::encode(name));

        let response = self
            .http_client
            .delete(&url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Failed to delete object: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Storage(format!(
                "Failed to delete object {}: {} - {}",
                name, status, body
            )));
        }

        Ok(())
    }

    /// Delete every object under a prefix. Returns the number deleted.
    pub async fn delete_prefix(&self, prefix: &str) -> Result<usize> {
        let names = self.list_objects(prefix).await?;
        for name in &names {
            tracing::debug!(object = %name, "deleting object");
            self.delete_object(name).await?;
        }
        Ok(names.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uid_segment() {
        assert_eq!(uid_segment("users/uid-1/profile.jpg"), Some("uid-1"));
        assert_eq!(uid_segment("users/uid-1/nested/deep.txt"), Some("uid-1"));
    }

    #[test]
    fn test_uid_segment_rejects_bare_paths() {
        assert_eq!(uid_segment("users"), None);
        assert_eq!(uid_segment("users/"), None);
    }
}
