//! Identity Toolkit admin client
//!
//! Lookup, credential update, paginated listing and batch deletion of
//! identity records. Not-found and weak-password rejections are translated
//! into their distinct error kinds; everything else surfaces as an
//! identity-store error with the backend message attached.

use crate::config::FirebaseConfig;
use crate::domain::{BatchDeleteError, BatchDeleteResult};
use crate::error::{AppError, Result};
use crate::firebase::token::TokenProvider;
use crate::firebase::types::*;
use reqwest::Client;

/// Page size for identity listing, and the backend's batch-delete ceiling
pub const LIST_PAGE_SIZE: usize = 1000;

/// Identity store admin client
#[derive(Clone)]
pub struct IdentityClient {
    base_url: String,
    project_id: String,
    http_client: Client,
    token: TokenProvider,
}

impl IdentityClient {
    /// Create a new identity client
    pub fn new(config: &FirebaseConfig, token: TokenProvider) -> Self {
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: config.identity_url.clone(),
            project_id: config.project_id.clone(),
            http_client,
            token,
        }
    }

    fn accounts_url(&self, op: &str) -> String {
        format!(
            "{}/v1/projects/{}/accounts:{}",
            self.base_url, self.project_id, op
        )
    }

    /// Look up a single identity record by email
    pub async fn get_user_by_email(&self, email: &str) -> Result<IdentityUser> {
        let request = LookupRequest {
            email: vec![email.to_string()],
            ..Default::default()
        };
        let mut users = self.lookup(&request).await?;
        users
            .pop()
            .ok_or_else(|| AppError::NotFound(format!("No user found with email {}", email)))
    }

    /// Look up a single identity record by uid
    pub async fn get_user(&self, uid: &str) -> Result<IdentityUser> {
        let request = LookupRequest {
            local_id: vec![uid.to_string()],
            ..Default::default()
        };
        let mut users = self.lookup(&request).await?;
        users
            .pop()
            .ok_or_else(|| AppError::NotFound(format!("No user found with uid {}", uid)))
    }

    /// Existence check used by the reconciliation scan. Only the not-found
    /// classification maps to `false`; other failures propagate.
    pub async fn user_exists(&self, uid: &str) -> Result<bool> {
        match self.get_user(uid).await {
            Ok(_) => Ok(true),
            Err(AppError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn lookup(&self, request: &LookupRequest) -> Result<Vec<IdentityUser>> {
        let token = self.token.token().await?;

        let response = self
            .http_client
            .post(self.accounts_url("lookup"))
            .bearer_auth(&token)
            .json(request)
            .send()
            .await
            .map_err(|e| AppError::Identity(format!("Failed to look up user: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Identity(format!(
                "Failed to look up user: {} - {}",
                status, body
            )));
        }

        let lookup: LookupResponse = response
            .json()
            .await
            .map_err(|e| AppError::Identity(format!("Failed to parse lookup response: {}", e)))?;

        Ok(lookup.users)
    }

    /// Overwrite the password credential of one identity record
    pub async fn update_password(&self, uid: &str, new_password: &str) -> Result<()> {
        let token = self.token.token().await?;
        let request = UpdateAccountRequest {
            local_id: uid,
            password: new_password,
            return_secure_token: false,
        };

        let response = self
            .http_client
            .post(self.accounts_url("update"))
            .bearer_auth(&token)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Identity(format!("Failed to update password: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let backend_message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .ok()
                .and_then(|envelope| envelope.error)
                .map(|e| e.message)
                .unwrap_or_default();

            if backend_message.starts_with("WEAK_PASSWORD") {
                return Err(AppError::WeakPassword(
                    "Password should be at least 6 characters".to_string(),
                ));
            }
            if backend_message.starts_with("USER_NOT_FOUND") {
                return Err(AppError::NotFound(format!("No user found with uid {}", uid)));
            }

            return Err(AppError::Identity(format!(
                "Failed to update password: {} - {}",
                status, body
            )));
        }

        Ok(())
    }

    /// List the uid of every identity record.
    ///
    /// Explicit continuation loop rather than recursion; the listing is
    /// paged at [`LIST_PAGE_SIZE`] records per call.
    pub async fn list_all_uids(&self) -> Result<Vec<String>> {
        let token = self.token.token().await?;
        let mut uids = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![("maxResults", LIST_PAGE_SIZE.to_string())];
            if let Some(ref t) = page_token {
                query.push(("nextPageToken", t.clone()));
            }

            let response = self
                .http_client
                .get(self.accounts_url("batchGet"))
                .bearer_auth(&token)
                .query(&query)
                .send()
                .await
                .map_err(|e| AppError::Identity(format!("Failed to list users: {}", e)))?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(AppError::Identity(format!(
                    "Failed to list users: {} - {}",
                    status, body
                )));
            }

            let page: ListUsersPage = response.json().await.map_err(|e| {
                AppError::Identity(format!("Failed to parse user listing: {}", e))
            })?;

            uids.extend(page.users.into_iter().map(|u| u.local_id));

            match page.next_page_token {
                Some(t) if !t.is_empty() => page_token = Some(t),
                _ => break,
            }
        }

        Ok(uids)
    }

    /// Delete up to [`LIST_PAGE_SIZE`] identity records in one call.
    /// Partial failure is reported per record, not as a call error.
    pub async fn batch_delete(&self, uids: &[String]) -> Result<BatchDeleteResult> {
        let token = self.token.token().await?;
        let request = BatchDeleteRequest {
            local_ids: uids,
            force: true,
        };

        let response = self
            .http_client
            .post(self.accounts_url("batchDelete"))
            .bearer_auth(&token)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Identity(format!("Failed to delete users: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Identity(format!(
                "Failed to delete users: {} - {}",
                status, body
            )));
        }

        let parsed: BatchDeleteResponse = response.json().await.map_err(|e| {
            AppError::Identity(format!("Failed to parse batch delete response: {}", e))
        })?;

        let errors: Vec<BatchDeleteError> = parsed
            .errors
            .into_iter()
            .map(|e| BatchDeleteError {
                index: e.index,
                uid: e.local_id,
                message: e.message,
            })
            .collect();

        Ok(BatchDeleteResult {
            success_count: uids.len() - errors.len(),
            failure_count: errors.len(),
            errors,
        })
    }
}
