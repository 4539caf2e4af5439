//! Configuration management for the LifeGuardian backend

use crate::domain::SmtpConfig;
use anyhow::{bail, Context, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Default service-account key location, relative to the working directory.
/// Matches where operators drop the key next to the maintenance scripts.
pub const DEFAULT_KEY_FILE: &str = "serviceAccountKey.json";

/// Where the backend credentials come from, resolved once at startup.
///
/// `Explicit` is a key file placed at a known path; `Ambient` is the
/// path named by `GOOGLE_APPLICATION_CREDENTIALS`. Resolution failure is
/// a startup error, never a deferred runtime surprise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    Explicit(PathBuf),
    Ambient(PathBuf),
}

impl CredentialSource {
    /// Resolve credentials from the environment.
    ///
    /// When `require_key_file` is set (the destructive wipe path), only an
    /// explicit key file is accepted.
    pub fn resolve(require_key_file: bool) -> Result<Self> {
        let key_file =
            PathBuf::from(env::var("SERVICE_ACCOUNT_KEY").unwrap_or_else(|_| DEFAULT_KEY_FILE.to_string()));
        let ambient = env::var("GOOGLE_APPLICATION_CREDENTIALS")
            .ok()
            .map(PathBuf::from);
        Self::resolve_from(&key_file, ambient, require_key_file)
    }

    fn resolve_from(
        key_file: &Path,
        ambient: Option<PathBuf>,
        require_key_file: bool,
    ) -> Result<Self> {
        if key_file.is_file() {
            return Ok(Self::Explicit(key_file.to_path_buf()));
        }

        if require_key_file {
            bail!(
                "no service account key at {} - download one from the console and save it there",
                key_file.display()
            );
        }

        match ambient {
            Some(path) if path.is_file() => Ok(Self::Ambient(path)),
            Some(path) => bail!(
                "GOOGLE_APPLICATION_CREDENTIALS points at {} but no such file exists",
                path.display()
            ),
            None => bail!(
                "no credentials: place a key at {} or set GOOGLE_APPLICATION_CREDENTIALS",
                key_file.display()
            ),
        }
    }

    /// Path of the resolved key file
    pub fn key_path(&self) -> &Path {
        match self {
            Self::Explicit(path) | Self::Ambient(path) => path,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server host
    pub http_host: String,
    /// HTTP server port
    pub http_port: u16,
    /// Backend store configuration
    pub firebase: FirebaseConfig,
    /// SMTP relay configuration
    pub smtp: SmtpConfig,
}

/// Backend store configuration shared by the three clients
#[derive(Debug, Clone)]
pub struct FirebaseConfig {
    pub project_id: String,
    pub storage_bucket: String,
    /// Identity Toolkit API base URL
    pub identity_url: String,
    /// Firestore API base URL
    pub firestore_url: String,
    /// Cloud Storage JSON API base URL
    pub storage_url: String,
    pub credentials: CredentialSource,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// The credential source is resolved by the entrypoint first since each
    /// binary has its own policy on ambient fallback.
    pub fn from_env(credentials: CredentialSource) -> Result<Self> {
        Ok(Self {
            http_host: env::var("HTTP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            http_port: env::var("HTTP_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid HTTP_PORT")?,
            firebase: FirebaseConfig {
                project_id: env::var("FIREBASE_PROJECT_ID")
                    .unwrap_or_else(|_| "lifeguardian-app".to_string()),
                storage_bucket: env::var("FIREBASE_STORAGE_BUCKET")
                    .unwrap_or_else(|_| "lifeguardian-app.firebasestorage.app".to_string()),
                identity_url: env::var("IDENTITY_API_URL")
                    .unwrap_or_else(|_| "https://identitytoolkit.googleapis.com".to_string()),
                firestore_url: env::var("FIRESTORE_API_URL")
                    .unwrap_or_else(|_| "https://firestore.googleapis.com".to_string()),
                storage_url: env::var("STORAGE_API_URL")
                    .unwrap_or_else(|_| "https://storage.googleapis.com".to_string()),
                credentials,
            },
            smtp: SmtpConfig {
                host: env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string()),
                port: env::var("SMTP_PORT")
                    .unwrap_or_else(|_| "587".to_string())
                    .parse()
                    .context("Invalid SMTP_PORT")?,
                username: env::var("SMTP_USERNAME").ok(),
                password: env::var("SMTP_PASSWORD").ok(),
                use_tls: env::var("SMTP_USE_TLS")
                    .map(|s| s.to_lowercase() != "false")
                    .unwrap_or(true),
                from_email: env::var("SMTP_FROM_EMAIL")
                    .unwrap_or_else(|_| "noreply@lifeguardian.app".to_string()),
                from_name: env::var("SMTP_FROM_NAME")
                    .ok()
                    .or_else(|| Some("LifeGuardian".to_string())),
            },
        })
    }

    /// Get HTTP server address
    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn test_firebase_config() -> FirebaseConfig {
        FirebaseConfig {
            project_id: "lifeguardian-app".to_string(),
            storage_bucket: "lifeguardian-app.firebasestorage.app".to_string(),
            identity_url: "https://identitytoolkit.googleapis.com".to_string(),
            firestore_url: "https://firestore.googleapis.com".to_string(),
            storage_url: "https://storage.googleapis.com".to_string(),
            credentials: CredentialSource::Explicit(PathBuf::from("serviceAccountKey.json")),
        }
    }

    fn test_config() -> Config {
        Config {
            http_host: "127.0.0.1".to_string(),
            http_port: 8080,
            firebase: test_firebase_config(),
            smtp: SmtpConfig {
                host: "localhost".to_string(),
                port: 1025,
                username: None,
                password: None,
                use_tls: false,
                from_email: "noreply@lifeguardian.app".to_string(),
                from_name: Some("LifeGuardian".to_string()),
            },
        }
    }

    #[test]
    fn test_config_http_addr() {
        let config = test_config();
        assert_eq!(config.http_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_config_clone() {
        let config1 = test_config();
        let config2 = config1.clone();

        assert_eq!(config1.http_host, config2.http_host);
        assert_eq!(config1.firebase.project_id, config2.firebase.project_id);
    }

    #[test]
    fn test_config_debug() {
        let config = test_config();
        let debug_str = format!("{:?}", config);

        assert!(debug_str.contains("Config"));
        assert!(debug_str.contains("lifeguardian-app"));
    }

    #[test]
    fn test_resolve_prefers_explicit_key_file() {
        let dir = env::temp_dir().join("lifeguardian-config-test-explicit");
        fs::create_dir_all(&dir).unwrap();
        let key = dir.join("serviceAccountKey.json");
        fs::write(&key, "{}").unwrap();

        let source = CredentialSource::resolve_from(&key, None, false).unwrap();
        assert_eq!(source, CredentialSource::Explicit(key.clone()));
        assert_eq!(source.key_path(), key.as_path());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_resolve_requires_key_file_for_wipe() {
        let missing = PathBuf::from("/nonexistent/serviceAccountKey.json");
        let ambient = Some(missing.clone());

        // Even with ambient credentials available, a required key file that
        // is absent must fail resolution.
        let result = CredentialSource::resolve_from(&missing, ambient, true);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("service account key"));
    }

    #[test]
    fn test_resolve_falls_back_to_ambient() {
        let dir = env::temp_dir().join("lifeguardian-config-test-ambient");
        fs::create_dir_all(&dir).unwrap();
        let ambient = dir.join("adc.json");
        fs::write(&ambient, "{}").unwrap();

        let missing = dir.join("serviceAccountKey.json");
        let source =
            CredentialSource::resolve_from(&missing, Some(ambient.clone()), false).unwrap();
        assert_eq!(source, CredentialSource::Ambient(ambient));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_resolve_fails_hard_without_credentials() {
        let missing = PathBuf::from("/nonexistent/serviceAccountKey.json");
        let result = CredentialSource::resolve_from(&missing, None, false);
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_fails_on_dangling_ambient_path() {
        let missing = PathBuf::from("/nonexistent/serviceAccountKey.json");
        let dangling = Some(PathBuf::from("/nonexistent/adc.json"));
        let result = CredentialSource::resolve_from(&missing, dangling, false);
        assert!(result.is_err());
    }
}
