//! Clients for the managed backend stores
//!
//! One client per store family: identity (Identity Toolkit admin API),
//! documents (Firestore REST API) and blobs (Cloud Storage JSON API).
//! All three authenticate through a shared [`TokenProvider`].

pub mod credentials;
pub mod firestore;
pub mod identity;
pub mod storage;
pub mod token;
pub mod types;

pub use credentials::ServiceAccountKey;
pub use firestore::{document_id, FirestoreClient};
pub use identity::IdentityClient;
pub use storage::{uid_segment, StorageClient};
pub use token::TokenProvider;
