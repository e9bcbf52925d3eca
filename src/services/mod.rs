// Service exports
pub mod auth;
pub mod firestore;

pub use auth::{bearer_token, AuthError, TokenClaims, TokenVerifier};
pub use firestore::{FirestoreClient, FirestoreError};
