use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;

/// Errors that can occur while verifying a caller's identity token
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing token")]
    MissingToken,

    #[error("Malformed authorization header")]
    MalformedHeader,

    #[error("Unknown signing key: {0}")]
    UnknownKey(String),

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("Key fetch failed: {0}")]
    KeyFetch(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct JwkSet {
    keys: Vec<Jwk>,
}

#[derive(Debug, Clone, Deserialize)]
struct Jwk {
    kid: String,
    n: String,
    e: String,
}

/// Claims carried by a Firebase ID token that the service cares about.
#[derive(Debug, Deserialize)]
pub struct TokenClaims {
    /// The caller's uid.
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Verifies Firebase ID tokens against the Google secure-token JWKS.
///
/// Signing keys are cached by key id; an unknown kid triggers one refetch
/// (Google rotates the key set every few hours).
pub struct TokenVerifier {
    jwks_url: String,
    project_id: String,
    client: reqwest::Client,
    keys: RwLock<HashMap<String, Jwk>>,
}

impl TokenVerifier {
    pub fn new(jwks_url: String, project_id: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            jwks_url,
            project_id,
            client,
            keys: RwLock::new(HashMap::new()),
        }
    }

    /// Verify an ID token and return the caller's uid.
    ///
    /// Checks RS256 signature, expiry, and that issuer and audience are
    /// bound to this Firebase project.
    pub async fn verify(&self, token: &str) -> Result<String, AuthError> {
        Ok(self.verify_claims(token).await?.sub)
    }

    /// Verify an ID token and return its claims.
    pub async fn verify_claims(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let header = decode_header(token)?;
        let kid = header
            .kid
            .ok_or_else(|| AuthError::UnknownKey("<no kid in header>".to_string()))?;

        let jwk = self.key_for(&kid).await?;
        let key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e)?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.project_id]);
        validation.set_issuer(&[format!(
            "https://securetoken.google.com/{}",
            self.project_id
        )]);

        let data = decode::<TokenClaims>(token, &key, &validation)?;
        Ok(data.claims)
    }

    async fn key_for(&self, kid: &str) -> Result<Jwk, AuthError> {
        if let Some(key) = self.keys.read().await.get(kid) {
            return Ok(key.clone());
        }

        self.refresh_keys().await?;

        self.keys
            .read()
            .await
            .get(kid)
            .cloned()
            .ok_or_else(|| AuthError::UnknownKey(kid.to_string()))
    }

    async fn refresh_keys(&self) -> Result<(), AuthError> {
        tracing::debug!("Refreshing signing keys from {}", self.jwks_url);

        let set: JwkSet = self
            .client
            .get(&self.jwks_url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let mut keys = self.keys.write().await;
        keys.clear();
        for key in set.keys {
            keys.insert(key.kid.clone(), key);
        }

        tracing::debug!("Cached {} signing keys", keys.len());

        Ok(())
    }
}

/// Extract the bearer token from an `Authorization` header value.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::MissingToken)?;

    match header.split_once(' ') {
        Some(("Bearer", token)) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::MalformedHeader),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token(Some("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_bearer_token_missing_header() {
        assert!(matches!(bearer_token(None), Err(AuthError::MissingToken)));
    }

    #[test]
    fn test_bearer_token_malformed() {
        assert!(matches!(
            bearer_token(Some("abc.def.ghi")),
            Err(AuthError::MalformedHeader)
        ));
        assert!(matches!(
            bearer_token(Some("Basic abc")),
            Err(AuthError::MalformedHeader)
        ));
        assert!(matches!(
            bearer_token(Some("Bearer ")),
            Err(AuthError::MalformedHeader)
        ));
    }

    #[test]
    fn test_jwk_set_deserialization() {
        let set: JwkSet = serde_json::from_str(
            r#"{
                "keys": [
                    { "kty": "RSA", "alg": "RS256", "kid": "key1", "n": "modulus", "e": "AQAB" }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(set.keys.len(), 1);
        assert_eq!(set.keys[0].kid, "key1");
        assert_eq!(set.keys[0].e, "AQAB");
    }

    #[tokio::test]
    async fn test_garbage_token_rejected() {
        let verifier = TokenVerifier::new(
            "https://jwks.invalid/keys".to_string(),
            "petproto".to_string(),
        );

        // Not even a JWT; must fail before any key fetch.
        let result = verifier.verify("not-a-token").await;
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }
}
