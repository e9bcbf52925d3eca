// Route exports
pub mod matches;
pub mod profile;

use crate::core::Matcher;
use crate::models::ErrorResponse;
use crate::services::{bearer_token, AuthError, FirestoreClient, TokenVerifier};
use actix_web::{web, HttpRequest, HttpResponse};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub firestore: Arc<FirestoreClient>,
    pub verifier: Arc<TokenVerifier>,
    pub matcher: Matcher,
    /// Response cap applied after ranking; `None` = unlimited.
    pub max_results: Option<usize>,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(matches::configure)
        .configure(profile::configure);
}

/// Resolve the caller's uid from the `Authorization` header.
///
/// On failure the caller gets the ready-made 401 response.
pub(crate) async fn authenticate(
    state: &AppState,
    req: &HttpRequest,
) -> Result<String, HttpResponse> {
    let header = req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let token = match bearer_token(header) {
        Ok(token) => token,
        Err(e @ AuthError::MissingToken) => {
            return Err(HttpResponse::Unauthorized().json(ErrorResponse {
                error: "Missing token".to_string(),
                message: e.to_string(),
                status_code: 401,
            }));
        }
        Err(e) => {
            return Err(HttpResponse::Unauthorized().json(ErrorResponse {
                error: "Invalid token".to_string(),
                message: e.to_string(),
                status_code: 401,
            }));
        }
    };

    match state.verifier.verify(token).await {
        Ok(uid) => Ok(uid),
        Err(e) => {
            tracing::info!("Token verification failed: {}", e);
            Err(HttpResponse::Unauthorized().json(ErrorResponse {
                error: "Invalid token".to_string(),
                message: e.to_string(),
                status_code: 401,
            }))
        }
    }
}
