mod config;
mod core;
mod models;
mod routes;
mod services;

use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use crate::config::Settings;
use crate::core::{Matcher, VaderAnalyzer};
use crate::models::AttributeWeights;
use crate::routes::AppState;
use crate::services::{FirestoreClient, TokenVerifier};
use std::sync::Arc;
use tracing::{error, info};

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .content_type("application/json")
            .body(serde_json::to_string(self).unwrap())
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Initialize logging
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting PetProto matching service...");

    // Load configuration
    let settings = Settings::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    info!("Configuration loaded successfully");

    let project_id = settings.firestore.project_id.clone();

    // Initialize Firestore client
    let firestore = Arc::new(FirestoreClient::new(
        settings.firestore.base_url,
        project_id.clone(),
        settings.firestore.api_token,
    ));

    info!("Firestore client initialized (project: {})", project_id);

    // Initialize the identity-token verifier
    let auth_project = settings.auth.project_id.unwrap_or(project_id);
    let verifier = Arc::new(TokenVerifier::new(settings.auth.jwks_url, auth_project));

    info!("Token verifier initialized");

    // Initialize matcher with configured weights
    let weights = AttributeWeights {
        species: settings.scoring.weights.species,
        breed: settings.scoring.weights.breed,
        sex_same: settings.scoring.weights.sex_same,
        sex_different: settings.scoring.weights.sex_different,
        colour: settings.scoring.weights.colour,
        location: settings.scoring.weights.location,
    };

    let matcher = Matcher::new(weights, Arc::new(VaderAnalyzer::new()));

    info!("Matcher initialized with weights: {:?}", weights);

    // Build application state
    let app_state = AppState {
        firestore,
        verifier,
        matcher,
        max_results: settings.matching.max_results,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);
    let allowed_origins = settings.server.allowed_origins.clone();

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = match &allowed_origins {
            Some(origins) => origins.iter().fold(
                Cors::default().allow_any_method().allow_any_header(),
                |cors, origin| cors.allowed_origin(origin),
            ),
            None => Cors::permissive(),
        };

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
