use serde::{Deserialize, Serialize};
use crate::models::domain::RankedMatch;

/// Response for the two matching endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchesResponse {
    pub matches: Vec<RankedMatch>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Plain confirmation response for profile mutations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Response carrying the pet's characteristics list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacteristicsResponse {
    pub characteristics: Vec<String>,
}
