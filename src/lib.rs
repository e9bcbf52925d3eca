//! PetProto Match - pet matching service for the PetProto social app
//!
//! This library provides the match-scoring core used by the PetProto app:
//! attribute compatibility between pet profiles, sentiment compatibility
//! between survey answers, and the ranker that combines them.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{attribute_match_score, sentiment_match_score, MatchError, MatchMode, Matcher, SentimentAnalyzer, VaderAnalyzer};
pub use crate::models::{AttributeWeights, CandidateRecord, PetProfile, RankedMatch, SurveyResponses, UserRecord};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let weights = AttributeWeights::default();
        let a = PetProfile {
            species: Some("Dog".to_string()),
            ..PetProfile::default()
        };
        let b = PetProfile {
            species: Some("dog".to_string()),
            ..PetProfile::default()
        };
        assert_eq!(attribute_match_score(&a, &b, &weights), weights.species);
    }
}
