use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-question survey answers, keyed by question identifier.
///
/// Question sets are per-user: one user's keys may be a subset or superset
/// of another's. Only the intersection takes part in sentiment scoring.
pub type SurveyResponses = HashMap<String, String>;

/// A pet's categorical attributes, embedded in the owner's user record.
///
/// Every matching field is optional free text. A field that is absent, or
/// trims to empty, takes no part in scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PetProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub species: Option<String>,
    #[serde(default)]
    pub breed: Option<String>,
    #[serde(default)]
    pub sex: Option<String>,
    #[serde(default)]
    pub colour: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub dob: Option<String>,
    #[serde(default)]
    pub characteristics: Vec<String>,
}

/// A user document from the `users` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub uid: String,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "petProfile", default)]
    pub pet_profile: Option<PetProfile>,
}

/// One entry of the candidate pool handed to the ranker.
///
/// The survey is pre-fetched by the caller; the ranker itself does no I/O.
#[derive(Debug, Clone)]
pub struct CandidateRecord {
    pub user: UserRecord,
    pub survey: Option<SurveyResponses>,
}

/// A scored candidate in ranking order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedMatch {
    pub uid: String,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    #[serde(rename = "petProfile")]
    pub pet_profile: PetProfile,
    #[serde(rename = "petMatchScore")]
    pub attribute_score: u32,
    #[serde(
        rename = "sentimentMatchScore",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub sentiment_score: Option<f64>,
    #[serde(rename = "finalMatchScore")]
    pub final_score: f64,
}

/// Points awarded per attribute rule.
#[derive(Debug, Clone, Copy)]
pub struct AttributeWeights {
    pub species: u32,
    pub breed: u32,
    pub sex_same: u32,
    pub sex_different: u32,
    pub colour: u32,
    pub location: u32,
}

impl Default for AttributeWeights {
    fn default() -> Self {
        Self {
            species: 5,
            breed: 3,
            sex_same: 1,
            sex_different: 2,
            colour: 1,
            location: 2,
        }
    }
}

impl AttributeWeights {
    /// Highest score any pair of profiles can reach.
    pub fn max_score(&self) -> u32 {
        self.species
            + self.breed
            + self.sex_same.max(self.sex_different)
            + self.colour
            + self.location
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_max_score() {
        let weights = AttributeWeights::default();
        assert_eq!(weights.max_score(), 13);
    }

    #[test]
    fn test_pet_profile_deserializes_with_missing_fields() {
        let profile: PetProfile = serde_json::from_str(r#"{"species": "Dog"}"#).unwrap();
        assert_eq!(profile.species.as_deref(), Some("Dog"));
        assert!(profile.breed.is_none());
        assert!(profile.characteristics.is_empty());
    }

    #[test]
    fn test_ranked_match_wire_names() {
        let entry = RankedMatch {
            uid: "u1".to_string(),
            display_name: None,
            pet_profile: PetProfile::default(),
            attribute_score: 8,
            sentiment_score: None,
            final_score: 8.0,
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["petMatchScore"], 8);
        assert_eq!(json["finalMatchScore"], 8.0);
        assert!(json.get("sentimentMatchScore").is_none());
    }
}
