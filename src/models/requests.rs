use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to replace the caller's pet profile wholesale.
///
/// Fields are optional at the serde layer so that the handler can report
/// every missing field by name in one response, the way the profile editor
/// expects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePetProfileRequest {
    pub species: Option<String>,
    pub breed: Option<String>,
    pub sex: Option<String>,
    pub colour: Option<String>,
    pub image: Option<String>,
    pub location: Option<String>,
    pub name: Option<String>,
    pub dob: Option<String>,
}

impl UpdatePetProfileRequest {
    const REQUIRED: [&'static str; 8] = [
        "species", "breed", "sex", "colour", "image", "location", "name", "dob",
    ];

    /// Names of required fields absent from the payload.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let present = [
            self.species.is_some(),
            self.breed.is_some(),
            self.sex.is_some(),
            self.colour.is_some(),
            self.image.is_some(),
            self.location.is_some(),
            self.name.is_some(),
            self.dob.is_some(),
        ];

        Self::REQUIRED
            .iter()
            .zip(present)
            .filter_map(|(field, ok)| if ok { None } else { Some(*field) })
            .collect()
    }
}

/// Request to replace the pet's characteristics list.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SetCharacteristicsRequest {
    #[validate(length(max = 3))]
    #[serde(default)]
    pub characteristics: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_listed_in_order() {
        let req: UpdatePetProfileRequest =
            serde_json::from_str(r#"{"species": "Dog", "name": "Rex"}"#).unwrap();
        assert_eq!(
            req.missing_fields(),
            vec!["breed", "sex", "colour", "image", "location", "dob"]
        );
    }

    #[test]
    fn test_complete_request_has_no_missing_fields() {
        let req: UpdatePetProfileRequest = serde_json::from_str(
            r#"{
                "species": "Dog", "breed": "Lab", "sex": "M", "colour": "Black",
                "image": "img", "location": "Brooklyn", "name": "Rex", "dob": "2020-01-01"
            }"#,
        )
        .unwrap();
        assert!(req.missing_fields().is_empty());
    }

    #[test]
    fn test_characteristics_limit() {
        let ok = SetCharacteristicsRequest {
            characteristics: vec!["playful".to_string(), "calm".to_string()],
        };
        assert!(ok.validate().is_ok());

        let too_many = SetCharacteristicsRequest {
            characteristics: vec![
                "playful".to_string(),
                "calm".to_string(),
                "curious".to_string(),
                "loud".to_string(),
            ],
        };
        assert!(too_many.validate().is_err());
    }
}
