use crate::models::{PetProfile, SurveyResponses, UserRecord};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to Firestore
#[derive(Debug, Error)]
pub enum FirestoreError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Firestore REST client
///
/// Handles all communication with the managed document store:
/// - Fetching single user records and the full user list
/// - Fetching survey responses
/// - Updating pet profiles and characteristics
pub struct FirestoreClient {
    base_url: String,
    project_id: String,
    api_token: String,
    client: Client,
}

const USERS_COLLECTION: &str = "users";
const SURVEY_DOCUMENT: &str = "surveyResponses/sentimentSurvey";
const LIST_PAGE_SIZE: u32 = 300;

impl FirestoreClient {
    /// Create a new Firestore client
    pub fn new(base_url: String, project_id: String, api_token: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            project_id,
            api_token,
            client,
        }
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents",
            self.base_url.trim_end_matches('/'),
            self.project_id
        )
    }

    /// Fetch a single user record by uid
    pub async fn get_user(&self, uid: &str) -> Result<UserRecord, FirestoreError> {
        let url = format!("{}/{}/{}", self.documents_url(), USERS_COLLECTION, uid);

        tracing::debug!("Fetching user record: {}", uid);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_token)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(FirestoreError::NotFound(format!("User {} not found", uid)));
        }

        if !response.status().is_success() {
            return Err(FirestoreError::ApiError(format!(
                "Failed to fetch user: {}",
                response.status()
            )));
        }

        let doc: Value = response.json().await?;

        decode_user(&doc)
            .ok_or_else(|| FirestoreError::InvalidResponse("Malformed user document".into()))
    }

    /// Fetch every user record, following list pagination to the end
    pub async fn list_users(&self) -> Result<Vec<UserRecord>, FirestoreError> {
        let url = format!("{}/{}", self.documents_url(), USERS_COLLECTION);

        let mut users = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut full_url = format!("{}?pageSize={}", url, LIST_PAGE_SIZE);
            if let Some(token) = &page_token {
                full_url = format!("{}&pageToken={}", full_url, urlencoding::encode(token));
            }

            let response = self
                .client
                .get(&full_url)
                .bearer_auth(&self.api_token)
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(FirestoreError::ApiError(format!(
                    "Failed to list users: {}",
                    response.status()
                )));
            }

            let json: Value = response.json().await?;

            if let Some(documents) = json.get("documents").and_then(|d| d.as_array()) {
                users.extend(documents.iter().filter_map(decode_user));
            }

            page_token = json
                .get("nextPageToken")
                .and_then(|t| t.as_str())
                .map(str::to_string);

            if page_token.is_none() {
                break;
            }
        }

        tracing::debug!("Listed {} user records", users.len());

        Ok(users)
    }

    /// Fetch a user's survey responses; `None` when the user never answered
    pub async fn get_survey_responses(
        &self,
        uid: &str,
    ) -> Result<Option<SurveyResponses>, FirestoreError> {
        let url = format!(
            "{}/{}/{}/{}",
            self.documents_url(),
            USERS_COLLECTION,
            uid,
            SURVEY_DOCUMENT
        );

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_token)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(FirestoreError::ApiError(format!(
                "Failed to fetch survey responses: {}",
                response.status()
            )));
        }

        let doc: Value = response.json().await?;

        let responses = doc
            .get("fields")
            .and_then(|fields| map_fields(fields, "responses"))
            .map(decode_string_map)
            .unwrap_or_default();

        Ok(Some(responses))
    }

    /// Replace the user's pet profile wholesale
    pub async fn update_pet_profile(
        &self,
        uid: &str,
        profile: &PetProfile,
    ) -> Result<(), FirestoreError> {
        let url = format!(
            "{}/{}/{}?updateMask.fieldPaths=petProfile",
            self.documents_url(),
            USERS_COLLECTION,
            uid
        );

        let payload = json!({
            "fields": {
                "petProfile": encode_pet_profile(profile),
            }
        });

        let response = self
            .client
            .patch(&url)
            .bearer_auth(&self.api_token)
            .json(&payload)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(FirestoreError::NotFound(format!("User {} not found", uid)));
        }

        if !response.status().is_success() {
            return Err(FirestoreError::ApiError(format!(
                "Failed to update pet profile: {}",
                response.status()
            )));
        }

        tracing::debug!("Updated pet profile for {}", uid);

        Ok(())
    }

    /// Replace only the pet profile's characteristics list
    pub async fn update_characteristics(
        &self,
        uid: &str,
        characteristics: &[String],
    ) -> Result<(), FirestoreError> {
        let url = format!(
            "{}/{}/{}?updateMask.fieldPaths=petProfile.characteristics",
            self.documents_url(),
            USERS_COLLECTION,
            uid
        );

        let values: Vec<Value> = characteristics.iter().map(|c| string_value(c)).collect();
        let payload = json!({
            "fields": {
                "petProfile": {
                    "mapValue": {
                        "fields": {
                            "characteristics": { "arrayValue": { "values": values } }
                        }
                    }
                }
            }
        });

        let response = self
            .client
            .patch(&url)
            .bearer_auth(&self.api_token)
            .json(&payload)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(FirestoreError::NotFound(format!("User {} not found", uid)));
        }

        if !response.status().is_success() {
            return Err(FirestoreError::ApiError(format!(
                "Failed to update characteristics: {}",
                response.status()
            )));
        }

        Ok(())
    }
}

/// Last path segment of the document resource name.
fn doc_uid(doc: &Value) -> Option<String> {
    doc.get("name")?
        .as_str()?
        .rsplit('/')
        .next()
        .map(str::to_string)
}

/// Decode a Firestore user document into a domain record.
///
/// Documents with no decodable uid are dropped; everything else degrades
/// field by field, matching how loosely the store's records are shaped.
fn decode_user(doc: &Value) -> Option<UserRecord> {
    let uid = doc_uid(doc)?;
    let fields = doc.get("fields");

    Some(UserRecord {
        uid,
        display_name: fields.and_then(|f| string_field(f, "displayName")),
        email: fields.and_then(|f| string_field(f, "email")),
        pet_profile: fields
            .and_then(|f| map_fields(f, "petProfile"))
            .map(decode_pet_profile),
    })
}

fn decode_pet_profile(fields: &Value) -> PetProfile {
    PetProfile {
        name: string_field(fields, "name"),
        species: string_field(fields, "species"),
        breed: string_field(fields, "breed"),
        sex: string_field(fields, "sex"),
        colour: string_field(fields, "colour"),
        location: string_field(fields, "location"),
        image: string_field(fields, "image"),
        dob: string_field(fields, "dob"),
        characteristics: string_array_field(fields, "characteristics"),
    }
}

fn string_field(fields: &Value, name: &str) -> Option<String> {
    fields
        .get(name)?
        .get("stringValue")?
        .as_str()
        .map(str::to_string)
}

fn map_fields<'a>(fields: &'a Value, name: &str) -> Option<&'a Value> {
    fields.get(name)?.get("mapValue")?.get("fields")
}

fn string_array_field(fields: &Value, name: &str) -> Vec<String> {
    fields
        .get(name)
        .and_then(|v| v.get("arrayValue"))
        .and_then(|v| v.get("values"))
        .and_then(|v| v.as_array())
        .map(|values| {
            values
                .iter()
                .filter_map(|v| v.get("stringValue").and_then(|s| s.as_str()))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn decode_string_map(fields: &Value) -> SurveyResponses {
    fields
        .as_object()
        .map(|map| {
            map.iter()
                .filter_map(|(key, value)| {
                    value
                        .get("stringValue")
                        .and_then(|s| s.as_str())
                        .map(|s| (key.clone(), s.to_string()))
                })
                .collect()
        })
        .unwrap_or_default()
}

fn string_value(value: &str) -> Value {
    json!({ "stringValue": value })
}

fn encode_pet_profile(profile: &PetProfile) -> Value {
    let mut fields = serde_json::Map::new();

    let text_fields = [
        ("name", &profile.name),
        ("species", &profile.species),
        ("breed", &profile.breed),
        ("sex", &profile.sex),
        ("colour", &profile.colour),
        ("location", &profile.location),
        ("image", &profile.image),
        ("dob", &profile.dob),
    ];

    for (name, value) in text_fields {
        if let Some(value) = value {
            fields.insert(name.to_string(), string_value(value));
        }
    }

    if !profile.characteristics.is_empty() {
        let values: Vec<Value> = profile
            .characteristics
            .iter()
            .map(|c| string_value(c))
            .collect();
        fields.insert(
            "characteristics".to_string(),
            json!({ "arrayValue": { "values": values } }),
        );
    }

    json!({ "mapValue": { "fields": fields } })
}
