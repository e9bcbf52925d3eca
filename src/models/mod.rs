// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AttributeWeights, CandidateRecord, PetProfile, RankedMatch, SurveyResponses, UserRecord,
};
pub use requests::{SetCharacteristicsRequest, UpdatePetProfileRequest};
pub use responses::{
    CharacteristicsResponse, ErrorResponse, HealthResponse, MatchesResponse, MessageResponse,
};
