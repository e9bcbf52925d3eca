use actix_web::{web, HttpRequest, HttpResponse, Responder};
use crate::core::{same_species, MatchError, MatchMode, MatchOutcome};
use crate::models::{CandidateRecord, ErrorResponse, HealthResponse, MatchesResponse};
use crate::routes::{authenticate, AppState};
use crate::services::FirestoreError;

/// Configure the matching routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/matches", web::get().to(attribute_matches))
        .route("/sentiment-matches", web::get().to(sentiment_matches));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Attribute-only matches for the authenticated user
///
/// GET /matches
///
/// Every other user with a pet profile is scored on attribute compatibility
/// and returned in descending score order.
async fn attribute_matches(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let uid = match authenticate(&state, &req).await {
        Ok(uid) => uid,
        Err(response) => return response,
    };

    tracing::info!("Finding attribute matches for user: {}", uid);

    let current = match state.firestore.get_user(&uid).await {
        Ok(user) => user,
        Err(FirestoreError::NotFound(_)) => {
            return HttpResponse::NotFound().json(ErrorResponse {
                error: "Current user not found".to_string(),
                message: format!("No user record for {}", uid),
                status_code: 404,
            });
        }
        Err(e) => {
            tracing::error!("Failed to fetch user {}: {}", uid, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch current user".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    let pool = match state.firestore.list_users().await {
        Ok(users) => users,
        Err(e) => {
            tracing::error!("Failed to list users for {}: {}", uid, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch candidates".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    let candidates: Vec<CandidateRecord> = pool
        .into_iter()
        .filter(|user| user.uid != uid)
        .map(|user| CandidateRecord { user, survey: None })
        .collect();

    let outcome = match state
        .matcher
        .rank(&current, None, candidates, MatchMode::Attributes)
    {
        Ok(outcome) => outcome,
        Err(e @ MatchError::ProfileIncomplete) => return profile_incomplete(&e),
    };

    respond_ranked(outcome, state.max_results, &uid)
}

/// Combined attribute + sentiment matches for the authenticated user
///
/// GET /sentiment-matches
///
/// The pool is restricted to candidates of the caller's species; each
/// remaining candidate's survey is fetched and scored against the caller's.
async fn sentiment_matches(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let uid = match authenticate(&state, &req).await {
        Ok(uid) => uid,
        Err(response) => return response,
    };

    tracing::info!("Finding sentiment matches for user: {}", uid);

    let current = match state.firestore.get_user(&uid).await {
        Ok(user) => user,
        Err(FirestoreError::NotFound(_)) => {
            return HttpResponse::NotFound().json(ErrorResponse {
                error: "Current user not found".to_string(),
                message: format!("No user record for {}", uid),
                status_code: 404,
            });
        }
        Err(e) => {
            tracing::error!("Failed to fetch user {}: {}", uid, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch current user".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    // Missing survey degrades to an empty one; it never blocks ranking.
    let current_survey = match state.firestore.get_survey_responses(&uid).await {
        Ok(survey) => survey,
        Err(e) => {
            tracing::warn!("Failed to fetch survey for {}, scoring without it: {}", uid, e);
            None
        }
    };

    let pool = match state.firestore.list_users().await {
        Ok(users) => users,
        Err(e) => {
            tracing::error!("Failed to list users for {}: {}", uid, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch candidates".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    // Surveys are only worth fetching for candidates that survive the
    // species filter; the ranker re-applies the filter on its own.
    let mut candidates = Vec::with_capacity(pool.len());
    for user in pool {
        if user.uid == uid {
            continue;
        }

        let survey = match (&current.pet_profile, &user.pet_profile) {
            (Some(ours), Some(theirs)) if same_species(ours, theirs) => {
                match state.firestore.get_survey_responses(&user.uid).await {
                    Ok(survey) => survey,
                    Err(e) => {
                        tracing::warn!("Failed to fetch survey for {}: {}", user.uid, e);
                        None
                    }
                }
            }
            _ => None,
        };

        candidates.push(CandidateRecord { user, survey });
    }

    let outcome = match state.matcher.rank(
        &current,
        current_survey.as_ref(),
        candidates,
        MatchMode::Combined,
    ) {
        Ok(outcome) => outcome,
        Err(e @ MatchError::ProfileIncomplete) => return profile_incomplete(&e),
    };

    respond_ranked(outcome, state.max_results, &uid)
}

fn profile_incomplete(e: &MatchError) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "No pet profile found for current user".to_string(),
        message: e.to_string(),
        status_code: 400,
    })
}

fn respond_ranked(mut outcome: MatchOutcome, cap: Option<usize>, uid: &str) -> HttpResponse {
    if let Some(cap) = cap {
        outcome.matches.truncate(cap);
    }

    tracing::info!(
        "Returning {} matches for user {} (from {} candidates)",
        outcome.matches.len(),
        uid,
        outcome.total_candidates
    );

    HttpResponse::Ok().json(MatchesResponse {
        matches: outcome.matches,
        total_candidates: outcome.total_candidates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_check_response() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            timestamp: chrono::Utc::now(),
        };

        assert_eq!(response.status, "healthy");
    }

    #[test]
    fn test_respond_ranked_applies_cap() {
        let outcome = MatchOutcome {
            matches: (0..5)
                .map(|i| crate::models::RankedMatch {
                    uid: i.to_string(),
                    display_name: None,
                    pet_profile: crate::models::PetProfile::default(),
                    attribute_score: 0,
                    sentiment_score: None,
                    final_score: 0.0,
                })
                .collect(),
            total_candidates: 5,
        };

        let response = respond_ranked(outcome, Some(2), "me");
        assert_eq!(response.status(), actix_web::http::StatusCode::OK);
    }
}
