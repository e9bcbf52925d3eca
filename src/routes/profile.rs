use actix_web::{web, HttpRequest, HttpResponse, Responder};
use validator::Validate;
use crate::models::{
    CharacteristicsResponse, ErrorResponse, MessageResponse, PetProfile, SetCharacteristicsRequest,
    UpdatePetProfileRequest,
};
use crate::routes::{authenticate, AppState};
use crate::services::FirestoreError;

/// Configure the profile routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/current_user", web::get().to(current_user))
        .route("/update_pet_profile", web::post().to(update_pet_profile))
        .route("/pet-characteristics", web::get().to(get_characteristics))
        .route("/pet-characteristics", web::post().to(set_characteristics));
}

/// The authenticated user's record, pet profile included
///
/// GET /current_user
async fn current_user(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let uid = match authenticate(&state, &req).await {
        Ok(uid) => uid,
        Err(response) => return response,
    };

    match state.firestore.get_user(&uid).await {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(FirestoreError::NotFound(_)) => HttpResponse::NotFound().json(ErrorResponse {
            error: "User not found".to_string(),
            message: format!("No user record for {}", uid),
            status_code: 404,
        }),
        Err(e) => {
            tracing::error!("Failed to fetch user {}: {}", uid, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch user".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Replace the authenticated user's pet profile
///
/// POST /update_pet_profile
///
/// All profile fields are required; missing ones are reported by name.
async fn update_pet_profile(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<UpdatePetProfileRequest>,
) -> impl Responder {
    let uid = match authenticate(&state, &req).await {
        Ok(uid) => uid,
        Err(response) => return response,
    };

    let missing = body.missing_fields();
    if !missing.is_empty() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Missing fields".to_string(),
            message: missing.join(", "),
            status_code: 400,
        });
    }

    let body = body.into_inner();
    let profile = PetProfile {
        name: body.name,
        species: body.species,
        breed: body.breed,
        sex: body.sex,
        colour: body.colour,
        location: body.location,
        image: body.image,
        dob: body.dob,
        characteristics: Vec::new(),
    };

    match state.firestore.update_pet_profile(&uid, &profile).await {
        Ok(()) => {
            tracing::info!("Updated pet profile for {}", uid);
            HttpResponse::Ok().json(MessageResponse {
                message: "Pet profile updated successfully".to_string(),
            })
        }
        Err(FirestoreError::NotFound(_)) => HttpResponse::NotFound().json(ErrorResponse {
            error: "User not found".to_string(),
            message: format!("No user record for {}", uid),
            status_code: 404,
        }),
        Err(e) => {
            tracing::error!("Failed to update pet profile for {}: {}", uid, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to update pet profile".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// The pet's characteristics list
///
/// GET /pet-characteristics
async fn get_characteristics(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let uid = match authenticate(&state, &req).await {
        Ok(uid) => uid,
        Err(response) => return response,
    };

    match state.firestore.get_user(&uid).await {
        Ok(user) => {
            let characteristics = user
                .pet_profile
                .map(|profile| profile.characteristics)
                .unwrap_or_default();

            HttpResponse::Ok().json(CharacteristicsResponse { characteristics })
        }
        Err(FirestoreError::NotFound(_)) => HttpResponse::NotFound().json(ErrorResponse {
            error: "User not found".to_string(),
            message: format!("No user record for {}", uid),
            status_code: 404,
        }),
        Err(e) => {
            tracing::error!("Failed to fetch user {}: {}", uid, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch user".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Replace the pet's characteristics list (at most 3 entries)
///
/// POST /pet-characteristics
async fn set_characteristics(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<SetCharacteristicsRequest>,
) -> impl Responder {
    let uid = match authenticate(&state, &req).await {
        Ok(uid) => uid,
        Err(response) => return response,
    };

    if body.validate().is_err() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Invalid characteristics".to_string(),
            message: "You must provide a list of up to 3 characteristics.".to_string(),
            status_code: 400,
        });
    }

    // Unknown users 404 before any write happens.
    if let Err(FirestoreError::NotFound(_)) = state.firestore.get_user(&uid).await {
        return HttpResponse::NotFound().json(ErrorResponse {
            error: "User not found".to_string(),
            message: format!("No user record for {}", uid),
            status_code: 404,
        });
    }

    match state
        .firestore
        .update_characteristics(&uid, &body.characteristics)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Characteristics updated",
            "characteristics": body.characteristics,
        })),
        Err(e) => {
            tracing::error!("Failed to update characteristics for {}: {}", uid, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to update characteristics".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}
