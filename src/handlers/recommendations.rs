use crate::{
    models::{RecommendResponse, RecommendationOutcome},
    services::{storage::DEFAULT_LIST_LIMIT, Recommender, StorageGateway},
};
use actix_web::{get, web, HttpResponse};
use tracing::info;

/// Picks a random movie and records it.
///
/// Always answers 200: a failed lookup yields the `error` shape and is not
/// persisted, a failed save is reported through `saved_to_db` and `db_error`.
#[get("/recommend")]
pub async fn recommend(
    recommender: web::Data<Recommender>,
    storage: web::Data<StorageGateway>,
) -> HttpResponse {
    let response = match recommender.recommend().await {
        RecommendationOutcome::Found(recommendation) => {
            let saved = storage.save(&recommendation).await;
            RecommendResponse::Recommended {
                recommendation,
                saved_to_db: saved.success,
                db_error: saved.error,
            }
        }
        RecommendationOutcome::Unavailable { error } => {
            info!("No recommendation found, skipping save");
            RecommendResponse::Unavailable { error }
        }
    };

    HttpResponse::Ok().json(response)
}

/// Lists the most recent recommendations, newest first.
#[get("/recommendations")]
pub async fn list_recommendations(storage: web::Data<StorageGateway>) -> HttpResponse {
    HttpResponse::Ok().json(storage.list_recent(DEFAULT_LIST_LIMIT).await)
}
