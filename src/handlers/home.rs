use actix_web::{get, HttpResponse};
use serde_json::json;

/// Describes the available endpoints.
#[get("/")]
pub async fn index() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "message": "Movie Recommendation API",
        "endpoints": {
            "/recommend": "GET - Get a random movie recommendation",
            "/recommendations": "GET - Get recent recommendations from database",
        },
        "example": "/recommend",
    }))
}
