use actix_web::web;

use crate::handlers::{health_check, index, list_recommendations, recommend};

/// Configure all routes for the API
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(index)
        .service(health_check)
        .service(recommend)
        .service(list_recommendations);
}
