use actix_web::{get, web, HttpResponse};
use chrono::Utc;

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::StatsResponse;

/// Index descriptor passthrough
#[get("/info")]
pub async fn info(state: web::Data<std::sync::Arc<AppState>>) -> Result<HttpResponse, ApiError> {
    let descriptor = state.index.describe().await?;
    Ok(HttpResponse::Ok().json(descriptor))
}

/// Index descriptor reshaped into a stats summary
#[get("/stats")]
pub async fn stats(state: web::Data<std::sync::Arc<AppState>>) -> Result<HttpResponse, ApiError> {
    let descriptor = state.index.describe().await?;

    Ok(HttpResponse::Ok().json(StatsResponse {
        index_name: descriptor.name,
        dimensions: descriptor.dimensions,
        metric: descriptor.metric,
        vector_count: descriptor.vector_count,
        description: descriptor.description,
        timestamp: Utc::now(),
    }))
}
