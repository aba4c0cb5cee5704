use actix_web::{get, post, web, HttpResponse};
use inspector_common::InspectorError;

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{BatchRequest, BatchResponse, ErrorBody};

/// Single vector by id
#[get("/vector/{id:.*}")]
pub async fn get_vector(
    id: web::Path<String>,
    state: web::Data<std::sync::Arc<AppState>>,
) -> Result<HttpResponse, ApiError> {
    let mut vectors = state.index.get_by_ids(&[id.into_inner()]).await?;

    if vectors.is_empty() {
        return Err(InspectorError::not_found("Vector not found").into());
    }
    Ok(HttpResponse::Ok().json(vectors.swap_remove(0)))
}

/// Several vectors by explicit ids
#[post("/vectors/batch")]
pub async fn get_vectors_batch(
    req: web::Json<BatchRequest>,
    state: web::Data<std::sync::Arc<AppState>>,
) -> Result<HttpResponse, ApiError> {
    if req.ids.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ErrorBody::new("No IDs provided")));
    }

    let vectors = state.index.get_by_ids(&req.ids).await?;
    Ok(HttpResponse::Ok().json(BatchResponse {
        count: vectors.len(),
        vectors,
    }))
}
