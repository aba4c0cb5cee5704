use actix_web::{get, web, HttpResponse};
use inspector_exporter::random_query_vector;
use inspector_index::{QueryOptions, VectorIndex, MAX_TOP_K_WITH_VALUES};
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{ListQuery, ListResponse, Pagination};

/// Dimension assumed when the index does not report one
pub const FALLBACK_DIMENSIONS: usize = 1024;

/// Sample vectors with one randomized query
#[get("/list")]
pub async fn list(
    query: web::Query<ListQuery>,
    state: web::Data<std::sync::Arc<AppState>>,
) -> Result<HttpResponse, ApiError> {
    if let Some(cursor) = &query.cursor {
        debug!("Ignoring list cursor {}", cursor);
    }

    let response = sample_vectors(state.index.as_ref(), query.requested_count()).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Query the index once with a random vector for up to `min(count, 50)` records
///
/// A failed query is reported in the note; a failed describe is an error.
pub async fn sample_vectors(
    index: &dyn VectorIndex,
    count: usize,
) -> inspector_common::Result<ListResponse> {
    let descriptor = index.describe().await?;
    let total = descriptor.vector_count;
    let dimensions = if descriptor.dimensions == 0 {
        FALLBACK_DIMENSIONS
    } else {
        descriptor.dimensions
    };
    let request_count = count.clamp(1, MAX_TOP_K_WITH_VALUES);

    let vector = random_query_vector(dimensions);
    let (vectors, note) = match index
        .query(&vector, &QueryOptions::with_values(request_count))
        .await
    {
        Ok(vectors) => {
            let note = format!(
                "Found {} of {} vectors. This is a sample using semantic query. For ALL vectors use /export or Wrangler CLI.",
                vectors.len(),
                total
            );
            (vectors, note)
        }
        Err(e) => {
            warn!("Sample query failed: {}", e);
            (
                Vec::new(),
                format!(
                    "Error: {}. Use /export for progressive export or Wrangler CLI.",
                    e
                ),
            )
        }
    };

    Ok(ListResponse {
        total_vectors: total,
        pagination: Pagination {
            has_more: (vectors.len() as u64) < total,
            next_cursor: None,
        },
        vectors,
        note,
    })
}
