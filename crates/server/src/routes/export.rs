use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{get, web, HttpResponse};
use chrono::Utc;
use inspector_exporter::{export_timestamp, IndexBatchSource, ProgressiveExporter};
use tracing::info;

use crate::error::ApiError;
use crate::routes::list::FALLBACK_DIMENSIONS;
use crate::state::AppState;

/// Run a bounded progressive export and return the manifest inline
#[get("/export")]
pub async fn export(state: web::Data<std::sync::Arc<AppState>>) -> Result<HttpResponse, ApiError> {
    let descriptor = state.index.describe().await?;
    let dimensions = if descriptor.dimensions == 0 {
        FALLBACK_DIMENSIONS
    } else {
        descriptor.dimensions
    };
    let index_name = if descriptor.name.is_empty() {
        state.config.index_name.clone()
    } else {
        descriptor.name.clone()
    };

    let exporter = ProgressiveExporter::new(state.export_policy.clone());
    let source = IndexBatchSource::new(state.index.as_ref());
    let mut manifest = exporter
        .export(&source, &index_name, descriptor.vector_count, dimensions)
        .await?;
    manifest.index_info = Some(descriptor);

    let filename = format!("vectorize-export-{}.json", export_timestamp(Utc::now()));
    info!(
        "Serving export {} - {} vectors",
        filename, manifest.vectors_fetched
    );

    Ok(HttpResponse::Ok()
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(filename)],
        })
        .json(manifest))
}
