use actix_web::{get, web, HttpResponse};
use inspector_exporter::bulk_export_command;
use serde_json::json;

use crate::state::AppState;

/// Capability listing
#[get("/")]
pub async fn index(state: web::Data<std::sync::Arc<AppState>>) -> HttpResponse {
    let index_name = &state.config.index_name;
    let list_all = bulk_export_command(index_name);

    HttpResponse::Ok().json(json!({
        "message": "Vectorize Inspector API",
        "index": index_name,
        "note": "Vectorize does not support listing all vectors directly. Use /vectors/batch with known IDs, /export for a progressive export, or Wrangler CLI.",
        "endpoints": {
            "/info": "Get general index information",
            "/list": "Sample vectors using semantic query (limited)",
            "/list?count=100": "List with custom limit",
            "/export": "Export vectors progressively as JSON",
            "/vector/:id": "Get specific vector by ID",
            "POST /vectors/batch": "Get multiple vectors by IDs (JSON body: {ids: [\"id1\", \"id2\"]})",
            "/stats": "Index statistics",
        },
        "wranglerCLI": {
            "listAll": list_all,
            "exportToFile": format!("{} > export.json", list_all),
        },
    }))
}
