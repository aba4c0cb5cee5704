//! Vectorize inspector HTTP service
//!
//! Actix-web JSON API over a `VectorIndex`: describe, sample, progressive
//! export, id lookups and stats, with permissive CORS

pub mod error;
pub mod routes;
pub mod state;
pub mod types;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use inspector_common::{AppConfig, Result};
use inspector_index::VectorIndex;
use std::sync::Arc;
use tracing::info;
use tracing_actix_web::TracingLogger;

pub use error::{json_error_handler, not_found, query_error_handler, ApiError};
pub use state::AppState;

/// JSON extractor config: any content type, malformed bodies as JSON 400s
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .content_type_required(false)
        .error_handler(json_error_handler)
}

/// Query extractor config rendering undecodable query strings as JSON 400s
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(query_error_handler)
}

/// Start the inspector service and run until shutdown
pub async fn start_server(config: AppConfig, index: Arc<dyn VectorIndex>) -> Result<()> {
    let bind_addr = config.server_bind_address();
    let state = web::Data::new(Arc::new(AppState::new(config, index)));

    info!("Inspector service listening on http://{}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(TracingLogger::default())
            .app_data(state.clone())
            .app_data(json_config())
            .app_data(query_config())
            .configure(routes::configure)
            .default_service(web::to(not_found))
    })
    .bind(&bind_addr)?
    .run()
    .await?;

    info!("Inspector service stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::{header, StatusCode};
    use actix_web::test;
    use async_trait::async_trait;
    use inspector_common::InspectorError;
    use inspector_exporter::ExportPolicy;
    use inspector_index::{IndexDescriptor, MemoryIndex, QueryOptions, VectorRecord};
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Memory index that counts lookups and can fail on demand
    struct TestIndex {
        inner: MemoryIndex,
        lookups: AtomicUsize,
        fail_describe: bool,
        fail_query: bool,
    }

    impl TestIndex {
        fn new(count: usize) -> Self {
            let records = (0..count).map(|i| {
                let angle = i as f32 * 0.37;
                VectorRecord::new(
                    format!("vec-{}", i),
                    vec![angle.cos(), angle.sin(), (i % 7) as f32 / 7.0 - 0.5, 1.0],
                )
            });
            Self {
                inner: MemoryIndex::with_records("exoplanets", 4, records).unwrap(),
                lookups: AtomicUsize::new(0),
                fail_describe: false,
                fail_query: false,
            }
        }
    }

    #[async_trait]
    impl VectorIndex for TestIndex {
        async fn describe(&self) -> Result<IndexDescriptor> {
            if self.fail_describe {
                return Err(InspectorError::vector_index("index unavailable"));
            }
            self.inner.describe().await
        }

        async fn query(&self, vector: &[f32], options: &QueryOptions) -> Result<Vec<VectorRecord>> {
            if self.fail_query {
                return Err(InspectorError::vector_index("query rejected"));
            }
            self.inner.query(vector, options).await
        }

        async fn get_by_ids(&self, ids: &[String]) -> Result<Vec<VectorRecord>> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.inner.get_by_ids(ids).await
        }
    }

    fn test_state(index: Arc<dyn VectorIndex>) -> web::Data<Arc<AppState>> {
        let state = AppState::new(AppConfig::default(), index)
            .with_export_policy(ExportPolicy::service().with_batch_delay(Duration::ZERO));
        web::Data::new(Arc::new(state))
    }

    macro_rules! test_app {
        ($index:expr) => {
            test::init_service(
                App::new()
                    .wrap(Cors::permissive())
                    .app_data(test_state($index))
                    .app_data(json_config())
                    .app_data(query_config())
                    .configure(routes::configure)
                    .default_service(web::to(not_found)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_root_lists_capabilities() {
        let app = test_app!(Arc::new(TestIndex::new(10)));
        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Vectorize Inspector API");
        assert!(body["endpoints"]["/export"].is_string());
        assert!(body["wranglerCLI"]["listAll"]
            .as_str()
            .unwrap()
            .contains("autorag-rag-exoplanets"));
    }

    #[actix_web::test]
    async fn test_info_and_stats() {
        let app = test_app!(Arc::new(TestIndex::new(120)));

        let resp = test::call_service(&app, test::TestRequest::get().uri("/info").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let info: Value = test::read_body_json(resp).await;
        assert_eq!(info["vectorCount"], 120);
        assert_eq!(info["dimensions"], 4);

        let resp = test::call_service(&app, test::TestRequest::get().uri("/stats").to_request()).await;
        let stats: Value = test::read_body_json(resp).await;
        assert_eq!(stats["indexName"], "exoplanets");
        assert_eq!(stats["vectorCount"], 120);
        assert_eq!(stats["metric"], "cosine");
        assert!(stats["timestamp"].is_string());
    }

    #[actix_web::test]
    async fn test_list_caps_sample_size() {
        let app = test_app!(Arc::new(TestIndex::new(120)));

        let resp = test::call_service(&app, test::TestRequest::get().uri("/list").to_request()).await;
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["vectors"].as_array().unwrap().len(), 50);
        assert_eq!(body["totalVectors"], 120);
        assert_eq!(body["pagination"]["hasMore"], true);
        assert!(body["pagination"]["nextCursor"].is_null());

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/list?count=5&cursor=abc").to_request(),
        )
        .await;
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["vectors"].as_array().unwrap().len(), 5);
    }

    #[actix_web::test]
    async fn test_list_falls_back_to_default_count_on_bad_values() {
        let app = test_app!(Arc::new(TestIndex::new(120)));

        for uri in ["/list?count=abc", "/list?count=-1", "/list?count="] {
            let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
            assert_eq!(resp.status(), StatusCode::OK);
            assert_eq!(
                resp.headers().get(header::CONTENT_TYPE).unwrap(),
                "application/json"
            );
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["vectors"].as_array().unwrap().len(), 50);
        }
    }

    #[actix_web::test]
    async fn test_list_reports_query_failure_in_note() {
        let mut index = TestIndex::new(10);
        index.fail_query = true;
        let app = test_app!(Arc::new(index));

        let resp = test::call_service(&app, test::TestRequest::get().uri("/list").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["vectors"].as_array().unwrap().is_empty());
        assert!(body["note"].as_str().unwrap().starts_with("Error:"));
    }

    #[actix_web::test]
    async fn test_export_returns_manifest_attachment() {
        let app = test_app!(Arc::new(TestIndex::new(120)));

        let resp = test::call_service(&app, test::TestRequest::get().uri("/export").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let disposition = resp
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment; filename=\"vectorize-export-"));
        assert!(disposition.ends_with(".json\""));

        let body: Value = test::read_body_json(resp).await;
        let fetched = body["vectorsFetched"].as_u64().unwrap();
        let batches = body["batchesUsed"].as_u64().unwrap();
        assert!((50..=120).contains(&fetched));
        assert!((3..=10).contains(&batches));
        assert_eq!(body["totalVectorsInIndex"], 120);
        assert_eq!(body["indexInfo"]["name"], "exoplanets");
        assert!(!body["note"].as_str().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_export_keeps_partial_results_when_queries_fail() {
        let mut index = TestIndex::new(20);
        index.fail_query = true;
        let app = test_app!(Arc::new(index));

        let resp = test::call_service(&app, test::TestRequest::get().uri("/export").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["stopReason"], "interrupted");
        assert_eq!(body["vectorsFetched"], 0);
    }

    #[actix_web::test]
    async fn test_upstream_failure_is_500_with_message() {
        let mut index = TestIndex::new(10);
        index.fail_describe = true;
        let app = test_app!(Arc::new(index));

        let resp = test::call_service(&app, test::TestRequest::get().uri("/export").to_request()).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Error processing request");
        assert!(body["message"].as_str().unwrap().contains("index unavailable"));
        assert!(body["stack"].is_array());
    }

    #[actix_web::test]
    async fn test_get_vector() {
        let app = test_app!(Arc::new(TestIndex::new(10)));

        let resp = test::call_service(&app, test::TestRequest::get().uri("/vector/vec-3").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["id"], "vec-3");
        assert_eq!(body["values"].as_array().unwrap().len(), 4);

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/vector/unknown-id").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Vector not found");
    }

    #[actix_web::test]
    async fn test_batch_lookup() {
        let app = test_app!(Arc::new(TestIndex::new(10)));

        let req = test::TestRequest::post()
            .uri("/vectors/batch")
            .set_json(serde_json::json!({"ids": ["vec-1", "vec-2", "missing"]}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["count"], 2);
        assert_eq!(body["vectors"][0]["id"], "vec-1");
    }

    #[actix_web::test]
    async fn test_batch_lookup_accepts_any_content_type() {
        let app = test_app!(Arc::new(TestIndex::new(10)));

        let plain = test::TestRequest::post()
            .uri("/vectors/batch")
            .set_payload(r#"{"ids":["vec-4"]}"#)
            .to_request();
        let form = test::TestRequest::post()
            .uri("/vectors/batch")
            .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
            .set_payload(r#"{"ids":["vec-4","vec-5"]}"#)
            .to_request();

        for (req, expected) in [(plain, 1), (form, 2)] {
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["count"], expected);
        }
    }

    #[actix_web::test]
    async fn test_batch_rejects_empty_ids_without_lookup() {
        let index = Arc::new(TestIndex::new(10));
        let app = test_app!(index.clone());

        for payload in [serde_json::json!({"ids": []}), serde_json::json!({})] {
            let req = test::TestRequest::post()
                .uri("/vectors/batch")
                .set_json(payload)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["error"], "No IDs provided");
        }

        assert_eq!(index.lookups.load(Ordering::SeqCst), 0);
    }

    #[actix_web::test]
    async fn test_batch_rejects_malformed_body() {
        let app = test_app!(Arc::new(TestIndex::new(10)));

        let req = test::TestRequest::post()
            .uri("/vectors/batch")
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{ids: nope")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Invalid request body");
        assert!(body["message"].is_string());
    }

    #[actix_web::test]
    async fn test_unknown_route() {
        let app = test_app!(Arc::new(TestIndex::new(1)));

        let resp = test::call_service(&app, test::TestRequest::get().uri("/nope").to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Route not found");
    }

    #[actix_web::test]
    async fn test_cors_preflight() {
        let app = test_app!(Arc::new(TestIndex::new(1)));

        let req = test::TestRequest::default()
            .method(actix_web::http::Method::OPTIONS)
            .uri("/vectors/batch")
            .insert_header((header::ORIGIN, "http://localhost:3000"))
            .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "POST"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }
}
