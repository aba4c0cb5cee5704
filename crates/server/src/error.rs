use actix_web::error::{InternalError, JsonPayloadError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use inspector_common::InspectorError;
use std::fmt;
use tracing::error;

use crate::types::ErrorBody;

/// Route error rendered as `{error, message, stack}`
#[derive(Debug)]
pub struct ApiError(pub InspectorError);

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<InspectorError> for ApiError {
    fn from(e: InspectorError) -> Self {
        Self(e)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        if let InspectorError::NotFound(what) = &self.0 {
            return HttpResponse::NotFound().json(ErrorBody::new(what.as_str()));
        }

        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        }

        let mut stack = vec![self.0.to_string()];
        let mut source = std::error::Error::source(&self.0);
        while let Some(cause) = source {
            stack.push(cause.to_string());
            source = cause.source();
        }

        HttpResponse::build(status).json(ErrorBody {
            error: "Error processing request".to_string(),
            message: Some(self.0.to_string()),
            stack: Some(stack),
        })
    }
}

/// Malformed JSON bodies become `400 {"error": "Invalid request body"}`
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let body = ErrorBody::new("Invalid request body").with_message(err.to_string());
    InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
}

/// Undecodable query strings become `400 {"error": "Invalid query parameters"}`
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let body = ErrorBody::new("Invalid query parameters").with_message(err.to_string());
    InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
}

/// Unknown routes
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorBody::new("Route not found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::MessageBody;
    use actix_web::test::TestRequest;

    #[test]
    fn test_query_error_handler_renders_json() {
        let req = TestRequest::default().to_http_request();
        let err = QueryPayloadError::Deserialize(serde::de::Error::custom("invalid digit"));

        let resp = query_error_handler(err, &req).error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let bytes = resp.into_body().try_into_bytes().unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Invalid query parameters");
        assert!(body["message"].as_str().unwrap().contains("invalid digit"));
    }

    #[test]
    fn test_not_found_renders_its_message() {
        let resp = ApiError(InspectorError::not_found("Vector not found")).error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let bytes = resp.into_body().try_into_bytes().unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Vector not found");
        assert!(body.get("stack").is_none());
    }
}
