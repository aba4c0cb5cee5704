use chrono::{DateTime, Utc};
use inspector_index::{DistanceMetric, VectorRecord};
use serde::{Deserialize, Serialize};

/// JSON error body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Error cause chain, outermost first
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<Vec<String>>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
            stack: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Sample size used when `count` is missing or not a number
pub const DEFAULT_LIST_COUNT: usize = 100;

/// `/list` query parameters
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Requested sample size, kept raw so bad values fall back to the default
    pub count: Option<String>,

    /// Accepted for compatibility; sampling has no real pagination
    pub cursor: Option<String>,
}

impl ListQuery {
    pub fn requested_count(&self) -> usize {
        self.count
            .as_deref()
            .and_then(|c| c.trim().parse().ok())
            .unwrap_or(DEFAULT_LIST_COUNT)
    }
}

/// Pagination block of `/list`
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub has_more: bool,
    pub next_cursor: Option<String>,
}

/// `/list` response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub total_vectors: u64,
    pub vectors: Vec<VectorRecord>,
    pub pagination: Pagination,
    pub note: String,
}

/// `POST /vectors/batch` body
#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    #[serde(default)]
    pub ids: Vec<String>,
}

/// `POST /vectors/batch` response
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchResponse {
    pub count: usize,
    pub vectors: Vec<VectorRecord>,
}

/// `/stats` response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub index_name: String,
    pub dimensions: usize,
    pub metric: Option<DistanceMetric>,
    pub vector_count: u64,
    pub description: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_query(count: Option<&str>) -> ListQuery {
        ListQuery {
            count: count.map(String::from),
            cursor: None,
        }
    }

    #[test]
    fn test_requested_count() {
        assert_eq!(list_query(None).requested_count(), DEFAULT_LIST_COUNT);
        assert_eq!(list_query(Some("7")).requested_count(), 7);
        assert_eq!(list_query(Some("abc")).requested_count(), DEFAULT_LIST_COUNT);
        assert_eq!(list_query(Some("-1")).requested_count(), DEFAULT_LIST_COUNT);
    }
}
