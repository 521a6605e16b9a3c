use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request body for the TED notices search endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest {
    pub query: String,
    pub limit: u32,
    pub fields: Vec<String>,
}

/// Response body from the TED notices search endpoint.
///
/// Notices are kept as raw JSON objects: the API returns a heterogeneous,
/// often multilingual field shape that downstream normalization flattens.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub notices: Vec<Value>,
    #[serde(rename = "totalNoticeCount")]
    pub total_notice_count: Option<u64>,
}
