use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which query formulation produced a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyType {
    Keyword,
    Cpv,
    Country,
}

/// One independent query against the notices search API.
///
/// Built once by the strategy builder and consumed exactly once by the
/// executor loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    pub query: String,
    pub strategy: StrategyType,
    /// The keyword group, CPV group, or single country this spec covers.
    pub group: Vec<String>,
}

/// A raw notice as returned by the API, tagged with its originating
/// strategy and fetch time. Consumed by normalization, then discarded.
#[derive(Debug, Clone)]
pub struct RawNotice {
    pub fields: Value,
    pub search_type: StrategyType,
    pub search_group: Vec<String>,
    pub fetched_at: DateTime<Utc>,
}

impl RawNotice {
    /// The stable identifier used for deduplication. `None` when the field
    /// is missing or empty, in which case the notice is dropped.
    pub fn notice_id(&self) -> Option<&str> {
        self.fields
            .get("notice-identifier")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
    }
}

/// Search parameters, as parsed from the run input.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchParams {
    pub search_keywords: Vec<String>,
    pub cpv_codes: Vec<String>,
    pub countries: Vec<String>,
    pub year_from: i32,
    pub year_to: i32,
    pub active_only: bool,
    pub min_value: u64,
    pub max_results: usize,
    pub include_documents: bool,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            search_keywords: vec!["consulting".to_string(), "services".to_string()],
            cpv_codes: Vec::new(),
            countries: vec!["DE".to_string(), "FR".to_string(), "IT".to_string()],
            year_from: 2024,
            year_to: 2024,
            active_only: false,
            min_value: 0,
            max_results: 100,
            include_documents: true,
        }
    }
}

/// Weights for the relevance score components. Each sub-score is clamped to
/// [0, 100] before weighting, so weights summing to 100 keep the final score
/// in range on their own; the final score is clamped regardless.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringCriteria {
    pub keyword_match: u32,
    pub cpv_match: u32,
    pub country_match: u32,
    pub value_match: u32,
}

impl Default for ScoringCriteria {
    fn default() -> Self {
        Self {
            keyword_match: 40,
            cpv_match: 30,
            country_match: 20,
            value_match: 10,
        }
    }
}

impl ScoringCriteria {
    /// Merge caller overrides onto the defaults. Unspecified weights keep
    /// their default value; unknown keys are accepted and ignored.
    pub fn with_overrides(overrides: &HashMap<String, u32>) -> Self {
        let mut criteria = Self::default();
        for (key, &weight) in overrides {
            match key.as_str() {
                "keywordMatch" => criteria.keyword_match = weight,
                "cpvMatch" => criteria.cpv_match = weight,
                "countryMatch" => criteria.country_match = weight,
                "valueMatch" => criteria.value_match = weight,
                _ => {}
            }
        }
        criteria
    }
}

/// Lifecycle status derived from the submission deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TenderStatus {
    Active,
    Expired,
    Unknown,
}

/// A link to a tender document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentLink {
    pub url: String,
    #[serde(rename = "type")]
    pub link_type: String,
    pub description: String,
}

/// Strategy provenance carried on every output record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchMetadata {
    pub search_type: StrategyType,
    pub search_group: Vec<String>,
    pub found_at: DateTime<Utc>,
}

/// The durable output unit: one procurement notice, flattened and scored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenderRecord {
    pub notice_id: String,
    pub title: String,
    pub buyer_name: String,
    pub country: String,
    pub publication_date: String,
    pub deadline_date: String,
    pub cpv_codes: Vec<String>,
    pub notice_type: String,
    pub estimated_value_eur: u64,
    pub ted_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_links: Option<Vec<DocumentLink>>,
    pub search_metadata: SearchMetadata,
    pub relevance_score: u8,
    pub status: TenderStatus,
}

/// Aggregate summary pushed after the individual records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSummary {
    #[serde(rename = "_summary")]
    pub summary: bool,
    pub total_found: usize,
    pub average_score: f64,
    pub high_relevance_count: usize,
    pub active_count: usize,
    pub search_timestamp: DateTime<Utc>,
    pub search_parameters: SummaryParameters,
}

/// Echo of the parameters a summary describes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryParameters {
    pub keywords: Vec<String>,
    pub countries: Vec<String>,
    pub date_range: String,
    pub active_only: bool,
}
