//! Configurable TED.EU tender search engine.
//!
//! Builds bounded query strategies from keyword/CPV/country filters, runs
//! them sequentially against the notices search API, and turns the merged
//! raw notices into deduplicated, normalized, relevance-scored tender
//! records.

pub mod engine;
pub mod normalize;
pub mod query;
pub mod score;
pub mod templates;
pub mod types;

// Re-exports for clean API
pub use engine::{dedupe_notices, search_tenders, summarize, NoticeSearch, SearchError};
pub use query::build_search_queries;
pub use templates::{IndustryTemplates, Template};
pub use types::{
    DocumentLink, QuerySpec, RawNotice, ScoringCriteria, SearchMetadata, SearchParams,
    SearchSummary, StrategyType, TenderRecord, TenderStatus,
};
