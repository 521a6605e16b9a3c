//! Search orchestration.
//!
//! One search is a single linear pass: build the query specs, execute them
//! strictly sequentially with a fixed inter-query delay, merge and dedupe
//! the raw notices, then normalize, score, classify, and filter each record
//! before ranking. No individual query or record failure aborts the search;
//! zero results is an empty vector, never an error.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use thiserror::Error;

use crate::normalize::normalize_notice;
use crate::query::build_search_queries;
use crate::score::{classify_status, relevance_score};
use crate::types::{
    QuerySpec, RawNotice, ScoringCriteria, SearchParams, SearchSummary, SummaryParameters,
    TenderRecord, TenderStatus,
};

/// Notices requested per query; anything beyond this is the remote's cap.
const QUERY_LIMIT: u32 = 100;

/// Fixed spacing between successive queries, owned by this loop rather
/// than the executor: the remote applies a per-client rate limit.
const REQUEST_DELAY: Duration = Duration::from_secs(1);

/// Fixed backoff after a 429 before the loop advances. The rate-limited
/// query itself is not retried.
const RATE_LIMIT_BACKOFF: Duration = Duration::from_secs(5);

/// Error surface of a search backend. Rate limiting is distinguished so
/// the executor loop can apply its backoff policy; everything else is
/// opaque and degrades to an empty result.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("rate limited by the search API")]
    RateLimited,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Trait for notice search backends (to allow mocking).
#[async_trait]
pub trait NoticeSearch: Send + Sync {
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<Value>, SearchError>;
}

#[async_trait]
impl NoticeSearch for ted_client::TedClient {
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<Value>, SearchError> {
        match ted_client::TedClient::search(self, query, limit).await {
            Ok(notices) => Ok(notices),
            Err(ted_client::TedError::RateLimited) => Err(SearchError::RateLimited),
            Err(err) => Err(SearchError::Other(err.into())),
        }
    }
}

/// Main search orchestration: returns the ranked, truncated record list.
pub async fn search_tenders(
    searcher: &impl NoticeSearch,
    params: &SearchParams,
    criteria: &ScoringCriteria,
) -> Vec<TenderRecord> {
    tracing::info!(
        keywords = params.search_keywords.len(),
        cpv_codes = params.cpv_codes.len(),
        countries = params.countries.len(),
        "Starting tender search"
    );

    let queries = build_search_queries(params);
    tracing::info!(count = queries.len(), "Generated search queries");

    let mut all_notices = Vec::new();
    for (i, spec) in queries.iter().enumerate() {
        tracing::info!(
            query = i + 1,
            total = queries.len(),
            strategy = ?spec.strategy,
            "Executing query"
        );
        all_notices.extend(run_query(searcher, spec).await);

        if i + 1 < queries.len() {
            tokio::time::sleep(REQUEST_DELAY).await;
        }
    }
    tracing::info!(count = all_notices.len(), "Raw results collected");

    let unique = dedupe_notices(all_notices);
    tracing::info!(count = unique.len(), "After deduplication");

    let now = Utc::now();
    let mut records = Vec::new();
    for notice in &unique {
        let mut record = match normalize_notice(notice, params.include_documents) {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!(error = %err, "Skipping malformed notice");
                continue;
            }
        };
        record.relevance_score = relevance_score(&record, params, criteria);
        record.status = classify_status(&record.deadline_date, now);

        if params.active_only && record.status != TenderStatus::Active {
            continue;
        }
        if params.min_value > 0 && record.estimated_value_eur < params.min_value {
            continue;
        }
        records.push(record);
    }

    records.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));
    records.truncate(params.max_results);

    tracing::info!(count = records.len(), "Final results");
    records
}

/// Execute one query spec. Never fails: a rate-limited or failing query
/// degrades to an empty result so the remaining strategies still run.
async fn run_query(searcher: &impl NoticeSearch, spec: &QuerySpec) -> Vec<RawNotice> {
    match searcher.search(&spec.query, QUERY_LIMIT).await {
        Ok(notices) => {
            let fetched_at = Utc::now();
            tracing::debug!(count = notices.len(), "Query returned notices");
            notices
                .into_iter()
                .map(|fields| RawNotice {
                    fields,
                    search_type: spec.strategy,
                    search_group: spec.group.clone(),
                    fetched_at,
                })
                .collect()
        }
        Err(SearchError::RateLimited) => {
            tracing::warn!("Rate limit hit, backing off");
            tokio::time::sleep(RATE_LIMIT_BACKOFF).await;
            Vec::new()
        }
        Err(SearchError::Other(err)) => {
            tracing::error!(error = %err, "Search query failed");
            Vec::new()
        }
    }
}

/// Drop notices whose identifier is missing, and collapse notices sharing
/// an identifier to the first one observed. Input order is preserved.
pub fn dedupe_notices(notices: Vec<RawNotice>) -> Vec<RawNotice> {
    let mut seen = HashSet::new();
    notices
        .into_iter()
        .filter(|notice| match notice.notice_id() {
            Some(id) => seen.insert(id.to_string()),
            None => false,
        })
        .collect()
}

/// Aggregate statistics over a finished result set; `None` when empty.
pub fn summarize(records: &[TenderRecord], params: &SearchParams) -> Option<SearchSummary> {
    if records.is_empty() {
        return None;
    }
    let total = records.len();
    let average =
        records.iter().map(|r| r.relevance_score as f64).sum::<f64>() / total as f64;

    Some(SearchSummary {
        summary: true,
        total_found: total,
        average_score: (average * 10.0).round() / 10.0,
        high_relevance_count: records.iter().filter(|r| r.relevance_score > 70).count(),
        active_count: records
            .iter()
            .filter(|r| r.status == TenderStatus::Active)
            .count(),
        search_timestamp: Utc::now(),
        search_parameters: SummaryParameters {
            keywords: params.search_keywords.clone(),
            countries: params.countries.clone(),
            date_range: format!("{}-{}", params.year_from, params.year_to),
            active_only: params.active_only,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StrategyType;
    use chrono::Duration as ChronoDuration;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    struct MockSearcher {
        responses: Mutex<VecDeque<Result<Vec<Value>, SearchError>>>,
    }

    impl MockSearcher {
        fn new(responses: Vec<Result<Vec<Value>, SearchError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
            }
        }
    }

    #[async_trait]
    impl NoticeSearch for MockSearcher {
        async fn search(&self, _query: &str, _limit: u32) -> Result<Vec<Value>, SearchError> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok(Vec::new()))
        }
    }

    fn raw(id: &str, title: &str) -> RawNotice {
        RawNotice {
            fields: json!({ "notice-identifier": id, "notice-title": title }),
            search_type: StrategyType::Keyword,
            search_group: vec![],
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn dedupe_keeps_first_occurrence_in_order() {
        let deduped = dedupe_notices(vec![
            raw("1", "first"),
            raw("2", "second"),
            raw("1", "duplicate"),
        ]);

        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].notice_id(), Some("1"));
        assert_eq!(deduped[0].fields["notice-title"], "first");
        assert_eq!(deduped[1].notice_id(), Some("2"));
    }

    #[test]
    fn dedupe_drops_notices_without_identifier() {
        let anonymous = RawNotice {
            fields: json!({ "notice-title": "no id" }),
            search_type: StrategyType::Country,
            search_group: vec![],
            fetched_at: Utc::now(),
        };
        assert!(dedupe_notices(vec![anonymous]).is_empty());
    }

    fn test_params(keywords: &[&str]) -> SearchParams {
        SearchParams {
            search_keywords: keywords.iter().map(|s| s.to_string()).collect(),
            cpv_codes: vec![],
            countries: vec!["DE".to_string()],
            year_from: 2024,
            year_to: 2024,
            active_only: false,
            min_value: 0,
            max_results: 100,
            include_documents: false,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limited_query_degrades_to_no_extra_results() {
        // Four keywords build two keyword-group queries; the second one is
        // rate limited and must contribute nothing.
        let searcher = MockSearcher::new(vec![
            Ok(vec![
                json!({
                    "notice-identifier": "n-1",
                    "notice-title": { "eng": "software and cloud platform" },
                    "buyer-country": "DE",
                }),
                json!({
                    "notice-identifier": "n-2",
                    "notice-title": { "eng": "software only" },
                    "buyer-country": "DE",
                }),
            ]),
            Err(SearchError::RateLimited),
        ]);

        let params = test_params(&["software", "cloud", "data", "web"]);
        let results =
            search_tenders(&searcher, &params, &ScoringCriteria::default()).await;

        assert_eq!(results.len(), 2);
        // Two keyword matches beat one; sorted by descending score.
        assert_eq!(results[0].notice_id, "n-1");
        assert_eq!(results[1].notice_id, "n-2");
        assert!(results[0].relevance_score >= results[1].relevance_score);

        let ids: HashSet<&str> = results.iter().map(|r| r.notice_id.as_str()).collect();
        assert_eq!(ids.len(), results.len());
    }

    #[tokio::test(start_paused = true)]
    async fn duplicates_across_strategies_collapse_to_one_record() {
        let notice = json!({
            "notice-identifier": "n-1",
            "notice-title": { "eng": "shared notice" },
            "buyer-country": "DE",
        });
        let searcher = MockSearcher::new(vec![
            Ok(vec![notice.clone()]),
            Ok(vec![notice]),
        ]);

        // One keyword group plus one CPV group: two queries, same notice.
        let mut params = test_params(&["shared"]);
        params.cpv_codes = vec!["72000000".to_string()];

        let results =
            search_tenders(&searcher, &params, &ScoringCriteria::default()).await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].search_metadata.search_type, StrategyType::Keyword);
    }

    #[tokio::test(start_paused = true)]
    async fn active_only_excludes_expired_and_unknown() {
        let now = Utc::now();
        let searcher = MockSearcher::new(vec![Ok(vec![
            json!({
                "notice-identifier": "active",
                "deadline-receipt": (now + ChronoDuration::days(7)).to_rfc3339(),
            }),
            json!({
                "notice-identifier": "expired",
                "deadline-receipt": (now - ChronoDuration::days(7)).to_rfc3339(),
            }),
            json!({ "notice-identifier": "no-deadline" }),
        ])]);

        let mut params = test_params(&["anything"]);
        params.active_only = true;

        let results =
            search_tenders(&searcher, &params, &ScoringCriteria::default()).await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].notice_id, "active");
        assert_eq!(results[0].status, TenderStatus::Active);
    }

    #[tokio::test(start_paused = true)]
    async fn min_value_filter_drops_records_below_threshold() {
        let searcher = MockSearcher::new(vec![Ok(vec![
            json!({ "notice-identifier": "big", "value-eur": 5001 }),
            json!({ "notice-identifier": "small", "value-eur": 999 }),
        ])]);

        let mut params = test_params(&["anything"]);
        params.min_value = 1000;

        let results =
            search_tenders(&searcher, &params, &ScoringCriteria::default()).await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].notice_id, "big");
    }

    #[tokio::test(start_paused = true)]
    async fn results_truncate_to_max_results() {
        let notices: Vec<Value> = (0..5)
            .map(|i| json!({ "notice-identifier": format!("n-{i}") }))
            .collect();
        let searcher = MockSearcher::new(vec![Ok(notices)]);

        let mut params = test_params(&["anything"]);
        params.max_results = 3;

        let results =
            search_tenders(&searcher, &params, &ScoringCriteria::default()).await;
        assert_eq!(results.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_input_yields_empty_result_not_error() {
        let searcher = MockSearcher::new(vec![]);
        let mut params = test_params(&[]);
        params.countries = vec![];

        let results =
            search_tenders(&searcher, &params, &ScoringCriteria::default()).await;
        assert!(results.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn non_object_notice_is_dropped_not_fatal() {
        let searcher = MockSearcher::new(vec![Ok(vec![
            json!("not an object"),
            json!({ "notice-identifier": "n-1" }),
        ])]);

        let params = test_params(&["anything"]);
        let results =
            search_tenders(&searcher, &params, &ScoringCriteria::default()).await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].notice_id, "n-1");
    }

    #[test]
    fn summary_aggregates_scores_and_statuses() {
        let mut high = crate::normalize::normalize_notice(
            &raw("1", "title"),
            false,
        )
        .unwrap();
        high.relevance_score = 80;
        high.status = TenderStatus::Active;
        let mut low = crate::normalize::normalize_notice(&raw("2", "title"), false).unwrap();
        low.relevance_score = 31;

        let params = test_params(&["kw"]);
        let summary = summarize(&[high, low], &params).unwrap();
        assert!(summary.summary);
        assert_eq!(summary.total_found, 2);
        assert_eq!(summary.average_score, 55.5);
        assert_eq!(summary.high_relevance_count, 1);
        assert_eq!(summary.active_count, 1);
        assert_eq!(summary.search_parameters.date_range, "2024-2024");

        assert!(summarize(&[], &params).is_none());
    }
}
