//! Query strategy builder.
//!
//! Turns search parameters into an ordered list of independent query
//! specifications. Keywords and CPV codes are partitioned into fixed-size
//! groups so no single query exceeds the API's query-complexity limits;
//! the group sizes are policy, not configuration.

use crate::types::{QuerySpec, SearchParams, StrategyType};

const KEYWORD_GROUP_SIZE: usize = 3;
const CPV_GROUP_SIZE: usize = 5;

/// Build the full set of query specs for one search. Pure and
/// deterministic: the same parameters always produce the same ordered
/// sequence. With no keywords, CPV codes, or countries at all the result
/// is empty and the caller gets an empty search.
pub fn build_search_queries(params: &SearchParams) -> Vec<QuerySpec> {
    let mut queries = Vec::new();

    // Keyword strategy: OR of title matches per group.
    for group in params.search_keywords.chunks(KEYWORD_GROUP_SIZE) {
        let title_clauses: Vec<String> = group
            .iter()
            .map(|kw| format!("notice-title=\"{kw}\""))
            .collect();

        let mut parts = vec![format!("({})", title_clauses.join(" OR "))];
        push_common_clauses(&mut parts, params);

        queries.push(QuerySpec {
            query: parts.join(" AND "),
            strategy: StrategyType::Keyword,
            group: group.to_vec(),
        });
    }

    // CPV strategy: OR of exact code matches per group. Independent of the
    // keyword strategy; both families are emitted when both inputs exist.
    for group in params.cpv_codes.chunks(CPV_GROUP_SIZE) {
        let code_clauses: Vec<String> = group
            .iter()
            .map(|code| format!("classification-cpv=\"{code}\""))
            .collect();

        let mut parts = vec![format!("({})", code_clauses.join(" OR "))];
        push_common_clauses(&mut parts, params);

        queries.push(QuerySpec {
            query: parts.join(" AND "),
            strategy: StrategyType::Cpv,
            group: group.to_vec(),
        });
    }

    // Country fallback when there is nothing more specific to query on.
    if params.search_keywords.is_empty() && params.cpv_codes.is_empty() {
        for country in &params.countries {
            let mut parts = vec![format!("buyer-country=\"{country}\"")];
            push_date_and_value_clauses(&mut parts, params);

            queries.push(QuerySpec {
                query: parts.join(" AND "),
                strategy: StrategyType::Country,
                group: vec![country.clone()],
            });
        }
    }

    queries
}

fn push_common_clauses(parts: &mut Vec<String>, params: &SearchParams) {
    if !params.countries.is_empty() {
        let country_clauses: Vec<String> = params
            .countries
            .iter()
            .map(|country| format!("buyer-country=\"{country}\""))
            .collect();
        parts.push(format!("({})", country_clauses.join(" OR ")));
    }
    push_date_and_value_clauses(parts, params);
}

fn push_date_and_value_clauses(parts: &mut Vec<String>, params: &SearchParams) {
    parts.push(format!("publication-date>={}-01-01", params.year_from));
    parts.push(format!("publication-date<={}-12-31", params.year_to));
    if params.min_value > 0 {
        parts.push(format!("value-eur>={}", params.min_value));
    }
}
