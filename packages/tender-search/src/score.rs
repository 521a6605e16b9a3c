//! Relevance scoring and status classification.
//!
//! The relevance score is a weighted sum of four independent sub-scores
//! (keyword, CPV, country, value), each clamped to [0, 100] before
//! weighting; the combined score is truncated to an integer and clamped to
//! [0, 100]. Status is derived from the submission deadline alone; the two
//! computations never influence each other.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::types::{ScoringCriteria, SearchParams, TenderRecord, TenderStatus};

/// Weighted relevance score in [0, 100].
pub fn relevance_score(
    record: &TenderRecord,
    params: &SearchParams,
    criteria: &ScoringCriteria,
) -> u8 {
    let score = keyword_score(record, &params.search_keywords) * criteria.keyword_match as f64
        / 100.0
        + cpv_score(&record.cpv_codes, &params.cpv_codes) * criteria.cpv_match as f64 / 100.0
        + country_score(record, &params.countries) * criteria.country_match as f64 / 100.0
        + value_score(record.estimated_value_eur, params.min_value) * criteria.value_match as f64
            / 100.0;

    score.min(100.0) as u8
}

/// Share of requested keywords that substring-match the title or buyer
/// name, case-insensitively. 0 when no keywords were supplied.
fn keyword_score(record: &TenderRecord, keywords: &[String]) -> f64 {
    if keywords.is_empty() {
        return 0.0;
    }
    let title = record.title.to_lowercase();
    let buyer = record.buyer_name.to_lowercase();
    let matched = keywords
        .iter()
        .filter(|kw| {
            let kw = kw.to_lowercase();
            title.contains(&kw) || buyer.contains(&kw)
        })
        .count();

    (matched as f64 / keywords.len() as f64 * 100.0).min(100.0)
}

/// Share of requested CPV codes matching any record code at division level
/// (first four digits). 0 when either side has no codes.
fn cpv_score(record_codes: &[String], requested: &[String]) -> f64 {
    if requested.is_empty() || record_codes.is_empty() {
        return 0.0;
    }
    let matched = requested
        .iter()
        .filter(|code| {
            let division = code.get(0..4).unwrap_or(code);
            record_codes.iter().any(|rc| rc.starts_with(division))
        })
        .count();

    (matched as f64 / requested.len() as f64 * 100.0).min(100.0)
}

fn country_score(record: &TenderRecord, countries: &[String]) -> f64 {
    if countries.contains(&record.country) {
        100.0
    } else {
        0.0
    }
}

/// Value sub-score, only evaluated for records at or above the minimum.
/// The multiplier tiers apply only with a positive minimum; with a minimum
/// of 0 any positive value lands on the base 50-point branch.
fn value_score(value: u64, min_value: u64) -> f64 {
    if value < min_value {
        return 0.0;
    }
    if min_value > 0 && value > min_value * 10 {
        100.0
    } else if min_value > 0 && value > min_value * 5 {
        75.0
    } else if value > min_value {
        50.0
    } else {
        0.0
    }
}

/// Classify a tender from its submission deadline: strictly in the future
/// means active, past or exactly now means expired, missing or unparseable
/// means unknown (never active).
pub fn classify_status(deadline: &str, now: DateTime<Utc>) -> TenderStatus {
    match parse_deadline(deadline) {
        Some(deadline) => {
            if now < deadline {
                TenderStatus::Active
            } else {
                TenderStatus::Expired
            }
        }
        None => TenderStatus::Unknown,
    }
}

fn parse_deadline(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    // Offset-less timestamps and bare dates are assumed UTC.
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(Utc.from_utc_datetime(&dt));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
    }
    None
}
