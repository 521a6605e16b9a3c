//! Record normalization.
//!
//! The API returns notices with heterogeneous field shapes: text fields can
//! be plain strings, language-code maps, or lists of either; values can be
//! numbers or formatted strings. Normalization flattens one raw notice into
//! a typed [`TenderRecord`]. Every field extractor is best-effort and falls
//! back to that field's zero value; only a structurally broken payload
//! (not a JSON object) fails the record as a whole.

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use crate::types::{DocumentLink, RawNotice, SearchMetadata, TenderRecord, TenderStatus};

/// Flatten one raw notice. Relevance score and status are filled in by the
/// scoring step; they start at their zero values here.
pub fn normalize_notice(raw: &RawNotice, include_documents: bool) -> Result<TenderRecord> {
    let fields = raw
        .fields
        .as_object()
        .context("notice payload is not a JSON object")?;

    Ok(TenderRecord {
        notice_id: scalar_string(fields, "notice-identifier"),
        title: text_field(fields, "notice-title"),
        buyer_name: text_field(fields, "buyer-name"),
        country: scalar_string(fields, "buyer-country"),
        publication_date: scalar_string(fields, "publication-date"),
        deadline_date: scalar_string(fields, "deadline-receipt"),
        cpv_codes: extract_cpv_codes(fields),
        notice_type: scalar_string(fields, "notice-type"),
        estimated_value_eur: extract_value(fields),
        ted_url: source_url(fields),
        document_links: if include_documents {
            Some(extract_document_links(fields))
        } else {
            None
        },
        search_metadata: SearchMetadata {
            search_type: raw.search_type,
            search_group: raw.search_group.clone(),
            found_at: raw.fetched_at,
        },
        relevance_score: 0,
        status: TenderStatus::Unknown,
    })
}

/// Text from a possibly-multilingual field: prefer the `eng` entry of a
/// language map, else the first available language; take the first element
/// of a list (applying the same rule); stringify scalars; empty otherwise.
fn text_field(fields: &Map<String, Value>, name: &str) -> String {
    fields.get(name).map(text_value).unwrap_or_default()
}

fn text_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(map) => map
            .get("eng")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| map.values().next().map(text_value))
            .unwrap_or_default(),
        Value::Array(items) => items.first().map(text_value).unwrap_or_default(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
    }
}

/// A scalar field expected to be a plain string; numbers are stringified,
/// anything structured is treated as absent.
fn scalar_string(fields: &Map<String, Value>, name: &str) -> String {
    match fields.get(name) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// CPV codes from a list of code objects or a single code object; falsy
/// codes are dropped.
fn extract_cpv_codes(fields: &Map<String, Value>) -> Vec<String> {
    match fields.get("classification-cpv") {
        Some(Value::Array(items)) => items.iter().filter_map(cpv_code_of).collect(),
        Some(value) => cpv_code_of(value).into_iter().collect(),
        None => Vec::new(),
    }
}

fn cpv_code_of(value: &Value) -> Option<String> {
    let code = match value.get("cpv-code")? {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!code.is_empty()).then_some(code)
}

/// Estimated contract value in EUR. Numbers are truncated to a non-negative
/// integer; strings have thousands separators stripped and the first run of
/// digits parsed. Everything else is 0.
fn extract_value(fields: &Map<String, Value>) -> u64 {
    match fields.get("value-eur") {
        Some(Value::Number(n)) => n
            .as_f64()
            .filter(|v| *v > 0.0)
            .map(|v| v as u64)
            .unwrap_or(0),
        Some(Value::String(s)) => {
            let cleaned = s.replace(',', "");
            cleaned
                .chars()
                .skip_while(|c| !c.is_ascii_digit())
                .take_while(|c| c.is_ascii_digit())
                .collect::<String>()
                .parse()
                .unwrap_or(0)
        }
        _ => 0,
    }
}

/// Canonical URL for the notice: the first link's href, else a URL derived
/// from the publication number, else one derived from the notice id.
fn source_url(fields: &Map<String, Value>) -> String {
    if let Some(Value::Array(links)) = fields.get("links") {
        for link in links {
            if let Some(href) = link.get("href").and_then(Value::as_str) {
                if !href.is_empty() {
                    return href.to_string();
                }
            }
        }
    }

    let pub_number = scalar_string(fields, "publication-number");
    if !pub_number.is_empty() {
        return format!("https://ted.europa.eu/udl?uri=TED:NOTICE:{pub_number}:TEXT:EN:HTML");
    }

    let notice_id = scalar_string(fields, "notice-identifier");
    if !notice_id.is_empty() {
        return format!("https://ted.europa.eu/notices/{notice_id}");
    }

    String::new()
}

/// Every link object with a non-empty href, with a default link type.
fn extract_document_links(fields: &Map<String, Value>) -> Vec<DocumentLink> {
    let Some(Value::Array(links)) = fields.get("links") else {
        return Vec::new();
    };

    links
        .iter()
        .filter_map(|link| {
            let url = link.get("href").and_then(Value::as_str)?;
            if url.is_empty() {
                return None;
            }
            Some(DocumentLink {
                url: url.to_string(),
                link_type: link
                    .get("type")
                    .and_then(Value::as_str)
                    .unwrap_or("document")
                    .to_string(),
                description: link
                    .get("description")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StrategyType;
    use chrono::Utc;
    use serde_json::json;

    fn raw(fields: Value) -> RawNotice {
        RawNotice {
            fields,
            search_type: StrategyType::Keyword,
            search_group: vec!["alpha".to_string()],
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn prefers_english_in_language_maps() {
        let record = normalize_notice(
            &raw(json!({
                "notice-identifier": "n-1",
                "notice-title": { "fra": "Titre", "eng": "Title" },
            })),
            false,
        )
        .unwrap();
        assert_eq!(record.title, "Title");
    }

    #[test]
    fn falls_back_to_first_language_then_list_head() {
        let record = normalize_notice(
            &raw(json!({
                "notice-identifier": "n-1",
                "notice-title": { "deu": "Titel" },
                "buyer-name": [{ "eng": "Agency" }, { "eng": "Other" }],
            })),
            false,
        )
        .unwrap();
        assert_eq!(record.title, "Titel");
        assert_eq!(record.buyer_name, "Agency");
    }

    #[test]
    fn missing_fields_become_zero_values() {
        let record = normalize_notice(&raw(json!({ "notice-identifier": "n-1" })), false).unwrap();
        assert_eq!(record.title, "");
        assert_eq!(record.estimated_value_eur, 0);
        assert!(record.cpv_codes.is_empty());
        assert_eq!(record.status, TenderStatus::Unknown);
    }

    #[test]
    fn cpv_codes_from_list_or_single_object() {
        let fields = json!({
            "classification-cpv": [{ "cpv-code": "72000000" }, { "cpv-code": "" }, { "other": 1 }],
        });
        let codes = extract_cpv_codes(fields.as_object().unwrap());
        assert_eq!(codes, vec!["72000000"]);

        let single = json!({ "classification-cpv": { "cpv-code": 45000000 } });
        assert_eq!(
            extract_cpv_codes(single.as_object().unwrap()),
            vec!["45000000"]
        );
    }

    #[test]
    fn value_parsing_handles_numbers_and_text() {
        let cases = [
            (json!({ "value-eur": 250000 }), 250_000),
            (json!({ "value-eur": 250000.9 }), 250_000),
            (json!({ "value-eur": "1,500,000" }), 1_500_000),
            (json!({ "value-eur": "EUR 42000" }), 42_000),
            (json!({ "value-eur": "n/a" }), 0),
            (json!({ "value-eur": -5 }), 0),
            (json!({}), 0),
        ];
        for (fields, expected) in cases {
            assert_eq!(extract_value(fields.as_object().unwrap()), expected);
        }
    }

    #[test]
    fn source_url_fallback_chain() {
        let with_link = json!({
            "links": [{ "href": "https://example.eu/doc" }],
            "publication-number": "123-2024",
        });
        assert_eq!(
            source_url(with_link.as_object().unwrap()),
            "https://example.eu/doc"
        );

        let with_pub = json!({ "publication-number": "123-2024" });
        assert_eq!(
            source_url(with_pub.as_object().unwrap()),
            "https://ted.europa.eu/udl?uri=TED:NOTICE:123-2024:TEXT:EN:HTML"
        );

        let with_id = json!({ "notice-identifier": "n-9" });
        assert_eq!(
            source_url(with_id.as_object().unwrap()),
            "https://ted.europa.eu/notices/n-9"
        );

        assert_eq!(source_url(json!({}).as_object().unwrap()), "");
    }

    #[test]
    fn document_links_only_when_requested() {
        let fields = json!({
            "notice-identifier": "n-1",
            "links": [
                { "href": "https://example.eu/a", "type": "pdf", "description": "tender docs" },
                { "href": "" },
                { "type": "html" },
            ],
        });

        let with_docs = normalize_notice(&raw(fields.clone()), true).unwrap();
        let links = with_docs.document_links.unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].link_type, "pdf");

        let without_docs = normalize_notice(&raw(fields), false).unwrap();
        assert!(without_docs.document_links.is_none());
    }

    #[test]
    fn non_object_payload_fails_the_record() {
        assert!(normalize_notice(&raw(json!("not an object")), false).is_err());
    }

    #[test]
    fn normalization_is_idempotent_across_calls() {
        let notice = raw(json!({
            "notice-identifier": "n-1",
            "notice-title": { "eng": "Title" },
            "value-eur": "1,000",
        }));
        let first = normalize_notice(&notice, true).unwrap();
        let second = normalize_notice(&notice, true).unwrap();
        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
    }
}
