use serde_json::{Map, Value};

use crate::error::{ImportError, Result};
use crate::record::{Record, ResultSet};
use crate::strict;
use crate::{ParseOptions, RECOMMENDATIONS_KEY};

/// Rank given to recommendations without a `recommendation_id`; sorts them after ranked ones.
pub const DEFAULT_RANK: i64 = 100;

const AUTHOR_SEPARATOR: &str = ", ";

/// Parse a recommendation payload into records ordered by rank.
///
/// Fails with [`ImportError::MalformedPayload`] when the text is not JSON or has no
/// `recommendations` object, and with [`ImportError::FieldExtraction`] when any single
/// entry carries a field of the wrong shape. Nothing is returned for a payload that fails.
pub fn parse(text: &str) -> Result<ResultSet> {
    parse_with(text, &ParseOptions::default())
}

pub fn parse_with(text: &str, options: &ParseOptions) -> Result<ResultSet> {
    let root: Value = strict::from_str(text)
        .map_err(|e| ImportError::MalformedPayload(format!("invalid JSON: {e}")))?;
    let recommendations = match root.get(RECOMMENDATIONS_KEY) {
        Some(Value::Object(map)) => map,
        Some(other) => {
            return Err(ImportError::MalformedPayload(format!(
                "'{RECOMMENDATIONS_KEY}' is {}, expected an object",
                kind(other)
            )))
        }
        None => {
            return Err(ImportError::MalformedPayload(format!("no '{RECOMMENDATIONS_KEY}' object")))
        }
    };

    let mut ranked: Vec<(i64, Record)> = Vec::with_capacity(recommendations.len());
    for (key, value) in recommendations {
        let entry = value
            .as_object()
            .ok_or_else(|| ImportError::field(key, "<entry>", format!("expected an object, found {}", kind(value))))?;
        let (rank, record) = build_record(key, entry, options)?;
        tracing::debug!(key = %key, rank, title = record.title(), "parsed recommendation");
        ranked.push((rank, record));
    }

    // sort_by_key is stable: equal ranks keep payload order
    ranked.sort_by_key(|(rank, _)| *rank);
    tracing::debug!(count = ranked.len(), "ranked recommendations");
    Ok(ResultSet::from_sorted(ranked.into_iter().map(|(_, r)| r).collect()))
}

fn build_record(key: &str, entry: &Map<String, Value>, options: &ParseOptions) -> Result<(i64, Record)> {
    let authors = authors_string(key, entry)?;
    let title = optional_string(key, entry, "title")?;
    let year = optional_string(key, entry, "date_published")?;
    let journal = optional_string(key, entry, "published_in")?;
    let mut url = optional_string(key, entry, "url")?;
    if is_present(entry, "url") {
        url.push('.');
    }
    let rank = rank(key, entry)?;
    Ok((rank, Record::new(authors, title, year, journal, &url, options)))
}

fn is_present(entry: &Map<String, Value>, field: &str) -> bool {
    !matches!(entry.get(field), None | Some(Value::Null))
}

/// A string field, or `""` when the field is absent or null.
fn optional_string(key: &str, entry: &Map<String, Value>, field: &'static str) -> Result<String> {
    match entry.get(field) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(ImportError::field(key, field, format!("expected a string, found {}", kind(other)))),
    }
}

/// Authors joined by `", "` and closed with a period: `["A", "B"]` gives `"A, B."`.
fn authors_string(key: &str, entry: &Map<String, Value>) -> Result<String> {
    let list = match entry.get("authors") {
        None | Some(Value::Null) => return Ok(String::new()),
        Some(Value::Array(list)) => list,
        Some(other) => {
            return Err(ImportError::field(key, "authors", format!("expected an array, found {}", kind(other))))
        }
    };
    let mut joined = String::new();
    for (i, author) in list.iter().enumerate() {
        let name = author.as_str().ok_or_else(|| {
            ImportError::field(key, "authors", format!("element {i} is {}, expected a string", kind(author)))
        })?;
        joined.push_str(name);
        joined.push_str(AUTHOR_SEPARATOR);
    }
    if joined.len() > AUTHOR_SEPARATOR.len() {
        joined.truncate(joined.len() - AUTHOR_SEPARATOR.len());
        joined.push('.');
        Ok(joined)
    } else {
        Ok(String::new())
    }
}

/// `recommendation_id` as an integer; numeric strings are accepted as well.
fn rank(key: &str, entry: &Map<String, Value>) -> Result<i64> {
    const FIELD: &str = "recommendation_id";
    match entry.get(FIELD) {
        None | Some(Value::Null) => Ok(DEFAULT_RANK),
        Some(Value::Number(n)) => n
            .as_i64()
            .ok_or_else(|| ImportError::field(key, FIELD, format!("{n} is not an integer rank"))),
        Some(Value::String(s)) => s
            .parse::<i64>()
            .map_err(|e| ImportError::field(key, FIELD, format!("'{s}' is not an integer rank: {e}"))),
        Some(other) => Err(ImportError::field(key, FIELD, format!("expected an integer, found {}", kind(other)))),
    }
}

pub(crate) fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn authors_are_joined_and_terminated() {
        let e = entry(json!({"authors": ["A", "B", "C"]}));
        assert_eq!(authors_string("k", &e).unwrap(), "A, B, C.");
        let e = entry(json!({"authors": ["Solo"]}));
        assert_eq!(authors_string("k", &e).unwrap(), "Solo.");
    }

    #[test]
    fn degenerate_authors_are_empty() {
        for v in [json!({"authors": []}), json!({"authors": [""]}), json!({"authors": null}), json!({})] {
            assert_eq!(authors_string("k", &entry(v)).unwrap(), "");
        }
    }

    #[test]
    fn authors_of_wrong_shape_fail() {
        let err = authors_string("k", &entry(json!({"authors": "A"}))).unwrap_err();
        assert!(matches!(err, ImportError::FieldExtraction { field: "authors", .. }));
        let err = authors_string("k", &entry(json!({"authors": ["A", 3]}))).unwrap_err();
        assert!(err.to_string().contains("element 1"));
    }

    #[test]
    fn rank_defaults_and_coerces() {
        assert_eq!(rank("k", &entry(json!({}))).unwrap(), DEFAULT_RANK);
        assert_eq!(rank("k", &entry(json!({"recommendation_id": null}))).unwrap(), DEFAULT_RANK);
        assert_eq!(rank("k", &entry(json!({"recommendation_id": 7}))).unwrap(), 7);
        assert_eq!(rank("k", &entry(json!({"recommendation_id": "12"}))).unwrap(), 12);
        assert!(rank("k", &entry(json!({"recommendation_id": 1.5}))).is_err());
        assert!(rank("k", &entry(json!({"recommendation_id": "first"}))).is_err());
        assert!(rank("k", &entry(json!({"recommendation_id": true}))).is_err());
    }

    #[test]
    fn string_fields_default_to_empty() {
        let e = entry(json!({"title": null}));
        assert_eq!(optional_string("k", &e, "title").unwrap(), "");
        assert_eq!(optional_string("k", &e, "published_in").unwrap(), "");
        let err = optional_string("k", &entry(json!({"date_published": 2017})), "date_published").unwrap_err();
        assert_eq!(err.to_string(), "recommendation 'k': cannot read 'date_published': expected a string, found a number");
    }

    #[test]
    fn url_gets_period_only_in_display() {
        let (_, r) = build_record("k", &entry(json!({"url": "http://x.org", "title": "T"})), &ParseOptions::default()).unwrap();
        assert!(r.html_representation().starts_with("<a href='http://x.org.'>"));
        let (_, r) = build_record("k", &entry(json!({"title": "T"})), &ParseOptions::default()).unwrap();
        assert!(r.html_representation().starts_with("<a href=''>"));
    }
}
