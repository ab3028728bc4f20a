use chrono::Datelike;

use crate::data::record::{Record, Value};

/// Spanish month names used for the localized "month year" candidate.
const MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Comparison strategy for one searchable key.
///
/// `Auto` derives the strategy from the field's typed [`Value`], so no
/// string re-parsing happens per keystroke. Callers can pin a strategy
/// explicitly when the default is not what they want.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Matcher {
    #[default]
    Auto,
    Substring,
    Numeric,
    Date,
    Exact,
}

/// A row attribute eligible for free-text matching.
#[derive(Debug, Clone)]
pub struct SearchKey {
    pub key: String,
    pub matcher: Matcher,
}

impl SearchKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            matcher: Matcher::Auto,
        }
    }

    pub fn with_matcher(mut self, matcher: Matcher) -> Self {
        self.matcher = matcher;
        self
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Candidate match strings for a numeric value: plain, zero-decimal and
/// two-decimal forms.
fn numeric_candidates(n: f64) -> [String; 3] {
    let plain = if n.fract() == 0.0 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    };
    [plain, format!("{:.0}", n), format!("{:.2}", n)]
}

/// Candidate match strings for a date: ISO, localized, year, "month year".
fn date_candidates(d: chrono::NaiveDate) -> [String; 4] {
    [
        d.format("%Y-%m-%d").to_string(),
        format!("{:02}/{:02}/{}", d.day(), d.month(), d.year()),
        d.year().to_string(),
        format!("{} {}", MONTHS[d.month0() as usize], d.year()),
    ]
}

/// Strip currency decoration so "$1,500" queries numeric fields as "1500".
fn strip_currency(s: &str) -> String {
    s.chars().filter(|c| *c != '$' && *c != ',').collect()
}

fn resolve(matcher: Matcher, value: &Value) -> Matcher {
    if matcher != Matcher::Auto {
        return matcher;
    }
    match value {
        Value::Integer(_) | Value::Money(_) => Matcher::Numeric,
        Value::Date(_) => Matcher::Date,
        _ => Matcher::Substring,
    }
}

/// Keys whose "activo"/"inactivo" queries demand exact equality, so that
/// "activo" never matches "Inactivo" through substring overlap.
fn status_exact_applies(key: &str, query: &str) -> bool {
    (key == "estado" || key == "state") && (query == "activo" || query == "inactivo")
}

/// Whether one field value matches an already-normalized query.
fn value_matches(key: &str, value: &Value, matcher: Matcher, query: &str) -> bool {
    if status_exact_applies(key, query) {
        return normalize(&value.display()) == query;
    }

    match resolve(matcher, value) {
        Matcher::Exact => normalize(&value.display()) == query,
        Matcher::Numeric => {
            let n = match value {
                Value::Integer(n) => *n as f64,
                Value::Money(n) => *n,
                // Declared numeric on a non-numeric field degrades to the
                // plain display string.
                other => return normalize(&other.display()).contains(query),
            };
            let wanted = strip_currency(query);
            !wanted.is_empty() && numeric_candidates(n).iter().any(|c| c.contains(&wanted))
        }
        Matcher::Date => {
            let d = match value {
                Value::Date(d) => *d,
                other => return normalize(&other.display()).contains(query),
            };
            date_candidates(d).iter().any(|c| normalize(c).contains(query))
        }
        _ => normalize(&value.display()).contains(query),
    }
}

/// Whether a record matches the query on any of the searchable keys.
pub fn row_matches(record: &Record, keys: &[SearchKey], query: &str) -> bool {
    keys.iter().any(|sk| {
        record
            .get(&sk.key)
            .is_some_and(|value| value_matches(&sk.key, value, sk.matcher, query))
    })
}

/// Filter rows by a free-text query over the searchable keys.
///
/// Returns `None` for a blank query: the caller renders the collection
/// as-is and idle cost stays O(1). Otherwise returns the indices of
/// matching rows in their original relative order.
pub fn filter(rows: &[Record], keys: &[SearchKey], query: &str) -> Option<Vec<usize>> {
    let query = normalize(query);
    if query.is_empty() {
        return None;
    }
    Some(
        rows.iter()
            .enumerate()
            .filter(|(_, row)| row_matches(row, keys, &query))
            .map(|(i, _)| i)
            .collect(),
    )
}
