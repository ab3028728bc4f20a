use chrono::{Datelike, NaiveDate, NaiveTime};

/// Unique row identifier. Assigned by the owning store, never reused.
pub type RowId = u64;

/// Typed field payload for a [`Record`].
///
/// The table layer never inspects business meaning; it only needs a display
/// form and enough type information to pick a search strategy.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Integer(i64),
    /// Monetary amount in the display currency.
    Money(f64),
    Date(NaiveDate),
    Time(NaiveTime),
    /// Enumerated state field ("Activo", "Pendiente", ...).
    Status(String),
    Empty,
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn status(s: impl Into<String>) -> Self {
        Value::Status(s.into())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Value::Empty => true,
            Value::Text(s) | Value::Status(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Display form used in table cells and as the base for search matching.
    pub fn display(&self) -> String {
        match self {
            Value::Text(s) | Value::Status(s) => s.clone(),
            Value::Integer(n) => n.to_string(),
            Value::Money(amount) => format_money(*amount),
            Value::Date(d) => format!("{:02}/{:02}/{}", d.day(), d.month(), d.year()),
            Value::Time(t) => t.format("%H:%M").to_string(),
            Value::Empty => String::new(),
        }
    }
}

/// Format an amount as `$1,234.50`.
pub fn format_money(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;
    let mut grouped = String::new();
    let digits = whole.to_string();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if negative {
        format!("-${}.{:02}", grouped, frac)
    } else {
        format!("${}.{:02}", grouped, frac)
    }
}

/// One row displayed by a table: a unique id plus an ordered set of named
/// fields. Shape is up to the caller; the table only reads.
#[derive(Debug, Clone)]
pub struct Record {
    id: RowId,
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new(id: RowId) -> Self {
        Self {
            id,
            fields: Vec::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.set(key, value);
        self
    }

    pub fn id(&self) -> RowId {
        self.id
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Replaces the field if the key already exists, appends otherwise.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Display form of a field; missing fields render as empty.
    pub fn display(&self, key: &str) -> String {
        self.get(key).map(Value::display).unwrap_or_default()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}
