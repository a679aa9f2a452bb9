// Filter criteria, sort ordering and pagination results

use crate::record::Record;
use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;
use std::str::FromStr;

/// Condition one field must satisfy
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    /// Field strictly equals the value
    Eq(Value),
    /// Field strictly equals one of the values
    In(Vec<Value>),
}

impl Criterion {
    pub fn matches(&self, value: Option<&Value>) -> bool {
        let Some(value) = value else {
            return false;
        };

        match self {
            Criterion::Eq(expected) => strict_eq(value, expected),
            Criterion::In(options) => options.iter().any(|o| strict_eq(value, o)),
        }
    }
}

impl From<Value> for Criterion {
    /// Arrays become membership tests, anything else an equality test
    fn from(value: Value) -> Self {
        match value {
            Value::Array(options) => Criterion::In(options),
            other => Criterion::Eq(other),
        }
    }
}

/// Conditions on several fields, all of which must hold
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    conditions: Vec<(String, Criterion)>,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field` to equal `value`
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((field.into(), Criterion::Eq(value.into())));
        self
    }

    /// Require `field` to equal one of `values`
    pub fn any_of<V: Into<Value>>(mut self, field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        self.conditions.push((field.into(), Criterion::In(values)));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.conditions
            .iter()
            .all(|(field, criterion)| criterion.matches(record.value(field).as_deref()))
    }
}

impl From<serde_json::Map<String, Value>> for Criteria {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        Self {
            conditions: map.into_iter().map(|(k, v)| (k, Criterion::from(v))).collect(),
        }
    }
}

/// Equality in the storefront's sense: numbers compare by numeric value,
/// arrays and objects are never equal to anything
pub fn strict_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        (Value::String(x), Value::String(y)) => x == y,
        _ => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = std::convert::Infallible;

    /// Anything other than `desc` sorts ascending
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("desc") {
            Ok(SortOrder::Desc)
        } else {
            Ok(SortOrder::Asc)
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "asc"),
            SortOrder::Desc => write!(f, "desc"),
        }
    }
}

fn kind_rank(value: Option<&Value>) -> u8 {
    match value {
        None => 0,
        Some(Value::Null) => 1,
        Some(Value::Bool(_)) => 2,
        Some(Value::Number(_)) => 3,
        Some(Value::String(_)) => 4,
        Some(Value::Array(_)) => 5,
        Some(Value::Object(_)) => 6,
    }
}

/// Total order over optional field values
///
/// Values of different kinds order by kind: missing, null, bool, number,
/// string, array, object. Arrays and objects of the same kind are equal.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.total_cmp(&y)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}

/// Stable sort of records by one field
pub fn sort_records(records: &mut [Record], field: &str, order: SortOrder) {
    records.sort_by(|a, b| {
        let ord = compare_values(a.value(field).as_deref(), b.value(field).as_deref());
        match order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });
}

/// One page of a table
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub data: Vec<Record>,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub total_pages: usize,
}

impl Page {
    /// Cut page `page` (1-indexed) of `limit` records out of `records`
    ///
    /// `limit` must be non-zero. Page 0 and pages past the end are empty.
    pub fn slice(records: Vec<Record>, page: usize, limit: usize) -> Self {
        let total = records.len();
        let total_pages = total.div_ceil(limit);

        let data = match page.checked_sub(1).and_then(|p| p.checked_mul(limit)) {
            Some(start) if start < total => records.into_iter().skip(start).take(limit).collect(),
            _ => Vec::new(),
        };

        Self {
            data,
            total,
            page,
            limit,
            total_pages,
        }
    }
}
