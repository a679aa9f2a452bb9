// Stored record envelope: reserved fields plus caller-defined fields

use crate::error::Result;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;

/// Caller-defined fields of a record
pub type Fields = Map<String, Value>;

pub const ID_FIELD: &str = "id";
pub const CREATED_AT_FIELD: &str = "createdAt";
pub const UPDATED_AT_FIELD: &str = "updatedAt";

/// Fields owned by the store; callers cannot set them through create or update
pub const RESERVED_FIELDS: [&str; 3] = [ID_FIELD, CREATED_AT_FIELD, UPDATED_AT_FIELD];

/// A single stored entity
///
/// Serializes as one flat JSON object: `id`, `createdAt`, `updatedAt` (once
/// the record has been updated) and every caller field alongside them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub fields: Fields,
}

impl Record {
    /// New record with a fresh id and creation time
    pub fn new(fields: Fields) -> Self {
        Self {
            id: generate_id(),
            created_at: now(),
            updated_at: None,
            fields: strip_reserved(fields),
        }
    }

    /// Shallow-merge `fields` over this record and stamp `updatedAt`
    pub fn merge(&mut self, fields: Fields) {
        self.fields.extend(strip_reserved(fields));
        self.updated_at = Some(now());
    }

    /// Value of a field, reserved fields included, as it appears in the stored JSON
    pub fn value(&self, field: &str) -> Option<Cow<'_, Value>> {
        match field {
            ID_FIELD => Some(Cow::Owned(Value::String(self.id.clone()))),
            CREATED_AT_FIELD => Some(Cow::Owned(Value::String(format_timestamp(&self.created_at)))),
            UPDATED_AT_FIELD => self
                .updated_at
                .as_ref()
                .map(|ts| Cow::Owned(Value::String(format_timestamp(ts)))),
            _ => self.fields.get(field).map(Cow::Borrowed),
        }
    }

    /// Every string-valued field, reserved fields first
    pub fn string_values(&self) -> impl Iterator<Item = Cow<'_, str>> {
        let reserved = [
            Some(Cow::Borrowed(self.id.as_str())),
            Some(Cow::Owned(format_timestamp(&self.created_at))),
            self.updated_at.as_ref().map(|ts| Cow::Owned(format_timestamp(ts))),
        ];

        reserved.into_iter().flatten().chain(
            self.fields
                .values()
                .filter_map(|v| v.as_str().map(Cow::Borrowed)),
        )
    }

    /// Time of the last write to this record
    pub fn last_modified(&self) -> DateTime<Utc> {
        self.updated_at.unwrap_or(self.created_at)
    }

    /// Decode the whole record, reserved fields included, into a typed model
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        let value = serde_json::to_value(self)?;
        Ok(serde_json::from_value(value)?)
    }
}

/// Time-ordered unique id; collisions are not checked
pub fn generate_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

/// Current time at millisecond precision
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// ISO-8601 form used in stored records, e.g. `2024-05-01T12:30:00.250Z`
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn strip_reserved(mut fields: Fields) -> Fields {
    for key in RESERVED_FIELDS {
        fields.remove(key);
    }
    fields
}
