use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    PropertyListing,
    VisitRequest,
    LocationRequest,
    MoveRequest,
    OwnerPosting,
}

impl RecordKind {
    pub const ALL: [RecordKind; 5] = [
        RecordKind::PropertyListing,
        RecordKind::VisitRequest,
        RecordKind::LocationRequest,
        RecordKind::MoveRequest,
        RecordKind::OwnerPosting,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RecordKind::PropertyListing => "Properties",
            RecordKind::VisitRequest => "Visit Requests",
            RecordKind::LocationRequest => "Location Requests",
            RecordKind::MoveRequest => "Move Requests",
            RecordKind::OwnerPosting => "Owner Postings",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            RecordKind::PropertyListing => "properties",
            RecordKind::VisitRequest => "visits",
            RecordKind::LocationRequest => "locations",
            RecordKind::MoveRequest => "moves",
            RecordKind::OwnerPosting => "owner-postings",
        }
    }

    pub fn statuses(self) -> StatusVocabulary {
        match self {
            RecordKind::PropertyListing => StatusVocabulary::LISTING,
            RecordKind::VisitRequest | RecordKind::LocationRequest | RecordKind::MoveRequest => {
                StatusVocabulary::REQUEST
            }
            RecordKind::OwnerPosting => StatusVocabulary::POSTING,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Error)]
#[error("unknown record kind '{0}' (expected one of: properties, visits, locations, moves, owner-postings)")]
pub struct UnknownRecordKind(pub String);

impl FromStr for RecordKind {
    type Err = UnknownRecordKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "properties" | "property" | "property-listing" | "listings" => {
                Ok(RecordKind::PropertyListing)
            }
            "visits" | "visit" | "visit-request" => Ok(RecordKind::VisitRequest),
            "locations" | "location" | "location-request" => Ok(RecordKind::LocationRequest),
            "moves" | "move" | "move-request" | "shift" => Ok(RecordKind::MoveRequest),
            "owner-postings" | "owner-posting" | "owners" | "owner-request" => {
                Ok(RecordKind::OwnerPosting)
            }
            _ => Err(UnknownRecordKind(s.to_string())),
        }
    }
}

/// The closed set of status values a record kind accepts, with the value used
/// whenever a record carries no status or one outside the set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusVocabulary {
    values: &'static [&'static str],
    default: &'static str,
}

impl StatusVocabulary {
    pub const LISTING: Self = Self {
        values: &["Open", "Closed"],
        default: "Open",
    };
    pub const REQUEST: Self = Self {
        values: &["pending", "completed", "cancelled"],
        default: "pending",
    };
    pub const POSTING: Self = Self {
        values: &["Pending", "Approved", "Rejected"],
        default: "Pending",
    };

    pub fn values(&self) -> &'static [&'static str] {
        self.values
    }

    pub fn default_status(&self) -> &'static str {
        self.default
    }

    /// Case-insensitive lookup returning the canonical spelling.
    pub fn recognize(&self, raw: &str) -> Option<&'static str> {
        let raw = raw.trim();
        self.values
            .iter()
            .copied()
            .find(|candidate| candidate.eq_ignore_ascii_case(raw))
    }

    pub fn resolve(&self, raw: Option<&str>) -> &'static str {
        raw.and_then(|value| self.recognize(value))
            .unwrap_or(self.default)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordShapeError {
    #[error("record is not a JSON object")]
    NotAnObject,
    #[error("record has no usable identity (_id or id)")]
    MissingIdentity,
}

/// One server-side entity as fetched. Field sets differ per kind, so the
/// payload is kept as a JSON object and read through dotted field paths.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: RecordId,
    fields: Map<String, Value>,
}

impl Record {
    pub fn from_value(value: Value) -> Result<Self, RecordShapeError> {
        let Value::Object(fields) = value else {
            return Err(RecordShapeError::NotAnObject);
        };
        let id = ["_id", "id"]
            .iter()
            .find_map(|key| identity_text(fields.get(*key)?))
            .ok_or(RecordShapeError::MissingIdentity)?;
        Ok(Self {
            id: RecordId(id),
            fields,
        })
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn raw_status(&self) -> Option<&str> {
        self.fields.get("status").and_then(Value::as_str)
    }

    pub fn set_status(&mut self, status: &str) {
        self.fields
            .insert("status".to_string(), Value::String(status.to_string()));
    }

    /// Resolves a dotted path such as `property.building`.
    pub fn field(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.fields.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Display text for a field; anything missing or non-scalar reads as "".
    pub fn field_text(&self, path: &str) -> String {
        match self.field(path) {
            Some(Value::String(text)) => text.clone(),
            Some(Value::Number(number)) => number.to_string(),
            Some(Value::Bool(flag)) => flag.to_string(),
            _ => String::new(),
        }
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.fields.get("createdAt")?.as_str()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|ts| ts.with_timezone(&Utc))
    }
}

fn identity_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
