use serde::{Deserialize, Serialize};
use serde_json::Value;

/// List endpoints answer either with a bare array or with the array wrapped
/// under `data`. A wrapper whose `data` is missing or null reads as empty.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CollectionResponse {
    Bare(Vec<Value>),
    Wrapped {
        #[serde(default)]
        data: Option<Vec<Value>>,
    },
}

impl CollectionResponse {
    pub fn into_items(self) -> Vec<Value> {
        match self {
            CollectionResponse::Bare(items) => items,
            CollectionResponse::Wrapped { data } => data.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DetailResponse {
    Wrapped { data: Value },
    Bare(Value),
}

impl DetailResponse {
    pub fn into_item(self) -> Value {
        match self {
            DetailResponse::Wrapped { data } => data,
            DetailResponse::Bare(item) => item,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
