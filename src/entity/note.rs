// src/entity/note.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::nullable::{self, zero_time};
use super::Content;

/// A note as the client sends it. Fields absent from the payload fall back
/// to their zero values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    #[serde(default, deserialize_with = "nullable::or_default")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable::or_default")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable::items_or_default")]
    pub content: Vec<Content>,
    #[serde(default = "zero_time", deserialize_with = "nullable::or_zero_time")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "zero_time", deserialize_with = "nullable::or_zero_time")]
    pub updated_at: DateTime<Utc>,
}

impl Note {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            title: title.into(),
            content: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Default for Note {
    fn default() -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            content: Vec::new(),
            created_at: zero_time(),
            updated_at: zero_time(),
        }
    }
}
