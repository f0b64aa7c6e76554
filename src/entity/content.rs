// src/entity/content.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::nullable::{self, zero_time};

/// One block of text inside a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(default, deserialize_with = "nullable::or_default")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable::or_default")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable::or_default")]
    pub text: String,
    #[serde(default = "zero_time", deserialize_with = "nullable::or_zero_time")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "zero_time", deserialize_with = "nullable::or_zero_time")]
    pub updated_at: DateTime<Utc>,
}

impl Content {
    pub fn new(id: impl Into<String>, title: impl Into<String>, text: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            title: title.into(),
            text: text.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Default for Content {
    fn default() -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            text: String::new(),
            created_at: zero_time(),
            updated_at: zero_time(),
        }
    }
}
