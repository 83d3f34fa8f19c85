//! HTTP request handlers

pub mod health;
pub mod quotes;
pub mod tags;

use serde::{Deserialize, Serialize};

/// Confirmation returned by the write endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub message: String,
    pub id: String,
}

impl CreatedResponse {
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self {
            message: format!("Document written with ID: {id}"),
            id: id.to_string(),
        }
    }
}
