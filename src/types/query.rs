//! Inbound user query

use serde::{Deserialize, Serialize};

use super::error::{AdventureError, Result};
use crate::constants::query::{MAX_TEXT_CHARS, MIN_TEXT_CHARS};

/// A natural-language venue request from one user.
///
/// Construction validates the text length, so a `UserQuery` in hand is always
/// safe to hand to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawUserQuery")]
pub struct UserQuery {
    user_id: i64,
    text: String,
}

#[derive(Deserialize)]
struct RawUserQuery {
    user_id: i64,
    text: String,
}

impl TryFrom<RawUserQuery> for UserQuery {
    type Error = AdventureError;

    fn try_from(raw: RawUserQuery) -> Result<Self> {
        Self::new(raw.user_id, raw.text)
    }
}

impl UserQuery {
    pub fn new(user_id: i64, text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        let chars = text.chars().count();

        if chars < MIN_TEXT_CHARS {
            return Err(AdventureError::Validation(
                "text must not be empty".to_string(),
            ));
        }
        if chars > MAX_TEXT_CHARS {
            return Err(AdventureError::Validation(format!(
                "text must be at most {} characters, got {}",
                MAX_TEXT_CHARS, chars
            )));
        }

        Ok(Self { user_id, text })
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
