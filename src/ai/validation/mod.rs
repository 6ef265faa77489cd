//! Model Reply Validation
//!
//! Turns a raw model reply into a canonical intent in two fail-soft steps:
//! - `extract`: recover the JSON object from the reply text
//! - `sanitize`: coerce and clamp its fields into a `ParsedIntent`
//!
//! Neither step returns an error. Malformed output degrades toward defaults.

mod extract;
mod sanitize;
#[cfg(test)]
mod strategies;

pub use extract::extract_record;
pub use sanitize::{coerce_radius, sanitize_intent};

use serde_json::Value;

use crate::types::ParsedIntent;

/// Extract and sanitize in one step
pub fn parse_reply(reply: &str) -> ParsedIntent {
    sanitize_intent(&extract_record(reply))
}

/// Short name of a JSON value's type, for log lines
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
