//! Payload extraction
//!
//! Recovers the JSON object from a model reply. The model is asked for bare
//! JSON but sometimes wraps it in a markdown code fence; a fenced reply is cut
//! down to the span between the first `{` and the last `}`.
//!
//! Extraction never fails: anything that does not decode to a JSON object
//! yields an empty record and the sanitizer fills in defaults.

use serde_json::Value;
use tracing::debug;

use super::json_kind;
use crate::types::LooselyTypedRecord;

const CODE_FENCE: &str = "```";

/// Decode the JSON object carried by a model reply
pub fn extract_record(reply: &str) -> LooselyTypedRecord {
    if reply.is_empty() {
        return LooselyTypedRecord::new();
    }

    let payload = strip_code_fence(reply);

    match serde_json::from_str::<Value>(payload) {
        Ok(Value::Object(record)) => record,
        Ok(other) => {
            debug!("Reply decoded to {} instead of an object", json_kind(&other));
            LooselyTypedRecord::new()
        }
        Err(e) => {
            debug!("Reply is not valid JSON: {}", e);
            LooselyTypedRecord::new()
        }
    }
}

/// Narrow a fenced reply to its outermost brace pair.
///
/// Unfenced replies, and fenced replies without a `{ ... }` span, are
/// returned unchanged.
fn strip_code_fence(reply: &str) -> &str {
    if !reply.starts_with(CODE_FENCE) {
        return reply;
    }

    match (reply.find('{'), reply.rfind('}')) {
        (Some(start), Some(end)) if start < end => &reply[start..=end],
        _ => reply,
    }
}
