//! Intent sanitization
//!
//! Narrows an untyped record into a [`ParsedIntent`]. Every field is handled
//! on its own and a bad field degrades to its default, so sanitization is
//! total: any record, however malformed, produces a valid intent.
//!
//! | field                           | rule                                        |
//! |---------------------------------|---------------------------------------------|
//! | intent, categories, feature_tags| array of strings, otherwise empty           |
//! | radius                          | rounded and clamped to [100, 50000]; 5000 if not numeric |
//! | mood, company, time_context     | string, otherwise absent                    |
//! | price_level                     | one of the five tiers, otherwise absent     |

use serde_json::Value;
use tracing::debug;

use super::json_kind;
use crate::constants::radius::{FALLBACK_METERS, MAX_METERS, MIN_METERS};
use crate::types::{LooselyTypedRecord, ParsedIntent, PriceLevel};

/// Build the canonical intent from a decoded reply
pub fn sanitize_intent(record: &LooselyTypedRecord) -> ParsedIntent {
    ParsedIntent {
        intent: string_list(record, "intent"),
        categories: string_list(record, "categories"),
        radius: record.get("radius").and_then(coerce_radius),
        mood: optional_string(record, "mood"),
        company: optional_string(record, "company"),
        time_context: optional_string(record, "time_context"),
        price_level: record.get("price_level").and_then(price_level),
        feature_tags: string_list(record, "feature_tags"),
    }
}

/// Coerce a radius value to meters within bounds.
///
/// `null` means unspecified. Numbers and numeric strings are rounded and
/// clamped; any other value falls back to the default radius.
pub fn coerce_radius(value: &Value) -> Option<i64> {
    let meters = match value {
        Value::Null => return None,
        Value::Number(n) => n
            .as_i64()
            .map(clamp_meters)
            .or_else(|| n.as_f64().and_then(round_meters)),
        Value::String(s) => parse_meters(s),
        _ => None,
    };

    Some(meters.unwrap_or_else(|| {
        debug!(
            "radius is not numeric ({}), using {}",
            json_kind(value),
            FALLBACK_METERS
        );
        FALLBACK_METERS
    }))
}

fn parse_meters(s: &str) -> Option<i64> {
    let s = s.trim();
    s.parse::<i64>()
        .ok()
        .map(clamp_meters)
        .or_else(|| s.parse::<f64>().ok().and_then(round_meters))
}

fn clamp_meters(meters: i64) -> i64 {
    meters.clamp(MIN_METERS, MAX_METERS)
}

fn round_meters(meters: f64) -> Option<i64> {
    meters
        .is_finite()
        .then(|| meters.round().clamp(MIN_METERS as f64, MAX_METERS as f64) as i64)
}

fn string_list(record: &LooselyTypedRecord, key: &str) -> Vec<String> {
    match record.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(String::from))
            .collect(),
        Some(other) => {
            debug!("{} should be an array, got {}", key, json_kind(other));
            Vec::new()
        }
        None => Vec::new(),
    }
}

fn optional_string(record: &LooselyTypedRecord, key: &str) -> Option<String> {
    record.get(key)?.as_str().map(String::from)
}

fn price_level(value: &Value) -> Option<PriceLevel> {
    let level = value.as_str()?.parse().ok();
    if level.is_none() {
        debug!("Rejecting price_level {}", value);
    }
    level
}
