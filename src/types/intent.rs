//! Parsed venue intent and the response envelope around it

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Untyped key/value record decoded from a model reply.
///
/// The model's output shape is untrusted, so it stays untyped until the
/// sanitizer narrows it into a [`ParsedIntent`].
pub type LooselyTypedRecord = Map<String, Value>;

/// Price tier requested by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceLevel {
    None,
    Low,
    Medium,
    High,
    Premium,
}

impl PriceLevel {
    pub const ALL: [PriceLevel; 5] = [
        PriceLevel::None,
        PriceLevel::Low,
        PriceLevel::Medium,
        PriceLevel::High,
        PriceLevel::Premium,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceLevel::None => "none",
            PriceLevel::Low => "low",
            PriceLevel::Medium => "medium",
            PriceLevel::High => "high",
            PriceLevel::Premium => "premium",
        }
    }
}

impl std::fmt::Display for PriceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PriceLevel {
    type Err = String;

    /// Exact, case-sensitive match against the five tiers
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "Unknown price level: {}. Valid values: none, low, medium, high, premium",
                    s
                )
            })
    }
}

/// Canonical, bounded representation of a venue request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedIntent {
    /// Concrete venue types (bar, restaurant, cafe)
    pub intent: Vec<String>,
    /// Broader categories (italian cuisine, craft beer)
    pub categories: Vec<String>,
    /// Search radius in meters, within [100, 50000] when present
    pub radius: Option<i64>,
    /// Desired atmosphere
    pub mood: Option<String>,
    /// Who the user is going with
    pub company: Option<String>,
    /// When the visit is planned
    pub time_context: Option<String>,
    pub price_level: Option<PriceLevel>,
    /// Extra requirements (live music, terrace)
    pub feature_tags: Vec<String>,
}

impl ParsedIntent {
    /// Convert back into an untyped record
    pub fn to_record(&self) -> LooselyTypedRecord {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => LooselyTypedRecord::new(),
        }
    }
}

/// Result of one parse request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseResponse {
    pub request_id: Uuid,
    pub user_id: i64,
    pub parsed_query: ParsedIntent,
    pub processing_time_ms: u64,
}

impl ParseResponse {
    pub fn new(
        request_id: Uuid,
        user_id: i64,
        parsed_query: ParsedIntent,
        processing_time_ms: u64,
    ) -> Self {
        Self {
            request_id,
            user_id,
            parsed_query,
            processing_time_ms,
        }
    }
}
