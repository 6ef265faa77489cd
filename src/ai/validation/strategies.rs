//! proptest strategies for decoded model replies

use proptest::prelude::*;
use serde_json::{Value, json};

use crate::types::LooselyTypedRecord;

/// Arbitrary JSON up to three levels deep.
///
/// Floats are multiples of 0.25 so they survive a text round trip exactly.
pub(crate) fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        (-4.0e7f64..4.0e7).prop_map(|f| json!(f.round() / 4.0)),
        ".{0,12}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::hash_map("[a-z_]{1,8}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

/// Records mixing intent keys with unrelated ones
pub(crate) fn arb_record() -> impl Strategy<Value = LooselyTypedRecord> {
    let key = prop_oneof![
        Just("intent".to_string()),
        Just("categories".to_string()),
        Just("radius".to_string()),
        Just("mood".to_string()),
        Just("company".to_string()),
        Just("time_context".to_string()),
        Just("price_level".to_string()),
        Just("feature_tags".to_string()),
        "[a-z_]{1,10}",
    ];
    prop::collection::hash_map(key, arb_json(), 0..10)
        .prop_map(|m| m.into_iter().collect::<LooselyTypedRecord>())
}
