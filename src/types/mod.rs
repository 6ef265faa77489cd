pub mod error;
pub mod intent;
pub mod query;

pub use error::{AdventureError, ErrorCategory, ErrorClassifier, LlmError, Result};
pub use intent::{LooselyTypedRecord, ParseResponse, ParsedIntent, PriceLevel};
pub use query::UserQuery;
