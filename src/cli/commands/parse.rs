//! Parse Command
//!
//! Normalize a free-text venue request into a structured intent.
//!
//! Usage:
//!   adventure parse "Хочу в тихий бар с друзьями" [--user-id 42] [-f json]
//!   adventure parse --request '{"user_id": 42, "text": "..."}'

use serde_json::json;

use crate::cli::Output;
use crate::config::Config;
use crate::pipeline::IntentPipeline;
use crate::types::{AdventureError, ParseResponse, Result, UserQuery};

pub struct ParseOptions {
    pub text: Option<String>,
    pub user_id: i64,
    /// Raw JSON request body; takes precedence over `text`
    pub request: Option<String>,
    pub format: String,
}

pub async fn run(config: &Config, options: ParseOptions) -> Result<()> {
    let output = Output::new();
    let as_json = options.format == "json";

    let query = build_query(&options)?;
    let pipeline = IntentPipeline::from_config(&config.llm)?;

    match pipeline.process(&query).await {
        Ok(response) if as_json => output.json(&response),
        Ok(response) => {
            print_response(&output, &response);
            Ok(())
        }
        Err(e) => {
            if as_json {
                output.json(&error_body(&e))?;
            }
            Err(e)
        }
    }
}

fn build_query(options: &ParseOptions) -> Result<UserQuery> {
    match (&options.request, &options.text) {
        (Some(body), _) => serde_json::from_str(body)
            .map_err(|e| AdventureError::Validation(format!("Invalid request: {}", e))),
        (None, Some(text)) => UserQuery::new(options.user_id, text.as_str()),
        (None, None) => Err(AdventureError::Validation(
            "Either query text or --request is required".to_string(),
        )),
    }
}

/// Error payload in the shape an HTTP front end would return
fn error_body(err: &AdventureError) -> serde_json::Value {
    json!({
        "status_code": err.status_code(),
        "detail": err.to_string(),
    })
}

fn print_response(output: &Output, response: &ParseResponse) {
    let intent = &response.parsed_query;
    let radius = intent.radius.map(|r| format!("{} m", r));
    let price = intent.price_level.map(|p| p.to_string());

    output.header("Parsed query");
    output.field("intent", Some(&intent.intent.join(", ")));
    output.field("categories", Some(&intent.categories.join(", ")));
    output.field("radius", radius.as_deref());
    output.field("mood", intent.mood.as_deref());
    output.field("company", intent.company.as_deref());
    output.field("time", intent.time_context.as_deref());
    output.field("price", price.as_deref());
    output.field("features", Some(&intent.feature_tags.join(", ")));
    println!();
    output.success(&format!(
        "Request {} for user {} ({} ms)",
        response.request_id, response.user_id, response.processing_time_ms
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(text: Option<&str>, request: Option<&str>) -> ParseOptions {
        ParseOptions {
            text: text.map(String::from),
            user_id: 7,
            request: request.map(String::from),
            format: "json".into(),
        }
    }

    #[test]
    fn test_query_from_text() {
        let query = build_query(&options(Some("кафе"), None)).unwrap();
        assert_eq!(query.user_id(), 7);
        assert_eq!(query.text(), "кафе");
    }

    #[test]
    fn test_request_body_wins() {
        let query = build_query(&options(
            Some("кафе"),
            Some(r#"{"user_id": 123, "text": "Хочу в тихий бар с друзьями"}"#),
        ))
        .unwrap();
        assert_eq!(query.user_id(), 123);
        assert_eq!(query.text(), "Хочу в тихий бар с друзьями");
    }

    #[test]
    fn test_invalid_request_is_validation_error() {
        for body in [r#"{"user_id": 1, "text": ""}"#, r#"{"text": "бар"}"#, "not json"] {
            let err = build_query(&options(None, Some(body))).unwrap_err();
            assert_eq!(err.status_code(), 422, "body: {body}");
        }
    }

    #[test]
    fn test_missing_input() {
        assert!(matches!(
            build_query(&options(None, None)),
            Err(AdventureError::Validation(_))
        ));
    }

    #[test]
    fn test_error_body() {
        let err = AdventureError::timeout("completion", std::time::Duration::from_secs(15));
        let body = error_body(&err);
        assert_eq!(body["status_code"], 500);
        assert!(body["detail"].as_str().unwrap().contains("TIMEOUT"));
    }
}
