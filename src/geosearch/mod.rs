//! Organization search client
//!
//! Thin pass-through to the Yandex Maps organization search API. Responses
//! are returned as untyped JSON; nothing is validated beyond the HTTP status.

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, info};

use crate::ai::provider::{credential, validate_endpoint};
use crate::config::GeosearchConfig;
use crate::constants::geosearch::{
    API_KEY_ENV, LANG, METERS_PER_DEGREE, RAW_SEARCH_RESULTS, SEARCH_TYPE,
};
use crate::types::{AdventureError, Result};

/// Location and paging options for a search
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SearchArea {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Search radius in meters
    pub radius: Option<i64>,
    /// Results per page; the configured default when absent
    pub results: Option<u32>,
}

pub struct GeosearchClient {
    api_key: SecretString,
    endpoint: String,
    default_results: u32,
    client: reqwest::Client,
}

impl std::fmt::Debug for GeosearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeosearchClient")
            .field("api_key", &"[REDACTED]")
            .field("endpoint", &self.endpoint)
            .field("default_results", &self.default_results)
            .finish()
    }
}

impl GeosearchClient {
    pub fn new(config: &GeosearchConfig) -> Result<Self> {
        let api_key = credential(config.api_key.clone(), API_KEY_ENV).ok_or_else(|| {
            AdventureError::Config(format!(
                "Geosearch API key not found. Set {} env var or geosearch.api_key in config",
                API_KEY_ENV
            ))
        })?;

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AdventureError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key: SecretString::from(api_key),
            endpoint: format!("{}/", validate_endpoint(&config.api_base)?),
            default_results: config.results,
            client,
        })
    }

    /// Search organizations near an optional point
    pub async fn search(&self, text: &str, area: &SearchArea) -> Result<Value> {
        let results = area.results.unwrap_or(self.default_results);
        self.get(text, build_params(text, area, results)).await
    }

    /// Search organizations by text alone
    pub async fn search_raw(&self, query: &str) -> Result<Value> {
        self.get(query, build_params(query, &SearchArea::default(), RAW_SEARCH_RESULTS))
            .await
    }

    async fn get(&self, text: &str, params: Vec<(&'static str, String)>) -> Result<Value> {
        debug!("Geosearch request: {:?}", params);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("apikey", self.api_key.expose_secret())])
            .query(&params)
            .send()
            .await
            .map_err(|e| AdventureError::Geosearch(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdventureError::Geosearch(format!(
                "Geosearch API error ({}): {}",
                status, body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AdventureError::Geosearch(format!("Failed to parse response: {}", e)))?;

        info!("Geosearch for '{}' succeeded", text);
        Ok(body)
    }
}

/// Query parameters other than the API key.
///
/// `ll` needs both coordinates. `spn` is derived from the radius and is only
/// sent when a latitude is present.
fn build_params(text: &str, area: &SearchArea, results: u32) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("text", text.to_string()),
        ("lang", LANG.to_string()),
        ("type", SEARCH_TYPE.to_string()),
        ("results", results.to_string()),
    ];

    if let (Some(lat), Some(lon)) = (area.latitude, area.longitude) {
        params.push(("ll", format!("{},{}", lon, lat)));
    }

    if let Some(radius) = area.radius
        && area.latitude.is_some()
    {
        let span = radius as f64 / METERS_PER_DEGREE * 2.0;
        params.push(("spn", format!("{:.6},{:.6}", span, span)));
    }

    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(api_base: &str) -> GeosearchConfig {
        GeosearchConfig {
            api_key: Some("geo-key".into()),
            api_base: api_base.into(),
            ..Default::default()
        }
    }

    fn param<'a>(params: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_params_text_only() {
        let params = build_params("кафе", &SearchArea::default(), 10);
        assert_eq!(param(&params, "text"), Some("кафе"));
        assert_eq!(param(&params, "lang"), Some("ru_RU"));
        assert_eq!(param(&params, "type"), Some("biz"));
        assert_eq!(param(&params, "results"), Some("10"));
        assert_eq!(param(&params, "ll"), None);
        assert_eq!(param(&params, "spn"), None);
    }

    #[test]
    fn test_params_point_and_radius() {
        let area = SearchArea {
            latitude: Some(55.75),
            longitude: Some(37.62),
            radius: Some(1110),
            results: None,
        };
        let params = build_params("бар", &area, 5);
        assert_eq!(param(&params, "ll"), Some("37.62,55.75"));
        assert_eq!(param(&params, "spn"), Some("0.020000,0.020000"));
    }

    #[test]
    fn test_params_radius_needs_latitude() {
        let area = SearchArea {
            longitude: Some(37.62),
            radius: Some(1000),
            ..Default::default()
        };
        let params = build_params("бар", &area, 5);
        assert_eq!(param(&params, "ll"), None);
        assert_eq!(param(&params, "spn"), None);

        let area = SearchArea {
            latitude: Some(55.75),
            radius: Some(1000),
            ..Default::default()
        };
        let params = build_params("бар", &area, 5);
        assert_eq!(param(&params, "ll"), None);
        assert!(param(&params, "spn").is_some());
    }

    #[test]
    fn test_missing_key_is_config_error() {
        figment::Jail::expect_with(|jail| {
            jail.set_env(API_KEY_ENV, "");
            let err = GeosearchClient::new(&GeosearchConfig::default()).unwrap_err();
            assert!(matches!(err, AdventureError::Config(_)));
            Ok(())
        });
    }

    #[test]
    fn test_key_from_env() {
        figment::Jail::expect_with(|jail| {
            jail.set_env(API_KEY_ENV, "from-env");
            assert!(GeosearchClient::new(&GeosearchConfig::default()).is_ok());
            Ok(())
        });
    }

    #[test]
    fn test_debug_redacts_key() {
        let client = GeosearchClient::new(&config("https://search-maps.yandex.ru/v1/")).unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains("geo-key"));
        assert!(debug.contains("search-maps.yandex.ru/v1/"));
    }

    #[tokio::test]
    async fn test_search_sends_params() {
        let server = MockServer::start().await;
        let body = json!({"type": "FeatureCollection", "features": []});
        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("apikey", "geo-key"))
            .and(query_param("text", "бар"))
            .and(query_param("results", "3"))
            .and(query_param("ll", "37.62,55.75"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .expect(1)
            .mount(&server)
            .await;

        let client = GeosearchClient::new(&config(&server.uri())).unwrap();
        let area = SearchArea {
            latitude: Some(55.75),
            longitude: Some(37.62),
            radius: None,
            results: Some(3),
        };
        assert_eq!(client.search("бар", &area).await.unwrap(), body);
    }

    #[tokio::test]
    async fn test_search_raw_uses_twenty_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("text", "музей"))
            .and(query_param("results", "20"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"features": []})))
            .expect(1)
            .mount(&server)
            .await;

        let client = GeosearchClient::new(&config(&server.uri())).unwrap();
        assert!(client.search_raw("музей").await.is_ok());
    }

    #[tokio::test]
    async fn test_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("Invalid key"))
            .mount(&server)
            .await;

        let client = GeosearchClient::new(&config(&server.uri())).unwrap();
        let err = client.search_raw("бар").await.unwrap_err();
        match err {
            AdventureError::Geosearch(msg) => assert!(msg.contains("Invalid key")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
