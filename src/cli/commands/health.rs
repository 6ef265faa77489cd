//! Health Command
//!
//! Report service liveness and whether credentials are in place.

use serde::Serialize;

use crate::ai::provider::credential;
use crate::cli::Output;
use crate::config::Config;
use crate::constants::{geosearch, llm};
use crate::types::Result;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub provider: String,
    pub model: String,
    pub llm_credentials: bool,
    pub geosearch_credentials: bool,
}

impl HealthReport {
    pub fn collect(config: &Config) -> Self {
        let llm_credentials = credential(config.llm.folder_id.clone(), llm::FOLDER_ID_ENV)
            .is_some()
            && credential(config.llm.api_key.clone(), llm::API_KEY_ENV).is_some();

        Self {
            status: "healthy",
            service: "Adventure",
            version: env!("CARGO_PKG_VERSION"),
            provider: config.llm.provider.clone(),
            model: config.llm.model.clone(),
            llm_credentials,
            geosearch_credentials: credential(
                config.geosearch.api_key.clone(),
                geosearch::API_KEY_ENV,
            )
            .is_some(),
        }
    }
}

pub fn run(config: &Config, format: &str) -> Result<()> {
    let output = Output::new();
    let report = HealthReport::collect(config);

    if format == "json" {
        return output.json(&report);
    }

    output.success(&format!(
        "{} {} is {}",
        report.service, report.version, report.status
    ));
    output.field("provider", Some(&report.provider));
    output.field("model", Some(&report.model));

    if !report.llm_credentials {
        output.warning(&format!(
            "Completion credentials missing: set {} and {}",
            llm::FOLDER_ID_ENV,
            llm::API_KEY_ENV
        ));
    }
    if !report.geosearch_credentials {
        output.warning(&format!(
            "Geosearch key missing: set {}",
            geosearch::API_KEY_ENV
        ));
    }

    Ok(())
}
