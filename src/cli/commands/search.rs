//! Search Command
//!
//! Query the organization search API directly and print its raw response.
//!
//! Usage:
//!   adventure search "кофейня" [--lat 55.75 --lon 37.62] [--radius 1000] [--results 5]
//!   adventure search "кофейня" --raw

use crate::cli::Output;
use crate::config::Config;
use crate::geosearch::{GeosearchClient, SearchArea};
use crate::types::{AdventureError, Result};

pub struct SearchOptions {
    pub text: String,
    pub area: SearchArea,
    /// Text-only search with the larger page size
    pub raw: bool,
}

pub async fn run(config: &Config, options: SearchOptions) -> Result<()> {
    if options.text.trim().is_empty() {
        return Err(AdventureError::Validation(
            "Search text must not be empty".to_string(),
        ));
    }

    let client = GeosearchClient::new(&config.geosearch)?;

    let body = if options.raw {
        client.search_raw(&options.text).await?
    } else {
        client.search(&options.text, &options.area).await?
    };

    Output::new().json(&body)
}
