//! price_compare tool implementation.
//!
//! Runs one search across every storefront and returns the offer table
//! together with the best deal.

use dealscout_client::{SearchOptions, SessionProvider, run_search};
use dealscout_core::{AppConfig, SearchReport, sink::write_csv};
use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Input parameters for price_compare tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct PriceCompareParams {
    /// Product to search for (required).
    pub query: String,

    /// Scrape the storefronts concurrently. Defaults to the server configuration.
    #[serde(default)]
    pub parallel: Option<bool>,

    /// Also write the offer table to the configured CSV path (default: false).
    #[serde(default)]
    pub save: bool,
}

/// Output structure for price_compare tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PriceCompareOutput {
    /// Offers in site order plus the selected best deal.
    #[serde(flatten)]
    pub report: SearchReport,
    /// Human-readable best-deal line.
    pub summary: String,
    /// CSV path written, when `save` was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_to: Option<String>,
}

/// Implementation of the price_compare tool.
pub async fn compare_impl<P: SessionProvider>(
    provider: &P, config: &AppConfig, params: PriceCompareParams,
) -> Result<CallToolResult, McpError> {
    let mut options = SearchOptions::from(config);
    if let Some(parallel) = params.parallel {
        options.parallel = parallel;
    }

    let report = run_search(provider, &params.query, &options).await?;

    let saved_to = if params.save {
        write_csv(&report.offers, &config.output_path)?;
        Some(config.output_path.display().to_string())
    } else {
        None
    };

    let output = PriceCompareOutput { summary: report.best_deal.to_string(), saved_to, report };

    Ok(CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(&output).unwrap_or_default(),
    )]))
}
