//! `konsulent query` - One-shot fetch, filter, and summarize.

use konsulent_core::filter::filter_consultants;
use konsulent_core::mcp::RosterClient;
use konsulent_core::summary::{Summarizer, SummarizerConfig};

use super::print_json;

pub async fn run(
    provider_url: &str,
    min_availability: u8,
    skills: Option<&str>,
    raw: bool,
) -> Result<(), String> {
    if min_availability > 100 {
        return Err(format!(
            "min-availability must be between 0 and 100, got {}",
            min_availability
        ));
    }

    let client = RosterClient::new(provider_url);
    let roster = client
        .fetch_consultants()
        .await
        .map_err(|e| e.to_string())?;
    let filtered = filter_consultants(&roster, min_availability, skills);

    if raw {
        let value = serde_json::to_value(&filtered).map_err(|e| e.to_string())?;
        print_json(&value);
        return Ok(());
    }

    let config = SummarizerConfig::from_env().map_err(|e| e.to_string())?;
    let summarizer = Summarizer::new(config);
    let summary = summarizer
        .summarize(&filtered, min_availability, skills)
        .await
        .map_err(|e| e.to_string())?;

    print_json(&serde_json::json!({ "sammendrag": summary }));
    Ok(())
}
