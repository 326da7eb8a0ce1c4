//! Quick demo of the MCP roster flow: start a provider in-process, then run
//! the full initialize / tools/call fetch against it.
//!
//! Usage: cargo run -p konsulent-server --example fetch_roster

use std::time::Duration;

use konsulent_core::mcp::RosterClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Start the provider on a random port with the built-in roster
    let config = konsulent_server::ProviderConfig {
        host: "127.0.0.1".to_string(),
        port: 0, // random port
        roster_path: None,
    };

    let addr = konsulent_server::start_provider_server(config).await?;
    println!("Roster provider started on {}", addr);

    // Give the server a moment to settle
    tokio::time::sleep(Duration::from_millis(200)).await;

    let client = RosterClient::new(format!("http://{}", addr));
    let consultants = client.fetch_consultants().await?;

    println!("\nFetched {} consultants:", consultants.len());
    for consultant in &consultants {
        println!(
            "  {} - {}% available ({})",
            consultant.name,
            consultant.availability_percent(),
            consultant.skills.join(", ")
        );
    }

    Ok(())
}
