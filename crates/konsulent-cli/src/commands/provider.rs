//! `konsulent provider` - Start the roster provider server.

pub async fn run(host: String, port: u16, roster: Option<String>) -> Result<(), String> {
    let config = konsulent_server::ProviderConfig {
        host: host.clone(),
        port,
        roster_path: roster,
    };

    println!("Starting roster provider on {}:{}...", host, port);

    let addr = konsulent_server::start_provider_server(config).await?;
    println!("Roster provider listening on http://{}/mcp", addr);

    // Keep the process running until interrupted
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| format!("Failed to listen for Ctrl+C: {}", e))?;

    println!("\nShutting down...");
    Ok(())
}
