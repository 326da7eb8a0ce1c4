//! `konsulent server` - Start the query service.

pub async fn run(host: String, port: u16, provider_url: String) -> Result<(), String> {
    let config = konsulent_server::QueryConfig {
        host: host.clone(),
        port,
        provider_url,
    };

    println!("Starting query service on {}:{}...", host, port);

    let addr = konsulent_server::start_query_server(config).await?;
    println!("Query service listening on http://{}", addr);

    // Keep the process running until interrupted
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| format!("Failed to listen for Ctrl+C: {}", e))?;

    println!("\nShutting down...");
    Ok(())
}
