//! Konsulent CLI - start the consultant services or query them from the
//! terminal.
//!
//! Reuses the same core domain logic (konsulent-core) and server bootstrap
//! (konsulent-server) that back the two HTTP processes.

mod commands;

use clap::{Parser, Subcommand};

/// Konsulent CLI - consultant availability services
#[derive(Parser)]
#[command(
    name = "konsulent",
    version,
    about = "Konsulent CLI - consultant availability services"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the roster provider (MCP Streamable HTTP server)
    Provider {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// Port to listen on
        #[arg(long, default_value_t = 4100)]
        port: u16,
        /// Path to a YAML roster file (built-in roster when omitted)
        #[arg(long)]
        roster: Option<String>,
    },

    /// Start the query service (REST summary endpoint)
    Server {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// Port to listen on
        #[arg(long, default_value_t = 4000)]
        port: u16,
        /// Base URL of the roster provider
        #[arg(
            long,
            env = "KONSULENT_PROVIDER_URL",
            default_value = "http://127.0.0.1:4100"
        )]
        provider_url: String,
    },

    /// Fetch, filter, and summarize once from the terminal
    Query {
        /// Base URL of the roster provider
        #[arg(
            long,
            env = "KONSULENT_PROVIDER_URL",
            default_value = "http://127.0.0.1:4100"
        )]
        provider_url: String,
        /// Minimum availability percentage (0-100)
        #[arg(long)]
        min_availability: u8,
        /// Comma-separated skills the consultant must hold
        #[arg(long)]
        skills: Option<String>,
        /// Print the filtered roster as JSON instead of calling the LLM
        #[arg(long)]
        raw: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "konsulent_core=warn,konsulent_server=warn,konsulent=info".into()
            }),
        )
        .init();

    let result = if let Some(command) = cli.command {
        match command {
            Commands::Provider { host, port, roster } => {
                commands::provider::run(host, port, roster).await
            }

            Commands::Server {
                host,
                port,
                provider_url,
            } => commands::server::run(host, port, provider_url).await,

            Commands::Query {
                provider_url,
                min_availability,
                skills,
                raw,
            } => commands::query::run(&provider_url, min_availability, skills.as_deref(), raw).await,
        }
    } else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help().ok();
        println!();
        Ok(())
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
