//! Demo server for the strict JSON codec.
//!
//! ```text
//! json-codec --bind 127.0.0.1:8080 --max-json-size 4096
//! curl -H 'Content-Type: application/json' -d '{"message":"hi"}' localhost:8080/echo
//! ```

use clap::Parser as ClapParser;
use tokio::net::TcpListener;

use json_codec::config::ParserConfig;
use json_codec::http::{HttpServer, Parser};
use json_codec::observability::logging;

#[derive(ClapParser)]
#[command(name = "json-codec")]
#[command(about = "Echo server demonstrating the strict JSON codec", long_about = None)]
struct Cli {
    /// Address to listen on.
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    bind: String,

    /// Maximum request body size in bytes (0 = 1 MiB default).
    #[arg(long, default_value_t = 0)]
    max_json_size: usize,

    /// Accept object keys the handler does not declare.
    #[arg(long)]
    allow_unknown_fields: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(logging::DEFAULT_FILTER);

    let config = ParserConfig {
        max_json_size: cli.max_json_size,
        allow_unknown_fields: cli.allow_unknown_fields,
    };

    tracing::info!(
        max_json_size = config.effective_max_json_size(),
        allow_unknown_fields = config.allow_unknown_fields,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&cli.bind).await?;
    let server = HttpServer::new(Parser::new(config));
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
