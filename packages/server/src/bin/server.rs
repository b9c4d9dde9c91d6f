//! Real-time classroom Q&A server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin undoubt-server
//! cargo run --bin undoubt-server -- --host 0.0.0.0 --port 3000 --notify-rejections
//! ```

use clap::Parser;
use undoubt_server::{
    config::ServerConfig,
    ui::{AppState, Server},
};
use undoubt_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "undoubt-server")]
#[command(about = "Real-time classroom Q&A server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "UNDOUBT_HOST", default_value = ServerConfig::DEFAULT_HOST)]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "UNDOUBT_PORT", default_value_t = ServerConfig::DEFAULT_PORT)]
    port: u16,

    /// Outbound queue capacity per connection; slower clients are disconnected
    #[arg(
        long,
        env = "UNDOUBT_OUTBOUND_CAPACITY",
        default_value_t = ServerConfig::DEFAULT_OUTBOUND_QUEUE_CAPACITY
    )]
    outbound_capacity: usize,

    /// Tell senders when their event was dropped (otherwise drops are silent)
    #[arg(long, env = "UNDOUBT_NOTIFY_REJECTIONS")]
    notify_rejections: bool,

    /// Attempts to find a free generated room id
    #[arg(long, default_value_t = ServerConfig::DEFAULT_ROOM_ID_ATTEMPTS)]
    room_id_attempts: usize,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            outbound_queue_capacity: args.outbound_capacity,
            notify_rejections: args.notify_rejections,
            room_id_attempts: args.room_id_attempts,
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let config = ServerConfig::from(Args::parse());
    tracing::debug!("Starting with {:?}", config);

    let server = Server::new(AppState::in_memory(config));
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
