//! Fanout command line.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin fanout -- start --port 8080
//! cargo run --bin fanout -- connect --host localhost --port 8080
//! cargo run --bin fanout -- connect -host localhost -port 8080
//! ```

use fanout::cli::{Cli, Command};
use fanout_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_normalized();
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    match cli.command {
        Command::Start(args) => {
            if let Err(e) = fanout::run_server(args.into()).await {
                tracing::error!("Server error: {}", e);
                std::process::exit(1);
            }
        }
        Command::Connect(args) => {
            if let Err(e) = fanout::run_client(args.into()).await {
                tracing::error!("Client error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
