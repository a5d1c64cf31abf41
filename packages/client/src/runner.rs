//! `connect` mode entry point.

use std::{io::IsTerminal, time::Duration};

use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_util::sync::CancellationToken;

use crate::{
    config::ClientConfig,
    console::spawn_console,
    error::ClientError,
    session::{SessionEnd, run_session},
};

/// Connect to a hub and relay between it and the terminal until the user
/// quits or the hub goes away.
pub async fn run(config: ClientConfig) -> Result<(), ClientError> {
    let url = config.url();
    tracing::info!("Connecting to {}...", url);
    let (ws, _response) = connect_async(url.as_str())
        .await
        .map_err(|source| ClientError::Connect {
            url: url.clone(),
            source: Box::new(source),
        })?;

    println!("Connected to server. Type your messages (press Ctrl+C to quit):");

    let shutdown = CancellationToken::new();
    spawn_interrupt_watcher(shutdown.clone());

    let mut input = spawn_console()?;
    let (output_tx, mut output_rx) = mpsc::unbounded_channel::<String>();
    let printer = tokio::spawn(async move {
        while let Some(message) = output_rx.recv().await {
            println!("Received: {message}");
        }
    });

    let end = run_session(ws, &mut input, shutdown, config.close_grace, output_tx).await?;
    let _ = tokio::time::timeout(Duration::from_millis(100), printer).await;
    tracing::debug!(?end, "session ended");

    if end == SessionEnd::ServerClosed && std::io::stdin().is_terminal() {
        // The console thread is still inside readline with the terminal in raw
        // mode; let it return before the process exits.
        println!("Connection closed by server. Press Enter to exit.");
        let _ = input.recv().await;
    }

    Ok(())
}

fn spawn_interrupt_watcher(shutdown: CancellationToken) {
    tokio::spawn(async move {
        tokio::select! {
            result = tokio::signal::ctrl_c() => match result {
                Ok(()) => shutdown.cancel(),
                Err(e) => tracing::warn!("failed to install Ctrl+C handler: {}", e),
            },
            _ = shutdown.cancelled() => {}
        }
    });
}
