//! Line input from the terminal.
//!
//! rustyline blocks, so it runs on its own OS thread and forwards what it
//! reads over a channel.

use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleInput {
    Line(String),
    /// Ctrl+C while reading a line
    Interrupted,
    /// Ctrl+D or end of piped input
    Eof,
}

/// Start reading lines on a dedicated thread.
///
/// The thread ends after forwarding `Interrupted` or `Eof`, or once the
/// receiver is dropped and the next line has been read.
pub fn spawn_console() -> std::io::Result<mpsc::Receiver<ConsoleInput>> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::Builder::new()
        .name("console".to_string())
        .spawn(move || read_lines(&tx))?;
    Ok(rx)
}

fn read_lines(tx: &mpsc::Sender<ConsoleInput>) {
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            tracing::error!("console unavailable: {}", e);
            let _ = tx.blocking_send(ConsoleInput::Eof);
            return;
        }
    };

    loop {
        let input = match editor.readline("") {
            Ok(line) => {
                let _ = editor.add_history_entry(line.as_str());
                ConsoleInput::Line(line)
            }
            Err(ReadlineError::Interrupted) => ConsoleInput::Interrupted,
            Err(ReadlineError::Eof) => ConsoleInput::Eof,
            Err(e) => {
                tracing::warn!("console read failed: {}", e);
                ConsoleInput::Eof
            }
        };

        let last = !matches!(input, ConsoleInput::Line(_));
        if tx.blocking_send(input).is_err() || last {
            break;
        }
    }
}
