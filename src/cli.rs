use std::{ffi::OsString, time::Duration};

use clap::{Args, Parser, Subcommand};
use fanout_client::ClientConfig;
use fanout_server::{HubConfig, ServerConfig};
use fanout_shared::protocol::{DEFAULT_HOST, DEFAULT_PORT};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Long options that may also be spelled with a single dash (`-port 9000`).
const SINGLE_DASH_LONGS: &[&str] = &["port", "host", "write-timeout-ms", "no-echo", "help", "version"];

impl Cli {
    /// Parse the process arguments, accepting `-port` / `-host` style flags.
    pub fn parse_normalized() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }

    pub fn try_parse_normalized<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_args(args))
    }
}

/// Rewrite `-name` and `-name=value` to `--name` forms for known long options.
/// Arguments after a bare `--` are left alone.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut passthrough = false;
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if passthrough {
                return arg;
            }
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if text == "--" {
                passthrough = true;
                return arg;
            }
            match text.strip_prefix('-') {
                Some(rest) if !rest.starts_with('-') => {
                    let name = rest.split_once('=').map_or(rest, |(name, _)| name);
                    if SINGLE_DASH_LONGS.contains(&name) {
                        OsString::from(format!("-{text}"))
                    } else {
                        arg
                    }
                }
                _ => arg,
            }
        })
        .collect()
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the hub and relay every text message to every connected client.
    Start(StartArgs),
    /// Connect to a hub and chat from the terminal.
    Connect(ConnectArgs),
}

#[derive(Args, Debug, Clone)]
pub struct StartArgs {
    /// Port to listen on (all interfaces).
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Per-recipient write bound in milliseconds. 0 disables it.
    #[arg(long, default_value_t = 10_000)]
    pub write_timeout_ms: u64,

    /// Do not relay a message back to the client that sent it.
    #[arg(long)]
    pub no_echo: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ConnectArgs {
    /// Hub host name or address.
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Hub port.
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,
}

impl From<StartArgs> for ServerConfig {
    fn from(args: StartArgs) -> Self {
        let write_timeout = match args.write_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        };
        Self {
            port: args.port,
            hub: HubConfig {
                write_timeout,
                echo_to_sender: !args.no_echo,
                ..HubConfig::default()
            },
        }
    }
}

impl From<ConnectArgs> for ClientConfig {
    fn from(args: ConnectArgs) -> Self {
        Self {
            host: args.host,
            port: args.port,
            ..Self::default()
        }
    }
}
