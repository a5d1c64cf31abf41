//! Tracing subscriber setup.

use tracing_subscriber::{EnvFilter, fmt};

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence. Otherwise `default_level` is applied to the
/// binary crate and to every `fanout*` crate, while dependencies stay at `info`.
/// Output goes to stderr so that stdout is left to interactive use.
pub fn setup_logger(bin_name: &str, default_level: &str) {
    let bin_target = bin_name.replace('-', "_");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(default_directives(&bin_target, default_level))
    });

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}

fn default_directives(bin_target: &str, level: &str) -> String {
    format!(
        "info,{bin_target}={level},fanout_server={level},fanout_client={level},fanout_shared={level}"
    )
}
