//! sdwire
//!
//! Reads protocol batches from stdin and prints one JSON object per decoded
//! line (or per failure) to stdout.
//!
//! Usage: `sdwire [CONFIG]`. Without a config path the defaults apply.
//! Logs go to stderr and follow `RUST_LOG`.

use std::io::{self, Read, Write};
use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use sdwire_client::config;
use sdwire_client::{Dispatcher, LineOutcome, Registry};
use sdwire_core::error::Result;

fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!(code = e.code().as_str(), error = %e, "sdwire failed");
            ExitCode::from(2)
        }
    }
}

/// Returns whether every line decoded.
fn run() -> Result<bool> {
    let cfg = config::load(std::env::args().nth(1).as_deref())?;
    let registry = Arc::new(Registry::standard()?);
    let dispatcher = Dispatcher::new(registry, &cfg.dispatch);

    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .map_err(|e| io_error("read stdin", e))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut clean = true;
    let mut decoded = 0usize;

    for outcome in dispatcher.lines(&input) {
        let json = match &outcome {
            LineOutcome::Message(m) => {
                decoded += 1;
                if cfg.output.errors_only {
                    continue;
                }
                m.to_json(cfg.output.include_raw)
            }
            LineOutcome::Error(e) => {
                clean = false;
                e.to_json()
            }
        };
        writeln!(out, "{json}").map_err(|e| io_error("write stdout", e))?;
    }
    out.flush().map_err(|e| io_error("flush stdout", e))?;

    tracing::info!(decoded, clean, "batch done");
    Ok(clean)
}

fn io_error(what: &str, e: io::Error) -> sdwire_core::SdwireError {
    sdwire_core::SdwireError::Internal(format!("{what} failed: {e}"))
}
