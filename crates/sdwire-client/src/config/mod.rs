//! Client config: strict YAML, validated before use.
//!
//! A missing file is the caller's mistake (`BAD_REQUEST`); any other read
//! failure is `INTERNAL`. Running without a file means the defaults.

pub mod schema;

use std::fs;
use std::io;
use std::path::Path;

use sdwire_core::error::{Result, SdwireError};

pub use schema::{ClientConfig, DispatchSection, OutputSection};

/// Config at `path`, or the defaults when no path is given.
pub fn load(path: Option<&str>) -> Result<ClientConfig> {
    match path {
        Some(p) => load_from_file(p),
        None => {
            tracing::debug!("no config file; using defaults");
            Ok(ClientConfig::default())
        }
    }
}

pub fn load_from_file(path: impl AsRef<Path>) -> Result<ClientConfig> {
    let path = path.as_ref();
    let s = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => {
            SdwireError::BadRequest(format!("config file {} not found", path.display()))
        }
        _ => SdwireError::Internal(format!("reading config {} failed: {e}", path.display())),
    })?;
    let cfg = load_from_str(&s)?;
    tracing::debug!(path = %path.display(), room = %cfg.dispatch.default_room, "config loaded");
    Ok(cfg)
}

pub fn load_from_str(s: &str) -> Result<ClientConfig> {
    let cfg: ClientConfig = serde_yaml::from_str(s)
        .map_err(|e| SdwireError::BadRequest(format!("invalid config yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
