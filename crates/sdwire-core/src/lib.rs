//! sdwire core: the schema-driven codec framework for the pipe-delimited
//! battle-room protocol.
//!
//! This crate turns the positional/keyword tokens of one protocol message into
//! a validated structured value and back again. It knows nothing about rooms,
//! wire tags or the message catalog; those live in `sdwire-client`. It carries
//! no transport or runtime dependencies.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Malformed input surfaces as `SdwireError` lists, and a codec that panics
//! anyway is contained at the field it was parsing.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{Result, SdwireError};
