//! sdwire client library entry.
//!
//! Ties the standard message catalog, the registry built from it, and the
//! room-aware line dispatcher together. Consumed by the `sdwire` binary and
//! by integration tests.

pub mod config;
pub mod dispatch;
pub mod registry;

pub use dispatch::{Batch, Dispatcher, LineOutcome, MessageError, ParsedMessage};
pub use registry::{MessageKind, Payload, Registry};
