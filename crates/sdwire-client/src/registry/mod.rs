//! Message registry: logical identities, the standard catalog and the
//! co-indexed decoder / encoder / tag tables.

pub mod catalog;
pub mod kind;
pub mod payload;
pub mod table;

pub use kind::MessageKind;
pub use payload::Payload;
pub use table::{Decoder, Encoder, Registry};
