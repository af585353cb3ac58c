//! Top-level facade crate for sdwire.
//!
//! Re-exports the codec framework and the client-side catalog/dispatcher so
//! users can depend on a single crate.

pub mod core {
    pub use sdwire_core::*;
}

pub mod client {
    pub use sdwire_client::*;
}
