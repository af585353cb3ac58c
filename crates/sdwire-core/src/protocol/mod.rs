//! Codec framework modules, leaves first.
//!
//! - `value`: the structured value model (`Value`, `Record`, `KwArgs`).
//! - `kwargs`: trailing `[name] value` extraction.
//! - `leaf`: string / number / JSON codecs and the `FieldCodec` contract.
//! - `compound`: hand-written codecs for compound textual values.
//! - `combinators`: optional, nullable, array and subcommand wrappers.
//! - `schema`: the generic schema engine and its structural validator.
//!
//! All parsers are panic-free: malformed input is reported as error strings
//! at the leaf level and as `SdwireError` values from the engine.

pub mod combinators;
pub mod compound;
pub mod kwargs;
pub mod leaf;
pub mod schema;
pub mod value;

pub use combinators::{array, array_with, nullable, optional, optional_keep_empty, subcommand};
pub use compound::{details, hp, pokemon, username};
pub use leaf::{check_token, json, number, text, Codec, FieldCodec, Kind};
pub use schema::{Decoded, MessageSchema, Rule, REST_FIELD};
pub use value::{KwArgs, Record, Tagged, Value};

/// Field delimiter of the wire format.
pub const DELIMITER: char = '|';

/// First character of a room-switch line (`>roomid`).
pub const ROOM_MARKER: char = '>';

/// Token standing for the null sentinel.
pub const NULL_TOKEN: &str = "null";
