pub mod dispatcher;

pub use dispatcher::{format_line, Batch, Dispatcher, LineOutcome, Lines, MessageError, ParsedMessage};
