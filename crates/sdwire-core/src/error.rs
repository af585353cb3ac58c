//! Shared error type across sdwire crates.

use thiserror::Error;

/// Stable error classification (one per failure class of the codec).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// A schema field's codec rejected its token.
    FieldParse,
    /// A codec failed abnormally while parsing a field.
    UnknownField,
    /// The assembled value does not have the declared shape.
    Structure,
    /// A value handed to the serializer failed the shape check.
    EncodeRejected,
    /// A field codec could not serialize its value.
    EncodeField,
    /// Invalid input / misuse of the API (including configuration).
    BadRequest,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in tool output.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::FieldParse => "FIELD_PARSE",
            ErrorCode::UnknownField => "UNKNOWN_FIELD",
            ErrorCode::Structure => "STRUCTURE",
            ErrorCode::EncodeRejected => "ENCODE_REJECTED",
            ErrorCode::EncodeField => "ENCODE_FIELD",
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, SdwireError>;

/// Unified error type used by the codec engine, the registry and the client.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SdwireError {
    #[error("field {index} ({name}): {reason}")]
    Field {
        index: usize,
        name: &'static str,
        reason: String,
    },
    #[error("unknown error parsing field at index {index}")]
    UnknownField { index: usize },
    #[error("invalid structure: {0}")]
    Structure(String),
    #[error("refusing to serialize: {0}")]
    EncodeRejected(String),
    #[error("cannot serialize field {index} ({name}): {reason}")]
    EncodeField {
        index: usize,
        name: &'static str,
        reason: String,
    },
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl SdwireError {
    /// Map the error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            SdwireError::Field { .. } => ErrorCode::FieldParse,
            SdwireError::UnknownField { .. } => ErrorCode::UnknownField,
            SdwireError::Structure(_) => ErrorCode::Structure,
            SdwireError::EncodeRejected(_) => ErrorCode::EncodeRejected,
            SdwireError::EncodeField { .. } => ErrorCode::EncodeField,
            SdwireError::BadRequest(_) => ErrorCode::BadRequest,
            SdwireError::Internal(_) => ErrorCode::Internal,
        }
    }
}

/// Render a list of errors the way batch consumers print them.
pub fn describe(errors: &[SdwireError]) -> Vec<String> {
    errors.iter().map(ToString::to_string).collect()
}
