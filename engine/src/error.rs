//! Error types for the field list engine.

use thiserror::Error;

/// All possible errors from the engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Decoding errors
    #[error("parsing JSON: {0}")]
    Parse(String),

    #[error("unexpected EOF")]
    UnexpectedEof,

    // Encoding errors
    #[error("{0}")]
    Encode(String),
}

impl From<crate::parser::ParseError> for Error {
    fn from(err: crate::parser::ParseError) -> Self {
        Error::Parse(err.to_string())
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParseError;

    #[test]
    fn error_display() {
        let err = Error::Parse("invalid character 'x'".into());
        assert_eq!(err.to_string(), "parsing JSON: invalid character 'x'");

        let err = Error::UnexpectedEof;
        assert_eq!(err.to_string(), "unexpected EOF");

        let err = Error::Encode("cannot encode NaN".into());
        assert_eq!(err.to_string(), "cannot encode NaN");
    }

    #[test]
    fn parse_error_is_wrapped() {
        let err: Error = ParseError::Syntax {
            offset: 3,
            message: "expected ':'".into(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "parsing JSON: syntax error at offset 3: expected ':'"
        );
    }
}
