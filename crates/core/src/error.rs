use serde::Serialize;
use thiserror::Error;

use crate::notation::Notation;

/// Failure to read a coordinate string in a given notation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// A captured numeric field is empty or not a finite number.
    #[error("Malformed number in {field}: '{text}'")]
    MalformedNumber { field: &'static str, text: String },

    /// The input does not match the notation's grammar end to end.
    #[error("Input '{input}' is not a valid {notation} coordinate")]
    GrammarMismatch { notation: Notation, input: String },

    /// A field parsed but falls outside the notation's domain.
    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: String },
}

impl ParseError {
    pub(crate) fn malformed(field: &'static str, text: impl Into<String>) -> Self {
        ParseError::MalformedNumber {
            field,
            text: text.into(),
        }
    }

    pub(crate) fn mismatch(notation: Notation, input: impl Into<String>) -> Self {
        ParseError::GrammarMismatch {
            notation,
            input: input.into(),
        }
    }

    pub(crate) fn out_of_range(field: &'static str, value: impl ToString) -> Self {
        ParseError::OutOfRange {
            field,
            value: value.to_string(),
        }
    }
}

/// A template rejected by strict compilation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid template at character {position}: {reason}")]
pub struct TemplateError {
    pub position: usize,
    pub reason: String,
}

/// Any failure surfaced by the conversion façade.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    /// The canonical coordinate has no representation in the target notation.
    #[error("Cannot represent coordinate as {notation}: {reason}")]
    Domain { notation: Notation, reason: String },
}

impl ConversionError {
    pub(crate) fn domain(notation: Notation, reason: impl Into<String>) -> Self {
        ConversionError::Domain {
            notation,
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ConversionError::Parse(ParseError::MalformedNumber { .. }) => ErrorKind::MalformedNumber,
            ConversionError::Parse(ParseError::GrammarMismatch { .. }) => ErrorKind::GrammarMismatch,
            ConversionError::Parse(ParseError::OutOfRange { .. }) => ErrorKind::OutOfRange,
            ConversionError::Template(_) => ErrorKind::InvalidTemplate,
            ConversionError::Domain { .. } => ErrorKind::ConversionDomainError,
        }
    }
}

/// Flat error taxonomy for callers that only need to branch on the failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    MalformedNumber,
    GrammarMismatch,
    OutOfRange,
    InvalidTemplate,
    ConversionDomainError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_maps_every_variant() {
        let cases = [
            (
                ConversionError::from(ParseError::malformed("latitude", "")),
                ErrorKind::MalformedNumber,
            ),
            (
                ConversionError::from(ParseError::mismatch(Notation::Dd, "x")),
                ErrorKind::GrammarMismatch,
            ),
            (
                ConversionError::from(ParseError::out_of_range("latitude", 91.0)),
                ErrorKind::OutOfRange,
            ),
            (
                ConversionError::from(TemplateError {
                    position: 0,
                    reason: "dangling".to_string(),
                }),
                ErrorKind::InvalidTemplate,
            ),
            (
                ConversionError::domain(Notation::Mgrs, "polar"),
                ErrorKind::ConversionDomainError,
            ),
        ];

        for (error, kind) in cases {
            assert_eq!(error.kind(), kind);
        }
    }

    #[test]
    fn test_messages_are_readable() {
        let error = ParseError::mismatch(Notation::Utm, "17Q");
        assert_eq!(error.to_string(), "Input '17Q' is not a valid UTM coordinate");

        let error = ParseError::out_of_range("latitude", 91.0);
        assert_eq!(error.to_string(), "latitude out of range: 91");
    }
}
