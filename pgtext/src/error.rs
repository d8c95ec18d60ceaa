//! `pgtext` error types.
use std::fmt;

use crate::pg_type::Oid;

/// A specialized [`Result`] type for `pgtext` operation.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// All possible error from the `pgtext` library.
pub enum Error {
    /// Text does not match the grammar for its declared type.
    MalformedLiteral {
        /// The offending text.
        text: Box<str>,
        /// Name of the type the text was parsed as.
        ty: &'static str,
    },
    /// Array literal ends inside a quoted element.
    UnterminatedQuote,
    /// Array literal braces are unbalanced or its structure is truncated.
    UnbalancedBraces,
    /// No codec registered for the requested type oid.
    UnsupportedType(Oid),
    /// Value variant cannot be formatted as the declared type.
    TypeMismatch {
        /// Name of the value variant.
        value: &'static str,
        /// Name of the declared type.
        ty: &'static str,
    },
    /// Value does not fit the narrower representation requested by the caller.
    PrecisionLoss {
        /// Text form of the value.
        text: Box<str>,
        /// Name of the requested representation.
        ty: &'static str,
    },
}

impl Error {
    pub(crate) fn malformed(text: &str, ty: &'static str) -> Error {
        Error::MalformedLiteral { text: text.into(), ty }
    }
}

impl std::error::Error for Error { }

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid postgres text value, ")?;
        match self {
            Self::MalformedLiteral { text, ty } => write!(f, "malformed {ty} literal: {text:?}"),
            Self::UnterminatedQuote => write!(f, "unterminated quote in array literal"),
            Self::UnbalancedBraces => write!(f, "unbalanced braces in array literal"),
            Self::UnsupportedType(oid) => write!(f, "no codec registered for oid {oid}"),
            Self::TypeMismatch { value, ty } => write!(f, "cannot format {value} value as {ty}"),
            Self::PrecisionLoss { text, ty } => write!(f, "value {text} does not fit in {ty}"),
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{self}\"")
    }
}
