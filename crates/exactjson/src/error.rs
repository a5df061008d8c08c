use core::fmt;

use crate::encode::{self, EncodeOptions};
use crate::Value;

/// The specific failure reported by an [`Error`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// An accessor was called on a value of the wrong kind.
    TypeMismatch {
        op: &'static str,
        actual: &'static str,
    },
    /// An array was indexed beyond its length via the failing access path.
    ArrayIndex { index: usize, len: usize },
    /// An object was asked for an absent key via the failing access path.
    ObjectKey { key: Box<str> },
    /// A malformed numeric literal, or decimal-exponent range overflow.
    NumberSyntax { message: Box<str> },
    /// A comma immediately followed by the closing bracket/brace.
    TrailingComma { container: &'static str },
    /// A byte that does not fit the grammar at its position.
    UnexpectedByte { message: Box<str>, byte: u8 },
    /// The input ended before the first byte of the top-level value.
    EmptyInput,
    /// The input ended in the middle of a value or structure.
    UnexpectedEof { message: Box<str> },
    /// Non-whitespace, non-comment bytes after a complete top-level value.
    TrailingBytes,
    /// A `\u` escape that violates surrogate pairing rules.
    BadUnicodeEscape { message: Box<str> },
    /// A byte sequence that is not valid UTF-8 (fail-on-bad-UTF-8 mode only).
    InvalidUtf8Byte { message: &'static str },
    /// A decoded codepoint outside Unicode, or a bare surrogate half.
    InvalidCodepoint { message: &'static str },
}

impl ErrorKind {
    fn failtag(&self) -> &'static str {
        match self {
            ErrorKind::TypeMismatch { .. } => "JSON Type Error",
            ErrorKind::ArrayIndex { .. } | ErrorKind::ObjectKey { .. } => "JSON Key Error",
            ErrorKind::NumberSyntax { .. }
            | ErrorKind::TrailingComma { .. }
            | ErrorKind::UnexpectedByte { .. }
            | ErrorKind::EmptyInput
            | ErrorKind::UnexpectedEof { .. }
            | ErrorKind::TrailingBytes
            | ErrorKind::BadUnicodeEscape { .. } => "JSON Parsing Error",
            ErrorKind::InvalidUtf8Byte { .. } | ErrorKind::InvalidCodepoint { .. } => {
                "JSON Encoding Error"
            }
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::TypeMismatch { op, actual } => {
                write!(f, "Operation {op} not legal for {actual}")
            }
            ErrorKind::ArrayIndex { index, len } => {
                write!(f, "Index {index} out of range [0..{len})")
            }
            ErrorKind::ObjectKey { key } => write!(f, "Key {key} not present in object"),
            ErrorKind::NumberSyntax { message }
            | ErrorKind::UnexpectedEof { message }
            | ErrorKind::BadUnicodeEscape { message } => f.write_str(message),
            ErrorKind::TrailingComma { container } => {
                write!(f, "Trailing comma in {container}")
            }
            ErrorKind::UnexpectedByte { message, .. } => f.write_str(message),
            ErrorKind::EmptyInput => f.write_str("Premature end of input"),
            ErrorKind::TrailingBytes => f.write_str("Trailing bytes"),
            ErrorKind::InvalidUtf8Byte { message } | ErrorKind::InvalidCodepoint { message } => {
                f.write_str(message)
            }
        }
    }
}

/// The error type for every fallible operation in this crate.
///
/// Besides its [`ErrorKind`], an error may carry the offending [`Value`]
/// (attached by accessors) and a short snippet of unconsumed input
/// (attached by the top-level parse entry points).
#[derive(Debug, Clone)]
pub struct Error {
    kind: ErrorKind,
    context: Option<Box<str>>,
    argument: Option<Value>,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind) -> Self {
        Error {
            kind,
            context: None,
            argument: None,
        }
    }

    pub(crate) fn unexpected_byte(message: impl Into<Box<str>>, byte: u8) -> Self {
        Error::new(ErrorKind::UnexpectedByte {
            message: message.into(),
            byte,
        })
    }

    pub(crate) fn number_syntax(message: impl Into<Box<str>>) -> Self {
        Error::new(ErrorKind::NumberSyntax {
            message: message.into(),
        })
    }

    pub(crate) fn unexpected_eof(message: impl Into<Box<str>>) -> Self {
        Error::new(ErrorKind::UnexpectedEof {
            message: message.into(),
        })
    }

    pub(crate) fn with_argument(mut self, argument: Value) -> Self {
        self.argument = Some(argument);
        self
    }

    pub(crate) fn with_context(mut self, context: impl Into<Box<str>>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// The specific failure this error reports.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// The value an accessor was called on, when one was attached.
    pub fn argument(&self) -> Option<&Value> {
        self.argument.as_ref()
    }

    /// Unconsumed input trailing a parse failure, when any was captured.
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.failtag(), self.kind)?;
        if let ErrorKind::UnexpectedByte { byte, .. } = &self.kind {
            let mut quoted = String::new();
            if encode::write_json_string(&mut quoted, &[*byte], &EncodeOptions::default()).is_ok() {
                write!(f, " while reading byte {quoted}")?;
            }
        }
        if let Some(argument) = &self.argument {
            write!(f, " on {}", encode::encode(argument))?;
        }
        if let Some(context) = &self.context {
            let mut quoted = String::new();
            if encode::write_json_string(&mut quoted, context.as_bytes(), &EncodeOptions::default())
                .is_ok()
            {
                write!(f, " before {quoted}")?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_mismatch_message_names_operation_and_kind() {
        let err = Error::new(ErrorKind::TypeMismatch {
            op: "as_bool",
            actual: "string",
        });
        assert_eq!(
            err.to_string(),
            "JSON Type Error: Operation as_bool not legal for string"
        );
    }

    #[test]
    fn display_appends_argument_and_context() {
        let err = Error::new(ErrorKind::TrailingComma { container: "array" })
            .with_argument(Value::from(true))
            .with_context(",]");
        assert_eq!(
            err.to_string(),
            "JSON Parsing Error: Trailing comma in array on true before \",]\""
        );
    }

    #[test]
    fn unexpected_byte_display_quotes_the_byte() {
        let err = Error::unexpected_byte("Unexpected byte in array", b'x');
        assert_eq!(
            err.to_string(),
            "JSON Parsing Error: Unexpected byte in array while reading byte \"x\""
        );
    }
}
