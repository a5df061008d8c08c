use std::sync::Arc;

use crate::error::{Error, ErrorKind};
use crate::number::ExactNumber;
use crate::value::{ObjectEntry, Value};

/// How many bytes of unconsumed input a parse error carries as context.
const ERROR_CONTEXT_BYTES: usize = 64;

/// Options for [`parse_with`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// Store every number that fits neither integer range as
    /// [`Value::Exact`] instead of a float, keeping full precision.
    pub exact_floats: bool,
}

/// Parse a complete JSON document.
///
/// The grammar is strict JSON extended with `//` line comments and
/// `/* */` block comments anywhere whitespace is allowed. Exactly one
/// top-level value must be present.
pub fn parse(input: &str) -> Result<Value, Error> {
    parse_with(input, ParseOptions::default())
}

/// Parse a complete JSON document with explicit options.
pub fn parse_with(input: &str, options: ParseOptions) -> Result<Value, Error> {
    let mut cursor = Cursor::new(input.as_bytes());
    parse_document(&mut cursor, options).map_err(|err| {
        let trailing = cursor.remaining();
        let snippet = &trailing[..trailing.len().min(ERROR_CONTEXT_BYTES)];
        err.with_context(String::from_utf8_lossy(snippet))
    })
}

fn parse_document(cursor: &mut Cursor<'_>, options: ParseOptions) -> Result<Value, Error> {
    let value = read_value(cursor, options, true)?;
    if skip_to_token(cursor)?.is_some() {
        cursor.unread();
        return Err(Error::new(ErrorKind::TrailingBytes));
    }
    Ok(value)
}

/// A byte cursor over the input with single-byte pushback.
pub(crate) struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Cursor { bytes, pos: 0 }
    }

    pub(crate) fn next(&mut self) -> Option<u8> {
        let byte = self.bytes.get(self.pos).copied();
        if byte.is_some() {
            self.pos += 1;
        }
        byte
    }

    pub(crate) fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    pub(crate) fn unread(&mut self) {
        debug_assert!(self.pos > 0);
        self.pos -= 1;
    }

    pub(crate) fn at_end(&self) -> bool {
        self.pos == self.bytes.len()
    }

    pub(crate) fn remaining(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }
}

/// Advance past whitespace and comments to the next token byte.
/// Returns `None` at end of input.
fn skip_to_token(cursor: &mut Cursor<'_>) -> Result<Option<u8>, Error> {
    loop {
        let Some(byte) = cursor.next() else {
            return Ok(None);
        };
        if byte.is_ascii_whitespace() {
            continue;
        }
        if byte == b'/' {
            skip_comment(cursor)?;
            continue;
        }
        return Ok(Some(byte));
    }
}

/// Skip one comment; the opening `/` has been consumed.
fn skip_comment(cursor: &mut Cursor<'_>) -> Result<(), Error> {
    match cursor.next() {
        None => Err(Error::unexpected_eof("Malformed comment start at end of input")),
        Some(b'/') => loop {
            match cursor.next() {
                None => {
                    return Err(Error::unexpected_eof(
                        "Premature end of input (while reading line-comment)",
                    ))
                }
                Some(b'\n') => return Ok(()),
                Some(_) => {}
            }
        },
        Some(b'*') => {
            let mut star_seen = false;
            loop {
                match cursor.next() {
                    None => {
                        return Err(Error::unexpected_eof(
                            "Incomplete block-comment at end of input",
                        ))
                    }
                    Some(b'*') => star_seen = true,
                    Some(b'/') if star_seen => return Ok(()),
                    Some(_) => star_seen = false,
                }
            }
        }
        Some(other) => {
            cursor.unread();
            Err(Error::unexpected_byte("Malformed comment start", other))
        }
    }
}

/// The next token byte. At the very start of a document running out of
/// input is [`ErrorKind::EmptyInput`]; inside a value it is
/// [`ErrorKind::UnexpectedEof`].
fn next_token_byte(cursor: &mut Cursor<'_>, at_document_start: bool) -> Result<u8, Error> {
    match skip_to_token(cursor)? {
        Some(byte) => Ok(byte),
        None if at_document_start => Err(Error::new(ErrorKind::EmptyInput)),
        None => Err(Error::unexpected_eof("Premature end of input")),
    }
}

fn peek_token_byte(cursor: &mut Cursor<'_>) -> Result<u8, Error> {
    let byte = next_token_byte(cursor, false)?;
    cursor.unread();
    Ok(byte)
}

fn read_value(
    cursor: &mut Cursor<'_>,
    options: ParseOptions,
    at_document_start: bool,
) -> Result<Value, Error> {
    let byte = next_token_byte(cursor, at_document_start)?;
    match byte {
        b'"' => read_string_body(cursor).map(|text| Value::String(Arc::from(text))),
        b'[' => read_array(cursor, options),
        b'{' => read_object(cursor, options),
        b't' => expect_keyword(cursor, "true").map(|()| Value::Bool(true)),
        b'f' => expect_keyword(cursor, "false").map(|()| Value::Bool(false)),
        b'n' => expect_keyword(cursor, "null").map(|()| Value::Null),
        b'-' | b'0'..=b'9' => {
            cursor.unread();
            read_number(cursor, options)
        }
        other => {
            cursor.unread();
            Err(Error::unexpected_byte(
                "Unexpected character while looking for element",
                other,
            ))
        }
    }
}

/// Finish a keyword whose first byte has been consumed.
fn expect_keyword(cursor: &mut Cursor<'_>, word: &'static str) -> Result<(), Error> {
    for &expected in &word.as_bytes()[1..] {
        match cursor.next() {
            None => {
                return Err(Error::unexpected_eof(format!(
                    "Input ended while looking for \"{word}\""
                )))
            }
            Some(byte) if byte != expected => {
                cursor.unread();
                return Err(Error::unexpected_byte(
                    format!("Unexpected character while looking for \"{word}\""),
                    byte,
                ));
            }
            Some(_) => {}
        }
    }
    if let Some(byte) = cursor.peek() {
        if byte.is_ascii_alphanumeric() {
            return Err(Error::unexpected_byte(
                format!("Trailing character in keyword \"{word}\""),
                byte,
            ));
        }
    }
    Ok(())
}

fn read_number(cursor: &mut Cursor<'_>, options: ParseOptions) -> Result<Value, Error> {
    let number = ExactNumber::parse_cursor(cursor)?;
    if number.fits_u64() {
        Ok(Value::Uint(number.as_u64()))
    } else if number.fits_i64() {
        Ok(Value::Int(number.as_i64()))
    } else if options.exact_floats {
        Ok(Value::Exact(Arc::new(number)))
    } else {
        let sig_digits = u16::try_from(number.digits().len().max(1)).unwrap_or(u16::MAX);
        Ok(Value::float_with_digits(number.as_f64(), sig_digits))
    }
}

/// Read a string body; the opening quote has been consumed.
fn read_string_body(cursor: &mut Cursor<'_>) -> Result<String, Error> {
    let mut buffer: Vec<u8> = Vec::new();
    loop {
        match cursor.next() {
            None => return Err(Error::unexpected_eof("Input ended within string")),
            Some(b'"') => break,
            Some(b'\\') => read_escape(cursor, &mut buffer)?,
            Some(byte) if byte < 0x20 => {
                cursor.unread();
                return Err(Error::unexpected_byte("Control byte within string", byte));
            }
            Some(byte) => buffer.push(byte),
        }
    }
    // The input is a &str and escapes emit whole codepoints, so the
    // collected bytes are valid UTF-8.
    String::from_utf8(buffer).map_err(|_| {
        Error::new(ErrorKind::InvalidUtf8Byte {
            message: "String data is not valid UTF-8",
        })
    })
}

fn read_escape(cursor: &mut Cursor<'_>, buffer: &mut Vec<u8>) -> Result<(), Error> {
    match cursor.next() {
        None => Err(Error::unexpected_eof("Input ended in escape sequence")),
        Some(byte @ (b'\\' | b'/' | b'"')) => {
            buffer.push(byte);
            Ok(())
        }
        Some(b'b') => {
            buffer.push(0x08);
            Ok(())
        }
        Some(b'f') => {
            buffer.push(0x0c);
            Ok(())
        }
        Some(b'n') => {
            buffer.push(b'\n');
            Ok(())
        }
        Some(b'r') => {
            buffer.push(b'\r');
            Ok(())
        }
        Some(b't') => {
            buffer.push(b'\t');
            Ok(())
        }
        Some(b'u') => read_unicode_escape(cursor, buffer),
        Some(other) => {
            cursor.unread();
            Err(Error::unexpected_byte(
                format!("Bad escape sequence, \"\\{}\"", other as char),
                other,
            ))
        }
    }
}

fn read_hex_digit(cursor: &mut Cursor<'_>) -> Result<u32, Error> {
    match cursor.next() {
        None => Err(Error::unexpected_eof("Input ended in unicode escape")),
        Some(byte) => match (byte as char).to_digit(16) {
            Some(digit) => Ok(digit),
            None => {
                cursor.unread();
                Err(Error::unexpected_byte(
                    "Bad hex digit in unicode escape",
                    byte,
                ))
            }
        },
    }
}

fn read_code_unit(cursor: &mut Cursor<'_>) -> Result<u32, Error> {
    let mut unit = 0;
    for _ in 0..4 {
        unit = unit << 4 | read_hex_digit(cursor)?;
    }
    Ok(unit)
}

fn read_unicode_escape(cursor: &mut Cursor<'_>, buffer: &mut Vec<u8>) -> Result<(), Error> {
    let mut codepoint = read_code_unit(cursor)?;
    if codepoint & !0x3FF == 0xD800 {
        // High surrogate: the low half must follow immediately.
        for expected in [b'\\', b'u'] {
            match cursor.next() {
                None => return Err(Error::unexpected_eof("Input ended in surrogate pair")),
                Some(byte) if byte != expected => {
                    cursor.unread();
                    return Err(Error::unexpected_byte(
                        "Missing second half of surrogate pair",
                        byte,
                    ));
                }
                Some(_) => {}
            }
        }
        let low = read_code_unit(cursor)?;
        if low & !0x3FF != 0xDC00 {
            return Err(Error::new(ErrorKind::BadUnicodeEscape {
                message: "Bad second half of surrogate pair".into(),
            }));
        }
        codepoint = 0x10000 + ((codepoint & 0x3FF) << 10 | (low & 0x3FF));
    } else if codepoint & !0x3FF == 0xDC00 {
        return Err(Error::new(ErrorKind::BadUnicodeEscape {
            message: "Orphaned second half of surrogate pair".into(),
        }));
    }
    let character = char::from_u32(codepoint).ok_or_else(|| {
        Error::new(ErrorKind::BadUnicodeEscape {
            message: "Escape does not name a codepoint".into(),
        })
    })?;
    let mut encoded = [0u8; 4];
    buffer.extend_from_slice(character.encode_utf8(&mut encoded).as_bytes());
    Ok(())
}

fn read_array(cursor: &mut Cursor<'_>, options: ParseOptions) -> Result<Value, Error> {
    let mut items = Vec::new();
    if next_token_byte(cursor, false)? == b']' {
        return Ok(Value::array(items));
    }
    cursor.unread();
    loop {
        items.push(read_value(cursor, options, false)?);
        match next_token_byte(cursor, false)? {
            b',' => {
                if peek_token_byte(cursor)? == b']' {
                    return Err(Error::new(ErrorKind::TrailingComma { container: "array" }));
                }
            }
            b']' => break,
            other => {
                cursor.unread();
                return Err(Error::unexpected_byte("Unexpected byte in array", other));
            }
        }
    }
    Ok(Value::array(items))
}

/// Read an object key string. A `}` here means the previous separator
/// was a trailing comma.
fn read_object_key(cursor: &mut Cursor<'_>) -> Result<String, Error> {
    let byte = next_token_byte(cursor, false)?;
    if byte == b'"' {
        return read_string_body(cursor);
    }
    cursor.unread();
    if byte == b'}' {
        Err(Error::new(ErrorKind::TrailingComma {
            container: "object",
        }))
    } else {
        Err(Error::unexpected_byte(
            "Unexpected byte while looking for an object key string",
            byte,
        ))
    }
}

fn read_object(cursor: &mut Cursor<'_>, options: ParseOptions) -> Result<Value, Error> {
    let mut entries: Vec<ObjectEntry> = Vec::new();
    if next_token_byte(cursor, false)? == b'}' {
        return Ok(Value::object_from_entries(entries));
    }
    cursor.unread();
    loop {
        let key = read_object_key(cursor)?;
        let separator = next_token_byte(cursor, false)?;
        if separator != b':' {
            cursor.unread();
            return Err(Error::unexpected_byte(
                "Missing separator for object key",
                separator,
            ));
        }
        let value = read_value(cursor, options, false)?;
        entries.push((key.into(), value));
        match next_token_byte(cursor, false)? {
            b',' => {}
            b'}' => break,
            other => {
                cursor.unread();
                return Err(Error::unexpected_byte("Unexpected byte in object", other));
            }
        }
    }
    Ok(Value::object_from_entries(entries))
}
