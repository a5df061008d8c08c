//! Byte-level UTF-8 validation for the string encoder.

use crate::error::{Error, ErrorKind};

/// The codepoint emitted for undecodable input in replacement mode.
pub(crate) const REPLACEMENT: u32 = 0xFFFD;

fn invalid_byte(message: &'static str) -> Error {
    Error::new(ErrorKind::InvalidUtf8Byte { message })
}

pub(crate) fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

/// Decode one codepoint starting at `*cur`, advancing past the bytes
/// consumed. The caller guarantees at least one byte is available.
fn scan_codepoint(bytes: &[u8], cur: &mut usize) -> Result<u32, Error> {
    let byte = bytes[*cur];
    *cur += 1;
    if byte < 0x80 {
        Ok(u32::from(byte))
    } else if byte < 0xC0 {
        Err(invalid_byte("Unexpected UTF-8 continuation byte"))
    } else if byte < 0xE0 {
        finish_sequence(bytes, cur, u32::from(byte & 0x1F), 1)
    } else if byte < 0xF0 {
        finish_sequence(bytes, cur, u32::from(byte & 0x0F), 2)
    } else if byte < 0xF8 {
        finish_sequence(bytes, cur, u32::from(byte & 0x07), 3)
    } else {
        Err(invalid_byte("Invalid UTF-8 lead byte"))
    }
}

fn finish_sequence(
    bytes: &[u8],
    cur: &mut usize,
    mut codepoint: u32,
    continuations: usize,
) -> Result<u32, Error> {
    for _ in 0..continuations {
        let Some(&byte) = bytes.get(*cur) else {
            return Err(invalid_byte("Input ends inside a UTF-8 sequence"));
        };
        if !is_continuation(byte) {
            return Err(invalid_byte("Continuation byte missing in UTF-8 sequence"));
        }
        *cur += 1;
        codepoint = codepoint << 6 | u32::from(byte & 0x3F);
    }
    Ok(codepoint)
}

/// Decode one codepoint and reject values UTF-8 must not carry.
pub(crate) fn scan_valid_codepoint(bytes: &[u8], cur: &mut usize) -> Result<u32, Error> {
    let codepoint = scan_codepoint(bytes, cur)?;
    if codepoint > 0x0010_FFFF {
        return Err(Error::new(ErrorKind::InvalidCodepoint {
            message: "Codepoint beyond U+10FFFF",
        }));
    }
    if (0xD800..=0xDFFF).contains(&codepoint) {
        return Err(Error::new(ErrorKind::InvalidCodepoint {
            message: "UTF-8-encoded surrogate half",
        }));
    }
    Ok(codepoint)
}

/// Decode one codepoint, substituting U+FFFD for undecodable input when
/// `fail` is false. After a bad lead byte any following continuation
/// bytes are consumed as part of the replaced sequence.
pub(crate) fn scan_or_replace(bytes: &[u8], cur: &mut usize, fail: bool) -> Result<u32, Error> {
    let before = *cur;
    match scan_valid_codepoint(bytes, cur) {
        Ok(codepoint) => Ok(codepoint),
        Err(err) if fail => Err(err),
        Err(_) => {
            if *cur == before + 1 {
                while bytes.get(*cur).copied().is_some_and(is_continuation) {
                    *cur += 1;
                }
            }
            Ok(REPLACEMENT)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(b"A", 0x41, 1; "ascii")]
    #[test_case("é".as_bytes(), 0xE9, 2; "two bytes")]
    #[test_case("€".as_bytes(), 0x20AC, 3; "three bytes")]
    #[test_case("😀".as_bytes(), 0x1F600, 4; "four bytes")]
    fn decodes_valid_sequences(bytes: &[u8], codepoint: u32, width: usize) {
        let mut cur = 0;
        assert_eq!(scan_valid_codepoint(bytes, &mut cur).unwrap(), codepoint);
        assert_eq!(cur, width);
    }

    #[test_case(&[0x80]; "bare continuation")]
    #[test_case(&[0xC3]; "truncated sequence")]
    #[test_case(&[0xC3, 0x41]; "broken continuation")]
    #[test_case(&[0xFF, 0x80]; "invalid lead")]
    #[test_case(&[0xED, 0xA0, 0xBD]; "encoded surrogate")]
    #[test_case(&[0xF7, 0xBF, 0xBF, 0xBF]; "beyond unicode")]
    fn rejects_bad_sequences(bytes: &[u8]) {
        let mut cur = 0;
        assert!(scan_valid_codepoint(bytes, &mut cur).is_err());
    }

    #[test]
    fn replacement_mode_consumes_the_broken_sequence() {
        let bytes = [0xFF, 0x80, 0x80, b'A'];
        let mut cur = 0;
        assert_eq!(scan_or_replace(&bytes, &mut cur, false).unwrap(), REPLACEMENT);
        assert_eq!(cur, 3, "continuation bytes consumed with the bad lead");
        assert_eq!(scan_or_replace(&bytes, &mut cur, false).unwrap(), 0x41);
    }

    #[test]
    fn fail_mode_propagates_the_error() {
        let mut cur = 0;
        assert!(scan_or_replace(&[0x80], &mut cur, true).is_err());
    }
}
