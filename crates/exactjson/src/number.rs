use core::cmp::Ordering;
use core::fmt::{self, Write};
use core::str::FromStr;

use crate::error::Error;
use crate::parser::Cursor;

/// A JSON number held exactly as written: a sign, a run of significant
/// decimal digits, and the position of the decimal point relative to the
/// start of that run.
///
/// `12345e1`, `1.2345e5` and `123450` all normalize to the digit run
/// `12345` with exponent `6`; the first two additionally remember that
/// they were written in decimal form. Comparison is exact, with the
/// decimal rendering ordered after the equal-magnitude integral one so
/// that distinguishable spellings never compare equal.
#[derive(Debug, Clone)]
pub struct ExactNumber {
    negative: bool,
    decimal: bool,
    exponent: i16,
    digits: Box<[u8]>,
}

/// Exponent marker for zero, which has no significant digits.
const ZERO_EXPONENT: i16 = i16::MIN;

/// Decimal magnitude of `i64::MIN`, the largest `i64` magnitude.
const I64_MAGNITUDE: &[u8] = b"9223372036854775808";
/// Decimal rendering of `u64::MAX`.
const U64_MAGNITUDE: &[u8] = b"18446744073709551615";

enum ExponentSeen {
    None,
    Empty,
    PositiveEmpty,
    NegativeEmpty,
    Positive,
    Negative,
}

impl ExactNumber {
    /// Build a number from raw parts, normalizing the digit run.
    ///
    /// `digits` is the ASCII significant-digit run and `exponent` the
    /// decimal point position measured from its start. Leading and
    /// trailing zero digits are stripped (adjusting the exponent), and a
    /// number whose point falls inside the run is forced decimal.
    pub fn from_parts(
        decimal: bool,
        negative: bool,
        exponent: i16,
        digits: Vec<u8>,
    ) -> Result<Self, Error> {
        debug_assert!(digits.iter().all(u8::is_ascii_digit));
        let mut decimal = decimal;
        let mut negative = negative;
        let mut exponent = exponent;
        let mut digits = digits;
        let leading = digits.iter().take_while(|&&d| d == b'0').count();
        if leading > 0 {
            if i64::from(exponent) - (leading as i64) < i64::from(i16::MIN) {
                return Err(Error::number_syntax("Range error in number exponent"));
            }
            exponent -= leading as i16;
            digits.drain(..leading);
        }
        if digits.is_empty() {
            exponent = ZERO_EXPONENT;
            negative = false;
        } else {
            while digits.last() == Some(&b'0') {
                digits.pop();
            }
            if digits.len() as i64 > i64::from(exponent) {
                decimal = true;
            }
        }
        Ok(ExactNumber {
            negative,
            decimal,
            exponent,
            digits: digits.into_boxed_slice(),
        })
    }

    /// Parse a complete numeric literal; trailing text is an error.
    pub fn parse(input: &str) -> Result<Self, Error> {
        let mut cursor = Cursor::new(input.as_bytes());
        let number = Self::parse_cursor(&mut cursor)?;
        if cursor.at_end() {
            Ok(number)
        } else {
            Err(Error::number_syntax("Left-over text after number"))
        }
    }

    /// Parse a numeric literal from the cursor, stopping at the first
    /// byte that cannot extend the number and leaving it unconsumed.
    pub(crate) fn parse_cursor(cursor: &mut Cursor<'_>) -> Result<Self, Error> {
        let negative = match cursor.peek() {
            None => {
                return Err(Error::unexpected_eof(
                    "Malformed input number (stream is empty)",
                ))
            }
            Some(b'-') => {
                cursor.next();
                true
            }
            Some(_) => false,
        };

        let mut digits: Vec<u8> = Vec::new();
        let mut decimal_digits: Option<usize> = None;
        let mut exponent_seen = ExponentSeen::None;
        let mut exponent: i16 = 0;
        let mut need_digit = Some("no digits seen");

        loop {
            let Some(byte) = cursor.next() else {
                if let Some(reason) = need_digit {
                    return Err(Error::unexpected_eof(format!(
                        "Malformed input number (stream end, {reason})"
                    )));
                }
                break;
            };
            match byte {
                b'e' | b'E'
                    if matches!(exponent_seen, ExponentSeen::None) && need_digit.is_none() =>
                {
                    exponent_seen = ExponentSeen::Empty;
                    if decimal_digits.is_none() {
                        decimal_digits = Some(digits.len());
                    }
                    need_digit = Some("no digits after exponent");
                }
                b'+' if matches!(exponent_seen, ExponentSeen::Empty) => {
                    exponent_seen = ExponentSeen::PositiveEmpty;
                    need_digit = Some("no digits after exponent sign");
                }
                b'-' if matches!(exponent_seen, ExponentSeen::Empty) => {
                    exponent_seen = ExponentSeen::NegativeEmpty;
                    need_digit = Some("no digits after exponent sign");
                }
                b'.' if decimal_digits.is_none() && need_digit.is_none() => {
                    decimal_digits = Some(digits.len());
                    need_digit = Some("no digits after decimal point");
                }
                digit if digit.is_ascii_digit() => {
                    need_digit = None;
                    match exponent_seen {
                        ExponentSeen::None => {
                            digits.push(digit);
                            continue;
                        }
                        ExponentSeen::Empty | ExponentSeen::PositiveEmpty => {
                            exponent_seen = ExponentSeen::Positive;
                        }
                        ExponentSeen::NegativeEmpty => {
                            exponent_seen = ExponentSeen::Negative;
                        }
                        ExponentSeen::Positive | ExponentSeen::Negative => {}
                    }
                    let extended = u32::from(exponent as u16) * 10 + u32::from(digit - b'0');
                    if extended > i16::MAX as u32 {
                        return Err(Error::number_syntax("Range error in number exponent"));
                    }
                    exponent = extended as i16;
                }
                _ => {
                    cursor.unread();
                    if let Some(reason) = need_digit {
                        return Err(Error::number_syntax(format!(
                            "Malformed input number ({reason})"
                        )));
                    }
                    break;
                }
            }
        }

        if digits.len() > 1 && digits[0] == b'0' && decimal_digits.is_none_or(|count| count > 1) {
            return Err(Error::number_syntax("Malformed input number (leading zero)"));
        }

        if matches!(exponent_seen, ExponentSeen::Negative) {
            exponent = -exponent;
        }
        let shift = decimal_digits.unwrap_or(digits.len());
        if i64::from(exponent) + shift as i64 > i64::from(i16::MAX) {
            return Err(Error::number_syntax("Range error in number exponent"));
        }
        exponent += shift as i16;

        Self::from_parts(decimal_digits.is_some(), negative, exponent, digits)
    }

    /// Convert a finite float to its shortest exact decimal reading.
    ///
    /// Non-finite inputs have no decimal rendering and fail.
    pub fn from_f64(value: f64) -> Result<Self, Error> {
        let mut rendered = String::new();
        crate::encode::write_float(&mut rendered, value, 17);
        Self::parse(&rendered)
    }

    /// Whether the number was written with a decimal point or exponent.
    pub fn is_decimal(&self) -> bool {
        self.decimal
    }

    /// Whether the number is negative. Zero is never negative.
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// The significant-digit run, without sign or leading/trailing zeros.
    pub fn digits(&self) -> &[u8] {
        &self.digits
    }

    /// Whether the value is exactly representable as an `i64`.
    ///
    /// Numbers written in decimal or exponent form never qualify, even
    /// when their value is integral.
    pub fn fits_i64(&self) -> bool {
        if self.decimal {
            return false;
        }
        if self.digits.is_empty() {
            return true;
        }
        i64::from(self.exponent) >= self.digits.len() as i64
            && within_magnitude(&self.digits, self.exponent, I64_MAGNITUDE, self.negative)
    }

    /// Whether the value is exactly representable as a `u64`.
    pub fn fits_u64(&self) -> bool {
        if self.decimal || self.negative {
            return false;
        }
        if self.digits.is_empty() {
            return true;
        }
        i64::from(self.exponent) >= self.digits.len() as i64
            && within_magnitude(&self.digits, self.exponent, U64_MAGNITUDE, true)
    }

    /// The value truncated toward zero and saturated to the `i64` range.
    pub fn as_i64(&self) -> i64 {
        if self.exponent < 0 {
            return 0;
        }
        if !within_magnitude(&self.digits, self.exponent, I64_MAGNITUDE, self.negative) {
            return if self.negative { i64::MIN } else { i64::MAX };
        }
        let magnitude = self.truncated_magnitude();
        let signed = if self.negative {
            -i128::from(magnitude)
        } else {
            i128::from(magnitude)
        };
        signed as i64
    }

    /// The value truncated toward zero and saturated to the `u64` range.
    /// Negative numbers saturate to zero.
    pub fn as_u64(&self) -> u64 {
        if self.exponent < 0 || self.negative {
            return 0;
        }
        if !within_magnitude(&self.digits, self.exponent, U64_MAGNITUDE, true) {
            return u64::MAX;
        }
        self.truncated_magnitude()
    }

    /// The closest `f64`, by reading back the decimal rendering.
    pub fn as_f64(&self) -> f64 {
        self.to_string().parse().unwrap_or(f64::NAN)
    }

    /// The integral part of the magnitude. Caller has checked the range.
    fn truncated_magnitude(&self) -> u64 {
        debug_assert!(self.exponent >= 0);
        let mut magnitude: u64 = 0;
        for position in 0..self.exponent as usize {
            let digit = self.digits.get(position).map_or(0, |d| d - b'0');
            magnitude = magnitude * 10 + u64::from(digit);
        }
        magnitude
    }

    /// Compare absolute values: decimal point position first, then the
    /// digit runs lexicographically (a prefix reads as zero-extended).
    fn magnitude_cmp(&self, other: &Self) -> Ordering {
        self.exponent
            .cmp(&other.exponent)
            .then_with(|| self.digits.cmp(&other.digits))
    }
}

impl Default for ExactNumber {
    fn default() -> Self {
        ExactNumber {
            negative: false,
            decimal: false,
            exponent: ZERO_EXPONENT,
            digits: Box::new([]),
        }
    }
}

impl FromStr for ExactNumber {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Error> {
        Self::parse(input)
    }
}

impl From<u64> for ExactNumber {
    fn from(value: u64) -> Self {
        let mut digits: Vec<u8> = Vec::new();
        let mut rest = value;
        while rest != 0 {
            digits.push(b'0' + (rest % 10) as u8);
            rest /= 10;
        }
        if digits.is_empty() {
            return ExactNumber::default();
        }
        digits.reverse();
        let exponent = digits.len() as i16;
        while digits.last() == Some(&b'0') {
            digits.pop();
        }
        ExactNumber {
            negative: false,
            decimal: false,
            exponent,
            digits: digits.into_boxed_slice(),
        }
    }
}

impl From<i64> for ExactNumber {
    fn from(value: i64) -> Self {
        let mut number = ExactNumber::from(value.unsigned_abs());
        if value < 0 {
            number.negative = true;
        }
        number
    }
}

impl Ord for ExactNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.negative != other.negative {
            return if self.negative {
                Ordering::Less
            } else {
                Ordering::Greater
            };
        }
        let mut result = self.magnitude_cmp(other);
        if self.negative {
            result = result.reverse();
        }
        if result == Ordering::Equal && self.decimal != other.decimal {
            // The decimal spelling sorts after the equal integral one.
            return if self.decimal {
                Ordering::Greater
            } else {
                Ordering::Less
            };
        }
        result
    }
}

impl PartialOrd for ExactNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ExactNumber {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ExactNumber {}

impl fmt::Display for ExactNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.digits.is_empty() {
            return f.write_str(if self.decimal { "0.0" } else { "0" });
        }
        if self.negative {
            f.write_char('-')?;
        }
        if self.decimal || i64::from(self.exponent) < self.digits.len() as i64 {
            f.write_char(self.digits[0] as char)?;
            f.write_char('.')?;
            if self.digits.len() == 1 {
                f.write_char('0')?;
            }
            for &digit in &self.digits[1..] {
                f.write_char(digit as char)?;
            }
            if self.exponent != 1 {
                write!(f, "e{}", i32::from(self.exponent) - 1)?;
            }
        } else {
            for position in 0..self.exponent as usize {
                let digit = self.digits.get(position).copied().unwrap_or(b'0');
                f.write_char(digit as char)?;
            }
        }
        Ok(())
    }
}

/// Whether `digits` with the given decimal point position is at most the
/// magnitude spelled by `limit`. `at_limit` tells whether the exact limit
/// value itself is in range: always for `u64::MAX`, but only when the
/// number is negative for `i64::MIN`'s magnitude.
fn within_magnitude(digits: &[u8], exponent: i16, limit: &[u8], at_limit: bool) -> bool {
    if i64::from(exponent) > limit.len() as i64 {
        return false;
    }
    if i64::from(exponent) < limit.len() as i64 {
        return true;
    }
    for (digit, limit_digit) in digits.iter().zip(limit) {
        if digit != limit_digit {
            return digit < limit_digit;
        }
    }
    digits.len() < limit.len() || at_limit
}
