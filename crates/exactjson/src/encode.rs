use core::fmt::Write as _;

use crate::error::Error;
use crate::number::ExactNumber;
use crate::utf8;
use crate::value::Value;

/// How many significant digits floats are rendered with when their
/// source literal did not record a digit count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tightness {
    /// Enough digits to read back the identical float.
    #[default]
    Exact,
    /// One digit fewer, hiding the last ulp of noise.
    LongDouble,
    /// Round-trip precision of a shorter binary float format.
    Double,
    /// Display precision, six digits.
    Float,
}

impl Tightness {
    pub(crate) fn max_digits(self) -> u16 {
        match self {
            Tightness::Exact => 17,
            Tightness::LongDouble => 16,
            Tightness::Double => 15,
            Tightness::Float => 6,
        }
    }
}

/// Options for [`encode_with`] and [`write_json_string`].
#[derive(Debug, Clone, Copy, Default)]
pub struct EncodeOptions {
    /// Float precision when no literal digit count is recorded.
    pub tightness: Tightness,
    /// Report undecodable string bytes as errors instead of replacing
    /// them with U+FFFD.
    pub fail_on_bad_utf8: bool,
    /// Emit non-ASCII codepoints as raw UTF-8 instead of `\u` escapes.
    pub raw_unicode: bool,
}

/// Encode a value with default options. Replacement mode cannot fail.
pub fn encode(value: &Value) -> String {
    match encode_with(value, &EncodeOptions::default()) {
        Ok(text) => text,
        Err(_) => String::new(),
    }
}

/// Encode a value. Output has no insignificant whitespace, object keys
/// in sorted order, and every control character escaped.
pub fn encode_with(value: &Value, options: &EncodeOptions) -> Result<String, Error> {
    let mut out = String::new();
    write_value(&mut out, value, options)?;
    Ok(out)
}

fn write_value(out: &mut String, value: &Value, options: &EncodeOptions) -> Result<(), Error> {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Uint(number) => {
            let mut buffer = itoa::Buffer::new();
            out.push_str(buffer.format(*number));
        }
        Value::Int(number) => {
            let mut buffer = itoa::Buffer::new();
            out.push_str(buffer.format(*number));
        }
        Value::Float { value, sig_digits } => {
            write_float(out, *value, effective_digits(options.tightness, *sig_digits));
        }
        Value::Exact(number) => {
            // Display output is already JSON number syntax.
            let _ = write!(out, "{number}");
        }
        Value::String(text) => write_json_string(out, text.as_bytes(), options)?,
        Value::Array(items) => {
            out.push('[');
            for (position, item) in items.iter().enumerate() {
                if position > 0 {
                    out.push(',');
                }
                write_value(out, item, options)?;
            }
            out.push(']');
        }
        Value::Object(entries) => {
            out.push('{');
            for (position, (key, member)) in entries.iter().enumerate() {
                if position > 0 {
                    out.push(',');
                }
                write_json_string(out, key.as_bytes(), options)?;
                out.push(':');
                write_value(out, member, options)?;
            }
            out.push('}');
        }
    }
    Ok(())
}

fn effective_digits(tightness: Tightness, sig_digits: u16) -> u16 {
    if sig_digits != 0 {
        sig_digits
    } else {
        tightness.max_digits()
    }
}

/// Write `bytes` as a quoted JSON string.
///
/// Backslash, quote and the short-escape control characters use their
/// two-byte escapes; other control characters become `\u00xx`. The rest
/// follows the options: non-ASCII as `\u` escapes (split into surrogate
/// pairs beyond the BMP) or raw UTF-8, and undecodable input either
/// replaced with U+FFFD or reported.
pub fn write_json_string(
    out: &mut String,
    bytes: &[u8],
    options: &EncodeOptions,
) -> Result<(), Error> {
    out.push('"');
    let mut cur = 0;
    while cur < bytes.len() {
        match bytes[cur] {
            b'"' => {
                cur += 1;
                out.push_str("\\\"");
            }
            b'\\' => {
                cur += 1;
                out.push_str("\\\\");
            }
            0x08 => {
                cur += 1;
                out.push_str("\\b");
            }
            0x0c => {
                cur += 1;
                out.push_str("\\f");
            }
            b'\n' => {
                cur += 1;
                out.push_str("\\n");
            }
            b'\r' => {
                cur += 1;
                out.push_str("\\r");
            }
            b'\t' => {
                cur += 1;
                out.push_str("\\t");
            }
            _ => {
                let codepoint =
                    utf8::scan_or_replace(bytes, &mut cur, options.fail_on_bad_utf8)?;
                write_codepoint(out, codepoint, options.raw_unicode);
            }
        }
    }
    out.push('"');
    Ok(())
}

fn write_codepoint(out: &mut String, codepoint: u32, raw_unicode: bool) {
    if codepoint < 0x20 {
        write_code_unit(out, codepoint);
    } else if codepoint < 0x80 {
        out.push(codepoint as u8 as char);
    } else if raw_unicode {
        out.push(char::from_u32(codepoint).unwrap_or(char::REPLACEMENT_CHARACTER));
    } else if codepoint <= 0xFFFF {
        write_code_unit(out, codepoint);
    } else {
        // Beyond the BMP: escape as a surrogate pair.
        let reduced = codepoint - 0x10000;
        write_code_unit(out, 0xD800 | (reduced >> 10));
        write_code_unit(out, 0xDC00 | (reduced & 0x3FF));
    }
}

fn write_code_unit(out: &mut String, unit: u32) {
    let _ = write!(out, "\\u{unit:04x}");
}

/// Write a float with at most `precision` significant digits, choosing
/// positional or scientific notation the way `%g` does and dropping
/// trailing zeros.
pub(crate) fn write_float(out: &mut String, value: f64, precision: u16) {
    if value.is_nan() {
        out.push_str("nan");
        return;
    }
    if value.is_infinite() {
        out.push_str(if value < 0.0 { "-inf" } else { "inf" });
        return;
    }
    if value == 0.0 {
        out.push_str(if value.is_sign_negative() { "-0" } else { "0" });
        return;
    }

    let precision = usize::from(precision.max(1));
    let rendered = format!("{:.*e}", precision - 1, value);
    let (mantissa, exponent_text) = rendered.split_once('e').unwrap_or((&rendered, "0"));
    let exponent: i32 = exponent_text.parse().unwrap_or(0);
    if value < 0.0 {
        out.push('-');
    }
    let mut digits: Vec<u8> = mantissa
        .bytes()
        .filter(u8::is_ascii_digit)
        .collect();
    while digits.len() > 1 && digits.last() == Some(&b'0') {
        digits.pop();
    }

    if exponent < -4 || exponent >= precision as i32 {
        out.push(digits[0] as char);
        if digits.len() > 1 {
            out.push('.');
            for &digit in &digits[1..] {
                out.push(digit as char);
            }
        }
        let _ = write!(out, "e{exponent}");
    } else if exponent >= 0 {
        let integral_len = exponent as usize + 1;
        if digits.len() <= integral_len {
            for &digit in &digits {
                out.push(digit as char);
            }
            for _ in digits.len()..integral_len {
                out.push('0');
            }
        } else {
            for &digit in &digits[..integral_len] {
                out.push(digit as char);
            }
            out.push('.');
            for &digit in &digits[integral_len..] {
                out.push(digit as char);
            }
        }
    } else {
        out.push_str("0.");
        for _ in 0..(-exponent - 1) {
            out.push('0');
        }
        for &digit in &digits {
            out.push(digit as char);
        }
    }
}

/// A float's exact-number reading through its decimal rendering. The
/// recorded literal digit count wins over full precision.
pub(crate) fn float_to_exact(value: f64, sig_digits: u16) -> Result<ExactNumber, Error> {
    let mut rendered = String::new();
    write_float(
        &mut rendered,
        value,
        effective_digits(Tightness::Exact, sig_digits),
    );
    ExactNumber::parse(&rendered)
}
