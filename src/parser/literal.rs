//! Decoding of literal token text into typed constants.
//!
//! Runs once, inside the lexer: everything downstream sees decoded values.

use super::error::{ParseError, ParseResult};
use super::span::Location;
use crate::model::Constant;

/// Decode the body of a string literal, quotes already removed
pub fn decode_string(body: &str, location: Location) -> ParseResult<String> {
    let units = decode_escapes(body, location)?;
    Ok(String::from_utf16_lossy(&units))
}

/// Decode a char literal including its quotes
pub fn decode_char(text: &str, location: Location) -> ParseResult<char> {
    let body = strip_quotes(text, '\'');
    let units = decode_escapes(body, location)?;
    match units.as_slice() {
        [unit] => char::from_u32(u32::from(*unit))
            .ok_or_else(|| ParseError::lexical("char literal is a lone surrogate", location)),
        _ => Err(ParseError::lexical(
            format!("char literal {} must hold exactly one character", text),
            location,
        )),
    }
}

pub fn strip_quotes(text: &str, quote: char) -> &str {
    let text = text.strip_prefix(quote).unwrap_or(text);
    text.strip_suffix(quote).unwrap_or(text)
}

// Works on UTF-16 units so escaped surrogate pairs combine
fn decode_escapes(body: &str, location: Location) -> ParseResult<Vec<u16>> {
    let mut units = Vec::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    let mut buf = [0u16; 2];

    while let Some(c) = chars.next() {
        if c != '\\' {
            units.extend_from_slice(c.encode_utf16(&mut buf));
            continue;
        }
        let escape = chars
            .next()
            .ok_or_else(|| ParseError::lexical("dangling '\\' in literal", location))?;
        let decoded = match escape {
            'b' => 0x08,
            't' => 0x09,
            'n' => 0x0A,
            'f' => 0x0C,
            'r' => 0x0D,
            's' => 0x20,
            '"' => 0x22,
            '\'' => 0x27,
            '\\' => 0x5C,
            'u' => {
                while chars.peek() == Some(&'u') {
                    chars.next();
                }
                let hex: String = chars.by_ref().take(4).collect();
                if hex.len() != 4 {
                    return Err(ParseError::lexical("truncated unicode escape", location));
                }
                u16::from_str_radix(&hex, 16)
                    .map_err(|_| ParseError::lexical(format!("invalid unicode escape \\u{}", hex), location))?
            }
            '0'..='7' => {
                // Up to three digits, and only when the first is 0-3
                let max_len = if escape <= '3' { 3 } else { 2 };
                let mut value = escape as u16 - '0' as u16;
                for _ in 1..max_len {
                    match chars.peek() {
                        Some(d @ '0'..='7') => {
                            value = value * 8 + (*d as u16 - '0' as u16);
                            chars.next();
                        }
                        _ => break,
                    }
                }
                value
            }
            other => {
                return Err(ParseError::lexical(format!("invalid escape sequence \\{}", other), location));
            }
        };
        units.push(decoded);
    }

    Ok(units)
}

/// Decode an integer literal: decimal, hex, octal or binary, `L` for long
pub fn decode_integer(text: &str, location: Location) -> ParseResult<Constant> {
    let (digits, is_long) = match text.strip_suffix(&['l', 'L'][..]) {
        Some(digits) => (digits, true),
        None => (text, false),
    };
    let cleaned = digits.replace('_', "");
    let (radix, body) = if let Some(hex) = cleaned.strip_prefix("0x").or_else(|| cleaned.strip_prefix("0X")) {
        (16, hex)
    } else if let Some(bin) = cleaned.strip_prefix("0b").or_else(|| cleaned.strip_prefix("0B")) {
        (2, bin)
    } else if cleaned.len() > 1 && cleaned.starts_with('0') {
        (8, &cleaned[1..])
    } else {
        (10, cleaned.as_str())
    };

    let out_of_range = || ParseError::lexical(format!("integer literal {} out of range", text), location);
    if body.is_empty() {
        return Err(ParseError::lexical(format!("malformed integer literal {}", text), location));
    }

    // Non-decimal literals fill the full bit width, two's complement
    if is_long {
        let magnitude = u64::from_str_radix(body, radix).map_err(|_| out_of_range())?;
        // 2^63 only ever appears as the operand of unary minus
        if radix == 10 && magnitude > i64::MIN.unsigned_abs() {
            return Err(out_of_range());
        }
        Ok(Constant::Long(magnitude as i64))
    } else {
        let magnitude = u32::from_str_radix(body, radix).map_err(|_| out_of_range())?;
        if radix == 10 && magnitude > i32::MIN.unsigned_abs() {
            return Err(out_of_range());
        }
        Ok(Constant::Int(magnitude as i32))
    }
}

/// Whether a decimal literal is `2147483648` or `9223372036854775808L`.
///
/// Those decode to the type's minimum and are only legal as the operand of
/// unary minus.
pub fn needs_negation(text: &str) -> bool {
    let (digits, is_long) = match text.strip_suffix(&['l', 'L'][..]) {
        Some(digits) => (digits, true),
        None => (text, false),
    };
    let cleaned = digits.replace('_', "");
    if cleaned.len() > 1 && cleaned.starts_with('0') {
        return false;
    }
    if is_long {
        cleaned.parse::<u64>().map_or(false, |v| v == i64::MIN.unsigned_abs())
    } else {
        cleaned.parse::<u32>().map_or(false, |v| v == i32::MIN.unsigned_abs())
    }
}

/// Decode a floating-point literal; no suffix or `d` is double, `f` is float
pub fn decode_floating(text: &str, location: Location) -> ParseResult<Constant> {
    let cleaned = text.replace('_', "");
    let is_hex = cleaned.starts_with("0x") || cleaned.starts_with("0X");
    let (number, is_float) = match cleaned.chars().last() {
        Some('f' | 'F') => (&cleaned[..cleaned.len() - 1], true),
        // `d` is a hex digit, but a hex float always ends in its exponent
        Some('d' | 'D') => (&cleaned[..cleaned.len() - 1], false),
        _ => (cleaned.as_str(), false),
    };

    let malformed = || ParseError::lexical(format!("malformed floating-point literal {}", text), location);
    let value = if is_hex {
        parse_hex_float(&number[2..]).ok_or_else(malformed)?
    } else {
        number.parse::<f64>().map_err(|_| malformed())?
    };

    if is_float {
        let single = if is_hex { value as f32 } else { number.parse::<f32>().map_err(|_| malformed())? };
        if single.is_infinite() {
            return Err(ParseError::lexical(format!("float literal {} out of range", text), location));
        }
        Ok(Constant::Float(single))
    } else {
        if value.is_infinite() {
            return Err(ParseError::lexical(format!("double literal {} out of range", text), location));
        }
        Ok(Constant::Double(value))
    }
}

// `1.8p1` style: hex mantissa, binary exponent
fn parse_hex_float(text: &str) -> Option<f64> {
    let (mantissa, exponent) = text.split_once(&['p', 'P'][..])?;
    let exponent: i32 = exponent.parse().ok()?;
    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }

    let mut value = 0f64;
    for digit in whole.chars() {
        value = value * 16.0 + f64::from(digit.to_digit(16)?);
    }
    let mut scale = 1.0 / 16.0;
    for digit in fraction.chars() {
        value += f64::from(digit.to_digit(16)?) * scale;
        scale /= 16.0;
    }
    Some(value * 2f64.powi(exponent))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at() -> Location {
        Location::new(5, 1, 0)
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(decode_string(r"a\nb\rc\td", at()).expect("decode"), "a\nb\rc\td");
        assert_eq!(decode_string(r"A\uu0042", at()).expect("decode"), "AB");
        assert_eq!(decode_string(r#"\"\'\\\s"#, at()).expect("decode"), "\"'\\ ");
        assert_eq!(decode_string(r"\0\101\7777", at()).expect("decode"), "\0A?77");
        assert_eq!(decode_string(r"😀", at()).expect("decode"), "\u{1F600}");
    }

    #[test]
    fn test_invalid_escape_is_lexical() {
        let err = decode_string(r"\q", at()).unwrap_err();
        assert_eq!(err.line(), 5);
        assert!(decode_string(r"\u12", at()).is_err());
    }

    #[test]
    fn test_char_literals() {
        assert_eq!(decode_char("'c'", at()).expect("decode"), 'c');
        assert_eq!(decode_char(r"'\n'", at()).expect("decode"), '\n');
        assert_eq!(decode_char(r"'A'", at()).expect("decode"), 'A');
        assert!(decode_char("'ab'", at()).is_err());
    }

    #[test]
    fn test_integer_radix_and_suffix() {
        assert_eq!(decode_integer("1", at()).expect("int"), Constant::Int(1));
        assert_eq!(decode_integer("0x1", at()).expect("hex"), Constant::Int(1));
        assert_eq!(decode_integer("0x1L", at()).expect("hex long"), Constant::Long(1));
        assert_eq!(decode_integer("1L", at()).expect("long"), Constant::Long(1));
        assert_eq!(decode_integer("017", at()).expect("octal"), Constant::Int(15));
        assert_eq!(decode_integer("0b1010", at()).expect("binary"), Constant::Int(10));
        assert_eq!(decode_integer("1_000", at()).expect("underscores"), Constant::Int(1000));
        assert_eq!(decode_integer("0xFFFFFFFF", at()).expect("wrap"), Constant::Int(-1));
        assert_eq!(decode_integer("0", at()).expect("zero"), Constant::Int(0));
    }

    #[test]
    fn test_integer_out_of_range() {
        assert!(decode_integer("2147483649", at()).is_err());
        assert!(decode_integer("0x1FFFFFFFF", at()).is_err());
        assert!(decode_integer("9223372036854775809L", at()).is_err());
        // Operands of unary minus wrap to the minimum value
        assert_eq!(decode_integer("2147483648", at()).expect("min int"), Constant::Int(i32::MIN));
        assert_eq!(
            decode_integer("9223372036854775808L", at()).expect("min long"),
            Constant::Long(i64::MIN)
        );
        assert_eq!(
            decode_integer("9223372036854775807L", at()).expect("max long"),
            Constant::Long(i64::MAX)
        );
    }

    #[test]
    fn test_minimum_magnitudes_need_negation() {
        assert!(needs_negation("2147483648"));
        assert!(needs_negation("2_147_483_648"));
        assert!(needs_negation("9223372036854775808L"));
        assert!(!needs_negation("2147483647"));
        assert!(!needs_negation("2147483648L"));
        assert!(!needs_negation("0x80000000"));
        assert!(!needs_negation("020000000000"));
    }

    #[test]
    fn test_floating_suffixes() {
        assert_eq!(decode_floating("1.0", at()).expect("double"), Constant::Double(1.0));
        assert_eq!(decode_floating("1.0d", at()).expect("double"), Constant::Double(1.0));
        assert_eq!(decode_floating("1.0D", at()).expect("double"), Constant::Double(1.0));
        assert_eq!(decode_floating("1.0f", at()).expect("float"), Constant::Float(1.0));
        assert_eq!(decode_floating("1F", at()).expect("float"), Constant::Float(1.0));
        assert_eq!(decode_floating("1e3", at()).expect("exp"), Constant::Double(1000.0));
        assert_eq!(decode_floating(".5", at()).expect("leading dot"), Constant::Double(0.5));
        assert_eq!(decode_floating("0x1.8p1", at()).expect("hex"), Constant::Double(3.0));
        assert!(decode_floating("1e400", at()).is_err());
        assert!(decode_floating("1e39f", at()).is_err());
    }
}
