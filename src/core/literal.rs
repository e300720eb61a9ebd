//! Literal recognition for legacy attribute values
//!
//! Legacy preference files stored every value as attribute text in a small
//! literal syntax (`1234`, `0x1f`, `0.5`, `True`, `'text'`). Only those
//! literal forms are recognised here; anything else, including bare names
//! like `QRect` or `None` and any expression, is kept as the raw string.

use std::sync::LazyLock;

use regex_lite::Regex;

use super::value::Value;

const DIGITS: &str = "[0-9](?:_?[0-9])*";

static INT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[+-]?(?:0[xX](?:_?[0-9a-fA-F])+|0[oO](?:_?[0-7])+|0[bB](?:_?[01])+|[1-9](?:_?[0-9])*|0(?:_?0)*)$",
    )
    .expect("integer literal pattern is valid")
});

static FLOAT_RE: LazyLock<Regex> = LazyLock::new(|| {
    let exp = format!("[eE][+-]?{DIGITS}");
    let pattern = format!(
        r"^[+-]?(?:(?:{d})?\.{d}(?:{e})?|{d}\.(?:{e})?|{d}{e})$",
        d = DIGITS,
        e = exp
    );
    Regex::new(&pattern).expect("float literal pattern is valid")
});

/// Interpret `raw` as a literal, or keep it as a string
pub fn parse_literal(raw: &str) -> Value {
    let text = raw.trim();
    match text {
        "True" => return Value::Bool(true),
        "False" => return Value::Bool(false),
        _ => {}
    }

    parse_int(text)
        .or_else(|| parse_float(text))
        .or_else(|| parse_quoted(text).map(Value::String))
        .unwrap_or_else(|| Value::String(raw.to_string()))
}

fn parse_int(text: &str) -> Option<Value> {
    if !INT_RE.is_match(text) {
        return None;
    }

    let (negative, unsigned) = match text.as_bytes()[0] {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };
    let cleaned = unsigned.replace('_', "");
    let lower = cleaned.to_ascii_lowercase();
    let (radix, digits) = match lower.get(..2) {
        Some("0x") => (16, &cleaned[2..]),
        Some("0o") => (8, &cleaned[2..]),
        Some("0b") => (2, &cleaned[2..]),
        _ => (10, cleaned.as_str()),
    };

    let Ok(magnitude) = i128::from_str_radix(digits, radix) else {
        // Past i128 only decimal text is worth keeping as a number
        if radix != 10 {
            return None;
        }
        let value: f64 = digits.parse().ok()?;
        let value = if negative { -value } else { value };
        return value.is_finite().then_some(Value::Float(value));
    };
    let signed = if negative { -magnitude } else { magnitude };
    // Wider than i64 stays numeric as a float
    Some(match i64::try_from(signed) {
        Ok(value) => Value::Int(value),
        Err(_) => Value::Float(signed as f64),
    })
}

fn parse_float(text: &str) -> Option<Value> {
    if !FLOAT_RE.is_match(text) {
        return None;
    }
    let value: f64 = text.replace('_', "").parse().ok()?;
    value.is_finite().then_some(Value::Float(value))
}

/// Parse a single- or double-quoted string with backslash escapes
fn parse_quoted(text: &str) -> Option<String> {
    let mut chars = text.chars();
    let quote = chars.next().filter(|c| *c == '\'' || *c == '"')?;

    let mut out = String::new();
    let mut closed = false;
    while let Some(c) = chars.next() {
        if closed {
            // Anything after the closing quote is an expression
            return None;
        }
        match c {
            '\\' => unescape(&mut chars, &mut out)?,
            '\n' => return None,
            c if c == quote => closed = true,
            c => out.push(c),
        }
    }

    closed.then_some(out)
}

fn unescape(chars: &mut std::str::Chars<'_>, out: &mut String) -> Option<()> {
    let c = chars.next()?;
    match c {
        '\\' | '\'' | '"' => out.push(c),
        'n' => out.push('\n'),
        't' => out.push('\t'),
        'r' => out.push('\r'),
        'a' => out.push('\x07'),
        'b' => out.push('\x08'),
        'f' => out.push('\x0c'),
        'v' => out.push('\x0b'),
        '\n' => {}
        '0'..='7' => {
            let mut code = c.to_digit(8)?;
            for _ in 0..2 {
                match chars.clone().next().and_then(|d| d.to_digit(8)) {
                    Some(digit) => {
                        code = code * 8 + digit;
                        chars.next();
                    }
                    None => break,
                }
            }
            out.push(char::from_u32(code)?);
        }
        'x' => out.push(hex_escape(chars, 2)?),
        'u' => out.push(hex_escape(chars, 4)?),
        'U' => out.push(hex_escape(chars, 8)?),
        // Unknown escapes keep their backslash
        other => {
            out.push('\\');
            out.push(other);
        }
    }
    Some(())
}

fn hex_escape(chars: &mut std::str::Chars<'_>, len: usize) -> Option<char> {
    let digits: String = chars.by_ref().take(len).collect();
    if digits.len() != len {
        return None;
    }
    let code = u32::from_str_radix(&digits, 16).ok()?;
    char::from_u32(code)
}
