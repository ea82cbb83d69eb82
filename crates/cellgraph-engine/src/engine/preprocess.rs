//! Source rewriting applied before a formula is compiled.
//!
//! Cell values are floating point, so formulas compute in floating point
//! too: integer literals are rewritten as float literals (`7 / 2` compiles
//! as `7.0 / 2.0`). String and character literals are copied untouched.
//! Range literals (`1..5`) and radix literals (`0xff`) keep their integer
//! form.

/// Rewrite every decimal integer literal outside string literals as a float.
pub fn float_literals(expression: &str) -> String {
    let bytes = expression.as_bytes();
    let mut out = String::with_capacity(expression.len() + 8);
    let mut seg_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];

        if matches!(b, b'"' | b'`' | b'\'') {
            i = skip_quoted(bytes, i);
            continue;
        }

        if b.is_ascii_alphabetic() || b == b'_' {
            // Identifiers, including cell references such as `A1`.
            i = skip_while(bytes, i, |c| c.is_ascii_alphanumeric() || c == b'_');
            continue;
        }

        if !b.is_ascii_digit() {
            i += 1;
            continue;
        }

        let after_dot = i > 0 && bytes[i - 1] == b'.';
        if after_dot || (b == b'0' && matches!(bytes.get(i + 1), Some(b'x' | b'o' | b'b'))) {
            i = skip_while(bytes, i, |c| c.is_ascii_alphanumeric() || c == b'_');
            continue;
        }

        i = skip_while(bytes, i, is_digit);
        match bytes.get(i) {
            // Already a float (`1.5`, `1.5e3`).
            Some(b'.') if bytes.get(i + 1).is_some_and(u8::is_ascii_digit) => {
                i = skip_while(bytes, i + 1, is_digit);
                i = skip_exponent(bytes, i);
            }
            // Range (`1..5`) or method call on an integer.
            Some(b'.') => {}
            Some(b'e' | b'E') if exponent_len(bytes, i) > 0 => {
                out.push_str(&expression[seg_start..i]);
                out.push_str(".0");
                seg_start = i;
                i = skip_exponent(bytes, i);
            }
            _ => {
                out.push_str(&expression[seg_start..i]);
                out.push_str(".0");
                seg_start = i;
            }
        }
    }

    out.push_str(&expression[seg_start..]);
    out
}

fn is_digit(c: u8) -> bool {
    c.is_ascii_digit() || c == b'_'
}

fn skip_while(bytes: &[u8], mut i: usize, pred: impl Fn(u8) -> bool) -> usize {
    while i < bytes.len() && pred(bytes[i]) {
        i += 1;
    }
    i
}

/// Length of an exponent suffix (`e5`, `E-3`) starting at `i`, or 0.
fn exponent_len(bytes: &[u8], i: usize) -> usize {
    if !matches!(bytes.get(i), Some(b'e' | b'E')) {
        return 0;
    }
    let mut j = i + 1;
    if matches!(bytes.get(j), Some(b'+' | b'-')) {
        j += 1;
    }
    if !bytes.get(j).is_some_and(u8::is_ascii_digit) {
        return 0;
    }
    skip_while(bytes, j, is_digit) - i
}

fn skip_exponent(bytes: &[u8], i: usize) -> usize {
    i + exponent_len(bytes, i)
}

/// Index just past the literal opened at `start`. Backtick strings are raw;
/// the other quotes honour backslash escapes.
fn skip_quoted(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if quote != b'`' => i += 2,
            c if c == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}
