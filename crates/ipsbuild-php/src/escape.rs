//! Escape decoding for PHP string literals
//!
//! Single-quoted strings only know `\'` and `\\`. Double-quoted strings follow
//! <https://www.php.net/manual/en/language.types.string.php#language.types.string.syntax.double>.
//! Neither decoder fails: a backslash sequence that is not a recognised
//! escape is kept verbatim, backslash included.

/// Decode the body of a single-quoted literal
pub fn decode_single_quoted(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(ch) = chars.next() {
        match (ch, chars.peek()) {
            ('\\', Some(&next)) if next == '\'' || next == '\\' => {
                out.push(next);
                chars.next();
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Decode the body of a double-quoted literal in a single left-to-right pass
pub fn decode_double_quoted(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(idx) = rest.find('\\') {
        out.push_str(&rest[..idx]);
        let escape = &rest[idx + 1..];
        match decode_escape(escape) {
            Some((ch, len)) => {
                out.push(ch);
                rest = &escape[len..];
            }
            None => {
                out.push('\\');
                rest = escape;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Decode the escape following a backslash, returning the character and
/// the number of bytes it spans after the backslash
fn decode_escape(s: &str) -> Option<(char, usize)> {
    let first = *s.as_bytes().first()?;
    let simple = match first {
        b'n' => Some('\n'),
        b'r' => Some('\r'),
        b't' => Some('\t'),
        b'v' => Some('\u{0B}'),
        b'e' => Some('\u{1B}'),
        b'f' => Some('\u{0C}'),
        b'\\' => Some('\\'),
        b'$' => Some('$'),
        b'"' => Some('"'),
        _ => None,
    };
    if let Some(ch) = simple {
        return Some((ch, 1));
    }

    match first {
        b'0'..=b'7' => decode_octal(s),
        b'x' => decode_hex(&s[1..]).map(|(ch, len)| (ch, len + 1)),
        b'u' => decode_unicode(&s[1..]).map(|(ch, len)| (ch, len + 1)),
        _ => None,
    }
}

/// `\DDD`: one to three octal digits, at most `\377`
fn decode_octal(s: &str) -> Option<(char, usize)> {
    let len = leading_len(s, 3, |b| matches!(b, b'0'..=b'7'));
    let value = u32::from_str_radix(&s[..len], 8).ok()?;
    if value > 0o377 {
        return None;
    }
    char::from_u32(value).map(|ch| (ch, len))
}

/// `\xHH`: one or two hex digits
fn decode_hex(s: &str) -> Option<(char, usize)> {
    let len = leading_len(s, 2, |b| b.is_ascii_hexdigit());
    if len == 0 {
        return None;
    }
    let value = u32::from_str_radix(&s[..len], 16).ok()?;
    char::from_u32(value).map(|ch| (ch, len))
}

/// `\u{H...}`: any number of hex digits naming a Unicode scalar value
fn decode_unicode(s: &str) -> Option<(char, usize)> {
    let digits = s.strip_prefix('{')?;
    let len = leading_len(digits, usize::MAX, |b| b.is_ascii_hexdigit());
    if len == 0 || !digits[len..].starts_with('}') {
        return None;
    }
    let value = u32::from_str_radix(&digits[..len], 16).ok()?;
    char::from_u32(value).map(|ch| (ch, len + 2))
}

fn leading_len(s: &str, max: usize, accept: impl Fn(u8) -> bool) -> usize {
    s.bytes().take(max).take_while(|&b| accept(b)).count()
}
