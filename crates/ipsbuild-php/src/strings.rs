//! String literal reader
//!
//! Reads one logical string value: a quoted literal, optionally followed by
//! any number of `.` concatenations with trivia allowed around each operator.

use crate::cursor::Cursor;
use crate::errors::PhpArrayError;
use crate::escape::{decode_double_quoted, decode_single_quoted};
use crate::trivia::skip_trivia;

/// Read a string value, folding concatenated literals into one.
///
/// Leaves the cursor after any trivia following the last literal.
pub(crate) fn read_string_value(cursor: &mut Cursor<'_>) -> Result<String, PhpArrayError> {
    let mut value = read_string_literal(cursor)?;
    skip_trivia(cursor);

    while cursor.peek_char() == Some('.') {
        cursor.consume_char()?;
        skip_trivia(cursor);
        value.push_str(&read_string_literal(cursor)?);
        skip_trivia(cursor);
    }

    Ok(value)
}

fn read_string_literal(cursor: &mut Cursor<'_>) -> Result<String, PhpArrayError> {
    let offset = cursor.offset();
    let context = cursor.context();
    match cursor.consume_char()? {
        '\'' => read_quoted_body(cursor, '\'').map(decode_single_quoted),
        '"' => read_quoted_body(cursor, '"').map(decode_double_quoted),
        actual => Err(PhpArrayError::UnexpectedCharacter {
            expected: "' or \"",
            actual,
            offset,
            context,
        }),
    }
}

/// Consume up to and including the closing `delimiter`, returning the raw body.
///
/// A backslash always shields the next character from being read as the
/// delimiter; decoding happens afterwards on the captured body.
fn read_quoted_body<'a>(cursor: &mut Cursor<'a>, delimiter: char) -> Result<&'a str, PhpArrayError> {
    let offset = cursor.offset();
    let context = cursor.context();
    let literal = cursor
        .try_consume(|s| closing_delimiter(s, delimiter).map(|idx| idx + delimiter.len_utf8()))
        .ok_or(PhpArrayError::UnterminatedString { offset, context })?;
    Ok(&literal[..literal.len() - delimiter.len_utf8()])
}

fn closing_delimiter(s: &str, delimiter: char) -> Option<usize> {
    let mut chars = s.char_indices();
    while let Some((idx, ch)) = chars.next() {
        if ch == '\\' {
            chars.next();
        } else if ch == delimiter {
            return Some(idx);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use crate::strings::*;

    fn read(input: &str) -> Result<(String, &str), PhpArrayError> {
        let mut cursor = Cursor::new(input);
        let value = read_string_value(&mut cursor)?;
        Ok((value, cursor.remaining()))
    }

    #[test]
    fn test_reads_double_quoted() {
        assert_eq!(read("\"abc\", "), Ok(("abc".to_string(), ", ")));
    }

    #[test]
    fn test_reads_single_quoted() {
        assert_eq!(read("'a\\'b' ]"), Ok(("a'b".to_string(), "]")));
    }

    #[test]
    fn test_escaped_delimiter_does_not_close() {
        assert_eq!(read(r#""say \"hi\"""#), Ok(("say \"hi\"".to_string(), "")));
    }

    #[test]
    fn test_concatenation_chain() {
        assert_eq!(
            read("'a' . \"b\"\n . /* c */ 'c'.\"d\" ,"),
            Ok(("abcd".to_string(), ","))
        );
    }

    #[test]
    fn test_multiline_literal() {
        assert_eq!(
            read("\"one\n two\""),
            Ok(("one\n two".to_string(), ""))
        );
    }

    #[test]
    fn test_unterminated() {
        assert_eq!(
            read("\"abc"),
            Err(PhpArrayError::UnterminatedString {
                offset: 1,
                context: "abc".to_string()
            })
        );
        assert!(matches!(
            read("'abc\\'"),
            Err(PhpArrayError::UnterminatedString { .. })
        ));
    }

    #[test]
    fn test_non_string_value() {
        assert!(matches!(
            read("42,"),
            Err(PhpArrayError::UnexpectedCharacter {
                actual: '4',
                offset: 0,
                ..
            })
        ));
    }

    #[test]
    fn test_dangling_concatenation() {
        assert_eq!(read("'a' ."), Err(PhpArrayError::UnexpectedEndOfInput { offset: 5 }));
    }
}
