//! Whitespace and comment skipping
//!
//! Recognises whitespace runs, `//` and `#` line comments, and non-nesting
//! `/* */` block comments. A block comment without its closing `*/` is not
//! trivia and is left for the caller to reject.

use crate::cursor::Cursor;

/// Consume every run of whitespace and comments at the cursor
pub(crate) fn skip_trivia(cursor: &mut Cursor<'_>) {
    while cursor.try_consume(trivia_len).is_some() {}
}

fn trivia_len(s: &str) -> Option<usize> {
    whitespace_len(s)
        .or_else(|| line_comment_len(s))
        .or_else(|| block_comment_len(s))
}

fn whitespace_len(s: &str) -> Option<usize> {
    let len = s
        .find(|c: char| !c.is_whitespace())
        .unwrap_or(s.len());
    (len > 0).then_some(len)
}

fn line_comment_len(s: &str) -> Option<usize> {
    let body = s.strip_prefix("//").or_else(|| s.strip_prefix('#'))?;
    let opener = s.len() - body.len();
    Some(opener + body.find(['\n', '\r']).unwrap_or(body.len()))
}

fn block_comment_len(s: &str) -> Option<usize> {
    let body = s.strip_prefix("/*")?;
    body.find("*/").map(|end| 2 + end + 2)
}
