//! Recognisers for the edges of an array literal
//!
//! - the preamble: `$target = [` or `$target = array(`, preceded by anything
//! - the terminator: `]` or `)` followed by optional whitespace and `;`
//! - the separator between entries: `,`
//!
//! The first assignment in the input is the one parsed, and a `$` at the very
//! start is accepted; a greedy "last assignment wins" match is not used.

use crate::cursor::Cursor;
use crate::errors::PhpArrayError;

/// Consume everything up to and including the array's opening delimiter
pub(crate) fn read_preamble(cursor: &mut Cursor<'_>) -> Result<(), PhpArrayError> {
    let context = cursor.context();
    cursor
        .try_consume(preamble_len)
        .map(|_| ())
        .ok_or(PhpArrayError::MalformedPreamble { context })
}

/// Consume the closing delimiter and `;` if they are next
pub(crate) fn at_terminator(cursor: &mut Cursor<'_>) -> bool {
    cursor.try_consume(terminator_len).is_some()
}

/// Consume the `,` between two entries
pub(crate) fn read_separator(cursor: &mut Cursor<'_>) -> Result<(), PhpArrayError> {
    let offset = cursor.offset();
    let context = cursor.context();
    match cursor.consume_char()? {
        ',' => Ok(()),
        ']' | ')' => Err(PhpArrayError::MissingTerminator { offset, context }),
        actual => Err(PhpArrayError::MissingComma {
            actual,
            offset,
            context,
        }),
    }
}

/// Fail with `MissingTerminator` when a closer that did not form a
/// terminator sits where an entry should start
pub(crate) fn reject_bare_closer(cursor: &Cursor<'_>) -> Result<(), PhpArrayError> {
    match cursor.peek_char() {
        Some(']' | ')') => Err(PhpArrayError::MissingTerminator {
            offset: cursor.offset(),
            context: cursor.context(),
        }),
        _ => Ok(()),
    }
}

/// Length of the input up to the end of the first `$target = <opener>`
fn preamble_len(input: &str) -> Option<usize> {
    input
        .match_indices('$')
        .find_map(|(dollar, _)| assignment_len(input, dollar + 1))
}

/// Match `<non-whitespace>+ \s* = \s* <opener>` starting at `start`.
///
/// The target name may itself contain `=`, so every `=` inside the
/// non-whitespace run is tried as the assignment operator before the
/// end of the run is.
fn assignment_len(input: &str, start: usize) -> Option<usize> {
    let target = &input[start..];
    let run_len = target.find(char::is_whitespace).unwrap_or(target.len());
    if run_len == 0 {
        return None;
    }

    target[..run_len]
        .char_indices()
        .filter(|&(idx, ch)| idx > 0 && ch == '=')
        .map(|(idx, _)| idx)
        .chain(std::iter::once(run_len))
        .find_map(|split| opener_len(&target[split..]).map(|len| start + split + len))
}

/// Match `\s* = \s* ( '[' | '\'? array \s* '(' )`, case-insensitively
fn opener_len(s: &str) -> Option<usize> {
    let rest = s.trim_start().strip_prefix('=')?.trim_start();
    if let Some(after) = rest.strip_prefix('[') {
        return Some(s.len() - after.len());
    }

    let rest = rest.strip_prefix('\\').unwrap_or(rest);
    let keyword = rest.get(..5)?;
    if !keyword.eq_ignore_ascii_case("array") {
        return None;
    }
    let after = rest[5..].trim_start().strip_prefix('(')?;
    Some(s.len() - after.len())
}

fn terminator_len(s: &str) -> Option<usize> {
    let rest = s.strip_prefix([']', ')'])?;
    let after = rest.trim_start().strip_prefix(';')?;
    Some(s.len() - after.len())
}
