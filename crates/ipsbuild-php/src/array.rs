//! Array literal parsing
//!
//! One outer loop shared by both output shapes; an [`EntryReader`] decides
//! what a single entry looks like and where it is collected.

use indexmap::IndexMap;
use tracing::trace;

use crate::boundary::{at_terminator, read_preamble, read_separator, reject_bare_closer};
use crate::cursor::Cursor;
use crate::errors::PhpArrayError;
use crate::strings::read_string_value;
use crate::trivia::skip_trivia;

/// Parse a list literal such as `$x = ['a', 'b'];` into its values, in order
pub fn parse_array(php: &str) -> Result<Vec<String>, PhpArrayError> {
    let values = parse_with(php, ListEntries::default())?;
    trace!("Parsed PHP array with {} values", values.len());
    Ok(values)
}

/// Parse a map literal such as `$x = ['k' => 'v'];` into its entries.
///
/// Entries iterate in first-insertion order; a repeated key keeps the last value.
pub fn parse_associative_array(php: &str) -> Result<IndexMap<String, String>, PhpArrayError> {
    let entries = parse_with(php, MapEntries::default())?;
    trace!("Parsed PHP associative array with {} entries", entries.len());
    Ok(entries)
}

/// Reads one entry and collects it
trait EntryReader {
    type Output;

    fn read_entry(&mut self, cursor: &mut Cursor<'_>) -> Result<(), PhpArrayError>;

    fn finish(self) -> Self::Output;
}

#[derive(Default)]
struct ListEntries {
    values: Vec<String>,
}

impl EntryReader for ListEntries {
    type Output = Vec<String>;

    fn read_entry(&mut self, cursor: &mut Cursor<'_>) -> Result<(), PhpArrayError> {
        self.values.push(read_string_value(cursor)?);
        Ok(())
    }

    fn finish(self) -> Self::Output {
        self.values
    }
}

#[derive(Default)]
struct MapEntries {
    entries: IndexMap<String, String>,
}

impl EntryReader for MapEntries {
    type Output = IndexMap<String, String>;

    fn read_entry(&mut self, cursor: &mut Cursor<'_>) -> Result<(), PhpArrayError> {
        let key = read_string_value(cursor)?;
        cursor.assert_char('=', "=")?;
        cursor.assert_char('>', ">")?;
        skip_trivia(cursor);
        let value = read_string_value(cursor)?;

        self.entries.insert(key, value);
        Ok(())
    }

    fn finish(self) -> Self::Output {
        self.entries
    }
}

fn parse_with<R: EntryReader>(php: &str, mut reader: R) -> Result<R::Output, PhpArrayError> {
    let mut cursor = Cursor::new(php);
    read_preamble(&mut cursor)?;
    skip_trivia(&mut cursor);

    loop {
        if at_terminator(&mut cursor) {
            break;
        }
        reject_bare_closer(&cursor)?;
        reader.read_entry(&mut cursor)?;
        skip_trivia(&mut cursor);
        if at_terminator(&mut cursor) {
            break;
        }
        read_separator(&mut cursor)?;
        skip_trivia(&mut cursor);
    }

    Ok(reader.finish())
}
