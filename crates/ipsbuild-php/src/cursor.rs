//! Forward-only cursor over the parser input
//!
//! The input is never copied or rewritten; consuming text narrows the
//! remaining slice from the front.

use crate::errors::PhpArrayError;

/// Number of characters shown in error snippets
const CONTEXT_CHARS: usize = 30;

#[derive(Debug, Clone)]
pub(crate) struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(input: &'a str) -> Self {
        Cursor { input, pos: 0 }
    }

    /// The unconsumed part of the input
    pub fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Byte offset of the cursor in the original input
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Run `scanner` against the remaining input and consume what it matched.
    ///
    /// The scanner returns the byte length of an anchored match. On `None`
    /// the cursor is left untouched.
    pub fn try_consume<F>(&mut self, scanner: F) -> Option<&'a str>
    where
        F: FnOnce(&'a str) -> Option<usize>,
    {
        let remaining = self.remaining();
        let len = scanner(remaining)?;
        let matched = remaining.get(..len)?;
        self.pos += len;
        Some(matched)
    }

    pub fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    pub fn consume_char(&mut self) -> Result<char, PhpArrayError> {
        let ch = self
            .peek_char()
            .ok_or(PhpArrayError::UnexpectedEndOfInput { offset: self.pos })?;
        self.pos += ch.len_utf8();
        Ok(ch)
    }

    /// Consume one character, failing unless it is `expected`
    pub fn assert_char(&mut self, expected: char, label: &'static str) -> Result<(), PhpArrayError> {
        let offset = self.offset();
        let context = self.context();
        let actual = self.consume_char()?;
        if actual == expected {
            Ok(())
        } else {
            Err(PhpArrayError::UnexpectedCharacter {
                expected: label,
                actual,
                offset,
                context,
            })
        }
    }

    /// The next few characters of input with newlines escaped, for error messages
    pub fn context(&self) -> String {
        self.remaining()
            .chars()
            .take(CONTEXT_CHARS)
            .collect::<String>()
            .replace('\n', "\\n")
    }
}
