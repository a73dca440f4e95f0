use thiserror::Error;

/// Errors raised while recovering a value from a PHP array literal.
///
/// `context` is a short snippet of the input remaining at the failure point,
/// `offset` is the byte offset of that point in the original input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PhpArrayError {
    #[error("Tried to parse a file as a PHP array that doesn't look right: {context}")]
    MalformedPreamble { context: String },

    #[error("String was started but never terminated at {context}")]
    UnterminatedString { offset: usize, context: String },

    #[error("Expected {expected} but found {actual} at {context}")]
    UnexpectedCharacter {
        expected: &'static str,
        actual: char,
        offset: usize,
        context: String,
    },

    #[error("Unexpected end of input at offset {offset}")]
    UnexpectedEndOfInput { offset: usize },

    #[error("Expected , but found {actual} at {context}")]
    MissingComma {
        actual: char,
        offset: usize,
        context: String,
    },

    #[error("Array was closed without a terminating ; at {context}")]
    MissingTerminator { offset: usize, context: String },
}

impl PhpArrayError {
    /// Diagnostic snippet of the input at the failure point.
    ///
    /// Empty for [`PhpArrayError::UnexpectedEndOfInput`], where nothing remains.
    pub fn context(&self) -> &str {
        match self {
            PhpArrayError::MalformedPreamble { context }
            | PhpArrayError::UnterminatedString { context, .. }
            | PhpArrayError::UnexpectedCharacter { context, .. }
            | PhpArrayError::MissingComma { context, .. }
            | PhpArrayError::MissingTerminator { context, .. } => context,
            PhpArrayError::UnexpectedEndOfInput { .. } => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::*;

    #[test]
    fn test_unexpected_character_display() {
        let err = PhpArrayError::UnexpectedCharacter {
            expected: "=",
            actual: '"',
            offset: 12,
            context: "\"1\"];".to_string(),
        };
        assert_eq!(err.to_string(), "Expected = but found \" at \"1\"];");
    }

    #[test]
    fn test_context_for_end_of_input_is_empty() {
        let err = PhpArrayError::UnexpectedEndOfInput { offset: 4 };
        assert_eq!(err.context(), "");
    }
}
