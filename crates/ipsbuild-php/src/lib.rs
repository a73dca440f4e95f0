//! PHP array literal parsing
//!
//! Plugin sources declare constant tables (language strings, lists of names)
//! as PHP array literals. This crate recovers their value without a PHP
//! runtime by scanning the source text once, left to right:
//!
//! 1. skip everything up to `$target = [` or `$target = array(`
//! 2. read entries separated by commas, with whitespace and `//`, `#`,
//!    `/* */` comments allowed between tokens
//! 3. stop at `];` or `);`
//!
//! Entries are single- or double-quoted string literals, optionally joined
//! with the `.` operator. Both PHP escape dialects are decoded.
//!
//! ```
//! let words = ipsbuild_php::parse_associative_array(
//!     "<?php\n$lang = ['greeting' => \"Hello\\tworld\"];",
//! )?;
//! assert_eq!(words["greeting"], "Hello\tworld");
//! # Ok::<(), ipsbuild_php::PhpArrayError>(())
//! ```

mod array;
mod boundary;
mod cursor;
pub mod errors;
pub mod escape;
mod strings;
mod trivia;

pub use array::{parse_array, parse_associative_array};
pub use errors::PhpArrayError;
