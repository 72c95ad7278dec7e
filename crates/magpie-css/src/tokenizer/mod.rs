//! CSS tokenizer module.

/// CSS token types per [CSS Syntax Level 3 § 4](https://www.w3.org/TR/css-syntax-3/#tokenization).
pub mod token;
/// CSS tokenizer implementation.
pub mod tokenize;

pub use token::{CssToken, HashType, NumericType};
pub use tokenize::CssTokenizer;
