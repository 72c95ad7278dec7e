//! HTML tokenizer module.
//!
//! Implements [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//! of the WHATWG HTML Living Standard.

/// HTML tokenizer state machine implementation.
pub mod core;
/// Named and numeric character reference resolution per § 13.2.5.72.
pub mod entities;
/// Tokenizer state enum per § 13.2.5.
pub mod state;
/// Token types produced by the tokenizer.
pub mod token;

pub use self::core::HtmlTokenizer;
pub use state::TokenizerState;
pub use token::{Attribute, Token};
