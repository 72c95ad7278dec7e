//! HTML tokenizer for the Magpie engine.
//!
//! # Scope
//!
//! This crate implements the tokenization stage of
//! [WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization):
//!
//! - Data, RCDATA, RAWTEXT, script data, PLAINTEXT, and CDATA content modes
//! - Tag, attribute, comment, and DOCTYPE states
//! - Named and numeric character reference resolution
//!
//! The tokenizer is a pull iterator: [`tokenizer::HtmlTokenizer::next_token`]
//! returns one token per call and never blocks. Tree construction is the
//! consumer's job; in particular the consumer switches the tokenizer into
//! RAWTEXT/RCDATA/script-data after emitting the start tags that require it
//! (`<style>`, `<textarea>`, `<script>`, …) — the tokenizer itself does not
//! know that policy.
//!
//! # Not implemented
//!
//! - Script data escape states (`<!--` inside scripts)
//! - DOCTYPE public/system identifier capture (the tail is skipped)
//! - Tree construction / insertion modes

/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;

pub use tokenizer::{Attribute, HtmlTokenizer, Token, TokenizerState};
