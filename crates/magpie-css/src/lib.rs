//! CSS engine for Magpie: tokenizer, stylesheet parser, value model, and
//! the computed-style / layout-box data carriers.
//!
//! # Pipeline
//!
//! 1. [`tokenizer`] turns a UTF-8 byte slice into the CSS Syntax Level 3
//!    token stream.
//! 2. [`parser`] consumes the tokens into a [`parser::StyleSheet`] AST:
//!    style rules (with CSS Nesting flattened), `@import`, `@media`,
//!    `@keyframes`, `@font-face`, `@supports`, `@layer` (with the ordering
//!    registry), `@container`, `@scope`, `@property`, `@counter-style`.
//! 3. [`style`] parses declaration values into typed [`style::Length`],
//!    [`style::Color`], math expression trees, and aggregates them into
//!    [`style::ComputedStyle`].
//! 4. [`layout`] holds the geometry-side data model
//!    ([`layout::LayoutNode`], [`layout::BoxGeometry`]) that the layout
//!    engine reads. Layout *solving* lives outside this crate.
//!
//! Everything is synchronous and single-threaded; parsers take fully
//! buffered input and a parse runs to completion. Parse errors are silent:
//! a bad declaration is dropped and parsing resumes at the next `;` or
//! matching `}`.

/// Layout box data model.
pub mod layout;
/// Stylesheet parsing into the rule-list AST.
pub mod parser;
/// Typed CSS values and computed style.
pub mod style;
/// CSS Syntax Level 3 tokenizer.
pub mod tokenizer;

pub use parser::{ComponentValue, Declaration, StyleRule, StyleSheet};
pub use style::{Color, ComputedStyle, EvalContext, Length, ParseEnvironment, Unit};
pub use tokenizer::{CssToken, CssTokenizer};
