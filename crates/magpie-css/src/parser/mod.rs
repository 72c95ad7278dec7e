//! Stylesheet parsing.
//!
//! [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing)
//!
//! "The input to the parsing stage is a stream of tokens from the
//! tokenization stage."
//!
//! The parser dispatches at-rules by keyword and produces a typed
//! [`StyleSheet`] with separate lists per rule kind, which is what the
//! cascade consumes. Selector text is reconstructed verbatim from tokens
//! (re-prefixing the `#` the tokenizer stripped from hash tokens); selector
//! *matching* is outside this crate.

/// The stylesheet parser implementation.
pub mod stylesheet;

use std::collections::HashMap;

pub use stylesheet::{StyleSheetParser, parse_declaration_block, parse_stylesheet};

/// [§ 5.3.7 Consume a component value](https://www.w3.org/TR/css-syntax-3/#consume-a-component-value)
///
/// The unit of a declaration value: a preserved token, a function call, or
/// a bracketed block. Whitespace between component values is dropped during
/// parsing; commas inside function arguments are preserved as explicit
/// `,` tokens so constructs like `var(--x, fallback)` reconstruct
/// faithfully.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentValue {
    /// A preserved token, flattened to its textual form. Hash tokens keep
    /// their `#` prefix; quoted strings keep their quotes. `numeric_value`
    /// and `unit` are populated for number/percentage/dimension tokens
    /// (`unit` is `"%"` for percentages).
    Token {
        /// The token's textual content.
        value: String,
        /// Numeric value for number/percentage/dimension tokens.
        numeric_value: f64,
        /// Unit string for dimension tokens, `"%"` for percentages.
        unit: String,
    },
    /// A function call: name plus the component values of its arguments.
    Function {
        /// The function name without the opening parenthesis.
        name: String,
        /// The argument component values, commas preserved.
        children: Vec<ComponentValue>,
    },
    /// A simple block opened by `(`, `[`, or `{`.
    Block {
        /// The opening bracket character.
        opener: char,
        /// The block's component values.
        children: Vec<ComponentValue>,
    },
}

impl ComponentValue {
    /// Build a plain token component value with no numeric payload.
    #[must_use]
    pub fn token(value: impl Into<String>) -> Self {
        Self::Token {
            value: value.into(),
            numeric_value: 0.0,
            unit: String::new(),
        }
    }

    /// The token text if this is a `Token` component value.
    #[must_use]
    pub fn as_token(&self) -> Option<&str> {
        match self {
            Self::Token { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Serialize this component value back to CSS text.
    ///
    /// [§ 9 Serialization](https://www.w3.org/TR/css-syntax-3/#serialization)
    /// describes the round trip; this is the simplified form the value
    /// parsers consume (single spaces between values, `, ` after commas).
    #[must_use]
    pub fn to_css_string(&self) -> String {
        match self {
            Self::Token { value, .. } => value.clone(),
            Self::Function { name, children } => {
                format!("{name}({})", join_children(children))
            }
            Self::Block { opener, children } => {
                let closer = match opener {
                    '[' => ']',
                    '{' => '}',
                    _ => ')',
                };
                format!("{opener}{}{closer}", join_children(children))
            }
        }
    }
}

/// Serialize a component value list with single-space separators, keeping
/// commas tight on the left (`a, b` rather than `a , b`).
#[must_use]
pub fn component_values_to_string(values: &[ComponentValue]) -> String {
    join_children(values)
}

fn join_children(children: &[ComponentValue]) -> String {
    let mut result = String::new();
    for (i, child) in children.iter().enumerate() {
        if child.as_token() == Some(",") {
            result.push(',');
            if i + 1 < children.len() {
                result.push(' ');
            }
            continue;
        }
        if i > 0 && !result.ends_with(", ") && !result.is_empty() {
            result.push(' ');
        }
        result.push_str(&child.to_css_string());
    }
    result
}

/// [§ 5.4.4 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-a-declaration)
///
/// A CSS declaration (`color: red !important`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Declaration {
    /// The property name, lowercased.
    pub name: String,
    /// The property value as component values (whitespace dropped).
    pub values: Vec<ComponentValue>,
    /// Whether the declaration carried `!important` (the annotation is
    /// trimmed from `values`).
    pub important: bool,
}

impl Declaration {
    /// The declaration value serialized back to CSS text.
    #[must_use]
    pub fn value_text(&self) -> String {
        component_values_to_string(&self.values)
    }
}

/// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
///
/// A style rule. Nested rules (CSS Nesting) are resolved against their
/// parent selector and flattened into the sheet's rule list after the
/// parent, so every `StyleRule` here has a fully resolved selector.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StyleRule {
    /// The selector list text, verbatim.
    pub selector_text: String,
    /// The declarations in this rule block.
    pub declarations: Vec<Declaration>,
    /// True when this rule appeared inside an `@layer` block.
    pub in_layer: bool,
    /// The canonical (dotted) name of the enclosing layer, if any.
    pub layer_name: String,
    /// The enclosing layer's order, meaningful when `in_layer`.
    pub layer_order: usize,
}

/// `@import` — URL plus the verbatim media query tail, if any.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImportRule {
    /// The unquoted URL.
    pub url: String,
    /// The media query text following the URL, verbatim ("" when absent).
    pub media: String,
}

/// `@media` — the condition is captured verbatim; evaluation happens at
/// cascade time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MediaRule {
    /// The media query condition text.
    pub condition: String,
    /// The style rules inside the block.
    pub rules: Vec<StyleRule>,
}

/// One keyframe block inside `@keyframes` (`from`, `to`, or `N%`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Keyframe {
    /// The keyframe selector as raw text: "from", "to", "50%", ...
    pub selector: String,
    /// The declarations at this keyframe.
    pub declarations: Vec<Declaration>,
}

/// `@keyframes name { ... }` (also matched for `-webkit-keyframes`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KeyframesRule {
    /// The animation name.
    pub name: String,
    /// The keyframe blocks in source order.
    pub keyframes: Vec<Keyframe>,
}

/// `@font-face` descriptors, extracted by property name.
#[derive(Debug, Clone, PartialEq)]
pub struct FontFaceRule {
    /// `font-family`, unquoted.
    pub font_family: String,
    /// `src`, verbatim.
    pub src: String,
    /// `font-weight` raw text.
    pub font_weight: String,
    /// Lower bound of the weight range (single weights collapse to
    /// `min == max`; unparseable weights default to 400..=400).
    pub min_weight: u16,
    /// Upper bound of the weight range.
    pub max_weight: u16,
    /// `font-style`, verbatim.
    pub font_style: String,
    /// `unicode-range` raw text.
    pub unicode_range: String,
    /// Outer hull lower bound of all `U+XXXX[-XXXX]` items.
    pub unicode_min: u32,
    /// Outer hull upper bound.
    pub unicode_max: u32,
    /// `font-display`, verbatim.
    pub font_display: String,
    /// `size-adjust`, verbatim.
    pub size_adjust: String,
}

impl Default for FontFaceRule {
    fn default() -> Self {
        Self {
            font_family: String::new(),
            src: String::new(),
            font_weight: String::new(),
            min_weight: 400,
            max_weight: 400,
            font_style: String::new(),
            unicode_range: String::new(),
            unicode_min: 0,
            unicode_max: 0x0010_FFFF,
            font_display: String::new(),
            size_adjust: String::new(),
        }
    }
}

/// `@supports` — condition captured verbatim.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SupportsRule {
    /// The supports condition text.
    pub condition: String,
    /// The style rules inside the block.
    pub rules: Vec<StyleRule>,
}

/// `@layer` — either a declaration (`@layer a, b;`) or a block form.
///
/// Every canonical layer name is assigned an ascending integer order by a
/// per-parse registry; re-declaring a name returns its cached order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayerRule {
    /// The canonical dotted layer name ("" for anonymous block layers).
    pub name: String,
    /// The resolved ordering index.
    pub order: usize,
    /// The style rules inside a block-form layer (empty for declarations).
    pub rules: Vec<StyleRule>,
}

/// `@container [name] (condition) { ... }`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContainerRule {
    /// The optional container name preceding the condition.
    pub name: String,
    /// The container condition, parentheses included.
    pub condition: String,
    /// The style rules inside the block.
    pub rules: Vec<StyleRule>,
}

/// `@scope (start) [to (end)] { ... }`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScopeRule {
    /// The scope-start selector (parentheses stripped).
    pub scope_start: String,
    /// The scope-end selector, "" when absent.
    pub scope_end: String,
    /// The style rules inside the block.
    pub rules: Vec<StyleRule>,
}

/// `@property --name { syntax; inherits; initial-value }`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertyRule {
    /// The custom property name (including the `--` prefix).
    pub name: String,
    /// The `syntax` descriptor with quotes stripped.
    pub syntax: String,
    /// The `inherits` descriptor parsed as a boolean.
    pub inherits: bool,
    /// The `initial-value` descriptor, joined component values.
    pub initial_value: String,
}

/// `@counter-style name { descriptors }`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CounterStyleRule {
    /// The counter style name.
    pub name: String,
    /// Descriptor name → joined value text.
    pub descriptors: HashMap<String, String>,
}

/// [§ 5.3.3 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
///
/// A parsed stylesheet: the flat style-rule list (nested rules already
/// resolved and flattened) plus one list per at-rule kind.
/// `@starting-style` and `@font-palette-values` are consumed but not
/// represented.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StyleSheet {
    /// Style rules in cascade order.
    pub rules: Vec<StyleRule>,
    /// `@import` rules.
    pub imports: Vec<ImportRule>,
    /// `@media` rules.
    pub media_queries: Vec<MediaRule>,
    /// `@keyframes` rules.
    pub keyframes: Vec<KeyframesRule>,
    /// `@font-face` rules.
    pub font_faces: Vec<FontFaceRule>,
    /// `@supports` rules.
    pub supports_rules: Vec<SupportsRule>,
    /// `@layer` rules (declarations and blocks).
    pub layer_rules: Vec<LayerRule>,
    /// `@container` rules.
    pub container_rules: Vec<ContainerRule>,
    /// `@scope` rules.
    pub scope_rules: Vec<ScopeRule>,
    /// `@property` rules.
    pub property_rules: Vec<PropertyRule>,
    /// `@counter-style` rules.
    pub counter_style_rules: Vec<CounterStyleRule>,
}
