//! The stylesheet parser.
//!
//! Consumes the token stream into a [`StyleSheet`]. At-rules are dispatched
//! by keyword, case-insensitively; unknown at-rules are skipped to the next
//! `;` or balanced block, and bad declarations are silently dropped with
//! recovery at the next `;` or `}` per
//! [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).

use std::collections::HashMap;

use magpie_common::warning::warn_once;

use crate::tokenizer::{CssToken, CssTokenizer};

use super::{
    ComponentValue, ContainerRule, CounterStyleRule, Declaration, FontFaceRule, ImportRule,
    Keyframe, KeyframesRule, LayerRule, MediaRule, PropertyRule, ScopeRule, StyleRule, StyleSheet,
    SupportsRule,
};

/// CSS Nesting recursion budget; deeper nesting is skipped.
const MAX_NESTING_DEPTH: usize = 64;

/// Parse a stylesheet from source text.
#[must_use]
pub fn parse_stylesheet(css: &str) -> StyleSheet {
    let tokens = CssTokenizer::tokenize_all(css);
    StyleSheetParser::new(tokens).parse()
}

/// Parse a bare declaration block (a `style` attribute).
#[must_use]
pub fn parse_declaration_block(css: &str) -> Vec<Declaration> {
    let tokens = CssTokenizer::tokenize_all(css);
    StyleSheetParser::new(tokens).parse_declarations()
}

/// [§ 5.3.3 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
///
/// Token-cursor parser over a fully tokenized input. The `@layer` ordering
/// registry lives on the parser instance, so layer orders are scoped to one
/// stylesheet parse; an embedder that wants cross-sheet ordering reuses one
/// parser.
pub struct StyleSheetParser {
    tokens: Vec<CssToken>,
    position: usize,
    layer_orders: HashMap<String, usize>,
    next_layer_order: usize,
    next_anonymous_layer: usize,
}

impl StyleSheetParser {
    /// Create a parser over a token stream (EOF token optional).
    #[must_use]
    pub fn new(tokens: Vec<CssToken>) -> Self {
        Self {
            tokens,
            position: 0,
            layer_orders: HashMap::new(),
            next_layer_order: 0,
            next_anonymous_layer: 0,
        }
    }

    /// Parse the whole token stream into a stylesheet.
    pub fn parse(&mut self) -> StyleSheet {
        let mut sheet = StyleSheet::default();

        while !self.at_end() {
            self.skip_whitespace();
            if self.at_end() {
                break;
            }

            match self.current() {
                // Top-level CDO/CDC (HTML comment markers) are skipped.
                CssToken::CDO | CssToken::CDC => self.advance(),
                CssToken::AtKeyword(_) => self.parse_at_rule(&mut sheet),
                // Stray semicolons.
                CssToken::Semicolon => self.advance(),
                _ => self.parse_style_rule(&mut sheet),
            }
        }

        sheet
    }

    /// [§ 5.3.8 Parse a list of declarations](https://www.w3.org/TR/css-syntax-3/#parse-list-of-declarations)
    ///
    /// Parse declarations from a style attribute or descriptor block.
    pub fn parse_declarations(&mut self) -> Vec<Declaration> {
        let mut decls = Vec::new();
        while !self.at_end() {
            self.skip_whitespace();
            if self.at_end() || matches!(self.current(), CssToken::RightBrace) {
                break;
            }
            if matches!(self.current(), CssToken::Semicolon) {
                self.advance();
                continue;
            }
            if let Some(decl) = self.parse_declaration() {
                decls.push(decl);
            }
        }
        decls
    }

    // ------------------------------------------------------------------
    // Cursor helpers
    // ------------------------------------------------------------------

    fn current(&self) -> &CssToken {
        self.tokens.get(self.position).unwrap_or(&CssToken::EOF)
    }

    fn at_end(&self) -> bool {
        self.position >= self.tokens.len() || self.current().is_eof()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while !self.at_end() && self.current().is_whitespace() {
            self.advance();
        }
    }

    /// Skip a balanced `{ ... }` block. Assumes the cursor is at the
    /// opening brace (or just inside it).
    fn skip_block(&mut self) {
        if matches!(self.current(), CssToken::LeftBrace) {
            self.advance();
        }
        let mut depth = 1usize;
        while !self.at_end() && depth > 0 {
            match self.current() {
                CssToken::LeftBrace => depth += 1,
                CssToken::RightBrace => depth -= 1,
                _ => {}
            }
            self.advance();
        }
    }

    /// Skip an at-rule body: everything up to the next `;` or a balanced
    /// block.
    fn skip_at_rule(&mut self) {
        while !self.at_end() {
            match self.current() {
                CssToken::Semicolon => {
                    self.advance();
                    return;
                }
                CssToken::LeftBrace => {
                    self.skip_block();
                    return;
                }
                _ => self.advance(),
            }
        }
    }

    // ------------------------------------------------------------------
    // At-rule dispatch
    // ------------------------------------------------------------------

    /// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-an-at-rule)
    ///
    /// Dispatch by keyword, case-insensitively.
    fn parse_at_rule(&mut self, sheet: &mut StyleSheet) {
        let CssToken::AtKeyword(keyword) = self.current() else {
            self.advance();
            return;
        };
        let keyword = keyword.to_ascii_lowercase();
        self.advance();

        match keyword.as_str() {
            "import" => self.parse_import_rule(sheet),
            "media" => self.parse_media_rule(sheet),
            "keyframes" | "-webkit-keyframes" => self.parse_keyframes_rule(sheet),
            "font-face" => self.parse_font_face_rule(sheet),
            "supports" => self.parse_supports_rule(sheet),
            "layer" => self.parse_layer_rule(sheet, ""),
            "container" => self.parse_container_rule(sheet),
            "scope" => self.parse_scope_rule(sheet),
            "property" => self.parse_property_rule(sheet),
            "counter-style" => self.parse_counter_style_rule(sheet),
            // Parsed and discarded.
            "starting-style" | "font-palette-values" => self.skip_at_rule(),
            // @charset, @namespace, @page: recognized but not interpreted.
            "charset" | "namespace" | "page" => self.skip_at_rule(),
            // Unknown at-rules: skip to semicolon or balanced block.
            other => {
                warn_once("CSS", &format!("unsupported at-rule '@{other}'"));
                self.skip_at_rule();
            }
        }
    }

    /// `@import url("…")` / `@import url(bare)` / `@import "…"` with an
    /// optional media query tail captured verbatim.
    fn parse_import_rule(&mut self, sheet: &mut StyleSheet) {
        let mut rule = ImportRule::default();
        self.skip_whitespace();

        match self.current().clone() {
            // url("…") tokenizes as a function whose argument is a string.
            CssToken::Function(name) if name.eq_ignore_ascii_case("url") => {
                self.advance();
                self.skip_whitespace();
                if let CssToken::String(s) = self.current() {
                    rule.url = s.clone();
                    self.advance();
                }
                self.skip_whitespace();
                if matches!(self.current(), CssToken::RightParen) {
                    self.advance();
                }
            }
            // Bare url(foo.css) tokenizes as a <url-token>.
            CssToken::Url(url) => {
                rule.url = url;
                self.advance();
            }
            CssToken::String(s) => {
                rule.url = s;
                self.advance();
            }
            _ => {}
        }

        self.skip_whitespace();

        // Optional media query, verbatim until the terminating semicolon.
        let mut media = String::new();
        while !self.at_end() && !matches!(self.current(), CssToken::Semicolon) {
            if self.current().is_whitespace() {
                if !media.is_empty() && !media.ends_with(' ') {
                    media.push(' ');
                }
            } else {
                media.push_str(&self.current().text());
            }
            self.advance();
        }
        rule.media = media.trim_end().to_string();

        if matches!(self.current(), CssToken::Semicolon) {
            self.advance();
        }

        sheet.imports.push(rule);
    }

    /// `@media <condition> { rules }` — condition text kept verbatim.
    fn parse_media_rule(&mut self, sheet: &mut StyleSheet) {
        let condition = self.consume_prelude_text();
        let rules = self.parse_rule_block();
        sheet.media_queries.push(MediaRule { condition, rules });
    }

    /// `@supports <condition> { rules }`.
    fn parse_supports_rule(&mut self, sheet: &mut StyleSheet) {
        let condition = self.consume_prelude_text();
        let rules = self.parse_rule_block();
        sheet.supports_rules.push(SupportsRule { condition, rules });
    }

    /// `@container [name] (condition) { rules }` — the optional name is
    /// split off in front of the first parenthesis.
    fn parse_container_rule(&mut self, sheet: &mut StyleSheet) {
        let prelude = self.consume_prelude_text();
        let (name, condition) = match prelude.find('(') {
            Some(paren) => (
                prelude[..paren].trim_end().to_string(),
                prelude[paren..].to_string(),
            ),
            None => (String::new(), prelude),
        };
        let rules = self.parse_rule_block();
        sheet.container_rules.push(ContainerRule {
            name,
            condition,
            rules,
        });
    }

    /// `@scope (start) [to (end)] { rules }`.
    fn parse_scope_rule(&mut self, sheet: &mut StyleSheet) {
        let prelude = self.consume_prelude_text();

        let (start_part, end_part) = match prelude.find(" to (").or_else(|| prelude.find(" to(")) {
            Some(pos) => (&prelude[..pos], &prelude[pos + 4..]),
            None => (prelude.as_str(), ""),
        };

        // "(selector)" → "selector"
        let strip_parens = |s: &str| -> String {
            s.trim()
                .trim_start_matches('(')
                .trim_end_matches(')')
                .trim()
                .to_string()
        };

        let rules = self.parse_rule_block();
        sheet.scope_rules.push(ScopeRule {
            scope_start: strip_parens(start_part),
            scope_end: strip_parens(end_part),
            rules,
        });
    }

    /// `@keyframes name { from|to|N% { decls } * }`.
    fn parse_keyframes_rule(&mut self, sheet: &mut StyleSheet) {
        let mut rule = KeyframesRule::default();
        self.skip_whitespace();

        match self.current() {
            CssToken::Ident(name) | CssToken::String(name) => {
                rule.name = name.clone();
                self.advance();
            }
            _ => {}
        }

        self.skip_whitespace();
        if matches!(self.current(), CssToken::LeftBrace) {
            self.advance();
        }

        while !self.at_end() && !matches!(self.current(), CssToken::RightBrace) {
            self.skip_whitespace();
            if self.at_end() || matches!(self.current(), CssToken::RightBrace) {
                break;
            }

            let mut frame = Keyframe::default();

            // Keyframe selector kept as raw text: "from", "to", "50%".
            let mut selector = String::new();
            while !self.at_end() && !matches!(self.current(), CssToken::LeftBrace) {
                if !self.current().is_whitespace() {
                    selector.push_str(&self.current().text());
                }
                self.advance();
            }
            frame.selector = selector;

            if matches!(self.current(), CssToken::LeftBrace) {
                self.advance();
            }
            frame.declarations = self.parse_declarations_until_close();
            if matches!(self.current(), CssToken::RightBrace) {
                self.advance();
            }

            rule.keyframes.push(frame);
        }

        if matches!(self.current(), CssToken::RightBrace) {
            self.advance();
        }

        sheet.keyframes.push(rule);
    }

    /// `@font-face { descriptors }` — descriptors extracted by name.
    fn parse_font_face_rule(&mut self, sheet: &mut StyleSheet) {
        let mut rule = FontFaceRule::default();
        self.skip_whitespace();

        if matches!(self.current(), CssToken::LeftBrace) {
            self.advance();
        }

        for decl in self.parse_declarations_until_close() {
            let value_text = decl.value_text();
            match decl.name.as_str() {
                "font-family" => rule.font_family = unquote(&value_text),
                "src" => rule.src = value_text,
                "font-weight" => {
                    rule.font_weight = value_text.clone();
                    if let Some((min, max)) = parse_font_weight_range(&value_text) {
                        rule.min_weight = min;
                        rule.max_weight = max;
                    } else {
                        rule.min_weight = 400;
                        rule.max_weight = 400;
                    }
                }
                "font-style" => rule.font_style = value_text,
                "unicode-range" => {
                    // Rejoin without spaces so U+XXXX-XXXX items survive
                    // tokenization.
                    let tight: String = decl
                        .values
                        .iter()
                        .map(ComponentValue::to_css_string)
                        .collect();
                    rule.unicode_range = tight.clone();
                    if let Some((min, max)) = parse_unicode_range(&tight) {
                        rule.unicode_min = min;
                        rule.unicode_max = max;
                    } else {
                        rule.unicode_min = 0;
                        rule.unicode_max = 0x0010_FFFF;
                    }
                }
                "font-display" => rule.font_display = value_text,
                "size-adjust" => rule.size_adjust = value_text,
                _ => {}
            }
        }

        if matches!(self.current(), CssToken::RightBrace) {
            self.advance();
        }

        sheet.font_faces.push(rule);
    }

    /// `@layer a.b, c;` (declaration form) or `@layer name? { rules }`
    /// (block form). `parent_layer` is the canonical name of the enclosing
    /// layer when recursing into nested `@layer` blocks.
    fn parse_layer_rule(&mut self, sheet: &mut StyleSheet, parent_layer: &str) {
        self.skip_whitespace();

        // Layer name prelude until '{' or ';'.
        let mut prelude = String::new();
        while !self.at_end()
            && !matches!(self.current(), CssToken::LeftBrace | CssToken::Semicolon)
        {
            if self.current().is_whitespace() {
                if !prelude.is_empty() && !prelude.ends_with(' ') {
                    prelude.push(' ');
                }
            } else {
                prelude.push_str(&self.current().text());
            }
            self.advance();
        }
        let prelude = prelude.trim().to_string();
        let declared_names = split_layer_name_list(&prelude);

        // Declaration-only form: assign orders and return.
        if matches!(self.current(), CssToken::Semicolon) {
            if declared_names.is_empty() {
                let anon = self.anonymous_layer_name();
                let canonical = canonical_layer_name(&anon, parent_layer);
                let order = self.ensure_layer_order(&canonical);
                sheet.layer_rules.push(LayerRule {
                    name: canonical,
                    order,
                    rules: Vec::new(),
                });
            } else {
                for name in &declared_names {
                    let canonical = canonical_layer_name(name, parent_layer);
                    let order = self.ensure_layer_order(&canonical);
                    sheet.layer_rules.push(LayerRule {
                        name: canonical,
                        order,
                        rules: Vec::new(),
                    });
                }
            }
            self.advance();
            return;
        }

        // Block form: a single (possibly anonymous) layer name.
        let local_name = declared_names.first().cloned().unwrap_or_default();
        let canonical = if local_name.is_empty() {
            let anon = self.anonymous_layer_name();
            canonical_layer_name(&anon, parent_layer)
        } else {
            canonical_layer_name(&local_name, parent_layer)
        };
        let order = self.ensure_layer_order(&canonical);

        let mut rule = LayerRule {
            name: canonical.clone(),
            order,
            rules: Vec::new(),
        };

        if matches!(self.current(), CssToken::LeftBrace) {
            self.advance();
        }

        while !self.at_end() && !matches!(self.current(), CssToken::RightBrace) {
            self.skip_whitespace();
            if self.at_end() || matches!(self.current(), CssToken::RightBrace) {
                break;
            }

            if let CssToken::AtKeyword(nested) = self.current() {
                let nested = nested.to_ascii_lowercase();
                self.advance();
                if nested == "layer" {
                    // Nested layers are parented by the enclosing canonical
                    // name.
                    self.parse_layer_rule(sheet, &canonical);
                } else {
                    self.skip_at_rule();
                }
            } else if let Some(mut style_rule) = self.parse_inner_style_rule() {
                style_rule.in_layer = true;
                style_rule.layer_name = rule.name.clone();
                style_rule.layer_order = rule.order;
                rule.rules.push(style_rule);
            }
        }

        if matches!(self.current(), CssToken::RightBrace) {
            self.advance();
        }

        sheet.layer_rules.push(rule);
    }

    /// `@property --name { syntax: "…"; inherits: true|false;
    /// initial-value: … }`.
    fn parse_property_rule(&mut self, sheet: &mut StyleSheet) {
        self.skip_whitespace();

        let mut name = String::new();
        while !self.at_end() && !matches!(self.current(), CssToken::LeftBrace) {
            if !self.current().is_whitespace() {
                name.push_str(&self.current().text());
            }
            self.advance();
        }

        let mut rule = PropertyRule {
            name: name.trim().to_string(),
            ..PropertyRule::default()
        };

        if matches!(self.current(), CssToken::LeftBrace) {
            self.advance();
        }

        for decl in self.parse_declarations_until_close() {
            match decl.name.as_str() {
                "syntax" => rule.syntax = unquote(&decl.value_text()),
                "inherits" => rule.inherits = decl.value_text() == "true",
                "initial-value" => rule.initial_value = decl.value_text(),
                _ => {}
            }
        }

        if matches!(self.current(), CssToken::RightBrace) {
            self.advance();
        }

        // Rules without a name are dropped.
        if !rule.name.is_empty() {
            sheet.property_rules.push(rule);
        }
    }

    /// `@counter-style name { descriptors }` — a name plus a descriptor
    /// map.
    fn parse_counter_style_rule(&mut self, sheet: &mut StyleSheet) {
        self.skip_whitespace();

        let mut name = String::new();
        while !self.at_end()
            && !matches!(self.current(), CssToken::LeftBrace | CssToken::Semicolon)
        {
            if !self.current().is_whitespace() {
                name.push_str(&self.current().text());
            }
            self.advance();
        }

        let mut rule = CounterStyleRule {
            name: name.trim().to_string(),
            ..CounterStyleRule::default()
        };

        if matches!(self.current(), CssToken::LeftBrace) {
            self.advance();
        }
        for decl in self.parse_declarations_until_close() {
            let _ = rule.descriptors.insert(decl.name.clone(), decl.value_text());
        }
        if matches!(self.current(), CssToken::RightBrace) {
            self.advance();
        }

        if !rule.name.is_empty() {
            sheet.counter_style_rules.push(rule);
        }
    }

    // ------------------------------------------------------------------
    // Style rules and nesting
    // ------------------------------------------------------------------

    /// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
    ///
    /// Parse a top-level style rule, resolving nested rules against the
    /// parent selector and flattening them after it.
    fn parse_style_rule(&mut self, sheet: &mut StyleSheet) {
        let selector_text = self.consume_selector_text();

        if matches!(self.current(), CssToken::LeftBrace) {
            self.advance();
        }

        let mut rule = StyleRule {
            selector_text: selector_text.clone(),
            ..StyleRule::default()
        };
        let mut nested = Vec::new();
        self.parse_nested_block(&selector_text, &mut rule.declarations, &mut nested, 0);

        if matches!(self.current(), CssToken::RightBrace) {
            self.advance();
        }

        sheet.rules.push(rule);
        // Nested rules follow their parent in cascade order.
        sheet.rules.extend(nested);
    }

    /// Parse the contents of a `{ }` block: declarations plus nested style
    /// rules (CSS Nesting), the latter resolved against `parent_selector`
    /// and flattened into `out_nested`. The caller consumes both braces.
    fn parse_nested_block(
        &mut self,
        parent_selector: &str,
        out_declarations: &mut Vec<Declaration>,
        out_nested: &mut Vec<StyleRule>,
        depth: usize,
    ) {
        while !self.at_end() && !matches!(self.current(), CssToken::RightBrace) {
            self.skip_whitespace();
            if self.at_end() || matches!(self.current(), CssToken::RightBrace) {
                break;
            }
            if matches!(self.current(), CssToken::Semicolon) {
                self.advance();
                continue;
            }

            if self.is_nested_rule_start() {
                let nested_selector = self.consume_selector_text();

                // If we hit '}' instead of '{', this was not a nested rule.
                if !matches!(self.current(), CssToken::LeftBrace) {
                    continue;
                }
                self.advance();

                // Bounded recursion on hostile input.
                if depth + 1 >= MAX_NESTING_DEPTH {
                    let mut inner_depth = 1usize;
                    while !self.at_end() && inner_depth > 0 {
                        match self.current() {
                            CssToken::LeftBrace => inner_depth += 1,
                            CssToken::RightBrace => inner_depth -= 1,
                            _ => {}
                        }
                        self.advance();
                    }
                    continue;
                }

                let resolved = resolve_nested_selector(parent_selector, &nested_selector);

                let mut nested_rule = StyleRule {
                    selector_text: resolved.clone(),
                    ..StyleRule::default()
                };
                let mut deeper = Vec::new();
                self.parse_nested_block(
                    &resolved,
                    &mut nested_rule.declarations,
                    &mut deeper,
                    depth + 1,
                );

                if matches!(self.current(), CssToken::RightBrace) {
                    self.advance();
                }

                out_nested.push(nested_rule);
                out_nested.extend(deeper);
            } else if let Some(decl) = self.parse_declaration() {
                out_declarations.push(decl);
            }
        }
    }

    /// Does the current token begin a nested style rule rather than a
    /// declaration? Declarations always start with an ident followed by a
    /// colon; nested rules start with selector-like tokens:
    /// `&` `.` `#` `:` `[` `>` `+` `~` `*`.
    fn is_nested_rule_start(&self) -> bool {
        match self.current() {
            CssToken::Delim('&' | '.' | '>' | '+' | '~' | '*') => true,
            // At statement start a hash is an id selector, not a color.
            CssToken::Hash { .. } => true,
            // Pseudo selector (:hover, ::before).
            CssToken::Colon => true,
            // Attribute selector.
            CssToken::LeftBracket => true,
            _ => false,
        }
    }

    /// An inner style rule for at-rule blocks (`@media`, `@supports`,
    /// `@container`, `@scope`, `@layer`): selector + flat declarations, no
    /// nesting. Returns `None` when the selector is empty.
    fn parse_inner_style_rule(&mut self) -> Option<StyleRule> {
        let mut selector = String::new();
        while !self.at_end()
            && !matches!(self.current(), CssToken::LeftBrace | CssToken::RightBrace)
        {
            if self.current().is_whitespace() {
                if !selector.is_empty() && !selector.ends_with(' ') {
                    selector.push(' ');
                }
            } else {
                selector.push_str(&self.current().text());
            }
            self.advance();
        }
        let selector = selector.trim_end().to_string();

        if matches!(self.current(), CssToken::LeftBrace) {
            self.advance();
        }
        let declarations = self.parse_declarations_until_close();
        if matches!(self.current(), CssToken::RightBrace) {
            self.advance();
        }

        if selector.is_empty() {
            return None;
        }
        Some(StyleRule {
            selector_text: selector,
            declarations,
            ..StyleRule::default()
        })
    }

    /// Parse the flat style rules of an at-rule block; nested at-rules
    /// inside are skipped. The caller's opening brace prelude is consumed
    /// here; both braces are consumed.
    fn parse_rule_block(&mut self) -> Vec<StyleRule> {
        let mut rules = Vec::new();

        if matches!(self.current(), CssToken::LeftBrace) {
            self.advance();
        }

        while !self.at_end() && !matches!(self.current(), CssToken::RightBrace) {
            self.skip_whitespace();
            if self.at_end() || matches!(self.current(), CssToken::RightBrace) {
                break;
            }

            if matches!(self.current(), CssToken::AtKeyword(_)) {
                self.advance();
                self.skip_at_rule();
            } else if let Some(rule) = self.parse_inner_style_rule() {
                rules.push(rule);
            }
        }

        if matches!(self.current(), CssToken::RightBrace) {
            self.advance();
        }

        rules
    }

    /// Reconstruct selector text up to the opening `{`.
    ///
    /// The tokenizer strips `#` from hash tokens and `(` from function
    /// tokens; both are re-prefixed here so the selector round-trips.
    fn consume_selector_text(&mut self) -> String {
        let mut text = String::new();
        while !self.at_end()
            && !matches!(self.current(), CssToken::LeftBrace | CssToken::RightBrace)
        {
            if self.current().is_whitespace() {
                if !text.is_empty() && !text.ends_with(' ') {
                    text.push(' ');
                }
            } else {
                text.push_str(&self.current().text());
            }
            self.advance();
        }
        text.trim_end().to_string()
    }

    /// Condition/prelude text up to the opening `{`, parenthesis-aware so
    /// a `(min-width: 400px)` group keeps its internal spacing rules.
    fn consume_prelude_text(&mut self) -> String {
        self.skip_whitespace();
        let mut text = String::new();
        let mut paren_depth = 0usize;

        while !self.at_end() {
            match self.current() {
                CssToken::LeftBrace if paren_depth == 0 => break,
                CssToken::LeftParen => paren_depth += 1,
                CssToken::RightParen => paren_depth = paren_depth.saturating_sub(1),
                CssToken::Function(_) => paren_depth += 1,
                _ => {}
            }
            if self.current().is_whitespace() {
                if !text.is_empty() && !text.ends_with(' ') && !text.ends_with('(') {
                    text.push(' ');
                }
            } else {
                text.push_str(&self.current().text());
            }
            self.advance();
        }

        text.trim_end().to_string()
    }

    // ------------------------------------------------------------------
    // Declarations and component values
    // ------------------------------------------------------------------

    /// Declarations until the closing `}` of the current block (the brace
    /// itself is left for the caller).
    fn parse_declarations_until_close(&mut self) -> Vec<Declaration> {
        let mut decls = Vec::new();
        while !self.at_end() && !matches!(self.current(), CssToken::RightBrace) {
            self.skip_whitespace();
            if self.at_end() || matches!(self.current(), CssToken::RightBrace) {
                break;
            }
            if matches!(self.current(), CssToken::Semicolon) {
                self.advance();
                continue;
            }
            if let Some(decl) = self.parse_declaration() {
                decls.push(decl);
            }
        }
        decls
    }

    /// [§ 5.4.6 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
    ///
    /// Returns `None` on malformed input after recovering at the next `;`
    /// or `}`.
    fn parse_declaration(&mut self) -> Option<Declaration> {
        self.skip_whitespace();

        let name = match self.current() {
            CssToken::Ident(name) => name.to_ascii_lowercase(),
            _ => {
                // Not a valid declaration start; recover.
                while !self.at_end()
                    && !matches!(self.current(), CssToken::Semicolon | CssToken::RightBrace)
                {
                    self.advance();
                }
                if matches!(self.current(), CssToken::Semicolon) {
                    self.advance();
                }
                return None;
            }
        };
        self.advance();

        self.skip_whitespace();
        if !matches!(self.current(), CssToken::Colon) {
            // "If the next input token is anything other than a
            // <colon-token>, this is a parse error."
            while !self.at_end()
                && !matches!(self.current(), CssToken::Semicolon | CssToken::RightBrace)
            {
                self.advance();
            }
            return None;
        }
        self.advance();
        self.skip_whitespace();

        let mut values = Vec::new();
        while !self.at_end()
            && !matches!(
                self.current(),
                CssToken::Semicolon | CssToken::RightBrace | CssToken::EOF
            )
        {
            if self.current().is_whitespace() {
                self.advance();
                continue;
            }
            values.push(self.consume_component_value());
        }

        // "!important" — the last two component values are a '!' delim and
        // an 'important' ident (whitespace already dropped).
        let mut important = false;
        let n = values.len();
        if n >= 2
            && values[n - 1]
                .as_token()
                .is_some_and(|v| v.eq_ignore_ascii_case("important"))
            && values[n - 2].as_token() == Some("!")
        {
            important = true;
            values.truncate(n - 2);
        }

        if matches!(self.current(), CssToken::Semicolon) {
            self.advance();
        }

        Some(Declaration {
            name,
            values,
            important,
        })
    }

    /// [§ 5.4.7 Consume a component value](https://www.w3.org/TR/css-syntax-3/#consume-component-value)
    fn consume_component_value(&mut self) -> ComponentValue {
        match self.current().clone() {
            CssToken::Function(name) => {
                self.advance();
                self.consume_function(name)
            }
            CssToken::LeftParen => {
                self.advance();
                ComponentValue::Block {
                    opener: '(',
                    children: self.consume_block_children(&CssToken::RightParen),
                }
            }
            CssToken::LeftBracket => {
                self.advance();
                ComponentValue::Block {
                    opener: '[',
                    children: self.consume_block_children(&CssToken::RightBracket),
                }
            }
            token => {
                self.advance();
                component_value_from_token(&token)
            }
        }
    }

    fn consume_block_children(&mut self, closer: &CssToken) -> Vec<ComponentValue> {
        let mut children = Vec::new();
        while !self.at_end() && self.current() != closer {
            if self.current().is_whitespace() {
                self.advance();
                continue;
            }
            children.push(self.consume_component_value());
        }
        if !self.at_end() {
            self.advance(); // closer
        }
        children
    }

    /// [§ 5.4.9 Consume a function](https://www.w3.org/TR/css-syntax-3/#consume-function)
    ///
    /// Commas are preserved as explicit tokens so `var(--x, fallback)` and
    /// friends can be reconstructed faithfully.
    fn consume_function(&mut self, name: String) -> ComponentValue {
        let mut children = Vec::new();
        while !self.at_end() && !matches!(self.current(), CssToken::RightParen) {
            if self.current().is_whitespace() {
                self.advance();
                continue;
            }
            if matches!(self.current(), CssToken::Comma) {
                children.push(ComponentValue::token(","));
                self.advance();
                continue;
            }
            children.push(self.consume_component_value());
        }
        if matches!(self.current(), CssToken::RightParen) {
            self.advance();
        }
        ComponentValue::Function { name, children }
    }

    // ------------------------------------------------------------------
    // Layer registry
    // ------------------------------------------------------------------

    /// Return the existing order for a canonical layer name, or assign the
    /// next ascending one.
    fn ensure_layer_order(&mut self, canonical_name: &str) -> usize {
        if let Some(&order) = self.layer_orders.get(canonical_name) {
            return order;
        }
        let order = self.next_layer_order;
        self.next_layer_order += 1;
        let _ = self.layer_orders.insert(canonical_name.to_string(), order);
        order
    }

    fn anonymous_layer_name(&mut self) -> String {
        let id = self.next_anonymous_layer;
        self.next_anonymous_layer += 1;
        format!("__anon_{id}")
    }
}

/// Convert a preserved token into a component value.
///
/// Hash tokens keep their `#` prefix so color parsing works on the flat
/// text; quoted strings keep their quotes; bare `url(…)` tokens become a
/// `url` function so serialization round-trips.
fn component_value_from_token(token: &CssToken) -> ComponentValue {
    match token {
        CssToken::Number { value, .. } => ComponentValue::Token {
            value: token.text(),
            numeric_value: *value,
            unit: String::new(),
        },
        CssToken::Percentage { value, .. } => ComponentValue::Token {
            value: token.text(),
            numeric_value: *value,
            unit: "%".to_string(),
        },
        CssToken::Dimension { value, unit, .. } => ComponentValue::Token {
            value: token.text(),
            numeric_value: *value,
            unit: unit.clone(),
        },
        CssToken::Url(url) => ComponentValue::Function {
            name: "url".to_string(),
            children: vec![ComponentValue::token(url.clone())],
        },
        _ => ComponentValue::token(token.text()),
    }
}

/// Split an `@layer` prelude on top-level commas.
fn split_layer_name_list(prelude: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut current = String::new();
    let mut paren_depth = 0usize;

    for c in prelude.chars() {
        match c {
            '(' => paren_depth += 1,
            ')' => paren_depth = paren_depth.saturating_sub(1),
            ',' if paren_depth == 0 => {
                if !current.trim().is_empty() {
                    names.push(current.trim().to_string());
                }
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    if !current.trim().is_empty() {
        names.push(current.trim().to_string());
    }
    names
}

/// Canonicalize a layer name against its enclosing layer: `b` inside `a`
/// becomes `a.b`.
fn canonical_layer_name(name: &str, parent_layer: &str) -> String {
    if name.is_empty() {
        return parent_layer.to_string();
    }
    if parent_layer.is_empty() {
        return name.to_string();
    }
    if name.starts_with(&format!("{parent_layer}.")) {
        return name.to_string();
    }
    format!("{parent_layer}.{name}")
}

/// [CSS Nesting § 2](https://www.w3.org/TR/css-nesting-1/#nest-selector)
///
/// Resolve a nested selector against the parent: every `&` is replaced
/// with the parent selector text; a selector without `&` gets the parent
/// prepended with a descendant combinator.
fn resolve_nested_selector(parent_selector: &str, nested: &str) -> String {
    if nested.contains('&') {
        nested.replace('&', parent_selector)
    } else {
        format!("{parent_selector} {nested}")
    }
}

/// Strip one layer of matching quotes.
fn unquote(s: &str) -> String {
    let s = s.trim();
    if s.len() >= 2
        && ((s.starts_with('"') && s.ends_with('"'))
            || (s.starts_with('\'') && s.ends_with('\'')))
    {
        s[1..s.len() - 1].to_string()
    } else {
        s.to_string()
    }
}

/// `font-weight` descriptor: `normal`, `bold`, or 100..=900, optionally as
/// a two-value range. Returns `(min, max)`.
fn parse_font_weight_range(value: &str) -> Option<(u16, u16)> {
    let single = |token: &str| -> Option<u16> {
        let token = token.trim().to_ascii_lowercase();
        match token.as_str() {
            "normal" => Some(400),
            "bold" => Some(700),
            _ => {
                let weight: u16 = token.parse().ok()?;
                (100..=900).contains(&weight).then_some(weight)
            }
        }
    };

    let tokens: Vec<&str> = value.split_whitespace().take(3).collect();
    match tokens.as_slice() {
        [one] => single(one).map(|w| (w, w)),
        [a, b] => {
            let first = single(a)?;
            let second = single(b)?;
            Some((first.min(second), first.max(second)))
        }
        _ => None,
    }
}

/// `unicode-range` descriptor: comma-separated `U+XXXX[-XXXX]` items; the
/// outer hull of all items is returned.
fn parse_unicode_range(value: &str) -> Option<(u32, u32)> {
    let mut min = u32::MAX;
    let mut max = 0u32;
    let mut any = false;

    let code_point = |hex: &str| -> Option<u32> {
        let v = u32::from_str_radix(hex.trim(), 16).ok()?;
        (v <= 0x0010_FFFF).then_some(v)
    };

    for item in value.split(',') {
        let item = item.trim().to_ascii_lowercase();
        let Some(range) = item.strip_prefix("u+") else {
            continue;
        };
        let (lo, hi) = match range.split_once('-') {
            Some((lo, hi)) => {
                let lo = code_point(lo);
                let hi = code_point(hi);
                match (lo, hi) {
                    (Some(lo), Some(hi)) => (lo.min(hi), lo.max(hi)),
                    _ => continue,
                }
            }
            None => match code_point(range) {
                Some(v) => (v, v),
                None => continue,
            },
        };
        any = true;
        min = min.min(lo);
        max = max.max(hi);
    }

    any.then_some((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_selector_resolution() {
        assert_eq!(resolve_nested_selector(".card", "&:hover"), ".card:hover");
        assert_eq!(resolve_nested_selector(".card", ".title"), ".card .title");
        assert_eq!(
            resolve_nested_selector(".a", "& > .b, & .c"),
            ".a > .b, .a .c"
        );
    }

    #[test]
    fn layer_names_canonicalize() {
        assert_eq!(canonical_layer_name("b", "a"), "a.b");
        assert_eq!(canonical_layer_name("b", ""), "b");
        assert_eq!(canonical_layer_name("a.b", "a"), "a.b");
    }

    #[test]
    fn font_weight_ranges() {
        assert_eq!(parse_font_weight_range("400"), Some((400, 400)));
        assert_eq!(parse_font_weight_range("bold"), Some((700, 700)));
        assert_eq!(parse_font_weight_range("700 300"), Some((300, 700)));
        assert_eq!(parse_font_weight_range("1000"), None);
    }

    #[test]
    fn unicode_ranges_take_outer_hull() {
        assert_eq!(parse_unicode_range("U+0000-00FF"), Some((0x0, 0xFF)));
        assert_eq!(
            parse_unicode_range("U+0025-00FF, U+4??"),
            Some((0x25, 0xFF))
        );
        assert_eq!(parse_unicode_range("garbage"), None);
    }
}
