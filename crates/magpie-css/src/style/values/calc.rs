//! CSS math expressions.
//!
//! [§ 10 Mathematical Expressions](https://www.w3.org/TR/css-values-4/#math)
//!
//! `calc()`, `min()`, `max()`, `clamp()`, the stepped-value functions
//! (`round`, `mod`, `rem`), the sign functions (`abs`, `sign`), and the
//! trigonometric/exponential families all compile into one [`CalcExpr`]
//! tree evaluated lazily against an [`EvalContext`].
//!
//! Lowerings:
//! - `clamp(a, b, c)` → `max(a, min(b, c))`
//! - `log(x, b)` → `log(x) / log(b)`
//! - n-ary `min`/`max`/`hypot` → left folds of the binary operator
//!
//! Recursion is bounded by an explicit decreasing depth budget (32); an
//! expression that exceeds it fails to parse and the declaration is
//! dropped, per the silent-recovery posture.

use std::rc::Rc;

use magpie_common::Scanner;

use super::length::{EvalContext, Length, Unit, split_leading_number, unit_from_suffix};

/// Maximum nesting depth for math expression parsing.
const MAX_MATH_DEPTH: usize = 32;

/// Operator tags for [`CalcExpr`] nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalcOp {
    /// A leaf value.
    Value,
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// Binary minimum.
    Min,
    /// Binary maximum.
    Max,
    /// `mod(a, b)` — result takes the sign of the divisor.
    Mod,
    /// `rem(a, b)` — result takes the sign of the dividend.
    Rem,
    /// `abs(x)`
    Abs,
    /// `sign(x)` — -1, 0, or 1.
    Sign,
    /// `round(nearest, v, i)`
    RoundNearest,
    /// `round(up, v, i)`
    RoundUp,
    /// `round(down, v, i)`
    RoundDown,
    /// `round(to-zero, v, i)`
    RoundToZero,
    /// `sin(x)` — x in radians (angle units normalize at parse time).
    Sin,
    /// `cos(x)`
    Cos,
    /// `tan(x)`
    Tan,
    /// `asin(x)` — returns radians.
    Asin,
    /// `acos(x)`
    Acos,
    /// `atan(x)`
    Atan,
    /// `atan2(y, x)`
    Atan2,
    /// `sqrt(x)`
    Sqrt,
    /// `pow(base, exponent)`
    Pow,
    /// `hypot(a, b)`
    Hypot,
    /// `exp(x)`
    Exp,
    /// `log(x)` — natural logarithm.
    Log,
}

/// A node in a math expression tree.
///
/// Leaves carry a [`Length`]; inner nodes carry an operator and one or two
/// children. Shared via `Rc` because `clamp` lowering reuses subtrees.
#[derive(Debug, Clone, PartialEq)]
pub struct CalcExpr {
    /// The operator; [`CalcOp::Value`] marks a leaf.
    pub op: CalcOp,
    /// The leaf payload, meaningful when `op == CalcOp::Value`.
    pub leaf: Length,
    /// Left operand (the only operand for unary operators).
    pub left: Option<Rc<CalcExpr>>,
    /// Right operand.
    pub right: Option<Rc<CalcExpr>>,
}

impl CalcExpr {
    /// A leaf node wrapping a length.
    #[must_use]
    pub fn value(leaf: Length) -> Rc<Self> {
        Rc::new(Self {
            op: CalcOp::Value,
            leaf,
            left: None,
            right: None,
        })
    }

    /// A binary node.
    #[must_use]
    pub fn binary(op: CalcOp, left: Rc<Self>, right: Rc<Self>) -> Rc<Self> {
        Rc::new(Self {
            op,
            leaf: Length::default(),
            left: Some(left),
            right: Some(right),
        })
    }

    /// A unary node.
    #[must_use]
    pub fn unary(op: CalcOp, operand: Rc<Self>) -> Rc<Self> {
        Rc::new(Self {
            op,
            leaf: Length::default(),
            left: Some(operand),
            right: None,
        })
    }

    fn eval_left(&self, ctx: &EvalContext) -> f32 {
        self.left.as_ref().map_or(0.0, |e| e.evaluate(ctx))
    }

    fn eval_right(&self, ctx: &EvalContext) -> f32 {
        self.right.as_ref().map_or(0.0, |e| e.evaluate(ctx))
    }

    /// Reduce the tree to a pixel value, resolving inner lengths through
    /// the unit rules (`%` against `ctx.parent_value`, `em` against the
    /// font size, viewport and container units against the configured
    /// dimensions).
    #[must_use]
    pub fn evaluate(&self, ctx: &EvalContext) -> f32 {
        match self.op {
            CalcOp::Value => self.leaf.to_px(ctx),
            CalcOp::Add => self.eval_left(ctx) + self.eval_right(ctx),
            CalcOp::Sub => self.eval_left(ctx) - self.eval_right(ctx),
            CalcOp::Mul => self.eval_left(ctx) * self.eval_right(ctx),
            CalcOp::Div => {
                let divisor = self.eval_right(ctx);
                if divisor == 0.0 {
                    0.0
                } else {
                    self.eval_left(ctx) / divisor
                }
            }
            CalcOp::Min => self.eval_left(ctx).min(self.eval_right(ctx)),
            CalcOp::Max => self.eval_left(ctx).max(self.eval_right(ctx)),
            CalcOp::Mod => {
                // Sign of the divisor: a - b * floor(a / b).
                let a = self.eval_left(ctx);
                let b = self.eval_right(ctx);
                if b == 0.0 { 0.0 } else { a - b * (a / b).floor() }
            }
            CalcOp::Rem => {
                // Sign of the dividend.
                let a = self.eval_left(ctx);
                let b = self.eval_right(ctx);
                if b == 0.0 { 0.0 } else { a % b }
            }
            CalcOp::Abs => self.eval_left(ctx).abs(),
            CalcOp::Sign => {
                let v = self.eval_left(ctx);
                if v > 0.0 {
                    1.0
                } else if v < 0.0 {
                    -1.0
                } else {
                    0.0
                }
            }
            CalcOp::RoundNearest => self.round_with(ctx, f32::round),
            CalcOp::RoundUp => self.round_with(ctx, f32::ceil),
            CalcOp::RoundDown => self.round_with(ctx, f32::floor),
            CalcOp::RoundToZero => self.round_with(ctx, f32::trunc),
            CalcOp::Sin => self.eval_left(ctx).sin(),
            CalcOp::Cos => self.eval_left(ctx).cos(),
            CalcOp::Tan => self.eval_left(ctx).tan(),
            CalcOp::Asin => self.eval_left(ctx).asin(),
            CalcOp::Acos => self.eval_left(ctx).acos(),
            CalcOp::Atan => self.eval_left(ctx).atan(),
            CalcOp::Atan2 => self.eval_left(ctx).atan2(self.eval_right(ctx)),
            CalcOp::Sqrt => self.eval_left(ctx).sqrt(),
            CalcOp::Pow => self.eval_left(ctx).powf(self.eval_right(ctx)),
            CalcOp::Hypot => self.eval_left(ctx).hypot(self.eval_right(ctx)),
            CalcOp::Exp => self.eval_left(ctx).exp(),
            CalcOp::Log => self.eval_left(ctx).ln(),
        }
    }

    /// `round(strategy, value, interval)` — snap value to a multiple of
    /// the interval with the given rounding function.
    fn round_with(&self, ctx: &EvalContext, f: fn(f32) -> f32) -> f32 {
        let value = self.eval_left(ctx);
        let interval = self.eval_right(ctx);
        if interval == 0.0 {
            return 0.0;
        }
        f(value / interval) * interval
    }
}

// ---------------------------------------------------------------------
// calc() tokenization
// ---------------------------------------------------------------------

/// A flat token inside a `calc()` body.
#[derive(Debug, Clone, Copy, PartialEq)]
enum CalcToken {
    Number(f32, Unit),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

/// Read a number with an optional unit at the scanner position.
///
/// Unknown units rewind the scanner and leave the number unitless
/// (pixels), matching CSS's tolerant posture inside math expressions.
fn scan_calc_number(scanner: &mut Scanner) -> Option<(f32, Unit)> {
    while matches!(scanner.peek(), Some(' ' | '\t')) {
        let _ = scanner.consume();
    }

    // Collect the numeric prefix.
    let start = scanner.position();
    let mut text = String::new();
    if matches!(scanner.peek(), Some('+' | '-')) {
        text.push(scanner.consume()?);
    }
    while scanner.peek().is_some_and(|c| c.is_ascii_digit() || c == '.') {
        text.push(scanner.consume()?);
    }
    let Some((value, rest)) = split_leading_number(&text) else {
        scanner.rewind_to(start);
        return None;
    };
    if !rest.is_empty() {
        scanner.rewind_to(start);
        return None;
    }

    while matches!(scanner.peek(), Some(' ' | '\t')) {
        let _ = scanner.consume();
    }

    // Optional unit suffix.
    let unit_start = scanner.position();
    let mut suffix = String::new();
    while scanner.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
        suffix.push(scanner.consume()?);
    }
    if scanner.peek() == Some('%') {
        let _ = scanner.consume();
        suffix = "%".to_string();
    }

    match unit_from_suffix(&suffix) {
        Some((unit, scale)) => Some((value * scale, unit)),
        None => {
            // Unknown unit: rewind and treat the number as unitless.
            scanner.rewind_to(unit_start);
            Some((value, Unit::Px))
        }
    }
}

/// Tokenize a `calc()` body. Nested math function calls are parsed
/// recursively and collapsed to number tokens.
fn tokenize_calc(expr: &str, depth: usize) -> Vec<CalcToken> {
    if depth == 0 {
        return Vec::new();
    }
    let mut tokens = Vec::new();
    let mut scanner = Scanner::new(expr);

    while let Some(c) = scanner.peek() {
        match c {
            ' ' | '\t' | '\n' | '\r' => {
                let _ = scanner.consume();
            }
            '(' => {
                let _ = scanner.consume();
                tokens.push(CalcToken::LParen);
            }
            ')' => {
                let _ = scanner.consume();
                tokens.push(CalcToken::RParen);
            }
            '+' => {
                let _ = scanner.consume();
                tokens.push(CalcToken::Plus);
            }
            '*' => {
                let _ = scanner.consume();
                tokens.push(CalcToken::Star);
            }
            '/' => {
                let _ = scanner.consume();
                tokens.push(CalcToken::Slash);
            }
            '-' => {
                // Binary minus if the previous token is a number or a
                // closing paren; otherwise it joins the numeric literal.
                let is_binary = matches!(
                    tokens.last(),
                    Some(CalcToken::Number(..) | CalcToken::RParen)
                );
                if is_binary {
                    let _ = scanner.consume();
                    tokens.push(CalcToken::Minus);
                } else if let Some((value, unit)) = scan_calc_number(&mut scanner) {
                    tokens.push(CalcToken::Number(value, unit));
                } else {
                    let _ = scanner.consume();
                }
            }
            c if c.is_ascii_digit() || c == '.' => {
                if let Some((value, unit)) = scan_calc_number(&mut scanner) {
                    tokens.push(CalcToken::Number(value, unit));
                } else {
                    let _ = scanner.consume();
                }
            }
            c if c.is_ascii_alphabetic() => {
                // Math constants or a nested function call.
                let word_start = scanner.position();
                let mut word = String::new();
                while scanner
                    .peek()
                    .is_some_and(|c| c.is_ascii_alphabetic() || c == '-')
                {
                    word.push(scanner.consume().unwrap_or('\0').to_ascii_lowercase());
                }
                if word == "pi" {
                    tokens.push(CalcToken::Number(core::f32::consts::PI, Unit::Px));
                } else if word == "e" && scanner.peek() != Some('(') {
                    tokens.push(CalcToken::Number(core::f32::consts::E, Unit::Px));
                } else if word == "infinity" {
                    tokens.push(CalcToken::Number(f32::INFINITY, Unit::Px));
                } else if scanner.peek() == Some('(') {
                    // Nested function call: extract the balanced call text
                    // and fold it to a constant.
                    let mut call = word.clone();
                    let mut call_depth = 0usize;
                    while let Some(c) = scanner.consume() {
                        call.push(c);
                        if c == '(' {
                            call_depth += 1;
                        } else if c == ')' {
                            call_depth -= 1;
                            if call_depth == 0 {
                                break;
                            }
                        }
                    }
                    if let Some(result) = parse_math_argument(&call, depth - 1) {
                        let value = result.evaluate(&EvalContext::default());
                        tokens.push(CalcToken::Number(value, Unit::Px));
                    }
                } else {
                    // Unknown word: skip one character past it and retry.
                    scanner.rewind_to(word_start);
                    let _ = scanner.consume();
                }
            }
            _ => {
                let _ = scanner.consume();
            }
        }
    }

    tokens
}

// ---------------------------------------------------------------------
// calc() recursive descent
// ---------------------------------------------------------------------

/// Recursive descent over the flat token list.
///
/// ```text
/// expr   := term (('+' | '-') term)*
/// term   := factor (('*' | '/') factor)*
/// factor := NUMBER | '(' expr ')'
/// ```
struct CalcParser<'a> {
    tokens: &'a [CalcToken],
    pos: usize,
}

impl<'a> CalcParser<'a> {
    fn new(tokens: &'a [CalcToken]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn current(&self) -> Option<CalcToken> {
        self.tokens.get(self.pos).copied()
    }

    fn parse_expr(&mut self) -> Option<Rc<CalcExpr>> {
        let mut left = self.parse_term()?;
        while let Some(op) = self.current() {
            let op = match op {
                CalcToken::Plus => CalcOp::Add,
                CalcToken::Minus => CalcOp::Sub,
                _ => break,
            };
            self.pos += 1;
            let Some(right) = self.parse_term() else {
                return Some(left);
            };
            left = CalcExpr::binary(op, left, right);
        }
        Some(left)
    }

    fn parse_term(&mut self) -> Option<Rc<CalcExpr>> {
        let mut left = self.parse_factor()?;
        while let Some(op) = self.current() {
            let op = match op {
                CalcToken::Star => CalcOp::Mul,
                CalcToken::Slash => CalcOp::Div,
                _ => break,
            };
            self.pos += 1;
            let Some(right) = self.parse_factor() else {
                return Some(left);
            };
            left = CalcExpr::binary(op, left, right);
        }
        Some(left)
    }

    fn parse_factor(&mut self) -> Option<Rc<CalcExpr>> {
        match self.current()? {
            CalcToken::LParen => {
                self.pos += 1;
                let inner = self.parse_expr();
                if !self.at_end() && self.current() == Some(CalcToken::RParen) {
                    self.pos += 1;
                }
                inner
            }
            CalcToken::Number(value, unit) => {
                self.pos += 1;
                Some(CalcExpr::value(Length::new(value, unit)))
            }
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------
// Math function parsing
// ---------------------------------------------------------------------

/// Parse a `calc()` body into a calc-unit [`Length`].
#[must_use]
pub fn parse_calc_expression(inner: &str) -> Option<Length> {
    let tokens = tokenize_calc(inner, MAX_MATH_DEPTH);
    if tokens.is_empty() {
        return None;
    }
    let expr = CalcParser::new(&tokens).parse_expr()?;
    Some(Length::calc(expr))
}

/// Split a function's inner arguments on top-level commas, falling back to
/// spaces when the comma tokens were stripped upstream (the component-value
/// path rejoins function arguments without commas in some contexts).
fn split_css_args(inner: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    let mut saw_comma = false;

    for c in inner.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                saw_comma = true;
                args.push(current.trim().to_string());
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    args.push(current.trim().to_string());

    if saw_comma || args.len() > 1 {
        return args;
    }

    // Space-separated fallback, parenthesis-aware.
    let whole = args.pop().unwrap_or_default();
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for c in whole.chars() {
        match c {
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ' ' if depth == 0 => {
                if !current.is_empty() {
                    parts.push(current.clone());
                    current.clear();
                }
            }
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        parts.push(current);
    }
    if parts.is_empty() {
        vec![whole]
    } else {
        parts
    }
}

/// Parse one math argument, which may itself be a nested math function or
/// a bare expression (`100% - 20px`). `depth` is the remaining recursion
/// budget; at zero the parse fails.
fn parse_math_argument(raw: &str, depth: usize) -> Option<Rc<CalcExpr>> {
    if depth == 0 {
        return None;
    }
    let arg = raw.trim();
    if arg.is_empty() {
        return None;
    }

    let lower = arg.to_ascii_lowercase();
    if let Some(open) = lower.find('(') {
        let name = &lower[..open];
        let inner = extract_balanced(arg, open)?;

        match name {
            "calc" => {
                let tokens = tokenize_calc(inner, depth - 1);
                if tokens.is_empty() {
                    return None;
                }
                return CalcParser::new(&tokens).parse_expr();
            }
            "min" | "max" => {
                let op = if name == "min" { CalcOp::Min } else { CalcOp::Max };
                let parts = split_css_args(inner);
                let mut result = parse_math_argument(parts.first()?, depth - 1)?;
                for part in parts.iter().skip(1) {
                    if let Some(rhs) = parse_math_argument(part, depth - 1) {
                        result = CalcExpr::binary(op, result, rhs);
                    }
                }
                return Some(result);
            }
            "clamp" => {
                let parts = split_css_args(inner);
                if parts.len() < 3 {
                    return None;
                }
                let min_arg = parse_math_argument(&parts[0], depth - 1)?;
                let pref_arg = parse_math_argument(&parts[1], depth - 1)?;
                let max_arg = parse_math_argument(&parts[2], depth - 1)?;
                // clamp(min, pref, max) = max(min, min(pref, max))
                let inner_min = CalcExpr::binary(CalcOp::Min, pref_arg, max_arg);
                return Some(CalcExpr::binary(CalcOp::Max, min_arg, inner_min));
            }
            "abs" | "sign" | "sin" | "cos" | "tan" | "asin" | "acos" | "atan" | "sqrt"
            | "exp" => {
                let op = match name {
                    "abs" => CalcOp::Abs,
                    "sign" => CalcOp::Sign,
                    "sin" => CalcOp::Sin,
                    "cos" => CalcOp::Cos,
                    "tan" => CalcOp::Tan,
                    "asin" => CalcOp::Asin,
                    "acos" => CalcOp::Acos,
                    "atan" => CalcOp::Atan,
                    "sqrt" => CalcOp::Sqrt,
                    _ => CalcOp::Exp,
                };
                let operand = parse_math_argument(inner, depth - 1)?;
                return Some(CalcExpr::unary(op, operand));
            }
            "mod" | "rem" | "pow" | "atan2" => {
                let op = match name {
                    "mod" => CalcOp::Mod,
                    "rem" => CalcOp::Rem,
                    "pow" => CalcOp::Pow,
                    _ => CalcOp::Atan2,
                };
                let parts = split_css_args(inner);
                if parts.len() < 2 {
                    return None;
                }
                let lhs = parse_math_argument(&parts[0], depth - 1)?;
                let rhs = parse_math_argument(&parts[1], depth - 1)?;
                return Some(CalcExpr::binary(op, lhs, rhs));
            }
            "hypot" => {
                let parts = split_css_args(inner);
                if parts.len() < 2 {
                    return None;
                }
                let mut result = CalcExpr::binary(
                    CalcOp::Hypot,
                    parse_math_argument(&parts[0], depth - 1)?,
                    parse_math_argument(&parts[1], depth - 1)?,
                );
                for part in parts.iter().skip(2) {
                    if let Some(next) = parse_math_argument(part, depth - 1) {
                        result = CalcExpr::binary(CalcOp::Hypot, result, next);
                    }
                }
                return Some(result);
            }
            "round" => {
                let parts = split_css_args(inner);
                if parts.is_empty() {
                    return None;
                }
                let (op, value_index) = round_strategy(&parts[0]);
                if value_index + 1 >= parts.len() {
                    return None;
                }
                let value = parse_math_argument(&parts[value_index], depth - 1)?;
                let interval = parse_math_argument(&parts[value_index + 1], depth - 1)?;
                return Some(CalcExpr::binary(op, value, interval));
            }
            "log" => {
                let parts = split_css_args(inner);
                let operand = parse_math_argument(parts.first()?, depth - 1)?;
                if parts.len() >= 2 {
                    // log(value, base) = ln(value) / ln(base)
                    if let Some(base) = parse_math_argument(&parts[1], depth - 1) {
                        let log_value = CalcExpr::unary(CalcOp::Log, operand);
                        let log_base = CalcExpr::unary(CalcOp::Log, base);
                        return Some(CalcExpr::binary(CalcOp::Div, log_value, log_base));
                    }
                }
                return Some(CalcExpr::unary(CalcOp::Log, operand));
            }
            _ => {}
        }
    }

    // Plain value or a bare expression ("100% - 20px").
    let tokens = tokenize_calc(arg, depth - 1);
    if tokens.is_empty() {
        return None;
    }
    CalcParser::new(&tokens).parse_expr()
}

/// The optional first argument of `round()` selects a strategy; default is
/// `nearest`.
fn round_strategy(first: &str) -> (CalcOp, usize) {
    match first.trim().to_ascii_lowercase().as_str() {
        "up" => (CalcOp::RoundUp, 1),
        "down" => (CalcOp::RoundDown, 1),
        "to-zero" => (CalcOp::RoundToZero, 1),
        "nearest" => (CalcOp::RoundNearest, 1),
        _ => (CalcOp::RoundNearest, 0),
    }
}

/// Extract the balanced `( ... )` body starting at `open`.
fn extract_balanced(s: &str, open: usize) -> Option<&str> {
    let bytes = s.as_bytes();
    let mut depth = 0usize;
    for (i, &b) in bytes.iter().enumerate().skip(open) {
        if b == b'(' {
            depth += 1;
        } else if b == b')' {
            depth -= 1;
            if depth == 0 {
                return Some(&s[open + 1..i]);
            }
        }
    }
    // Unterminated: take everything after the opening paren.
    Some(&s[open + 1..])
}

/// Parse a named math function (`min`, `clamp`, `round`, …) into a
/// calc-unit [`Length`]. `inner` is the text between the parentheses.
#[must_use]
pub fn parse_math_function(name: &str, inner: &str) -> Option<Length> {
    let call = format!("{name}({inner})");
    let expr = parse_math_argument(&call, MAX_MATH_DEPTH)?;
    Some(Length::calc(expr))
}

/// Parse and immediately evaluate a math expression with the given
/// context. Used by relative color syntax for channel expressions.
#[must_use]
pub fn evaluate_math_expression(expr: &str, ctx: &EvalContext) -> Option<f32> {
    let parsed = parse_math_argument(expr, MAX_MATH_DEPTH)?;
    Some(parsed.evaluate(ctx))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(expr: &str) -> f32 {
        parse_math_argument(expr, MAX_MATH_DEPTH)
            .expect("parse")
            .evaluate(&EvalContext::default())
    }

    #[test]
    fn arithmetic_precedence() {
        assert_eq!(eval("calc(2 + 3 * 4)"), 14.0);
        assert_eq!(eval("calc((2 + 3) * 4)"), 20.0);
        assert_eq!(eval("calc(10 / 2 - 1)"), 4.0);
    }

    #[test]
    fn unary_minus_binds_to_literal() {
        assert_eq!(eval("calc(-5 + 10)"), 5.0);
        assert_eq!(eval("calc(10 - 5)"), 5.0);
    }

    #[test]
    fn percent_resolves_against_parent() {
        let len = parse_calc_expression("100% - 20px").expect("parse");
        let ctx = EvalContext {
            parent_value: 400.0,
            ..EvalContext::default()
        };
        assert_eq!(len.to_px(&ctx), 380.0);
    }

    #[test]
    fn clamp_lowers_to_min_max() {
        assert_eq!(eval("clamp(10, 5, 20)"), 10.0);
        assert_eq!(eval("clamp(10, 15, 20)"), 15.0);
        assert_eq!(eval("clamp(10, 50, 20)"), 20.0);
    }

    #[test]
    fn min_max_fold_n_ary() {
        assert_eq!(eval("min(3, 1, 2)"), 1.0);
        assert_eq!(eval("max(3, 1, 2)"), 3.0);
    }

    #[test]
    fn mod_takes_sign_of_divisor_rem_of_dividend() {
        assert_eq!(eval("mod(-5, 3)"), 1.0);
        assert_eq!(eval("rem(-5, 3)"), -2.0);
        assert_eq!(eval("mod(5, -3)"), -1.0);
        assert_eq!(eval("rem(5, -3)"), 2.0);
    }

    #[test]
    fn round_strategies() {
        assert_eq!(eval("round(7, 5)"), 5.0);
        assert_eq!(eval("round(up, 7, 5)"), 10.0);
        assert_eq!(eval("round(down, 9, 5)"), 5.0);
        assert_eq!(eval("round(to-zero, -7, 5)"), -5.0);
    }

    #[test]
    fn trigonometry_and_constants() {
        assert!((eval("sin(pi)")).abs() < 1e-5);
        assert!((eval("cos(0)") - 1.0).abs() < 1e-5);
        // sin of 90deg: angle units normalize to radians.
        assert!((eval("sin(90deg)") - 1.0).abs() < 1e-5);
    }

    #[test]
    fn exponential_family() {
        assert_eq!(eval("sqrt(9)"), 3.0);
        assert_eq!(eval("pow(2, 10)"), 1024.0);
        assert_eq!(eval("hypot(3, 4)"), 5.0);
        assert!((eval("log(8, 2)") - 3.0).abs() < 1e-5);
        assert!((eval("exp(0)") - 1.0).abs() < 1e-5);
    }

    #[test]
    fn abs_and_sign() {
        assert_eq!(eval("abs(-4)"), 4.0);
        assert_eq!(eval("sign(-4)"), -1.0);
        assert_eq!(eval("sign(0)"), 0.0);
        assert_eq!(eval("sign(9)"), 1.0);
    }

    #[test]
    fn depth_budget_rejects_hostile_nesting() {
        let mut expr = String::from("1");
        for _ in 0..40 {
            expr = format!("calc({expr})");
        }
        assert!(parse_math_argument(&expr, MAX_MATH_DEPTH).is_none());
    }

    #[test]
    fn nested_function_inside_calc_collapses() {
        assert_eq!(eval("calc(min(3, 1) + 10)"), 11.0);
    }
}
