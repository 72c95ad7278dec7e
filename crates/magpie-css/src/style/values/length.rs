//! CSS length values.
//!
//! [CSS Values and Units Level 4](https://www.w3.org/TR/css-values-4/)

use std::rc::Rc;

use serde::Serialize;

use magpie_common::warning::warn_once;

use super::calc::{CalcExpr, parse_calc_expression, parse_math_function};

/// User agent default font size.
/// [§ 3.5 font-size](https://www.w3.org/TR/css-fonts-4/#font-size-prop)
pub const DEFAULT_FONT_SIZE_PX: f32 = 16.0;

/// [§ 4.1 Lengths](https://www.w3.org/TR/css-values-4/#lengths)
///
/// "Lengths refer to distance measurements and are denoted by `<length>` in
/// the property definitions."
///
/// Angle units (`deg`, `rad`, `grad`, `turn`) are normalized to radians at
/// parse time and stored as `Px` values; the viewport-unit aliases
/// (`dvw`/`svw`/`lvw` and the `vh` family) fold into `Vw`/`Vh`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum Unit {
    /// [§ 6.1 Absolute lengths](https://www.w3.org/TR/css-values-4/#absolute-lengths)
    /// "1px = 1/96th of 1in"
    #[default]
    Px,
    /// "Equal to the computed value of the font-size property of the
    /// element"
    Em,
    /// "Equal to the computed value of the font-size property of the root
    /// element"
    Rem,
    /// [§ 4.3 Percentages](https://www.w3.org/TR/css-values-4/#percentages)
    Percent,
    /// "1vw = 1% of viewport width"
    Vw,
    /// "1vh = 1% of viewport height"
    Vh,
    /// "Equal to the smaller of vw and vh"
    Vmin,
    /// "Equal to the larger of vw and vh"
    Vmax,
    /// [Container query length units](https://www.w3.org/TR/css-contain-3/#container-lengths):
    /// 1% of the query container's width
    Cqw,
    /// 1% of the query container's height
    Cqh,
    /// 1% of the query container's inline size
    Cqi,
    /// 1% of the query container's block size
    Cqb,
    /// The smaller of cqi and cqb
    Cqmin,
    /// The larger of cqi and cqb
    Cqmax,
    /// "Equal to the used advance measure of the '0' glyph"
    Ch,
    /// "Equal to the computed value of the line-height property"
    Lh,
    /// The keyword `auto`, resolved during layout.
    Auto,
    /// A bare `0` with no unit.
    Zero,
    /// A math expression; see [`Length::calc`].
    Calc,
}

/// Evaluation context for resolving relative units.
///
/// The original engine kept viewport and container dimensions in mutable
/// statics; here they travel in an explicit context value handed to
/// [`Length::to_px`] and [`CalcExpr::evaluate`] so concurrent parses don't
/// share hidden state. `Default` gives an 800×600 viewport and the UA
/// default font metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvalContext {
    /// The value percentages resolve against (the relevant containing
    /// block dimension).
    pub parent_value: f32,
    /// Root element font size in pixels (`em`/`rem`/`ch` basis).
    pub root_font_size: f32,
    /// Line height in pixels for `lh`; `0` falls back to
    /// `1.2 × root_font_size`.
    pub line_height: f32,
    /// Viewport width in pixels (`vw`, `vmin`, `vmax`).
    pub viewport_width: f32,
    /// Viewport height in pixels (`vh`, `vmin`, `vmax`).
    pub viewport_height: f32,
    /// Query container width in pixels (`cqw`, `cqi`).
    pub container_width: f32,
    /// Query container height in pixels (`cqh`, `cqb`).
    pub container_height: f32,
}

impl Default for EvalContext {
    fn default() -> Self {
        Self {
            parent_value: 0.0,
            root_font_size: DEFAULT_FONT_SIZE_PX,
            line_height: 0.0,
            viewport_width: 800.0,
            viewport_height: 600.0,
            container_width: 0.0,
            container_height: 0.0,
        }
    }
}

impl EvalContext {
    /// A copy of this context with a different percentage basis.
    #[must_use]
    pub fn with_parent_value(mut self, parent_value: f32) -> Self {
        self.parent_value = parent_value;
        self
    }
}

/// A CSS length: a number with a unit, or a math expression.
///
/// Percentage and calc lengths keep their payload here rather than being
/// collapsed to pixels at parse time, so layout can resolve them against
/// the correct containing block or font metric.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct Length {
    /// The numeric magnitude (unused for `Auto`/`Zero`/`Calc`).
    pub value: f32,
    /// The unit tag.
    pub unit: Unit,
    /// The expression tree when `unit == Unit::Calc`.
    #[serde(skip)]
    pub calc: Option<Rc<CalcExpr>>,
}

impl Length {
    /// A pixel length.
    #[must_use]
    pub fn px(value: f32) -> Self {
        Self {
            value,
            unit: Unit::Px,
            calc: None,
        }
    }

    /// A length with the given unit and no calc payload.
    #[must_use]
    pub fn new(value: f32, unit: Unit) -> Self {
        Self {
            value,
            unit,
            calc: None,
        }
    }

    /// An `em` length.
    #[must_use]
    pub fn em(value: f32) -> Self {
        Self::new(value, Unit::Em)
    }

    /// A `rem` length.
    #[must_use]
    pub fn rem(value: f32) -> Self {
        Self::new(value, Unit::Rem)
    }

    /// A percentage length.
    #[must_use]
    pub fn percent(value: f32) -> Self {
        Self::new(value, Unit::Percent)
    }

    /// The `auto` keyword.
    #[must_use]
    pub fn auto() -> Self {
        Self::new(0.0, Unit::Auto)
    }

    /// A literal unitless zero.
    #[must_use]
    pub fn zero() -> Self {
        Self::new(0.0, Unit::Zero)
    }

    /// Wrap a math expression tree.
    #[must_use]
    pub fn calc(expr: Rc<CalcExpr>) -> Self {
        Self {
            value: 0.0,
            unit: Unit::Calc,
            calc: Some(expr),
        }
    }

    /// True for the `auto` keyword.
    #[must_use]
    pub fn is_auto(&self) -> bool {
        self.unit == Unit::Auto
    }

    /// True for a zero-valued length (excluding `auto` and calc, whose
    /// value field is meaningless).
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.unit == Unit::Zero
            || (self.value == 0.0 && self.unit != Unit::Auto && self.unit != Unit::Calc)
    }

    /// Resolve this length to pixels against a context.
    ///
    /// `%` resolves against `ctx.parent_value`, font-relative units
    /// against the context font metrics, viewport and container units
    /// against the configured dimensions, and calc expressions recurse
    /// through [`CalcExpr::evaluate`].
    #[must_use]
    pub fn to_px(&self, ctx: &EvalContext) -> f32 {
        let line_height = if ctx.line_height > 0.0 {
            ctx.line_height
        } else {
            1.2 * ctx.root_font_size
        };
        match self.unit {
            Unit::Px => self.value,
            Unit::Em | Unit::Rem => self.value * ctx.root_font_size,
            Unit::Percent => self.value * ctx.parent_value / 100.0,
            Unit::Vw => self.value * ctx.viewport_width / 100.0,
            Unit::Vh => self.value * ctx.viewport_height / 100.0,
            Unit::Vmin => self.value * ctx.viewport_width.min(ctx.viewport_height) / 100.0,
            Unit::Vmax => self.value * ctx.viewport_width.max(ctx.viewport_height) / 100.0,
            Unit::Cqw | Unit::Cqi => self.value * ctx.container_width / 100.0,
            Unit::Cqh | Unit::Cqb => self.value * ctx.container_height / 100.0,
            Unit::Cqmin => self.value * ctx.container_width.min(ctx.container_height) / 100.0,
            Unit::Cqmax => self.value * ctx.container_width.max(ctx.container_height) / 100.0,
            // Approximation: the '0' glyph advance is close to half the
            // font size in common UI faces.
            Unit::Ch => self.value * ctx.root_font_size * 0.5,
            Unit::Lh => self.value * line_height,
            Unit::Auto | Unit::Zero => 0.0,
            Unit::Calc => self.calc.as_ref().map_or(0.0, |expr| expr.evaluate(ctx)),
        }
    }
}

/// Map a unit suffix to its `Unit`, folding the alias families.
///
/// Angle units return a scale factor to radians alongside `Unit::Px`.
/// Unknown units yield `None`; callers decide whether that fails the parse
/// (a bare declaration value) or falls back to unitless pixels (inside
/// `calc()`).
#[must_use]
pub fn unit_from_suffix(suffix: &str) -> Option<(Unit, f32)> {
    let suffix = suffix.to_ascii_lowercase();
    let unit = match suffix.as_str() {
        "" | "px" => Unit::Px,
        "em" => Unit::Em,
        "rem" => Unit::Rem,
        "%" => Unit::Percent,
        "vw" | "dvw" | "svw" | "lvw" => Unit::Vw,
        "vh" | "dvh" | "svh" | "lvh" => Unit::Vh,
        "vmin" => Unit::Vmin,
        "vmax" => Unit::Vmax,
        "cqw" => Unit::Cqw,
        "cqh" => Unit::Cqh,
        "cqi" => Unit::Cqi,
        "cqb" => Unit::Cqb,
        "cqmin" => Unit::Cqmin,
        "cqmax" => Unit::Cqmax,
        "ch" => Unit::Ch,
        "lh" => Unit::Lh,
        // Angles normalize to radians in a Px-typed value.
        "deg" => return Some((Unit::Px, core::f32::consts::PI / 180.0)),
        "rad" => return Some((Unit::Px, 1.0)),
        "grad" => return Some((Unit::Px, core::f32::consts::PI / 200.0)),
        "turn" => return Some((Unit::Px, 2.0 * core::f32::consts::PI)),
        _ => return None,
    };
    Some((unit, 1.0))
}

/// Split a numeric prefix off a string: `"12.5px"` → `(12.5, "px")`.
/// Accepts a sign, decimal point, and exponent.
#[must_use]
pub fn split_leading_number(s: &str) -> Option<(f32, &str)> {
    let bytes = s.as_bytes();
    let mut end = 0usize;

    if matches!(bytes.first(), Some(&(b'+' | b'-'))) {
        end += 1;
    }
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    if bytes.get(end) == Some(&b'.') && bytes.get(end + 1).is_some_and(u8::is_ascii_digit) {
        end += 1;
        while bytes.get(end).is_some_and(u8::is_ascii_digit) {
            end += 1;
        }
    }
    // Exponent part: e[+-]?digits
    if matches!(bytes.get(end), Some(&(b'e' | b'E'))) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(&(b'+' | b'-'))) {
            exp_end += 1;
        }
        if bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            end = exp_end;
            while bytes.get(end).is_some_and(u8::is_ascii_digit) {
                end += 1;
            }
        }
    }

    let value: f32 = s[..end].parse().ok()?;
    Some((value, &s[end..]))
}

/// Parse a CSS `<length>` (or length-valued math function) from raw text.
///
/// Accepts `auto`, a bare `0`, the math constants `pi` / `e` / `infinity` /
/// `-infinity` (as raw pixel floats), every math function (`calc`, `min`,
/// `max`, `clamp`, `abs`, `sign`, `mod`, `rem`, `round`, the trigonometric
/// and exponential families, `env`), and number+unit forms. Returns `None`
/// on anything unparseable; the caller keeps its previous value, matching
/// the CSS error-recovery posture.
#[must_use]
pub fn parse_length(input: &str) -> Option<Length> {
    let value = input.trim();
    if value.is_empty() {
        return None;
    }

    if value.eq_ignore_ascii_case("auto") {
        return Some(Length::auto());
    }
    if value == "0" {
        return Some(Length::zero());
    }

    // CSS math constants resolve as raw floats.
    match value.to_ascii_lowercase().as_str() {
        "pi" => return Some(Length::px(core::f32::consts::PI)),
        "e" => return Some(Length::px(core::f32::consts::E)),
        "infinity" => return Some(Length::px(f32::INFINITY)),
        "-infinity" => return Some(Length::px(f32::NEG_INFINITY)),
        _ => {}
    }

    // Math functions: name(inner).
    if let Some((name, inner)) = split_function(value) {
        let name = name.to_ascii_lowercase();
        if name == "calc" {
            return parse_calc_expression(inner);
        }
        // fit-content(x) passes its argument through for sizing purposes.
        if name == "fit-content" {
            return parse_length(inner);
        }
        if name == "env" {
            // env(name[, fallback]) — no safe-area insets on this surface,
            // so the fallback (comma- or space-separated) wins, else zero.
            if let Some((_, fallback)) = inner.split_once(',') {
                if let Some(len) = parse_length(fallback) {
                    return Some(len);
                }
            } else if let Some((_, fallback)) = inner.trim().split_once(' ') {
                if let Some(len) = parse_length(fallback) {
                    return Some(len);
                }
            }
            return Some(Length::zero());
        }
        if is_math_function(&name) {
            return parse_math_function(&name, inner);
        }
        return None;
    }

    // Number + unit.
    let (number, suffix) = split_leading_number(value)?;
    let suffix = suffix.trim();
    let Some((unit, scale)) = unit_from_suffix(suffix) else {
        warn_once("CSS", &format!("unsupported unit '{suffix}'"));
        return None;
    };
    Some(Length::new(number * scale, unit))
}

/// Recognized math function names (besides `calc` itself).
#[must_use]
pub fn is_math_function(name: &str) -> bool {
    matches!(
        name,
        "min" | "max"
            | "clamp"
            | "abs"
            | "sign"
            | "mod"
            | "rem"
            | "round"
            | "sin"
            | "cos"
            | "tan"
            | "asin"
            | "acos"
            | "atan"
            | "atan2"
            | "sqrt"
            | "pow"
            | "hypot"
            | "exp"
            | "log"
    )
}

/// Split `name(inner)` into its parts when the whole input is a single
/// function call with balanced parentheses.
#[must_use]
pub fn split_function(value: &str) -> Option<(&str, &str)> {
    let open = value.find('(')?;
    let name = &value[..open];
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return None;
    }

    let mut depth = 0usize;
    for (i, c) in value.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    // The close must be the final character for this to be
                    // a single function call.
                    if i == value.len() - 1 {
                        return Some((name, &value[open + 1..i]));
                    }
                    return None;
                }
            }
            _ => {}
        }
    }
    // Unterminated: tolerate and take the rest as the body.
    Some((name, &value[open + 1..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_basic_units() {
        assert_eq!(parse_length("10px"), Some(Length::px(10.0)));
        assert_eq!(parse_length("1.5em"), Some(Length::em(1.5)));
        assert_eq!(parse_length("50%"), Some(Length::percent(50.0)));
        assert_eq!(parse_length("auto"), Some(Length::auto()));
        assert_eq!(parse_length("0"), Some(Length::zero()));
    }

    #[test]
    fn viewport_alias_units_fold() {
        assert_eq!(parse_length("10dvw").unwrap().unit, Unit::Vw);
        assert_eq!(parse_length("10svh").unwrap().unit, Unit::Vh);
    }

    #[test]
    fn angles_normalize_to_radians() {
        let half_turn = parse_length("180deg").unwrap();
        assert!((half_turn.value - core::f32::consts::PI).abs() < 1e-5);
        let turn = parse_length("1turn").unwrap();
        assert!((turn.value - 2.0 * core::f32::consts::PI).abs() < 1e-5);
    }

    #[test]
    fn unknown_unit_fails() {
        assert_eq!(parse_length("10florps"), None);
    }

    #[test]
    fn resolves_against_context() {
        let ctx = EvalContext {
            parent_value: 400.0,
            viewport_width: 1000.0,
            container_width: 250.0,
            ..EvalContext::default()
        };
        assert_eq!(Length::percent(50.0).to_px(&ctx), 200.0);
        assert_eq!(Length::new(10.0, Unit::Vw).to_px(&ctx), 100.0);
        assert_eq!(Length::new(20.0, Unit::Cqw).to_px(&ctx), 50.0);
        assert_eq!(Length::em(2.0).to_px(&ctx), 32.0);
    }

    #[test]
    fn env_resolves_fallback_or_zero() {
        assert_eq!(
            parse_length("env(safe-area-inset-top, 20px)"),
            Some(Length::px(20.0))
        );
        assert_eq!(parse_length("env(safe-area-inset-top)"), Some(Length::zero()));
    }
}
