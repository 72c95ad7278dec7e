//! Typed CSS value parsing: lengths, math expressions, colors, and font
//! settings.
//!
//! Every parser here returns an `Option`: a parse failure yields no value
//! and the caller keeps the previous (cascaded or default) one, matching
//! CSS's tolerant error posture.

/// Math expression trees (`calc()` and friends).
pub mod calc;
/// Color parsing across all supported spaces.
pub mod color;
/// Font-related value parsing.
pub mod font;
/// Lengths, units, and the evaluation context.
pub mod length;

pub use calc::{CalcExpr, CalcOp, evaluate_math_expression, parse_calc_expression,
    parse_math_function};
pub use color::{Color, ColorScheme, ParseEnvironment, parse_color};
pub use font::parse_font_feature_settings;
pub use length::{
    DEFAULT_FONT_SIZE_PX, EvalContext, Length, Unit, parse_length, split_leading_number,
};
