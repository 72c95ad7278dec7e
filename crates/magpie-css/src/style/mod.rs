//! Typed CSS values and the computed-style aggregate.
//!
//! [`values`] holds the leaf value parsers (lengths, math expressions,
//! colors, font settings); [`computed`] aggregates the longhand slots the
//! style resolver populates and the layout engine reads.

/// The computed-style aggregate and its keyword enums.
pub mod computed;
/// Leaf value types and parsers.
pub mod values;

pub use computed::{
    AlignItems, AnimationDef, BorderEdge, BorderStyle, BoxShadow, BoxSizing, Clear, ComputedStyle,
    Cursor, Direction, Display, EdgeSizes, Filter, FilterKind, FlexDirection, FlexWrap, FloatSide,
    FontStyle, JustifyContent, ListStyleType, Overflow, PointerEvents, Position, ScrollbarWidth,
    SvgPresentation, TextAlign, TextDecorationLine, TextShadow, TextTransform, TimingFunction,
    Transform, TransitionDef, UserSelect, Visibility, WhiteSpace, WritingMode,
};
pub use values::{
    CalcExpr, CalcOp, Color, ColorScheme, DEFAULT_FONT_SIZE_PX, EvalContext, Length,
    ParseEnvironment, Unit, evaluate_math_expression, parse_calc_expression, parse_color,
    parse_font_feature_settings, parse_length, parse_math_function,
};
