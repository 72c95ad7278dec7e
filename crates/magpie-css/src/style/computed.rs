//! Computed style.
//!
//! [§ 4.4 Computed Values](https://www.w3.org/TR/css-cascade-4/#computed)
//!
//! "The computed value is the result of resolving the specified value as
//! defined in the 'Computed value' line of the property definition table."
//!
//! [`ComputedStyle`] is a plain aggregate of longhand slots that the style
//! resolver populates and the layout engine reads. Two invariants hold:
//! percentage and calc lengths keep their [`Length`] payload (they are not
//! collapsed to pixels here, so layout can resolve them against the right
//! containing block), and box edges are always four-sided.

use std::collections::HashMap;

use serde::Serialize;

use super::values::{Color, Length};

/// [§ 2 'display'](https://www.w3.org/TR/css-display-3/#the-display-properties)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum Display {
    /// "The element generates a block-level box."
    Block,
    /// "The element generates one or more inline-level boxes."
    #[default]
    Inline,
    /// An inline-level block container.
    InlineBlock,
    /// [CSS Flexbox](https://www.w3.org/TR/css-flexbox-1/) container.
    Flex,
    /// An inline-level flex container.
    InlineFlex,
    /// [CSS Grid](https://www.w3.org/TR/css-grid-2/) container.
    Grid,
    /// An inline-level grid container.
    InlineGrid,
    /// "The element generates a block box for the content and a separate
    /// list-item inline box."
    ListItem,
    /// Table interior display types kept for table-aware layout.
    Table,
    /// `display: table-row`
    TableRow,
    /// `display: table-cell`
    TableCell,
    /// "The element itself does not generate any boxes, but its children
    /// and pseudo-elements still generate boxes as normal."
    Contents,
    /// "The element and its descendants generate no boxes or text runs."
    None,
}

impl Display {
    /// Parse a `display` keyword; unknown keywords yield `None`.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "block" => Some(Self::Block),
            "inline" => Some(Self::Inline),
            "inline-block" => Some(Self::InlineBlock),
            "flex" => Some(Self::Flex),
            "inline-flex" => Some(Self::InlineFlex),
            "grid" => Some(Self::Grid),
            "inline-grid" => Some(Self::InlineGrid),
            "list-item" => Some(Self::ListItem),
            "table" => Some(Self::Table),
            "table-row" => Some(Self::TableRow),
            "table-cell" => Some(Self::TableCell),
            "contents" => Some(Self::Contents),
            "none" => Some(Self::None),
            _ => None,
        }
    }
}

/// [§ 3.1 'position'](https://www.w3.org/TR/css-position-3/#position-property)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum Position {
    /// "The box is laid out according to the normal flow."
    #[default]
    Static,
    /// "Offset relative to its normal position."
    Relative,
    /// "Taken out of flow; positioned relative to its containing block."
    Absolute,
    /// "Like absolute, but the containing block is the viewport."
    Fixed,
    /// "Stickily positioned between relative and fixed behavior."
    Sticky,
}

impl Position {
    /// Parse a `position` keyword.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "static" => Some(Self::Static),
            "relative" => Some(Self::Relative),
            "absolute" => Some(Self::Absolute),
            "fixed" => Some(Self::Fixed),
            "sticky" => Some(Self::Sticky),
            _ => None,
        }
    }
}

/// [CSS 2 § 9.5 'float'](https://www.w3.org/TR/CSS2/visuren.html#float-position)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum FloatSide {
    /// Not floated.
    #[default]
    None,
    /// Floats to the left edge of its containing block.
    Left,
    /// Floats to the right edge.
    Right,
}

/// [CSS 2 § 9.5.2 'clear'](https://www.w3.org/TR/CSS2/visuren.html#flow-control)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum Clear {
    /// No clearance constraint.
    #[default]
    None,
    /// Clears past left floats.
    Left,
    /// Clears past right floats.
    Right,
    /// Clears past floats on both sides.
    Both,
}

/// [§ 3 'box-sizing'](https://www.w3.org/TR/css-sizing-3/#box-sizing)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum BoxSizing {
    /// Width/height set the content box.
    #[default]
    ContentBox,
    /// Width/height set the border box.
    BorderBox,
}

/// [CSS Text § 7.1 'text-align'](https://www.w3.org/TR/css-text-3/#text-align-property)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum TextAlign {
    /// "Inline-level content is aligned to the start edge of the line box."
    #[default]
    Left,
    /// Aligned to the end edge.
    Right,
    /// Centered within the line box.
    Center,
    /// "Text is justified."
    Justify,
}

/// [CSS Text Decoration § 2.1 'text-decoration-line'](https://www.w3.org/TR/css-text-decor-3/#text-decoration-line-property)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum TextDecorationLine {
    /// No decoration.
    #[default]
    None,
    /// "Each line of text is underlined."
    Underline,
    /// "Each line of text has a line over it."
    Overline,
    /// "Each line of text has a line through the middle."
    LineThrough,
}

/// [CSS Text § 2.1 'text-transform'](https://www.w3.org/TR/css-text-3/#text-transform)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum TextTransform {
    /// No transformation.
    #[default]
    None,
    /// "Puts the first typographic letter unit of each word in titlecase."
    Capitalize,
    /// "Puts all letters in uppercase."
    Uppercase,
    /// "Puts all letters in lowercase."
    Lowercase,
}

/// [CSS Text § 3 'white-space'](https://www.w3.org/TR/css-text-3/#white-space-property)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum WhiteSpace {
    /// "Collapses sequences of white space; lines wrap as necessary."
    #[default]
    Normal,
    /// Collapses white space but suppresses wrapping.
    NoWrap,
    /// Preserves white space; no wrapping.
    Pre,
    /// Preserves white space; lines wrap.
    PreWrap,
    /// Collapses white space but preserves line breaks.
    PreLine,
    /// Like pre-wrap, preserving trailing spaces.
    BreakSpaces,
}

/// [CSS Overflow § 3 'overflow'](https://www.w3.org/TR/css-overflow-3/#overflow-properties)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum Overflow {
    /// "Content is not clipped."
    #[default]
    Visible,
    /// "Content is clipped; no scrolling interface."
    Hidden,
    /// "Content is clipped; scrolling interface displayed."
    Scroll,
    /// Scrolling interface at user-agent discretion.
    Auto,
}

/// [CSS 2 § 11.2 'visibility'](https://www.w3.org/TR/CSS2/visufx.html#visibility)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum Visibility {
    /// "The generated box is visible."
    #[default]
    Visible,
    /// "Invisible, but still affects layout."
    Hidden,
    /// Collapses table rows/columns; otherwise hidden.
    Collapse,
}

/// [CSS Writing Modes § 3.1 'direction'](https://www.w3.org/TR/css-writing-modes-4/#direction)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum Direction {
    /// Left-to-right inline direction.
    #[default]
    Ltr,
    /// Right-to-left inline direction.
    Rtl,
}

/// [CSS Writing Modes § 3.2 'writing-mode'](https://www.w3.org/TR/css-writing-modes-4/#block-flow)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum WritingMode {
    /// "Top-to-bottom block flow direction."
    #[default]
    HorizontalTb,
    /// "Right-to-left block flow direction; vertical typesetting."
    VerticalRl,
    /// "Left-to-right block flow direction; vertical typesetting."
    VerticalLr,
}

/// [CSS Fonts § 3.3 'font-style'](https://www.w3.org/TR/css-fonts-4/#font-style-prop)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum FontStyle {
    /// Upright faces.
    #[default]
    Normal,
    /// "Italic faces are selected."
    Italic,
    /// Oblique (sheared) faces.
    Oblique,
}

/// [CSS Backgrounds § 4.2 border style keywords](https://www.w3.org/TR/css-backgrounds-3/#border-style)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum BorderStyle {
    /// "No border; the border width is zero."
    #[default]
    None,
    /// "A single solid line."
    Solid,
    /// "A series of square dashes."
    Dashed,
    /// "A series of round dots."
    Dotted,
    /// "Two parallel solid lines."
    Double,
    /// Carved appearance.
    Groove,
    /// Embossed appearance.
    Ridge,
    /// Inset appearance.
    Inset,
    /// Outset appearance.
    Outset,
}

/// [CSS Flexbox § 5.1 'flex-direction'](https://www.w3.org/TR/css-flexbox-1/#flex-direction-property)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum FlexDirection {
    /// "The flex container's main axis has the same orientation as the
    /// inline axis."
    #[default]
    Row,
    /// Row, reversed.
    RowReverse,
    /// Main axis follows the block axis.
    Column,
    /// Column, reversed.
    ColumnReverse,
}

/// [CSS Flexbox § 5.2 'flex-wrap'](https://www.w3.org/TR/css-flexbox-1/#flex-wrap-property)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum FlexWrap {
    /// "The flex container is single-line."
    #[default]
    NoWrap,
    /// "Multi-line; cross-start is equivalent to start."
    Wrap,
    /// Multi-line, reversed cross axis.
    WrapReverse,
}

/// [CSS Flexbox § 8.2 'justify-content'](https://www.w3.org/TR/css-flexbox-1/#justify-content-property)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum JustifyContent {
    /// "Items are packed toward the start of the line."
    #[default]
    FlexStart,
    /// Packed toward the end.
    FlexEnd,
    /// Centered along the line.
    Center,
    /// "Evenly distributed; first and last at the edges."
    SpaceBetween,
    /// Evenly distributed with half-size edge gaps.
    SpaceAround,
    /// Evenly distributed including the edges.
    SpaceEvenly,
}

/// [CSS Flexbox § 8.3 'align-items'](https://www.w3.org/TR/css-flexbox-1/#align-items-property)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum AlignItems {
    /// Cross-start margin edge on the cross-start line.
    FlexStart,
    /// Cross-end alignment.
    FlexEnd,
    /// Centered in the cross axis.
    Center,
    /// "Participates in baseline alignment."
    Baseline,
    /// "Stretch to fill the line."
    #[default]
    Stretch,
}

/// [CSS UI § 4 'cursor'](https://www.w3.org/TR/css-ui-4/#cursor)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum Cursor {
    /// UA determines the cursor from context.
    #[default]
    Auto,
    /// The platform default arrow.
    Default,
    /// Link pointer.
    Pointer,
    /// Text I-beam.
    Text,
    /// Movement indicator.
    Move,
    /// Action not allowed.
    NotAllowed,
}

/// [Pointer Events § 4 'pointer-events'](https://www.w3.org/TR/SVG2/interact.html#PointerEventsProperty)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum PointerEvents {
    /// Element reacts to pointer events normally.
    #[default]
    Auto,
    /// "The element is never the target of pointer events."
    None,
}

/// [CSS UI § 5 'user-select'](https://www.w3.org/TR/css-ui-4/#content-selection)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum UserSelect {
    /// UA-determined selectability.
    #[default]
    Auto,
    /// "Selection cannot start on this element."
    None,
    /// Text can be selected.
    Text,
    /// Selection snaps to the whole element.
    All,
}

/// [CSS Lists § 4.2 'list-style-type'](https://www.w3.org/TR/css-lists-3/#propdef-list-style-type) (subset).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum ListStyleType {
    /// A filled circle marker.
    #[default]
    Disc,
    /// A hollow circle marker.
    Circle,
    /// A filled square marker.
    Square,
    /// Decimal numbering.
    Decimal,
    /// Lowercase latin lettering.
    LowerAlpha,
    /// Uppercase latin lettering.
    UpperAlpha,
    /// Lowercase roman numerals.
    LowerRoman,
    /// Uppercase roman numerals.
    UpperRoman,
    /// No marker.
    None,
}

/// Scrollbar width keyword, [CSS Scrollbars § 3](https://www.w3.org/TR/css-scrollbars-1/#scrollbar-width).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum ScrollbarWidth {
    /// Platform default scrollbar.
    #[default]
    Auto,
    /// "A thinner scrollbar variant."
    Thin,
    /// No scrollbar at all (scrolling still possible).
    None,
}

/// Four [`Length`] edges in top/right/bottom/left order; always
/// four-sided, never partial.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct EdgeSizes {
    /// Top edge.
    pub top: Length,
    /// Right edge.
    pub right: Length,
    /// Bottom edge.
    pub bottom: Length,
    /// Left edge.
    pub left: Length,
}

impl EdgeSizes {
    /// All four edges set to the same length.
    #[must_use]
    pub fn uniform(length: Length) -> Self {
        Self {
            top: length.clone(),
            right: length.clone(),
            bottom: length.clone(),
            left: length,
        }
    }
}

/// One border edge: width, line style, color.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct BorderEdge {
    /// `border-*-width`; zero when the style is `none`.
    pub width: Length,
    /// `border-*-style`.
    pub style: BorderStyle,
    /// `border-*-color`.
    pub color: Color,
}

/// A parsed `transform` function.
///
/// [CSS Transforms § 6](https://www.w3.org/TR/css-transforms-1/#transform-functions)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Transform {
    /// `translate(x, y)` in pixels.
    Translate {
        /// Horizontal offset in px.
        x: f32,
        /// Vertical offset in px.
        y: f32,
    },
    /// `rotate(angle)` in degrees.
    Rotate {
        /// Rotation angle in degrees.
        degrees: f32,
    },
    /// `scale(x, y)` factors.
    Scale {
        /// Horizontal scale factor.
        x: f32,
        /// Vertical scale factor.
        y: f32,
    },
    /// `skew(x, y)` angles in degrees.
    Skew {
        /// Horizontal skew angle in degrees.
        x: f32,
        /// Vertical skew angle in degrees.
        y: f32,
    },
    /// `matrix(a, b, c, d, e, f)`.
    Matrix {
        /// The six matrix parameters.
        m: [f32; 6],
    },
}

/// One `filter` entry.
///
/// [Filter Effects § 10](https://www.w3.org/TR/filter-effects-1/#FilterProperty)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FilterKind {
    /// `grayscale(amount)`
    Grayscale,
    /// `sepia(amount)`
    Sepia,
    /// `brightness(amount)`
    Brightness,
    /// `contrast(amount)`
    Contrast,
    /// `invert(amount)`
    Invert,
    /// `saturate(amount)`
    Saturate,
    /// `opacity(amount)`
    Opacity,
    /// `hue-rotate(angle)`
    HueRotate,
    /// `blur(radius)`
    Blur,
}

/// A filter function with its numeric argument.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Filter {
    /// Which filter function.
    pub kind: FilterKind,
    /// The argument (amount in [0, 1], angle in degrees, or radius px).
    pub value: f32,
}

/// One `box-shadow` entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
pub struct BoxShadow {
    /// Horizontal offset in px.
    pub offset_x: f32,
    /// Vertical offset in px.
    pub offset_y: f32,
    /// Blur radius in px.
    pub blur: f32,
    /// Spread distance in px.
    pub spread: f32,
    /// Shadow color.
    pub color: Color,
    /// `inset` shadows draw inside the border box.
    pub inset: bool,
}

/// One `text-shadow` entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
pub struct TextShadow {
    /// Horizontal offset in px.
    pub offset_x: f32,
    /// Vertical offset in px.
    pub offset_y: f32,
    /// Blur radius in px.
    pub blur: f32,
    /// Shadow color.
    pub color: Color,
}

/// Timing function tag for transitions and animations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
pub enum TimingFunction {
    /// `ease`
    #[default]
    Ease,
    /// `linear`
    Linear,
    /// `ease-in`
    EaseIn,
    /// `ease-out`
    EaseOut,
    /// `ease-in-out`
    EaseInOut,
    /// `cubic-bezier(x1, y1, x2, y2)`
    CubicBezier {
        /// First control point x.
        x1: f32,
        /// First control point y.
        y1: f32,
        /// Second control point x.
        x2: f32,
        /// Second control point y.
        y2: f32,
    },
    /// `steps(n, end)` / `steps(n, start)`
    Steps {
        /// Step count.
        count: u32,
        /// True for `start` steps.
        start: bool,
    },
}

/// One parsed transition, from the shorthand or the longhands.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionDef {
    /// The transitioned property name, or "all".
    pub property: String,
    /// Duration in milliseconds.
    pub duration_ms: f32,
    /// Delay in milliseconds.
    pub delay_ms: f32,
    /// The timing function.
    pub timing: TimingFunction,
}

impl Default for TransitionDef {
    fn default() -> Self {
        Self {
            property: "all".to_string(),
            duration_ms: 0.0,
            delay_ms: 0.0,
            timing: TimingFunction::Ease,
        }
    }
}

/// Animation direction keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum AnimationDirection {
    /// Forward every iteration.
    #[default]
    Normal,
    /// Backward every iteration.
    Reverse,
    /// Alternating, starting forward.
    Alternate,
    /// Alternating, starting backward.
    AlternateReverse,
}

/// Animation fill mode keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum AnimationFillMode {
    /// No fill.
    #[default]
    None,
    /// Retains the final keyframe after finishing.
    Forwards,
    /// Applies the first keyframe during the delay.
    Backwards,
    /// Both of the above.
    Both,
}

/// The animation longhands for one animation.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct AnimationDef {
    /// `animation-name` (a `@keyframes` name).
    pub name: String,
    /// `animation-duration` in milliseconds.
    pub duration_ms: f32,
    /// `animation-delay` in milliseconds.
    pub delay_ms: f32,
    /// `animation-timing-function`.
    pub timing: TimingFunction,
    /// `animation-iteration-count`; negative means infinite.
    pub iteration_count: f32,
    /// `animation-direction`.
    pub direction: AnimationDirection,
    /// `animation-fill-mode`.
    pub fill_mode: AnimationFillMode,
    /// True when `animation-play-state: paused`.
    pub paused: bool,
}

/// SVG presentation attributes that cascade like CSS properties.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SvgPresentation {
    /// `fill` paint color; `None` for `fill: none`.
    pub fill: Option<Color>,
    /// `stroke` paint color; `None` for `stroke: none`.
    pub stroke: Option<Color>,
    /// `fill-opacity` in [0, 1].
    pub fill_opacity: f32,
    /// `stroke-opacity` in [0, 1].
    pub stroke_opacity: f32,
    /// `stroke-width` in px.
    pub stroke_width: f32,
    /// `stroke-linecap`: 0=butt, 1=round, 2=square.
    pub stroke_linecap: u8,
    /// `stroke-linejoin`: 0=miter, 1=round, 2=bevel.
    pub stroke_linejoin: u8,
    /// `stroke-dasharray` pattern, raw.
    pub stroke_dasharray: Vec<f32>,
    /// `text-anchor`: 0=start, 1=middle, 2=end.
    pub text_anchor: u8,
}

impl Default for SvgPresentation {
    fn default() -> Self {
        Self {
            fill: Some(Color::BLACK),
            stroke: None,
            fill_opacity: 1.0,
            stroke_opacity: 1.0,
            stroke_width: 0.0,
            stroke_linecap: 0,
            stroke_linejoin: 0,
            stroke_dasharray: Vec::new(),
            text_anchor: 0,
        }
    }
}

/// Computed styles for an element.
///
/// All longhand slots hold CSS initial values by default. Lengths stay as
/// [`Length`] (percentages and calc expressions are resolved by layout,
/// not here).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComputedStyle {
    // --- Display & positioning scheme ---
    /// [§ 2 'display'](https://www.w3.org/TR/css-display-3/#the-display-properties)
    pub display: Display,
    /// [§ 3.1 'position'](https://www.w3.org/TR/css-position-3/#position-property)
    pub position: Position,
    /// [CSS 2 § 9.5 'float'](https://www.w3.org/TR/CSS2/visuren.html#float-position)
    pub float: FloatSide,
    /// [CSS 2 § 9.5.2 'clear'](https://www.w3.org/TR/CSS2/visuren.html#flow-control)
    pub clear: Clear,
    /// [§ 3 'box-sizing'](https://www.w3.org/TR/css-sizing-3/#box-sizing)
    pub box_sizing: BoxSizing,
    /// [§ 3.2 'writing-mode'](https://www.w3.org/TR/css-writing-modes-4/#block-flow)
    pub writing_mode: WritingMode,
    /// [§ 3.1 'direction'](https://www.w3.org/TR/css-writing-modes-4/#direction)
    pub direction: Direction,

    // --- Sizing ---
    /// `width`; `auto` by default.
    pub width: Length,
    /// `height`; `auto` by default.
    pub height: Length,
    /// `min-width`; initial 0.
    pub min_width: Length,
    /// `max-width`; `None` means no maximum.
    pub max_width: Option<Length>,
    /// `min-height`; initial 0.
    pub min_height: Length,
    /// `max-height`; `None` means no maximum.
    pub max_height: Option<Length>,
    /// `aspect-ratio` as width/height; `None` for `auto`.
    pub aspect_ratio: Option<f32>,

    // --- Box edges ---
    /// The four `margin-*` longhands (each may be `auto`).
    pub margin: EdgeSizes,
    /// The four `padding-*` longhands.
    pub padding: EdgeSizes,
    /// `border-top-{width,style,color}`.
    pub border_top: BorderEdge,
    /// `border-right-{width,style,color}`.
    pub border_right: BorderEdge,
    /// `border-bottom-{width,style,color}`.
    pub border_bottom: BorderEdge,
    /// `border-left-{width,style,color}`.
    pub border_left: BorderEdge,
    /// Border corner radii: top-left, top-right, bottom-right, bottom-left
    /// in px.
    pub border_radius: [f32; 4],

    // --- Box offsets ---
    /// `top` inset; `auto` by default.
    pub top: Length,
    /// `right` inset.
    pub right: Length,
    /// `bottom` inset.
    pub bottom: Length,
    /// `left` inset.
    pub left: Length,
    /// `z-index`; `None` for `auto`.
    pub z_index: Option<i32>,

    // --- Text ---
    /// [§ 3.1 'color'](https://www.w3.org/TR/css-color-4/#the-color-property)
    pub color: Color,
    /// [§ 3.1 'font-family'](https://www.w3.org/TR/css-fonts-4/#font-family-prop)
    pub font_family: String,
    /// [§ 3.5 'font-size'](https://www.w3.org/TR/css-fonts-4/#font-size-prop)
    pub font_size: Length,
    /// [§ 3.2 'font-weight'](https://www.w3.org/TR/css-fonts-4/#font-weight-prop)
    pub font_weight: u16,
    /// [§ 3.3 'font-style'](https://www.w3.org/TR/css-fonts-4/#font-style-prop)
    pub font_style: FontStyle,
    /// `line-height` (a length, or a unitless multiple via
    /// `line_height_unitless`).
    pub line_height: Length,
    /// Unitless `line-height` factor; 0 when an explicit length is set.
    pub line_height_unitless: f32,
    /// `text-align`.
    pub text_align: TextAlign,
    /// `text-decoration-line`.
    pub text_decoration: TextDecorationLine,
    /// `text-decoration-color`; `None` means currentColor.
    pub text_decoration_color: Option<Color>,
    /// `text-transform`.
    pub text_transform: TextTransform,
    /// `white-space`.
    pub white_space: WhiteSpace,
    /// `letter-spacing`.
    pub letter_spacing: Length,
    /// `word-spacing`.
    pub word_spacing: Length,
    /// `text-indent`.
    pub text_indent: Length,
    /// `tab-size` in spaces.
    pub tab_size: u32,
    /// `font-feature-settings` tag/value pairs.
    pub font_feature_settings: Vec<(String, u32)>,

    // --- Visual ---
    /// `background-color`.
    pub background_color: Color,
    /// `background-image` URL, "" when none.
    pub background_image: String,
    /// `opacity` in [0, 1].
    pub opacity: f32,
    /// `visibility`.
    pub visibility: Visibility,
    /// `overflow-x`.
    pub overflow_x: Overflow,
    /// `overflow-y`.
    pub overflow_y: Overflow,
    /// `box-shadow` list, outermost first.
    pub box_shadows: Vec<BoxShadow>,
    /// `text-shadow` list.
    pub text_shadows: Vec<TextShadow>,
    /// `transform` function list, applied left to right.
    pub transforms: Vec<Transform>,
    /// `transform-origin` as (x, y).
    pub transform_origin: (Length, Length),
    /// `filter` list.
    pub filters: Vec<Filter>,
    /// `backdrop-filter` list.
    pub backdrop_filters: Vec<Filter>,

    // --- Flex ---
    /// `flex-direction`.
    pub flex_direction: FlexDirection,
    /// `flex-wrap`.
    pub flex_wrap: FlexWrap,
    /// `justify-content`.
    pub justify_content: JustifyContent,
    /// `align-items`.
    pub align_items: AlignItems,
    /// `align-self`; `None` means auto (inherit the container's
    /// align-items).
    pub align_self: Option<AlignItems>,
    /// `flex-grow`.
    pub flex_grow: f32,
    /// `flex-shrink`.
    pub flex_shrink: f32,
    /// `flex-basis`; `auto` by default.
    pub flex_basis: Length,
    /// `order`.
    pub order: i32,
    /// `row-gap`.
    pub row_gap: Length,
    /// `column-gap`.
    pub column_gap: Length,

    // --- Grid ---
    /// `grid-template-columns` track list, raw.
    pub grid_template_columns: String,
    /// `grid-template-rows` track list, raw.
    pub grid_template_rows: String,
    /// `grid-template-areas`, raw.
    pub grid_template_areas: String,
    /// `grid-auto-flow`: row/column with optional dense.
    pub grid_auto_flow: String,
    /// `grid-column` placement ("1 / 3"), raw.
    pub grid_column: String,
    /// `grid-row` placement, raw.
    pub grid_row: String,

    // --- Lists & tables ---
    /// `list-style-type`.
    pub list_style_type: ListStyleType,
    /// `border-collapse`.
    pub border_collapse: bool,
    /// `border-spacing` (horizontal, vertical) in px.
    pub border_spacing: (f32, f32),

    // --- Transitions & animations ---
    /// Parsed `transition` definitions.
    pub transitions: Vec<TransitionDef>,
    /// Parsed `animation` definitions.
    pub animations: Vec<AnimationDef>,

    // --- Interaction ---
    /// `cursor`.
    pub cursor: Cursor,
    /// `pointer-events`.
    pub pointer_events: PointerEvents,
    /// `user-select`.
    pub user_select: UserSelect,

    // --- Scrollbars ---
    /// `scrollbar-color` (thumb, track); `None` for auto.
    pub scrollbar_color: Option<(Color, Color)>,
    /// `scrollbar-width` keyword.
    pub scrollbar_width: ScrollbarWidth,

    // --- SVG ---
    /// SVG presentation attributes.
    pub svg: SvgPresentation,

    // --- Custom properties ---
    /// CSS custom properties (`--name` → raw value text), after cascade.
    pub custom_properties: HashMap<String, String>,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            display: Display::Inline,
            position: Position::Static,
            float: FloatSide::None,
            clear: Clear::None,
            box_sizing: BoxSizing::ContentBox,
            writing_mode: WritingMode::HorizontalTb,
            direction: Direction::Ltr,

            width: Length::auto(),
            height: Length::auto(),
            min_width: Length::zero(),
            max_width: None,
            min_height: Length::zero(),
            max_height: None,
            aspect_ratio: None,

            margin: EdgeSizes::default(),
            padding: EdgeSizes::default(),
            border_top: BorderEdge::default(),
            border_right: BorderEdge::default(),
            border_bottom: BorderEdge::default(),
            border_left: BorderEdge::default(),
            border_radius: [0.0; 4],

            top: Length::auto(),
            right: Length::auto(),
            bottom: Length::auto(),
            left: Length::auto(),
            z_index: None,

            color: Color::BLACK,
            font_family: "sans-serif".to_string(),
            font_size: Length::px(16.0),
            font_weight: 400,
            font_style: FontStyle::Normal,
            line_height: Length::px(19.2),
            line_height_unitless: 1.2,
            text_align: TextAlign::Left,
            text_decoration: TextDecorationLine::None,
            text_decoration_color: None,
            text_transform: TextTransform::None,
            white_space: WhiteSpace::Normal,
            letter_spacing: Length::zero(),
            word_spacing: Length::zero(),
            text_indent: Length::zero(),
            tab_size: 4,
            font_feature_settings: Vec::new(),

            background_color: Color::TRANSPARENT,
            background_image: String::new(),
            opacity: 1.0,
            visibility: Visibility::Visible,
            overflow_x: Overflow::Visible,
            overflow_y: Overflow::Visible,
            box_shadows: Vec::new(),
            text_shadows: Vec::new(),
            transforms: Vec::new(),
            transform_origin: (Length::percent(50.0), Length::percent(50.0)),
            filters: Vec::new(),
            backdrop_filters: Vec::new(),

            flex_direction: FlexDirection::Row,
            flex_wrap: FlexWrap::NoWrap,
            justify_content: JustifyContent::FlexStart,
            align_items: AlignItems::Stretch,
            align_self: None,
            flex_grow: 0.0,
            flex_shrink: 1.0,
            flex_basis: Length::auto(),
            order: 0,
            row_gap: Length::zero(),
            column_gap: Length::zero(),

            grid_template_columns: String::new(),
            grid_template_rows: String::new(),
            grid_template_areas: String::new(),
            grid_auto_flow: "row".to_string(),
            grid_column: String::new(),
            grid_row: String::new(),

            list_style_type: ListStyleType::Disc,
            border_collapse: false,
            border_spacing: (2.0, 2.0),

            transitions: Vec::new(),
            animations: Vec::new(),

            cursor: Cursor::Auto,
            pointer_events: PointerEvents::Auto,
            user_select: UserSelect::Auto,

            scrollbar_color: None,
            scrollbar_width: ScrollbarWidth::Auto,

            svg: SvgPresentation::default(),

            custom_properties: HashMap::new(),
        }
    }
}
