//! The layout node data carrier.
//!
//! A [`LayoutNode`] mirrors the computed style fields layout actually
//! consumes, plus the box geometry the solver fills in, plus tree
//! structure. It is pure data: building the tree from the DOM and solving
//! geometry both happen elsewhere.

use serde::Serialize;

use crate::style::{Color, ComputedStyle, Length};

use super::box_model::{BoxGeometry, Z_INDEX_AUTO};

/// The formatting context a box participates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum LayoutMode {
    /// Block-level flow layout.
    #[default]
    Block,
    /// Inline-level flow layout.
    Inline,
    /// Inline-level block container.
    InlineBlock,
    /// Flex container layout.
    Flex,
    /// Grid container layout.
    Grid,
    /// Table layout.
    Table,
    /// Generates no box.
    None,
}

/// The outer/inner display type pair, collapsed to the values layout
/// distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum DisplayType {
    /// `display: block`
    #[default]
    Block,
    /// `display: inline`
    Inline,
    /// `display: inline-block`
    InlineBlock,
    /// `display: flex`
    Flex,
    /// `display: inline-flex`
    InlineFlex,
    /// `display: grid`
    Grid,
    /// `display: inline-grid`
    InlineGrid,
    /// `display: list-item`
    ListItem,
    /// `display: table`
    Table,
    /// `display: table-row`
    TableRow,
    /// `display: table-cell`
    TableCell,
    /// `display: none`
    None,
}

/// A box in the layout tree.
///
/// Geometry starts zeroed and is written by the (external) solver; the
/// style snapshot fields are copied out of [`ComputedStyle`] by the tree
/// builder so layout never chases style references.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutNode {
    /// Resolved geometry, written during layout.
    pub geometry: BoxGeometry,
    /// Which layout algorithm handles this box.
    pub mode: LayoutMode,
    /// The box's display type.
    pub display: DisplayType,

    /// Source element tag name ("" for text runs).
    pub tag_name: String,
    /// Source element id attribute ("" when absent).
    pub element_id: String,
    /// Source element class names (container query matching reads these).
    pub css_classes: Vec<String>,

    /// True for a text run.
    pub is_text: bool,
    /// The text content of a text run.
    pub text_content: String,

    /// The full computed style this box was built from. Percentage and
    /// calc lengths inside remain unresolved.
    pub style: ComputedStyle,

    // --- Resolved style snapshot the solver reads constantly ---
    /// Font size in px.
    pub font_size: f32,
    /// Font weight (100-900).
    pub font_weight: u16,
    /// True for italic/oblique faces.
    pub font_italic: bool,
    /// Font family stack, raw.
    pub font_family: String,
    /// Line height as a multiple of the font size.
    pub line_height: f32,
    /// Opacity in [0, 1].
    pub opacity: f32,
    /// Letter spacing in px.
    pub letter_spacing: f32,
    /// Word spacing in px.
    pub word_spacing: f32,
    /// Text color.
    pub color: Color,
    /// Background color.
    pub background_color: Color,
    /// Resolved `z-index`, [`Z_INDEX_AUTO`] for auto.
    pub z_index: i32,

    // --- Flex item fields ---
    /// `flex-grow`.
    pub flex_grow: f32,
    /// `flex-shrink`.
    pub flex_shrink: f32,
    /// `flex-basis`; `auto` stays a length.
    pub flex_basis: Length,
    /// `order`.
    pub order: i32,
    /// Resolved row gap in px.
    pub row_gap: f32,
    /// Resolved column gap in px.
    pub column_gap: f32,

    // --- Grid fields (raw track strings; the solver parses them) ---
    /// `grid-template-columns`.
    pub grid_template_columns: String,
    /// `grid-template-rows`.
    pub grid_template_rows: String,
    /// `grid-column` placement.
    pub grid_column: String,
    /// `grid-row` placement.
    pub grid_row: String,

    /// Child boxes in document order.
    pub children: Vec<LayoutNode>,
}

impl Default for LayoutNode {
    fn default() -> Self {
        Self {
            geometry: BoxGeometry::default(),
            mode: LayoutMode::Block,
            display: DisplayType::Block,
            tag_name: String::new(),
            element_id: String::new(),
            css_classes: Vec::new(),
            is_text: false,
            text_content: String::new(),
            style: ComputedStyle::default(),
            font_size: 16.0,
            font_weight: 400,
            font_italic: false,
            font_family: String::new(),
            line_height: 1.2,
            opacity: 1.0,
            letter_spacing: 0.0,
            word_spacing: 0.0,
            color: Color::BLACK,
            background_color: Color::TRANSPARENT,
            z_index: Z_INDEX_AUTO,
            flex_grow: 0.0,
            flex_shrink: 1.0,
            flex_basis: Length::auto(),
            order: 0,
            row_gap: 0.0,
            column_gap: 0.0,
            grid_template_columns: String::new(),
            grid_template_rows: String::new(),
            grid_column: String::new(),
            grid_row: String::new(),
            children: Vec::new(),
        }
    }
}

impl LayoutNode {
    /// A text-run node.
    #[must_use]
    pub fn text(content: &str) -> Self {
        Self {
            is_text: true,
            text_content: content.to_string(),
            mode: LayoutMode::Inline,
            display: DisplayType::Inline,
            ..Self::default()
        }
    }

    /// An element node with a tag name.
    #[must_use]
    pub fn element(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_string(),
            ..Self::default()
        }
    }
}
