//! Layout box data model.
//!
//! These are the value carriers handed to the layout engine: resolved
//! geometry ([`BoxGeometry`]) and per-box style snapshots
//! ([`LayoutNode`]). Layout *solving* (flex/grid/block geometry) is an
//! external collaborator; nothing here computes positions.

/// Box geometry and edge offsets.
pub mod box_model;
/// The layout node data carrier.
pub mod layout_box;

pub use box_model::{
    BoxGeometry, EdgeOffsets, MARGIN_AUTO, Z_INDEX_AUTO, is_margin_auto, is_z_index_auto,
};
pub use layout_box::{DisplayType, LayoutMode, LayoutNode};
