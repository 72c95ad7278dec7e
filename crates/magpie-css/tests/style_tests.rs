//! Integration tests for the computed-style and layout-box data model.

use magpie_css::layout::{BoxGeometry, EdgeOffsets, LayoutNode, MARGIN_AUTO, is_margin_auto};
use magpie_css::style::{
    AlignItems, BoxSizing, Color, ComputedStyle, Display, FlexDirection, FloatSide, Length,
    Overflow, Position, TextAlign, Unit, Visibility,
};

#[test]
fn computed_style_defaults_match_css_initial_values() {
    let style = ComputedStyle::default();

    assert_eq!(style.display, Display::Inline);
    assert_eq!(style.position, Position::Static);
    assert_eq!(style.float, FloatSide::None);
    assert_eq!(style.box_sizing, BoxSizing::ContentBox);

    assert!(style.width.is_auto());
    assert!(style.height.is_auto());
    assert!(style.min_width.is_zero());
    assert_eq!(style.max_width, None);

    assert_eq!(style.color, Color::BLACK);
    assert_eq!(style.background_color, Color::TRANSPARENT);
    assert_eq!(style.font_size, Length::px(16.0));
    assert_eq!(style.font_weight, 400);
    assert_eq!(style.text_align, TextAlign::Left);
    assert_eq!(style.opacity, 1.0);
    assert_eq!(style.visibility, Visibility::Visible);
    assert_eq!(style.overflow_x, Overflow::Visible);

    assert_eq!(style.flex_direction, FlexDirection::Row);
    assert_eq!(style.align_items, AlignItems::Stretch);
    assert_eq!(style.flex_grow, 0.0);
    assert_eq!(style.flex_shrink, 1.0);
    assert!(style.flex_basis.is_auto());

    assert!(style.custom_properties.is_empty());
    assert!(style.transitions.is_empty());
}

#[test]
fn edges_are_always_four_sided() {
    let style = ComputedStyle::default();
    // Every edge slot exists with a definite value; no partial edges.
    assert!(style.margin.top.is_zero());
    assert!(style.margin.right.is_zero());
    assert!(style.margin.bottom.is_zero());
    assert!(style.margin.left.is_zero());
    assert!(style.padding.top.is_zero());
    assert!(style.padding.left.is_zero());
    assert!(style.border_top.width.is_zero());
    assert!(style.border_left.width.is_zero());
}

#[test]
fn percentages_survive_into_computed_style() {
    // The resolver stores the Length payload untouched; layout resolves it
    // against the containing block.
    let style = ComputedStyle {
        width: Length::percent(50.0),
        ..ComputedStyle::default()
    };
    assert_eq!(style.width.unit, Unit::Percent);
    assert_eq!(style.width.value, 50.0);
}

#[test]
fn keyword_parsers_cover_the_display_values() {
    assert_eq!(Display::from_keyword("block"), Some(Display::Block));
    assert_eq!(Display::from_keyword("FLEX"), Some(Display::Flex));
    assert_eq!(Display::from_keyword("inline-grid"), Some(Display::InlineGrid));
    assert_eq!(Display::from_keyword("none"), Some(Display::None));
    assert_eq!(Display::from_keyword("sparkle"), None);

    assert_eq!(Position::from_keyword("sticky"), Some(Position::Sticky));
    assert_eq!(Position::from_keyword("hovering"), None);
}

#[test]
fn layout_node_geometry_helpers() {
    let mut node = LayoutNode::element("div");
    node.geometry = BoxGeometry {
        x: 0.0,
        y: 0.0,
        width: 200.0,
        height: 100.0,
        margin: EdgeOffsets::uniform(10.0),
        border: EdgeOffsets::uniform(1.0),
        padding: EdgeOffsets::uniform(4.0),
    };
    assert_eq!(node.geometry.border_box_width(), 210.0);
    assert_eq!(node.geometry.margin_box_width(), 230.0);
    assert_eq!(node.geometry.content_left(), 15.0);
}

#[test]
fn layout_node_text_runs() {
    let text = LayoutNode::text("hello");
    assert!(text.is_text);
    assert_eq!(text.text_content, "hello");
    assert!(text.tag_name.is_empty());
}

#[test]
fn margin_auto_sentinel() {
    let geometry = BoxGeometry {
        margin: EdgeOffsets {
            left: MARGIN_AUTO,
            right: MARGIN_AUTO,
            ..EdgeOffsets::default()
        },
        ..BoxGeometry::default()
    };
    assert!(is_margin_auto(geometry.margin.left));
    assert!(!is_margin_auto(geometry.margin.top));
}

#[test]
fn layout_tree_nests() {
    let mut parent = LayoutNode::element("section");
    let mut child = LayoutNode::element("p");
    child.children.push(LayoutNode::text("content"));
    parent.children.push(child);

    assert_eq!(parent.children.len(), 1);
    assert_eq!(parent.children[0].children[0].text_content, "content");
}
