//! Integration tests for the typed value parsers, driven end-to-end
//! through the stylesheet parser where it matters.

use magpie_css::parser::parse_declaration_block;
use magpie_css::style::{
    EvalContext, ParseEnvironment, Unit, parse_color, parse_font_feature_settings, parse_length,
};

/// Parse a declaration and hand its flattened value text to a value
/// parser, the way the style resolver does.
fn declaration_value(css: &str) -> String {
    let decls = parse_declaration_block(css);
    assert_eq!(decls.len(), 1, "input {css:?}");
    decls[0].value_text()
}

#[test]
fn calc_through_declaration_pipeline() {
    // width: calc(100% - 20px) keeps its expression tree and resolves
    // against the containing block at layout time.
    let value = declaration_value("width: calc(100% - 20px)");
    let length = parse_length(&value).expect("calc parses");
    assert_eq!(length.unit, Unit::Calc);

    let ctx = EvalContext {
        parent_value: 400.0,
        ..EvalContext::default()
    };
    assert_eq!(length.to_px(&ctx), 380.0);
}

#[test]
fn calc_matches_native_arithmetic() {
    let ctx = EvalContext::default();
    let cases: &[(&str, f32)] = &[
        ("calc(10px + 5px)", 15.0),
        ("calc(3 * (4 + 2))", 18.0),
        ("calc(100 / 4 - 5)", 20.0),
        ("min(7px, 3px, 5px)", 3.0),
        ("max(7px, 3px, 5px)", 7.0),
        ("clamp(10px, 2px, 30px)", 10.0),
        ("clamp(10px, 50px, 30px)", 30.0),
        ("abs(-12)", 12.0),
        ("hypot(3, 4)", 5.0),
        ("pow(2, 8)", 256.0),
    ];
    for (expr, expected) in cases {
        let length = parse_length(expr).unwrap_or_else(|| panic!("{expr} should parse"));
        let actual = length.to_px(&ctx);
        assert!(
            (actual - expected).abs() < 1e-4,
            "{expr}: got {actual}, want {expected}"
        );
    }
}

#[test]
fn nested_math_functions() {
    let ctx = EvalContext {
        parent_value: 200.0,
        ..EvalContext::default()
    };
    let length = parse_length("min(50%, max(40px, 20px))").expect("parses");
    // min(100px, 40px) = 40px.
    assert_eq!(length.to_px(&ctx), 40.0);
}

#[test]
fn relative_color_through_declaration_pipeline() {
    let value = declaration_value("color: rgb(from red calc(r * 0.5) g b)");
    let color = parse_color(&value, &ParseEnvironment::default()).expect("parses");
    assert_eq!(
        (color.r, color.g, color.b, color.a),
        (127, 0, 0, 255),
        "half of red's 255 truncates to 127"
    );
}

#[test]
fn hex_round_trip_samples() {
    // Round-trip property: parsing #RRGGBB yields exactly (r, g, b, 255).
    let env = ParseEnvironment::default();
    for (r, g, b) in [
        (0u8, 0u8, 0u8),
        (255, 255, 255),
        (1, 2, 3),
        (0x12, 0x34, 0x56),
        (0xab, 0xcd, 0xef),
        (0x80, 0x7f, 0xfe),
    ] {
        let css = format!("#{r:02x}{g:02x}{b:02x}");
        let color = parse_color(&css, &env).expect("hex parses");
        assert_eq!((color.r, color.g, color.b, color.a), (r, g, b, 255));
    }
}

#[test]
fn color_keywords_through_declarations() {
    let value = declaration_value("background-color: rebeccapurple");
    let color = parse_color(&value, &ParseEnvironment::default()).unwrap();
    assert_eq!((color.r, color.g, color.b), (102, 51, 153));
}

#[test]
fn color_mix_through_declarations() {
    let value = declaration_value("color: color-mix(in srgb, red 25%, blue)");
    let color = parse_color(&value, &ParseEnvironment::default()).unwrap();
    assert_eq!(color.r, 63);
    assert_eq!(color.b, 191);
}

#[test]
fn oklab_oklch_are_consistent() {
    // The polar and rectangular forms of the same point agree.
    let env = ParseEnvironment::default();
    let rect = parse_color("oklab(0.627955 0.224863 0.125846)", &env).unwrap();
    let polar = parse_color("oklch(0.627955 0.257683 29.2338)", &env).unwrap();
    assert!((i32::from(rect.r) - i32::from(polar.r)).abs() <= 1);
    assert!((i32::from(rect.g) - i32::from(polar.g)).abs() <= 1);
    assert!((i32::from(rect.b) - i32::from(polar.b)).abs() <= 1);
    // Both should be close to pure red.
    assert!(rect.r >= 250 && rect.g <= 5 && rect.b <= 5);
}

#[test]
fn lengths_keep_percentages_uncollapsed() {
    let value = declaration_value("width: 50%");
    let length = parse_length(&value).unwrap();
    assert_eq!(length.unit, Unit::Percent);
    assert_eq!(length.value, 50.0);
}

#[test]
fn container_units_resolve_against_container() {
    let length = parse_length("10cqw").unwrap();
    let ctx = EvalContext {
        container_width: 500.0,
        container_height: 300.0,
        ..EvalContext::default()
    };
    assert_eq!(length.to_px(&ctx), 50.0);

    let cqmin = parse_length("10cqmin").unwrap();
    assert_eq!(cqmin.to_px(&ctx), 30.0);
}

#[test]
fn font_feature_settings_through_declarations() {
    let value = declaration_value("font-feature-settings: \"liga\" 0, \"kern\"");
    let settings = parse_font_feature_settings(&value);
    assert_eq!(
        settings,
        vec![("liga".to_string(), 0), ("kern".to_string(), 1)]
    );
}

#[test]
fn bad_values_parse_to_none() {
    assert!(parse_length("banana").is_none());
    assert!(parse_length("").is_none());
    assert!(parse_color("notacolor", &ParseEnvironment::default()).is_none());
    assert!(parse_color("rgb()", &ParseEnvironment::default()).is_none());
}
