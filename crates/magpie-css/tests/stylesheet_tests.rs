//! Integration tests for the stylesheet parser.

use magpie_css::parser::{parse_declaration_block, parse_stylesheet};

#[test]
fn simple_rule() {
    let sheet = parse_stylesheet("body { margin: 0; color: red; }");
    assert_eq!(sheet.rules.len(), 1);
    let rule = &sheet.rules[0];
    assert_eq!(rule.selector_text, "body");
    assert_eq!(rule.declarations.len(), 2);
    assert_eq!(rule.declarations[0].name, "margin");
    assert_eq!(rule.declarations[0].value_text(), "0");
    assert_eq!(rule.declarations[1].name, "color");
    assert_eq!(rule.declarations[1].value_text(), "red");
}

#[test]
fn selector_text_reconstructs_hashes_and_functions() {
    let sheet = parse_stylesheet("#app .item:nth-child(2n) > p { color: blue }");
    assert_eq!(
        sheet.rules[0].selector_text,
        "#app .item:nth-child(2n) > p"
    );
}

#[test]
fn property_names_are_lowercased() {
    let sheet = parse_stylesheet("p { COLOR: red }");
    assert_eq!(sheet.rules[0].declarations[0].name, "color");
}

#[test]
fn important_is_detected_and_trimmed() {
    let sheet = parse_stylesheet("p { color: red !important; width: 10px }");
    let decls = &sheet.rules[0].declarations;
    assert!(decls[0].important);
    assert_eq!(decls[0].value_text(), "red");
    assert!(!decls[1].important);
}

#[test]
fn malformed_declaration_is_dropped_silently() {
    let sheet = parse_stylesheet("p { color red; width: 10px; }");
    let decls = &sheet.rules[0].declarations;
    // "color red" (missing colon) is dropped; parsing resumes.
    assert_eq!(decls.len(), 1);
    assert_eq!(decls[0].name, "width");
}

#[test]
fn nesting_flattens_after_parent() {
    let sheet = parse_stylesheet(".card { color: red; &:hover { color: blue } }");
    assert_eq!(sheet.rules.len(), 2);

    assert_eq!(sheet.rules[0].selector_text, ".card");
    assert_eq!(sheet.rules[0].declarations[0].value_text(), "red");

    assert_eq!(sheet.rules[1].selector_text, ".card:hover");
    assert_eq!(sheet.rules[1].declarations[0].value_text(), "blue");
}

#[test]
fn nesting_without_ampersand_prepends_descendant() {
    let sheet = parse_stylesheet(".card { .title { font-weight: bold } }");
    assert_eq!(sheet.rules[1].selector_text, ".card .title");
}

#[test]
fn deep_nesting_resolves_recursively() {
    let sheet = parse_stylesheet(".a { &.b { &:hover { color: red } } }");
    assert_eq!(sheet.rules.len(), 3);
    assert_eq!(sheet.rules[1].selector_text, ".a.b");
    assert_eq!(sheet.rules[2].selector_text, ".a.b:hover");
}

#[test]
fn import_url_forms() {
    let sheet = parse_stylesheet(
        "@import url(\"a.css\");\n@import url(b.css);\n@import \"c.css\" screen and (min-width: 600px);",
    );
    assert_eq!(sheet.imports.len(), 3);
    assert_eq!(sheet.imports[0].url, "a.css");
    assert_eq!(sheet.imports[1].url, "b.css");
    assert_eq!(sheet.imports[2].url, "c.css");
    assert!(sheet.imports[2].media.contains("min-width"));
}

#[test]
fn media_rule_captures_condition_verbatim() {
    let sheet = parse_stylesheet("@media screen and (min-width: 600px) { p { color: red } }");
    assert_eq!(sheet.media_queries.len(), 1);
    let media = &sheet.media_queries[0];
    assert_eq!(media.condition, "screen and (min-width: 600px)");
    assert_eq!(media.rules.len(), 1);
    assert_eq!(media.rules[0].selector_text, "p");
}

#[test]
fn supports_rule() {
    let sheet = parse_stylesheet("@supports (display: grid) { .g { display: grid } }");
    assert_eq!(sheet.supports_rules.len(), 1);
    assert!(sheet.supports_rules[0].condition.contains("display"));
    assert_eq!(sheet.supports_rules[0].rules.len(), 1);
}

#[test]
fn keyframes_rule_keeps_selectors_raw() {
    let sheet = parse_stylesheet(
        "@keyframes slide { from { left: 0 } 50% { left: 20px } to { left: 40px } }",
    );
    assert_eq!(sheet.keyframes.len(), 1);
    let kf = &sheet.keyframes[0];
    assert_eq!(kf.name, "slide");
    assert_eq!(kf.keyframes.len(), 3);
    assert_eq!(kf.keyframes[0].selector, "from");
    assert_eq!(kf.keyframes[1].selector, "50%");
    assert_eq!(kf.keyframes[2].selector, "to");
    assert_eq!(kf.keyframes[1].declarations[0].name, "left");
}

#[test]
fn webkit_keyframes_alias() {
    let sheet = parse_stylesheet("@-webkit-keyframes spin { from { opacity: 0 } }");
    assert_eq!(sheet.keyframes.len(), 1);
    assert_eq!(sheet.keyframes[0].name, "spin");
}

#[test]
fn font_face_descriptors() {
    let sheet = parse_stylesheet(
        "@font-face { font-family: \"My Font\"; src: url(font.woff2); font-weight: 300 700; unicode-range: U+0000-00FF; font-display: swap; }",
    );
    assert_eq!(sheet.font_faces.len(), 1);
    let face = &sheet.font_faces[0];
    assert_eq!(face.font_family, "My Font");
    assert!(face.src.contains("font.woff2"));
    assert_eq!(face.min_weight, 300);
    assert_eq!(face.max_weight, 700);
    assert_eq!(face.unicode_min, 0x0000);
    assert_eq!(face.unicode_max, 0x00FF);
    assert_eq!(face.font_display, "swap");
}

#[test]
fn font_face_invalid_weight_defaults() {
    let sheet = parse_stylesheet("@font-face { font-family: x; font-weight: heavy }");
    assert_eq!(sheet.font_faces[0].min_weight, 400);
    assert_eq!(sheet.font_faces[0].max_weight, 400);
}

#[test]
fn layer_declaration_orders_ascend_and_cache() {
    let sheet = parse_stylesheet("@layer a; @layer b; @layer a { .x { color: red; } }");
    assert_eq!(sheet.layer_rules.len(), 3);

    let a_decl = &sheet.layer_rules[0];
    let b_decl = &sheet.layer_rules[1];
    let a_block = &sheet.layer_rules[2];

    assert_eq!(a_decl.name, "a");
    assert_eq!(b_decl.name, "b");
    assert!(a_decl.order < b_decl.order);
    // Redeclaring reuses the original order.
    assert_eq!(a_block.order, a_decl.order);
    assert_eq!(a_block.rules.len(), 1);
    assert!(a_block.rules[0].in_layer);
    assert_eq!(a_block.rules[0].layer_order, a_decl.order);
}

#[test]
fn layer_list_declaration() {
    let sheet = parse_stylesheet("@layer reset, base, components;");
    let names: Vec<&str> = sheet
        .layer_rules
        .iter()
        .map(|l| l.name.as_str())
        .collect();
    assert_eq!(names, ["reset", "base", "components"]);
    assert_eq!(sheet.layer_rules[0].order, 0);
    assert_eq!(sheet.layer_rules[2].order, 2);
}

#[test]
fn nested_layers_canonicalize_dotted() {
    let sheet = parse_stylesheet("@layer outer { @layer inner { p { color: red } } }");
    let names: Vec<&str> = sheet
        .layer_rules
        .iter()
        .map(|l| l.name.as_str())
        .collect();
    // Inner finishes first, then the outer block is pushed.
    assert!(names.contains(&"outer"));
    assert!(names.contains(&"outer.inner"));
}

#[test]
fn container_rule_splits_name_and_condition() {
    let sheet =
        parse_stylesheet("@container sidebar (min-width: 400px) { .child { color: red } }");
    assert_eq!(sheet.container_rules.len(), 1);
    let container = &sheet.container_rules[0];
    assert_eq!(container.name, "sidebar");
    assert!(container.condition.starts_with('('));
    assert_eq!(container.rules.len(), 1);
}

#[test]
fn scope_rule_extracts_bounds() {
    let sheet = parse_stylesheet("@scope (.card) to (.content) { p { color: red } }");
    assert_eq!(sheet.scope_rules.len(), 1);
    let scope = &sheet.scope_rules[0];
    assert_eq!(scope.scope_start, ".card");
    assert_eq!(scope.scope_end, ".content");
    assert_eq!(scope.rules.len(), 1);
}

#[test]
fn property_rule_descriptors() {
    let sheet = parse_stylesheet(
        "@property --accent { syntax: \"<color>\"; inherits: true; initial-value: rebeccapurple; }",
    );
    assert_eq!(sheet.property_rules.len(), 1);
    let prop = &sheet.property_rules[0];
    assert_eq!(prop.name, "--accent");
    assert_eq!(prop.syntax, "<color>");
    assert!(prop.inherits);
    assert_eq!(prop.initial_value, "rebeccapurple");
}

#[test]
fn counter_style_rule_collects_descriptor_map() {
    let sheet =
        parse_stylesheet("@counter-style thumbs { system: cyclic; suffix: \" \"; }");
    assert_eq!(sheet.counter_style_rules.len(), 1);
    let cs = &sheet.counter_style_rules[0];
    assert_eq!(cs.name, "thumbs");
    assert_eq!(cs.descriptors.get("system").map(String::as_str), Some("cyclic"));
}

#[test]
fn starting_style_and_font_palette_are_discarded() {
    let sheet = parse_stylesheet(
        "@starting-style { p { opacity: 0 } } @font-palette-values --p { base-palette: 1 } p { color: red }",
    );
    // Neither at-rule is represented; the trailing style rule survives.
    assert_eq!(sheet.rules.len(), 1);
    assert_eq!(sheet.rules[0].selector_text, "p");
}

#[test]
fn unknown_at_rule_is_skipped() {
    let sheet = parse_stylesheet("@unknown foo { garbage } p { color: red }");
    assert_eq!(sheet.rules.len(), 1);
    assert_eq!(sheet.rules[0].selector_text, "p");

    let sheet = parse_stylesheet("@charset \"utf-8\"; p { color: red }");
    assert_eq!(sheet.rules.len(), 1);
}

#[test]
fn cdo_cdc_skipped_at_top_level() {
    let sheet = parse_stylesheet("<!-- p { color: red } -->");
    assert_eq!(sheet.rules.len(), 1);
}

#[test]
fn function_commas_are_preserved() {
    let decls = parse_declaration_block("width: var(--w, 10px)");
    assert_eq!(decls.len(), 1);
    assert_eq!(decls[0].value_text(), "var(--w, 10px)");
}

#[test]
fn declaration_block_parsing() {
    let decls = parse_declaration_block("color: red; margin: 0 auto");
    assert_eq!(decls.len(), 2);
    assert_eq!(decls[0].name, "color");
    assert_eq!(decls[1].value_text(), "0 auto");
}

#[test]
fn unterminated_block_recovers() {
    let sheet = parse_stylesheet("p { color: red");
    assert_eq!(sheet.rules.len(), 1);
    assert_eq!(sheet.rules[0].declarations.len(), 1);
}

#[test]
fn hostile_nesting_depth_is_bounded() {
    // 80 levels of nesting; the parser must neither overflow the stack
    // nor loop forever.
    let mut css = String::from(".a {");
    for _ in 0..80 {
        css.push_str("&.b {");
    }
    css.push_str("color: red;");
    for _ in 0..81 {
        css.push('}');
    }
    let sheet = parse_stylesheet(&css);
    assert!(!sheet.rules.is_empty());
}
