//! Integration tests for the HTML tokenizer.

use magpie_html::{HtmlTokenizer, Token, TokenizerState};

/// Tokenize a string to completion and return the tokens (EOF included).
fn tokenize(input: &str) -> Vec<Token> {
    let mut tokenizer = HtmlTokenizer::new(input);
    let mut tokens = Vec::new();
    loop {
        let token = tokenizer.next_token();
        let done = token.is_eof();
        tokens.push(token);
        if done {
            break;
        }
    }
    tokens
}

/// Collect the character data of every Character token.
fn character_data(tokens: &[Token]) -> String {
    tokens
        .iter()
        .filter_map(|t| match t {
            Token::Character { data } => Some(*data),
            _ => None,
        })
        .collect()
}

#[test]
fn plain_text_emits_one_character_per_token() {
    let tokens = tokenize("Hello");
    assert_eq!(tokens.len(), 6); // 5 chars + EOF
    assert!(matches!(tokens[0], Token::Character { data: 'H' }));
    assert!(matches!(tokens[4], Token::Character { data: 'o' }));
    assert!(matches!(tokens[5], Token::EndOfFile));
}

#[test]
fn entities_decode_to_single_characters() {
    // "a&amp;b&lt;c" -> a & b < c
    let tokens = tokenize("a&amp;b&lt;c");
    let expected = ['a', '&', 'b', '<', 'c'];
    assert_eq!(tokens.len(), expected.len() + 1);
    for (token, want) in tokens.iter().zip(expected) {
        assert!(matches!(token, Token::Character { data } if *data == want));
    }
    assert!(tokens.last().unwrap().is_eof());
}

#[test]
fn entity_forms_are_equivalent() {
    // Named, decimal, and hex forms of U+0026 all yield one '&' emission.
    for input in ["&amp;", "&#38;", "&#x26;"] {
        let tokens = tokenize(input);
        assert_eq!(tokens.len(), 2, "input {input:?}");
        assert!(matches!(tokens[0], Token::Character { data: '&' }));
    }
}

#[test]
fn multibyte_entity_decodes() {
    let tokens = tokenize("&copy;");
    assert!(matches!(tokens[0], Token::Character { data: '©' }));
}

#[test]
fn unknown_entity_falls_back_to_literal_ampersand() {
    assert_eq!(character_data(&tokenize("&nosuch;x")), "&nosuch;x");
}

#[test]
fn entity_without_semicolon_only_for_xml_five() {
    assert_eq!(character_data(&tokenize("&amp rest")), "& rest");
    // &copy without ';' does not resolve.
    assert_eq!(character_data(&tokenize("&copy rest")), "&copy rest");
}

#[test]
fn numeric_reference_out_of_range_is_replacement_character() {
    assert_eq!(character_data(&tokenize("&#x110000;")), "\u{FFFD}");
    assert_eq!(character_data(&tokenize("&#0;")), "\u{FFFD}");
}

#[test]
fn start_tag() {
    let tokens = tokenize("<div>");
    assert_eq!(tokens.len(), 2);
    match &tokens[0] {
        Token::StartTag {
            name,
            self_closing,
            attributes,
        } => {
            assert_eq!(name, "div");
            assert!(!self_closing);
            assert!(attributes.is_empty());
        }
        _ => panic!("Expected StartTag token"),
    }
}

#[test]
fn tag_names_are_lowercased() {
    let tokens = tokenize("<DiV></SPAN>");
    assert_eq!(tokens[0].tag_name(), Some("div"));
    assert_eq!(tokens[1].tag_name(), Some("span"));
}

#[test]
fn end_tag() {
    let tokens = tokenize("</div>");
    assert!(matches!(&tokens[0], Token::EndTag { name, .. } if name == "div"));
}

#[test]
fn nested_tags_with_attributes() {
    let tokens = tokenize("<div id=\"x\" class='a b'><span/></div>");
    assert_eq!(tokens.len(), 4);

    match &tokens[0] {
        Token::StartTag {
            name,
            self_closing,
            attributes,
        } => {
            assert_eq!(name, "div");
            assert!(!self_closing);
            assert_eq!(attributes.len(), 2);
            assert_eq!(attributes[0].name, "id");
            assert_eq!(attributes[0].value, "x");
            assert_eq!(attributes[1].name, "class");
            assert_eq!(attributes[1].value, "a b");
        }
        other => panic!("Expected StartTag, got {other}"),
    }

    match &tokens[1] {
        Token::StartTag {
            name,
            self_closing,
            attributes,
        } => {
            assert_eq!(name, "span");
            assert!(self_closing);
            assert!(attributes.is_empty());
        }
        other => panic!("Expected self-closing StartTag, got {other}"),
    }

    assert!(matches!(&tokens[2], Token::EndTag { name, .. } if name == "div"));
    assert!(tokens[3].is_eof());
}

#[test]
fn attribute_variants() {
    for input in [
        r#"<div class="foo">"#,
        "<div class='foo'>",
        "<div class=foo>",
    ] {
        let tokens = tokenize(input);
        match &tokens[0] {
            Token::StartTag { attributes, .. } => {
                assert_eq!(attributes.len(), 1, "input {input:?}");
                assert_eq!(attributes[0].name, "class");
                assert_eq!(attributes[0].value, "foo");
            }
            _ => panic!("Expected StartTag token"),
        }
    }
}

#[test]
fn boolean_attribute_has_empty_value() {
    let tokens = tokenize("<input disabled>");
    match &tokens[0] {
        Token::StartTag { attributes, .. } => {
            assert_eq!(attributes.len(), 1);
            assert_eq!(attributes[0].name, "disabled");
            assert_eq!(attributes[0].value, "");
        }
        _ => panic!("Expected StartTag token"),
    }
}

#[test]
fn attribute_names_are_lowercased() {
    let tokens = tokenize("<div DATA-Foo=1>");
    match &tokens[0] {
        Token::StartTag { attributes, .. } => {
            assert_eq!(attributes[0].name, "data-foo");
        }
        _ => panic!("Expected StartTag token"),
    }
}

#[test]
fn duplicate_attributes_are_preserved_in_order() {
    // The tokenizer does not deduplicate; the tree builder applies the
    // WHATWG first-wins rule.
    let tokens = tokenize("<div a=1 a=2>");
    match &tokens[0] {
        Token::StartTag { attributes, .. } => {
            assert_eq!(attributes.len(), 2);
            assert_eq!(attributes[0].value, "1");
            assert_eq!(attributes[1].value, "2");
        }
        _ => panic!("Expected StartTag token"),
    }
}

#[test]
fn entity_in_attribute_value() {
    let tokens = tokenize("<a href=\"?a=1&amp;b=2\">");
    match &tokens[0] {
        Token::StartTag { attributes, .. } => {
            assert_eq!(attributes[0].value, "?a=1&b=2");
        }
        _ => panic!("Expected StartTag token"),
    }
}

#[test]
fn comment() {
    let tokens = tokenize("<!-- hello -->");
    assert!(matches!(&tokens[0], Token::Comment { data } if data == " hello "));
}

#[test]
fn comment_with_bang_keeps_bang_in_data() {
    let tokens = tokenize("<!-- a --! -->");
    assert!(matches!(&tokens[0], Token::Comment { data } if data == " a --! "));
}

#[test]
fn comment_with_embedded_dashes() {
    let tokens = tokenize("<!--a-b--c-->");
    assert!(matches!(&tokens[0], Token::Comment { data } if data == "a-b--c"));
}

#[test]
fn bogus_comment_from_question_mark() {
    let tokens = tokenize("<?xml version=\"1.0\"?>");
    assert!(matches!(&tokens[0], Token::Comment { data } if data.starts_with("?xml")));
}

#[test]
fn doctype() {
    let tokens = tokenize("<!DOCTYPE html>");
    match &tokens[0] {
        Token::Doctype { name, force_quirks } => {
            assert_eq!(name.as_deref(), Some("html"));
            assert!(!force_quirks);
        }
        _ => panic!("Expected DOCTYPE token"),
    }
}

#[test]
fn doctype_name_is_lowercased() {
    let tokens = tokenize("<!doctype HTML>");
    assert!(matches!(
        &tokens[0],
        Token::Doctype { name, .. } if name.as_deref() == Some("html")
    ));
}

#[test]
fn doctype_with_public_identifier_skips_tail() {
    let tokens =
        tokenize("<!DOCTYPE html PUBLIC \"-//W3C//DTD HTML 4.01//EN\">x");
    match &tokens[0] {
        Token::Doctype { name, force_quirks } => {
            assert_eq!(name.as_deref(), Some("html"));
            assert!(!force_quirks);
        }
        _ => panic!("Expected DOCTYPE token"),
    }
    assert!(matches!(tokens[1], Token::Character { data: 'x' }));
}

#[test]
fn doctype_eof_sets_force_quirks() {
    let tokens = tokenize("<!DOCTYPE htm");
    assert!(matches!(
        &tokens[0],
        Token::Doctype { force_quirks: true, .. }
    ));
}

#[test]
fn stray_less_than_emits_literal() {
    assert_eq!(character_data(&tokenize("1 < 2")), "1 < 2");
}

#[test]
fn rawtext_passes_markup_through_until_appropriate_end_tag() {
    let mut tokenizer = HtmlTokenizer::new("<script>alert('x');</script>after");
    // The consumer switches state after seeing the <script> start tag.
    let start = tokenizer.next_token();
    assert_eq!(start.tag_name(), Some("script"));
    tokenizer.set_state(TokenizerState::RAWTEXT);

    let mut data = String::new();
    loop {
        match tokenizer.next_token() {
            Token::Character { data: c } => data.push(c),
            Token::EndTag { name, .. } => {
                assert_eq!(name, "script");
                break;
            }
            other => panic!("unexpected token {other}"),
        }
    }
    assert_eq!(data, "alert('x');");

    // Back in the data state afterwards.
    let tail: String = std::iter::from_fn(|| match tokenizer.next_token() {
        Token::Character { data } => Some(data),
        _ => None,
    })
    .collect();
    assert_eq!(tail, "after");
}

#[test]
fn rawtext_non_matching_end_tag_is_text() {
    let mut tokenizer = HtmlTokenizer::new("<style>a</span>b</style>");
    let _ = tokenizer.next_token(); // <style>
    tokenizer.set_state(TokenizerState::RAWTEXT);

    let mut data = String::new();
    loop {
        match tokenizer.next_token() {
            Token::Character { data: c } => data.push(c),
            Token::EndTag { name, .. } => {
                assert_eq!(name, "style");
                break;
            }
            other => panic!("unexpected token {other}"),
        }
    }
    // The inner </span> is not the appropriate end tag, so it is content.
    assert_eq!(data, "a</span>b");
}

#[test]
fn rcdata_decodes_entities() {
    let mut tokenizer = HtmlTokenizer::new("<title>a &amp; b</title>");
    let _ = tokenizer.next_token(); // <title>
    tokenizer.set_state(TokenizerState::RCDATA);

    let mut data = String::new();
    loop {
        match tokenizer.next_token() {
            Token::Character { data: c } => data.push(c),
            Token::EndTag { name, .. } => {
                assert_eq!(name, "title");
                break;
            }
            other => panic!("unexpected token {other}"),
        }
    }
    assert_eq!(data, "a & b");
}

#[test]
fn script_data_does_not_decode_entities() {
    let mut tokenizer = HtmlTokenizer::new("<script>1 &amp; 2</script>");
    let _ = tokenizer.next_token();
    tokenizer.set_state(TokenizerState::ScriptData);

    let mut data = String::new();
    loop {
        match tokenizer.next_token() {
            Token::Character { data: c } => data.push(c),
            Token::EndTag { .. } => break,
            other => panic!("unexpected token {other}"),
        }
    }
    assert_eq!(data, "1 &amp; 2");
}

#[test]
fn plaintext_consumes_everything() {
    let mut tokenizer = HtmlTokenizer::new("a</plaintext>b");
    tokenizer.set_state(TokenizerState::PLAINTEXT);
    let mut data = String::new();
    loop {
        match tokenizer.next_token() {
            Token::Character { data: c } => data.push(c),
            Token::EndOfFile => break,
            other => panic!("unexpected token {other}"),
        }
    }
    assert_eq!(data, "a</plaintext>b");
}

#[test]
fn cdata_section_passes_body_through() {
    let tokens = tokenize("<![CDATA[x<y&z]]>w");
    assert_eq!(character_data(&tokens), "x<y&zw");
}

#[test]
fn unterminated_tag_at_eof_emits_eof() {
    let tokens = tokenize("<div class=");
    assert_eq!(tokens.len(), 1);
    assert!(tokens[0].is_eof());
}

#[test]
fn eof_after_less_than_emits_literal() {
    let tokens = tokenize("a<");
    assert_eq!(character_data(&tokens), "a<");
}

#[test]
fn iterator_stops_after_eof() {
    let tokenizer = HtmlTokenizer::new("<p>hi</p>");
    let tokens: Vec<Token> = tokenizer.collect();
    assert!(!tokens.iter().any(Token::is_eof));
    assert_eq!(tokens.len(), 4); // <p>, 'h', 'i', </p>
}
