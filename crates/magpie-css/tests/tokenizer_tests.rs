//! Integration tests for the CSS tokenizer.

use magpie_css::tokenizer::{CssToken, CssTokenizer, HashType};

fn tokenize(input: &str) -> Vec<CssToken> {
    let mut tokens = CssTokenizer::tokenize_all(input);
    // Drop the trailing EOF for terser assertions.
    assert!(tokens.pop().is_some_and(|t| t.is_eof()));
    tokens
}

/// Tokens with whitespace removed.
fn significant(input: &str) -> Vec<CssToken> {
    tokenize(input)
        .into_iter()
        .filter(|t| !t.is_whitespace())
        .collect()
}

#[test]
fn idents_and_delims() {
    let tokens = significant("color: red;");
    assert_eq!(
        tokens,
        vec![
            CssToken::Ident("color".to_string()),
            CssToken::Colon,
            CssToken::Ident("red".to_string()),
            CssToken::Semicolon,
        ]
    );
}

#[test]
fn hash_token_strips_prefix_and_flags_id() {
    let tokens = significant("#main");
    match &tokens[0] {
        CssToken::Hash { value, hash_type } => {
            assert_eq!(value, "main");
            assert_eq!(*hash_type, HashType::Id);
        }
        other => panic!("expected hash, got {other}"),
    }
}

#[test]
fn hex_color_hash_is_unrestricted() {
    // "0f0" starts with a digit, so it is not a valid identifier.
    let tokens = significant("#0f0");
    assert!(matches!(
        &tokens[0],
        CssToken::Hash {
            hash_type: HashType::Unrestricted,
            ..
        }
    ));
}

#[test]
fn numbers_percentages_dimensions() {
    let tokens = significant("10px 1.5em 50% 42 -3.2");
    assert!(matches!(&tokens[0], CssToken::Dimension { value, unit, .. }
        if *value == 10.0 && unit == "px"));
    assert!(matches!(&tokens[1], CssToken::Dimension { value, unit, .. }
        if *value == 1.5 && unit == "em"));
    assert!(matches!(&tokens[2], CssToken::Percentage { value, .. } if *value == 50.0));
    assert!(matches!(&tokens[3], CssToken::Number { value, int_value, .. }
        if *value == 42.0 && *int_value == Some(42)));
    assert!(matches!(&tokens[4], CssToken::Number { value, int_value, .. }
        if *value == -3.2 && int_value.is_none()));
}

#[test]
fn scientific_notation() {
    let tokens = significant("1e3 2.5E-2");
    assert!(matches!(&tokens[0], CssToken::Number { value, .. } if *value == 1000.0));
    assert!(matches!(&tokens[1], CssToken::Number { value, .. } if *value == 0.025));
}

#[test]
fn function_token_carries_name_without_paren() {
    let tokens = significant("calc(1px + 2px)");
    assert_eq!(tokens[0], CssToken::Function("calc".to_string()));
    assert!(tokens.contains(&CssToken::RightParen));
}

#[test]
fn url_forms() {
    // Bare url() is a url token; quoted url() is a function + string.
    let bare = significant("url(image.png)");
    assert_eq!(bare[0], CssToken::Url("image.png".to_string()));

    let quoted = significant("url(\"image.png\")");
    assert_eq!(quoted[0], CssToken::Function("url".to_string()));
    assert_eq!(quoted[1], CssToken::String("image.png".to_string()));
}

#[test]
fn at_keyword() {
    let tokens = significant("@media screen");
    assert_eq!(tokens[0], CssToken::AtKeyword("media".to_string()));
}

#[test]
fn strings_and_bad_strings() {
    let tokens = significant("\"hello\" 'world'");
    assert_eq!(tokens[0], CssToken::String("hello".to_string()));
    assert_eq!(tokens[1], CssToken::String("world".to_string()));

    // A newline inside a string is a parse error.
    let tokens = CssTokenizer::tokenize_all("\"broken\nrest");
    assert!(tokens.contains(&CssToken::BadString));
}

#[test]
fn comments_are_stripped() {
    let tokens = significant("/* note */ a /* another */ b");
    assert_eq!(
        tokens,
        vec![
            CssToken::Ident("a".to_string()),
            CssToken::Ident("b".to_string()),
        ]
    );
}

#[test]
fn cdo_cdc() {
    let tokens = significant("<!-- body {} -->");
    assert_eq!(tokens[0], CssToken::CDO);
    assert_eq!(*tokens.last().unwrap(), CssToken::CDC);
}

#[test]
fn custom_property_ident() {
    let tokens = significant("--main-color: red");
    assert_eq!(tokens[0], CssToken::Ident("--main-color".to_string()));
}

#[test]
fn escapes_decode() {
    let tokens = significant("\\41 b");
    // \41 is 'A'; the following space terminates the escape.
    assert_eq!(tokens[0], CssToken::Ident("Ab".to_string()));
}

#[test]
fn selector_punctuation() {
    let tokens = significant("div > .item[attr]");
    assert_eq!(tokens[0], CssToken::Ident("div".to_string()));
    assert_eq!(tokens[1], CssToken::Delim('>'));
    assert_eq!(tokens[2], CssToken::Delim('.'));
    assert_eq!(tokens[3], CssToken::Ident("item".to_string()));
    assert_eq!(tokens[4], CssToken::LeftBracket);
    assert_eq!(tokens[5], CssToken::Ident("attr".to_string()));
    assert_eq!(tokens[6], CssToken::RightBracket);
}
