//! The HTML tokenizer state machine.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! "Implementations must act as if they used the following state machine to
//! tokenize HTML."
//!
//! This is a pull tokenizer: each [`HtmlTokenizer::next_token`] call runs
//! the machine until exactly one token is ready. Multi-character emissions
//! (decoded character references, the `</` + partial-name flush when a
//! raw-text close fails) go through an internal pending buffer that is
//! drained one character per call before the machine resumes.

use std::collections::VecDeque;

use magpie_common::Scanner;

use super::entities::resolve_character_reference;
use super::state::TokenizerState;
use super::token::Token;

/// The HTML tokenizer.
///
/// Parse errors never halt the stream: malformed constructs fall into the
/// bogus-comment state, emit literal characters, or set the DOCTYPE quirks
/// flag, per the spec's recovery rules. Unexpected EOF terminates the
/// stream with [`Token::EndOfFile`] after flushing in-flight emissions.
pub struct HtmlTokenizer {
    scanner: Scanner,
    state: TokenizerState,
    current_token: Token,
    /// "The last start tag token emitted is used... in the RCDATA, RAWTEXT,
    /// and script data states" — for the appropriate-end-tag check.
    last_start_tag: Option<String>,
    /// "The temporary buffer" — accumulates a candidate end-tag name in the
    /// raw-text states so it can be flushed as characters on mismatch.
    temp_buffer: String,
    /// Characters waiting to be emitted one at a time.
    pending: VecDeque<char>,
}

impl HtmlTokenizer {
    /// Create a tokenizer over a UTF-8 input slice.
    ///
    /// "The initial state is the data state."
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self {
            scanner: Scanner::new(input),
            state: TokenizerState::Data,
            current_token: Token::EndOfFile,
            last_start_tag: None,
            temp_buffer: String::new(),
            pending: VecDeque::new(),
        }
    }

    /// Switch the machine into another state.
    ///
    /// The tree-construction stage calls this after emitting the start tags
    /// that change the content model (`script` → script data, `style` /
    /// `iframe` / `noframes` / `xmp` → RAWTEXT, `textarea` / `title` →
    /// RCDATA, `plaintext` → PLAINTEXT). The tokenizer itself does not know
    /// that policy.
    pub fn set_state(&mut self, state: TokenizerState) {
        self.state = state;
    }

    /// The current machine state.
    #[must_use]
    pub fn state(&self) -> TokenizerState {
        self.state
    }

    /// Take the current token out for emission, recording the last start
    /// tag name for the appropriate-end-tag rule.
    fn emit_current(&mut self) -> Token {
        let token = std::mem::replace(&mut self.current_token, Token::EndOfFile);
        if let Token::StartTag { name, .. } = &token {
            self.last_start_tag = Some(name.clone());
        }
        token
    }

    /// Emit a decoded string one character at a time: the first character
    /// becomes this call's token, the rest wait in the pending buffer.
    fn emit_text(&mut self, text: &str) -> Token {
        self.pending.extend(text.chars());
        match self.pending.pop_front() {
            Some(c) => Token::Character { data: c },
            // Entity resolution always yields at least "&".
            None => Token::EndOfFile,
        }
    }

    /// Queue the "</" + temporary-buffer flush after a failed raw-text end
    /// tag, then emit the leading `<`.
    fn flush_failed_end_tag(&mut self, return_state: TokenizerState) -> Token {
        self.state = return_state;
        self.pending.push_back('/');
        self.pending.extend(self.temp_buffer.chars());
        Token::Character { data: '<' }
    }

    /// [§ 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-end-tag-token)
    ///
    /// "An appropriate end tag token is an end tag token whose tag name
    /// matches the tag name of the last start tag to have been emitted."
    fn is_appropriate_end_tag(&self) -> bool {
        match (&self.current_token, &self.last_start_tag) {
            (Token::EndTag { name, .. }, Some(last)) => name == last,
            _ => false,
        }
    }

    /// True when the upcoming input matches `keyword` ASCII
    /// case-insensitively (without consuming).
    fn next_few_match_insensitive(&self, keyword: &str) -> bool {
        keyword.chars().enumerate().all(|(i, k)| {
            self.scanner
                .peek_at(i)
                .is_some_and(|c| c.eq_ignore_ascii_case(&k))
        })
    }

    /// Advance the scanner `n` code points.
    fn skip(&mut self, n: usize) {
        for _ in 0..n {
            let _ = self.scanner.consume();
        }
    }

    /// Produce the next token.
    ///
    /// Returns [`Token::EndOfFile`] at the end of input; calling again
    /// after that keeps returning it.
    pub fn next_token(&mut self) -> Token {
        // Drain pending multi-character emissions first.
        if let Some(c) = self.pending.pop_front() {
            return Token::Character { data: c };
        }

        loop {
            match self.state {
                TokenizerState::Data => {
                    let Some(c) = self.scanner.consume() else {
                        return Token::EndOfFile;
                    };
                    match c {
                        // "U+003C LESS-THAN SIGN (<) - Switch to the tag
                        // open state."
                        '<' => self.state = TokenizerState::TagOpen,
                        // "U+0026 AMPERSAND (&) - ... switch to the
                        // character reference state."
                        '&' => {
                            let text = resolve_character_reference(&mut self.scanner);
                            return self.emit_text(&text);
                        }
                        _ => return Token::Character { data: c },
                    }
                }

                TokenizerState::TagOpen => {
                    let Some(c) = self.scanner.consume() else {
                        // "Emit a U+003C LESS-THAN SIGN character token and
                        // an end-of-file token."
                        self.state = TokenizerState::Data;
                        return Token::Character { data: '<' };
                    };
                    match c {
                        '!' => self.state = TokenizerState::MarkupDeclarationOpen,
                        '/' => self.state = TokenizerState::EndTagOpen,
                        c if c.is_ascii_alphabetic() => {
                            // "Create a new start tag token... reconsume in
                            // the tag name state."
                            self.current_token = Token::new_start_tag();
                            self.scanner.reconsume();
                            self.state = TokenizerState::TagName;
                        }
                        '?' => {
                            // "This is an unexpected-question-mark-instead-
                            // of-tag-name parse error." Bogus comment.
                            self.current_token = Token::new_comment();
                            self.scanner.reconsume();
                            self.state = TokenizerState::BogusComment;
                        }
                        _ => {
                            // "This is an invalid-first-character-of-tag-
                            // name parse error... Emit a U+003C LESS-THAN
                            // SIGN character token."
                            self.state = TokenizerState::Data;
                            self.scanner.reconsume();
                            return Token::Character { data: '<' };
                        }
                    }
                }

                TokenizerState::EndTagOpen => {
                    let Some(c) = self.scanner.consume() else {
                        // "Emit a U+003C LESS-THAN SIGN character token, a
                        // U+002F SOLIDUS character token and an end-of-file
                        // token."
                        self.state = TokenizerState::Data;
                        self.pending.push_back('/');
                        return Token::Character { data: '<' };
                    };
                    match c {
                        c if c.is_ascii_alphabetic() => {
                            self.current_token = Token::new_end_tag();
                            self.scanner.reconsume();
                            self.state = TokenizerState::TagName;
                        }
                        '>' => {
                            // "This is a missing-end-tag-name parse error.
                            // Switch to the data state."
                            self.state = TokenizerState::Data;
                        }
                        _ => {
                            self.current_token = Token::new_comment();
                            self.scanner.reconsume();
                            self.state = TokenizerState::BogusComment;
                        }
                    }
                }

                TokenizerState::TagName => {
                    let Some(c) = self.scanner.consume() else {
                        self.state = TokenizerState::Data;
                        return Token::EndOfFile;
                    };
                    match c {
                        '\t' | '\n' | '\x0C' | ' ' => {
                            self.state = TokenizerState::BeforeAttributeName;
                        }
                        '/' => self.state = TokenizerState::SelfClosingStartTag,
                        '>' => {
                            self.state = TokenizerState::Data;
                            return self.emit_current();
                        }
                        // "Append the lowercase version of the current
                        // input character to the current tag token's tag
                        // name."
                        _ => self
                            .current_token
                            .append_to_tag_name(c.to_ascii_lowercase()),
                    }
                }

                TokenizerState::BeforeAttributeName => {
                    let Some(c) = self.scanner.consume() else {
                        self.state = TokenizerState::Data;
                        return Token::EndOfFile;
                    };
                    match c {
                        '\t' | '\n' | '\x0C' | ' ' => {}
                        '/' => self.state = TokenizerState::SelfClosingStartTag,
                        '>' => {
                            self.state = TokenizerState::Data;
                            return self.emit_current();
                        }
                        _ => {
                            // "Start a new attribute in the current tag
                            // token... reconsume in the attribute name
                            // state."
                            self.current_token.start_new_attribute();
                            self.scanner.reconsume();
                            self.state = TokenizerState::AttributeName;
                        }
                    }
                }

                TokenizerState::AttributeName => {
                    let Some(c) = self.scanner.consume() else {
                        self.state = TokenizerState::Data;
                        return Token::EndOfFile;
                    };
                    match c {
                        '\t' | '\n' | '\x0C' | ' ' => {
                            self.state = TokenizerState::AfterAttributeName;
                        }
                        '/' => self.state = TokenizerState::SelfClosingStartTag,
                        '=' => self.state = TokenizerState::BeforeAttributeValue,
                        '>' => {
                            self.state = TokenizerState::Data;
                            return self.emit_current();
                        }
                        // "Append the lowercase version of the current
                        // input character to the current attribute's name."
                        _ => self
                            .current_token
                            .append_to_attribute_name(c.to_ascii_lowercase()),
                    }
                }

                TokenizerState::AfterAttributeName => {
                    let Some(c) = self.scanner.consume() else {
                        self.state = TokenizerState::Data;
                        return Token::EndOfFile;
                    };
                    match c {
                        '\t' | '\n' | '\x0C' | ' ' => {}
                        '/' => self.state = TokenizerState::SelfClosingStartTag,
                        '=' => self.state = TokenizerState::BeforeAttributeValue,
                        '>' => {
                            self.state = TokenizerState::Data;
                            return self.emit_current();
                        }
                        _ => {
                            self.current_token.start_new_attribute();
                            self.scanner.reconsume();
                            self.state = TokenizerState::AttributeName;
                        }
                    }
                }

                TokenizerState::BeforeAttributeValue => {
                    let Some(c) = self.scanner.consume() else {
                        self.state = TokenizerState::Data;
                        return Token::EndOfFile;
                    };
                    match c {
                        '\t' | '\n' | '\x0C' | ' ' => {}
                        '"' => self.state = TokenizerState::AttributeValueDoubleQuoted,
                        '\'' => self.state = TokenizerState::AttributeValueSingleQuoted,
                        '>' => {
                            // "This is a missing-attribute-value parse
                            // error. Emit the current tag token."
                            self.state = TokenizerState::Data;
                            return self.emit_current();
                        }
                        _ => {
                            self.scanner.reconsume();
                            self.state = TokenizerState::AttributeValueUnquoted;
                        }
                    }
                }

                TokenizerState::AttributeValueDoubleQuoted => {
                    let Some(c) = self.scanner.consume() else {
                        self.state = TokenizerState::Data;
                        return Token::EndOfFile;
                    };
                    match c {
                        '"' => self.state = TokenizerState::AfterAttributeValueQuoted,
                        '&' => {
                            let text = resolve_character_reference(&mut self.scanner);
                            self.current_token.append_str_to_attribute_value(&text);
                        }
                        _ => self.current_token.append_to_attribute_value(c),
                    }
                }

                TokenizerState::AttributeValueSingleQuoted => {
                    let Some(c) = self.scanner.consume() else {
                        self.state = TokenizerState::Data;
                        return Token::EndOfFile;
                    };
                    match c {
                        '\'' => self.state = TokenizerState::AfterAttributeValueQuoted,
                        '&' => {
                            let text = resolve_character_reference(&mut self.scanner);
                            self.current_token.append_str_to_attribute_value(&text);
                        }
                        _ => self.current_token.append_to_attribute_value(c),
                    }
                }

                TokenizerState::AttributeValueUnquoted => {
                    let Some(c) = self.scanner.consume() else {
                        self.state = TokenizerState::Data;
                        return Token::EndOfFile;
                    };
                    match c {
                        '\t' | '\n' | '\x0C' | ' ' => {
                            self.state = TokenizerState::BeforeAttributeName;
                        }
                        '&' => {
                            let text = resolve_character_reference(&mut self.scanner);
                            self.current_token.append_str_to_attribute_value(&text);
                        }
                        '>' => {
                            self.state = TokenizerState::Data;
                            return self.emit_current();
                        }
                        _ => self.current_token.append_to_attribute_value(c),
                    }
                }

                TokenizerState::AfterAttributeValueQuoted => {
                    let Some(c) = self.scanner.consume() else {
                        self.state = TokenizerState::Data;
                        return Token::EndOfFile;
                    };
                    match c {
                        '\t' | '\n' | '\x0C' | ' ' => {
                            self.state = TokenizerState::BeforeAttributeName;
                        }
                        '/' => self.state = TokenizerState::SelfClosingStartTag,
                        '>' => {
                            self.state = TokenizerState::Data;
                            return self.emit_current();
                        }
                        _ => {
                            // "This is a missing-whitespace-between-
                            // attributes parse error."
                            self.scanner.reconsume();
                            self.state = TokenizerState::BeforeAttributeName;
                        }
                    }
                }

                TokenizerState::SelfClosingStartTag => {
                    let Some(c) = self.scanner.consume() else {
                        self.state = TokenizerState::Data;
                        return Token::EndOfFile;
                    };
                    if c == '>' {
                        // "Set the self-closing flag of the current tag
                        // token. Emit the current tag token."
                        self.current_token.set_self_closing();
                        self.state = TokenizerState::Data;
                        return self.emit_current();
                    }
                    // "This is an unexpected-solidus-in-tag parse error."
                    self.scanner.reconsume();
                    self.state = TokenizerState::BeforeAttributeName;
                }

                TokenizerState::BogusComment => {
                    let Some(c) = self.scanner.consume() else {
                        self.state = TokenizerState::Data;
                        return self.emit_current();
                    };
                    if c == '>' {
                        self.state = TokenizerState::Data;
                        return self.emit_current();
                    }
                    self.current_token.append_to_comment(c);
                }

                TokenizerState::MarkupDeclarationOpen => {
                    // "If the next two characters are both U+002D HYPHEN-
                    // MINUS characters (-), consume those two characters,
                    // create a comment token..."
                    if self.scanner.peek() == Some('-') && self.scanner.peek_at(1) == Some('-') {
                        self.skip(2);
                        self.current_token = Token::new_comment();
                        self.state = TokenizerState::CommentStart;
                    } else if self.next_few_match_insensitive("doctype") {
                        self.skip(7);
                        self.state = TokenizerState::DOCTYPE;
                    } else if self.scanner.peek() == Some('[')
                        && self.scanner.peek_at(1) == Some('C')
                        && self.scanner.peek_at(2) == Some('D')
                        && self.scanner.peek_at(3) == Some('A')
                        && self.scanner.peek_at(4) == Some('T')
                        && self.scanner.peek_at(5) == Some('A')
                        && self.scanner.peek_at(6) == Some('[')
                    {
                        // "[CDATA[" is matched case-sensitively.
                        self.skip(7);
                        self.state = TokenizerState::CDATASection;
                    } else {
                        // "This is an incorrectly-opened-comment parse
                        // error... bogus comment state."
                        self.current_token = Token::new_comment();
                        self.state = TokenizerState::BogusComment;
                    }
                }

                TokenizerState::CommentStart => {
                    let Some(c) = self.scanner.consume() else {
                        self.state = TokenizerState::Data;
                        return self.emit_current();
                    };
                    match c {
                        '-' => self.state = TokenizerState::CommentStartDash,
                        '>' => {
                            // "This is an abrupt-closing-of-empty-comment
                            // parse error. Emit the current comment token."
                            self.state = TokenizerState::Data;
                            return self.emit_current();
                        }
                        _ => {
                            self.scanner.reconsume();
                            self.state = TokenizerState::Comment;
                        }
                    }
                }

                TokenizerState::CommentStartDash => {
                    let Some(c) = self.scanner.consume() else {
                        self.state = TokenizerState::Data;
                        return self.emit_current();
                    };
                    match c {
                        '-' => self.state = TokenizerState::CommentEnd,
                        '>' => {
                            self.state = TokenizerState::Data;
                            return self.emit_current();
                        }
                        _ => {
                            // "Append a U+002D HYPHEN-MINUS character (-)
                            // to the comment token's data."
                            self.current_token.append_to_comment('-');
                            self.scanner.reconsume();
                            self.state = TokenizerState::Comment;
                        }
                    }
                }

                TokenizerState::Comment => {
                    let Some(c) = self.scanner.consume() else {
                        self.state = TokenizerState::Data;
                        return self.emit_current();
                    };
                    match c {
                        '-' => self.state = TokenizerState::CommentEndDash,
                        _ => self.current_token.append_to_comment(c),
                    }
                }

                TokenizerState::CommentEndDash => {
                    let Some(c) = self.scanner.consume() else {
                        self.state = TokenizerState::Data;
                        return self.emit_current();
                    };
                    match c {
                        '-' => self.state = TokenizerState::CommentEnd,
                        _ => {
                            self.current_token.append_to_comment('-');
                            self.scanner.reconsume();
                            self.state = TokenizerState::Comment;
                        }
                    }
                }

                TokenizerState::CommentEnd => {
                    let Some(c) = self.scanner.consume() else {
                        self.state = TokenizerState::Data;
                        return self.emit_current();
                    };
                    match c {
                        '>' => {
                            self.state = TokenizerState::Data;
                            return self.emit_current();
                        }
                        '!' => self.state = TokenizerState::CommentEndBang,
                        // "Append a U+002D HYPHEN-MINUS character (-) to
                        // the comment token's data."
                        '-' => self.current_token.append_to_comment('-'),
                        _ => {
                            self.current_token.append_str_to_comment("--");
                            self.scanner.reconsume();
                            self.state = TokenizerState::Comment;
                        }
                    }
                }

                TokenizerState::CommentEndBang => {
                    let Some(c) = self.scanner.consume() else {
                        self.state = TokenizerState::Data;
                        return self.emit_current();
                    };
                    match c {
                        '-' => {
                            // "Append two U+002D HYPHEN-MINUS characters
                            // and a U+0021 EXCLAMATION MARK character to
                            // the comment token's data."
                            self.current_token.append_str_to_comment("--!");
                            self.state = TokenizerState::CommentEndDash;
                        }
                        '>' => {
                            // "This is an incorrectly-closed-comment parse
                            // error. Emit the current comment token."
                            self.state = TokenizerState::Data;
                            return self.emit_current();
                        }
                        _ => {
                            self.current_token.append_str_to_comment("--!");
                            self.scanner.reconsume();
                            self.state = TokenizerState::Comment;
                        }
                    }
                }

                TokenizerState::DOCTYPE => {
                    let Some(c) = self.scanner.consume() else {
                        self.current_token = Token::new_doctype();
                        self.current_token.set_force_quirks();
                        self.state = TokenizerState::Data;
                        return self.emit_current();
                    };
                    match c {
                        '\t' | '\n' | '\x0C' | ' ' => {
                            self.state = TokenizerState::BeforeDOCTYPEName;
                        }
                        '>' => {
                            // "This is a missing-doctype-name parse error.
                            // Set the force-quirks flag to on."
                            self.current_token = Token::new_doctype();
                            self.current_token.set_force_quirks();
                            self.state = TokenizerState::Data;
                            return self.emit_current();
                        }
                        _ => {
                            self.scanner.reconsume();
                            self.state = TokenizerState::BeforeDOCTYPEName;
                        }
                    }
                }

                TokenizerState::BeforeDOCTYPEName => {
                    let Some(c) = self.scanner.consume() else {
                        self.current_token = Token::new_doctype();
                        self.current_token.set_force_quirks();
                        self.state = TokenizerState::Data;
                        return self.emit_current();
                    };
                    match c {
                        '\t' | '\n' | '\x0C' | ' ' => {}
                        '>' => {
                            self.current_token = Token::new_doctype();
                            self.current_token.set_force_quirks();
                            self.state = TokenizerState::Data;
                            return self.emit_current();
                        }
                        _ => {
                            // "Create a new DOCTYPE token. Set the token's
                            // name to the lowercase version of the current
                            // input character."
                            self.current_token = Token::new_doctype();
                            self.current_token
                                .append_to_doctype_name(c.to_ascii_lowercase());
                            self.state = TokenizerState::DOCTYPEName;
                        }
                    }
                }

                TokenizerState::DOCTYPEName => {
                    let Some(c) = self.scanner.consume() else {
                        self.current_token.set_force_quirks();
                        self.state = TokenizerState::Data;
                        return self.emit_current();
                    };
                    match c {
                        '\t' | '\n' | '\x0C' | ' ' => {
                            self.state = TokenizerState::AfterDOCTYPEName;
                        }
                        '>' => {
                            self.state = TokenizerState::Data;
                            return self.emit_current();
                        }
                        _ => self
                            .current_token
                            .append_to_doctype_name(c.to_ascii_lowercase()),
                    }
                }

                TokenizerState::AfterDOCTYPEName => {
                    let Some(c) = self.scanner.consume() else {
                        self.current_token.set_force_quirks();
                        self.state = TokenizerState::Data;
                        return self.emit_current();
                    };
                    match c {
                        '\t' | '\n' | '\x0C' | ' ' => {}
                        '>' => {
                            self.state = TokenizerState::Data;
                            return self.emit_current();
                        }
                        _ => {
                            // Best-effort: the PUBLIC/SYSTEM identifier
                            // tail is skipped to the closing '>'.
                            loop {
                                match self.scanner.consume() {
                                    Some('>') => {
                                        self.state = TokenizerState::Data;
                                        return self.emit_current();
                                    }
                                    Some(_) => {}
                                    None => {
                                        self.current_token.set_force_quirks();
                                        self.state = TokenizerState::Data;
                                        return self.emit_current();
                                    }
                                }
                            }
                        }
                    }
                }

                TokenizerState::RAWTEXT => {
                    let Some(c) = self.scanner.consume() else {
                        return Token::EndOfFile;
                    };
                    match c {
                        '<' => self.state = TokenizerState::RAWTEXTLessThanSign,
                        _ => return Token::Character { data: c },
                    }
                }

                TokenizerState::RAWTEXTLessThanSign => {
                    let Some(c) = self.scanner.consume() else {
                        self.state = TokenizerState::RAWTEXT;
                        return Token::Character { data: '<' };
                    };
                    if c == '/' {
                        self.temp_buffer.clear();
                        self.state = TokenizerState::RAWTEXTEndTagOpen;
                    } else {
                        self.state = TokenizerState::RAWTEXT;
                        self.scanner.reconsume();
                        return Token::Character { data: '<' };
                    }
                }

                TokenizerState::RAWTEXTEndTagOpen => {
                    let Some(c) = self.scanner.consume() else {
                        return self.flush_failed_end_tag(TokenizerState::RAWTEXT);
                    };
                    if c.is_ascii_alphabetic() {
                        self.current_token = Token::new_end_tag();
                        self.scanner.reconsume();
                        self.state = TokenizerState::RAWTEXTEndTagName;
                    } else {
                        self.scanner.reconsume();
                        return self.flush_failed_end_tag(TokenizerState::RAWTEXT);
                    }
                }

                TokenizerState::RAWTEXTEndTagName => {
                    if let Some(token) = self.raw_end_tag_name_step(TokenizerState::RAWTEXT) {
                        return token;
                    }
                }

                TokenizerState::RCDATA => {
                    let Some(c) = self.scanner.consume() else {
                        return Token::EndOfFile;
                    };
                    match c {
                        '<' => self.state = TokenizerState::RCDATALessThanSign,
                        // RCDATA resolves character references; RAWTEXT and
                        // script data do not.
                        '&' => {
                            let text = resolve_character_reference(&mut self.scanner);
                            return self.emit_text(&text);
                        }
                        _ => return Token::Character { data: c },
                    }
                }

                TokenizerState::RCDATALessThanSign => {
                    let Some(c) = self.scanner.consume() else {
                        self.state = TokenizerState::RCDATA;
                        return Token::Character { data: '<' };
                    };
                    if c == '/' {
                        self.temp_buffer.clear();
                        self.state = TokenizerState::RCDATAEndTagOpen;
                    } else {
                        self.state = TokenizerState::RCDATA;
                        self.scanner.reconsume();
                        return Token::Character { data: '<' };
                    }
                }

                TokenizerState::RCDATAEndTagOpen => {
                    let Some(c) = self.scanner.consume() else {
                        return self.flush_failed_end_tag(TokenizerState::RCDATA);
                    };
                    if c.is_ascii_alphabetic() {
                        self.current_token = Token::new_end_tag();
                        self.scanner.reconsume();
                        self.state = TokenizerState::RCDATAEndTagName;
                    } else {
                        self.scanner.reconsume();
                        return self.flush_failed_end_tag(TokenizerState::RCDATA);
                    }
                }

                TokenizerState::RCDATAEndTagName => {
                    if let Some(token) = self.raw_end_tag_name_step(TokenizerState::RCDATA) {
                        return token;
                    }
                }

                TokenizerState::ScriptData => {
                    let Some(c) = self.scanner.consume() else {
                        return Token::EndOfFile;
                    };
                    match c {
                        '<' => self.state = TokenizerState::ScriptDataLessThanSign,
                        _ => return Token::Character { data: c },
                    }
                }

                TokenizerState::ScriptDataLessThanSign => {
                    let Some(c) = self.scanner.consume() else {
                        self.state = TokenizerState::ScriptData;
                        return Token::Character { data: '<' };
                    };
                    if c == '/' {
                        self.temp_buffer.clear();
                        self.state = TokenizerState::ScriptDataEndTagOpen;
                    } else {
                        self.state = TokenizerState::ScriptData;
                        self.scanner.reconsume();
                        return Token::Character { data: '<' };
                    }
                }

                TokenizerState::ScriptDataEndTagOpen => {
                    let Some(c) = self.scanner.consume() else {
                        return self.flush_failed_end_tag(TokenizerState::ScriptData);
                    };
                    if c.is_ascii_alphabetic() {
                        self.current_token = Token::new_end_tag();
                        self.scanner.reconsume();
                        self.state = TokenizerState::ScriptDataEndTagName;
                    } else {
                        self.scanner.reconsume();
                        return self.flush_failed_end_tag(TokenizerState::ScriptData);
                    }
                }

                TokenizerState::ScriptDataEndTagName => {
                    if let Some(token) = self.raw_end_tag_name_step(TokenizerState::ScriptData) {
                        return token;
                    }
                }

                TokenizerState::PLAINTEXT => {
                    // "Emit the current input character as a character
                    // token." There is no way out of PLAINTEXT.
                    let Some(c) = self.scanner.consume() else {
                        return Token::EndOfFile;
                    };
                    return Token::Character { data: c };
                }

                TokenizerState::CDATASection => {
                    if self.scanner.at_end() {
                        return Token::EndOfFile;
                    }
                    if self.scanner.peek() == Some(']')
                        && self.scanner.peek_at(1) == Some(']')
                        && self.scanner.peek_at(2) == Some('>')
                    {
                        self.skip(3);
                        self.state = TokenizerState::Data;
                        continue;
                    }
                    let Some(c) = self.scanner.consume() else {
                        return Token::EndOfFile;
                    };
                    return Token::Character { data: c };
                }
            }
        }
    }

    /// One step of the shared RCDATA/RAWTEXT/script-data end tag name
    /// state. Returns a token to emit, or `None` to keep looping.
    ///
    /// "If the current end tag token is an appropriate end tag token"
    /// whitespace/`/`/`>` close out the tag; otherwise the accumulated
    /// `</` + buffer is flushed as character tokens.
    fn raw_end_tag_name_step(&mut self, return_state: TokenizerState) -> Option<Token> {
        let Some(c) = self.scanner.consume() else {
            return Some(self.flush_failed_end_tag(return_state));
        };
        match c {
            '\t' | '\n' | '\x0C' | ' ' if self.is_appropriate_end_tag() => {
                self.state = TokenizerState::BeforeAttributeName;
                None
            }
            '/' if self.is_appropriate_end_tag() => {
                self.state = TokenizerState::SelfClosingStartTag;
                None
            }
            '>' if self.is_appropriate_end_tag() => {
                self.state = TokenizerState::Data;
                Some(self.emit_current())
            }
            c if c.is_ascii_alphabetic() => {
                self.current_token.append_to_tag_name(c.to_ascii_lowercase());
                self.temp_buffer.push(c);
                None
            }
            _ => {
                self.scanner.reconsume();
                Some(self.flush_failed_end_tag(return_state))
            }
        }
    }
}

impl Iterator for HtmlTokenizer {
    type Item = Token;

    /// Yields tokens up to and including [`Token::EndOfFile`], then `None`.
    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            Token::EndOfFile => None,
            token => Some(token),
        }
    }
}
