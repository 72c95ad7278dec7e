//! CSS token types per [CSS Syntax Level 3 § 4](https://www.w3.org/TR/css-syntax-3/#tokenization).
//!
//! "The output of the tokenization step is a stream of zero or more of the
//! following tokens: <ident-token>, <function-token>, <at-keyword-token>,
//! <hash-token>, <string-token>, <bad-string-token>, <url-token>,
//! <bad-url-token>, <delim-token>, <number-token>, <percentage-token>,
//! <dimension-token>, <whitespace-token>, <CDO-token>, <CDC-token>,
//! <colon-token>, <semicolon-token>, <comma-token>, <[-token>, <]-token>,
//! <(-token>, <)-token>, <{-token>, and <}-token>."

use core::fmt;

/// [§ 4.2 Definitions](https://www.w3.org/TR/css-syntax-3/#token-diagrams)
///
/// "A <hash-token> with the type flag set to 'id'... or 'unrestricted'."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashType {
    /// "id" - the hash token's value is a valid identifier
    Id,
    /// "unrestricted" - the hash token's value is not a valid identifier
    Unrestricted,
}

/// [§ 4.2 Definitions](https://www.w3.org/TR/css-syntax-3/#token-diagrams)
///
/// "A <number-token> has a type flag set to either 'integer' or 'number'."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericType {
    /// "integer" - the number is an integer
    Integer,
    /// "number" - the number has a decimal point or exponent
    Number,
}

/// [§ 4.2 Definitions](https://www.w3.org/TR/css-syntax-3/#token-diagrams)
///
/// CSS tokens as defined by the CSS Syntax Module Level 3 specification.
///
/// A `Hash` token's value has the leading `#` stripped; reconstructing
/// selector text must re-prefix it. A `Function` token's value is the name
/// without the opening `(`.
#[derive(Debug, Clone, PartialEq)]
pub enum CssToken {
    /// "<ident-token>" — "has a value composed of one or more code points"
    Ident(String),

    /// "<function-token>" — the name, "followed by U+0028 LEFT PARENTHESIS"
    Function(String),

    /// "<at-keyword-token>" — the value, "preceded by U+0040 COMMERCIAL AT"
    AtKeyword(String),

    /// "<hash-token>" — the value, "preceded by U+0023 NUMBER SIGN (#)",
    /// with "a type flag set to either 'id' or 'unrestricted'"
    Hash {
        /// "a value composed of one or more code points"
        value: String,
        /// "a type flag set to either 'id' or 'unrestricted'"
        hash_type: HashType,
    },

    /// "<string-token>" — "has a value composed of zero or more code points"
    String(String),

    /// "<bad-string-token>" — "represents a parsing error"
    BadString,

    /// "<url-token>" — "has a value composed of zero or more code points"
    Url(String),

    /// "<bad-url-token>" — "represents a parsing error"
    BadUrl,

    /// "<unicode-range-token>" — `U+XXXX` or `U+XXXX-XXXX`, kept as raw
    /// text so `@font-face { unicode-range: … }` round-trips.
    UnicodeRange(String),

    /// "<delim-token>" — "has a value composed of a single code point"
    Delim(char),

    /// "<number-token>"
    Number {
        /// "a numeric value"
        value: f64,
        /// The integer value if this is an integer type.
        int_value: Option<i64>,
        /// "a type flag set to either 'integer' or 'number'"
        numeric_type: NumericType,
    },

    /// "<percentage-token>"
    Percentage {
        /// "a numeric value"
        value: f64,
        /// The integer value if this is an integer type.
        int_value: Option<i64>,
        /// "a type flag set to either 'integer' or 'number'"
        numeric_type: NumericType,
    },

    /// "<dimension-token>" — "has a numeric value, a type flag, and a unit"
    Dimension {
        /// "a numeric value"
        value: f64,
        /// The integer value if this is an integer type.
        int_value: Option<i64>,
        /// "a type flag set to either 'integer' or 'number'"
        numeric_type: NumericType,
        /// "a unit"
        unit: String,
    },

    /// "<whitespace-token>" — "represents one or more whitespace code points"
    Whitespace,

    /// "<CDO-token>" — "represents... (<!--)"
    CDO,

    /// "<CDC-token>" — "represents... (-->)"
    CDC,

    /// "<colon-token>"
    Colon,

    /// "<semicolon-token>"
    Semicolon,

    /// "<comma-token>"
    Comma,

    /// "<[-token>"
    LeftBracket,

    /// "<]-token>"
    RightBracket,

    /// "<(-token>"
    LeftParen,

    /// "<)-token>"
    RightParen,

    /// "<{-token>"
    LeftBrace,

    /// "<}-token>"
    RightBrace,

    /// End of file - signals end of input
    EOF,
}

impl CssToken {
    /// Returns true if this is an EOF token.
    #[must_use]
    pub fn is_eof(&self) -> bool {
        matches!(self, Self::EOF)
    }

    /// Returns true if this is a whitespace token.
    #[must_use]
    pub fn is_whitespace(&self) -> bool {
        matches!(self, Self::Whitespace)
    }

    /// The token's textual content for selector/prelude reconstruction.
    ///
    /// Re-prefixes `#` on hash tokens and re-appends `(` on function
    /// tokens (the tokenizer stripped both); numbers use their shortest
    /// display form. Whitespace renders as a single space.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::Ident(v) | Self::Url(v) | Self::UnicodeRange(v) => v.clone(),
            Self::Function(v) => format!("{v}("),
            Self::AtKeyword(v) => format!("@{v}"),
            Self::Hash { value, .. } => format!("#{value}"),
            Self::String(v) => format!("\"{v}\""),
            Self::Delim(c) => c.to_string(),
            Self::Number { value, .. } => format_number(*value),
            Self::Percentage { value, .. } => format!("{}%", format_number(*value)),
            Self::Dimension { value, unit, .. } => {
                format!("{}{unit}", format_number(*value))
            }
            Self::Whitespace => " ".to_string(),
            Self::CDO => "<!--".to_string(),
            Self::CDC => "-->".to_string(),
            Self::Colon => ":".to_string(),
            Self::Semicolon => ";".to_string(),
            Self::Comma => ",".to_string(),
            Self::LeftBracket => "[".to_string(),
            Self::RightBracket => "]".to_string(),
            Self::LeftParen => "(".to_string(),
            Self::RightParen => ")".to_string(),
            Self::LeftBrace => "{".to_string(),
            Self::RightBrace => "}".to_string(),
            Self::BadString | Self::BadUrl | Self::EOF => String::new(),
        }
    }
}

/// Render a numeric value without a trailing `.0` for integers.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

impl fmt::Display for CssToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident(v) => write!(f, "<ident:{v}>"),
            Self::Function(v) => write!(f, "<function:{v}(>"),
            Self::AtKeyword(v) => write!(f, "<at-keyword:@{v}>"),
            Self::Hash { value, hash_type } => {
                let t = match hash_type {
                    HashType::Id => "id",
                    HashType::Unrestricted => "unrestricted",
                };
                write!(f, "<hash:#{value} ({t})>")
            }
            Self::String(v) => write!(f, "<string:\"{v}\">"),
            Self::BadString => write!(f, "<bad-string>"),
            Self::Url(v) => write!(f, "<url:{v}>"),
            Self::BadUrl => write!(f, "<bad-url>"),
            Self::UnicodeRange(v) => write!(f, "<unicode-range:{v}>"),
            Self::Delim(c) => write!(f, "<delim:{c}>"),
            Self::Number { value, .. } => write!(f, "<number:{value}>"),
            Self::Percentage { value, .. } => write!(f, "<percentage:{value}%>"),
            Self::Dimension { value, unit, .. } => write!(f, "<dimension:{value}{unit}>"),
            Self::Whitespace => write!(f, "<whitespace>"),
            Self::CDO => write!(f, "<CDO>"),
            Self::CDC => write!(f, "<CDC>"),
            Self::Colon => write!(f, "<colon>"),
            Self::Semicolon => write!(f, "<semicolon>"),
            Self::Comma => write!(f, "<comma>"),
            Self::LeftBracket => write!(f, "<[>"),
            Self::RightBracket => write!(f, "<]>"),
            Self::LeftParen => write!(f, "<(>"),
            Self::RightParen => write!(f, "<)>"),
            Self::LeftBrace => write!(f, "<{{>"),
            Self::RightBrace => write!(f, "<}}>"),
            Self::EOF => write!(f, "<EOF>"),
        }
    }
}
