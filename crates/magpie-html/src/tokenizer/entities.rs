//! Character reference resolution.
//!
//! [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
//!
//! The full WHATWG table defines 2,231 named references; this module
//! carries the subset that occurs in real documents (XML core, Latin-1,
//! Latin extended, Greek, punctuation, currency, math, arrows, and common
//! symbol aliases). The table is built once per process behind a
//! [`LazyLock`].

use std::collections::HashMap;
use std::sync::LazyLock;

use magpie_common::Scanner;

/// U+FFFD REPLACEMENT CHARACTER, emitted for out-of-range numeric
/// references.
const REPLACEMENT: &str = "\u{FFFD}";

/// The named character reference table. Keys carry no leading `&` and no
/// trailing `;`.
static NAMED_ENTITIES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        // === Core XML entities ===
        ("amp", "&"),
        ("lt", "<"),
        ("gt", ">"),
        ("quot", "\""),
        ("apos", "'"),
        // === Latin-1 Supplement (U+00A0-U+00BF) ===
        ("nbsp", "\u{00A0}"),
        ("iexcl", "\u{00A1}"),
        ("cent", "\u{00A2}"),
        ("pound", "\u{00A3}"),
        ("curren", "\u{00A4}"),
        ("yen", "\u{00A5}"),
        ("brvbar", "\u{00A6}"),
        ("sect", "\u{00A7}"),
        ("uml", "\u{00A8}"),
        ("copy", "\u{00A9}"),
        ("ordf", "\u{00AA}"),
        ("laquo", "\u{00AB}"),
        ("not", "\u{00AC}"),
        ("shy", "\u{00AD}"),
        ("reg", "\u{00AE}"),
        ("macr", "\u{00AF}"),
        ("deg", "\u{00B0}"),
        ("plusmn", "\u{00B1}"),
        ("sup2", "\u{00B2}"),
        ("sup3", "\u{00B3}"),
        ("acute", "\u{00B4}"),
        ("micro", "\u{00B5}"),
        ("para", "\u{00B6}"),
        ("middot", "\u{00B7}"),
        ("cedil", "\u{00B8}"),
        ("sup1", "\u{00B9}"),
        ("ordm", "\u{00BA}"),
        ("raquo", "\u{00BB}"),
        ("frac14", "\u{00BC}"),
        ("frac12", "\u{00BD}"),
        ("frac34", "\u{00BE}"),
        ("iquest", "\u{00BF}"),
        // === Latin-1 uppercase accented (U+00C0-U+00DE) ===
        ("Agrave", "\u{00C0}"),
        ("Aacute", "\u{00C1}"),
        ("Acirc", "\u{00C2}"),
        ("Atilde", "\u{00C3}"),
        ("Auml", "\u{00C4}"),
        ("Aring", "\u{00C5}"),
        ("AElig", "\u{00C6}"),
        ("Ccedil", "\u{00C7}"),
        ("Egrave", "\u{00C8}"),
        ("Eacute", "\u{00C9}"),
        ("Ecirc", "\u{00CA}"),
        ("Euml", "\u{00CB}"),
        ("Igrave", "\u{00CC}"),
        ("Iacute", "\u{00CD}"),
        ("Icirc", "\u{00CE}"),
        ("Iuml", "\u{00CF}"),
        ("ETH", "\u{00D0}"),
        ("Ntilde", "\u{00D1}"),
        ("Ograve", "\u{00D2}"),
        ("Oacute", "\u{00D3}"),
        ("Ocirc", "\u{00D4}"),
        ("Otilde", "\u{00D5}"),
        ("Ouml", "\u{00D6}"),
        ("times", "\u{00D7}"),
        ("Oslash", "\u{00D8}"),
        ("Ugrave", "\u{00D9}"),
        ("Uacute", "\u{00DA}"),
        ("Ucirc", "\u{00DB}"),
        ("Uuml", "\u{00DC}"),
        ("Yacute", "\u{00DD}"),
        ("THORN", "\u{00DE}"),
        // === Latin-1 lowercase accented (U+00DF-U+00FF) ===
        ("szlig", "\u{00DF}"),
        ("agrave", "\u{00E0}"),
        ("aacute", "\u{00E1}"),
        ("acirc", "\u{00E2}"),
        ("atilde", "\u{00E3}"),
        ("auml", "\u{00E4}"),
        ("aring", "\u{00E5}"),
        ("aelig", "\u{00E6}"),
        ("ccedil", "\u{00E7}"),
        ("egrave", "\u{00E8}"),
        ("eacute", "\u{00E9}"),
        ("ecirc", "\u{00EA}"),
        ("euml", "\u{00EB}"),
        ("igrave", "\u{00EC}"),
        ("iacute", "\u{00ED}"),
        ("icirc", "\u{00EE}"),
        ("iuml", "\u{00EF}"),
        ("eth", "\u{00F0}"),
        ("ntilde", "\u{00F1}"),
        ("ograve", "\u{00F2}"),
        ("oacute", "\u{00F3}"),
        ("ocirc", "\u{00F4}"),
        ("otilde", "\u{00F5}"),
        ("ouml", "\u{00F6}"),
        ("divide", "\u{00F7}"),
        ("oslash", "\u{00F8}"),
        ("ugrave", "\u{00F9}"),
        ("uacute", "\u{00FA}"),
        ("ucirc", "\u{00FB}"),
        ("uuml", "\u{00FC}"),
        ("yacute", "\u{00FD}"),
        ("thorn", "\u{00FE}"),
        ("yuml", "\u{00FF}"),
        // === Latin Extended-A ===
        ("OElig", "\u{0152}"),
        ("oelig", "\u{0153}"),
        ("Scaron", "\u{0160}"),
        ("scaron", "\u{0161}"),
        ("Yuml", "\u{0178}"),
        ("fnof", "\u{0192}"),
        // === Spacing modifier letters ===
        ("circ", "\u{02C6}"),
        ("tilde", "\u{02DC}"),
        ("caron", "\u{02C7}"),
        ("breve", "\u{02D8}"),
        ("dot", "\u{02D9}"),
        // === Greek uppercase ===
        ("Alpha", "\u{0391}"),
        ("Beta", "\u{0392}"),
        ("Gamma", "\u{0393}"),
        ("Delta", "\u{0394}"),
        ("Epsilon", "\u{0395}"),
        ("Zeta", "\u{0396}"),
        ("Eta", "\u{0397}"),
        ("Theta", "\u{0398}"),
        ("Iota", "\u{0399}"),
        ("Kappa", "\u{039A}"),
        ("Lambda", "\u{039B}"),
        ("Mu", "\u{039C}"),
        ("Nu", "\u{039D}"),
        ("Xi", "\u{039E}"),
        ("Omicron", "\u{039F}"),
        ("Pi", "\u{03A0}"),
        ("Rho", "\u{03A1}"),
        ("Sigma", "\u{03A3}"),
        ("Tau", "\u{03A4}"),
        ("Upsilon", "\u{03A5}"),
        ("Phi", "\u{03A6}"),
        ("Chi", "\u{03A7}"),
        ("Psi", "\u{03A8}"),
        ("Omega", "\u{03A9}"),
        // === Greek lowercase ===
        ("alpha", "\u{03B1}"),
        ("beta", "\u{03B2}"),
        ("gamma", "\u{03B3}"),
        ("delta", "\u{03B4}"),
        ("epsilon", "\u{03B5}"),
        ("zeta", "\u{03B6}"),
        ("eta", "\u{03B7}"),
        ("theta", "\u{03B8}"),
        ("iota", "\u{03B9}"),
        ("kappa", "\u{03BA}"),
        ("lambda", "\u{03BB}"),
        ("mu", "\u{03BC}"),
        ("nu", "\u{03BD}"),
        ("xi", "\u{03BE}"),
        ("omicron", "\u{03BF}"),
        ("pi", "\u{03C0}"),
        ("rho", "\u{03C1}"),
        ("sigmaf", "\u{03C2}"),
        ("sigma", "\u{03C3}"),
        ("tau", "\u{03C4}"),
        ("upsilon", "\u{03C5}"),
        ("phi", "\u{03C6}"),
        ("chi", "\u{03C7}"),
        ("psi", "\u{03C8}"),
        ("omega", "\u{03C9}"),
        ("thetasym", "\u{03D1}"),
        ("upsih", "\u{03D2}"),
        ("piv", "\u{03D6}"),
        // === General punctuation ===
        ("ensp", "\u{2002}"),
        ("emsp", "\u{2003}"),
        ("thinsp", "\u{2009}"),
        ("zwnj", "\u{200C}"),
        ("zwj", "\u{200D}"),
        ("lrm", "\u{200E}"),
        ("rlm", "\u{200F}"),
        ("ndash", "\u{2013}"),
        ("mdash", "\u{2014}"),
        ("horbar", "\u{2015}"),
        ("lsquo", "\u{2018}"),
        ("rsquo", "\u{2019}"),
        ("sbquo", "\u{201A}"),
        ("ldquo", "\u{201C}"),
        ("rdquo", "\u{201D}"),
        ("bdquo", "\u{201E}"),
        ("dagger", "\u{2020}"),
        ("Dagger", "\u{2021}"),
        ("bull", "\u{2022}"),
        ("hellip", "\u{2026}"),
        ("permil", "\u{2030}"),
        ("prime", "\u{2032}"),
        ("Prime", "\u{2033}"),
        ("lsaquo", "\u{2039}"),
        ("rsaquo", "\u{203A}"),
        ("oline", "\u{203E}"),
        ("frasl", "\u{2044}"),
        // === Currency ===
        ("euro", "\u{20AC}"),
        // === Letterlike symbols ===
        ("image", "\u{2111}"),
        ("weierp", "\u{2118}"),
        ("real", "\u{211C}"),
        ("trade", "\u{2122}"),
        ("alefsym", "\u{2135}"),
        // === Arrows ===
        ("larr", "\u{2190}"),
        ("uarr", "\u{2191}"),
        ("rarr", "\u{2192}"),
        ("darr", "\u{2193}"),
        ("harr", "\u{2194}"),
        ("varr", "\u{2195}"),
        ("crarr", "\u{21B5}"),
        ("lArr", "\u{21D0}"),
        ("uArr", "\u{21D1}"),
        ("rArr", "\u{21D2}"),
        ("dArr", "\u{21D3}"),
        ("hArr", "\u{21D4}"),
        ("nwarrow", "\u{2196}"),
        ("nearrow", "\u{2197}"),
        ("searrow", "\u{2198}"),
        ("swarrow", "\u{2199}"),
        // === Mathematical operators ===
        ("forall", "\u{2200}"),
        ("part", "\u{2202}"),
        ("exist", "\u{2203}"),
        ("empty", "\u{2205}"),
        ("nabla", "\u{2207}"),
        ("isin", "\u{2208}"),
        ("notin", "\u{2209}"),
        ("ni", "\u{220B}"),
        ("prod", "\u{220F}"),
        ("sum", "\u{2211}"),
        ("minus", "\u{2212}"),
        ("mnplus", "\u{2213}"),
        ("lowast", "\u{2217}"),
        ("radic", "\u{221A}"),
        ("prop", "\u{221D}"),
        ("infin", "\u{221E}"),
        ("ang", "\u{2220}"),
        ("and", "\u{2227}"),
        ("or", "\u{2228}"),
        ("cap", "\u{2229}"),
        ("cup", "\u{222A}"),
        ("int", "\u{222B}"),
        ("there4", "\u{2234}"),
        ("sim", "\u{223C}"),
        ("cong", "\u{2245}"),
        ("asymp", "\u{2248}"),
        ("ne", "\u{2260}"),
        ("equiv", "\u{2261}"),
        ("le", "\u{2264}"),
        ("ge", "\u{2265}"),
        ("sub", "\u{2282}"),
        ("sup", "\u{2283}"),
        ("nsub", "\u{2284}"),
        ("sube", "\u{2286}"),
        ("supe", "\u{2287}"),
        ("oplus", "\u{2295}"),
        ("otimes", "\u{2297}"),
        ("perp", "\u{22A5}"),
        ("sdot", "\u{22C5}"),
        // === Miscellaneous technical ===
        ("lceil", "\u{2308}"),
        ("rceil", "\u{2309}"),
        ("lfloor", "\u{230A}"),
        ("rfloor", "\u{230B}"),
        ("lang", "\u{27E8}"),
        ("rang", "\u{27E9}"),
        // === Geometric shapes / misc symbols ===
        ("loz", "\u{25CA}"),
        ("spades", "\u{2660}"),
        ("clubs", "\u{2663}"),
        ("hearts", "\u{2665}"),
        ("diams", "\u{2666}"),
        ("check", "\u{2713}"),
        ("cross", "\u{2717}"),
        ("starf", "\u{2605}"),
        ("star", "\u{2606}"),
        // === ASCII punctuation names ===
        ("excl", "!"),
        ("num", "#"),
        ("dollar", "$"),
        ("percnt", "%"),
        ("lpar", "("),
        ("rpar", ")"),
        ("ast", "*"),
        ("plus", "+"),
        ("comma", ","),
        ("period", "."),
        ("sol", "/"),
        ("colon", ":"),
        ("semi", ";"),
        ("quest", "?"),
        ("commat", "@"),
        ("lsqb", "["),
        ("bsol", "\\"),
        ("rsqb", "]"),
        ("lowbar", "_"),
        ("grave", "`"),
        ("lcub", "{"),
        ("verbar", "|"),
        ("rcub", "}"),
        // === Common aliases ===
        ("lbrace", "{"),
        ("rbrace", "}"),
        ("VerticalBar", "|"),
        ("NoBreakSpace", "\u{00A0}"),
        ("mldr", "\u{2026}"),
        ("ellipsis", "\u{2026}"),
        ("bullet", "\u{2022}"),
        ("section", "\u{00A7}"),
        ("pilcrow", "\u{00B6}"),
        ("DoubleLeftArrow", "\u{21D0}"),
        ("DoubleRightArrow", "\u{21D2}"),
        ("DoubleUpArrow", "\u{21D1}"),
        ("DoubleDownArrow", "\u{21D3}"),
        ("implies", "\u{21D2}"),
        ("equivalent", "\u{2261}"),
        ("notequal", "\u{2260}"),
        ("approximately", "\u{2248}"),
    ])
});

/// Look up a named character reference. `name` carries neither `&` nor `;`.
#[must_use]
pub fn lookup_entity(name: &str) -> Option<&'static str> {
    NAMED_ENTITIES.get(name).copied()
}

/// The five references that resolve even without a trailing semicolon.
///
/// "...the historical legacy entities. All others require the `;` to avoid
/// misinterpreting URL query strings like `&lang=en`."
fn resolves_without_semicolon(name: &str) -> bool {
    matches!(name, "amp" | "lt" | "gt" | "quot" | "apos")
}

/// [§ 13.2.5.72](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
///
/// Resolve a character reference. Called with the scanner positioned just
/// after a consumed `&`. Returns the decoded replacement text; on failure
/// the scanner is rewound to its entry position and a literal `"&"` is
/// returned.
///
/// Numeric forms: `&#N;` and `&#xH;` with the terminating `;` optional.
/// Code point 0 or above U+10FFFF yields U+FFFD.
#[must_use]
pub fn resolve_character_reference(scanner: &mut Scanner) -> String {
    let start = scanner.position();

    if scanner.at_end() {
        return "&".to_string();
    }

    // Numeric character reference: &#...;
    if scanner.peek() == Some('#') {
        let _ = scanner.consume();

        let hex = matches!(scanner.peek(), Some('x' | 'X'));
        if hex {
            let _ = scanner.consume();
        }

        let mut digits = String::new();
        while let Some(c) = scanner.peek() {
            let is_digit = if hex {
                c.is_ascii_hexdigit()
            } else {
                c.is_ascii_digit()
            };
            if !is_digit {
                break;
            }
            digits.push(c);
            let _ = scanner.consume();
        }

        if digits.is_empty() {
            scanner.rewind_to(start);
            return "&".to_string();
        }

        // Consume the optional terminating ';'.
        if scanner.peek() == Some(';') {
            let _ = scanner.consume();
        }

        let radix = if hex { 16 } else { 10 };
        let code_point = u32::from_str_radix(&digits, radix).unwrap_or(u32::MAX);
        if code_point == 0 || code_point > 0x0010_FFFF {
            return REPLACEMENT.to_string();
        }
        return char::from_u32(code_point)
            .map_or_else(|| REPLACEMENT.to_string(), String::from);
    }

    // Named character reference: read alphanumerics up to an optional ';'.
    let mut name = String::new();
    let mut has_semicolon = false;
    while let Some(c) = scanner.peek() {
        if c == ';' {
            let _ = scanner.consume();
            has_semicolon = true;
            break;
        }
        if !c.is_ascii_alphanumeric() {
            break;
        }
        name.push(c);
        let _ = scanner.consume();
    }

    if let Some(replacement) = lookup_entity(&name) {
        if has_semicolon || resolves_without_semicolon(&name) {
            return replacement.to_string();
        }
    }

    // Not a recognized entity — rewind and return a literal '&'.
    scanner.rewind_to(start);
    "&".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(input: &str) -> (String, usize) {
        // Input starts just after the '&'.
        let mut scanner = Scanner::new(input);
        let out = resolve_character_reference(&mut scanner);
        (out, scanner.position())
    }

    #[test]
    fn named_with_semicolon() {
        assert_eq!(resolve("copy;").0, "©");
        assert_eq!(resolve("mdash;").0, "—");
    }

    #[test]
    fn xml_entities_resolve_without_semicolon() {
        assert_eq!(resolve("amp rest").0, "&");
        assert_eq!(resolve("lt=1").0, "<");
        assert_eq!(resolve("gt").0, ">");
    }

    #[test]
    fn name_lookup_reads_the_whole_alphanumeric_run() {
        // "&ltx" reads the candidate name "ltx", which is not an entity;
        // there is no longest-prefix backtracking.
        let (out, pos) = resolve("ltx");
        assert_eq!(out, "&");
        assert_eq!(pos, 0);
    }

    #[test]
    fn non_xml_entity_requires_semicolon() {
        let (out, pos) = resolve("copy today");
        assert_eq!(out, "&");
        // Rewound to the start so the name re-tokenizes as plain text.
        assert_eq!(pos, 0);
    }

    #[test]
    fn decimal_and_hex_numeric() {
        assert_eq!(resolve("#38;").0, "&");
        assert_eq!(resolve("#x26;").0, "&");
        assert_eq!(resolve("#169;").0, "©");
    }

    #[test]
    fn numeric_out_of_range_is_replacement() {
        assert_eq!(resolve("#0;").0, "\u{FFFD}");
        assert_eq!(resolve("#x110000;").0, "\u{FFFD}");
    }

    #[test]
    fn unknown_name_rewinds() {
        let (out, pos) = resolve("bogusname;");
        assert_eq!(out, "&");
        assert_eq!(pos, 0);
    }
}
