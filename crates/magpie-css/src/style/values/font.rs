//! Font-related value parsing.
//!
//! [CSS Fonts Level 4](https://www.w3.org/TR/css-fonts-4/)

/// [§ 7.1 font-feature-settings](https://www.w3.org/TR/css-fonts-4/#font-feature-settings-prop)
///
/// "This property provides low-level control over OpenType or AAT font
/// features."
///
/// Parses a comma-separated list of quoted 4-character feature tags, each
/// with an optional 0/1 value (`on`/`off` are not in the original surface
/// and are skipped). `normal` yields an empty list. Tags that are not
/// exactly four characters are dropped.
#[must_use]
pub fn parse_font_feature_settings(value: &str) -> Vec<(String, u32)> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("normal") {
        return Vec::new();
    }

    // Split on commas outside quotes.
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for ch in trimmed.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            ',' if !in_quotes => {
                segments.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    segments.push(current.trim().to_string());

    let mut settings = Vec::new();
    for segment in segments {
        if segment.is_empty() {
            continue;
        }

        let (tag, rest) = match segment.find('"') {
            Some(open) => {
                let Some(close_rel) = segment[open + 1..].find('"') else {
                    continue;
                };
                let close = open + 1 + close_rel;
                (
                    segment[open + 1..close].trim().to_string(),
                    segment[close + 1..].trim().to_string(),
                )
            }
            None => match segment.split_once(char::is_whitespace) {
                Some((tag, rest)) => (tag.to_string(), rest.trim().to_string()),
                None => (segment.clone(), String::new()),
            },
        };

        let tag = tag.trim().to_ascii_lowercase();
        if tag.len() != 4 {
            continue;
        }

        let mut enabled = 1u32;
        if !rest.is_empty() {
            if let Ok(parsed) = rest.parse::<u32>() {
                if parsed <= 1 {
                    enabled = parsed;
                }
            }
        }
        settings.push((tag, enabled));
    }

    settings
}

#[cfg(test)]
mod tests {
    use super::parse_font_feature_settings;

    #[test]
    fn normal_is_empty() {
        assert!(parse_font_feature_settings("normal").is_empty());
        assert!(parse_font_feature_settings("").is_empty());
    }

    #[test]
    fn quoted_tags_with_values() {
        let settings = parse_font_feature_settings("\"liga\" 0, \"kern\" 1, \"smcp\"");
        assert_eq!(
            settings,
            vec![
                ("liga".to_string(), 0),
                ("kern".to_string(), 1),
                ("smcp".to_string(), 1),
            ]
        );
    }

    #[test]
    fn bad_tags_are_dropped() {
        let settings = parse_font_feature_settings("\"toolong\" 1, \"ok\" 1, \"liga\"");
        assert_eq!(settings, vec![("liga".to_string(), 1)]);
    }
}
