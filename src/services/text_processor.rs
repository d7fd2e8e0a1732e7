// Text Processing Service
// Markup cleanup for archive-embedded XML and short previews for logs

use regex::Regex;
use std::sync::LazyLock;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("markup tag pattern should compile"));

static WS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern should compile"));

/// Remove every `<...>` tag, keeping the text between tags.
pub fn strip_markup_tags(text: &str) -> String {
    TAG_RE.replace_all(text, "").into_owned()
}

/// Collapse whitespace runs (including newlines) into single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    WS_RE.replace_all(text, " ").into_owned()
}

/// Turn an XML document into flat prose: tags stripped, whitespace collapsed, trimmed.
pub fn clean_markup_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    collapse_whitespace(&strip_markup_tags(text)).trim().to_string()
}

/// Single-line preview, truncated on a char boundary.
pub fn preview(s: &str, max_chars: usize) -> String {
    let mut out: String = s.chars().take(max_chars).collect();
    if s.chars().count() > max_chars {
        out.push_str("...");
    }
    out.replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_markup_tags() {
        let xml = r#"<sf:p sf:style="x">Hello <sf:span>world</sf:span></sf:p>"#;
        assert_eq!(strip_markup_tags(xml), "Hello world");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("a \n\t b\r\n\nc"), "a b c");
    }

    #[test]
    fn test_clean_markup_text() {
        let xml = "<?xml version=\"1.0\"?>\n<doc>\n  <p>First   line</p>\n  <p>Second</p>\n</doc>\n";
        assert_eq!(clean_markup_text(xml), "First line Second");
        assert_eq!(clean_markup_text(""), "");
        assert_eq!(clean_markup_text("<only/><tags/>"), "");
    }

    #[test]
    fn test_unclosed_angle_bracket_is_kept() {
        assert_eq!(clean_markup_text("1 < 2 and 3"), "1 < 2 and 3");
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview("abc", 5), "abc");
        assert_eq!(preview("àèìòù", 3), "àèì...");
        assert_eq!(preview("a\nb", 10), "a b");
    }
}
