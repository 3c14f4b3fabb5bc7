use serde::{Deserialize, Serialize};
use std::fmt;

/// Default preview length in characters.
pub const DEFAULT_PREVIEW_CHARS: usize = 200;

/// Appended to a preview whose source text was cut.
pub const TRUNCATION_MARKER: &str = "...";

/// Capped excerpt of a text, stored in the pointer file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preview {
    text: String,
    truncated: bool,
}

impl Preview {
    /// Take the first `max_chars` characters of `text`, marking the cut.
    ///
    /// Counts Unicode scalar values so a multi-byte character is never split.
    pub fn new(text: &str, max_chars: usize) -> Self {
        match text.char_indices().nth(max_chars) {
            Some((cut, _)) => Self {
                text: format!("{}{}", &text[..cut], TRUNCATION_MARKER),
                truncated: true,
            },
            None => Self {
                text: text.to_string(),
                truncated: false,
            },
        }
    }

    /// Rebuild a preview from an unescaped pointer-file value written with
    /// the same `max_chars`.
    ///
    /// Only a value longer than `max_chars` can carry a cut, so short text
    /// that happens to end in the marker is not flagged.
    pub fn from_stored(text: String, max_chars: usize) -> Self {
        let truncated =
            text.ends_with(TRUNCATION_MARKER) && text.chars().count() > max_chars;
        Self { text, truncated }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Escaped form written between the quotes of a pointer line.
    ///
    /// Newlines are escaped so an entry always occupies exactly one line.
    pub fn escaped(&self) -> String {
        escape_value(&self.text)
    }
}

impl fmt::Display for Preview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

pub fn escape_value(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out
}

pub fn unescape_value(escaped: &str) -> String {
    let mut out = String::with_capacity(escaped.len());
    let mut chars = escaped.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_unmodified() {
        let text = "a".repeat(200);
        let preview = Preview::new(&text, 200);
        assert_eq!(preview.as_str(), text);
        assert!(!preview.is_truncated());
    }

    #[test]
    fn test_long_text_is_cut_with_marker() {
        let text = "b".repeat(201);
        let preview = Preview::new(&text, 200);
        assert_eq!(preview.as_str(), format!("{}...", "b".repeat(200)));
        assert!(preview.is_truncated());
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        let text = "é".repeat(250);
        let preview = Preview::new(&text, 200);
        assert_eq!(preview.as_str().chars().count(), 203);
        assert!(preview.as_str().starts_with(&"é".repeat(200)));
    }

    #[test]
    fn test_empty_text() {
        let preview = Preview::new("", 200);
        assert_eq!(preview.as_str(), "");
        assert!(!preview.is_truncated());
    }

    #[test]
    fn test_stored_preview_truncation_follows_length() {
        assert!(!Preview::from_stored("wait...".to_string(), 200).is_truncated());

        let cut = Preview::new(&"c".repeat(300), 200);
        let stored = Preview::from_stored(cut.as_str().to_string(), 200);
        assert!(stored.is_truncated());
        assert_eq!(stored, cut);
    }

    #[test]
    fn test_escape_keeps_entry_on_one_line() {
        let preview = Preview::new("line one\nsaid \"hi\" \\ bye", 200);
        let escaped = preview.escaped();
        assert!(!escaped.contains('\n'));
        assert_eq!(escaped, r#"line one\nsaid \"hi\" \\ bye"#);
        assert_eq!(unescape_value(&escaped), preview.as_str());
    }
}
