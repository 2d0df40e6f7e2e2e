//! Character-based text helpers.
//!
//! Truncation limits throughout the enrichment pipeline are counts of
//! Unicode scalar values, and incident notes routinely contain non-ASCII,
//! so byte slicing is never safe here.

/// First `max_chars` characters of `text`
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_pos, _)) => &text[..byte_pos],
        None => text,
    }
}

/// Last `max_chars` characters of `text`
pub fn tail_chars(text: &str, max_chars: usize) -> &str {
    let total = text.chars().count();
    if total <= max_chars {
        return text;
    }
    match text.char_indices().nth(total - max_chars) {
        Some((byte_pos, _)) => &text[byte_pos..],
        None => text,
    }
}

/// Up to `max_chars` characters starting at character index `start`
pub fn window_chars(text: &str, start: usize, max_chars: usize) -> &str {
    let begin = match text.char_indices().nth(start) {
        Some((byte_pos, _)) => byte_pos,
        None => return "",
    };
    truncate_chars(&text[begin..], max_chars)
}

/// Character index of `needle` within the lowercased `haystack`
pub fn find_lowercase(haystack: &str, needle: &str) -> Option<usize> {
    let lowered = haystack.to_lowercase();
    lowered
        .find(needle)
        .map(|byte_pos| lowered[..byte_pos].chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello world", 5), "hello");
        assert_eq!(truncate_chars("hi", 5), "hi");
        assert_eq!(truncate_chars("", 5), "");
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        assert_eq!(truncate_chars("héllo wörld", 5), "héllo");
        assert_eq!(truncate_chars("日本語のテスト", 3), "日本語");
    }

    #[test]
    fn test_tail_chars() {
        assert_eq!(tail_chars("hello world", 5), "world");
        assert_eq!(tail_chars("hi", 5), "hi");
        assert_eq!(tail_chars("ログを確認", 2), "確認");
    }

    #[test]
    fn test_window_chars() {
        assert_eq!(window_chars("abcdefgh", 2, 3), "cde");
        assert_eq!(window_chars("abcdefgh", 6, 10), "gh");
        assert_eq!(window_chars("abc", 10, 3), "");
    }

    #[test]
    fn test_find_lowercase() {
        assert_eq!(find_lowercase("See the Resolution: here", "resolution:"), Some(8));
        assert_eq!(find_lowercase("nothing to see", "resolution:"), None);
    }

    #[test]
    fn test_find_lowercase_after_multibyte() {
        let text = "café ☕ Fix: restart";
        let pos = find_lowercase(text, "fix:").unwrap();
        assert_eq!(window_chars(text, pos, 4), "Fix:");
    }
}
