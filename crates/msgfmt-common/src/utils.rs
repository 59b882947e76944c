//! Shared utility functions.

/// Truncates a string to at most `max_chars` characters, marking the cut
/// with an ellipsis. Counts characters, not bytes.
pub fn truncate_snippet(input: &str, max_chars: usize) -> String {
    if input.chars().count() <= max_chars {
        input.to_string()
    } else {
        let kept: String = input.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Renders control characters visibly so snippets stay on one log line.
pub fn escape_snippet(input: &str) -> String {
    input.escape_debug().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_snippet() {
        let input = "This is a very long string that should be truncated";
        assert_eq!(truncate_snippet(input, 20), "This is a very lo...");
        assert_eq!(truncate_snippet("Short", 20), "Short");
    }

    #[test]
    fn test_truncate_snippet_counts_chars() {
        assert_eq!(truncate_snippet("ääääääää", 6), "äää...");
    }

    #[test]
    fn test_escape_snippet() {
        assert_eq!(escape_snippet("a\nb"), "a\\nb");
    }
}
