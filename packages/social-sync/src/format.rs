//! Status message template.

/// Label in front of the permalink on the last line.
pub const READ_MORE_LABEL: &str = "🔗 阅读全文";

/// Markdown status text for a post.
///
/// Inputs are used as-is; nothing is escaped.
pub fn format_status(title: &str, summary: &str, permalink: &str) -> String {
    format!("## {title}\n\n{summary}\n\n{READ_MORE_LABEL}: {permalink}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template() {
        assert_eq!(
            format_status("Hello", "World", "https://blog.example/archives/1"),
            "## Hello\n\nWorld\n\n🔗 阅读全文: https://blog.example/archives/1"
        );
    }

    #[test]
    fn test_markdown_passes_through() {
        let text = format_status("*a*", "[b](c)", "d");
        assert!(text.starts_with("## *a*\n\n[b](c)\n\n"));
    }

    #[test]
    fn test_is_pure() {
        let first = format_status("t", "s", "p");
        let second = format_status("t", "s", "p");
        assert_eq!(first, second);
    }
}
