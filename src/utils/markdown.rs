//! Helpers for Telegram MarkdownV2 text.
//!
//! Program and workout content comes from seed documents and may contain any
//! character, so everything that is not deliberate markup goes through
//! [`escape_markdown`].

const SPECIAL: &[char] = &[
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!', '\\',
];

/// Escapes markdown special characters for MarkdownV2 parsing mode
///
/// # Example
/// ```
/// use training_bot::utils::markdown::escape_markdown;
///
/// let text = "Run 5 km (easy pace)!";
/// assert_eq!(escape_markdown(text), "Run 5 km \\(easy pace\\)\\!");
/// ```
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if SPECIAL.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Escaped text wrapped in bold markers.
pub fn bold(text: &str) -> String {
    format!("*{}*", escape_markdown(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_basic_markdown() {
        assert_eq!(escape_markdown("Hello *world*"), "Hello \\*world\\*");
        assert_eq!(escape_markdown("_italic_"), "\\_italic\\_");
        assert_eq!(escape_markdown("`code`"), "\\`code\\`");
    }

    #[test]
    fn test_escape_workout_text() {
        let input = "Warm-up: 10 min jog. Then 4x400m @ 5:00/km!";
        let expected = "Warm\\-up: 10 min jog\\. Then 4x400m @ 5:00/km\\!";
        assert_eq!(escape_markdown(input), expected);
    }

    #[test]
    fn test_escape_backslash() {
        assert_eq!(escape_markdown("a\\b"), "a\\\\b");
    }

    #[test]
    fn test_escape_leaves_emoji_and_cyrillic() {
        assert_eq!(escape_markdown("🏃 Беговая"), "🏃 Беговая");
        assert_eq!(escape_markdown(""), "");
    }

    #[test]
    fn test_bold() {
        assert_eq!(bold("Workout 1."), "*Workout 1\\.*");
    }
}
