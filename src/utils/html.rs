use ammonia;

/// Escapes text for safe inclusion in HTML element content or quoted attributes.
///
/// Unlike `ammonia::clean`, nothing is kept as markup: every character that
/// could open a tag, an entity or an attribute is entity-encoded.
pub fn escape_text(input: &str) -> String {
    ammonia::clean_text(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markup_is_escaped() {
        let escaped = escape_text("<script>alert('x')</script>");
        assert!(!escaped.contains('<'));
        assert!(!escaped.contains('>'));
        assert!(escaped.contains("&lt;script"));
    }

    #[test]
    fn plain_text_is_readable() {
        assert_eq!(escape_text("Clue"), "Clue");
    }
}
