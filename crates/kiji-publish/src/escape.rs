//! HTML escaping for interpolated text.

/// Escape HTML special characters including single quotes.
///
/// Safe for element text and for double- or single-quoted attribute values.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_and_quotes() {
        assert_eq!(
            html_escape(r#"<script>alert("x" & 'y')</script>"#),
            "&lt;script&gt;alert(&quot;x&quot; &amp; &#x27;y&#x27;)&lt;/script&gt;"
        );
    }

    #[test]
    fn leaves_plain_text_and_paths_alone() {
        assert_eq!(html_escape("テスト記事"), "テスト記事");
        assert_eq!(html_escape("../assets/images/a.png"), "../assets/images/a.png");
    }
}
