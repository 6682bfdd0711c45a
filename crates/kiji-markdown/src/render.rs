//! Markdown to HTML rendering.

use pulldown_cmark::{html, Options, Parser};

use crate::frontmatter::{extract_frontmatter, ArticleFrontmatter, FrontmatterError};

/// A Markdown article split into metadata and body.
#[derive(Debug, Clone)]
pub struct ParsedArticle {
    /// Parsed frontmatter (if present)
    pub frontmatter: Option<ArticleFrontmatter>,

    /// Markdown body (without frontmatter)
    pub body: String,
}

/// Parse an article file into frontmatter and Markdown body.
pub fn parse_article(source: &str) -> Result<ParsedArticle, FrontmatterError> {
    let (frontmatter, body) = extract_frontmatter(source)?;

    Ok(ParsedArticle {
        frontmatter,
        body: body.to_string(),
    })
}

/// Render a Markdown body to an HTML fragment.
///
/// Raw HTML in the source is passed through unchanged.
pub fn render_markdown(content: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;

    let parser = Parser::new_ext(content, options);

    let mut html_output = String::with_capacity(content.len() * 3 / 2);
    html::push_html(&mut html_output, parser);

    html_output
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_headings_and_paragraphs() {
        let html = render_markdown("# Hi\n\nWorld");

        assert_eq!(html, "<h1>Hi</h1>\n<p>World</p>\n");
    }

    #[test]
    fn renders_tables_and_strikethrough() {
        let html = render_markdown("| a | b |\n|---|---|\n| 1 | 2 |\n\n~~old~~");

        assert!(html.contains("<table>"));
        assert!(html.contains("<del>old</del>"));
    }

    #[test]
    fn passes_raw_html_through() {
        let html = render_markdown("<div class=\"note\">注意</div>");

        assert!(html.contains("<div class=\"note\">注意</div>"));
    }

    #[test]
    fn parses_article_with_frontmatter() {
        let source = "---\ntitle: Test\nslug: my-post\n---\n\n# Body";

        let article = parse_article(source).unwrap();
        let fm = article.frontmatter.unwrap();

        assert_eq!(fm.title.as_deref(), Some("Test"));
        assert_eq!(fm.slug.as_deref(), Some("my-post"));
        assert_eq!(article.body, "# Body");
    }

    #[test]
    fn parses_article_without_frontmatter() {
        let article = parse_article("# Only body").unwrap();

        assert!(article.frontmatter.is_none());
        assert_eq!(article.body, "# Only body");
    }
}
