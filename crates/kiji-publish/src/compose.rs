//! Article composition from the site's article template.
//!
//! The template is an ordinary HTML page. A fixed set of named anchors marks the
//! spots that change per article; each anchor is substituted once, at its first
//! occurrence, so structurally similar markup further down (footers, related
//! links) is left alone.

use std::ops::Range;

use crate::escape::html_escape;
use crate::listing::thumbnail_path;

/// Site-wide values that appear in every article.
#[derive(Debug, Clone)]
pub struct SiteMeta {
    /// Site name appended to the `<title>`
    pub name: String,
    /// Scheme and host used for absolute URLs (e.g. `https://example.com`)
    pub origin: String,
    /// Listing page file name, linked from the breadcrumb
    pub listing_file: String,
    /// Climb from an article back to the site root, e.g. `../`
    pub root_prefix: String,
}

/// Per-article values substituted into the template.
#[derive(Debug, Clone, Copy)]
pub struct ArticleFields<'a> {
    pub title: &'a str,
    pub date: &'a str,
    pub description: &'a str,
    /// Image reference relative to the article file
    pub image: &'a str,
    /// Rendered Markdown, inserted verbatim
    pub content_html: &'a str,
    /// Article path relative to the site root (e.g. `articles/foo.html`)
    pub article_path: &'a str,
}

/// A template or listing anchor that could not be found.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Anchor not found: {0}")]
pub struct MissingAnchor(pub &'static str);

/// The places in the article template that receive article values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Title,
    Description,
    OgTitle,
    OgDescription,
    OgUrl,
    OgImage,
    Date,
    Heading,
    Breadcrumb,
    MainImage,
    Content,
}

/// How an anchor is found in the document.
enum Locator {
    /// Replace the text between `open` and the first `close` after it.
    Inner {
        open: &'static str,
        close: &'static str,
        same_line: bool,
    },
    /// Replace the whole tag that contains `marker`.
    Tag {
        tag_open: &'static str,
        marker: &'static str,
    },
}

impl Anchor {
    /// Substitution order. Content goes last so rendered Markdown can never be
    /// mistaken for an anchor.
    pub const ALL: [Anchor; 11] = [
        Anchor::Title,
        Anchor::Description,
        Anchor::OgTitle,
        Anchor::OgDescription,
        Anchor::OgUrl,
        Anchor::OgImage,
        Anchor::Date,
        Anchor::Heading,
        Anchor::Breadcrumb,
        Anchor::MainImage,
        Anchor::Content,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "meta description",
            Self::OgTitle => "og:title",
            Self::OgDescription => "og:description",
            Self::OgUrl => "og:url",
            Self::OgImage => "og:image",
            Self::Date => "date",
            Self::Heading => "heading",
            Self::Breadcrumb => "breadcrumb",
            Self::MainImage => "main image",
            Self::Content => "content",
        }
    }

    /// Social-preview tags are optional; everything else must be present.
    pub fn is_required(self) -> bool {
        !matches!(
            self,
            Self::OgTitle | Self::OgDescription | Self::OgUrl | Self::OgImage
        )
    }

    fn locator(self) -> Locator {
        let inner = |open, close| Locator::Inner {
            open,
            close,
            same_line: true,
        };

        match self {
            Self::Title => inner("<title>", "</title>"),
            Self::Description => inner(r#"<meta name="description" content=""#, "\""),
            Self::OgTitle => inner(r#"<meta property="og:title" content=""#, "\""),
            Self::OgDescription => inner(r#"<meta property="og:description" content=""#, "\""),
            Self::OgUrl => inner(r#"<meta property="og:url" content=""#, "\""),
            Self::OgImage => inner(r#"<meta property="og:image" content=""#, "\""),
            Self::Date => inner(r#"<p class="text-gray-500 mb-2">"#, "</p>"),
            Self::Heading => inner(
                r#"<h1 class="text-3xl md:text-4xl font-bold text-gray-900 leading-tight">"#,
                "</h1>",
            ),
            Self::Breadcrumb => inner(r#"<p class="text-sm mt-2 text-gray-500">"#, "</p>"),
            Self::MainImage => Locator::Tag {
                tag_open: "<img",
                marker: r#"alt="記事のメイン画像""#,
            },
            Self::Content => Locator::Inner {
                open: r#"<div class="article-content text-gray-800">"#,
                close: "</div>",
                same_line: false,
            },
        }
    }

    /// Byte range to replace in `doc`, if the anchor is present.
    fn locate(self, doc: &str) -> Option<Range<usize>> {
        match self.locator() {
            Locator::Inner {
                open,
                close,
                same_line,
            } => {
                let start = doc.find(open)? + open.len();
                let rest = &doc[start..];
                let end = rest.find(close)?;
                if same_line && rest[..end].contains('\n') {
                    return None;
                }
                Some(start..start + end)
            }
            Locator::Tag { tag_open, marker } => {
                let marker_pos = doc.find(marker)?;
                let start = doc[..marker_pos].rfind(tag_open)?;
                // The marker has to sit inside that tag, not after it.
                if doc[start..marker_pos].contains('>') {
                    return None;
                }
                let after = marker_pos + marker.len();
                let end = after + doc[after..].find('>')? + 1;
                Some(start..end)
            }
        }
    }

    /// Replacement text for this anchor.
    fn fill(self, fields: &ArticleFields<'_>, site: &SiteMeta) -> String {
        let title = html_escape(fields.title);
        let description = html_escape(fields.description);

        match self {
            Self::Title => format!("{} - {}", title, html_escape(&site.name)),
            Self::Description | Self::OgDescription => description,
            Self::OgTitle | Self::Heading => title,
            Self::OgUrl => html_escape(&absolute_url(&site.origin, fields.article_path)),
            Self::OgImage => html_escape(&image_url(&site.origin, fields.image, &site.root_prefix)),
            Self::Date => html_escape(fields.date),
            Self::Breadcrumb => format!(
                r#"<a href="{prefix}index.html" class="hover:underline">ホーム</a> &gt; <a href="{prefix}{listing}" class="hover:underline">コラム</a> &gt; {title}"#,
                prefix = html_escape(&site.root_prefix),
                listing = html_escape(&site.listing_file),
            ),
            Self::MainImage => format!(
                r#"<img src="{}" alt="{}" class="w-full h-auto rounded-lg shadow-lg mb-12">"#,
                html_escape(fields.image),
                title
            ),
            Self::Content => fields.content_html.to_string(),
        }
    }
}

/// Compose a full article document from `template`.
///
/// Fails on the first required anchor that is missing. Optional social-preview
/// anchors are filled when present and skipped otherwise.
pub fn compose(
    template: &str,
    fields: &ArticleFields<'_>,
    site: &SiteMeta,
) -> Result<String, MissingAnchor> {
    let mut doc = template.to_string();

    for anchor in Anchor::ALL {
        match anchor.locate(&doc) {
            Some(range) => doc.replace_range(range, &anchor.fill(fields, site)),
            None if anchor.is_required() => return Err(MissingAnchor(anchor.name())),
            None => tracing::debug!("Optional anchor {} not in template", anchor.name()),
        }
    }

    Ok(doc)
}

/// Join the site origin and a site-relative path.
pub fn absolute_url(origin: &str, path: &str) -> String {
    format!(
        "{}/{}",
        origin.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn image_url(origin: &str, image: &str, root_prefix: &str) -> String {
    if image.starts_with("http://") || image.starts_with("https://") {
        image.to_string()
    } else {
        absolute_url(origin, thumbnail_path(image, root_prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scaffold::DEFAULT_ARTICLE_TEMPLATE;
    use pretty_assertions::assert_eq;

    fn site() -> SiteMeta {
        SiteMeta {
            name: "AIライター協会".to_string(),
            origin: "https://example.com/".to_string(),
            listing_file: "column.html".to_string(),
            root_prefix: "../".to_string(),
        }
    }

    fn fields<'a>(content_html: &'a str) -> ArticleFields<'a> {
        ArticleFields {
            title: "Test",
            date: "2024.01.01",
            description: "D",
            image: "../assets/images/x.png",
            content_html,
            article_path: "articles/test.html",
        }
    }

    #[test]
    fn composes_default_template() {
        let content = kiji_markdown::render_markdown("# Hi\n\nBody text");
        let doc = compose(DEFAULT_ARTICLE_TEMPLATE, &fields(&content), &site()).unwrap();

        assert!(doc.contains("<title>Test - AIライター協会</title>"));
        assert!(doc.contains(r#"<meta name="description" content="D">"#));
        assert!(doc.contains(r#"<p class="text-gray-500 mb-2">2024.01.01</p>"#));
        assert!(doc.contains(
            r#"<h1 class="text-3xl md:text-4xl font-bold text-gray-900 leading-tight">Test</h1>"#
        ));
        assert!(doc.contains(
            r#"<p class="text-sm mt-2 text-gray-500"><a href="../index.html" class="hover:underline">ホーム</a> &gt; <a href="../column.html" class="hover:underline">コラム</a> &gt; Test</p>"#
        ));
        assert!(doc.contains(
            r#"<img src="../assets/images/x.png" alt="Test" class="w-full h-auto rounded-lg shadow-lg mb-12">"#
        ));
        assert!(!doc.contains("記事のメイン画像"));

        let container = r#"<div class="article-content text-gray-800">"#;
        assert_eq!(doc.matches(container).count(), 1);
        assert!(doc.contains(&format!("{container}{content}</div>")));
    }

    #[test]
    fn fills_social_preview_tags() {
        let doc = compose(DEFAULT_ARTICLE_TEMPLATE, &fields("<p>x</p>"), &site()).unwrap();

        assert!(doc.contains(r#"<meta property="og:title" content="Test">"#));
        assert!(doc.contains(r#"<meta property="og:description" content="D">"#));
        assert!(doc.contains(
            r#"<meta property="og:url" content="https://example.com/articles/test.html">"#
        ));
        assert!(doc.contains(
            r#"<meta property="og:image" content="https://example.com/assets/images/x.png">"#
        ));
    }

    #[test]
    fn substitutes_first_occurrence_only() {
        let doc = compose(DEFAULT_ARTICLE_TEMPLATE, &fields("<p>x</p>"), &site()).unwrap();

        // The footer reuses the breadcrumb's classes and must survive untouched.
        assert!(doc.contains(r#"<p class="text-sm mt-2 text-gray-500">&copy; AIライター協会</p>"#));
    }

    #[test]
    fn escapes_interpolated_text() {
        let hostile = ArticleFields {
            title: r#"<script>alert(1)</script>"#,
            description: r#"" onload="x"#,
            ..fields("<p>ok</p>")
        };

        let doc = compose(DEFAULT_ARTICLE_TEMPLATE, &hostile, &site()).unwrap();

        assert!(!doc.contains("<script>alert(1)</script>"));
        assert!(doc.contains("<title>&lt;script&gt;alert(1)&lt;/script&gt; - AIライター協会</title>"));
        assert!(doc.contains(
            r#"<meta name="description" content="&quot; onload=&quot;x">"#
        ));
        assert!(doc.contains("<p>ok</p>"));
    }

    #[test]
    fn leaves_template_untouched() {
        let template = DEFAULT_ARTICLE_TEMPLATE.to_string();
        let _ = compose(&template, &fields("<p>x</p>"), &site()).unwrap();

        assert_eq!(template, DEFAULT_ARTICLE_TEMPLATE);
    }

    #[test]
    fn optional_anchors_may_be_absent() {
        let template = r#"<html><head><title>x</title>
<meta name="description" content="old">
</head><body>
<p class="text-gray-500 mb-2">old</p>
<h1 class="text-3xl md:text-4xl font-bold text-gray-900 leading-tight">old</h1>
<p class="text-sm mt-2 text-gray-500">old</p>
<img src="../a.png" alt="記事のメイン画像" class="w-full">
<div class="article-content text-gray-800">
old
</div>
</body></html>"#;

        let doc = compose(template, &fields("<p>new</p>"), &site()).unwrap();

        assert_eq!(
            doc,
            r#"<html><head><title>Test - AIライター協会</title>
<meta name="description" content="D">
</head><body>
<p class="text-gray-500 mb-2">2024.01.01</p>
<h1 class="text-3xl md:text-4xl font-bold text-gray-900 leading-tight">Test</h1>
<p class="text-sm mt-2 text-gray-500"><a href="../index.html" class="hover:underline">ホーム</a> &gt; <a href="../column.html" class="hover:underline">コラム</a> &gt; Test</p>
<img src="../assets/images/x.png" alt="Test" class="w-full h-auto rounded-lg shadow-lg mb-12">
<div class="article-content text-gray-800"><p>new</p></div>
</body></html>"#
        );
    }

    #[test]
    fn breadcrumb_climbs_nested_article_dirs() {
        let nested = SiteMeta {
            root_prefix: "../../".to_string(),
            ..site()
        };

        let doc = compose(DEFAULT_ARTICLE_TEMPLATE, &fields("<p>x</p>"), &nested).unwrap();

        assert!(doc.contains(r#"<a href="../../index.html" class="hover:underline">ホーム</a>"#));
        assert!(doc.contains(r#"<a href="../../column.html" class="hover:underline">コラム</a>"#));
    }

    #[test]
    fn fails_on_missing_required_anchor() {
        let template = DEFAULT_ARTICLE_TEMPLATE.replace("article-content", "body-content");

        let result = compose(&template, &fields("<p>x</p>"), &site());

        assert_eq!(result, Err(MissingAnchor("content")));
    }

    #[test]
    fn single_line_anchor_must_close_on_its_line() {
        let template = DEFAULT_ARTICLE_TEMPLATE.replace("</title>", "\n</title>");

        let result = compose(&template, &fields("<p>x</p>"), &site());

        assert_eq!(result, Err(MissingAnchor("title")));
    }

    #[test]
    fn builds_absolute_urls() {
        assert_eq!(absolute_url("https://a.jp/", "/articles/x.html"), "https://a.jp/articles/x.html");
        assert_eq!(absolute_url("https://a.jp", "articles/x.html"), "https://a.jp/articles/x.html");
        assert_eq!(image_url("https://a.jp", "https://cdn.jp/i.png", "../"), "https://cdn.jp/i.png");
        assert_eq!(
            image_url("https://a.jp", "../assets/images/i.png", "../"),
            "https://a.jp/assets/images/i.png"
        );
        assert_eq!(
            image_url("https://a.jp", "../../assets/i.png", "../../"),
            "https://a.jp/assets/i.png"
        );
    }
}
