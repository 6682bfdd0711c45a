//! Markdown rendering and frontmatter parsing for kiji articles.
//!
//! Article bodies are plain Markdown. Files handed to the CLI may carry a YAML
//! frontmatter block with the article metadata.

pub mod frontmatter;
pub mod render;

pub use frontmatter::{ArticleFrontmatter, FrontmatterError};
pub use render::{parse_article, render_markdown, ParsedArticle};
