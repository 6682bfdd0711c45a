//! Frontmatter extraction and parsing.

use serde::Deserialize;

/// Article metadata declared at the top of a Markdown file.
///
/// Every key is optional here. The CLI prompts for whatever is missing and the
/// publisher validates the final set.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ArticleFrontmatter {
    /// Article title
    #[serde(default)]
    pub title: Option<String>,

    /// Publication date (`YYYY.MM.DD`)
    #[serde(default)]
    pub date: Option<String>,

    /// Summary used in meta tags and on the listing card
    #[serde(default)]
    pub description: Option<String>,

    /// Main image reference, relative to the article file
    #[serde(default)]
    pub image: Option<String>,

    /// Custom slug override
    #[serde(default)]
    pub slug: Option<String>,
}

/// Extract frontmatter from a Markdown article.
///
/// Returns the parsed frontmatter and the remaining content after the frontmatter block.
pub fn extract_frontmatter(
    source: &str,
) -> Result<(Option<ArticleFrontmatter>, &str), FrontmatterError> {
    let trimmed = source.trim_start();

    if !trimmed.starts_with("---") {
        return Ok((None, source));
    }

    let after_open = &trimmed[3..];
    let Some(close_pos) = after_open.find("\n---") else {
        return Err(FrontmatterError::Unclosed);
    };

    let yaml_content = after_open[..close_pos].trim();
    let remaining = &after_open[close_pos + 4..];

    // An empty block is legal and means "no metadata".
    if yaml_content.is_empty() {
        return Ok((Some(ArticleFrontmatter::default()), remaining.trim_start()));
    }

    let frontmatter: ArticleFrontmatter = serde_yaml::from_str(yaml_content)
        .map_err(|e| FrontmatterError::InvalidYaml(e.to_string()))?;

    Ok((Some(frontmatter), remaining.trim_start()))
}

/// Errors that can occur when parsing frontmatter.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    #[error("Unclosed frontmatter block - missing closing ---")]
    Unclosed,

    #[error("Invalid YAML in frontmatter: {0}")]
    InvalidYaml(String),
}
