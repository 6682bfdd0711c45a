//! Caller-supplied article fields and their validation.

use std::sync::LazyLock;

use regex::Regex;

/// Where the article's main image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// An existing image, referenced relative to the article file
    /// (e.g. `../assets/images/cover.png`).
    Path(String),

    /// An uploaded file to be stored under the site's images directory.
    Upload {
        /// File name as sent by the client (never used verbatim)
        file_name: String,
        /// Raw file contents
        bytes: Vec<u8>,
    },
}

/// Everything needed to publish one article.
#[derive(Debug, Clone, Default)]
pub struct ArticleInput {
    pub title: String,
    pub slug_override: Option<String>,
    /// Publication date, `YYYY.MM.DD`
    pub date: String,
    pub description: String,
    pub image: Option<ImageSource>,
    pub body_markdown: String,
}

/// Input that was rejected before any file was touched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Date must use the YYYY.MM.DD format, got {0:?}")]
    InvalidDate(String),

    #[error("Could not derive a file name from the title; please provide a slug")]
    EmptySlug,

    #[error("Unsupported image file: {0:?}")]
    UnsupportedImage(String),
}

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}\.[0-9]{2}\.[0-9]{2}$").expect("Invalid date regex"));

/// Check that a date string has the `YYYY.MM.DD` shape.
///
/// Only the shape is checked, not whether the day exists.
pub fn is_valid_date(date: &str) -> bool {
    DATE_RE.is_match(date)
}

/// Article fields after trimming and validation.
#[derive(Debug, Clone)]
pub(crate) struct ValidatedInput<'a> {
    pub title: &'a str,
    pub slug_override: Option<&'a str>,
    pub date: &'a str,
    pub description: &'a str,
    pub image: ValidatedImage<'a>,
    pub body_markdown: &'a str,
}

#[derive(Debug, Clone)]
pub(crate) enum ValidatedImage<'a> {
    Path(&'a str),
    Upload { file_name: &'a str, bytes: &'a [u8] },
}

impl ArticleInput {
    /// Check that every required field is present and well formed.
    pub(crate) fn validate(&self) -> Result<ValidatedInput<'_>, ValidationError> {
        let title = required("title", &self.title)?;
        let date = required("date", &self.date)?;
        let description = required("description", &self.description)?;
        let body_markdown = required("content", &self.body_markdown)?;

        let image = match &self.image {
            Some(ImageSource::Path(path)) => ValidatedImage::Path(required("imagePath", path)?),
            Some(ImageSource::Upload { file_name, bytes }) => {
                if bytes.is_empty() {
                    return Err(ValidationError::MissingField("image"));
                }
                ValidatedImage::Upload {
                    file_name: required("image", file_name)?,
                    bytes,
                }
            }
            None => return Err(ValidationError::MissingField("imagePath")),
        };

        if !is_valid_date(date) {
            return Err(ValidationError::InvalidDate(date.to_string()));
        }

        let slug_override = self
            .slug_override
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        Ok(ValidatedInput {
            title,
            slug_override,
            date,
            description,
            image,
            body_markdown,
        })
    }
}

fn required<'a>(name: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField(name))
    } else {
        Ok(trimmed)
    }
}
