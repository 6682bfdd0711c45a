//! Slug derivation for article file names.

use serde::Deserialize;

use crate::input::ValidationError;

/// Which characters survive slug sanitization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlugPolicy {
    /// Only `[a-z0-9-]`.
    Ascii,
    /// Letters and numbers from any script, plus `-` and `_`.
    #[default]
    Unicode,
}

impl SlugPolicy {
    fn keeps(self, c: char) -> bool {
        match self {
            Self::Ascii => c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-',
            Self::Unicode => c.is_alphanumeric() || c == '-' || c == '_',
        }
    }
}

/// Sanitize text into a slug under the given policy.
///
/// Lowercases, turns each whitespace run into a hyphen, drops every character
/// the policy does not keep, then collapses hyphen runs and trims hyphens from
/// both ends. The result may be empty.
pub fn sanitize(text: &str, policy: SlugPolicy) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_whitespace = false;

    for c in text.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push('-');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;

        if policy.keeps(c) {
            out.push(c);
        }
    }

    out.split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Derive the slug for an article.
///
/// An override that survives ASCII sanitization wins, since it is a file name
/// somebody picked on purpose. Otherwise the title is sanitized with
/// `title_policy`. An empty result is a validation failure.
pub fn derive_slug(
    title: &str,
    slug_override: Option<&str>,
    title_policy: SlugPolicy,
) -> Result<String, ValidationError> {
    if let Some(raw) = slug_override {
        let slug = sanitize(raw, SlugPolicy::Ascii);
        if !slug.is_empty() {
            return Ok(slug);
        }
        tracing::debug!("Slug override {:?} is empty after sanitization, using title", raw);
    }

    let slug = sanitize(title, title_policy);
    if slug.is_empty() {
        return Err(ValidationError::EmptySlug);
    }

    Ok(slug)
}
