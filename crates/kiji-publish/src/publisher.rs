//! Article publishing: the pipeline from form input to files on disk.

use std::fs;
use std::path::{Component, Path, PathBuf};

use kiji_markdown::render_markdown;

use crate::compose::{compose, ArticleFields, SiteMeta};
use crate::images::{sanitize_image_name, unique_image_path};
use crate::input::{ArticleInput, ValidatedImage, ValidationError};
use crate::listing::{splice, ListingCard};
use crate::slug::{derive_slug, SlugPolicy};
use crate::templates::TemplateEngine;

/// Configuration for publishing into a static site.
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    /// Site root directory
    pub root: PathBuf,

    /// Article template, relative to the root
    pub template: String,

    /// Listing page, relative to the root
    pub listing: String,

    /// Directory for article files, relative to the root
    pub articles_dir: String,

    /// Directory for uploaded images, relative to the root
    pub images_dir: String,

    /// Scheme and host for absolute URLs in social-preview tags
    pub site_origin: String,

    /// Site name appended to article titles
    pub site_name: String,

    /// Slug policy applied to titles when no override is given
    pub title_policy: SlugPolicy,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            // Matches the file name the existing site ships with.
            template: "article_templete.html".to_string(),
            listing: "column.html".to_string(),
            articles_dir: "articles".to_string(),
            images_dir: "assets/images".to_string(),
            site_origin: "http://localhost:3000".to_string(),
            site_name: "AIライター協会".to_string(),
            title_policy: SlugPolicy::Unicode,
        }
    }
}

impl PublisherConfig {
    pub fn template_path(&self) -> PathBuf {
        self.root.join(&self.template)
    }

    pub fn listing_path(&self) -> PathBuf {
        self.root.join(&self.listing)
    }

    pub fn articles_path(&self) -> PathBuf {
        self.root.join(&self.articles_dir)
    }

    pub fn images_path(&self) -> PathBuf {
        self.root.join(&self.images_dir)
    }

    fn site_meta(&self) -> SiteMeta {
        SiteMeta {
            name: self.site_name.clone(),
            origin: self.site_origin.clone(),
            listing_file: self.listing.clone(),
            root_prefix: self.articles_to_root(),
        }
    }

    /// Articles directory as a `/`-separated path relative to the root.
    fn articles_rel(&self) -> String {
        Path::new(&self.articles_dir)
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => part.to_str(),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Prefix that climbs from the articles directory back to the root.
    fn articles_to_root(&self) -> String {
        let depth = Path::new(&self.articles_dir)
            .components()
            .filter(|c| matches!(c, Component::Normal(_)))
            .count();
        "../".repeat(depth)
    }
}

/// Result of a successful publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    /// Article slug (file stem)
    pub slug: String,

    /// Article file on disk
    pub article_path: PathBuf,

    /// Site-absolute URL path, e.g. `/articles/foo.html`
    pub public_path: String,

    /// Stored upload, if the image was uploaded
    pub image_path: Option<PathBuf>,
}

/// Errors that can occur while publishing.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{anchor} anchor not found in {file}")]
    AnchorNotFound { anchor: &'static str, file: String },

    #[error("Failed to read {path}: {message}")]
    ReadError { path: String, message: String },

    #[error("Failed to write {path}: {message}")]
    WriteError { path: String, message: String },

    #[error("Failed to render listing card: {0}")]
    TemplateError(String),

    #[error("Article {article} was written but the listing page was not updated: {message}")]
    ListingNotUpdated { article: String, message: String },
}

impl PublishError {
    /// Whether the caller can fix this by changing the input.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Runs the publish pipeline against one site.
///
/// Every call reads the template and listing page fresh from disk. Nothing
/// guards the listing page against other processes doing the same
/// read-modify-write at the same time; the later write wins.
pub struct Publisher {
    config: PublisherConfig,
    templates: TemplateEngine,
}

impl Publisher {
    /// Create a new publisher.
    pub fn new(config: PublisherConfig) -> Self {
        Self {
            config,
            templates: TemplateEngine::new(),
        }
    }

    pub fn config(&self) -> &PublisherConfig {
        &self.config
    }

    /// Publish one article.
    ///
    /// All reading, rendering and splicing happens before the first write, so
    /// invalid input or a drifted template leaves the site untouched. Files are
    /// then written in order: uploaded image, article, listing page. An upload
    /// is removed again if the article cannot be written.
    pub fn publish(&self, input: &ArticleInput) -> Result<Published, PublishError> {
        let valid = input.validate()?;
        let slug = derive_slug(valid.title, valid.slug_override, self.config.title_policy)?;

        let file_name = format!("{}.html", slug);
        let article_rel = match self.config.articles_rel() {
            dir if dir.is_empty() => file_name.clone(),
            dir => format!("{}/{}", dir, file_name),
        };
        let article_path = self.config.articles_path().join(&file_name);

        let content_html = render_markdown(valid.body_markdown);

        let (image_ref, upload) = match valid.image {
            ValidatedImage::Path(path) => (path.to_string(), None),
            ValidatedImage::Upload {
                file_name: upload_name,
                bytes,
            } => {
                let name = sanitize_image_name(upload_name)?;
                let dest = unique_image_path(&self.config.images_path(), &name);
                let stored = dest
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or(&name)
                    .to_string();
                let image_ref = format!(
                    "{}{}/{}",
                    self.config.articles_to_root(),
                    self.config.images_dir.trim_end_matches('/'),
                    stored
                );
                (image_ref, Some((dest, bytes)))
            }
        };

        let template_path = self.config.template_path();
        let template = read_file(&template_path)?;

        let fields = ArticleFields {
            title: valid.title,
            date: valid.date,
            description: valid.description,
            image: &image_ref,
            content_html: &content_html,
            article_path: &article_rel,
        };
        let article_html = compose(&template, &fields, &self.config.site_meta()).map_err(|e| {
            PublishError::AnchorNotFound {
                anchor: e.0,
                file: template_path.display().to_string(),
            }
        })?;

        let listing_path = self.config.listing_path();
        let listing_html = read_file(&listing_path)?;

        let card = ListingCard::new(
            valid.title,
            valid.date,
            valid.description,
            &article_rel,
            &image_ref,
            &self.config.articles_to_root(),
        );
        let card_html = self
            .templates
            .render_card(&card)
            .map_err(|e| PublishError::TemplateError(e.to_string()))?;
        let updated_listing =
            splice(&listing_html, &card_html).map_err(|e| PublishError::AnchorNotFound {
                anchor: e.0,
                file: listing_path.display().to_string(),
            })?;

        let image_path = match upload {
            Some((dest, bytes)) => {
                write_file(&dest, bytes)?;
                tracing::info!("Stored uploaded image {}", dest.display());
                Some(dest)
            }
            None => None,
        };

        if article_path.exists() {
            tracing::warn!("Overwriting existing article {}", article_path.display());
        }
        if let Err(e) = write_file(&article_path, article_html.as_bytes()) {
            if let Some(image) = &image_path {
                match fs::remove_file(image) {
                    Ok(()) => tracing::info!("Removed uploaded image {}", image.display()),
                    Err(remove_err) => tracing::error!(
                        "Uploaded image {} left behind: {}",
                        image.display(),
                        remove_err
                    ),
                }
            }
            return Err(e);
        }
        tracing::info!("Wrote article {}", article_path.display());

        if let Err(e) = fs::write(&listing_path, updated_listing) {
            tracing::error!(
                "Listing page {} not updated, {} is unlisted: {}",
                listing_path.display(),
                article_path.display(),
                e
            );
            return Err(PublishError::ListingNotUpdated {
                article: article_path.display().to_string(),
                message: e.to_string(),
            });
        }
        tracing::info!("Updated listing page {}", listing_path.display());

        Ok(Published {
            slug,
            article_path,
            public_path: format!("/{}", article_rel),
            image_path,
        })
    }
}

fn read_file(path: &Path) -> Result<String, PublishError> {
    fs::read_to_string(path).map_err(|e| PublishError::ReadError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), PublishError> {
    let write_error = |e: std::io::Error| PublishError::WriteError {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    fs::write(path, contents).map_err(write_error)
}
