//! Configuration file (kiji.toml).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use kiji_publish::{PublisherConfig, SlugPolicy};
use kiji_server::ServerConfig;
use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub site: SiteSection,
    #[serde(default)]
    pub slug: SlugSection,
    #[serde(default)]
    pub server: ServerSection,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteSection {
    pub root: PathBuf,
    /// Scheme and host used for og:url and og:image
    pub origin: String,
    pub name: String,
    pub template: String,
    pub listing: String,
    pub articles_dir: String,
    pub images_dir: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        let defaults = PublisherConfig::default();
        Self {
            root: defaults.root,
            origin: defaults.site_origin,
            name: defaults.site_name,
            template: defaults.template,
            listing: defaults.listing,
            articles_dir: defaults.articles_dir,
            images_dir: defaults.images_dir,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct SlugSection {
    /// Unset means each front end picks its own default.
    pub title_policy: Option<SlugPolicy>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
    pub body_limit: usize,
}

impl Default for ServerSection {
    fn default() -> Self {
        let defaults = ServerConfig::default();
        Self {
            host: defaults.host,
            port: defaults.port,
            body_limit: defaults.body_limit,
        }
    }
}

impl ConfigFile {
    /// Publisher settings, with `root` overriding the configured site root.
    pub fn publisher(&self, root: Option<PathBuf>, default_policy: SlugPolicy) -> PublisherConfig {
        PublisherConfig {
            root: root.unwrap_or_else(|| self.site.root.clone()),
            template: self.site.template.clone(),
            listing: self.site.listing.clone(),
            articles_dir: self.site.articles_dir.clone(),
            images_dir: self.site.images_dir.clone(),
            site_origin: self.site.origin.clone(),
            site_name: self.site.name.clone(),
            title_policy: self.slug.title_policy.unwrap_or(default_policy),
        }
    }

    pub fn server(&self) -> ServerConfig {
        ServerConfig {
            host: self.server.host.clone(),
            port: self.server.port,
            body_limit: self.server.body_limit,
            open: false,
        }
    }
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        tracing::debug!("No {} found, using defaults", path.display());
        return Ok(ConfigFile::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config = parse_config(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    tracing::info!("Loaded config from {}", path.display());
    Ok(config)
}

fn parse_config(content: &str) -> Result<ConfigFile> {
    Ok(toml::from_str(content)?)
}

pub const DEFAULT_CONFIG: &str = r#"# kiji configuration

[site]
# Site root; all other paths are relative to it
root = "."

# Used to build absolute og:url and og:image links
origin = "http://localhost:3000"

# Appended to every article title
name = "AIライター協会"

template = "article_templete.html"
listing = "column.html"
articles_dir = "articles"
images_dir = "assets/images"

[slug]
# "unicode" keeps letters from any script, "ascii" keeps only [a-z0-9-].
# Unset: the server uses "unicode", `kiji new` uses "ascii".
# title_policy = "ascii"

[server]
host = "127.0.0.1"
port = 3000
# Largest accepted request body, in bytes
body_limit = 10485760
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn empty_file_uses_defaults() {
        let config = parse_config("").unwrap();

        let publisher = config.publisher(None, SlugPolicy::Ascii);
        assert_eq!(publisher.root, PathBuf::from("."));
        assert_eq!(publisher.template, "article_templete.html");
        assert_eq!(publisher.title_policy, SlugPolicy::Ascii);
        assert_eq!(config.server().port, 3000);
    }

    #[test]
    fn default_config_round_trips() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();

        assert_eq!(config.slug.title_policy, None);
        assert_eq!(config.server.body_limit, 10 * 1024 * 1024);
        assert_eq!(config.site.name, "AIライター協会");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = parse_config(
            r#"
[site]
origin = "https://example.com"

[slug]
title_policy = "ascii"

[server]
port = 8080
"#,
        )
        .unwrap();

        let publisher = config.publisher(Some(PathBuf::from("site")), SlugPolicy::Unicode);
        assert_eq!(publisher.root, PathBuf::from("site"));
        assert_eq!(publisher.site_origin, "https://example.com");
        assert_eq!(publisher.listing, "column.html");
        assert_eq!(publisher.title_policy, SlugPolicy::Ascii);

        let server = config.server();
        assert_eq!(server.port, 8080);
        assert_eq!(server.host, "127.0.0.1");
    }

    #[test]
    fn rejects_unknown_policy() {
        assert!(parse_config("[slug]\ntitle_policy = \"emoji\"\n").is_err());
    }

    #[test]
    fn missing_file_is_default() {
        let temp = tempdir().unwrap();

        let config = load_config(&temp.path().join("kiji.toml")).unwrap();

        assert!(config.slug.title_policy.is_none());
    }

    #[test]
    fn malformed_file_is_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("kiji.toml");
        fs::write(&path, "[server\nport = ").unwrap();

        let err = load_config(&path).unwrap_err();

        assert!(err.to_string().contains("Failed to parse"));
    }
}
