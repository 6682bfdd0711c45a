//! Storage of uploaded article images.

use std::path::{Path, PathBuf};

use crate::input::ValidationError;
use crate::slug::{sanitize, SlugPolicy};

/// Extensions accepted for uploaded images.
const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "avif", "svg"];

/// Turn a client-supplied file name into a safe one.
///
/// Directory components are dropped, the stem is slugified and the extension
/// must be a known image type. A stem that slugifies to nothing becomes `image`.
pub fn sanitize_image_name(original: &str) -> Result<String, ValidationError> {
    let unsupported = || ValidationError::UnsupportedImage(original.to_string());

    // Clients on Windows send backslash-separated paths.
    let base = original
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(original)
        .trim();

    let (stem, ext) = base.rsplit_once('.').ok_or_else(unsupported)?;
    let ext = ext.to_ascii_lowercase();
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(unsupported());
    }

    let stem = sanitize(stem, SlugPolicy::Ascii);
    let stem = if stem.is_empty() { "image".to_string() } else { stem };

    Ok(format!("{}.{}", stem, ext))
}

/// Pick a path in `dir` for `name` that does not exist yet.
///
/// `photo.png` becomes `photo-2.png`, `photo-3.png`, ... when taken.
pub fn unique_image_path(dir: &Path, name: &str) -> PathBuf {
    let candidate = dir.join(name);
    if !candidate.exists() {
        return candidate;
    }

    let (stem, ext) = name.rsplit_once('.').unwrap_or((name, ""));
    (2..)
        .map(|n| {
            if ext.is_empty() {
                dir.join(format!("{}-{}", stem, n))
            } else {
                dir.join(format!("{}-{}.{}", stem, n, ext))
            }
        })
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn keeps_simple_names() {
        assert_eq!(sanitize_image_name("cover.png").unwrap(), "cover.png");
        assert_eq!(sanitize_image_name("My Photo.JPEG").unwrap(), "my-photo.jpeg");
    }

    #[test]
    fn strips_directories() {
        assert_eq!(sanitize_image_name("../../etc/passwd.png").unwrap(), "passwd.png");
        assert_eq!(sanitize_image_name(r"C:\Users\me\shot.webp").unwrap(), "shot.webp");
        assert_eq!(sanitize_image_name("/abs/path/a.gif").unwrap(), "a.gif");
    }

    #[test]
    fn falls_back_for_non_ascii_stems() {
        assert_eq!(sanitize_image_name("表紙.png").unwrap(), "image.png");
        assert_eq!(sanitize_image_name("..png").unwrap(), "image.png");
    }

    #[test]
    fn rejects_unknown_types() {
        for name in ["script.js", "noext", "archive.tar.gz", "page.html", "../.."] {
            assert!(
                matches!(
                    sanitize_image_name(name),
                    Err(ValidationError::UnsupportedImage(_))
                ),
                "{name:?}"
            );
        }
    }

    #[test]
    fn avoids_collisions() {
        let temp = tempdir().unwrap();

        let first = unique_image_path(temp.path(), "a.png");
        assert_eq!(first, temp.path().join("a.png"));
        fs::write(&first, b"1").unwrap();

        let second = unique_image_path(temp.path(), "a.png");
        assert_eq!(second, temp.path().join("a-2.png"));
        fs::write(&second, b"2").unwrap();

        assert_eq!(unique_image_path(temp.path(), "a.png"), temp.path().join("a-3.png"));
    }
}
