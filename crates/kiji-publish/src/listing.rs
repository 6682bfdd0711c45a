//! Listing page updates.

use serde::Serialize;

use crate::compose::MissingAnchor;

/// Opening tag of the card grid. New cards go right after it, so the newest
/// publish is always first.
pub const GRID_MARKER: &str = r#"<div class="grid md:grid-cols-2 lg:grid-cols-3 gap-8">"#;

/// Values shown on an article's listing card.
#[derive(Debug, Clone, Serialize)]
pub struct ListingCard {
    pub title: String,
    pub date: String,
    pub description: String,
    /// Link to the article, relative to the listing page
    pub href: String,
    /// Image path, relative to the listing page
    pub thumbnail: String,
}

impl ListingCard {
    /// Build a card linking to `article_path`, relative to the site root.
    ///
    /// `image` is the reference used inside the article and `root_prefix` the
    /// climb from the article back to the root (`../` for `articles/`).
    pub fn new(
        title: &str,
        date: &str,
        description: &str,
        article_path: &str,
        image: &str,
        root_prefix: &str,
    ) -> Self {
        Self {
            title: title.to_string(),
            date: date.to_string(),
            description: description.to_string(),
            href: article_path.to_string(),
            thumbnail: thumbnail_path(image, root_prefix).to_string(),
        }
    }
}

/// Resolve an article-relative image reference against the site root.
pub fn thumbnail_path<'a>(image: &'a str, root_prefix: &str) -> &'a str {
    if root_prefix.is_empty() {
        return image;
    }
    image.strip_prefix(root_prefix).unwrap_or(image)
}

/// Insert `card_html` right after the first grid marker in `listing_html`.
///
/// Everything outside the insertion point is kept byte for byte.
pub fn splice(listing_html: &str, card_html: &str) -> Result<String, MissingAnchor> {
    let Some(pos) = listing_html.find(GRID_MARKER) else {
        return Err(MissingAnchor("listing grid"));
    };
    let insertion_point = pos + GRID_MARKER.len();

    let mut updated = String::with_capacity(listing_html.len() + card_html.len());
    updated.push_str(&listing_html[..insertion_point]);
    updated.push_str(card_html);
    updated.push_str(&listing_html[insertion_point..]);

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAGE: &str = r#"<main>
    <div class="grid md:grid-cols-2 lg:grid-cols-3 gap-8">
        <div>old card</div>
    </div>
</main>"#;

    #[test]
    fn inserts_right_after_marker() {
        let updated = splice(PAGE, "<div>new</div>").unwrap();

        assert_eq!(
            updated,
            r#"<main>
    <div class="grid md:grid-cols-2 lg:grid-cols-3 gap-8"><div>new</div>
        <div>old card</div>
    </div>
</main>"#
        );
    }

    #[test]
    fn keeps_surrounding_bytes() {
        let card = "<div>new</div>";
        let updated = splice(PAGE, card).unwrap();
        let split = PAGE.find(GRID_MARKER).unwrap() + GRID_MARKER.len();

        assert_eq!(&updated[..split], &PAGE[..split]);
        assert_eq!(&updated[split..split + card.len()], card);
        assert_eq!(&updated[split + card.len()..], &PAGE[split..]);
    }

    #[test]
    fn newest_card_comes_first() {
        let once = splice(PAGE, "<div>first</div>").unwrap();
        let twice = splice(&once, "<div>second</div>").unwrap();

        let second = twice.find("second").unwrap();
        let first = twice.find("first").unwrap();
        assert!(second < first);
    }

    #[test]
    fn uses_first_marker_only() {
        let page = format!("{GRID_MARKER}a</div>{GRID_MARKER}b</div>");

        let updated = splice(&page, "X").unwrap();

        assert_eq!(updated, format!("{GRID_MARKER}Xa</div>{GRID_MARKER}b</div>"));
    }

    #[test]
    fn fails_without_marker() {
        let page = r#"<div class="grid gap-8"></div>"#;

        assert_eq!(splice(page, "<div>new</div>"), Err(MissingAnchor("listing grid")));
    }

    #[test]
    fn strips_one_parent_segment() {
        assert_eq!(thumbnail_path("../assets/images/a.png", "../"), "assets/images/a.png");
        assert_eq!(thumbnail_path("../../shared/a.png", "../"), "../shared/a.png");
        assert_eq!(thumbnail_path("assets/images/a.png", "../"), "assets/images/a.png");
        assert_eq!(
            thumbnail_path("https://cdn.example/a.png", "../"),
            "https://cdn.example/a.png"
        );
    }

    #[test]
    fn strips_prefix_for_nested_article_dirs() {
        assert_eq!(thumbnail_path("../../assets/a.png", "../../"), "assets/a.png");
        assert_eq!(thumbnail_path("../assets/a.png", "../../"), "../assets/a.png");
    }

    #[test]
    fn card_links_to_article_path() {
        let card = ListingCard::new("T", "2024.01.01", "D", "posts/t.html", "../assets/a.png", "../");

        assert_eq!(card.href, "posts/t.html");
        assert_eq!(card.thumbnail, "assets/a.png");
    }
}
