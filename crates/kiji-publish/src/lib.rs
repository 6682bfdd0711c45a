//! Article generation pipeline for a static site.
//!
//! Takes article metadata and a Markdown body, writes a new article page from
//! the site's article template and adds a card for it to the listing page.

pub mod compose;
pub mod escape;
pub mod images;
pub mod input;
pub mod listing;
pub mod publisher;
pub mod scaffold;
pub mod slug;
pub mod templates;

pub use compose::{compose, Anchor, ArticleFields, MissingAnchor, SiteMeta};
pub use input::{is_valid_date, ArticleInput, ImageSource, ValidationError};
pub use listing::{splice, ListingCard, GRID_MARKER};
pub use publisher::{PublishError, Published, Publisher, PublisherConfig};
pub use slug::{derive_slug, SlugPolicy};
