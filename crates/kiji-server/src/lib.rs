//! HTTP front end for publishing kiji articles.
//!
//! Accepts the article form on `POST /api/articles` and serves the site's
//! static files for everything else.

pub mod api;
pub mod server;

pub use api::{ApiError, ArticleForm, ArticleSubmission};
pub use server::{router, PublishServer, ServerConfig, ServerError, ServerState};
