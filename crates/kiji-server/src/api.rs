//! Article form endpoint.

use std::sync::Arc;

use axum::{
    extract::{FromRequest, Multipart, Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use kiji_publish::{ArticleInput, ImageSource, PublishError};
use serde::{Deserialize, Serialize};

use crate::server::ServerState;

const CREATED_MESSAGE: &str = "記事が正常に作成されました。";
const SERVER_ERROR_MESSAGE: &str = "サーバーエラーが発生しました。";

/// Article form fields as submitted by a browser or script.
///
/// Every field is optional at this layer so missing values surface as the
/// publisher's validation messages rather than deserializer errors.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleForm {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
    pub image_path: Option<String>,
    pub content: Option<String>,
}

impl ArticleForm {
    pub fn into_input(self) -> ArticleInput {
        ArticleInput {
            title: self.title.unwrap_or_default(),
            slug_override: self.slug,
            date: self.date.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            image: self
                .image_path
                .filter(|p| !p.trim().is_empty())
                .map(ImageSource::Path),
            body_markdown: self.content.unwrap_or_default(),
        }
    }

    fn set(&mut self, name: &str, value: String) {
        match name {
            "title" => self.title = Some(value),
            "slug" => self.slug = Some(value),
            "date" => self.date = Some(value),
            "description" => self.description = Some(value),
            "imagePath" => self.image_path = Some(value),
            "content" => self.content = Some(value),
            other => tracing::debug!("Ignoring form field {}", other),
        }
    }
}

/// An article submission decoded from multipart, urlencoded or JSON bodies.
#[derive(Debug)]
pub struct ArticleSubmission(pub ArticleInput);

impl<S> FromRequest<S> for ArticleSubmission
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let input = if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            read_multipart(multipart).await?
        } else if content_type.starts_with("application/json") {
            let Json(form) = Json::<ArticleForm>::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            form.into_input()
        } else {
            let Form(form) = Form::<ArticleForm>::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            form.into_input()
        };

        Ok(Self(input))
    }
}

/// Collect form fields and the optional `image` upload from a multipart body.
///
/// An uploaded file takes precedence over `imagePath`. Browsers send an empty
/// part when no file was chosen; that counts as no upload.
async fn read_multipart(mut multipart: Multipart) -> Result<ArticleInput, ApiError> {
    let mut form = ArticleForm::default();
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "image" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            if !bytes.is_empty() {
                upload = Some(ImageSource::Upload {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        form.set(&name, value);
    }

    let mut input = form.into_input();
    if upload.is_some() {
        input.image = upload;
    }
    Ok(input)
}

/// Body of a successful publish.
#[derive(Debug, Serialize)]
pub struct CreatedBody {
    pub message: &'static str,
    #[serde(rename = "filePath")]
    pub file_path: String,
}

/// Body of every error response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

/// Errors returned by the API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Publish(#[from] PublishError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            Self::Publish(e) if e.is_validation() => (StatusCode::BAD_REQUEST, e.to_string()),
            other => {
                tracing::error!("Error creating article: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    SERVER_ERROR_MESSAGE.to_string(),
                )
            }
        };

        (status, Json(ErrorBody { message })).into_response()
    }
}

/// Handler for `POST /api/articles`.
pub async fn create_article(
    State(state): State<Arc<ServerState>>,
    ArticleSubmission(input): ArticleSubmission,
) -> Result<(StatusCode, Json<CreatedBody>), ApiError> {
    let guard = Arc::clone(&state.publish_lock).lock_owned().await;

    let publisher = Arc::clone(&state.publisher);
    let published = tokio::task::spawn_blocking(move || {
        let _guard = guard;
        publisher.publish(&input)
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))??;

    tracing::info!("Published {}", published.public_path);

    Ok((
        StatusCode::CREATED,
        Json(CreatedBody {
            message: CREATED_MESSAGE,
            file_path: published.public_path,
        }),
    ))
}

/// Handler for `GET /health`.
pub async fn health() -> &'static str {
    "ok"
}
