//! Typed client for the portfolio REST API.

use std::time::Duration;

use aidy_core::media::parse_media_field;
use aidy_core::types::DbId;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::ClientError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// A project as the client reads it.
///
/// `media` is kept as raw JSON: older rows and some proxies deliver it as a
/// JSON-encoded string rather than an array. Use [`media_urls`](Self::media_urls).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProjectView {
    pub id: DbId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub media: Value,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub category_id: Option<DbId>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl ProjectView {
    /// Ordered media URLs, falling back to `image_url`.
    pub fn media_urls(&self) -> Vec<String> {
        parse_media_field(&self.media, self.image_url.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryView {
    pub id: DbId,
    pub name: String,
}

/// Body of a project create or full-replacement update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectInput {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub media_urls: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Thin wrapper over `reqwest` bound to one API root.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// `base_url` is the API root including `/api`, e.g. `http://localhost:5000/api`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{path}", self.base_url))
    }

    // --- Projects ---

    pub async fn list_projects(&self) -> Result<Vec<ProjectView>, ClientError> {
        decode(self.request(Method::GET, "/projects").send().await?).await
    }

    pub async fn get_project(&self, id: DbId) -> Result<ProjectView, ClientError> {
        decode(self.request(Method::GET, &format!("/projects/{id}")).send().await?).await
    }

    pub async fn create_project(&self, input: &ProjectInput) -> Result<ProjectView, ClientError> {
        let response = self.request(Method::POST, "/projects").json(input).send().await?;
        decode(response).await
    }

    pub async fn update_project(
        &self,
        id: DbId,
        input: &ProjectInput,
    ) -> Result<ProjectView, ClientError> {
        let response = self
            .request(Method::PUT, &format!("/projects/{id}"))
            .json(input)
            .send()
            .await?;
        decode(response).await
    }

    /// Returns the server's confirmation message.
    pub async fn delete_project(&self, id: DbId) -> Result<String, ClientError> {
        let response = self.request(Method::DELETE, &format!("/projects/{id}")).send().await?;
        decode::<MessageBody>(response).await.map(|b| b.message)
    }

    // --- Categories ---

    pub async fn list_categories(&self) -> Result<Vec<CategoryView>, ClientError> {
        decode(self.request(Method::GET, "/categories").send().await?).await
    }

    pub async fn create_category(&self, name: &str) -> Result<CategoryView, ClientError> {
        let response = self
            .request(Method::POST, "/categories")
            .json(&json!({ "name": name }))
            .send()
            .await?;
        decode(response).await
    }

    pub async fn rename_category(&self, id: DbId, name: &str) -> Result<CategoryView, ClientError> {
        let response = self
            .request(Method::PUT, &format!("/categories/{id}"))
            .json(&json!({ "name": name }))
            .send()
            .await?;
        decode(response).await
    }

    /// Returns the server's confirmation message.
    pub async fn delete_category(&self, id: DbId) -> Result<String, ClientError> {
        let response = self
            .request(Method::DELETE, &format!("/categories/{id}"))
            .send()
            .await?;
        decode::<MessageBody>(response).await.map(|b| b.message)
    }
}

/// Decode a 2xx body as `T`, or turn an error status into [`ClientError::Api`].
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if !status.is_success() {
        let message = serde_json::from_slice::<ErrorBody>(&bytes)
            .map(|b| b.error)
            .unwrap_or_else(|_| format!("Request failed with status {}", status.as_u16()));
        tracing::debug!(status = status.as_u16(), %message, "API request rejected");
        return Err(ClientError::Api {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
}
