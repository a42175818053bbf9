//! HTTP client for the external vehicles REST resource.
//!
//! Four calls against one resource-scoped set of endpoints:
//! `GET /{resource}`, `POST /{resource}`, `PUT /{resource}/{id}` and
//! `DELETE /{resource}/{id}`. Non-success responses become
//! [`ApiError::Status`] carrying the body's `message` field when present.
//!
pub mod backend;

use reqwest::{Client, RequestBuilder, Response, Url};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::{ExternalVehicle, VehiclePayload};

/// Failure of a single API call.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ApiError {
    #[error("server responded {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Status { status: u16, message: Option<String> },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Text shown to the user: the server's message verbatim when it sent
    /// one, otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Status {
                message: Some(m), ..
            } if !m.trim().is_empty() => m.clone(),
            _ => fallback.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

/// The four operations the UI can perform, used for fallback messages.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    Fetch,
    Add,
    Update,
    Delete,
}

impl Operation {
    pub fn fallback_message(self) -> &'static str {
        match self {
            Operation::Fetch => "Failed to fetch external vehicles",
            Operation::Add => "Failed to add external vehicle",
            Operation::Update => "Failed to update external vehicle",
            Operation::Delete => "Failed to delete external vehicle",
        }
    }

    pub fn success_message(self) -> &'static str {
        match self {
            Operation::Fetch => "External vehicles loaded",
            Operation::Add => "External vehicle added successfully",
            Operation::Update => "External vehicle updated successfully",
            Operation::Delete => "External vehicle deleted successfully",
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListBody {
    Bare(Vec<ExternalVehicle>),
    Wrapped { data: Vec<ExternalVehicle> },
}

/// Typed client bound to one base URL and resource path.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    resource: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: Url, resource: impl Into<String>, token: Option<String>) -> Self {
        Self::with_client(Client::new(), base_url, resource, token)
    }

    /// Use a preconfigured `reqwest::Client` (proxies, TLS roots, timeouts).
    pub fn with_client(
        http: Client,
        base_url: Url,
        resource: impl Into<String>,
        token: Option<String>,
    ) -> Self {
        Self {
            http,
            base_url,
            resource: resource.into(),
            token: token.filter(|t| !t.is_empty()),
        }
    }

    /// URL of the collection, with `id` appended as an escaped path segment.
    pub fn resource_url(&self, id: Option<&str>) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                ApiError::Transport(format!("base url cannot hold a path: {}", self.base_url))
            })?;
            segments.pop_if_empty();
            for part in self.resource.split('/').filter(|p| !p.is_empty()) {
                segments.push(part);
            }
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    pub async fn list(&self) -> Result<Vec<ExternalVehicle>, ApiError> {
        let url = self.resource_url(None)?;
        debug!(%url, "GET external vehicles");
        let res = check(self.authorized(self.http.get(url)).send().await?).await?;
        let body: ListBody = res.json().await?;
        Ok(match body {
            ListBody::Bare(items) | ListBody::Wrapped { data: items } => items,
        })
    }

    pub async fn create(&self, payload: &VehiclePayload) -> Result<(), ApiError> {
        let url = self.resource_url(None)?;
        debug!(%url, reg_number = %payload.reg_number, "POST external vehicle");
        check(self.authorized(self.http.post(url)).json(payload).send().await?).await?;
        Ok(())
    }

    pub async fn update(&self, id: &str, payload: &VehiclePayload) -> Result<(), ApiError> {
        let url = self.resource_url(Some(id))?;
        debug!(%url, "PUT external vehicle");
        check(self.authorized(self.http.put(url)).json(payload).send().await?).await?;
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let url = self.resource_url(Some(id))?;
        debug!(%url, "DELETE external vehicle");
        check(self.authorized(self.http.delete(url)).send().await?).await?;
        Ok(())
    }
}

/// Pass successful responses through; turn anything else into `ApiError::Status`.
async fn check(res: Response) -> Result<Response, ApiError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let text = res.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|b| b.message);
    warn!(status = status.as_u16(), ?message, "api request rejected");
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}
