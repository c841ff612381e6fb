use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use shared::{
    domain::RecordId,
    error::{ConsoleError, ServerErrorBody},
    protocol::{CollectionResponse, DetailResponse, StatusUpdateRequest},
};
use tracing::debug;
use url::Url;

pub mod controller;
pub mod dashboard;
pub mod detail;
pub mod editor;
pub mod filter;
pub mod paginator;
pub mod property_form;
pub mod session;
pub mod store;
pub mod summary;
pub mod view_config;

pub use controller::{Notice, NoticeKind, RowView, TableController, TableView, ViewEvent};
pub use property_form::{ImageAttachment, PropertyDraft, PropertySubmission};
pub use session::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, SessionGate};
pub use view_config::{Column, DetailSource, ViewConfig, PAGE_SIZE};

pub const DEFAULT_API_BASE_URL: &str = "https://roombuddy-api.onrender.com/api";

/// The opaque remote service behind every list view.
#[async_trait]
pub trait RemoteService: Send + Sync {
    async fn fetch_collection(&self, view: &ViewConfig)
        -> Result<CollectionResponse, ConsoleError>;
    async fn fetch_detail(&self, view: &ViewConfig, key: &str)
        -> Result<DetailResponse, ConsoleError>;
    async fn update_status(
        &self,
        view: &ViewConfig,
        id: &RecordId,
        status: &str,
    ) -> Result<(), ConsoleError>;
    async fn create_property(&self, submission: PropertySubmission) -> Result<(), ConsoleError>;
}

pub struct HttpRemoteService {
    http: Client,
    base_url: Url,
}

impl HttpRemoteService {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, None)
    }

    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let base_url = Url::parse(base_url.trim())
            .with_context(|| format!("invalid api base url '{base_url}'"))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("api base url '{base_url}' cannot carry path segments"));
        }
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("failed to build http client")?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

fn transport_error(err: reqwest::Error) -> ConsoleError {
    if err.is_decode() {
        ConsoleError::Decode(err.to_string())
    } else {
        ConsoleError::Network(err.to_string())
    }
}

/// Maps non-2xx responses to `ServerError`, preferring the body's `message`.
async fn ensure_success(response: Response) -> Result<Response, ConsoleError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ServerErrorBody>(&body)
        .ok()
        .and_then(|body| body.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });
    Err(ConsoleError::server(status.as_u16(), message))
}

#[async_trait]
impl RemoteService for HttpRemoteService {
    async fn fetch_collection(
        &self,
        view: &ViewConfig,
    ) -> Result<CollectionResponse, ConsoleError> {
        let url = self.endpoint(&[view.collection_path]);
        debug!(%url, kind = %view.kind, "fetching collection");
        let response = self.http.get(url).send().await.map_err(transport_error)?;
        ensure_success(response)
            .await?
            .json()
            .await
            .map_err(transport_error)
    }

    async fn fetch_detail(
        &self,
        view: &ViewConfig,
        key: &str,
    ) -> Result<DetailResponse, ConsoleError> {
        let url = self.endpoint(&[view.collection_path, key]);
        debug!(%url, kind = %view.kind, "fetching detail");
        let response = self.http.get(url).send().await.map_err(transport_error)?;
        ensure_success(response)
            .await?
            .json()
            .await
            .map_err(transport_error)
    }

    async fn update_status(
        &self,
        view: &ViewConfig,
        id: &RecordId,
        status: &str,
    ) -> Result<(), ConsoleError> {
        let url = self.endpoint(&[view.collection_path, id.as_str(), "status"]);
        debug!(%url, kind = %view.kind, status, "updating status");
        let response = self
            .http
            .put(url)
            .json(&StatusUpdateRequest {
                status: status.to_string(),
            })
            .send()
            .await
            .map_err(transport_error)?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn create_property(&self, submission: PropertySubmission) -> Result<(), ConsoleError> {
        let view = ViewConfig::for_kind(shared::domain::RecordKind::PropertyListing);
        let url = self.endpoint(&[view.collection_path]);
        debug!(%url, images = submission.images.len(), "submitting property");
        let form = submission.into_multipart()?;
        let response = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;
        ensure_success(response).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
