//! Transport boundary: the backend endpoints the repositories consume.

pub mod http;

#[cfg(test)]
pub(crate) mod fake;

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

use crate::models::{
    Album, Artist, Collector, CreateAlbumRequest, CreateTrackRequest, Track,
};

pub use http::HttpCatalogApi;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("failed to parse response: {0}")]
    Decode(String),
    #[error("invalid endpoint url: {0}")]
    InvalidUrl(String),
}

/// Status and optional decoded body of one backend call.
///
/// Non-success responses never carry a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse<T> {
    pub status: StatusCode,
    pub body: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn new(status: StatusCode, body: Option<T>) -> Self {
        Self { status, body }
    }

    pub fn ok(body: T) -> Self {
        Self::new(StatusCode::OK, Some(body))
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;

#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// `GET /albums`
    async fn albums(&self) -> ApiResult<Vec<Album>>;

    /// `GET /albums/{id}`
    async fn album(&self, id: i64) -> ApiResult<Album>;

    /// `POST /albums`
    async fn create_album(&self, request: &CreateAlbumRequest) -> ApiResult<Album>;

    /// `POST /albums/{album_id}/tracks`
    async fn add_track(&self, album_id: i64, request: &CreateTrackRequest) -> ApiResult<Track>;

    /// `GET /musicians`
    async fn artists(&self) -> ApiResult<Vec<Artist>>;

    /// `GET /musicians/{id}`
    async fn artist(&self, id: i64) -> ApiResult<Artist>;

    /// `GET /collectors`
    async fn collectors(&self) -> ApiResult<Vec<Collector>>;

    /// `GET /collectors/{id}`
    async fn collector(&self, id: i64) -> ApiResult<Collector>;
}
