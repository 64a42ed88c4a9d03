use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, Url, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::AppConfig;
use crate::models::{
    Album, Artist, Collector, CreateAlbumRequest, CreateTrackRequest, Track,
};

use super::{ApiError, ApiResponse, ApiResult, CatalogApi};

/// reqwest-backed [`CatalogApi`] for the Vinilos REST backend.
#[derive(Clone)]
pub struct HttpCatalogApi {
    http: Client,
    base_url: Url,
}

impl HttpCatalogApi {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            "X-Client-Id",
            header::HeaderValue::from_str(config.client_id())
                .context("invalid client identifier header value")?,
        );

        let http = Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent())
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .context("unable to construct http client")?;

        Ok(Self {
            http,
            base_url: config.parsed_base_url()?,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|err| ApiError::InvalidUrl(err.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let url = self.endpoint(path)?;
        debug!(%url, "GET");
        let response = self.http.get(url).send().await?;
        read_response(response).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        debug!(%url, "POST");
        let response = self.http.post(url).json(body).send().await?;
        read_response(response).await
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogApi {
    async fn albums(&self) -> ApiResult<Vec<Album>> {
        self.get("albums").await
    }

    async fn album(&self, id: i64) -> ApiResult<Album> {
        self.get(&format!("albums/{id}")).await
    }

    async fn create_album(&self, request: &CreateAlbumRequest) -> ApiResult<Album> {
        self.post("albums", request).await
    }

    async fn add_track(&self, album_id: i64, request: &CreateTrackRequest) -> ApiResult<Track> {
        self.post(&format!("albums/{album_id}/tracks"), request).await
    }

    async fn artists(&self) -> ApiResult<Vec<Artist>> {
        self.get("musicians").await
    }

    async fn artist(&self, id: i64) -> ApiResult<Artist> {
        self.get(&format!("musicians/{id}")).await
    }

    async fn collectors(&self) -> ApiResult<Vec<Collector>> {
        self.get("collectors").await
    }

    async fn collector(&self, id: i64) -> ApiResult<Collector> {
        self.get(&format!("collectors/{id}")).await
    }
}

async fn read_response<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let status = response.status();
    debug!(%status, url = %response.url(), "response");

    if !status.is_success() {
        return Ok(ApiResponse::new(status, None));
    }

    let bytes = response.bytes().await?;
    let body = decode_body(&bytes)?;
    Ok(ApiResponse::new(status, body))
}

/// An empty body or a JSON `null` decodes to `None`.
fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<Option<T>, ApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    serde_json::from_slice::<Option<T>>(bytes).map_err(|err| ApiError::Decode(err.to_string()))
}
