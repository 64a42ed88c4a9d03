//! Repositories translate one transport call into a [`ResourceStream`].
//!
//! Every stream yields `Loading(None)` and then exactly one terminal
//! resource. Transport failures are converted into `Resource::Error` here and
//! never reach the state holders as errors.

mod album;
mod artist;
mod collector;

use std::future::Future;

use futures::{StreamExt, future, stream};
use reqwest::StatusCode;
use thiserror::Error;
use tracing::warn;

use crate::api::ApiResult;
use crate::resource::{Resource, ResourceStream};

pub use album::AlbumRepository;
pub use artist::ArtistRepository;
pub use collector::CollectorRepository;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("connection error: {0}")]
    Connection(String),
    #[error("{operation} failed: {status}")]
    Status {
        operation: String,
        status: StatusCode,
    },
    #[error("not found")]
    NotFound,
    #[error("{operation} failed: empty response")]
    EmptyResponse { operation: String },
}

/// Decides what a success status without a body means for one call.
type OnMissing<T> = fn(&str) -> Result<T, FetchError>;

fn resolve<T>(outcome: ApiResult<T>, operation: &str, on_missing: OnMissing<T>) -> Result<T, FetchError> {
    let response = outcome.map_err(|err| FetchError::Connection(err.to_string()))?;

    if !response.is_success() {
        return Err(FetchError::Status {
            operation: operation.to_string(),
            status: response.status,
        });
    }

    match response.body {
        Some(body) => Ok(body),
        None => on_missing(operation),
    }
}

/// The request future is only polled after `Loading` has been yielded.
fn fetch<T, Fut>(operation: String, request: Fut, on_missing: OnMissing<T>) -> ResourceStream<T>
where
    T: Send + 'static,
    Fut: Future<Output = ApiResult<T>> + Send + 'static,
{
    let terminal = async move {
        match resolve(request.await, &operation, on_missing) {
            Ok(data) => Resource::Success(data),
            Err(err) => {
                warn!(%operation, error = %err, "request failed");
                Resource::Error(err.to_string())
            }
        }
    };

    stream::once(future::ready(Resource::Loading(None)))
        .chain(stream::once(terminal))
        .boxed()
}

/// Collection endpoint: an absent body is an empty collection.
fn fetch_list<T, Fut>(operation: impl Into<String>, request: Fut) -> ResourceStream<Vec<T>>
where
    T: Send + 'static,
    Fut: Future<Output = ApiResult<Vec<T>>> + Send + 'static,
{
    fetch(operation.into(), request, |_| Ok(Vec::new()))
}

/// Single entity endpoint: an absent body means the entity does not exist.
fn fetch_one<T, Fut>(operation: impl Into<String>, request: Fut) -> ResourceStream<T>
where
    T: Send + 'static,
    Fut: Future<Output = ApiResult<T>> + Send + 'static,
{
    fetch(operation.into(), request, |_| Err(FetchError::NotFound))
}

/// Write endpoint: the backend must echo the created entity back.
fn submit<T, Fut>(operation: impl Into<String>, request: Fut) -> ResourceStream<T>
where
    T: Send + 'static,
    Fut: Future<Output = ApiResult<T>> + Send + 'static,
{
    fetch(operation.into(), request, |operation| {
        Err(FetchError::EmptyResponse {
            operation: operation.to_string(),
        })
    })
}
