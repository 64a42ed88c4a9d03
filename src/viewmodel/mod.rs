//! State holders: one per screen, each owning a UI-state snapshot that is
//! published through a `watch` channel and rebuilt from every [`Resource`]
//! a repository yields.

mod album;
mod artist;
mod collector;

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::StreamExt;
use tokio::sync::watch;
use tracing::debug;

use crate::profiling::Profiler;
use crate::resource::{Resource, ResourceStream};

pub use album::{AlbumUiState, AlbumViewModel};
pub use artist::{ArtistUiState, ArtistViewModel};
pub use collector::{CollectorUiState, CollectorViewModel};

/// Monotonic request counter for one trigger family.
#[derive(Clone, Debug, Default)]
struct RequestTokens(Arc<AtomicU64>);

impl RequestTokens {
    fn issue(&self) -> Ticket {
        let value = self.0.fetch_add(1, Ordering::SeqCst) + 1;
        Ticket {
            latest: Arc::clone(&self.0),
            value,
        }
    }
}

#[derive(Debug)]
struct Ticket {
    latest: Arc<AtomicU64>,
    value: u64,
}

impl Ticket {
    fn is_current(&self) -> bool {
        self.latest.load(Ordering::SeqCst) == self.value
    }
}

/// Loading / error bookkeeping shared by every fetch. Hands the payload back
/// on success so the caller can place it in its target field.
fn reduce_fetch<T>(
    resource: Resource<T>,
    is_loading: &mut bool,
    error_message: &mut Option<String>,
) -> Option<T> {
    match resource {
        Resource::Loading(_) => {
            *is_loading = true;
            *error_message = None;
            None
        }
        Resource::Success(data) => {
            *is_loading = false;
            *error_message = None;
            Some(data)
        }
        Resource::Error(message) => {
            *is_loading = false;
            *error_message = Some(message);
            None
        }
    }
}

/// Drains `stream` to completion, publishing `reduce(snapshot, resource)` for
/// every resource while `ticket` is still the newest request of its family.
/// Resources of a superseded request are dropped.
///
/// Returns whether the stream ended in `Success`.
async fn drive<S, T, F>(
    mut stream: ResourceStream<T>,
    ticket: Ticket,
    state: &watch::Sender<S>,
    mut reduce: F,
) -> bool
where
    S: Clone,
    F: FnMut(S, Resource<T>) -> S,
{
    let mut succeeded = false;

    while let Some(resource) = stream.next().await {
        succeeded = matches!(resource, Resource::Success(_));

        let applied = state.send_if_modified(|current| {
            if !ticket.is_current() {
                return false;
            }
            *current = reduce(current.clone(), resource);
            true
        });

        if !applied {
            debug!(request = ticket.value, "dropping result of superseded request");
        }
    }

    succeeded
}

async fn profiled<F>(profiler: Option<&Profiler>, user_story: &str, operation: F) -> F::Output
where
    F: Future,
{
    match profiler {
        Some(profiler) => profiler.profile(user_story, operation).await,
        None => operation.await,
    }
}

#[cfg(test)]
mod tests {
    use futures::stream;

    use super::*;

    #[test]
    fn tokens_supersede_older_tickets() {
        let tokens = RequestTokens::default();
        let first = tokens.issue();
        assert!(first.is_current());

        let second = tokens.issue();
        assert!(!first.is_current());
        assert!(second.is_current());
    }

    #[test]
    fn reduce_fetch_follows_the_rules() {
        let mut is_loading = false;
        let mut error = Some("old".to_string());

        assert_eq!(reduce_fetch(Resource::<u8>::Loading(None), &mut is_loading, &mut error), None);
        assert!(is_loading);
        assert_eq!(error, None);

        assert_eq!(
            reduce_fetch(Resource::<u8>::Error("boom".to_string()), &mut is_loading, &mut error),
            None
        );
        assert!(!is_loading);
        assert_eq!(error.as_deref(), Some("boom"));

        assert_eq!(reduce_fetch(Resource::Success(3u8), &mut is_loading, &mut error), Some(3));
        assert!(!is_loading);
        assert_eq!(error, None);
    }

    #[tokio::test]
    async fn stale_ticket_is_drained_but_not_applied() {
        let (state, _) = watch::channel(0u32);
        let tokens = RequestTokens::default();
        let stale = tokens.issue();
        let _newer = tokens.issue();

        let resources = stream::iter(vec![Resource::Loading(None), Resource::Success(5u32)]).boxed();
        let succeeded = drive(resources, stale, &state, |_, resource| match resource {
            Resource::Success(value) => value,
            _ => 1,
        })
        .await;

        assert!(succeeded);
        assert_eq!(*state.borrow(), 0);
    }
}
