use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::models::Artist;
use crate::repository::ArtistRepository;
use crate::resource::Resource;

use super::{RequestTokens, drive, reduce_fetch};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtistUiState {
    pub artists: Vec<Artist>,
    pub selected_artist: Option<Artist>,
    pub is_loading: bool,
    pub error_message: Option<String>,
}

impl ArtistUiState {
    pub fn with_artists(mut self, resource: Resource<Vec<Artist>>) -> Self {
        if let Some(artists) = reduce_fetch(resource, &mut self.is_loading, &mut self.error_message) {
            self.artists = artists;
        }
        self
    }

    pub fn with_selected_artist(mut self, resource: Resource<Artist>) -> Self {
        if let Some(artist) = reduce_fetch(resource, &mut self.is_loading, &mut self.error_message) {
            self.selected_artist = Some(artist);
        }
        self
    }
}

#[derive(Clone)]
pub struct ArtistViewModel {
    repository: ArtistRepository,
    state: Arc<watch::Sender<ArtistUiState>>,
    list_requests: RequestTokens,
    detail_requests: RequestTokens,
}

impl ArtistViewModel {
    pub fn new(repository: ArtistRepository) -> Self {
        let (state, _) = watch::channel(ArtistUiState::default());
        Self {
            repository,
            state: Arc::new(state),
            list_requests: RequestTokens::default(),
            detail_requests: RequestTokens::default(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ArtistUiState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> ArtistUiState {
        self.state.borrow().clone()
    }

    pub fn load_artists(&self) -> JoinHandle<()> {
        let ticket = self.list_requests.issue();
        let stream = self.repository.artists();
        let state = Arc::clone(&self.state);

        debug!(request = ticket.value, "loading artists");
        tokio::spawn(async move {
            drive(stream, ticket, &*state, ArtistUiState::with_artists).await;
        })
    }

    pub fn load_artist(&self, id: i64) -> JoinHandle<()> {
        let ticket = self.detail_requests.issue();
        let stream = self.repository.artist(id);
        let state = Arc::clone(&self.state);

        debug!(request = ticket.value, id, "loading artist");
        tokio::spawn(async move {
            drive(stream, ticket, &*state, ArtistUiState::with_selected_artist).await;
        })
    }

    pub fn clear_error(&self) {
        self.state
            .send_if_modified(|current| current.error_message.take().is_some());
    }
}
