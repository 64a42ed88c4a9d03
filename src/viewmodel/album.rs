use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::models::{Album, CreateAlbumRequest, CreateTrackRequest, Track, ValidationError};
use crate::profiling::Profiler;
use crate::repository::AlbumRepository;
use crate::resource::Resource;

use super::{RequestTokens, drive, profiled, reduce_fetch};

const ALBUM_LIST_STORY: &str = "HU01 - Browse album catalog";
const ALBUM_DETAIL_STORY: &str = "HU02 - View album detail";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlbumUiState {
    pub albums: Vec<Album>,
    pub selected_album: Option<Album>,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub is_creating_album: bool,
    pub album_created: bool,
    pub is_adding_track: bool,
    pub track_added: bool,
}

impl AlbumUiState {
    pub fn with_albums(mut self, resource: Resource<Vec<Album>>) -> Self {
        if let Some(albums) = reduce_fetch(resource, &mut self.is_loading, &mut self.error_message) {
            self.albums = albums;
        }
        self
    }

    pub fn with_selected_album(mut self, resource: Resource<Album>) -> Self {
        if let Some(album) = reduce_fetch(resource, &mut self.is_loading, &mut self.error_message) {
            self.selected_album = Some(album);
        }
        self
    }

    /// A created album becomes the selection so follow-up writes (tracks)
    /// know its id.
    pub fn with_created_album(self, resource: Resource<Album>) -> Self {
        match resource {
            Resource::Loading(_) => Self {
                is_creating_album: true,
                album_created: false,
                error_message: None,
                ..self
            },
            Resource::Success(album) => Self {
                is_creating_album: false,
                album_created: true,
                error_message: None,
                selected_album: Some(album),
                ..self
            },
            Resource::Error(message) => Self {
                is_creating_album: false,
                album_created: false,
                error_message: Some(message),
                ..self
            },
        }
    }

    /// On success the track is appended to the selected album when it is the
    /// album the track was added to.
    pub fn with_added_track(self, album_id: i64, resource: Resource<Track>) -> Self {
        match resource {
            Resource::Loading(_) => Self {
                is_adding_track: true,
                track_added: false,
                error_message: None,
                ..self
            },
            Resource::Success(track) => {
                let selected_album = self.selected_album.map(|album| {
                    if album.id == album_id {
                        let mut tracks = album.tracks;
                        tracks.push(track);
                        Album { tracks, ..album }
                    } else {
                        album
                    }
                });

                Self {
                    is_adding_track: false,
                    track_added: true,
                    error_message: None,
                    selected_album,
                    ..self
                }
            }
            Resource::Error(message) => Self {
                is_adding_track: false,
                track_added: false,
                error_message: Some(message),
                ..self
            },
        }
    }
}

/// State holder for the album list, album detail and album creation screens.
#[derive(Clone)]
pub struct AlbumViewModel {
    repository: AlbumRepository,
    profiler: Option<Profiler>,
    state: Arc<watch::Sender<AlbumUiState>>,
    list_requests: RequestTokens,
    detail_requests: RequestTokens,
    create_requests: RequestTokens,
    track_requests: RequestTokens,
}

impl AlbumViewModel {
    pub fn new(repository: AlbumRepository, profiler: Option<Profiler>) -> Self {
        let (state, _) = watch::channel(AlbumUiState::default());
        Self {
            repository,
            profiler,
            state: Arc::new(state),
            list_requests: RequestTokens::default(),
            detail_requests: RequestTokens::default(),
            create_requests: RequestTokens::default(),
            track_requests: RequestTokens::default(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<AlbumUiState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> AlbumUiState {
        self.state.borrow().clone()
    }

    pub fn load_albums(&self) -> JoinHandle<()> {
        let ticket = self.list_requests.issue();
        let stream = self.repository.albums();
        let state = Arc::clone(&self.state);
        let profiler = self.profiler.clone();

        debug!(request = ticket.value, "loading albums");
        tokio::spawn(async move {
            let run = drive(stream, ticket, &*state, AlbumUiState::with_albums);
            profiled(profiler.as_ref(), ALBUM_LIST_STORY, run).await;
        })
    }

    pub fn load_album(&self, id: i64) -> JoinHandle<()> {
        let ticket = self.detail_requests.issue();
        let stream = self.repository.album(id);
        let state = Arc::clone(&self.state);
        let profiler = self.profiler.clone();

        debug!(request = ticket.value, id, "loading album");
        tokio::spawn(async move {
            let run = drive(stream, ticket, &*state, AlbumUiState::with_selected_album);
            profiled(profiler.as_ref(), ALBUM_DETAIL_STORY, run).await;
        })
    }

    /// Creates the album and, once the backend confirms it, refreshes the
    /// album list in the background. The returned handle completes when the
    /// creation does; the refresh is not awaited.
    pub fn create_album(&self, request: CreateAlbumRequest) -> Result<JoinHandle<()>, ValidationError> {
        request.validate()?;

        let ticket = self.create_requests.issue();
        let stream = self.repository.create_album(request);
        let this = self.clone();

        debug!(request = ticket.value, "creating album");
        Ok(tokio::spawn(async move {
            let created = drive(stream, ticket, &*this.state, AlbumUiState::with_created_album).await;
            if created {
                this.load_albums();
            }
        }))
    }

    pub fn add_track(
        &self,
        album_id: i64,
        request: CreateTrackRequest,
    ) -> Result<JoinHandle<()>, ValidationError> {
        request.validate()?;

        let ticket = self.track_requests.issue();
        let stream = self.repository.add_track(album_id, request);
        let state = Arc::clone(&self.state);

        debug!(request = ticket.value, album_id, "adding track");
        Ok(tokio::spawn(async move {
            drive(stream, ticket, &*state, move |current, resource| {
                current.with_added_track(album_id, resource)
            })
            .await;
        }))
    }

    pub fn clear_error(&self) {
        self.state
            .send_if_modified(|current| current.error_message.take().is_some());
    }

    pub fn clear_album_created(&self) {
        self.state
            .send_if_modified(|current| std::mem::take(&mut current.album_created));
    }

    pub fn clear_track_added(&self) {
        self.state
            .send_if_modified(|current| std::mem::take(&mut current.track_added));
    }
}
