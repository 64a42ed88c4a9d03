//! Scripted [`CatalogApi`] used by repository and view-model tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::models::{
    Album, Artist, Collector, CreateAlbumRequest, CreateTrackRequest, Track,
};

use super::{ApiError, ApiResponse, ApiResult, CatalogApi};

/// Canned outcome for one endpoint.
#[derive(Clone)]
pub(crate) enum Reply<T> {
    Respond(StatusCode, Option<T>),
    Fail(String),
}

impl<T> Reply<T> {
    pub(crate) fn ok(body: T) -> Self {
        Reply::Respond(StatusCode::OK, Some(body))
    }

    pub(crate) fn empty(status: StatusCode) -> Self {
        Reply::Respond(status, None)
    }

    fn into_result(self) -> ApiResult<T> {
        match self {
            Reply::Respond(status, body) => Ok(ApiResponse::new(status, body)),
            Reply::Fail(message) => Err(ApiError::Decode(message)),
        }
    }
}

struct Scripted<T> {
    reply: Reply<T>,
    delay: Duration,
}

impl<T: Clone> Scripted<T> {
    fn now(reply: Reply<T>) -> Self {
        Self {
            reply,
            delay: Duration::ZERO,
        }
    }

    async fn play(slot: &Mutex<Self>) -> ApiResult<T> {
        let (reply, delay) = {
            let scripted = slot.lock().unwrap();
            (scripted.reply.clone(), scripted.delay)
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        reply.into_result()
    }
}

fn lookup<T: Clone>(slot: &Mutex<HashMap<i64, Scripted<T>>>, id: i64) -> (Reply<T>, Duration) {
    let guard = slot.lock().unwrap();
    match guard.get(&id) {
        Some(scripted) => (scripted.reply.clone(), scripted.delay),
        None => (Reply::empty(StatusCode::NOT_FOUND), Duration::ZERO),
    }
}

/// Every endpoint defaults to an empty `200` list or a `404` entity until
/// scripted otherwise.
pub(crate) struct FakeApi {
    albums: Mutex<Reply<Vec<Album>>>,
    album: Mutex<HashMap<i64, Scripted<Album>>>,
    create_album: Mutex<Scripted<Album>>,
    add_track: Mutex<Scripted<Track>>,
    artists: Mutex<Reply<Vec<Artist>>>,
    artist: Mutex<HashMap<i64, Scripted<Artist>>>,
    collectors: Mutex<Reply<Vec<Collector>>>,
    collector: Mutex<HashMap<i64, Scripted<Collector>>>,
    pub(crate) created: Mutex<Vec<CreateAlbumRequest>>,
    pub(crate) tracks_added: Mutex<Vec<(i64, CreateTrackRequest)>>,
    pub(crate) album_list_calls: Mutex<usize>,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            albums: Mutex::new(Reply::ok(Vec::new())),
            album: Mutex::new(HashMap::new()),
            create_album: Mutex::new(Scripted::now(Reply::empty(
                StatusCode::INTERNAL_SERVER_ERROR,
            ))),
            add_track: Mutex::new(Scripted::now(Reply::empty(
                StatusCode::INTERNAL_SERVER_ERROR,
            ))),
            artists: Mutex::new(Reply::ok(Vec::new())),
            artist: Mutex::new(HashMap::new()),
            collectors: Mutex::new(Reply::ok(Vec::new())),
            collector: Mutex::new(HashMap::new()),
            created: Mutex::new(Vec::new()),
            tracks_added: Mutex::new(Vec::new()),
            album_list_calls: Mutex::new(0),
        }
    }
}

impl FakeApi {
    pub(crate) fn with_albums(self, reply: Reply<Vec<Album>>) -> Self {
        *self.albums.lock().unwrap() = reply;
        self
    }

    pub(crate) fn with_album(self, id: i64, reply: Reply<Album>) -> Self {
        self.with_delayed_album(id, reply, Duration::ZERO)
    }

    pub(crate) fn with_delayed_album(self, id: i64, reply: Reply<Album>, delay: Duration) -> Self {
        self.album
            .lock()
            .unwrap()
            .insert(id, Scripted { reply, delay });
        self
    }

    pub(crate) fn with_create_album(self, reply: Reply<Album>) -> Self {
        self.with_delayed_create_album(reply, Duration::ZERO)
    }

    pub(crate) fn with_delayed_create_album(self, reply: Reply<Album>, delay: Duration) -> Self {
        *self.create_album.lock().unwrap() = Scripted { reply, delay };
        self
    }

    pub(crate) fn with_add_track(self, reply: Reply<Track>) -> Self {
        self.with_delayed_add_track(reply, Duration::ZERO)
    }

    pub(crate) fn with_delayed_add_track(self, reply: Reply<Track>, delay: Duration) -> Self {
        *self.add_track.lock().unwrap() = Scripted { reply, delay };
        self
    }

    pub(crate) fn with_artists(self, reply: Reply<Vec<Artist>>) -> Self {
        *self.artists.lock().unwrap() = reply;
        self
    }

    pub(crate) fn with_artist(self, id: i64, reply: Reply<Artist>) -> Self {
        self.artist.lock().unwrap().insert(id, Scripted::now(reply));
        self
    }

    pub(crate) fn with_collectors(self, reply: Reply<Vec<Collector>>) -> Self {
        *self.collectors.lock().unwrap() = reply;
        self
    }

    pub(crate) fn with_collector(self, id: i64, reply: Reply<Collector>) -> Self {
        self.collector.lock().unwrap().insert(id, Scripted::now(reply));
        self
    }

    pub(crate) fn set_albums(&self, reply: Reply<Vec<Album>>) {
        *self.albums.lock().unwrap() = reply;
    }

    pub(crate) fn set_artists(&self, reply: Reply<Vec<Artist>>) {
        *self.artists.lock().unwrap() = reply;
    }
}

#[async_trait]
impl CatalogApi for FakeApi {
    async fn albums(&self) -> ApiResult<Vec<Album>> {
        *self.album_list_calls.lock().unwrap() += 1;
        let reply = self.albums.lock().unwrap().clone();
        reply.into_result()
    }

    async fn album(&self, id: i64) -> ApiResult<Album> {
        let (reply, delay) = lookup(&self.album, id);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        reply.into_result()
    }

    async fn create_album(&self, request: &CreateAlbumRequest) -> ApiResult<Album> {
        self.created.lock().unwrap().push(request.clone());
        Scripted::play(&self.create_album).await
    }

    async fn add_track(&self, album_id: i64, request: &CreateTrackRequest) -> ApiResult<Track> {
        self.tracks_added
            .lock()
            .unwrap()
            .push((album_id, request.clone()));
        Scripted::play(&self.add_track).await
    }

    async fn artists(&self) -> ApiResult<Vec<Artist>> {
        let reply = self.artists.lock().unwrap().clone();
        reply.into_result()
    }

    async fn artist(&self, id: i64) -> ApiResult<Artist> {
        lookup(&self.artist, id).0.into_result()
    }

    async fn collectors(&self) -> ApiResult<Vec<Collector>> {
        let reply = self.collectors.lock().unwrap().clone();
        reply.into_result()
    }

    async fn collector(&self, id: i64) -> ApiResult<Collector> {
        lookup(&self.collector, id).0.into_result()
    }
}
