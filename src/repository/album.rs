use std::sync::Arc;

use crate::api::CatalogApi;
use crate::models::{Album, CreateAlbumRequest, CreateTrackRequest, Track};
use crate::resource::ResourceStream;

use super::{fetch_list, fetch_one, submit};

#[derive(Clone)]
pub struct AlbumRepository {
    api: Arc<dyn CatalogApi>,
}

impl AlbumRepository {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        Self { api }
    }

    pub fn albums(&self) -> ResourceStream<Vec<Album>> {
        let api = Arc::clone(&self.api);
        fetch_list("fetching albums", async move { api.albums().await })
    }

    pub fn album(&self, id: i64) -> ResourceStream<Album> {
        let api = Arc::clone(&self.api);
        fetch_one(format!("fetching album {id}"), async move { api.album(id).await })
    }

    pub fn create_album(&self, request: CreateAlbumRequest) -> ResourceStream<Album> {
        let api = Arc::clone(&self.api);
        submit("creating album", async move {
            api.create_album(&request).await
        })
    }

    pub fn add_track(&self, album_id: i64, request: CreateTrackRequest) -> ResourceStream<Track> {
        let api = Arc::clone(&self.api);
        submit(format!("adding track to album {album_id}"), async move {
            api.add_track(album_id, &request).await
        })
    }
}
