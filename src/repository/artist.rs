use std::sync::Arc;

use crate::api::CatalogApi;
use crate::models::Artist;
use crate::resource::ResourceStream;

use super::{fetch_list, fetch_one};

#[derive(Clone)]
pub struct ArtistRepository {
    api: Arc<dyn CatalogApi>,
}

impl ArtistRepository {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        Self { api }
    }

    pub fn artists(&self) -> ResourceStream<Vec<Artist>> {
        let api = Arc::clone(&self.api);
        fetch_list("fetching artists", async move { api.artists().await })
    }

    pub fn artist(&self, id: i64) -> ResourceStream<Artist> {
        let api = Arc::clone(&self.api);
        fetch_one(format!("fetching artist {id}"), async move { api.artist(id).await })
    }
}
