use std::sync::Arc;

use crate::api::CatalogApi;
use crate::models::Collector;
use crate::resource::ResourceStream;

use super::{fetch_list, fetch_one};

#[derive(Clone)]
pub struct CollectorRepository {
    api: Arc<dyn CatalogApi>,
}

impl CollectorRepository {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        Self { api }
    }

    pub fn collectors(&self) -> ResourceStream<Vec<Collector>> {
        let api = Arc::clone(&self.api);
        fetch_list("fetching collectors", async move { api.collectors().await })
    }

    pub fn collector(&self, id: i64) -> ResourceStream<Collector> {
        let api = Arc::clone(&self.api);
        fetch_one(format!("fetching collector {id}"), async move {
            api.collector(id).await
        })
    }
}
