use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::models::Collector;
use crate::profiling::Profiler;
use crate::repository::CollectorRepository;
use crate::resource::Resource;

use super::{RequestTokens, drive, profiled, reduce_fetch};

const COLLECTOR_LIST_STORY: &str = "HU05 - Browse collectors";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectorUiState {
    pub collectors: Vec<Collector>,
    pub selected_collector: Option<Collector>,
    pub is_loading: bool,
    pub error_message: Option<String>,
}

impl CollectorUiState {
    pub fn with_collectors(mut self, resource: Resource<Vec<Collector>>) -> Self {
        if let Some(collectors) =
            reduce_fetch(resource, &mut self.is_loading, &mut self.error_message)
        {
            self.collectors = collectors;
        }
        self
    }

    pub fn with_selected_collector(mut self, resource: Resource<Collector>) -> Self {
        if let Some(collector) = reduce_fetch(resource, &mut self.is_loading, &mut self.error_message) {
            self.selected_collector = Some(collector);
        }
        self
    }
}

#[derive(Clone)]
pub struct CollectorViewModel {
    repository: CollectorRepository,
    profiler: Option<Profiler>,
    state: Arc<watch::Sender<CollectorUiState>>,
    list_requests: RequestTokens,
    detail_requests: RequestTokens,
}

impl CollectorViewModel {
    pub fn new(repository: CollectorRepository, profiler: Option<Profiler>) -> Self {
        let (state, _) = watch::channel(CollectorUiState::default());
        Self {
            repository,
            profiler,
            state: Arc::new(state),
            list_requests: RequestTokens::default(),
            detail_requests: RequestTokens::default(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<CollectorUiState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> CollectorUiState {
        self.state.borrow().clone()
    }

    pub fn load_collectors(&self) -> JoinHandle<()> {
        let ticket = self.list_requests.issue();
        let stream = self.repository.collectors();
        let state = Arc::clone(&self.state);
        let profiler = self.profiler.clone();

        debug!(request = ticket.value, "loading collectors");
        tokio::spawn(async move {
            let run = drive(stream, ticket, &*state, CollectorUiState::with_collectors);
            profiled(profiler.as_ref(), COLLECTOR_LIST_STORY, run).await;
        })
    }

    pub fn load_collector(&self, id: i64) -> JoinHandle<()> {
        let ticket = self.detail_requests.issue();
        let stream = self.repository.collector(id);
        let state = Arc::clone(&self.state);

        debug!(request = ticket.value, id, "loading collector");
        tokio::spawn(async move {
            drive(stream, ticket, &*state, CollectorUiState::with_selected_collector).await;
        })
    }

    pub fn clear_error(&self) {
        self.state
            .send_if_modified(|current| current.error_message.take().is_some());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{FakeApi, Reply};
    use crate::models::{Album, CollectorAlbum};
    use crate::profiling::MetricsSink;

    fn collector(id: i64, name: &str) -> Collector {
        Collector {
            id,
            name: name.to_string(),
            collector_albums: vec![
                CollectorAlbum {
                    id: 7,
                    price: 1000,
                    status: "ok".to_string(),
                },
                CollectorAlbum {
                    id: 99,
                    price: 50,
                    status: "Inactive".to_string(),
                },
            ],
            ..Collector::default()
        }
    }

    #[tokio::test]
    async fn detail_resolves_owned_album_names() {
        let api = Arc::new(FakeApi::default().with_collector(1, Reply::ok(collector(1, "Manolo"))));
        let vm = CollectorViewModel::new(CollectorRepository::new(api), None);

        vm.load_collector(1).await.unwrap();

        let selected = vm.state().selected_collector.unwrap();
        let albums = vec![Album {
            id: 7,
            name: "Load".to_string(),
            ..Album::default()
        }];
        let names: Vec<_> = selected
            .collector_albums
            .iter()
            .map(|owned| owned.display_name(&albums))
            .collect();
        assert_eq!(names, vec!["Load", "Álbum ID: 99"]);
    }

    #[tokio::test]
    async fn unknown_collector_keeps_selection_and_reports() {
        let api = Arc::new(FakeApi::default().with_collector(1, Reply::ok(collector(1, "Manolo"))));
        let vm = CollectorViewModel::new(CollectorRepository::new(api), None);

        vm.load_collector(1).await.unwrap();
        vm.load_collector(2).await.unwrap();

        let state = vm.state();
        assert_eq!(state.selected_collector.map(|c| c.id), Some(1));
        assert_eq!(
            state.error_message.as_deref(),
            Some("fetching collector 2 failed: 404 Not Found")
        );
    }

    #[tokio::test]
    async fn collector_list_is_profiled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.csv");
        let api = Arc::new(
            FakeApi::default().with_collectors(Reply::ok(vec![collector(1, "Manolo")])),
        );
        let vm = CollectorViewModel::new(
            CollectorRepository::new(api),
            Some(Profiler::with_host_probe(MetricsSink::new(&path))),
        );

        vm.load_collectors().await.unwrap();

        assert_eq!(vm.state().collectors.len(), 1);
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.lines().nth(1).unwrap().contains(COLLECTOR_LIST_STORY));
    }
}
