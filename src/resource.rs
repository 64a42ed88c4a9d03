use futures::stream::BoxStream;

/// Lifecycle of one asynchronous fetch.
///
/// A repository call yields `Loading` first and then exactly one terminal
/// variant, `Success` or `Error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource<T> {
    /// Fetch in flight, optionally carrying a previous snapshot.
    Loading(Option<T>),
    Success(T),
    /// Human readable failure description.
    Error(String),
}

impl<T> Resource<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Resource::Loading(_))
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_loading()
    }
}

pub type ResourceStream<T> = BoxStream<'static, Resource<T>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_loading_is_non_terminal() {
        assert!(Resource::<u8>::Loading(None).is_loading());
        assert!(!Resource::<u8>::Loading(Some(1)).is_terminal());
        assert!(Resource::Success(1).is_terminal());
        assert!(Resource::<u8>::Error("boom".to_string()).is_terminal());
    }
}
