pub mod album;
pub mod artist;
pub mod collector;

use std::fmt;

use thiserror::Error;

pub use album::{Album, CreateAlbumRequest, CreateTrackRequest, Track};
pub use artist::Artist;
pub use collector::{Collector, CollectorAlbum, CollectorComment, FavoritePerformer};

/// A rejected field and the reason it was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub reason: &'static str,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.reason)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("invalid input: {}", join_errors(.errors))]
pub struct ValidationError {
    errors: Vec<FieldError>,
}

impl ValidationError {
    pub(crate) fn push(&mut self, field: &'static str, reason: &'static str) {
        self.errors.push(FieldError { field, reason });
    }

    pub(crate) fn into_result(self) -> Result<(), Self> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.errors.iter().map(|error| error.field)
    }
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
