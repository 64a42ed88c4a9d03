use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Track {
    pub id: i64,
    pub name: String,
    /// `MM:SS`
    pub duration: String,
}

impl Default for Track {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            duration: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Album {
    pub id: i64,
    pub name: String,
    pub cover: String,
    pub release_date: String,
    pub description: String,
    pub genre: String,
    pub record_label: Option<String>,
    pub tracks: Vec<Track>,
}

impl Default for Album {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            cover: String::new(),
            release_date: String::new(),
            description: String::new(),
            genre: String::new(),
            record_label: None,
            tracks: Vec::new(),
        }
    }
}

impl Album {
    /// Release year taken from the ISO date prefix, if the backend sent one.
    pub fn release_year(&self) -> Option<i32> {
        self.release_date.get(..4)?.parse().ok()
    }

    pub fn record_label_label(&self) -> &str {
        self.record_label.as_deref().unwrap_or("Unknown")
    }

    pub fn as_track_listing_lines(&self) -> Vec<String> {
        self.tracks
            .iter()
            .enumerate()
            .map(|(idx, track)| {
                let index = idx + 1;
                if track.duration.is_empty() {
                    format!("{index}. {}", track.name)
                } else {
                    format!("{index}. {} ({})", track.name, track.duration)
                }
            })
            .collect()
    }
}

/// Body of `POST /albums`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlbumRequest {
    pub name: String,
    pub cover: String,
    pub release_date: String,
    pub description: String,
    pub genre: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_label: Option<String>,
}

impl CreateAlbumRequest {
    /// Checks every field and reports all of the invalid ones at once.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::default();

        if self.name.trim().is_empty() {
            errors.push("name", "is required");
        } else if exceeds(&self.name, NAME_MAX_CHARS) {
            errors.push("name", "must be at most 100 characters");
        }

        if self.cover.trim().is_empty() {
            errors.push("cover", "is required");
        } else if exceeds(&self.cover, COVER_MAX_CHARS) {
            errors.push("cover", "must be at most 500 characters");
        } else if !is_http_url(&self.cover) {
            errors.push("cover", "must start with http:// or https://");
        }

        if self.release_date.trim().is_empty() {
            errors.push("releaseDate", "is required");
        } else if NaiveDate::parse_from_str(&self.release_date, "%Y-%m-%d").is_err() {
            errors.push("releaseDate", "must be a YYYY-MM-DD date");
        }

        if self.genre.trim().is_empty() {
            errors.push("genre", "is required");
        } else if exceeds(&self.genre, GENRE_MAX_CHARS) {
            errors.push("genre", "must be at most 50 characters");
        }

        if self
            .record_label
            .as_deref()
            .is_some_and(|label| exceeds(label, RECORD_LABEL_MAX_CHARS))
        {
            errors.push("recordLabel", "must be at most 100 characters");
        }

        if self.description.trim().is_empty() {
            errors.push("description", "is required");
        } else if exceeds(&self.description, DESCRIPTION_MAX_CHARS) {
            errors.push("description", "must be at most 500 characters");
        }

        errors.into_result()
    }
}

/// Body of `POST /albums/{id}/tracks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateTrackRequest {
    pub name: String,
    pub duration: String,
}

impl CreateTrackRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::default();

        if self.name.trim().is_empty() {
            errors.push("name", "is required");
        } else if exceeds(&self.name, TRACK_NAME_MAX_CHARS) {
            errors.push("name", "must be at most 100 characters");
        }

        if !is_track_duration(&self.duration) {
            errors.push("duration", "must look like MM:SS");
        }

        errors.into_result()
    }
}

const NAME_MAX_CHARS: usize = 100;
const COVER_MAX_CHARS: usize = 500;
const GENRE_MAX_CHARS: usize = 50;
const RECORD_LABEL_MAX_CHARS: usize = 100;
const DESCRIPTION_MAX_CHARS: usize = 500;
const TRACK_NAME_MAX_CHARS: usize = 100;

/// Limits count characters, not bytes.
fn exceeds(value: &str, max: usize) -> bool {
    value.chars().count() > max
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// One or two minute digits, a colon, exactly two second digits up to 59.
fn is_track_duration(value: &str) -> bool {
    let Some((minutes, seconds)) = value.split_once(':') else {
        return false;
    };

    let all_digits = |part: &str| part.chars().all(|ch| ch.is_ascii_digit());

    (1..=2).contains(&minutes.len())
        && seconds.len() == 2
        && all_digits(minutes)
        && all_digits(seconds)
        && seconds.parse::<u8>().is_ok_and(|secs| secs < 60)
}
