use serde::{Deserialize, Serialize};

use super::album::Album;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Artist {
    pub id: i64,
    pub name: String,
    pub image: String,
    pub description: String,
    pub birth_date: Option<String>,
    pub albums: Option<Vec<Album>>,
}

impl Default for Artist {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            image: String::new(),
            description: String::new(),
            birth_date: None,
            albums: None,
        }
    }
}

impl Artist {
    pub fn albums(&self) -> &[Album] {
        self.albums.as_deref().unwrap_or_default()
    }

    /// Birth date without the time component the backend appends.
    pub fn birth_date_label(&self) -> Option<&str> {
        self.birth_date
            .as_deref()
            .map(|date| date.split_once('T').map_or(date, |(day, _)| day))
    }
}
