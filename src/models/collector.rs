use serde::{Deserialize, Serialize};

use super::album::Album;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorComment {
    pub id: i64,
    pub description: String,
    pub rating: i32,
}

impl Default for CollectorComment {
    fn default() -> Self {
        Self {
            id: 0,
            description: String::new(),
            rating: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FavoritePerformer {
    pub id: i64,
    pub name: String,
    pub image: String,
    pub description: String,
    pub birth_date: Option<String>,
}

impl Default for FavoritePerformer {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            image: String::new(),
            description: String::new(),
            birth_date: None,
        }
    }
}

/// An album owned by a collector, referenced by album id only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorAlbum {
    pub id: i64,
    pub price: i64,
    pub status: String,
}

impl Default for CollectorAlbum {
    fn default() -> Self {
        Self {
            id: 0,
            price: 0,
            status: String::new(),
        }
    }
}

impl CollectorAlbum {
    /// Resolves the album name against an independently fetched album list.
    /// There is no referential guarantee, so unmatched ids get a placeholder.
    pub fn display_name(&self, albums: &[Album]) -> String {
        albums
            .iter()
            .find(|album| album.id == self.id)
            .map(|album| album.name.clone())
            .unwrap_or_else(|| format!("Álbum ID: {}", self.id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Collector {
    pub id: i64,
    pub name: String,
    pub telephone: String,
    pub email: String,
    pub comments: Vec<CollectorComment>,
    pub favorite_performers: Vec<FavoritePerformer>,
    pub collector_albums: Vec<CollectorAlbum>,
}

impl Default for Collector {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            telephone: String::new(),
            email: String::new(),
            comments: Vec::new(),
            favorite_performers: Vec::new(),
            collector_albums: Vec::new(),
        }
    }
}

impl Collector {
    /// Image of the first favorite performer, if any.
    pub fn image(&self) -> Option<&str> {
        self.favorite_performers
            .first()
            .map(|performer| performer.image.as_str())
    }

    pub fn favorite_performers_label(&self) -> String {
        if self.favorite_performers.is_empty() {
            "None".to_string()
        } else {
            self.favorite_performers
                .iter()
                .map(|performer| performer.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn album(id: i64, name: &str) -> Album {
        Album {
            id,
            name: name.to_string(),
            ..Album::default()
        }
    }

    #[test]
    fn resolves_owned_album_name() {
        let owned = CollectorAlbum {
            id: 7,
            price: 1000,
            status: "ok".to_string(),
        };
        let albums = vec![album(3, "Kill 'Em All"), album(7, "Load")];

        assert_eq!(owned.display_name(&albums), "Load");
    }

    #[test]
    fn unmatched_album_falls_back_to_placeholder() {
        let owned = CollectorAlbum {
            id: 99,
            ..CollectorAlbum::default()
        };

        assert_eq!(owned.display_name(&[album(7, "Load")]), "Álbum ID: 99");
        assert_eq!(owned.display_name(&[]), "Álbum ID: 99");
    }

    #[test]
    fn image_follows_first_favorite_performer() {
        let mut collector: Collector = serde_json::from_str(
            r#"{"id":1,"name":"Manolo Bellon","telephone":"3502457896","email":"manollo@caracol.com.co"}"#,
        )
        .unwrap();
        assert!(collector.comments.is_empty());
        assert!(collector.collector_albums.is_empty());
        assert_eq!(collector.image(), None);

        collector.favorite_performers = vec![
            FavoritePerformer {
                name: "Rubén Blades".to_string(),
                image: "https://example.com/ruben.jpg".to_string(),
                ..FavoritePerformer::default()
            },
            FavoritePerformer {
                name: "Queen".to_string(),
                image: "https://example.com/queen.jpg".to_string(),
                ..FavoritePerformer::default()
            },
        ];

        assert_eq!(collector.image(), Some("https://example.com/ruben.jpg"));
        assert_eq!(collector.favorite_performers_label(), "Rubén Blades, Queen");
    }

    #[test]
    fn decodes_collector_albums() {
        let collector: Collector = serde_json::from_str(
            r#"{"id":2,"name":"Jaime","telephone":"1","email":"j@x.co",
                "comments":[{"id":1,"description":"Great","rating":5}],
                "collectorAlbums":[{"id":7,"price":1000,"status":"Active"}]}"#,
        )
        .unwrap();

        assert_eq!(collector.comments[0].rating, 5);
        assert_eq!(collector.collector_albums[0].price, 1000);
    }
}
