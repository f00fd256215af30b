//! Wire types exchanged with the voting backend.
//!
//! The backend fronts The Cat API; every shape here mirrors what it serves
//! on `/voting`, `/breed-search` and `/favourites`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Action posted to `POST /voting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteAction {
    Like,
    Dislike,
    Favorite,
}

impl VoteAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Dislike => "dislike",
            Self::Favorite => "favorite",
        }
    }
}

/// An image to vote on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatImage {
    pub url: String,
    pub id: Option<String>,
}

/// Body of `GET /voting`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageResponse {
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ImageResponse {
    /// Split into the image or the backend's error message.
    pub fn into_image(self) -> Result<CatImage, String> {
        if let Some(err) = self.error.filter(|e| !e.is_empty()) {
            return Err(err);
        }
        match self.image_url.filter(|u| !u.is_empty()) {
            Some(url) => Ok(CatImage {
                url,
                id: self.image_id.filter(|id| !id.is_empty()),
            }),
            None => Err("backend returned no image".to_string()),
        }
    }
}

/// Body of `POST /voting`: the next image, optionally the updated favorites.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionResponse {
    #[serde(flatten)]
    pub image: ImageResponse,
    #[serde(default)]
    pub favorites: Option<Vec<Favorite>>,
}

/// Result of a successful vote or favorite.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionOutcome {
    pub next: CatImage,
    pub favorites: Option<Vec<Favorite>>,
}

/// Entry of `GET /breed-search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreedSummary {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breed {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub wikipedia_url: Option<String>,
}

impl Breed {
    /// Origin, treating the backend's empty string as absent.
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref().filter(|o| !o.is_empty())
    }

    pub fn wikipedia_url(&self) -> Option<&str> {
        self.wikipedia_url.as_deref().filter(|u| !u.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreedImage {
    pub url: String,
    #[serde(default)]
    pub id: Option<String>,
}

/// Body of `POST /breed-search`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BreedDetails {
    pub breed: Breed,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub images: Vec<BreedImage>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteImage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Empty when the image behind the favorite has been deleted.
    #[serde(default)]
    pub url: String,
}

/// A favorite as returned by `GET /favourites`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub image: FavoriteImage,
}

/// A favorited image: a bare URL (older local mirrors) or a full record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Favorite {
    Url(String),
    Record(FavoriteRecord),
}

impl Favorite {
    /// Build a record stamped with `created_at`.
    pub fn new(url: impl Into<String>, image_id: Option<String>, created_at: DateTime<Utc>) -> Self {
        Self::Record(FavoriteRecord {
            image_id: image_id.clone(),
            created_at: Some(created_at.to_rfc3339()),
            image: FavoriteImage {
                id: image_id,
                url: url.into(),
            },
            ..FavoriteRecord::default()
        })
    }

    pub fn url(&self) -> &str {
        match self {
            Self::Url(url) => url,
            Self::Record(r) => &r.image.url,
        }
    }

    pub fn image_id(&self) -> Option<&str> {
        match self {
            Self::Url(_) => None,
            Self::Record(r) => r.image.id.as_deref().or(r.image_id.as_deref()),
        }
    }

    /// Parsed creation time; `None` when absent or unparseable.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Url(_) => None,
            Self::Record(r) => r
                .created_at
                .as_deref()
                .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
                .map(|ts| ts.with_timezone(&Utc)),
        }
    }
}

/// Body of `GET /favourites`: the list, or `{"error": ...}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FavoritesResponse {
    List(Vec<Favorite>),
    Error { error: String },
}

/// `{"error": "..."}` body some endpoints send with a failure status.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_response_with_error_field() {
        let resp: ImageResponse =
            serde_json::from_str(r#"{"error":"Failed to fetch cat image"}"#).unwrap();
        assert_eq!(resp.into_image().unwrap_err(), "Failed to fetch cat image");
    }

    #[test]
    fn test_image_response_empty_id_is_none() {
        let resp: ImageResponse =
            serde_json::from_str(r#"{"image_url":"https://cdn/a.jpg","image_id":""}"#).unwrap();
        let image = resp.into_image().unwrap();
        assert_eq!(image.url, "https://cdn/a.jpg");
        assert_eq!(image.id, None);
    }

    #[test]
    fn test_image_response_without_url_is_error() {
        let resp: ImageResponse = serde_json::from_str(r#"{"image_url":""}"#).unwrap();
        assert!(resp.into_image().is_err());
    }

    #[test]
    fn test_action_response_carries_favorites() {
        let resp: ActionResponse = serde_json::from_str(
            r#"{"image_url":"https://cdn/b.jpg","image_id":"b","favorites":["https://cdn/a.jpg"]}"#,
        )
        .unwrap();
        assert_eq!(resp.image.image_id.as_deref(), Some("b"));
        assert_eq!(
            resp.favorites,
            Some(vec![Favorite::Url("https://cdn/a.jpg".to_string())])
        );
    }

    #[test]
    fn test_breed_details_null_images() {
        let details: BreedDetails = serde_json::from_str(
            r#"{"breed":{"id":"abys","name":"Abyssinian","origin":"","description":"Active"},"images":null}"#,
        )
        .unwrap();
        assert!(details.images.is_empty());
        assert_eq!(details.breed.origin(), None);
        assert_eq!(details.breed.wikipedia_url(), None);
    }

    #[test]
    fn test_favorite_shapes() {
        let list: Vec<Favorite> = serde_json::from_str(
            r#"[
                "https://cdn/plain.jpg",
                {"id":7,"image_id":"x1","sub_id":"user-123","created_at":"2024-03-01T10:00:00.000Z",
                 "image":{"id":"x1","url":"https://cdn/x1.jpg"}}
            ]"#,
        )
        .unwrap();
        assert_eq!(list[0].url(), "https://cdn/plain.jpg");
        assert_eq!(list[0].created_at(), None);
        assert_eq!(list[1].url(), "https://cdn/x1.jpg");
        assert_eq!(list[1].image_id(), Some("x1"));
        assert_eq!(
            list[1].created_at().unwrap().to_rfc3339(),
            "2024-03-01T10:00:00+00:00"
        );
    }

    #[test]
    fn test_favorites_list_with_deleted_image() {
        let resp: FavoritesResponse = serde_json::from_str(
            r#"[
                {"id":1,"image_id":"a","created_at":"2024-03-01T10:00:00.000Z",
                 "image":{"id":"a","url":"https://cdn/a.jpg"}},
                {"id":2,"image_id":"gone","created_at":"2024-03-02T10:00:00.000Z","image":{}}
            ]"#,
        )
        .unwrap();
        let FavoritesResponse::List(list) = resp else {
            panic!("expected a favorites list");
        };
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].url(), "https://cdn/a.jpg");
        assert_eq!(list[1].url(), "");
        assert_eq!(list[1].image_id(), Some("gone"));
    }

    #[test]
    fn test_favorites_error_body() {
        let resp: FavoritesResponse =
            serde_json::from_str(r#"{"error":"Failed to fetch favorites"}"#).unwrap();
        assert!(matches!(resp, FavoritesResponse::Error { .. }));
    }

    #[test]
    fn test_unparseable_timestamp_is_none() {
        let fav = Favorite::Record(FavoriteRecord {
            created_at: Some("yesterday".to_string()),
            image: FavoriteImage {
                id: None,
                url: "u".to_string(),
            },
            ..FavoriteRecord::default()
        });
        assert_eq!(fav.created_at(), None);
    }
}
