use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A movie document. Created through the movie-creation endpoint and
/// read-only afterwards; there are no update or delete endpoints for movies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// Unique by convention, not enforced by the store.
    pub title: String,
    pub description: String,
    pub genre: Genre,
    pub director: Director,
    #[serde(default)]
    pub actors: Vec<String>,
    /// Durable URL returned by blob storage.
    pub image_path: String,
    pub featured: bool,
}

/// Genre embedded in a movie document, not a separate collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genre {
    pub name: String,
    pub description: String,
}

/// Director embedded in a movie document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Director {
    pub name: String,
    pub bio: String,
}

/// Payload for POST /movies. The image arrives base64-encoded and is
/// uploaded to blob storage before the document is inserted.
#[derive(Debug, Deserialize)]
pub struct CreateMovieRequest {
    pub title: String,
    pub description: String,
    pub genre: Genre,
    pub director: Director,
    #[serde(default)]
    pub actors: Vec<String>,
    pub image_data: String,
    #[serde(default)]
    pub featured: bool,
}
