use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument};
use mongodb::{Collection, Database, IndexModel};
use thiserror::Error;

use crate::models::movie::{Director, Genre, Movie};
use crate::models::user::{NewUser, User};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record already exists")]
    AlreadyExists,
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
}

fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    match *error.kind {
        ErrorKind::Write(WriteFailure::WriteError(ref write_error)) => write_error.code == 11000,
        _ => false,
    }
}

fn return_updated() -> FindOneAndUpdateOptions {
    FindOneAndUpdateOptions::builder()
        .return_document(ReturnDocument::After)
        .build()
}

/// Typed accessor over the movies collection.
#[derive(Clone)]
pub struct MovieStore {
    collection: Collection<Movie>,
}

impl MovieStore {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection("movies"),
        }
    }

    pub async fn find_all(&self) -> Result<Vec<Movie>, StoreError> {
        let cursor = self.collection.find(None, None).await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn find_by_title(&self, title: &str) -> Result<Option<Movie>, StoreError> {
        Ok(self.collection.find_one(doc! { "title": title }, None).await?)
    }

    /// Embedded genre of the first movie matching the genre name.
    pub async fn find_genre(&self, name: &str) -> Result<Option<Genre>, StoreError> {
        let movie = self
            .collection
            .find_one(doc! { "genre.name": name }, None)
            .await?;
        Ok(movie.map(|m| m.genre))
    }

    /// Embedded director of the first movie matching the director name.
    pub async fn find_director(&self, name: &str) -> Result<Option<Director>, StoreError> {
        let movie = self
            .collection
            .find_one(doc! { "director.name": name }, None)
            .await?;
        Ok(movie.map(|m| m.director))
    }

    pub async fn insert(&self, mut movie: Movie) -> Result<Movie, StoreError> {
        let result = self.collection.insert_one(&movie, None).await?;
        movie.id = result.inserted_id.as_object_id();
        Ok(movie)
    }
}

/// Typed accessor over the users collection.
#[derive(Clone)]
pub struct UserStore {
    collection: Collection<User>,
}

impl UserStore {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection("users"),
        }
    }

    /// Create the unique username index. Run once at startup; closes the
    /// check-then-create window on registration.
    pub async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let index = IndexModel::builder()
            .keys(doc! { "username": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection.create_index(index, None).await?;
        Ok(())
    }

    pub async fn find_all(&self) -> Result<Vec<User>, StoreError> {
        let cursor = self.collection.find(None, None).await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .collection
            .find_one(doc! { "username": username }, None)
            .await?)
    }

    pub async fn insert(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut user = User {
            id: None,
            username: new_user.username,
            password_hash: new_user.password_hash,
            email: new_user.email,
            birthday: new_user.birthday,
            favorite_movies: Vec::new(),
        };

        let result = self.collection.insert_one(&user, None).await.map_err(|e| {
            if is_duplicate_key(&e) {
                StoreError::AlreadyExists
            } else {
                StoreError::Database(e)
            }
        })?;

        user.id = result.inserted_id.as_object_id();
        Ok(user)
    }

    /// Replace the account fields of the named user, leaving the favorites
    /// list untouched. Returns the post-update document.
    pub async fn update(
        &self,
        username: &str,
        patch: NewUser,
    ) -> Result<Option<User>, StoreError> {
        let update = doc! {
            "$set": {
                "username": patch.username,
                "password_hash": patch.password_hash,
                "email": patch.email,
                "birthday": patch.birthday.map(|d| d.to_string()),
            }
        };

        Ok(self
            .collection
            .find_one_and_update(doc! { "username": username }, update, return_updated())
            .await?)
    }

    /// Append a movie reference to the favorites list. Duplicates are
    /// permitted; adding the same id twice yields two entries.
    pub async fn push_favorite(
        &self,
        username: &str,
        movie_id: &str,
    ) -> Result<Option<User>, StoreError> {
        Ok(self
            .collection
            .find_one_and_update(
                doc! { "username": username },
                doc! { "$push": { "favorite_movies": movie_id } },
                return_updated(),
            )
            .await?)
    }

    /// Remove every occurrence of a movie reference from the favorites list.
    pub async fn pull_favorite(
        &self,
        username: &str,
        movie_id: &str,
    ) -> Result<Option<User>, StoreError> {
        Ok(self
            .collection
            .find_one_and_update(
                doc! { "username": username },
                doc! { "$pull": { "favorite_movies": movie_id } },
                return_updated(),
            )
            .await?)
    }

    /// Remove the user document, returning it if it existed.
    pub async fn delete(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .collection
            .find_one_and_delete(doc! { "username": username }, None)
            .await?)
    }
}
