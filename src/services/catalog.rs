use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::models::{Restaurant, RestaurantsDocument, User, UsersDocument};

/// Errors that can occur while loading the bundled catalog files
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Loader for the static JSON documents that stand in for a backend.
///
/// Records are decoded wholesale on every call and handed to the caller
/// as a read-only snapshot; refreshing means calling the loader again.
/// A failure is fatal for that request only.
#[derive(Debug, Clone)]
pub struct Catalog {
    restaurants_path: PathBuf,
    users_path: PathBuf,
}

impl Catalog {
    pub fn new(restaurants_path: impl Into<PathBuf>, users_path: impl Into<PathBuf>) -> Self {
        Self {
            restaurants_path: restaurants_path.into(),
            users_path: users_path.into(),
        }
    }

    /// Both documents under a single data directory, using the bundled
    /// file names (`restaurants.json`, `users.json`).
    pub fn from_data_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::new(dir.join("restaurants.json"), dir.join("users.json"))
    }

    pub fn load_restaurants(&self) -> Result<Vec<Restaurant>, CatalogError> {
        let document: RestaurantsDocument = self.load(&self.restaurants_path)?;
        debug!(
            "loaded {} restaurants from {}",
            document.restaurants.len(),
            self.restaurants_path.display()
        );
        Ok(document.restaurants)
    }

    pub fn load_users(&self) -> Result<Vec<User>, CatalogError> {
        let document: UsersDocument = self.load(&self.users_path)?;
        debug!(
            "loaded {} users from {}",
            document.users.len(),
            self.users_path.display()
        );
        Ok(document.users)
    }

    fn load<T: serde::de::DeserializeOwned>(&self, path: &Path) -> Result<T, CatalogError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
