//! Profiles persisted as a single JSON object keyed by player name.
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use colorchain_game::{PlayerProfile, ProfileStore};
use log::warn;
use thiserror::Error;

type ProfileMap = BTreeMap<String, PlayerProfile>;

#[derive(Debug, Error)]
pub enum FileStoreError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("corrupt profile file {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone)]
pub struct JsonFileProfiles {
    path: PathBuf,
}

impl JsonFileProfiles {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<ProfileMap, FileStoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(ProfileMap::new()),
            Err(source) => {
                return Err(FileStoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        if raw.trim().is_empty() {
            return Ok(ProfileMap::new());
        }
        serde_json::from_str(&raw).map_err(|source| FileStoreError::Json {
            path: self.path.clone(),
            source,
        })
    }

    fn write_map(&self, map: &ProfileMap) -> Result<(), FileStoreError> {
        let io_err = |source| FileStoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let payload = serde_json::to_vec_pretty(map).map_err(|source| FileStoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, payload).map_err(io_err)?;
        fs::rename(&staging, &self.path).map_err(io_err)
    }
}

/// `profiles.json` becomes `profiles.json.corrupt`.
fn corrupt_backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".corrupt");
    PathBuf::from(name)
}

impl ProfileStore for JsonFileProfiles {
    type Error = FileStoreError;

    fn load(&self, name: &str) -> Result<Option<PlayerProfile>, Self::Error> {
        Ok(self.read_map()?.remove(name))
    }

    fn save(&self, profile: &PlayerProfile) -> Result<(), Self::Error> {
        let mut map = match self.read_map() {
            Ok(map) => map,
            Err(FileStoreError::Json { path, source }) => {
                let backup = corrupt_backup_path(&path);
                warn!(
                    "moving corrupt profile file {} to {}: {source}",
                    path.display(),
                    backup.display()
                );
                fs::rename(&path, &backup).map_err(|source| FileStoreError::Io {
                    path: path.clone(),
                    source,
                })?;
                ProfileMap::new()
            }
            Err(err) => return Err(err),
        };
        map.insert(profile.name.clone(), profile.clone());
        self.write_map(&map)
    }

    fn names(&self) -> Result<Vec<String>, Self::Error> {
        Ok(self.read_map()?.into_keys().collect())
    }
}
