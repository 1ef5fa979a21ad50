//! Persisted store reading.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult};
use crate::store::ProfileStore;
use crate::writer::StoreWriter;

/// Reader for the persisted profile store.
pub struct StoreReader;

impl StoreReader {
    /// Read and validate the store at `path`.
    pub fn read(path: impl AsRef<Path>) -> ConfigResult<ProfileStore> {
        let path = path.as_ref();
        debug!("Reading configuration from {:?}", path);

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    /// Parse store content. `path` is only used in error messages.
    pub fn parse(content: &str, path: impl AsRef<Path>) -> ConfigResult<ProfileStore> {
        let path = path.as_ref();
        let document: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|source| ConfigError::Yaml {
                path: path.to_path_buf(),
                source,
            })?;

        ProfileStore::from_document(document).map_err(|message| ConfigError::Corrupt {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Read the store at `path`, creating and committing a bootstrapped store
    /// if the file does not exist yet.
    pub fn load_or_bootstrap(path: impl AsRef<Path>) -> ConfigResult<ProfileStore> {
        let path = path.as_ref();
        match fs::metadata(path) {
            Ok(_) => Self::read(path),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No configuration found at {:?}, creating default profile", path);
                let store = ProfileStore::bootstrap();
                StoreWriter::write(path, &store)?;
                Ok(store)
            }
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}
