//! Persisted store writing.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::store::ProfileStore;

/// Writer for the persisted profile store.
pub struct StoreWriter;

impl StoreWriter {
    /// Render the store as YAML.
    pub fn render(store: &ProfileStore, path: impl AsRef<Path>) -> ConfigResult<String> {
        serde_yaml::to_string(&store.to_document()).map_err(|source| ConfigError::Yaml {
            path: path.as_ref().to_path_buf(),
            source,
        })
    }

    /// Atomically replace the file at `path` with the store's contents.
    ///
    /// The document goes to a temporary file in the same directory, which is
    /// then renamed over the target. Readers see the old or new file, never a
    /// partial one.
    pub fn write(path: impl AsRef<Path>, store: &ProfileStore) -> ConfigResult<()> {
        let path = path.as_ref();
        debug!("Writing configuration to {:?}", path);

        let content = Self::render(store, path)?;
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(write_err)?;

        let mut file = NamedTempFile::new_in(parent).map_err(write_err)?;
        file.write_all(content.as_bytes()).map_err(write_err)?;
        file.as_file().sync_all().map_err(write_err)?;
        file.persist(path).map_err(|e| write_err(e.error))?;

        Ok(())
    }
}
