use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tracing::trace;

use super::{KeyValueStore, StorageError};

/// One JSON file per key in a directory, created on first write.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_'));

        if !valid {
            return Err(StorageError::InvalidKey(key.to_owned()));
        }

        Ok(self.dir.join(format!("{key}.json")))
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        path: path.to_owned(),
        source,
    }
}

impl KeyValueStore for FileStore {
    type Error = StorageError;

    async fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        let path = self.path(key)?;
        trace!(path = %path.display(), "reading");

        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_error(&path)(err)),
        }
    }

    async fn put(&self, key: &str, value: String) -> Result<(), Self::Error> {
        let path = self.path(key)?;
        trace!(path = %path.display(), "writing");

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(io_error(&self.dir))?;
        tokio::fs::write(&path, value)
            .await
            .map_err(io_error(&path))
    }

    async fn remove(&self, key: &str) -> Result<(), Self::Error> {
        let path = self.path(key)?;

        match tokio::fs::remove_file(&path).await {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(io_error(&path)(err)),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::FileStore;
    use crate::square::storage::{KeyValueStore, StorageError};

    #[tokio::test]
    async fn keys_cannot_escape_the_dir() {
        let store = FileStore::new(std::env::temp_dir().join("wordsquare-never-created"));

        for key in ["../etc/passwd", "a/b", "", "game:1"] {
            assert!(
                matches!(
                    store.put(key, String::new()).await,
                    Err(StorageError::InvalidKey(_))
                ),
                "{key:?}"
            );
        }
    }
}
