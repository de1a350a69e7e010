//! Persistence through a small key-value capability.
//!
//! Saved games and statistics are JSON values under string keys. Anything
//! that can get, put and remove strings can back them; settings use the same
//! trait directly.

use std::{convert::Infallible, path::PathBuf};

use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use super::{core::Difficulty, game::SavedGame, stats::Stats};

mod file;
pub use file::FileStore;

mod memory;
pub use memory::MemoryStore;

pub trait KeyValueStore {
    type Error: Into<StorageError>;

    async fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;
    async fn put(&self, key: &str, value: String) -> Result<(), Self::Error>;
    async fn remove(&self, key: &str) -> Result<(), Self::Error>;
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{0:?} is not a valid storage key")]
    InvalidKey(String),

    #[error("couldn't access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed stored value: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<Infallible> for StorageError {
    fn from(value: Infallible) -> Self {
        match value {}
    }
}

/// Saved games and statistics on top of any [`KeyValueStore`].
#[derive(Debug, Clone, Default)]
pub struct GameStore<S> {
    store: S,
}

impl<S> GameStore<S>
where
    S: KeyValueStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    fn game_key(date: NaiveDate, difficulty: Difficulty) -> String {
        format!("game-{}-{}", date.format("%Y-%m-%d"), difficulty.key())
    }

    fn stats_key(difficulty: Difficulty) -> String {
        format!("stats-{}", difficulty.key())
    }

    async fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let Some(raw) = self.store.get(key).await.map_err(Into::into)? else {
            return Ok(None);
        };

        Ok(Some(serde_json::from_str(&raw)?))
    }

    async fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)?;
        self.store.put(key, raw).await.map_err(Into::into)
    }

    pub async fn save_state(
        &self,
        date: NaiveDate,
        difficulty: Difficulty,
        game: &SavedGame,
    ) -> Result<(), StorageError> {
        let key = Self::game_key(date, difficulty);
        debug!(%key, "saving game");
        self.write(&key, game).await
    }

    /// `None` when there is nothing saved or the saved value can't be read.
    pub async fn load_state(&self, date: NaiveDate, difficulty: Difficulty) -> Option<SavedGame> {
        let key = Self::game_key(date, difficulty);

        self.read(&key)
            .await
            .inspect_err(|err| warn!(%key, %err, "ignoring saved game"))
            .ok()
            .flatten()
    }

    pub async fn clear_state(
        &self,
        date: NaiveDate,
        difficulty: Difficulty,
    ) -> Result<(), StorageError> {
        let key = Self::game_key(date, difficulty);
        self.store.remove(&key).await.map_err(Into::into)
    }

    /// Starts from empty statistics when none are stored or they're unreadable.
    pub async fn load_stats(&self, difficulty: Difficulty) -> Stats {
        let key = Self::stats_key(difficulty);

        self.read(&key)
            .await
            .inspect_err(|err| warn!(%key, %err, "resetting unreadable stats"))
            .ok()
            .flatten()
            .unwrap_or_default()
    }

    pub async fn save_stats(&self, difficulty: Difficulty, stats: &Stats) -> Result<(), StorageError> {
        self.write(&Self::stats_key(difficulty), stats).await
    }
}

#[cfg(test)]
mod tests {
    type Result<T = ()> = std::result::Result<T, Box<dyn std::error::Error>>;

    /// A directory under the system temp dir, removed on drop.
    pub(super) struct TempDir(std::path::PathBuf);

    impl TempDir {
        pub fn new() -> Self {
            use std::sync::atomic::{AtomicUsize, Ordering};
            static NEXT: AtomicUsize = AtomicUsize::new(0);

            let path = std::env::temp_dir().join(format!(
                "wordsquare-test-{}-{}",
                std::process::id(),
                NEXT.fetch_add(1, Ordering::SeqCst)
            ));
            Self(path)
        }

        pub fn path(&self) -> &std::path::Path {
            &self.0
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            std::fs::remove_dir_all(&self.0).ok();
        }
    }

    mod consts {
        use chrono::NaiveDate;

        use crate::square::core::Difficulty;

        pub fn day() -> NaiveDate {
            NaiveDate::from_ymd_opt(2024, 5, 17).unwrap()
        }

        pub const DIFFICULTY: Difficulty = Difficulty::Easy;
    }

    macro_rules! test_backends {
        {$($backend:ty as $mod_name:ident $block:block)+} => {
            $(
            paste::paste! {
                mod [<$mod_name _ backend>] {
                    use pretty_assertions::assert_eq;

                    use super::consts::*;
                    use super::{Result, TempDir};
                    use crate::square::{
                        core::{BorderWords, Difficulty},
                        game::GameSession,
                        puzzle::PuzzleGrid,
                        storage::{FileStore, GameStore, KeyValueStore, MemoryStore},
                    };
                    type Store = GameStore<$backend>;

                    fn saved() -> crate::square::game::SavedGame {
                        let border = BorderWords::parse("word", "west", "dust", "tast").unwrap();
                        let mut session = GameSession::new();
                        session.load(&PuzzleGrid::new(border, |_| 'q', 9, false));
                        session.type_letter('w');
                        session.save().unwrap()
                    }

                    #[tokio::test]
                    async fn put_get_remove() -> Result {
                        let (store, _guard): (Store, _) = $block;
                        let kv = store.inner();

                        assert_eq!(kv.get("theme").await?, None);

                        kv.put("theme", "dark".to_owned()).await?;
                        assert_eq!(kv.get("theme").await?.as_deref(), Some("dark"));

                        kv.remove("theme").await?;
                        assert_eq!(kv.get("theme").await?, None);

                        Ok(())
                    }

                    #[tokio::test]
                    async fn saved_game_round_trip() -> Result {
                        let (store, _guard): (Store, _) = $block;
                        let game = saved();

                        assert_eq!(store.load_state(day(), DIFFICULTY).await, None);

                        store.save_state(day(), DIFFICULTY, &game).await?;
                        assert_eq!(store.load_state(day(), DIFFICULTY).await, Some(game));

                        // other difficulties are separate
                        assert_eq!(store.load_state(day(), Difficulty::Hard).await, None);

                        store.clear_state(day(), DIFFICULTY).await?;
                        assert_eq!(store.load_state(day(), DIFFICULTY).await, None);

                        Ok(())
                    }

                    #[tracing_test::traced_test]
                    #[tokio::test]
                    async fn corrupt_state_reads_as_nothing() -> Result {
                        let (store, _guard): (Store, _) = $block;

                        store
                            .inner()
                            .put("game-2024-05-17-easy", "{not json".to_owned())
                            .await?;

                        assert_eq!(store.load_state(day(), DIFFICULTY).await, None);
                        assert!(logs_contain("ignoring saved game"));

                        Ok(())
                    }

                    #[tokio::test]
                    async fn stats_round_trip() -> Result {
                        let (store, _guard): (Store, _) = $block;

                        let mut stats = store.load_stats(DIFFICULTY).await;
                        assert_eq!(stats.played(), 0);

                        stats.record_played(day());
                        stats.record_win(day(), 3);
                        store.save_stats(DIFFICULTY, &stats).await?;

                        assert_eq!(store.load_stats(DIFFICULTY).await, stats);
                        assert_eq!(store.load_stats(Difficulty::Medium).await.played(), 0);

                        Ok(())
                    }
                }
            }
            )+
        };
    }

    test_backends! {
        MemoryStore as memory {
            (Store::new(MemoryStore::new()), ())
        }

        FileStore as file {
            let dir = TempDir::new();
            (Store::new(FileStore::new(dir.path())), dir)
        }
    }
}
