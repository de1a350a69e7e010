use std::{collections::HashMap, future::Future, sync::Arc};

use arc_swap::ArcSwap;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tokio::{
    sync::RwLock,
    task::{JoinError, JoinSet},
};
use tracing::{debug, info, instrument};

use super::{
    core::Size,
    generator::{SquareGenerator, DEFAULT_MAX_ATTEMPTS},
    puzzle::PuzzleGrid,
    WordsList,
};

/// Days from 0001-01-01 to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i64 = 719_163;

const fn size_offset(size: Size) -> i64 {
    match size {
        Size::Four => 4_000_000,
        Size::Five => 5_000_000,
        Size::Six => 6_000_000,
    }
}

/// Stable seed for the puzzle of `size` on `date`. Every instance computes
/// the same one, so everyone gets the same square on the same day.
pub fn seed_from_date(date: NaiveDate, size: Size) -> u64 {
    let epoch_day = i64::from(date.num_days_from_ce()) - UNIX_EPOCH_DAYS_FROM_CE;
    u64::try_from(epoch_day + size_offset(size)).unwrap_or_default()
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PuzzleKey {
    pub date: NaiveDate,
    pub size: Size,
}

impl PuzzleKey {
    pub const fn new(date: NaiveDate, size: Size) -> Self {
        Self { date, size }
    }

    pub fn seed(self) -> u64 {
        seed_from_date(self.date, self.size)
    }
}

impl std::fmt::Display for PuzzleKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}x{}", self.date, self.size, self.size)
    }
}

/// Where generated puzzles are kept between requests.
pub trait PuzzleCache {
    fn get(&self, key: PuzzleKey) -> impl Future<Output = Option<Arc<PuzzleGrid>>> + Send;

    fn put(&self, key: PuzzleKey, grid: PuzzleGrid) -> impl Future<Output = Arc<PuzzleGrid>> + Send;

    fn evict(&self, key: PuzzleKey) -> impl Future<Output = ()> + Send;
}

#[derive(Clone, Debug, Default)]
pub struct MemoryPuzzleCache(Arc<RwLock<HashMap<PuzzleKey, Arc<ArcSwap<PuzzleGrid>>>>>);

impl MemoryPuzzleCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.0.read().await.len()
    }
}

impl PuzzleCache for MemoryPuzzleCache {
    fn get(&self, key: PuzzleKey) -> impl Future<Output = Option<Arc<PuzzleGrid>>> + Send {
        async move {
            let guard = self.0.read().await;
            guard.get(&key).map(|arc_swap| arc_swap.load_full())
        }
    }

    fn put(&self, key: PuzzleKey, grid: PuzzleGrid) -> impl Future<Output = Arc<PuzzleGrid>> + Send {
        async move {
            let arc = Arc::new(grid);
            let mut guard = self.0.write().await;
            if let Some(arc_swap) = guard.get_mut(&key) {
                arc_swap.store(arc.clone());
            } else {
                guard.insert(key, Arc::new(ArcSwap::new(arc.clone())));
            }
            arc
        }
    }

    fn evict(&self, key: PuzzleKey) -> impl Future<Output = ()> + Send {
        async move {
            let mut guard = self.0.write().await;
            guard.remove(&key);
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("puzzle generation task failed: {0}")]
pub struct DailyError(#[from] JoinError);

fn generate(words: &WordsList, max_attempts: usize, key: PuzzleKey) -> PuzzleGrid {
    SquareGenerator::new(words)
        .with_max_attempts(max_attempts)
        .generate_or_fallback(key.size, key.seed())
}

/// Hands out the puzzle for a date, generating it on a blocking thread the
/// first time and caching it after that.
#[derive(Debug, Clone)]
pub struct DailyPuzzles<C = MemoryPuzzleCache> {
    words: Arc<WordsList>,
    max_attempts: usize,
    cache: C,
}

impl DailyPuzzles {
    pub fn new(words: Arc<WordsList>) -> Self {
        Self::with_cache(words, MemoryPuzzleCache::new())
    }
}

impl<C> DailyPuzzles<C>
where
    C: PuzzleCache + Send + Sync,
{
    pub fn with_cache(words: Arc<WordsList>, cache: C) -> Self {
        Self {
            words,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            cache,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    #[instrument(skip(self))]
    pub async fn puzzle(&self, date: NaiveDate, size: Size) -> Result<Arc<PuzzleGrid>, DailyError> {
        let key = PuzzleKey::new(date, size);

        if let Some(cached) = self.cache.get(key).await {
            debug!("cache hit");
            return Ok(cached);
        }

        let words = self.words.clone();
        let max_attempts = self.max_attempts;
        let grid =
            tokio::task::spawn_blocking(move || generate(&words, max_attempts, key)).await?;

        info!(seed = grid.seed(), fallback = grid.is_fallback(), "generated puzzle");

        Ok(self.cache.put(key, grid).await)
    }

    /// Generates every missing date and size pair in parallel. Returns how
    /// many were generated.
    #[instrument(skip_all)]
    pub async fn prefetch(
        &self,
        dates: impl IntoIterator<Item = NaiveDate>,
        sizes: &[Size],
    ) -> Result<usize, DailyError> {
        let mut join = JoinSet::new();

        for date in dates {
            for &size in sizes {
                let key = PuzzleKey::new(date, size);
                if self.cache.get(key).await.is_some() {
                    continue;
                }

                let words = self.words.clone();
                let max_attempts = self.max_attempts;
                join.spawn_blocking(move || (key, generate(&words, max_attempts, key)));
            }
        }

        let mut generated = 0;
        while let Some(result) = join.join_next().await {
            let (key, grid) = result?;
            self.cache.put(key, grid).await;
            generated += 1;
        }

        info!(generated, "prefetched puzzles");
        Ok(generated)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use super::{seed_from_date, DailyPuzzles, PuzzleCache, PuzzleKey};
    use crate::square::{core::Size, WordsList};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn seeds_are_offset_per_size() {
        let epoch = date(1970, 1, 1);
        assert_eq!(seed_from_date(epoch, Size::Four), 4_000_000);
        assert_eq!(seed_from_date(epoch, Size::Five), 5_000_000);
        assert_eq!(seed_from_date(epoch, Size::Six), 6_000_000);

        assert_eq!(seed_from_date(date(1970, 1, 2), Size::Four), 4_000_001);
        assert_eq!(seed_from_date(date(2024, 3, 1), Size::Five), 5_019_783);
    }

    #[tokio::test]
    async fn same_day_same_puzzle() {
        let daily = DailyPuzzles::new(Arc::new(WordsList::bundled()));
        let day = date(2024, 3, 1);

        let first = daily.puzzle(day, Size::Five).await.unwrap();
        let second = daily.puzzle(day, Size::Five).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.seed(), seed_from_date(day, Size::Five));

        // a fresh service still agrees
        let other = DailyPuzzles::new(Arc::new(WordsList::bundled()));
        assert_eq!(*other.puzzle(day, Size::Five).await.unwrap(), *first);
    }

    #[tokio::test]
    async fn prefetch_fills_the_cache() {
        let daily = DailyPuzzles::new(Arc::new(WordsList::bundled()));
        let days = [date(2024, 1, 1), date(2024, 1, 2)];

        let generated = daily.prefetch(days, &Size::ALL).await.unwrap();
        assert_eq!(generated, 6);
        assert_eq!(daily.cache().len().await, 6);

        // nothing left to do
        assert_eq!(daily.prefetch(days, &Size::ALL).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn evicted_puzzles_come_back_identical() {
        let daily = DailyPuzzles::new(Arc::new(WordsList::bundled()));
        let day = date(2023, 12, 25);
        let key = PuzzleKey::new(day, Size::Four);

        let before = daily.puzzle(day, Size::Four).await.unwrap();
        daily.cache().evict(key).await;
        assert!(daily.cache().get(key).await.is_none());

        let after = daily.puzzle(day, Size::Four).await.unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(before, after);
    }
}
