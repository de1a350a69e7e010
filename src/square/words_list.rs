use std::{
    collections::{BTreeMap, HashSet},
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use thiserror::Error;
use tracing::{debug, warn};

use super::core::{Size, Word};

const BUNDLED: &str = include_str!("../../words/words.txt");

#[derive(Debug, Default, Clone)]
struct Bucket {
    // sorted, so seeded picks never depend on hash order
    ordered: Vec<Word>,
    lookup: HashSet<Word>,
}

/// Every playable word, grouped by length.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct WordsList {
    buckets: BTreeMap<Size, Bucket>,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("couldn't read words from {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("no {0}-letter words available")]
    EmptyBucket(Size),
}

impl WordsList {
    /// Builds a list from arbitrary text. Blank lines, `#` comments and
    /// anything that isn't a 4-6 letter word are skipped.
    pub fn from_words<'a>(words: impl IntoIterator<Item = &'a str>) -> Self {
        let mut buckets: BTreeMap<Size, Bucket> =
            Size::ALL.into_iter().map(|size| (size, Bucket::default())).collect();

        for line in words {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Ok(word) = Word::from_str(line) else {
                debug!(line, "skipping unparseable word");
                continue;
            };

            let Ok(size) = Size::try_from(word.len()) else {
                continue;
            };

            let bucket = buckets.entry(size).or_default();
            if bucket.lookup.insert(word.clone()) {
                bucket.ordered.push(word);
            }
        }

        for bucket in buckets.values_mut() {
            bucket.ordered.sort_unstable();
        }

        Self { buckets }
    }

    /// The list compiled into the binary.
    pub fn bundled() -> Self {
        Self::from_words(BUNDLED.lines())
    }

    /// Reads one word per line from `path`. Every size must end up with at
    /// least one word.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_owned(),
            source,
        })?;

        let list = Self::from_words(text.lines());
        list.check()?;

        debug!(path = %path.display(), words = list.len(), "loaded words list");

        Ok(list)
    }

    /// Loads `path` if given, otherwise the bundled list.
    pub fn load_or_bundled(path: Option<&Path>) -> Result<Self, LoadError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let list = Self::bundled();
                list.check()?;
                Ok(list)
            }
        }
    }

    fn check(&self) -> Result<(), LoadError> {
        for size in Size::ALL {
            if self.words_of_length(size).is_empty() {
                warn!(%size, "words list has an empty bucket");
                return Err(LoadError::EmptyBucket(size));
            }
        }
        Ok(())
    }

    /// All words of one length, in a stable order.
    pub fn words_of_length(&self, size: Size) -> &[Word] {
        self.buckets
            .get(&size)
            .map(|bucket| bucket.ordered.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, word: &Word) -> bool {
        Size::try_from(word.len())
            .ok()
            .and_then(|size| self.buckets.get(&size))
            .is_some_and(|bucket| bucket.lookup.contains(word))
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(|bucket| bucket.ordered.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
