//! Word validation: the local list first, an optional remote lookup second.
//!
//! A remote failure is never the same as "not a word". It comes back as
//! [`Verdict::Unreachable`] so callers can tell players the network was the
//! problem, not their spelling.

use std::{future::Future, sync::Arc, time::Duration};

use thiserror::Error;
use tracing::{debug, warn};

use super::{core::Word, WordsList};

mod remote;
pub use remote::HttpDictionary;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// A dictionary somewhere else.
pub trait RemoteDictionary {
    type Error: std::error::Error + Send + Sync + 'static;

    fn contains(&self, word: &Word) -> impl Future<Output = Result<bool, Self::Error>> + Send;
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("no remote dictionary configured")]
    NoRemote,

    #[error("remote dictionary timed out after {0:?}")]
    Timeout(Duration),

    #[error("remote dictionary failed: {0}")]
    Remote(#[source] Box<dyn std::error::Error + Send + Sync>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    Invalid,
    /// The word isn't in the local list and the remote couldn't be asked.
    Unreachable,
}

impl Verdict {
    pub const fn is_valid(self) -> bool {
        matches!(self, Self::Valid)
    }
}

#[derive(Debug)]
pub struct DictionaryValidator<R = HttpDictionary> {
    words: Arc<WordsList>,
    remote: Option<R>,
    timeout: Duration,
}

impl<R> Clone for DictionaryValidator<R>
where
    R: Clone,
{
    fn clone(&self) -> Self {
        Self {
            words: self.words.clone(),
            remote: self.remote.clone(),
            timeout: self.timeout,
        }
    }
}

impl DictionaryValidator {
    /// Only the local list; anything missing from it is invalid.
    pub fn offline(words: Arc<WordsList>) -> Self {
        Self {
            words,
            remote: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl<R> DictionaryValidator<R>
where
    R: RemoteDictionary,
{
    pub fn new(words: Arc<WordsList>, remote: R) -> Self {
        Self {
            words,
            remote: Some(remote),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn words(&self) -> &WordsList {
        &self.words
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub fn check_offline(&self, word: &Word) -> bool {
        self.words.contains(word)
    }

    /// One remote call, bounded by the configured timeout.
    pub async fn check_online(&self, word: &Word) -> Result<bool, LookupError> {
        let remote = self.remote.as_ref().ok_or(LookupError::NoRemote)?;

        match tokio::time::timeout(self.timeout, remote.contains(word)).await {
            Ok(Ok(found)) => Ok(found),
            Ok(Err(err)) => Err(LookupError::Remote(Box::new(err))),
            Err(_) => Err(LookupError::Timeout(self.timeout)),
        }
    }

    pub async fn is_valid(&self, word: &Word) -> Verdict {
        if self.check_offline(word) {
            return Verdict::Valid;
        }

        if !self.has_remote() {
            debug!(%word, "not in words list");
            return Verdict::Invalid;
        }

        match self.check_online(word).await {
            Ok(true) => Verdict::Valid,
            Ok(false) => Verdict::Invalid,
            Err(err) => {
                warn!(%word, %err, "couldn't check word online");
                Verdict::Unreachable
            }
        }
    }
}
