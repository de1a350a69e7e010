use std::future::Future;

use reqwest::{StatusCode, Url};
use tracing::trace;

use super::RemoteDictionary;
use crate::square::core::Word;

pub const DEFAULT_URL: &str = "https://api.dictionaryapi.dev/api/v2/entries/en/";

#[derive(Debug, thiserror::Error)]
pub enum HttpDictionaryError {
    #[error("couldn't build lookup url: {0}")]
    Url(#[from] url::ParseError),

    #[error("unexpected status {0}")]
    Status(StatusCode),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
}

/// Spelling lookup over HTTP: `GET {base}{word}`, where 200 means the word
/// exists and 404 means it doesn't.
#[derive(Debug, Clone)]
pub struct HttpDictionary {
    client: reqwest::Client,
    base: Url,
}

impl HttpDictionary {
    pub fn new(base: Url) -> Self {
        Self::with_client(reqwest::Client::new(), base)
    }

    pub fn with_client(client: reqwest::Client, base: Url) -> Self {
        Self { client, base }
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub fn lookup_url(&self, word: &Word) -> Result<Url, url::ParseError> {
        self.base.join(&word.to_string().to_lowercase())
    }

    async fn lookup(&self, word: &Word) -> Result<bool, HttpDictionaryError> {
        let url = self.lookup_url(word)?;
        trace!(%url, "looking up word");

        let status = self.client().get(url).send().await?.status();

        match status {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            other => Err(HttpDictionaryError::Status(other)),
        }
    }
}

impl Default for HttpDictionary {
    fn default() -> Self {
        Self::new(Url::parse(DEFAULT_URL).expect("default dictionary url is valid"))
    }
}

impl RemoteDictionary for HttpDictionary {
    type Error = HttpDictionaryError;

    fn contains(&self, word: &Word) -> impl Future<Output = Result<bool, Self::Error>> + Send {
        self.lookup(word)
    }
}
