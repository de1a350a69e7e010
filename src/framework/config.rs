use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use url::Url;

use super::{env, logging::DEFAULT_FILTER, Environment};
use crate::square::{
    dictionary::{self, HttpDictionary},
    generator::DEFAULT_MAX_ATTEMPTS,
    DictionaryValidator, LoadError, WordsList,
};

pub const DEFAULT_CONFIG_FILE: &str = "./wordsquare.toml";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("problem loading environment: {0}")]
    Env(#[from] env::Error),

    #[error("file read error: {0}")]
    Read(::config::ConfigError),

    #[error("parsing error: {0}")]
    Parse(::config::ConfigError),
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub words: WordsConfig,
    pub generator: GeneratorConfig,
    pub dictionary: DictionaryConfig,
    pub storage: StorageConfig,
    pub logs: LogsConfig,
}

impl AppConfig {
    /// Resolves the config file (`path`, then `WORDSQUARE_CONFIG_FILE`, then
    /// `./wordsquare.toml`) and layers `WORDSQUARE__*` overrides on top.
    ///
    /// Only a file that was asked for explicitly has to exist.
    #[instrument(skip_all, name = "config")]
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        let env = Environment::load()?;

        let (file, required) = match path.or(env.config_file()) {
            Some(path) => (path.to_owned(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        let config = Self::from_sources(&file, required, None)?;
        info!(file = %file.display(), "loaded config");
        Ok(config)
    }

    /// `overrides` replaces the process environment, for tests.
    fn from_sources(
        file: &Path,
        required: bool,
        overrides: Option<HashMap<String, String>>,
    ) -> Result<Self, Error> {
        debug!(file = %file.display(), required, "reading config");

        ::config::Config::builder()
            .add_source(
                ::config::File::from(file)
                    .format(::config::FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                ::config::Environment::with_prefix(env::OVERRIDE_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .source(overrides),
            )
            .build()
            .map_err(Error::Read)?
            .try_deserialize()
            .map_err(Error::Parse)
    }

    pub fn words_list(&self) -> Result<WordsList, LoadError> {
        WordsList::load_or_bundled(self.words.file.as_deref())
    }

    pub fn validator(&self, words: Arc<WordsList>) -> DictionaryValidator {
        let validator = if self.dictionary.enabled {
            DictionaryValidator::new(words, HttpDictionary::new(self.dictionary.remote_url.clone()))
        } else {
            DictionaryValidator::offline(words)
        };

        validator.with_timeout(self.dictionary.timeout())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct WordsConfig {
    /// Replaces the bundled list when set.
    pub file: Option<PathBuf>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct GeneratorConfig {
    pub max_attempts: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct DictionaryConfig {
    pub enabled: bool,
    pub remote_url: Url,
    pub timeout_ms: u64,
}

impl DictionaryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            remote_url: HttpDictionary::default().base().clone(),
            timeout_ms: u64::try_from(dictionary::DEFAULT_TIMEOUT.as_millis())
                .unwrap_or(u64::MAX),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
    pub dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./wordsquare-data"),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LogsConfig {
    pub filter: String,
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_owned(),
        }
    }
}
