use std::{
    env::VarError,
    path::{Path, PathBuf},
};

use tracing::{debug, trace};

pub const CONFIG_FILE_VAR: &str = "WORDSQUARE_CONFIG_FILE";

/// Prefix for per-field overrides, e.g. `WORDSQUARE__GENERATOR__MAX_ATTEMPTS`.
pub const OVERRIDE_PREFIX: &str = "WORDSQUARE";

#[derive(Debug, thiserror::Error)]
#[error("couldn't load environment variable '{key}': {message}")]
pub struct Error {
    key: &'static str,
    message: &'static str,
}

#[derive(Debug, Clone, Default)]
pub struct Environment {
    config_file: Option<PathBuf>,
}

impl Environment {
    /// Reads `.env` if there is one, then the process environment.
    pub fn load() -> Result<Self, Error> {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "loaded .env"),
            Err(err) if err.not_found() => trace!("no .env file"),
            Err(_) => {
                return Err(Error {
                    key: ".env",
                    message: "file exists but couldn't be parsed",
                })
            }
        }

        Self::from_vars()
    }

    fn from_vars() -> Result<Self, Error> {
        let config_file = match std::env::var(CONFIG_FILE_VAR) {
            Ok(path) => Some(PathBuf::from(path)),
            Err(VarError::NotPresent) => None,
            Err(VarError::NotUnicode(_)) => {
                return Err(Error {
                    key: CONFIG_FILE_VAR,
                    message: "path to configuration must be valid UTF-8",
                })
            }
        };

        Ok(Self { config_file })
    }

    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }
}
