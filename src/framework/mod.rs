pub mod config;
pub use config::AppConfig as Config;

pub mod env;
pub use env::Environment;

pub mod logging;
