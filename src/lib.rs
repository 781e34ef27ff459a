//! Cardio Predict core library
//!
//! Heart disease risk scoring through an LLM inference provider, with
//! MongoDB or local-file persistence selected once at startup.

pub mod ai;
pub mod api;
pub mod db;
pub mod models;

/// Application configuration
pub mod config {
    use std::path::PathBuf;

    use serde::Deserialize;

    #[derive(Debug, Clone, Deserialize)]
    pub struct Config {
        /// Connection URI for the MongoDB backend. When unset the server
        /// goes straight to local JSON storage without probing.
        pub mongo_uri: Option<String>,
        pub groq_api_key: String,
        #[serde(default = "default_port")]
        pub port: u16,
        #[serde(default = "default_storage_file")]
        pub storage_file: PathBuf,
    }

    fn default_port() -> u16 {
        5001
    }

    fn default_storage_file() -> PathBuf {
        PathBuf::from("predictions_storage.json")
    }

    /// Load configuration from the process environment.
    pub fn load() -> Result<Config, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::default())
            .build()?
            .try_deserialize()
    }

}
