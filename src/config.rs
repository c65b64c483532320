use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing_subscriber::filter::LevelFilter;

/// Which `Storage` backend to construct at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageMode {
    /// Records are kept in process memory only.
    Memory,
    /// Records are kept in memory and mirrored to a JSON file.
    File,
}

/// Runtime configuration. Every option can be given as a flag or through the
/// environment (populated by dotenvy before this is parsed); flags win.
#[derive(Debug, Clone, Parser)]
#[command(name = "shortener", version, about = "URL shortening HTTP service")]
pub struct AppConfig {
    /// Address to bind the HTTP server to (host:port)
    #[arg(short = 'a', long = "address", env = "SERVER_ADDRESS", default_value = "localhost:8080")]
    pub server_address: String,

    /// Public base URL used when generating short links, e.g. "https://go.example.com"
    #[arg(short = 'b', long, env = "BASE_URL", default_value = "http://localhost:8080")]
    pub base_url: String,

    /// Storage backend to use
    #[arg(short = 's', long, env = "STORAGE_TYPE", value_enum, default_value_t = StorageMode::File)]
    pub storage: StorageMode,

    /// Default log level; RUST_LOG overrides it when set
    #[arg(short = 'l', long, env = "LOGLEVEL", default_value = "info")]
    pub log_level: LevelFilter,

    /// Path of the JSON document used by the file storage backend
    #[arg(short = 'f', long, env = "FILE_STORAGE_PATH", default_value = "/tmp/short-url-db.json")]
    pub file_storage_path: PathBuf,
}

impl AppConfig {
    /// Parse configuration from the process arguments and environment.
    /// Exits with a usage message on invalid input.
    pub fn load() -> Self {
        Self::parse().normalized()
    }

    // Short URLs are built as "{base_url}/{code}".
    fn normalized(mut self) -> Self {
        self.base_url = self.base_url.trim_end_matches('/').to_owned();
        self
    }
}

#[cfg(test)]
impl AppConfig {
    pub fn try_from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::try_parse_from(args).map(Self::normalized)
    }

    /// In-memory configuration for handler tests.
    pub fn for_tests() -> Self {
        Self {
            server_address: "localhost:8080".into(),
            base_url: "http://localhost:8080".into(),
            storage: StorageMode::Memory,
            log_level: LevelFilter::INFO,
            file_storage_path: PathBuf::from("/tmp/short-url-db.json"),
        }
    }
}
