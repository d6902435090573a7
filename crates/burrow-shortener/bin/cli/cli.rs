use burrow_shortener::settings::DEFAULT_EXISTS_RETRY;
use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const STORAGE_BACKEND_ENV: &str = "BURROW_STORAGE_BACKEND";
pub const DATABASE_PATH_ENV: &str = "BURROW_DATABASE_PATH";
pub const EXISTS_RETRY_ENV: &str = "BURROW_EXISTS_RETRY";
pub const BASE_URL_ENV: &str = "BURROW_BASE_URL";
pub const LOG_FORMAT_ENV: &str = "BURROW_LOG_FORMAT";

pub const DEFAULT_DATABASE_PATH: &str = "burrow.db";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "sqlite")]
    Sqlite,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Sqlite => write!(f, "sqlite"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store each URL under a new short code and print the codes, one per line.
    Shorten {
        #[arg(required = true)]
        urls: Vec<String>,
    },
    /// Print the URL stored for each short code, one per line.
    Resolve {
        #[arg(required = true)]
        codes: Vec<String>,
    },
}

#[derive(Debug, Parser)]
#[command(name = "burrow", about = "Map long URLs to short codes and back")]
pub struct CLI {
    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::Sqlite
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = DATABASE_PATH_ENV, default_value = DEFAULT_DATABASE_PATH)]
    pub database_path: PathBuf,

    #[arg(long, env = EXISTS_RETRY_ENV, default_value_t = DEFAULT_EXISTS_RETRY)]
    pub exists_retry: usize,

    /// Print full short URLs joined to this base instead of bare codes.
    #[arg(long, env = BASE_URL_ENV)]
    pub base_url: Option<String>,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormatArg::Text)]
    pub log_format: LogFormatArg,

    #[command(subcommand)]
    pub command: Command,
}
