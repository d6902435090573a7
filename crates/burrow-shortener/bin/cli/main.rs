mod cli;

use crate::cli::{Command, LogFormatArg, StorageBackendArg, CLI};
use anyhow::Context;
use burrow_core::{Repository, Shortener};
use burrow_generator::{OsEntropy, RandomGenerator};
use burrow_shortener::{ShortenerService, ShortenerSettings};
use burrow_storage::{InMemoryRepository, SqliteRepository};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();
    init_tracing(config.log_format);

    info!(
        storage_backend = %config.storage,
        exists_retry = config.exists_retry,
        "starting burrow"
    );

    let settings = ShortenerSettings::builder()
        .exists_retry(config.exists_retry)
        .build();

    match config.storage {
        StorageBackendArg::InMemory => run(InMemoryRepository::new(), settings, &config).await,
        StorageBackendArg::Sqlite => {
            let repository = SqliteRepository::open(&config.database_path)
                .await
                .with_context(|| {
                    format!("failed to open database {}", config.database_path.display())
                })?;
            run(repository, settings, &config).await
        }
    }
}

fn init_tracing(format: LogFormatArg) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormatArg::Text => builder.init(),
        LogFormatArg::Json => builder.json().init(),
    }
}

async fn run<R: Repository>(
    repository: R,
    settings: ShortenerSettings,
    config: &CLI,
) -> anyhow::Result<()> {
    let service = ShortenerService::new(repository, RandomGenerator::new(OsEntropy), settings);

    match &config.command {
        Command::Shorten { urls } => {
            for url in urls {
                let code = service
                    .shorten(url)
                    .await
                    .with_context(|| format!("failed to shorten {url:?}"))?;
                match &config.base_url {
                    Some(base_url) => println!("{}", code.to_url(base_url)),
                    None => println!("{code}"),
                }
            }
        }
        Command::Resolve { codes } => {
            for code in codes {
                let long_url = service
                    .resolve(code)
                    .await
                    .with_context(|| format!("failed to resolve {code:?}"))?;
                println!("{long_url}");
            }
        }
    }

    Ok(())
}
