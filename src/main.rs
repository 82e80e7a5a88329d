//! ossmirror - mirror a remote file into an OSS bucket
//!
//! CLI entry point: one URL per invocation, exit status 0 on a complete
//! mirror and 1 on any failure.

use clap::Parser;
use console::style;
use ossmirror::cache::LocalCache;
use ossmirror::cli::{Cli, LogFormat};
use ossmirror::config::ConfigManager;
use ossmirror::fetch::HttpFetcher;
use ossmirror::publish::ObjectStorePublisher;
use ossmirror::ui::UiContext;
use ossmirror::{Mirror, MirrorRequest, MirrorResult};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(stage = e.stage(), "exited with error: {} stage: {}", e.stage(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) {
    // RUST_LOG wins over the verbosity flags
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    match cli.log_format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

async fn run(cli: Cli) -> MirrorResult<()> {
    // Validate input before touching the filesystem or the network
    let request = MirrorRequest::parse(cli.url.as_deref().unwrap_or_default())?;

    let config = ConfigManager::with_path(cli.config).load().await?;

    info!("bucket: {}", config.oss_bucket);
    let publisher = ObjectStorePublisher::from_config(&config)?;
    let fetcher = HttpFetcher::new(UiContext::detect());

    info!("url: {}", request);
    let mirror = Mirror::new(
        LocalCache::new(config.workspace.clone()),
        fetcher,
        publisher,
        config.oss_public_url.clone(),
    );
    mirror.run(&request).await?;

    info!("done");
    Ok(())
}
