//! Translator-RS terminal host
//!
//! Reads one query per line from stdin and prints the result list. A plain
//! line is live input; `/s <text>` is settled input; `/copy <text>` sets the
//! clipboard. Requery requests from the debounce timer re-run the settled
//! path.

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;
use translator_rs::{
    config::{self, Settings},
    host::{ChannelHost, ClipboardAccess, MemoryClipboard},
    lookup::{self, LookupBackend},
    network::HttpClient,
    QueryDispatcher, ResultEntry,
};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = match parse_args()? {
        Some(settings) => config::init(settings)?,
        None => return Ok(()),
    };

    // Initialize logging; stdout carries results
    let default_level = if settings.general.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting Translator-RS v{}", translator_rs::VERSION);

    let client = HttpClient::with_settings(&settings.outgoing)?;
    let backend = LookupBackend::new(lookup::build(settings, &client)?);
    backend.ensure_ready();

    let (host, mut requeries) = ChannelHost::new();
    let clipboard = Arc::new(MemoryClipboard::new());
    let dispatcher =
        QueryDispatcher::new(backend, settings, Arc::new(host), clipboard.clone());

    info!(
        "Target language: {}, suggestions: {}",
        settings.query.default_target_language, settings.query.enable_suggestions
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let results = if let Some(text) = line.strip_prefix("/s ") {
                    dispatcher.handle_settled_input(text).await
                } else if let Some(text) = line.strip_prefix("/copy ") {
                    clipboard.write_text(text);
                    continue;
                } else {
                    dispatcher.handle_live_input(&line).await
                };
                print_results(&results);
            }
            Some(text) = requeries.recv() => {
                let results = dispatcher.handle_settled_input(&text).await;
                print_results(&results);
            }
        }
    }

    Ok(())
}

fn print_results(results: &[ResultEntry]) {
    println!("----");
    for entry in results {
        match entry.from_api_name {
            Some(ref api) => println!("{}\t{}\t({})", entry.title, entry.subtitle, api),
            None => println!("{}\t{}", entry.title, entry.subtitle),
        }
    }
}

/// Parse command line arguments; `None` means the process should exit
fn parse_args() -> Result<Option<Settings>> {
    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-c" | "--config" => {
                i += 1;
                let path = args
                    .get(i)
                    .ok_or_else(|| anyhow::anyhow!("--config requires a path"))?;
                config_path = Some(PathBuf::from(path));
            }
            "-h" | "--help" => {
                print_usage();
                return Ok(None);
            }
            "-V" | "--version" => {
                println!("translator-rs {}", translator_rs::VERSION);
                return Ok(None);
            }
            other => anyhow::bail!("Unknown argument: {}", other),
        }
        i += 1;
    }

    let settings = match config_path {
        Some(path) => config::load_from(&path)?,
        None => config::load()?,
    };
    Ok(Some(settings))
}

/// Print usage information
fn print_usage() {
    println!(
        r#"
Translator-RS v{}
A debounced, multi-source translation lookup engine

USAGE:
    translator-rs [OPTIONS]

Type a query per line. Prefix with "/s " for settled input,
"/copy " to set the clipboard. An empty line translates the
clipboard or shows history; "h" shows history.

OPTIONS:
    -c, --config <FILE>    Path to configuration file
    -h, --help             Print help information
    -V, --version          Print version information

ENVIRONMENT VARIABLES:
    TRANSLATOR_SETTINGS_PATH       Path to settings.yml
    TRANSLATOR_DEBUG               Append diagnostic entries (true/false)
    TRANSLATOR_TARGET_LANGUAGE     Target language code
    TRANSLATOR_PROVIDER            Provider for translate and suggest
    TRANSLATOR_YOUDAO_APP_KEY      Youdao OpenAPI app key
    TRANSLATOR_YOUDAO_APP_SECRET   Youdao OpenAPI app secret
    RUST_LOG                       Log filter
"#,
        translator_rs::VERSION
    );
}
