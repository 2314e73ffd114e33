use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use affinity::bluesky::client::PublicAtpClient;
use affinity::bluesky::source::BlueskySource;
use affinity::config::Config;
use affinity::output::terminal::{write_comparison, write_tokens};
use affinity::output::ComparisonReport;
use affinity::profile::ProfileRecord;
use affinity::similarity::compare;
use affinity::snapshot::{save_snapshot, Snapshot, SnapshotSource};
use affinity::source::ProfileSource;
use affinity::text::{Stopwords, Tokenizer};

/// Affinity: how similar are two Bluesky accounts?
///
/// Combines shared follows, shared followers, shared mentions, and shared
/// vocabulary in bios, posts, and likes into one score with a breakdown.
#[derive(Parser)]
#[command(name = "affinity", version, about)]
struct Cli {
    /// Read profiles from snapshot files in this directory instead of the network
    #[arg(long, global = true)]
    offline: Option<PathBuf>,

    /// Stopword file, one word per line (overrides AFFINITY_STOPWORDS)
    #[arg(long, global = true)]
    stopwords: Option<PathBuf>,

    /// Disable stopword filtering entirely
    #[arg(long, global = true, conflicts_with = "stopwords")]
    no_stopwords: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two accounts
    Compare {
        /// First handle (e.g. alice.bsky.social)
        first: String,
        /// Second handle
        second: String,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Prompt for pairs of handles and compare them until you stop
    Interactive,

    /// Fetch an account and save it as a JSON snapshot
    Snapshot {
        handle: String,
        /// Directory to write into (default: AFFINITY_SNAPSHOT_DIR)
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Show how a piece of text is tokenized
    Tokenize {
        text: String,
        /// Use the plain tokenizer (no @mention/#hashtag merging)
        #[arg(long)]
        plain: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("affinity=info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    let stopwords = load_stopwords(&cli, &config);

    match cli.command {
        Commands::Compare {
            ref first,
            ref second,
            json,
        } => {
            let source = create_source(&cli, &config)?;
            let tokenizer = Tokenizer::social(stopwords);

            let a = fetch_with_spinner(source.as_ref(), first).await?;
            let b = fetch_with_spinner(source.as_ref(), second).await?;

            let result = compare(&a, &b, &tokenizer);
            info!(
                first = a.handle(),
                second = b.handle(),
                score = result.score(),
                "Compared profiles"
            );

            if json {
                let report = ComparisonReport::new(&a, &b, &result);
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!();
                write_comparison(&mut io::stdout(), &a, &b, &result)?;
            }
        }

        Commands::Interactive => {
            let source = create_source(&cli, &config)?;
            let tokenizer = Tokenizer::social(stopwords);
            let stdin = io::stdin();
            affinity::interactive::run(source.as_ref(), &tokenizer, stdin.lock(), io::stdout())
                .await?;
        }

        Commands::Snapshot {
            ref handle,
            ref dir,
        } => {
            let source = create_source(&cli, &config)?;
            let profile = fetch_with_spinner(source.as_ref(), handle).await?;
            let dir = dir.clone().unwrap_or_else(|| config.snapshot_dir.clone());
            let path = save_snapshot(&dir, &Snapshot::now(profile))?;
            println!("{}", format!("Snapshot saved to: {}", path.display()).bold());
        }

        Commands::Tokenize { ref text, plain } => {
            let tokenizer = if plain {
                Tokenizer::plain(stopwords)
            } else {
                Tokenizer::social(stopwords)
            };
            write_tokens(&mut io::stdout(), &tokenizer.tokenize(text))?;
        }
    }

    Ok(())
}

/// Pick the stopword list. A file that can't be read is a warning, not a
/// failure: tokenization then runs without stopwords.
fn load_stopwords(cli: &Cli, config: &Config) -> Option<Stopwords> {
    if cli.no_stopwords {
        return None;
    }

    match cli.stopwords.as_ref().or(config.stopwords_path.as_ref()) {
        Some(path) => match Stopwords::load(path) {
            Ok(stopwords) => Some(stopwords),
            Err(e) => {
                warn!(error = %e, "Could not load stopwords");
                eprintln!(
                    "{} could not load stopwords ({e}); proceeding without stopwords.",
                    "Warning:".yellow()
                );
                None
            }
        },
        None => Some(Stopwords::english()),
    }
}

fn create_source(cli: &Cli, config: &Config) -> Result<Box<dyn ProfileSource>> {
    match &cli.offline {
        Some(dir) => {
            info!(dir = %dir.display(), "Using offline snapshots");
            Ok(Box::new(SnapshotSource::new(dir.clone())))
        }
        None => {
            let client = PublicAtpClient::new(&config.public_api_url)?;
            Ok(Box::new(BlueskySource::new(client, config.limits)))
        }
    }
}

async fn fetch_with_spinner(source: &dyn ProfileSource, handle: &str) -> Result<ProfileRecord> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner} {msg}")
            .expect("valid template"),
    );
    spinner.set_message(format!("Getting information for {handle}..."));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = source.fetch(handle).await;
    spinner.finish_and_clear();
    result
}
