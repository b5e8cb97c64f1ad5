//! `metadata-resolver` resolves artist biographies, artist images and album
//! covers from MusicBrainz, Last.fm, Fanart.tv, the Cover Art Archive and
//! Wikipedia, and prints the result as JSON.
//!
//! Credentials come from the environment (`LASTFM_API_KEY`, `FANART_API_KEY`,
//! `MUSICBRAINZ_USER_AGENT`, `METADATA_LANGUAGES`); agents whose key is
//! missing are simply skipped.

use std::sync::Arc;

use anyhow::{Context, Result};
use bridge_desktop::ReqwestHttpClient;
use clap::{Parser, Subcommand, ValueEnum};
use core_metadata::{HttpImageProbe, MetadataOrchestrator};
use core_runtime::config::ResolverConfig;
use core_runtime::logging::{init_logging, LogFormat, LogLevel, LoggingConfig};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "metadata-resolver", version, about)]
struct Args {
    /// Minimum log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "warn", env = "METADATA_LOG_LEVEL")]
    log_level: String,

    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogOutput::Compact)]
    log_format: LogOutput,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// First biography found, trying providers in priority order.
    Bio {
        /// Artist name.
        name: String,
        /// MusicBrainz artist ID, if already known.
        #[arg(long)]
        mbid: Option<String>,
    },
    /// Every artist image from every provider, deduplicated.
    Avatars {
        name: String,
        #[arg(long)]
        mbid: Option<String>,
    },
    /// Album covers.
    Covers {
        artist: String,
        album: String,
        /// MusicBrainz release ID, if already known.
        #[arg(long)]
        release_mbid: Option<String>,
        /// Collect covers from every provider instead of stopping at the first.
        #[arg(long)]
        all: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LogOutput {
    Pretty,
    Compact,
    Json,
}

impl From<LogOutput> for LogFormat {
    fn from(output: LogOutput) -> Self {
        match output {
            LogOutput::Pretty => LogFormat::Pretty,
            LogOutput::Compact => LogFormat::Compact,
            LogOutput::Json => LogFormat::Json,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level: LogLevel = args.log_level.parse()?;
    init_logging(
        LoggingConfig::default()
            .with_format(args.log_format.into())
            .with_level(level),
    )?;

    let config = ResolverConfig::from_env().context("invalid resolver configuration")?;
    let http_client = Arc::new(ReqwestHttpClient::new()?);
    let probe = Arc::new(HttpImageProbe::new(http_client.clone(), config.probe_timeout));
    let orchestrator = MetadataOrchestrator::from_config(&config, http_client, probe);

    info!(
        agents = orchestrator.registry().len(),
        lastfm = config.api.has_lastfm(),
        fanart = config.api.has_fanart(),
        "Resolver ready"
    );

    let output = match args.command {
        Command::Bio { name, mbid } => {
            serde_json::to_string_pretty(&orchestrator.resolve_bio(mbid.as_deref(), &name).await)?
        }
        Command::Avatars { name, mbid } => serde_json::to_string_pretty(
            &orchestrator.aggregate_avatars(mbid.as_deref(), &name).await,
        )?,
        Command::Covers {
            artist,
            album,
            release_mbid,
            all,
        } => {
            if all {
                serde_json::to_string_pretty(
                    &orchestrator
                        .aggregate_covers(release_mbid.as_deref(), &artist, &album)
                        .await,
                )?
            } else {
                serde_json::to_string_pretty(
                    &orchestrator
                        .resolve_covers(release_mbid.as_deref(), &artist, &album)
                        .await,
                )?
            }
        }
    };

    println!("{output}");
    Ok(())
}
