//! certpath - certification roadmap tracker

mod render;
mod repl;

use anyhow::Context;
use certpath_core::{StaticIdentityProvider, Tracker, TrackerConfig};
use certpath_model::{seed, RoadmapDocument};
use certpath_store::{
    Capability, DirRemoteStore, FileLocalStore, PersistenceRouter, RemoteStoreSession,
};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("certpath")
        .version(certpath_core::VERSION)
        .about("Track progress along the Agentic AI Architect certification roadmap")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("TOML config file (CERTPATH_* variables override it)"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
        .subcommand(Command::new("repl").about("Interactive tracker with autosave (default)"))
        .subcommand(
            Command::new("progress")
                .about("Print the progress summary of the stored roadmap")
                .long_about(
                    "Print the progress summary of the stored roadmap.\n\n\
                     With a remote folder and an identity configured this reads the \
                     identity's remote document, otherwise the local slot. The default \
                     roadmap is used when nothing is stored yet.",
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Write a dated backup of the stored roadmap")
                .arg(
                    Arg::new("dir")
                        .value_parser(clap::value_parser!(PathBuf))
                        .help("Target directory (defaults to the data directory)"),
                ),
        )
        .subcommand(Command::new("schedule").about("Print the weekly study plan"))
}

fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("certpath=info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Persistence router for the configured capability
fn build_router(config: &TrackerConfig) -> PersistenceRouter {
    let local = Arc::new(FileLocalStore::in_dir(&config.data_dir));
    match config.capability() {
        Capability::Remote { folder } => {
            let store = Arc::new(DirRemoteStore::new(&folder));
            let session = RemoteStoreSession::open(store, folder, config.remote_policy());
            PersistenceRouter::with_remote(local, session)
        }
        Capability::LocalOnly => {
            tracing::info!("no remote folder configured, saving locally");
            PersistenceRouter::local_only(local)
        }
    }
}

/// Wire configuration into a tracker
fn build_tracker(config: &TrackerConfig) -> Tracker {
    let identity = Arc::new(StaticIdentityProvider::new(config.identity.identity()));
    Tracker::open(Arc::new(build_router(config)), identity, config.quiescent_window())
        .with_app_name(config.app_name.clone())
}

/// The document a session for the configured identity would see
///
/// Reads the identity's remote document when a remote folder is configured,
/// the local slot otherwise. Nothing stored yields the default roadmap.
async fn stored_document(config: &TrackerConfig) -> anyhow::Result<RoadmapDocument> {
    let router = build_router(config);
    let loaded = match (config.capability(), config.identity.identity()) {
        (Capability::Remote { .. }, Some(identity)) => router
            .load_remote(&identity)
            .await
            .with_context(|| format!("loading remote roadmap for {}", identity.email)),
        (Capability::Remote { .. }, None) => {
            tracing::warn!("remote folder configured without an identity, reading local slot");
            router.load_local().context("loading local roadmap")
        }
        (Capability::LocalOnly, _) => router.load_local().context("loading local roadmap"),
    };
    router.close();
    Ok(loaded?.unwrap_or_else(|| seed::default_roadmap().clone()))
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<TrackerConfig> {
    let path = matches.get_one::<PathBuf>("config");
    TrackerConfig::load(path.map(PathBuf::as_path)).with_context(|| match path {
        Some(path) => format!("loading config from {}", path.display()),
        None => "loading config from environment".to_string(),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("log-json"));

    let config = load_config(&matches)?;

    match matches.subcommand() {
        Some(("progress", args)) => {
            let doc = stored_document(&config).await?;
            let summary = certpath_model::ProgressSummary::of(&doc);
            if args.get_flag("json") {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&summary)
                        .context("encoding progress")?
                );
            } else {
                print!("{}", render::progress(&summary));
            }
        }
        Some(("export", args)) => {
            let doc = stored_document(&config).await?;
            let dir = args
                .get_one::<PathBuf>("dir")
                .cloned()
                .unwrap_or_else(|| config.data_dir.clone());
            let path = certpath_store::write_backup(&dir, &doc, chrono::Utc::now().date_naive())
                .await
                .with_context(|| format!("exporting to {}", dir.display()))?;
            println!("Exported {}", path.display());
        }
        Some(("schedule", _)) => print!("{}", render::schedule()),
        _ => {
            let tracker = Arc::new(build_tracker(&config));
            repl::run(tracker, &config).await?;
        }
    }
    Ok(())
}
