use anyhow::Context;
use clap::Parser;
use knights_tour_core::{BoardSize, PlayerName};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod app;
mod command;
mod render;
mod store;

#[derive(Parser, Debug)]
#[command(version, about = "Knight's tour puzzle for the terminal", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Name recorded with your scores
    #[arg(short, long, default_value = "Player")]
    name: String,

    /// Board size for new tours, remembered for next time
    #[arg(short, long)]
    size: Option<BoardSize>,

    /// JSON file scores and settings are kept in
    #[arg(long)]
    store: Option<PathBuf>,
}

fn default_store_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "knights-tour")
        .map(|dirs| dirs.data_dir().join("store.json"))
        .unwrap_or_else(|| PathBuf::from("./knights-tour.json"))
}

fn init_logging(verbose: &clap_verbosity_flag::Verbosity) -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(verbose.tracing_level_filter().into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))
        .context("failed to initialize logger")
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.verbose)?;

    let player = PlayerName::new(&args.name).context("invalid --name")?;
    let path = args.store.unwrap_or_else(default_store_path);
    let store = store::FileStore::open(&path)?;
    log::debug!("using store {}", store.path().display());

    let mut app = app::App::new(player, store);
    if let Some(size) = args.size {
        app.remember_board_size(size);
    }
    app.run().await
}
