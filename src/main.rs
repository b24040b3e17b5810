//! tavola: text-to-speech journal service with history mindmaps.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tavola::api::{self, AppState};
use tavola::config::Config;
use tavola::diagram::OpenAiDiagramGenerator;
use tavola::history::HistoryStore;
use tavola::mindmap::Mindmap;
use tavola::tts::GoogleTts;

#[derive(Parser, Debug)]
#[command(name = "tavola", about = "Text-to-speech journal service with history mindmaps")]
struct Args {
    /// Path to config.yaml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides config and PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose (debug) logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize logging (suppress noisy HTTP internals)
    let filter = if args.verbose {
        EnvFilter::new("debug,hyper=info,reqwest=info")
    } else {
        EnvFilter::new("info,hyper=warn,reqwest=warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("tavola starting");

    if dotenv::dotenv().is_ok() {
        info!("Loaded environment from .env");
    }

    let mut config = Config::load(args.config.as_deref());
    if let Some(port) = args.port {
        config.server.port = port;
    }
    info!("Texts directory: {}", config.storage.texts_dir.display());

    // Collaborators are built once here and shared by every request
    let tts = GoogleTts::new(&config.tts)?;
    let diagrams = OpenAiDiagramGenerator::new(&config.llm)?;

    let state = AppState {
        store: Arc::new(HistoryStore::new(config.storage.texts_dir.clone())),
        tts: Arc::new(tts),
        diagrams: Arc::new(diagrams),
        mindmap: Arc::new(Mindmap::new(config.mindmap.options())),
        language_code: config.tts.language_code.clone(),
    };

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    api::serve(state, addr).await?;

    Ok(())
}
