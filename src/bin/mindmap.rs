//! mindmap: build the topic tree of a history log from the command line.
//!
//! Reads a log file (or stdin) in the `[timestamp] [Tema: x] text` format
//! and prints the resulting tree as JSON.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tavola::mindmap::{Mindmap, MindmapOptions, DEFAULT_MAX_KEYWORDS};

#[derive(Parser, Debug)]
#[command(name = "mindmap", about = "Print the mindmap of a text history log as JSON")]
struct Args {
    /// History log to read (stdin when omitted)
    file: Option<PathBuf>,

    /// Root theme, replacing the one derived from the log
    #[arg(short, long)]
    theme: Option<String>,

    /// Maximum keywords per entry
    #[arg(short = 'k', long, default_value_t = DEFAULT_MAX_KEYWORDS)]
    max_keywords: usize,

    /// Print single-line JSON
    #[arg(long)]
    compact: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let raw_log = match &args.file {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input)?;
            input
        }
    };

    let mindmap = Mindmap::new(MindmapOptions {
        max_keywords: args.max_keywords,
        ..MindmapOptions::default()
    });
    let tree = mindmap.build(&raw_log, args.theme.as_deref());

    let json = if args.compact {
        serde_json::to_string(&tree)?
    } else {
        serde_json::to_string_pretty(&tree)?
    };
    println!("{json}");

    Ok(())
}
