//! Anchorage CLI
//!
//! Usage:
//!   anchorage [OPTIONS] [FILE]
//!
//! Options:
//!   -W, --width <W>          Root width when the scene has no [root] section
//!   -H, --height <H>         Root height when the scene has no [root] section
//!   -p, --precision <N>      Decimal places in printed frames
//!   -v, --verbose            Log activation and layout passes
//!   -h, --help               Print help

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use anchorage::{LayoutConfig, Scene};

#[derive(Parser)]
#[command(name = "anchorage")]
#[command(about = "Lay out a TOML scene of anchored views and print their frames")]
struct Cli {
    /// Scene file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Root width when the scene has no [root] section
    #[arg(short = 'W', long)]
    width: Option<f64>,

    /// Root height when the scene has no [root] section
    #[arg(short = 'H', long)]
    height: Option<f64>,

    /// Decimal places in printed frames
    #[arg(short, long)]
    precision: Option<usize>,

    /// Log activation and layout passes
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    let mut config = LayoutConfig::default();
    let (default_width, default_height) = config.root_size;
    config = config.with_root_size(
        cli.width.unwrap_or(default_width),
        cli.height.unwrap_or(default_height),
    );
    if let Some(precision) = cli.precision {
        config = config.with_precision(precision);
    }

    // Read input
    let (source, filename) = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => (content, path.display().to_string()),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => (buffer, "<stdin>".to_string()),
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let result = Scene::from_str(&source).and_then(|scene| scene.build(&config));
    match result {
        Ok(layout) => {
            println!("{}", layout.render(config.precision));
        }
        Err(e) => {
            eprintln!("{}", e.format(&source, &filename));
            std::process::exit(1);
        }
    }
}
