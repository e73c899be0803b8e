use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use objexplore::Outcome;
use objexplore_tui::config::{load_options, Overrides};
use objexplore_tui::{demo, explore_with_options, load_document};
use std::fs::File;
use std::path::PathBuf;

/// Interactively explore a JSON document or the built-in demo objects
#[derive(Debug, Parser)]
#[command(name = "objexplore", version, about)]
struct Args {
    /// JSON document to explore; the demo objects are used when omitted
    file: Option<PathBuf>,

    /// Explore the built-in demo objects
    #[arg(long, conflicts_with = "file")]
    demo: bool,

    /// Show private members from the start
    #[arg(long, short)]
    all: bool,

    /// Maximum members classified per object
    #[arg(long)]
    max_members: Option<usize>,

    /// Wrap the selection around at either end of the list
    #[arg(long)]
    wrap: bool,

    /// Allow exploring dunder members
    #[arg(long)]
    dunders: bool,

    /// JSON file with explorer options
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write logs to this file (RUST_LOG sets the level)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

fn init_logging(path: Option<&PathBuf>) -> Result<()> {
    // The terminal belongs to the UI, so logs only go to a file
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_ref())?;

    let overrides = Overrides {
        show_all: args.all,
        max_members: args.max_members,
        wrap: args.wrap,
        dunders: args.dunders,
    };
    let options = overrides.apply(load_options(args.config.as_deref())?);

    let (object, label) = match &args.file {
        Some(path) if !args.demo => {
            let label = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| "document".to_string());
            (load_document(path)?, label)
        }
        _ => (demo::demo_object(), "demo".to_string()),
    };

    info!("starting explorer on `{}`", label);
    match explore_with_options(&object, &label, options)? {
        Outcome::Selected(value) => println!("{}", value.repr()),
        Outcome::Exited => {}
    }
    Ok(())
}
