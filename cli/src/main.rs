// SPDX-License-Identifier: MIT OR Apache-2.0

//! chessgrid CLI - headless driver for the selection core
//!
//! Reads commands from stdin (or a script file) and feeds cell interactions
//! into a match. Mostly used for manual testing and scripted scenarios.

use anyhow::{Context, Result};
use chessgrid_cli::commands::{execute, parse_command, Command, HELP};
use chessgrid_cli::render::render_board;
use chessgrid_core::config::{default_config_path, load_config};
use chessgrid_core::diagnostics::JsonSink;
use chessgrid_core::MatchContext;
use clap::Parser;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

/// Command-line arguments
#[derive(Parser, Debug)]
#[clap(
    name = "chessgrid-cli",
    about = "Board selection engine command-line interface",
    version
)]
struct Args {
    /// Config file (defaults to the platform config directory)
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Override the configured board width
    #[clap(long)]
    width: Option<u8>,

    /// Override the configured board height
    #[clap(long)]
    height: Option<u8>,

    /// Read commands from a file instead of stdin
    #[clap(short, long)]
    script: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `chessgrid_core=trace`; overrides RUST_LOG
    #[clap(long)]
    log_level: Option<String>,

    /// Print engine diagnostics as JSON lines
    #[clap(long)]
    diagnostics: bool,
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_level.as_deref());

    let config_path = match args.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    let mut config = load_config(&config_path)?;
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }

    let mut ctx = MatchContext::from_config(&config).context("Failed to set up match")?;
    if args.diagnostics {
        ctx.set_diagnostic_sink(Rc::new(JsonSink));
    }
    ctx.start()?;
    tracing::info!(match_id = %ctx.id(), width = config.width, height = config.height, "Match started");

    let input: Box<dyn BufRead> = match &args.script {
        Some(path) => Box::new(BufReader::new(
            File::open(path)
                .with_context(|| format!("Failed to open script: {}", path.display()))?,
        )),
        None => {
            println!("{}", render_board(&ctx));
            println!("{}", HELP);
            Box::new(io::stdin().lock())
        }
    };

    for line in input.lines() {
        let line = line.context("Failed to read input")?;
        let cmd = match parse_command(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };
        if cmd == Command::Quit {
            break;
        }

        match execute(&mut ctx, cmd) {
            Ok(out) => println!("{}", out),
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    tracing::info!(processed = ctx.engine().processed(), "Session finished");
    Ok(())
}
