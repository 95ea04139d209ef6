use clap::{Parser, Subcommand};
use coursepress::{classify, config, output, render, tree, walk};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "coursepress")]
#[command(about = "Render downloaded course archives as static HTML")]
#[command(long_about = "\
Render downloaded course archives as static HTML

A course archive is a directory tree of JSON documents: a data.json
manifest at the root and one JSON document per concept inside each lesson
directory. Every concept becomes a standalone HTML page; lessons get a
sidebar linking their concepts, and Nanodegrees get an index.html summary.

Archive structure:

  <archive>/
  ├── data.json                    # Archive manifest (title, outline)
  ├── Lesson 1 Intro/              # Course: lessons directly below the root
  │   ├── 1. Welcome.json
  │   └── 2. Setup.json
  └── Part 01/                     # Nanodegree: Part → Module → Lesson
      └── Module 01/
          └── Lesson 1 Intro/
              └── data.json        # Lesson document with all concepts

Output:

  <target>/<archive>/
  ├── index.html                   # Nanodegree summary
  ├── assets/                      # Shared stylesheet and script
  └── Part 01-Module 01-Lesson 1 Intro/
      ├── 00. Welcome.html
      └── 01. Setup.html

Run 'coursepress gen-config' to generate a documented config.toml.")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render an archive into <TARGET>/<archive name>/
    Render {
        /// Downloaded archive directory
        source: PathBuf,
        /// Existing directory to render into
        target: PathBuf,
        /// Config file (TOML); stock defaults when omitted
        #[arg(long)]
        config: Option<PathBuf>,
        /// Link media remotely instead of downloading it
        #[arg(long)]
        no_media: bool,
    },
    /// Classify an archive and list the lessons a render would produce
    Check {
        /// Downloaded archive directory
        source: PathBuf,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Render {
            source,
            target,
            config: config_path,
            no_media,
        } => {
            let mut config = config::load_config(config_path.as_deref())?;
            if no_media {
                config.media.download = false;
            }
            let options = render::RenderOptions { config };
            let report = render::render(&source, &target, &options)?;
            output::print_render_output(&report);
        }
        Command::Check { source } => {
            check(&source)?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Scan and classify without writing anything.
fn check(source: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let root = tree::scan(source)?;
    let course_type = classify::classify(&root)?;
    let plan = match course_type {
        Some(course_type) => walk::plan(&root, course_type),
        None => Vec::new(),
    };
    output::print_check_output(&root.path, &root.name, course_type, &plan);
    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("coursepress={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
