// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use oxisort::{default_catalog_path, ExtensionCatalog, Organizer};

use anyhow::Result;
use clap::Parser;
use std::{fs::read_to_string, path::PathBuf, process::exit};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, Parser)]
#[command(
    about,
    override_usage = "oxisort [options] <path>",
    version
)]
struct Cli {
    /// Path to the directory to organize.
    #[arg(value_name = "path")]
    pub path: String,

    /// Compute and report intended actions without moving any files.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Only organize files strictly older than DAYS days. 0 disables
    /// the filter.
    #[arg(long, value_name = "DAYS")]
    pub age: Option<u64>,

    /// Load an alternate extension catalog from target TOML file.
    #[arg(short, long, value_name = "file")]
    pub catalog: Option<PathBuf>,
}

impl Cli {
    fn run(self) -> Result<()> {
        let path = shellexpand::full(self.path.as_str())?.into_owned();
        let catalog = load_catalog(self.catalog)?;

        let organizer = Organizer::new(catalog);
        let report = organizer.organize(path, self.dry_run, self.age)?;

        if report.has_failures() {
            info!("some files could not be moved, see warnings above");
        }
        println!("Files scanned: {}", report.scanned());
        println!("Files moved: {}", report.moved());

        Ok(())
    }
}

/// Load extension catalog to classify with.
///
/// Precedence: explicit "--catalog" path, then the catalog file at the
/// default XDG location if one exists, then the built-in table.
fn load_catalog(path: Option<PathBuf>) -> Result<ExtensionCatalog> {
    let path = match path {
        Some(path) => path,
        None => {
            let default = default_catalog_path()?;
            if !default.is_file() {
                return Ok(ExtensionCatalog::default());
            }
            default
        }
    };

    info!("using catalog at {:?}", path.display());
    let catalog = read_to_string(path)?.parse::<ExtensionCatalog>()?;

    Ok(catalog)
}

fn main() {
    let layer = fmt::layer()
        .compact()
        .with_target(false)
        .without_time();
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();
    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .init();

    if let Err(error) = run() {
        error!("{error:?}");
        exit(1);
    }

    exit(0)
}

fn run() -> Result<()> {
    Cli::parse().run()
}
