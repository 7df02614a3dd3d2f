//! taxodesc - short descriptions for taxon articles
//!
//! Subcommands:
//! - `stage` - classify pages from a dump and write staging files
//! - `classify` - classify individual titles and print the outcome
//! - `lead` - print the sanitized lead of a markup file

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use taxodesc_common::config::ConfigResolver;
use taxodesc_engine::lead::{extract_lead, opening_section};
use taxodesc_engine::store::DumpStore;
use taxodesc_engine::workflow::{write_staging, BatchRunner, Classifier};
use taxodesc_engine::TaskConfig;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[clap(name = "taxodesc")]
#[clap(about = "Generate short descriptions for taxon articles")]
struct Cli {
    /// Task configuration file (TOML)
    #[clap(long, short, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify pages from a dump and write staging files
    Stage {
        /// JSON page dump
        #[clap(long, value_name = "FILE", env = "TAXODESC_DUMP")]
        dump: PathBuf,

        /// Titles to process, one per line (default: every page in the dump)
        #[clap(long, value_name = "FILE")]
        titles: Option<PathBuf>,

        /// Directory for the staging files (default: as configured)
        #[clap(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
    },
    /// Classify titles and print the results
    Classify {
        /// JSON page dump
        #[clap(long, value_name = "FILE", env = "TAXODESC_DUMP")]
        dump: PathBuf,

        /// Article title (repeatable)
        #[clap(long = "title", required = true)]
        titles: Vec<String>,
    },
    /// Print the sanitized lead of a markup file
    Lead { file: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let source = ConfigResolver::new("taxodesc").resolve(cli.config.as_deref());
    let mut task = TaskConfig::load(&source)?;
    taxodesc_common::logging::init(&task.logging)?;

    info!("Starting taxodesc v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: {}", source);

    match cli.command {
        Command::Stage {
            dump,
            titles,
            out_dir,
        } => {
            if let Some(dir) = out_dir {
                task.staging.success_file = relocate(&dir, &task.staging.success_file);
                task.staging.failure_file = relocate(&dir, &task.staging.failure_file);
            }
            let store = load_dump(&dump)?;
            let titles = match titles {
                Some(path) => read_titles(&path)?,
                None => store.titles().map(str::to_string).collect(),
            };
            stage(&store, &task, &titles)
        }
        Command::Classify { dump, titles } => {
            let store = load_dump(&dump)?;
            let config = task.classification()?;
            let classifier = Classifier::new(&store, &config);
            for title in titles {
                let classified = classifier.classify_title(&title)?;
                println!("{}\t{}", title, classified.result);
            }
            Ok(())
        }
        Command::Lead { file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            match extract_lead(opening_section(&text)) {
                Ok(lead) => println!("{}", lead),
                Err(e) => println!("{}", e),
            }
            Ok(())
        }
    }
}

fn load_dump(path: &Path) -> Result<DumpStore> {
    DumpStore::load(path).with_context(|| format!("Failed to load page dump {}", path.display()))
}

fn read_titles(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read title list {}", path.display()))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

fn relocate(dir: &Path, file: &Path) -> PathBuf {
    match file.file_name() {
        Some(name) => dir.join(name),
        None => dir.join(file),
    }
}

fn stage(store: &DumpStore, task: &TaskConfig, titles: &[String]) -> Result<()> {
    let config = task.classification()?;
    let runner = BatchRunner::new(store, store, &config, &task.staging);

    let report = match runner.run(titles) {
        Ok(report) => report,
        Err(e) => {
            error!("Batch run aborted: {}", e);
            return Err(e.into());
        }
    };

    write_staging(&task.staging.success_file, &report.successes)?;
    write_staging(&task.staging.failure_file, &report.failures)?;
    println!("{}", report.stats);
    Ok(())
}
