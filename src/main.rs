use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tutorial_widgets::dom::Document;
use tutorial_widgets::page::{enhance, PageContext};
use tutorial_widgets::{logging, BankLoader, ChapterTable, Config, Error, Quiz, Result};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Take a chapter quiz in the terminal
    Quiz {
        /// Section id of the quiz, as used by `data-section-id`
        #[arg(short, long)]
        section: String,
        /// Question bank path or URL
        #[arg(short, long)]
        bank: Option<String>,
        /// Write logs here while the quiz owns the terminal
        #[arg(long)]
        log_file: Option<PathBuf>,
    },
    /// Pre-render navigation, outline and quizzes into tutorial pages
    Enhance {
        /// Pages to enhance
        #[arg(required = true)]
        pages: Vec<PathBuf>,
        /// Question bank path or URL, relative to each page
        #[arg(short, long)]
        bank: Option<String>,
        /// TOML file replacing the built-in chapter table
        #[arg(short, long)]
        chapters: Option<PathBuf>,
        /// Write enhanced pages here instead of overwriting them
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },
    /// Check every section of a question bank
    Validate {
        /// Question bank path or URL
        #[arg(short, long)]
        bank: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let mut config = Config::from_env()?;

    match args.command {
        Command::Quiz {
            section,
            bank,
            log_file,
        } => {
            logging::init_for_terminal(&config.log_filter, log_file.as_deref())?;
            if let Some(bank) = bank {
                config.bank_location = bank;
            }
            let loader = BankLoader::new();
            Quiz::load(section, &config.bank_location, &loader).await.run()
        }
        Command::Enhance {
            pages,
            bank,
            chapters,
            out_dir,
        } => {
            logging::init(&config.log_filter);
            if let Some(bank) = bank {
                config.bank_location = bank;
            }
            let chapters = match chapters {
                Some(path) => ChapterTable::load(path)?,
                None => ChapterTable::builtin(),
            };
            enhance_pages(&pages, &config, &chapters, out_dir.as_deref()).await
        }
        Command::Validate { bank } => {
            logging::init(&config.log_filter);
            let location = bank.unwrap_or(config.bank_location);
            validate(&location).await
        }
    }
}

async fn enhance_pages(
    pages: &[PathBuf],
    config: &Config,
    chapters: &ChapterTable,
    out_dir: Option<&Path>,
) -> Result<()> {
    let loader = BankLoader::new();
    if let Some(dir) = out_dir {
        tokio::fs::create_dir_all(dir).await?;
    }

    for path in pages {
        let markup = tokio::fs::read_to_string(path).await?;
        let mut document = Document::parse(&markup).inspect_err(|err| {
            error!(page = %path.display(), error = %err, "page is not well-formed");
        })?;

        let ctx = PageContext {
            config,
            chapters,
            loader: &loader,
            page_dir: path.parent(),
        };
        let report = enhance(&mut document, &ctx).await;
        let untouched = !report.nav
            && !report.back_to_top
            && report.outline_entries == 0
            && report.quizzes.is_empty();
        if untouched {
            warn!(page = %path.display(), "nothing to enhance");
        }

        let target = match (out_dir, path.file_name()) {
            (Some(dir), Some(name)) => dir.join(name),
            _ => path.clone(),
        };
        tokio::fs::write(&target, document.to_html()).await?;
        info!(page = %path.display(), out = %target.display(), "wrote page");
    }
    Ok(())
}

async fn validate(location: &str) -> Result<()> {
    let loader = BankLoader::new();
    let bank = loader.load(location).await?;

    let mut first_error = None;
    for section in &bank.sections {
        match section.validate() {
            Ok(()) if section.questions.is_empty() => {
                println!("{}: no questions", section.id);
            }
            Ok(()) => println!("{}: {} questions ok", section.id, section.questions.len()),
            Err(err) => {
                println!("{}: {}", section.id, err);
                first_error.get_or_insert(err);
            }
        }
    }

    match first_error {
        Some(err) => Err(Error::Data(err)),
        None => Ok(()),
    }
}
