//! CLI tool for generating, parsing, editing, and exporting slide decks.

mod client;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use deck_core::export::{self, OutlineFormatter, OutlineStyle};
use deck_core::{
    Deck, DeckBuilder, DeckStore, FormatHint, GenerationRequest, JsonFileRepository, SlideEdit,
    SlideParser,
};
use deck_pptx::PptxWriter;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use client::{ProxyClient, ProxyConfig};

/// Turn AI-generated presentation text into slide decks.
#[derive(Parser, Debug)]
#[command(name = "deckgen")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding the saved presentations collection
    #[arg(long, env = "DECKGEN_STORE", default_value = ".", global = true)]
    store: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse generated text and print the slides as JSON
    Parse {
        /// Text file to parse ("-" for stdin)
        input: PathBuf,

        /// Expect plain "Slide N: Title" markers first
        #[arg(long)]
        slide_by_slide: bool,
    },

    /// Build a deck from generated text and save it
    Build {
        /// Deck title
        #[arg(short, long)]
        title: String,

        /// Text file to parse ("-" for stdin)
        input: PathBuf,

        /// Expect plain "Slide N: Title" markers first
        #[arg(long)]
        slide_by_slide: bool,
    },

    /// Generate a deck through the proxy and save it
    Generate {
        /// Presentation topic
        #[arg(short, long)]
        title: String,

        /// Extra guidance for the generator
        #[arg(short, long, default_value = "")]
        content: String,

        /// Ask for plain slide-by-slide output
        #[arg(long)]
        slide_by_slide: bool,

        /// API key forwarded to the generator
        #[arg(long, env = "DECKGEN_API_KEY", hide_env_values = true)]
        api_key: String,

        /// Proxy base URL (overrides DECKGEN_PROXY_URL)
        #[arg(long)]
        proxy_url: Option<String>,
    },

    /// List saved decks
    List,

    /// Show a saved deck as an outline
    Show {
        /// Deck id
        id: String,
    },

    /// Edit one slide of a saved deck
    Edit {
        /// Deck id
        id: String,

        /// Slide number (1-based)
        #[arg(short, long)]
        slide: usize,

        /// New slide title
        #[arg(short, long)]
        title: Option<String>,

        /// New slide body
        #[arg(short, long)]
        body: Option<String>,
    },

    /// Rename a saved deck
    Rename {
        /// Deck id
        id: String,

        /// New deck title
        title: String,
    },

    /// Export a saved deck to a file
    Export {
        /// Deck id
        id: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,

        /// Output path (default: deck title with spaces replaced)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Delete a saved deck
    Delete {
        /// Deck id
        id: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExportFormat {
    Json,
    Pptx,
    Outline,
    Markdown,
}

impl ExportFormat {
    fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Pptx => "pptx",
            ExportFormat::Outline => "txt",
            ExportFormat::Markdown => "md",
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let store = DeckStore::new(JsonFileRepository::new(&args.store));
    log::debug!("Using collection at {}", store.repository().path().display());

    match args.command {
        Command::Parse {
            input,
            slide_by_slide,
        } => {
            let raw = read_input(&input)?;
            let report = parser_for(slide_by_slide).parse_detailed(&raw);
            if report.slides.is_empty() {
                log::warn!("No slide markers recognized in {}", input.display());
            }
            println!("{}", serde_json::to_string_pretty(&report.slides)?);
        }
        Command::Build {
            title,
            input,
            slide_by_slide,
        } => {
            let raw = read_input(&input)?;
            let deck = DeckBuilder::new()
                .with_parser(parser_for(slide_by_slide))
                .build(title, raw)?;
            save_new(&store, &deck)?;
        }
        Command::Generate {
            title,
            content,
            slide_by_slide,
            api_key,
            proxy_url,
        } => {
            let mut config = ProxyConfig::from_env();
            if let Some(url) = proxy_url.as_deref() {
                config = config.with_base_url(url);
            }
            let client = ProxyClient::new(config)?;
            log::debug!("Generating via {}", client.config().base_url);

            let request = GenerationRequest::new(title, content, api_key)
                .with_slide_by_slide(slide_by_slide);
            let response = client
                .generate(&request)
                .context("Failed to generate the presentation")?;

            let deck = DeckBuilder::new()
                .with_parser(SlideParser::new().with_hint(request.format_hint()))
                .build(response.deck_title(&request.title), response.result)?;
            save_new(&store, &deck)?;
        }
        Command::List => {
            let decks = store.list();
            if decks.is_empty() {
                eprintln!("No saved presentations");
            }
            for deck in decks {
                println!(
                    "{}  {}  {:>3} slides  {}",
                    deck.id(),
                    deck.created_at().format("%Y-%m-%d %H:%M"),
                    deck.len(),
                    deck.title
                );
            }
        }
        Command::Show { id } => {
            let deck = load_deck(&store, &id)?;
            println!("{} ({} slides)\n", deck.title, deck.len());
            if deck.is_empty() {
                println!("No slides recognized. Raw text:\n\n{}", deck.raw_text());
            } else {
                print!("{}", OutlineFormatter::new().format_deck(&deck));
            }
        }
        Command::Edit {
            id,
            slide,
            title,
            body,
        } => {
            if title.is_none() && body.is_none() {
                bail!("Nothing to edit: pass --title and/or --body");
            }
            if slide == 0 {
                bail!("Slide numbers start at 1");
            }

            let mut deck = load_deck(&store, &id)?;
            deck.edit_slide(slide - 1, SlideEdit { title, body })?;
            store.upsert(&deck)?;
            eprintln!("Updated slide {} of {}", slide, deck.id());
        }
        Command::Rename { id, title } => {
            let mut deck = load_deck(&store, &id)?;
            deck.rename(title);
            store.upsert(&deck)?;
        }
        Command::Export { id, format, output } => {
            let deck = load_deck(&store, &id)?;
            let path = output
                .unwrap_or_else(|| PathBuf::from(export::export_file_name(&deck.title, format.extension())));
            export_deck(&deck, format, &path)?;
            eprintln!("Written to: {}", path.display());
        }
        Command::Delete { id } => {
            if !store.delete(&id)? {
                bail!("No saved presentation with id {}", id);
            }
        }
    }

    Ok(())
}

fn parser_for(slide_by_slide: bool) -> SlideParser {
    SlideParser::new().with_hint(FormatHint::from_slide_by_slide(slide_by_slide))
}

/// Read generated text from a file, or stdin for "-".
fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        return Ok(text);
    }

    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn load_deck(store: &DeckStore<JsonFileRepository>, id: &str) -> Result<Deck> {
    store
        .get(id)
        .with_context(|| format!("No saved presentation with id {}", id))
}

fn save_new(store: &DeckStore<JsonFileRepository>, deck: &Deck) -> Result<()> {
    if deck.is_empty() {
        log::warn!("No slide markers recognized; saving deck with raw text only");
    }
    store
        .upsert(deck)
        .with_context(|| format!("Failed to save {}", store.repository().path().display()))?;

    eprintln!("Saved \"{}\" with {} slides", deck.title, deck.len());
    println!("{}", deck.id());
    Ok(())
}

/// Write a deck to `path` in the requested format.
fn export_deck(deck: &Deck, format: ExportFormat, path: &Path) -> Result<()> {
    let bytes = match format {
        ExportFormat::Json => export::to_json(deck)?.into_bytes(),
        ExportFormat::Pptx => PptxWriter::new().to_bytes(deck)?,
        ExportFormat::Outline => OutlineFormatter::new().format_deck(deck).into_bytes(),
        ExportFormat::Markdown => OutlineFormatter::new()
            .with_style(OutlineStyle::Emphasized)
            .format_deck(deck)
            .into_bytes(),
    };

    fs::write(path, bytes).with_context(|| format!("Failed to write to {}", path.display()))
}
