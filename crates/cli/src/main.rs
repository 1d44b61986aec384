//! CLI tool for rendering markdown reports to PDF and slide decks to PPTX.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mdpress_core::{LayoutConfig, SlideConfig};
use mdpress_pdf::{markdown_to_pdf, FontResolver, FontSet, SystemFontResolver};
use mdpress_pptx::{markdown_to_pptx, DeckReader};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Report documents rendered to PDF by the build pipeline.
const PDF_DOCUMENTS: [&str; 2] = ["KT1-Plan", "KT3-FinalDocumentation"];

/// Slide document rendered to PPTX by the build pipeline.
const DECK_DOCUMENT: &str = "KT4-Presentation-Material";

/// Render markdown documents as PDF reports and PPTX slide decks.
#[derive(Parser, Debug)]
#[command(name = "mdpress")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Directory holding the pipeline documents
    #[arg(long, default_value = "docs", global = true)]
    docs_dir: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the fixed document set (default)
    Build,

    /// Render one markdown file as a PDF report
    Pdf {
        input: PathBuf,

        /// Output file (default: input with .pdf extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render one markdown file as a PPTX deck
    Slides {
        input: PathBuf,

        /// Output file (default: input with .pptx extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the slide outline of a PPTX deck
    Inspect {
        input: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let resolver = SystemFontResolver::new();

    match args.command.unwrap_or(Command::Build) {
        Command::Build => {
            let generated = build(&args.docs_dir, &resolver)?;
            println!("Generated: {}", generated.join(", "));
        }
        Command::Pdf { input, output } => {
            let fonts = resolve_fonts(&resolver)?;
            let output = output_path(&input, output, "pdf");
            render_pdf(&input, &output, &fonts)?;
            println!("Generated: {}", output.display());
        }
        Command::Slides { input, output } => {
            let output = output_path(&input, output, "pptx");
            render_slides(&input, &output)?;
            println!("Generated: {}", output.display());
        }
        Command::Inspect { input, json } => inspect(&input, json)?,
    }

    Ok(())
}

/// Render the fixed document set, returning the generated file names in order.
///
/// Fonts are resolved once and shared by every report.
fn build(docs_dir: &Path, resolver: &dyn FontResolver) -> Result<Vec<String>> {
    let fonts = resolve_fonts(resolver)?;
    let mut generated = Vec::new();

    for stem in PDF_DOCUMENTS {
        let name = format!("{}.pdf", stem);
        render_pdf(
            &docs_dir.join(format!("{}.md", stem)),
            &docs_dir.join(&name),
            &fonts,
        )?;
        generated.push(name);
    }

    let name = format!("{}.pptx", DECK_DOCUMENT);
    render_slides(
        &docs_dir.join(format!("{}.md", DECK_DOCUMENT)),
        &docs_dir.join(&name),
    )?;
    generated.push(name);

    Ok(generated)
}

fn resolve_fonts(resolver: &dyn FontResolver) -> Result<FontSet> {
    resolver
        .resolve()
        .context("Failed to resolve a regular/bold font pair")
}

fn render_pdf(input: &Path, output: &Path, fonts: &FontSet) -> Result<()> {
    log::debug!("Rendering {} -> {}", input.display(), output.display());
    markdown_to_pdf(input, output, fonts, &LayoutConfig::default())
        .with_context(|| format!("Failed to render {}", input.display()))
}

fn render_slides(input: &Path, output: &Path) -> Result<()> {
    log::debug!("Rendering {} -> {}", input.display(), output.display());
    markdown_to_pptx(input, output, &SlideConfig::default())
        .with_context(|| format!("Failed to render {}", input.display()))
}

/// Print a deck's slide titles and bullets.
fn inspect(input: &Path, json: bool) -> Result<()> {
    let file =
        File::open(input).with_context(|| format!("Failed to open {}", input.display()))?;
    let sections = DeckReader::new()
        .read(BufReader::new(file))
        .with_context(|| format!("Failed to read deck {}", input.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&sections)?);
        return Ok(());
    }

    for (index, section) in sections.iter().enumerate() {
        println!("{}. {}", index + 1, section.title);
        for bullet in &section.bullets {
            println!("   - {}", bullet);
        }
    }

    Ok(())
}

/// Explicit output path, or the input path with its extension swapped.
fn output_path(input: &Path, output: Option<PathBuf>, extension: &str) -> PathBuf {
    output.unwrap_or_else(|| input.with_extension(extension))
}
