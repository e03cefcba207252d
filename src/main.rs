use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use replydoc::{Block, Config, Document};

#[derive(Parser)]
#[command(name = "replydoc")]
#[command(about = "Render a chat reply into a styled document")]
struct Cli {
    /// Input reply text file, or `-` for stdin
    input: PathBuf,

    /// Output file (defaults to input name with the format's extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Pdf)]
    format: Format,

    /// TOML config file overriding the default theme
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Render code blocks without the background wrapper
    #[arg(long)]
    no_background: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Pdf,
    Svg,
    Typst,
    /// Plain text with all styling removed
    Text,
    /// Debug dump of the parsed block tree
    Blocks,
}

impl Format {
    fn extension(self) -> &'static str {
        match self {
            Format::Pdf => "pdf",
            Format::Svg => "svg",
            Format::Typst => "typ",
            Format::Text => "txt",
            Format::Blocks => "blocks.txt",
        }
    }

    /// Textual formats go to stdout unless an output path is given.
    fn is_textual(self) -> bool {
        matches!(self, Format::Typst | Format::Text | Format::Blocks)
    }
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let reply = read_input(&cli.input)?;

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::compiled_default(),
    };

    let mut doc = replydoc::render_reply(&reply);
    if cli.no_background {
        strip_backgrounds(&mut doc);
    }

    let bytes = match cli.format {
        Format::Pdf => replydoc::document_to_pdf(&doc, &config)?,
        Format::Svg => {
            let svg = replydoc::document_to_svg(&doc, &config)?;
            log::debug!(
                "rendered {} SVG pages of {}x{}pt",
                svg.pages.len(),
                svg.width_pt,
                svg.height_pt
            );
            return write_svg_pages(&cli, svg.pages);
        }
        Format::Typst => replydoc::document_to_typst(&doc, &config).into_bytes(),
        Format::Text => {
            let mut text = doc.plain_text();
            text.push('\n');
            text.into_bytes()
        }
        Format::Blocks => format!("{:#?}\n", doc.blocks).into_bytes(),
    };

    match output_path(&cli) {
        Some(output) => {
            fs::write(&output, bytes)
                .with_context(|| format!("writing {}", output.display()))?;
            println!("Created {}", output.display());
        }
        None => io::stdout().write_all(&bytes).context("writing to stdout")?,
    }

    Ok(())
}

/// One file per page; pages after the first get a `-N` suffix.
fn write_svg_pages(cli: &Cli, pages: Vec<String>) -> Result<()> {
    let Some(output) = output_path(cli) else {
        let first = pages.into_iter().next().unwrap_or_default();
        return io::stdout()
            .write_all(first.as_bytes())
            .context("writing to stdout");
    };

    for (i, page) in pages.iter().enumerate() {
        let path = if i == 0 {
            output.clone()
        } else {
            let stem = output.file_stem().unwrap_or_default().to_string_lossy();
            output.with_file_name(format!("{}-{}.svg", stem, i + 1))
        };
        fs::write(&path, page).with_context(|| format!("writing {}", path.display()))?;
        println!("Created {}", path.display());
    }
    Ok(())
}

fn read_input(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut reply = String::new();
        io::stdin()
            .read_to_string(&mut reply)
            .context("reading stdin")?;
        return Ok(reply);
    }
    fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))
}

/// Determine where output goes; `None` means stdout.
fn output_path(cli: &Cli) -> Option<PathBuf> {
    if let Some(output) = &cli.output {
        return Some(output.clone());
    }
    if cli.format.is_textual() || cli.input == Path::new("-") {
        return None;
    }
    Some(cli.input.with_extension(cli.format.extension()))
}

fn strip_backgrounds(doc: &mut Document) {
    for block in &mut doc.blocks {
        if let Block::Code(code) = block {
            code.with_background = false;
        }
    }
}
