// SPDX-License-Identifier: AGPL-3.0-or-later
//! gemtext2latex - convert Gemini text to LaTeX
//!
//! Reads gemtext from `--filename` (or stdin), prints a complete LaTeX
//! document on stdout. Warnings and errors go to stderr.

mod config;

use std::fs::{self, File};
use std::io::{self, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser as _, ValueEnum};
use gemtext2latex_core::traits::{ParserExt, RendererExt};
use gemtext2latex_core::{GemtextParser, LatexRenderer};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use config::SettingsLayer;

const PROG: &str = "gemtext2latex";

/// Bundled document class, written out by `--texinputs`
const CLASS_FILE: &str = include_str!("../latex/mk-plain.cls");
const CLASS_FILE_NAME: &str = "mk-plain.cls";

#[derive(clap::Parser, Debug)]
#[command(name = PROG)]
#[command(about = "Convert Gemini text to LaTeX")]
#[command(version)]
struct Cli {
    /// Set logging level to INFO
    #[arg(long)]
    debug: bool,

    /// Preamble printed before the content; must include the \begin{document} line
    #[arg(long)]
    top: Option<String>,

    /// Endmatter printed after the content; must include the \end{document} line
    #[arg(long)]
    tail: Option<String>,

    /// LaTeX document class
    #[arg(long)]
    docclass: Option<String>,

    /// Delimiter marking italics, e.g. '*'
    #[arg(long)]
    italics_char: Option<char>,

    /// Base URL for resolving relative links
    #[arg(long)]
    base: Option<String>,

    /// Input file, or '-' for stdin
    #[arg(long, default_value = "-")]
    filename: PathBuf,

    /// TOML file with default settings; flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// What to print
    #[arg(long, value_enum, default_value_t = Emit::Latex)]
    emit: Emit,

    /// Install the bundled document class, print its TEXINPUTS entry and exit
    #[arg(long)]
    texinputs: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// Complete LaTeX document
    Latex,
    /// One debug line per fragment
    Fragments,
    /// Fragment tree as JSON
    Json,
}

impl Cli {
    fn settings_layer(&self) -> SettingsLayer {
        SettingsLayer {
            docclass: self.docclass.clone(),
            top: self.top.clone(),
            tail: self.tail.clone(),
            italics_char: self.italics_char,
            base: self.base.clone(),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if std::env::var_os("DEBUG").is_some() {
                error!("{err:?}");
            } else {
                eprintln!("{PROG}: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}

fn init_logging(debug: bool) {
    let default_level = if debug { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .without_time()
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    if cli.texinputs {
        let dir = install_class_file()?;
        println!("TEXINPUTS={}", dir.display());
        return Ok(());
    }

    let file_layer = match &cli.config {
        Some(path) => SettingsLayer::load(path)?,
        None => SettingsLayer::default(),
    };
    let settings = file_layer.merge(cli.settings_layer()).into_settings()?;

    let doc = GemtextParser::new()
        .parse_reader(open_input(&cli.filename)?, &settings.parse)
        .context("failed to read input")?;
    for warning in &doc.warnings {
        warn!("{warning}");
    }
    info!(fragments = doc.content.len(), "parsed input");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.emit {
        Emit::Latex => LatexRenderer::new().render_writer(&doc, &mut out, &settings.render)?,
        Emit::Fragments => {
            for fragment in &doc.content {
                write!(out, "{fragment}")?;
            }
        }
        Emit::Json => writeln!(out, "{}", doc.to_json()?)?,
    }
    out.flush().context("failed to write output")?;
    Ok(())
}

fn open_input(path: &Path) -> Result<Box<dyn Read>> {
    if path == Path::new("-") {
        return Ok(Box::new(io::stdin().lock()));
    }
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    Ok(Box::new(file))
}

/// Write the document class under the user data directory; returns its directory.
fn install_class_file() -> Result<PathBuf> {
    let dir = dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(PROG)
        .join("latex");
    fs::create_dir_all(&dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let path = dir.join(CLASS_FILE_NAME);
    fs::write(&path, CLASS_FILE).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "installed document class");
    Ok(dir)
}
