//! Tool for converting BDF bitmap fonts into `wsdisplay_font` C source fragments, selecting and
//! ordering glyphs through a translation table.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use bdf::{Font, TranslationTable, translation};

pub mod emit;

/// Description of a single conversion run.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct ConvertConfig {
    /// Which glyphs to emit and how.
    pub mode: Mode,
    /// The BDF font to convert.
    pub input: PathBuf,
    /// The file to write the result to, or standard output if `None`.
    pub output: Option<PathBuf>,
    /// The identifier to name the emitted symbols after, or the input's file stem if `None`.
    pub name: Option<String>,
    /// How much diagnostic output to produce.
    pub verbosity: Verbosity,
}

/// The selection of glyphs to emit.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub enum Mode {
    /// Emit every glyph of the font in source order, without the surrounding declaration.
    PrintAll,
    /// Emit a complete `wsdisplay_font` whose 256 slots are filled according to a translation
    /// table.
    Header {
        /// The translation table to load.
        table: PathBuf,
    },
}

/// The amount of diagnostic output to produce.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Only report errors.
    Quiet,
    /// Report warnings and errors.
    #[default]
    Normal,
    /// Additionally report progress and every parsed glyph.
    Verbose,
    /// Report everything, including every captured property.
    Trace,
}

impl Verbosity {
    /// Returns the [`Verbosity`] for `count` repetitions of the verbose flag.
    pub fn from_verbose_count(count: u8) -> Self {
        match count {
            0 => Self::Normal,
            1 => Self::Verbose,
            _ => Self::Trace,
        }
    }

    /// Returns the default log filter associated with the [`Verbosity`].
    pub fn level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Quiet => log::LevelFilter::Error,
            Self::Normal => log::LevelFilter::Warn,
            Self::Verbose => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Runs the conversion described by `config`.
///
/// The translation table is loaded first, then the font is parsed, and finally the output is
/// rendered in full before being written, so a failed run leaves no output file behind.
///
/// # Errors
///
/// Returns errors when an input cannot be read, the translation table or font is malformed,
/// emission fails, or the output cannot be written.
pub fn convert(config: &ConvertConfig) -> Result<()> {
    let table = match &config.mode {
        Mode::PrintAll => None,
        Mode::Header { table } => Some(load_table(table)?),
    };

    let font = load_font(&config.input)?;

    let mut rendered = Vec::new();
    match &table {
        None => emit::print_all(&font, &mut rendered)
            .with_context(|| format!("failed to emit glyphs of {}", config.input.display()))?,
        Some(table) => {
            let identifier = match &config.name {
                Some(name) => name.clone(),
                None => identifier_from_path(&config.input)?,
            };
            emit::header(&font, table, &identifier, &mut rendered).with_context(|| {
                format!("failed to emit header for {}", config.input.display())
            })?;
        }
    }

    match &config.output {
        Some(path) => {
            fs::write(path, &rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            log::info!("wrote {} bytes to {}", rendered.len(), path.display());
        }
        None => io::stdout()
            .lock()
            .write_all(&rendered)
            .context("failed to write to standard output")?,
    }

    Ok(())
}

/// Reads and parses the translation table at `path`.
///
/// # Errors
///
/// Returns errors when the file cannot be read or is malformed.
pub fn load_table(path: &Path) -> Result<TranslationTable> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read translation table {}", path.display()))?;
    translation::load(&source)
        .with_context(|| format!("failed to load translation table {}", path.display()))
}

/// Reads and parses the BDF font at `path`.
///
/// # Errors
///
/// Returns errors when the file cannot be read or is malformed.
pub fn load_font(path: &Path) -> Result<Font> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read font {}", path.display()))?;
    let font = bdf::parse(&source)
        .with_context(|| format!("failed to parse font {}", path.display()))?;

    log::debug!("parsed {} glyphs from {}", font.glyph_count(), path.display());
    Ok(font)
}

/// Derives the default identifier for the font at `path` from its file stem.
///
/// # Errors
///
/// Returns an error if `path` has no file name.
pub fn identifier_from_path(path: &Path) -> Result<String> {
    let stem = path
        .file_stem()
        .with_context(|| format!("cannot derive a font name from {}", path.display()))?;

    Ok(emit::normalize_identifier(&stem.to_string_lossy()))
}
