//! Rendering of a parsed [`Font`] as a `wsdisplay_font` C source fragment.
//!
//! Every glyph is written as a comment naming it followed by one line per bitmap row: the row's
//! bytes as `0x` literals and the row drawn in `#`/`.` ASCII art.

use core::{error, fmt};
use std::io::{self, Write};

use bdf::{Encoding, Font, GlyphRecord, TranslationTable};

/// The font-level property holding the bounding box of every glyph.
pub const BOUNDING_BOX_PROPERTY: &str = "FONTBOUNDINGBOX";

/// The number of characters in an emitted `wsdisplay_font`.
pub const CHARACTER_COUNT: usize = 256;

/// Writes every glyph of `font` to `writer` in the order it appeared in the source, numbered
/// sequentially from zero. No declaration or closing brace is written.
///
/// # Errors
///
/// Returns [`EmitError`] if a glyph has no `STARTCHAR` name or writing fails.
pub fn print_all<W: Write>(font: &Font, mut writer: W) -> Result<(), EmitError> {
    for (index, glyph) in font.glyphs().enumerate() {
        glyph_preview(&mut writer, index, glyph)?;
    }

    Ok(())
}

/// Writes a complete `wsdisplay_font` named after `identifier` to `writer`, with slot `n` of the
/// character array holding the glyph that `table` assigns to `n`.
///
/// Every slot is resolved before anything is written, so a missing glyph produces no output.
///
/// # Errors
///
/// Returns [`EmitError`] if `FONTBOUNDINGBOX` is missing or malformed, a slot is unassigned or
/// assigned to an encoding `font` lacks, a selected glyph has no `STARTCHAR` name, or writing
/// fails.
pub fn header<W: Write>(
    font: &Font,
    table: &TranslationTable,
    identifier: &str,
    mut writer: W,
) -> Result<(), EmitError> {
    let declaration = Declaration::from_font(font, identifier)?;

    let glyphs = table
        .iter()
        .map(|(slot, encoding)| -> Result<_, EmitError> {
            let encoding = encoding.ok_or(EmitError::UnmappedSlot(slot))?;
            font.glyph(encoding).ok_or(EmitError::MissingGlyph { slot, encoding })
        })
        .collect::<Result<Vec<_>, _>>()?;

    log::info!(
        "emitting {} ({}x{}, stride {})",
        declaration.typeface_name(),
        declaration.width,
        declaration.height,
        declaration.stride()
    );

    declaration.write(&mut writer)?;
    for (index, glyph) in glyphs.into_iter().enumerate() {
        glyph_preview(&mut writer, index, glyph)?;
    }
    writer.write_all(b"};\n\n")?;

    Ok(())
}

/// Writes the preview block of `glyph`, labelled with its display `index`.
///
/// # Errors
///
/// Returns [`EmitError`] if `glyph` has no `STARTCHAR` name or writing fails.
pub fn glyph_preview<W: Write>(
    mut writer: W,
    index: usize,
    glyph: &GlyphRecord,
) -> Result<(), EmitError> {
    let encoding = glyph.encoding();
    let name = glyph.name().ok_or(EmitError::MissingGlyphProperty {
        encoding,
        name: "STARTCHAR",
    })?;

    writeln!(
        writer,
        "\n\t/* char 0x{index:02x} ({index:03}) unicode: 0x{} ({encoding}) name: {name} */",
        signed_hex(encoding, 4)
    )?;

    for row in glyph.bitmap() {
        writer.write_all(b"\t")?;
        for group in row.byte_groups() {
            write!(writer, "0x{}, ", group.to_ascii_lowercase())?;
        }

        let art = row
            .pixels()
            .map(|on| if on { '#' } else { '.' })
            .collect::<String>();
        writeln!(writer, "\t/* {art} */")?;
    }

    Ok(())
}

/// Layout of the emitted `wsdisplay_font`, derived from the font's bounding box.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct Declaration {
    /// The C identifier prefix of the emitted symbols.
    pub name: String,
    /// The width of every glyph in pixels.
    pub width: u32,
    /// The height of every glyph in pixels.
    pub height: u32,
}

impl Declaration {
    /// Derives the [`Declaration`] for `font` from its `FONTBOUNDINGBOX` property, naming it
    /// after `identifier`.
    ///
    /// # Errors
    ///
    /// Returns [`EmitError::MissingFontProperty`] if the font has no `FONTBOUNDINGBOX` or
    /// [`EmitError::MalformedFontProperty`] if its first two fields are not integers.
    pub fn from_font(font: &Font, identifier: &str) -> Result<Self, EmitError> {
        let value = font
            .property(BOUNDING_BOX_PROPERTY)
            .ok_or(EmitError::MissingFontProperty(BOUNDING_BOX_PROPERTY))?;
        let malformed = || EmitError::MalformedFontProperty {
            name: BOUNDING_BOX_PROPERTY,
            value: value.to_owned(),
        };

        let mut fields = value.split_whitespace().map(str::parse::<u32>);
        let width = fields.next().and_then(Result::ok).ok_or_else(malformed)?;
        let height = fields.next().and_then(Result::ok).ok_or_else(malformed)?;

        Ok(Self {
            name: normalize_identifier(identifier),
            width,
            height,
        })
    }

    /// Returns the number of bytes needed to store one row of a glyph.
    pub const fn stride(&self) -> u32 {
        self.width.div_ceil(8)
    }

    /// Returns the human-readable typeface name stored in the font descriptor.
    pub fn typeface_name(&self) -> String {
        format!("{}-{}x{}", self.name, self.width, self.height)
    }

    /// Writes the data array declaration, the font descriptor and the opening of the data array
    /// to `writer`.
    ///
    /// # Errors
    ///
    /// Returns [`EmitError::Io`] if writing fails.
    pub fn write<W: Write>(&self, mut writer: W) -> Result<(), EmitError> {
        let name = &self.name;
        let fields = [
            (format!("\"{}\",", self.typeface_name()), "typeface name"),
            ("0,".to_owned(), "firstchar"),
            (format!("{CHARACTER_COUNT},"), "numchars"),
            ("WSDISPLAY_FONTENC_IBM,".to_owned(), "encoding"),
            (format!("{},", self.width), "width"),
            (format!("{},", self.height), "height"),
            (format!("{},", self.stride()), "stride"),
            ("WSDISPLAY_FONTORDER_L2R,".to_owned(), "bit order"),
            ("WSDISPLAY_FONTORDER_L2R,".to_owned(), "byte order"),
            (format!("{name}_data"), "data"),
        ];

        writeln!(writer, "static u_char {name}_data[];")?;
        writeln!(writer)?;
        writeln!(writer, "static struct wsdisplay_font {name}_prop = {{")?;
        for (value, comment) in fields {
            writeln!(writer, "        {value:<32}/* {comment} */")?;
        }
        writeln!(writer, "}};")?;
        writeln!(writer)?;
        writeln!(writer, "static u_char {name}_data[] = {{")?;

        Ok(())
    }
}

/// Turns `identifier` into a valid C identifier fragment by replacing every character that is
/// not an ASCII alphanumeric or `_` with `_`.
pub fn normalize_identifier(identifier: &str) -> String {
    identifier
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Formats `value` as lowercase hexadecimal padded to `width`, with the sign counted in the
/// width for negative values.
fn signed_hex(value: Encoding, width: usize) -> String {
    if value < 0 {
        format!(
            "-{:0width$x}",
            value.unsigned_abs(),
            width = width.saturating_sub(1)
        )
    } else {
        format!("{value:0width$x}")
    }
}

/// Various errors that can occur while emitting a font.
#[derive(Debug)]
pub enum EmitError {
    /// A required font-level property was absent.
    MissingFontProperty(&'static str),
    /// A font-level property could not be interpreted.
    MalformedFontProperty {
        /// The name of the property.
        name: &'static str,
        /// The raw value of the property.
        value: String,
    },
    /// The translation table left a slot unassigned.
    UnmappedSlot(u8),
    /// The translation table assigned a slot to an encoding the font does not contain.
    MissingGlyph {
        /// The output slot being filled.
        slot: u8,
        /// The encoding the slot was assigned to.
        encoding: Encoding,
    },
    /// A glyph lacked a property required to label it.
    MissingGlyphProperty {
        /// The encoding of the glyph.
        encoding: Encoding,
        /// The name of the missing property.
        name: &'static str,
    },
    /// Writing the output failed.
    Io(io::Error),
}

impl From<io::Error> for EmitError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl fmt::Display for EmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFontProperty(name) => write!(f, "font has no {name} property"),
            Self::MalformedFontProperty { name, value } => {
                write!(f, "font property {name} has malformed value {value:?}")
            }
            Self::UnmappedSlot(slot) => {
                write!(f, "translation table does not assign slot {slot}")
            }
            Self::MissingGlyph { slot, encoding } => write!(
                f,
                "slot {slot} maps to encoding {encoding} (0x{}) which the font does not contain",
                signed_hex(*encoding, 4)
            ),
            Self::MissingGlyphProperty { encoding, name } => {
                write!(f, "glyph with encoding {encoding} has no {name}")
            }
            Self::Io(error) => write!(f, "error writing output: {error}"),
        }
    }
}

impl error::Error for EmitError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Io(error) => Some(error),
            _ => None,
        }
    }
}
