//! In-memory representation of a parsed BDF font.

use indexmap::IndexMap;

use crate::row::BitmapRow;

/// The numeric character code a glyph is declared with through its `ENCODING` directive.
pub type Encoding = i64;

/// A mapping from property names to their raw, unparsed values.
///
/// Properties are kept in the order they were first encountered in the source.
pub type Properties = IndexMap<String, String>;

/// A parsed BDF font: its global properties and its glyphs keyed by [`Encoding`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Font {
    /// The properties declared before the `CHARS` directive.
    pub(crate) properties: Properties,
    /// The glyphs of the font, in the order their encodings were first seen.
    pub(crate) glyphs: IndexMap<Encoding, GlyphRecord>,
}

impl Font {
    /// Returns the raw value of the font-level property `name`.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    /// Returns all font-level properties.
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Returns the [`GlyphRecord`] declared with `encoding`.
    pub fn glyph(&self, encoding: Encoding) -> Option<&GlyphRecord> {
        self.glyphs.get(&encoding)
    }

    /// Returns an [`Iterator`] over the [`GlyphRecord`]s in the order their encodings first
    /// appeared in the source.
    pub fn glyphs(&self) -> impl ExactSizeIterator<Item = &GlyphRecord> {
        self.glyphs.values()
    }

    /// Returns the number of distinct glyphs in the [`Font`].
    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }
}

/// A single glyph of a [`Font`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphRecord {
    /// The value of the glyph's `ENCODING` directive.
    pub(crate) encoding: Encoding,
    /// The value of the glyph's `STARTCHAR` directive, if present.
    pub(crate) name: Option<String>,
    /// Every directive of the glyph other than `BITMAP`, keyed by directive name.
    pub(crate) properties: Properties,
    /// The bitmap rows of the glyph, top to bottom.
    pub(crate) bitmap: Vec<BitmapRow>,
}

impl GlyphRecord {
    /// Returns the [`Encoding`] of the glyph.
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Returns the symbolic name given by `STARTCHAR`.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the raw value of the glyph-level property `name`.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    /// Returns all glyph-level properties, including `STARTCHAR` and `ENCODING`.
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Returns the bitmap rows of the glyph, top to bottom.
    pub fn bitmap(&self) -> &[BitmapRow] {
        &self.bitmap
    }
}
