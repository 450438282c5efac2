//! Line-oriented parser turning BDF source text into a [`Font`].

use core::{error, fmt, mem};

use crate::{
    font::{Encoding, Font, GlyphRecord, Properties},
    row::{BitmapRow, InvalidRowError},
};

/// Parses `source` as a BDF font.
///
/// # Errors
///
/// Returns [`ParseError`] if a line has no directive, a directive is missing its value, a glyph
/// section is closed out of order, a bitmap row is not hexadecimal, or the input ends before the
/// header or a bitmap is closed.
pub fn parse(source: &str) -> Result<Font, ParseError> {
    let mut parser = Parser::new();

    let mut line_count = 0;
    for (index, line) in source.lines().enumerate() {
        line_count = index + 1;
        parser
            .line(line)
            .map_err(|kind| ParseError::new(line_count, kind))?;
    }

    parser
        .finish()
        .map_err(|kind| ParseError::new(line_count, kind))
}

/// The section of the source the [`Parser`] is currently in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    /// Font-level properties, up to and including `CHARS`.
    Metadata,
    /// Glyph directives outside of a bitmap.
    Body,
    /// Bitmap rows between `BITMAP` and `ENDCHAR`.
    CollectingBitmap,
}

/// The glyph currently being assembled.
#[derive(Clone, Debug, Default)]
struct PendingGlyph {
    /// The value of the `ENCODING` directive, once seen.
    encoding: Option<Encoding>,
    /// The value of the `STARTCHAR` directive, once seen.
    name: Option<String>,
    /// Glyph-level properties seen so far.
    properties: Properties,
    /// Bitmap rows collected so far.
    rows: Vec<BitmapRow>,
}

/// Incremental BDF parser driven one line at a time.
struct Parser {
    /// The current section.
    state: State,
    /// The glyph being assembled.
    pending: PendingGlyph,
    /// The font under construction.
    font: Font,
}

impl Parser {
    /// Creates a new [`Parser`] positioned at the start of the font header.
    fn new() -> Self {
        Self {
            state: State::Metadata,
            pending: PendingGlyph::default(),
            font: Font::default(),
        }
    }

    /// Feeds a single source line to the [`Parser`].
    fn line(&mut self, line: &str) -> Result<(), ParseErrorKind> {
        let line = line.trim();
        let (token, value) = match line.split_once(char::is_whitespace) {
            Some((token, value)) => (token, Some(value.trim_start()).filter(|v| !v.is_empty())),
            None => (line, None),
        };

        if token.is_empty() {
            return Err(ParseErrorKind::MissingToken);
        }

        if token == "COMMENT" {
            return Ok(());
        }

        match self.state {
            State::Metadata => match token {
                "STARTPROPERTIES" | "ENDPROPERTIES" => {}
                "CHARS" => {
                    let value = require_value(token, value)?;
                    self.font.properties.insert(token.to_owned(), value.to_owned());
                    self.state = State::Body;
                }
                _ => {
                    let value = require_value(token, value)?;
                    log::trace!("font property {token} = {value:?}");
                    self.font.properties.insert(token.to_owned(), value.to_owned());
                }
            },
            State::Body => match token {
                "ENDFONT" => {}
                "ENDCHAR" => return Err(ParseErrorKind::EndCharOutsideBitmap),
                "BITMAP" => {
                    self.pending.rows.clear();
                    self.state = State::CollectingBitmap;
                }
                _ => {
                    let value = require_value(token, value)?;
                    match token {
                        "ENCODING" => self.pending.encoding = Some(parse_encoding(value)?),
                        "STARTCHAR" => self.pending.name = Some(value.to_owned()),
                        _ => {}
                    }
                    self.pending
                        .properties
                        .insert(token.to_owned(), value.to_owned());
                }
            },
            State::CollectingBitmap => match token {
                "ENDFONT" => {}
                "ENDCHAR" => self.finalize_glyph()?,
                _ => {
                    let row = BitmapRow::new(token).map_err(ParseErrorKind::InvalidBitmapRow)?;
                    self.pending.rows.push(row);
                }
            },
        }

        Ok(())
    }

    /// Moves the pending glyph into the font and resets it for the next glyph.
    fn finalize_glyph(&mut self) -> Result<(), ParseErrorKind> {
        let Some(encoding) = self.pending.encoding else {
            return Err(ParseErrorKind::EndCharWithoutEncoding);
        };

        let pending = mem::take(&mut self.pending);
        self.state = State::Body;

        log::debug!(
            "glyph {} ({encoding}): {} rows",
            pending.name.as_deref().unwrap_or("<unnamed>"),
            pending.rows.len()
        );

        let glyph = GlyphRecord {
            encoding,
            name: pending.name,
            properties: pending.properties,
            bitmap: pending.rows,
        };
        if self.font.glyphs.insert(encoding, glyph).is_some() {
            log::warn!("encoding {encoding} declared more than once; keeping the later glyph");
        }

        Ok(())
    }

    /// Consumes the [`Parser`], returning the completed [`Font`].
    fn finish(self) -> Result<Font, ParseErrorKind> {
        match self.state {
            State::Metadata => Err(ParseErrorKind::UnterminatedHeader),
            State::CollectingBitmap => Err(ParseErrorKind::UnterminatedBitmap),
            State::Body => Ok(self.font),
        }
    }
}

/// Returns `value` or an error naming `token` when the directive had no value.
fn require_value<'line>(
    token: &str,
    value: Option<&'line str>,
) -> Result<&'line str, ParseErrorKind> {
    value.ok_or_else(|| ParseErrorKind::MissingValue {
        token: token.to_owned(),
    })
}

/// Parses the first word of an `ENCODING` value as a decimal [`Encoding`].
fn parse_encoding(value: &str) -> Result<Encoding, ParseErrorKind> {
    let word = value.split_whitespace().next().unwrap_or(value);
    word.parse().map_err(|_| ParseErrorKind::InvalidEncoding {
        value: value.to_owned(),
    })
}

/// A structurally invalid record in BDF source text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    /// The 1-based line at which the error was detected.
    line: usize,
    /// What went wrong.
    kind: ParseErrorKind,
}

impl ParseError {
    /// Creates a new [`ParseError`].
    pub const fn new(line: usize, kind: ParseErrorKind) -> Self {
        Self { line, kind }
    }

    /// Returns the 1-based line at which the error was detected.
    pub const fn line(&self) -> usize {
        self.line
    }

    /// Returns the [`ParseErrorKind`] of the error.
    pub const fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed record at line {}: {}", self.line, self.kind)
    }
}

impl error::Error for ParseError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match &self.kind {
            ParseErrorKind::InvalidBitmapRow(error) => Some(error),
            _ => None,
        }
    }
}

/// The various ways a BDF record can be malformed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The line contained no directive.
    MissingToken,
    /// A directive that requires a value had none.
    MissingValue {
        /// The directive missing its value.
        token: String,
    },
    /// `ENCODING` was not followed by a decimal integer.
    InvalidEncoding {
        /// The raw value of the directive.
        value: String,
    },
    /// A bitmap row was not a hexadecimal string.
    InvalidBitmapRow(InvalidRowError),
    /// `ENDCHAR` appeared without a preceding `BITMAP`.
    EndCharOutsideBitmap,
    /// `ENDCHAR` closed a glyph that never declared `ENCODING`.
    EndCharWithoutEncoding,
    /// The input ended before `CHARS` closed the font header.
    UnterminatedHeader,
    /// The input ended between `BITMAP` and `ENDCHAR`.
    UnterminatedBitmap,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingToken => write!(f, "line has no directive"),
            Self::MissingValue { token } => write!(f, "`{token}` is missing its value"),
            Self::InvalidEncoding { value } => write!(f, "invalid ENCODING value {value:?}"),
            Self::InvalidBitmapRow(error) => write!(f, "invalid bitmap row: {error}"),
            Self::EndCharOutsideBitmap => write!(f, "ENDCHAR without a preceding BITMAP"),
            Self::EndCharWithoutEncoding => write!(f, "ENDCHAR for a glyph without ENCODING"),
            Self::UnterminatedHeader => write!(f, "input ended before CHARS"),
            Self::UnterminatedBitmap => write!(f, "input ended inside a BITMAP section"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{ParseErrorKind, parse};
    use crate::row::InvalidRowError;

    const TWO_GLYPHS: &str = "\
STARTFONT 2.1
COMMENT test font
FONT -misc-test-medium-r-normal--4-40-75-75-c-40-iso10646-1
SIZE 4 75 75
FONTBOUNDINGBOX 4 2 0 0
STARTPROPERTIES 2
FONT_ASCENT 2
FONT_DESCENT 0
ENDPROPERTIES
CHARS 2
STARTCHAR B
ENCODING 66
SWIDTH 500 0
DWIDTH 4 0
BBX 4 2 0 0
BITMAP
F
9
ENDCHAR
STARTCHAR A
ENCODING 65
BITMAP
6
F
ENDCHAR
ENDFONT
";

    #[test]
    fn font_properties_are_captured_until_chars() {
        let font = parse(TWO_GLYPHS).unwrap();

        assert_eq!(font.property("FONTBOUNDINGBOX"), Some("4 2 0 0"));
        assert_eq!(font.property("FONT_ASCENT"), Some("2"));
        assert_eq!(font.property("CHARS"), Some("2"));
        assert_eq!(font.property("STARTPROPERTIES"), None);
        assert_eq!(font.property("COMMENT"), None);
        assert_eq!(font.property("SWIDTH"), None);
    }

    #[test]
    fn glyphs_keep_first_seen_order() {
        let font = parse(TWO_GLYPHS).unwrap();

        let encodings = font.glyphs().map(|g| g.encoding()).collect::<Vec<_>>();
        assert_eq!(encodings, [66, 65]);
    }

    #[test]
    fn glyph_records_carry_properties_and_rows() {
        let font = parse(TWO_GLYPHS).unwrap();
        let b = font.glyph(66).unwrap();

        assert_eq!(b.name(), Some("B"));
        assert_eq!(b.property("ENCODING"), Some("66"));
        assert_eq!(b.property("STARTCHAR"), Some("B"));
        assert_eq!(b.property("DWIDTH"), Some("4 0"));
        assert_eq!(b.property("BITMAP"), None);

        let rows = b.bitmap().iter().map(|r| r.as_str()).collect::<Vec<_>>();
        assert_eq!(rows, ["F", "9"]);

        // Properties of one glyph never leak into the next.
        let a = font.glyph(65).unwrap();
        assert_eq!(a.property("DWIDTH"), None);
    }

    #[test]
    fn parsing_is_deterministic() {
        assert_eq!(parse(TWO_GLYPHS).unwrap(), parse(TWO_GLYPHS).unwrap());
    }

    #[test]
    fn duplicate_encoding_replaces_in_place() {
        let source = "\
CHARS 3
STARTCHAR first
ENCODING 1
BITMAP
00
ENDCHAR
STARTCHAR second
ENCODING 2
BITMAP
00
ENDCHAR
STARTCHAR again
ENCODING 1
BITMAP
ff
ENDCHAR
";
        let font = parse(source).unwrap();

        assert_eq!(font.glyph_count(), 2);
        let names = font.glyphs().map(|g| g.name().unwrap()).collect::<Vec<_>>();
        assert_eq!(names, ["again", "second"]);
    }

    #[test]
    fn encoding_with_alternate_code() {
        let source = "CHARS 1\nSTARTCHAR x\nENCODING -1 300\nBITMAP\n00\nENDCHAR\n";
        let font = parse(source).unwrap();

        assert!(font.glyph(-1).is_some());
    }

    #[test]
    fn endchar_without_bitmap() {
        let source = "CHARS 1\nSTARTCHAR A\nENCODING 65\nENDCHAR\n";
        let error = parse(source).unwrap_err();

        assert_eq!(error.line(), 4);
        assert_eq!(error.kind(), &ParseErrorKind::EndCharOutsideBitmap);
    }

    #[test]
    fn endchar_without_encoding() {
        let source = "CHARS 1\nSTARTCHAR A\nBITMAP\n00\nENDCHAR\n";
        let error = parse(source).unwrap_err();

        assert_eq!(error.line(), 5);
        assert_eq!(error.kind(), &ParseErrorKind::EndCharWithoutEncoding);
    }

    #[test]
    fn blank_line_is_malformed() {
        let error = parse("FONTBOUNDINGBOX 8 16 0 0\n\nCHARS 0\n").unwrap_err();

        assert_eq!(error.line(), 2);
        assert_eq!(error.kind(), &ParseErrorKind::MissingToken);
    }

    #[test]
    fn property_without_value() {
        let error = parse("FONTBOUNDINGBOX\nCHARS 0\n").unwrap_err();

        assert_eq!(
            error.kind(),
            &ParseErrorKind::MissingValue {
                token: "FONTBOUNDINGBOX".to_owned()
            }
        );
    }

    #[test]
    fn header_never_closed() {
        let error = parse("STARTFONT 2.1\nFONTBOUNDINGBOX 8 16 0 0\n").unwrap_err();

        assert_eq!(error.line(), 2);
        assert_eq!(error.kind(), &ParseErrorKind::UnterminatedHeader);
    }

    #[test]
    fn bitmap_never_closed() {
        let error = parse("CHARS 1\nENCODING 1\nBITMAP\n00\n").unwrap_err();

        assert_eq!(error.kind(), &ParseErrorKind::UnterminatedBitmap);
    }

    #[test]
    fn invalid_encoding() {
        let error = parse("CHARS 1\nENCODING sixty\n").unwrap_err();

        assert_eq!(
            error.kind(),
            &ParseErrorKind::InvalidEncoding {
                value: "sixty".to_owned()
            }
        );
    }

    #[test]
    fn non_hex_bitmap_row() {
        let error = parse("CHARS 1\nENCODING 1\nBITMAP\nzz\nENDCHAR\n").unwrap_err();

        assert_eq!(error.line(), 4);
        assert_eq!(
            error.kind(),
            &ParseErrorKind::InvalidBitmapRow(InvalidRowError::InvalidDigit {
                position: 0,
                c: 'z'
            })
        );
    }

    #[test]
    fn comments_are_skipped_inside_bitmaps() {
        let source = "CHARS 1\nENCODING 1\nBITMAP\n80\nCOMMENT mid\n40\nENDCHAR\n";
        let font = parse(source).unwrap();

        assert_eq!(font.glyph(1).unwrap().bitmap().len(), 2);
    }
}
