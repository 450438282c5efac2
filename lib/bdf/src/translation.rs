//! Translation tables mapping the 256 output slots of a single-byte codepage to font encodings.
//!
//! A table is a text file with one mapping per line: a decimal output slot followed by the
//! hexadecimal encoding of the source glyph that should occupy it. Lines beginning with `#` and
//! blank lines are ignored.

use core::{error, fmt};

use crate::font::Encoding;

/// The number of slots in a [`TranslationTable`].
pub const SLOT_COUNT: usize = 256;

/// A fixed-size mapping from output slot to source [`Encoding`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TranslationTable {
    /// The source encoding assigned to each slot, if any.
    entries: [Option<Encoding>; SLOT_COUNT],
}

impl TranslationTable {
    /// Returns the source [`Encoding`] assigned to `slot`, or `None` if the table left it
    /// unassigned.
    pub fn get(&self, slot: u8) -> Option<Encoding> {
        self.entries[usize::from(slot)]
    }

    /// Returns the number of slots that have an assigned [`Encoding`].
    pub fn assigned_count(&self) -> usize {
        self.entries.iter().flatten().count()
    }

    /// Returns an [`Iterator`] over every slot in ascending order along with its assignment.
    pub fn iter(&self) -> impl Iterator<Item = (u8, Option<Encoding>)> + '_ {
        (0..=u8::MAX).map(|slot| (slot, self.get(slot)))
    }
}

/// Parses `source` as a translation table.
///
/// Slots that `source` does not mention are left unassigned; that is only reported once the
/// slot is looked up. When a slot appears more than once, the last mapping wins.
///
/// # Errors
///
/// Returns [`TableError`] if a slot is not a decimal integer in `0..=255` or a codepoint is
/// missing or not a hexadecimal integer.
pub fn load(source: &str) -> Result<TranslationTable, TableError> {
    let mut entries = [None; SLOT_COUNT];

    for (index, line) in source.lines().enumerate() {
        let line_number = index + 1;
        if line.starts_with('#') {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let Some(slot_token) = tokens.next() else {
            continue;
        };

        let error = |kind: TableErrorKind| TableError {
            line: line_number,
            kind,
        };

        let slot = slot_token.parse::<i64>().map_err(|_| {
            error(TableErrorKind::InvalidSlot {
                token: slot_token.to_owned(),
            })
        })?;
        let slot = u8::try_from(slot).map_err(|_| error(TableErrorKind::SlotOutOfRange(slot)))?;

        let codepoint_token = tokens
            .next()
            .ok_or_else(|| error(TableErrorKind::MissingCodepoint))?;
        let digits = codepoint_token
            .strip_prefix("0x")
            .or_else(|| codepoint_token.strip_prefix("0X"))
            .unwrap_or(codepoint_token);
        let codepoint = Encoding::from_str_radix(digits, 16).map_err(|_| {
            error(TableErrorKind::InvalidCodepoint {
                token: codepoint_token.to_owned(),
            })
        })?;

        let entry = &mut entries[usize::from(slot)];
        if let Some(previous) = entry.replace(codepoint) {
            log::warn!(
                "line {line_number}: slot {slot} remapped from 0x{previous:04x} to 0x{codepoint:04x}"
            );
        }
    }

    let table = TranslationTable { entries };
    log::debug!(
        "translation table assigns {} of {SLOT_COUNT} slots",
        table.assigned_count()
    );
    Ok(table)
}

/// A translation table line that could not be parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableError {
    /// The 1-based line of the offending mapping.
    line: usize,
    /// What went wrong.
    kind: TableErrorKind,
}

impl TableError {
    /// Returns the 1-based line of the offending mapping.
    pub const fn line(&self) -> usize {
        self.line
    }

    /// Returns the [`TableErrorKind`] of the error.
    pub const fn kind(&self) -> &TableErrorKind {
        &self.kind
    }
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed table entry at line {}: {}", self.line, self.kind)
    }
}

impl error::Error for TableError {}

/// The various ways a translation table line can be malformed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableErrorKind {
    /// The slot column was not a decimal integer.
    InvalidSlot {
        /// The raw slot column.
        token: String,
    },
    /// The slot was outside `0..=255`.
    SlotOutOfRange(i64),
    /// The line had a slot but no codepoint.
    MissingCodepoint,
    /// The codepoint column was not a hexadecimal integer.
    InvalidCodepoint {
        /// The raw codepoint column.
        token: String,
    },
}

impl fmt::Display for TableErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSlot { token } => write!(f, "invalid decimal slot {token:?}"),
            Self::SlotOutOfRange(slot) => write!(f, "slot {slot} is outside 0..={}", u8::MAX),
            Self::MissingCodepoint => write!(f, "missing codepoint column"),
            Self::InvalidCodepoint { token } => write!(f, "invalid hexadecimal codepoint {token:?}"),
        }
    }
}
