//! Interface for interacting with the hexadecimal bitmap rows of a glyph.

use core::{error, fmt, str::Chars};

/// A single row of a glyph's bitmap, stored as the hexadecimal digits it was written with.
///
/// Each digit holds four pixels, most significant bit first, so a row of `n` digits is `4 * n`
/// pixels wide regardless of the font's declared bounding box.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct BitmapRow {
    /// The hexadecimal digits of the row.
    digits: String,
}

impl BitmapRow {
    /// Creates a new [`BitmapRow`] from `digits`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRowError`] if `digits` is empty or contains a character that is not a
    /// hexadecimal digit.
    pub fn new(digits: &str) -> Result<Self, InvalidRowError> {
        if digits.is_empty() {
            return Err(InvalidRowError::Empty);
        }

        if let Some((position, c)) = digits
            .char_indices()
            .find(|(_, c)| !c.is_ascii_hexdigit())
        {
            return Err(InvalidRowError::InvalidDigit { position, c });
        }

        Ok(Self {
            digits: digits.to_owned(),
        })
    }

    /// Returns the hexadecimal digits of the row as written in the source.
    pub fn as_str(&self) -> &str {
        &self.digits
    }

    /// Returns the number of hexadecimal digits in the row.
    pub fn digit_count(&self) -> usize {
        self.digits.len()
    }

    /// Returns the width of the row in pixels.
    pub fn bit_width(&self) -> usize {
        self.digits.len() * 4
    }

    /// Returns an [`Iterator`] over the row split into groups of two digits.
    ///
    /// The final group holds a single digit when the row has an odd number of digits.
    pub fn byte_groups(&self) -> ByteGroups<'_> {
        ByteGroups {
            remaining: &self.digits,
        }
    }

    /// Returns an [`Iterator`] over the pixels of the row, leftmost first.
    pub fn pixels(&self) -> RowPixelIter<'_> {
        RowPixelIter {
            digits: self.digits.chars(),
            nibble: 0,
            index: 4,
        }
    }
}

impl fmt::Display for BitmapRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.digits)
    }
}

/// An [`Iterator`] over the two-digit groups of a [`BitmapRow`].
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ByteGroups<'row> {
    /// The digits that have not been yielded yet.
    remaining: &'row str,
}

impl<'row> Iterator for ByteGroups<'row> {
    type Item = &'row str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining.is_empty() {
            return None;
        }

        // Rows only ever contain ASCII hexadecimal digits, so every index is a char boundary.
        let split = self.remaining.len().min(2);
        let (group, rest) = self.remaining.split_at(split);
        self.remaining = rest;
        Some(group)
    }
}

/// An [`Iterator`] over the pixels in a [`BitmapRow`].
#[derive(Clone, Debug)]
pub struct RowPixelIter<'row> {
    /// The digits that have not been decoded yet.
    digits: Chars<'row>,
    /// The value of the digit currently being yielded.
    nibble: u8,
    /// The index of the next bit of `nibble` to yield, or 4 if a new digit must be decoded.
    index: u8,
}

impl Iterator for RowPixelIter<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= 4 {
            let digit = self.digits.next()?.to_digit(16)?;
            self.nibble = u8::try_from(digit).ok()?;
            self.index = 0;
        }

        let bit = (self.nibble >> (3 - self.index)) & 0b1;

        self.index += 1;
        Some(bit == 1)
    }
}

/// Various errors that can occur while constructing a [`BitmapRow`].
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum InvalidRowError {
    /// The row contained no digits.
    Empty,
    /// The row contained a character that is not a hexadecimal digit.
    InvalidDigit {
        /// The byte offset of the offending character.
        position: usize,
        /// The offending character.
        c: char,
    },
}

impl fmt::Display for InvalidRowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "bitmap row is empty"),
            Self::InvalidDigit { position, c } => {
                write!(f, "invalid hexadecimal digit {c:?} at offset {position}")
            }
        }
    }
}

impl error::Error for InvalidRowError {}

#[cfg(test)]
mod test {
    use super::{BitmapRow, InvalidRowError};

    fn art(row: &BitmapRow) -> String {
        row.pixels().map(|on| if on { '#' } else { '.' }).collect()
    }

    #[test]
    fn single_byte_row() {
        let row = BitmapRow::new("7e").unwrap();

        assert_eq!(row.bit_width(), 8);
        assert_eq!(row.byte_groups().collect::<Vec<_>>(), ["7e"]);
        assert_eq!(art(&row), ".######.");
    }

    #[test]
    fn odd_length_row_keeps_short_group() {
        let row = BitmapRow::new("F80").unwrap();

        assert_eq!(row.bit_width(), 12);
        assert_eq!(row.byte_groups().collect::<Vec<_>>(), ["F8", "0"]);
        assert_eq!(art(&row), "#####.......");
    }

    #[test]
    fn art_width_and_group_count_follow_digit_count() {
        for digits in ["0", "ff", "a5c", "0001", "123456789abcdef"] {
            let row = BitmapRow::new(digits).unwrap();
            let art = art(&row);

            assert_eq!(art.len(), 4 * digits.len());
            assert!(art.chars().all(|c| c == '#' || c == '.'));
            assert_eq!(row.byte_groups().count(), digits.len().div_ceil(2));
        }
    }

    #[test]
    fn leading_zeros_are_preserved() {
        let row = BitmapRow::new("0001").unwrap();

        assert_eq!(art(&row), "...............#");
    }

    #[test]
    fn rejects_non_hex() {
        assert_eq!(BitmapRow::new(""), Err(InvalidRowError::Empty));
        assert_eq!(
            BitmapRow::new("7g"),
            Err(InvalidRowError::InvalidDigit {
                position: 1,
                c: 'g'
            })
        );
    }
}
