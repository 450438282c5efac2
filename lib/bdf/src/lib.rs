//! Reading of BDF bitmap fonts and of the translation tables used to select a single-byte
//! codepage out of them.

pub mod font;
pub mod parse;
pub mod row;
pub mod translation;

pub use font::{Encoding, Font, GlyphRecord};
pub use parse::{ParseError, parse};
pub use translation::TranslationTable;
