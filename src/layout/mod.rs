//! Rich text: runs of attributed text and how they are measured and broken
//! into lines.
//!
//! A [RichText] tree is usually built from a single string and a list of
//! fonts to fall back through, then broken into lines that fit a given width
//! using break flags computed for its text.
//!
//! # Example
//!
//! ```
//! use pdf_richtext::{Pt, TrueTypeFont};
//! use pdf_richtext::layout::{mark_breaks, Attributes, RichText};
//!
//! # fn lines(font_data: Vec<u8>) -> Result<(), pdf_richtext::PDFError> {
//! let font = TrueTypeFont::load(font_data)?.into_ref();
//!
//! let text = RichText::new(
//!     "Automatic hyphenation aids word wrapping.",
//!     &[Some(font)],
//!     Attributes::new(Pt(12.0)),
//! )?
//! .insert_str_at_offsets("\u{AD}", &[4, 16, 36]);
//!
//! let flags = mark_breaks(&text.to_string());
//! for line in text.wrap_to_width(Pt(100.0), &flags, false) {
//!     println!("{line} ({} wide)", line.width());
//! }
//! # Ok(())
//! # }
//! ```

mod edit;
mod fallback;
mod rich_text;
mod text;
mod wordbreak;

pub use rich_text::*;
pub use wordbreak::*;
