mod colour;
pub use colour::*;

mod font;
pub use font::*;

/// Rich text trees, font fallback, measurement and line breaking
pub mod layout;

/// Legacy single-byte encodings for emitting text
pub mod codepage;

/// Rendering laid out lines into PDF content streams
pub mod content;

mod units;
pub use units::*;

mod error;
pub use error::*;

/// Re-export PDF-writer functionality, mostly for embedding rendered lines in custom [pdf_writer::Content]
pub use pdf_writer;
