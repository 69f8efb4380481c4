use thiserror::Error;

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum PDFError {
    #[error("no font found for {0:?}")]
    /// None of the fonts in the fallback chain (nor a default font) covers this text
    NoFontFound(String),

    #[error("font slot {0} in the fallback chain is unset")]
    /// A candidate slot in the font chain was reached but holds no font
    NilFontInChain(usize),

    #[error(transparent)]
    /// [ttf_parser] failed to parse the font
    FaceParsingError(#[from] owned_ttf_parser::FaceParsingError),
}
