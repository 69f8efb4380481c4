use super::rich_text::{Attributes, RichText, SOFT_HYPHEN};
use crate::font::{FontMetrics, FontRef};
use crate::PDFError;
use log::debug;

/// Control characters every font is assumed to handle
fn is_layout_control(ch: char) -> bool {
    matches!(ch, '\t' | '\n' | '\r' | SOFT_HYPHEN)
}

fn covers(font: &dyn FontMetrics, ch: char) -> bool {
    is_layout_control(ch) || font.has_rune(ch)
}

impl RichText {
    /// Build a rich text tree from a single attributed string, assigning each
    /// stretch of text to the first font in `fonts` that can render it. The
    /// font in `attributes` is ignored.
    ///
    /// Fails with [PDFError::NoFontFound] if some text is not covered by any
    /// of the fonts, and with [PDFError::NilFontInChain] if an unset slot in
    /// the chain had to be consulted.
    pub fn new(
        text: &str,
        fonts: &[Option<FontRef>],
        attributes: Attributes,
    ) -> Result<RichText, PDFError> {
        RichText::build(text, fonts, None, attributes)
    }

    /// Like [RichText::new], but text that none of `fonts` can render is
    /// replaced rune-for-rune with `?` and set in `default_font` instead of
    /// failing.
    pub fn with_default_font(
        text: &str,
        fonts: &[Option<FontRef>],
        default_font: FontRef,
        attributes: Attributes,
    ) -> Result<RichText, PDFError> {
        RichText::build(text, fonts, Some(&default_font), attributes)
    }

    /// Build a new piece from `text` (see [RichText::new]) and append it
    /// after the contents of this tree
    pub fn add(
        &self,
        text: &str,
        fonts: &[Option<FontRef>],
        attributes: Attributes,
    ) -> Result<RichText, PDFError> {
        let piece = RichText::new(text, fonts, attributes)?;
        Ok(self.add_piece(piece))
    }

    fn build(
        text: &str,
        fonts: &[Option<FontRef>],
        default_font: Option<&FontRef>,
        attributes: Attributes,
    ) -> Result<RichText, PDFError> {
        let mut pieces = Vec::new();
        segment(text, fonts, 0, default_font, &attributes, &mut pieces)?;

        match pieces.len() {
            0 => {
                let font = fonts.first().cloned().flatten().or_else(|| default_font.cloned());
                Ok(RichText::leaf("", Attributes { font, ..attributes }))
            }
            1 => Ok(pieces.remove(0)),
            _ => Ok(RichText::from_pieces(
                Attributes {
                    font: None,
                    ..attributes
                },
                pieces,
            )),
        }
    }
}

/// Split `text` into maximal runs the font at `fonts[0]` does or doesn't
/// cover. Covered runs become leaves, the rest is handed down the chain.
fn segment(
    text: &str,
    fonts: &[Option<FontRef>],
    index: usize,
    default_font: Option<&FontRef>,
    attributes: &Attributes,
    pieces: &mut Vec<RichText>,
) -> Result<(), PDFError> {
    if text.is_empty() {
        return Ok(());
    }

    let Some((slot, rest)) = fonts.split_first() else {
        let Some(default_font) = default_font else {
            return Err(PDFError::NoFontFound(text.to_string()));
        };
        debug!(
            "no font covers {text:?}, substituting with {}",
            default_font.name()
        );
        let replaced: String = text.chars().map(|_| '?').collect();
        pieces.push(RichText::leaf(
            replaced,
            Attributes {
                font: Some(default_font.clone()),
                ..attributes.clone()
            },
        ));
        return Ok(());
    };
    let font = slot.as_ref().ok_or(PDFError::NilFontInChain(index))?;

    let emit = |run: &str, covered: bool, pieces: &mut Vec<RichText>| {
        if covered {
            pieces.push(RichText::leaf(
                run,
                Attributes {
                    font: Some(font.clone()),
                    ..attributes.clone()
                },
            ));
            Ok(())
        } else {
            segment(run, rest, index + 1, default_font, attributes, pieces)
        }
    };

    let mut start = 0;
    let mut run_covered: Option<bool> = None;
    for (i, ch) in text.char_indices() {
        let covered = covers(font.as_ref(), ch);
        if let Some(previous) = run_covered.filter(|&previous| previous != covered) {
            emit(&text[start..i], previous, pieces)?;
            start = i;
        }
        run_covered = Some(covered);
    }
    if let Some(covered) = run_covered {
        emit(&text[start..], covered, pieces)?;
    }

    Ok(())
}
