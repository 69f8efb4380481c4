use crate::PDFError;
use owned_ttf_parser::{AsFaceRef, OwnedFace};
use std::rc::Rc;

/// The metrics a rich text tree needs from a font. Values are expressed in
/// font units; callers scale them by `font_size / units_per_em`.
///
/// Implementations are typically backed by a TrueType or AFM parser, see
/// [TrueTypeFont] for the TrueType flavour.
pub trait FontMetrics {
    /// A name identifying the font, used to decide whether two font handles
    /// refer to the same face
    fn name(&self) -> &str;

    /// Horizontal advance of the glyph for `ch`, or `None` if the font has no glyph for it
    fn advance_width(&self, ch: char) -> Option<u32>;

    /// Distance from the baseline to the top of the font
    fn ascent(&self) -> i32;

    /// Distance from the baseline to the bottom of the font. Note: this is usually negative
    fn descent(&self) -> i32;

    /// Distance from the bottom to the top of the font (not including the line gap)
    fn height(&self) -> i32;

    /// Recommended extra space between lines
    fn line_gap(&self) -> i32;

    fn underline_position(&self) -> i32;

    fn underline_thickness(&self) -> i32;

    fn units_per_em(&self) -> u32;

    /// Whether the font can render `ch`
    fn has_rune(&self, ch: char) -> bool {
        self.advance_width(ch).is_some()
    }
}

/// A shared handle to a font's metrics. Rich text leaves hold these, and many
/// leaves usually share the same font.
pub type FontRef = Rc<dyn FontMetrics>;

/// Whether two font handles refer to the same face, either by identity or
/// by name
pub fn same_font(a: &FontRef, b: &FontRef) -> bool {
    Rc::ptr_eq(a, b) || a.name() == b.name()
}

/// A parsed TrueType / OpenType font. Only the metrics are read from the face;
/// glyph outlines are never touched.
pub struct TrueTypeFont {
    pub face: OwnedFace,
    name: String,
}

impl TrueTypeFont {
    /// Load a font from raw bytes, parsing the font and returning an error if the font
    /// could not be parsed
    pub fn load(bytes: Vec<u8>) -> Result<TrueTypeFont, PDFError> {
        let face = OwnedFace::from_vec(bytes, 0)?;

        let name = face
            .as_face_ref()
            .names()
            .into_iter()
            .find(|name| name.name_id == owned_ttf_parser::name_id::FULL_NAME && name.is_unicode())
            .and_then(|name| name.to_string())
            .unwrap_or_default();

        Ok(TrueTypeFont { face, name })
    }

    /// Wrap the font up in a shareable handle for use in rich text
    pub fn into_ref(self) -> FontRef {
        Rc::new(self)
    }
}

impl FontMetrics for TrueTypeFont {
    fn name(&self) -> &str {
        &self.name
    }

    fn advance_width(&self, ch: char) -> Option<u32> {
        let face = self.face.as_face_ref();
        face.glyph_index(ch)
            .and_then(|gid| face.glyph_hor_advance(gid))
            .map(u32::from)
    }

    fn ascent(&self) -> i32 {
        self.face.as_face_ref().ascender().into()
    }

    fn descent(&self) -> i32 {
        self.face.as_face_ref().descender().into()
    }

    fn height(&self) -> i32 {
        self.face.as_face_ref().height().into()
    }

    fn line_gap(&self) -> i32 {
        self.face.as_face_ref().line_gap().into()
    }

    fn underline_position(&self) -> i32 {
        self.face
            .as_face_ref()
            .underline_metrics()
            .map(|m| m.position.into())
            .unwrap_or_default()
    }

    fn underline_thickness(&self) -> i32 {
        self.face
            .as_face_ref()
            .underline_metrics()
            .map(|m| m.thickness.into())
            .unwrap_or_default()
    }

    fn units_per_em(&self) -> u32 {
        self.face.as_face_ref().units_per_em().into()
    }

    fn has_rune(&self, ch: char) -> bool {
        self.face.as_face_ref().glyph_index(ch).is_some()
    }
}


#[cfg(test)]
mod tests {
    use super::test_fonts::*;
    use super::*;

    #[test]
    fn fonts_are_equal_by_identity_or_name() {
        let a = arial();
        let b = arial();
        assert!(same_font(&a, &a.clone()));
        assert!(same_font(&a, &b));
        assert!(!same_font(&a, &st_song()));
    }

    #[test]
    fn has_rune_defaults_to_advance_lookup() {
        assert!(Arial.has_rune('L'));
        assert!(!Arial.has_rune('所'));
        assert!(STSong.has_rune('所'));
    }

    #[test]
    fn loading_garbage_fails() {
        assert!(matches!(
            TrueTypeFont::load(vec![0, 1, 2, 3]),
            Err(PDFError::FaceParsingError(_))
        ));
    }
}
