//! Rendering of laid out lines into PDF content streams.

use crate::codepage::{CodepageIndex, CodepageLookup};
use crate::layout::{RichText, SOFT_HYPHEN};
use crate::units::Pt;
use pdf_writer::{Content, Name, Str};

/// Renders a single line of rich text with its baseline starting at `origin`,
/// returning the content stream operators.
///
/// Every leaf is cut into code page runs (see [RichText::each_codepage]) and
/// each run is shown with the single-byte font resource `font_resource`
/// names for that leaf and code page. Characters no code page covers are shown
/// as `?`, soft hyphens are not shown at all. Underlines and strike-throughs
/// are drawn as filled bars under / through each run.
pub fn render_line<L, F>(line: &RichText, origin: (Pt, Pt), codepages: &L, mut font_resource: F) -> Vec<u8>
where
    L: CodepageLookup + ?Sized,
    F: FnMut(&RichText, Option<CodepageIndex>) -> String,
{
    let mut content = Content::new();
    content.save_state();

    let (mut x, y) = origin;
    line.each_codepage(codepages, |index, text, leaf| {
        let attributes = leaf.attributes();
        let width = leaf.width_of_text(text);
        let visible: String = text.chars().filter(|&ch| ch != SOFT_HYPHEN).collect();
        let bytes = match index.and_then(|index| codepages.codepage(index)) {
            Some(page) => page.encode(&visible),
            None => vec![b'?'; visible.chars().count()],
        };

        attributes.colour.set_fill(&mut content);
        let resource = font_resource(leaf, index);
        content.begin_text();
        content.set_font(Name(resource.as_bytes()), *attributes.font_size);
        content.set_char_spacing(*attributes.char_spacing);
        content.set_word_spacing(*attributes.word_spacing);
        content.next_line(*x, *y);
        content.show(Str(&bytes));
        content.end_text();

        if attributes.underline || attributes.line_through {
            let thickness = leaf.underline_thickness().max(attributes.font_size / 20.0);
            if attributes.underline {
                let top = y + leaf.underline_position();
                content.rect(*x, *(top - thickness), *width, *thickness);
                content.fill_nonzero();
            }
            if attributes.line_through {
                let middle = y + leaf.ascent() / 3.0;
                content.rect(*x, *(middle - thickness / 2.0), *width, *thickness);
                content.fill_nonzero();
            }
        }

        x += width;
    });

    content.restore_state();
    content.finish().to_vec()
}
