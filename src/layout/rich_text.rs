use crate::colour::Colour;
use crate::font::{same_font, FontRef};
use crate::units::Pt;
use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

/// The invisible soft hyphen. It has no width of its own, but marks a place
/// where a word may be hyphenated.
pub const SOFT_HYPHEN: char = '\u{AD}';

/// Presentation attributes of a run of text
#[derive(Clone)]
pub struct Attributes {
    /// The font used to measure and render the run. Leaves need one to be measured.
    pub font: Option<FontRef>,
    pub font_size: Pt,
    pub colour: Colour,
    pub underline: bool,
    pub line_through: bool,
    /// Extra advance added after every character
    pub char_spacing: Pt,
    /// Extra advance added after every whitespace character
    pub word_spacing: Pt,
    /// Marks the run as an indivisible unit for line breaking
    pub no_break: bool,
}

impl Default for Attributes {
    fn default() -> Self {
        Attributes {
            font: None,
            font_size: Pt(12.0),
            colour: Colour::default(),
            underline: false,
            line_through: false,
            char_spacing: Pt(0.0),
            word_spacing: Pt(0.0),
            no_break: false,
        }
    }
}

impl Attributes {
    /// Default attributes at the given font size
    pub fn new(font_size: Pt) -> Attributes {
        Attributes {
            font_size,
            ..Default::default()
        }
    }

    /// Default attributes using the given font and font size
    pub fn with_font(font: FontRef, font_size: Pt) -> Attributes {
        Attributes {
            font: Some(font),
            font_size,
            ..Default::default()
        }
    }

    /// Whether two runs with these attributes would render identically and can
    /// therefore be joined into one run
    pub fn matches(&self, other: &Attributes) -> bool {
        let fonts_match = match (&self.font, &other.font) {
            (Some(a), Some(b)) => same_font(a, b),
            (None, None) => true,
            _ => false,
        };
        fonts_match
            && self.font_size == other.font_size
            && self.colour == other.colour
            && self.underline == other.underline
            && self.line_through == other.line_through
            && self.char_spacing == other.char_spacing
            && self.word_spacing == other.word_spacing
    }
}

impl fmt::Debug for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attributes")
            .field("font", &self.font.as_ref().map(|font| font.name()))
            .field("font_size", &self.font_size)
            .field("colour", &self.colour)
            .field("underline", &self.underline)
            .field("line_through", &self.line_through)
            .field("char_spacing", &self.char_spacing)
            .field("word_spacing", &self.word_spacing)
            .field("no_break", &self.no_break)
            .finish()
    }
}

/// Typographic measurements of a node, computed once and cached
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) struct Metrics {
    pub ascent: Pt,
    pub descent: Pt,
    pub height: Pt,
    pub line_gap: Pt,
    pub underline_position: Pt,
    pub underline_thickness: Pt,
    pub width: Pt,
    pub chars: usize,
}

/// A tree of attributed text runs.
///
/// A node is either a leaf holding text with one consistent set of
/// [Attributes], or an internal node holding an ordered list of children.
/// Children are shared between trees, so cloning a tree and all of the
/// editing operations ([split](RichText::split), [merge](RichText::merge),
/// [insert_str_at_offsets](RichText::insert_str_at_offsets), ...) are cheap
/// and never alter the receiver.
///
/// Byte offsets accepted and produced by the tree always index into the UTF-8
/// text of the whole subtree, in document order.
#[derive(Clone, Debug)]
pub struct RichText {
    pub(crate) text: String,
    pub(crate) attributes: Attributes,
    pub(crate) children: Vec<Rc<RichText>>,
    pub(crate) metrics: OnceCell<Metrics>,
}

impl Default for RichText {
    fn default() -> Self {
        RichText::leaf("", Attributes::default())
    }
}

impl RichText {
    /// Create a single run of text
    pub fn leaf<S: Into<String>>(text: S, attributes: Attributes) -> RichText {
        RichText {
            text: text.into(),
            attributes,
            children: Vec::new(),
            metrics: OnceCell::new(),
        }
    }

    /// Create an internal node holding the given pieces, in order
    pub fn from_pieces<I>(attributes: Attributes, pieces: I) -> RichText
    where
        I: IntoIterator<Item = RichText>,
    {
        RichText::internal(attributes, pieces.into_iter().map(Rc::new).collect())
    }

    pub(crate) fn internal(attributes: Attributes, children: Vec<Rc<RichText>>) -> RichText {
        RichText {
            text: String::new(),
            attributes,
            children,
            metrics: OnceCell::new(),
        }
    }

    /// A fresh leaf with the same attributes as this node but different text
    pub(crate) fn with_text<S: Into<String>>(&self, text: S) -> RichText {
        RichText::leaf(text, self.attributes.clone())
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// The text of this node if it's a leaf; internal nodes hold no text of their own
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn children(&self) -> impl Iterator<Item = &RichText> {
        self.children.iter().map(|child| child.as_ref())
    }

    /// Append a piece after the contents of this tree. A leaf becomes the
    /// first child of a new root carrying its attributes.
    pub fn add_piece(&self, piece: RichText) -> RichText {
        if self.is_leaf() {
            let attributes = Attributes {
                font: None,
                ..self.attributes.clone()
            };
            RichText::internal(attributes, vec![Rc::new(self.clone()), Rc::new(piece)])
        } else {
            let mut children = self.children.clone();
            children.push(Rc::new(piece));
            RichText::internal(self.attributes.clone(), children)
        }
    }

    /// Visit every leaf in document order. Stops early and returns `false`
    /// as soon as the visitor returns `false`.
    pub fn each_leaf<'a, F>(&'a self, visit: &mut F) -> bool
    where
        F: FnMut(&'a RichText) -> bool,
    {
        if self.is_leaf() {
            return visit(self);
        }
        self.children.iter().all(|child| child.each_leaf(visit))
    }

    /// All leaves in document order
    pub fn leaves(&self) -> Vec<&RichText> {
        let mut leaves = Vec::new();
        self.each_leaf(&mut |leaf| {
            leaves.push(leaf);
            true
        });
        leaves
    }

    pub(crate) fn first_leaf(&self) -> &RichText {
        match self.children.first() {
            Some(child) => child.first_leaf(),
            None => self,
        }
    }

    pub(crate) fn last_leaf(&self) -> &RichText {
        match self.children.last() {
            Some(child) => child.last_leaf(),
            None => self,
        }
    }

    /// Visit every rune in document order along with the leaf holding it and
    /// its byte offset within this tree. Stops early and returns `false` as
    /// soon as the visitor returns `false`.
    pub fn each_rune<'a, F>(&'a self, mut visit: F) -> bool
    where
        F: FnMut(&'a RichText, char, usize) -> bool,
    {
        let mut start = 0;
        self.each_leaf(&mut |leaf| {
            let offset = start;
            start += leaf.text.len();
            leaf.text
                .char_indices()
                .all(|(i, ch)| visit(leaf, ch, offset + i))
        })
    }

    /// The advance of a single rune in this leaf, including character and word
    /// spacing. Leaves without a font have no width.
    pub(crate) fn rune_width(&self, ch: char) -> Pt {
        let Some(font) = &self.attributes.font else {
            return Pt(0.0);
        };
        let scaling: Pt = self.attributes.font_size / font.units_per_em() as f32;
        let mut width =
            scaling * font.advance_width(ch).unwrap_or_default() as f32 + self.attributes.char_spacing;
        if ch.is_whitespace() {
            width += self.attributes.word_spacing;
        }
        width
    }

    /// The advance of a stretch of text set with this leaf's attributes
    pub fn width_of_text(&self, text: &str) -> Pt {
        text.chars()
            .filter(|&ch| ch != SOFT_HYPHEN)
            .map(|ch| self.rune_width(ch))
            .sum()
    }

    fn measure(&self) -> Metrics {
        let Some(font) = &self.attributes.font else {
            return Metrics::default();
        };
        let scaling: Pt = self.attributes.font_size / font.units_per_em() as f32;

        let mut metrics = Metrics {
            ascent: scaling * font.ascent() as f32,
            descent: scaling * font.descent() as f32,
            height: scaling * font.height() as f32,
            line_gap: scaling * font.line_gap() as f32,
            underline_position: scaling * font.underline_position() as f32,
            underline_thickness: scaling * font.underline_thickness() as f32,
            ..Default::default()
        };
        for ch in self.text.chars().filter(|&ch| ch != SOFT_HYPHEN) {
            metrics.chars += 1;
            metrics.width += self.rune_width(ch);
        }
        metrics
    }

    fn aggregate(&self) -> Metrics {
        let mut metrics = Metrics::default();
        for child in self.children.iter().map(|child| child.metrics()) {
            metrics.ascent = metrics.ascent.max(child.ascent);
            metrics.descent = metrics.descent.min(child.descent);
            metrics.line_gap = metrics.line_gap.max(child.line_gap);
            metrics.underline_position = metrics.underline_position.min(child.underline_position);
            metrics.underline_thickness =
                metrics.underline_thickness.max(child.underline_thickness);
            metrics.width += child.width;
            metrics.chars += child.chars;
        }
        // derived from this node's own extremes, not the children's heights,
        // so that children sitting on different baselines still share one line
        metrics.height = metrics.ascent - metrics.descent;
        metrics
    }

    pub(crate) fn metrics(&self) -> &Metrics {
        self.metrics.get_or_init(|| {
            if self.is_leaf() {
                self.measure()
            } else {
                self.aggregate()
            }
        })
    }

    /// Distance from the baseline to the top of the tallest run
    pub fn ascent(&self) -> Pt {
        self.metrics().ascent
    }

    /// Distance from the baseline to the bottom of the lowest run. Note: this is usually negative
    pub fn descent(&self) -> Pt {
        self.metrics().descent
    }

    pub fn height(&self) -> Pt {
        self.metrics().height
    }

    pub fn line_gap(&self) -> Pt {
        self.metrics().line_gap
    }

    pub fn underline_position(&self) -> Pt {
        self.metrics().underline_position
    }

    pub fn underline_thickness(&self) -> Pt {
        self.metrics().underline_thickness
    }

    /// Total advance of the text, including character and word spacing
    pub fn width(&self) -> Pt {
        self.metrics().width
    }

    /// Number of visible characters (soft hyphens are not counted)
    pub fn chars(&self) -> usize {
        self.metrics().chars
    }

    /// Length of the text in bytes. Always recomputed.
    pub fn len(&self) -> usize {
        if self.is_leaf() {
            self.text.len()
        } else {
            self.children.iter().map(|child| child.len()).sum()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for RichText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_leaf() {
            return f.write_str(&self.text);
        }
        for child in self.children.iter() {
            write!(f, "{child}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::test_fonts::*;

    fn close(a: Pt, b: f32) -> bool {
        (*a - b).abs() < 1e-3
    }

    #[test]
    fn measures_a_leaf() {
        let lorem = RichText::leaf("Lorem", Attributes::with_font(arial(), Pt(10.0)));
        assert!(close(lorem.ascent(), 9.0527));
        assert!(close(lorem.descent(), -2.1191));
        assert!(close(lorem.width(), 28.3447));
        assert!(close(lorem.height(), 11.1719));
        assert_eq!(lorem.chars(), 5);
        assert_eq!(lorem.len(), 5);
    }

    #[test]
    fn leaves_without_fonts_are_unmeasured() {
        let text = RichText::leaf("Lorem", Attributes::default());
        assert_eq!(text.width(), Pt(0.0));
        assert_eq!(text.ascent(), Pt(0.0));
        assert_eq!(text.chars(), 0);
        assert_eq!(text.len(), 5);
    }

    #[test]
    fn spacing_and_soft_hyphens() {
        let attributes = Attributes {
            char_spacing: Pt(1.0),
            word_spacing: Pt(2.0),
            ..Attributes::with_font(arial(), Pt(10.0))
        };
        let plain = RichText::leaf("a b", Attributes::with_font(arial(), Pt(10.0)));
        let spaced = RichText::leaf("a b\u{AD}", attributes);
        assert_eq!(spaced.chars(), 3);
        assert!(close(spaced.width(), *plain.width() + 3.0 + 2.0));
    }

    #[test]
    fn internal_nodes_aggregate() {
        let small = RichText::leaf("Lorem ", Attributes::with_font(arial(), Pt(10.0)));
        let big = RichText::leaf("所有", Attributes::with_font(st_song(), Pt(20.0)));
        let tree = RichText::from_pieces(Attributes::default(), [small.clone(), big.clone()]);

        assert!(close(tree.ascent(), 17.18));
        assert!(close(tree.descent(), -2.82));
        assert!(close(tree.width(), *small.width() + 40.0));
        assert_eq!(tree.chars(), 8);
        assert_eq!(tree.len(), 6 + 6);
        assert_eq!(tree.to_string(), "Lorem 所有");
    }

    #[test]
    fn internal_height_comes_from_own_extremes() {
        // the tallest ascent and the deepest descent come from different runs, so
        // neither summing nor taking the largest child height gives the line height
        let tall = RichText::leaf("所", Attributes::with_font(st_song(), Pt(20.0)));
        let deep = RichText::leaf("g", Attributes::with_font(arial(), Pt(17.0)));
        let tree = RichText::from_pieces(Attributes::default(), [tall.clone(), deep.clone()]);

        assert!(close(tree.ascent(), 17.18));
        assert!(close(tree.descent(), -3.6025));
        assert!(close(tree.height(), 20.7825));
        assert!(*tree.height() > *tall.height());
        assert!(*tree.height() > *deep.height());
        assert!(*tree.height() < *tall.height() + *deep.height());
    }

    #[test]
    fn add_piece_grows_a_new_root_from_a_leaf() {
        let hello = RichText::leaf("Hello, ", Attributes::with_font(arial(), Pt(10.0)));
        let tree = hello.add_piece(RichText::leaf("World!", Attributes::default()));
        assert!(!tree.is_leaf());
        assert!(hello.is_leaf());
        assert_eq!(tree.to_string(), "Hello, World!");

        let tree = tree.add_piece(RichText::leaf("!", Attributes::default()));
        assert_eq!(tree.children().count(), 3);
    }

    #[test]
    fn each_rune_reports_byte_offsets() {
        let tree = RichText::from_pieces(
            Attributes::default(),
            [
                RichText::leaf("a所", Attributes::default()),
                RichText::leaf("b", Attributes::default()),
            ],
        );
        let mut seen = Vec::new();
        tree.each_rune(|leaf, ch, offset| {
            seen.push((leaf.text().to_string(), ch, offset));
            true
        });
        assert_eq!(
            seen,
            vec![
                ("a所".to_string(), 'a', 0),
                ("a所".to_string(), '所', 1),
                ("b".to_string(), 'b', 4),
            ]
        );

        let mut count = 0;
        assert!(!tree.each_rune(|_, _, _| {
            count += 1;
            count < 2
        }));
        assert_eq!(count, 2);
    }
}
