//! Legacy single-byte encodings, used when emitting text with simple
//! (non-CID) fonts.
//!
//! Text is emitted in runs, each encoded with the first code page able to
//! represent its first character, so that a run only switches encodings
//! when it has to.

use crate::layout::RichText;
use log::trace;

/// A contiguous range of code points mapped onto a contiguous range of bytes
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CodepageRange {
    pub first: char,
    pub last: char,
    /// The byte `first` is encoded as
    pub byte: u8,
}

const fn range(first: char, last: char, byte: u8) -> CodepageRange {
    CodepageRange { first, last, byte }
}

/// A single-byte encoding, described as sorted, non-overlapping ranges
#[derive(Debug, PartialEq, Eq)]
pub struct Codepage {
    pub name: &'static str,
    pub ranges: &'static [CodepageRange],
}

impl Codepage {
    /// The byte encoding `ch`, if this code page can represent it
    pub fn char_for_codepoint(&self, ch: char) -> Option<u8> {
        let index = self
            .ranges
            .binary_search_by(|r| {
                if r.last < ch {
                    std::cmp::Ordering::Less
                } else if r.first > ch {
                    std::cmp::Ordering::Greater
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .ok()?;
        let r = &self.ranges[index];
        let byte = u32::from(r.byte) + (u32::from(ch) - u32::from(r.first));
        u8::try_from(byte).ok()
    }

    /// Encode `text` into this code page, replacing anything unrepresentable
    /// with `?`
    pub fn encode(&self, text: &str) -> Vec<u8> {
        text.chars()
            .map(|ch| self.char_for_codepoint(ch).unwrap_or(b'?'))
            .collect()
    }
}

/// Identifies a code page within a [CodepageLookup]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CodepageIndex(pub usize);

/// A set of code pages that text can be encoded into
pub trait CodepageLookup {
    /// The first code page able to represent `ch`
    fn index_for_codepoint(&self, ch: char) -> Option<CodepageIndex>;

    fn codepage(&self, index: CodepageIndex) -> Option<&Codepage>;
}

/// ISO-8859-1 (Latin-1), which maps directly onto the first 256 code points
pub const ISO_8859_1: Codepage = Codepage {
    name: "ISO-8859-1",
    ranges: &[range('\u{0}', '\u{FF}', 0x00)],
};

/// ISO-8859-5 (Latin/Cyrillic)
pub const ISO_8859_5: Codepage = Codepage {
    name: "ISO-8859-5",
    ranges: &[
        range('\u{0}', '\u{A0}', 0x00),
        range('\u{A7}', '\u{A7}', 0xFD),
        range('\u{AD}', '\u{AD}', 0xAD),
        range('\u{401}', '\u{40C}', 0xA1),
        range('\u{40E}', '\u{44F}', 0xAE),
        range('\u{451}', '\u{45C}', 0xF1),
        range('\u{45E}', '\u{45F}', 0xFE),
        range('\u{2116}', '\u{2116}', 0xF0),
    ],
};

/// The code pages built into the crate: ISO-8859-1 then ISO-8859-5
#[derive(Copy, Clone, Debug, Default)]
pub struct StandardCodepages;

impl StandardCodepages {
    const PAGES: [&'static Codepage; 2] = [&ISO_8859_1, &ISO_8859_5];
}

impl CodepageLookup for StandardCodepages {
    fn index_for_codepoint(&self, ch: char) -> Option<CodepageIndex> {
        Self::PAGES
            .iter()
            .position(|page| page.char_for_codepoint(ch).is_some())
            .map(CodepageIndex)
    }

    fn codepage(&self, index: CodepageIndex) -> Option<&Codepage> {
        Self::PAGES.get(index.0).copied()
    }
}

impl RichText {
    /// Visit the text leaf by leaf, cut into the longest runs that can be
    /// encoded with a single code page. Runs no code page can represent are
    /// reported with no index.
    pub fn each_codepage<L, F>(&self, lookup: &L, mut visit: F)
    where
        L: CodepageLookup + ?Sized,
        F: FnMut(Option<CodepageIndex>, &str, &RichText),
    {
        self.each_leaf(&mut |leaf| {
            let text = leaf.text();
            let mut active: Option<CodepageIndex> = None;
            let mut start = 0;

            for (i, ch) in text.char_indices() {
                let extends = match active {
                    Some(index) => lookup
                        .codepage(index)
                        .is_some_and(|page| page.char_for_codepoint(ch).is_some()),
                    None => i > 0 && lookup.index_for_codepoint(ch).is_none(),
                };
                if extends {
                    continue;
                }

                if i > start {
                    trace!("codepage run {active:?}: {:?}", &text[start..i]);
                    visit(active, &text[start..i], leaf);
                }
                start = i;
                active = lookup.index_for_codepoint(ch);
            }

            if start < text.len() {
                trace!("codepage run {active:?}: {:?}", &text[start..]);
                visit(active, &text[start..], leaf);
            }
            true
        });
    }
}
