use super::rich_text::{RichText, SOFT_HYPHEN};
use super::wordbreak::BreakFlags;
use crate::units::Pt;
use log::{debug, warn};

/// The glyph shown at the end of a line broken at a soft hyphen
const HYPHEN: char = '-';

impl RichText {
    /// Take as many whole words from the start of the text as fit within
    /// `width`, returning them as a line along with whatever is left over.
    ///
    /// `flags` classifies every byte of this tree's text (see
    /// [mark_breaks](crate::layout::mark_breaks) and
    /// [RichText::mark_no_break]); lines are only broken before bytes marked
    /// [BreakFlags::SOFT_BREAK] and not [BreakFlags::NO_BREAK].
    ///
    /// A line always holds at least one word, even if that word is wider
    /// than `width`. With `hard_break`, such a word is instead cut between
    /// characters so that the line fits. When the line ends on a soft hyphen,
    /// a visible hyphen is appended to it; a soft hyphen is only broken at if
    /// the line fits including that hyphen.
    ///
    /// The remainder comes with the slice of `flags` describing it, ready to
    /// be passed back in for the next line. There is no remainder when all of
    /// the text fits.
    pub fn words_to_width<'f>(
        &self,
        width: Pt,
        flags: &'f [BreakFlags],
        hard_break: bool,
    ) -> (RichText, Option<(RichText, &'f [BreakFlags])>) {
        if flags.len() < self.len() {
            warn!(
                "break flags cover {} of {} bytes, treating the rest as unflagged",
                flags.len(),
                self.len()
            );
        }

        let mut line_width = Pt(0.0);
        let mut word_width = Pt(0.0);
        let mut hyphen_width = Pt(0.0);
        let mut words = 0usize;
        let mut last_break = 0usize;
        let mut break_at: Option<usize> = None;
        let mut previous: Option<(&RichText, char, usize)> = None;

        self.each_rune(|leaf, ch, offset| {
            if words > 0 && line_width + hyphen_width + word_width > width {
                break_at = Some(last_break);
                return false;
            }
            if words == 0 && hard_break && previous.is_some() && word_width > width {
                // cut before the character that overflowed, unless that would
                // leave the line empty
                let cut = previous.map(|(_, _, o)| o).filter(|&o| o > 0);
                break_at = Some(cut.unwrap_or(offset));
                return false;
            }

            let flag = flags.get(offset).copied().unwrap_or_default();
            if offset > 0
                && flag.contains(BreakFlags::SOFT_BREAK)
                && !flag.contains(BreakFlags::NO_BREAK)
            {
                let hyphen = match previous {
                    Some((hyphenated, SOFT_HYPHEN, _)) => hyphenated.rune_width(HYPHEN),
                    _ => Pt(0.0),
                };
                // a hyphenation point is only usable if the line still fits
                // once the visible hyphen is added
                if hyphen == Pt(0.0) || line_width + word_width + hyphen <= width {
                    line_width += word_width;
                    word_width = Pt(0.0);
                    last_break = offset;
                    words += 1;
                    hyphen_width = hyphen;
                }
            }

            if ch != SOFT_HYPHEN {
                word_width += leaf.rune_width(ch);
            }
            previous = Some((leaf, ch, offset));
            true
        });

        // the end of the text closes the last word
        if break_at.is_none() {
            if words > 0 && line_width + hyphen_width + word_width > width {
                break_at = Some(last_break);
            } else if words == 0 && hard_break && word_width > width {
                break_at = previous.map(|(_, _, o)| o).filter(|&o| o > 0);
            }
        }

        let Some(offset) = break_at else {
            return (self.clone(), None);
        };
        debug!("breaking line at byte {offset} of {}", self.len());

        let (mut line, remainder) = self.split(offset);
        if offset == last_break && line.to_string().ends_with(SOFT_HYPHEN) {
            let hyphen = line.last_leaf().with_text(HYPHEN.to_string());
            line = line.add_piece(hyphen);
        }

        if remainder.is_empty() {
            return (line, None);
        }
        let remainder_flags = &flags[offset.min(flags.len())..];
        (line, Some((remainder, remainder_flags)))
    }

    /// Break the whole text into lines no wider than `width` (see
    /// [RichText::words_to_width]), trimming whitespace from both ends of
    /// each line.
    pub fn wrap_to_width(&self, width: Pt, flags: &[BreakFlags], hard_break: bool) -> Vec<RichText> {
        let mut lines = Vec::new();
        let (mut line, mut rest) = self.words_to_width(width, flags, hard_break);
        loop {
            lines.push(line.trim_space());
            let Some((remainder, remainder_flags)) = rest else {
                break;
            };
            (line, rest) = remainder.words_to_width(width, remainder_flags, hard_break);
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::test_fonts::*;
    use crate::layout::{mark_breaks, Attributes};

    fn arial10(text: &str) -> RichText {
        RichText::leaf(text, Attributes::with_font(arial(), Pt(10.0)))
    }

    fn wrap(text: &RichText, width: f32, hard_break: bool) -> Vec<String> {
        let flags = mark_breaks(&text.to_string());
        text.wrap_to_width(Pt(width), &flags, hard_break)
            .iter()
            .map(|line| line.to_string())
            .collect()
    }

    #[test]
    fn everything_fits_on_one_line() {
        let text = arial10("Lorem ipsum");
        let flags = mark_breaks(&text.to_string());
        let (line, rest) = text.words_to_width(Pt(1000.0), &flags, false);
        assert_eq!(line.to_string(), "Lorem ipsum");
        assert!(rest.is_none());
    }

    #[test]
    fn breaks_between_words() {
        // "Lorem " is 31.12pt wide, "ipsum " 29.45pt, "dolor sit amet" 60.02pt
        let text = arial10("Lorem ipsum dolor sit amet");
        let flags = mark_breaks(&text.to_string());
        let (line, rest) = text.words_to_width(Pt(62.0), &flags, false);
        assert_eq!(line.to_string(), "Lorem ipsum ");
        let (remainder, remainder_flags) = rest.expect("there is more text");
        assert_eq!(remainder.to_string(), "dolor sit amet");
        assert_eq!(remainder_flags.len(), remainder.len());
        assert_eq!(remainder_flags, &flags[12..]);

        assert_eq!(
            wrap(&text, 62.0, false),
            vec!["Lorem ipsum", "dolor sit amet"]
        );
    }

    #[test]
    fn a_long_word_gets_a_line_of_its_own() {
        let text = arial10("a incomprehensibilities b");
        assert_eq!(
            wrap(&text, 30.0, false),
            vec!["a", "incomprehensibilities", "b"]
        );
    }

    #[test]
    fn hard_break_cuts_long_words() {
        let text = arial10("incomprehensibilities");
        let lines = wrap(&text, 30.0, true);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), "incomprehensibilities");

        let flags = mark_breaks(&text.to_string());
        for line in text.wrap_to_width(Pt(30.0), &flags, true) {
            assert!(*line.width() <= 30.0);
        }
    }

    #[test]
    fn hard_break_always_makes_progress() {
        let text = arial10("WWW");
        let lines = wrap(&text, 5.0, true);
        assert_eq!(lines, vec!["W", "W", "W"]);
    }

    #[test]
    fn soft_hyphens_become_visible_hyphens() {
        let text = arial10("Automatic hyphenation")
            .insert_str_at_offsets("\u{AD}", &[4, 16]);
        let flags = mark_breaks(&text.to_string());
        // wide enough for "Automatic hyphen-" but not "Automatic hyphenation"
        let lines = text.wrap_to_width(Pt(85.0), &flags, false);
        let rendered: Vec<String> = lines
            .iter()
            .map(|line| line.to_string().replace('\u{AD}', ""))
            .collect();
        assert_eq!(rendered, vec!["Automatic hyphen-", "ation"]);
        assert_eq!(lines[0].leaves().last().map(|leaf| leaf.text()), Some("-"));
        assert!(*lines[0].width() <= 85.0);
    }

    #[test]
    fn hyphen_is_only_used_where_it_fits() {
        // "x aaaa-" is 33.35pt, "aaaa-" 25.58pt
        let text = arial10("x aaaa\u{AD}bbbb");
        let flags = mark_breaks(&text.to_string());
        let lines = text.wrap_to_width(Pt(31.0), &flags, false);
        let rendered: Vec<String> = lines.iter().map(|line| line.to_string()).collect();
        assert_eq!(rendered, vec!["x", "aaaa\u{AD}-", "bbbb"]);
        for line in lines.iter() {
            assert!(*line.width() <= 31.0, "{line:?} is {}", line.width());
        }
    }

    #[test]
    fn no_break_runs_stay_together() {
        let attributes = Attributes::with_font(arial(), Pt(10.0));
        let text = RichText::from_pieces(
            Attributes::default(),
            [
                RichText::leaf("call ", attributes.clone()),
                RichText::leaf(
                    "555 1234",
                    Attributes {
                        no_break: true,
                        ..attributes.clone()
                    },
                ),
                RichText::leaf(" now", attributes),
            ],
        );
        let mut flags = mark_breaks(&text.to_string());
        text.mark_no_break(&mut flags);
        let lines: Vec<String> = text
            .wrap_to_width(Pt(45.0), &flags, false)
            .iter()
            .map(|line| line.to_string())
            .collect();
        assert_eq!(lines, vec!["call", "555 1234", "now"]);
    }

    #[test]
    fn missing_flags_never_break() {
        let text = arial10("Lorem ipsum dolor");
        let lines = text.wrap_to_width(Pt(10.0), &[], false);
        assert_eq!(lines.len(), 1);
    }
}
