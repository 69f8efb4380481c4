use super::rich_text::{RichText, SOFT_HYPHEN};
use bitflags::bitflags;

bitflags! {
    /// Line breaking properties of a single byte of UTF-8 text. Break flag
    /// arrays carry one entry per byte of the text they describe.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct BreakFlags: u8 {
        /// A line may be broken before this byte
        const SOFT_BREAK = 1;
        /// The character starting at this byte is whitespace
        const WHITE_SPACE = 1 << 1;
        /// A character starts at this byte
        const CHAR_STOP = 1 << 2;
        /// A word starts or ends at this byte
        const WORD_STOP = 1 << 3;
        /// Breaking here is forbidden, overriding `SOFT_BREAK`
        const NO_BREAK = 1 << 4;
        /// This byte is in the middle of a character
        const INVALID = 1 << 5;
    }
}

fn is_ideograph(ch: char) -> bool {
    matches!(ch,
        '\u{3040}'..='\u{30FF}' // kana
        | '\u{3400}'..='\u{4DBF}'
        | '\u{4E00}'..='\u{9FFF}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{AC00}'..='\u{D7AF}' // hangul
    )
}

fn is_hyphen(ch: char) -> bool {
    ch == '-' || ch == SOFT_HYPHEN
}

/// Classify every byte of `text` for line breaking.
///
/// A simple classifier: lines may break after runs of
/// whitespace, after a hyphen or soft hyphen that follows a letter, and on
/// either side of CJK ideographs. Callers needing full Unicode line breaking
/// can produce their own flags.
pub fn mark_breaks(text: &str) -> Vec<BreakFlags> {
    let mut flags = vec![BreakFlags::INVALID; text.len()];
    let mut previous: Option<char> = None;
    let mut before_previous: Option<char> = None;

    for (offset, ch) in text.char_indices() {
        let mut flag = BreakFlags::CHAR_STOP;
        if ch.is_whitespace() {
            flag |= BreakFlags::WHITE_SPACE;
        }

        if let Some(prev) = previous {
            if prev.is_alphanumeric() != ch.is_alphanumeric() {
                flag |= BreakFlags::WORD_STOP;
            }

            let after_space = prev.is_whitespace() && !ch.is_whitespace();
            let after_hyphen = is_hyphen(prev)
                && before_previous.is_some_and(char::is_alphabetic)
                && ch.is_alphanumeric();
            let around_ideograph =
                !ch.is_whitespace() && !prev.is_whitespace() && (is_ideograph(ch) || is_ideograph(prev));
            if after_space || after_hyphen || around_ideograph {
                flag |= BreakFlags::SOFT_BREAK;
            }
        } else if ch.is_alphanumeric() {
            flag |= BreakFlags::WORD_STOP;
        }

        flags[offset] = flag;
        before_previous = previous;
        previous = Some(ch);
    }

    flags
}

impl RichText {
    /// Forbid line breaks inside every `no_break` run or subtree by setting
    /// [BreakFlags::NO_BREAK] on each of its interior offsets
    pub fn mark_no_break(&self, flags: &mut [BreakFlags]) {
        let mut position = 0;
        mark_node(self, flags, &mut position);
    }
}

fn mark_node(node: &RichText, flags: &mut [BreakFlags], position: &mut usize) {
    if node.attributes.no_break {
        let start = *position;
        let end = start + node.len();
        for flag in flags.iter_mut().take(end).skip(start + 1) {
            *flag |= BreakFlags::NO_BREAK;
        }
        *position = end;
        return;
    }

    if node.is_leaf() {
        *position += node.text.len();
    } else {
        for child in node.children.iter() {
            mark_node(child, flags, position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Attributes;

    fn soft_breaks(text: &str) -> Vec<usize> {
        mark_breaks(text)
            .iter()
            .enumerate()
            .filter(|(_, flag)| flag.contains(BreakFlags::SOFT_BREAK))
            .map(|(offset, _)| offset)
            .collect()
    }

    #[test]
    fn breaks_after_whitespace() {
        assert_eq!(soft_breaks("Lorem ipsum  dolor"), vec![6, 13]);
        assert_eq!(soft_breaks(" leading"), vec![1]);
    }

    #[test]
    fn breaks_after_hyphens() {
        assert_eq!(soft_breaks("well-known"), vec![5]);
        assert_eq!(soft_breaks("hy\u{AD}phen"), vec![4]);
        assert!(soft_breaks("-5").is_empty());
    }

    #[test]
    fn breaks_around_ideographs() {
        assert_eq!(soft_breaks("ab所有cd"), vec![2, 5, 8]);
    }

    #[test]
    fn marks_characters_and_whitespace() {
        let flags = mark_breaks("a 所");
        assert!(flags[0].contains(BreakFlags::CHAR_STOP | BreakFlags::WORD_STOP));
        assert!(flags[1].contains(BreakFlags::WHITE_SPACE | BreakFlags::WORD_STOP));
        assert!(flags[2].contains(BreakFlags::CHAR_STOP | BreakFlags::SOFT_BREAK));
        assert_eq!(flags[3], BreakFlags::INVALID);
        assert_eq!(flags[4], BreakFlags::INVALID);
        assert_eq!(flags.len(), 5);
    }

    #[test]
    fn marks_no_break_interiors() {
        let no_break = Attributes {
            no_break: true,
            ..Attributes::default()
        };
        let tree = RichText::from_pieces(
            Attributes::default(),
            [
                RichText::leaf("call ", Attributes::default()),
                RichText::leaf("555 1234", no_break),
                RichText::leaf(" now", Attributes::default()),
            ],
        );
        let text = tree.to_string();
        let mut flags = mark_breaks(&text);
        assert!(flags[9].contains(BreakFlags::SOFT_BREAK));

        tree.mark_no_break(&mut flags);
        assert!(!flags[5].contains(BreakFlags::NO_BREAK));
        assert!((6..13).all(|offset| flags[offset].contains(BreakFlags::NO_BREAK)));
        assert!(!flags[13].contains(BreakFlags::NO_BREAK));
    }
}
