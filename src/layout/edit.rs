use super::rich_text::{Attributes, RichText};
use std::rc::Rc;

/// Round `offset` down to the nearest character boundary of `text`
fn floor_char_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

type Halves = (Option<Rc<RichText>>, Option<Rc<RichText>>);

impl RichText {
    /// Split the tree at a byte offset into the text before and the text
    /// after it. Offsets are clamped into `0..=len()`; an offset inside a
    /// multi-byte character splits before that character.
    ///
    /// Runs entirely on one side are shared with the receiver, a run
    /// straddling the offset is cut into two runs with the same attributes.
    pub fn split(&self, offset: usize) -> (RichText, RichText) {
        let offset = offset.min(self.len());
        let mut position = 0;
        let (left, right) = split_node(Rc::new(self.clone()), offset, &mut position);

        let empty = || self.first_leaf().with_text("");
        (
            left.map(Rc::unwrap_or_clone).unwrap_or_else(empty),
            right.map(Rc::unwrap_or_clone).unwrap_or_else(empty),
        )
    }

    /// Flatten the tree and join neighbouring runs with matching attributes,
    /// producing the fewest runs that render the same. Subtrees marked
    /// `no_break` are kept intact and never joined with their neighbours.
    pub fn merge(&self) -> RichText {
        if self.is_leaf() {
            return self.clone();
        }

        let mut flat: Vec<Rc<RichText>> = Vec::with_capacity(self.children.len());
        flatten(&self.children, &mut flat);

        let mut merged: Vec<Rc<RichText>> = Vec::with_capacity(flat.len());
        for piece in flat {
            match merged.last_mut() {
                Some(last) if can_join(last, &piece) => {
                    let mut text = String::with_capacity(last.text.len() + piece.text.len());
                    text.push_str(&last.text);
                    text.push_str(&piece.text);
                    *last = Rc::new(last.with_text(text));
                }
                _ => merged.push(piece),
            }
        }

        if merged.len() == 1 {
            return Rc::unwrap_or_clone(merged.remove(0));
        }
        RichText::internal(self.attributes.clone(), merged)
    }

    /// Insert `insert` at each of the given byte offsets, used to add
    /// hyphenation points (usually soft hyphens) to text before wrapping it.
    ///
    /// Only offsets strictly inside a run are honoured. Runs without any
    /// insertion are shared with the receiver.
    pub fn insert_str_at_offsets(&self, insert: &str, offsets: &[usize]) -> RichText {
        let mut offsets = offsets.to_vec();
        offsets.sort_unstable();
        offsets.dedup();

        let mut position = 0;
        match insert_node(self, insert, &offsets, &mut position) {
            Some(node) => node,
            None => self.clone(),
        }
    }

    /// Remove whitespace from both ends of the text
    pub fn trim_space(&self) -> RichText {
        self.trim_left_space().trim_right_space()
    }

    /// Remove leading whitespace, across as many runs as necessary
    pub fn trim_left_space(&self) -> RichText {
        let text = self.to_string();
        let leading = text.len() - text.trim_start().len();
        if leading == 0 {
            return self.clone();
        }
        self.split(leading).1
    }

    /// Remove trailing whitespace, across as many runs as necessary
    pub fn trim_right_space(&self) -> RichText {
        let text = self.to_string();
        let kept = text.trim_end().len();
        if kept == text.len() {
            return self.clone();
        }
        self.split(kept).0
    }
}

fn split_node(node: Rc<RichText>, offset: usize, position: &mut usize) -> Halves {
    let start = *position;
    let end = start + node.len();

    if end <= offset {
        *position = end;
        return (Some(node), None);
    }
    if start >= offset {
        *position = end;
        return (None, Some(node));
    }

    if node.is_leaf() {
        *position = end;
        let at = floor_char_boundary(&node.text, offset - start);
        let left = node.with_text(&node.text[..at]);
        let right = node.with_text(&node.text[at..]);
        return (Some(Rc::new(left)), Some(Rc::new(right)));
    }

    let mut left: Vec<Rc<RichText>> = Vec::new();
    let mut right: Vec<Rc<RichText>> = Vec::new();
    for child in node.children.iter() {
        let (l, r) = split_node(child.clone(), offset, position);
        left.extend(l);
        right.extend(r);
    }
    (
        shell(&node.attributes, left),
        shell(&node.attributes, right),
    )
}

/// Wrap children in a fresh internal node, collapsing a single child into
/// itself
fn shell(attributes: &Attributes, mut children: Vec<Rc<RichText>>) -> Option<Rc<RichText>> {
    match children.len() {
        0 => None,
        1 => children.pop(),
        _ => Some(Rc::new(RichText::internal(attributes.clone(), children))),
    }
}

fn flatten(children: &[Rc<RichText>], flat: &mut Vec<Rc<RichText>>) {
    for child in children {
        if child.is_leaf() || child.attributes.no_break {
            flat.push(child.clone());
        } else {
            flatten(&child.children, flat);
        }
    }
}

fn can_join(a: &RichText, b: &RichText) -> bool {
    a.is_leaf()
        && b.is_leaf()
        && !a.attributes.no_break
        && !b.attributes.no_break
        && a.attributes.matches(&b.attributes)
}

fn insert_node(
    node: &RichText,
    insert: &str,
    offsets: &[usize],
    position: &mut usize,
) -> Option<RichText> {
    if node.is_leaf() {
        let start = *position;
        *position += node.text.len();
        let end = *position;

        let mut inside: Vec<usize> = offsets
            .iter()
            .filter(|&&offset| offset > start && offset < end)
            .map(|&offset| floor_char_boundary(&node.text, offset - start))
            .collect();
        // offsets inside the same multi-byte character land on one boundary
        inside.dedup();
        if inside.is_empty() {
            return None;
        }

        let mut text = String::with_capacity(node.text.len() + inside.len() * insert.len());
        let mut last = 0;
        for at in inside {
            text.push_str(&node.text[last..at]);
            text.push_str(insert);
            last = at;
        }
        text.push_str(&node.text[last..]);
        return Some(node.with_text(text));
    }

    let mut changed = false;
    let children: Vec<Rc<RichText>> = node
        .children
        .iter()
        .map(|child| match insert_node(child, insert, offsets, position) {
            Some(replacement) => {
                changed = true;
                Rc::new(replacement)
            }
            None => child.clone(),
        })
        .collect();

    changed.then(|| RichText::internal(node.attributes.clone(), children))
}
