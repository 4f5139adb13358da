//! Line reconstruction.
//!
//! Turns an unordered bag of positioned text into reading order:
//!
//! 1. stable sort by `(top, left)`
//! 2. drop a node when an already accepted node has the same text and a
//!    box containing it (a container reporting its only child's text)
//! 3. linearize: skip a node repeating the previous accepted text, start a
//!    new line when the node begins below the previous node's bottom minus a
//!    tolerance, otherwise join with a single space
//!
//! The same pipeline yields either one joined document or the individual
//! lines, the latter feeding the scroll collector's accumulated set.

use crate::types::TextNode;

/// Vertical slack, in screen units, before a node counts as a new line.
pub const DEFAULT_LINE_TOLERANCE: i32 = 5;

/// Reading-order reconstruction with a fixed line tolerance.
#[derive(Debug, Clone, Copy)]
pub struct LineReconstructor {
    tolerance: i32,
}

impl Default for LineReconstructor {
    fn default() -> Self {
        Self::new(DEFAULT_LINE_TOLERANCE)
    }
}

impl LineReconstructor {
    pub fn new(tolerance: i32) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> i32 {
        self.tolerance
    }

    /// Reconstruct one document, lines joined by `\n`.
    ///
    /// # Examples
    ///
    /// ```
    /// use screen_text_extractor::{LineReconstructor, Rect, TextNode};
    ///
    /// let nodes = vec![
    ///     TextNode::new("world", Rect::new(0, 60, 20, 120)).unwrap(),
    ///     TextNode::new("Hello", Rect::new(0, 0, 20, 50)).unwrap(),
    ///     TextNode::new("Next", Rect::new(30, 0, 50, 50)).unwrap(),
    /// ];
    /// let text = LineReconstructor::default().document(nodes);
    /// assert_eq!(text, "Hello world\nNext");
    /// ```
    pub fn document(&self, nodes: Vec<TextNode>) -> String {
        self.lines(nodes).join("\n")
    }

    /// Reconstruct the individual lines in reading order.
    pub fn lines(&self, nodes: Vec<TextNode>) -> Vec<String> {
        let nodes = dedup_nested(sort_reading_order(nodes));

        let mut lines: Vec<String> = Vec::new();
        let mut previous: Option<&TextNode> = None;

        for node in &nodes {
            match previous {
                None => lines.push(node.text.clone()),
                Some(prev) if prev.text == node.text => continue,
                Some(prev) => {
                    if node.bounds.top > prev.bounds.bottom.saturating_sub(self.tolerance) {
                        lines.push(node.text.clone());
                    } else if let Some(line) = lines.last_mut() {
                        line.push(' ');
                        line.push_str(&node.text);
                    }
                }
            }
            previous = Some(node);
        }

        lines
    }
}

/// Stable sort into reading order: top to bottom, then left to right.
pub fn sort_reading_order(mut nodes: Vec<TextNode>) -> Vec<TextNode> {
    nodes.sort_by_key(|n| (n.bounds.top, n.bounds.left));
    nodes
}

/// Drop nodes whose text and box sit inside an already accepted node.
///
/// Scans in the given order. A later node that encloses an earlier one with
/// the same text is kept; linearization collapses it when it directly
/// follows. Same-text nodes whose boxes are disjoint are both kept.
pub fn dedup_nested(nodes: Vec<TextNode>) -> Vec<TextNode> {
    let mut accepted: Vec<TextNode> = Vec::with_capacity(nodes.len());
    for node in nodes {
        let duplicate = accepted
            .iter()
            .any(|kept| kept.text == node.text && kept.bounds.contains(&node.bounds));
        if !duplicate {
            accepted.push(node);
        }
    }
    accepted
}
