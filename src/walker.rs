//! Tree walking.
//!
//! Visits an element tree depth-first, in child index order, collecting a
//! `TextNode` for every element the filter accepts. A child that cannot be
//! fetched (the host tree changed under us) is skipped along with its
//! subtree; the walk itself never fails.
//!
//! Recursion depth is not bounded: UI trees are shallow in practice.

use tracing::trace;

use crate::filter::TextFilter;
use crate::node::{application_windows, ElementNode, ScreenSource, WindowSnapshot};
use crate::types::TextNode;

/// Collect text nodes from a single root.
pub fn collect_from_root<N: ElementNode>(root: &N, filter: &TextFilter) -> Vec<TextNode> {
    let mut nodes = Vec::new();
    walk(root, filter, &mut nodes);
    nodes
}

/// Collect text nodes from every application window, topmost first.
pub fn collect_from_windows<N: ElementNode>(
    windows: Vec<WindowSnapshot<N>>,
    filter: &TextFilter,
) -> Vec<TextNode> {
    let mut nodes = Vec::new();
    for window in application_windows(windows) {
        walk(&window.root, filter, &mut nodes);
    }
    nodes
}

/// Collect the current screen.
///
/// Uses the window list when it contains application windows, otherwise
/// falls back to the active root.
pub fn collect_screen<S: ScreenSource>(source: &S, filter: &TextFilter) -> Vec<TextNode> {
    let windows = application_windows(source.list_windows());
    if !windows.is_empty() {
        return collect_from_windows(windows, filter);
    }

    match source.active_root() {
        Some(root) => {
            trace!("No application windows, walking active root");
            collect_from_root(&root, filter)
        }
        None => Vec::new(),
    }
}

fn walk<N: ElementNode>(node: &N, filter: &TextFilter, out: &mut Vec<TextNode>) {
    if let Some(text_node) = filter.text_node(node) {
        out.push(text_node);
    }

    for i in 0..node.child_count() {
        match node.child(i) {
            Some(child) => walk(&child, filter, out),
            None => trace!("Child {} unavailable, skipping subtree", i),
        }
    }
}
