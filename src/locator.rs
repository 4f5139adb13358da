//! Locating scrollable and range-selectable elements.
//!
//! Both searches are depth-first, pre-order, over application windows in
//! topmost-first order; the first match wins and the search stops there.

use crate::node::{application_windows, ElementNode, ScreenSource, WindowSnapshot};

/// First scrollable element across the given windows.
pub fn find_scrollable<N: ElementNode + Clone>(windows: Vec<WindowSnapshot<N>>) -> Option<N> {
    find_in_windows(windows, &|node: &N| node.is_scrollable())
}

/// First scrollable element in the tree the walker would read.
///
/// Searches the application windows, or the active root when there are none.
pub fn find_scrollable_on_screen<S: ScreenSource>(source: &S) -> Option<S::Node> {
    let windows = application_windows(source.list_windows());
    if !windows.is_empty() {
        return find_scrollable(windows);
    }
    let root = source.active_root()?;
    find_first(&root, &|node: &S::Node| node.is_scrollable())
}

/// First element supporting whole-range selection across the given windows.
pub fn find_range_selectable<N: ElementNode + Clone>(windows: Vec<WindowSnapshot<N>>) -> Option<N> {
    find_in_windows(windows, &|node: &N| node.supports_range_selection())
}

/// First element in a subtree matching `predicate`, depth-first.
pub fn find_first<N, F>(root: &N, predicate: &F) -> Option<N>
where
    N: ElementNode + Clone,
    F: Fn(&N) -> bool,
{
    if predicate(root) {
        return Some(root.clone());
    }
    (0..root.child_count())
        .filter_map(|i| root.child(i))
        .find_map(|child| find_first(&child, predicate))
}

fn find_in_windows<N, F>(windows: Vec<WindowSnapshot<N>>, predicate: &F) -> Option<N>
where
    N: ElementNode + Clone,
    F: Fn(&N) -> bool,
{
    application_windows(windows)
        .iter()
        .find_map(|window| find_first(&window.root, predicate))
}
