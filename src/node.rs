//! Collaborator interfaces consumed by the extraction engine.
//!
//! The engine never owns the UI tree. The host hands it read access to a
//! snapshot through [`ScreenSource`] and [`ElementNode`], and the ability to
//! request actions on individual nodes. Clipboard access goes through
//! [`Clipboard`].
//!
//! Node handles are only used for the duration of one extraction pass.

use std::sync::Arc;

use crate::types::{Rect, WindowKind};

/// Action requested on an element node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeAction {
    ScrollForward,
    ScrollBackward,
    /// Select the character range `[start, end)`
    SetSelection { start: i32, end: i32 },
    Copy,
    ClearSelection,
    SetText(String),
}

impl NodeAction {
    /// Select the whole content of a node.
    pub fn select_all() -> Self {
        NodeAction::SetSelection {
            start: 0,
            end: i32::MAX,
        }
    }
}

/// Read-only view of one UI element, plus the ability to act on it.
///
/// Child access is fallible: the host tree can mutate while it is being
/// walked, and a stale child reference is reported as `None`.
pub trait ElementNode: Sized {
    fn is_visible(&self) -> bool;
    fn is_password(&self) -> bool;
    fn is_editable(&self) -> bool;
    fn is_focused(&self) -> bool;
    fn is_scrollable(&self) -> bool;

    /// Whether the node accepts whole-range selection followed by copy
    /// (rich text and web surfaces).
    fn supports_range_selection(&self) -> bool;

    fn class_name(&self) -> Option<String>;
    fn text(&self) -> Option<String>;
    fn content_description(&self) -> Option<String>;

    /// Bounds in absolute screen coordinates.
    fn bounds_in_screen(&self) -> Rect;

    fn child_count(&self) -> usize;

    /// Child at `index`, or `None` if the reference went stale.
    fn child(&self, index: usize) -> Option<Self>;

    /// Request an action; `false` means the host refused it.
    fn perform_action(&self, action: &NodeAction) -> bool;
}

/// One layer of on-screen content at a point in time.
#[derive(Debug, Clone)]
pub struct WindowSnapshot<N> {
    pub kind: WindowKind,
    /// Z-order reported by the host; higher is closer to the user
    pub layer: i32,
    pub root: N,
}

impl<N> WindowSnapshot<N> {
    pub fn new(kind: WindowKind, layer: i32, root: N) -> Self {
        Self { kind, layer, root }
    }
}

/// Host-side access to the current screen.
pub trait ScreenSource {
    type Node: ElementNode + Clone;

    /// Windows currently on screen, in whatever order the host reports them.
    fn list_windows(&self) -> Vec<WindowSnapshot<Self::Node>>;

    /// Root of the active window, used when no window list is available.
    fn active_root(&self) -> Option<Self::Node>;
}

/// Shared system clipboard.
pub trait Clipboard {
    /// First text item on the clipboard, if any.
    fn read_text(&self) -> Option<String>;

    fn write_text(&self, text: &str);

    fn clear(&self) {
        self.write_text("");
    }
}

impl<C: Clipboard + ?Sized> Clipboard for Arc<C> {
    fn read_text(&self) -> Option<String> {
        (**self).read_text()
    }

    fn write_text(&self, text: &str) {
        (**self).write_text(text)
    }

    fn clear(&self) {
        (**self).clear()
    }
}

impl<S: ScreenSource + ?Sized> ScreenSource for Arc<S> {
    type Node = S::Node;

    fn list_windows(&self) -> Vec<WindowSnapshot<Self::Node>> {
        (**self).list_windows()
    }

    fn active_root(&self) -> Option<Self::Node> {
        (**self).active_root()
    }
}

/// Application windows sorted topmost first; ties keep host order.
pub fn application_windows<N>(mut windows: Vec<WindowSnapshot<N>>) -> Vec<WindowSnapshot<N>> {
    windows.retain(|w| w.kind.is_application());
    // sort_by is stable
    windows.sort_by(|a, b| b.layer.cmp(&a.layer));
    windows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_all_spans_full_range() {
        assert_eq!(
            NodeAction::select_all(),
            NodeAction::SetSelection {
                start: 0,
                end: i32::MAX
            }
        );
    }

    #[test]
    fn test_application_windows_filters_and_orders() {
        let windows = vec![
            WindowSnapshot::new(WindowKind::Application, 0, "bottom"),
            WindowSnapshot::new(WindowKind::System, 5, "status-bar"),
            WindowSnapshot::new(WindowKind::Application, 2, "dialog"),
            WindowSnapshot::new(WindowKind::InputMethod, 3, "keyboard"),
            WindowSnapshot::new(WindowKind::Application, 0, "bottom-2"),
        ];

        let roots: Vec<_> = application_windows(windows)
            .into_iter()
            .map(|w| w.root)
            .collect();
        assert_eq!(roots, vec!["dialog", "bottom", "bottom-2"]);
    }

    #[test]
    fn test_application_windows_empty_when_only_system() {
        let windows = vec![
            WindowSnapshot::new(WindowKind::System, 1, ()),
            WindowSnapshot::new(WindowKind::AccessibilityOverlay, 9, ()),
        ];
        assert!(application_windows(windows).is_empty());
    }
}
