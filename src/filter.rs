//! Node filtering and text extraction.
//!
//! Decides whether a single element contributes text to the document and,
//! if so, which text. Invisible and password elements never contribute.
//! An element's own text wins over its content description; a content
//! description that is only a system-chrome label ("Back", "Home", ...) is
//! dropped, because icon buttons would otherwise pollute every screen.

use std::collections::HashSet;

use crate::node::ElementNode;
use crate::types::TextNode;

/// Content descriptions of system chrome that are never treated as content.
///
/// Matching is exact: case and locale variants are listed explicitly.
pub const SYSTEM_CHROME_LABELS: &[&str] = &[
    // English
    "Back",
    "Home",
    "Close",
    "Navigate up",
    "More options",
    "Overview",
    "Recent apps",
    // Chinese (simplified)
    "返回",
    "主页",
    "关闭",
    "向上导航",
    "更多选项",
    // German
    "Zurück",
    "Startseite",
    "Schließen",
    // French
    "Retour",
    "Accueil",
    "Fermer",
    // Spanish
    "Atrás",
    "Inicio",
    "Cerrar",
];

/// Check if a label is one of the built-in system-chrome labels.
///
/// # Examples
///
/// ```
/// use screen_text_extractor::filter::is_system_chrome_label;
///
/// assert!(is_system_chrome_label("Back"));
/// assert!(is_system_chrome_label("返回"));
/// assert!(!is_system_chrome_label("back"));
/// assert!(!is_system_chrome_label("Back to top"));
/// ```
pub fn is_system_chrome_label(label: &str) -> bool {
    SYSTEM_CHROME_LABELS.contains(&label)
}

/// Per-node eligibility and text selection.
#[derive(Debug, Clone, Default)]
pub struct TextFilter {
    extra_blocked: HashSet<String>,
}

impl TextFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block additional content-description labels on top of the built-ins.
    pub fn with_extra_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extra_blocked: labels.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_blocked_label(&self, label: &str) -> bool {
        is_system_chrome_label(label) || self.extra_blocked.contains(label)
    }

    /// Pick the text an element contributes, if any.
    ///
    /// Rules, in order:
    /// 1. invisible or password elements contribute nothing
    /// 2. the element's own text, trimmed, if non-blank
    /// 3. its content description, trimmed, if non-blank and not a blocked label
    pub fn candidate_text<N: ElementNode>(&self, node: &N) -> Option<String> {
        if !node.is_visible() || node.is_password() {
            return None;
        }

        if let Some(text) = node.text() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }

        let description = node.content_description()?;
        let trimmed = description.trim();
        if trimmed.is_empty() || self.is_blocked_label(trimmed) {
            return None;
        }
        Some(trimmed.to_string())
    }

    /// Candidate text together with the element's current screen bounds.
    pub fn text_node<N: ElementNode>(&self, node: &N) -> Option<TextNode> {
        let text = self.candidate_text(node)?;
        TextNode::new(&text, node.bounds_in_screen())
    }
}
