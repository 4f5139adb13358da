//! Core data types for the screen-text-extractor crate.
//!
//! This module defines the fundamental types used throughout the crate:
//! - `Rect`: Screen-space bounding rectangle of an element
//! - `TextNode`: One piece of visible text with its position
//! - `WindowKind`: Window layer classification reported by the host
//! - `ExtractedContent` / `ExtractionOutcome`: The result of one extraction
//! - `ExtractionError`: Error types surfaced by configuration, fixtures and sessions

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Absolute screen-space rectangle.
///
/// Coordinates follow the host convention: `top < bottom` and `left < right`
/// for a non-empty rectangle, with the origin at the top-left of the screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub top: i32,
    pub left: i32,
    pub bottom: i32,
    pub right: i32,
}

impl Rect {
    pub fn new(top: i32, left: i32, bottom: i32, right: i32) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    pub fn width(&self) -> i32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> i32 {
        self.bottom.saturating_sub(self.top)
    }

    /// Check if `other` lies entirely inside this rectangle (edges inclusive).
    ///
    /// # Examples
    ///
    /// ```
    /// use screen_text_extractor::Rect;
    ///
    /// let outer = Rect::new(0, 0, 100, 50);
    /// let inner = Rect::new(0, 0, 10, 50);
    /// assert!(outer.contains(&inner));
    /// assert!(!inner.contains(&outer));
    /// assert!(outer.contains(&outer));
    /// ```
    pub fn contains(&self, other: &Rect) -> bool {
        self.left <= other.left
            && self.top <= other.top
            && self.right >= other.right
            && self.bottom >= other.bottom
    }
}

/// A single piece of visible text and where it sits on screen.
///
/// Created by the tree walker, consumed by the line reconstructor. The text
/// is always trimmed and never blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextNode {
    pub text: String,
    pub bounds: Rect,
}

impl TextNode {
    /// Build a text node, rejecting blank text.
    ///
    /// # Examples
    ///
    /// ```
    /// use screen_text_extractor::{Rect, TextNode};
    ///
    /// assert!(TextNode::new("  Hello ", Rect::default()).is_some());
    /// assert!(TextNode::new(" \n\t", Rect::default()).is_none());
    /// ```
    pub fn new(text: &str, bounds: Rect) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            text: trimmed.to_string(),
            bounds,
        })
    }
}

/// Classification of an on-screen window layer.
///
/// Only `Application` windows are treated as content sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowKind {
    /// Regular application content
    Application,
    /// Status bar, navigation bar and similar system surfaces
    System,
    /// Soft keyboard
    InputMethod,
    /// Overlays owned by accessibility services (including our own trigger)
    AccessibilityOverlay,
    /// Split-screen divider
    SplitScreenDivider,
}

impl WindowKind {
    pub fn is_application(&self) -> bool {
        matches!(self, WindowKind::Application)
    }
}

/// Which strategy produced the extracted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// Whole-content select + copy on a range-selectable node
    Selection,
    /// Incremental scroll, collect and restore
    Scroll,
    /// One walk of the current screen, no scrollable region found
    SinglePass,
}

impl ExtractionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMethod::Selection => "selection",
            ExtractionMethod::Scroll => "scroll",
            ExtractionMethod::SinglePass => "single_pass",
        }
    }
}

/// Bookkeeping from one run of the scroll collector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollReport {
    /// Successful backward scrolls while seeking the top
    pub scrolls_to_top: u32,
    /// Successful forward scrolls while collecting
    pub scrolls_forward: u32,
    /// Restore actions that the source accepted
    pub restored: u32,
    /// Collection stopped because several scrolls in a row added nothing
    pub converged: bool,
    /// Collection stopped because the caller cancelled
    pub cancelled: bool,
}

/// Text reconstructed from the screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedContent {
    /// The reconstructed document, lines separated by `\n`
    pub content: String,

    /// Method used for extraction
    pub extraction_method: ExtractionMethod,

    /// Number of lines in `content`
    pub line_count: usize,

    /// Unix timestamp of extraction
    pub timestamp: i64,

    /// Scroll bookkeeping when the scroll collector ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll: Option<ScrollReport>,

    /// True when the caller aborted and `content` is partial
    #[serde(default)]
    pub cancelled: bool,
}

impl ExtractedContent {
    pub fn new(content: String, extraction_method: ExtractionMethod) -> Self {
        let line_count = if content.is_empty() {
            0
        } else {
            content.lines().count()
        };
        Self {
            content,
            extraction_method,
            line_count,
            timestamp: chrono::Utc::now().timestamp(),
            scroll: None,
            cancelled: false,
        }
    }

    pub fn with_scroll(mut self, report: ScrollReport) -> Self {
        self.cancelled = report.cancelled;
        self.scroll = Some(report);
        self
    }
}

/// Result of `extract_full_screen_text`.
///
/// `NoTextFound` is a normal, user-visible outcome and is distinct from
/// every error: the caller should show "nothing found", not a failure.
/// Partial text from a cancelled run is still `Found`, with
/// `ExtractedContent::cancelled` set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExtractionOutcome {
    Found(ExtractedContent),
    NoTextFound,
    /// The caller aborted before any text was gathered
    Cancelled,
}

impl ExtractionOutcome {
    /// Wrap reconstructed text, mapping blank text to `NoTextFound`, or to
    /// `Cancelled` when the run was aborted.
    pub fn from_content(content: ExtractedContent) -> Self {
        if !content.content.trim().is_empty() {
            ExtractionOutcome::Found(content)
        } else if content.cancelled {
            ExtractionOutcome::Cancelled
        } else {
            ExtractionOutcome::NoTextFound
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, ExtractionOutcome::Found(_))
    }

    pub fn is_cancelled(&self) -> bool {
        match self {
            ExtractionOutcome::Found(content) => content.cancelled,
            ExtractionOutcome::NoTextFound => false,
            ExtractionOutcome::Cancelled => true,
        }
    }

    /// The extracted text, or an empty string when nothing was found.
    pub fn text(&self) -> &str {
        match self {
            ExtractionOutcome::Found(content) => &content.content,
            ExtractionOutcome::NoTextFound | ExtractionOutcome::Cancelled => "",
        }
    }

    pub fn content(&self) -> Option<&ExtractedContent> {
        match self {
            ExtractionOutcome::Found(content) => Some(content),
            ExtractionOutcome::NoTextFound | ExtractionOutcome::Cancelled => None,
        }
    }
}

/// Errors that can occur around an extraction.
///
/// None of these escape `extract_full_screen_text`; they are raised by the
/// session guard, configuration loading and fixture parsing.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Another extraction is already in flight
    #[error("Extraction already in progress")]
    Busy,

    /// The hosting session has been stopped
    #[error("Extraction session is not running")]
    NotRunning,

    /// The caller aborted the extraction
    #[error("Extraction cancelled")]
    Cancelled,

    /// Configuration could not be parsed or written
    #[error("Configuration error: {0}")]
    Config(String),

    /// A simulated screen fixture is malformed
    #[error("Fixture error: {0}")]
    Fixture(String),

    /// File system error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ============================================================================
    // Unit Tests for Rect
    // ============================================================================

    #[test]
    fn test_rect_contains_nested() {
        let outer = Rect::new(0, 0, 100, 50);
        let inner = Rect::new(10, 5, 20, 40);
        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
    }

    #[test]
    fn test_rect_contains_overlapping_is_false() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 15, 15);
        assert!(!a.contains(&b));
        assert!(!b.contains(&a));
    }

    #[test]
    fn test_rect_dimensions() {
        let r = Rect::new(10, 20, 110, 70);
        assert_eq!(r.width(), 50);
        assert_eq!(r.height(), 100);
    }

    #[test]
    fn test_rect_dimensions_saturate() {
        let r = Rect::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX);
        assert_eq!(r.width(), i32::MAX);
        assert_eq!(r.height(), i32::MAX);
    }

    // ============================================================================
    // Unit Tests for TextNode
    // ============================================================================

    #[test]
    fn test_text_node_trims() {
        let node = TextNode::new("  Inbox \n", Rect::default()).unwrap();
        assert_eq!(node.text, "Inbox");
    }

    #[test]
    fn test_text_node_rejects_blank() {
        assert!(TextNode::new("", Rect::default()).is_none());
        assert!(TextNode::new("   ", Rect::default()).is_none());
        assert!(TextNode::new("\t\r\n", Rect::default()).is_none());
    }

    // ============================================================================
    // Unit Tests for outcomes
    // ============================================================================

    #[test]
    fn test_extracted_content_counts_lines() {
        let content = ExtractedContent::new("a\nb c\nd".to_string(), ExtractionMethod::Scroll);
        assert_eq!(content.line_count, 3);

        let empty = ExtractedContent::new(String::new(), ExtractionMethod::SinglePass);
        assert_eq!(empty.line_count, 0);
    }

    #[test]
    fn test_outcome_blank_is_no_text_found() {
        let outcome =
            ExtractionOutcome::from_content(ExtractedContent::new(" \n ".into(), ExtractionMethod::SinglePass));
        assert_eq!(outcome, ExtractionOutcome::NoTextFound);
        assert_eq!(outcome.text(), "");
        assert!(!outcome.is_found());
    }

    #[test]
    fn test_outcome_blank_cancelled_is_cancelled() {
        let mut content = ExtractedContent::new(String::new(), ExtractionMethod::Scroll);
        content.cancelled = true;
        let outcome = ExtractionOutcome::from_content(content.clone());
        assert_eq!(outcome, ExtractionOutcome::Cancelled);
        assert!(outcome.is_cancelled());
        assert_eq!(outcome.text(), "");

        content.content = "partial".into();
        let outcome = ExtractionOutcome::from_content(content);
        assert!(outcome.is_found());
        assert!(outcome.is_cancelled());

        let json = serde_json::to_value(ExtractionOutcome::Cancelled).unwrap();
        assert_eq!(json["status"], "cancelled");
    }

    #[test]
    fn test_with_scroll_propagates_cancelled() {
        let report = ScrollReport {
            cancelled: true,
            ..ScrollReport::default()
        };
        let content = ExtractedContent::new("x".into(), ExtractionMethod::Scroll).with_scroll(report);
        assert!(content.cancelled);
        assert_eq!(content.scroll, Some(report));
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let json = serde_json::to_value(ExtractionOutcome::NoTextFound).unwrap();
        assert_eq!(json["status"], "no_text_found");

        let found = ExtractionOutcome::Found(ExtractedContent::new(
            "Hello".into(),
            ExtractionMethod::Selection,
        ));
        let json = serde_json::to_value(&found).unwrap();
        assert_eq!(json["status"], "found");
        assert_eq!(json["extraction_method"], "selection");
        assert_eq!(json["content"], "Hello");
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(ExtractionError::Busy.to_string(), "Extraction already in progress");
        assert_eq!(
            ExtractionError::Config("bad".into()).to_string(),
            "Configuration error: bad"
        );
    }

    // ============================================================================
    // Property-Based Tests
    // ============================================================================

    proptest! {
        #[test]
        fn prop_rect_contains_itself(top in -1000i32..1000, left in -1000i32..1000, h in 0i32..500, w in 0i32..500) {
            let r = Rect::new(top, left, top + h, left + w);
            prop_assert!(r.contains(&r));
        }

        #[test]
        fn prop_text_node_never_blank(text in ".*") {
            if let Some(node) = TextNode::new(&text, Rect::default()) {
                prop_assert!(!node.text.trim().is_empty());
                prop_assert_eq!(node.text.trim(), node.text.as_str());
            }
        }
    }
}
