//! Screen Text Extractor - Reconstruct the full text of a screen from its
//! accessibility element tree.
//!
//! The host exposes the on-screen UI as a tree of elements with text,
//! bounds and a few actions. This crate walks that tree, filters out system
//! chrome, rebuilds reading order from positions, and reaches content that
//! is scrolled out of view by scrolling, collecting and restoring.
//!
//! # Quick Start
//!
//! ```no_run
//! use screen_text_extractor::{ExtractorConfig, ScreenTextExtractor, SimulatedScreen};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn demo() -> Result<(), screen_text_extractor::ExtractionError> {
//! let screen = SimulatedScreen::load(std::path::Path::new("screen.json"))?;
//! let extractor = ScreenTextExtractor::new(screen.clone(), screen.clipboard(), ExtractorConfig::load());
//!
//! let outcome = extractor.extract_full_screen_text(&CancellationToken::new()).await;
//! if outcome.is_found() {
//!     println!("{}", outcome.text());
//! } else {
//!     println!("No text found");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`types`]: Core data types (Rect, TextNode, ExtractedContent, ExtractionError)
//! - [`node`]: Collaborator traits the host implements (ElementNode, ScreenSource, Clipboard)
//! - [`filter`], [`walker`], [`layout`]: one-snapshot text reconstruction
//! - [`collector`], [`selection`]: reaching content beyond the visible viewport
//! - [`engine`], [`session`]: the extraction entry point and its hosting state
//! - [`simulated`]: in-memory screens for replay and tests

pub mod collector;
pub mod config;
pub mod engine;
pub mod filter;
pub mod layout;
pub mod line_set;
pub mod locator;
pub mod node;
pub mod pacing;
pub mod selection;
pub mod session;
pub mod simulated;
pub mod types;
pub mod walker;

// Re-export commonly used types
pub use collector::{CollectorState, ScrollCollector};
pub use config::ExtractorConfig;
pub use engine::ScreenTextExtractor;
pub use filter::{is_system_chrome_label, TextFilter, SYSTEM_CHROME_LABELS};
pub use layout::{LineReconstructor, DEFAULT_LINE_TOLERANCE};
pub use line_set::AccumulatedLines;
pub use node::{Clipboard, ElementNode, NodeAction, ScreenSource, WindowSnapshot};
pub use selection::SelectionFastPath;
pub use session::ExtractionSession;
pub use simulated::{SimulatedClipboard, SimulatedScreen};
pub use types::{
    ExtractedContent, ExtractionError, ExtractionMethod, ExtractionOutcome, Rect, ScrollReport,
    TextNode, WindowKind,
};
