//! Selection fast-path: select the whole content of a range-selectable
//! element, copy it, and read it back from the clipboard.
//!
//! The clipboard is a shared resource. Every failed attempt restores what
//! the user had there before; a successful attempt leaves the copied text
//! on the clipboard for the caller.

use tracing::{debug, info, warn};

use crate::config::SelectionConfig;
use crate::locator::find_range_selectable;
use crate::node::{Clipboard, ElementNode, NodeAction, ScreenSource};
use crate::pacing::Pacer;
use crate::types::{ExtractedContent, ExtractionError, ExtractionMethod};

pub struct SelectionFastPath<'a, S, C> {
    source: &'a S,
    clipboard: &'a C,
    config: &'a SelectionConfig,
    pacer: Pacer,
}

impl<'a, S, C> SelectionFastPath<'a, S, C>
where
    S: ScreenSource,
    C: Clipboard,
{
    pub fn new(source: &'a S, clipboard: &'a C, config: &'a SelectionConfig, pacer: Pacer) -> Self {
        Self {
            source,
            clipboard,
            config,
            pacer,
        }
    }

    /// Try to read the whole content in one copy.
    ///
    /// Returns `None` when there is no range-selectable element, an action
    /// is refused, the copied text is blank, or the caller cancelled. The
    /// caller then falls back to scroll collection.
    pub async fn extract(&self) -> Option<ExtractedContent> {
        let saved = self.clipboard.read_text();
        self.clipboard.clear();

        match self.select_and_copy().await {
            Ok(Some(text)) => {
                info!("Selection fast-path copied {} chars", text.len());
                Some(ExtractedContent::new(text, ExtractionMethod::Selection))
            }
            Ok(None) => {
                self.restore_clipboard(saved);
                None
            }
            Err(e) => {
                debug!("Selection fast-path aborted: {}", e);
                self.restore_clipboard(saved);
                None
            }
        }
    }

    async fn select_and_copy(&self) -> Result<Option<String>, ExtractionError> {
        self.pacer.checkpoint()?;

        let Some(target) = find_range_selectable(self.source.list_windows()) else {
            debug!("No range-selectable element on screen");
            return Ok(None);
        };

        if !target.perform_action(&NodeAction::select_all()) {
            debug!("Select-all refused");
            clear_selection(&target);
            return Ok(None);
        }

        let copied = self.copy_selection(&target).await;
        clear_selection(&target);
        copied
    }

    async fn copy_selection(&self, target: &S::Node) -> Result<Option<String>, ExtractionError> {
        self.pacer.settle(self.config.select_settle()).await?;

        if !target.perform_action(&NodeAction::Copy) {
            debug!("Copy refused");
            return Ok(None);
        }
        self.pacer.settle(self.config.copy_settle()).await?;

        let text = self
            .clipboard
            .read_text()
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());
        if text.is_none() {
            debug!("Clipboard empty after copy");
        }
        Ok(text)
    }

    fn restore_clipboard(&self, saved: Option<String>) {
        match saved {
            Some(text) => self.clipboard.write_text(&text),
            None => self.clipboard.clear(),
        }
    }
}

fn clear_selection<N: ElementNode>(node: &N) {
    if !node.perform_action(&NodeAction::ClearSelection) {
        warn!("Failed to clear selection");
    }
}
