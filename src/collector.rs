//! Scroll-convergence collection.
//!
//! Reconstructs content that is only reachable by scrolling:
//!
//! ```text
//! Idle -> LocateScrollable -> ToTop -> CollectTop -> CollectForward -> Restore -> Done
//!               |                                                                 ^
//!               +------------------- no scrollable region ------------------------+
//! ```
//!
//! A refused scroll is the host's boundary signal, not an error. Endless
//! feeds never refuse a forward scroll, so collection also stops once
//! `convergence_threshold` consecutive scrolls add no new line. Both scroll
//! loops are capped at `max_scroll_attempts`, so `Done` is always reached.
//!
//! Restoration is best-effort: the first refused restore action ends it.

use tracing::{debug, info, trace, warn};

use crate::config::ScrollConfig;
use crate::filter::TextFilter;
use crate::layout::LineReconstructor;
use crate::line_set::AccumulatedLines;
use crate::locator::find_scrollable_on_screen;
use crate::node::{ElementNode, NodeAction, ScreenSource};
use crate::pacing::Pacer;
use crate::types::{ExtractedContent, ExtractionError, ExtractionMethod, ScrollReport};
use crate::walker::collect_screen;

/// Collector states, in the order they are visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectorState {
    Idle,
    LocateScrollable,
    ToTop,
    CollectTop,
    CollectForward,
    Restore,
    Done,
}

pub struct ScrollCollector<'a, S: ScreenSource> {
    source: &'a S,
    filter: &'a TextFilter,
    reconstructor: LineReconstructor,
    config: &'a ScrollConfig,
    pacer: Pacer,
    state: CollectorState,
}

impl<'a, S: ScreenSource> ScrollCollector<'a, S> {
    pub fn new(
        source: &'a S,
        filter: &'a TextFilter,
        reconstructor: LineReconstructor,
        config: &'a ScrollConfig,
        pacer: Pacer,
    ) -> Self {
        Self {
            source,
            filter,
            reconstructor,
            config,
            pacer,
            state: CollectorState::Idle,
        }
    }

    pub fn state(&self) -> CollectorState {
        self.state
    }

    fn enter(&mut self, next: CollectorState) {
        debug!("Collector {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Run the collector to `Done`.
    ///
    /// Without a scrollable region this is one walk of the current screen.
    /// A cancelled run still restores the scroll position and returns the
    /// lines gathered so far, flagged as cancelled.
    pub async fn collect(&mut self) -> ExtractedContent {
        self.enter(CollectorState::LocateScrollable);
        let Some(scrollable) = find_scrollable_on_screen(self.source) else {
            info!("No scrollable region, reading current screen once");
            let text = self
                .reconstructor
                .document(collect_screen(self.source, self.filter));
            self.enter(CollectorState::Done);
            return ExtractedContent::new(text, ExtractionMethod::SinglePass);
        };

        let mut report = ScrollReport::default();
        let mut lines = AccumulatedLines::new();

        if let Err(e) = self.scroll_and_collect(&scrollable, &mut report, &mut lines).await {
            info!("Collection stopped early: {}", e);
            report.cancelled = true;
        }

        self.enter(CollectorState::Restore);
        report.restored = restore(&scrollable, &report);

        self.enter(CollectorState::Done);
        info!(
            "Collected {} lines (to_top={}, forward={}, restored={}, converged={})",
            lines.len(),
            report.scrolls_to_top,
            report.scrolls_forward,
            report.restored,
            report.converged
        );
        ExtractedContent::new(lines.join(), ExtractionMethod::Scroll).with_scroll(report)
    }

    async fn scroll_and_collect(
        &mut self,
        scrollable: &S::Node,
        report: &mut ScrollReport,
        lines: &mut AccumulatedLines,
    ) -> Result<(), ExtractionError> {
        let max_attempts = self.config.max_scroll_attempts;

        self.enter(CollectorState::ToTop);
        for _ in 0..max_attempts {
            self.pacer.checkpoint()?;
            if !scrollable.perform_action(&NodeAction::ScrollBackward) {
                debug!("Top reached after {} backward scrolls", report.scrolls_to_top);
                break;
            }
            report.scrolls_to_top += 1;
            self.pacer.settle(self.config.scroll_settle()).await?;
        }

        self.enter(CollectorState::CollectTop);
        self.pacer.settle(self.config.initial_settle()).await?;
        let added = lines.extend(self.snapshot_lines());
        debug!("Top of content: {} lines", added);

        self.enter(CollectorState::CollectForward);
        let mut unproductive = 0;
        for _ in 0..max_attempts {
            self.pacer.checkpoint()?;
            if !scrollable.perform_action(&NodeAction::ScrollForward) {
                debug!("Bottom reached after {} forward scrolls", report.scrolls_forward);
                break;
            }
            report.scrolls_forward += 1;
            self.pacer.settle(self.config.scroll_settle()).await?;

            let added = lines.extend(self.snapshot_lines());
            trace!("Forward scroll {} added {} lines", report.scrolls_forward, added);
            if added > 0 {
                unproductive = 0;
                continue;
            }
            unproductive += 1;
            if unproductive >= self.config.convergence_threshold {
                debug!("No new content after {} scrolls, converged", unproductive);
                report.converged = true;
                break;
            }
        }

        Ok(())
    }

    fn snapshot_lines(&self) -> Vec<String> {
        let nodes = collect_screen(self.source, self.filter);
        trace!("Snapshot yielded {} text nodes", nodes.len());
        self.reconstructor.lines(nodes)
    }
}

/// Undo the net displacement of a collection run.
///
/// Returns the number of restore actions the host accepted.
fn restore<N: ElementNode>(scrollable: &N, report: &ScrollReport) -> u32 {
    let delta = i64::from(report.scrolls_forward) - i64::from(report.scrolls_to_top);
    let action = if delta > 0 {
        NodeAction::ScrollBackward
    } else {
        NodeAction::ScrollForward
    };

    let mut restored = 0;
    for _ in 0..delta.unsigned_abs() {
        if !scrollable.perform_action(&action) {
            warn!(
                "Restore refused after {} of {} {:?} actions",
                restored,
                delta.unsigned_abs(),
                action
            );
            break;
        }
        restored += 1;
    }
    restored
}
