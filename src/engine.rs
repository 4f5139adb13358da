//! The extraction entry point.
//!
//! One call runs the selection fast-path (when enabled) and falls back to
//! scroll collection. It never returns an error: faults degrade to partial
//! or empty text. Empty text is reported as `NoTextFound`, or as `Cancelled`
//! when the caller aborted the run.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::collector::ScrollCollector;
use crate::config::ExtractorConfig;
use crate::filter::TextFilter;
use crate::layout::LineReconstructor;
use crate::node::{Clipboard, ScreenSource};
use crate::pacing::Pacer;
use crate::selection::SelectionFastPath;
use crate::types::{ExtractedContent, ExtractionMethod, ExtractionOutcome};

/// Reconstructs the full text of a screen from its element tree.
pub struct ScreenTextExtractor<S, C> {
    source: S,
    clipboard: C,
    config: ExtractorConfig,
    filter: TextFilter,
    reconstructor: LineReconstructor,
}

impl<S, C> ScreenTextExtractor<S, C>
where
    S: ScreenSource,
    C: Clipboard,
{
    pub fn new(source: S, clipboard: C, config: ExtractorConfig) -> Self {
        let config = config.validated();
        let filter = TextFilter::with_extra_labels(config.filter.extra_blocked_labels.iter().cloned());
        let reconstructor = LineReconstructor::new(config.layout.line_tolerance);
        Self {
            source,
            clipboard,
            config,
            filter,
            reconstructor,
        }
    }

    /// The effective configuration, after clamping.
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract all text reachable on screen.
    ///
    /// Cancelling `cancel` stops at the next action or wait; text gathered
    /// up to that point is returned with `cancelled` set. A run cancelled
    /// before any text was gathered yields `ExtractionOutcome::Cancelled`.
    pub async fn extract_full_screen_text(&self, cancel: &CancellationToken) -> ExtractionOutcome {
        info!("Starting screen text extraction");
        let pacer = Pacer::new(cancel.clone());

        if self.config.general.selection_fast_path {
            let fast_path = SelectionFastPath::new(
                &self.source,
                &self.clipboard,
                &self.config.selection,
                pacer.clone(),
            );
            if let Some(content) = fast_path.extract().await {
                return ExtractionOutcome::from_content(content);
            }
            debug!("Falling back to scroll collection");
        }

        if pacer.is_cancelled() {
            info!("Extraction cancelled before scroll collection");
            let mut content = ExtractedContent::new(String::new(), ExtractionMethod::SinglePass);
            content.cancelled = true;
            return ExtractionOutcome::from_content(content);
        }

        let mut collector = ScrollCollector::new(
            &self.source,
            &self.filter,
            self.reconstructor,
            &self.config.scroll,
            pacer,
        );
        let outcome = ExtractionOutcome::from_content(collector.collect().await);
        if !outcome.is_found() {
            info!("No text found on screen");
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeAction;
    use crate::simulated::{NodeSpec, ScreenFixture, SimulatedClipboard, SimulatedScreen, WindowFixture};
    use crate::types::{Rect, WindowKind};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn extractor(
        screen: &SimulatedScreen,
        config: ExtractorConfig,
    ) -> ScreenTextExtractor<SimulatedScreen, Arc<SimulatedClipboard>> {
        ScreenTextExtractor::new(screen.clone(), screen.clipboard(), config)
    }

    fn feed() -> SimulatedScreen {
        SimulatedScreen::from_line_pages(&[
            vec!["Inbox".to_string(), "Message one".to_string()],
            vec!["Message one".to_string(), "Message two".to_string()],
        ])
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_tree_is_no_text_found() {
        let screen = SimulatedScreen::from_pages(vec![NodeSpec::default()]);
        let outcome = extractor(&screen, ExtractorConfig::default())
            .extract_full_screen_text(&CancellationToken::new())
            .await;
        assert_eq!(outcome, ExtractionOutcome::NoTextFound);
    }

    #[tokio::test(start_paused = true)]
    async fn test_falls_back_to_scroll_collection() {
        let screen = feed();
        let outcome = extractor(&screen, ExtractorConfig::default())
            .extract_full_screen_text(&CancellationToken::new())
            .await;

        let content = outcome.content().unwrap();
        assert_eq!(content.content, "Inbox\nMessage one\nMessage two");
        assert_eq!(content.extraction_method, ExtractionMethod::Scroll);
        assert_eq!(screen.position(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fast_path_wins_when_available() {
        let screen = SimulatedScreen::from_pages(vec![NodeSpec::group(
            Rect::new(0, 0, 1000, 500),
            vec![NodeSpec::text("Visible part", Rect::new(0, 0, 40, 500))],
        )
        .scrollable()
        .range_selectable()
        .with_selection_text("Visible part\nand the rest")]);

        let outcome = extractor(&screen, ExtractorConfig::default())
            .extract_full_screen_text(&CancellationToken::new())
            .await;
        let content = outcome.content().unwrap();
        assert_eq!(content.extraction_method, ExtractionMethod::Selection);
        assert_eq!(content.content, "Visible part\nand the rest");
        assert!(!screen
            .actions()
            .iter()
            .any(|r| r.action == NodeAction::ScrollForward));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fast_path_disabled_by_config() {
        let screen = SimulatedScreen::from_pages(vec![NodeSpec::group(
            Rect::new(0, 0, 1000, 500),
            vec![NodeSpec::text("Visible part", Rect::new(0, 0, 40, 500))],
        )
        .range_selectable()
        .with_selection_text("Copied")]);

        let mut config = ExtractorConfig::default();
        config.general.selection_fast_path = false;
        let outcome = extractor(&screen, config)
            .extract_full_screen_text(&CancellationToken::new())
            .await;
        let content = outcome.content().unwrap();
        assert_eq!(content.extraction_method, ExtractionMethod::SinglePass);
        assert_eq!(content.content, "Visible part");
    }

    #[tokio::test(start_paused = true)]
    async fn test_extra_blocked_labels_from_config() {
        let screen = SimulatedScreen::from_pages(vec![NodeSpec::group(
            Rect::new(0, 0, 1000, 500),
            vec![
                NodeSpec::text("Post", Rect::new(0, 0, 40, 500)),
                NodeSpec::description("Share", Rect::new(50, 0, 90, 100)),
                NodeSpec::description("Back", Rect::new(100, 0, 140, 100)),
            ],
        )]);

        let mut config = ExtractorConfig::default();
        config.filter.extra_blocked_labels = vec!["Share".to_string()];
        let outcome = extractor(&screen, config)
            .extract_full_screen_text(&CancellationToken::new())
            .await;
        assert_eq!(outcome.text(), "Post");
    }

    #[tokio::test(start_paused = true)]
    async fn test_topmost_window_read_first() {
        let screen = SimulatedScreen::from_fixture(ScreenFixture {
            pages: vec![vec![
                WindowFixture {
                    kind: WindowKind::Application,
                    layer: 0,
                    root: NodeSpec::text("Behind", Rect::new(0, 0, 40, 500)),
                },
                WindowFixture {
                    kind: WindowKind::System,
                    layer: 9,
                    root: NodeSpec::text("12:00", Rect::new(0, 0, 20, 100)),
                },
                WindowFixture {
                    kind: WindowKind::Application,
                    layer: 2,
                    root: NodeSpec::text("Dialog", Rect::new(0, 0, 40, 500)),
                },
            ]],
            ..ScreenFixture::default()
        })
        .unwrap();

        let outcome = extractor(&screen, ExtractorConfig::default())
            .extract_full_screen_text(&CancellationToken::new())
            .await;
        // Same position: window order breaks the reading-order tie
        assert_eq!(outcome.text(), "Dialog Behind");
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_before_start_is_reported_as_cancelled() {
        let screen = feed();
        let token = CancellationToken::new();
        token.cancel();

        let outcome = extractor(&screen, ExtractorConfig::default())
            .extract_full_screen_text(&token)
            .await;
        assert_eq!(outcome, ExtractionOutcome::Cancelled);
        assert!(outcome.is_cancelled());
        assert!(!outcome.is_found());
        assert!(screen.actions().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_with_fast_path_disabled_is_cancelled() {
        let screen = feed();
        let token = CancellationToken::new();
        token.cancel();

        let mut config = ExtractorConfig::default();
        config.general.selection_fast_path = false;
        let outcome = extractor(&screen, config).extract_full_screen_text(&token).await;
        assert_eq!(outcome, ExtractionOutcome::Cancelled);
    }

    #[test]
    fn test_config_is_clamped_on_construction() {
        let screen = feed();
        let mut config = ExtractorConfig::default();
        config.scroll.max_scroll_attempts = 0;
        config.layout.line_tolerance = -4;

        let extractor = extractor(&screen, config);
        assert_eq!(extractor.config().scroll.max_scroll_attempts, 1);
        assert_eq!(extractor.config().layout.line_tolerance, 0);
        assert_eq!(extractor.reconstructor.tolerance(), 0);
    }
}
