//! Floating line-count overlay
//!
//! Lifecycle: `Pending → Populated → Fading → Removed`. The element is
//! mounted hidden, becomes visible after the fade-in delay, takes its final
//! text when the count arrives, and leaves once the display window is over.

pub mod surface;

pub use surface::{OverlaySurface, RecordingSurface};

use crate::client::LineCountOutcome;
use crate::page::Timings;
use crate::utils::format_grouped;
use std::future::Future;
use tokio::time::{sleep, sleep_until, Instant};
use tracing::debug;

pub const LOADING_TEXT: &str = "正在统计代码行数...";
pub const UNCONFIGURED_TEXT: &str = "请先配置服务器地址";
pub const CONNECTION_FAILED_TEXT: &str = "服务器连接失败";

/// `代码总行数: 12,345 行`
pub fn line_count_text(lines: u64) -> String {
    format!("代码总行数: {} 行", format_grouped(lines))
}

/// Final overlay text for an outcome
pub fn outcome_text(outcome: &LineCountOutcome) -> String {
    match outcome {
        LineCountOutcome::Counted(report) => line_count_text(report.lines),
        LineCountOutcome::Unconfigured => UNCONFIGURED_TEXT.to_string(),
        LineCountOutcome::Unavailable => CONNECTION_FAILED_TEXT.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum OverlayState {
    Pending,
    Populated,
    Fading,
    Removed,
}

impl OverlayState {
    fn can_advance_to(self, next: OverlayState) -> bool {
        matches!(
            (self, next),
            (OverlayState::Pending, OverlayState::Populated)
                | (OverlayState::Populated, OverlayState::Fading)
                | (OverlayState::Fading, OverlayState::Removed)
        )
    }
}

/// Snapshot of the overlay handed to a surface on every change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayFrame {
    pub state: OverlayState,
    pub text: String,
    pub visible: bool,
}

impl OverlayFrame {
    /// Markup of the injected element
    pub fn to_html(&self) -> String {
        let (opacity, offset) = if self.visible { (1, 0) } else { (0, -20) };
        format!(
            concat!(
                r#"<div id="code-line-display" style="position: fixed; top: 80px; left: 20px; "#,
                r#"z-index: 10000; opacity: {}; transform: translateX({}px); transition: all 0.3s ease;">"#,
                r#"<span id="line-count-text">{}</span></div>"#
            ),
            opacity,
            offset,
            html_escape(&self.text)
        )
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Drives one overlay instance on a surface
pub struct Overlay<'a> {
    surface: &'a mut dyn OverlaySurface,
    timings: Timings,
    frame: OverlayFrame,
}

impl<'a> Overlay<'a> {
    /// Create the element in its hidden pending state
    pub fn mount(surface: &'a mut dyn OverlaySurface, timings: Timings) -> Self {
        let frame = OverlayFrame {
            state: OverlayState::Pending,
            text: LOADING_TEXT.to_string(),
            visible: false,
        };
        surface.render(&frame);

        Self {
            surface,
            timings,
            frame,
        }
    }

    pub fn state(&self) -> OverlayState {
        self.frame.state
    }

    pub fn text(&self) -> &str {
        &self.frame.text
    }

    pub fn show(&mut self) {
        if self.frame.visible || self.frame.state >= OverlayState::Fading {
            return;
        }
        self.frame.visible = true;
        self.surface.render(&self.frame);
    }

    /// Replace the loading text with the final result
    pub fn populate(&mut self, text: impl Into<String>) -> bool {
        if !self.advance(OverlayState::Populated) {
            return false;
        }
        self.frame.text = text.into();
        self.surface.render(&self.frame);
        true
    }

    /// Keep the result up for the display window, then fade and remove
    pub async fn dismiss(&mut self) {
        self.dismiss_at(Instant::now() + self.timings.display_window).await;
    }

    async fn dismiss_at(&mut self, display_until: Instant) {
        sleep_until(display_until).await;
        if self.advance(OverlayState::Fading) {
            self.frame.visible = false;
            self.surface.render(&self.frame);
        }

        sleep(self.timings.fade_duration).await;
        if self.advance(OverlayState::Removed) {
            self.surface.render(&self.frame);
        }
    }

    /// Full lifecycle around a pending line-count result.
    ///
    /// The text is replaced as soon as the result arrives, whether or not the
    /// fade-in has happened yet, and the display window starts from there.
    pub async fn present<F>(surface: &'a mut dyn OverlaySurface, timings: Timings, outcome: F) -> LineCountOutcome
    where
        F: Future<Output = LineCountOutcome>,
    {
        let mut overlay = Overlay::mount(surface, timings);
        let fade_in = sleep(timings.fade_in_delay);
        tokio::pin!(fade_in, outcome);

        let outcome = tokio::select! {
            biased;
            () = &mut fade_in => {
                overlay.show();
                outcome.await
            }
            outcome = &mut outcome => outcome,
        };

        overlay.populate(outcome_text(&outcome));
        let display_until = Instant::now() + timings.display_window;

        if !overlay.frame.visible {
            fade_in.await;
            overlay.show();
        }
        overlay.dismiss_at(display_until).await;
        outcome
    }

    fn advance(&mut self, next: OverlayState) -> bool {
        if !self.frame.state.can_advance_to(next) {
            debug!(from = ?self.frame.state, to = ?next, "ignoring overlay transition");
            return false;
        }
        self.frame.state = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::LineCountReport;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;
    use std::time::Duration;

    fn counted(lines: u64) -> LineCountOutcome {
        LineCountOutcome::Counted(LineCountReport {
            lines,
            success: Some(true),
            error: None,
            repo_url: None,
            owner: None,
            repo: None,
            file_stats: BTreeMap::new(),
            timestamp: None,
        })
    }

    #[test]
    fn test_texts() {
        assert_eq!(line_count_text(12345), "代码总行数: 12,345 行");
        assert_eq!(outcome_text(&counted(7)), "代码总行数: 7 行");
        assert_eq!(outcome_text(&LineCountOutcome::Unconfigured), UNCONFIGURED_TEXT);
        assert_eq!(outcome_text(&LineCountOutcome::Unavailable), CONNECTION_FAILED_TEXT);
    }

    #[tokio::test]
    async fn test_lifecycle_frames() {
        let mut surface = RecordingSurface::default();
        Overlay::present(&mut surface, Timings::immediate(), async { counted(12345) }).await;

        let mut states: Vec<_> = surface.frames.iter().map(|f| f.state).collect();
        states.dedup();
        assert_eq!(
            states,
            vec![
                OverlayState::Pending,
                OverlayState::Populated,
                OverlayState::Fading,
                OverlayState::Removed,
            ]
        );
        assert!(!surface.frames[0].visible);
        assert!(surface
            .frames
            .iter()
            .any(|f| f.visible && f.state < OverlayState::Fading));
        assert_eq!(surface.final_text(), Some("代码总行数: 12,345 行"));
        assert!(surface.is_removed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fast_result_is_shown_before_fade_in() {
        let mut surface = RecordingSurface::default();
        let timings = Timings::default();
        let start = Instant::now();

        Overlay::present(&mut surface, timings, async {
            sleep(Duration::from_millis(40)).await;
            counted(3)
        })
        .await;

        let frames: Vec<_> = surface.frames.iter().map(|f| (f.state, f.visible)).collect();
        assert_eq!(
            frames,
            vec![
                (OverlayState::Pending, false),
                (OverlayState::Populated, false),
                (OverlayState::Populated, true),
                (OverlayState::Fading, false),
                (OverlayState::Removed, false),
            ]
        );

        // Display window counts from the arrival of the result, not the fade-in
        let elapsed = start.elapsed();
        let expected = Duration::from_millis(40) + timings.display_window + timings.fade_duration;
        assert!(elapsed >= expected);
        assert!(elapsed < expected + Duration::from_millis(50));
    }

    #[tokio::test(start_paused = true)]
    async fn test_removal_waits_for_display_window() {
        let mut surface = RecordingSurface::default();
        let start = Instant::now();

        Overlay::present(&mut surface, Timings::default(), async {
            sleep(Duration::from_secs(2)).await;
            LineCountOutcome::Unavailable
        })
        .await;

        let timings = Timings::default();
        assert!(start.elapsed() >= Duration::from_secs(2) + timings.display_window + timings.fade_duration);
        assert_eq!(surface.final_text(), Some(CONNECTION_FAILED_TEXT));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_after_manual_populate() {
        let mut surface = RecordingSurface::default();
        let timings = Timings::default();
        let start = Instant::now();

        let mut overlay = Overlay::mount(&mut surface, timings);
        overlay.show();
        overlay.populate(line_count_text(10));
        overlay.dismiss().await;

        assert_eq!(overlay.state(), OverlayState::Removed);
        assert!(start.elapsed() >= timings.display_window + timings.fade_duration);
        assert!(surface.is_removed());
    }

    #[test]
    fn test_out_of_order_transitions_are_ignored() {
        let mut surface = RecordingSurface::default();
        let mut overlay = Overlay::mount(&mut surface, Timings::immediate());

        assert!(!overlay.advance(OverlayState::Removed));
        assert!(overlay.populate("first"));
        assert!(!overlay.populate("second"));
        assert_eq!(overlay.text(), "first");
        assert_eq!(overlay.state(), OverlayState::Populated);
    }

    #[test]
    fn test_frame_markup() {
        let frame = OverlayFrame {
            state: OverlayState::Pending,
            text: LOADING_TEXT.to_string(),
            visible: true,
        };
        let html = frame.to_html();
        assert!(html.contains(r#"id="code-line-display""#));
        assert!(html.contains("opacity: 1"));
        assert!(html.contains(LOADING_TEXT));
    }
}
