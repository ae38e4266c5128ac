use std::time::Duration;

use unicode_segmentation::UnicodeSegmentation;

use crate::shared::types::SelectionSnapshot;
use crate::system::HostDocument;

/// Outcome of a debounced selection evaluation
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionChange {
    Acquired(SelectionSnapshot),
    Lost,
}

/// Debounces raw pointer/key release events into selection changes.
///
/// Every raw event supersedes the previous one; only the token returned by the
/// most recent [`SelectionMonitor::on_raw_event`] is evaluated once its quiet
/// period elapses. Stale tokens evaluate to `None` without touching the host.
#[derive(Debug)]
pub struct SelectionMonitor {
    latest: u64,
    quiet_period: Duration,
}

impl SelectionMonitor {
    pub fn new(quiet_period: Duration) -> Self {
        Self { latest: 0, quiet_period }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Restart the quiet period; returns the token to report back when it elapses
    pub fn on_raw_event(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn evaluate<H>(&self, token: u64, host: &H) -> Option<SelectionChange>
    where
        H: HostDocument + ?Sized,
    {
        if token != self.latest {
            return None;
        }

        let change = match host.current_selection().and_then(SelectionSnapshot::from_raw) {
            Some(snapshot) => {
                tracing::debug!(text = %preview(snapshot.text(), 20), "[SelectionMonitor] Selection acquired");
                SelectionChange::Acquired(snapshot)
            }
            None => {
                tracing::debug!("[SelectionMonitor] Selection empty");
                SelectionChange::Lost
            }
        };
        Some(change)
    }
}

/// First `max` graphemes of `text`, with an ellipsis when truncated
pub(crate) fn preview(text: &str, max: usize) -> String {
    let mut graphemes = text.graphemes(true);
    let head: String = graphemes.by_ref().take(max).collect();
    if graphemes.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
