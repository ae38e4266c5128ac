use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;

use super::position::compute_position;
use super::state::{PanelState, PanelStatus, Visibility};
use super::watcher;
use crate::engine::features::DispatchContext;
use crate::engine::selection::{SelectionChange, SelectionMonitor};
use crate::shared::events::PanelEvent;
use crate::shared::settings::PanelTimings;
use crate::shared::types::{ClickTarget, Key, PanelId, Presentation, SelectionSnapshot};
use crate::system::HostDocument;

/// Owns the panel state machine and reacts to one [`PanelEvent`] at a time.
///
/// All mutation happens inside [`PanelController::handle`]. Timers and remote
/// requests run as spawned tasks that only post events back through `events`,
/// so there is never more than one writer.
pub struct PanelController<H: HostDocument> {
    pub(super) host: Arc<H>,
    pub(super) ctx: Arc<DispatchContext>,
    pub(super) timings: PanelTimings,
    pub(super) monitor: SelectionMonitor,
    pub(super) state: PanelState,
    pub(super) events: UnboundedSender<PanelEvent>,
}

impl<H: HostDocument> PanelController<H> {
    pub fn new(
        host: Arc<H>,
        ctx: Arc<DispatchContext>,
        timings: PanelTimings,
        events: UnboundedSender<PanelEvent>,
    ) -> Self {
        Self {
            host,
            ctx,
            monitor: SelectionMonitor::new(timings.debounce),
            timings,
            state: PanelState::new(),
            events,
        }
    }

    pub fn status(&self) -> PanelStatus {
        self.state.status()
    }

    /// Apply one event. Returns `false` once the controller has shut down.
    pub fn handle(&mut self, event: PanelEvent) -> bool {
        match event {
            PanelEvent::RawSelection => {
                let token = self.monitor.on_raw_event();
                self.schedule(self.monitor.quiet_period(), PanelEvent::DebounceElapsed(token));
            }
            PanelEvent::DebounceElapsed(token) => match self.monitor.evaluate(token, self.host.as_ref()) {
                Some(SelectionChange::Acquired(snapshot)) => self.on_selection_acquired(snapshot),
                Some(SelectionChange::Lost) => self.on_selection_lost(),
                None => {}
            },
            PanelEvent::DocumentClick(target) => self.on_document_click(target),
            PanelEvent::KeyDown(Key::Escape) => self.request_hide("escape"),
            PanelEvent::KeyDown(Key::Other(_)) => {}
            PanelEvent::Activate(function) => self.activate(function),
            PanelEvent::ConfirmTranslation(language) => self.confirm_translation(language),
            PanelEvent::Polish(control) => self.on_polish_control(control),
            PanelEvent::PresentationChanged(panel) => self.on_presentation_changed(panel),
            PanelEvent::Status(reply) => {
                let _ = reply.send(self.status());
            }
            PanelEvent::Shutdown => {
                self.teardown();
                return false;
            }
            PanelEvent::EntryElapsed { panel } => self.on_entry_elapsed(panel),
            PanelEvent::DeferredHideElapsed(token) => {
                if self.state.take_hide(token) {
                    self.request_hide("deferred");
                }
            }
            PanelEvent::HideElapsed(token) => self.on_hide_elapsed(token),
            PanelEvent::WatchdogElapsed(generation) => self.on_watchdog(generation),
            PanelEvent::DispatchSettled(settlement) => self.on_settled(settlement),
        }
        true
    }

    /// Post `event` back to this controller after `delay`
    pub(super) fn schedule(&self, delay: Duration, event: PanelEvent) {
        let events = self.events.clone();
        // Deadline is fixed now, not when the task is first polled
        let timer = tokio::time::sleep(delay);
        tokio::spawn(async move {
            timer.await;
            // Receiver gone means the controller shut down; nothing to deliver to
            let _ = events.send(event);
        });
    }

    fn on_selection_acquired(&mut self, snapshot: SelectionSnapshot) {
        self.state.set_snapshot(snapshot);
        match self.state.visibility() {
            Visibility::Hidden => self.show_panel(),
            Visibility::Appearing | Visibility::Visible => self.reposition(),
            Visibility::Disappearing => {
                // A new selection arrived during the exit delay: keep the panel
                self.state.cancel_hide();
                self.present(Presentation::VISIBLE);
                self.state.set_visibility(Visibility::Visible);
                self.reposition();
            }
        }
    }

    fn on_selection_lost(&mut self) {
        if self.state.is_processing() {
            tracing::debug!("[PanelController] Selection lost while processing, keeping panel");
            return;
        }
        self.state.clear_snapshot();
        self.request_hide("selection lost");
    }

    fn on_document_click(&mut self, target: ClickTarget) {
        if !target.is_outside() || !self.state.visibility().is_showing() || self.state.is_processing() {
            return;
        }
        let token = self.state.schedule_hide();
        self.schedule(self.timings.outside_click_delay, PanelEvent::DeferredHideElapsed(token));
    }

    /// Mount a fresh panel and start the entry animation
    pub(super) fn show_panel(&mut self) {
        let panel = self.host.mount_panel();
        if let Some(previous) = self.state.attach_panel(panel) {
            self.host.detach_panel(previous);
        }
        tracing::debug!(panel = %panel.0, "[PanelController] Panel mounted");

        self.present(Presentation::ENTERING);
        self.state.set_visibility(Visibility::Appearing);
        self.reposition();
        self.schedule(self.timings.entry_animation, PanelEvent::EntryElapsed { panel });
    }

    fn on_entry_elapsed(&mut self, panel: PanelId) {
        if self.state.panel() != Some(panel) || self.state.visibility() != Visibility::Appearing {
            return;
        }
        self.present(Presentation::VISIBLE);
        self.state.set_visibility(Visibility::Visible);
    }

    /// Bring a leaving or detached panel back on screen. Called before every
    /// dispatch, which also drops the pending exit timer.
    pub(super) fn ensure_visible(&mut self) {
        match self.state.visibility() {
            Visibility::Hidden => self.show_panel(),
            Visibility::Disappearing => {
                self.present(Presentation::VISIBLE);
                self.state.set_visibility(Visibility::Visible);
            }
            Visibility::Appearing | Visibility::Visible => {}
        }
    }

    /// Start the exit animation unless a dispatch is in flight
    pub(super) fn request_hide(&mut self, reason: &'static str) {
        if self.state.is_processing() {
            tracing::debug!(reason, "[PanelController] Hide ignored while processing");
            return;
        }
        if !self.state.visibility().is_showing() {
            return;
        }

        tracing::debug!(reason, "[PanelController] Hiding panel");
        self.present(Presentation::LEAVING);
        self.state.set_visibility(Visibility::Disappearing);
        let token = self.state.schedule_hide();
        self.schedule(self.timings.exit_delay, PanelEvent::HideElapsed(token));
    }

    fn on_hide_elapsed(&mut self, token: u64) {
        if !self.state.take_hide(token) || self.state.visibility() != Visibility::Disappearing {
            return;
        }
        if let Some(panel) = self.state.release_panel() {
            self.host.detach_panel(panel);
        }
    }

    fn on_presentation_changed(&mut self, panel: PanelId) {
        if self.state.panel() != Some(panel) {
            return;
        }
        let observed = self.host.presentation(panel);
        if let Some(corrected) = watcher::reconcile(self.state.visibility(), observed) {
            tracing::warn!(
                visibility = ?self.state.visibility(),
                "[PanelController] Panel hidden externally, restoring presentation"
            );
            self.host.set_presentation(panel, corrected);
        }
    }

    /// Recompute the position from the live panel size
    pub(super) fn reposition(&self) {
        let (Some(panel), Some(snapshot)) = (self.state.panel(), self.state.snapshot()) else {
            return;
        };
        let viewport = self.host.viewport();
        let position = compute_position(
            &snapshot.anchor,
            self.host.panel_size(panel),
            viewport.size(),
            viewport.scroll,
        );
        self.host.set_position(panel, position);
    }

    fn present(&self, presentation: Presentation) {
        if let Some(panel) = self.state.panel() {
            self.host.set_presentation(panel, presentation);
        }
    }

    fn teardown(&mut self) {
        if let Some(panel) = self.state.release_panel() {
            self.host.detach_panel(panel);
        }
        tracing::info!("[PanelController] Shut down");
    }
}
