use serde::Serialize;

use crate::shared::types::{PanelContent, PanelFunction, PanelId, RangeHandle, SelectionSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Visibility {
    Hidden,
    Appearing,
    Visible,
    Disappearing,
}

impl Visibility {
    /// Appearing or Visible: the states hide triggers act on
    pub fn is_showing(&self) -> bool {
        matches!(self, Visibility::Appearing | Visibility::Visible)
    }
}

/// Where a dispatch's result is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderTarget {
    /// The whole content area
    Content,
    /// Only the translate result sub-region
    TranslationRegion,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InFlight {
    pub generation: u64,
    pub function: PanelFunction,
    pub target: RenderTarget,
    /// Selection text the dispatch was started for
    pub selected_text: String,
    /// Document range of that selection, when the dispatch started from one
    pub range: Option<RangeHandle>,
}

/// Point-in-time view of the controller, for hosts and tests
#[derive(Debug, Clone, PartialEq)]
pub struct PanelStatus {
    pub visibility: Visibility,
    pub processing: bool,
    pub active_function: Option<PanelFunction>,
    pub generation: u64,
    pub panel: Option<PanelId>,
    pub content: PanelContent,
}

/// The single panel state machine instance, owned by the controller.
///
/// `processing` is derived: true exactly while a dispatch generation is in
/// flight. Hides are identified by tokens so a superseded or cancelled timer
/// is recognised when it fires.
#[derive(Debug)]
pub struct PanelState {
    visibility: Visibility,
    panel: Option<PanelId>,
    snapshot: Option<SelectionSnapshot>,
    active_function: Option<PanelFunction>,
    content: PanelContent,
    /// Range a shown polish draft replaces
    replace_target: Option<RangeHandle>,
    generation: u64,
    in_flight: Option<InFlight>,
    hide_seq: u64,
    pending_hide: Option<u64>,
}

impl PanelState {
    pub fn new() -> Self {
        Self {
            visibility: Visibility::Hidden,
            panel: None,
            snapshot: None,
            active_function: None,
            content: PanelContent::Empty,
            replace_target: None,
            generation: 0,
            in_flight: None,
            hide_seq: 0,
            pending_hide: None,
        }
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn set_visibility(&mut self, visibility: Visibility) {
        if self.visibility != visibility {
            tracing::debug!(from = ?self.visibility, to = ?visibility, "[PanelState] Transition");
            self.visibility = visibility;
        }
    }

    pub fn panel(&self) -> Option<PanelId> {
        self.panel
    }

    /// Install a freshly mounted panel; returns the previous one for teardown
    pub fn attach_panel(&mut self, panel: PanelId) -> Option<PanelId> {
        self.active_function = None;
        self.set_content(PanelContent::Empty);
        self.panel.replace(panel)
    }

    /// Forget the panel after it was detached; the state returns to Hidden
    pub fn release_panel(&mut self) -> Option<PanelId> {
        self.set_visibility(Visibility::Hidden);
        self.active_function = None;
        self.set_content(PanelContent::Empty);
        self.pending_hide = None;
        self.panel.take()
    }

    pub fn snapshot(&self) -> Option<&SelectionSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn set_snapshot(&mut self, snapshot: SelectionSnapshot) {
        self.snapshot = Some(snapshot);
    }

    pub fn clear_snapshot(&mut self) {
        self.snapshot = None;
    }

    pub fn content(&self) -> &PanelContent {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut PanelContent {
        &mut self.content
    }

    /// Any content swap forgets the replace target
    pub fn set_content(&mut self, content: PanelContent) {
        self.content = content;
        self.replace_target = None;
    }

    pub fn replace_target(&self) -> Option<RangeHandle> {
        self.replace_target
    }

    pub fn set_replace_target(&mut self, range: Option<RangeHandle>) {
        self.replace_target = range;
    }

    pub fn active_function(&self) -> Option<PanelFunction> {
        self.active_function
    }

    pub fn is_processing(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight(&self) -> Option<&InFlight> {
        self.in_flight.as_ref()
    }

    /// Start a new generation. Any pending hide is cancelled and any earlier
    /// in-flight generation is superseded: its completion will be discarded.
    pub fn begin_dispatch(
        &mut self,
        function: PanelFunction,
        target: RenderTarget,
        selected_text: &str,
        range: Option<RangeHandle>,
    ) -> u64 {
        self.cancel_hide();
        self.generation += 1;
        if let Some(previous) = &self.in_flight {
            tracing::debug!(
                superseded = previous.generation,
                by = self.generation,
                "[PanelState] Dispatch superseded"
            );
        }
        self.active_function = Some(function);
        self.in_flight = Some(InFlight {
            generation: self.generation,
            function,
            target,
            selected_text: selected_text.to_string(),
            range,
        });
        self.generation
    }

    /// Release the processing guard if `generation` is the one in flight
    pub fn settle(&mut self, generation: u64) -> Option<InFlight> {
        match &self.in_flight {
            Some(current) if current.generation == generation => self.in_flight.take(),
            _ => None,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Register a new pending hide, superseding any earlier one
    pub fn schedule_hide(&mut self) -> u64 {
        self.hide_seq += 1;
        self.pending_hide = Some(self.hide_seq);
        self.hide_seq
    }

    /// Consume the pending hide if `token` is still the current one
    pub fn take_hide(&mut self, token: u64) -> bool {
        if self.pending_hide == Some(token) {
            self.pending_hide = None;
            true
        } else {
            false
        }
    }

    pub fn cancel_hide(&mut self) {
        self.pending_hide = None;
    }

    pub fn status(&self) -> PanelStatus {
        PanelStatus {
            visibility: self.visibility,
            processing: self.is_processing(),
            active_function: self.active_function,
            generation: self.generation,
            panel: self.panel,
            content: self.content.clone(),
        }
    }
}

impl Default for PanelState {
    fn default() -> Self {
        Self::new()
    }
}
