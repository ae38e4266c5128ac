//! In-memory fakes shared by the unit tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::sync::Semaphore;

use crate::engine::features::{DispatchContext, TextService};
use crate::engine::panel::{PanelController, PanelStatus};
use crate::engine::speech::{SpeechBridge, SpeechChannel, SpeechRequest};
use crate::shared::error::{AppError, AppResult};
use crate::shared::events::PanelEvent;
use crate::shared::settings::{AssistantConfig, PanelTimings};
use crate::shared::types::{
    PanelContent, PanelId, Position, Presentation, RangeHandle, RawSelection, Rect, ScrollOffsets, Size,
    TranslationRegion, Viewport,
};
use crate::system::HostDocument;

const DEFAULT_RECT: Rect = Rect { left: 100.0, top: 300.0, width: 80.0, height: 20.0 };

#[derive(Debug)]
struct PanelNode {
    presentation: Presentation,
    position: Option<Position>,
    positions_set: usize,
    renders: usize,
    region: Option<TranslationRegion>,
    editor_focus: usize,
    is_editor: bool,
}

#[derive(Debug)]
struct HostState {
    document: String,
    selection: Option<(RangeHandle, Rect)>,
    ranges: HashMap<u64, (usize, usize)>,
    next_range: u64,
    selection_reads: usize,
    viewport: Viewport,
    panel_size: Size,
    panels: HashMap<PanelId, PanelNode>,
    mounted: usize,
    detached: Vec<PanelId>,
    region_broken: bool,
    inserted: Vec<String>,
}

/// A page document with one text node and at most one selection range
pub struct FakeHost {
    state: Mutex<HostState>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(HostState {
                document: String::new(),
                selection: None,
                ranges: HashMap::new(),
                next_range: 0,
                selection_reads: 0,
                viewport: Viewport { width: 1280.0, height: 800.0, scroll: ScrollOffsets::default() },
                panel_size: Size::new(320.0, 100.0),
                panels: HashMap::new(),
                mounted: 0,
                detached: Vec::new(),
                region_broken: false,
                inserted: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HostState> {
        self.state.lock().unwrap()
    }

    /// Replace the document with `text` and select all of it
    pub fn select(&self, text: &str) {
        self.select_at(text, DEFAULT_RECT);
    }

    pub fn select_at(&self, text: &str, rect: Rect) {
        self.select_span(text, 0, text.len(), rect);
    }

    /// Replace the document and select the first occurrence of `text` in it
    pub fn select_in(&self, document: &str, text: &str) {
        let start = document.find(text).unwrap();
        self.select_span(document, start, start + text.len(), DEFAULT_RECT);
    }

    fn select_span(&self, document: &str, start: usize, end: usize, rect: Rect) {
        let mut state = self.lock();
        state.document = document.to_string();
        state.next_range += 1;
        let id = state.next_range;
        state.ranges.insert(id, (start, end));
        state.selection = Some((RangeHandle(id), rect));
    }

    /// Page script swapped the text out; every known range is invalidated
    pub fn rewrite_document(&self, document: &str) {
        let mut state = self.lock();
        state.document = document.to_string();
        state.ranges.clear();
        state.selection = None;
    }

    /// Collapse the selection, as a click elsewhere would
    pub fn clear(&self) {
        self.lock().selection = None;
    }

    pub fn set_panel_size(&self, width: f64, height: f64) {
        self.lock().panel_size = Size::new(width, height);
    }

    /// A page script hides the node behind the controller's back
    pub fn hide_externally(&self, panel: PanelId) {
        if let Some(node) = self.lock().panels.get_mut(&panel) {
            node.presentation = Presentation::HIDDEN;
        }
    }

    /// The translate result container disappears from every panel
    pub fn break_region(&self) {
        let mut state = self.lock();
        state.region_broken = true;
        for node in state.panels.values_mut() {
            node.region = None;
        }
    }

    pub fn selection_reads(&self) -> usize {
        self.lock().selection_reads
    }

    pub fn mounted(&self) -> usize {
        self.lock().mounted
    }

    pub fn detached(&self) -> Vec<PanelId> {
        self.lock().detached.clone()
    }

    pub fn presentation_of(&self, panel: PanelId) -> Option<Presentation> {
        self.lock().panels.get(&panel).map(|n| n.presentation)
    }

    pub fn position_of(&self, panel: PanelId) -> Option<Position> {
        self.lock().panels.get(&panel).and_then(|n| n.position)
    }

    pub fn positions_set(&self, panel: PanelId) -> usize {
        self.lock().panels.get(&panel).map_or(0, |n| n.positions_set)
    }

    pub fn renders(&self, panel: PanelId) -> usize {
        self.lock().panels.get(&panel).map_or(0, |n| n.renders)
    }

    pub fn region(&self, panel: PanelId) -> Option<TranslationRegion> {
        self.lock().panels.get(&panel).and_then(|n| n.region.clone())
    }

    pub fn editor_focus_count(&self, panel: PanelId) -> usize {
        self.lock().panels.get(&panel).map_or(0, |n| n.editor_focus)
    }

    pub fn document(&self) -> String {
        self.lock().document.clone()
    }

    pub fn inserted_nodes(&self) -> Vec<String> {
        self.lock().inserted.clone()
    }

    pub fn current_selection_text(&self) -> Option<String> {
        let state = self.lock();
        let (range, _) = state.selection?;
        let (start, end) = *state.ranges.get(&range.0)?;
        Some(state.document[start..end].to_string())
    }

    fn missing(what: &str) -> AppError {
        AppError::DomUnavailable(format!("{} not found", what))
    }
}

impl HostDocument for FakeHost {
    fn current_selection(&self) -> Option<RawSelection> {
        let mut state = self.lock();
        state.selection_reads += 1;
        let (range, rect) = state.selection?;
        let (start, end) = *state.ranges.get(&range.0)?;
        Some(RawSelection {
            text: state.document[start..end].to_string(),
            rect,
            scroll: state.viewport.scroll,
            range,
        })
    }

    fn viewport(&self) -> Viewport {
        self.lock().viewport
    }

    fn mount_panel(&self) -> PanelId {
        let panel = PanelId::new();
        let mut state = self.lock();
        state.mounted += 1;
        state.panels.insert(panel, PanelNode {
            presentation: Presentation::HIDDEN,
            position: None,
            positions_set: 0,
            renders: 0,
            region: None,
            editor_focus: 0,
            is_editor: false,
        });
        panel
    }

    fn detach_panel(&self, panel: PanelId) {
        let mut state = self.lock();
        state.panels.remove(&panel);
        state.detached.push(panel);
    }

    fn set_presentation(&self, panel: PanelId, presentation: Presentation) {
        if let Some(node) = self.lock().panels.get_mut(&panel) {
            node.presentation = presentation;
        }
    }

    fn presentation(&self, panel: PanelId) -> Option<Presentation> {
        self.presentation_of(panel)
    }

    fn panel_size(&self, panel: PanelId) -> Size {
        let state = self.lock();
        if state.panels.contains_key(&panel) {
            state.panel_size
        } else {
            Size::default()
        }
    }

    fn set_position(&self, panel: PanelId, position: Position) {
        if let Some(node) = self.lock().panels.get_mut(&panel) {
            node.position = Some(position);
            node.positions_set += 1;
        }
    }

    fn render(&self, panel: PanelId, content: &PanelContent) {
        let mut state = self.lock();
        let broken = state.region_broken;
        if let Some(node) = state.panels.get_mut(&panel) {
            node.renders += 1;
            node.is_editor = matches!(content, PanelContent::PolishEditor { .. });
            node.region = match content {
                PanelContent::TranslateChooser { region, .. } if !broken => Some(region.clone()),
                _ => None,
            };
        }
    }

    fn update_translation_region(&self, panel: PanelId, region: &TranslationRegion) -> AppResult<()> {
        let mut state = self.lock();
        let node = state.panels.get_mut(&panel).ok_or_else(|| Self::missing("panel"))?;
        match node.region.as_mut() {
            Some(current) => {
                *current = region.clone();
                Ok(())
            }
            None => Err(Self::missing("translation result container")),
        }
    }

    fn focus_editor(&self, panel: PanelId) -> AppResult<()> {
        let mut state = self.lock();
        match state.panels.get_mut(&panel) {
            Some(node) if node.is_editor => {
                node.editor_focus += 1;
                Ok(())
            }
            _ => Err(Self::missing("polish editor")),
        }
    }

    fn replace_range(&self, range: RangeHandle, text: &str) -> AppResult<()> {
        let mut state = self.lock();
        let (start, end) = *state.ranges.get(&range.0).ok_or_else(|| Self::missing("range"))?;
        state.document.replace_range(start..end, text);
        state.inserted.push(text.to_string());
        state.ranges.clear();
        Ok(())
    }

    fn clear_selection(&self) {
        self.lock().selection = None;
    }
}

type Responder = Box<dyn Fn(&str) -> AppResult<String> + Send + Sync>;

/// Scripted text service; records every prompt before answering
pub struct FakeTextService {
    respond: Responder,
    gate: Option<Semaphore>,
    prompts: Mutex<Vec<String>>,
}

impl FakeTextService {
    pub fn responding<F>(respond: F) -> Self
    where
        F: Fn(&str) -> AppResult<String> + Send + Sync + 'static,
    {
        Self { respond: Box::new(respond), gate: None, prompts: Mutex::new(Vec::new()) }
    }

    pub fn replying(text: &str) -> Self {
        let text = text.to_string();
        Self::responding(move |_| Ok(text.clone()))
    }

    pub fn failing(error: AppError) -> Self {
        Self::responding(move |_| Err(error.clone()))
    }

    /// Hold every request until [`FakeTextService::release`]
    pub fn gated(mut self) -> Self {
        self.gate = Some(Semaphore::new(0));
        self
    }

    /// Open the gate for all current and future requests
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextService for FakeTextService {
    async fn complete(&self, prompt: &str) -> AppResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if let Some(gate) = &self.gate {
            // The permit goes back on drop, so one release lets everyone through
            let _permit = gate.acquire().await;
        }
        (self.respond)(prompt)
    }
}

pub struct FakeSpeech {
    name: &'static str,
    broken: bool,
    spoken: Mutex<Vec<SpeechRequest>>,
    controls: Mutex<Vec<&'static str>>,
}

impl FakeSpeech {
    pub fn working(name: &'static str) -> Self {
        Self { name, broken: false, spoken: Mutex::new(Vec::new()), controls: Mutex::new(Vec::new()) }
    }

    pub fn failing(name: &'static str) -> Self {
        Self { broken: true, ..Self::working(name) }
    }

    pub fn spoken(&self) -> Vec<SpeechRequest> {
        self.spoken.lock().unwrap().clone()
    }

    pub fn controls(&self) -> Vec<&'static str> {
        self.controls.lock().unwrap().clone()
    }

    fn outcome(&self) -> AppResult<()> {
        if self.broken {
            Err(AppError::SpeechUnavailable(format!("{} channel unavailable", self.name)))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl SpeechChannel for FakeSpeech {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn speak(&self, request: &SpeechRequest) -> AppResult<()> {
        self.outcome()?;
        self.spoken.lock().unwrap().push(request.clone());
        Ok(())
    }

    async fn pause(&self) -> AppResult<()> {
        self.outcome()?;
        self.controls.lock().unwrap().push("pause");
        Ok(())
    }

    async fn stop(&self) -> AppResult<()> {
        self.outcome()?;
        self.controls.lock().unwrap().push("stop");
        Ok(())
    }
}

pub fn context_with(
    api_key: &str,
    text_service: Arc<dyn TextService>,
    host_speech: Arc<dyn SpeechChannel>,
    local_speech: Option<Arc<dyn SpeechChannel>>,
) -> DispatchContext {
    DispatchContext {
        config: AssistantConfig { api_key: api_key.to_string(), ..Default::default() },
        text_service,
        speech: SpeechBridge::new(host_speech, local_speech),
    }
}

/// A controller driven by hand on a paused clock
pub struct Harness {
    pub host: Arc<FakeHost>,
    pub service: Arc<FakeTextService>,
    pub controller: PanelController<FakeHost>,
    events: UnboundedReceiver<PanelEvent>,
}

impl Harness {
    pub fn new(api_key: &str) -> Self {
        Self::with_service(api_key, FakeTextService::replying("result"))
    }

    pub fn gated(api_key: &str) -> Self {
        Self::with_service(api_key, FakeTextService::replying("result").gated())
    }

    pub fn with_service(api_key: &str, service: FakeTextService) -> Self {
        Self::build(api_key, service, Arc::new(FakeSpeech::working("host")), None)
    }

    pub fn with_speech(api_key: &str, host_speech: Arc<FakeSpeech>, local_speech: Option<Arc<FakeSpeech>>) -> Self {
        Self::build(api_key, FakeTextService::replying("result"), host_speech, local_speech)
    }

    fn build(
        api_key: &str,
        service: FakeTextService,
        host_speech: Arc<FakeSpeech>,
        local_speech: Option<Arc<FakeSpeech>>,
    ) -> Self {
        let host = Arc::new(FakeHost::new());
        let service = Arc::new(service);
        let local_speech = local_speech.map(|s| s as Arc<dyn SpeechChannel>);
        let ctx = Arc::new(context_with(api_key, service.clone(), host_speech, local_speech));
        let (tx, events) = mpsc::unbounded_channel();
        let controller = PanelController::new(host.clone(), ctx, PanelTimings::default(), tx);
        Self { host, service, controller, events }
    }

    pub fn send(&mut self, event: PanelEvent) {
        self.controller.handle(event);
    }

    pub fn status(&self) -> PanelStatus {
        self.controller.status()
    }

    /// Let spawned tasks run and apply whatever they posted back
    pub async fn settle(&mut self) {
        for _ in 0..8 {
            tokio::task::yield_now().await;
            while let Ok(event) = self.events.try_recv() {
                self.controller.handle(event);
            }
        }
    }

    pub async fn advance(&mut self, ms: u64) {
        self.settle().await;
        tokio::time::advance(Duration::from_millis(ms)).await;
        self.settle().await;
    }

    /// Evaluate the current selection and finish the entry animation
    pub async fn show_panel(&mut self) {
        self.send(PanelEvent::RawSelection);
        self.advance(300).await;
        self.advance(10).await;
    }
}
