use tokio::sync::oneshot;

use super::error::AppResult;
use super::types::{ClickTarget, Key, PanelFunction, PanelId, PolishControl, TargetLanguage};
use crate::engine::features::FunctionOutput;
use crate::engine::panel::state::PanelStatus;

/// Everything the controller task reacts to.
///
/// Host input arrives through [`crate::runtime::AssistantHandle`]; timer and
/// request completions are posted back by tasks the controller spawned.
#[derive(Debug)]
pub enum PanelEvent {
    /// Pointer release or key release anywhere in the document
    RawSelection,
    DocumentClick(ClickTarget),
    KeyDown(Key),
    /// A function button (or retry affordance) was activated
    Activate(PanelFunction),
    ConfirmTranslation(TargetLanguage),
    Polish(PolishControl),
    /// The host's attribute observer saw the panel's presentation change
    PresentationChanged(PanelId),
    Status(oneshot::Sender<PanelStatus>),
    Shutdown,

    DebounceElapsed(u64),
    EntryElapsed { panel: PanelId },
    /// Outside-click or post-speech delay before a hide is requested
    DeferredHideElapsed(u64),
    /// Exit animation finished
    HideElapsed(u64),
    WatchdogElapsed(u64),
    DispatchSettled(Settlement),
}

/// Completion of one dispatch generation
#[derive(Debug)]
pub struct Settlement {
    pub generation: u64,
    pub panel: PanelId,
    pub function: PanelFunction,
    pub outcome: AppResult<FunctionOutput>,
}
