//! Controller task and the handle hosts talk to
//!
//! One tokio task owns the [`PanelController`] and applies events in arrival
//! order. Host input, timers and request completions all funnel through the
//! same unbounded channel.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::engine::features::{CompletionClient, DispatchContext, TextService};
use crate::engine::panel::{PanelController, PanelStatus};
use crate::engine::speech::{SpeechBridge, SpeechChannel};
use crate::shared::error::{AppError, AppResult};
use crate::shared::events::PanelEvent;
use crate::shared::settings::{AssistantConfig, PanelTimings};
use crate::shared::types::{ClickTarget, Key, PanelFunction, PanelId, PolishControl, TargetLanguage};
use crate::system::HostDocument;

/// External capabilities the functions call into
pub struct AssistantServices {
    pub text_service: Arc<dyn TextService>,
    pub host_speech: Arc<dyn SpeechChannel>,
    pub local_speech: Option<Arc<dyn SpeechChannel>>,
}

impl AssistantServices {
    /// Real completion client for `config`, plus the given speech channels
    pub fn with_completion_client(
        config: &AssistantConfig,
        host_speech: Arc<dyn SpeechChannel>,
        local_speech: Option<Arc<dyn SpeechChannel>>,
    ) -> AppResult<Self> {
        Ok(Self {
            text_service: Arc::new(CompletionClient::new(config)?),
            host_speech,
            local_speech,
        })
    }
}

/// Start the controller task with timings derived from `config`
pub fn spawn_assistant<H: HostDocument>(
    config: AssistantConfig,
    host: Arc<H>,
    services: AssistantServices,
) -> AssistantHandle {
    let timings = PanelTimings::for_config(&config);
    spawn_with_timings(config, host, services, timings)
}

pub fn spawn_with_timings<H: HostDocument>(
    config: AssistantConfig,
    host: Arc<H>,
    services: AssistantServices,
    timings: PanelTimings,
) -> AssistantHandle {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let ctx = Arc::new(DispatchContext {
        config,
        text_service: services.text_service,
        speech: SpeechBridge::new(services.host_speech, services.local_speech),
    });
    let mut controller = PanelController::new(host, ctx, timings, tx.clone());

    let task = tokio::spawn(async move {
        tracing::info!("[Assistant] Controller started");
        while let Some(event) = rx.recv().await {
            if !controller.handle(event) {
                break;
            }
        }
        tracing::info!("[Assistant] Controller stopped");
    });

    AssistantHandle { tx, task }
}

/// Typed entry points for host input
pub struct AssistantHandle {
    tx: mpsc::UnboundedSender<PanelEvent>,
    task: JoinHandle<()>,
}

impl AssistantHandle {
    /// Pointer or key release anywhere in the document
    pub fn raw_selection(&self) -> AppResult<()> {
        self.send(PanelEvent::RawSelection)
    }

    pub fn click(&self, target: ClickTarget) -> AppResult<()> {
        self.send(PanelEvent::DocumentClick(target))
    }

    pub fn key_down(&self, key: &str) -> AppResult<()> {
        self.send(PanelEvent::KeyDown(Key::from_name(key)))
    }

    pub fn activate(&self, function: PanelFunction) -> AppResult<()> {
        self.send(PanelEvent::Activate(function))
    }

    /// Button `data-function` attribute variant of [`AssistantHandle::activate`]
    pub fn activate_id(&self, id: &str) -> AppResult<()> {
        let function = PanelFunction::from_id(id)
            .ok_or_else(|| AppError::Validation(format!("Unknown function: {}", id)))?;
        self.activate(function)
    }

    pub fn confirm_translation(&self, language: TargetLanguage) -> AppResult<()> {
        self.send(PanelEvent::ConfirmTranslation(language))
    }

    /// Chooser `value` variant of [`AssistantHandle::confirm_translation`]
    pub fn confirm_translation_code(&self, code: &str) -> AppResult<()> {
        let language = TargetLanguage::from_code(code)
            .ok_or_else(|| AppError::Validation(format!("Unsupported target language: {}", code)))?;
        self.confirm_translation(language)
    }

    pub fn polish(&self, control: PolishControl) -> AppResult<()> {
        self.send(PanelEvent::Polish(control))
    }

    /// Forwarded from the host's attribute observer on the panel node
    pub fn presentation_changed(&self, panel: PanelId) -> AppResult<()> {
        self.send(PanelEvent::PresentationChanged(panel))
    }

    pub async fn status(&self) -> AppResult<PanelStatus> {
        let (reply, rx) = oneshot::channel();
        self.send(PanelEvent::Status(reply))?;
        rx.await.map_err(|_| AppError::Shutdown)
    }

    /// Detach the panel and wait for the controller task to finish
    pub async fn shutdown(self) -> AppResult<()> {
        // Already stopped is fine
        let _ = self.tx.send(PanelEvent::Shutdown);
        self.task.await.map_err(|e| {
            tracing::error!(error = %e, "[Assistant] Controller task failed");
            AppError::Shutdown
        })
    }

    fn send(&self, event: PanelEvent) -> AppResult<()> {
        self.tx.send(event).map_err(|_| AppError::Shutdown)
    }
}
