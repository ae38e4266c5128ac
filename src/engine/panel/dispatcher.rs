//! Function dispatch on top of the panel lifecycle
//!
//! Every activation bumps the dispatch generation, renders the loading view
//! and runs the handler on a spawned task. The task reports back with a
//! [`Settlement`]; only the generation still in flight may render, and
//! settling it is the one place the processing guard is released.

use super::controller::PanelController;
use super::state::{InFlight, RenderTarget};
use crate::engine::features::translate::TranslateFeature;
use crate::engine::features::{FeatureHandler, FunctionOutput};
use crate::engine::selection::monitor::preview;
use crate::shared::error::{AppError, AppResult};
use crate::shared::events::{PanelEvent, Settlement};
use crate::shared::types::{
    PanelContent, PanelFunction, PanelId, PolishControl, TargetLanguage, TranslationRegion,
};
use crate::system::HostDocument;

impl<H: HostDocument> PanelController<H> {
    pub(super) fn activate(&mut self, function: PanelFunction) {
        let Some(snapshot) = self.state.snapshot().cloned() else {
            tracing::debug!(?function, "[Dispatcher] No selection to act on");
            return;
        };

        self.state.cancel_hide();
        self.ensure_visible();
        let Some(panel) = self.state.panel() else {
            return;
        };

        let handler = FeatureHandler::for_function(function);
        let generation =
            self.state.begin_dispatch(function, RenderTarget::Content, snapshot.text(), Some(snapshot.range));
        tracing::info!(
            ?function,
            generation,
            text = %preview(snapshot.text(), 20),
            "[Dispatcher] Activating"
        );

        self.swap_content(panel, PanelContent::Loading { function, label: handler.loading_label() });
        self.arm_watchdog(generation);

        let ctx = self.ctx.clone();
        let events = self.events.clone();
        let text = snapshot.text().to_string();
        tokio::spawn(async move {
            let outcome = handler.execute(&ctx, &text).await;
            let _ = events.send(PanelEvent::DispatchSettled(Settlement { generation, panel, function, outcome }));
        });
    }

    /// Confirm the chosen target language; only the result sub-region changes
    pub(super) fn confirm_translation(&mut self, language: TargetLanguage) {
        let (Some(panel), PanelContent::TranslateChooser { selected_text, .. }) =
            (self.state.panel(), self.state.content())
        else {
            tracing::debug!("[Dispatcher] Translation confirmed without an open chooser");
            return;
        };
        let text = selected_text.clone();

        self.state.cancel_hide();
        self.ensure_visible();
        let generation =
            self.state.begin_dispatch(PanelFunction::Translate, RenderTarget::TranslationRegion, &text, None);
        tracing::info!(generation, language = language.code(), "[Dispatcher] Translating");

        self.set_region(Some(language), TranslationRegion::Loading);
        if let Err(e) = self.host.update_translation_region(panel, &TranslationRegion::Loading) {
            tracing::warn!(error = %e, "[Dispatcher] Result region missing, falling back to error view");
            self.state.settle(generation);
            self.render_error(panel, PanelFunction::Translate, &e);
            return;
        }
        self.arm_watchdog(generation);

        let ctx = self.ctx.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = TranslateFeature.translate(&ctx, &text, language).await;
            let _ = events.send(PanelEvent::DispatchSettled(Settlement {
                generation,
                panel,
                function: PanelFunction::Translate,
                outcome,
            }));
        });
    }

    pub(super) fn on_settled(&mut self, settlement: Settlement) {
        let Settlement { generation, panel, function, outcome } = settlement;
        let Some(in_flight) = self.state.settle(generation) else {
            tracing::debug!(generation, ?function, "[Dispatcher] Discarding superseded result");
            return;
        };
        if self.state.panel() != Some(panel) {
            tracing::debug!(generation, "[Dispatcher] Discarding result for a detached panel");
            return;
        }

        match outcome {
            Ok(output) => self.render_output(panel, &in_flight, output),
            Err(e) => {
                tracing::warn!(?function, error = %e, "[Dispatcher] Function failed");
                self.render_failure(panel, &in_flight, &e);
            }
        }
    }

    /// The in-flight generation outlived its bound: release the guard and
    /// show a timeout. Its eventual settlement no longer matches and is dropped.
    pub(super) fn on_watchdog(&mut self, generation: u64) {
        let Some(in_flight) = self.state.settle(generation) else {
            return;
        };
        let Some(panel) = self.state.panel() else {
            return;
        };
        tracing::warn!(generation, function = ?in_flight.function, "[Dispatcher] Dispatch timed out");
        let e = AppError::Transport(format!(
            "Request did not complete within {} ms",
            self.timings.processing_watchdog.as_millis()
        ));
        self.render_failure(panel, &in_flight, &e);
    }

    pub(super) fn on_polish_control(&mut self, control: PolishControl) {
        let Some(panel) = self.state.panel() else {
            return;
        };
        if control == PolishControl::Redo {
            self.activate(PanelFunction::Polish);
            return;
        }
        if !matches!(self.state.content(), PanelContent::PolishEditor { .. }) {
            tracing::debug!(?control, "[Dispatcher] Polish control without an editor");
            return;
        }

        match control {
            PolishControl::Edit => {
                if let Err(e) = self.host.focus_editor(panel) {
                    tracing::warn!(error = %e, "[Dispatcher] Could not focus editor");
                }
            }
            PolishControl::Replace(text) => {
                if let Err(e) = self.replace_selection(&text) {
                    tracing::warn!(error = %e, "[Dispatcher] Replace failed");
                    self.render_error(panel, PanelFunction::Polish, &e);
                    return;
                }
                self.request_hide("replaced");
            }
            PolishControl::Redo => {}
        }
    }

    /// Writes into the range the draft was polished from, not the live selection
    fn replace_selection(&mut self, text: &str) -> AppResult<()> {
        let range = self
            .state
            .replace_target()
            .ok_or_else(|| AppError::DomUnavailable("original selection is gone".to_string()))?;
        self.host.replace_range(range, text)?;
        self.host.clear_selection();
        self.state.clear_snapshot();
        tracing::info!(chars = text.chars().count(), "[Dispatcher] Selection replaced");
        Ok(())
    }

    fn render_output(&mut self, panel: PanelId, in_flight: &InFlight, output: FunctionOutput) {
        let selected_text = in_flight.selected_text.clone();
        match output {
            FunctionOutput::Explanation(result) => {
                self.swap_content(panel, PanelContent::Explanation { selected_text, result });
            }
            FunctionOutput::TranslateChooser => {
                self.swap_content(panel, PanelContent::TranslateChooser {
                    selected_text,
                    options: TargetLanguage::ALL.to_vec(),
                    selected: TargetLanguage::default(),
                    region: TranslationRegion::Empty,
                });
            }
            FunctionOutput::Translation { language, text } => {
                self.update_region(panel, Some(language), TranslationRegion::Translated(text));
            }
            FunctionOutput::Spoken { .. } => {
                let token = self.state.schedule_hide();
                self.schedule(self.timings.speak_hide_delay, PanelEvent::DeferredHideElapsed(token));
            }
            FunctionOutput::Polished(draft) => {
                self.swap_content(panel, PanelContent::PolishEditor { selected_text, draft });
                self.state.set_replace_target(in_flight.range);
            }
        }
    }

    fn render_failure(&mut self, panel: PanelId, in_flight: &InFlight, error: &AppError) {
        match in_flight.target {
            RenderTarget::TranslationRegion => {
                self.update_region(panel, None, TranslationRegion::Failed(error.to_string()));
            }
            RenderTarget::Content => self.render_error(panel, in_flight.function, error),
        }
    }

    fn render_error(&mut self, panel: PanelId, function: PanelFunction, error: &AppError) {
        let handler = FeatureHandler::for_function(function);
        self.swap_content(panel, PanelContent::Error {
            function,
            title: handler.failure_title(),
            detail: error.to_string(),
            retry: function,
        });
    }

    /// Swap the result sub-region, or the whole panel if the region is gone
    fn update_region(&mut self, panel: PanelId, language: Option<TargetLanguage>, region: TranslationRegion) {
        if !self.set_region(language, region.clone()) {
            let e = AppError::DomUnavailable("translation chooser is no longer shown".to_string());
            self.render_error(panel, PanelFunction::Translate, &e);
            return;
        }
        match self.host.update_translation_region(panel, &region) {
            Ok(()) => self.reposition(),
            Err(e) => {
                tracing::warn!(error = %e, "[Dispatcher] Result region missing, falling back to error view");
                self.render_error(panel, PanelFunction::Translate, &e);
            }
        }
    }

    fn set_region(&mut self, language: Option<TargetLanguage>, region: TranslationRegion) -> bool {
        match self.state.content_mut() {
            PanelContent::TranslateChooser { selected, region: current, .. } => {
                if let Some(language) = language {
                    *selected = language;
                }
                *current = region;
                true
            }
            _ => false,
        }
    }

    fn swap_content(&mut self, panel: PanelId, content: PanelContent) {
        self.host.render(panel, &content);
        self.state.set_content(content);
        self.reposition();
    }

    fn arm_watchdog(&self, generation: u64) {
        self.schedule(self.timings.processing_watchdog, PanelEvent::WatchdogElapsed(generation));
    }
}
