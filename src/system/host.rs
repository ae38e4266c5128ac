//! Host document capability
//!
//! The page document (selection API, the panel node, layout) lives outside the
//! crate. The controller only touches it through this trait so it can run
//! against a real bridge or an in-memory fake.

use crate::shared::error::AppResult;
use crate::shared::types::{
    PanelContent, PanelId, Position, Presentation, RangeHandle, RawSelection, Size,
    TranslationRegion, Viewport,
};

pub trait HostDocument: Send + Sync + 'static {
    /// Current document selection, if any range exists
    fn current_selection(&self) -> Option<RawSelection>;

    fn viewport(&self) -> Viewport;

    /// Create a fresh panel node with its function buttons already bound
    fn mount_panel(&self) -> PanelId;

    /// Remove the node and disconnect its attribute observer
    fn detach_panel(&self, panel: PanelId);

    fn set_presentation(&self, panel: PanelId, presentation: Presentation);

    /// `None` once the node is gone
    fn presentation(&self, panel: PanelId) -> Option<Presentation>;

    /// Live dimensions; zero when not laid out
    fn panel_size(&self, panel: PanelId) -> Size;

    fn set_position(&self, panel: PanelId, position: Position);

    /// Swap the whole content area
    fn render(&self, panel: PanelId, content: &PanelContent);

    /// Swap only the translate result sub-region.
    /// Fails with `DomUnavailable` when the region is not present.
    fn update_translation_region(&self, panel: PanelId, region: &TranslationRegion) -> AppResult<()>;

    /// Focus the polish text area and select its contents
    fn focus_editor(&self, panel: PanelId) -> AppResult<()>;

    /// Delete the range's contents and insert `text` as a single text node
    fn replace_range(&self, range: RangeHandle, text: &str) -> AppResult<()>;

    fn clear_selection(&self);
}
