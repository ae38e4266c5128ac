use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// The four text-transform actions offered by the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum PanelFunction {
    Explain,
    Translate,
    Speak,
    Polish,
}

impl PanelFunction {
    pub const ALL: [PanelFunction; 4] = [
        PanelFunction::Explain,
        PanelFunction::Translate,
        PanelFunction::Speak,
        PanelFunction::Polish,
    ];

    /// Value of the button's `data-function` attribute
    pub fn id(&self) -> &'static str {
        match self {
            PanelFunction::Explain => "explain",
            PanelFunction::Translate => "translate",
            PanelFunction::Speak => "speak",
            PanelFunction::Polish => "polish",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.id() == id)
    }
}

/// Translation targets offered by the language chooser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum TargetLanguage {
    #[serde(rename = "zh")]
    Chinese,
    #[serde(rename = "en")]
    English,
}

impl TargetLanguage {
    pub const ALL: [TargetLanguage; 2] = [TargetLanguage::Chinese, TargetLanguage::English];

    pub fn code(&self) -> &'static str {
        match self {
            TargetLanguage::Chinese => "zh",
            TargetLanguage::English => "en",
        }
    }

    /// Name used both in the chooser and inside the translation prompt
    pub fn label(&self) -> &'static str {
        match self {
            TargetLanguage::Chinese => "中文",
            TargetLanguage::English => "英文",
        }
    }

    /// Accepts ISO 639-1 or 639-3 codes ("zh", "zho", "en", "eng")
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim().to_ascii_lowercase();
        let language = isolang::Language::from_639_1(&code)
            .or_else(|| isolang::Language::from_639_3(&code))?;
        match language.to_639_1() {
            Some("zh") => Some(TargetLanguage::Chinese),
            Some("en") => Some(TargetLanguage::English),
            _ => None,
        }
    }
}

impl Default for TargetLanguage {
    fn default() -> Self {
        TargetLanguage::Chinese
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Page coordinates of the panel's top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Position {
    pub left: f64,
    pub top: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollOffsets {
    pub x: f64,
    pub y: f64,
}

/// Viewport-relative bounding rectangle, as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Selection rectangle plus the scroll offsets in effect when it was measured
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AnchorGeometry {
    pub rect: Rect,
    pub scroll: ScrollOffsets,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub scroll: ScrollOffsets,
}

impl Viewport {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Opaque host handle to a document range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RangeHandle(pub u64);

/// What the host selection API returned, before trimming
#[derive(Debug, Clone, PartialEq)]
pub struct RawSelection {
    pub text: String,
    pub rect: Rect,
    pub scroll: ScrollOffsets,
    pub range: RangeHandle,
}

/// Captured selected text plus its anchor geometry at debounced evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionSnapshot {
    text: String,
    pub anchor: AnchorGeometry,
    pub range: RangeHandle,
}

impl SelectionSnapshot {
    /// Returns `None` when the trimmed text is empty
    pub fn from_raw(raw: RawSelection) -> Option<Self> {
        let text = raw.text.trim();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            text: text.to_string(),
            anchor: AnchorGeometry { rect: raw.rect, scroll: raw.scroll },
            range: raw.range,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PanelId(pub Uuid);

impl PanelId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PanelId {
    fn default() -> Self {
        Self::new()
    }
}

/// Observed presentation of the panel node: inline `display` and the `show` class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Presentation {
    pub displayed: bool,
    pub shown: bool,
}

impl Presentation {
    pub const HIDDEN: Presentation = Presentation { displayed: false, shown: false };
    /// Displayed, entry animation not yet applied
    pub const ENTERING: Presentation = Presentation { displayed: true, shown: false };
    pub const VISIBLE: Presentation = Presentation { displayed: true, shown: true };
    /// Exit animation running, still laid out
    pub const LEAVING: Presentation = Presentation { displayed: true, shown: false };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetKind {
    FunctionButton,
    ControlButton,
    Other,
}

/// Target of a document click as seen by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickTarget {
    pub inside_panel: bool,
    pub kind: TargetKind,
}

impl ClickTarget {
    pub fn page() -> Self {
        Self { inside_panel: false, kind: TargetKind::Other }
    }

    pub fn panel() -> Self {
        Self { inside_panel: true, kind: TargetKind::Other }
    }

    /// Buttons have their own listeners and never count as outside clicks
    pub fn is_outside(&self) -> bool {
        !self.inside_panel && self.kind == TargetKind::Other
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other(String),
}

impl Key {
    pub fn from_name(name: &str) -> Self {
        match name {
            "Escape" | "Esc" => Key::Escape,
            other => Key::Other(other.to_string()),
        }
    }
}

/// State of the translate result sub-region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "state", content = "text", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum TranslationRegion {
    Empty,
    Loading,
    Translated(String),
    Failed(String),
}

/// Payload rendered in the panel's content area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "view", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum PanelContent {
    Empty,
    Loading {
        function: PanelFunction,
        label: String,
    },
    Explanation {
        selected_text: String,
        result: String,
    },
    TranslateChooser {
        selected_text: String,
        options: Vec<TargetLanguage>,
        selected: TargetLanguage,
        region: TranslationRegion,
    },
    PolishEditor {
        selected_text: String,
        draft: String,
    },
    Error {
        function: PanelFunction,
        title: String,
        detail: String,
        retry: PanelFunction,
    },
}

/// Controls rendered under the polish editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolishControl {
    /// Focus the text area and select its contents
    Edit,
    /// Replace the original selection with the edited text, then hide
    Replace(String),
    /// Run polish again from scratch
    Redo,
}
