//! Per-cell options supplied by the host.
//!
//! Unrecognized keys are ignored so hosts can pass a superset of presentation settings.

use std::time::Duration;

use gridcell_mask::{convert_legacy_mask, MaskPreset};
use serde::{Deserialize, Serialize};

use crate::popup::PopupRegion;
use crate::state::{CellState, EditorVisibility};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CellOptions {
    /// Lifecycle state the cell starts in.
    pub initial_state: CellState,

    /// Debounce delay for change events in milliseconds. 0 disables debouncing.
    pub debounce: u64,

    pub readonly: bool,

    pub disabled: bool,

    /// Enter inserts a newline instead of submitting.
    pub multiline: bool,

    /// Initial state of the overlay editor.
    pub editor_initial_state: EditorVisibility,

    /// Display template, e.g. `"{{ value }} kg"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,

    /// Mask pattern; legacy `9` placeholders are migrated on use.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask: Option<String>,

    /// Named mask, used when `mask` is not set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask_preset: Option<MaskPreset>,

    pub popup_elements: Vec<PopupRegion>,
}

impl CellOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial_state(mut self, state: CellState) -> Self {
        self.initial_state = state;
        self
    }

    pub fn with_debounce_ms(mut self, ms: u64) -> Self {
        self.debounce = ms;
        self
    }

    pub fn with_readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn with_multiline(mut self, multiline: bool) -> Self {
        self.multiline = multiline;
        self
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn with_mask(mut self, mask: impl Into<String>) -> Self {
        self.mask = Some(mask.into());
        self
    }

    pub fn with_mask_preset(mut self, preset: MaskPreset) -> Self {
        self.mask_preset = Some(preset);
        self
    }

    pub fn with_popup(mut self, region: PopupRegion) -> Self {
        self.popup_elements.push(region);
        self
    }

    /// `None` when debouncing is off.
    pub fn debounce_delay(&self) -> Option<Duration> {
        (self.debounce > 0).then(|| Duration::from_millis(self.debounce))
    }

    /// The mask pattern in effect: an explicit (migrated) mask wins over a preset.
    pub fn effective_mask(&self) -> Option<String> {
        match self.mask.as_deref() {
            Some(mask) if !mask.is_empty() => Some(convert_legacy_mask(mask)),
            _ => self
                .mask_preset
                .and_then(MaskPreset::pattern)
                .map(str::to_string),
        }
    }
}
