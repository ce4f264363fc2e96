use serde::{Deserialize, Serialize};

/// Lifecycle of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CellState {
    /// Value not yet available (e.g. awaiting a related record).
    #[serde(alias = "Loading")]
    Load,
    /// Display mode.
    #[default]
    View,
    /// Editing mode. `Editing` is the legacy spelling.
    #[serde(alias = "Editing")]
    Edit,
    /// Editing impossible regardless of flags.
    Disabled,
}

impl CellState {
    pub fn is_editing(self) -> bool {
        matches!(self, CellState::Edit)
    }
}

/// Whether the cell's overlay editor (picker, popover) is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EditorVisibility {
    #[default]
    Hidden,
    Visible,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_state_names() {
        let edit: CellState = serde_json::from_str("\"Editing\"").unwrap();
        assert_eq!(edit, CellState::Edit);
        let load: CellState = serde_json::from_str("\"Loading\"").unwrap();
        assert_eq!(load, CellState::Load);
        let view: CellState = serde_json::from_str("\"View\"").unwrap();
        assert_eq!(view, CellState::View);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(CellState::default(), CellState::View);
        assert_eq!(EditorVisibility::default(), EditorVisibility::Hidden);
    }
}
