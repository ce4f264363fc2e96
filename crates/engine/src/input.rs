//! Host input events in a framework-neutral shape.

use crate::popup::ElementId;
use crate::value::CellValue;

/// Logical key, parsed from a DOM `KeyboardEvent.key` string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Tab,
    /// A printable single character.
    Character(char),
    /// Any other named key (`Backspace`, `ArrowLeft`, ...).
    Named(String),
}

impl Key {
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Enter" => Key::Enter,
            "Escape" | "Esc" => Key::Escape,
            "Tab" => Key::Tab,
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => Key::Character(ch),
                    _ => Key::Named(key.to_string()),
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardEvent {
    pub key: Key,
    pub shift_key: bool,
}

impl KeyboardEvent {
    pub fn new(key: Key) -> Self {
        Self { key, shift_key: false }
    }

    pub fn from_dom(key: &str, shift_key: bool) -> Self {
        Self {
            key: Key::from_dom(key),
            shift_key,
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift_key = true;
        self
    }
}

/// Direction of a Tab focus move. The host performs the actual move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusMove {
    Forward,
    Backward,
}

/// What the keyboard policy did with a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Submitted,
    Cancelled,
    MoveFocus(FocusMove),
    /// Not handled; the host keeps its default behavior.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyResponse {
    pub action: KeyAction,
    /// The host should suppress the key's default behavior.
    pub prevent_default: bool,
}

impl KeyResponse {
    pub const IGNORED: KeyResponse = KeyResponse {
        action: KeyAction::Ignored,
        prevent_default: false,
    };

    pub fn handled(action: KeyAction) -> Self {
        Self {
            action,
            prevent_default: matches!(action, KeyAction::MoveFocus(_)),
        }
    }
}

/// DOM-style focus event; `related_target` is the element gaining focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FocusEvent {
    pub related_target: Option<ElementId>,
}

impl FocusEvent {
    pub fn to(target: ElementId) -> Self {
        Self {
            related_target: Some(target),
        }
    }

    pub fn nowhere() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusOutOutcome {
    /// Focus moved into a popup; the edit session continues.
    Suppressed,
    /// Forwarded to the state machine's focusout.
    Forwarded,
}

/// Input or custom event from a presentation component.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InputEvent {
    /// `event.target.value` for native inputs.
    pub target_value: Option<String>,
    /// `event.detail` for custom component events.
    pub detail: Option<CellValue>,
}

/// Value carried by an input event: the target's text if present, else the detail.
pub fn extract_value(event: &InputEvent) -> CellValue {
    match &event.target_value {
        Some(text) => CellValue::text(text.clone()),
        None => event.detail.clone().unwrap_or_default(),
    }
}

/// Keystroke filter for numeric cells. Returns false when the key must be rejected.
///
/// Accepts digits, one `.` and a `-` typed at caret position 0. Named keys
/// (Backspace, arrows, Enter, ...) always pass.
pub fn accepts_numeric_key(key: &Key, current: &str, caret: usize) -> bool {
    match key {
        Key::Character(ch) if ch.is_ascii_digit() => true,
        Key::Character('.') => !current.contains('.'),
        Key::Character('-') => caret == 0,
        Key::Character(_) => false,
        Key::Enter | Key::Escape | Key::Tab | Key::Named(_) => true,
    }
}
