//! Event types for cell notifications.
//!
//! A cell reports everything to its host through one callback registered at
//! construction. Debounced deliveries from the editor controller go through
//! the same callback, so the host sees a single ordered stream per cell.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

use crate::value::CellValue;

/// Events emitted by a cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "detail", rename_all = "lowercase")]
pub enum CellEvent {
    /// The cell entered Edit.
    EnterEdit,
    /// The cell left Edit (emitted after any change/cancel of the same action).
    ExitEdit,
    /// A value was committed (dirty submit/focusout, or a debounced change).
    Change(CellValue),
    /// The edit was abandoned. Always carries the pre-edit value.
    Cancel(CellValue),
    /// A debounced delivery under a host-chosen event name.
    Custom { name: String, value: CellValue },
}

impl CellEvent {
    /// DOM-style event name.
    pub fn name(&self) -> &str {
        match self {
            CellEvent::EnterEdit => "enteredit",
            CellEvent::ExitEdit => "exitedit",
            CellEvent::Change(_) => "change",
            CellEvent::Cancel(_) => "cancel",
            CellEvent::Custom { name, .. } => name,
        }
    }

    /// Payload, if the event carries one.
    pub fn value(&self) -> Option<&CellValue> {
        match self {
            CellEvent::Change(v) | CellEvent::Cancel(v) => Some(v),
            CellEvent::Custom { value, .. } => Some(value),
            CellEvent::EnterEdit | CellEvent::ExitEdit => None,
        }
    }

    /// Build the event for a debounced dispatch under `name`.
    pub fn named(name: &str, value: CellValue) -> Self {
        match name {
            "change" => CellEvent::Change(value),
            _ => CellEvent::Custom {
                name: name.to_string(),
                value,
            },
        }
    }
}

/// Callback type for receiving cell events.
///
/// Cells are single-threaded; the callback is not required to be `Send`.
pub type EventCallback = Box<dyn FnMut(CellEvent)>;

/// Simple event collector for hosts and tests.
#[derive(Debug, Default)]
pub struct EventCollector {
    events: Vec<CellEvent>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// A shared collector plus a callback that feeds it.
    pub fn shared() -> (Rc<RefCell<EventCollector>>, EventCallback) {
        let collector = Rc::new(RefCell::new(EventCollector::new()));
        let sink = Rc::clone(&collector);
        let callback: EventCallback = Box::new(move |event| sink.borrow_mut().push(event));
        (collector, callback)
    }

    pub fn push(&mut self, event: CellEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[CellEvent] {
        &self.events
    }

    /// Remove and return everything collected so far.
    pub fn drain(&mut self) -> Vec<CellEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Event names in arrival order.
    pub fn names(&self) -> Vec<&str> {
        self.events.iter().map(CellEvent::name).collect()
    }

    /// Payloads of Change events.
    pub fn changes(&self) -> Vec<&CellValue> {
        self.events
            .iter()
            .filter_map(|e| match e {
                CellEvent::Change(v) => Some(v),
                _ => None,
            })
            .collect()
    }

    /// Payloads of Cancel events.
    pub fn cancels(&self) -> Vec<&CellValue> {
        self.events
            .iter()
            .filter_map(|e| match e {
                CellEvent::Cancel(v) => Some(v),
                _ => None,
            })
            .collect()
    }
}
