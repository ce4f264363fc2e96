//! Test harness for cell interaction.
//!
//! `CellHarness` wraps a `CellEditor` whose event callback feeds a shared
//! `EventCollector`, so tests can drive host events and then assert on the
//! exact event stream the host would have seen.

use std::cell::RefCell;
use std::rc::Rc;

use crate::editor::CellEditor;
use crate::events::EventCollector;
use crate::options::CellOptions;
use crate::value::CellValue;

pub struct CellHarness {
    pub editor: CellEditor,
    events: Rc<RefCell<EventCollector>>,
}

impl CellHarness {
    pub fn new(options: CellOptions, value: CellValue) -> Self {
        let (events, callback) = EventCollector::shared();
        Self {
            editor: CellEditor::new(&options, value, callback),
            events,
        }
    }

    /// Event names seen so far.
    pub fn names(&self) -> Vec<String> {
        self.events
            .borrow()
            .names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Payloads of Change events seen so far.
    pub fn changes(&self) -> Vec<CellValue> {
        self.events.borrow().changes().into_iter().cloned().collect()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}
