//! Cell lifecycle state machine
//!
//! Owns one cell's lifecycle state, its current value and the snapshot the
//! value is compared against. Transitions:
//!
//! ```text
//!   Load --load_complete--> View --focus--> Edit
//!                            ^               |
//!                            +-- focusout ---+  (change if dirty)
//!                            +-- submit -----+  (change if dirty)
//!                            +-- cancel -----+  (cancel with original value)
//!
//!   Disabled --focus--> Disabled
//!   any --go_to(s)--> s
//! ```
//!
//! An action that is not defined for the current state is ignored: no state
//! change, no event. UI event order is not under the cell's control.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::error::CellError;
use crate::events::{CellEvent, EventCallback};
use crate::options::CellOptions;
use crate::state::CellState;
use crate::template::TemplateRenderer;
use crate::value::{CellValue, Snapshot};

/// Why an edit is being committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitTrigger {
    /// Implicit: focus left the cell.
    FocusOut,
    /// Explicit user confirm (Enter).
    Submit,
}

pub struct CellStateMachine {
    state: CellState,
    readonly: bool,
    disabled: bool,
    template: Option<String>,
    current: CellValue,
    snapshot: Option<Snapshot>,
    edit_started_at: Option<DateTime<Utc>>,
    error: Option<String>,
    on_event: EventCallback,
}

impl fmt::Debug for CellStateMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellStateMachine")
            .field("state", &self.state)
            .field("readonly", &self.readonly)
            .field("disabled", &self.disabled)
            .field("current", &self.current)
            .field("snapshot", &self.snapshot)
            .field("edit_started_at", &self.edit_started_at)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl CellStateMachine {
    /// Create a cell in `options.initial_state` holding `value`.
    ///
    /// The initial state's entry actions run immediately, so a cell created
    /// in Edit reports `enteredit` to `on_event` before this returns.
    pub fn new(options: &CellOptions, value: CellValue, on_event: EventCallback) -> Self {
        let mut machine = Self {
            state: options.initial_state,
            readonly: options.readonly,
            disabled: options.disabled,
            template: options.template.clone(),
            current: value,
            snapshot: None,
            edit_started_at: None,
            error: None,
            on_event,
        };
        machine.enter(options.initial_state);
        machine
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn state(&self) -> CellState {
        self.state
    }

    pub fn is_editing(&self) -> bool {
        self.state.is_editing()
    }

    pub fn value(&self) -> &CellValue {
        &self.current
    }

    /// Current value differs from the snapshot. Recomputed on every call.
    pub fn is_dirty(&self) -> bool {
        self.snapshot
            .as_ref()
            .is_some_and(|snapshot| !snapshot.matches(&self.current))
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    pub fn edit_started_at(&self) -> Option<DateTime<Utc>> {
        self.edit_started_at
    }

    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Display text: the template rendered by `renderer`, or the plain value.
    pub fn formatted_value(&self, renderer: &dyn TemplateRenderer) -> String {
        match &self.template {
            Some(template) => renderer.render(template, &self.current),
            None => self.current.to_display_string(),
        }
    }

    // =========================================================================
    // Host API
    // =========================================================================

    /// Replace the working value (typing, picker selection). Never commits.
    pub fn set_value(&mut self, value: CellValue) {
        self.current = value;
    }

    /// Enter View with `value` as the new baseline. Re-entering View from View
    /// recaptures the snapshot.
    pub fn enter_view(&mut self, value: CellValue) {
        self.current = value;
        if self.state == CellState::View {
            self.snapshot = Some(Snapshot::capture(&self.current));
        } else {
            self.transition(CellState::View);
        }
    }

    /// Convert a host value and enter View. On error the cell is untouched.
    pub fn enter_view_with<T: serde::Serialize + ?Sized>(&mut self, value: &T) -> Result<(), CellError> {
        let value = CellValue::from_serialize(value)?;
        self.enter_view(value);
        Ok(())
    }

    /// Enter Load with a provisional value.
    pub fn enter_load(&mut self, value: CellValue) {
        self.current = value;
        if self.state == CellState::Load {
            self.snapshot = Some(Snapshot::capture(&self.current));
        } else {
            self.transition(CellState::Load);
        }
    }

    pub fn set_readonly(&mut self, readonly: bool) {
        self.readonly = readonly;
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Drop any edit and return to View with the snapshot value. Emits
    /// `exitedit` when leaving Edit, but neither `change` nor `cancel`.
    pub fn reset(&mut self) -> Result<CellState, CellError> {
        if let Some(snapshot) = &self.snapshot {
            self.current = snapshot.restore()?;
        }
        self.error = None;
        self.transition(CellState::View);
        Ok(self.state)
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Force the state. No-op if already there.
    pub fn go_to(&mut self, state: CellState) -> CellState {
        self.transition(state);
        self.state
    }

    /// Load -> View.
    pub fn load_complete(&mut self) -> CellState {
        if self.state == CellState::Load {
            self.transition(CellState::View);
        }
        self.state
    }

    /// View -> Edit unless readonly or disabled. Disabled stays Disabled.
    pub fn focus(&mut self) -> CellState {
        match self.state {
            CellState::View if !self.readonly && !self.disabled => {
                self.transition(CellState::Edit);
            }
            CellState::View => {
                log::debug!(
                    "focus ignored: readonly={} disabled={}",
                    self.readonly,
                    self.disabled
                );
            }
            CellState::Disabled | CellState::Load | CellState::Edit => {}
        }
        self.state
    }

    /// Implicit commit when focus leaves the cell.
    pub fn focusout(&mut self) -> CellState {
        self.commit(CommitTrigger::FocusOut)
    }

    /// Explicit commit (Enter).
    pub fn submit(&mut self) -> CellState {
        self.commit(CommitTrigger::Submit)
    }

    /// Edit -> View, restoring the pre-edit value and reporting it.
    pub fn cancel(&mut self) -> Result<CellState, CellError> {
        if self.state != CellState::Edit {
            return Ok(self.state);
        }
        if let Some(snapshot) = &self.snapshot {
            self.current = snapshot.restore()?;
        }
        self.emit(CellEvent::Cancel(self.current.clone()));
        self.transition(CellState::View);
        Ok(self.state)
    }

    fn commit(&mut self, trigger: CommitTrigger) -> CellState {
        if self.state != CellState::Edit {
            return self.state;
        }
        if self.is_dirty() {
            log::debug!("commit ({trigger:?}): value changed");
            self.emit(CellEvent::Change(self.current.clone()));
        } else {
            log::trace!("commit ({trigger:?}): value unchanged");
        }
        self.transition(CellState::View);
        self.state
    }

    // =========================================================================
    // Internals
    // =========================================================================

    pub(crate) fn emit(&mut self, event: CellEvent) {
        (self.on_event)(event);
    }

    fn transition(&mut self, to: CellState) {
        if self.state == to {
            return;
        }
        let from = self.state;
        if from == CellState::Edit {
            self.edit_started_at = None;
            self.emit(CellEvent::ExitEdit);
        }
        log::debug!("cell {from:?} -> {to:?}");
        self.state = to;
        self.enter(to);
    }

    /// Entry actions for `state`.
    fn enter(&mut self, state: CellState) {
        match state {
            CellState::Load | CellState::View => {
                self.snapshot = Some(Snapshot::capture(&self.current));
            }
            CellState::Edit => {
                if self.snapshot.is_none() {
                    self.snapshot = Some(Snapshot::capture(&self.current));
                }
                self.edit_started_at = Some(Utc::now());
                self.emit(CellEvent::EnterEdit);
            }
            CellState::Disabled => self.snapshot = None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventCollector;
    use crate::template::BindingRenderer;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn machine(options: CellOptions, value: CellValue) -> (CellStateMachine, Rc<RefCell<EventCollector>>) {
        let (events, callback) = EventCollector::shared();
        (CellStateMachine::new(&options, value, callback), events)
    }

    #[test]
    fn test_starts_in_view_clean() {
        let (cell, events) = machine(CellOptions::new(), CellValue::text("a"));
        assert_eq!(cell.state(), CellState::View);
        assert!(!cell.is_dirty());
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_initial_edit_emits_enteredit() {
        let options = CellOptions::new().with_initial_state(CellState::Edit);
        let (cell, events) = machine(options, CellValue::text("a"));
        assert!(cell.is_editing());
        assert!(cell.edit_started_at().is_some());
        assert!(cell.snapshot().is_some());
        assert_eq!(events.borrow().names(), vec!["enteredit"]);
    }

    #[test]
    fn test_focus_enters_edit_and_stamps_time() {
        let (mut cell, events) = machine(CellOptions::new(), CellValue::text("a"));
        assert_eq!(cell.focus(), CellState::Edit);
        assert!(cell.edit_started_at().is_some());
        assert_eq!(events.borrow().names(), vec!["enteredit"]);
    }

    #[test]
    fn test_focus_respects_readonly_and_disabled_flags() {
        let (mut cell, events) = machine(CellOptions::new().with_readonly(true), CellValue::null());
        assert_eq!(cell.focus(), CellState::View);

        cell.set_readonly(false);
        cell.set_disabled(true);
        assert_eq!(cell.focus(), CellState::View);

        cell.set_disabled(false);
        assert_eq!(cell.focus(), CellState::Edit);
        assert_eq!(events.borrow().names(), vec!["enteredit"]);
    }

    #[test]
    fn test_submit_commits_only_when_dirty() {
        let (mut cell, events) = machine(CellOptions::new(), CellValue::text("a"));
        cell.focus();
        assert_eq!(cell.submit(), CellState::View);
        assert_eq!(events.borrow().names(), vec!["enteredit", "exitedit"]);

        events.borrow_mut().clear();
        cell.focus();
        cell.set_value(CellValue::text("b"));
        assert!(cell.is_dirty());
        cell.submit();
        assert_eq!(events.borrow().names(), vec!["enteredit", "change", "exitedit"]);
        assert_eq!(events.borrow().changes(), vec![&CellValue::text("b")]);
        assert!(cell.edit_started_at().is_none());
    }

    #[test]
    fn test_commit_defines_new_baseline() {
        let (mut cell, _events) = machine(CellOptions::new(), CellValue::text("a"));
        cell.focus();
        cell.set_value(CellValue::text("b"));
        cell.focusout();
        assert_eq!(cell.value(), &CellValue::text("b"));
        assert!(!cell.is_dirty());
    }

    #[test]
    fn test_edit_back_to_original_is_not_dirty() {
        let (mut cell, events) = machine(CellOptions::new(), CellValue::text("a"));
        cell.focus();
        cell.set_value(CellValue::text("zzz"));
        cell.set_value(CellValue::text("a"));
        cell.focusout();
        assert!(events.borrow().changes().is_empty());
    }

    #[test]
    fn test_cancel_restores_original() {
        let original = CellValue::from(json!({"id": 1, "tags": ["a"]}));
        let (mut cell, events) = machine(CellOptions::new(), original.clone());
        cell.focus();
        cell.set_value(CellValue::from(json!({"id": 2})));
        assert_eq!(cell.cancel().unwrap(), CellState::View);

        assert_eq!(cell.value(), &original);
        assert_eq!(events.borrow().names(), vec!["enteredit", "cancel", "exitedit"]);
        assert_eq!(events.borrow().cancels(), vec![&original]);
    }

    #[test]
    fn test_actions_outside_edit_are_ignored() {
        let (mut cell, events) = machine(CellOptions::new(), CellValue::text("a"));
        cell.set_value(CellValue::text("b"));
        assert_eq!(cell.submit(), CellState::View);
        assert_eq!(cell.focusout(), CellState::View);
        assert_eq!(cell.cancel().unwrap(), CellState::View);
        assert_eq!(cell.load_complete(), CellState::View);
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_load_then_complete() {
        let options = CellOptions::new().with_initial_state(CellState::Load);
        let (mut cell, events) = machine(options, CellValue::null());
        assert_eq!(cell.focus(), CellState::Load);
        cell.enter_load(CellValue::text("record-7"));
        assert_eq!(cell.load_complete(), CellState::View);
        assert_eq!(cell.value(), &CellValue::text("record-7"));
        assert!(!cell.is_dirty());
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_disabled_absorbs_focus() {
        let options = CellOptions::new().with_initial_state(CellState::Disabled);
        let (mut cell, events) = machine(options, CellValue::text("a"));
        for _ in 0..5 {
            assert_eq!(cell.focus(), CellState::Disabled);
        }
        assert!(cell.snapshot().is_none());
        assert!(!cell.is_dirty());
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_go_to_from_disabled_to_edit_captures_snapshot() {
        let options = CellOptions::new().with_initial_state(CellState::Disabled);
        let (mut cell, _events) = machine(options, CellValue::text("a"));
        assert_eq!(cell.go_to(CellState::Edit), CellState::Edit);
        cell.set_value(CellValue::text("b"));
        cell.cancel().unwrap();
        assert_eq!(cell.value(), &CellValue::text("a"));
    }

    #[test]
    fn test_go_to_same_state_is_noop() {
        let (mut cell, events) = machine(CellOptions::new(), CellValue::text("a"));
        cell.focus();
        cell.go_to(CellState::Edit);
        assert_eq!(events.borrow().names(), vec!["enteredit"]);
    }

    #[test]
    fn test_go_to_out_of_edit_emits_exitedit() {
        let (mut cell, events) = machine(CellOptions::new(), CellValue::text("a"));
        cell.focus();
        cell.set_value(CellValue::text("b"));
        cell.go_to(CellState::Disabled);
        assert_eq!(events.borrow().names(), vec!["enteredit", "exitedit"]);
        assert!(cell.edit_started_at().is_none());
    }

    #[test]
    fn test_enter_view_twice_stays_clean() {
        let (mut cell, _events) = machine(CellOptions::new(), CellValue::null());
        cell.enter_view(CellValue::text("x"));
        assert!(!cell.is_dirty());
        cell.enter_view(CellValue::text("x"));
        assert!(!cell.is_dirty());
    }

    #[test]
    fn test_enter_view_with_rejects_unsupported_value() {
        let (mut cell, _events) = machine(CellOptions::new(), CellValue::text("keep"));
        let mut bad = std::collections::HashMap::new();
        bad.insert(vec![1u8], 1);
        assert!(cell.enter_view_with(&bad).is_err());
        assert_eq!(cell.value(), &CellValue::text("keep"));
        assert_eq!(cell.state(), CellState::View);

        cell.enter_view_with(&vec!["a", "b"]).unwrap();
        assert_eq!(cell.value(), &CellValue::from(json!(["a", "b"])));
    }

    #[test]
    fn test_reset_discards_edit_silently() {
        let (mut cell, events) = machine(CellOptions::new(), CellValue::text("a"));
        cell.set_error("bad value");
        cell.focus();
        cell.set_value(CellValue::text("b"));
        assert_eq!(cell.reset().unwrap(), CellState::View);
        assert_eq!(cell.value(), &CellValue::text("a"));
        assert_eq!(cell.error(), None);
        assert_eq!(events.borrow().names(), vec!["enteredit", "exitedit"]);
    }

    #[test]
    fn test_formatted_value_uses_injected_renderer() {
        let options = CellOptions::new().with_template("{{ value }} {{unit}}");
        let (cell, _events) = machine(options, CellValue::from(3));
        let renderer = BindingRenderer::new().with_binding("unit", "kg");
        assert_eq!(cell.formatted_value(&renderer), "3 kg");

        let (plain, _events) = machine(CellOptions::new(), CellValue::from(3));
        assert_eq!(plain.formatted_value(&renderer), "3");
    }
}
