//! Cell editor controller
//!
//! Wraps a [`CellStateMachine`] with the policy shared by every cell variant:
//! - Debounced change delivery (one pending timer per cell, last write wins)
//! - Keyboard routing (Enter / Escape / Tab)
//! - Focus-out that ignores moves into the cell's own popups
//! - Overlay visibility (Hidden / Visible), independent of the lifecycle
//! - Masked text helpers for the configured mask
//!
//! Timers are not run here. `debounce_dispatch` hands back a ticket; the host
//! schedules it on its event loop and calls `fire_debounce` (or polls with
//! `poll_debounce`). Tickets that were superseded, cancelled or outlived a
//! teardown are ignored.

use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::error::CellError;
use crate::events::{CellEvent, EventCallback};
use crate::input::{
    accepts_numeric_key, FocusEvent, FocusMove, FocusOutOutcome, Key, KeyAction, KeyResponse,
    KeyboardEvent,
};
use crate::machine::CellStateMachine;
use crate::options::CellOptions;
use crate::popup::{popup_set, ElementId, PopupElement, PopupElements};
use crate::state::{CellState, EditorVisibility};
use crate::template::TemplateRenderer;
use crate::value::CellValue;

/// Handle for one armed debounce timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceTicket {
    id: u64,
    delay: Duration,
    armed_at: Instant,
}

impl DebounceTicket {
    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn due_at(&self) -> Instant {
        self.armed_at + self.delay
    }
}

#[derive(Debug)]
struct PendingDebounce {
    ticket: DebounceTicket,
    event: CellEvent,
}

pub struct CellEditor {
    cell: CellStateMachine,
    visibility: EditorVisibility,
    initial_visibility: EditorVisibility,
    debounce: Option<Duration>,
    multiline: bool,
    mask: Option<String>,
    popups: PopupElements,
    pending: Option<PendingDebounce>,
    next_ticket: u64,
    alive: bool,
}

impl fmt::Debug for CellEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellEditor")
            .field("cell", &self.cell)
            .field("visibility", &self.visibility)
            .field("debounce", &self.debounce)
            .field("multiline", &self.multiline)
            .field("mask", &self.mask)
            .field("popups", &self.popups.len())
            .field("pending", &self.pending)
            .field("alive", &self.alive)
            .finish()
    }
}

impl CellEditor {
    pub fn new(options: &CellOptions, value: CellValue, on_event: EventCallback) -> Self {
        Self {
            cell: CellStateMachine::new(options, value, on_event),
            visibility: options.editor_initial_state,
            initial_visibility: options.editor_initial_state,
            debounce: options.debounce_delay(),
            multiline: options.multiline,
            mask: options.effective_mask(),
            popups: popup_set(&options.popup_elements),
            pending: None,
            next_ticket: 0,
            alive: true,
        }
    }

    // =========================================================================
    // Lifecycle (forwarded to the state machine)
    // =========================================================================

    pub fn cell(&self) -> &CellStateMachine {
        &self.cell
    }

    pub fn state(&self) -> CellState {
        self.cell.state()
    }

    pub fn value(&self) -> &CellValue {
        self.cell.value()
    }

    pub fn is_dirty(&self) -> bool {
        self.cell.is_dirty()
    }

    pub fn set_value(&mut self, value: CellValue) {
        self.cell.set_value(value);
    }

    pub fn set_readonly(&mut self, readonly: bool) {
        self.cell.set_readonly(readonly);
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.cell.set_disabled(disabled);
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.cell.set_error(message);
    }

    pub fn clear_error(&mut self) {
        self.cell.clear_error();
    }

    pub fn enter_view(&mut self, value: CellValue) {
        self.drive(|cell| cell.enter_view(value));
    }

    pub fn enter_load(&mut self, value: CellValue) {
        self.drive(|cell| cell.enter_load(value));
    }

    pub fn load_complete(&mut self) -> CellState {
        self.drive(CellStateMachine::load_complete)
    }

    pub fn go_to(&mut self, state: CellState) -> CellState {
        self.drive(|cell| cell.go_to(state))
    }

    pub fn submit(&mut self) -> CellState {
        self.drive(CellStateMachine::submit)
    }

    pub fn cancel(&mut self) -> Result<CellState, CellError> {
        self.drive(CellStateMachine::cancel)
    }

    pub fn reset(&mut self) -> Result<CellState, CellError> {
        self.drive(CellStateMachine::reset)
    }

    pub fn formatted_value(&self, renderer: &dyn TemplateRenderer) -> String {
        self.cell.formatted_value(renderer)
    }

    /// Run a state machine action; a lifecycle change cancels the pending timer.
    fn drive<R>(&mut self, action: impl FnOnce(&mut CellStateMachine) -> R) -> R {
        let before = self.cell.state();
        let out = action(&mut self.cell);
        if self.cell.state() != before {
            self.cancel_pending();
        }
        out
    }

    // =========================================================================
    // Debounce
    // =========================================================================

    /// Deliver `value` as `change` once the debounce delay passes.
    ///
    /// Returns `None` when debouncing is off or the editor was torn down; the
    /// state machine's own commit path covers those cells.
    pub fn debounce_dispatch(&mut self, value: CellValue) -> Option<DebounceTicket> {
        self.debounce_dispatch_at(value, "change", Instant::now())
    }

    /// Like [`debounce_dispatch`](Self::debounce_dispatch) under a custom event name.
    pub fn debounce_dispatch_as(&mut self, value: CellValue, event: &str) -> Option<DebounceTicket> {
        self.debounce_dispatch_at(value, event, Instant::now())
    }

    /// Arm the timer as of `now`. Any pending timer is superseded.
    pub fn debounce_dispatch_at(
        &mut self,
        value: CellValue,
        event: &str,
        now: Instant,
    ) -> Option<DebounceTicket> {
        if !self.alive {
            return None;
        }
        let delay = self.debounce?;

        self.next_ticket += 1;
        let ticket = DebounceTicket {
            id: self.next_ticket,
            delay,
            armed_at: now,
        };
        if let Some(previous) = self.pending.take() {
            log::trace!("debounce #{} superseded by #{}", previous.ticket.id, ticket.id);
        }
        self.pending = Some(PendingDebounce {
            ticket,
            event: CellEvent::named(event, value),
        });
        Some(ticket)
    }

    /// Timer callback. Delivers the pending event if `ticket` is still current.
    pub fn fire_debounce(&mut self, ticket: DebounceTicket) -> bool {
        if !self.alive {
            return false;
        }
        match self.pending.take() {
            Some(pending) if pending.ticket == ticket => {
                self.cell.emit(pending.event);
                true
            }
            other => {
                self.pending = other;
                false
            }
        }
    }

    /// Deliver the pending event if it is due at `now`.
    pub fn poll_debounce(&mut self, now: Instant) -> bool {
        match self.pending_debounce() {
            Some(ticket) if now >= ticket.due_at() => self.fire_debounce(ticket),
            _ => false,
        }
    }

    pub fn pending_debounce(&self) -> Option<DebounceTicket> {
        self.pending.as_ref().map(|p| p.ticket)
    }

    pub fn clear_timer(&mut self) {
        self.cancel_pending();
    }

    fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            log::trace!("debounce #{} cancelled", pending.ticket.id);
        }
    }

    // =========================================================================
    // Keyboard and focus
    // =========================================================================

    /// Route a key while editing.
    ///
    /// Outside Edit every key is ignored, Tab included: the response is
    /// [`KeyResponse::IGNORED`] with `prevent_default` false, so a cell in
    /// View never suppresses the host's own Tab navigation.
    pub fn handle_keyboard(&mut self, event: &KeyboardEvent) -> Result<KeyResponse, CellError> {
        if !self.cell.is_editing() {
            return Ok(KeyResponse::IGNORED);
        }
        log::trace!("key {:?} shift={}", event.key, event.shift_key);

        let action = match event.key {
            Key::Enter if !self.multiline => {
                self.submit();
                KeyAction::Submitted
            }
            Key::Escape => {
                self.cancel()?;
                KeyAction::Cancelled
            }
            Key::Tab if event.shift_key => KeyAction::MoveFocus(FocusMove::Backward),
            Key::Tab => KeyAction::MoveFocus(FocusMove::Forward),
            _ => return Ok(KeyResponse::IGNORED),
        };
        Ok(KeyResponse::handled(action))
    }

    pub fn handle_focus_in(&mut self) -> CellState {
        self.drive(CellStateMachine::focus)
    }

    /// Forward a focus-out unless focus moved into one of the cell's popups.
    pub fn handle_focus_out(&mut self, event: &FocusEvent) -> FocusOutOutcome {
        if let Some(target) = event.related_target {
            if self.popup_contains(target) {
                log::debug!("focus-out into popup {target:?} suppressed");
                return FocusOutOutcome::Suppressed;
            }
        }
        self.drive(CellStateMachine::focusout);
        FocusOutOutcome::Forwarded
    }

    /// Numeric cells call this before letting a keystroke through.
    pub fn validate_numeric_input(&self, key: &Key, current: &str, caret: usize) -> bool {
        accepts_numeric_key(key, current, caret)
    }

    // =========================================================================
    // Popups and overlay visibility
    // =========================================================================

    pub fn set_popup_elements(&mut self, elements: PopupElements) {
        self.popups = elements;
    }

    pub fn add_popup_element(&mut self, element: Rc<dyn PopupElement>) {
        self.popups.push(element);
    }

    pub fn popup_contains(&self, target: ElementId) -> bool {
        self.popups.iter().any(|popup| popup.contains(target))
    }

    pub fn visibility(&self) -> EditorVisibility {
        self.visibility
    }

    /// Hidden -> Visible.
    pub fn open(&mut self) -> EditorVisibility {
        if self.visibility == EditorVisibility::Hidden {
            self.visibility = EditorVisibility::Visible;
        }
        self.visibility
    }

    /// Visible -> Hidden.
    pub fn close(&mut self) -> EditorVisibility {
        if self.visibility == EditorVisibility::Visible {
            self.visibility = EditorVisibility::Hidden;
        }
        self.visibility
    }

    pub fn go_to_visibility(&mut self, visibility: EditorVisibility) -> EditorVisibility {
        self.visibility = visibility;
        self.visibility
    }

    // =========================================================================
    // Masked text
    // =========================================================================

    pub fn mask(&self) -> Option<&str> {
        self.mask.as_deref()
    }

    /// Format typed text for display under the cell's mask.
    pub fn display_text(&self, raw: &str) -> String {
        gridcell_mask::apply_mask(raw, self.mask())
    }

    /// Strip the cell's mask from displayed text.
    pub fn raw_text(&self, masked: &str) -> String {
        gridcell_mask::extract_raw_value(masked, self.mask())
    }

    pub fn is_input_complete(&self, masked: &str) -> bool {
        gridcell_mask::is_mask_complete(masked, self.mask())
    }

    // =========================================================================
    // Teardown
    // =========================================================================

    /// Call when the cell is discarded. Pending timers are dropped and any
    /// ticket fired afterwards is ignored.
    pub fn teardown(&mut self) {
        self.cancel_pending();
        self.visibility = self.initial_visibility;
        self.alive = false;
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }
}
