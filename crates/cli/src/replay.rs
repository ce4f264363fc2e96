//! Headless cell replay: drive a `CellEditor` from a JSON-lines script.
//!
//! Usage: gridcell replay --script session.jsonl [--options cells.toml --column phone]
//!
//! Each script line is one host event (`{"op": "focus"}`, `{"op": "tick",
//! "ms": 250}`, ...). Time is virtual: it starts at zero and only `tick`
//! advances it, so debounce output is reproducible. Every event the cell
//! emits is written as one JSON line, followed by a final `state` line.

use std::collections::BTreeSet;
use std::fmt;
use std::io::{BufRead, Write};
use std::time::{Duration, Instant};

use gridcell_engine::input::{extract_value, FocusEvent, InputEvent, KeyAction, KeyboardEvent};
use gridcell_engine::popup::{ElementId, PopupRegion};
use gridcell_engine::template::BindingRenderer;
use gridcell_engine::{
    CellEditor, CellError, CellEvent, CellOptions, CellState, CellValue, EditorVisibility,
    EventCollector,
};
use serde::{Deserialize, Serialize};

#[derive(Debug)]
pub enum ReplayError {
    Io(String),
    /// A script line is not a valid operation.
    Script { line: usize, message: String },
    Cell(CellError),
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "I/O error: {msg}"),
            Self::Script { line, message } => write!(f, "script line {line}: {message}"),
            Self::Cell(e) => write!(f, "cell error: {e}"),
        }
    }
}

impl std::error::Error for ReplayError {}

impl From<CellError> for ReplayError {
    fn from(e: CellError) -> Self {
        ReplayError::Cell(e)
    }
}

impl From<std::io::Error> for ReplayError {
    fn from(e: std::io::Error) -> Self {
        ReplayError::Io(e.to_string())
    }
}

/// One host event in a replay script.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum ScriptOp {
    Focus,
    Blur {
        #[serde(default, rename = "relatedTarget")]
        related_target: Option<ElementId>,
    },
    Key {
        key: String,
        #[serde(default)]
        shift: bool,
    },
    /// Native input (`value`) or component event (`detail`). Arms the
    /// debounce timer when the cell has one.
    Input {
        #[serde(default)]
        value: Option<String>,
        #[serde(default)]
        detail: Option<CellValue>,
    },
    /// Explicit debounced dispatch, optionally under a custom event name.
    Debounce {
        value: CellValue,
        #[serde(default)]
        event: Option<String>,
    },
    Tick {
        ms: u64,
    },
    Popup {
        root: ElementId,
        #[serde(default)]
        descendants: BTreeSet<ElementId>,
    },
    Open,
    Close,
    View {
        #[serde(default)]
        value: CellValue,
    },
    Load {
        #[serde(default)]
        value: CellValue,
    },
    LoadComplete,
    GoTo {
        state: CellState,
    },
    Submit,
    Cancel,
    Reset,
    Readonly {
        value: bool,
    },
    Disabled {
        value: bool,
    },
    Teardown,
}

/// One line of replay output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EventLine<'a> {
    at: u64,
    event: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<&'a CellValue>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StateLine<'a> {
    at: u64,
    state: CellState,
    visibility: EditorVisibility,
    value: &'a CellValue,
    dirty: bool,
    formatted: String,
}

/// Totals reported after a replay.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplaySummary {
    pub operations: usize,
    pub events: usize,
    pub state: CellState,
}

/// Parse one script line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str, number: usize) -> Result<Option<ScriptOp>, ReplayError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|e| ReplayError::Script {
            line: number,
            message: e.to_string(),
        })
}

struct Replay {
    editor: CellEditor,
    start: Instant,
    elapsed: u64,
}

impl Replay {
    fn now(&self) -> Instant {
        self.start + Duration::from_millis(self.elapsed)
    }

    fn apply(&mut self, op: ScriptOp) -> Result<(), ReplayError> {
        match op {
            ScriptOp::Focus => {
                self.editor.handle_focus_in();
            }
            ScriptOp::Blur { related_target } => {
                let event = FocusEvent { related_target };
                let outcome = self.editor.handle_focus_out(&event);
                log::debug!("blur to {:?}: {:?}", related_target, outcome);
            }
            ScriptOp::Key { key, shift } => {
                let response = self
                    .editor
                    .handle_keyboard(&KeyboardEvent::from_dom(&key, shift))?;
                if let KeyAction::MoveFocus(direction) = response.action {
                    log::info!("host should move focus {:?}", direction);
                }
            }
            ScriptOp::Input { value, detail } => {
                let value = extract_value(&InputEvent {
                    target_value: value,
                    detail,
                });
                self.editor.set_value(value.clone());
                let now = self.now();
                self.editor.debounce_dispatch_at(value, "change", now);
            }
            ScriptOp::Debounce { value, event } => {
                let now = self.now();
                let event = event.as_deref().unwrap_or("change");
                if self.editor.debounce_dispatch_at(value, event, now).is_none() {
                    log::warn!("debounce ignored: cell has no debounce delay");
                }
            }
            ScriptOp::Tick { ms } => {
                self.elapsed += ms;
                let now = self.now();
                self.editor.poll_debounce(now);
            }
            ScriptOp::Popup { root, descendants } => {
                let region = PopupRegion { root, descendants };
                self.editor.add_popup_element(std::rc::Rc::new(region));
            }
            ScriptOp::Open => {
                self.editor.open();
            }
            ScriptOp::Close => {
                self.editor.close();
            }
            ScriptOp::View { value } => self.editor.enter_view(value),
            ScriptOp::Load { value } => self.editor.enter_load(value),
            ScriptOp::LoadComplete => {
                self.editor.load_complete();
            }
            ScriptOp::GoTo { state } => {
                self.editor.go_to(state);
            }
            ScriptOp::Submit => {
                self.editor.submit();
            }
            ScriptOp::Cancel => {
                self.editor.cancel()?;
            }
            ScriptOp::Reset => {
                self.editor.reset()?;
            }
            ScriptOp::Readonly { value } => self.editor.set_readonly(value),
            ScriptOp::Disabled { value } => self.editor.set_disabled(value),
            ScriptOp::Teardown => self.editor.teardown(),
        }
        Ok(())
    }
}

fn write_event<W: Write>(out: &mut W, at: u64, event: &CellEvent) -> Result<(), ReplayError> {
    let line = EventLine {
        at,
        event: event.name(),
        detail: event.value(),
    };
    let json = serde_json::to_string(&line).map_err(|e| ReplayError::Io(e.to_string()))?;
    writeln!(out, "{json}")?;
    Ok(())
}

/// Replay `script` against a fresh editor built from `options`.
pub fn run<R: BufRead, W: Write>(
    script: R,
    options: &CellOptions,
    value: CellValue,
    out: &mut W,
) -> Result<ReplaySummary, ReplayError> {
    let (events, callback) = EventCollector::shared();
    let mut replay = Replay {
        editor: CellEditor::new(options, value, callback),
        start: Instant::now(),
        elapsed: 0,
    };

    let mut operations = 0;
    let mut emitted = 0;

    // Entry actions of the initial state may already have emitted.
    for event in events.borrow_mut().drain() {
        write_event(out, 0, &event)?;
        emitted += 1;
    }

    for (index, line) in script.lines().enumerate() {
        let line = line?;
        let Some(op) = parse_line(&line, index + 1)? else {
            continue;
        };
        log::trace!("op {}: {:?}", index + 1, op);
        replay.apply(op)?;
        operations += 1;

        let drained = events.borrow_mut().drain();
        for event in &drained {
            write_event(out, replay.elapsed, event)?;
        }
        emitted += drained.len();
    }

    let renderer = BindingRenderer::new();
    let state = StateLine {
        at: replay.elapsed,
        state: replay.editor.state(),
        visibility: replay.editor.visibility(),
        value: replay.editor.value(),
        dirty: replay.editor.is_dirty(),
        formatted: replay.editor.formatted_value(&renderer),
    };
    let json = serde_json::to_string(&state).map_err(|e| ReplayError::Io(e.to_string()))?;
    writeln!(out, "{json}")?;

    Ok(ReplaySummary {
        operations,
        events: emitted,
        state: replay.editor.state(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn replay(options: &CellOptions, script: &str) -> Vec<Value> {
        let mut out = Vec::new();
        run(script.as_bytes(), options, CellValue::text("a"), &mut out).unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    fn event_names(lines: &[Value]) -> Vec<&str> {
        lines
            .iter()
            .filter_map(|l| l.get("event").and_then(Value::as_str))
            .collect()
    }

    #[test]
    fn test_parse_line_skips_comments() {
        assert_eq!(parse_line("   ", 1).unwrap(), None);
        assert_eq!(parse_line("# setup", 2).unwrap(), None);
        assert_eq!(parse_line(r#"{"op":"focus"}"#, 3).unwrap(), Some(ScriptOp::Focus));
        assert_eq!(
            parse_line(r#"{"op":"goTo","state":"Editing"}"#, 4).unwrap(),
            Some(ScriptOp::GoTo { state: CellState::Edit })
        );
    }

    #[test]
    fn test_parse_line_reports_line_number() {
        let err = parse_line(r#"{"op":"dance"}"#, 7).unwrap_err();
        assert!(err.to_string().starts_with("script line 7:"));
    }

    #[test]
    fn test_submit_session() {
        let lines = replay(
            &CellOptions::default(),
            r#"{"op":"focus"}
{"op":"input","value":"b"}
{"op":"key","key":"Enter"}"#,
        );
        assert_eq!(event_names(&lines), vec!["enteredit", "change", "exitedit"]);
        assert_eq!(lines[1]["detail"], "b");

        let last = lines.last().unwrap();
        assert_eq!(last["state"], "View");
        assert_eq!(last["dirty"], false);
    }

    #[test]
    fn test_debounce_uses_virtual_clock() {
        let options = CellOptions::new().with_debounce_ms(100);
        let lines = replay(
            &options,
            r#"{"op":"focus"}
{"op":"input","value":"ab"}
{"op":"tick","ms":50}
{"op":"input","value":"abc"}
{"op":"tick","ms":99}
{"op":"tick","ms":1}"#,
        );
        assert_eq!(event_names(&lines), vec!["enteredit", "change"]);
        assert_eq!(lines[1]["detail"], "abc");
        assert_eq!(lines[1]["at"], 150);
    }

    #[test]
    fn test_blur_into_popup_keeps_editing() {
        let lines = replay(
            &CellOptions::default(),
            r#"{"op":"popup","root":10,"descendants":[11]}
{"op":"focus"}
{"op":"blur","relatedTarget":11}
{"op":"key","key":"Escape"}"#,
        );
        assert_eq!(event_names(&lines), vec!["enteredit", "cancel", "exitedit"]);
        assert_eq!(lines[1]["detail"], "a");
    }

    #[test]
    fn test_teardown_drops_pending_change() {
        let options = CellOptions::new().with_debounce_ms(100);
        let lines = replay(
            &options,
            r#"{"op":"debounce","value":"x","event":"preview"}
{"op":"teardown"}
{"op":"tick","ms":500}"#,
        );
        assert!(event_names(&lines).is_empty());
    }

    #[test]
    fn test_custom_debounce_event_name() {
        let options = CellOptions::new().with_debounce_ms(10);
        let lines = replay(
            &options,
            r#"{"op":"debounce","value":{"q":1},"event":"preview"}
{"op":"tick","ms":10}"#,
        );
        assert_eq!(event_names(&lines), vec!["preview"]);
        assert_eq!(lines[0]["detail"]["q"], 1);
    }

    #[test]
    fn test_initial_edit_state_is_reported() {
        let options = CellOptions::new().with_initial_state(CellState::Edit);
        let lines = replay(&options, "");
        assert_eq!(event_names(&lines), vec!["enteredit"]);
        assert_eq!(lines.last().unwrap()["state"], "Edit");
    }
}
