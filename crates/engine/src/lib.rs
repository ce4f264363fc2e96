//! `gridcell-engine`: interaction core for editable grid cells.
//!
//! Pure library: the host feeds DOM-style events in and receives cell events
//! through a callback. No rendering, no data fetching.

pub mod editor;
pub mod error;
pub mod events;
pub mod input;
pub mod machine;
pub mod options;
pub mod popup;
pub mod state;
pub mod template;
pub mod value;

#[cfg(test)]
pub mod harness;

pub use editor::{CellEditor, DebounceTicket};
pub use error::CellError;
pub use events::{CellEvent, EventCallback, EventCollector};
pub use machine::CellStateMachine;
pub use options::CellOptions;
pub use state::{CellState, EditorVisibility};
pub use value::CellValue;
