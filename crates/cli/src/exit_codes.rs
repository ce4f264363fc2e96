//! CLI exit codes.
//!
//! | Code | Meaning                                   |
//! |------|-------------------------------------------|
//! | 0    | Success                                   |
//! | 1    | `mask check`: value is not complete       |
//! | 2    | Usage error (bad args, unknown preset)    |
//! | 3    | I/O error reading a script or profile     |
//! | 4    | Parse error in a script or profile        |
//! | 5    | Cell error during replay                  |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Masked value is missing placeholders. Like `test(1)`, 1 means "no".
pub const EXIT_INCOMPLETE: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

pub const EXIT_IO: u8 = 3;

pub const EXIT_PARSE: u8 = 4;

/// A cell operation failed (e.g. a snapshot could not be restored).
pub const EXIT_CELL: u8 = 5;
