//! Masked text entry for grid cells.
//!
//! Pure conversions between a raw value and its formatted representation.
//! A missing, empty or malformed pattern always means "no masking": raw and
//! formatted text are identical and nothing is ever rejected.

pub mod legacy;
pub mod pattern;
pub mod presets;

pub use legacy::convert_legacy_mask;
pub use pattern::{MaskError, MaskPattern, Slot, Token};
pub use presets::{mask_from_preset, MaskPreset};

/// Compile a pattern, treating absent and malformed patterns as no mask.
fn compile(pattern: Option<&str>) -> Option<MaskPattern> {
    let pattern = pattern?;
    match MaskPattern::parse(pattern) {
        Ok(mask) => Some(mask),
        Err(MaskError::Empty) => None,
        Err(e) => {
            log::debug!("ignoring mask pattern {pattern:?}: {e}");
            None
        }
    }
}

/// Format `raw` for display under `pattern`.
pub fn apply_mask(raw: &str, pattern: Option<&str>) -> String {
    if raw.is_empty() {
        return String::new();
    }
    match compile(pattern) {
        Some(mask) => mask.apply(raw),
        None => raw.to_string(),
    }
}

/// Inverse of [`apply_mask`]: the characters that landed in placeholders.
pub fn extract_raw_value(masked: &str, pattern: Option<&str>) -> String {
    if masked.is_empty() {
        return String::new();
    }
    match compile(pattern) {
        Some(mask) => mask.extract(masked),
        None => masked.to_string(),
    }
}

/// True only when every placeholder of `pattern` is filled by `value`.
pub fn is_mask_complete(value: &str, pattern: Option<&str>) -> bool {
    if value.is_empty() {
        return false;
    }
    compile(pattern).is_some_and(|mask| mask.is_complete(value))
}

/// Display position of the first placeholder after `current`.
pub fn next_placeholder_position(current: usize, pattern: Option<&str>) -> Option<usize> {
    compile(pattern)?.next_placeholder_after(current)
}

/// Pattern rendered with every placeholder replaced by `fill`, e.g. `(___) ___-____`.
pub fn placeholder_template(pattern: Option<&str>, fill: char) -> String {
    compile(pattern)
        .map(|mask| mask.placeholder_template(fill))
        .unwrap_or_default()
}
