// Legacy mask migration
// Old cell configs used `9` as the digit placeholder, optionally behind a
// bracketed display prefix: `[(555) 999-9999]000-0000`.

/// Translate a legacy pattern to the current grammar (`9` -> `0`).
///
/// A leading `[...]` prefix is copied unchanged; only the remainder is
/// translated. Patterns without legacy placeholders come back as-is.
pub fn convert_legacy_mask(legacy: &str) -> String {
    if let Some(rest) = legacy.strip_prefix('[') {
        if let Some(end) = rest.find(']') {
            let (prefix, tail) = rest.split_at(end);
            return format!("[{prefix}]{}", convert_placeholders(&tail[1..]));
        }
    }
    convert_placeholders(legacy)
}

fn convert_placeholders(mask: &str) -> String {
    mask.replace('9', "0")
}
