use crate::record::MetadataRecord;

/// Extension used whenever the record does not carry a usable one.
pub const DEFAULT_EXTENSION: &str = ".txt";

/// Pick the extension for a recovered file. Never fails; falls back to [`DEFAULT_EXTENSION`].
pub fn detect(record: &MetadataRecord) -> String {
    match record.file_extension.as_deref() {
        Some(ext) if is_well_formed(ext) => ext.to_string(),
        Some(ext) => {
            tracing::debug!(extension = ext, "unusable extension in record, using default");
            DEFAULT_EXTENSION.to_string()
        }
        None => DEFAULT_EXTENSION.to_string(),
    }
}

/// `.` followed by at least one character, with no separators, whitespace or control characters.
pub fn is_well_formed(ext: &str) -> bool {
    let Some(rest) = ext.strip_prefix('.') else {
        return false;
    };
    !rest.is_empty()
        && !rest.starts_with('.')
        && !rest.ends_with('.')
        && !rest
            .chars()
            .any(|c| c == '/' || c == '\\' || c.is_whitespace() || c.is_control())
}
