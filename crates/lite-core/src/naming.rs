//! File-name rules shared by packing and recovery.

use std::path::Path;

const MAX_KEY_LEN: usize = 64;

/// Drop `suffix` from the end of `name`, ignoring ASCII case. Names without it come back unchanged.
pub fn strip_container_suffix<'a>(name: &'a str, suffix: &str) -> &'a str {
    if suffix.is_empty() || name.len() < suffix.len() {
        return name;
    }
    let cut = name.len() - suffix.len();
    if name.is_char_boundary(cut) && name[cut..].eq_ignore_ascii_case(suffix) {
        &name[..cut]
    } else {
        name
    }
}

pub fn container_file_name(original: &str, suffix: &str) -> String {
    format!("{original}{suffix}")
}

/// The dotted extension of `name` (`"a.pdf"` → `".pdf"`), if any.
pub fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy())
        .filter(|e| !e.is_empty())
        .map(|e| format!(".{e}"))
}

/// Filesystem-safe, extension-stripped form of `name` used in working-directory names.
pub fn session_key(name: &str) -> String {
    let stem = Path::new(name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let key: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_KEY_LEN)
        .collect();

    let key = key.trim_matches('.');
    if key.is_empty() {
        "session".to_string()
    } else {
        key.to_string()
    }
}

/// Last path component of a client-supplied name, or `None` if nothing usable is left.
pub fn safe_file_name(name: &str) -> Option<String> {
    let last = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = last.chars().filter(|c| !c.is_control()).collect();
    let cleaned = cleaned.trim();
    match cleaned {
        "" | "." | ".." => None,
        other => Some(other.to_string()),
    }
}

/// `<original><extension>`, unless `original` already ends with that extension.
pub fn final_file_name(original: &str, extension: &str) -> String {
    if original
        .to_ascii_lowercase()
        .ends_with(&extension.to_ascii_lowercase())
    {
        original.to_string()
    } else {
        format!("{original}{extension}")
    }
}
