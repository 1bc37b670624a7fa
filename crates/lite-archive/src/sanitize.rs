use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Result of sanitizing a container entry path.
#[derive(Clone, Debug)]
pub struct SanitizedPath {
    pub original: PathBuf,
    pub resolved: PathBuf,
}

/// Resolve an entry name under `base`, rejecting anything that would land outside it.
pub fn sanitize_path<P: AsRef<Path>, B: AsRef<Path>>(
    entry_path: P,
    base: B,
) -> Result<SanitizedPath> {
    let entry_path = entry_path.as_ref();
    let base = base.as_ref();

    if entry_path.as_os_str().is_empty() || entry_path.to_string_lossy().contains('\0') {
        return Err(Error::InvalidPath);
    }

    let normalized = normalize_path(entry_path);

    // Reject absolute paths (zip-slip protection)
    if normalized.is_absolute() || normalized.has_root() {
        return Err(Error::ZipSlip {
            entry: entry_path.to_path_buf(),
            resolved: normalized,
        });
    }

    // `..` is only allowed while it stays inside the entry's own path
    if escapes(entry_path) {
        return Err(Error::ZipSlip {
            entry: entry_path.to_path_buf(),
            resolved: base.join(&normalized),
        });
    }

    let resolved = normalize_path(&base.join(normalized));

    if !resolved.starts_with(normalize_path(base)) {
        return Err(Error::ZipSlip {
            entry: entry_path.to_path_buf(),
            resolved,
        });
    }

    Ok(SanitizedPath {
        original: entry_path.to_path_buf(),
        resolved,
    })
}

fn escapes(path: &Path) -> bool {
    let mut depth = 0usize;
    for component in path.components() {
        match component {
            Component::ParentDir => {
                if depth == 0 {
                    return true;
                }
                depth -= 1;
            }
            Component::Normal(_) => depth += 1,
            _ => {}
        }
    }
    false
}

/// Normalize path separators and resolve relative components.
fn normalize_path(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();

    for component in path.components() {
        match component {
            Component::ParentDir => {
                result.pop();
            }
            Component::Normal(part) => {
                // zip names always use '/', but Windows-made archives sometimes carry '\'
                for piece in part.to_string_lossy().split('\\').filter(|p| !p.is_empty()) {
                    result.push(piece);
                }
            }
            Component::RootDir => result.push("/"),
            Component::Prefix(prefix) => result.push(prefix.as_os_str()),
            Component::CurDir => {}
        }
    }

    result
}
