use std::path::{Component, Path, PathBuf};

#[derive(Debug, PartialEq, Eq)]
pub enum ResolveError {
    NotFound,
    Forbidden,
    BadPath,
}

const INDEX_FILE: &str = "index.html";

/// Map a request path onto a file under `base_dir`.
///
/// Directories resolve to their `index.html`. With `spa_fallback`, unknown
/// paths whose last segment has no extension resolve to the root `index.html`
/// so client-side routes survive a reload.
pub fn resolve_static_path(
    base_dir: &Path,
    request_path: &str,
    spa_fallback: bool,
) -> Result<PathBuf, ResolveError> {
    match resolve_file(base_dir, request_path) {
        Err(ResolveError::NotFound) if spa_fallback && looks_like_route(request_path) => {
            let index = base_dir.join(INDEX_FILE);
            if index.is_file() {
                Ok(index)
            } else {
                Err(ResolveError::NotFound)
            }
        }
        other => other,
    }
}

fn resolve_file(base_dir: &Path, request_path: &str) -> Result<PathBuf, ResolveError> {
    if !request_path.starts_with('/') {
        return Err(ResolveError::BadPath);
    }

    // Percent-decode ONCE
    let decoded = percent_encoding::percent_decode_str(request_path)
        .decode_utf8()
        .map_err(|_| ResolveError::BadPath)?;

    let decoded = decoded.trim_start_matches('/');

    let relative_path = if decoded.is_empty() {
        PathBuf::from(INDEX_FILE)
    } else {
        PathBuf::from(decoded)
    };

    // No traversal, no absolute paths
    for component in relative_path.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            _ => return Err(ResolveError::Forbidden),
        }
    }

    let base_canon = base_dir
        .canonicalize()
        .map_err(|_| ResolveError::Forbidden)?;

    let target_canon = base_dir
        .join(&relative_path)
        .canonicalize()
        .map_err(|_| ResolveError::NotFound)?;

    // Enforce containment (symlinks pointing outside the root)
    if !target_canon.starts_with(&base_canon) {
        return Err(ResolveError::Forbidden);
    }

    if target_canon.is_dir() {
        let index_path = target_canon.join(INDEX_FILE);
        if index_path.is_file() {
            return Ok(index_path);
        }
        return Err(ResolveError::NotFound);
    }

    if !target_canon.is_file() {
        return Err(ResolveError::NotFound);
    }

    Ok(target_canon)
}

fn looks_like_route(request_path: &str) -> bool {
    let last = request_path.rsplit('/').next().unwrap_or_default();
    !last.contains('.')
}
