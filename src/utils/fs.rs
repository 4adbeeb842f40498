use std::path::Path;

/// Creates `path` and its parents if missing. Callers map the error to
/// the step that needed the directory.
pub fn ensure_dir_exists(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Removes a directory tree, logging instead of failing.
pub fn remove_dir_best_effort(path: &Path) {
    if !path.exists() {
        return;
    }
    match std::fs::remove_dir_all(path) {
        Ok(()) => log::debug!("Removed directory {}", path.display()),
        Err(e) => log::warn!("Could not remove directory {}: {e}", path.display()),
    }
}

/// Removes a single file, logging instead of failing.
pub fn remove_file_best_effort(path: &Path) {
    if !path.exists() {
        return;
    }
    match std::fs::remove_file(path) {
        Ok(()) => log::debug!("Removed file {}", path.display()),
        Err(e) => log::warn!("Could not remove file {}: {e}", path.display()),
    }
}
