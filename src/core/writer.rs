//! MG-010: Output files with atomic writes and model module discovery.

use super::error::{Error, Result};
use super::validator::check_ident;
use std::path::Path;

/// Write `text` to `path`, creating parent directories. Writes a temp file and renames it.
pub fn write_output(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    std::fs::write(&tmp_path, text).map_err(|e| Error::io(&tmp_path, e))?;
    if let Err(e) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(Error::io(path, e));
    }
    log::debug!("wrote {} ({} bytes)", path.display(), text.len());
    Ok(())
}

/// Generated model modules in `dir`: `*.py` except `__init__.py`, extension stripped, sorted.
///
/// Files whose stem is not an importable module name are skipped with a warning.
pub fn discover_modules(dir: &Path) -> Result<Vec<String>> {
    let entries = std::fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;

    let mut modules = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("py") {
            continue;
        }
        match path.file_stem().and_then(|s| s.to_str()) {
            Some("__init__") | None => {}
            Some(stem) => match check_ident(stem) {
                Ok(()) => modules.push(stem.to_string()),
                Err(msg) => log::warn!("skipping {}: {}", path.display(), msg),
            },
        }
    }
    modules.sort();
    Ok(modules)
}
