//! MG-002: Schema YAML parsing.
//!
//! Only the document shape is checked here. Structural rules live in
//! `validator`.

use super::error::{Error, Result};
use super::types::SchemaDocument;
use super::validator::check_ident;
use std::path::Path;

/// Parse a schema file from disk.
pub fn parse_schema_file(path: &Path) -> Result<SchemaDocument> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    log::debug!("parsing schema {} ({} bytes)", path.display(), content.len());
    parse_schema(&content)
}

/// Parse a schema document from a string.
pub fn parse_schema(yaml: &str) -> Result<SchemaDocument> {
    Ok(serde_yaml_ng::from_str(yaml)?)
}

/// Datasource name of a schema file: its stem, for `.yaml` / `.yml` files only.
///
/// The stem names the generated Python module, so it must be an identifier.
pub fn datasource_name(path: &Path) -> Result<String> {
    let ext = path.extension().and_then(|e| e.to_str());
    if !matches!(ext, Some("yaml") | Some("yml")) {
        return Err(Error::SchemaExtension(path.to_path_buf()));
    }
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::SchemaExtension(path.to_path_buf()))?;
    check_ident(stem).map_err(|detail| Error::ModuleName {
        path: path.to_path_buf(),
        detail,
    })?;
    Ok(stem.to_string())
}
