//! MG-011: Project layout, the `.modelgen` marker and `init` scaffolding.
//!
//! The marker file flags an initialized project and doubles as its config.
//! An empty marker is valid and means "all defaults".

use super::error::{Error, Result};
use super::types::Target;
use super::validator::check_ident;
use super::writer::write_output;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

pub const MARKER_FILE: &str = ".modelgen";

const EXAMPLE_SCHEMA: &str = include_str!("../assets/example.yaml");
const ALEMBIC_INI: &str = include_str!("../assets/alembic.ini");
const ALEMBIC_ENV: &str = include_str!("../assets/env.py");
const ALEMBIC_SCRIPT: &str = include_str!("../assets/script.py.mako");
const ALEMBIC_README: &str = include_str!("../assets/README");

/// Per-project settings stored in the marker file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Where schema YAML files live
    #[serde(default = "default_templates_dir")]
    pub templates_dir: PathBuf,

    /// Where model modules are written (also the import package name)
    #[serde(default = "default_models_dir")]
    pub models_dir: PathBuf,

    /// Where the Alembic aggregation module is written
    #[serde(default = "default_metadata_dir")]
    pub metadata_dir: PathBuf,

    /// Target used when the command line does not pick one
    #[serde(default)]
    pub target: Target,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            templates_dir: default_templates_dir(),
            models_dir: default_models_dir(),
            metadata_dir: default_metadata_dir(),
            target: Target::default(),
        }
    }
}

fn default_templates_dir() -> PathBuf {
    PathBuf::from("templates")
}

fn default_models_dir() -> PathBuf {
    PathBuf::from("models")
}

fn default_metadata_dir() -> PathBuf {
    PathBuf::from("metadata")
}

impl ProjectConfig {
    /// Dotted Python package the aggregation module imports models from.
    ///
    /// `models_dir` must be relative, stay inside the project and consist of
    /// identifier components: `app/models` becomes `app.models`.
    pub fn models_package(&self) -> Result<String> {
        let invalid = |detail: String| Error::Config {
            path: PathBuf::from(MARKER_FILE),
            detail: format!("models_dir '{}' {}", self.models_dir.display(), detail),
        };

        let mut parts = Vec::new();
        for component in self.models_dir.components() {
            match component {
                Component::Normal(part) => {
                    let part = part
                        .to_str()
                        .ok_or_else(|| invalid("is not valid UTF-8".to_string()))?;
                    check_ident(part).map_err(|msg| invalid(format!("is not a package path: {}", msg)))?;
                    parts.push(part);
                }
                Component::CurDir => {}
                Component::ParentDir => {
                    return Err(invalid("must not leave the project directory".to_string()))
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(invalid("must be relative to the project directory".to_string()))
                }
            }
        }

        if parts.is_empty() {
            return Err(invalid("must name a directory".to_string()));
        }
        Ok(parts.join("."))
    }
}

/// Path of the marker file in a project directory.
pub fn marker_path(dir: &Path) -> PathBuf {
    dir.join(MARKER_FILE)
}

/// Fail unless `dir` holds a marker file.
pub fn require_marker(dir: &Path) -> Result<()> {
    if marker_path(dir).is_file() {
        Ok(())
    } else {
        Err(Error::NotInitialized(dir.to_path_buf()))
    }
}

/// Load the project config from the marker file.
pub fn load_config(dir: &Path) -> Result<ProjectConfig> {
    require_marker(dir)?;
    let path = marker_path(dir);
    let content = std::fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
    if content.trim().is_empty() {
        return Ok(ProjectConfig::default());
    }
    let config: ProjectConfig = serde_yaml_ng::from_str(&content).map_err(|e| Error::Config {
        path,
        detail: e.to_string(),
    })?;
    config.models_package()?;
    Ok(config)
}

/// Scaffold a new project. Returns the files created, in creation order.
///
/// The directory must be new or empty.
pub fn init(dir: &Path) -> Result<Vec<PathBuf>> {
    if is_occupied(dir)? {
        return Err(Error::AlreadyExists(dir.to_path_buf()));
    }

    let config = ProjectConfig::default();
    let alembic = dir.join("alembic_migrate");
    let files = [
        (dir.join("alembic.ini"), ALEMBIC_INI.to_string()),
        (alembic.join("env.py"), ALEMBIC_ENV.to_string()),
        (alembic.join("script.py.mako"), ALEMBIC_SCRIPT.to_string()),
        (alembic.join("README"), ALEMBIC_README.to_string()),
        (
            dir.join(&config.templates_dir).join("example.yaml"),
            EXAMPLE_SCHEMA.to_string(),
        ),
        (marker_path(dir), marker_contents(&config)?),
    ];

    let mut created = Vec::with_capacity(files.len() + 1);
    for (path, text) in files {
        log::info!("creating {}", path.display());
        write_output(&path, &text)?;
        created.push(path);
    }

    let versions = alembic.join("versions");
    std::fs::create_dir_all(&versions).map_err(|e| Error::io(&versions, e))?;
    created.push(versions);

    Ok(created)
}

fn is_occupied(dir: &Path) -> Result<bool> {
    if !dir.exists() {
        return Ok(false);
    }
    if !dir.is_dir() {
        return Ok(true);
    }
    let mut entries = std::fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
    Ok(entries.next().is_some())
}

fn marker_contents(config: &ProjectConfig) -> Result<String> {
    let yaml = serde_yaml_ng::to_string(config).map_err(|e| Error::Config {
        path: PathBuf::from(MARKER_FILE),
        detail: e.to_string(),
    })?;
    Ok(format!("# modelgen project settings\n{}", yaml))
}
