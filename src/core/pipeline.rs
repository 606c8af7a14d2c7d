//! MG-012: Generation pipeline: load → validate → resolve → render → write.

use super::codegen;
use super::error::Result;
use super::parser;
use super::project::{self, ProjectConfig};
use super::resolver;
use super::typemap::TypeRegistry;
use super::types::{ResolvedSchema, SchemaDocument, Target};
use super::validator;
use super::writer;
use std::path::{Path, PathBuf};

/// Inputs for one `generate` run.
#[derive(Debug, Clone)]
pub struct GenerateRequest<'a> {
    /// Initialized project directory
    pub project_dir: &'a Path,
    /// Schema YAML, absolute or relative to the project directory
    pub schema: &'a Path,
    /// Overrides the target in the project config
    pub target: Option<Target>,
    /// Also write the Alembic aggregation module
    pub alembic: bool,
}

/// What a `generate` run produced.
#[derive(Debug, Clone)]
pub struct GenerateReport {
    pub datasource: String,
    pub target: Target,
    pub model_path: PathBuf,
    pub metadata_path: Option<PathBuf>,
    pub summary: SchemaSummary,
}

/// Size of a resolved schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaSummary {
    pub tables: usize,
    pub columns: usize,
}

impl SchemaSummary {
    fn of(schema: &ResolvedSchema) -> Self {
        Self {
            tables: schema.tables.len(),
            columns: schema.column_count(),
        }
    }
}

/// Validate then resolve a parsed document. No partial result on failure.
pub fn prepare(doc: &SchemaDocument, types: &TypeRegistry) -> Result<ResolvedSchema> {
    validator::validate(doc, types)?;
    resolver::resolve(doc)
}

/// Parse, validate and resolve a schema file without writing anything.
pub fn check(schema: &Path, types: &TypeRegistry) -> Result<SchemaSummary> {
    let doc = parser::parse_schema_file(schema)?;
    let resolved = prepare(&doc, types)?;
    Ok(SchemaSummary::of(&resolved))
}

/// Run a full generation into an initialized project.
pub fn generate(req: &GenerateRequest<'_>, types: &TypeRegistry) -> Result<GenerateReport> {
    let config = project::load_config(req.project_dir)?;
    let target = req.target.unwrap_or(config.target);

    let schema_path = locate_schema(req.project_dir, &config, req.schema);
    let datasource = parser::datasource_name(&schema_path)?;
    log::info!("generating {} models for '{}' from {}", target, datasource, schema_path.display());

    let doc = parser::parse_schema_file(&schema_path)?;
    let resolved = prepare(&doc, types)?;
    let source = codegen::render(&resolved, target, types)?;

    let model_path = req
        .project_dir
        .join(&config.models_dir)
        .join(format!("{}.py", datasource));
    writer::write_output(&model_path, &source)?;
    log::info!("wrote {}", model_path.display());

    let metadata_path = if req.alembic {
        Some(write_metadata(req.project_dir, &config)?)
    } else {
        None
    };

    Ok(GenerateReport {
        datasource,
        target,
        model_path,
        metadata_path,
        summary: SchemaSummary::of(&resolved),
    })
}

/// Regenerate `<metadata_dir>/__init__.py` from the model modules on disk.
pub fn write_metadata(project_dir: &Path, config: &ProjectConfig) -> Result<PathBuf> {
    let models_dir = project_dir.join(&config.models_dir);
    let modules = writer::discover_modules(&models_dir)?;
    log::debug!("aggregating {} model module(s) from {}", modules.len(), models_dir.display());

    let source = codegen::render_metadata(&config.models_package()?, &modules);
    let path = project_dir.join(&config.metadata_dir).join("__init__.py");
    writer::write_output(&path, &source)?;
    log::info!("wrote {}", path.display());
    Ok(path)
}

/// Schema path as given, or `<templates_dir>/<file name>` when that is where it lives.
fn locate_schema(project_dir: &Path, config: &ProjectConfig, schema: &Path) -> PathBuf {
    let direct = project_dir.join(schema);
    if direct.exists() {
        return direct;
    }
    match schema.file_name() {
        Some(name) => {
            let in_templates = project_dir.join(&config.templates_dir).join(name);
            if in_templates.exists() {
                in_templates
            } else {
                direct
            }
        }
        None => direct,
    }
}
