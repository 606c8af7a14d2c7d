//! MG-013: CLI subcommands (init, validate, generate, meta).

use crate::core::error::{Error, Result, ValidationError};
use crate::core::pipeline::{self, GenerateRequest};
use crate::core::typemap::TypeRegistry;
use crate::core::types::Target;
use crate::core::{parser, project, validator};
use clap::Subcommand;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new modelgen project (example schema, Alembic skeleton, marker)
    Init {
        /// New or empty directory to initialize
        path: PathBuf,
    },

    /// Validate a schema file without generating code
    Validate {
        /// Path to the schema YAML
        #[arg(short, long)]
        file: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate a model module from a schema file
    Generate {
        /// Path to the schema YAML (.yaml or .yml)
        #[arg(short, long)]
        file: PathBuf,

        /// Output profile: sqlalchemy or flask (default: project setting)
        #[arg(short, long)]
        target: Option<String>,

        /// Also write the Alembic metadata module
        #[arg(long)]
        alembic: bool,

        /// Project directory
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },

    /// Regenerate the Alembic metadata module from existing model modules
    Meta {
        /// Project directory
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },
}

/// Install the env_logger backend. `RUST_LOG` wins over `-v`.
pub fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_target(false)
        .format_timestamp(None)
        .try_init();
}

/// Dispatch a CLI command.
pub fn dispatch(cmd: Commands) -> Result<()> {
    let types = TypeRegistry::new();
    match cmd {
        Commands::Init { path } => cmd_init(&path),
        Commands::Validate { file, json } => cmd_validate(&file, json, &types),
        Commands::Generate {
            file,
            target,
            alembic,
            dir,
        } => cmd_generate(&dir, &file, target.as_deref(), alembic, &types),
        Commands::Meta { dir } => cmd_meta(&dir),
    }
}

fn cmd_init(path: &Path) -> Result<()> {
    let created = project::init(path)?;
    println!("Initialized modelgen project at {}", path.display());
    for p in &created {
        println!("  Created: {}", p.display());
    }
    Ok(())
}

#[derive(Serialize)]
struct ValidationReport<'a> {
    file: String,
    ok: bool,
    violations: &'a [crate::core::error::Violation],
}

fn cmd_validate(file: &Path, json: bool, types: &TypeRegistry) -> Result<()> {
    let doc = parser::parse_schema_file(file)?;
    let violations = validator::collect_violations(&doc, types);

    if json {
        let report = ValidationReport {
            file: file.display().to_string(),
            ok: violations.is_empty(),
            violations: &violations,
        };
        let out = serde_json::to_string_pretty(&report).map_err(|e| Error::Config {
            path: file.to_path_buf(),
            detail: e.to_string(),
        })?;
        println!("{}", out);
    }

    if !violations.is_empty() {
        return Err(Error::Validation(ValidationError { violations }));
    }

    let schema = pipeline::prepare(&doc, types)?;
    if !json {
        println!(
            "OK: {} ({} tables, {} columns)",
            file.display(),
            schema.tables.len(),
            schema.column_count()
        );
    }
    Ok(())
}

fn cmd_generate(
    dir: &Path,
    file: &Path,
    target: Option<&str>,
    alembic: bool,
    types: &TypeRegistry,
) -> Result<()> {
    let target = target.map(str::parse::<Target>).transpose()?;
    let req = GenerateRequest {
        project_dir: dir,
        schema: file,
        target,
        alembic,
    };
    let report = pipeline::generate(&req, types)?;

    println!(
        "Generated {} ({} target, {} tables, {} columns)",
        report.model_path.display(),
        report.target,
        report.summary.tables,
        report.summary.columns
    );
    if let Some(meta) = &report.metadata_path {
        println!("Generated {}", meta.display());
    }
    Ok(())
}

fn cmd_meta(dir: &Path) -> Result<()> {
    let config = project::load_config(dir)?;
    let path = pipeline::write_metadata(dir, &config)?;
    println!("Generated {}", path.display());
    Ok(())
}
