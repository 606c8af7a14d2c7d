//! MG-000: Error taxonomy for the generation pipeline.
//!
//! Every error here is fatal to the current run. Variants carry the
//! table/column identifiers needed to locate the fault in the schema.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error as ThisError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("schema parse error: {0}")]
    Parse(#[from] serde_yaml_ng::Error),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("unknown type '{logical_type}' for {target} (table '{table}', column '{column}')")]
    UnknownType {
        target: String,
        table: String,
        column: String,
        logical_type: String,
    },

    #[error("unsupported target '{0}' (expected sqlalchemy or flask)")]
    UnsupportedTarget(String),

    #[error("{}: schema file must end in .yaml or .yml", .0.display())]
    SchemaExtension(PathBuf),

    #[error("{}: cannot be used as a Python module name: {detail}", .path.display())]
    ModuleName { path: PathBuf, detail: String },

    #[error(
        "modelgen is not initialized in {}; run `modelgen init <dir>` or execute commands from the project directory",
        .0.display()
    )]
    NotInitialized(PathBuf),

    #[error("{} already exists; choose a new project directory", .0.display())]
    AlreadyExists(PathBuf),

    #[error("invalid project config {}: {detail}", .path.display())]
    Config { path: PathBuf, detail: String },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

///
/// ResolutionError
/// Raised when an inheritance reference cannot be materialized.
///

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum ResolutionError {
    #[error("table '{table}' inherits from unknown table '{target}'")]
    MissingTarget { table: String, target: String },

    #[error(
        "table '{table}' inherits from '{target}', which itself inherits from '{next}'; only single-hop inheritance is supported"
    )]
    ChainedInheritance {
        table: String,
        target: String,
        next: String,
    },

    #[error("table '{table}' has neither columns nor inherit_from")]
    NoColumns { table: String },

    #[error("table '{table}' declares both columns and inherit_from")]
    AmbiguousDefinition { table: String },
}

///
/// Violation
/// One structural rule broken by the schema document.
///

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub table: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    pub message: String,
}

impl Violation {
    pub fn document(message: impl Into<String>) -> Self {
        Self {
            table: None,
            column: None,
            message: message.into(),
        }
    }

    pub fn table(table: &str, message: impl Into<String>) -> Self {
        Self {
            table: Some(table.to_string()),
            column: None,
            message: message.into(),
        }
    }

    pub fn column(table: &str, column: &str, message: impl Into<String>) -> Self {
        Self {
            table: Some(table.to_string()),
            column: Some(column.to_string()),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.table, &self.column) {
            (Some(t), Some(c)) => write!(f, "table '{}', column '{}': {}", t, c, self.message),
            (Some(t), None) => write!(f, "table '{}': {}", t, self.message),
            _ => write!(f, "{}", self.message),
        }
    }
}

///
/// ValidationError
/// Every violation found in one pass over the document.
///

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation error(s)", self.violations.len())?;
        for v in &self.violations {
            write!(f, "\n  - {}", v)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mg000_violation_display() {
        let v = Violation::column("orders", "total", "unknown type 'money'");
        assert_eq!(
            v.to_string(),
            "table 'orders', column 'total': unknown type 'money'"
        );
        let v = Violation::table("orders", "has no columns");
        assert_eq!(v.to_string(), "table 'orders': has no columns");
        assert_eq!(
            Violation::document("no tables").to_string(),
            "no tables"
        );
    }

    #[test]
    fn test_mg000_validation_error_lists_all() {
        let err = ValidationError {
            violations: vec![
                Violation::table("a", "first"),
                Violation::table("b", "second"),
            ],
        };
        let text = err.to_string();
        assert!(text.starts_with("2 validation error(s)"));
        assert!(text.contains("table 'a': first"));
        assert!(text.contains("table 'b': second"));
    }

    #[test]
    fn test_mg000_violation_json() {
        let v = Violation::table("a", "oops");
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, r#"{"table":"a","message":"oops"}"#);
    }

    #[test]
    fn test_mg000_resolution_chain_message() {
        let e = ResolutionError::ChainedInheritance {
            table: "c".into(),
            target: "b".into(),
            next: "a".into(),
        };
        assert!(e.to_string().contains("single-hop"));
    }
}
