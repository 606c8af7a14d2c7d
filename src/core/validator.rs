//! MG-004: Structural validation of a schema document.
//!
//! Runs before resolution and collects every violation in document order:
//! - At least one table
//! - Table and column names are usable Python identifiers that do not
//!   shadow names the generated module defines
//! - Exactly one of `columns` / `inherit_from`, single-hop only
//! - Columns carry a name and a type known to every target
//! - `length`, flags and `extra_params` are well-typed
//! - Foreign keys point at an existing `table.column`

use super::error::{ValidationError, Violation};
use super::resolver::{parse_flag, parse_length, source_columns};
use super::typemap::TypeRegistry;
use super::types::*;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

static IDENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid")
});

const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

/// Module-level names of the generated model modules, besides type constructors.
const MODULE_NAMES: &[&str] = &[
    "Base", "Column", "ForeignKey", "SQLAlchemy", "db", "declarative_base", "metadata",
];

/// Class attributes the ORM base classes already define.
const CLASS_ATTRIBUTES: &[&str] = &["__tablename__", "metadata", "query"];

/// Validate a parsed schema document against the type registry.
pub fn validate(doc: &SchemaDocument, types: &TypeRegistry) -> Result<(), ValidationError> {
    let violations = collect_violations(doc, types);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { violations })
    }
}

/// Every violation in the document. Empty means valid.
pub fn collect_violations(doc: &SchemaDocument, types: &TypeRegistry) -> Vec<Violation> {
    let mut errors = Vec::new();

    if doc.tables.is_empty() {
        errors.push(Violation::document("schema declares no tables"));
        return errors;
    }

    let known = known_columns(doc);

    for (table, spec) in &doc.tables {
        if let Err(msg) = check_ident(table) {
            errors.push(Violation::table(table, format!("table name {}", msg)));
        } else if MODULE_NAMES.contains(&table.as_str()) || types.is_constructor(table) {
            errors.push(Violation::table(
                table,
                format!("table name '{}' shadows a name of the generated module", table),
            ));
        }

        if spec.inherit_from.is_none() && spec.columns.as_ref().is_some_and(|c| c.is_empty()) {
            errors.push(Violation::table(table, "columns list is empty"));
        } else if let Err(e) = source_columns(doc, table, spec) {
            errors.push(Violation::table(table, e.to_string()));
        }

        if let Some(columns) = &spec.columns {
            validate_columns(table, columns, &known, types, &mut errors);
        }

        validate_extra_params(table, &spec.extra_params, &mut errors);
    }

    errors
}

fn validate_columns(
    table: &str,
    columns: &[ColumnSpec],
    known: &HashMap<&str, HashSet<&str>>,
    types: &TypeRegistry,
    errors: &mut Vec<Violation>,
) {
    let mut seen = HashSet::new();

    for (idx, col) in columns.iter().enumerate() {
        let label = match col.name.as_deref().filter(|n| !n.is_empty()) {
            Some(name) => {
                if !seen.insert(name) {
                    errors.push(Violation::column(table, name, "duplicate column name"));
                }
                if let Err(msg) = check_ident(name) {
                    errors.push(Violation::column(table, name, format!("column name {}", msg)));
                } else if CLASS_ATTRIBUTES.contains(&name) {
                    errors.push(Violation::column(
                        table,
                        name,
                        format!("column name '{}' shadows a model class attribute", name),
                    ));
                }
                name.to_string()
            }
            None => {
                let label = format!("#{}", idx + 1);
                errors.push(Violation::column(table, &label, "column has no name"));
                label
            }
        };
        let mut fail = |msg: String| errors.push(Violation::column(table, &label, msg));

        match col.column_type.as_deref() {
            None => fail("column has no type".to_string()),
            Some(ty) if !types.supports_everywhere(ty) => fail(format!(
                "unknown type '{}' (supported: {})",
                ty,
                types.common_types().join(", ")
            )),
            Some(_) => {}
        }

        if let Some(Err(msg)) = col.length.as_ref().map(parse_length) {
            fail(msg);
        }

        if let Some(fk) = col.foreign_key.as_deref() {
            match ForeignKey::parse(fk) {
                None => fail(format!("foreign_key '{}' must be 'table.column'", fk)),
                Some(target) => match known.get(target.table.as_str()) {
                    None => fail(format!(
                        "foreign_key '{}' references unknown table '{}'",
                        fk, target.table
                    )),
                    Some(cols) if !cols.contains(target.column.as_str()) => fail(format!(
                        "foreign_key '{}' references unknown column '{}' in table '{}'",
                        fk, target.column, target.table
                    )),
                    Some(_) => {}
                },
            }
        }

        for (key, val) in [
            ("primary_key", col.primary_key.as_ref()),
            ("unique", col.unique.as_ref()),
            ("nullable", col.nullable.as_ref()),
        ] {
            if let Err(msg) = parse_flag(key, val) {
                fail(msg);
            }
        }
    }
}

fn validate_extra_params(table: &str, params: &[ExtraParamSpec], errors: &mut Vec<Violation>) {
    for param in params {
        let Some(name) = param.name.as_deref().filter(|n| !n.is_empty()) else {
            errors.push(Violation::table(table, "extra_params entry has no name"));
            continue;
        };
        if let Err(msg) = check_ident(name) {
            errors.push(Violation::table(
                table,
                format!("extra_params name {}", msg),
            ));
        }
        if param.value.as_ref().and_then(yaml_value_to_python).is_none() {
            errors.push(Violation::table(
                table,
                format!("extra_params '{}' needs a scalar value", name),
            ));
        }
    }
}

/// Column names per table, following inheritance one hop where it is valid.
fn known_columns(doc: &SchemaDocument) -> HashMap<&str, HashSet<&str>> {
    doc.tables
        .iter()
        .map(|(name, spec)| {
            let cols = source_columns(doc, name, spec)
                .unwrap_or_default()
                .iter()
                .filter_map(|c| c.name.as_deref())
                .collect();
            (name.as_str(), cols)
        })
        .collect()
}

/// A usable Python identifier: matches the identifier pattern and is not a keyword.
pub(crate) fn check_ident(name: &str) -> Result<(), String> {
    if !IDENT.is_match(name) {
        return Err(format!("'{}' is not a valid identifier", name));
    }
    if PYTHON_KEYWORDS.contains(&name) {
        return Err(format!("'{}' is a reserved word", name));
    }
    Ok(())
}
