//! MG-003: Inheritance resolution.
//!
//! Replaces every `inherit_from` reference with a by-value copy of the
//! referenced table's explicit columns. Resolution is single-hop: a reference
//! to a table that is itself a reference fails, which also rules out
//! self-references and cycles without any graph walk.

use super::error::{Error, ResolutionError, Result, ValidationError, Violation};
use super::types::*;
use indexmap::IndexMap;

/// Resolve a schema document into fully materialized tables.
pub fn resolve(doc: &SchemaDocument) -> Result<ResolvedSchema> {
    let mut tables = IndexMap::with_capacity(doc.tables.len());
    let mut violations = Vec::new();

    for (name, spec) in &doc.tables {
        let source = source_columns(doc, name, spec)?;
        if let Some(target) = &spec.inherit_from {
            log::debug!("table '{}' inherits {} column(s) from '{}'", name, source.len(), target);
        }

        let mut columns = Vec::with_capacity(source.len());
        for col in source {
            match lower_column(name, col) {
                Ok(c) => columns.push(c),
                Err(v) => violations.push(v),
            }
        }

        let mut extra_params = Vec::with_capacity(spec.extra_params.len());
        for param in &spec.extra_params {
            match lower_extra_param(name, param) {
                Ok(p) => extra_params.push(p),
                Err(v) => violations.push(v),
            }
        }

        tables.insert(
            name.clone(),
            ResolvedTable {
                columns,
                extra_params,
            },
        );
    }

    if !violations.is_empty() {
        return Err(Error::Validation(ValidationError { violations }));
    }

    Ok(ResolvedSchema { tables })
}

/// The explicit column list a table resolves to.
pub(crate) fn source_columns<'a>(
    doc: &'a SchemaDocument,
    name: &str,
    spec: &'a TableSpec,
) -> std::result::Result<&'a [ColumnSpec], ResolutionError> {
    let Some(target) = &spec.inherit_from else {
        return spec
            .explicit_columns()
            .ok_or_else(|| ResolutionError::NoColumns {
                table: name.to_string(),
            });
    };

    if spec.columns.is_some() {
        return Err(ResolutionError::AmbiguousDefinition {
            table: name.to_string(),
        });
    }

    let base = doc
        .tables
        .get(target)
        .ok_or_else(|| ResolutionError::MissingTarget {
            table: name.to_string(),
            target: target.clone(),
        })?;

    if let Some(next) = &base.inherit_from {
        return Err(ResolutionError::ChainedInheritance {
            table: name.to_string(),
            target: target.clone(),
            next: next.clone(),
        });
    }

    base.explicit_columns()
        .ok_or_else(|| ResolutionError::NoColumns {
            table: target.clone(),
        })
}

/// Lower a raw column into its typed form.
fn lower_column(table: &str, spec: &ColumnSpec) -> std::result::Result<Column, Violation> {
    let name = spec
        .name
        .as_deref()
        .filter(|n| !n.is_empty())
        .ok_or_else(|| Violation::table(table, "column has no name"))?;
    let fail = |msg: String| Violation::column(table, name, msg);

    let logical_type = spec
        .column_type
        .as_deref()
        .ok_or_else(|| fail("column has no type".to_string()))?;

    let length = spec.length.as_ref().map(parse_length).transpose().map_err(fail)?;
    let foreign_key = spec
        .foreign_key
        .as_deref()
        .map(|fk| {
            ForeignKey::parse(fk)
                .ok_or_else(|| format!("foreign_key '{}' must be 'table.column'", fk))
        })
        .transpose()
        .map_err(fail)?;

    Ok(Column {
        name: name.to_string(),
        logical_type: logical_type.to_string(),
        length,
        foreign_key,
        primary_key: parse_flag("primary_key", spec.primary_key.as_ref()).map_err(fail)?,
        unique: parse_flag("unique", spec.unique.as_ref()).map_err(fail)?,
        nullable: parse_flag("nullable", spec.nullable.as_ref()).map_err(fail)?,
    })
}

fn lower_extra_param(table: &str, spec: &ExtraParamSpec) -> std::result::Result<ExtraParam, Violation> {
    let name = spec
        .name
        .as_deref()
        .filter(|n| !n.is_empty())
        .ok_or_else(|| Violation::table(table, "extra_params entry has no name"))?;
    let value = spec
        .value
        .as_ref()
        .and_then(yaml_value_to_python)
        .ok_or_else(|| {
            Violation::table(table, format!("extra_params '{}' needs a scalar value", name))
        })?;
    Ok(ExtraParam {
        name: name.to_string(),
        value,
    })
}

/// Parse `length`: a positive integer or `[precision, scale]`.
pub(crate) fn parse_length(val: &serde_yaml_ng::Value) -> std::result::Result<Length, String> {
    use serde_yaml_ng::Value;
    match val {
        Value::Number(n) => match n.as_u64() {
            Some(size) if size > 0 => Ok(Length::Size(size)),
            _ => Err(format!("length must be a positive integer, got {}", n)),
        },
        Value::Sequence(items) if items.len() == 2 => {
            let part = |v: &Value| v.as_u64().and_then(|n| u32::try_from(n).ok());
            match (part(&items[0]), part(&items[1])) {
                (Some(precision), Some(scale)) if precision > 0 && scale <= precision => {
                    Ok(Length::Precision { precision, scale })
                }
                _ => Err("length [precision, scale] needs integers with 0 < precision and scale <= precision".to_string()),
            }
        }
        other => Err(format!(
            "length must be an integer or [precision, scale], got {}",
            describe_value(other)
        )),
    }
}

/// Parse an optional boolean flag.
pub(crate) fn parse_flag(
    key: &str,
    val: Option<&serde_yaml_ng::Value>,
) -> std::result::Result<Option<bool>, String> {
    match val {
        None => Ok(None),
        Some(serde_yaml_ng::Value::Bool(b)) => Ok(Some(*b)),
        Some(other) => Err(format!("{} must be a boolean, got {}", key, describe_value(other))),
    }
}

fn describe_value(val: &serde_yaml_ng::Value) -> String {
    use serde_yaml_ng::Value;
    match val {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("'{}'", s),
        Value::Sequence(_) => "a list".to_string(),
        Value::Mapping(_) => "a mapping".to_string(),
        Value::Tagged(_) => "a tagged value".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::parse_schema;

    #[test]
    fn test_mg003_inherit_copies_columns() {
        let doc = parse_schema(
            r#"
tables:
  A:
    columns:
      - name: id
        type: integer
        primary_key: true
  B:
    inherit_from: A
"#,
        )
        .unwrap();
        let schema = resolve(&doc).unwrap();
        assert_eq!(schema.tables["B"].columns, schema.tables["A"].columns);
        let id = &schema.tables["B"].columns[0];
        assert_eq!(id.name, "id");
        assert_eq!(id.primary_key, Some(true));
        assert_eq!(id.unique, None);
    }

    #[test]
    fn test_mg003_preserves_order() {
        let doc = parse_schema(
            r#"
tables:
  base:
    columns:
      - {name: z, type: integer}
      - {name: a, type: text}
      - {name: m, type: boolean}
  copy:
    inherit_from: base
"#,
        )
        .unwrap();
        let schema = resolve(&doc).unwrap();
        let names: Vec<_> = schema.tables["copy"].columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["z", "a", "m"]);
        let keys: Vec<_> = schema.tables.keys().collect();
        assert_eq!(keys, vec!["base", "copy"]);
    }

    #[test]
    fn test_mg003_chained_inheritance_fails() {
        let doc = parse_schema(
            r#"
tables:
  a:
    columns:
      - {name: id, type: integer}
  b:
    inherit_from: a
  c:
    inherit_from: b
"#,
        )
        .unwrap();
        let err = resolve(&doc).unwrap_err();
        assert!(matches!(
            err,
            Error::Resolution(ResolutionError::ChainedInheritance { ref table, ref target, ref next })
                if table == "c" && target == "b" && next == "a"
        ));
    }

    #[test]
    fn test_mg003_self_reference_fails() {
        let doc = parse_schema("tables:\n  a:\n    inherit_from: a\n").unwrap();
        assert!(matches!(
            resolve(&doc),
            Err(Error::Resolution(ResolutionError::ChainedInheritance { .. }))
        ));
    }

    #[test]
    fn test_mg003_cycle_fails() {
        let doc = parse_schema("tables:\n  a:\n    inherit_from: b\n  b:\n    inherit_from: a\n").unwrap();
        assert!(matches!(
            resolve(&doc),
            Err(Error::Resolution(ResolutionError::ChainedInheritance { .. }))
        ));
    }

    #[test]
    fn test_mg003_missing_target_fails() {
        let doc = parse_schema("tables:\n  a:\n    inherit_from: ghost\n").unwrap();
        let err = resolve(&doc).unwrap_err();
        assert!(err.to_string().contains("unknown table 'ghost'"));
    }

    #[test]
    fn test_mg003_target_without_columns_fails() {
        let doc = parse_schema("tables:\n  a:\n    columns: []\n  b:\n    inherit_from: a\n").unwrap();
        assert!(matches!(
            resolve(&doc),
            Err(Error::Resolution(ResolutionError::NoColumns { .. }))
        ));
    }

    #[test]
    fn test_mg003_ambiguous_definition_fails() {
        let doc = parse_schema(
            "tables:\n  a:\n    columns:\n      - {name: id, type: integer}\n  b:\n    inherit_from: a\n    columns:\n      - {name: x, type: text}\n",
        )
        .unwrap();
        assert!(matches!(
            resolve(&doc),
            Err(Error::Resolution(ResolutionError::AmbiguousDefinition { ref table })) if table == "b"
        ));
    }

    #[test]
    fn test_mg003_copy_is_by_value() {
        let doc = parse_schema(
            "tables:\n  a:\n    columns:\n      - {name: id, type: integer}\n  b:\n    inherit_from: a\n",
        )
        .unwrap();
        let mut schema = resolve(&doc).unwrap();
        schema.tables["b"].columns[0].name = "renamed".to_string();
        assert_eq!(schema.tables["a"].columns[0].name, "id");
    }

    #[test]
    fn test_mg003_extra_params_stay_on_own_table() {
        let doc = parse_schema(
            r#"
tables:
  a:
    columns:
      - {name: id, type: integer}
    extra_params:
      - {name: __abstract__, value: true}
  b:
    inherit_from: a
    extra_params:
      - {name: __bind_key__, value: "'users'"}
"#,
        )
        .unwrap();
        let schema = resolve(&doc).unwrap();
        assert_eq!(schema.tables["a"].extra_params[0].value, "True");
        assert_eq!(schema.tables["b"].extra_params.len(), 1);
        assert_eq!(schema.tables["b"].extra_params[0].name, "__bind_key__");
        assert_eq!(schema.tables["b"].extra_params[0].value, "'users'");
    }

    #[test]
    fn test_mg003_lowering_length_and_fk() {
        let doc = parse_schema(
            r#"
tables:
  users:
    columns:
      - {name: id, type: integer}
  orders:
    columns:
      - {name: total, type: numeric, length: [10, 2]}
      - {name: note, type: varchar, length: 200, nullable: true}
      - {name: user_id, type: integer, foreign_key: users.id}
"#,
        )
        .unwrap();
        let schema = resolve(&doc).unwrap();
        let cols = &schema.tables["orders"].columns;
        assert_eq!(cols[0].length, Some(Length::Precision { precision: 10, scale: 2 }));
        assert_eq!(cols[1].length, Some(Length::Size(200)));
        assert_eq!(cols[1].nullable, Some(true));
        assert_eq!(
            cols[2].foreign_key,
            Some(ForeignKey {
                table: "users".into(),
                column: "id".into()
            })
        );
    }

    #[test]
    fn test_mg003_unvalidated_bad_flag_is_validation_error() {
        let doc = parse_schema(
            "tables:\n  a:\n    columns:\n      - {name: id, type: integer, unique: \"yes\"}\n      - {type: text}\n",
        )
        .unwrap();
        let err = resolve(&doc).unwrap_err();
        match err {
            Error::Validation(v) => {
                assert_eq!(v.violations.len(), 2);
                assert!(v.violations[0].message.contains("unique must be a boolean"));
                assert!(v.violations[1].message.contains("no name"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_mg003_parse_length() {
        let v = |s: &str| serde_yaml_ng::from_str::<serde_yaml_ng::Value>(s).unwrap();
        assert_eq!(parse_length(&v("50")).unwrap(), Length::Size(50));
        assert!(parse_length(&v("0")).is_err());
        assert!(parse_length(&v("-3")).is_err());
        assert!(parse_length(&v("[2, 5]")).is_err());
        assert!(parse_length(&v("[1, 2, 3]")).is_err());
        assert!(parse_length(&v("'big'")).is_err());
    }

    #[test]
    fn test_mg003_parse_flag() {
        assert_eq!(parse_flag("unique", None).unwrap(), None);
        assert_eq!(
            parse_flag("unique", Some(&serde_yaml_ng::Value::Bool(false))).unwrap(),
            Some(false)
        );
        let err = parse_flag("nullable", Some(&serde_yaml_ng::Value::String("no".into()))).unwrap_err();
        assert_eq!(err, "nullable must be a boolean, got 'no'");
    }
}
