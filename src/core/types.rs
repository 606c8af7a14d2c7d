//! MG-001: Schema document and resolved schema types.
//!
//! The raw document keeps optional column attributes loosely typed so the
//! validator can report bad values instead of failing the parse. The resolved
//! schema is fully typed; `None` always means "absent in the schema".

use super::error::Error;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Raw schema document
// ============================================================================

/// Root of a schema YAML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaDocument {
    /// Table definitions (order-preserving)
    #[serde(default)]
    pub tables: IndexMap<String, TableSpec>,
}

/// A table as written in the schema: explicit columns or an inheritance reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableSpec {
    /// Explicit column list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<ColumnSpec>>,

    /// Name of a table whose columns are reused verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherit_from: Option<String>,

    /// Class-level name/value pairs appended to the generated class
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_params: Vec<ExtraParamSpec>,
}

/// A column as written in the schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnSpec {
    #[serde(default)]
    pub name: Option<String>,

    /// Logical type name
    #[serde(rename = "type", default)]
    pub column_type: Option<String>,

    /// Integer length or `[precision, scale]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<serde_yaml_ng::Value>,

    /// `table.column`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<serde_yaml_ng::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique: Option<serde_yaml_ng::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<serde_yaml_ng::Value>,
}

/// A class-level parameter as written in the schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtraParamSpec {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Option<serde_yaml_ng::Value>,
}

impl TableSpec {
    /// Explicit, non-empty column list, if any.
    pub fn explicit_columns(&self) -> Option<&[ColumnSpec]> {
        self.columns.as_deref().filter(|c| !c.is_empty())
    }
}

// ============================================================================
// Resolved schema
// ============================================================================

/// Schema with every inheritance reference replaced by a concrete column list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedSchema {
    pub tables: IndexMap<String, ResolvedTable>,
}

impl ResolvedSchema {
    pub fn column_count(&self) -> usize {
        self.tables.values().map(|t| t.columns.len()).sum()
    }
}

/// A fully materialized table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedTable {
    pub columns: Vec<Column>,
    pub extra_params: Vec<ExtraParam>,
}

/// A typed column definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    /// Logical type name, looked up in the type registry at render time
    pub logical_type: String,
    pub length: Option<Length>,
    pub foreign_key: Option<ForeignKey>,
    pub primary_key: Option<bool>,
    pub unique: Option<bool>,
    pub nullable: Option<bool>,
}

impl Column {
    /// Column with only a name and a type.
    pub fn new(name: impl Into<String>, logical_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            logical_type: logical_type.into(),
            length: None,
            foreign_key: None,
            primary_key: None,
            unique: None,
            nullable: None,
        }
    }
}

/// Length or precision argument of a type constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Length {
    Size(u64),
    Precision { precision: u32, scale: u32 },
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Size(n) => write!(f, "{}", n),
            Self::Precision { precision, scale } => write!(f, "{}, {}", precision, scale),
        }
    }
}

/// Foreign key target, `table.column`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub table: String,
    pub column: String,
}

impl ForeignKey {
    /// Split `table.column`. Both parts must be non-empty and there must be exactly one dot.
    pub fn parse(s: &str) -> Option<Self> {
        let (table, column) = s.split_once('.')?;
        if table.is_empty() || column.is_empty() || column.contains('.') {
            return None;
        }
        Some(Self {
            table: table.trim().to_string(),
            column: column.trim().to_string(),
        })
    }
}

impl fmt::Display for ForeignKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

/// A class-level assignment. `value` is emitted verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraParam {
    pub name: String,
    pub value: String,
}

// ============================================================================
// Targets
// ============================================================================

/// Output profile for the model module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// SQLAlchemy declarative classes
    #[default]
    #[serde(alias = "alchemygen")]
    Sqlalchemy,
    /// Flask-SQLAlchemy `db.Model` classes
    #[serde(alias = "flaskgen")]
    Flask,
}

impl Target {
    pub const ALL: [Target; 2] = [Target::Sqlalchemy, Target::Flask];
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sqlalchemy => write!(f, "sqlalchemy"),
            Self::Flask => write!(f, "flask"),
        }
    }
}

impl FromStr for Target {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlalchemy" | "alchemygen" => Ok(Self::Sqlalchemy),
            "flask" | "flaskgen" => Ok(Self::Flask),
            _ => Err(Error::UnsupportedTarget(s.to_string())),
        }
    }
}

// ============================================================================
// YAML helpers
// ============================================================================

/// Render a scalar YAML value as a Python expression.
///
/// Strings are emitted verbatim so a schema can carry expressions such as
/// `{'mysql_engine': 'InnoDB'}`.
pub fn yaml_value_to_python(val: &serde_yaml_ng::Value) -> Option<String> {
    match val {
        serde_yaml_ng::Value::String(s) => Some(s.clone()),
        serde_yaml_ng::Value::Number(n) => Some(n.to_string()),
        serde_yaml_ng::Value::Bool(b) => Some(python_bool(*b).to_string()),
        _ => None,
    }
}

pub fn python_bool(b: bool) -> &'static str {
    if b {
        "True"
    } else {
        "False"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mg001_document_parse() {
        let yaml = r#"
tables:
  userinfo:
    columns:
      - name: id
        type: integer
        primary_key: true
      - name: email
        type: varchar
        length: 120
        unique: true
  admin:
    inherit_from: userinfo
    extra_params:
      - name: __table_args__
        value: "{'schema': 'admin'}"
"#;
        let doc: SchemaDocument = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(doc.tables.len(), 2);
        let keys: Vec<_> = doc.tables.keys().collect();
        assert_eq!(keys, vec!["userinfo", "admin"]);

        let user = &doc.tables["userinfo"];
        let cols = user.explicit_columns().unwrap();
        assert_eq!(cols[1].name.as_deref(), Some("email"));
        assert_eq!(cols[1].column_type.as_deref(), Some("varchar"));
        assert!(cols[1].nullable.is_none());

        let admin = &doc.tables["admin"];
        assert!(admin.columns.is_none());
        assert_eq!(admin.inherit_from.as_deref(), Some("userinfo"));
        assert_eq!(admin.extra_params.len(), 1);
    }

    #[test]
    fn test_mg001_empty_columns_not_explicit() {
        let t = TableSpec {
            columns: Some(vec![]),
            ..Default::default()
        };
        assert!(t.explicit_columns().is_none());
    }

    #[test]
    fn test_mg001_foreign_key_parse() {
        let fk = ForeignKey::parse("users.id").unwrap();
        assert_eq!(fk.table, "users");
        assert_eq!(fk.column, "id");
        assert_eq!(fk.to_string(), "users.id");
        assert!(ForeignKey::parse("users").is_none());
        assert!(ForeignKey::parse(".id").is_none());
        assert!(ForeignKey::parse("users.").is_none());
        assert!(ForeignKey::parse("a.b.c").is_none());
    }

    #[test]
    fn test_mg001_length_display() {
        assert_eq!(Length::Size(50).to_string(), "50");
        assert_eq!(
            Length::Precision {
                precision: 10,
                scale: 2
            }
            .to_string(),
            "10, 2"
        );
    }

    #[test]
    fn test_mg001_target_from_str() {
        assert_eq!("sqlalchemy".parse::<Target>().unwrap(), Target::Sqlalchemy);
        assert_eq!("alchemygen".parse::<Target>().unwrap(), Target::Sqlalchemy);
        assert_eq!("Flask".parse::<Target>().unwrap(), Target::Flask);
        assert_eq!("flaskgen".parse::<Target>().unwrap(), Target::Flask);
        let err = "django".parse::<Target>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedTarget(ref t) if t == "django"));
    }

    #[test]
    fn test_mg001_target_display() {
        assert_eq!(Target::Sqlalchemy.to_string(), "sqlalchemy");
        assert_eq!(Target::Flask.to_string(), "flask");
        assert_eq!(Target::default(), Target::Sqlalchemy);
    }

    #[test]
    fn test_mg001_yaml_value_to_python() {
        use serde_yaml_ng::Value;
        assert_eq!(yaml_value_to_python(&Value::Bool(true)).unwrap(), "True");
        assert!(yaml_value_to_python(&Value::Null).is_none());
        assert_eq!(
            yaml_value_to_python(&Value::String("'x'".into())).unwrap(),
            "'x'"
        );
        assert_eq!(
            yaml_value_to_python(&serde_yaml_ng::from_str("42").unwrap()).unwrap(),
            "42"
        );
        assert!(yaml_value_to_python(&Value::Sequence(vec![])).is_none());
    }
}
