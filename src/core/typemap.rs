//! MG-006: Logical type → target type constructor tables.
//!
//! Built once at startup and passed by reference into validation and
//! rendering. Never mutated.

use super::types::Target;
use indexmap::IndexMap;

/// SQLAlchemy constructor names.
const SQLALCHEMY_TYPES: &[(&str, &str)] = &[
    ("integer", "Integer"),
    ("smallint", "SmallInteger"),
    ("biginteger", "BigInteger"),
    ("float", "Float"),
    ("numeric", "Numeric"),
    ("decimal", "Numeric"),
    ("string", "String"),
    ("varchar", "String"),
    ("char", "CHAR"),
    ("text", "Text"),
    ("unicode", "Unicode"),
    ("unicodetext", "UnicodeText"),
    ("boolean", "Boolean"),
    ("date", "Date"),
    ("time", "Time"),
    ("datetime", "DateTime"),
    ("timestamp", "TIMESTAMP"),
    ("interval", "Interval"),
    ("binary", "LargeBinary"),
    ("largebinary", "LargeBinary"),
    ("json", "JSON"),
    ("enum", "Enum"),
    ("uuid", "Uuid"),
];

/// Flask-SQLAlchemy exposes the same constructors on `db`.
const FLASK_TYPES: &[(&str, &str)] = &[
    ("integer", "Integer"),
    ("smallint", "SmallInteger"),
    ("biginteger", "BigInteger"),
    ("float", "Float"),
    ("numeric", "Numeric"),
    ("decimal", "Numeric"),
    ("string", "String"),
    ("varchar", "String"),
    ("char", "CHAR"),
    ("text", "Text"),
    ("unicode", "Unicode"),
    ("unicodetext", "UnicodeText"),
    ("boolean", "Boolean"),
    ("date", "Date"),
    ("time", "Time"),
    ("datetime", "DateTime"),
    ("timestamp", "TIMESTAMP"),
    ("interval", "Interval"),
    ("binary", "LargeBinary"),
    ("largebinary", "LargeBinary"),
    ("json", "JSON"),
    ("enum", "Enum"),
    ("uuid", "Uuid"),
];

/// One target's mapping.
#[derive(Debug, Clone)]
pub struct TypeMap {
    entries: IndexMap<&'static str, &'static str>,
}

impl TypeMap {
    fn from_table(table: &[(&'static str, &'static str)]) -> Self {
        Self {
            entries: table.iter().copied().collect(),
        }
    }

    pub fn get(&self, logical: &str) -> Option<&'static str> {
        self.entries.get(logical).copied()
    }

    pub fn contains(&self, logical: &str) -> bool {
        self.entries.contains_key(logical)
    }

    /// Logical type names, in declaration order.
    pub fn logical_types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }
}

/// Mappings for every supported target.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    sqlalchemy: TypeMap,
    flask: TypeMap,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self {
            sqlalchemy: TypeMap::from_table(SQLALCHEMY_TYPES),
            flask: TypeMap::from_table(FLASK_TYPES),
        }
    }

    pub fn for_target(&self, target: Target) -> &TypeMap {
        match target {
            Target::Sqlalchemy => &self.sqlalchemy,
            Target::Flask => &self.flask,
        }
    }

    /// True when every target can render the logical type.
    pub fn supports_everywhere(&self, logical: &str) -> bool {
        Target::ALL
            .iter()
            .all(|t| self.for_target(*t).contains(logical))
    }

    /// True when `name` is a type constructor some target emits, such as `Integer`.
    pub fn is_constructor(&self, name: &str) -> bool {
        Target::ALL
            .iter()
            .any(|t| self.for_target(*t).entries.values().any(|c| *c == name))
    }

    /// Logical types every target supports, for error hints.
    pub fn common_types(&self) -> Vec<&'static str> {
        self.sqlalchemy
            .logical_types()
            .filter(|t| self.supports_everywhere(t))
            .collect()
    }
}
