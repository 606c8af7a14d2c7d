//! Output profiles: render a resolved schema as Python source.
//!
//! The model profiles share one class layout and differ only in the symbol
//! prefix and base class:
//! 1. `sqlalchemy`: declarative `Base` classes
//! 2. `flask`: Flask-SQLAlchemy `db.Model` classes
//!
//! `metadata` renders the Alembic aggregation module and never sees the schema.

pub mod flask;
pub mod metadata;
pub mod sqlalchemy;

use crate::core::error::{Error, Result};
use crate::core::typemap::TypeMap;
use crate::core::types::{python_bool, Column, ResolvedTable, Target};
use std::collections::BTreeSet;

pub(crate) const HEADER: &str = "# Generated by modelgen. Do not edit by hand.";

/// Surface syntax of a model profile.
pub(crate) struct Dialect {
    pub target: Target,
    /// Prefix for `Column`, type constructors and `ForeignKey`
    pub prefix: &'static str,
    /// Base class of every generated model
    pub base: &'static str,
}

/// Render one class. Records the constructor names it used in `used`, when given.
pub(crate) fn render_class(
    dialect: &Dialect,
    types: &TypeMap,
    name: &str,
    table: &ResolvedTable,
    mut used: Option<&mut BTreeSet<&'static str>>,
) -> Result<Vec<String>> {
    let mut lines = vec![
        format!("class {}({}):", name, dialect.base),
        format!("    __tablename__ = '{}'", name),
        String::new(),
    ];

    for column in &table.columns {
        lines.push(format!(
            "    {}",
            render_column(dialect, types, name, column, used.as_deref_mut())?
        ));
    }

    if !table.extra_params.is_empty() {
        lines.push(String::new());
        for param in &table.extra_params {
            lines.push(format!("    {} = {}", param.name, param.value));
        }
    }

    Ok(lines)
}

/// Render `name = Column(...)`. Optional clauses appear only when set.
pub(crate) fn render_column(
    dialect: &Dialect,
    types: &TypeMap,
    table: &str,
    column: &Column,
    mut used: Option<&mut BTreeSet<&'static str>>,
) -> Result<String> {
    let p = dialect.prefix;
    let ty = types
        .get(&column.logical_type)
        .ok_or_else(|| Error::UnknownType {
            target: dialect.target.to_string(),
            table: table.to_string(),
            column: column.name.clone(),
            logical_type: column.logical_type.clone(),
        })?;
    if let Some(set) = used.as_deref_mut() {
        set.insert(ty);
    }

    let mut args = vec![match column.length {
        Some(length) => format!("{}{}({})", p, ty, length),
        None => format!("{}{}", p, ty),
    }];

    if let Some(ref fk) = column.foreign_key {
        if let Some(set) = used.as_deref_mut() {
            set.insert("ForeignKey");
        }
        args.push(format!("{}ForeignKey('{}')", p, fk));
    }
    if let Some(pk) = column.primary_key {
        args.push(format!("primary_key={}", python_bool(pk)));
    }
    if let Some(unique) = column.unique {
        args.push(format!("unique={}", python_bool(unique)));
    }
    if let Some(nullable) = column.nullable {
        args.push(format!("nullable={}", python_bool(nullable)));
    }

    Ok(format!("{} = {}Column({})", column.name, p, args.join(", ")))
}
