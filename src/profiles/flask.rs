//! MG-008: Flask-SQLAlchemy model profile.

use super::{render_class, Dialect, HEADER};
use crate::core::error::Result;
use crate::core::typemap::TypeMap;
use crate::core::types::{ResolvedSchema, Target};

const DIALECT: Dialect = Dialect {
    target: Target::Flask,
    prefix: "db.",
    base: "db.Model",
};

/// Render a model module of `db.Model` classes.
pub fn render(schema: &ResolvedSchema, types: &TypeMap) -> Result<String> {
    let mut lines = vec![
        HEADER.to_string(),
        "from flask_sqlalchemy import SQLAlchemy".to_string(),
        String::new(),
        "db = SQLAlchemy()".to_string(),
        "metadata = db.metadata".to_string(),
    ];

    for (name, table) in &schema.tables {
        lines.push(String::new());
        lines.push(String::new());
        lines.extend(render_class(&DIALECT, types, name, table, None)?);
    }

    Ok(lines.join("\n") + "\n")
}
