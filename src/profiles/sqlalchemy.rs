//! MG-007: SQLAlchemy declarative model profile.

use super::{render_class, Dialect, HEADER};
use crate::core::error::Result;
use crate::core::typemap::TypeMap;
use crate::core::types::{ResolvedSchema, Target};
use std::collections::BTreeSet;

const DIALECT: Dialect = Dialect {
    target: Target::Sqlalchemy,
    prefix: "",
    base: "Base",
};

/// Render a model module of declarative classes.
pub fn render(schema: &ResolvedSchema, types: &TypeMap) -> Result<String> {
    let mut used = BTreeSet::from(["Column"]);
    let mut body = Vec::new();

    for (name, table) in &schema.tables {
        body.push(String::new());
        body.push(String::new());
        body.extend(render_class(&DIALECT, types, name, table, Some(&mut used))?);
    }

    let imports: Vec<&str> = used.into_iter().collect();
    let mut lines = vec![
        HEADER.to_string(),
        format!("from sqlalchemy import {}", imports.join(", ")),
        "from sqlalchemy.orm import declarative_base".to_string(),
        String::new(),
        "Base = declarative_base()".to_string(),
        "metadata = Base.metadata".to_string(),
    ];
    lines.extend(body);

    Ok(lines.join("\n") + "\n")
}
