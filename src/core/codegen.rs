//! MG-005: Code generation, dispatched to output profiles.
//!
//! Two independent passes:
//! - model: resolved schema + target → one Python module
//! - metadata: generated module names → Alembic aggregation module

use super::error::Result;
use super::typemap::TypeRegistry;
use super::types::{ResolvedSchema, Target};
use crate::profiles;

/// Render the model module for a target.
pub fn render(schema: &ResolvedSchema, target: Target, types: &TypeRegistry) -> Result<String> {
    let map = types.for_target(target);
    match target {
        Target::Sqlalchemy => profiles::sqlalchemy::render(schema, map),
        Target::Flask => profiles::flask::render(schema, map),
    }
}

/// Render the aggregation module over already generated model modules.
pub fn render_metadata(package: &str, modules: &[String]) -> String {
    profiles::metadata::render(package, modules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Error;
    use crate::core::types::{Column, ResolvedTable};

    fn make_schema() -> ResolvedSchema {
        let mut id = Column::new("id", "integer");
        id.primary_key = Some(true);
        let mut schema = ResolvedSchema::default();
        schema.tables.insert(
            "items".to_string(),
            ResolvedTable {
                columns: vec![id, Column::new("label", "text")],
                extra_params: vec![],
            },
        );
        schema
    }

    #[test]
    fn test_mg005_dispatch_sqlalchemy() {
        let out = render(&make_schema(), Target::Sqlalchemy, &TypeRegistry::new()).unwrap();
        assert!(out.contains("class items(Base):"));
        assert!(out.contains("    id = Column(Integer, primary_key=True)"));
    }

    #[test]
    fn test_mg005_dispatch_flask() {
        let out = render(&make_schema(), Target::Flask, &TypeRegistry::new()).unwrap();
        assert!(out.contains("class items(db.Model):"));
        assert!(out.contains("    label = db.Column(db.Text)"));
    }

    #[test]
    fn test_mg005_same_tables_every_target() {
        let types = TypeRegistry::new();
        for target in Target::ALL {
            let out = render(&make_schema(), target, &types).unwrap();
            assert!(out.contains("__tablename__ = 'items'"), "{target}");
            assert!(out.contains("metadata = "), "{target}");
        }
    }

    #[test]
    fn test_mg005_unknown_type_fails_every_target() {
        let mut schema = make_schema();
        schema.tables["items"].columns.push(Column::new("price", "money"));
        for target in Target::ALL {
            let err = render(&schema, target, &TypeRegistry::new()).unwrap_err();
            assert!(matches!(err, Error::UnknownType { .. }));
        }
    }

    #[test]
    fn test_mg005_metadata_dispatch() {
        let out = render_metadata("models", &["orders".to_string()]);
        assert!(out.contains("from models.orders import metadata as orders_metadata"));
    }
}
