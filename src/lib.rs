//! modelgen: generate SQLAlchemy and Flask-SQLAlchemy models from a YAML schema.
//!
//! Tables declare their columns or inherit another table's columns (one hop).
//! Schemas are validated in full before anything is rendered, and rendering is
//! deterministic so the Alembic aggregation module stays stable.

pub mod cli;
pub mod core;
pub mod profiles;
