//! Core generation logic: types, parsing, validation, resolution, rendering.

pub mod codegen;
pub mod error;
pub mod parser;
pub mod pipeline;
pub mod project;
pub mod resolver;
pub mod typemap;
pub mod types;
pub mod validator;
pub mod writer;

pub use error::{Error, Result};
