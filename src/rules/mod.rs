// src/rules/mod.rs

//! Rule files: the data model, the block parser, loading from disk and
//! static validation.

pub mod loader;
pub mod model;
pub mod parser;
pub mod validate;

pub use loader::{DEFAULT_RULE_FILE, load_program};
pub use model::{Program, Step, Template};
pub use parser::parse;
pub use validate::validate_program;
