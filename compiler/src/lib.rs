//! driftbuf-compiler
//!
//! This crate implements:
//!  1) A tokenizer + parser for driftbuf schema files,
//!  2) A type registry over builtin scalars and declared enums/tables,
//!  3) A layout engine assigning static offsets and dynamic slots,
//!  4) A content-derived 128-bit identity per table for runtime
//!     wire-compatibility checks,
//!  5) Code generation (`compile_schema` -> declarations + definitions),
//!  6) Error types (`DriftError`).

pub mod error;
pub mod types;
pub mod utils;
pub mod tokenizer;
pub mod parser;
pub mod registry;
pub mod layout;
pub mod identity;
pub mod gen_cxx;
pub mod compiler;

pub use compiler::compile_schema;
pub use error::DriftError;
pub use gen_cxx::{generate, GeneratedCode};
pub use identity::{table_identity, TypeIdentity};
pub use layout::{layout_table, FieldLayout, FieldSlot, TableLayout};
pub use registry::TypeRegistry;
