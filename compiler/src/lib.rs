//! igor-compiler
//!
//! This crate implements:
//!  1) A tokenizer + parser for `.igor` schema files,
//!  2) A collector that promotes inline enums and records to named declarations,
//!  3) A verifier (duplicate names, colliding client methods, etc.),
//!  4) TypeScript generation (`generate_typescript` → data and service modules),
//!  5) IR serialization (`to_ir_json` → canonical JSON), and
//!  6) Error types (`IgorError`).

pub mod error;
pub mod types;
pub mod utils;
pub mod tokenizer;
pub mod syntax;
pub mod parser;
pub mod naming;
pub mod collector;
pub mod type_model;
pub mod verifier;
pub mod ir;
pub mod gen_ts;
pub mod compiler;

pub use compiler::{compile_schema, Compiler};
pub use error::IgorError;
pub use gen_ts::{generate_typescript, TsOptions, TsOutput};
pub use ir::to_ir_json;
pub use types::DeclarationSet;
