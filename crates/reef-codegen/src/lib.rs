//! JavaScript code generation for the Reef compiler.
//!
//! This crate transforms a typed Reef program into readable JavaScript
//! source text, with an optional source map tying generated positions
//! back to the original program.
//!
//! ## Architecture
//!
//! - [`fragment`]: Position-carrying text pieces, the only emission primitive
//! - [`names`]: Deterministic temporary-name minting
//! - [`pattern`]: Pattern lowering to condition strings and binding statements
//! - [`constfold`]: Compile-time evaluation of fixed-array length expressions
//! - [`runtime`]: The runtime surface generated programs call into
//! - [`codegen`]: Declaration, statement, and expression emitters
//! - [`sourcemap`]: Generated-position accounting and source map v3 encoding
//!
//! ## Pipeline
//!
//! ```text
//! Program -> Fragment per declaration -> assembled module text [+ SourceMap]
//! ```
//!
//! Emission is total: any recognized input compiles, and constructs whose
//! failure is a runtime matter (non-exhaustive matches, fixed-array length
//! violations) lower to explicit guards in the output rather than errors
//! at compile time.

pub mod codegen;
pub mod constfold;
pub mod fragment;
pub mod names;
pub mod pattern;
pub mod runtime;
pub mod sourcemap;

pub use codegen::{
    compile_program, Codegen, CodegenOptions, Cx, DefaultMethodCtx, DispatchTable, EmitOutput,
    ModuleFormat, NameMangler, RuntimeLinkage, SeparatorMangler,
};
pub use fragment::Fragment;
pub use sourcemap::SourceMap;
