//! Typed AST for the Reef compiler backend.
//!
//! The backend consumes a program that has already been parsed and
//! type-checked by the front-end. This crate is the data contract between
//! the two: plain owned enums and structs, one variant per node kind,
//! with no behavior beyond small accessors and constructor conveniences.
//!
//! # Architecture
//!
//! - [`item`]: top-level declarations ([`Program`], functions, structs,
//!   enums, traits, impls)
//! - [`stmt`]: statements and block bodies
//! - [`expr`]: expressions, call shapes, match/select arms
//! - [`pat`]: match patterns
//! - [`ty`]: surface type expressions (consulted for array sizes, casts,
//!   and self-typed parameters)
//!
//! Every node carries an optional original-source [`Pos`]; `None` marks
//! synthesized or error-recovered nodes, which simply produce no source
//! mapping downstream.
//!
//! [`Pos`]: reef_common::Pos

pub mod expr;
pub mod item;
pub mod pat;
pub mod stmt;
pub mod ty;

pub use expr::{
    BinaryOp, CallId, Callee, Expr, ExprKind, InterpPart, LambdaBody, MatchExprArm, Param,
    SelectArm, UnaryOp,
};
pub use item::{
    EnumDecl, FieldDecl, Function, ImplDecl, Item, Program, StructDecl, TraitDecl, TraitMethod,
    VariantDecl,
};
pub use pat::{EnumPatArgs, Pattern};
pub use stmt::{Cond, MatchStmtArm, Stmt, StmtKind};
pub use ty::TypeExpr;
