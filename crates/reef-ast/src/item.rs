//! Top-level declarations.
//!
//! Only functions, structs, and trait implementations produce output
//! text. Enums and traits are consulted (variant arities, default method
//! bodies) but emit nothing themselves; aliases, imports, macro rules,
//! and front-end error placeholders are recognized and skipped.

use reef_common::Pos;

use crate::expr::Param;
use crate::stmt::Stmt;
use crate::ty::TypeExpr;

/// A complete program: an ordered sequence of top-level declarations.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub items: Vec<Item>,
}

impl Program {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }
}

/// A top-level declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Function(Function),
    Struct(StructDecl),
    Enum(EnumDecl),
    Trait(TraitDecl),
    Impl(ImplDecl),
    /// `type Meters = f64;` -- no lowering.
    TypeAlias {
        name: String,
        ty: TypeExpr,
        pos: Option<Pos>,
    },
    /// `import foo;` -- resolved upstream, no lowering.
    Import { path: String, pos: Option<Pos> },
    /// A macro definition -- never expanded, no lowering.
    MacroRule { name: String, pos: Option<Pos> },
    /// A placeholder the front-end inserts at an unrecoverable parse
    /// error. Skipped so partially broken programs still emit.
    Error { pos: Option<Pos> },
}

/// A free function, or a method inside an impl block.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub params: Vec<Param>,
    pub ret: Option<TypeExpr>,
    pub body: Vec<Stmt>,
    pub is_async: bool,
    pub pos: Option<Pos>,
}

/// A struct declaration. Lowers to a constructor function that checks
/// fixed-size array fields and returns a plain field object.
#[derive(Debug, Clone, PartialEq)]
pub struct StructDecl {
    pub name: String,
    pub fields: Vec<FieldDecl>,
    pub pos: Option<Pos>,
}

/// One declared struct field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub name: String,
    pub ty: TypeExpr,
    pub pos: Option<Pos>,
}

/// An enum declaration. Emits nothing; registered so construction sites
/// and patterns know each variant's payload arity.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub name: String,
    pub variants: Vec<VariantDecl>,
    pub pos: Option<Pos>,
}

/// One enum variant and its payload types.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantDecl {
    pub name: String,
    pub payload: Vec<TypeExpr>,
    pub pos: Option<Pos>,
}

impl VariantDecl {
    /// Number of payload values this variant carries.
    pub fn arity(&self) -> usize {
        self.payload.len()
    }
}

/// A trait declaration. Emits nothing itself; its default method bodies
/// are synthesized into each impl that does not override them.
#[derive(Debug, Clone, PartialEq)]
pub struct TraitDecl {
    pub name: String,
    pub methods: Vec<TraitMethod>,
    pub pos: Option<Pos>,
}

/// One trait method signature, with an optional default body.
#[derive(Debug, Clone, PartialEq)]
pub struct TraitMethod {
    pub name: String,
    pub params: Vec<Param>,
    pub ret: Option<TypeExpr>,
    pub default_body: Option<Vec<Stmt>>,
    pub is_async: bool,
    pub pos: Option<Pos>,
}

/// A trait implementation for a concrete type. Each method lowers to a
/// free function under the externally supplied mangling scheme.
#[derive(Debug, Clone, PartialEq)]
pub struct ImplDecl {
    pub trait_name: String,
    pub type_name: String,
    pub methods: Vec<Function>,
    pub pos: Option<Pos>,
}
