//! Surface type expressions.
//!
//! The backend never type-checks; it consults declared types in exactly
//! three places: cast targets, fixed-size array fields (for constructor
//! length guards), and self-typed trait parameters (for default-method
//! dispatch).

use crate::expr::Expr;

/// A type as written in the surface program.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// A named type: `i32`, `String`, `Pair`, a trait name, ...
    Named(String),
    /// The `Self` type inside a trait or impl.
    SelfTy,
    /// An array type, with an optional fixed size expression: `[u8; 4]`.
    Array {
        elem: Box<TypeExpr>,
        size: Option<Box<Expr>>,
    },
    /// A tuple type: `(i32, String)`.
    Tuple(Vec<TypeExpr>),
    /// A function type: `fn(i32) -> bool`.
    Func {
        params: Vec<TypeExpr>,
        ret: Option<Box<TypeExpr>>,
    },
}

impl TypeExpr {
    /// Convenience constructor for a named type.
    pub fn named(name: impl Into<String>) -> Self {
        TypeExpr::Named(name.into())
    }

    /// Convenience constructor for a fixed-size array type.
    pub fn array(elem: TypeExpr, size: Expr) -> Self {
        TypeExpr::Array {
            elem: Box::new(elem),
            size: Some(Box::new(size)),
        }
    }

    /// The type's name if it is a plain named type.
    pub fn name(&self) -> Option<&str> {
        match self {
            TypeExpr::Named(n) => Some(n),
            _ => None,
        }
    }

    /// The declared size expression if this is a fixed-size array type.
    pub fn array_size(&self) -> Option<&Expr> {
        match self {
            TypeExpr::Array { size, .. } => size.as_deref(),
            _ => None,
        }
    }

    /// Whether this type is the trait self-type: `Self` itself, or the
    /// named trait when a trait writes its own name in a method signature.
    pub fn is_self_for(&self, trait_name: &str) -> bool {
        match self {
            TypeExpr::SelfTy => true,
            TypeExpr::Named(n) => n == trait_name,
            _ => false,
        }
    }
}
