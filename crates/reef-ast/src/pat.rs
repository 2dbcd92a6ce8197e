//! Match patterns.
//!
//! Five kinds, matched structurally against a scrutinee value. Enum
//! patterns come in two historical argument shapes -- a flat positional
//! binding list and nested sub-patterns -- and front-ends emit both, so
//! the backend handles each explicitly.

use crate::expr::Expr;

/// A pattern in a `match` arm, `if let`, `while let`, or `let ... else`.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// `_` -- matches anything, binds nothing.
    Wildcard,
    /// A bare name -- matches anything, binds the scrutinee to the name.
    Binding(String),
    /// A literal expression (number, boolean, or string) compared by value.
    Literal(Expr),
    /// `(a, b, _)` -- arity check plus element-wise recursion.
    Tuple(Vec<Pattern>),
    /// `Point { x, y: 0 }` -- object check plus field-wise recursion.
    Struct {
        name: String,
        fields: Vec<(String, Pattern)>,
    },
    /// `Shape::Circle(r)` or bare `Circle(r)` -- discriminant tag test
    /// plus payload extraction.
    Enum {
        enum_name: Option<String>,
        variant: String,
        args: EnumPatArgs,
    },
}

/// Argument shape of an enum pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumPatArgs {
    /// Unit variant: `Shape::Dot`.
    None,
    /// Flat positional bindings: `Shape::Circle(r)`, `Pair::Both(a, b)`.
    /// One name binds the whole payload; several index into it. `_` skips.
    Bindings(Vec<String>),
    /// Nested sub-patterns: `Shape::Circle(0)`, `Pair::Both(x, (a, b))`.
    Patterns(Vec<Pattern>),
}

impl Pattern {
    /// Convenience constructor for a binding pattern.
    pub fn binding(name: impl Into<String>) -> Self {
        Pattern::Binding(name.into())
    }

    /// Convenience constructor for an enum pattern with flat bindings.
    pub fn enum_bindings(
        enum_name: Option<&str>,
        variant: impl Into<String>,
        names: &[&str],
    ) -> Self {
        Pattern::Enum {
            enum_name: enum_name.map(str::to_string),
            variant: variant.into(),
            args: if names.is_empty() {
                EnumPatArgs::None
            } else {
                EnumPatArgs::Bindings(names.iter().map(|n| n.to_string()).collect())
            },
        }
    }

    /// Convenience constructor for an enum pattern with nested sub-patterns.
    pub fn enum_patterns(
        enum_name: Option<&str>,
        variant: impl Into<String>,
        pats: Vec<Pattern>,
    ) -> Self {
        Pattern::Enum {
            enum_name: enum_name.map(str::to_string),
            variant: variant.into(),
            args: EnumPatArgs::Patterns(pats),
        }
    }
}
