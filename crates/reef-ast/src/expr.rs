//! Expressions.
//!
//! One [`ExprKind`] variant per expression form the surface language can
//! produce. The enum is closed and the backend dispatches over it
//! exhaustively, so adding a variant here forces every emitter to handle
//! it at compile time.

use reef_common::Pos;

use crate::pat::Pattern;
use crate::stmt::Stmt;
use crate::ty::TypeExpr;

/// An expression node: a kind plus an optional original-source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub pos: Option<Pos>,
}

/// Stable identifier of one call site, assigned by the front-end.
///
/// Upstream trait resolution keys its pre-computed dispatch decisions by
/// this id; the backend treats it as opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallId(pub u32);

/// The callee shape of a call expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Callee {
    /// A bare name: `area(s)`.
    Name(String),
    /// A receiver-qualified method: `shape.area()`.
    Method { receiver: Box<Expr>, name: String },
    /// A type-qualified name: `Shape::Circle(r)`, `Geometry::area(s)`.
    Qualified { ty: String, name: String },
}

/// One segment of an interpolated string.
#[derive(Debug, Clone, PartialEq)]
pub enum InterpPart {
    /// Literal text between embeddings.
    Lit(String),
    /// An embedded expression, stringified at runtime.
    Expr(Expr),
}

/// A function or lambda parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: Option<TypeExpr>,
}

/// A lambda body: a single expression or a block of statements.
#[derive(Debug, Clone, PartialEq)]
pub enum LambdaBody {
    Expr(Box<Expr>),
    Block(Vec<Stmt>),
}

/// One arm of a match expression. The arm yields `value` when its pattern
/// (and guard, if present) matches.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchExprArm {
    pub pattern: Pattern,
    pub guard: Option<Expr>,
    pub value: Expr,
}

/// One arm of a select expression: await `future`, optionally bind the
/// result, then evaluate `body` as the arm's value.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectArm {
    pub binding: Option<String>,
    pub future: Expr,
    pub body: Expr,
}

/// A unary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    /// The operator's spelling in emitted code.
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
        }
    }
}

/// A binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinaryOp {
    /// The operator's spelling in emitted code. Equality operators emit
    /// their strict forms so comparisons never coerce across types.
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Eq => "===",
            BinaryOp::Ne => "!==",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

/// The expression forms.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// A numeric literal, kept as source text and emitted verbatim.
    Num(String),
    /// A boolean literal.
    Bool(bool),
    /// A string literal (cooked value, escapes already resolved).
    Str(String),
    /// An interpolated string: literal and expression segments in order.
    Interp(Vec<InterpPart>),
    /// An identifier reference.
    Ident(String),
    /// A unary operation.
    Unary { op: UnaryOp, operand: Box<Expr> },
    /// A binary operation.
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// A call. `call_id`, when present, keys the external dispatch table.
    Call {
        callee: Callee,
        args: Vec<Expr>,
        call_id: Option<CallId>,
    },
    /// Member access: `point.x`, `Shape.Dot`.
    Member { object: Box<Expr>, field: String },
    /// Indexing: `xs[i]`, `xs[1..3]`.
    Index { object: Box<Expr>, index: Box<Expr> },
    /// A range: `a..b` or `a..=b`. Legal bare or as an index.
    Range {
        start: Box<Expr>,
        end: Box<Expr>,
        inclusive: bool,
    },
    /// A cast: `x as u8`.
    Cast { value: Box<Expr>, target: TypeExpr },
    /// A struct literal: `Point { x: 1, y: 2 }`.
    StructLit {
        name: String,
        fields: Vec<(String, Expr)>,
    },
    /// An array literal.
    Array(Vec<Expr>),
    /// A tuple literal.
    Tuple(Vec<Expr>),
    /// An array-repeat literal: `[0; 8]`.
    Repeat { value: Box<Expr>, count: Box<Expr> },
    /// A lambda.
    Lambda {
        params: Vec<Param>,
        body: LambdaBody,
        is_async: bool,
    },
    /// `await e`.
    Await(Box<Expr>),
    /// `e?` -- unwrap a fallible value, raising on the error variant.
    Try(Box<Expr>),
    /// `e is Variant` -- enum membership test.
    IsVariant { value: Box<Expr>, variant: String },
    /// A match in expression position.
    Match {
        scrutinee: Box<Expr>,
        arms: Vec<MatchExprArm>,
    },
    /// A select/race over concurrent arms.
    Select(Vec<SelectArm>),
    /// A macro invocation. Never expanded; lowers to a throwing stub.
    MacroCall { name: String, args: Vec<Expr> },
}

impl Expr {
    /// Wrap a kind with no source position.
    pub fn new(kind: ExprKind) -> Self {
        Self { kind, pos: None }
    }

    /// Attach a source position.
    pub fn at(mut self, pos: Pos) -> Self {
        self.pos = Some(pos);
        self
    }

    pub fn num(text: impl Into<String>) -> Self {
        Self::new(ExprKind::Num(text.into()))
    }

    pub fn bool(value: bool) -> Self {
        Self::new(ExprKind::Bool(value))
    }

    pub fn str(value: impl Into<String>) -> Self {
        Self::new(ExprKind::Str(value.into()))
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Self::new(ExprKind::Ident(name.into()))
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Self::new(ExprKind::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Self::new(ExprKind::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    /// A bare-name call with no pre-resolved dispatch.
    pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::new(ExprKind::Call {
            callee: Callee::Name(name.into()),
            args,
            call_id: None,
        })
    }

    /// A receiver-qualified method call.
    pub fn method_call(receiver: Expr, name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::new(ExprKind::Call {
            callee: Callee::Method {
                receiver: Box::new(receiver),
                name: name.into(),
            },
            args,
            call_id: None,
        })
    }

    /// A type-qualified call.
    pub fn qualified_call(
        ty: impl Into<String>,
        name: impl Into<String>,
        args: Vec<Expr>,
    ) -> Self {
        Self::new(ExprKind::Call {
            callee: Callee::Qualified {
                ty: ty.into(),
                name: name.into(),
            },
            args,
            call_id: None,
        })
    }

    pub fn member(object: Expr, field: impl Into<String>) -> Self {
        Self::new(ExprKind::Member {
            object: Box::new(object),
            field: field.into(),
        })
    }

    pub fn index(object: Expr, index: Expr) -> Self {
        Self::new(ExprKind::Index {
            object: Box::new(object),
            index: Box::new(index),
        })
    }

    pub fn range(start: Expr, end: Expr, inclusive: bool) -> Self {
        Self::new(ExprKind::Range {
            start: Box::new(start),
            end: Box::new(end),
            inclusive,
        })
    }

    pub fn array(elems: Vec<Expr>) -> Self {
        Self::new(ExprKind::Array(elems))
    }

    pub fn tuple(elems: Vec<Expr>) -> Self {
        Self::new(ExprKind::Tuple(elems))
    }
}
