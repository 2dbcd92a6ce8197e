//! Statements and block bodies.

use reef_common::Pos;

use crate::expr::Expr;
use crate::pat::Pattern;
use crate::ty::TypeExpr;

/// A statement node: a kind plus an optional original-source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub pos: Option<Pos>,
}

/// The condition of an `if` or `while`: a plain boolean expression, or a
/// pattern binding (`if let` / `while let`).
#[derive(Debug, Clone, PartialEq)]
pub enum Cond {
    Expr(Expr),
    Let { pattern: Pattern, value: Expr },
}

/// One arm of a match statement.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchStmtArm {
    pub pattern: Pattern,
    pub guard: Option<Expr>,
    pub body: Vec<Stmt>,
}

/// The statement forms.
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// `let x = e;` with an optional declared type. The declared type is
    /// consulted when `x` is later indexed, to wire in fixed-array length
    /// checks.
    Let {
        name: String,
        ty: Option<TypeExpr>,
        value: Expr,
    },
    /// `let (a, b) = e;` -- positional destructuring, `_` skips.
    LetTuple { names: Vec<String>, value: Expr },
    /// `let P = e else { ... };` -- bindings land in the enclosing scope;
    /// the else block runs on match failure and must not fall through.
    LetElse {
        pattern: Pattern,
        value: Expr,
        else_block: Vec<Stmt>,
    },
    /// `x = e;`, `p.x = e;`, `xs[i] = e;`.
    Assign { target: Expr, value: Expr },
    /// `return;` or `return e;`.
    Return(Option<Expr>),
    /// An expression evaluated for effect.
    Expr(Expr),
    /// `if`, with either condition form, and an optional else block.
    If {
        cond: Cond,
        then_block: Vec<Stmt>,
        else_block: Option<Vec<Stmt>>,
    },
    /// `while`, with either condition form.
    While { cond: Cond, body: Vec<Stmt> },
    /// `for i in a..b` (or `a..=b` when `inclusive`).
    For {
        var: String,
        start: Expr,
        end: Expr,
        inclusive: bool,
        body: Vec<Stmt>,
    },
    /// A match in statement position.
    Match {
        scrutinee: Expr,
        arms: Vec<MatchStmtArm>,
    },
    /// A bare block, scoping its contents.
    Block(Vec<Stmt>),
    /// `break;`
    Break,
    /// `continue;`
    Continue,
}

impl Stmt {
    /// Wrap a kind with no source position.
    pub fn new(kind: StmtKind) -> Self {
        Self { kind, pos: None }
    }

    /// Attach a source position.
    pub fn at(mut self, pos: Pos) -> Self {
        self.pos = Some(pos);
        self
    }

    pub fn let_(name: impl Into<String>, value: Expr) -> Self {
        Self::new(StmtKind::Let {
            name: name.into(),
            ty: None,
            value,
        })
    }

    pub fn let_typed(name: impl Into<String>, ty: TypeExpr, value: Expr) -> Self {
        Self::new(StmtKind::Let {
            name: name.into(),
            ty: Some(ty),
            value,
        })
    }

    pub fn expr(expr: Expr) -> Self {
        Self::new(StmtKind::Expr(expr))
    }

    pub fn ret(value: Option<Expr>) -> Self {
        Self::new(StmtKind::Return(value))
    }
}
