//! Statement emission and control-flow desugaring.
//!
//! Surface control flow lowers to a small JavaScript subset: plain
//! `if`/`while`/`for` plus `const`/`let` declarations. The
//! pattern-matching forms (if-let, while-let, let-else, match) desugar
//! into minted temporaries, pattern conditions, and a first-match-wins
//! commit flag per match.
//!
//! Every statement emitter renders its sub-expressions first, then
//! drains the hoist buffer as a prefix, so expression-position
//! desugarings always land immediately before the statement that
//! triggered them. Loop conditions are the one exception: their prework
//! must re-run per iteration, so a hoisting condition rewrites the loop
//! to `while (true)` with the prework and an inverted break test inside.

use reef_ast::{Cond, Expr, ExprKind, MatchExprArm, Pattern, Stmt, StmtKind};
use reef_common::Pos;

use super::traits::Cx;
use super::Codegen;
use crate::fragment::Fragment;
use crate::names::MatchNames;
use crate::pattern;

/// One desugared match arm, shared by the statement and expression
/// forms of match.
struct CoreArm<'a> {
    pattern: &'a Pattern,
    guard: Option<&'a Expr>,
    body: CoreBody<'a>,
}

enum CoreBody<'a> {
    /// The arm assigns this value to the match's result slot.
    Value(&'a Expr),
    /// The arm runs these statements.
    Stmts(&'a [Stmt]),
}

impl<'a> Codegen<'a> {
    pub(crate) fn emit_stmts(&mut self, stmts: &'a [Stmt], cx: Cx<'_>) -> Fragment {
        let mut out = Fragment::new();
        for s in stmts {
            out.push(self.emit_stmt(s, cx));
        }
        out
    }

    /// Emit the statements of a braced body, one scope and one
    /// indentation level deeper.
    pub(crate) fn emit_body(&mut self, stmts: &'a [Stmt], cx: Cx<'_>) -> Fragment {
        self.push_scope();
        self.indent += 1;
        let out = self.emit_stmts(stmts, cx);
        self.indent -= 1;
        self.pop_scope();
        out
    }

    /// Emit one statement as complete indented lines, hoist prefix
    /// included.
    pub(crate) fn emit_stmt(&mut self, s: &'a Stmt, cx: Cx<'_>) -> Fragment {
        match &s.kind {
            StmtKind::Let { name, ty, value } => {
                let value_frag = self.emit_expr(value, cx);
                let mut out = self.take_hoist();
                out.push_str(&self.pad());
                out.map_pos(s.pos);
                out.push_str("let ");
                out.push_str(name);
                out.push_str(" = ");
                out.push(value_frag);
                out.push_str(";\n");
                // Declared after the value renders, so `let x = x;` still
                // reads the outer binding.
                self.declare(name, ty.as_ref());
                out
            }

            StmtKind::LetTuple { names, value } => {
                let value_frag = self.emit_expr(value, cx);
                let mut out = self.take_hoist();
                let tmp = self.names.temp();
                out.push_str(&self.pad());
                out.map_pos(s.pos);
                out.push_str(&format!("const {tmp} = "));
                out.push(value_frag);
                out.push_str(";\n");
                // Positions 0 and 1 accept a channel pair as well as a
                // plain tuple; later positions are numeric only.
                for (i, name) in names.iter().enumerate() {
                    if name == "_" {
                        continue;
                    }
                    out.push_str(&self.pad());
                    match i {
                        0 => out.push_str(&format!(
                            "let {name} = {tmp}.sender !== undefined ? {tmp}.sender : {tmp}[0];\n"
                        )),
                        1 => out.push_str(&format!(
                            "let {name} = {tmp}.receiver !== undefined ? {tmp}.receiver : {tmp}[1];\n"
                        )),
                        _ => out.push_str(&format!("let {name} = {tmp}[{i}];\n")),
                    }
                    self.declare(name, None);
                }
                out
            }

            StmtKind::LetElse {
                pattern,
                value,
                else_block,
            } => {
                let value_frag = self.emit_expr(value, cx);
                let mut out = self.take_hoist();
                let tmp = self.names.temp();
                out.push_str(&self.pad());
                out.map_pos(s.pos);
                out.push_str(&format!("const {tmp} = "));
                out.push(value_frag);
                out.push_str(";\n");
                let cond = pattern::condition(pattern, &tmp);
                out.push_str(&self.pad());
                out.push_str(&format!("if (!({cond})) {{\n"));
                out.push(self.emit_body(else_block, cx));
                out.push_str(&self.pad());
                out.push_str("}\n");
                // Bindings land in the enclosing scope; the else block is
                // trusted not to fall through.
                for b in pattern::bindings(pattern, &tmp, "let") {
                    out.push_str(&self.pad());
                    out.push_str(&b);
                    out.push_str("\n");
                }
                for n in pattern::binding_names(pattern) {
                    self.declare(&n, None);
                }
                out
            }

            StmtKind::Assign { target, value } => {
                let target_frag = self.emit_assign_target(target, cx);
                let value_frag = self.emit_expr(value, cx);
                let mut out = self.take_hoist();
                out.push_str(&self.pad());
                out.map_pos(s.pos);
                out.push(target_frag);
                out.push_str(" = ");
                out.push(value_frag);
                out.push_str(";\n");
                out
            }

            StmtKind::Return(value) => match value {
                Some(v) => {
                    let value_frag = self.emit_expr(v, cx);
                    let mut out = self.take_hoist();
                    out.push_str(&self.pad());
                    out.map_pos(s.pos);
                    out.push_str("return ");
                    out.push(value_frag);
                    out.push_str(";\n");
                    out
                }
                None => {
                    let mut out = Fragment::new();
                    out.push_str(&self.pad());
                    out.map_pos(s.pos);
                    out.push_str("return;\n");
                    out
                }
            },

            StmtKind::Expr(e) => {
                let frag = self.emit_expr(e, cx);
                let mut out = self.take_hoist();
                out.push_str(&self.pad());
                out.map_pos(s.pos);
                out.push(frag);
                out.push_str(";\n");
                out
            }

            StmtKind::If {
                cond,
                then_block,
                else_block,
            } => self.emit_if(s.pos, cond, then_block, else_block.as_deref(), cx),

            StmtKind::While { cond, body } => self.emit_while(s.pos, cond, body, cx),

            StmtKind::For {
                var,
                start,
                end,
                inclusive,
                body,
            } => {
                // Both endpoints evaluate once, before the loop.
                let start_frag = self.emit_expr(start, cx);
                let end_frag = self.emit_expr(end, cx);
                let mut out = self.take_hoist();
                let lo = self.names.temp();
                let hi = self.names.temp();
                out.push_str(&self.pad());
                out.map_pos(s.pos);
                out.push_str(&format!("const {lo} = "));
                out.push(start_frag);
                out.push_str(";\n");
                out.push_str(&self.pad());
                out.push_str(&format!("const {hi} = "));
                out.push(end_frag);
                out.push_str(";\n");
                let cmp = if *inclusive { "<=" } else { "<" };
                out.push_str(&self.pad());
                out.push_str(&format!(
                    "for (let {var} = {lo}; {var} {cmp} {hi}; {var}++) {{\n"
                ));
                self.push_scope();
                self.declare(var, None);
                self.indent += 1;
                for st in body {
                    out.push(self.emit_stmt(st, cx));
                }
                self.indent -= 1;
                self.pop_scope();
                out.push_str(&self.pad());
                out.push_str("}\n");
                out
            }

            StmtKind::Match { scrutinee, arms } => {
                let core: Vec<CoreArm<'a>> = arms
                    .iter()
                    .map(|a| CoreArm {
                        pattern: &a.pattern,
                        guard: a.guard.as_ref(),
                        body: CoreBody::Stmts(&a.body),
                    })
                    .collect();
                let (frag, _) = self.emit_match_core(scrutinee, &core, false, s.pos, cx);
                frag
            }

            StmtKind::Block(stmts) => {
                let mut out = Fragment::new();
                out.push_str(&self.pad());
                out.map_pos(s.pos);
                out.push_str("{\n");
                out.push(self.emit_body(stmts, cx));
                out.push_str(&self.pad());
                out.push_str("}\n");
                out
            }

            StmtKind::Break => {
                let mut out = Fragment::new();
                out.push_str(&self.pad());
                out.map_pos(s.pos);
                out.push_str("break;\n");
                out
            }

            StmtKind::Continue => {
                let mut out = Fragment::new();
                out.push_str(&self.pad());
                out.map_pos(s.pos);
                out.push_str("continue;\n");
                out
            }
        }
    }

    // ── Conditionals and loops ───────────────────────────────────────

    fn emit_if(
        &mut self,
        pos: Option<Pos>,
        cond: &'a Cond,
        then_block: &'a [Stmt],
        else_block: Option<&'a [Stmt]>,
        cx: Cx<'_>,
    ) -> Fragment {
        match cond {
            Cond::Expr(c) => {
                let cond_frag = self.emit_expr(c, cx);
                let mut out = self.take_hoist();
                out.push_str(&self.pad());
                out.map_pos(pos);
                out.push_str("if (");
                out.push(cond_frag);
                out.push_str(") {\n");
                out.push(self.emit_body(then_block, cx));
                if let Some(els) = else_block {
                    out.push_str(&self.pad());
                    out.push_str("} else {\n");
                    out.push(self.emit_body(els, cx));
                }
                out.push_str(&self.pad());
                out.push_str("}\n");
                out
            }
            Cond::Let { pattern, value } => {
                let value_frag = self.emit_expr(value, cx);
                let mut out = self.take_hoist();
                let tmp = self.names.temp();
                out.push_str(&self.pad());
                out.map_pos(pos);
                out.push_str(&format!("const {tmp} = "));
                out.push(value_frag);
                out.push_str(";\n");
                out.push_str(&self.pad());
                out.push_str(&format!("if ({}) {{\n", pattern::condition(pattern, &tmp)));
                // Bindings are scoped to the then branch.
                self.push_scope();
                self.indent += 1;
                for b in pattern::bindings(pattern, &tmp, "let") {
                    out.push_str(&self.pad());
                    out.push_str(&b);
                    out.push_str("\n");
                }
                for n in pattern::binding_names(pattern) {
                    self.declare(&n, None);
                }
                for st in then_block {
                    out.push(self.emit_stmt(st, cx));
                }
                self.indent -= 1;
                self.pop_scope();
                if let Some(els) = else_block {
                    out.push_str(&self.pad());
                    out.push_str("} else {\n");
                    out.push(self.emit_body(els, cx));
                }
                out.push_str(&self.pad());
                out.push_str("}\n");
                out
            }
        }
    }

    fn emit_while(
        &mut self,
        pos: Option<Pos>,
        cond: &'a Cond,
        body: &'a [Stmt],
        cx: Cx<'_>,
    ) -> Fragment {
        match cond {
            Cond::Expr(c) => {
                // The condition renders one level deep: if it hoists
                // prework, both the prework and the test move inside a
                // `while (true)` so they re-run every iteration.
                self.indent += 1;
                let cond_frag = self.emit_expr(c, cx);
                let pre = self.take_hoist();
                self.indent -= 1;

                let mut out = Fragment::new();
                out.push_str(&self.pad());
                out.map_pos(pos);
                if pre.is_empty() {
                    out.push_str("while (");
                    out.push(cond_frag);
                    out.push_str(") {\n");
                    out.push(self.emit_body(body, cx));
                    out.push_str(&self.pad());
                    out.push_str("}\n");
                } else {
                    out.push_str("while (true) {\n");
                    out.push(pre);
                    self.indent += 1;
                    out.push_str(&self.pad());
                    out.push_str("if (!(");
                    out.push(cond_frag);
                    out.push_str(")) {\n");
                    out.push_str(&self.pad());
                    out.push_str("  break;\n");
                    out.push_str(&self.pad());
                    out.push_str("}\n");
                    self.indent -= 1;
                    out.push(self.emit_body(body, cx));
                    out.push_str(&self.pad());
                    out.push_str("}\n");
                }
                out
            }
            Cond::Let { pattern, value } => {
                let mut out = Fragment::new();
                out.push_str(&self.pad());
                out.map_pos(pos);
                out.push_str("while (true) {\n");
                self.push_scope();
                self.indent += 1;
                let value_frag = self.emit_expr(value, cx);
                out.push(self.take_hoist());
                let tmp = self.names.temp();
                out.push_str(&self.pad());
                out.push_str(&format!("const {tmp} = "));
                out.push(value_frag);
                out.push_str(";\n");
                out.push_str(&self.pad());
                out.push_str(&format!(
                    "if (!({})) {{\n",
                    pattern::condition(pattern, &tmp)
                ));
                out.push_str(&self.pad());
                out.push_str("  break;\n");
                out.push_str(&self.pad());
                out.push_str("}\n");
                for b in pattern::bindings(pattern, &tmp, "let") {
                    out.push_str(&self.pad());
                    out.push_str(&b);
                    out.push_str("\n");
                }
                for n in pattern::binding_names(pattern) {
                    self.declare(&n, None);
                }
                for st in body {
                    out.push(self.emit_stmt(st, cx));
                }
                self.indent -= 1;
                self.pop_scope();
                out.push_str(&self.pad());
                out.push_str("}\n");
                out
            }
        }
    }

    // ── Match desugaring ─────────────────────────────────────────────

    /// Desugar a match expression. Returns the statement lines to hoist
    /// and the name of the result slot the expression reads.
    pub(crate) fn emit_match_value(
        &mut self,
        scrutinee: &'a Expr,
        arms: &'a [MatchExprArm],
        cx: Cx<'_>,
    ) -> (Fragment, String) {
        let core: Vec<CoreArm<'a>> = arms
            .iter()
            .map(|a| CoreArm {
                pattern: &a.pattern,
                guard: a.guard.as_ref(),
                body: CoreBody::Value(&a.value),
            })
            .collect();
        let (frag, names) = self.emit_match_core(scrutinee, &core, true, None, cx);
        (frag, names.val())
    }

    /// The shared first-match-wins lowering. One pass over the arms, in
    /// source order: each arm re-tests the commit flag, so a committed
    /// match skips every later arm, and a failed guard falls through to
    /// the next one. A final flag test throws on no match at all.
    fn emit_match_core(
        &mut self,
        scrutinee: &'a Expr,
        arms: &[CoreArm<'a>],
        with_val: bool,
        pos: Option<Pos>,
        cx: Cx<'_>,
    ) -> (Fragment, MatchNames) {
        let scrut_frag = self.emit_expr(scrutinee, cx);
        let mut out = self.take_hoist();
        let names = self.names.match_names();

        out.push_str(&self.pad());
        out.map_pos(pos);
        out.push_str(&format!("const {} = ", names.scrut()));
        out.push(scrut_frag);
        out.push_str(";\n");
        out.push_str(&self.pad());
        out.push_str(&format!("let {} = false;\n", names.ok()));
        if with_val {
            out.push_str(&self.pad());
            out.push_str(&format!("let {};\n", names.val()));
        }

        for arm in arms {
            let cond = pattern::condition(arm.pattern, &names.scrut());
            out.push_str(&self.pad());
            if cond == "true" {
                out.push_str(&format!("if (!{}) {{\n", names.ok()));
            } else {
                out.push_str(&format!("if (!{} && {cond}) {{\n", names.ok()));
            }

            self.push_scope();
            self.indent += 1;
            for b in pattern::bindings(arm.pattern, &names.scrut(), "let") {
                out.push_str(&self.pad());
                out.push_str(&b);
                out.push_str("\n");
            }
            for n in pattern::binding_names(arm.pattern) {
                self.declare(&n, None);
            }
            match arm.guard {
                Some(g) => {
                    let guard_frag = self.emit_expr(g, cx);
                    out.push(self.take_hoist());
                    out.push_str(&self.pad());
                    out.push_str("if (");
                    out.push(guard_frag);
                    out.push_str(") {\n");
                    self.indent += 1;
                    out.push(self.emit_arm_commit(&names, &arm.body, cx));
                    self.indent -= 1;
                    out.push_str(&self.pad());
                    out.push_str("}\n");
                }
                None => {
                    out.push(self.emit_arm_commit(&names, &arm.body, cx));
                }
            }
            self.indent -= 1;
            self.pop_scope();
            out.push_str(&self.pad());
            out.push_str("}\n");
        }

        out.push_str(&self.pad());
        out.push_str(&format!("if (!{}) {{\n", names.ok()));
        out.push_str(&self.pad());
        out.push_str("  throw new Error(\"non-exhaustive match\");\n");
        out.push_str(&self.pad());
        out.push_str("}\n");

        (out, names)
    }

    fn emit_arm_commit(
        &mut self,
        names: &MatchNames,
        body: &CoreBody<'a>,
        cx: Cx<'_>,
    ) -> Fragment {
        let mut out = Fragment::new();
        out.push_str(&self.pad());
        out.push_str(&format!("{} = true;\n", names.ok()));
        match body {
            CoreBody::Value(v) => {
                let value_frag = self.emit_expr(v, cx);
                out.push(self.take_hoist());
                out.push_str(&self.pad());
                out.push_str(&format!("{} = ", names.val()));
                out.push(value_frag);
                out.push_str(";\n");
            }
            CoreBody::Stmts(stmts) => {
                for st in *stmts {
                    out.push(self.emit_stmt(st, cx));
                }
            }
        }
        out
    }

    // ── Assignment targets ───────────────────────────────────────────

    /// Render an assignment target. Targets stay raw: member chains and
    /// index steps never reroute through the checked runtime helpers,
    /// and names never resolve to the runtime surface. Index and member
    /// steps recurse so nested paths like `grid[i].cell[j]` stay
    /// assignable end to end.
    fn emit_assign_target(&mut self, target: &'a Expr, cx: Cx<'_>) -> Fragment {
        let mut out = Fragment::new();
        out.map_pos(target.pos);
        match &target.kind {
            ExprKind::Ident(name) => out.push_str(name),
            ExprKind::Member { object, field } => {
                out.push(self.emit_assign_target(object, cx));
                if !field.is_empty() && field.bytes().all(|b| b.is_ascii_digit()) {
                    out.push_str("[");
                    out.push_str(field);
                    out.push_str("]");
                } else {
                    out.push_str(".");
                    out.push_str(field);
                }
            }
            ExprKind::Index { object, index } => {
                out.push(self.emit_assign_target(object, cx));
                out.push_str("[");
                out.push(self.emit_expr(index, cx));
                out.push_str("]");
            }
            ExprKind::Num(_)
            | ExprKind::Bool(_)
            | ExprKind::Str(_)
            | ExprKind::Interp(_)
            | ExprKind::Unary { .. }
            | ExprKind::Binary { .. }
            | ExprKind::Call { .. }
            | ExprKind::Range { .. }
            | ExprKind::Cast { .. }
            | ExprKind::StructLit { .. }
            | ExprKind::Array(_)
            | ExprKind::Tuple(_)
            | ExprKind::Repeat { .. }
            | ExprKind::Lambda { .. }
            | ExprKind::Await(_)
            | ExprKind::Try(_)
            | ExprKind::IsVariant { .. }
            | ExprKind::Match { .. }
            | ExprKind::Select(_)
            | ExprKind::MacroCall { .. } => out.push(self.emit_expr(target, cx)),
        }
        out
    }
}
