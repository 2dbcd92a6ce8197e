//! Expression emission.
//!
//! Implements `emit_expr`, which renders each expression kind into a
//! [`Fragment`]. The dispatch is exhaustive over the closed `ExprKind`
//! sum, so a new node kind fails to compile until every emitter handles
//! it. Match expressions desugar into statements pushed onto the hoist
//! buffer; the expression itself reads the match's result slot.

use reef_ast::{Callee, CallId, Expr, ExprKind, InterpPart, LambdaBody, Param, SelectArm, TypeExpr};

use super::intrinsics;
use super::traits::Cx;
use super::Codegen;
use crate::constfold::eval_size;
use crate::fragment::{quote_js_string, Fragment};
use crate::runtime;

fn starts_uppercase(s: &str) -> bool {
    s.chars().next().is_some_and(char::is_uppercase)
}

/// The tagged-object representation of an enum value: no payload field
/// for unit variants, the bare value for one payload, an array for more.
/// Always parenthesized, so the emitted text is safe at statement start.
fn make_tagged(variant: &str, args: Vec<Fragment>) -> Fragment {
    let mut out = Fragment::new();
    out.push_str("({ tag: ");
    out.push_str(&quote_js_string(variant));
    match args.len() {
        0 => {}
        1 => {
            out.push_str(", payload: ");
            out.push_join(args, ", ");
        }
        _ => {
            out.push_str(", payload: [");
            out.push_join(args, ", ");
            out.push_str("]");
        }
    }
    out.push_str(" })");
    out
}

impl<'a> Codegen<'a> {
    /// Emit one expression. The node's position, when present, maps to
    /// the first character of the emitted text.
    pub(crate) fn emit_expr(&mut self, e: &'a Expr, cx: Cx<'_>) -> Fragment {
        let mut out = Fragment::new();
        out.map_pos(e.pos);
        out.push(self.emit_expr_kind(&e.kind, cx));
        out
    }

    fn emit_expr_kind(&mut self, kind: &'a ExprKind, cx: Cx<'_>) -> Fragment {
        match kind {
            ExprKind::Num(text) => Fragment::lit(text.clone()),

            ExprKind::Bool(b) => Fragment::lit(if *b { "true" } else { "false" }),

            ExprKind::Str(s) => Fragment::lit(quote_js_string(s)),

            ExprKind::Interp(parts) => self.emit_interp(parts, cx),

            ExprKind::Ident(name) => self.emit_ident(name),

            ExprKind::Unary { op, operand } => {
                let mut out = Fragment::lit("(");
                out.push_str(op.as_str());
                out.push(self.emit_expr(operand, cx));
                out.push_str(")");
                out
            }

            ExprKind::Binary { op, lhs, rhs } => {
                let mut out = Fragment::lit("(");
                out.push(self.emit_expr(lhs, cx));
                out.push_str(" ");
                out.push_str(op.as_str());
                out.push_str(" ");
                out.push(self.emit_expr(rhs, cx));
                out.push_str(")");
                out
            }

            ExprKind::Call {
                callee,
                args,
                call_id,
            } => self.emit_call(callee, args, *call_id, cx),

            ExprKind::Member { object, field } => self.emit_member(object, field, cx),

            ExprKind::Index { object, index } => self.emit_index(object, index, cx),

            ExprKind::Range {
                start,
                end,
                inclusive,
            } => {
                // A bare range materializes as an array.
                let mut out = Fragment::lit(format!("{}.range(", runtime::GLOBAL));
                out.push(self.emit_expr(start, cx));
                out.push_str(", ");
                out.push(self.emit_expr(end, cx));
                out.push_str(if *inclusive { ", true)" } else { ", false)" });
                out
            }

            ExprKind::Cast { value, target } => self.emit_cast(value, target, cx),

            ExprKind::StructLit { name, fields } => self.emit_struct_lit(name, fields, cx),

            ExprKind::Array(elems) => {
                let mut out = Fragment::lit("[");
                let parts: Vec<Fragment> =
                    elems.iter().map(|e| self.emit_expr(e, cx)).collect();
                out.push_join(parts, ", ");
                out.push_str("]");
                out
            }

            // Tuples share the array representation; the pattern compiler
            // and tuple-let destructuring both count on it.
            ExprKind::Tuple(elems) => {
                let mut out = Fragment::lit("[");
                let parts: Vec<Fragment> =
                    elems.iter().map(|e| self.emit_expr(e, cx)).collect();
                out.push_join(parts, ", ");
                out.push_str("]");
                out
            }

            ExprKind::Repeat { value, count } => {
                let mut out = Fragment::lit("new Array(");
                out.push(self.emit_expr(count, cx));
                out.push_str(").fill(");
                out.push(self.emit_expr(value, cx));
                out.push_str(")");
                out
            }

            ExprKind::Lambda {
                params,
                body,
                is_async,
            } => self.emit_lambda(params, body, *is_async, cx),

            ExprKind::Await(inner) => {
                let mut out = Fragment::lit("(await ");
                out.push(self.emit_expr(inner, cx));
                out.push_str(")");
                out
            }

            ExprKind::Try(inner) => {
                let mut out = Fragment::lit(format!("{}.unwrap(", runtime::GLOBAL));
                out.push(self.emit_expr(inner, cx));
                out.push_str(")");
                out
            }

            ExprKind::IsVariant { value, variant } => {
                let mut out = Fragment::lit("(");
                out.push(self.emit_expr(value, cx));
                out.push_str(".tag === ");
                out.push_str(&quote_js_string(variant));
                out.push_str(")");
                out
            }

            ExprKind::Match { scrutinee, arms } => {
                let (desugared, val) = self.emit_match_value(scrutinee, arms, cx);
                self.hoist.push(desugared);
                Fragment::lit(val)
            }

            ExprKind::Select(arms) => self.emit_select(arms, cx),

            ExprKind::MacroCall { name, .. } => Fragment::lit(format!(
                "(() => {{ throw new Error(\"macro expansion not supported: {name}!\"); }})()"
            )),
        }
    }

    // ── Names ────────────────────────────────────────────────────────

    /// Resolve a bare identifier reference. Locals shadow everything;
    /// unit enum variants construct; known runtime names route through
    /// the runtime binding; everything else emits verbatim.
    fn emit_ident(&mut self, name: &str) -> Fragment {
        if self.is_local(name)
            || self.known_functions.contains(name)
            || self.structs.contains_key(name)
        {
            return Fragment::lit(name);
        }
        if let Some(0) = self.variant_arity.get(name) {
            return make_tagged(name, Vec::new());
        }
        if runtime::is_runtime_name(name) {
            return Fragment::lit(format!("{}.{name}", runtime::GLOBAL));
        }
        Fragment::lit(name)
    }

    // ── Calls ────────────────────────────────────────────────────────

    /// Emit a call. Resolution order: the pre-resolved dispatch table,
    /// then default-method self-param rerouting, then built-in helper
    /// methods, then enum construction, then runtime names, then a plain
    /// call.
    fn emit_call(
        &mut self,
        callee: &'a Callee,
        args: &'a [Expr],
        call_id: Option<CallId>,
        cx: Cx<'_>,
    ) -> Fragment {
        if let Some(target) = call_id.and_then(|id| self.dispatch.resolve(id)) {
            // A method callee's receiver becomes the first argument of
            // the resolved free function.
            let target = target.to_string();
            let mut parts = Vec::new();
            if let Callee::Method { receiver, .. } = callee {
                parts.push(self.emit_expr(receiver, cx));
            }
            parts.extend(args.iter().map(|a| self.emit_expr(a, cx)));
            return self.call_text(&target, parts);
        }

        match callee {
            Callee::Method { receiver, name } => {
                if let Some(dm) = cx.dm {
                    if let ExprKind::Ident(recv) = &receiver.kind {
                        if dm.self_params.iter().any(|p| p == recv) {
                            let mangled =
                                self.mangler.mangle(&dm.trait_name, &dm.type_name, name);
                            let mut parts = vec![self.emit_expr(receiver, cx)];
                            parts.extend(args.iter().map(|a| self.emit_expr(a, cx)));
                            return self.call_text(&mangled, parts);
                        }
                    }
                }
                if let Some(helper) = intrinsics::helper_call(name, args.len()) {
                    let mut parts = vec![self.emit_expr(receiver, cx)];
                    parts.extend(args.iter().map(|a| self.emit_expr(a, cx)));
                    return self.call_text(&format!("{}.{helper}", runtime::GLOBAL), parts);
                }
                let mut out = self.emit_expr(receiver, cx);
                out.push_str(".");
                out.push_str(name);
                out.push_str("(");
                let parts: Vec<Fragment> =
                    args.iter().map(|a| self.emit_expr(a, cx)).collect();
                out.push_join(parts, ", ");
                out.push_str(")");
                out
            }

            Callee::Qualified { ty, name } => {
                let known_enum = self.enum_types.contains(ty.as_str());
                let looks_like_variant = starts_uppercase(ty)
                    && starts_uppercase(name)
                    && !self.structs.contains_key(ty.as_str())
                    && !self.traits.contains_key(ty.as_str());
                if known_enum || looks_like_variant {
                    let parts: Vec<Fragment> =
                        args.iter().map(|a| self.emit_expr(a, cx)).collect();
                    return make_tagged(name, parts);
                }
                let parts: Vec<Fragment> =
                    args.iter().map(|a| self.emit_expr(a, cx)).collect();
                self.call_text(&format!("{ty}.{name}"), parts)
            }

            Callee::Name(name) => {
                let plain = self.is_local(name)
                    || self.known_functions.contains(name.as_str())
                    || self.structs.contains_key(name.as_str());
                if plain {
                    let parts: Vec<Fragment> =
                        args.iter().map(|a| self.emit_expr(a, cx)).collect();
                    return self.call_text(name, parts);
                }
                if self.variant_arity.contains_key(name.as_str()) {
                    let parts: Vec<Fragment> =
                        args.iter().map(|a| self.emit_expr(a, cx)).collect();
                    return make_tagged(name, parts);
                }
                if runtime::is_runtime_name(name) {
                    let parts: Vec<Fragment> =
                        args.iter().map(|a| self.emit_expr(a, cx)).collect();
                    return self.call_text(&format!("{}.{name}", runtime::GLOBAL), parts);
                }
                if starts_uppercase(name) {
                    let parts: Vec<Fragment> =
                        args.iter().map(|a| self.emit_expr(a, cx)).collect();
                    return make_tagged(name, parts);
                }
                let parts: Vec<Fragment> =
                    args.iter().map(|a| self.emit_expr(a, cx)).collect();
                self.call_text(name, parts)
            }
        }
    }

    fn call_text(&mut self, target: &str, args: Vec<Fragment>) -> Fragment {
        let mut out = Fragment::lit(target);
        out.push_str("(");
        out.push_join(args, ", ");
        out.push_str(")");
        out
    }

    // ── Member access and indexing ───────────────────────────────────

    fn emit_member(&mut self, object: &'a Expr, field: &str, cx: Cx<'_>) -> Fragment {
        // Tuple position access reads the backing array.
        if !field.is_empty() && field.bytes().all(|b| b.is_ascii_digit()) {
            let mut out = self.emit_expr(object, cx);
            out.push_str("[");
            out.push_str(field);
            out.push_str("]");
            return out;
        }
        // `Shape.Dot` constructs a unit variant when `Shape` names an
        // enum, or when both sides merely look like one.
        if let ExprKind::Ident(tyname) = &object.kind {
            if !self.is_local(tyname) {
                if self.enum_types.contains(tyname.as_str()) {
                    if let Some(0) = self.variant_arity.get(&format!("{tyname}::{field}")) {
                        return make_tagged(field, Vec::new());
                    }
                } else if starts_uppercase(tyname)
                    && starts_uppercase(field)
                    && !self.structs.contains_key(tyname.as_str())
                    && !self.traits.contains_key(tyname.as_str())
                {
                    return make_tagged(field, Vec::new());
                }
            }
        }
        let mut out = self.emit_expr(object, cx);
        out.push_str(".");
        out.push_str(field);
        out
    }

    fn emit_index(&mut self, object: &'a Expr, index: &'a Expr, cx: Cx<'_>) -> Fragment {
        if let ExprKind::Range {
            start,
            end,
            inclusive,
        } = &index.kind
        {
            let mut out = Fragment::lit(format!("{}.slice(", runtime::GLOBAL));
            out.push(self.emit_expr(object, cx));
            out.push_str(", ");
            out.push(self.emit_expr(start, cx));
            out.push_str(", ");
            if *inclusive {
                out.push_str("(");
                out.push(self.emit_expr(end, cx));
                out.push_str(" + 1)");
            } else {
                out.push(self.emit_expr(end, cx));
            }
            out.push_str(")");
            return out;
        }

        // Locals declared as arrays index through the checked helper,
        // carrying the expected length when the declared size folds.
        if let ExprKind::Ident(name) = &object.kind {
            if let Some(size) = self.declared_array_size(name) {
                let mut out = Fragment::lit(format!("{}.idx(", runtime::GLOBAL));
                out.push(self.emit_expr(object, cx));
                out.push_str(", ");
                out.push(self.emit_expr(index, cx));
                if let Some(n) = size {
                    out.push_str(&format!(", {n}"));
                }
                out.push_str(")");
                return out;
            }
        }

        let mut out = self.emit_expr(object, cx);
        out.push_str("[");
        out.push(self.emit_expr(index, cx));
        out.push_str("]");
        out
    }

    /// `Some(folded)` when `name` is an in-scope binding declared with an
    /// array type; the inner option is whether the size expression folds.
    fn declared_array_size(&self, name: &str) -> Option<Option<i64>> {
        let ty = self.local_type(name).flatten()?;
        match ty {
            TypeExpr::Array { size, .. } => Some(size.as_deref().and_then(eval_size)),
            _ => None,
        }
    }

    // ── Casts ────────────────────────────────────────────────────────

    /// Numeric casts compile to JavaScript coercion formulas; `String`
    /// casts stringify through the runtime; unknown targets pass the
    /// value through unchanged.
    fn emit_cast(&mut self, value: &'a Expr, target: &'a TypeExpr, cx: Cx<'_>) -> Fragment {
        let v = self.emit_expr(value, cx);
        let Some(name) = target.name() else {
            return v;
        };
        let mut out = Fragment::new();
        match name {
            "i8" => {
                out.push_str("((");
                out.push(v);
                out.push_str(" | 0) << 24 >> 24)");
            }
            "u8" => {
                out.push_str("((");
                out.push(v);
                out.push_str(" | 0) & 255)");
            }
            "i16" => {
                out.push_str("((");
                out.push(v);
                out.push_str(" | 0) << 16 >> 16)");
            }
            "u16" => {
                out.push_str("((");
                out.push(v);
                out.push_str(" | 0) & 65535)");
            }
            "i32" => {
                out.push_str("(");
                out.push(v);
                out.push_str(" | 0)");
            }
            "u32" => {
                out.push_str("(");
                out.push(v);
                out.push_str(" >>> 0)");
            }
            "f32" => {
                out.push_str("Math.fround(");
                out.push(v);
                out.push_str(")");
            }
            "int" | "i64" | "u64" => {
                out.push_str("Math.trunc(");
                out.push(v);
                out.push_str(")");
            }
            "String" => {
                out.push_str(runtime::GLOBAL);
                out.push_str(".str(");
                out.push(v);
                out.push_str(")");
            }
            _ => return v,
        }
        out
    }

    // ── Literals with structure ──────────────────────────────────────

    /// A struct literal calls the declared constructor with arguments in
    /// declared field order (`undefined` where the literal omits one), so
    /// the constructor's array-length guards always run. Literals of
    /// undeclared structs fall back to a direct object literal.
    fn emit_struct_lit(
        &mut self,
        name: &str,
        fields: &'a [(String, Expr)],
        cx: Cx<'_>,
    ) -> Fragment {
        if let Some(decl) = self.structs.get(name).copied() {
            let parts: Vec<Fragment> = decl
                .fields
                .iter()
                .map(|fd| {
                    match fields.iter().find(|(n, _)| *n == fd.name) {
                        Some((_, value)) => self.emit_expr(value, cx),
                        None => Fragment::lit("undefined"),
                    }
                })
                .collect();
            return self.call_text(name, parts);
        }
        let mut out = Fragment::lit("({ ");
        let parts: Vec<Fragment> = fields
            .iter()
            .map(|(n, value)| {
                let mut f = Fragment::lit(format!("{n}: "));
                f.push(self.emit_expr(value, cx));
                f
            })
            .collect();
        out.push_join(parts, ", ");
        out.push_str(" })");
        out
    }

    fn emit_interp(&mut self, parts: &'a [InterpPart], cx: Cx<'_>) -> Fragment {
        if parts.is_empty() {
            return Fragment::lit("\"\"");
        }
        if let [InterpPart::Lit(s)] = parts {
            return Fragment::lit(quote_js_string(s));
        }
        let mut out = Fragment::lit("(");
        let pieces: Vec<Fragment> = parts
            .iter()
            .map(|part| match part {
                InterpPart::Lit(s) => Fragment::lit(quote_js_string(s)),
                InterpPart::Expr(e) => {
                    let mut f = Fragment::lit(format!("{}.str(", runtime::GLOBAL));
                    f.push(self.emit_expr(e, cx));
                    f.push_str(")");
                    f
                }
            })
            .collect();
        out.push_join(pieces, " + ");
        out.push_str(")");
        out
    }

    // ── Lambdas and select ───────────────────────────────────────────

    fn emit_lambda(
        &mut self,
        params: &'a [Param],
        body: &'a LambdaBody,
        is_async: bool,
        cx: Cx<'_>,
    ) -> Fragment {
        let mut out = Fragment::lit("(");
        if is_async {
            out.push_str("async ");
        }
        out.push_str("(");
        let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
        out.push_str(&names.join(", "));
        out.push_str(") => ");

        self.push_scope();
        for p in params {
            self.declare(&p.name, p.ty.as_ref());
        }
        match body {
            LambdaBody::Expr(e) => {
                // Anything the body hoists must re-evaluate per call, so
                // a hoisting expression body turns into a block body.
                self.indent += 1;
                let value = self.emit_expr(e, cx);
                let pre = self.take_hoist();
                if pre.is_empty() {
                    self.indent -= 1;
                    out.push(value);
                } else {
                    out.push_str("{\n");
                    out.push(pre);
                    out.push_str(&self.pad());
                    out.push_str("return ");
                    out.push(value);
                    out.push_str(";\n");
                    self.indent -= 1;
                    out.push_str(&self.pad());
                    out.push_str("}");
                }
            }
            LambdaBody::Block(stmts) => {
                out.push_str("{\n");
                out.push(self.emit_body(stmts, cx));
                out.push_str(&self.pad());
                out.push_str("}");
            }
        }
        self.pop_scope();
        out.push_str(")");
        out
    }

    /// A select races its arms: each becomes an immediately invoked
    /// async closure that awaits the arm's future, binds the result when
    /// asked to, and returns the arm's value.
    fn emit_select(&mut self, arms: &'a [SelectArm], cx: Cx<'_>) -> Fragment {
        let mut out = Fragment::lit("(await Promise.race([");
        let parts: Vec<Fragment> = arms
            .iter()
            .map(|arm| self.emit_select_arm(arm, cx))
            .collect();
        out.push_join(parts, ", ");
        out.push_str("]))");
        out
    }

    fn emit_select_arm(&mut self, arm: &'a SelectArm, cx: Cx<'_>) -> Fragment {
        self.push_scope();
        self.indent += 1;
        let future = self.emit_expr(&arm.future, cx);
        let future_pre = self.take_hoist();
        if let Some(b) = &arm.binding {
            self.declare(b, None);
        }
        let body = self.emit_expr(&arm.body, cx);
        let body_pre = self.take_hoist();

        let mut out = Fragment::lit("(async () => ");
        if future_pre.is_empty() && body_pre.is_empty() {
            self.indent -= 1;
            out.push_str("{ ");
            match &arm.binding {
                Some(b) => {
                    out.push_str(&format!("const {b} = (await "));
                    out.push(future);
                    out.push_str(");");
                }
                None => {
                    out.push_str("(await ");
                    out.push(future);
                    out.push_str(");");
                }
            }
            out.push_str(" return ");
            out.push(body);
            out.push_str("; })()");
        } else {
            out.push_str("{\n");
            out.push(future_pre);
            out.push_str(&self.pad());
            match &arm.binding {
                Some(b) => {
                    out.push_str(&format!("const {b} = (await "));
                    out.push(future);
                    out.push_str(");\n");
                }
                None => {
                    out.push_str("(await ");
                    out.push(future);
                    out.push_str(");\n");
                }
            }
            out.push(body_pre);
            out.push_str(&self.pad());
            out.push_str("return ");
            out.push(body);
            out.push_str(";\n");
            self.indent -= 1;
            out.push_str(&self.pad());
            out.push_str("})()");
        }
        self.pop_scope();
        out
    }
}

#[cfg(test)]
mod tests {
    use reef_ast::{BinaryOp, Expr, ExprKind, InterpPart, TypeExpr, UnaryOp};

    use super::super::{Codegen, CodegenOptions, Cx, DispatchTable, SeparatorMangler};

    fn deps() -> (SeparatorMangler, DispatchTable, CodegenOptions) {
        (
            SeparatorMangler::default(),
            DispatchTable::new(),
            CodegenOptions::default(),
        )
    }

    #[test]
    fn literals_and_operators() {
        let (m, d, o) = deps();
        let mut cg = Codegen::new(&m, &d, &o);
        cg.push_scope();

        let e = Expr::binary(BinaryOp::Add, Expr::num("1"), Expr::num("2.5"));
        assert_eq!(cg.emit_expr(&e, Cx::default()).text(), "(1 + 2.5)");
        let e = Expr::unary(UnaryOp::Not, Expr::bool(true));
        assert_eq!(cg.emit_expr(&e, Cx::default()).text(), "(!true)");
        let e = Expr::str("a\"b");
        assert_eq!(cg.emit_expr(&e, Cx::default()).text(), "\"a\\\"b\"");
    }

    #[test]
    fn equality_is_strict() {
        let (m, d, o) = deps();
        let mut cg = Codegen::new(&m, &d, &o);
        cg.push_scope();
        cg.declare("a", None);
        cg.declare("b", None);

        let e = Expr::binary(BinaryOp::Eq, Expr::ident("a"), Expr::ident("b"));
        assert_eq!(cg.emit_expr(&e, Cx::default()).text(), "(a === b)");
        let e = Expr::binary(BinaryOp::Ne, Expr::ident("a"), Expr::ident("b"));
        assert_eq!(cg.emit_expr(&e, Cx::default()).text(), "(a !== b)");
    }

    #[test]
    fn cast_formulas() {
        let (m, d, o) = deps();
        let cases = [
            ("i8", "((v | 0) << 24 >> 24)"),
            ("u8", "((v | 0) & 255)"),
            ("i16", "((v | 0) << 16 >> 16)"),
            ("u16", "((v | 0) & 65535)"),
            ("i32", "(v | 0)"),
            ("u32", "(v >>> 0)"),
            ("f32", "Math.fround(v)"),
            ("f64", "v"),
            ("int", "Math.trunc(v)"),
            ("String", "$rt.str(v)"),
            ("Meters", "v"),
        ];
        let exprs: Vec<Expr> = cases
            .iter()
            .map(|(ty, _)| {
                Expr::new(ExprKind::Cast {
                    value: Box::new(Expr::ident("v")),
                    target: TypeExpr::named(*ty),
                })
            })
            .collect();

        let mut cg = Codegen::new(&m, &d, &o);
        cg.push_scope();
        cg.declare("v", None);
        for (e, (_, want)) in exprs.iter().zip(cases.iter()) {
            assert_eq!(cg.emit_expr(e, Cx::default()).text(), *want);
        }
    }

    #[test]
    fn interpolation_joins_parts() {
        let (m, d, o) = deps();
        let mut cg = Codegen::new(&m, &d, &o);
        cg.push_scope();
        cg.declare("x", None);

        let e = Expr::new(ExprKind::Interp(vec![
            InterpPart::Lit("x = ".to_string()),
            InterpPart::Expr(Expr::ident("x")),
        ]));
        assert_eq!(
            cg.emit_expr(&e, Cx::default()).text(),
            "(\"x = \" + $rt.str(x))"
        );

        let empty = Expr::new(ExprKind::Interp(vec![]));
        assert_eq!(cg.emit_expr(&empty, Cx::default()).text(), "\"\"");
    }

    #[test]
    fn runtime_names_route_through_global() {
        let (m, d, o) = deps();
        let mut cg = Codegen::new(&m, &d, &o);
        cg.push_scope();

        let e = Expr::call("println", vec![Expr::str("hi")]);
        assert_eq!(
            cg.emit_expr(&e, Cx::default()).text(),
            "$rt.println(\"hi\")"
        );

        // A local of the same name shadows the runtime surface.
        cg.declare("println", None);
        let e = Expr::call("println", vec![]);
        assert_eq!(cg.emit_expr(&e, Cx::default()).text(), "println()");
    }

    #[test]
    fn qualified_call_constructs_variant_by_shape() {
        let (m, d, o) = deps();
        let mut cg = Codegen::new(&m, &d, &o);
        cg.push_scope();

        let e = Expr::qualified_call("Shape", "Circle", vec![Expr::num("2")]);
        assert_eq!(
            cg.emit_expr(&e, Cx::default()).text(),
            "({ tag: \"Circle\", payload: 2 })"
        );
        let e = Expr::qualified_call("Pair", "Both", vec![Expr::num("1"), Expr::num("2")]);
        assert_eq!(
            cg.emit_expr(&e, Cx::default()).text(),
            "({ tag: \"Both\", payload: [1, 2] })"
        );
    }

    #[test]
    fn member_on_type_name_constructs_unit_variant() {
        let (m, d, o) = deps();
        let mut cg = Codegen::new(&m, &d, &o);
        cg.push_scope();

        let e = Expr::member(Expr::ident("Shape"), "Dot");
        assert_eq!(cg.emit_expr(&e, Cx::default()).text(), "({ tag: \"Dot\" })");

        // Ordinary field access stays raw.
        cg.declare("point", None);
        let e = Expr::member(Expr::ident("point"), "x");
        assert_eq!(cg.emit_expr(&e, Cx::default()).text(), "point.x");
    }

    #[test]
    fn tuple_member_indexes_backing_array() {
        let (m, d, o) = deps();
        let mut cg = Codegen::new(&m, &d, &o);
        cg.push_scope();
        cg.declare("pair", None);

        let e = Expr::member(Expr::ident("pair"), "0");
        assert_eq!(cg.emit_expr(&e, Cx::default()).text(), "pair[0]");
    }

    #[test]
    fn range_index_slices_and_bare_range_materializes() {
        let (m, d, o) = deps();
        let mut cg = Codegen::new(&m, &d, &o);
        cg.push_scope();
        cg.declare("xs", None);

        let e = Expr::index(
            Expr::ident("xs"),
            Expr::range(Expr::num("1"), Expr::num("3"), false),
        );
        assert_eq!(cg.emit_expr(&e, Cx::default()).text(), "$rt.slice(xs, 1, 3)");

        let e = Expr::index(
            Expr::ident("xs"),
            Expr::range(Expr::num("1"), Expr::num("3"), true),
        );
        assert_eq!(
            cg.emit_expr(&e, Cx::default()).text(),
            "$rt.slice(xs, 1, (3 + 1))"
        );

        let e = Expr::range(Expr::num("0"), Expr::num("5"), false);
        assert_eq!(
            cg.emit_expr(&e, Cx::default()).text(),
            "$rt.range(0, 5, false)"
        );
    }

    #[test]
    fn declared_array_locals_index_checked() {
        let (m, d, o) = deps();
        let ty = TypeExpr::array(TypeExpr::named("u8"), Expr::num("4"));
        let mut cg = Codegen::new(&m, &d, &o);
        cg.push_scope();
        cg.declare("i", None);
        cg.declare("buf", Some(&ty));
        cg.declare("xs", None);

        let e = Expr::index(Expr::ident("buf"), Expr::ident("i"));
        assert_eq!(cg.emit_expr(&e, Cx::default()).text(), "$rt.idx(buf, i, 4)");

        // Untyped locals index raw.
        let e = Expr::index(Expr::ident("xs"), Expr::num("0"));
        assert_eq!(cg.emit_expr(&e, Cx::default()).text(), "xs[0]");
    }

    #[test]
    fn try_unwraps_and_is_variant_tests_tag() {
        let (m, d, o) = deps();
        let mut cg = Codegen::new(&m, &d, &o);
        cg.push_scope();
        cg.declare("r", None);
        cg.declare("s", None);

        let e = Expr::new(ExprKind::Try(Box::new(Expr::ident("r"))));
        assert_eq!(cg.emit_expr(&e, Cx::default()).text(), "$rt.unwrap(r)");

        let e = Expr::new(ExprKind::IsVariant {
            value: Box::new(Expr::ident("s")),
            variant: "Circle".to_string(),
        });
        assert_eq!(
            cg.emit_expr(&e, Cx::default()).text(),
            "(s.tag === \"Circle\")"
        );
    }

    #[test]
    fn repeat_fills_array() {
        let (m, d, o) = deps();
        let mut cg = Codegen::new(&m, &d, &o);
        cg.push_scope();

        let e = Expr::new(ExprKind::Repeat {
            value: Box::new(Expr::num("0")),
            count: Box::new(Expr::num("8")),
        });
        assert_eq!(
            cg.emit_expr(&e, Cx::default()).text(),
            "new Array(8).fill(0)"
        );
    }

    #[test]
    fn macro_call_throws() {
        let (m, d, o) = deps();
        let mut cg = Codegen::new(&m, &d, &o);
        cg.push_scope();

        let e = Expr::new(ExprKind::MacroCall {
            name: "vec".to_string(),
            args: vec![Expr::num("1")],
        });
        assert_eq!(
            cg.emit_expr(&e, Cx::default()).text(),
            "(() => { throw new Error(\"macro expansion not supported: vec!\"); })()"
        );
    }

    #[test]
    fn helper_methods_use_runtime() {
        let (m, d, o) = deps();
        let mut cg = Codegen::new(&m, &d, &o);
        cg.push_scope();
        cg.declare("a", None);
        cg.declare("b", None);

        let e = Expr::method_call(Expr::ident("a"), "eq", vec![Expr::ident("b")]);
        assert_eq!(cg.emit_expr(&e, Cx::default()).text(), "$rt.eq(a, b)");

        // Same name, wrong arity: plain method call.
        let e = Expr::method_call(Expr::ident("a"), "eq", vec![]);
        assert_eq!(cg.emit_expr(&e, Cx::default()).text(), "a.eq()");
    }
}
