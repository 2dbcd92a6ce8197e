//! The pattern-to-condition/bindings compiler.

use reef_ast::{EnumPatArgs, Expr, ExprKind, Pattern, UnaryOp};

use crate::fragment::quote_js_string;

/// Compile a pattern into a boolean condition over `scrutinee`.
///
/// The condition is a conjunction: structural checks first, then each
/// sub-pattern's condition against its access path. Patterns that always
/// match compile to `"true"`.
pub fn condition(pat: &Pattern, scrutinee: &str) -> String {
    match pat {
        Pattern::Wildcard | Pattern::Binding(_) => "true".to_string(),
        Pattern::Literal(lit) => format!("{scrutinee} === {}", literal_text(lit)),
        Pattern::Tuple(elems) => {
            let mut parts = vec![
                format!("Array.isArray({scrutinee})"),
                format!("{scrutinee}.length === {}", elems.len()),
            ];
            for (i, p) in elems.iter().enumerate() {
                push_sub(&mut parts, p, &format!("{scrutinee}[{i}]"));
            }
            parts.join(" && ")
        }
        Pattern::Struct { fields, .. } => {
            let mut parts = vec![
                format!("typeof {scrutinee} === \"object\""),
                format!("{scrutinee} !== null"),
            ];
            for (field, p) in fields {
                push_sub(&mut parts, p, &format!("{scrutinee}.{field}"));
            }
            parts.join(" && ")
        }
        Pattern::Enum { variant, args, .. } => {
            let mut parts = vec![format!(
                "{scrutinee}.tag === {}",
                quote_js_string(variant)
            )];
            if let EnumPatArgs::Patterns(ps) = args {
                match ps.len() {
                    0 => {}
                    1 => push_sub(&mut parts, &ps[0], &format!("{scrutinee}.payload")),
                    _ => {
                        for (i, p) in ps.iter().enumerate() {
                            push_sub(&mut parts, p, &format!("{scrutinee}.payload[{i}]"));
                        }
                    }
                }
            }
            parts.join(" && ")
        }
    }
}

fn push_sub(parts: &mut Vec<String>, pat: &Pattern, path: &str) {
    let sub = condition(pat, path);
    if sub != "true" {
        parts.push(sub);
    }
}

/// Compile a pattern into binding statements over `scrutinee`, declared
/// with `decl_kw`. The caller may assume the condition already held.
/// The placeholder name `_` binds nothing at any depth.
pub fn bindings(pat: &Pattern, scrutinee: &str, decl_kw: &str) -> Vec<String> {
    let mut out = Vec::new();
    collect_bindings(pat, scrutinee, decl_kw, &mut out);
    out
}

fn collect_bindings(pat: &Pattern, scrutinee: &str, decl_kw: &str, out: &mut Vec<String>) {
    match pat {
        Pattern::Wildcard | Pattern::Literal(_) => {}
        Pattern::Binding(name) => {
            if name != "_" {
                out.push(format!("{decl_kw} {name} = {scrutinee};"));
            }
        }
        Pattern::Tuple(elems) => {
            for (i, p) in elems.iter().enumerate() {
                collect_bindings(p, &format!("{scrutinee}[{i}]"), decl_kw, out);
            }
        }
        Pattern::Struct { fields, .. } => {
            for (field, p) in fields {
                collect_bindings(p, &format!("{scrutinee}.{field}"), decl_kw, out);
            }
        }
        Pattern::Enum { args, .. } => match args {
            EnumPatArgs::None => {}
            EnumPatArgs::Bindings(names) => match names.as_slice() {
                [] => {}
                [single] => {
                    if single != "_" {
                        out.push(format!("{decl_kw} {single} = {scrutinee}.payload;"));
                    }
                }
                many => {
                    for (i, name) in many.iter().enumerate() {
                        if name != "_" {
                            out.push(format!("{decl_kw} {name} = {scrutinee}.payload[{i}];"));
                        }
                    }
                }
            },
            EnumPatArgs::Patterns(ps) => match ps.as_slice() {
                [] => {}
                [single] => {
                    collect_bindings(single, &format!("{scrutinee}.payload"), decl_kw, out)
                }
                many => {
                    for (i, p) in many.iter().enumerate() {
                        collect_bindings(p, &format!("{scrutinee}.payload[{i}]"), decl_kw, out);
                    }
                }
            },
        },
    }
}

/// The names a pattern would bind, in binding order. Used by the
/// desugarer to register arm-local scopes.
pub fn binding_names(pat: &Pattern) -> Vec<String> {
    let mut out = Vec::new();
    collect_names(pat, &mut out);
    out
}

fn collect_names(pat: &Pattern, out: &mut Vec<String>) {
    match pat {
        Pattern::Wildcard | Pattern::Literal(_) => {}
        Pattern::Binding(name) => {
            if name != "_" {
                out.push(name.clone());
            }
        }
        Pattern::Tuple(elems) => elems.iter().for_each(|p| collect_names(p, out)),
        Pattern::Struct { fields, .. } => {
            fields.iter().for_each(|(_, p)| collect_names(p, out))
        }
        Pattern::Enum { args, .. } => match args {
            EnumPatArgs::None => {}
            EnumPatArgs::Bindings(names) => {
                out.extend(names.iter().filter(|n| *n != "_").cloned())
            }
            EnumPatArgs::Patterns(ps) => ps.iter().for_each(|p| collect_names(p, out)),
        },
    }
}

/// Render a literal pattern's comparison operand. Literal patterns only
/// carry number, boolean, string, or negated-number expressions.
fn literal_text(lit: &Expr) -> String {
    match &lit.kind {
        ExprKind::Num(text) => text.clone(),
        ExprKind::Bool(b) => b.to_string(),
        ExprKind::Str(s) => quote_js_string(s),
        ExprKind::Unary {
            op: UnaryOp::Neg,
            operand,
        } => format!("-{}", literal_text(operand)),
        // Not a literal; compare against a value nothing equals.
        _ => "undefined".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reef_ast::Expr;

    #[test]
    fn wildcard_and_binding_always_match() {
        assert_eq!(condition(&Pattern::Wildcard, "$t0"), "true");
        assert_eq!(condition(&Pattern::binding("x"), "$t0"), "true");
    }

    #[test]
    fn binding_materializes_scrutinee() {
        assert_eq!(
            bindings(&Pattern::binding("x"), "$t0", "let"),
            vec!["let x = $t0;"]
        );
        assert!(bindings(&Pattern::binding("_"), "$t0", "let").is_empty());
    }

    #[test]
    fn literal_compares_by_value() {
        assert_eq!(
            condition(&Pattern::Literal(Expr::num("42")), "v"),
            "v === 42"
        );
        assert_eq!(
            condition(&Pattern::Literal(Expr::str("hi")), "v"),
            "v === \"hi\""
        );
        assert_eq!(
            condition(&Pattern::Literal(Expr::bool(true)), "v"),
            "v === true"
        );
        assert!(bindings(&Pattern::Literal(Expr::num("1")), "v", "let").is_empty());
    }

    #[test]
    fn tuple_checks_arity_then_elements() {
        let pat = Pattern::Tuple(vec![
            Pattern::Literal(Expr::num("1")),
            Pattern::binding("b"),
        ]);
        assert_eq!(
            condition(&pat, "$t0"),
            "Array.isArray($t0) && $t0.length === 2 && $t0[0] === 1"
        );
        assert_eq!(bindings(&pat, "$t0", "let"), vec!["let b = $t0[1];"]);
    }

    #[test]
    fn struct_checks_object_then_fields() {
        let pat = Pattern::Struct {
            name: "Point".to_string(),
            fields: vec![
                ("x".to_string(), Pattern::Literal(Expr::num("0"))),
                ("y".to_string(), Pattern::binding("y")),
            ],
        };
        assert_eq!(
            condition(&pat, "p"),
            "typeof p === \"object\" && p !== null && p.x === 0"
        );
        assert_eq!(bindings(&pat, "p", "let"), vec!["let y = p.y;"]);
    }

    #[test]
    fn enum_flat_single_binding_takes_whole_payload() {
        let pat = Pattern::enum_bindings(Some("Shape"), "Circle", &["r"]);
        assert_eq!(condition(&pat, "s"), "s.tag === \"Circle\"");
        assert_eq!(bindings(&pat, "s", "let"), vec!["let r = s.payload;"]);
    }

    #[test]
    fn enum_flat_many_bindings_index_payload() {
        let pat = Pattern::enum_bindings(None, "Rect", &["w", "_", "h"]);
        assert_eq!(
            bindings(&pat, "s", "let"),
            vec!["let w = s.payload[0];", "let h = s.payload[2];"]
        );
    }

    #[test]
    fn enum_unit_has_tag_test_only() {
        let pat = Pattern::enum_bindings(Some("Shape"), "Dot", &[]);
        assert_eq!(condition(&pat, "s"), "s.tag === \"Dot\"");
        assert!(bindings(&pat, "s", "let").is_empty());
    }

    #[test]
    fn enum_nested_patterns_recurse_into_payload() {
        let pat = Pattern::enum_patterns(
            Some("Shape"),
            "Circle",
            vec![Pattern::Literal(Expr::num("0"))],
        );
        assert_eq!(
            condition(&pat, "s"),
            "s.tag === \"Circle\" && s.payload === 0"
        );

        let pat = Pattern::enum_patterns(
            None,
            "Pair",
            vec![Pattern::binding("a"), Pattern::Tuple(vec![
                Pattern::binding("b"),
                Pattern::Wildcard,
            ])],
        );
        assert_eq!(
            condition(&pat, "s"),
            "s.tag === \"Pair\" && Array.isArray(s.payload[1]) && s.payload[1].length === 2"
        );
        assert_eq!(
            bindings(&pat, "s", "let"),
            vec!["let a = s.payload[0];", "let b = s.payload[1][0];"]
        );
    }

    #[test]
    fn binding_names_reports_in_order() {
        let pat = Pattern::Tuple(vec![
            Pattern::binding("a"),
            Pattern::enum_bindings(None, "Both", &["b", "c"]),
        ]);
        assert_eq!(binding_names(&pat), vec!["a", "b", "c"]);
    }
}
