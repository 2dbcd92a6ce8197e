//! Trait dispatch: mangled impl methods and default-method synthesis.
//!
//! Every method of a trait implementation lowers to a free function
//! under a mangled name computed by the externally supplied
//! [`NameMangler`]. Trait methods with default bodies that an impl does
//! not override are synthesized under the same scheme; inside such a
//! body, method calls on a self-typed parameter reroute to the sibling
//! mangled function with the receiver prepended as first argument.
//!
//! Pre-resolved dispatch decisions arrive in a [`DispatchTable`] keyed
//! by call-site id and take precedence over everything local.

use reef_ast::{CallId, ImplDecl};
use rustc_hash::FxHashMap;

use crate::fragment::Fragment;

/// Produces the target-level name of a (trait, concrete type, method)
/// triple. Pure: equal inputs give equal names across the whole run.
pub trait NameMangler {
    fn mangle(&self, trait_name: &str, type_name: &str, method: &str) -> String;
}

/// The standard mangler: `Trait__method__Type`, e.g.
/// `Geometry__area__Square`.
#[derive(Debug, Clone)]
pub struct SeparatorMangler {
    separator: String,
}

impl SeparatorMangler {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }
}

impl Default for SeparatorMangler {
    fn default() -> Self {
        Self::new("__")
    }
}

impl NameMangler for SeparatorMangler {
    fn mangle(&self, trait_name: &str, type_name: &str, method: &str) -> String {
        let s = &self.separator;
        format!("{trait_name}{s}{method}{s}{type_name}")
    }
}

/// Pre-resolved trait dispatch, keyed by call-site id.
#[derive(Debug, Clone, Default)]
pub struct DispatchTable {
    resolved: FxHashMap<CallId, String>,
}

impl DispatchTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: CallId, mangled: impl Into<String>) {
        self.resolved.insert(id, mangled.into());
    }

    pub fn resolve(&self, id: CallId) -> Option<&str> {
        self.resolved.get(&id).map(String::as_str)
    }
}

/// Context active while a synthesized default-method body is emitted.
#[derive(Debug, Clone)]
pub struct DefaultMethodCtx {
    pub trait_name: String,
    pub type_name: String,
    /// Parameters of the method whose declared type is the trait's
    /// self-type; calls through these reroute to mangled siblings.
    pub self_params: Vec<String>,
}

/// Emission context threaded down the recursive emit calls. Passed by
/// value so a nested emission cannot leak context back out.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cx<'c> {
    pub dm: Option<&'c DefaultMethodCtx>,
}

impl<'a> super::Codegen<'a> {
    /// Emit one trait implementation: explicit methods first, then a
    /// synthesized function for every defaulted method the impl leaves
    /// out, all under mangled names.
    pub(crate) fn emit_impl(&mut self, imp: &'a ImplDecl) -> Fragment {
        let mut pieces = Vec::new();

        for m in &imp.methods {
            let mangled = self
                .mangler
                .mangle(&imp.trait_name, &imp.type_name, &m.name);
            self.exports.push(mangled.clone());
            pieces.push(self.emit_fn_like(
                &mangled,
                &m.params,
                &m.body,
                m.is_async,
                m.pos,
                Cx::default(),
            ));
        }

        if let Some(tr) = self.traits.get(imp.trait_name.as_str()).copied() {
            for tm in &tr.methods {
                if imp.methods.iter().any(|m| m.name == tm.name) {
                    continue;
                }
                let Some(body) = &tm.default_body else {
                    continue;
                };
                let mangled = self
                    .mangler
                    .mangle(&imp.trait_name, &imp.type_name, &tm.name);
                self.exports.push(mangled.clone());
                let dm = DefaultMethodCtx {
                    trait_name: imp.trait_name.clone(),
                    type_name: imp.type_name.clone(),
                    self_params: tm
                        .params
                        .iter()
                        .filter(|p| {
                            p.name == "self"
                                || p.ty
                                    .as_ref()
                                    .is_some_and(|t| t.is_self_for(&imp.trait_name))
                        })
                        .map(|p| p.name.clone())
                        .collect(),
                };
                pieces.push(self.emit_fn_like(
                    &mangled,
                    &tm.params,
                    body,
                    tm.is_async,
                    tm.pos,
                    Cx { dm: Some(&dm) },
                ));
            }
        }

        let mut out = Fragment::new();
        out.push_join(pieces, "\n\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separator_mangler_joins_triple() {
        let m = SeparatorMangler::default();
        assert_eq!(
            m.mangle("Geometry", "Square", "area"),
            "Geometry__area__Square"
        );
        let dollar = SeparatorMangler::new("$");
        assert_eq!(dollar.mangle("A", "B", "c"), "A$c$B");
    }

    #[test]
    fn mangler_is_deterministic() {
        let m = SeparatorMangler::default();
        assert_eq!(
            m.mangle("Show", "Point", "fmt"),
            m.mangle("Show", "Point", "fmt")
        );
    }

    #[test]
    fn dispatch_table_resolves_by_call_site() {
        let mut t = DispatchTable::new();
        t.insert(CallId(7), "Geometry__area__Square");
        assert_eq!(t.resolve(CallId(7)), Some("Geometry__area__Square"));
        assert_eq!(t.resolve(CallId(8)), None);
    }
}
