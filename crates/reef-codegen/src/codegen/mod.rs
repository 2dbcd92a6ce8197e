//! JavaScript generation from the typed AST.
//!
//! This module implements the core code generation pass that transforms
//! the front-end's typed AST into JavaScript text with optional source
//! mappings.
//!
//! ## Architecture
//!
//! - [`Codegen`]: Main codegen struct holding registries, scopes, and
//!   minted names
//! - [`expr`]: Expression emission
//! - [`stmt`]: Statement emission and control-flow desugaring
//! - [`traits`]: Mangled trait dispatch and default-method synthesis
//! - [`intrinsics`]: Built-in helper-method table

pub mod expr;
pub mod intrinsics;
pub mod stmt;
pub mod traits;

use reef_ast::{Function, Item, Param, Program, Stmt, StructDecl, TraitDecl, TypeExpr};
use reef_common::Pos;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::constfold::eval_size;
use crate::fragment::{quote_js_string, Fragment};
use crate::names::NameAllocator;
use crate::runtime;
use crate::sourcemap::{SourceMap, Writer};

pub use self::traits::{Cx, DefaultMethodCtx, DispatchTable, NameMangler, SeparatorMangler};

// ── Options ──────────────────────────────────────────────────────────

/// Module convention of the emitted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleFormat {
    Esm,
    Cjs,
}

/// How the emitted file reaches the runtime library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeLinkage {
    /// Import (or require) the runtime package in the preamble.
    Import,
    /// Embed a stand-in runtime object, so the output runs with no
    /// packages installed. See [`crate::runtime::stub_text`].
    InlineStubs,
}

/// Knobs for one compilation.
#[derive(Debug, Clone)]
pub struct CodegenOptions {
    pub module_format: ModuleFormat,
    pub runtime: RuntimeLinkage,
    /// Build a source map alongside the code.
    pub source_map: bool,
    /// Name recorded in the map's `sources` list.
    pub source_name: String,
    /// Original text embedded as `sourcesContent` when present.
    pub source_text: Option<String>,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self {
            module_format: ModuleFormat::Esm,
            runtime: RuntimeLinkage::Import,
            source_map: false,
            source_name: "main.reef".to_string(),
            source_text: None,
        }
    }
}

/// The result of one compilation: the program text, and the source-map
/// artifact when one was requested.
#[derive(Debug, Clone)]
pub struct EmitOutput {
    pub code: String,
    pub map: Option<SourceMap>,
}

// ── Codegen ──────────────────────────────────────────────────────────

/// The main JavaScript code generation context.
///
/// Holds the declaration registries built by the pre-scan, the lexical
/// scope stack, the minted-name counters, and the hoist buffer that
/// carries expression-position desugarings up to the nearest statement.
/// One instance compiles one program; nothing is shared between
/// instances, so independent compilations of the same input produce
/// byte-identical output.
pub struct Codegen<'a> {
    /// Mangling scheme for trait impl methods (externally supplied).
    pub(crate) mangler: &'a dyn NameMangler,
    /// Pre-resolved call-site dispatch decisions.
    pub(crate) dispatch: &'a DispatchTable,
    pub(crate) opts: &'a CodegenOptions,

    /// Temporary and match-family name counters.
    pub(crate) names: NameAllocator,

    // ── Registries (filled by the pre-scan) ──────────────────────────

    /// Variant payload arity, keyed both `Enum::Variant` and bare
    /// `Variant`. For a bare key claimed by two enums, the first
    /// declaration wins.
    pub(crate) variant_arity: FxHashMap<String, usize>,
    /// Declared enum type names.
    pub(crate) enum_types: FxHashSet<String>,
    /// Struct declarations by name (field order for constructor calls).
    pub(crate) structs: FxHashMap<String, &'a StructDecl>,
    /// Trait declarations by name (default-method synthesis).
    pub(crate) traits: FxHashMap<String, &'a TraitDecl>,
    /// Top-level user function names.
    pub(crate) known_functions: FxHashSet<String>,

    // ── Per-function emission state ──────────────────────────────────

    /// Lexical scopes, innermost last. Each binding keeps its declared
    /// type, consulted when the binding is indexed.
    pub(crate) scopes: Vec<FxHashMap<String, Option<&'a TypeExpr>>>,
    /// Statements hoisted out of expression position, drained as a
    /// prefix by the innermost enclosing statement emitter.
    pub(crate) hoist: Vec<Fragment>,
    /// Current indentation depth, two spaces per level.
    pub(crate) indent: usize,

    /// Exported top-level names, in emission order.
    pub(crate) exports: Vec<String>,
}

impl<'a> Codegen<'a> {
    /// Create a codegen instance over externally supplied collaborators.
    pub fn new(
        mangler: &'a dyn NameMangler,
        dispatch: &'a DispatchTable,
        opts: &'a CodegenOptions,
    ) -> Self {
        Codegen {
            mangler,
            dispatch,
            opts,
            names: NameAllocator::new(),
            variant_arity: FxHashMap::default(),
            enum_types: FxHashSet::default(),
            structs: FxHashMap::default(),
            traits: FxHashMap::default(),
            known_functions: FxHashSet::default(),
            scopes: Vec::new(),
            hoist: Vec::new(),
            indent: 0,
            exports: Vec::new(),
        }
    }

    /// Compile a program to JavaScript.
    ///
    /// This is the main entry point. It:
    /// 1. Pre-scans the program into the declaration registries
    /// 2. Emits each function, struct constructor, and impl block
    /// 3. Assembles preamble, declarations, and export footer
    /// 4. Builds the source map, when requested
    pub fn compile(mut self, program: &'a Program) -> EmitOutput {
        // Step 1: registries. Enums and traits emit nothing themselves
        // but construction sites and impls consult them.
        self.collect(program);

        // Step 2: declarations, in program order.
        let mut decls = Vec::new();
        for item in &program.items {
            let frag = match item {
                Item::Function(f) => self.emit_function(f),
                Item::Struct(s) => self.emit_struct(s),
                Item::Impl(i) => self.emit_impl(i),
                Item::Enum(_)
                | Item::Trait(_)
                | Item::TypeAlias { .. }
                | Item::Import { .. }
                | Item::MacroRule { .. }
                | Item::Error { .. } => continue,
            };
            debug_assert!(
                self.hoist.is_empty(),
                "hoisted statements must drain inside the declaration that produced them"
            );
            if !frag.text().is_empty() {
                decls.push(frag);
            }
        }

        // Step 3: assembly. One blank line after the preamble, one
        // between declarations, and exactly one trailing newline.
        let mut w = Writer::new();
        w.push_str(&self.preamble());
        w.push_str("\n");
        for d in decls {
            w.push_fragment(d);
            w.push_str("\n\n");
        }
        w.push_str(&self.footer());
        w.push_str("\n");

        // Step 4: the map, from the records the writer accumulated.
        let (code, records) = w.into_parts();
        let map = if self.opts.source_map {
            Some(SourceMap::build(
                &records,
                &self.opts.source_name,
                self.opts.source_text.as_deref(),
            ))
        } else {
            None
        };
        EmitOutput { code, map }
    }

    // ── Pre-scan ─────────────────────────────────────────────────────

    fn collect(&mut self, program: &'a Program) {
        for item in &program.items {
            match item {
                Item::Function(f) => {
                    self.known_functions.insert(f.name.clone());
                }
                Item::Struct(s) => {
                    self.structs.insert(s.name.clone(), s);
                }
                Item::Enum(e) => {
                    self.enum_types.insert(e.name.clone());
                    for v in &e.variants {
                        self.variant_arity
                            .insert(format!("{}::{}", e.name, v.name), v.arity());
                        self.variant_arity
                            .entry(v.name.clone())
                            .or_insert_with(|| v.arity());
                    }
                }
                Item::Trait(t) => {
                    self.traits.insert(t.name.clone(), t);
                }
                Item::Impl(_)
                | Item::TypeAlias { .. }
                | Item::Import { .. }
                | Item::MacroRule { .. }
                | Item::Error { .. } => {}
            }
        }
    }

    // ── Declarations ─────────────────────────────────────────────────

    fn emit_function(&mut self, f: &'a Function) -> Fragment {
        self.exports.push(f.name.clone());
        self.emit_fn_like(&f.name, &f.params, &f.body, f.is_async, f.pos, Cx::default())
    }

    /// Emit one `function name(params) { body }` declaration. Shared by
    /// free functions, impl methods, and synthesized default methods.
    pub(crate) fn emit_fn_like(
        &mut self,
        name: &str,
        params: &'a [Param],
        body: &'a [Stmt],
        is_async: bool,
        pos: Option<Pos>,
        cx: Cx<'_>,
    ) -> Fragment {
        let mut out = Fragment::new();
        out.map_pos(pos);
        if is_async {
            out.push_str("async ");
        }
        out.push_str("function ");
        out.push_str(name);
        out.push_str("(");
        let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
        out.push_str(&names.join(", "));
        out.push_str(") {\n");

        self.push_scope();
        for p in params {
            self.declare(&p.name, p.ty.as_ref());
        }
        self.indent += 1;
        out.push(self.emit_stmts(body, cx));
        self.indent -= 1;
        self.pop_scope();

        out.push_str("}");
        out
    }

    /// Emit a struct declaration as a constructor function taking the
    /// fields in declared order and returning a plain object. Fields
    /// whose declared type is a fixed-size array with a foldable size
    /// get a length guard; unfoldable sizes get none.
    fn emit_struct(&mut self, s: &'a StructDecl) -> Fragment {
        self.exports.push(s.name.clone());

        let mut out = Fragment::new();
        out.map_pos(s.pos);
        out.push_str("function ");
        out.push_str(&s.name);
        out.push_str("(");
        let names: Vec<&str> = s.fields.iter().map(|f| f.name.as_str()).collect();
        out.push_str(&names.join(", "));
        out.push_str(") {\n");

        for field in &s.fields {
            let Some(size) = field.ty.array_size().and_then(eval_size) else {
                continue;
            };
            let f = &field.name;
            out.map_pos(field.pos);
            out.push_str(&format!(
                "  if (!Array.isArray({f}) || {f}.length !== {size}) {{\n"
            ));
            out.push_str(&format!(
                "    throw new Error(\"array length mismatch for {}.{f}: expected {size}, got \" + (Array.isArray({f}) ? {f}.length : typeof {f}));\n",
                s.name
            ));
            out.push_str("  }\n");
        }

        if names.is_empty() {
            out.push_str("  return {};\n");
        } else {
            out.push_str(&format!("  return {{ {} }};\n", names.join(", ")));
        }
        out.push_str("}");
        out
    }

    // ── Preamble and footer ──────────────────────────────────────────

    fn preamble(&self) -> String {
        match self.opts.runtime {
            RuntimeLinkage::Import => match self.opts.module_format {
                ModuleFormat::Esm => format!(
                    "import * as {} from {};\n",
                    runtime::GLOBAL,
                    quote_js_string(runtime::MODULE_SPECIFIER)
                ),
                ModuleFormat::Cjs => format!(
                    "const {} = require({});\n",
                    runtime::GLOBAL,
                    quote_js_string(runtime::MODULE_SPECIFIER)
                ),
            },
            RuntimeLinkage::InlineStubs => runtime::stub_text().to_string(),
        }
    }

    fn footer(&self) -> String {
        let list = self.exports.join(", ");
        match self.opts.module_format {
            ModuleFormat::Esm if self.exports.is_empty() => "export {};".to_string(),
            ModuleFormat::Esm => format!("export {{ {list} }};"),
            ModuleFormat::Cjs if self.exports.is_empty() => {
                "module.exports = {};".to_string()
            }
            ModuleFormat::Cjs => format!("module.exports = {{ {list} }};"),
        }
    }

    // ── Scopes, indentation, hoisting ────────────────────────────────

    pub(crate) fn pad(&self) -> String {
        "  ".repeat(self.indent)
    }

    pub(crate) fn push_scope(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    pub(crate) fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    pub(crate) fn declare(&mut self, name: &str, ty: Option<&'a TypeExpr>) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), ty);
        }
    }

    /// The declared type of an in-scope binding. The outer `Option` is
    /// scope membership; the inner is whether the binding wrote a type.
    pub(crate) fn local_type(&self, name: &str) -> Option<Option<&'a TypeExpr>> {
        for scope in self.scopes.iter().rev() {
            if let Some(ty) = scope.get(name) {
                return Some(*ty);
            }
        }
        None
    }

    pub(crate) fn is_local(&self, name: &str) -> bool {
        self.local_type(name).is_some()
    }

    /// Drain the statements hoisted out of expression position since the
    /// last drain, as one fragment of complete indented lines.
    pub(crate) fn take_hoist(&mut self) -> Fragment {
        let mut out = Fragment::new();
        for f in std::mem::take(&mut self.hoist) {
            out.push(f);
        }
        out
    }
}

/// Compile a program with externally supplied trait-dispatch
/// collaborators.
///
/// The mangler decides target-level names for trait impl methods; the
/// dispatch table carries upstream per-call-site resolutions. Emission
/// is total over recognized input: no error escapes, and runtime-checked
/// failures compile to explicit guards in the output.
pub fn compile_program(
    program: &Program,
    mangler: &dyn NameMangler,
    dispatch: &DispatchTable,
    opts: &CodegenOptions,
) -> EmitOutput {
    Codegen::new(mangler, dispatch, opts).compile(program)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(program: &Program, opts: &CodegenOptions) -> EmitOutput {
        let mangler = SeparatorMangler::default();
        let dispatch = DispatchTable::new();
        compile_program(program, &mangler, &dispatch, opts)
    }

    #[test]
    fn empty_program_esm() {
        let out = compile(&Program::default(), &CodegenOptions::default());
        assert_eq!(
            out.code,
            "import * as $rt from \"@reef/runtime\";\n\nexport {};\n"
        );
        assert!(out.map.is_none());
    }

    #[test]
    fn empty_program_cjs() {
        let opts = CodegenOptions {
            module_format: ModuleFormat::Cjs,
            ..CodegenOptions::default()
        };
        let out = compile(&Program::default(), &opts);
        assert_eq!(
            out.code,
            "const $rt = require(\"@reef/runtime\");\n\nmodule.exports = {};\n"
        );
    }

    #[test]
    fn output_ends_with_single_newline() {
        let program = Program::new(vec![Item::Function(Function {
            name: "main".to_string(),
            params: vec![],
            ret: None,
            body: vec![],
            is_async: false,
            pos: None,
        })]);
        let out = compile(&program, &CodegenOptions::default());
        assert!(out.code.ends_with("\n"));
        assert!(!out.code.ends_with("\n\n"));
    }

    #[test]
    fn exports_follow_emission_order() {
        let program = Program::new(vec![
            Item::Function(Function {
                name: "first".to_string(),
                params: vec![],
                ret: None,
                body: vec![],
                is_async: false,
                pos: None,
            }),
            Item::Struct(StructDecl {
                name: "Second".to_string(),
                fields: vec![],
                pos: None,
            }),
        ]);
        let out = compile(&program, &CodegenOptions::default());
        assert!(out.code.contains("export { first, Second };"));
    }

    #[test]
    fn source_map_only_on_request() {
        let opts = CodegenOptions {
            source_map: true,
            ..CodegenOptions::default()
        };
        let out = compile(&Program::default(), &opts);
        let map = out.map.expect("map requested");
        assert_eq!(map.version, 3);
        assert_eq!(map.sources, vec!["main.reef".to_string()]);
    }
}
