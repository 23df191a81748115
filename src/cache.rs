//! Per-file transform cache.
//!
//! The cache is a hand-off channel between pipeline stages running over the
//! same build pass, not a memoization layer: there is no hashing, no
//! timestamps, no invalidation. A producer stage writes the entry for a path;
//! a consumer stage over the same pass reads it back. Entries live for one
//! build invocation unless the caller shares the cache instance across
//! invocations, in which case staleness is the caller's responsibility.

use dashmap::DashMap;
use oxc_ast::ast::{
    BindingPattern, Declaration, Decorator, ExportAllDeclaration, ExportDefaultDeclaration,
    ExportNamedDeclaration, Expression, ImportDeclaration, ImportExpression, ModuleExportName,
    Program,
};
use oxc_ast_visit::{walk, Visit};
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════════
// MODULE SUMMARY
// ═══════════════════════════════════════════════════════════════════════════════

/// Serializable shape of a parsed module, collected from the post-transform
/// program. Arena-allocated ASTs cannot outlive their allocator, so this is
/// what the cache carries for consumer stages that need structure without
/// re-parsing: the import graph edges, the exported names, and whether any
/// decorator syntax survived into the output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleSummary {
    /// Static import sources, re-export sources, and dynamic `import("...")`
    /// string literals, in source order.
    pub imports: Vec<String>,
    /// Exported binding names; default exports appear as `"default"`.
    pub exports: Vec<String>,
    pub has_decorators: bool,
}

impl ModuleSummary {
    pub fn collect(program: &Program<'_>) -> Self {
        let mut collector = SummaryCollector {
            summary: ModuleSummary::default(),
        };
        collector.visit_program(program);
        collector.summary
    }
}

struct SummaryCollector {
    summary: ModuleSummary,
}

impl SummaryCollector {
    fn record_export_name(&mut self, name: &ModuleExportName<'_>) {
        let exported = match name {
            ModuleExportName::IdentifierName(id) => id.name.to_string(),
            ModuleExportName::IdentifierReference(id) => id.name.to_string(),
            ModuleExportName::StringLiteral(lit) => lit.value.to_string(),
        };
        self.summary.exports.push(exported);
    }
}

impl<'a> Visit<'a> for SummaryCollector {
    fn visit_import_declaration(&mut self, decl: &ImportDeclaration<'a>) {
        self.summary.imports.push(decl.source.value.to_string());
        walk::walk_import_declaration(self, decl);
    }

    fn visit_import_expression(&mut self, expr: &ImportExpression<'a>) {
        if let Expression::StringLiteral(lit) = &expr.source {
            self.summary.imports.push(lit.value.to_string());
        }
        walk::walk_import_expression(self, expr);
    }

    fn visit_export_named_declaration(&mut self, decl: &ExportNamedDeclaration<'a>) {
        if let Some(source) = &decl.source {
            self.summary.imports.push(source.value.to_string());
        }
        for spec in &decl.specifiers {
            self.record_export_name(&spec.exported);
        }
        if let Some(declaration) = &decl.declaration {
            match declaration {
                Declaration::VariableDeclaration(var_decl) => {
                    for d in &var_decl.declarations {
                        if let BindingPattern::BindingIdentifier(id) = &d.id {
                            self.summary.exports.push(id.name.to_string());
                        }
                    }
                }
                Declaration::FunctionDeclaration(func) => {
                    if let Some(id) = &func.id {
                        self.summary.exports.push(id.name.to_string());
                    }
                }
                Declaration::ClassDeclaration(class) => {
                    if let Some(id) = &class.id {
                        self.summary.exports.push(id.name.to_string());
                    }
                }
                _ => {}
            }
        }
        walk::walk_export_named_declaration(self, decl);
    }

    fn visit_export_default_declaration(&mut self, decl: &ExportDefaultDeclaration<'a>) {
        self.summary.exports.push("default".to_string());
        walk::walk_export_default_declaration(self, decl);
    }

    fn visit_export_all_declaration(&mut self, decl: &ExportAllDeclaration<'a>) {
        self.summary.imports.push(decl.source.value.to_string());
        walk::walk_export_all_declaration(self, decl);
    }

    fn visit_decorator(&mut self, decorator: &Decorator<'a>) {
        self.summary.has_decorators = true;
        walk::walk_decorator(self, decorator);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TRANSFORM CACHE
// ═══════════════════════════════════════════════════════════════════════════════

/// Per-path cache slot: the most recently produced code and module summary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileCacheEntry {
    pub code: Option<String>,
    pub module: Option<ModuleSummary>,
}

/// Mapping from file path to [`FileCacheEntry`], shared across all in-flight
/// file tasks. Each task owns a distinct key within one build pass (the host
/// invokes the load hook once per path), so the only synchronization needed
/// is the atomic get-or-create on first visit.
pub struct TransformCache {
    entries: DashMap<String, FileCacheEntry>,
}

impl TransformCache {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Returns a snapshot of the entry for `path`, creating an empty entry
    /// on first visit.
    pub fn lookup(&self, path: &str) -> FileCacheEntry {
        self.entries.entry(path.to_string()).or_default().clone()
    }

    /// Unconditionally overwrites the entry for `path`. Stages call this at
    /// completion; entries are never evicted within a build pass.
    pub fn store(&self, path: &str, entry: FileCacheEntry) {
        self.entries.insert(path.to_string(), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for TransformCache {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
