//! Transform pass pipeline.
//!
//! A pass is an opaque unit of AST rewriting over the whole program. Passes
//! compose in the order supplied and are never reordered or skipped; the
//! output program of pass *i* is the input of pass *i+1*. A failing pass
//! stops the chain, and its message reaches the host unchanged.

use oxc_allocator::Allocator;
use oxc_ast::ast::{ImportDeclaration, Program};
use oxc_ast_visit::VisitMut;

use crate::error::TransformError;

/// One AST-to-AST rewriting unit.
///
/// Implementations get the program's allocator so rewrites can intern new
/// strings and nodes into the same arena.
pub trait TransformPass: Send + Sync {
    /// Stable name used to attribute pass failures to their origin.
    fn name(&self) -> &'static str;

    fn run<'a>(&self, allocator: &'a Allocator, program: &mut Program<'a>) -> Result<(), String>;
}

/// Apply `passes` to `program` strictly in order.
pub fn apply_passes<'a>(
    allocator: &'a Allocator,
    program: &mut Program<'a>,
    passes: &[Box<dyn TransformPass>],
    path: &str,
) -> Result<(), TransformError> {
    for pass in passes {
        pass.run(allocator, program)
            .map_err(|message| TransformError::Pass {
                pass: pass.name().to_string(),
                path: path.to_string(),
                message,
            })?;
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// BUNDLED PASSES
// ═══════════════════════════════════════════════════════════════════════════════

/// Rewrites import source extensions, e.g. `./dep.ts` → `./dep.js`, so
/// emitted modules reference their built counterparts.
pub struct RewriteImportExtensions {
    pub from: String,
    pub to: String,
}

impl TransformPass for RewriteImportExtensions {
    fn name(&self) -> &'static str {
        "rewrite-import-extensions"
    }

    fn run<'a>(&self, allocator: &'a Allocator, program: &mut Program<'a>) -> Result<(), String> {
        let mut rewriter = ImportRewriter {
            allocator,
            from: &self.from,
            to: &self.to,
        };
        rewriter.visit_program(program);
        Ok(())
    }
}

struct ImportRewriter<'a, 'b> {
    allocator: &'a Allocator,
    from: &'b str,
    to: &'b str,
}

impl<'a> VisitMut<'a> for ImportRewriter<'a, '_> {
    fn visit_import_declaration(&mut self, decl: &mut ImportDeclaration<'a>) {
        let source = decl.source.value.to_string();
        if source.ends_with(self.from) {
            let new_source = format!("{}{}", &source[..source.len() - self.from.len()], self.to);
            decl.source.value = self.allocator.alloc_str(&new_source).into();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_program;
    use crate::print::print_program;

    struct IdentityPass;

    impl TransformPass for IdentityPass {
        fn name(&self) -> &'static str {
            "identity"
        }

        fn run<'a>(&self, _: &'a Allocator, _: &mut Program<'a>) -> Result<(), String> {
            Ok(())
        }
    }

    struct FailingPass;

    impl TransformPass for FailingPass {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn run<'a>(&self, _: &'a Allocator, _: &mut Program<'a>) -> Result<(), String> {
            Err("boom".to_string())
        }
    }

    #[test]
    fn test_zero_passes_is_valid() {
        let allocator = Allocator::default();
        let mut program = parse_program(&allocator, "const x = 1;", "a.ts").unwrap();
        assert!(apply_passes(&allocator, &mut program, &[], "a.ts").is_ok());
    }

    #[test]
    fn test_pass_error_stops_chain_and_names_pass() {
        let allocator = Allocator::default();
        let mut program = parse_program(&allocator, "const x = 1;", "a.ts").unwrap();
        let passes: Vec<Box<dyn TransformPass>> =
            vec![Box::new(FailingPass), Box::new(IdentityPass)];
        let err = apply_passes(&allocator, &mut program, &passes, "a.ts").unwrap_err();
        match err {
            TransformError::Pass {
                pass,
                path,
                message,
            } => {
                assert_eq!(pass, "failing");
                assert_eq!(path, "a.ts");
                assert_eq!(message, "boom");
            }
            other => panic!("expected pass error, got {other:?}"),
        }
    }

    #[test]
    fn test_rewrite_import_extensions() {
        let allocator = Allocator::default();
        let source = "import { a } from \"./dep.ts\";\nimport b from \"./other.js\";";
        let mut program = parse_program(&allocator, source, "a.ts").unwrap();
        let passes: Vec<Box<dyn TransformPass>> = vec![Box::new(RewriteImportExtensions {
            from: ".ts".to_string(),
            to: ".js".to_string(),
        })];
        apply_passes(&allocator, &mut program, &passes, "a.ts").unwrap();
        let printed = print_program(&program);
        assert!(printed.contains("./dep.js"));
        assert!(printed.contains("./other.js"));
        assert!(!printed.contains("./dep.ts"));
    }
}
