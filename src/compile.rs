//! Down-level compile path for the legacy target.
//!
//! A fixed, single-shot transformation against an old-browser profile. The
//! pass pipeline is bypassed entirely; the grammar superset on input is the
//! same one the modern path uses. Runtime helpers are imported from the
//! shared helpers package rather than inlined, which is why the resolver in
//! this crate exists at all.

use std::path::Path;

use oxc_allocator::Allocator;
use oxc_codegen::Codegen;
use oxc_diagnostics::OxcDiagnostic;
use oxc_parser::Parser;
use oxc_semantic::SemanticBuilder;
use oxc_syntax::es_target::ESTarget;
use oxc_transformer::{HelperLoaderMode, TransformOptions, Transformer};

use crate::error::TransformError;
use crate::parse::superset_source_type;
use crate::print::fix_decorator_placement;
use crate::resolver::HELPERS_SPECIFIER;

/// The fixed down-level profile: the lowest target this engine compiles to.
/// The host-facing "es5"/"es3" target strings map onto this profile.
const LEGACY_TARGET: ESTarget = ESTarget::ES2015;

/// Compile `source` for the legacy profile, ignoring any configured passes.
///
/// Malformed input is fatal for this file and is not retried; the rendered
/// diagnostics carry `path` for host attribution.
pub fn compile_downlevel(source: &str, path: &str) -> Result<String, TransformError> {
    let allocator = Allocator::default();

    let render_failure = |errors: Vec<OxcDiagnostic>| -> TransformError {
        let details = errors
            .into_iter()
            .map(|error| format!("{:?}", error.with_source_code(source.to_string())))
            .collect::<Vec<_>>()
            .join("\n");
        TransformError::Parse {
            path: path.to_string(),
            details,
        }
    };

    let ret = Parser::new(&allocator, source, superset_source_type()).parse();
    if ret.panicked || !ret.errors.is_empty() {
        return Err(render_failure(ret.errors));
    }
    let mut program = ret.program;

    let mut options = TransformOptions::from(LEGACY_TARGET);
    // External helpers: legacy output imports from the shared runtime
    // package instead of inlining helper functions per file.
    options.helper_loader.mode = HelperLoaderMode::Runtime;
    options.helper_loader.module_name = HELPERS_SPECIFIER.into();
    options.decorator.legacy = true;

    let scoping = SemanticBuilder::new()
        .with_check_syntax_error(false)
        .build(&program)
        .semantic
        .into_scoping();

    let ret = Transformer::new(&allocator, Path::new(path), &options)
        .build_with_scoping(scoping, &mut program);
    if !ret.errors.is_empty() {
        return Err(render_failure(ret.errors));
    }

    let printed = Codegen::new().build(&program).code;
    Ok(fix_decorator_placement(&printed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_types() {
        let code = compile_downlevel("const x: number = 42;", "test.ts").unwrap();
        assert!(!code.contains(": number"), "got: {code}");
        assert!(code.contains("42"), "got: {code}");
    }

    #[test]
    fn test_lowers_exponentiation() {
        let code = compile_downlevel("const p = base ** 2;", "test.ts").unwrap();
        assert!(!code.contains("**"), "got: {code}");
        assert!(code.contains("Math.pow"), "got: {code}");
    }

    #[test]
    fn test_lowers_object_spread() {
        let code = compile_downlevel("const merged = { ...base, extra: 1 };", "test.ts").unwrap();
        assert!(!code.contains("..."), "got: {code}");
    }

    #[test]
    fn test_helpers_are_imported_not_inlined() {
        let code = compile_downlevel("const merged = { ...base, extra: 1 };", "test.ts").unwrap();
        assert!(code.contains(HELPERS_SPECIFIER), "got: {code}");
    }

    #[test]
    fn test_malformed_input_is_fatal() {
        let err = compile_downlevel("const x = {", "broken.ts").unwrap_err();
        match err {
            TransformError::Parse { path, .. } => assert_eq!(path, "broken.ts"),
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
