//! Permissive-superset parsing for script sources.
//!
//! Every script-like file is parsed with TypeScript, JSX, decorators, and
//! dynamic import enabled, regardless of its actual extension or content.
//! The parser must never reject valid superset syntax; a plain `.js` file
//! parses identically under the wider grammar.

use oxc_allocator::Allocator;
use oxc_ast::ast::Program;
use oxc_parser::Parser;
use oxc_span::SourceType;

use crate::error::TransformError;

/// The one grammar configuration used for every file on every path through
/// the pipeline. Decorators and dynamic import are accepted by the parser
/// without further opt-in.
pub fn superset_source_type() -> SourceType {
    SourceType::default()
        .with_typescript(true)
        .with_jsx(true)
        .with_module(true)
}

/// Parse `source` into a program owned by `allocator`.
///
/// Diagnostics are rendered against the source text so the host report
/// carries file identity and position.
pub fn parse_program<'a>(
    allocator: &'a Allocator,
    source: &'a str,
    path: &str,
) -> Result<Program<'a>, TransformError> {
    let ret = Parser::new(allocator, source, superset_source_type()).parse();

    if ret.panicked || !ret.errors.is_empty() {
        let details = ret
            .errors
            .into_iter()
            .map(|error| format!("{:?}", error.with_source_code(source.to_string())))
            .collect::<Vec<_>>()
            .join("\n");
        return Err(TransformError::Parse {
            path: path.to_string(),
            details,
        });
    }

    Ok(ret.program)
}
