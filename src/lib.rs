//! Native script-transform core for the bundler.
//!
//! Everything a build needs to turn a TypeScript/JSX source file into plain
//! script text lives here: the load-hook pipeline, the pluggable AST pass
//! chain, the fixed-profile down-level compiler, the per-file hand-off cache
//! for piped stages, and the helper-module resolver.
//!
//! Ground truth the rest of the system relies on:
//!
//! 1. One file, one code path: a file is compiled down-level or run through
//!    the pass pipeline, never both.
//! 2. An empty pass list means the source text passes through verbatim,
//!    byte for byte, on either target.
//! 3. Passes run in registration order; the first failure aborts that file's
//!    build with the pass name attached.
//! 4. Printed output never carries a decorator after its `export` keyword.
//! 5. Down-level output never inlines runtime helpers; it imports them from
//!    [`resolver::HELPERS_SPECIFIER`].
//! 6. Cache entries are keyed by absolute path and overwritten whole; a
//!    stage reads its entry once and writes it once.
//! 7. Resolution never resolves symlinks: a linked package keeps its link
//!    path so the host treats it as a distinct module.

pub mod cache;
pub mod compile;
pub mod error;
pub mod parse;
pub mod passes;
pub mod pipeline;
pub mod print;
pub mod resolver;


pub use cache::{FileCacheEntry, ModuleSummary, TransformCache};
pub use compile::compile_downlevel;
pub use error::TransformError;
pub use parse::parse_program;
pub use passes::{apply_passes, RewriteImportExtensions, TransformPass};
pub use pipeline::{
    is_script_path, LoadOutput, LoaderKind, PipelineOptions, ScriptPipeline, TransformTarget,
};
pub use print::{fix_decorator_placement, print_program};
pub use resolver::{resolve_helpers, resolve_module, HELPERS_SPECIFIER};

/// Smoke-test export for verifying the native addon is wired up.
#[cfg(feature = "napi")]
#[napi_derive::napi]
pub fn transform_bridge() -> String {
    "Transform Native Bridge Connected".to_string()
}
