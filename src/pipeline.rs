//! Load-hook engine: decides the code path per file and drives the stages.
//!
//! One `ScriptPipeline` is one stage of a build. The host registers its load
//! hook against the script extension filter and calls [`ScriptPipeline::load`]
//! once per distinct path per build pass; files may be in flight concurrently
//! but each file's own stages run strictly in order.

use std::fs;
use std::sync::Arc;

use lazy_static::lazy_static;
use oxc_allocator::Allocator;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::cache::{FileCacheEntry, ModuleSummary, TransformCache};
use crate::compile::compile_downlevel;
use crate::error::TransformError;
use crate::parse::parse_program;
use crate::passes::{apply_passes, TransformPass};
use crate::print::{fix_decorator_placement, print_program};

lazy_static! {
    /// Extension filter the host registers the load hook under.
    static ref SCRIPT_FILTER: Regex = Regex::new(r"\.(tsx?|mts|cts|jsx?|mjs|cjs)$").unwrap();
}

pub fn is_script_path(path: &str) -> bool {
    SCRIPT_FILTER.is_match(path)
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONFIGURATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Which code path every file takes. Fixed for the lifetime of one pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformTarget {
    #[default]
    Modern,
    /// Fixed old-browser profile; bypasses the pass pipeline entirely.
    Legacy,
}

impl TransformTarget {
    /// Map the host's target string: `"es5"`/`"es3"` select the legacy
    /// profile, every modern profile name (and the empty default) stays on
    /// the modern path.
    pub fn from_target_str(target: &str) -> Self {
        match target.trim().to_ascii_lowercase().as_str() {
            "es5" | "es3" => TransformTarget::Legacy,
            _ => TransformTarget::Modern,
        }
    }
}

/// The single output identity: script text that may contain JSX, regardless
/// of the original file's dialect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoaderKind {
    #[default]
    Tsx,
}

impl std::fmt::Display for LoaderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("tsx")
    }
}

/// Finalized load-hook result handed back to the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadOutput {
    pub contents: String,
    pub loader: LoaderKind,
}

/// Recognized pipeline options; defaults match the host contract (modern
/// target, no passes, no piping, fresh cache).
#[derive(Default)]
pub struct PipelineOptions {
    pub target: TransformTarget,
    pub passes: Vec<Box<dyn TransformPass>>,
    pub pipe: bool,
    /// Externally supplied cache shares entries with the caller (and with
    /// sibling stages holding the same instance) until the caller discards
    /// it. `None` starts the build with an empty cache.
    pub cache: Option<Arc<TransformCache>>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// PIPELINE
// ═══════════════════════════════════════════════════════════════════════════════

pub struct ScriptPipeline {
    target: TransformTarget,
    passes: Vec<Box<dyn TransformPass>>,
    pipe: bool,
    cache: Arc<TransformCache>,
}

impl ScriptPipeline {
    pub fn new(options: PipelineOptions) -> Self {
        Self {
            target: options.target,
            passes: options.passes,
            pipe: options.pipe,
            cache: options.cache.unwrap_or_default(),
        }
    }

    pub fn cache(&self) -> &Arc<TransformCache> {
        &self.cache
    }

    /// Load hook body. Returns `Ok(None)` in pipe mode, meaning "handled,
    /// result parked in the cache for the next stage"; otherwise returns the
    /// finalized text under the [`LoaderKind::Tsx`] identity.
    ///
    /// The cache entry for `path` is read once at the start and overwritten
    /// once at completion; within one build pass this method is the entry's
    /// only writer.
    pub fn load(&self, path: &str) -> Result<Option<LoadOutput>, TransformError> {
        let entry = self.cache.lookup(path);

        // An earlier stage may already have produced the text.
        let source = match entry.code {
            Some(code) => code,
            None => fs::read_to_string(path).map_err(|source| TransformError::Read {
                path: path.to_string(),
                source,
            })?,
        };

        // No passes: the text is the output verbatim, on either target.
        if self.passes.is_empty() {
            return Ok(self.complete(path, source, entry.module));
        }

        if self.target == TransformTarget::Legacy {
            let code = compile_downlevel(&source, path)?;
            return Ok(self.complete(path, code, None));
        }

        let allocator = Allocator::default();
        let mut program = parse_program(&allocator, &source, path)?;
        apply_passes(&allocator, &mut program, &self.passes, path)?;
        let summary = ModuleSummary::collect(&program);
        let code = fix_decorator_placement(&print_program(&program));

        Ok(self.complete(path, code, Some(summary)))
    }

    /// Overwrite the cache entry and either park the result (pipe mode) or
    /// finalize it for the host.
    fn complete(
        &self,
        path: &str,
        code: String,
        module: Option<ModuleSummary>,
    ) -> Option<LoadOutput> {
        if self.pipe {
            self.cache.store(
                path,
                FileCacheEntry {
                    code: Some(code),
                    module,
                },
            );
            return None;
        }
        self.cache.store(
            path,
            FileCacheEntry {
                code: Some(code.clone()),
                module,
            },
        );
        Some(LoadOutput {
            contents: code,
            loader: LoaderKind::Tsx,
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAPI EXPORTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "napi")]
lazy_static! {
    /// One cache per process so pipe-mode stages hand off across native
    /// calls from the host bundler.
    static ref NATIVE_CACHE: Arc<TransformCache> = Arc::new(TransformCache::new());
}

#[cfg(feature = "napi")]
#[napi_derive::napi]
pub fn load_script_native(
    path: String,
    target: String,
    pipe: bool,
) -> napi::Result<Option<serde_json::Value>> {
    let pipeline = ScriptPipeline::new(PipelineOptions {
        target: TransformTarget::from_target_str(&target),
        passes: vec![],
        pipe,
        cache: Some(NATIVE_CACHE.clone()),
    });
    match pipeline.load(&path) {
        Ok(Some(output)) => serde_json::to_value(output)
            .map(Some)
            .map_err(|err| napi::Error::from_reason(err.to_string())),
        Ok(None) => Ok(None),
        Err(err) => Err(napi::Error::from_reason(err.to_string())),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
