//! Error taxonomy for the script transform pipeline.
//!
//! Every failure is local to one file (or one resolution request); the host
//! aggregates per-file failures independently. Nothing in this crate retries.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    /// Source file unreadable (missing, permissions). Fatal for that file.
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Grammar violation beyond the enabled superset, or a down-level
    /// compile failure on malformed input. Carries rendered diagnostics
    /// with file identity and position where available.
    #[error("failed to parse {path}:\n{details}")]
    Parse { path: String, details: String },

    /// A transform pass raised. The pass message is propagated unchanged;
    /// remaining passes are not applied.
    #[error("transform pass `{pass}` failed on {path}: {message}")]
    Pass {
        pass: String,
        path: String,
        message: String,
    },

    /// Module resolution exhausted every ancestor `node_modules`.
    #[error("cannot resolve module `{specifier}` from {importer}")]
    ModuleNotFound { specifier: String, importer: String },
}
