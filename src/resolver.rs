//! Node-style resolution for the runtime helpers package.
//!
//! Down-leveled output imports helper functions from a shared package
//! instead of inlining them, so the bundler asks this crate to resolve that
//! specifier relative to each importing file. Resolution walks ancestor
//! `node_modules` directories and reads `package.json`, and it never
//! canonicalizes: symlinked packages (monorepo links) resolve to their
//! linked location, not the link target.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::TransformError;

/// The runtime helpers package referenced by down-leveled output.
pub const HELPERS_SPECIFIER: &str = "@oxc-project/runtime";

/// Resolve the helpers package from `importer`. This is the body of the
/// host's resolve hook, which is registered against [`HELPERS_SPECIFIER`].
pub fn resolve_helpers(importer: &str) -> Result<PathBuf, TransformError> {
    resolve_module(HELPERS_SPECIFIER, importer)
}

/// Resolve `specifier` from the directory containing `importer`.
///
/// The importer may be a `file://`-style location; the prefix is stripped
/// before deriving its directory. Results are intentionally not cached:
/// resolution is cheap and may legitimately differ per importing directory.
pub fn resolve_module(specifier: &str, importer: &str) -> Result<PathBuf, TransformError> {
    let importer_path = importer.strip_prefix("file://").unwrap_or(importer);
    let start_dir = Path::new(importer_path)
        .parent()
        .unwrap_or_else(|| Path::new("."));

    for dir in start_dir.ancestors() {
        let candidate = dir.join("node_modules").join(specifier);
        if let Some(resolved) = resolve_file_or_dir(&candidate) {
            return Ok(resolved);
        }
    }

    Err(TransformError::ModuleNotFound {
        specifier: specifier.to_string(),
        importer: importer.to_string(),
    })
}

/// Resolve a candidate path the way Node does: the file itself, the file
/// with a known extension appended, or a package/plain directory.
fn resolve_file_or_dir(candidate: &Path) -> Option<PathBuf> {
    if candidate.is_file() {
        return Some(candidate.to_path_buf());
    }
    for ext in ["js", "mjs", "cjs", "json"] {
        let with_ext = PathBuf::from(format!("{}.{}", candidate.display(), ext));
        if with_ext.is_file() {
            return Some(with_ext);
        }
    }
    if candidate.is_dir() {
        return resolve_package_dir(candidate);
    }
    None
}

/// Resolve a directory through its manifest: `exports` (root entry, with
/// `require`/`node`/`default`/`import` conditions) wins over `main`; a bare
/// directory falls back to `index.js`.
fn resolve_package_dir(dir: &Path) -> Option<PathBuf> {
    let manifest_path = dir.join("package.json");
    if manifest_path.is_file() {
        match fs::read_to_string(&manifest_path)
            .ok()
            .and_then(|raw| serde_json::from_str::<serde_json::Value>(&raw).ok())
        {
            Some(manifest) => {
                if let Some(exports) = manifest.get("exports") {
                    let root_entry = exports.get(".").unwrap_or(exports);
                    if let Some(target) = resolve_export_target(root_entry) {
                        let resolved = dir.join(target.trim_start_matches("./"));
                        if resolved.is_file() {
                            return Some(resolved);
                        }
                    }
                }
                if let Some(main) = manifest.get("main").and_then(|m| m.as_str()) {
                    let main_candidate = dir.join(main);
                    if let Some(resolved) = resolve_file_or_dir(&main_candidate) {
                        return Some(resolved);
                    }
                }
            }
            None => {
                eprintln!(
                    "[TransformNative] Malformed package.json at {}, falling back to index.js",
                    manifest_path.display()
                );
            }
        }
    }

    let index = dir.join("index.js");
    if index.is_file() {
        return Some(index);
    }
    None
}

fn resolve_export_target(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(target) => Some(target.clone()),
        serde_json::Value::Object(conditions) => {
            for condition in ["require", "node", "default", "import"] {
                if let Some(nested) = conditions.get(condition) {
                    if let Some(target) = resolve_export_target(nested) {
                        return Some(target);
                    }
                }
            }
            None
        }
        _ => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAPI EXPORTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "napi")]
#[napi_derive::napi]
pub fn resolve_helpers_native(importer: String) -> napi::Result<String> {
    resolve_helpers(&importer)
        .map(|path| path.to_string_lossy().into_owned())
        .map_err(|err| napi::Error::from_reason(err.to_string()))
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn project_with_package(manifest: &str, entry_rel: &str) -> TempDir {
        let project = TempDir::new().unwrap();
        let pkg = project.path().join("node_modules/helpers-pkg");
        write(&pkg.join("package.json"), manifest);
        write(&pkg.join(entry_rel), "module.exports = {};");
        project
    }

    #[test]
    fn test_resolves_via_main() {
        let project = project_with_package(r#"{ "main": "lib/index.js" }"#, "lib/index.js");
        let importer = project.path().join("src/app.ts");
        let resolved = resolve_module("helpers-pkg", importer.to_str().unwrap()).unwrap();
        assert!(resolved.ends_with("node_modules/helpers-pkg/lib/index.js"));
    }

    #[test]
    fn test_resolves_via_exports_conditions() {
        let project = project_with_package(
            r#"{ "exports": { ".": { "require": "./dist/index.cjs", "default": "./dist/index.mjs" } } }"#,
            "dist/index.cjs",
        );
        let importer = project.path().join("src/app.ts");
        let resolved = resolve_module("helpers-pkg", importer.to_str().unwrap()).unwrap();
        assert!(resolved.ends_with("dist/index.cjs"));
    }

    #[test]
    fn test_index_js_fallback() {
        let project = TempDir::new().unwrap();
        let pkg = project.path().join("node_modules/bare-pkg");
        write(&pkg.join("index.js"), "module.exports = {};");
        let importer = project.path().join("src/app.ts");
        let resolved = resolve_module("bare-pkg", importer.to_str().unwrap()).unwrap();
        assert!(resolved.ends_with("node_modules/bare-pkg/index.js"));
    }

    #[test]
    fn test_strips_file_uri_prefix() {
        let project = project_with_package(r#"{ "main": "index.js" }"#, "index.js");
        let importer = format!("file://{}/src/app.ts", project.path().display());
        let resolved = resolve_module("helpers-pkg", &importer).unwrap();
        assert!(resolved.ends_with("node_modules/helpers-pkg/index.js"));
    }

    #[test]
    fn test_walks_ancestor_node_modules() {
        let project = project_with_package(r#"{ "main": "index.js" }"#, "index.js");
        let importer = project.path().join("packages/app/src/deep/entry.ts");
        let resolved = resolve_module("helpers-pkg", importer.to_str().unwrap()).unwrap();
        assert!(resolved.ends_with("node_modules/helpers-pkg/index.js"));
    }

    #[test]
    fn test_missing_package_is_module_not_found() {
        let project = TempDir::new().unwrap();
        let importer = project.path().join("src/app.ts");
        let err = resolve_module("ghost-pkg", importer.to_str().unwrap()).unwrap_err();
        match err {
            TransformError::ModuleNotFound { specifier, .. } => {
                assert_eq!(specifier, "ghost-pkg");
            }
            other => panic!("expected module-not-found, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_package_path_is_preserved() {
        let project = TempDir::new().unwrap();
        let real = project.path().join("linked/real-pkg");
        write(&real.join("package.json"), r#"{ "main": "index.js" }"#);
        write(&real.join("index.js"), "module.exports = {};");

        let node_modules = project.path().join("node_modules");
        fs::create_dir_all(&node_modules).unwrap();
        std::os::unix::fs::symlink(&real, node_modules.join("real-pkg")).unwrap();

        let importer = project.path().join("src/app.ts");
        let resolved = resolve_module("real-pkg", importer.to_str().unwrap()).unwrap();
        // The linked location, not the dereferenced target.
        assert!(resolved.starts_with(node_modules));
        assert!(resolved.ends_with("node_modules/real-pkg/index.js"));
    }
}
