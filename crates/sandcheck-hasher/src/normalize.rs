use serde_json::Value;

// Lockfiles are hashed (they pin every transitive version) but their raw
// formatting is registry-order dependent, so content is canonicalized first.
const NORMALIZED_LOCKFILES: &[&str] = &["package-lock.json", "node_modules/.package-lock.json"];

/// Whether a directory at this `/`-normalized relative path is pruned from
/// snapshots entirely. Only npm's scratch cache qualifies: a `.cache`
/// directory directly under any `node_modules` segment, including nested
/// dedupe layouts. Package directories are never pruned, whatever their
/// name, so this check applies to directories alone.
pub fn is_excluded_dir(rel_path: &str) -> bool {
    let mut previous = None;
    for component in rel_path.split('/') {
        if component == ".cache" && previous == Some("node_modules") {
            return true;
        }
        previous = Some(component);
    }
    false
}

/// Whether a single file or symlink at this relative path is excluded.
/// Matches npm's debug logs by basename; directories are judged by
/// `is_excluded_dir` instead, so a package named `npm-debug.logger` still
/// contributes its files to the checksum.
pub fn is_excluded_file(rel_path: &str) -> bool {
    let basename = rel_path.rsplit('/').next().unwrap_or(rel_path);
    basename.starts_with("npm-debug.log")
}

/// Rewrite volatile file content into its canonical form before hashing.
/// Non-lockfile content passes through untouched.
pub fn normalize_entry_content(rel_path: &str, raw: Vec<u8>) -> Vec<u8> {
    if !NORMALIZED_LOCKFILES.contains(&rel_path) {
        return raw;
    }
    canonical_json(&raw).unwrap_or(raw)
}

// serde_json's Map is ordered by key, so parse + re-serialize yields a
// compact, key-sorted encoding. A lockfile that is not valid JSON is hashed
// as-is rather than failing the whole walk.
fn canonical_json(raw: &[u8]) -> Option<Vec<u8>> {
    let value: Value = serde_json::from_slice(raw).ok()?;
    serde_json::to_vec(&value).ok()
}
