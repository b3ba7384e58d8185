use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{anyhow, Context, Result};

use crate::normalize::{is_excluded_dir, is_excluded_file, normalize_entry_content};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File { executable: bool },
    Symlink,
}

/// One leaf of a sandbox tree. `rel_path` uses `/` separators on every
/// platform; no timestamps, ownership, or inode data is carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub rel_path: String,
    pub kind: EntryKind,
    pub content: Vec<u8>,
}

/// All leaves of a sandbox tree, sorted by byte-wise comparison of
/// `rel_path`. The order never depends on directory listing order or locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeSnapshot {
    pub entries: Vec<FileEntry>,
}

/// Enumerate every regular file and symlink under `root`.
///
/// Directories themselves produce no entries. A symlink is recorded with its
/// literal target path as content; a symlink whose target resolves outside
/// `root` is an error, as is any unreadable file. Paths on the exclusion
/// list (see `normalize`) are skipped before reading.
pub fn walk_tree(root: &Path) -> Result<TreeSnapshot> {
    if !root.is_dir() {
        return Err(anyhow!("not a directory: {}", root.display()));
    }

    let mut entries = Vec::new();
    collect_entries(root, root, &mut entries)?;
    entries.sort_by(|left, right| left.rel_path.as_bytes().cmp(right.rel_path.as_bytes()));
    Ok(TreeSnapshot { entries })
}

fn collect_entries(root: &Path, dir: &Path, entries: &mut Vec<FileEntry>) -> Result<()> {
    let listing = fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?;

    for entry in listing {
        let entry =
            entry.with_context(|| format!("failed to list directory: {}", dir.display()))?;
        let path = entry.path();
        let rel_path = relative_path_string(root, &path)?;

        let metadata = fs::symlink_metadata(&path)
            .with_context(|| format!("failed to stat: {}", path.display()))?;
        let file_type = metadata.file_type();

        // Directory pruning and file exclusion are separate rules: a
        // directory whose name happens to match a scratch-file pattern
        // must still be descended into.
        if file_type.is_symlink() {
            if is_excluded_file(&rel_path) {
                continue;
            }
            entries.push(symlink_entry(root, &path, rel_path)?);
        } else if file_type.is_dir() {
            if is_excluded_dir(&rel_path) {
                continue;
            }
            collect_entries(root, &path, entries)?;
        } else if file_type.is_file() {
            if is_excluded_file(&rel_path) {
                continue;
            }
            let raw = fs::read(&path)
                .with_context(|| format!("failed to read file: {}", path.display()))?;
            let content = normalize_entry_content(&rel_path, raw);
            entries.push(FileEntry {
                rel_path,
                kind: EntryKind::File {
                    executable: is_executable(&metadata),
                },
                content,
            });
        } else {
            return Err(anyhow!(
                "unsupported file type in sandbox: {}",
                path.display()
            ));
        }
    }
    Ok(())
}

fn symlink_entry(root: &Path, path: &Path, rel_path: String) -> Result<FileEntry> {
    let target = fs::read_link(path)
        .with_context(|| format!("failed to read symlink: {}", path.display()))?;

    let resolved = if target.is_absolute() {
        target.clone()
    } else {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow!("symlink has no parent: {}", path.display()))?;
        parent.join(&target)
    };
    if !lexically_normalized(&resolved).starts_with(lexically_normalized(root)) {
        return Err(anyhow!(
            "symlink escapes sandbox root: {} -> {}",
            path.display(),
            target.display()
        ));
    }

    let target_text = target
        .to_str()
        .ok_or_else(|| anyhow!("symlink target is not UTF-8: {}", path.display()))?;
    Ok(FileEntry {
        rel_path,
        kind: EntryKind::Symlink,
        content: target_text.replace('\\', "/").into_bytes(),
    })
}

fn relative_path_string(root: &Path, path: &Path) -> Result<String> {
    let rel = path.strip_prefix(root).with_context(|| {
        format!(
            "path is not under sandbox root: {} (root {})",
            path.display(),
            root.display()
        )
    })?;
    let text = rel
        .to_str()
        .ok_or_else(|| anyhow!("path is not UTF-8: {}", path.display()))?;
    Ok(text.replace('\\', "/"))
}

// Resolves `.` and `..` components without touching the filesystem, so the
// escape check works even when a symlink target does not exist yet.
fn lexically_normalized(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

#[cfg(unix)]
fn is_executable(metadata: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o100 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &fs::Metadata) -> bool {
    false
}
