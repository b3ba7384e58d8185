use std::path::Path;

use anyhow::Result;
use sandcheck_core::Checksum;
use sha2::{Digest, Sha256};

use crate::walk::{walk_tree, EntryKind, TreeSnapshot};

// 0x00 never appears in a path, so it unambiguously ends the path field.
const PATH_TERMINATOR: u8 = 0x00;

/// Fingerprint a snapshot with a single SHA-256 pass.
///
/// Per entry: path bytes, the path terminator, a kind tag, the content
/// length as 8 little-endian bytes, then the content. The length prefix
/// keeps record boundaries unambiguous regardless of content bytes, so
/// "a then b" can never collide with a concatenation.
pub fn hash_snapshot(snapshot: &TreeSnapshot) -> Checksum {
    let mut hasher = Sha256::new();
    for entry in &snapshot.entries {
        hasher.update(entry.rel_path.as_bytes());
        hasher.update([PATH_TERMINATOR, entry_tag(entry.kind)]);
        hasher.update((entry.content.len() as u64).to_le_bytes());
        hasher.update(&entry.content);
    }
    Checksum::from_bytes(hasher.finalize().into())
}

/// Walk and fingerprint `root` in one call. Read-only.
pub fn hash_tree(root: &Path) -> Result<Checksum> {
    Ok(hash_snapshot(&walk_tree(root)?))
}

fn entry_tag(kind: EntryKind) -> u8 {
    match kind {
        EntryKind::File { executable: false } => b'f',
        EntryKind::File { executable: true } => b'x',
        EntryKind::Symlink => b'l',
    }
}
