mod digest;
mod normalize;
mod walk;

pub use digest::{hash_snapshot, hash_tree};
pub use normalize::{is_excluded_dir, is_excluded_file, normalize_entry_content};
pub use walk::{walk_tree, EntryKind, FileEntry, TreeSnapshot};
