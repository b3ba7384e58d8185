use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};

/// Reset `root` to an empty directory.
///
/// Destructive: any pre-existing contents are deleted recursively, so a
/// prior install can never leak into the next checksum. After a successful
/// return the directory exists, is empty, and belongs to the caller until
/// the next `prepare_sandbox` on the same path.
pub fn prepare_sandbox(root: &Path) -> Result<()> {
    if root.exists() {
        if !root.is_dir() {
            return Err(anyhow!(
                "sandbox root collides with a non-directory: {}",
                root.display()
            ));
        }
        fs::remove_dir_all(root)
            .with_context(|| format!("failed to clear sandbox root: {}", root.display()))?;
    }
    fs::create_dir_all(root)
        .with_context(|| format!("failed to create sandbox root: {}", root.display()))
}
