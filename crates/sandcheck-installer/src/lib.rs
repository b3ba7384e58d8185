mod npm;
mod sandbox;

pub use npm::{
    build_install_command, ensure_install_outputs, write_manifest, LOCKFILE_NAME, MANIFEST_NAME,
    MODULES_DIR,
};
pub use sandbox::prepare_sandbox;

use std::path::{Path, PathBuf};

use anyhow::Result;
use sandcheck_core::{Checksum, InstallError, InstallResult, InstallerConfig, PackageSpec};
use sandcheck_hasher::hash_tree;

/// Caller-owned handle over one sandbox root.
///
/// Each `install` runs the full pipeline against that root: prepare (clear),
/// populate via the delegated installer, walk, hash. The root is an explicit
/// constructor argument rather than shared process state; callers wanting
/// concurrency use one handle per root.
#[derive(Debug, Clone)]
pub struct SandboxInstaller {
    root: PathBuf,
    config: InstallerConfig,
}

impl SandboxInstaller {
    pub fn new(root: impl Into<PathBuf>, config: InstallerConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    pub fn with_default_config(root: impl Into<PathBuf>) -> Self {
        Self::new(root, InstallerConfig::default())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &InstallerConfig {
        &self.config
    }

    /// Install `spec` into the sandbox and fingerprint the resulting tree.
    ///
    /// Never returns `Err`: every failure is folded into
    /// `InstallResult { success: false, error }` so callers branch on
    /// `success`. Failures are not retried internally.
    pub fn install(&self, spec: &PackageSpec) -> InstallResult {
        self.install_with_runner(spec, |spec, root| {
            npm::populate_sandbox(&self.config, spec, root)
        })
    }

    /// Same pipeline as `install`, with the populate step injected. The
    /// runner is handed a freshly cleared root and must leave behind a
    /// manifest, a lockfile, and a dependency directory.
    pub fn install_with_runner<F>(&self, spec: &PackageSpec, populate: F) -> InstallResult
    where
        F: FnOnce(&PackageSpec, &Path) -> Result<()>,
    {
        if let Err(err) = prepare_sandbox(&self.root) {
            return InstallResult::failed(InstallError::Sandbox(format!("{err:#}")));
        }
        if let Err(err) = populate(spec, &self.root) {
            return InstallResult::failed(InstallError::Resolution(format!("{err:#}")));
        }
        if let Err(err) = ensure_install_outputs(&self.root) {
            return InstallResult::failed(InstallError::Resolution(format!("{err:#}")));
        }
        match hash_tree(&self.root) {
            Ok(checksum) => InstallResult::succeeded(checksum),
            Err(err) => InstallResult::failed(InstallError::Traversal(format!("{err:#}"))),
        }
    }

    /// Re-derive the checksum of the current sandbox contents and compare.
    /// A mismatch is `Ok(false)`; only walk failures are errors.
    pub fn verify(&self, expected: &Checksum) -> Result<bool> {
        verify_tree_checksum(&self.root, expected)
    }
}

/// Read-only verification of an existing tree against a recorded checksum.
pub fn verify_tree_checksum(root: &Path, expected: &Checksum) -> Result<bool> {
    Ok(hash_tree(root)? == *expected)
}

/// Checksum of an existing tree with no expected value to compare against.
pub fn tree_checksum(root: &Path) -> Result<Checksum> {
    hash_tree(root)
}
