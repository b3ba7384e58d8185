use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Context, Result};
use sandcheck_core::{InstallerConfig, PackageSpec};
use serde_json::json;

pub const MANIFEST_NAME: &str = "package.json";
pub const LOCKFILE_NAME: &str = "package-lock.json";
pub const MODULES_DIR: &str = "node_modules";

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Write a manifest declaring exactly `spec.name@spec.version`, then run the
/// delegated installer inside `root` to resolve and fetch the full tree.
pub fn populate_sandbox(config: &InstallerConfig, spec: &PackageSpec, root: &Path) -> Result<()> {
    write_manifest(root, spec)?;
    let mut command = build_install_command(config, root);
    run_install_command(&mut command, config.install_timeout_secs)
        .with_context(|| format!("delegated install of {spec} failed"))
}

/// The manifest pins the bare exact version, never a range, so repeated
/// resolutions of the same spec are forced to the same graph.
pub fn write_manifest(root: &Path, spec: &PackageSpec) -> Result<()> {
    let mut dependencies = serde_json::Map::new();
    dependencies.insert(spec.name.clone(), json!(spec.version.to_string()));
    let manifest = json!({
        "name": "sandcheck-sandbox",
        "version": "0.0.0",
        "private": true,
        "dependencies": dependencies,
    });
    let path = root.join(MANIFEST_NAME);
    let mut payload = serde_json::to_string_pretty(&manifest)?;
    payload.push('\n');
    fs::write(&path, payload)
        .with_context(|| format!("failed to write manifest: {}", path.display()))
}

pub fn build_install_command(config: &InstallerConfig, root: &Path) -> Command {
    let mut command = Command::new(&config.npm_program);
    command
        .arg("install")
        .arg("--ignore-scripts")
        .arg("--no-audit")
        .arg("--no-fund")
        .arg("--no-update-notifier")
        .arg("--loglevel=error")
        .current_dir(root);
    command
}

/// Confirm the delegated installer left a complete tree behind. An exit
/// status of zero with missing outputs is still a failed resolution.
pub fn ensure_install_outputs(root: &Path) -> Result<()> {
    for required in [MANIFEST_NAME, LOCKFILE_NAME] {
        if !root.join(required).is_file() {
            return Err(anyhow!(
                "delegated installer did not produce {required} under {}",
                root.display()
            ));
        }
    }
    if !root.join(MODULES_DIR).is_dir() {
        return Err(anyhow!(
            "delegated installer did not produce {MODULES_DIR} under {}",
            root.display()
        ));
    }
    Ok(())
}

// Output goes to scratch files outside the sandbox so captured bytes never
// enter the checksum and a chatty installer cannot block on a full pipe.
pub(crate) fn run_install_command(command: &mut Command, timeout_secs: Option<u64>) -> Result<()> {
    let stdout_path = scratch_output_path("stdout");
    let stderr_path = scratch_output_path("stderr");
    let stdout_file = fs::File::create(&stdout_path)
        .with_context(|| format!("failed to create scratch file: {}", stdout_path.display()))?;
    let stderr_file = fs::File::create(&stderr_path)
        .with_context(|| format!("failed to create scratch file: {}", stderr_path.display()))?;

    let result = wait_for_exit(
        command
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout_file))
            .stderr(Stdio::from(stderr_file)),
        timeout_secs,
        &stderr_path,
    );

    let _ = fs::remove_file(&stdout_path);
    let _ = fs::remove_file(&stderr_path);
    result
}

fn wait_for_exit(
    command: &mut Command,
    timeout_secs: Option<u64>,
    stderr_path: &Path,
) -> Result<()> {
    let mut child = command
        .spawn()
        .with_context(|| format!("failed to start {:?}", command.get_program()))?;
    let started = Instant::now();

    let status = loop {
        if let Some(status) = child.try_wait().context("failed to poll installer process")? {
            break status;
        }
        if let Some(secs) = timeout_secs {
            if started.elapsed() >= Duration::from_secs(secs) {
                let _ = child.kill();
                let _ = child.wait();
                return Err(anyhow!("installer timed out after {secs}s"));
            }
        }
        std::thread::sleep(POLL_INTERVAL);
    };

    if status.success() {
        return Ok(());
    }
    let stderr = fs::read_to_string(stderr_path).unwrap_or_default();
    Err(anyhow!(
        "installer exited with {status}: {}",
        stderr.trim()
    ))
}

fn scratch_output_path(stream: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();
    std::env::temp_dir().join(format!(
        "sandcheck-install-{stream}-{}-{nanos}",
        std::process::id()
    ))
}
