use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use sandcheck_core::{Checksum, InstallerConfig, PackageSpec};
use sandcheck_installer::SandboxInstaller;

use crate::render::{current_output_style, render_status_line, start_install_spinner, Status};
use crate::Cli;

pub fn run_install(cli: &Cli, spec_text: &str, json: bool) -> Result<ExitCode> {
    let spec = PackageSpec::parse(spec_text)?;
    let installer = installer_from_cli(cli)?;
    let style = current_output_style();

    let spinner = start_install_spinner(style, &format!("installing {spec}"));
    let result = installer.install(&spec);
    spinner.finish();

    if json {
        println!("{}", serde_json::to_string(&result)?);
    } else if let Some(checksum) = &result.checksum {
        println!(
            "{}",
            render_status_line(style, Status::Ok, &format!("installed {spec}"))
        );
        println!("checksum: {checksum}");
    } else {
        let error = result.error.as_deref().unwrap_or("unknown failure");
        println!(
            "{}",
            render_status_line(style, Status::Failed, &format!("install {spec}: {error}"))
        );
    }
    Ok(exit_code(result.success))
}

pub fn run_verify(cli: &Cli, checksum_text: &str, json: bool) -> Result<ExitCode> {
    let expected = Checksum::from_hex(checksum_text)?;
    let installer = installer_from_cli(cli)?;
    let style = current_output_style();

    let matched = installer.verify(&expected)?;
    if json {
        println!(
            "{}",
            serde_json::json!({ "matched": matched, "checksum": expected })
        );
    } else if matched {
        println!(
            "{}",
            render_status_line(style, Status::Ok, "checksum matches the tree")
        );
    } else {
        println!(
            "{}",
            render_status_line(style, Status::Failed, "checksum does not match the tree")
        );
    }
    Ok(exit_code(matched))
}

pub fn run_hash(cli: &Cli) -> Result<ExitCode> {
    let installer = installer_from_cli(cli)?;
    let checksum = sandcheck_installer::tree_checksum(installer.root())?;
    println!("{checksum}");
    Ok(ExitCode::SUCCESS)
}

pub fn run_doctor(cli: &Cli) -> Result<ExitCode> {
    let config = load_config(cli)?;
    let root = resolve_sandbox_root(cli, &config)?;
    println!("sandbox root: {}", root.display());
    println!("npm program: {}", config.npm_program);
    match config.install_timeout_secs {
        Some(secs) => println!("install timeout: {secs}s"),
        None => println!("install timeout: none"),
    }
    println!(
        "config file: {}",
        effective_config_path(cli)?.display()
    );
    Ok(ExitCode::SUCCESS)
}

fn installer_from_cli(cli: &Cli) -> Result<SandboxInstaller> {
    let config = load_config(cli)?;
    let root = resolve_sandbox_root(cli, &config)?;
    Ok(SandboxInstaller::new(root, config))
}

fn load_config(cli: &Cli) -> Result<InstallerConfig> {
    InstallerConfig::load(&effective_config_path(cli)?)
}

pub(crate) fn effective_config_path(cli: &Cli) -> Result<PathBuf> {
    match &cli.config {
        Some(path) => Ok(path.clone()),
        None => Ok(default_user_dir()?.join("config.toml")),
    }
}

pub(crate) fn resolve_sandbox_root(cli: &Cli, config: &InstallerConfig) -> Result<PathBuf> {
    if let Some(root) = &cli.root {
        return Ok(root.clone());
    }
    if let Some(root) = &config.sandbox_root {
        return Ok(root.clone());
    }
    Ok(default_user_dir()?.join("sandbox"))
}

pub(crate) fn default_user_dir() -> Result<PathBuf> {
    if cfg!(windows) {
        let app_data = std::env::var("LOCALAPPDATA")
            .context("LOCALAPPDATA is not set; cannot resolve user directory")?;
        return Ok(PathBuf::from(app_data).join("Sandcheck"));
    }

    let home = std::env::var("HOME").context("HOME is not set; cannot resolve user directory")?;
    Ok(PathBuf::from(home).join(".sandcheck"))
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
