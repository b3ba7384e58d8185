use super::*;

use clap::CommandFactory;
use clap::Parser;
use sandcheck_core::InstallerConfig;

use crate::flows::{effective_config_path, resolve_sandbox_root};
use crate::render::{render_status_line, OutputStyle, Status};

fn parse_cli(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).expect("must parse")
}

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn install_subcommand_parses_spec_and_flags() {
    let cli = parse_cli(&[
        "sandcheck",
        "install",
        "lodash@4.17.21",
        "--json",
        "--root",
        "/tmp/box",
    ]);
    match cli.command {
        Commands::Install { ref spec, json } => {
            assert_eq!(spec, "lodash@4.17.21");
            assert!(json);
        }
        ref other => panic!("unexpected command: {other:?}"),
    }
    assert_eq!(cli.root.as_deref(), Some(std::path::Path::new("/tmp/box")));
}

#[test]
fn verify_subcommand_takes_a_checksum() {
    let cli = parse_cli(&["sandcheck", "verify", "ab12"]);
    match cli.command {
        Commands::Verify { ref checksum, json } => {
            assert_eq!(checksum, "ab12");
            assert!(!json);
        }
        ref other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn explicit_root_flag_wins_over_config() {
    let cli = parse_cli(&["sandcheck", "--root", "/tmp/explicit", "hash"]);
    let config = InstallerConfig {
        sandbox_root: Some("/tmp/from-config".into()),
        ..InstallerConfig::default()
    };
    let root = resolve_sandbox_root(&cli, &config).expect("must resolve");
    assert_eq!(root, std::path::PathBuf::from("/tmp/explicit"));
}

#[test]
fn config_sandbox_root_is_used_when_no_flag_given() {
    let cli = parse_cli(&["sandcheck", "hash"]);
    let config = InstallerConfig {
        sandbox_root: Some("/tmp/from-config".into()),
        ..InstallerConfig::default()
    };
    let root = resolve_sandbox_root(&cli, &config).expect("must resolve");
    assert_eq!(root, std::path::PathBuf::from("/tmp/from-config"));
}

#[test]
fn explicit_config_path_is_respected() {
    let cli = parse_cli(&["sandcheck", "--config", "/etc/sandcheck.toml", "doctor"]);
    let path = effective_config_path(&cli).expect("must resolve");
    assert_eq!(path, std::path::PathBuf::from("/etc/sandcheck.toml"));
}

#[test]
fn plain_status_lines_carry_no_escape_codes() {
    let line = render_status_line(OutputStyle::Plain, Status::Ok, "installed lodash@4.17.21");
    assert_eq!(line, "[ok] installed lodash@4.17.21");

    let failed = render_status_line(OutputStyle::Plain, Status::Failed, "nope");
    assert_eq!(failed, "[failed] nope");
}

#[test]
fn rich_status_lines_keep_the_message_text() {
    let line = render_status_line(OutputStyle::Rich, Status::Failed, "mismatch");
    assert!(line.contains("failed"));
    assert!(line.contains("mismatch"));
}

#[test]
fn completion_script_is_generated() {
    let mut script = Vec::new();
    completion::write_completion_script(clap_complete::Shell::Bash, &mut script);
    let text = String::from_utf8(script).expect("must be utf-8");
    assert!(text.contains("sandcheck"));
}
