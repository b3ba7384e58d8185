mod completion;
mod flows;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(name = "sandcheck")]
#[command(about = "Sandboxed package installs with deterministic tree checksums", long_about = None)]
struct Cli {
    /// Sandbox root directory (overrides the config file)
    #[arg(long, global = true)]
    root: Option<PathBuf>,
    /// Path to a sandcheck config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Install name@version into a clean sandbox and print the tree checksum.
    /// The sandbox root is cleared first; previous contents are deleted.
    Install {
        spec: String,
        #[arg(long)]
        json: bool,
    },
    /// Re-hash the sandbox tree and compare against a recorded checksum
    Verify {
        checksum: String,
        #[arg(long)]
        json: bool,
    },
    /// Print the checksum of the sandbox tree as it is on disk
    Hash,
    /// Print the effective configuration and paths
    Doctor,
    /// Generate a shell completion script on stdout
    Completions { shell: Shell },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Install { ref spec, json } => flows::run_install(&cli, spec, json),
        Commands::Verify { ref checksum, json } => flows::run_verify(&cli, checksum, json),
        Commands::Hash => flows::run_hash(&cli),
        Commands::Doctor => flows::run_doctor(&cli),
        Commands::Completions { shell } => {
            completion::write_completion_script(shell, &mut std::io::stdout());
            Ok(ExitCode::SUCCESS)
        }
    };

    match outcome {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests;
