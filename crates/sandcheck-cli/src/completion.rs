use std::io::Write;

use clap::CommandFactory;
use clap_complete::Shell;

use crate::Cli;

pub fn write_completion_script<W: Write>(shell: Shell, writer: &mut W) {
    let mut command = Cli::command();
    clap_complete::generate(shell, &mut command, "sandcheck", writer);
}
