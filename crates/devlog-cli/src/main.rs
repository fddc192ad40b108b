//! # devlog
//!
//! Per-project development event log. Invoked by host hooks with a JSON
//! payload on stdin, or by hand for status and work-queue commands.

#![deny(unsafe_code)]

use std::process::ExitCode;

use clap::Parser;
use devlog_cli::{Cli, Command, Runtime, commands, exit_code};

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(2));
        }
    };

    let settings = match devlog_settings::load_settings() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("devlog: ignoring settings: {e}");
            devlog_settings::DevlogSettings::default()
        }
    };
    devlog_core::logging::init_subscriber(&settings.logging.level);

    let rt = Runtime::from_process(settings);
    let command = cli.command.unwrap_or(Command::Hook);
    tracing::debug!(?command, "devlog invoked");

    let mut stdin = std::io::stdin().lock();
    let mut stdout = std::io::stdout().lock();
    match commands::run(command, &rt, &mut stdin, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(exit_code(&e))
        }
    }
}
