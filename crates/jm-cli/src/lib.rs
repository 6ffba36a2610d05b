use std::ffi::OsString;

use clap::Parser;
use jm_core::MergerError;

mod cli_args;
mod coverage_command;
mod error_map;
mod log_command;
mod source_loader;

pub(crate) use cli_args::{Cli, CoverageArgs, LogArgs, Mode};
pub(crate) use error_map::{emit_error, map_cli_coverage, map_cli_output, map_cli_source_path};
pub(crate) use source_loader::{discover_files, resolve_source_dir};

pub fn run_cli_from_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return error.exit_code();
        }
    };
    match run(cli) {
        Ok(code) => code,
        Err(error) => emit_error(error),
    }
}

fn run(cli: Cli) -> Result<i32, MergerError> {
    match cli.command {
        Mode::Log(args) => log_command::run_log(args),
        Mode::Coverage(args) => coverage_command::run_coverage(args),
    }
}

#[cfg(test)]
mod cli_test_support;
