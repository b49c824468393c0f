//! Command line parsing.

use gridcalc_engine::engine::{DivisionPolicy, EvalConfig};
use std::path::PathBuf;

use crate::error::CliError;

#[derive(Debug, Default, PartialEq)]
pub struct Options {
    pub markdown: bool,
    pub config_file: Option<PathBuf>,
    pub no_config: bool,
    pub max_depth: Option<usize>,
    pub division: Option<DivisionPolicy>,
    /// (address, content) in command line order.
    pub cells: Vec<(String, String)>,
}

impl Options {
    /// Apply command line overrides on top of a loaded config.
    pub fn apply_overrides(&self, config: &mut EvalConfig) {
        if let Some(depth) = self.max_depth {
            config.max_depth = depth;
        }
        if let Some(division) = self.division {
            config.division = division;
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum Command {
    Help,
    Run(Options),
}

pub fn print_usage() {
    eprintln!("Usage: gridcalc [OPTIONS] CELL=CONTENT...");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  CELL=CONTENT              Cell input, e.g. A1=5 or B1==SUM(A1:A3)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -m, --markdown            Print the result as a markdown table");
    eprintln!("  --config <FILE>           Load evaluation settings from a TOML file");
    eprintln!("  --no-config               Ignore the default config file");
    eprintln!("  --max-depth <N>           Maximum reference-following depth");
    eprintln!("  --division <POLICY>       Division by zero: error or infinity");
    eprintln!("  -h, --help                Print help");
}

/// Parse arguments, not including the program name.
pub fn parse_args<S: AsRef<str>>(args: &[S]) -> Result<Command, CliError> {
    let mut options = Options::default();

    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_ref();
        match arg {
            "-h" | "--help" => return Ok(Command::Help),
            "-m" | "--markdown" => options.markdown = true,
            "--no-config" => options.no_config = true,
            "--config" => {
                i += 1;
                options.config_file = Some(PathBuf::from(value_for(args, i, arg)?));
            }
            "--max-depth" => {
                i += 1;
                let value = value_for(args, i, arg)?;
                let depth = value.parse::<usize>().map_err(|e| CliError::InvalidValue {
                    flag: arg.to_string(),
                    message: format!("{}: {}", value, e),
                })?;
                options.max_depth = Some(depth);
            }
            "--division" => {
                i += 1;
                let value = value_for(args, i, arg)?;
                let policy = value
                    .parse::<DivisionPolicy>()
                    .map_err(|message| CliError::InvalidValue {
                        flag: arg.to_string(),
                        message,
                    })?;
                options.division = Some(policy);
            }
            _ if arg.starts_with('-') && !arg.contains('=') => {
                return Err(CliError::UnknownOption(arg.to_string()));
            }
            _ => {
                let (address, content) = arg
                    .split_once('=')
                    .ok_or_else(|| CliError::InvalidAssignment(arg.to_string()))?;
                if address.trim().is_empty() {
                    return Err(CliError::InvalidAssignment(arg.to_string()));
                }
                options
                    .cells
                    .push((address.trim().to_string(), content.to_string()));
            }
        }
        i += 1;
    }

    Ok(Command::Run(options))
}

fn value_for<'a, S: AsRef<str>>(args: &'a [S], i: usize, flag: &str) -> Result<&'a str, CliError> {
    args.get(i)
        .map(|s| s.as_ref())
        .ok_or_else(|| CliError::MissingValue(flag.to_string()))
}
