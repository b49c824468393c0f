//! gridcalc - evaluate a spreadsheet given on the command line

mod cli;
mod config_path;
mod error;

use gridcalc_core::config::load_config;
use gridcalc_core::{Document, render};
use std::env;
use std::io::Write;

use cli::{Command, Options};

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    let options = match cli::parse_args(&args) {
        Ok(Command::Help) => {
            cli::print_usage();
            return;
        }
        Ok(Command::Run(options)) => options,
        Err(e) => {
            eprintln!("Error: {}", e);
            cli::print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&options) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(options: &Options) -> anyhow::Result<()> {
    let default_path = if options.no_config {
        None
    } else {
        config_path::default_config_path()
    };
    let (mut config, warnings) = load_config(options.config_file.as_ref(), default_path);
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }
    options.apply_overrides(&mut config);

    let cells = options.cells.iter().map(|(a, c)| (a.as_str(), c.as_str()));
    let doc = Document::from_pairs(cells, config)?;
    let evaluation = doc.evaluate()?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if options.markdown {
        render::write_markdown(&mut out, &evaluation.values)?;
    } else {
        render::write_text(&mut out, &evaluation.values)?;
    }
    out.flush()?;
    Ok(())
}
