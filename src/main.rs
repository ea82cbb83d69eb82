//! cellgraph - Run spreadsheet command scripts against a live cell graph

mod config;
mod error;
mod script;

use anyhow::Context;
use cellgraph_core::{FormulaEngine, Sheet};
use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use script::Runner;

fn print_usage() {
    eprintln!("Usage: cellgraph [OPTIONS] [FILE]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [FILE]                    Command script to run (default: stdin)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --command <LINE>      Run a single command (can be repeated)");
    eprintln!("  --config <path>           Load settings from TOML file");
    eprintln!("  -v, --verbose             Enable debug logging");
    eprintln!("  -h, --help                Print help");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  set <CELL> <TEXT>         Set cell contents (=formula, 'escaped text)");
    eprintln!("  clear <CELL>              Clear a cell");
    eprintln!("  get <CELL>                Print the cell value");
    eprintln!("  text <CELL>               Print the cell text");
    eprintln!("  refs <CELL>               Print cells referenced by a formula");
    eprintln!("  print values|texts        Print the sheet");
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::DEBUG.into())
    } else {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut file_path: Option<PathBuf> = None;
    let mut commands: Vec<String> = Vec::new();
    let mut config_file: Option<PathBuf> = None;
    let mut verbose = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            "-c" | "--command" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --command requires a value");
                    std::process::exit(1);
                }
                commands.push(args[i].to_string());
            }
            "--config" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a file path");
                    std::process::exit(1);
                }
                config_file = Some(PathBuf::from(&args[i]));
            }
            "-v" | "--verbose" => verbose = true,
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                print_usage();
                std::process::exit(1);
            }
            _ => {
                if file_path.is_none() {
                    file_path = Some(PathBuf::from(&args[i]));
                } else {
                    eprintln!("Error: Unexpected argument: {}", args[i]);
                    print_usage();
                    std::process::exit(1);
                }
            }
        }
        i += 1;
    }

    init_logging(verbose);

    let (config, warnings) = config::load_config(config_file.as_ref());
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }

    let sheet = Sheet::with_engine(FormulaEngine::with_config(&config.formula));
    let mut runner = Runner::new(sheet);

    let stdout = io::stdout();
    let stderr = io::stderr();
    let mut out = stdout.lock();
    let mut err = stderr.lock();

    if !commands.is_empty() {
        runner
            .run_commands(&commands, &mut out, &mut err)
            .context("failed to write output")?;
    } else if let Some(path) = file_path {
        let file = File::open(&path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        runner
            .run_script(BufReader::new(file), &mut out, &mut err)
            .with_context(|| format!("failed to run {}", path.display()))?;
    } else {
        runner
            .run_script(io::stdin().lock(), &mut out, &mut err)
            .context("failed to run script from stdin")?;
    }

    tracing::debug!(
        cells = runner.sheet().cell_count(),
        failures = runner.failures(),
        "script finished"
    );
    if runner.failures() > 0 {
        std::process::exit(1);
    }
    Ok(())
}
