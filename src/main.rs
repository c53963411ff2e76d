use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use prefgroups::Settings;

/// Assign people to balanced groups from the preference scores in a CSV file
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Preferences in CSV format, e.g. exported from an online form
    #[arg(short, long)]
    input: PathBuf,

    /// File to write the group assignments to
    #[arg(short, long)]
    output: PathBuf,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match prefgroups::run(&args.input, &args.output, &Settings::default()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
