//! CLI for the dsl2sr capture transcoder

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use colored::*;
use dsl2sr::{convert_files, ConvertConfig};
use log::LevelFilter;

#[derive(Parser)]
#[command(name = "dsl2sr", version)]
#[command(
    about = "Convert DSLogic/DSCope .dsl captures into sigrok .sr sessions",
    long_about = None
)]
struct Cli {
    /// The .dsl capture to read
    #[arg(short, long)]
    input: PathBuf,

    /// The .sr session to write
    #[arg(short, long)]
    output: PathBuf,
}

fn init_logging() {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(LevelFilter::Info);
    builder.parse_default_env();

    // Custom formatter: just print the level and message
    builder.format(|buf, record| {
        use std::io::Write;
        writeln!(buf, "[{}] {}", record.level(), record.args())
    });

    let _ = builder.try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let config = ConvertConfig::new(cli.input, cli.output);
    match convert_files(&config) {
        Ok(report) => {
            let status = if report.is_clean() {
                "done".green()
            } else {
                "done with warnings".yellow()
            };
            println!(
                "{} {} -> {} ({} data entries, {} skipped)",
                status,
                config.input.display(),
                config.output.display(),
                report.data_entries,
                report.warnings.len()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
