//! WolfSearch CLI binary.

use std::io::Write;
use std::process;

use anyhow::Context;
use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;

use wolfsearch::cli::args::WolfArgs;
use wolfsearch::cli::commands::execute_command;

fn main() {
    let args = WolfArgs::parse();

    let log_level = match args.verbosity() {
        0 => LevelFilter::Error,
        1 => LevelFilter::Warn,
        2 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    Builder::new()
        .filter_level(log_level)
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    if let Err(e) = run(args) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(args: WolfArgs) -> anyhow::Result<()> {
    let index_dir = args.index_dir.clone();
    execute_command(args).with_context(|| format!("index at {}", index_dir.display()))
}
