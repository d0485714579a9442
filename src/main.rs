use clap::Parser;
use log::LevelFilter;
use std::process;

use readmeth::config::Config;
use readmeth::{pipeline, Cli, Error};

fn main() {
    let args = Cli::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    pretty_env_logger::formatted_builder()
        .filter_level(level)
        .parse_default_env()
        .init();

    let config = Config::from_cli(&args);
    if let Err(err) = pipeline::run(&config) {
        eprintln!("Error: {:#}", err);
        let code = err.downcast_ref::<Error>().map_or(1, Error::exit_code);
        process::exit(code);
    }
}
