use clap::Parser;
use etfgeo::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
