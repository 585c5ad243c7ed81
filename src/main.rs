use clap::Parser;
use quantick::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
