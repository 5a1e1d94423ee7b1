use clap::Parser;
use stockdash::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
