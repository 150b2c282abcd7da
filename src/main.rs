use cliproc::Cli;
use std::env;
use std::process::ExitCode;
use tbgen::commands::tbgen::Tbgen;

fn main() -> ExitCode {
    Cli::default().parse(env::args()).go::<Tbgen>()
}
