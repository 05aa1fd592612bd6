//! `munch` entry point. All logic lives in the library crate.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    munch_cli::run().await
}
