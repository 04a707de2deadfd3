//! Command-line entry point.
//!
//! Parses arguments, sets up logging and the crypto provider, and hands
//! over to the library.

use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use log::error;

use pinoader::initialization::{init_crypto_provider, init_logger_with};
use pinoader::{run, Opt};

fn main() -> Result<()> {
    let opt = Opt::parse();

    init_logger_with(opt.log_level().into(), opt.log_format.clone())
        .context("Failed to initialize logger")?;
    init_crypto_provider();

    if let Err(e) = run(&opt) {
        error!("{e:#}");
        process::exit(1);
    }
    Ok(())
}
