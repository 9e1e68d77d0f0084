//! # Check-Config Subcommand
//!
//! Loads a configuration file, applies environment overrides, and prints
//! the resolved admin and height source.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::config::{resolve_config, Overrides};

/// Arguments for the `fcr check-config` subcommand.
#[derive(Args, Debug)]
pub struct CheckConfigArgs {
    /// Path to the configuration file (.yaml, .yml or .json).
    pub path: PathBuf,
}

/// Execute the check-config subcommand.
pub fn run_check_config(args: &CheckConfigArgs) -> Result<u8> {
    let config = resolve_config(Some(&args.path), &Overrides::default())?;
    println!("  config: VALID");
    println!("  admin:  {}", config.admin);
    println!("  height: {}", config.height);
    Ok(0)
}
