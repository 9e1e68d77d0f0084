//! # fcr-cli — Facility & Compliance Registry Command-Line Interface
//!
//! Drives an in-process registry from operation scripts. The registry has
//! no persistence or transport of its own; this crate is one of the
//! external collaborators that invokes its operations and reports results.
//!
//! ## Subcommands
//!
//! - `run`: replay a YAML/JSON operation script, one JSON line per step
//! - `check-config`: load and validate a configuration file
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from execution.
//! - Registry semantics live in `fcr-registry`; nothing here re-implements
//!   an authorization or existence check.

pub mod check;
pub mod config;
pub mod run;
pub mod script;
