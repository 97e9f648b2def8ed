//! CLI command implementations.
//!
//! Each submodule implements one subcommand of the `murphy` binary.

pub mod drawdown;
pub mod report;
