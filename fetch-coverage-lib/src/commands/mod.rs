//! Command-line front end for fetch-coverage
//!
//! `run` parses the arguments with clap and routes to a command handler:
//!
//! - **fetch**: load the configuration, layer command-line flags over it, look up the
//!   coverage of one repository and print it
//! - **init**: write the default configuration file
//!
//! Configuration is an optional TOML file (`fetch-coverage.toml` by default) listing
//! the services to query, the request timeout, a branch, and endpoint overrides.

mod common;
mod config;
mod fetch;
mod host;
mod init;
mod run;

pub use config::{Config, DEFAULT_CONFIG_FILE, DEFAULT_CONFIG_TOML};
pub use fetch::{FetchArgs, report_coverage};
pub use host::Host;
pub use init::{InitArgs, init_config};
pub use run::run;
