#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Resolve a source repository URL to its test coverage percentage
//!
//! Coverage is looked up in a caller-declared coverage badge first, then in the
//! coverage services (codecov, coveralls, Code Climate, Scrutinizer), which are
//! queried concurrently.
//!
//! # Module Organization
//!
//! - `repo_spec`: recognizing repository URLs and shortcuts
//! - `transport`: outbound HTTP with per-request timeouts
//! - `badge`: reading a declared coverage badge
//! - `services`: one adapter per coverage service
//! - `fetcher`: the lookup itself, combining badge and services
//! - `commands`: the command-line front end
//!
//! ```no_run
//! # async fn example() -> Result<(), fetch_coverage_lib::AggregateError> {
//! use fetch_coverage_lib::{Options, Service, fetch_coverage};
//!
//! let options = Options::default().with_services([Service::Codecov, Service::Coveralls]);
//! if let Some(coverage) = fetch_coverage("git@github.com:owner/repo.git", &options).await? {
//!     println!("{coverage}%");
//! }
//! # Ok(())
//! # }
//! ```

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

mod badge;
mod commands;
mod error;
mod fetcher;
mod options;
mod provider_result;
mod repo_spec;
mod services;
mod transport;

pub use commands::{Config, DEFAULT_CONFIG_FILE, DEFAULT_CONFIG_TOML, FetchArgs, Host, InitArgs, init_config, report_coverage, run};
pub use error::{AggregateError, ServiceError};
pub use fetcher::{CoverageFetcher, fetch_coverage};
pub use options::{Badge, BadgeUrls, COVERAGE_BADGE_TYPE, DEFAULT_SERVICES, DEFAULT_TIMEOUT, Options};
pub use provider_result::ProviderResult;
pub use repo_spec::{RepoHost, RepoSpec};
pub use services::{Endpoints, Service};
pub use transport::Transport;
