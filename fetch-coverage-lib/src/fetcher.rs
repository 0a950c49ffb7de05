//! Resolve a repository URL to a coverage percentage
//!
//! The lookup runs in three steps:
//!
//! 1. The URL is resolved to a [`RepoSpec`]. Unrecognized input ends the lookup with
//!    `Ok(None)` before any request is made.
//! 2. A declared coverage badge is read. A percentage ends the lookup, as does a badge
//!    that renders no percentage. A missing badge or a failed fetch falls through.
//! 3. Every configured service is queried concurrently and all of them are awaited.
//!    The first service *in configured order* that found a value wins, regardless of
//!    which answered first. With no value, any failure turns into an
//!    [`AggregateError`] listing all of them; otherwise the result is `Ok(None)`.
//!
//! A lookup owns nothing but its inputs, so repeated calls are independent.

use crate::badge::{self, BadgeOutcome};
use crate::error::{AggregateError, ServiceError};
use crate::options::Options;
use crate::provider_result::ProviderResult;
use crate::repo_spec::RepoSpec;
use crate::services::{Endpoints, Service};
use crate::transport::Transport;
use futures_util::future::join_all;

const LOG_TARGET: &str = "   fetcher";

#[derive(Debug, Clone, Default)]
pub struct CoverageFetcher {
    transport: Transport,
    endpoints: Endpoints,
}

impl CoverageFetcher {
    #[must_use]
    pub fn new(endpoints: Endpoints) -> Self {
        Self {
            transport: Transport::new(),
            endpoints,
        }
    }

    #[must_use]
    pub const fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Fetch the coverage percentage of the repository at `repository_url`.
    ///
    /// Returns `Ok(None)` when no coverage could be found, including when the URL is not
    /// a recognized repository location.
    ///
    /// # Errors
    ///
    /// Returns an [`AggregateError`] when no source produced a value and at least one
    /// service failed.
    pub async fn fetch_coverage(&self, repository_url: &str, options: &Options) -> Result<Option<f64>, AggregateError> {
        let Some(repo_spec) = RepoSpec::resolve(repository_url) else {
            log::info!(target: LOG_TARGET, "'{repository_url}' is not a recognized repository URL");
            return Ok(None);
        };

        match badge::resolve(&self.transport, options.badges(), options.timeout()).await {
            BadgeOutcome::Found(coverage) => return Ok(Some(coverage)),
            BadgeOutcome::Unknown => return Ok(None),
            BadgeOutcome::NotUsed => {}
        }

        let results = self.query_services(&repo_spec, options).await;
        reduce(results)
    }

    /// Query every configured service and wait for all of them to settle.
    ///
    /// Results come back in configured order, not completion order.
    async fn query_services(&self, repo_spec: &RepoSpec, options: &Options) -> Vec<(Service, ProviderResult<f64>)> {
        log::info!(
            target: LOG_TARGET,
            "Querying {} service(s) for coverage of '{repo_spec}'",
            options.services().len()
        );

        join_all(options.services().iter().map(|&service| async move {
            let result = service.fetch(repo_spec, options, &self.transport, &self.endpoints).await;
            (service, result)
        }))
        .await
    }
}

/// Fold the settled service results into the final answer.
fn reduce(results: Vec<(Service, ProviderResult<f64>)>) -> Result<Option<f64>, AggregateError> {
    if let Some((service, coverage)) = results
        .iter()
        .find_map(|(service, result)| result.as_ref().map(|&coverage| (service, coverage)))
    {
        log::info!(target: LOG_TARGET, "Using {coverage}% reported by {service}");
        return Ok(Some(coverage));
    }

    if !results.iter().any(|(_, result)| result.is_error()) {
        log::info!(target: LOG_TARGET, "No service reported coverage");
        return Ok(None);
    }

    let errors = results
        .into_iter()
        .filter_map(|(service, result)| match result {
            ProviderResult::Error(e) => Some(ServiceError::new(service, e)),
            ProviderResult::Found(_) | ProviderResult::Unavailable(_) => None,
        })
        .collect();

    Err(AggregateError::new(errors))
}

/// Fetch coverage using the public service endpoints.
///
/// # Errors
///
/// See [`CoverageFetcher::fetch_coverage`].
pub async fn fetch_coverage(repository_url: &str, options: &Options) -> Result<Option<f64>, AggregateError> {
    CoverageFetcher::default().fetch_coverage(repository_url, options).await
}
