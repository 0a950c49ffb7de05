//! Coverage service adapters
//!
//! Each supported provider is one variant of [`Service`]. The set is closed: dispatch
//! is a `match`, so adding a provider means adding a variant, an [`Endpoints`] entry
//! and a module here.
//!
//! An adapter maps a [`RepoSpec`] to the provider's API, asks the [`Transport`] for it
//! and extracts a percentage. `Ok(None)` means the provider has no data for the
//! repository (not registered, host not supported, no report yet). Errors carry the
//! URL that failed; [`Service::fetch`] adds which service it was.

mod codeclimate;
mod codecov;
mod coveralls;
mod endpoints;
mod scrutinizer;

pub use endpoints::Endpoints;

use crate::options::Options;
use crate::provider_result::ProviderResult;
use crate::repo_spec::RepoSpec;
use crate::transport::Transport;
use crate::Result;
use ohno::{EnrichableExt, IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use url::Url;

const LOG_TARGET: &str = "  services";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr, Deserialize, Serialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    Codecov,
    Coveralls,
    CodeClimate,
    Scrutinizer,
}

impl Service {
    /// Ask this service for the coverage of `repo_spec`.
    ///
    /// Never fails: errors are captured in [`ProviderResult::Error`] so sibling services
    /// are unaffected.
    pub async fn fetch(
        self,
        repo_spec: &RepoSpec,
        options: &Options,
        transport: &Transport,
        endpoints: &Endpoints,
    ) -> ProviderResult<f64> {
        let base = endpoints.base_url(self);
        let timeout = options.timeout();
        let branch = options.branch();

        let result = match self {
            Self::Codecov => codecov::fetch(transport, base, repo_spec, branch, timeout).await,
            Self::Coveralls => coveralls::fetch(transport, base, repo_spec, branch, timeout).await,
            Self::CodeClimate => codeclimate::fetch(transport, base, repo_spec, timeout).await,
            Self::Scrutinizer => scrutinizer::fetch(transport, base, repo_spec, branch, timeout).await,
        };

        match result {
            Ok(Some(coverage)) => {
                log::debug!(target: LOG_TARGET, "{self} reports {coverage}% for '{repo_spec}'");
                ProviderResult::Found(coverage)
            }
            Ok(None) => {
                log::debug!(target: LOG_TARGET, "{self} has no coverage data for '{repo_spec}'");
                ProviderResult::unavailable(format!("{self} has no coverage data for '{repo_spec}'"))
            }
            Err(e) => {
                let e = e.enrich_with(|| format!("fetching coverage from {self} for '{repo_spec}'"));
                log::warn!(target: LOG_TARGET, "{e:#}");
                ProviderResult::Error(Arc::new(e))
            }
        }
    }
}

/// Build `{base}/{segments...}`, percent-encoding every segment.
fn endpoint_url(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|()| app_err!("base URL '{base}' cannot carry a path"))?;
        let _ = path.pop_if_empty().extend(segments);
    }
    Ok(url)
}

/// Parse a coverage number that providers sometimes send as a string.
fn parse_percentage(value: &serde_json::Value) -> Result<Option<f64>> {
    match value {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::Number(n) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| app_err!("coverage value {n} is not representable")),
        serde_json::Value::String(s) => s
            .trim()
            .trim_end_matches('%')
            .parse::<f64>()
            .map(Some)
            .into_app_err_with(|| format!("parsing coverage value '{s}'")),
        other => Err(app_err!("unexpected coverage value {other}")),
    }
}
