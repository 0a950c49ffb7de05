use super::{endpoint_url, parse_percentage};
use crate::Result;
use crate::repo_spec::{RepoHost, RepoSpec};
use crate::transport::Transport;
use core::time::Duration;
use serde::Deserialize;
use std::collections::HashMap;
use url::Url;

const COVERAGE_METRIC: &str = "scrutinizer.test_coverage";

#[derive(Debug, Deserialize)]
struct RepoResponse {
    #[serde(default)]
    default_branch: Option<String>,
    #[serde(default)]
    applications: HashMap<String, Application>,
}

#[derive(Debug, Deserialize)]
struct Application {
    #[serde(default)]
    index: Option<Index>,
}

#[derive(Debug, Deserialize)]
struct Index {
    #[serde(rename = "_embedded", default)]
    embedded: Option<Embedded>,
}

#[derive(Debug, Deserialize)]
struct Embedded {
    #[serde(default)]
    project: Option<Project>,
}

#[derive(Debug, Deserialize)]
struct Project {
    #[serde(default)]
    metric_values: HashMap<String, serde_json::Value>,
}

const fn repository_type(host: RepoHost) -> Option<&'static str> {
    match host {
        RepoHost::GitHub => Some("g"),
        RepoHost::Bitbucket => Some("b"),
        RepoHost::GitLab => None,
    }
}

pub async fn fetch(transport: &Transport, base: &Url, repo_spec: &RepoSpec, branch: Option<&str>, timeout: Duration) -> Result<Option<f64>> {
    let Some(kind) = repository_type(repo_spec.host()) else {
        return Ok(None);
    };

    let url = endpoint_url(base, &["api", "repositories", kind, repo_spec.owner(), repo_spec.repo()])?;
    let Some(response) = transport.get_json::<RepoResponse>(&url, timeout).await? else {
        return Ok(None);
    };

    extract(&response, branch)
}

/// The metric is a 0..1 fraction; report it as a percentage with two decimals.
fn extract(response: &RepoResponse, branch: Option<&str>) -> Result<Option<f64>> {
    let Some(metric) = branch
        .or(response.default_branch.as_deref())
        .and_then(|branch| response.applications.get(branch))
        .and_then(|application| application.index.as_ref())
        .and_then(|index| index.embedded.as_ref())
        .and_then(|embedded| embedded.project.as_ref())
        .and_then(|project| project.metric_values.get(COVERAGE_METRIC))
    else {
        return Ok(None);
    };

    let fraction = parse_percentage(metric)?;
    Ok(fraction.map(|fraction| (fraction * 10_000.0).round() / 100.0))
}
