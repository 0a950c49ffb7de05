use super::{endpoint_url, parse_percentage};
use crate::Result;
use crate::repo_spec::{RepoHost, RepoSpec};
use crate::transport::Transport;
use core::time::Duration;
use serde::Deserialize;
use url::Url;

#[derive(Debug, Deserialize)]
struct RepoResponse {
    commit: Option<Commit>,
}

#[derive(Debug, Deserialize)]
struct Commit {
    totals: Option<Totals>,
}

#[derive(Debug, Deserialize)]
struct Totals {
    /// Line coverage; codecov sends it as a string such as `"87.50"`
    c: Option<serde_json::Value>,
}

const fn service_path(host: RepoHost) -> &'static str {
    match host {
        RepoHost::GitHub => "gh",
        RepoHost::GitLab => "gl",
        RepoHost::Bitbucket => "bb",
    }
}

pub async fn fetch(transport: &Transport, base: &Url, repo_spec: &RepoSpec, branch: Option<&str>, timeout: Duration) -> Result<Option<f64>> {
    let mut segments = vec!["api", service_path(repo_spec.host()), repo_spec.owner(), repo_spec.repo()];
    if let Some(branch) = branch {
        segments.extend(["branch", branch]);
    }

    let url = endpoint_url(base, &segments)?;
    let Some(response) = transport.get_json::<RepoResponse>(&url, timeout).await? else {
        return Ok(None);
    };

    extract(&response)
}

fn extract(response: &RepoResponse) -> Result<Option<f64>> {
    match response.commit.as_ref().and_then(|c| c.totals.as_ref()).and_then(|t| t.c.as_ref()) {
        Some(value) => parse_percentage(value),
        None => Ok(None),
    }
}
