use super::{endpoint_url, parse_percentage};
use crate::Result;
use crate::repo_spec::RepoSpec;
use crate::transport::Transport;
use core::time::Duration;
use serde::Deserialize;
use url::Url;

#[derive(Debug, Deserialize)]
struct RepoResponse {
    #[serde(default)]
    covered_percent: Option<serde_json::Value>,
}

pub async fn fetch(transport: &Transport, base: &Url, repo_spec: &RepoSpec, branch: Option<&str>, timeout: Duration) -> Result<Option<f64>> {
    let host: &'static str = repo_spec.host().into();
    let project = format!("{}.json", repo_spec.repo());

    let mut url = endpoint_url(base, &[host, repo_spec.owner(), project.as_str()])?;
    if let Some(branch) = branch {
        let _ = url.query_pairs_mut().append_pair("branch", branch);
    }

    let Some(response) = transport.get_json::<RepoResponse>(&url, timeout).await? else {
        return Ok(None);
    };

    match &response.covered_percent {
        Some(value) => parse_percentage(value),
        None => Ok(None),
    }
}
