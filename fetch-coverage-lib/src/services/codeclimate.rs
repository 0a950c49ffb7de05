//! Code Climate exposes coverage through its JSON:API: the repository is looked up by
//! GitHub slug, then its latest default-branch test report is fetched. Branch scoping
//! is not supported by the API, and only GitHub repositories are indexed.

use super::{endpoint_url, parse_percentage};
use crate::Result;
use crate::repo_spec::{RepoHost, RepoSpec};
use crate::transport::Transport;
use core::time::Duration;
use serde::Deserialize;
use url::Url;

#[derive(Debug, Deserialize)]
struct ReposResponse {
    #[serde(default)]
    data: Option<Vec<Repo>>,
}

#[derive(Debug, Deserialize)]
struct Repo {
    id: String,
    #[serde(default)]
    relationships: Option<RepoRelationships>,
}

#[derive(Debug, Deserialize)]
struct RepoRelationships {
    #[serde(default)]
    latest_default_branch_test_report: Option<Relationship>,
}

#[derive(Debug, Deserialize)]
struct Relationship {
    #[serde(default)]
    data: Option<ResourceRef>,
}

#[derive(Debug, Deserialize)]
struct ResourceRef {
    id: String,
}

#[derive(Debug, Deserialize)]
struct TestReportResponse {
    #[serde(default)]
    data: Option<TestReport>,
}

#[derive(Debug, Deserialize)]
struct TestReport {
    #[serde(default)]
    attributes: Option<TestReportAttributes>,
}

#[derive(Debug, Deserialize)]
struct TestReportAttributes {
    #[serde(default)]
    covered_percent: Option<serde_json::Value>,
}

pub async fn fetch(transport: &Transport, base: &Url, repo_spec: &RepoSpec, timeout: Duration) -> Result<Option<f64>> {
    if repo_spec.host() != RepoHost::GitHub {
        return Ok(None);
    }

    let mut repos_url = endpoint_url(base, &["v1", "repos"])?;
    let _ = repos_url
        .query_pairs_mut()
        .append_pair("github_slug", &format!("{}/{}", repo_spec.owner(), repo_spec.repo()));

    let Some(repos) = transport.get_json::<ReposResponse>(&repos_url, timeout).await? else {
        return Ok(None);
    };

    let Some((repo_id, report_id)) = latest_report(&repos) else {
        return Ok(None);
    };

    let report_url = endpoint_url(base, &["v1", "repos", repo_id, "test_reports", report_id])?;
    let Some(report) = transport.get_json::<TestReportResponse>(&report_url, timeout).await? else {
        return Ok(None);
    };

    match report
        .data
        .as_ref()
        .and_then(|d| d.attributes.as_ref())
        .and_then(|a| a.covered_percent.as_ref())
    {
        Some(value) => parse_percentage(value),
        None => Ok(None),
    }
}

/// Repository and test report ids of the first matching repository, if it has a report.
fn latest_report(repos: &ReposResponse) -> Option<(&str, &str)> {
    let repo = repos.data.as_ref()?.first()?;
    let report = repo
        .relationships
        .as_ref()?
        .latest_default_branch_test_report
        .as_ref()?
        .data
        .as_ref()?;

    Some((repo.id.as_str(), report.id.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_report_found() {
        let repos: ReposResponse = serde_json::from_str(
            r#"{"data": [{
                "id": "5a1b",
                "type": "repos",
                "relationships": {
                    "latest_default_branch_test_report": {"data": {"id": "9f8e", "type": "test_reports"}}
                }
            }]}"#,
        )
        .unwrap();

        assert_eq!(latest_report(&repos), Some(("5a1b", "9f8e")));
    }

    #[test]
    fn test_latest_report_missing() {
        let repos: ReposResponse = serde_json::from_str(r#"{"data": []}"#).unwrap();
        assert_eq!(latest_report(&repos), None);

        let repos: ReposResponse =
            serde_json::from_str(r#"{"data": [{"id": "5a1b", "relationships": {"latest_default_branch_test_report": {"data": null}}}]}"#)
                .unwrap();
        assert_eq!(latest_report(&repos), None);
    }

    #[test]
    fn test_report_shape() {
        let report: TestReportResponse =
            serde_json::from_str(r#"{"data": {"id": "9f8e", "attributes": {"covered_percent": 88.72, "rating": {"letter": "B"}}}}"#).unwrap();
        let value = report.data.unwrap().attributes.unwrap().covered_percent.unwrap();
        assert_eq!(parse_percentage(&value).unwrap(), Some(88.72));
    }
}
