//! Integration tests for the service adapters against wiremock

use core::time::Duration;
use fetch_coverage_lib::{Endpoints, Options, ProviderResult, RepoSpec, Service, Transport};
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn endpoints(server: &MockServer) -> Endpoints {
    Endpoints::all(&Url::parse(&server.uri()).expect("mock server URI should parse"))
}

fn repo(url: &str) -> RepoSpec {
    RepoSpec::resolve(url).expect("repository URL should resolve")
}

fn json(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "application/json")
}

async fn fetch(service: Service, server: &MockServer, repo_spec: &RepoSpec, options: &Options) -> ProviderResult<f64> {
    service
        .fetch(repo_spec, options, &Transport::new(), &endpoints(server))
        .await
}

fn assert_found(result: &ProviderResult<f64>, expected: f64) {
    match result {
        ProviderResult::Found(coverage) => assert!(
            (coverage - expected).abs() < 1e-9,
            "expected {expected}%, got {coverage}%"
        ),
        other => panic!("expected Found({expected}), got {other:?}"),
    }
}

#[tokio::test]
async fn test_codecov_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/gh/owner/repo"))
        .respond_with(json(r#"{"commit": {"totals": {"c": "84.21"}}}"#))
        .expect(1)
        .mount(&server)
        .await;

    let result = fetch(Service::Codecov, &server, &repo("https://github.com/owner/repo"), &Options::default()).await;
    assert_found(&result, 84.21);
}

#[tokio::test]
async fn test_codecov_branch_and_host() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/bb/owner/repo/branch/develop"))
        .respond_with(json(r#"{"commit": {"totals": {"c": 61}}}"#))
        .expect(1)
        .mount(&server)
        .await;

    let options = Options::default().with_branch("develop");
    let result = fetch(Service::Codecov, &server, &repo("bitbucket:owner/repo"), &options).await;
    assert_found(&result, 61.0);
}

#[tokio::test]
async fn test_codecov_not_found_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = fetch(Service::Codecov, &server, &repo("owner/repo"), &Options::default()).await;
    assert!(matches!(result, ProviderResult::Unavailable(_)), "got {result:?}");
}

#[tokio::test]
async fn test_codecov_server_error_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = fetch(Service::Codecov, &server, &repo("owner/repo"), &Options::default()).await;
    assert!(result.is_error(), "got {result:?}");
}

#[tokio::test]
async fn test_coveralls_found_with_branch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/github/owner/repo.json"))
        .and(query_param("branch", "main"))
        .respond_with(json(r#"{"covered_percent": 96.5}"#))
        .expect(1)
        .mount(&server)
        .await;

    let options = Options::default().with_branch("main");
    let result = fetch(Service::Coveralls, &server, &repo("git@github.com:owner/repo.git"), &options).await;
    assert_found(&result, 96.5);
}

#[tokio::test]
async fn test_coveralls_null_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gitlab/owner/repo.json"))
        .respond_with(json(r#"{"covered_percent": null}"#))
        .mount(&server)
        .await;

    let result = fetch(Service::Coveralls, &server, &repo("gitlab:owner/repo"), &Options::default()).await;
    assert!(matches!(result, ProviderResult::Unavailable(_)), "got {result:?}");
}

#[tokio::test]
async fn test_coveralls_malformed_body_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let result = fetch(Service::Coveralls, &server, &repo("owner/repo"), &Options::default()).await;
    assert!(result.is_error(), "got {result:?}");
}

#[tokio::test]
async fn test_codeclimate_two_step_lookup() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/repos"))
        .and(query_param("github_slug", "owner/repo"))
        .respond_with(json(
            r#"{"data": [{"id": "r1", "relationships": {"latest_default_branch_test_report": {"data": {"id": "t1"}}}}]}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/repos/r1/test_reports/t1"))
        .respond_with(json(r#"{"data": {"attributes": {"covered_percent": 77.7}}}"#))
        .expect(1)
        .mount(&server)
        .await;

    let result = fetch(Service::CodeClimate, &server, &repo("owner/repo"), &Options::default()).await;
    assert_found(&result, 77.7);
}

#[tokio::test]
async fn test_codeclimate_unknown_repository() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/repos"))
        .respond_with(json(r#"{"data": []}"#))
        .expect(1)
        .mount(&server)
        .await;

    let result = fetch(Service::CodeClimate, &server, &repo("owner/repo"), &Options::default()).await;
    assert!(matches!(result, ProviderResult::Unavailable(_)), "got {result:?}");
}

#[tokio::test]
async fn test_codeclimate_skips_non_github() {
    let server = MockServer::start().await;

    let result = fetch(Service::CodeClimate, &server, &repo("gitlab:owner/repo"), &Options::default()).await;
    assert!(matches!(result, ProviderResult::Unavailable(_)), "got {result:?}");
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_scrutinizer_default_branch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/repositories/g/owner/repo"))
        .respond_with(json(
            r#"{"default_branch": "master", "applications": {"master": {"index": {"_embedded": {"project": {"metric_values": {"scrutinizer.test_coverage": 0.9}}}}}}}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let result = fetch(Service::Scrutinizer, &server, &repo("owner/repo"), &Options::default()).await;
    assert_found(&result, 90.0);
}

#[tokio::test]
async fn test_scrutinizer_unknown_branch_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/repositories/b/owner/repo"))
        .respond_with(json(r#"{"default_branch": "master", "applications": {}}"#))
        .mount(&server)
        .await;

    let options = Options::default().with_branch("feature");
    let result = fetch(Service::Scrutinizer, &server, &repo("bitbucket:owner/repo"), &options).await;
    assert!(matches!(result, ProviderResult::Unavailable(_)), "got {result:?}");
}

#[tokio::test]
async fn test_timeout_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(json(r#"{"covered_percent": 50}"#).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let options = Options::default().with_timeout(Duration::from_millis(100));
    let result = fetch(Service::Coveralls, &server, &repo("owner/repo"), &options).await;
    assert!(result.is_error(), "got {result:?}");
}
