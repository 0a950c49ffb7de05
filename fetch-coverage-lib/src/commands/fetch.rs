use super::Host;
use super::common::{LogLevel, init_logging};
use super::config::Config;
use crate::Result;
use crate::fetcher::CoverageFetcher;
use crate::options::{Badge, Options};
use crate::services::Service;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use core::time::Duration;
use ohno::{IntoAppError, bail};
use std::fs;
use std::io::Write;

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Repository URL, e.g. `https://github.com/owner/repo`, `git@github.com:owner/repo.git` or `owner/repo`
    #[arg(value_name = "REPOSITORY_URL")]
    pub repository: String,

    /// Branch to ask about
    #[arg(long, short = 'b', value_name = "BRANCH")]
    pub branch: Option<String>,

    /// Services to query, in priority order
    #[arg(long, value_name = "SERVICES", value_delimiter = ',')]
    pub services: Option<Vec<Service>>,

    /// Timeout applied to each outbound request, in milliseconds
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Content URL of a coverage badge to read before querying services
    #[arg(long, value_name = "URL")]
    pub badge_url: Option<String>,

    /// JSON file holding an array of badge declarations
    #[arg(long, value_name = "PATH")]
    pub badges: Option<Utf8PathBuf>,

    /// Path to configuration file (default is `fetch-coverage.toml`)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none")]
    pub log_level: LogLevel,

    /// Exit with status code 1 if no coverage is found
    #[arg(long)]
    pub error_if_missing: bool,
}

pub async fn report_coverage<H: Host>(host: &mut H, args: &FetchArgs) -> Result<()> {
    init_logging(args.log_level);

    let config = Config::load(Utf8Path::new("."), args.config.as_deref())?;
    let options = build_options(&config, args)?;
    let fetcher = CoverageFetcher::new(config.endpoints()?);

    match fetcher.fetch_coverage(&args.repository, &options).await {
        Ok(Some(coverage)) => {
            let _ = writeln!(host.output(), "{coverage}");
        }
        Ok(None) => {
            let _ = writeln!(host.output(), "no coverage found");
            if args.error_if_missing {
                host.exit(1);
            }
        }
        Err(e) => {
            {
                let mut err = host.error();
                for service_error in e.errors() {
                    let _ = writeln!(err, "  {service_error}");
                }
            }
            bail!("{e} for '{}'", args.repository);
        }
    }

    Ok(())
}

/// Command-line flags override the configuration file, which overrides the defaults.
fn build_options(config: &Config, args: &FetchArgs) -> Result<Options> {
    let mut options = config.options();

    if let Some(branch) = &args.branch {
        options = options.with_branch(branch.clone());
    }

    if let Some(services) = &args.services {
        options = options.with_services(services.iter().copied());
    }

    if let Some(timeout_ms) = args.timeout_ms {
        if timeout_ms == 0 {
            bail!("--timeout-ms must be greater than 0");
        }
        options = options.with_timeout(Duration::from_millis(timeout_ms));
    }

    let mut badges = Vec::new();
    if let Some(url) = &args.badge_url {
        badges.push(Badge::coverage(url.clone()));
    }

    if let Some(path) = &args.badges {
        badges.extend(load_badges(path)?);
    }

    if !badges.is_empty() {
        options = options.with_badges(badges);
    }

    Ok(options)
}

fn load_badges(path: &Utf8Path) -> Result<Vec<Badge>> {
    let text = fs::read_to_string(path).into_app_err_with(|| format!("reading badge declarations '{path}'"))?;
    let badges = serde_json::from_str(&text).into_app_err_with(|| format!("parsing badge declarations '{path}'"))?;
    Ok(badges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        args: FetchArgs,
    }

    fn parse(args: &[&str]) -> FetchArgs {
        TestCli::parse_from(std::iter::once("fetch-coverage").chain(args.iter().copied())).args
    }

    #[test]
    fn test_flags_override_config() {
        let args = parse(&[
            "owner/repo",
            "--branch",
            "develop",
            "--services",
            "scrutinizer,codecov",
            "--timeout-ms",
            "500",
            "--badge-url",
            "https://img.shields.io/codecov/c/github/owner/repo.svg",
        ]);

        let options = build_options(&Config::default(), &args).unwrap();

        assert_eq!(options.branch(), Some("develop"));
        assert_eq!(options.services(), [Service::Scrutinizer, Service::Codecov]);
        assert_eq!(options.timeout(), Duration::from_millis(500));
        assert_eq!(options.badges().len(), 1);
        assert!(options.badges()[0].is_coverage());
    }

    #[test]
    fn test_no_flags_keep_config() {
        let args = parse(&["owner/repo"]);
        let options = build_options(&Config::default(), &args).unwrap();
        assert_eq!(options, Options::default());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let args = parse(&["owner/repo", "--timeout-ms", "0"]);
        let _ = build_options(&Config::default(), &args).unwrap_err();
    }

    #[test]
    fn test_badges_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = Utf8PathBuf::from_path_buf(dir.path().join("badges.json")).unwrap();
        fs::write(
            &file,
            r#"[{"type": "npm", "urls": {"content": "https://img.shields.io/npm/v/x.json"}},
                {"type": "coverage", "urls": {"content": "https://img.shields.io/coveralls/o/r.json"}}]"#,
        )
        .unwrap();

        let args = parse(&["owner/repo", "--badges", file.as_str()]);
        let options = build_options(&Config::default(), &args).unwrap();

        assert_eq!(options.badges().len(), 2);
        assert!(options.badges()[1].is_coverage());
    }

    #[test]
    fn test_unknown_service_flag_rejected() {
        let result = TestCli::try_parse_from(["fetch-coverage", "owner/repo", "--services", "travis"]);
        let _ = result.unwrap_err();
    }
}
