use crate::Result;
use core::fmt::{Display, Formatter};
use ohno::{IntoAppError, bail};
use std::sync::Arc;
use strum::{Display as StrumDisplay, IntoStaticStr};
use url::Url;

const LOG_TARGET: &str = "  repo";

/// A git hosting platform recognized by the coverage services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum RepoHost {
    GitHub,
    GitLab,
    Bitbucket,
}

impl RepoHost {
    fn from_domain(domain: &str) -> Option<Self> {
        match domain.trim_start_matches("www.").to_ascii_lowercase().as_str() {
            "github.com" => Some(Self::GitHub),
            "gitlab.com" => Some(Self::GitLab),
            "bitbucket.org" => Some(Self::Bitbucket),
            _ => None,
        }
    }

    /// Canonical domain of the platform.
    #[must_use]
    pub const fn domain(self) -> &'static str {
        match self {
            Self::GitHub => "github.com",
            Self::GitLab => "gitlab.com",
            Self::Bitbucket => "bitbucket.org",
        }
    }
}

/// Provider-agnostic identity of a hosted repository: platform, owner and project.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoSpec {
    url: Arc<Url>,
    host: RepoHost,
    owner: Arc<str>,
    repo: Arc<str>,
}

impl RepoSpec {
    /// Parse a structured URL such as `https://github.com/owner/repo/tree/main`.
    pub fn parse(url: &Url) -> Result<Self> {
        let Some(host) = url.host_str().and_then(RepoHost::from_domain) else {
            bail!("unsupported repository host: {url}");
        };

        let path_segments: Vec<_> = url.path_segments().map(Iterator::collect).unwrap_or_default();

        if path_segments.len() < 2 {
            bail!("invalid repository URL format: {url}");
        }

        let owner = path_segments[0];
        let repo = path_segments[1].trim_end_matches(".git");

        if owner.is_empty() || repo.is_empty() {
            bail!("invalid repository URL: empty owner or repo name: {url}");
        }

        // Reconstruct a clean URL with only https://host/owner/repo
        let clean_url = Url::parse(&format!("https://{}/{owner}/{repo}", host.domain()))
            .into_app_err("reconstructing repository URL")?;

        Ok(Self {
            host,
            owner: Arc::from(owner),
            repo: Arc::from(repo),
            url: Arc::new(clean_url),
        })
    }

    /// Resolve any of the common spellings of a repository location.
    ///
    /// Accepts web and clone URLs (`https`, `git`, `git+https`, `git+ssh`, `ssh`),
    /// scp-like `git@host:owner/repo.git`, the `github:`, `gitlab:` and `bitbucket:`
    /// shortcuts, and bare `owner/repo` (GitHub). Returns `None` for anything else.
    #[must_use]
    pub fn resolve(raw: &str) -> Option<Self> {
        let normalized = normalize(raw.trim())?;

        let url = match Url::parse(&normalized) {
            Ok(url) => url,
            Err(e) => {
                log::debug!(target: LOG_TARGET, "Could not parse repository URL '{raw}': {e}");
                return None;
            }
        };

        match Self::parse(&url) {
            Ok(spec) => Some(spec),
            Err(e) => {
                log::debug!(target: LOG_TARGET, "Ignoring repository URL '{raw}': {e:#}");
                None
            }
        }
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub const fn host(&self) -> RepoHost {
        self.host
    }

    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub fn repo(&self) -> &str {
        &self.repo
    }
}

impl Display for RepoSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.url)
    }
}

/// Rewrite shortcut and clone spellings into a URL the `url` crate can parse.
fn normalize(raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }

    for host in [RepoHost::GitHub, RepoHost::GitLab, RepoHost::Bitbucket] {
        let prefix: &'static str = host.into();
        if let Some(rest) = raw.strip_prefix(prefix).and_then(|r| r.strip_prefix(':')) {
            return Some(format!("https://{}/{}", host.domain(), rest.trim_start_matches('/')));
        }
    }

    if let Some(rest) = raw.strip_prefix("git+") {
        return normalize(rest);
    }

    if raw.contains("://") {
        return Some(raw.to_string());
    }

    // scp-like: [user@]host:owner/repo.git
    if let Some((authority, path)) = raw.split_once(':') {
        let domain = authority.rsplit_once('@').map_or(authority, |(_, d)| d);
        return Some(format!("ssh://{domain}/{}", path.trim_start_matches('/')));
    }

    // bare owner/repo means GitHub
    let mut parts = raw.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(owner), Some(repo), None) if !owner.is_empty() && !repo.is_empty() && !owner.contains('.') => {
            Some(format!("https://github.com/{owner}/{repo}"))
        }
        _ => None,
    }
}
