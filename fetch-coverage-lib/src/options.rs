use crate::services::Service;
use core::time::Duration;
use serde::{Deserialize, Serialize};

/// Per-request timeout applied when the caller does not pick one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Services queried, in priority order, when the caller does not pick any.
pub const DEFAULT_SERVICES: [Service; 4] = [Service::Codecov, Service::Coveralls, Service::CodeClimate, Service::Scrutinizer];

/// Badge type tag marking a coverage badge.
pub const COVERAGE_BADGE_TYPE: &str = "coverage";

/// A caller-declared, externally rendered badge.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Badge {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub urls: BadgeUrls,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct BadgeUrls {
    /// Where the rendered value can be fetched from
    #[serde(default)]
    pub content: Option<String>,
}

impl Badge {
    #[must_use]
    pub fn coverage(content: impl Into<String>) -> Self {
        Self {
            kind: COVERAGE_BADGE_TYPE.to_string(),
            urls: BadgeUrls {
                content: Some(content.into()),
            },
        }
    }

    #[must_use]
    pub fn is_coverage(&self) -> bool {
        self.kind == COVERAGE_BADGE_TYPE
    }
}

/// Settings for a single coverage lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    branch: Option<String>,
    badges: Vec<Badge>,
    services: Vec<Service>,
    timeout: Duration,
}

impl Options {
    #[must_use]
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    #[must_use]
    pub fn with_badges(mut self, badges: impl IntoIterator<Item = Badge>) -> Self {
        self.badges = badges.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_services(mut self, services: impl IntoIterator<Item = Service>) -> Self {
        self.services = services.into_iter().collect();
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    #[must_use]
    pub fn badges(&self) -> &[Badge] {
        &self.badges
    }

    #[must_use]
    pub fn services(&self) -> &[Service] {
        &self.services
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            branch: None,
            badges: Vec::new(),
            services: DEFAULT_SERVICES.to_vec(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}
