use super::Service;
use url::Url;

pub const CODECOV_BASE_URL: &str = "https://codecov.io";
pub const COVERALLS_BASE_URL: &str = "https://coveralls.io";
pub const CODECLIMATE_BASE_URL: &str = "https://api.codeclimate.com";
pub const SCRUTINIZER_BASE_URL: &str = "https://scrutinizer-ci.com";

/// Base URL of every supported service.
///
/// Defaults to the public instances; override for self-hosted deployments or tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    codecov: Url,
    coveralls: Url,
    codeclimate: Url,
    scrutinizer: Url,
}

impl Endpoints {
    /// Point every service at the same base URL, e.g. a single mock server.
    #[must_use]
    pub fn all(base: &Url) -> Self {
        Self {
            codecov: base.clone(),
            coveralls: base.clone(),
            codeclimate: base.clone(),
            scrutinizer: base.clone(),
        }
    }

    #[must_use]
    pub fn with(mut self, service: Service, base: Url) -> Self {
        *self.slot(service) = base;
        self
    }

    #[must_use]
    pub const fn base_url(&self, service: Service) -> &Url {
        match service {
            Service::Codecov => &self.codecov,
            Service::Coveralls => &self.coveralls,
            Service::CodeClimate => &self.codeclimate,
            Service::Scrutinizer => &self.scrutinizer,
        }
    }

    fn slot(&mut self, service: Service) -> &mut Url {
        match service {
            Service::Codecov => &mut self.codecov,
            Service::Coveralls => &mut self.coveralls,
            Service::CodeClimate => &mut self.codeclimate,
            Service::Scrutinizer => &mut self.scrutinizer,
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        let parse = |s: &str| Url::parse(s).expect("built-in service URL must be valid");

        Self {
            codecov: parse(CODECOV_BASE_URL),
            coveralls: parse(COVERALLS_BASE_URL),
            codeclimate: parse(CODECLIMATE_BASE_URL),
            scrutinizer: parse(SCRUTINIZER_BASE_URL),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoints() {
        let endpoints = Endpoints::default();
        assert_eq!(endpoints.base_url(Service::Codecov).as_str(), "https://codecov.io/");
        assert_eq!(endpoints.base_url(Service::CodeClimate).as_str(), "https://api.codeclimate.com/");
    }

    #[test]
    fn test_override_single_endpoint() {
        let custom = Url::parse("https://codecov.example.com").unwrap();
        let endpoints = Endpoints::default().with(Service::Codecov, custom.clone());

        assert_eq!(endpoints.base_url(Service::Codecov), &custom);
        assert_eq!(endpoints.base_url(Service::Coveralls).as_str(), "https://coveralls.io/");
    }
}
