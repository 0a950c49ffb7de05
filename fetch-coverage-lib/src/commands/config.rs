use crate::Result;
use crate::options::Options;
use crate::services::{Endpoints, Service};
use camino::Utf8Path;
use core::time::Duration;
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use url::Url;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// Name of the configuration file looked up when none is given explicitly
pub const DEFAULT_CONFIG_FILE: &str = "fetch-coverage.toml";

#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Services to query, in priority order
    #[serde(default = "default_services")]
    pub services: Vec<Service>,

    /// Timeout applied to each outbound request, in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Branch to ask about
    #[serde(default)]
    pub branch: Option<String>,

    /// Base URL overrides for self-hosted services
    #[serde(default)]
    pub endpoints: EndpointsConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EndpointsConfig {
    pub codecov: Option<String>,
    pub coveralls: Option<String>,
    pub codeclimate: Option<String>,
    pub scrutinizer: Option<String>,
}

fn default_services() -> Vec<Service> {
    crate::options::DEFAULT_SERVICES.to_vec()
}

#[expect(clippy::cast_possible_truncation, reason = "the default timeout is a handful of seconds")]
const fn default_timeout_ms() -> u64 {
    crate::options::DEFAULT_TIMEOUT.as_millis() as u64
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// Without an explicit path, `fetch-coverage.toml` in `base_dir` is used if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or holds invalid values
    pub fn load(base_dir: &Utf8Path, config_path: Option<&Utf8Path>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading fetch-coverage configuration file '{path}'"))?;
            (path.to_path_buf(), text)
        } else {
            let path = base_dir.join(DEFAULT_CONFIG_FILE);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    // No config file found, use defaults
                    return Ok(Self::default());
                }
                Err(e) => return Err(e).into_app_err_with(|| format!("reading fetch-coverage configuration file '{path}'")),
            }
        };

        log::debug!("Using configuration file '{final_path}'");

        let config: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{final_path}'"))?;
        config.validate()?;

        Ok(config)
    }

    /// Save the default configuration to a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        fs::write(output_path, DEFAULT_CONFIG_TOML).into_app_err_with(|| format!("writing default configuration to {output_path}"))?;
        Ok(())
    }

    /// Lookup options described by this configuration
    #[must_use]
    pub fn options(&self) -> Options {
        let options = Options::default()
            .with_services(self.services.iter().copied())
            .with_timeout(Duration::from_millis(self.timeout_ms));

        match &self.branch {
            Some(branch) => options.with_branch(branch.clone()),
            None => options,
        }
    }

    /// Service base URLs, with this configuration's overrides applied
    ///
    /// # Errors
    ///
    /// Returns an error if an override is not a valid URL
    pub fn endpoints(&self) -> Result<Endpoints> {
        let overrides = [
            (Service::Codecov, &self.endpoints.codecov),
            (Service::Coveralls, &self.endpoints.coveralls),
            (Service::CodeClimate, &self.endpoints.codeclimate),
            (Service::Scrutinizer, &self.endpoints.scrutinizer),
        ];

        let mut endpoints = Endpoints::default();
        for (service, base) in overrides {
            if let Some(base) = base {
                let url = Url::parse(base).into_app_err_with(|| format!("parsing {service} endpoint '{base}'"))?;
                endpoints = endpoints.with(service, url);
            }
        }

        Ok(endpoints)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout is zero, no service is listed, or an endpoint is not a URL
    fn validate(&self) -> Result<()> {
        if self.timeout_ms == 0 {
            return Err(app_err!("timeout_ms must be greater than 0"));
        }

        if self.services.is_empty() {
            return Err(app_err!("services must list at least one service"));
        }

        let _ = self.endpoints()?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_TOML).expect("default_config.toml should be valid TOML that deserializes to Config")
    }
}
