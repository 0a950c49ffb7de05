//! Coverage from a caller-declared badge
//!
//! A badge is the cheapest source there is, so it is consulted before any service.
//! Its content URL usually points at a shields.io image; those are rewritten to their
//! `.json` form and the `value` or `message` field is read. Any other body, such as the
//! SVG served by codecov or coveralls, has its markup stripped and the remaining text
//! is scanned for a percentage.

use crate::options::Badge;
use crate::transport::Transport;
use core::time::Duration;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use url::Url;

const LOG_TARGET: &str = "     badge";

static PERCENT_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)%").expect("invalid regex"));

// Tags carry attributes such as `y2="100%"` that must not be mistaken for the value
static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("invalid regex"));

const SHIELDS_DOMAIN: &str = "shields.io";

/// What the badge path produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BadgeOutcome {
    /// No usable coverage badge, or fetching it failed. Fall back to the services.
    NotUsed,

    /// The badge rendered a percentage.
    Found(f64),

    /// The badge was fetched but renders no percentage (e.g. "unknown"). Definitive.
    Unknown,
}

/// shields.io JSON rendition; older deployments send `value`, newer ones `message`.
#[derive(Debug, Deserialize)]
struct ShieldsBody {
    #[serde(default)]
    value: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<serde_json::Value>,
}

/// Look for the first coverage badge and read its value.
pub async fn resolve(transport: &Transport, badges: &[Badge], timeout: Duration) -> BadgeOutcome {
    let Some(content) = badges
        .iter()
        .find(|badge| badge.is_coverage())
        .and_then(|badge| badge.urls.content.as_deref())
        .filter(|content| !content.trim().is_empty())
    else {
        return BadgeOutcome::NotUsed;
    };

    let url = match Url::parse(content) {
        Ok(url) => json_rendition(url),
        Err(e) => {
            log::debug!(target: LOG_TARGET, "Ignoring coverage badge with invalid URL '{content}': {e}");
            return BadgeOutcome::NotUsed;
        }
    };

    log::info!(target: LOG_TARGET, "Reading coverage badge '{url}'");

    match transport.get_text(&url, timeout).await {
        Ok(Some(body)) => match percentage_in(&body) {
            Some(coverage) => {
                log::debug!(target: LOG_TARGET, "Badge reports {coverage}%");
                BadgeOutcome::Found(coverage)
            }
            None => {
                log::debug!(target: LOG_TARGET, "Badge '{url}' renders no percentage");
                BadgeOutcome::Unknown
            }
        },
        Ok(None) => {
            log::debug!(target: LOG_TARGET, "Badge '{url}' not found, falling back to services");
            BadgeOutcome::NotUsed
        }
        Err(e) => {
            log::debug!(target: LOG_TARGET, "Could not fetch badge, falling back to services: {e:#}");
            BadgeOutcome::NotUsed
        }
    }
}

/// Rewrite a shields.io `.../badge.svg` or `.../badge.png` into `.../badge.json`.
fn json_rendition(mut url: Url) -> Url {
    let is_shields = url
        .host_str()
        .is_some_and(|host| host == SHIELDS_DOMAIN || host.ends_with(".shields.io"));
    if !is_shields {
        return url;
    }

    let path = url.path();
    if let Some(stem) = path.strip_suffix(".svg").or_else(|| path.strip_suffix(".png")) {
        let json_path = format!("{stem}.json");
        url.set_path(&json_path);
    }
    url
}

fn percentage_in(body: &str) -> Option<f64> {
    if let Some(field) = serde_json::from_str::<ShieldsBody>(body)
        .ok()
        .and_then(|shields| shields.value.or(shields.message))
    {
        return match field {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(text) => scan_percentage(&text),
            _ => None,
        };
    }

    scan_percentage(&TAG_REGEX.replace_all(body, " "))
}

fn scan_percentage(text: &str) -> Option<f64> {
    let captures = PERCENT_REGEX.captures(text)?;
    let percent_str = captures.get(1)?.as_str();

    match percent_str.parse::<f64>() {
        Ok(v) => Some(v),
        Err(e) => {
            log::debug!(target: LOG_TARGET, "Could not parse coverage percentage '{percent_str}': {e:#}");
            None
        }
    }
}
