use std::fmt;

use reqwest::Url;

use crate::{AgilePlaceError, Result};

/// Environment variable holding the tenant domain, e.g. `mycompany.leankit.com`.
pub const DOMAIN_ENV: &str = "AGILEPLACE_DOMAIN";
/// Environment variable holding the API token.
pub const TOKEN_ENV: &str = "AGILEPLACE_API_TOKEN";

const API_ROOT: &str = "/io";

/// Formats a tenant domain into the API root URL.
///
/// Example: `"mycompany.leankit.com"` → `"https://mycompany.leankit.com/io"`
pub fn domain_to_base_url(domain: &str) -> String {
    let host = strip_schemes(domain.trim()).0.trim_end_matches('/');
    if host.ends_with(API_ROOT) {
        format!("https://{host}")
    } else {
        format!("https://{host}{API_ROOT}")
    }
}

/// Origin and credential for one AgilePlace tenant.
///
/// Both values are validated and normalized on construction and never change
/// afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    auth_token: String,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("auth_token", &"<redacted>")
            .finish()
    }
}

impl ClientConfig {
    /// Creates a config from a base URL and a token.
    ///
    /// The URL may omit the scheme (`https` is assumed); trailing slashes and
    /// doubled schemes such as `https://https://` are removed.
    pub fn new(base_url: impl AsRef<str>, auth_token: impl AsRef<str>) -> Result<Self> {
        let base_url = normalize_base_url(base_url.as_ref())?;
        let auth_token = auth_token.as_ref().trim();
        if strip_bearer_prefix(auth_token).is_empty() {
            return Err(AgilePlaceError::Config(
                "API token must not be empty".to_owned(),
            ));
        }
        Ok(Self {
            base_url,
            auth_token: auth_token.to_owned(),
        })
    }

    /// Creates a config from a tenant domain; the `/io` API root is appended.
    ///
    /// # Example
    ///
    /// ```
    /// use agileplace_http::ClientConfig;
    ///
    /// let config = ClientConfig::from_domain("mycompany.leankit.com", "token").unwrap();
    /// assert_eq!(config.base_url(), "https://mycompany.leankit.com/io");
    /// ```
    pub fn from_domain(domain: impl AsRef<str>, auth_token: impl AsRef<str>) -> Result<Self> {
        let domain = domain.as_ref().trim();
        if domain.is_empty() {
            return Err(AgilePlaceError::Config(
                "AgilePlace domain must not be empty".to_owned(),
            ));
        }
        Self::new(domain_to_base_url(domain), auth_token)
    }

    /// Creates a config from environment variables.
    ///
    /// Reads:
    /// - `AGILEPLACE_DOMAIN`: tenant domain (e.g. `mycompany.leankit.com`)
    /// - `AGILEPLACE_API_TOKEN`: API token (Bearer prefix optional)
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let domain = lookup(DOMAIN_ENV)
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| {
                AgilePlaceError::Config(format!(
                    "{DOMAIN_ENV} environment variable is required \
                     (e.g. 'mycompany.leankit.com')"
                ))
            })?;
        let token = lookup(TOKEN_ENV)
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| {
                AgilePlaceError::Config(format!(
                    "{TOKEN_ENV} environment variable is required; create a token at \
                     https://{}/account/api",
                    domain.trim()
                ))
            })?;
        Self::from_domain(domain, token)
    }

    /// Normalized base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Value for the `Authorization` header.
    pub(crate) fn authorization(&self) -> String {
        normalize_bearer_authorization(&self.auth_token)
    }
}

fn strip_schemes(raw: &str) -> (&str, Option<&'static str>) {
    let mut rest = raw;
    let mut scheme = None;
    loop {
        if rest
            .get(..8)
            .is_some_and(|p| p.eq_ignore_ascii_case("https://"))
        {
            rest = &rest[8..];
            scheme.get_or_insert("https");
        } else if rest
            .get(..7)
            .is_some_and(|p| p.eq_ignore_ascii_case("http://"))
        {
            rest = &rest[7..];
            scheme.get_or_insert("http");
        } else {
            return (rest, scheme);
        }
    }
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AgilePlaceError::Config(
            "base URL must not be empty".to_owned(),
        ));
    }

    let (rest, scheme) = strip_schemes(trimmed);
    let rest = rest.trim_end_matches('/');
    if rest.is_empty() || rest.starts_with('/') {
        return Err(AgilePlaceError::Config(format!(
            "base URL '{trimmed}' has no host"
        )));
    }
    if rest.chars().any(char::is_whitespace) || rest.contains(['?', '#']) {
        return Err(AgilePlaceError::Config(format!(
            "base URL '{trimmed}' is malformed"
        )));
    }

    let normalized = format!("{}://{rest}", scheme.unwrap_or("https"));
    let url = Url::parse(&normalized)
        .map_err(|err| AgilePlaceError::Config(format!("base URL '{trimmed}' is invalid: {err}")))?;
    if url.host_str().is_none() {
        return Err(AgilePlaceError::Config(format!(
            "base URL '{trimmed}' has no host"
        )));
    }
    Ok(normalized)
}

/// Credential part of a token, without a leading `Bearer` scheme word.
fn strip_bearer_prefix(token: &str) -> &str {
    match token.get(..6) {
        Some(scheme)
            if scheme.eq_ignore_ascii_case("bearer")
                && token[6..].chars().next().map_or(true, char::is_whitespace) =>
        {
            token[6..].trim_start()
        }
        _ => token,
    }
}

fn normalize_bearer_authorization(token: &str) -> String {
    let trimmed = token.trim();
    let prefix = trimmed.get(..7);
    if prefix.is_some_and(|value| value.eq_ignore_ascii_case("bearer ")) {
        trimmed.to_owned()
    } else {
        format!("Bearer {trimmed}")
    }
}
