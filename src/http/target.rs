use url::Url;

use crate::error::ConfigError;

/// Default port for the http scheme.
const HTTP_PORT: u16 = 80;

/// A pre-validated http target, split into the pieces the transport needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetUrl {
    host: String,
    port: u16,
    authority: String,
    path_and_query: String,
}

impl TargetUrl {
    /// Parse and validate a raw URL string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for unparsable URLs, non-http schemes, and
    /// URLs without a host.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let parsed = Url::parse(raw).map_err(|err| ConfigError::InvalidUrl {
            url: raw.to_owned(),
            source: err,
        })?;
        if parsed.scheme() != "http" {
            return Err(ConfigError::UnsupportedScheme {
                scheme: parsed.scheme().to_owned(),
                url: raw.to_owned(),
            });
        }
        let host = parsed
            .host_str()
            .ok_or_else(|| ConfigError::MissingHost {
                url: raw.to_owned(),
            })?
            .to_owned();
        let port = parsed.port().unwrap_or(HTTP_PORT);

        let mut path_and_query = parsed.path().to_owned();
        if let Some(query) = parsed.query() {
            path_and_query.push('?');
            path_and_query.push_str(query);
        }

        Ok(Self {
            authority: format!("{}:{}", host, port),
            host,
            port,
            path_and_query,
        })
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    #[must_use]
    pub fn authority(&self) -> &str {
        &self.authority
    }

    #[must_use]
    pub fn path_and_query(&self) -> &str {
        &self.path_and_query
    }

    /// Host header value: the port is omitted when it is the scheme default.
    #[must_use]
    pub fn host_header(&self) -> &str {
        if self.port == HTTP_PORT {
            &self.host
        } else {
            &self.authority
        }
    }
}
