//! Immutable run configuration derived from validated CLI inputs.
//!
//! Built once before any client is dispatched and shared read-only for the
//! lifetime of the run.

use std::fs;
use std::path::Path;
use std::time::Duration;

use bytes::Bytes;
use http::Method;

use crate::args::LoadArgs;
use crate::error::{AppError, AppResult, ConfigError};
use crate::http::TargetUrl;

#[cfg(test)]
pub(crate) mod test_support;


/// The single criterion that ends a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopCondition {
    /// Per-client request limit.
    Requests(u64),
    /// Wall-clock period after which the run is interrupted.
    Period(Duration),
}

#[derive(Debug)]
pub struct RunConfig {
    urls: Vec<TargetUrl>,
    method: Method,
    body: Bytes,
    stop: StopCondition,
    keep_alive: bool,
}

impl RunConfig {
    /// Build and validate the configuration.
    ///
    /// URL sources are merged in order: lines of the URL file first, then the
    /// single URL flag. A POST body file switches the method to POST and is
    /// sent verbatim on every request.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` when no URL source or no stop condition was
    /// provided, when both stop conditions were provided, or when an input
    /// file cannot be read or contains an invalid URL.
    pub fn from_args(args: &LoadArgs) -> AppResult<Self> {
        if args.url.is_none() && args.urls_file.is_none() {
            return Err(AppError::config(ConfigError::MissingUrlSource));
        }

        let stop = match (args.requests, args.duration) {
            (Some(_), Some(_)) => {
                return Err(AppError::config(ConfigError::ConflictingStopConditions));
            }
            (Some(requests), None) => StopCondition::Requests(requests),
            (None, Some(seconds)) => StopCondition::Period(Duration::from_secs(seconds)),
            (None, None) => {
                return Err(AppError::config(ConfigError::MissingStopCondition));
            }
        };

        let mut raw_urls = Vec::new();
        if let Some(path) = args.urls_file.as_deref() {
            raw_urls.extend(read_url_lines(path)?);
        }
        if let Some(url) = args.url.as_deref() {
            raw_urls.push(url.to_owned());
        }

        let mut urls = Vec::with_capacity(raw_urls.len());
        for raw in &raw_urls {
            urls.push(TargetUrl::parse(raw).map_err(AppError::config)?);
        }

        let (method, body) = match args.data_file.as_deref() {
            Some(path) => (Method::POST, read_body_file(path)?),
            None => (Method::GET, Bytes::new()),
        };

        Ok(Self {
            urls,
            method,
            body,
            stop,
            keep_alive: args.keep_alive,
        })
    }

    #[must_use]
    pub fn urls(&self) -> &[TargetUrl] {
        &self.urls
    }

    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    #[must_use]
    pub const fn stop(&self) -> StopCondition {
        self.stop
    }

    #[must_use]
    pub const fn keep_alive(&self) -> bool {
        self.keep_alive
    }

    /// Per-client request budget; unbounded for period-based runs, which are
    /// terminated externally instead.
    #[must_use]
    pub const fn request_limit(&self) -> u64 {
        match self.stop {
            StopCondition::Requests(limit) => limit,
            StopCondition::Period(_) => u64::MAX,
        }
    }
}

fn read_url_lines(path: &Path) -> AppResult<Vec<String>> {
    let contents = fs::read_to_string(path).map_err(|err| {
        AppError::config(ConfigError::ReadUrlFile {
            path: path.to_path_buf(),
            source: err,
        })
    })?;
    let lines: Vec<String> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect();
    if lines.is_empty() {
        return Err(AppError::config(ConfigError::UrlFileEmpty {
            path: path.to_path_buf(),
        }));
    }
    Ok(lines)
}

fn read_body_file(path: &Path) -> AppResult<Bytes> {
    let data = fs::read(path).map_err(|err| {
        AppError::config(ConfigError::ReadBodyFile {
            path: path.to_path_buf(),
            source: err,
        })
    })?;
    Ok(Bytes::from(data))
}
