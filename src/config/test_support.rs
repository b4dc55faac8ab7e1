use crate::error::AppResult;
use crate::http::TargetUrl;

use super::{RunConfig, StopCondition};

pub(crate) fn test_config(
    raw_urls: &[&str],
    stop: StopCondition,
    keep_alive: bool,
) -> AppResult<RunConfig> {
    let mut urls = Vec::with_capacity(raw_urls.len());
    for raw in raw_urls {
        urls.push(TargetUrl::parse(raw)?);
    }
    Ok(RunConfig {
        urls,
        method: http::Method::GET,
        body: bytes::Bytes::new(),
        stop,
        keep_alive,
    })
}
