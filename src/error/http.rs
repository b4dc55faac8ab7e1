use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Failed to connect to {authority}: {source}")]
    Connect {
        authority: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Timed out connecting to {authority} after {timeout:?}.")]
    ConnectTimeout { authority: String, timeout: Duration },
    #[error("HTTP handshake with {authority} failed: {source}")]
    Handshake {
        authority: String,
        #[source]
        source: hyper::Error,
    },
    #[error("Failed to build request: {source}")]
    BuildRequest {
        #[source]
        source: http::Error,
    },
    #[error("Request failed: {source}")]
    Request {
        #[source]
        source: hyper::Error,
    },
    #[error("Failed to drain response body: {source}")]
    Drain {
        #[source]
        source: hyper::Error,
    },
}
