use std::time::Duration;

use tokio::net::TcpStream;
use tracing::debug;

use crate::error::HttpError;

use super::target::TargetUrl;

/// Establish a TCP connection, bounded by the connect timeout.
///
/// # Errors
///
/// Returns `HttpError::Connect` on a failed dial and
/// `HttpError::ConnectTimeout` when the bound elapses first; both are
/// transport errors, distinct from any read/write idle timeout.
pub(super) async fn dial(
    target: &TargetUrl,
    connect_timeout: Duration,
) -> Result<TcpStream, HttpError> {
    debug!("Dialing {}", target.authority());
    let connect = TcpStream::connect((target.host(), target.port()));
    match tokio::time::timeout(connect_timeout, connect).await {
        Ok(Ok(stream)) => Ok(stream),
        Ok(Err(err)) => Err(HttpError::Connect {
            authority: target.authority().to_owned(),
            source: err,
        }),
        Err(_elapsed) => Err(HttpError::ConnectTimeout {
            authority: target.authority().to_owned(),
            timeout: connect_timeout,
        }),
    }
}
