use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::Request;
use http::header::{CONNECTION, HOST};
use http_body_util::{BodyExt, Full};
use hyper::client::conn::http1::{self, SendRequest};
use hyper_util::rt::TokioIo;
use tracing::debug;

use crate::args::LoadArgs;
use crate::config::RunConfig;
use crate::error::{AppError, AppResult, HttpError};
use crate::metrics::WorkerCounters;

use super::conn::InstrumentedStream;
use super::dial::dial;
use super::target::TargetUrl;

/// Connection header sent when keep-alive is on.
const KEEP_ALIVE: &str = "keep-alive";
/// Connection header sent when keep-alive is off.
const CLOSE: &str = "close";

/// Transport knobs shared by every client's executor.
#[derive(Debug, Clone, Copy)]
pub struct TransportSettings {
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
    pub reuse_connections: bool,
}

impl TransportSettings {
    #[must_use]
    pub const fn from_args(args: &LoadArgs) -> Self {
        Self {
            connect_timeout: args.connect_timeout,
            read_timeout: args.read_timeout,
            write_timeout: args.write_timeout,
            reuse_connections: args.reuse_connections,
        }
    }
}

/// One classified request attempt.
#[derive(Debug)]
pub enum AttemptOutcome {
    /// A response was received and its body fully drained.
    Status(u16),
    /// Transport or body-drain failure; final for this attempt, no retry.
    Failed(HttpError),
}

/// Capability to run one HTTP-shaped request against a target.
///
/// A `Failed` outcome is a classified per-request failure that the caller
/// absorbs into its counters. An `Err` return is an unexpected defect and
/// fatal to the whole run.
#[async_trait]
pub trait RequestExecutor {
    async fn execute(&mut self, target: &TargetUrl) -> AppResult<AttemptOutcome>;
}

/// HTTP/1.1 executor over instrumented connections.
///
/// Every dialed stream is decorated with the owning client's counters before
/// the handshake, so request and response bytes are accounted at the wire.
/// With connection reuse enabled, send handles are cached per authority and
/// used while they stay open; a closed handle triggers a fresh dial, which is
/// connection management rather than a retry - each request is attempted
/// exactly once.
pub struct HyperExecutor {
    config: Arc<RunConfig>,
    settings: TransportSettings,
    counters: Arc<WorkerCounters>,
    connections: HashMap<String, SendRequest<Full<Bytes>>>,
}

impl HyperExecutor {
    #[must_use]
    pub fn new(
        config: Arc<RunConfig>,
        settings: TransportSettings,
        counters: Arc<WorkerCounters>,
    ) -> Self {
        Self {
            config,
            settings,
            counters,
            connections: HashMap::new(),
        }
    }

    async fn checkout(&mut self, target: &TargetUrl) -> Result<SendRequest<Full<Bytes>>, HttpError> {
        if self.settings.reuse_connections
            && let Some(mut sender) = self.connections.remove(target.authority())
        {
            if sender.ready().await.is_ok() {
                return Ok(sender);
            }
            debug!("Cached connection to {} was closed", target.authority());
        }
        self.connect(target).await
    }

    async fn connect(&self, target: &TargetUrl) -> Result<SendRequest<Full<Bytes>>, HttpError> {
        let stream = dial(target, self.settings.connect_timeout).await?;
        let stream = InstrumentedStream::new(
            stream,
            Arc::clone(&self.counters),
            self.settings.read_timeout,
            self.settings.write_timeout,
        );
        let (sender, connection) =
            http1::handshake(TokioIo::new(stream))
                .await
                .map_err(|err| HttpError::Handshake {
                    authority: target.authority().to_owned(),
                    source: err,
                })?;

        let authority = target.authority().to_owned();
        tokio::spawn(async move {
            if let Err(err) = connection.await {
                debug!("Connection to {} ended: {}", authority, err);
            }
        });

        Ok(sender)
    }

    fn build_request(&self, target: &TargetUrl) -> AppResult<Request<Full<Bytes>>> {
        let connection_header = if self.config.keep_alive() {
            KEEP_ALIVE
        } else {
            CLOSE
        };
        Request::builder()
            .method(self.config.method().clone())
            .uri(target.path_and_query())
            .header(HOST, target.host_header())
            .header(CONNECTION, connection_header)
            .body(Full::new(self.config.body().clone()))
            .map_err(|err| AppError::http(HttpError::BuildRequest { source: err }))
    }
}

#[async_trait]
impl RequestExecutor for HyperExecutor {
    async fn execute(&mut self, target: &TargetUrl) -> AppResult<AttemptOutcome> {
        let request = self.build_request(target)?;

        let mut sender = match self.checkout(target).await {
            Ok(sender) => sender,
            Err(err) => return Ok(AttemptOutcome::Failed(err)),
        };

        let response = match sender.send_request(request).await {
            Ok(response) => response,
            Err(err) => return Ok(AttemptOutcome::Failed(HttpError::Request { source: err })),
        };

        let (parts, mut body) = response.into_parts();
        while let Some(frame) = body.frame().await {
            if let Err(err) = frame {
                return Ok(AttemptOutcome::Failed(HttpError::Drain { source: err }));
            }
        }

        if self.settings.reuse_connections {
            self.connections
                .insert(target.authority().to_owned(), sender);
        }

        Ok(AttemptOutcome::Status(parts.status.as_u16()))
    }
}
