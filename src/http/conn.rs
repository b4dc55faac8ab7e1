//! Instrumented connection decoration.
//!
//! Wraps an established byte stream so that every successfully moved byte is
//! added to the owning client's throughput counters and the matching
//! per-operation idle deadline is re-armed. The deadlines bound inactivity,
//! not connection age: a stream that keeps moving bytes faster than the
//! timeout interval never expires, however long it stays open. A failed
//! operation updates no counter, re-arms nothing, and propagates the
//! underlying error unchanged.

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::time::{Instant, Sleep, sleep};

use crate::metrics::WorkerCounters;

pub struct InstrumentedStream<S> {
    inner: S,
    counters: Arc<WorkerCounters>,
    read_timeout: Duration,
    write_timeout: Duration,
    read_deadline: Pin<Box<Sleep>>,
    write_deadline: Pin<Box<Sleep>>,
}

impl<S> InstrumentedStream<S> {
    /// Decorate `inner`, arming both idle deadlines from now.
    #[must_use]
    pub fn new(
        inner: S,
        counters: Arc<WorkerCounters>,
        read_timeout: Duration,
        write_timeout: Duration,
    ) -> Self {
        Self {
            inner,
            counters,
            read_timeout,
            write_timeout,
            read_deadline: Box::pin(sleep(read_timeout)),
            write_deadline: Box::pin(sleep(write_timeout)),
        }
    }
}

fn rearm(deadline: Pin<&mut Sleep>, timeout: Duration) {
    if let Some(next) = Instant::now().checked_add(timeout) {
        deadline.reset(next);
    }
}

fn idle_timeout(operation: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::TimedOut,
        format!("{} idle timeout expired", operation),
    )
}

impl<S> AsyncRead for InstrumentedStream<S>
where
    S: AsyncRead + Unpin,
{
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        let filled_before = buf.filled().len();
        match Pin::new(&mut this.inner).poll_read(cx, buf) {
            Poll::Ready(Ok(())) => {
                let moved = buf.filled().len().saturating_sub(filled_before);
                this.counters
                    .add_read_bytes(u64::try_from(moved).unwrap_or(u64::MAX));
                rearm(this.read_deadline.as_mut(), this.read_timeout);
                Poll::Ready(Ok(()))
            }
            Poll::Ready(Err(err)) => Poll::Ready(Err(err)),
            Poll::Pending => {
                if this.read_deadline.as_mut().poll(cx).is_ready() {
                    return Poll::Ready(Err(idle_timeout("read")));
                }
                Poll::Pending
            }
        }
    }
}

impl<S> AsyncWrite for InstrumentedStream<S>
where
    S: AsyncWrite + Unpin,
{
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        match Pin::new(&mut this.inner).poll_write(cx, buf) {
            Poll::Ready(Ok(written)) => {
                this.counters
                    .add_write_bytes(u64::try_from(written).unwrap_or(u64::MAX));
                rearm(this.write_deadline.as_mut(), this.write_timeout);
                Poll::Ready(Ok(written))
            }
            Poll::Ready(Err(err)) => Poll::Ready(Err(err)),
            Poll::Pending => {
                if this.write_deadline.as_mut().poll(cx).is_ready() {
                    return Poll::Ready(Err(idle_timeout("write")));
                }
                Poll::Pending
            }
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_shutdown(cx)
    }
}
