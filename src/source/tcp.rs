use std::sync::mpsc;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::net::TcpStream;
use tokio_util::sync::CancellationToken;

use crate::source::clean_line;

/// First reconnect delay.
pub const BACKOFF_INITIAL: Duration = Duration::from_millis(500);
/// Longest reconnect delay.
pub const BACKOFF_MAX: Duration = Duration::from_secs(30);

/// Exponential reconnect delay: doubles after every failure, resets after a good connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Backoff {
    current: Duration,
    initial: Duration,
    max: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(BACKOFF_INITIAL, BACKOFF_MAX)
    }
}

impl Backoff {
    /// Backoff starting at `initial` and capped at `max`.
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self {
            current: initial,
            initial,
            max: max.max(initial),
        }
    }

    /// Delay to wait now; the following call returns twice as much, up to the cap.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = (self.current * 2).min(self.max);
        delay
    }

    /// Forget past failures.
    pub fn reset(&mut self) {
        self.current = self.initial;
    }
}

/// Why a connection's line loop stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LinesEnd {
    /// Peer closed the stream or a read failed; reconnect.
    Disconnected,
    /// Cancelled, or nobody is listening any more; stop for good.
    Stopped,
}

/// Forward non-blank lines of `reader` into `tx` until the stream ends or `cancel` fires.
pub(crate) async fn forward_lines<R>(
    reader: R,
    tx: &mpsc::Sender<String>,
    cancel: &CancellationToken,
) -> LinesEnd
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => return LinesEnd::Stopped,
            next = lines.next_line() => next,
        };
        match next {
            Ok(Some(line)) => {
                let Some(msg) = clean_line(&line) else {
                    continue;
                };
                if tx.send(msg).is_err() {
                    return LinesEnd::Stopped;
                }
            }
            Ok(None) => return LinesEnd::Disconnected,
            Err(e) => {
                tracing::warn!(error = %e, "feed read failed");
                return LinesEnd::Disconnected;
            }
        }
    }
}

/// Connect to `addr` and forward one message per line, reconnecting with [`Backoff`] until
/// `cancel` fires or the receiving side is dropped.
pub async fn run_tcp_feed(addr: String, tx: mpsc::Sender<String>, cancel: CancellationToken) {
    let mut backoff = Backoff::default();
    loop {
        let connected = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            res = TcpStream::connect(&addr) => res,
        };
        match connected {
            Ok(stream) => {
                tracing::info!(%addr, "feed connected");
                backoff.reset();
                if forward_lines(BufReader::new(stream), &tx, &cancel).await == LinesEnd::Stopped {
                    break;
                }
                tracing::warn!(%addr, "feed disconnected");
            }
            Err(e) => {
                tracing::warn!(%addr, error = %e, "feed connect failed");
            }
        }

        let delay = backoff.next_delay();
        tracing::debug!(%addr, delay_ms = delay.as_millis() as u64, "feed reconnecting");
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(delay) => {}
        }
    }
    tracing::debug!(%addr, "feed stopped");
}

#[cfg(test)]
#[path = "../../tests/unit/source/tcp.rs"]
mod tests;
