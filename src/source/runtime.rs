use std::sync::mpsc;
use std::thread::JoinHandle;

use anyhow::Context as _;
use tokio_util::sync::CancellationToken;

use crate::foundation::error::{DanmakuError, DanmakuResult};
use crate::source::tcp::run_tcp_feed;

/// A tokio runtime on its own thread, hosting network feeds and the Ctrl-C watcher.
///
/// The runtime lives until [`FeedRuntime::stop`] or until its token is cancelled (Ctrl-C does
/// that). The render loop never runs on this runtime.
pub struct FeedRuntime {
    cancel: CancellationToken,
    handle: tokio::runtime::Handle,
    thread: Option<JoinHandle<()>>,
}

impl FeedRuntime {
    /// Start the runtime thread.
    pub fn start() -> DanmakuResult<Self> {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .context("failed to build tokio runtime")?;
        let handle = rt.handle().clone();
        let cancel = CancellationToken::new();

        let token = cancel.clone();
        let thread = std::thread::Builder::new()
            .name("danmaku-feed".to_owned())
            .spawn(move || {
                rt.block_on(async move {
                    tokio::select! {
                        _ = token.cancelled() => {}
                        res = tokio::signal::ctrl_c() => {
                            match res {
                                Ok(()) => tracing::info!("interrupted, stopping"),
                                Err(e) => tracing::warn!(error = %e, "ctrl-c handler unavailable"),
                            }
                            token.cancel();
                        }
                    }
                });
            })
            .map_err(|e| DanmakuError::feed(format!("failed to spawn feed thread: {e}")))?;

        Ok(Self {
            cancel,
            handle,
            thread: Some(thread),
        })
    }

    /// Token cancelled on Ctrl-C or [`FeedRuntime::stop`].
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run a TCP line feed on this runtime.
    pub fn spawn_tcp(&self, addr: impl Into<String>, tx: mpsc::Sender<String>) {
        self.handle
            .spawn(run_tcp_feed(addr.into(), tx, self.cancel.clone()));
    }

    /// Cancel every task and wait for the runtime thread.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.cancel.cancel();
        if let Some(thread) = self.thread.take()
            && thread.join().is_err()
        {
            tracing::error!("feed thread panicked");
        }
    }
}

impl Drop for FeedRuntime {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/runtime.rs"]
mod tests;
