//! Background HMAC secret search
//!
//! A session owns one blocking task that tries every candidate against the
//! token signature. Status and progress live in atomics, the recovered
//! secret in a `OnceLock`, so observers never block the worker.

use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, OnceLock};
use std::task::{Context, Poll};

use jwtsmith_common::LoggingTransformer;
use jwtsmith_key::JwsAlgorithm;
use tokio::sync::oneshot;
use tracing::{debug, info};

use super::wordlist::Wordlist;
use crate::crypto::signing::hmac_verify;
use crate::error::{JoseError, Result};
use crate::jws::Jws;

/// Lifecycle of a search; every state but `Running` is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SearchStatus {
    /// Candidates remain
    Running = 0,
    /// A candidate verified the signature
    Success = 1,
    /// Every candidate was tried without a match
    Failed = 2,
    /// Stopped on request
    Cancelled = 3,
}

impl SearchStatus {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => SearchStatus::Running,
            1 => SearchStatus::Success,
            2 => SearchStatus::Failed,
            _ => SearchStatus::Cancelled,
        }
    }

    /// Whether the search has stopped
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self != SearchStatus::Running
    }
}

/// Snapshot of a search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    /// Current status
    pub status: SearchStatus,
    /// Percentage of candidates processed
    pub progress: u8,
    /// Recovered secret, present once the status is `Success`
    pub secret: Option<String>,
}

#[derive(Debug)]
struct Shared {
    status: AtomicU8,
    progress: AtomicU8,
    secret: OnceLock<String>,
}

impl Shared {
    fn new() -> Self {
        Self {
            status: AtomicU8::new(SearchStatus::Running as u8),
            progress: AtomicU8::new(0),
            secret: OnceLock::new(),
        }
    }

    fn status(&self) -> SearchStatus {
        SearchStatus::from_u8(self.status.load(Ordering::Acquire))
    }

    /// Leave `Running`; fails when another transition got there first
    fn finish(&self, to: SearchStatus) -> bool {
        self.status
            .compare_exchange(
                SearchStatus::Running as u8,
                to as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    fn state(&self) -> SearchState {
        let status = self.status();
        SearchState {
            status,
            progress: self.progress.load(Ordering::Acquire),
            secret: match status {
                SearchStatus::Success => self.secret.get().cloned(),
                _ => None,
            },
        }
    }
}

/// Entry point for weak HMAC secret searches
pub struct WeakSecretSearch;

impl WeakSecretSearch {
    /// Start searching `wordlist` for the secret that signed `jws`
    ///
    /// Must be called within a Tokio runtime. The token must name an HMAC
    /// algorithm in its header.
    pub fn start(jws: &Jws, wordlist: Wordlist) -> Result<SearchSession> {
        let algorithm = JwsAlgorithm::from_str(&jws.header().algorithm())
            .ok()
            .filter(|algorithm| algorithm.is_hmac())
            .ok_or_else(|| {
                JoseError::precondition(format!(
                    "'{}' is not an HMAC algorithm",
                    jws.header().algorithm()
                ))
            })?;
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| JoseError::session(format!("no Tokio runtime: {e}")))?;

        let shared = Arc::new(Shared::new());
        let (tx, rx) = oneshot::channel();
        let input = jws.signing_input().into_bytes();
        let signature = jws.signature().decoded().to_vec();

        info!(%algorithm, candidates = wordlist.len(), "starting weak secret search");

        let worker = Arc::clone(&shared);
        runtime.spawn_blocking(move || {
            search(&worker, algorithm, &input, &signature, &wordlist);
            // The session may have been dropped
            let _ = tx.send(worker.state());
        });

        Ok(SearchSession { shared, done: rx })
    }
}

fn search(
    shared: &Shared,
    algorithm: JwsAlgorithm,
    input: &[u8],
    signature: &[u8],
    wordlist: &Wordlist,
) {
    let total = wordlist.len();

    for (index, candidate) in wordlist.iter().enumerate() {
        if shared.status() != SearchStatus::Running {
            debug!(processed = index, "weak secret search cancelled");
            return;
        }

        let processed = index + 1;
        shared
            .progress
            .store((processed * 100 / total) as u8, Ordering::Release);

        if hmac_verify(candidate.as_bytes(), algorithm, input, signature) {
            let _ = shared.secret.set(candidate.to_owned());
            if shared.finish(SearchStatus::Success) {
                info!(
                    secret = %LoggingTransformer::fingerprint(candidate),
                    "weak secret found"
                );
            }
            return;
        }
    }

    if shared.finish(SearchStatus::Failed) {
        info!(candidates = total, "weak secret search exhausted");
    }
}

/// Handle to a running search
#[derive(Debug)]
pub struct SearchSession {
    shared: Arc<Shared>,
    done: oneshot::Receiver<SearchState>,
}

impl SearchSession {
    /// Ask the worker to stop; has no effect once the search has finished
    pub fn cancel(&self) {
        if self.shared.finish(SearchStatus::Cancelled) {
            info!("weak secret search cancellation requested");
        }
    }

    /// Current snapshot
    #[must_use]
    pub fn poll_state(&self) -> SearchState {
        self.shared.state()
    }

    /// Current status
    #[must_use]
    pub fn status(&self) -> SearchStatus {
        self.shared.status()
    }

    /// Percentage of candidates processed
    #[must_use]
    pub fn progress(&self) -> u8 {
        self.shared.progress.load(Ordering::Acquire)
    }

    /// Recovered secret
    #[must_use]
    pub fn secret(&self) -> Option<String> {
        self.shared.state().secret
    }

    /// Wait for the worker to stop
    pub fn wait(self) -> SearchCompletion {
        SearchCompletion { rx: self.done }
    }
}

/// Future resolving to the final state of a search
pub struct SearchCompletion {
    rx: oneshot::Receiver<SearchState>,
}

impl Future for SearchCompletion {
    type Output = Result<SearchState>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(state)) => Poll::Ready(Ok(state)),
            Poll::Ready(Err(_)) => Poll::Ready(Err(JoseError::session("search worker stopped"))),
            Poll::Pending => Poll::Pending,
        }
    }
}
