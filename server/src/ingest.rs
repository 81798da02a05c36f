//! Accept → read → parse → append loop feeding the marker store
//!
//! One connection is served at a time. Each connection contributes at most
//! one chunk: a single bounded read, parsed as a whole and appended as a
//! whole. The connection is dropped (closed) before the next accept no
//! matter how the cycle ended.
//!
//! Nothing in here stops the loop except the shutdown signal. Accept, read
//! and parse failures are logged, counted and forwarded to an optional error
//! sink, and the loop goes back to accepting.

use crate::endpoint::Endpoint;
use crate::error::{IngestError, Result};
use crate::palette::ColorGenerator;
use crate::signal::{RedrawSignal, Shutdown};
use crate::store::MarkerStore;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::Rng;
use shared::{Marker, DEFAULT_CHUNK_SIZE};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc;

/// Where a cycle currently is. Exposed for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestState {
    Idle,
    Accepting,
    Reading,
    Parsing,
    Appending,
    Canceled,
}

#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Upper bound of the single read per connection
    pub chunk_size: usize,
    /// Pause after a failed accept before trying again
    pub accept_backoff: Duration,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            accept_backoff: Duration::from_millis(10),
        }
    }
}

impl IngestConfig {
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }
}

/// Counters kept over the lifetime of a loop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub connections: u64,
    pub markers_appended: u64,
    pub accept_errors: u64,
    pub read_errors: u64,
    pub malformed_chunks: u64,
    pub empty_reads: u64,
}

/// Turns connections and chunks into markers. Owns everything a cycle needs
/// except the endpoint, so single cycles can be driven directly.
pub struct Ingestor<R = StdRng> {
    store: MarkerStore,
    colors: ColorGenerator<R>,
    redraw: RedrawSignal,
    shutdown: Shutdown,
    config: IngestConfig,
    errors: Option<mpsc::UnboundedSender<IngestError>>,
    state: IngestState,
    stats: IngestStats,
}

impl<R: Rng> Ingestor<R> {
    pub fn new(
        store: MarkerStore,
        colors: ColorGenerator<R>,
        redraw: RedrawSignal,
        shutdown: Shutdown,
        config: IngestConfig,
    ) -> Self {
        Self {
            store,
            colors,
            redraw,
            shutdown,
            config,
            errors: None,
            state: IngestState::Idle,
            stats: IngestStats::default(),
        }
    }

    /// Forwards every non-fatal error to `sink` in addition to logging it.
    pub fn with_error_sink(mut self, sink: mpsc::UnboundedSender<IngestError>) -> Self {
        self.errors = Some(sink);
        self
    }

    pub fn state(&self) -> IngestState {
        self.state
    }

    pub fn stats(&self) -> &IngestStats {
        &self.stats
    }

    pub fn store(&self) -> &MarkerStore {
        &self.store
    }

    /// Reads one chunk from `conn`, closes it and appends whatever parsed.
    ///
    /// Returns the number of markers appended. A shutdown while waiting on
    /// the read drops the connection and appends nothing.
    pub async fn serve_connection<S>(&mut self, mut conn: S) -> Result<usize>
    where
        S: AsyncRead + Unpin,
    {
        self.stats.connections += 1;
        self.transition(IngestState::Reading);

        let mut buffer = vec![0u8; self.config.chunk_size.max(1)];
        let mut shutdown = self.shutdown.clone();
        let read = tokio::select! {
            biased;
            _ = shutdown.wait() => {
                debug!("Shutdown requested while reading, dropping connection");
                return Ok(0);
            }
            read = conn.read(&mut buffer) => read,
        };
        drop(conn);

        let len = read.map_err(IngestError::Read)?;
        if len == 0 {
            return Err(IngestError::EmptyRead);
        }

        self.serve_chunk(&buffer[..len])
    }

    /// Parses one chunk and appends a freshly colored marker per pair.
    ///
    /// All or nothing: a malformed chunk appends no markers. The redraw
    /// signal fires only when something was appended.
    pub fn serve_chunk(&mut self, chunk: &[u8]) -> Result<usize> {
        self.transition(IngestState::Parsing);
        let pairs = shared::parse(chunk)?;

        self.transition(IngestState::Appending);
        let markers: Vec<Marker> = pairs
            .into_iter()
            .map(|(x, y)| Marker::new(x, y, self.colors.next_color()))
            .collect();

        let appended = markers.len();
        if appended > 0 {
            let total = self.store.extend(markers);
            self.stats.markers_appended += appended as u64;
            self.redraw.notify_changed();
            debug!("Appended {} markers ({} total)", appended, total);
        }

        self.transition(IngestState::Idle);
        Ok(appended)
    }

    /// Logs, counts and forwards a non-fatal error.
    fn report(&mut self, err: IngestError) {
        match &err {
            IngestError::Accept(_) => self.stats.accept_errors += 1,
            IngestError::Read(_) => self.stats.read_errors += 1,
            IngestError::MalformedInput(_) => self.stats.malformed_chunks += 1,
            IngestError::EmptyRead => self.stats.empty_reads += 1,
            IngestError::Bind { .. } => {}
        }

        if matches!(err, IngestError::EmptyRead) {
            debug!("{}", err);
        } else {
            warn!("{}", err);
        }

        if let Some(sink) = &self.errors {
            if sink.send(err).is_err() {
                self.errors = None;
            }
        }
        self.transition(IngestState::Idle);
    }

    fn transition(&mut self, next: IngestState) {
        if self.state != next {
            debug!("{:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }
}

/// The long-running loop: an endpoint plus the [`Ingestor`] serving it.
pub struct IngestionLoop<R = StdRng> {
    endpoint: Endpoint,
    ingestor: Ingestor<R>,
}

impl<R: Rng> IngestionLoop<R> {
    pub fn new(endpoint: Endpoint, ingestor: Ingestor<R>) -> Self {
        Self { endpoint, ingestor }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Serves connections one after another until shutdown is triggered.
    ///
    /// A pending accept or read is abandoned as soon as shutdown fires. The
    /// endpoint is released when the loop returns.
    pub async fn run(mut self) -> IngestStats {
        info!("Ingestion loop serving {}", self.endpoint.local_target());
        let mut shutdown = self.ingestor.shutdown.clone();

        while !shutdown.is_triggered() {
            self.ingestor.transition(IngestState::Accepting);

            let accepted = tokio::select! {
                biased;
                _ = shutdown.wait() => break,
                accepted = self.endpoint.accept() => accepted,
            };

            let conn = match accepted {
                Ok(conn) => conn,
                Err(e) => {
                    if shutdown.is_triggered() {
                        break;
                    }
                    self.ingestor.report(e);
                    tokio::time::sleep(self.ingestor.config.accept_backoff).await;
                    continue;
                }
            };

            let peer = conn.peer().to_string();
            match self.ingestor.serve_connection(conn).await {
                Ok(appended) => debug!("Served {}: {} markers", peer, appended),
                Err(e) => self.ingestor.report(e),
            }
        }

        self.ingestor.transition(IngestState::Canceled);
        let stats = self.ingestor.stats.clone();
        info!(
            "Ingestion loop stopped: {} connections, {} markers, {} malformed, {} read errors, {} accept errors",
            stats.connections,
            stats.markers_appended,
            stats.malformed_chunks,
            stats.read_errors,
            stats.accept_errors
        );
        stats
    }
}
