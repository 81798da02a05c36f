//! # Marker Ingestion Library
//!
//! This library receives coordinate batches from external processes over a
//! local socket and turns them into colored markers that a renderer can
//! draw. It owns the only concurrent part of the system: a background loop
//! that writes markers while the UI thread reads them.
//!
//! ## Data Flow
//!
//! ```text
//! Endpoint::accept ──► one bounded read ──► shared::parse ──► MarkerStore::extend
//!                                                                  │
//!                                            RedrawSignal::notify_changed
//! ```
//!
//! ## Module Organization
//!
//! ### Endpoint Module (`endpoint`)
//! Binds a Unix domain socket path or TCP address and accepts one
//! connection at a time. A Unix endpoint removes its socket file on drop.
//!
//! ### Store Module (`store`)
//! The mutex-guarded, append-only marker sequence shared with the renderer.
//! Chunks are appended atomically and iteration holds the lock, so a draw
//! never sees half a chunk.
//!
//! ### Palette Module (`palette`)
//! Random marker colors from a generator instance the loop owns.
//!
//! ### Signal Module (`signal`)
//! Coalescing redraw notification and cooperative shutdown, both on
//! `tokio::sync::watch`.
//!
//! ### Ingest Module (`ingest`)
//! The accept → read → parse → append state machine. Transient failures are
//! logged, counted and optionally forwarded to an error channel; only
//! shutdown ends the loop.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::endpoint::{BindTarget, Endpoint};
//! use server::ingest::{IngestConfig, IngestionLoop, Ingestor};
//! use server::palette::ColorGenerator;
//! use server::signal::{redraw_channel, shutdown_channel};
//! use server::store::MarkerStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let target: BindTarget = "/tmp/hits.sock".parse()?;
//!     let endpoint = Endpoint::bind(&target).await?;
//!
//!     let store = MarkerStore::new();
//!     let (redraw, mut listener) = redraw_channel();
//!     let (shutdown, shutdown_rx) = shutdown_channel();
//!
//!     let ingestor = Ingestor::new(
//!         store.clone(),
//!         ColorGenerator::new(),
//!         redraw,
//!         shutdown_rx,
//!         IngestConfig::default(),
//!     );
//!     let ingest = tokio::spawn(IngestionLoop::new(endpoint, ingestor).run());
//!
//!     while listener.changed().await {
//!         println!("{} markers", store.len());
//!         if store.len() > 100 {
//!             shutdown.trigger();
//!             break;
//!         }
//!     }
//!
//!     let stats = ingest.await?;
//!     println!("served {} connections", stats.connections);
//!     Ok(())
//! }
//! ```

pub mod endpoint;
pub mod error;
pub mod ingest;
pub mod palette;
pub mod signal;
pub mod store;

pub use error::IngestError;
