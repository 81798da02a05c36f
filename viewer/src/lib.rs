//! # Marker Viewer Library
//!
//! Window side of the marker pipeline. The ingestion loop from the `server`
//! crate runs on its own thread with a private tokio runtime, while the main
//! thread owns the macroquad window and redraws every frame.
//!
//! ### Ingest Thread Module (`ingest_thread`)
//! Binds the endpoint up front (so a claimed socket path fails startup),
//! then moves the loop onto a named background thread. Stopping triggers
//! shutdown and joins the thread, which releases the endpoint.
//!
//! ### Rendering Module (`rendering`)
//! Clears to black and draws each marker as a small disc, iterating the
//! store under its lock so a frame never shows half of an incoming batch.
//! Logical coordinates 0..=100 map onto the current window size.

pub mod ingest_thread;
pub mod rendering;
