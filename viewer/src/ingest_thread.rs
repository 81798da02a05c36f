//! Runs the ingestion loop on a dedicated OS thread with its own tokio
//! runtime, leaving the main thread to the window.

use log::{info, warn};
use server::endpoint::{BindTarget, Endpoint};
use server::ingest::{IngestConfig, IngestStats, IngestionLoop, Ingestor};
use server::palette::ColorGenerator;
use server::signal::{shutdown_channel, RedrawSignal, ShutdownHandle};
use server::store::MarkerStore;
use std::thread;

pub struct IngestThread {
    target: BindTarget,
    shutdown: ShutdownHandle,
    handle: Option<thread::JoinHandle<IngestStats>>,
}

impl IngestThread {
    /// Binds `target` before returning, so a claimed path is reported to
    /// the caller instead of disappearing into the background thread.
    pub fn spawn(
        target: &BindTarget,
        store: MarkerStore,
        colors: ColorGenerator,
        redraw: RedrawSignal,
        config: IngestConfig,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let endpoint = runtime.block_on(Endpoint::bind(target))?;
        let target = endpoint.local_target().clone();

        let (shutdown, shutdown_rx) = shutdown_channel();
        let ingestor = Ingestor::new(store, colors, redraw, shutdown_rx, config);

        let handle = thread::Builder::new()
            .name("ingest".to_string())
            .spawn(move || runtime.block_on(IngestionLoop::new(endpoint, ingestor).run()))?;

        info!("Ingestion thread started on {}", target);
        Ok(IngestThread {
            target,
            shutdown,
            handle: Some(handle),
        })
    }

    pub fn local_target(&self) -> &BindTarget {
        &self.target
    }

    /// Signals shutdown and waits for the loop to release the endpoint.
    pub fn stop(mut self) -> Option<IngestStats> {
        self.shutdown.trigger();
        match self.handle.take()?.join() {
            Ok(stats) => Some(stats),
            Err(_) => {
                warn!("Ingestion thread panicked");
                None
            }
        }
    }
}

impl Drop for IngestThread {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}
