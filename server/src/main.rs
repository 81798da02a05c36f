use clap::Parser;
use log::{error, info};
use server::endpoint::{BindTarget, Endpoint};
use server::ingest::{IngestConfig, IngestionLoop, Ingestor};
use server::palette::ColorGenerator;
use server::signal::{redraw_channel, shutdown_channel, RedrawListener};
use server::store::MarkerStore;
use shared::DEFAULT_CHUNK_SIZE;

/// Headless ingestion: accepts coordinate batches and logs the marker count
/// whenever it changes.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Command line arguments
    #[derive(Parser, Debug)]
    #[command(author, version, about, long_about = None)]
    struct Args {
        /// Unix socket path, or host:port for TCP
        bind: BindTarget,
        /// Alpha channel for generated marker colors
        #[arg(short, long, default_value_t = 255)]
        alpha: u8,
        /// Maximum bytes read from each connection
        #[arg(short, long, default_value_t = DEFAULT_CHUNK_SIZE)]
        chunk_size: usize,
    }

    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    let endpoint = Endpoint::bind(&args.bind).await?;
    let store = MarkerStore::new();
    let (redraw, listener) = redraw_channel();
    let (shutdown, shutdown_rx) = shutdown_channel();

    let ingestor = Ingestor::new(
        store.clone(),
        ColorGenerator::new().with_alpha(args.alpha),
        redraw,
        shutdown_rx,
        IngestConfig::default().with_chunk_size(args.chunk_size),
    );
    let mut ingest_handle = tokio::spawn(IngestionLoop::new(endpoint, ingestor).run());
    let report_handle = tokio::spawn(report_changes(store, listener));

    tokio::select! {
        result = &mut ingest_handle => {
            match result {
                Ok(_) => info!("Ingestion loop finished"),
                Err(e) => error!("Ingestion task panicked: {}", e),
            }
            return Ok(());
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down gracefully...");
        }
    }

    shutdown.trigger();
    match ingest_handle.await {
        Ok(stats) => info!("Final stats: {:?}", stats),
        Err(e) => error!("Ingestion task panicked: {}", e),
    }
    report_handle.abort();

    Ok(())
}

/// Stands in for a renderer: one log line per coalesced redraw request.
async fn report_changes(store: MarkerStore, mut listener: RedrawListener) {
    while listener.changed().await {
        info!("Markers: {}", store.len());
    }
}
