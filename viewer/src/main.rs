use clap::Parser;
use log::{error, info};
use macroquad::prelude::*;
use server::endpoint::BindTarget;
use server::ingest::IngestConfig;
use server::palette::ColorGenerator;
use server::signal::redraw_channel;
use server::store::MarkerStore;
use shared::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, DEFAULT_CHUNK_SIZE};
use viewer::ingest_thread::IngestThread;
use viewer::rendering::Renderer;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Unix socket path, or host:port for TCP
    bind: BindTarget,

    /// Window width
    #[arg(short = 'w', long, default_value_t = DEFAULT_CANVAS_WIDTH)]
    width: usize,

    /// Window height (no short flag to avoid conflict with --help)
    #[arg(long, default_value_t = DEFAULT_CANVAS_HEIGHT)]
    height: usize,

    /// Alpha channel for generated marker colors
    #[arg(short, long, default_value_t = 255)]
    alpha: u8,

    /// Maximum bytes read from each connection
    #[arg(short, long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,
}

fn window_conf() -> Conf {
    let args = Args::parse();
    Conf {
        window_title: "Hitboard".to_owned(),
        window_width: args.width as i32,
        window_height: args.height as i32,
        window_resizable: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    let store = MarkerStore::new();
    let (redraw, listener) = redraw_channel();

    let ingest = match IngestThread::spawn(
        &args.bind,
        store.clone(),
        ColorGenerator::new().with_alpha(args.alpha),
        redraw,
        IngestConfig::default().with_chunk_size(args.chunk_size),
    ) {
        Ok(ingest) => ingest,
        Err(e) => {
            error!("Failed to start ingestion: {}", e);
            std::process::exit(1);
        }
    };

    info!("Waiting for markers on {}", ingest.local_target());

    let mut renderer = Renderer::new(store, listener);
    prevent_quit();

    loop {
        if is_quit_requested() {
            break;
        }
        renderer.render();
        next_frame().await;
    }

    info!("Window closed, stopping ingestion...");
    if let Some(stats) = ingest.stop() {
        info!(
            "Served {} connections, {} markers",
            stats.connections, stats.markers_appended
        );
    }
}
