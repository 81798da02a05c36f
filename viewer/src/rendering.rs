use log::debug;
use macroquad::prelude::*;
use server::signal::RedrawListener;
use server::store::MarkerStore;
use shared::{Marker, Rgba, MARKER_DIAMETER};

/// Draws every marker in the store, scaled to the current window size.
pub struct Renderer {
    store: MarkerStore,
    redraw: RedrawListener,
    marker_diameter: f32,
}

impl Renderer {
    pub fn new(store: MarkerStore, redraw: RedrawListener) -> Self {
        Self {
            store,
            redraw,
            marker_diameter: MARKER_DIAMETER,
        }
    }

    /// Redraws the whole store; the window is cleared every frame, so the
    /// redraw signal only decides whether the new count gets logged.
    pub fn render(&mut self) {
        if self.redraw.take_pending() {
            debug!("Redraw requested, {} markers", self.store.len());
        }

        clear_background(BLACK);

        let (width, height) = (screen_width(), screen_height());
        let radius = self.marker_diameter / 2.0;

        self.store.for_each(|marker| {
            let (cx, cy) = marker_center(marker, width, height, radius);
            draw_circle(cx, cy, radius, to_color(marker.color()));
        });
    }
}

/// Center of a marker whose bounding box starts at its scaled position.
pub fn marker_center(marker: &Marker, width: f32, height: f32, radius: f32) -> (f32, f32) {
    let (x, y) = marker.canvas_position(width, height);
    (x + radius, y + radius)
}

pub fn to_color(rgba: Rgba) -> Color {
    Color::from_rgba(rgba.r, rgba.g, rgba.b, rgba.a)
}
