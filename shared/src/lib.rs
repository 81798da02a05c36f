pub mod protocol;

pub use protocol::{parse, ParseError};

/// Upper bound of the logical coordinate space on both axes.
pub const LOGICAL_EXTENT: f32 = 100.0;
/// Bytes read from a connection in one chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;
/// Diameter of a drawn marker in screen pixels.
pub const MARKER_DIAMETER: f32 = 10.0;
pub const DEFAULT_CANVAS_WIDTH: usize = 500;
pub const DEFAULT_CANVAS_HEIGHT: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const OPAQUE: u8 = 255;

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, Self::OPAQUE)
    }
}

/// A colored point in logical coordinates.
///
/// Values outside `0..=100` are kept as-is and simply land outside the
/// visible canvas when drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    x: i32,
    y: i32,
    color: Rgba,
}

impl Marker {
    pub fn new(x: i32, y: i32, color: Rgba) -> Self {
        Self { x, y, color }
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    /// Top-left corner of the marker on a canvas of the given size.
    pub fn canvas_position(&self, width: f32, height: f32) -> (f32, f32) {
        canvas_position(self.x, self.y, width, height)
    }
}

/// Scales a logical coordinate into canvas pixels.
pub fn canvas_position(x: i32, y: i32, width: f32, height: f32) -> (f32, f32) {
    (
        x as f32 / LOGICAL_EXTENT * width,
        y as f32 / LOGICAL_EXTENT * height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_marker_creation() {
        let marker = Marker::new(10, 20, Rgba::opaque(1, 2, 3));
        assert_eq!(marker.x(), 10);
        assert_eq!(marker.y(), 20);
        assert_eq!(marker.position(), (10, 20));
        assert_eq!(marker.color(), Rgba::new(1, 2, 3, 255));
    }

    #[test]
    fn test_canvas_position_scales_to_canvas() {
        let marker = Marker::new(50, 25, Rgba::opaque(0, 0, 0));
        let (x, y) = marker.canvas_position(500.0, 400.0);
        assert_approx_eq!(x, 250.0, 0.001);
        assert_approx_eq!(y, 100.0, 0.001);
    }

    #[test]
    fn test_canvas_position_follows_resize() {
        let marker = Marker::new(100, 100, Rgba::opaque(0, 0, 0));

        let (x, y) = marker.canvas_position(500.0, 500.0);
        assert_approx_eq!(x, 500.0, 0.001);
        assert_approx_eq!(y, 500.0, 0.001);

        let (x, y) = marker.canvas_position(800.0, 200.0);
        assert_approx_eq!(x, 800.0, 0.001);
        assert_approx_eq!(y, 200.0, 0.001);
    }

    #[test]
    fn test_out_of_range_markers_are_not_clamped() {
        let (x, y) = canvas_position(-10, 150, 500.0, 500.0);
        assert_approx_eq!(x, -50.0, 0.001);
        assert_approx_eq!(y, 750.0, 0.001);
    }

    #[test]
    fn test_marker_is_copy() {
        let marker = Marker::new(1, 2, Rgba::opaque(9, 9, 9));
        let copy = marker;
        assert_eq!(marker, copy);
    }
}
