//! Rendering backend boundary.
//!
//! The engine composes frames exclusively through this trait; it never
//! implements a drawing primitive itself. Platform backends map the styles
//! to their paints; tests use [`crate::RecordingRenderer`].

use wear_core::SegmentStyle;

/// Paint selection for text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    /// Bold hour digits and temperatures.
    Hour,
    /// Minute/second digits and separators.
    Time,
    /// Date line and divider.
    Secondary,
}

impl From<SegmentStyle> for TextStyle {
    fn from(style: SegmentStyle) -> Self {
        match style {
            SegmentStyle::Hour => TextStyle::Hour,
            SegmentStyle::Time => TextStyle::Time,
        }
    }
}

/// Canvas and bitmap primitives supplied by the platform.
pub trait Renderer {
    /// Decoded image handle type.
    type Image;

    /// Canvas width in pixels.
    fn width(&self) -> f32;

    /// Canvas height in pixels.
    fn height(&self) -> f32;

    /// Measured width of `text` in the given style.
    fn measure_text(&self, text: &str, style: TextStyle) -> f32;

    /// Vertical advance for a line of the given style.
    fn line_height(&self, style: TextStyle) -> f32;

    /// Fill the background. `flat_black` is the ambient power-saving fill;
    /// otherwise the themed background.
    fn clear(&mut self, flat_black: bool);

    /// Draw text with its baseline at (`x`, `y`).
    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: TextStyle, antialias: bool);

    /// Draw a line segment.
    fn draw_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32);

    /// Draw a decoded image with its top-left at (`x`, `y`).
    fn draw_image(&mut self, image: &Self::Image, x: f32, y: f32);

    /// Width of a decoded image.
    fn image_width(&self, image: &Self::Image) -> f32;

    /// Decode raw bytes into an image handle. `None` when undecodable.
    fn decode_image(&self, bytes: &[u8]) -> Option<Self::Image>;
}
