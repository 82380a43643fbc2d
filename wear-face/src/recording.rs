//! Recording renderer for tests.
//!
//! Captures every draw call with fixed per-style glyph metrics, so layout
//! assertions are exact. Clones share state, mirroring how the mock data
//! layer is handed to both a test and the code under test.

use std::sync::{Arc, Mutex};

use crate::render::{Renderer, TextStyle};

/// One captured draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Background fill.
    Clear {
        /// Whether the ambient flat-black fill was used.
        flat_black: bool,
    },
    /// Text at a baseline position.
    Text {
        /// The drawn string.
        text: String,
        /// Baseline x.
        x: f32,
        /// Baseline y.
        y: f32,
        /// Paint selection.
        style: TextStyle,
        /// Whether anti-aliasing was on.
        antialias: bool,
    },
    /// A line segment.
    Line {
        /// Start x.
        x0: f32,
        /// Start y.
        y0: f32,
        /// End x.
        x1: f32,
        /// End y.
        y1: f32,
    },
    /// An image blit.
    Image {
        /// Top-left x.
        x: f32,
        /// Top-left y.
        y: f32,
    },
}

/// A renderer that records draw calls instead of rasterizing.
#[derive(Debug, Clone)]
pub struct RecordingRenderer {
    inner: Arc<Mutex<Vec<DrawOp>>>,
    width: f32,
    height: f32,
}

/// Fixed advance per glyph for each style, in pixels.
fn glyph_width(style: TextStyle) -> f32 {
    match style {
        TextStyle::Hour => 20.0,
        TextStyle::Time => 16.0,
        TextStyle::Secondary => 10.0,
    }
}

impl RecordingRenderer {
    /// A 320x320 recording canvas.
    pub fn new() -> Self {
        Self::with_size(320.0, 320.0)
    }

    /// A recording canvas of the given size.
    pub fn with_size(width: f32, height: f32) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Vec::new())),
            width,
            height,
        }
    }

    /// All captured operations, in draw order.
    pub fn ops(&self) -> Vec<DrawOp> {
        self.inner.lock().unwrap().clone()
    }

    /// Operations of the most recent frame (since the last `Clear`).
    pub fn last_frame(&self) -> Vec<DrawOp> {
        let ops = self.inner.lock().unwrap();
        let start = ops
            .iter()
            .rposition(|op| matches!(op, DrawOp::Clear { .. }))
            .unwrap_or(0);
        ops[start..].to_vec()
    }

    /// Texts drawn in the most recent frame.
    pub fn last_frame_texts(&self) -> Vec<String> {
        self.last_frame()
            .into_iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Number of frames drawn so far.
    pub fn frames(&self) -> usize {
        self.inner
            .lock()
            .unwrap()
            .iter()
            .filter(|op| matches!(op, DrawOp::Clear { .. }))
            .count()
    }

    /// Drop all captured operations.
    pub fn reset(&self) {
        self.inner.lock().unwrap().clear();
    }
}

impl Default for RecordingRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for RecordingRenderer {
    type Image = Vec<u8>;

    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn measure_text(&self, text: &str, style: TextStyle) -> f32 {
        text.chars().count() as f32 * glyph_width(style)
    }

    fn line_height(&self, style: TextStyle) -> f32 {
        match style {
            TextStyle::Hour | TextStyle::Time => 30.0,
            TextStyle::Secondary => 20.0,
        }
    }

    fn clear(&mut self, flat_black: bool) {
        self.inner.lock().unwrap().push(DrawOp::Clear { flat_black });
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: TextStyle, antialias: bool) {
        self.inner.lock().unwrap().push(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
            style,
            antialias,
        });
    }

    fn draw_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) {
        self.inner
            .lock()
            .unwrap()
            .push(DrawOp::Line { x0, y0, x1, y1 });
    }

    fn draw_image(&mut self, _image: &Self::Image, x: f32, y: f32) {
        self.inner.lock().unwrap().push(DrawOp::Image { x, y });
    }

    fn image_width(&self, _image: &Self::Image) -> f32 {
        24.0
    }

    fn decode_image(&self, bytes: &[u8]) -> Option<Self::Image> {
        if bytes.is_empty() {
            None
        } else {
            Some(bytes.to_vec())
        }
    }
}
