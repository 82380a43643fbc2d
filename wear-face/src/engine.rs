//! Frame composition.
//!
//! `FaceEngine` owns the weather snapshot and the frame configuration and
//! turns one wall-clock reading into one rendered frame. It holds no timer
//! and performs no I/O: ticks and events are delivered by the engine loop,
//! and all drawing goes through the [`Renderer`] boundary.

use wear_core::{frame, DisplayMode, FrameConfig, WeatherSnapshot};
use wear_types::{paths, AssetToken, EventKind, SyncError, SyncEvent, WeatherUpdate};

use crate::clock::WallTime;
use crate::render::{Renderer, TextStyle};

/// Vertical start of the time line, per device shape.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Geometry {
    top_offset: f32,
}

impl Geometry {
    fn for_shape(round: bool) -> Self {
        // Round faces clip their top arc; start lower.
        Self {
            top_offset: if round { 96.0 } else { 80.0 },
        }
    }
}

/// The watch-face engine: weather snapshot + frame config + renderer.
pub struct FaceEngine<R: Renderer> {
    renderer: R,
    config: FrameConfig,
    weather: WeatherSnapshot<R::Image>,
    geometry: Geometry,
}

impl<R: Renderer> FaceEngine<R> {
    /// Create an engine with an empty snapshot, interactive and rectangular.
    pub fn new(renderer: R) -> Self {
        let config = FrameConfig::new();
        Self {
            renderer,
            config,
            weather: WeatherSnapshot::new(),
            geometry: Geometry::for_shape(config.round),
        }
    }

    /// Current frame configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    /// Current weather snapshot.
    pub fn weather(&self) -> &WeatherSnapshot<R::Image> {
        &self.weather
    }

    /// Current display mode.
    pub fn mode(&self) -> DisplayMode {
        self.config.mode
    }

    /// Switch display mode. Returns whether the mode actually changed.
    pub fn set_mode(&mut self, mode: DisplayMode) -> bool {
        if self.config.mode == mode {
            return false;
        }
        self.config.mode = mode;
        true
    }

    /// Record the low-bit-ambient capability (properties-changed event).
    pub fn set_low_bit_ambient(&mut self, low_bit: bool) {
        self.config.low_bit_ambient = low_bit;
    }

    /// Record the device shape (insets-changed event).
    pub fn set_round(&mut self, round: bool) {
        self.config.round = round;
        self.geometry = Geometry::for_shape(round);
    }

    /// Apply one change event to the weather snapshot.
    ///
    /// Returns whether a redraw is warranted, plus the icon token to fetch
    /// off the render path, if the payload carried one. Non-`Changed` kinds
    /// and foreign paths are no-ops.
    pub fn apply_event(&mut self, event: &SyncEvent, now_ms: u64) -> (bool, Option<AssetToken>) {
        let Some((update, errors)) = WeatherUpdate::from_event(event) else {
            if event.kind == EventKind::Changed && !paths::is_known(&event.path) {
                // Normal when unrelated apps share the replicated namespace.
                tracing::debug!("ignoring: {}", SyncError::UnknownPath(event.path.clone()));
            } else {
                tracing::debug!("ignoring {:?} event on {}", event.kind, event.path);
            }
            return (false, None);
        };
        for error in &errors {
            tracing::warn!("dropping malformed weather field: {error}");
        }
        let redraw = self.weather.apply(&update, now_ms);
        if redraw {
            tracing::debug!(
                "weather updated: high {:.1}, low {:.1}",
                self.weather.high,
                self.weather.low
            );
        }
        (redraw, update.icon)
    }

    /// Decode fetched icon bytes and install the image.
    ///
    /// Returns whether an image was installed (and a redraw is due). Failure
    /// keeps the previous icon.
    pub fn install_icon(&mut self, bytes: &[u8]) -> bool {
        match self.renderer.decode_image(bytes) {
            Some(image) => {
                self.weather.set_icon(image);
                true
            }
            None => {
                tracing::warn!("undecodable icon asset ({} bytes); keeping prior", bytes.len());
                false
            }
        }
    }

    /// Compose and draw one frame for the given wall-clock reading.
    pub fn draw_frame(&mut self, now: &WallTime) {
        let aa = self.config.antialias();
        let width = self.renderer.width();
        self.renderer.clear(self.config.is_ambient());

        // Time line: centered as one assembled run; hidden separators keep
        // their measured width so the digits never shift mid-blink.
        let segments =
            frame::time_segments(now.hour, now.minute, now.second, &self.config, now.millis);
        let total: f32 = segments
            .iter()
            .map(|s| self.renderer.measure_text(&s.text, s.style.into()))
            .sum();
        let mut x = frame::centered_offset(width, total);
        let mut y = self.geometry.top_offset;
        for segment in &segments {
            let style: TextStyle = segment.style.into();
            let advance = self.renderer.measure_text(&segment.text, style);
            if segment.visible {
                self.renderer.draw_text(&segment.text, x, y, style, aa);
            }
            x += advance;
        }

        // Date line, centered independently.
        y += self.renderer.line_height(TextStyle::Hour)
            + self.renderer.line_height(TextStyle::Secondary);
        let date_width = self
            .renderer
            .measure_text(&now.date_line, TextStyle::Secondary);
        self.renderer.draw_text(
            &now.date_line,
            frame::centered_offset(width, date_width),
            y,
            TextStyle::Secondary,
            aa,
        );

        // Divider: a centered third of the canvas.
        y += self.renderer.line_height(TextStyle::Secondary);
        let (x0, x1) = frame::divider_span(width);
        self.renderer.draw_line(x0, y, x1, y);

        // Weather line: high from center, low after it, icon left of center.
        // Defaults render as-is; a missing icon is simply not drawn.
        y += self.renderer.line_height(TextStyle::Secondary);
        let high = frame::temp_label(self.weather.high);
        let low = frame::temp_label(self.weather.low);
        let mut wx = width / 2.0;
        self.renderer.draw_text(&high, wx, y, TextStyle::Hour, aa);
        wx += self.renderer.measure_text(&high, TextStyle::Hour);
        self.renderer.draw_text(&low, wx, y, TextStyle::Hour, aa);
        if let Some(icon) = &self.weather.icon {
            let icon_width = self.renderer.image_width(icon);
            self.renderer.draw_image(icon, width / 2.0 - icon_width, y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{DrawOp, RecordingRenderer};
    use wear_types::{paths, DataMap, EventKind};

    fn engine() -> (FaceEngine<RecordingRenderer>, RecordingRenderer) {
        let renderer = RecordingRenderer::new();
        (FaceEngine::new(renderer.clone()), renderer)
    }

    fn weather_event(high: f64, low: f64) -> SyncEvent {
        let mut map = DataMap::new();
        map.put_f64(paths::FIELD_HIGH, high)
            .put_f64(paths::FIELD_LOW, low);
        SyncEvent::changed(paths::WEATHER_PATH, map)
    }

    // ===========================================
    // Weather application
    // ===========================================

    #[test]
    fn payload_event_updates_snapshot() {
        let (mut engine, _) = engine();
        let (redraw, icon) = engine.apply_event(&weather_event(72.4, 58.9), 1_000);

        assert!(redraw);
        assert!(icon.is_none());
        assert_eq!(engine.weather().high, 72.4);
    }

    #[test]
    fn foreign_and_non_changed_events_are_no_ops() {
        let (mut engine, _) = engine();
        engine.apply_event(&weather_event(20.0, 10.0), 1_000);

        let foreign = SyncEvent::changed("/other-app/stuff", DataMap::new());
        let deleted = SyncEvent {
            kind: EventKind::Deleted,
            ..weather_event(99.0, 98.0)
        };
        assert_eq!(engine.apply_event(&foreign, 2_000), (false, None));
        assert_eq!(engine.apply_event(&deleted, 2_000), (false, None));

        assert_eq!(engine.weather().high, 20.0);
        assert_eq!(engine.weather().last_updated, Some(1_000));
    }

    #[test]
    fn icon_token_is_surfaced_for_fetching() {
        let (mut engine, _) = engine();
        let token = AssetToken::new();
        let mut map = DataMap::new();
        map.put_asset(paths::FIELD_ICON, token);
        let event = SyncEvent::changed(paths::WEATHER_PATH, map);

        let (redraw, fetch) = engine.apply_event(&event, 1_000);
        assert!(redraw);
        assert_eq!(fetch, Some(token));
        assert!(engine.weather().icon.is_none());
    }

    #[test]
    fn install_icon_decodes_and_keeps_prior_on_failure() {
        let (mut engine, _) = engine();
        assert!(engine.install_icon(&[1, 2, 3]));
        assert!(engine.weather().icon.is_some());

        // Undecodable bytes keep the prior image
        assert!(!engine.install_icon(&[]));
        assert_eq!(engine.weather().icon, Some(vec![1, 2, 3]));
    }

    // ===========================================
    // Frame output
    // ===========================================

    #[test]
    fn frame_shows_rounded_temperatures_without_icon() {
        let (mut engine, renderer) = engine();
        engine.apply_event(&weather_event(72.4, 58.9), 1_000);

        engine.draw_frame(&WallTime::at(10_100, 12, 30, 45));

        let texts = renderer.last_frame_texts();
        assert!(texts.contains(&"72".to_string()));
        assert!(texts.contains(&"59".to_string()));
        assert!(!renderer
            .last_frame()
            .iter()
            .any(|op| matches!(op, DrawOp::Image { .. })));
    }

    #[test]
    fn frame_draws_icon_when_installed() {
        let (mut engine, renderer) = engine();
        engine.install_icon(&[1, 2, 3]);

        engine.draw_frame(&WallTime::at(10_100, 12, 30, 45));

        // Icon sits flush left of center: x = width/2 - image width.
        assert!(renderer
            .last_frame()
            .iter()
            .any(|op| matches!(op, DrawOp::Image { x, .. } if *x == 160.0 - 24.0)));
    }

    #[test]
    fn empty_snapshot_renders_numeric_defaults() {
        let (mut engine, renderer) = engine();
        engine.draw_frame(&WallTime::at(10_100, 12, 30, 45));

        let texts = renderer.last_frame_texts();
        // Two "0" temperature labels, no icon, no panic.
        assert_eq!(texts.iter().filter(|t| t.as_str() == "0").count(), 2);
    }

    #[test]
    fn interactive_frame_has_seconds_ambient_does_not() {
        let (mut engine, renderer) = engine();
        engine.draw_frame(&WallTime::at(10_100, 12, 30, 45));
        assert!(renderer.last_frame_texts().contains(&"45".to_string()));

        engine.set_mode(DisplayMode::Ambient);
        engine.draw_frame(&WallTime::at(10_100, 12, 30, 45));
        assert!(!renderer.last_frame_texts().contains(&"45".to_string()));
    }

    #[test]
    fn ambient_background_is_flat_black() {
        let (mut engine, renderer) = engine();
        engine.draw_frame(&WallTime::at(0, 1, 2, 3));
        assert!(matches!(
            renderer.last_frame()[0],
            DrawOp::Clear { flat_black: false }
        ));

        engine.set_mode(DisplayMode::Ambient);
        engine.draw_frame(&WallTime::at(0, 1, 2, 3));
        assert!(matches!(
            renderer.last_frame()[0],
            DrawOp::Clear { flat_black: true }
        ));
    }

    #[test]
    fn low_bit_ambient_disables_antialiasing() {
        let (mut engine, renderer) = engine();
        engine.set_low_bit_ambient(true);
        engine.set_mode(DisplayMode::Ambient);

        engine.draw_frame(&WallTime::at(0, 1, 2, 3));
        assert!(renderer
            .last_frame()
            .iter()
            .all(|op| !matches!(op, DrawOp::Text { antialias: true, .. })));

        // Back to interactive: anti-aliasing returns.
        engine.set_mode(DisplayMode::Interactive);
        engine.draw_frame(&WallTime::at(0, 1, 2, 3));
        assert!(renderer
            .last_frame()
            .iter()
            .all(|op| !matches!(op, DrawOp::Text { antialias: false, .. })));
    }

    #[test]
    fn hidden_separator_leaves_a_gap_not_a_shift() {
        let (mut engine, renderer) = engine();

        // First half of the second: separators visible.
        engine.draw_frame(&WallTime::at(10_100, 12, 30, 45));
        let visible_frame = renderer.last_frame();

        // Second half: separators hidden, digit positions identical.
        engine.draw_frame(&WallTime::at(10_600, 12, 30, 45));
        let hidden_frame = renderer.last_frame();

        let digit_positions = |frame: &[DrawOp]| -> Vec<(String, f32)> {
            frame
                .iter()
                .filter_map(|op| match op {
                    DrawOp::Text { text, x, .. } if text != ":" => Some((text.clone(), *x)),
                    _ => None,
                })
                .collect()
        };
        assert_eq!(digit_positions(&visible_frame), digit_positions(&hidden_frame));
        assert!(hidden_frame
            .iter()
            .all(|op| !matches!(op, DrawOp::Text { text, .. } if text == ":")));
    }

    #[test]
    fn time_line_is_centered_from_total_width() {
        for canvas in [320.0f32, 321.0f32] {
            let renderer = RecordingRenderer::with_size(canvas, canvas);
            let mut engine = FaceEngine::new(renderer.clone());
            engine.draw_frame(&WallTime::at(10_100, 12, 30, 45));

            // hour "12" at 20px/glyph + ":" "30" ":" "45" at 16px/glyph
            let total = 2.0 * 20.0 + 6.0 * 16.0;
            let expected = (canvas - total) / 2.0;
            let first_x = renderer
                .last_frame()
                .iter()
                .find_map(|op| match op {
                    DrawOp::Text { x, .. } => Some(*x),
                    _ => None,
                })
                .unwrap();
            assert_eq!(first_x, expected);
        }
    }

    #[test]
    fn divider_is_a_centered_third_of_the_canvas() {
        let (mut engine, renderer) = engine();
        engine.draw_frame(&WallTime::at(0, 1, 2, 3));

        assert!(renderer.last_frame().iter().any(
            |op| matches!(op, DrawOp::Line { x0, x1, .. }
                if (*x1 - *x0 - 320.0 / 3.0).abs() < 0.01
                && (*x0 - (320.0 - 320.0 / 3.0) / 2.0).abs() < 0.01)
        ));
    }

    #[test]
    fn round_shape_moves_the_face_down() {
        let (mut engine, renderer) = engine();
        engine.draw_frame(&WallTime::at(10_100, 12, 30, 45));
        let rect_y = renderer.last_frame().iter().find_map(|op| match op {
            DrawOp::Text { y, .. } => Some(*y),
            _ => None,
        });

        engine.set_round(true);
        engine.draw_frame(&WallTime::at(10_100, 12, 30, 45));
        let round_y = renderer.last_frame().iter().find_map(|op| match op {
            DrawOp::Text { y, .. } => Some(*y),
            _ => None,
        });

        assert!(round_y.unwrap() > rect_y.unwrap());
    }
}
