//! Frame policy and layout math for the watch face.
//!
//! Everything here is arithmetic over plain values: the engine feeds in the
//! wall clock and measured text widths, and gets back what to draw and where.
//! No canvas, no timers.

/// Redraw period in interactive mode. One tick per second, since seconds are
/// displayed in interactive mode.
pub const TICK_PERIOD_MS: u64 = 1000;

/// Interactive vs low-power ambient display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Full-fidelity rendering, per-second ticks.
    Interactive,
    /// Low-power rendering: flat black background, no seconds, static
    /// separator.
    Ambient,
}

/// Paint configuration for the current frame, recomputed on system events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameConfig {
    /// Current display mode.
    pub mode: DisplayMode,
    /// Whether the display supports fewer bits per color in ambient mode.
    /// When true, anti-aliasing is disabled in ambient.
    pub low_bit_ambient: bool,
    /// Round vs rectangular device shape.
    pub round: bool,
}

impl FrameConfig {
    /// Interactive, full-bit, rectangular.
    pub fn new() -> Self {
        Self {
            mode: DisplayMode::Interactive,
            low_bit_ambient: false,
            round: false,
        }
    }

    /// Whether this frame is ambient.
    pub fn is_ambient(&self) -> bool {
        self.mode == DisplayMode::Ambient
    }

    /// Whether text is anti-aliased in this frame.
    pub fn antialias(&self) -> bool {
        !(self.is_ambient() && self.low_bit_ambient)
    }

    /// Whether the seconds field is drawn.
    pub fn show_seconds(&self) -> bool {
        !self.is_ambient()
    }

    /// Whether the time separator is drawn this frame.
    ///
    /// Blinks on for the first half of each second in interactive mode.
    /// In ambient it renders statically - blinking on a power-constrained
    /// display hurts legibility.
    pub fn separator_visible(&self, now_ms: u64) -> bool {
        self.is_ambient() || now_ms % TICK_PERIOD_MS < TICK_PERIOD_MS / 2
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Which paint a segment uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentStyle {
    /// Bold hour digits.
    Hour,
    /// Minute/second digits and separators.
    Time,
}

/// One measured piece of the assembled time string.
///
/// Hidden segments still occupy their measured width, so the assembled
/// string keeps one total width whether or not the separator is mid-blink -
/// centering from that total never drifts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// The text to measure (and draw when visible).
    pub text: String,
    /// Paint selection.
    pub style: SegmentStyle,
    /// Whether the segment is drawn this frame.
    pub visible: bool,
}

impl Segment {
    fn shown(text: String, style: SegmentStyle) -> Self {
        Self {
            text,
            style,
            visible: true,
        }
    }
}

/// Assemble the time line for one frame.
///
/// Hour and minute always; seconds only in interactive mode. Separators share
/// one blink phase and are width-reserving when hidden.
pub fn time_segments(hour: u8, minute: u8, second: u8, config: &FrameConfig, now_ms: u64) -> Vec<Segment> {
    let separator = config.separator_visible(now_ms);
    let mut segments = vec![
        Segment::shown(two_digit(hour), SegmentStyle::Hour),
        Segment {
            text: ":".to_string(),
            style: SegmentStyle::Time,
            visible: separator,
        },
        Segment::shown(two_digit(minute), SegmentStyle::Time),
    ];
    if config.show_seconds() {
        segments.push(Segment {
            text: ":".to_string(),
            style: SegmentStyle::Time,
            visible: separator,
        });
        segments.push(Segment::shown(two_digit(second), SegmentStyle::Time));
    }
    segments
}

/// Zero-padded two-digit field.
pub fn two_digit(value: u8) -> String {
    format!("{value:02}")
}

/// Nearest-integer temperature label: 58.9 renders as "59".
pub fn temp_label(temperature: f64) -> String {
    format!("{temperature:.0}")
}

/// Start offset that centers a run of total width `total` on a canvas of
/// width `canvas`.
///
/// Plain midpoint arithmetic; an odd leftover splits evenly as a half pixel
/// rather than rounding ad hoc per call site.
pub fn centered_offset(canvas: f32, total: f32) -> f32 {
    (canvas - total) / 2.0
}

/// Endpoints of the divider line: one third of the canvas width, centered.
pub fn divider_span(canvas: f32) -> (f32, f32) {
    let width = canvas / 3.0;
    let start = centered_offset(canvas, width);
    (start, start + width)
}

/// Delay until the next whole-second boundary.
///
/// Scheduling at the boundary (rather than a fixed delay) keeps the seconds
/// digit locked to wall-clock time regardless of processing jitter. Never
/// zero: a tick landing exactly on a boundary waits a full period.
pub fn next_tick_delay_ms(now_ms: u64) -> u64 {
    TICK_PERIOD_MS - now_ms % TICK_PERIOD_MS
}

/// Whether the per-second redraw timer should run at all.
///
/// Only while visible and interactive; ambient frames are redrawn by the
/// platform's own minute tick, not by us.
pub fn timer_should_run(visible: bool, mode: DisplayMode) -> bool {
    visible && mode == DisplayMode::Interactive
}

/// Whether periodic redraw ticks are scheduled, and for when.
///
/// Recreated on every visibility or ambient transition; the lifecycle
/// controller is the only writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimerState {
    /// Whether ticks are scheduled.
    pub running: bool,
    /// Absolute deadline of the next tick, when running.
    pub next_deadline_ms: Option<u64>,
}

impl TimerState {
    /// Re-evaluate the timer after a visibility or mode transition.
    pub fn update(visible: bool, mode: DisplayMode, now_ms: u64) -> Self {
        if timer_should_run(visible, mode) {
            Self {
                running: true,
                next_deadline_ms: Some(now_ms + next_tick_delay_ms(now_ms)),
            }
        } else {
            Self {
                running: false,
                next_deadline_ms: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interactive() -> FrameConfig {
        FrameConfig::new()
    }

    fn ambient(low_bit: bool) -> FrameConfig {
        FrameConfig {
            mode: DisplayMode::Ambient,
            low_bit_ambient: low_bit,
            round: false,
        }
    }

    // ===========================================
    // Tick scheduling
    // ===========================================

    #[test]
    fn next_tick_lands_on_second_boundary() {
        assert_eq!(next_tick_delay_ms(10_300), 700);
        assert_eq!(next_tick_delay_ms(999), 1);
    }

    #[test]
    fn tick_on_exact_boundary_waits_full_period() {
        // Never a 0-delay reschedule.
        assert_eq!(next_tick_delay_ms(10_000), 1000);
        assert_eq!(next_tick_delay_ms(0), 1000);
    }

    #[test]
    fn timer_runs_only_visible_and_interactive() {
        assert!(timer_should_run(true, DisplayMode::Interactive));
        assert!(!timer_should_run(true, DisplayMode::Ambient));
        assert!(!timer_should_run(false, DisplayMode::Interactive));
        assert!(!timer_should_run(false, DisplayMode::Ambient));
    }

    #[test]
    fn timer_state_tracks_deadline() {
        let state = TimerState::update(true, DisplayMode::Interactive, 10_300);
        assert!(state.running);
        assert_eq!(state.next_deadline_ms, Some(11_000));

        let state = TimerState::update(true, DisplayMode::Ambient, 10_300);
        assert!(!state.running);
        assert_eq!(state.next_deadline_ms, None);
    }

    // ===========================================
    // Separator and mode policy
    // ===========================================

    #[test]
    fn separator_blinks_first_half_of_each_second() {
        let config = interactive();
        assert!(config.separator_visible(10_000));
        assert!(config.separator_visible(10_499));
        assert!(!config.separator_visible(10_500));
        assert!(!config.separator_visible(10_999));
    }

    #[test]
    fn separator_is_static_in_ambient() {
        let config = ambient(false);
        assert!(config.separator_visible(10_750));
        assert!(config.separator_visible(10_250));
    }

    #[test]
    fn antialias_disabled_only_for_low_bit_ambient() {
        assert!(interactive().antialias());
        assert!(ambient(false).antialias());
        assert!(!ambient(true).antialias());
    }

    // ===========================================
    // Time line assembly
    // ===========================================

    #[test]
    fn interactive_frame_has_seconds() {
        let segments = time_segments(7, 5, 9, &interactive(), 10_100);
        let texts: Vec<&str> = segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["07", ":", "05", ":", "09"]);
        assert!(segments.iter().all(|s| s.visible));
        assert_eq!(segments[0].style, SegmentStyle::Hour);
        assert_eq!(segments[2].style, SegmentStyle::Time);
    }

    #[test]
    fn ambient_frame_omits_seconds() {
        let segments = time_segments(23, 59, 30, &ambient(false), 10_750);
        let texts: Vec<&str> = segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["23", ":", "59"]);
        // Static separator in ambient, even in the second half of the second.
        assert!(segments[1].visible);
    }

    #[test]
    fn hidden_separator_still_reserves_width() {
        let segments = time_segments(12, 30, 45, &interactive(), 10_600);
        let separators: Vec<&Segment> =
            segments.iter().filter(|s| s.text == ":").collect();
        assert_eq!(separators.len(), 2);
        // Both share one blink phase and stay in the layout while hidden.
        assert!(separators.iter().all(|s| !s.visible));
        assert_eq!(segments.len(), 5);
    }

    #[test]
    fn two_digit_pads() {
        assert_eq!(two_digit(0), "00");
        assert_eq!(two_digit(7), "07");
        assert_eq!(two_digit(23), "23");
    }

    // ===========================================
    // Temperatures and centering
    // ===========================================

    #[test]
    fn temperatures_round_to_nearest_integer() {
        assert_eq!(temp_label(72.4), "72");
        assert_eq!(temp_label(58.9), "59");
        assert_eq!(temp_label(0.0), "0");
        assert_eq!(temp_label(-3.6), "-4");
    }

    #[test]
    fn centering_even_and_odd_widths() {
        // Even leftover
        assert_eq!(centered_offset(100.0, 30.0), 35.0);
        // Odd leftover splits as a half pixel, consistently
        assert_eq!(centered_offset(101.0, 30.0), 35.5);
        assert_eq!(centered_offset(100.0, 31.0), 34.5);
    }

    #[test]
    fn divider_is_a_centered_third() {
        let (start, end) = divider_span(300.0);
        assert_eq!(end - start, 100.0);
        assert_eq!(start, 100.0);
        assert_eq!(end, 200.0);
    }
}
