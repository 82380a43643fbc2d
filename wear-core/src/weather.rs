//! Last-known weather values on the wearable.

use wear_types::WeatherUpdate;

/// The last-known weather values, exclusively owned by the display engine.
///
/// Generic over the renderer's image handle type so this crate stays free of
/// any graphics dependency. Temperatures default to 0.0 and render as-is
/// until real data arrives; `high >= low` is deliberately not enforced (peer
/// data is trusted as-is).
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot<I> {
    /// High temperature.
    pub high: f64,
    /// Low temperature.
    pub low: f64,
    /// Decoded icon image, if one has been fetched.
    pub icon: Option<I>,
    /// Milliseconds timestamp of the last applied update, if any.
    pub last_updated: Option<u64>,
}

impl<I> WeatherSnapshot<I> {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self {
            high: 0.0,
            low: 0.0,
            icon: None,
            last_updated: None,
        }
    }

    /// Merge an update into the snapshot, field by field.
    ///
    /// Absent fields keep their previous values (last-write-wins per field,
    /// never whole-record replace). Returns whether a redraw is warranted.
    /// The icon reference is not consumed here - resolving it is a bounded
    /// fetch that must run off the redraw path; the decoded image lands via
    /// [`set_icon`](Self::set_icon) once the worker completes.
    pub fn apply(&mut self, update: &WeatherUpdate, now_ms: u64) -> bool {
        if update.is_empty() {
            return false;
        }
        if let Some(high) = update.high {
            self.high = high;
        }
        if let Some(low) = update.low {
            self.low = low;
        }
        self.last_updated = Some(now_ms);
        true
    }

    /// Install a freshly decoded icon image.
    ///
    /// A fetch failure simply never calls this, leaving the prior image in
    /// place rather than clearing it.
    pub fn set_icon(&mut self, image: I) {
        self.icon = Some(image);
    }
}

impl<I> Default for WeatherSnapshot<I> {
    fn default() -> Self {
        Self::new()
    }
}
