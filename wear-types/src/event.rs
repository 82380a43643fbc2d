//! Change events and per-field payload extraction.

use serde::{Deserialize, Serialize};

use crate::{paths, AssetToken, DataMap, SyncError};

/// What happened to the data item at a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    /// A new item appeared at the path.
    Added,
    /// The item at the path was written with a new value.
    Changed,
    /// The item at the path was removed.
    Deleted,
}

/// A single change event delivered by the transport.
///
/// Immutable once produced. The transport delivers events in batches; each
/// event is filtered by kind and path before anything consumes its payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncEvent {
    /// The channel path the write landed on.
    pub path: String,
    /// What kind of change this is.
    pub kind: EventKind,
    /// The written payload.
    pub payload: DataMap,
}

impl SyncEvent {
    /// Construct a `Changed` event.
    pub fn changed(path: &str, payload: DataMap) -> Self {
        Self {
            path: path.to_string(),
            kind: EventKind::Changed,
            payload,
        }
    }

    /// Whether this event is a `Changed` write on exactly the given path.
    pub fn is_changed_on(&self, path: &str) -> bool {
        self.kind == EventKind::Changed && self.path == path
    }
}

/// The weather fields carried by one payload-path event.
///
/// Every field is optional: the merge is per field, never all-or-nothing, so
/// a payload missing `low` must not clobber a previously known low.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WeatherUpdate {
    /// High temperature, if present.
    pub high: Option<f64>,
    /// Low temperature, if present.
    pub low: Option<f64>,
    /// Icon asset reference, if present.
    pub icon: Option<AssetToken>,
}

impl WeatherUpdate {
    /// Extract weather fields from a payload-path event.
    ///
    /// Returns `None` for events that are not `Changed` writes on
    /// [`paths::WEATHER_PATH`] - those are no-ops, not errors. Malformed
    /// fields are handled per field: a wrong-typed field is dropped from the
    /// update (so its previous value survives) and reported alongside, while
    /// correctly-typed siblings in the same payload still apply.
    pub fn from_event(event: &SyncEvent) -> Option<(Self, Vec<SyncError>)> {
        if !event.is_changed_on(paths::WEATHER_PATH) {
            return None;
        }
        Some(Self::from_map(&event.payload))
    }

    /// Extract weather fields from a payload map, field by field.
    ///
    /// Wrong-typed fields come back as errors; they never poison the rest of
    /// the payload.
    pub fn from_map(map: &DataMap) -> (Self, Vec<SyncError>) {
        let mut errors = Vec::new();
        let mut take = |r: Result<Option<f64>, SyncError>| match r {
            Ok(v) => v,
            Err(e) => {
                errors.push(e);
                None
            }
        };
        let high = take(map.get_f64(paths::FIELD_HIGH));
        let low = take(map.get_f64(paths::FIELD_LOW));
        let icon = match map.get_asset(paths::FIELD_ICON) {
            Ok(v) => v,
            Err(e) => {
                errors.push(e);
                None
            }
        };
        (Self { high, low, icon }, errors)
    }

    /// Whether the update carries anything at all.
    pub fn is_empty(&self) -> bool {
        self.high.is_none() && self.low.is_none() && self.icon.is_none()
    }
}
