use bevy::prelude::*;

/// Integer range selector driving which snapshot is shown.
///
/// Starts unconfigured at `[0, 0]`; inputs are ignored until the viewer has
/// finished loading and called [`SnapshotSlider::configure`].
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnapshotSlider {
    pub min: usize,
    pub max: usize,
    pub value: usize,
    pub configured: bool,
}

impl SnapshotSlider {
    /// Range `[0, count - 1]` with value 0. A zero count leaves the slider unconfigured.
    pub fn configure(&mut self, count: usize) {
        *self = Self {
            min: 0,
            max: count.saturating_sub(1),
            value: 0,
            configured: count > 0,
        };
    }

    /// Index selected by a raw input value, clamped to the range.
    pub fn accept(&self, raw: i64) -> Option<usize> {
        if !self.configured {
            return None;
        }
        let clamped = raw.clamp(self.min as i64, self.max as i64);
        Some(clamped as usize)
    }
}

/// Where a slider input came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliderInputSource {
    /// Range input on the host page.
    Dom,
    /// In-app overlay buttons.
    Overlay,
    Keyboard,
    /// `set_snapshot` request from the host.
    Rpc,
}

/// Raw value from any slider surface. The only way to change the shown snapshot.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliderInput {
    pub raw: i64,
    pub source: SliderInputSource,
}

impl SliderInput {
    pub fn new(raw: i64, source: SliderInputSource) -> Self {
        Self { raw, source }
    }
}
