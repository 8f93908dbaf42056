//! Owned copy of a level history, safe to paint from without holding locks.

use crate::level::LevelRange;

/// Per-channel level traces, each ordered oldest to newest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScopeSnapshot {
    channels: Vec<Vec<LevelRange>>,
}

impl ScopeSnapshot {
    pub(crate) fn new(channels: Vec<Vec<LevelRange>>) -> Self {
        Self { channels }
    }

    /// Number of channels captured.
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Level trace for `channel`, or an empty slice if out of range.
    pub fn channel(&self, channel: usize) -> &[LevelRange] {
        self.channels.get(channel).map_or(&[], Vec::as_slice)
    }

    /// Most recently committed level of `channel`.
    pub fn latest(&self, channel: usize) -> Option<LevelRange> {
        self.channel(channel).last().copied()
    }

    /// Largest absolute excursion anywhere in `channel`'s trace.
    pub fn peak(&self, channel: usize) -> f32 {
        self.channel(channel)
            .iter()
            .map(LevelRange::peak)
            .fold(0.0, f32::max)
    }

    /// True if every captured level is silence.
    pub fn is_silent(&self) -> bool {
        self.channels
            .iter()
            .flatten()
            .all(|level| level.peak() == 0.0)
    }
}
