//! Scrolling per-channel level history fed from the audio thread.

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use vislink_core::{SampleBuffer, VisualiserSink};

use crate::level::LevelRange;
use crate::snapshot::ScopeSnapshot;

/// Hard upper bound on channels a history can be configured for.
pub const MAX_CHANNELS: usize = 64;

/// Construction parameters for a [`LevelHistory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistorySettings {
    /// Number of level slots kept per channel.
    pub buffer_size: usize,
    /// Samples reduced into each level slot.
    pub samples_per_block: usize,
    /// Channels storage is reserved for; higher counts are clamped.
    pub max_channels: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            buffer_size: 512,
            samples_per_block: 256,
            max_channels: 8,
        }
    }
}

/// Ring of committed levels plus the partially accumulated slot.
#[derive(Debug, Clone)]
struct ChannelHistory {
    levels: Vec<LevelRange>,
    /// Slot written next; also the oldest slot once the ring has wrapped.
    next: usize,
    accumulator: Option<LevelRange>,
    accumulated: usize,
}

impl ChannelHistory {
    fn new(buffer_size: usize) -> Self {
        Self {
            levels: vec![LevelRange::default(); buffer_size],
            next: 0,
            accumulator: None,
            accumulated: 0,
        }
    }

    fn push_samples(&mut self, samples: &[f32], samples_per_block: usize) {
        for &sample in samples {
            self.accumulator = Some(match self.accumulator {
                Some(range) => range.union_with(sample),
                None => LevelRange::from_sample(sample),
            });
            self.accumulated += 1;
            if self.accumulated >= samples_per_block {
                self.commit();
            }
        }
    }

    fn commit(&mut self) {
        if let Some(range) = self.accumulator.take() {
            self.levels[self.next] = range;
            self.next = (self.next + 1) % self.levels.len();
        }
        self.accumulated = 0;
    }

    fn clear(&mut self) {
        self.levels.fill(LevelRange::default());
        self.next = 0;
        self.accumulator = None;
        self.accumulated = 0;
    }

    fn resize(&mut self, buffer_size: usize) {
        self.levels = vec![LevelRange::default(); buffer_size];
        self.next = 0;
        self.accumulator = None;
        self.accumulated = 0;
    }

    /// Levels from oldest to newest.
    fn ordered(&self) -> Vec<LevelRange> {
        let mut out = Vec::with_capacity(self.levels.len());
        out.extend_from_slice(&self.levels[self.next..]);
        out.extend_from_slice(&self.levels[..self.next]);
        out
    }
}

#[derive(Debug)]
struct HistoryState {
    channels: Vec<ChannelHistory>,
    samples_per_block: usize,
    /// Channel count applied by the last push.
    active: usize,
}

impl HistoryState {
    /// Clears channels that were inactive and are about to be shown.
    fn activate(&mut self, num_channels: usize) {
        if num_channels > self.active {
            for channel in &mut self.channels[self.active..num_channels] {
                channel.clear();
            }
        }
        self.active = num_channels;
    }
}

/// Oscilloscope-style level history for a handful of channels.
///
/// # Thread Safety
///
/// - **Channel count**: `AtomicUsize`, written by the audio thread via
///   [`set_num_channels`](VisualiserSink::set_num_channels). Never allocates.
/// - **History**: `Mutex`. The audio thread only ever `try_lock`s it and
///   drops the block on contention; the UI thread locks it to read or reset.
/// - **Dropped blocks**: `AtomicUsize` counter of contended pushes.
#[derive(Debug)]
pub struct LevelHistory {
    state: Mutex<HistoryState>,
    num_channels: AtomicUsize,
    max_channels: usize,
    dropped_blocks: AtomicUsize,
}

impl LevelHistory {
    /// Creates a history with storage for `settings.max_channels` channels.
    ///
    /// Zero sizes are raised to 1 and `max_channels` is capped at [`MAX_CHANNELS`].
    pub fn new(settings: HistorySettings) -> Self {
        let buffer_size = settings.buffer_size.max(1);
        let max_channels = settings.max_channels.clamp(1, MAX_CHANNELS);
        Self {
            state: Mutex::new(HistoryState {
                channels: vec![ChannelHistory::new(buffer_size); max_channels],
                samples_per_block: settings.samples_per_block.max(1),
                active: 0,
            }),
            num_channels: AtomicUsize::new(0),
            max_channels,
            dropped_blocks: AtomicUsize::new(0),
        }
    }

    // -------------------------------------------------------------------------
    // UI thread
    // -------------------------------------------------------------------------

    /// Copies the visible history for painting (UI thread).
    ///
    /// Channels that became active since the last push read as silence.
    pub fn snapshot(&self) -> ScopeSnapshot {
        let mut state = self.state.lock();
        state.activate(self.num_channels());
        let channels = state.channels[..state.active]
            .iter()
            .map(ChannelHistory::ordered)
            .collect();
        ScopeSnapshot::new(channels)
    }

    /// Resets every channel to silence (UI thread).
    ///
    /// Called when an editor opens so stale data from a previous session is
    /// not shown.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        for channel in &mut state.channels {
            channel.clear();
        }
        tracing::debug!("level history cleared");
    }

    /// Changes the number of level slots per channel (UI thread; allocates).
    pub fn set_buffer_size(&self, buffer_size: usize) {
        let buffer_size = buffer_size.max(1);
        let mut state = self.state.lock();
        for channel in &mut state.channels {
            channel.resize(buffer_size);
        }
        tracing::debug!(buffer_size, "level history resized");
    }

    /// Changes how many samples are reduced into one slot (UI thread).
    pub fn set_samples_per_block(&self, samples_per_block: usize) {
        let samples_per_block = samples_per_block.max(1);
        let mut state = self.state.lock();
        state.samples_per_block = samples_per_block;
        tracing::debug!(samples_per_block, "level history block size changed");
    }

    /// Level slots kept per channel.
    pub fn buffer_size(&self) -> usize {
        self.state.lock().channels[0].levels.len()
    }

    /// Samples reduced into one slot.
    pub fn samples_per_block(&self) -> usize {
        self.state.lock().samples_per_block
    }

    // -------------------------------------------------------------------------
    // Any thread
    // -------------------------------------------------------------------------

    /// Channels currently being displayed.
    pub fn num_channels(&self) -> usize {
        self.num_channels.load(Ordering::Relaxed)
    }

    /// Channels storage was reserved for.
    pub fn max_channels(&self) -> usize {
        self.max_channels
    }

    /// Blocks discarded because the UI held the history lock.
    pub fn dropped_blocks(&self) -> usize {
        self.dropped_blocks.load(Ordering::Relaxed)
    }
}

impl Default for LevelHistory {
    fn default() -> Self {
        Self::new(HistorySettings::default())
    }
}

impl VisualiserSink for LevelHistory {
    fn set_num_channels(&self, num_channels: usize) {
        self.num_channels
            .store(num_channels.min(self.max_channels), Ordering::Relaxed);
    }

    fn push_buffer(&self, buffer: &SampleBuffer) {
        let Some(mut guard) = self.state.try_lock() else {
            self.dropped_blocks.fetch_add(1, Ordering::Relaxed);
            return;
        };
        let state = &mut *guard;

        state.activate(self.num_channels());
        let samples_per_block = state.samples_per_block;
        for (history, samples) in state.channels[..state.active]
            .iter_mut()
            .zip(buffer.channels())
        {
            history.push_samples(samples, samples_per_block);
        }
    }
}
