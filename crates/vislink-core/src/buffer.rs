//! Pre-allocated planar multi-channel sample buffer.
//!
//! [`SampleBuffer`] reserves storage for a fixed number of channels and frames
//! up front. [`SampleBuffer::set_size`] only changes the visible extent, so
//! the audio thread can reshape a buffer per block without allocating.

use alloc::vec;
use alloc::vec::Vec;

/// Planar `f32` buffer with fixed channel and frame capacity.
///
/// Channel `i` occupies `data[i * frame_capacity..][..num_frames]`, so
/// shrinking or growing the frame count never moves samples between channels.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    data: Vec<f32>,
    channel_capacity: usize,
    frame_capacity: usize,
    num_channels: usize,
    num_frames: usize,
}

impl SampleBuffer {
    /// Creates a zeroed buffer sized (and with capacity for) `num_channels` x `num_frames`.
    pub fn new(num_channels: usize, num_frames: usize) -> Self {
        Self::with_capacity(num_channels, num_frames)
    }

    /// Creates a zeroed buffer with the given capacity, initially spanning all of it.
    pub fn with_capacity(channel_capacity: usize, frame_capacity: usize) -> Self {
        Self {
            data: vec![0.0; channel_capacity * frame_capacity],
            channel_capacity,
            frame_capacity,
            num_channels: channel_capacity,
            num_frames: frame_capacity,
        }
    }

    /// Builds a buffer from per-channel sample slices.
    ///
    /// The frame count is the length of the longest channel; shorter channels
    /// are zero-padded.
    pub fn from_channels(channels: &[&[f32]]) -> Self {
        let frames = channels.iter().map(|c| c.len()).max().unwrap_or(0);
        let mut buffer = Self::with_capacity(channels.len(), frames);
        for (i, samples) in channels.iter().enumerate() {
            buffer.channel_mut(i)[..samples.len()].copy_from_slice(samples);
        }
        buffer
    }

    /// Reshapes the visible extent of the buffer.
    ///
    /// Returns `false` and leaves the buffer unchanged if the request exceeds
    /// the capacity. Never allocates. Sample contents are not cleared.
    #[inline]
    pub fn set_size(&mut self, num_channels: usize, num_frames: usize) -> bool {
        if num_channels > self.channel_capacity || num_frames > self.frame_capacity {
            return false;
        }
        self.num_channels = num_channels;
        self.num_frames = num_frames;
        true
    }

    /// Number of visible channels.
    #[inline]
    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    /// Number of visible frames per channel.
    #[inline]
    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    /// Maximum number of channels this buffer can hold.
    pub fn channel_capacity(&self) -> usize {
        self.channel_capacity
    }

    /// Maximum number of frames per channel this buffer can hold.
    pub fn frame_capacity(&self) -> usize {
        self.frame_capacity
    }

    /// Returns true if there are no visible samples.
    pub fn is_empty(&self) -> bool {
        self.num_channels == 0 || self.num_frames == 0
    }

    /// Samples of a visible channel.
    ///
    /// # Panics
    ///
    /// Panics if `index >= num_channels()`.
    #[inline]
    pub fn channel(&self, index: usize) -> &[f32] {
        assert!(index < self.num_channels, "channel {index} out of range");
        let start = index * self.frame_capacity;
        &self.data[start..start + self.num_frames]
    }

    /// Mutable samples of a visible channel.
    ///
    /// # Panics
    ///
    /// Panics if `index >= num_channels()`.
    #[inline]
    pub fn channel_mut(&mut self, index: usize) -> &mut [f32] {
        assert!(index < self.num_channels, "channel {index} out of range");
        let start = index * self.frame_capacity;
        &mut self.data[start..start + self.num_frames]
    }

    /// Iterates the visible channels in order.
    pub fn channels(&self) -> impl Iterator<Item = &[f32]> + '_ {
        (0..self.num_channels).map(move |i| self.channel(i))
    }

    /// Copies `source` into the start of a channel, truncating to the visible frame count.
    ///
    /// Visible frames past `source.len()` are zeroed.
    #[inline]
    pub fn copy_into_channel(&mut self, index: usize, source: &[f32]) {
        let dst = self.channel_mut(index);
        let n = dst.len().min(source.len());
        dst[..n].copy_from_slice(&source[..n]);
        dst[n..].fill(0.0);
    }

    /// Zeroes the visible samples of every channel.
    pub fn clear(&mut self) {
        for i in 0..self.num_channels {
            self.channel_mut(i).fill(0.0);
        }
    }
}
