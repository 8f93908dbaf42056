//! Audio-thread block processor that feeds a [`VisualiserHandoff`].
//!
//! [`VisualiserProcessor`] is the per-block entry point a plugin's process
//! callback calls. It passes audio straight through, assembles an
//! input-then-output view of the block in a pre-allocated scratch buffer, and
//! offers that view to the hand-off. Visualisation is best effort; audio is
//! never delayed by it.

use alloc::sync::Arc;

use crate::buffer::SampleBuffer;
use crate::handoff::VisualiserHandoff;

/// Pass-through processor that publishes each block to the bound visualiser.
///
/// The scratch layout for a block with `I` inputs and `O` outputs is
/// channels `0..I` = inputs, channels `I..I + O` = outputs, and the hand-off
/// is told the channel count `I + O`.
#[derive(Debug)]
pub struct VisualiserProcessor {
    handoff: Arc<VisualiserHandoff>,
    scratch: SampleBuffer,
    max_inputs: usize,
    max_outputs: usize,
    sample_rate: f32,
}

impl VisualiserProcessor {
    /// Creates a processor for up to `max_inputs` input and `max_outputs`
    /// output channels. Call [`prepare`](Self::prepare) before processing.
    pub fn new(max_inputs: usize, max_outputs: usize) -> Self {
        Self {
            handoff: Arc::new(VisualiserHandoff::new()),
            scratch: SampleBuffer::with_capacity(0, 0),
            max_inputs,
            max_outputs,
            sample_rate: 48000.0,
        }
    }

    /// Shared handle for the editor layer to bind/unbind its sink.
    pub fn handoff(&self) -> Arc<VisualiserHandoff> {
        Arc::clone(&self.handoff)
    }

    /// Allocates the scratch buffer for blocks of up to `max_block_size` frames.
    ///
    /// Not real-time safe. Called from the host's activate/prepare callback.
    pub fn prepare(&mut self, sample_rate: f32, max_block_size: usize) {
        self.sample_rate = sample_rate;
        self.scratch =
            SampleBuffer::with_capacity(self.max_inputs + self.max_outputs, max_block_size);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            sample_rate,
            max_block_size,
            inputs = self.max_inputs,
            outputs = self.max_outputs,
            "visualiser processor prepared"
        );
    }

    /// Sample rate passed to the last [`prepare`](Self::prepare).
    ///
    /// Sinks only ever see sample buffers, so an editor reads this to turn a
    /// history length in samples into a time span.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Largest block [`process`](Self::process) will visualise.
    pub fn max_block_size(&self) -> usize {
        self.scratch.frame_capacity()
    }

    /// Processes one block (audio thread).
    ///
    /// Each output channel receives the input channel of the same index;
    /// outputs without a matching input are cleared. The block length is the
    /// length of the longest input or output channel; shorter channels are
    /// visualised zero-padded. Blocks larger than the prepared size still
    /// pass audio through but are not visualised.
    pub fn process(&mut self, inputs: &[&[f32]], outputs: &mut [&mut [f32]]) {
        let frames = inputs
            .iter()
            .map(|c| c.len())
            .chain(outputs.iter().map(|c| c.len()))
            .max()
            .unwrap_or(0);

        for (ch, out) in outputs.iter_mut().enumerate() {
            match inputs.get(ch) {
                Some(input) => {
                    let n = out.len().min(input.len());
                    out[..n].copy_from_slice(&input[..n]);
                    out[n..].fill(0.0);
                }
                None => out.fill(0.0),
            }
        }

        let num_inputs = inputs.len();
        let total = num_inputs + outputs.len();
        if !self.scratch.set_size(total, frames) {
            return;
        }

        for (ch, input) in inputs.iter().enumerate() {
            self.scratch.copy_into_channel(ch, input);
        }
        for (ch, output) in outputs.iter().enumerate() {
            self.scratch.copy_into_channel(num_inputs + ch, output);
        }

        self.handoff.try_push_buffer(&self.scratch, total);
    }
}
