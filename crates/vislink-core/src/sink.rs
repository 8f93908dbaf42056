//! The capability contract a visualiser must offer to receive audio.

use crate::buffer::SampleBuffer;

/// Anything that can display sample buffers pushed from the audio thread.
///
/// Both methods are invoked on the real-time thread while the hand-off's lock
/// is held. Implementations must therefore return quickly, must not block on
/// locks the UI thread may hold for long, and must not allocate once warmed up.
/// The sink is responsible for its own internal synchronisation against
/// whatever the UI thread does with it concurrently (painting, clearing).
pub trait VisualiserSink: Send + Sync {
    /// Informs the sink how many channels subsequent buffers will carry.
    ///
    /// Called before the first buffer a sink receives and again whenever the
    /// channel count changes.
    fn set_num_channels(&self, num_channels: usize);

    /// Delivers one freshly processed block.
    fn push_buffer(&self, buffer: &SampleBuffer);
}
