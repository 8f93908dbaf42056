//! Sink hand-off between the audio thread and the UI thread.
//!
//! [`VisualiserHandoff`] holds an optional visualiser sink behind a
//! [`SpinLock`]. The two sides use it very differently:
//!
//! - **UI thread**: [`bind`](VisualiserHandoff::bind) /
//!   [`unbind`](VisualiserHandoff::unbind) / [`attach`](VisualiserHandoff::attach)
//!   take the lock with the blocking `lock()`. This path is rare (editor
//!   open/close) and may spin for the few instructions the audio thread holds
//!   the lock.
//! - **Audio thread**: [`try_push_buffer`](VisualiserHandoff::try_push_buffer)
//!   makes exactly one acquire attempt. If it loses, the block is not
//!   visualised and the call returns at once. No retry, no queue, no error.
//!
//! A block therefore sees either the old sink or the new one in full, never a
//! torn reference; which one it sees when the two race is unspecified.
//!
//! # Sink lifetime
//!
//! Sinks are held as `Arc<dyn VisualiserSink>`. The audio thread only borrows
//! the stored handle inside the critical section and never clones it, so it
//! can never become the last owner. A replaced sink is released by `bind`
//! after the lock is dropped, on the UI thread.

use alloc::sync::Arc;
use core::fmt;
use core::sync::atomic::{AtomicUsize, Ordering};

use crate::buffer::SampleBuffer;
use crate::sink::VisualiserSink;
use crate::sync::SpinLock;

/// State protected by the hand-off lock.
struct HandoffSlot {
    sink: Option<Arc<dyn VisualiserSink>>,
    /// Channel count of the last block that won the lock. `None` until the
    /// first block and again after every bind, so a fresh sink is always told.
    last_channel_count: Option<usize>,
}

/// Nullable visualiser sink shared between an audio processor and its editor.
///
/// Owned by the audio processor; the editor layer reaches it through an `Arc`
/// handle. There is no global instance.
pub struct VisualiserHandoff {
    slot: SpinLock<HandoffSlot>,
    forwarded_blocks: AtomicUsize,
    skipped_blocks: AtomicUsize,
}

impl VisualiserHandoff {
    /// Creates an unbound hand-off.
    pub fn new() -> Self {
        Self {
            slot: SpinLock::new(HandoffSlot {
                sink: None,
                last_channel_count: None,
            }),
            forwarded_blocks: AtomicUsize::new(0),
            skipped_blocks: AtomicUsize::new(0),
        }
    }

    // -------------------------------------------------------------------------
    // UI thread
    // -------------------------------------------------------------------------

    /// Replaces the bound sink (UI thread).
    ///
    /// `None` unbinds. Must be called with `None` (or via a dropped
    /// [`SinkBinding`]) before an editor is torn down. Binding `None` while
    /// already unbound is a no-op.
    pub fn bind(&self, sink: Option<Arc<dyn VisualiserSink>>) {
        #[cfg(feature = "tracing")]
        let binding = sink.is_some();
        let previous = {
            let mut slot = self.slot.lock();
            slot.last_channel_count = None;
            core::mem::replace(&mut slot.sink, sink)
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            bound = binding,
            replaced = previous.is_some(),
            "visualiser sink rebound"
        );

        // Released here, outside the critical section, on the calling thread.
        drop(previous);
    }

    /// Detaches whatever sink is bound (UI thread).
    pub fn unbind(&self) {
        self.bind(None);
    }

    /// Binds `sink` and returns a guard that unbinds it on drop (UI thread).
    ///
    /// Hold the returned [`SinkBinding`] for as long as the editor that owns
    /// the sink is alive.
    pub fn attach<S>(self: &Arc<Self>, sink: Arc<S>) -> SinkBinding
    where
        S: VisualiserSink + 'static,
    {
        let sink: Arc<dyn VisualiserSink> = sink;
        self.bind(Some(Arc::clone(&sink)));
        SinkBinding {
            handoff: Arc::clone(self),
            sink,
        }
    }

    /// Unbinds `sink` only if it is still the bound sink.
    fn release(&self, sink: &Arc<dyn VisualiserSink>) {
        let previous = {
            let mut slot = self.slot.lock();
            let is_current = slot
                .sink
                .as_ref()
                .is_some_and(|current| same_sink(current, sink));
            if !is_current {
                return;
            }
            slot.last_channel_count = None;
            slot.sink.take()
        };

        #[cfg(feature = "tracing")]
        tracing::debug!("visualiser binding released");

        drop(previous);
    }

    /// Whether a sink is currently bound (UI thread; takes the lock).
    pub fn is_bound(&self) -> bool {
        self.slot.lock().sink.is_some()
    }

    // -------------------------------------------------------------------------
    // Audio thread
    // -------------------------------------------------------------------------

    /// Forwards a processed block to the bound sink, if the lock is free.
    ///
    /// Real-time safe: one compare-exchange, no spinning, no allocation. On
    /// contention the block is dropped for visualisation purposes only.
    ///
    /// When `channel_count` differs from the previous winning block, the sink
    /// (if any) receives `set_num_channels(channel_count)` before the buffer.
    /// Without a sink, only the remembered channel count is updated.
    #[inline]
    pub fn try_push_buffer(&self, buffer: &SampleBuffer, channel_count: usize) {
        let Some(mut slot) = self.slot.try_lock() else {
            self.skipped_blocks.fetch_add(1, Ordering::Relaxed);
            return;
        };

        let channels_changed = slot.last_channel_count != Some(channel_count);
        slot.last_channel_count = Some(channel_count);

        if let Some(sink) = slot.sink.as_deref() {
            if channels_changed {
                sink.set_num_channels(channel_count);
            }
            sink.push_buffer(buffer);
            self.forwarded_blocks.fetch_add(1, Ordering::Relaxed);
        }
    }

    // -------------------------------------------------------------------------
    // Diagnostics
    // -------------------------------------------------------------------------

    /// Blocks delivered to a sink since creation.
    pub fn forwarded_blocks(&self) -> usize {
        self.forwarded_blocks.load(Ordering::Relaxed)
    }

    /// Blocks skipped because the lock was contended.
    pub fn skipped_blocks(&self) -> usize {
        self.skipped_blocks.load(Ordering::Relaxed)
    }
}

impl Default for VisualiserHandoff {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for VisualiserHandoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisualiserHandoff")
            .field("locked", &self.slot.is_locked())
            .field("forwarded_blocks", &self.forwarded_blocks())
            .field("skipped_blocks", &self.skipped_blocks())
            .finish_non_exhaustive()
    }
}

/// Compares sink identity by data pointer (vtable pointers are not unique).
fn same_sink(a: &Arc<dyn VisualiserSink>, b: &Arc<dyn VisualiserSink>) -> bool {
    core::ptr::eq(Arc::as_ptr(a).cast::<()>(), Arc::as_ptr(b).cast::<()>())
}

/// Keeps a sink bound to a [`VisualiserHandoff`] while alive.
///
/// Created by [`VisualiserHandoff::attach`]. Dropping it unbinds the sink,
/// unless another sink has been bound in the meantime, in which case the
/// newer binding is left alone.
pub struct SinkBinding {
    handoff: Arc<VisualiserHandoff>,
    sink: Arc<dyn VisualiserSink>,
}

impl SinkBinding {
    /// The sink this binding keeps attached.
    pub fn sink(&self) -> &Arc<dyn VisualiserSink> {
        &self.sink
    }

    /// The hand-off the sink is attached to.
    pub fn handoff(&self) -> &Arc<VisualiserHandoff> {
        &self.handoff
    }
}

impl Drop for SinkBinding {
    fn drop(&mut self) {
        self.handoff.release(&self.sink);
    }
}

impl fmt::Debug for SinkBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SinkBinding")
            .field("handoff", &self.handoff)
            .finish_non_exhaustive()
    }
}
