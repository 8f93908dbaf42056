//! Vislink Core - real-time safe visualiser hand-off
//!
//! This crate moves freshly rendered audio blocks from a real-time audio
//! thread into a visualiser that the UI thread may attach, replace, or tear
//! down at any moment (typically when a plugin editor opens or closes).
//!
//! # Core Abstractions
//!
//! - [`SpinLock`] - Minimal test-and-set lock with a non-blocking [`SpinLock::try_lock`]
//! - [`VisualiserSink`] - Capability contract for anything that displays sample buffers
//! - [`VisualiserHandoff`] - Sink slot guarded by a `SpinLock`: blocking bind for the UI,
//!   try-push for the audio thread
//! - [`SinkBinding`] - RAII binding that unbinds its sink when the editor goes away
//! - [`SampleBuffer`] - Pre-allocated planar multi-channel buffer
//! - [`VisualiserProcessor`] - Pass-through block processor that feeds the hand-off
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use vislink_core::{SampleBuffer, VisualiserHandoff, VisualiserSink};
//!
//! struct Discard;
//!
//! impl VisualiserSink for Discard {
//!     fn set_num_channels(&self, _num_channels: usize) {}
//!     fn push_buffer(&self, _buffer: &SampleBuffer) {}
//! }
//!
//! let handoff = Arc::new(VisualiserHandoff::new());
//!
//! // UI thread: editor opened
//! let binding = handoff.attach(Arc::new(Discard));
//!
//! // Audio thread: every block
//! let block = SampleBuffer::new(2, 64);
//! handoff.try_push_buffer(&block, 2);
//! assert_eq!(handoff.forwarded_blocks(), 1);
//!
//! // UI thread: editor closed
//! drop(binding);
//! assert!(!handoff.is_bound());
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: The audio path never blocks, never allocates, never logs
//! - **Contention is not an error**: A contended block is simply not visualised
//! - **No dangling sinks**: The last reference to a sink is always released off the audio thread

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod buffer;
pub mod handoff;
pub mod processor;
pub mod sink;
pub mod sync;

// Re-export main types at crate root
pub use buffer::SampleBuffer;
pub use handoff::{SinkBinding, VisualiserHandoff};
pub use processor::VisualiserProcessor;
pub use sink::VisualiserSink;
pub use sync::{SpinLock, SpinLockGuard};
