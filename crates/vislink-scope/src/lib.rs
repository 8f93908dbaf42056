//! Vislink Scope - level-history visualiser sink.
//!
//! [`LevelHistory`] is a [`VisualiserSink`](vislink_core::VisualiserSink) that
//! reduces incoming audio to a scrolling min/max trace per channel, the data
//! an oscilloscope-style editor view draws from. The audio thread feeds it via
//! the hand-off; the UI thread reads it with [`LevelHistory::snapshot`].
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use vislink_core::VisualiserProcessor;
//! use vislink_scope::{HistorySettings, LevelHistory};
//!
//! let mut processor = VisualiserProcessor::new(1, 1);
//! processor.prepare(48000.0, 256);
//!
//! // Editor opens
//! let scope = Arc::new(LevelHistory::new(HistorySettings {
//!     buffer_size: 16,
//!     samples_per_block: 64,
//!     ..HistorySettings::default()
//! }));
//! let binding = processor.handoff().attach(Arc::clone(&scope));
//!
//! // Audio callback
//! let input = [0.5f32; 256];
//! let mut output = [0.0f32; 256];
//! processor.process(&[&input[..]], &mut [&mut output[..]]);
//!
//! // Paint
//! let snapshot = scope.snapshot();
//! assert_eq!(snapshot.num_channels(), 2);
//! assert_eq!(snapshot.peak(0), 0.5);
//!
//! // Editor closes
//! drop(binding);
//! ```

mod history;
mod level;
mod snapshot;

pub use history::{HistorySettings, LevelHistory, MAX_CHANNELS};
pub use level::LevelRange;
pub use snapshot::ScopeSnapshot;
