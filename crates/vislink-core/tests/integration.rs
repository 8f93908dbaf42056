//! Integration tests for vislink-core: audio and UI threads racing over the hand-off.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use vislink_core::{SampleBuffer, VisualiserHandoff, VisualiserProcessor, VisualiserSink};

// ---------------------------------------------------------------------------
// Test sinks
// ---------------------------------------------------------------------------

/// Checks the collaborator contract from the sink's side: it must be told the
/// channel count before any buffer, and every buffer must match that count.
#[derive(Default)]
struct ContractSink {
    channels: AtomicUsize,
    pushes: AtomicUsize,
    violations: AtomicUsize,
}

impl VisualiserSink for ContractSink {
    fn set_num_channels(&self, num_channels: usize) {
        self.channels.store(num_channels, Ordering::Relaxed);
    }

    fn push_buffer(&self, buffer: &SampleBuffer) {
        if self.channels.load(Ordering::Relaxed) != buffer.num_channels() {
            self.violations.fetch_add(1, Ordering::Relaxed);
        }
        self.pushes.fetch_add(1, Ordering::Relaxed);
    }
}

/// Parks inside `push_buffer` until released, holding the hand-off lock.
struct StallingSink {
    entered: Mutex<mpsc::Sender<()>>,
    release: Mutex<mpsc::Receiver<()>>,
}

impl VisualiserSink for StallingSink {
    fn set_num_channels(&self, _num_channels: usize) {}

    fn push_buffer(&self, _buffer: &SampleBuffer) {
        self.entered.lock().unwrap().send(()).unwrap();
        self.release.lock().unwrap().recv().unwrap();
    }
}

fn as_sink<S: VisualiserSink + 'static>(sink: &Arc<S>) -> Arc<dyn VisualiserSink> {
    Arc::clone(sink) as Arc<dyn VisualiserSink>
}

// ---------------------------------------------------------------------------
// Racing bind/unbind against the audio thread
// ---------------------------------------------------------------------------

#[test]
fn bind_churn_never_exposes_partial_sink() {
    const BLOCKS: usize = 200_000;

    let handoff = Arc::new(VisualiserHandoff::new());
    let sink_a = Arc::new(ContractSink::default());
    let sink_b = Arc::new(ContractSink::default());
    let done = Arc::new(AtomicBool::new(false));

    let audio = {
        let handoff = Arc::clone(&handoff);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            let buffer = SampleBuffer::new(2, 32);
            for _ in 0..BLOCKS {
                handoff.try_push_buffer(&buffer, 2);
            }
            done.store(true, Ordering::Release);
        })
    };

    let mut rebinds = 0usize;
    loop {
        handoff.bind(Some(as_sink(&sink_a)));
        handoff.bind(Some(as_sink(&sink_b)));
        handoff.bind(None);
        rebinds += 3;
        if done.load(Ordering::Acquire) {
            break;
        }
    }
    audio.join().unwrap();

    assert!(rebinds > 0);
    assert_eq!(sink_a.violations.load(Ordering::Relaxed), 0);
    assert_eq!(sink_b.violations.load(Ordering::Relaxed), 0);

    let delivered =
        sink_a.pushes.load(Ordering::Relaxed) + sink_b.pushes.load(Ordering::Relaxed);
    assert_eq!(delivered, handoff.forwarded_blocks());
    assert!(handoff.forwarded_blocks() + handoff.skipped_blocks() <= BLOCKS);

    // Every reference the hand-off took has been released by the UI side.
    assert_eq!(Arc::strong_count(&sink_a), 1);
    assert_eq!(Arc::strong_count(&sink_b), 1);
}

#[test]
fn channel_count_changes_survive_concurrent_rebinds() {
    const BLOCKS: usize = 50_000;

    let handoff = Arc::new(VisualiserHandoff::new());
    let sink = Arc::new(ContractSink::default());
    let done = Arc::new(AtomicBool::new(false));

    let audio = {
        let handoff = Arc::clone(&handoff);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            let stereo = SampleBuffer::new(2, 16);
            let quad = SampleBuffer::new(4, 16);
            for i in 0..BLOCKS {
                if (i / 64) % 2 == 0 {
                    handoff.try_push_buffer(&stereo, 2);
                } else {
                    handoff.try_push_buffer(&quad, 4);
                }
            }
            done.store(true, Ordering::Release);
        })
    };

    loop {
        handoff.bind(Some(as_sink(&sink)));
        thread::yield_now();
        handoff.unbind();
        if done.load(Ordering::Acquire) {
            break;
        }
    }
    audio.join().unwrap();

    assert_eq!(sink.violations.load(Ordering::Relaxed), 0);
}

// ---------------------------------------------------------------------------
// Non-blocking guarantee
// ---------------------------------------------------------------------------

#[test]
fn try_push_returns_while_lock_is_held_elsewhere() {
    let (entered_tx, entered_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel();
    let stalling = Arc::new(StallingSink {
        entered: Mutex::new(entered_tx),
        release: Mutex::new(release_rx),
    });

    let handoff = Arc::new(VisualiserHandoff::new());
    handoff.bind(Some(as_sink(&stalling)));

    // First "audio" thread wins the lock and stalls inside the sink.
    let holder = {
        let handoff = Arc::clone(&handoff);
        thread::spawn(move || {
            let buffer = SampleBuffer::new(1, 8);
            handoff.try_push_buffer(&buffer, 1);
        })
    };
    entered_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("holder never entered the sink");

    let buffer = SampleBuffer::new(1, 8);
    let start = Instant::now();
    for _ in 0..1000 {
        handoff.try_push_buffer(&buffer, 1);
    }
    let elapsed = start.elapsed();

    release_tx.send(()).unwrap();
    holder.join().unwrap();

    assert!(elapsed < Duration::from_millis(100), "took {elapsed:?}");
    assert_eq!(handoff.skipped_blocks(), 1000);
    assert_eq!(handoff.forwarded_blocks(), 1);
}

// ---------------------------------------------------------------------------
// Processor + editor lifecycle
// ---------------------------------------------------------------------------

#[test]
fn editor_open_close_while_processing() {
    let mut processor = VisualiserProcessor::new(2, 2);
    processor.prepare(48000.0, 128);
    let handoff = processor.handoff();
    let running = Arc::new(AtomicBool::new(true));

    let audio = {
        let running = Arc::clone(&running);
        thread::spawn(move || {
            let input = vec![0.25f32; 128];
            let mut out_l = vec![0.0f32; 128];
            let mut out_r = vec![0.0f32; 128];
            let mut blocks = 0usize;
            loop {
                processor.process(
                    &[&input[..], &input[..]],
                    &mut [&mut out_l[..], &mut out_r[..]],
                );
                blocks += 1;
                if !running.load(Ordering::Acquire) {
                    break;
                }
            }
            assert!(out_l.iter().all(|&s| s == 0.25));
            blocks
        })
    };

    let mut sinks = Vec::new();
    for _ in 0..200 {
        let sink = Arc::new(ContractSink::default());
        let binding = handoff.attach(Arc::clone(&sink));
        thread::yield_now();
        drop(binding);
        sinks.push(sink);
    }
    running.store(false, Ordering::Release);
    let blocks = audio.join().unwrap();

    assert!(blocks > 0);
    assert!(!handoff.is_bound());
    for sink in &sinks {
        assert_eq!(sink.violations.load(Ordering::Relaxed), 0);
        assert_eq!(Arc::strong_count(sink), 1);
    }
}

#[test]
fn bound_sink_receives_processed_blocks() {
    let mut processor = VisualiserProcessor::new(1, 1);
    processor.prepare(44100.0, 64);
    let handoff = processor.handoff();
    let sink = Arc::new(ContractSink::default());
    let _binding = handoff.attach(Arc::clone(&sink));

    let input = [0.5f32; 64];
    let mut output = [0.0f32; 64];
    for _ in 0..10 {
        processor.process(&[&input[..]], &mut [&mut output[..]]);
    }

    assert_eq!(sink.pushes.load(Ordering::Relaxed), 10);
    assert_eq!(sink.channels.load(Ordering::Relaxed), 2);
    assert_eq!(handoff.skipped_blocks(), 0);
}
