//! Hand-off stress test.
//!
//! An audio thread renders a sine through a [`VisualiserProcessor`] as fast
//! as it can while the main thread plays the editor: it repeatedly builds a
//! [`LevelHistory`], attaches it, reads a few snapshots, and closes it again.

use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use vislink_core::VisualiserProcessor;
use vislink_scope::LevelHistory;

#[derive(Args)]
pub struct StressArgs {
    /// Number of audio blocks to render
    #[arg(short, long, default_value = "20000")]
    blocks: usize,

    /// Frames per audio block (defaults to the configured max block size)
    #[arg(long)]
    block_size: Option<usize>,

    /// Input channels (outputs mirror inputs)
    #[arg(long, default_value = "2")]
    channels: usize,

    /// Sample rate
    #[arg(long, default_value = "48000")]
    sample_rate: u32,

    /// Test tone frequency in Hz
    #[arg(long, default_value = "440")]
    frequency: f32,

    /// Snapshots read per editor session
    #[arg(long, default_value = "4")]
    frames_per_editor: usize,

    /// Sleep between snapshots at the configured repaint rate
    #[arg(long)]
    paced: bool,

    /// Config file (defaults to the user config)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Totals reported by the audio thread once it finishes.
struct AudioReport {
    blocks: usize,
    elapsed: Duration,
}

pub fn run(args: StressArgs) -> anyhow::Result<()> {
    let (config, _) = super::load_config(args.config.as_deref())?;

    if args.channels == 0 {
        anyhow::bail!("--channels must be at least 1");
    }
    if args.sample_rate == 0 {
        anyhow::bail!("--sample-rate must be at least 1");
    }
    let block_size = args.block_size.unwrap_or(config.max_block_size);
    if block_size == 0 {
        anyhow::bail!("--block-size must be at least 1");
    }

    let mut processor = VisualiserProcessor::new(args.channels, args.channels);
    processor.prepare(args.sample_rate as f32, config.max_block_size);
    let handoff = processor.handoff();
    let history_span = (config.buffer_size * config.samples_per_block) as f32
        / processor.sample_rate();

    if block_size > processor.max_block_size() {
        tracing::warn!(
            block_size,
            max_block_size = processor.max_block_size(),
            "blocks exceed the prepared size and will not be visualised"
        );
    }

    tracing::info!(
        blocks = args.blocks,
        block_size,
        channels = args.channels,
        "starting stress run"
    );

    let done = Arc::new(AtomicBool::new(false));
    let audio = {
        let done = Arc::clone(&done);
        let channels = args.channels;
        let blocks = args.blocks;
        let phase_inc = args.frequency / args.sample_rate as f32;
        thread::Builder::new()
            .name("vislink-audio".into())
            .spawn(move || {
                let mut inputs = vec![vec![0.0f32; block_size]; channels];
                let mut outputs = vec![vec![0.0f32; block_size]; channels];
                let mut phase = 0.0f32;
                let start = Instant::now();

                for _ in 0..blocks {
                    for i in 0..block_size {
                        let sample = (std::f32::consts::TAU * phase).sin() * 0.5;
                        for input in &mut inputs {
                            input[i] = sample;
                        }
                        phase = (phase + phase_inc).fract();
                    }

                    // Host-side slice tables; `process` itself never allocates.
                    let in_refs: Vec<&[f32]> = inputs.iter().map(Vec::as_slice).collect();
                    let mut out_refs: Vec<&mut [f32]> =
                        outputs.iter_mut().map(Vec::as_mut_slice).collect();
                    processor.process(&in_refs, &mut out_refs);
                }

                done.store(true, Ordering::Release);
                AudioReport {
                    blocks,
                    elapsed: start.elapsed(),
                }
            })?
    };

    let frame_interval = Duration::from_secs_f32(1.0 / config.repaint_rate_hz as f32);
    let mut editors = 0usize;
    let mut frames = 0usize;
    let mut dropped = 0usize;
    let mut peak = 0.0f32;

    loop {
        let scope = Arc::new(LevelHistory::new(config.history_settings()));
        let binding = handoff.attach(Arc::clone(&scope));
        editors += 1;

        for _ in 0..args.frames_per_editor {
            let snapshot = scope.snapshot();
            for ch in 0..snapshot.num_channels() {
                peak = peak.max(snapshot.peak(ch));
            }
            frames += 1;
            if args.paced {
                thread::sleep(frame_interval);
            } else {
                thread::yield_now();
            }
        }

        drop(binding);
        dropped += scope.dropped_blocks();

        if done.load(Ordering::Acquire) {
            break;
        }
    }

    let report = audio
        .join()
        .map_err(|_| anyhow::anyhow!("audio thread panicked"))?;

    tracing::info!(
        editors,
        forwarded = handoff.forwarded_blocks(),
        skipped = handoff.skipped_blocks(),
        "stress run finished"
    );

    println!("Stress run");
    println!("==========");
    println!("  audio blocks:     {}", report.blocks);
    println!("  forwarded:        {}", handoff.forwarded_blocks());
    println!("  skipped (locked): {}", handoff.skipped_blocks());
    println!("  dropped (scope):  {dropped}");
    println!("  editor sessions:  {editors}");
    println!("  snapshots:        {frames}");
    println!("  peak level:       {peak:.3}");
    println!("  history span:     {:.1} ms", history_span * 1000.0);
    println!(
        "  audio time:       {:.1} ms ({:.2} us/block)",
        report.elapsed.as_secs_f64() * 1000.0,
        report.elapsed.as_secs_f64() * 1e6 / report.blocks.max(1) as f64
    );

    if handoff.is_bound() {
        anyhow::bail!("hand-off still bound after every editor closed");
    }
    Ok(())
}
