//! Sensor Capture - sub-GHz security sensor decoder
//!
//! Scans a directory of raw IQ capture files, demodulates sensor bursts,
//! parses telemetry frames, and publishes discovery/state events as JSON
//! lines for the broker bridge.

use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use sensor_capture::config::Config;
use sensor_capture::discovery::DiscoveryCache;
use sensor_capture::ingest::{scan_captures, Ingestor};
use sensor_capture::pipeline::FileDecoder;
use sensor_capture::publish::{
    timestamp_ms, DiscoveryEvent, JsonLinesSink, PublishEvent, StateEvent,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout is reserved for the event stream
    FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!("===========================================");
    info!("   Sensor Capture - IQ frame decoder");
    info!("===========================================");

    let config = Config::from_env();
    info!("Configuration:");
    info!("  Capture dir: {}", config.capture_dir.display());
    info!("  Sample rate: {} Hz", config.sample_rate);
    info!("  Power threshold: {}", config.power_threshold);
    info!("  Min burst: {} samples", config.min_burst_samples);
    info!("  Samples per bit: {}", config.samples_per_bit);

    let decoder = FileDecoder::new(
        config.power_threshold,
        config.min_burst_samples,
        config.samples_per_bit,
    );

    let paths = scan_captures(&config.capture_dir)?;
    info!("Queued {} capture file(s)", paths.len());

    // Batch mode: emit the file -> bit-strings map and exit
    if config.batch_report {
        let report = decoder.decode_batch(&paths);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    // Publish sink consumes events off the mpsc channel
    let (event_tx, event_rx) = mpsc::channel::<PublishEvent>(1000);
    let sink_handle = tokio::spawn(async move {
        let sink = JsonLinesSink::new();
        sink.run(event_rx).await
    });

    // Decode worker feeds results over the crossbeam channel
    let ingestor = Ingestor::new(decoder);
    let stats = ingestor.stats();
    let decoded_rx = ingestor.start(paths)?;

    let mut discovery = DiscoveryCache::new();
    let mut frames_accepted = 0u64;
    let mut sync_mismatches = 0u64;
    let mut last_report = Instant::now();

    loop {
        match decoded_rx.recv_timeout(Duration::from_millis(500)) {
            Ok(decoded) => {
                for frame in &decoded.frames {
                    // Sync-word policy lives here: the parser reports the
                    // transmitted word, the orchestrator drops mismatches.
                    if !frame.sync_valid() {
                        sync_mismatches += 1;
                        debug!(
                            "Dropping frame with sync {:#06x} from {}",
                            frame.sync, decoded.file_id
                        );
                        continue;
                    }

                    frames_accepted += 1;
                    info!(
                        ">>> FRAME: {} | {:?} | battery {:?} | {}",
                        frame.device_id, frame.command, frame.battery, decoded.file_id
                    );

                    if discovery.check_and_insert(&frame.device_id) {
                        let event = PublishEvent::Discovery(DiscoveryEvent {
                            device_id: frame.device_id.clone(),
                            source_file: decoded.file_id.clone(),
                            timestamp_ms: timestamp_ms(),
                        });
                        if event_tx.send(event).await.is_err() {
                            warn!("Event channel closed");
                        }
                    }

                    let event = PublishEvent::State(StateEvent {
                        device_id: frame.device_id.clone(),
                        command: frame.command,
                        battery: frame.battery,
                        source_file: decoded.file_id.clone(),
                        timestamp_ms: timestamp_ms(),
                    });
                    if event_tx.send(event).await.is_err() {
                        warn!("Event channel closed");
                    }
                }
            }
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => {
                // Idle; fall through to the periodic report
            }
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                // Queue drained, worker done
                break;
            }
        }

        if last_report.elapsed() >= Duration::from_secs(5) {
            info!(
                "[Stats] Files: {}/{} decoded ({} failed) | Frames: {} accepted, {} sync rejects | Devices: {}",
                stats.files_decoded.load(Ordering::Relaxed),
                stats.files_queued.load(Ordering::Relaxed),
                stats.files_failed.load(Ordering::Relaxed),
                frames_accepted,
                sync_mismatches,
                discovery.len()
            );
            last_report = Instant::now();
        }
    }

    // Close the channel so the sink drains and exits
    drop(event_tx);
    sink_handle.await??;

    info!(
        "Done. Files: {} decoded, {} failed | Frames: {} accepted, {} sync rejects | Devices discovered: {}",
        stats.files_decoded.load(Ordering::Relaxed),
        stats.files_failed.load(Ordering::Relaxed),
        frames_accepted,
        sync_mismatches,
        discovery.len()
    );
    Ok(())
}
