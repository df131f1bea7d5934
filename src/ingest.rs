//! Capture file ingestion
//!
//! Capture files are processed from an explicit queue: enumerate them up
//! front, then decode one at a time
//! on a dedicated worker thread. Results flow to the async main loop over
//! a bounded channel. Ordering beyond per-file determinism is not needed,
//! so parallel decode across files would be an orchestration choice, not a
//! pipeline concern.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};
use crossbeam_channel::{bounded, Receiver};
use tracing::{info, warn};

use crate::pipeline::{DecodedFile, FileDecoder};

/// Raw IQ capture extensions we pick up from the capture directory
const CAPTURE_EXTENSIONS: &[&str] = &["cu8", "bin", "dat"];

/// Run statistics (atomic for cross-thread access)
#[derive(Debug, Default)]
pub struct IngestStats {
    pub files_queued: AtomicU64,
    pub files_decoded: AtomicU64,
    pub files_failed: AtomicU64,
    pub frames_decoded: AtomicU64,
}

impl IngestStats {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

/// Enumerate capture files in a directory, sorted by name.
///
/// Only files with a known raw-IQ extension are picked up; everything
/// else in the directory is ignored.
pub fn scan_captures(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read capture directory {}", dir.display()))?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| CAPTURE_EXTENSIONS.contains(&ext))
        })
        .collect();

    paths.sort();
    Ok(paths)
}

/// Ingestion queue driver
///
/// Owns the decoder configuration and the run statistics; `start` hands
/// back the receiving end of the decode channel.
pub struct Ingestor {
    decoder: FileDecoder,
    stats: Arc<IngestStats>,
}

impl Ingestor {
    pub fn new(decoder: FileDecoder) -> Self {
        Self {
            decoder,
            stats: IngestStats::new(),
        }
    }

    pub fn stats(&self) -> Arc<IngestStats> {
        self.stats.clone()
    }

    /// Spawn the decode worker over the queued paths and return the
    /// channel of per-file results.
    ///
    /// An unreadable file is fatal for that file only; the worker logs it
    /// and moves on. The channel closes when the queue is drained.
    pub fn start(&self, paths: Vec<PathBuf>) -> Result<Receiver<DecodedFile>> {
        let (tx, rx) = bounded::<DecodedFile>(64);

        self.stats
            .files_queued
            .store(paths.len() as u64, Ordering::Relaxed);

        let decoder = self.decoder;
        let stats = self.stats.clone();

        thread::Builder::new()
            .name("capture-decode".to_string())
            .spawn(move || {
                for path in paths {
                    match decoder.decode_file(&path) {
                        Ok(decoded) => {
                            stats.files_decoded.fetch_add(1, Ordering::Relaxed);
                            stats
                                .frames_decoded
                                .fetch_add(decoded.frames.len() as u64, Ordering::Relaxed);
                            if tx.send(decoded).is_err() {
                                warn!("Decode channel closed, stopping worker");
                                break;
                            }
                        }
                        Err(e) => {
                            stats.files_failed.fetch_add(1, Ordering::Relaxed);
                            warn!("Capture failed: {:#}", e);
                        }
                    }
                }
                info!("Decode worker finished");
            })
            .context("Failed to spawn decode thread")?;

        Ok(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.cu8"), [0u8; 4]).unwrap();
        std::fs::write(dir.path().join("a.cu8"), [0u8; 4]).unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"skip me").unwrap();

        let paths = scan_captures(dir.path()).unwrap();
        assert_eq!(paths.len(), 2);
        assert!(paths[0].ends_with("a.cu8"));
        assert!(paths[1].ends_with("b.cu8"));
    }

    #[test]
    fn test_scan_missing_directory_fails() {
        assert!(scan_captures(Path::new("/no/such/dir")).is_err());
    }

    #[test]
    fn test_worker_decodes_quiet_capture() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quiet.cu8");
        // All-128 bytes normalize to zero power: no bursts, no frames
        std::fs::write(&path, vec![128u8; 2000]).unwrap();

        let ingestor = Ingestor::new(FileDecoder::new(400.0, 100, 10));
        let rx = ingestor.start(vec![path]).unwrap();

        let decoded = rx.recv().unwrap();
        assert_eq!(decoded.file_id, "quiet");
        assert!(decoded.bitstrings.is_empty());
        assert!(decoded.frames.is_empty());
        assert!(rx.recv().is_err()); // queue drained, channel closed

        let stats = ingestor.stats();
        assert_eq!(stats.files_decoded.load(Ordering::Relaxed), 1);
        assert_eq!(stats.files_failed.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_worker_skips_unreadable_file() {
        let ingestor = Ingestor::new(FileDecoder::new(400.0, 100, 10));
        let rx = ingestor
            .start(vec![PathBuf::from("/no/such/capture.cu8")])
            .unwrap();
        assert!(rx.recv().is_err());
        assert_eq!(ingestor.stats().files_failed.load(Ordering::Relaxed), 1);
    }
}
