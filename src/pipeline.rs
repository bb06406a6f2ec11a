//! Frame pipeline orchestration.
//!
//! `OccupancySession` ties the stages together for one video: acquire frame,
//! detect vehicles, resolve zone overlap, stabilize, report. Frames are
//! processed strictly in sequence - the stabilizer windows depend on order -
//! and all mutable state lives inside the session, so independent sessions
//! run in parallel without coordination.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::detect::{BackendRegistry, Detection, DetectorAdapter};
use crate::frame::Frame;
use crate::ingest::FrameSource;
use crate::render;
use crate::resolve::resolve_occupancy;
use crate::stabilize::ZoneStabilizer;
use crate::zone::{build_zones, Zone};
use crate::{PipelineError, Rect, ZoneState};

// -------------------- Reports --------------------

/// Stabilized state of one zone within a report.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneReading {
    pub id: u32,
    pub geometry: Rect,
    pub state: ZoneState,
}

/// Per-processed-frame occupancy summary, serializable for the external
/// dashboard layer.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupancyReport {
    /// Index of the frame in the source stream (skipped frames keep their
    /// indices, so reports are sparse under frame skipping).
    pub frame_index: u64,
    /// One reading per zone, ordered by zone id.
    pub zones: Vec<ZoneReading>,
    pub occupied_count: u32,
    pub free_count: u32,
}

/// Everything the pipeline produces for one processed frame: the structured
/// report plus the annotated frame and the detections that drove it.
pub struct FrameAnalysis {
    pub report: OccupancyReport,
    pub detections: Vec<Detection>,
    pub annotated: Frame,
}

// -------------------- Session Statistics --------------------

/// Running aggregate counters for one session.
#[derive(Clone, Copy, Debug, Default)]
pub struct SessionStats {
    /// Frames acquired from the source, including skipped ones.
    pub frames_seen: u64,
    /// Frames that went through detect/resolve/stabilize.
    pub frames_processed: u64,
    /// Detections that survived filtering, summed over processed frames.
    pub detections_total: u64,
    pub last_occupied: u32,
    pub last_free: u32,
}

impl SessionStats {
    /// Share of zones occupied in the latest report, as a percentage.
    pub fn occupancy_rate(&self) -> f32 {
        let total = self.last_occupied + self.last_free;
        if total == 0 {
            return 0.0;
        }
        self.last_occupied as f32 / total as f32 * 100.0
    }

    /// Processed-frame throughput over the given wall-clock span.
    pub fn fps(&self, elapsed: Duration) -> f64 {
        let secs = elapsed.as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        self.frames_processed as f64 / secs
    }
}

// -------------------- Session --------------------

/// One analysis run over one frame source.
///
/// Produces reports lazily: each `next_analysis` call pulls frames until the
/// next processed frame, runs the full stage chain on it, and returns. The
/// session is an `Iterator` over `OccupancyReport` for callers that only
/// need the structured output. Once the source is exhausted the session is
/// finished and cannot be restarted.
pub struct OccupancySession {
    config: AnalysisConfig,
    source: FrameSource,
    detector: DetectorAdapter,
    /// Built from the first frame's dimensions; immutable afterwards.
    zones: Vec<Zone>,
    stabilizers: Vec<ZoneStabilizer>,
    stats: SessionStats,
    started: Instant,
    stop: Arc<AtomicBool>,
    done: bool,
}

impl OccupancySession {
    /// Validate the configuration and open all session resources.
    ///
    /// Setup failures surface here once: `InvalidConfiguration` before
    /// anything is touched, `SourceUnreadable` and `DetectorUnavailable` for
    /// the two environmental dependencies.
    pub fn open(config: AnalysisConfig, registry: &BackendRegistry) -> Result<Self, PipelineError> {
        config.validate()?;
        let source = FrameSource::open(&config.source)?;
        let detector = DetectorAdapter::from_registry(
            registry,
            &config.detector_backend,
            config.confidence_threshold,
        )?;
        log::info!(
            "session opened: backend={} zones={} skip_frames={} window={}",
            detector.backend_name(),
            config.zone_count,
            config.skip_frames,
            config.stabilizer_window,
        );
        Ok(Self {
            config,
            source,
            detector,
            zones: Vec::new(),
            stabilizers: Vec::new(),
            stats: SessionStats::default(),
            started: Instant::now(),
            stop: Arc::new(AtomicBool::new(false)),
            done: false,
        })
    }

    /// Cooperative stop flag, checked once per frame boundary. Cloned out to
    /// signal handlers or controlling threads.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.stop.clone()
    }

    /// Zone geometry, empty until the first frame has been processed.
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Pull frames until the next processed frame and run the full stage
    /// chain on it. `Ok(None)` means the session ended normally (source
    /// exhausted, or stop requested).
    pub fn next_analysis(&mut self) -> Result<Option<FrameAnalysis>, PipelineError> {
        if self.done {
            return Ok(None);
        }
        loop {
            if self.stop.load(Ordering::Relaxed) {
                log::info!(
                    "stop requested; ending session after {} frames",
                    self.stats.frames_seen
                );
                self.done = true;
                return Ok(None);
            }

            let Some(frame) = self.source.next_frame() else {
                log::info!(
                    "source exhausted after {} frames ({} processed)",
                    self.stats.frames_seen,
                    self.stats.frames_processed
                );
                self.done = true;
                return Ok(None);
            };
            self.stats.frames_seen += 1;

            // Process every (skip_frames + 1)-th frame; skipped frames carry
            // no new evidence and emit no report.
            if frame.index % (self.config.skip_frames as u64 + 1) != 0 {
                continue;
            }

            return self.process_frame(frame).map(Some);
        }
    }

    fn process_frame(&mut self, frame: Frame) -> Result<FrameAnalysis, PipelineError> {
        if self.zones.is_empty() {
            self.zones = build_zones(frame.width, frame.height, self.config.zone_count)?;
            self.stabilizers = self
                .zones
                .iter()
                .map(|_| ZoneStabilizer::new(self.config.stabilizer_window))
                .collect();
            log::debug!(
                "zone grid built: {} zones over {}x{}",
                self.zones.len(),
                frame.width,
                frame.height
            );
        }

        // A single corrupt frame must not abort a long-running analysis:
        // degrade to zero detections and keep going.
        let detections = match self.detector.detect(&frame) {
            Ok(detections) => detections,
            Err(e) => {
                log::warn!(
                    "detection failed on frame {}: {:#}; treating frame as empty",
                    frame.index,
                    e
                );
                Vec::new()
            }
        };

        let raw_states = resolve_occupancy(&self.zones, &detections, self.config.overlap_threshold);

        let mut zones = Vec::with_capacity(self.zones.len());
        let mut occupied_count = 0u32;
        for (zone, raw) in self.zones.iter().zip(raw_states) {
            let state = self.stabilizers[zone.id as usize].push(raw);
            if state == ZoneState::Occupied {
                occupied_count += 1;
            }
            zones.push(ZoneReading {
                id: zone.id,
                geometry: zone.rect,
                state,
            });
        }
        let free_count = self.zones.len() as u32 - occupied_count;

        let report = OccupancyReport {
            frame_index: frame.index,
            zones,
            occupied_count,
            free_count,
        };

        self.stats.frames_processed += 1;
        self.stats.detections_total += detections.len() as u64;
        self.stats.last_occupied = occupied_count;
        self.stats.last_free = free_count;

        let annotated = render::annotate(&frame, &report, &detections, self.config.show_original);

        Ok(FrameAnalysis {
            report,
            detections,
            annotated,
        })
    }
}

impl Iterator for OccupancySession {
    type Item = Result<OccupancyReport, PipelineError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_analysis() {
            Ok(Some(analysis)) => Some(Ok(analysis.report)),
            Ok(None) => None,
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
