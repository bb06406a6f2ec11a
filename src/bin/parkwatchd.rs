//! parkwatchd - parking occupancy analysis daemon
//!
//! This daemon:
//! 1. Opens the configured frame source (stub:// or a still image)
//! 2. Runs the detector backend on every processed frame
//! 3. Resolves and stabilizes per-zone occupancy
//! 4. Logs occupancy transitions and periodic health lines
//!
//! It exits when the source is exhausted or on SIGINT (cooperative stop,
//! checked once per frame boundary).

use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use parkwatch::{AnalysisConfig, BackendRegistry, OccupancySession};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AnalysisConfig::load().context("loading configuration")?;
    let registry = BackendRegistry::with_builtin();

    let mut session =
        OccupancySession::open(config.clone(), &registry).context("opening session")?;

    let stop = session.stop_handle();
    ctrlc::set_handler(move || {
        log::info!("interrupt received, stopping after current frame");
        stop.store(true, Ordering::Relaxed);
    })
    .context("installing signal handler")?;

    log::info!(
        "parkwatchd running: source={} backend={} zones={}",
        config.source,
        config.detector_backend,
        config.zone_count
    );

    let mut last_health_log = Instant::now();
    let mut last_counts: Option<(u32, u32)> = None;

    while let Some(analysis) = session.next_analysis().context("processing frame")? {
        let report = &analysis.report;

        let counts = (report.occupied_count, report.free_count);
        if last_counts != Some(counts) {
            log::info!(
                "frame {}: {} occupied / {} free",
                report.frame_index,
                report.occupied_count,
                report.free_count
            );
            last_counts = Some(counts);
        } else {
            log::debug!(
                "frame {}: {} occupied / {} free ({} detections)",
                report.frame_index,
                report.occupied_count,
                report.free_count,
                analysis.detections.len()
            );
        }

        if last_health_log.elapsed() >= Duration::from_secs(5) {
            let stats = session.stats();
            log::info!(
                "health: seen={} processed={} detections={} rate={:.0}% fps={:.1}",
                stats.frames_seen,
                stats.frames_processed,
                stats.detections_total,
                stats.occupancy_rate(),
                stats.fps(session.elapsed())
            );
            last_health_log = Instant::now();
        }

        // Pace synthetic sources to ~10 fps; real sources block on I/O.
        std::thread::sleep(Duration::from_millis(100));
    }

    let stats = session.stats();
    log::info!(
        "session finished: {} frames seen, {} processed, final {} occupied / {} free",
        stats.frames_seen,
        stats.frames_processed,
        stats.last_occupied,
        stats.last_free
    );
    Ok(())
}
