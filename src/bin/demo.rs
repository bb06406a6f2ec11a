//! demo - single-shot occupancy run over a synthetic lot or a sample image
//!
//! Drives a full session end to end, writes every report as JSON lines, and
//! saves the last annotated frame as a PNG for quick visual verification.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use parkwatch::{AnalysisConfig, BackendRegistry, OccupancySession};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Frame source: stub://name[?frames=N] or a .jpg/.png path.
    #[arg(long, default_value = "stub://demo?frames=40")]
    source: String,
    /// Number of parking zones (4-12).
    #[arg(long, default_value_t = 6)]
    zones: u32,
    /// Detection confidence threshold (0.1-1.0).
    #[arg(long, default_value_t = 0.5)]
    confidence: f32,
    /// Process every (skip+1)-th frame.
    #[arg(long, default_value_t = 0)]
    skip: u32,
    /// Detector backend name.
    #[arg(long, default_value = "stub")]
    backend: String,
    /// Output directory for reports and the annotated frame.
    #[arg(long, default_value = "demo_out")]
    out: String,
    /// Save the unannotated frame instead of the overlay.
    #[arg(long, default_value_t = false)]
    show_original: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let out_dir = PathBuf::from(&args.out);
    fs::create_dir_all(&out_dir)?;

    let config = AnalysisConfig {
        source: args.source.clone(),
        detector_backend: args.backend.clone(),
        confidence_threshold: args.confidence,
        zone_count: args.zones,
        skip_frames: args.skip,
        show_original: args.show_original,
        ..AnalysisConfig::default()
    };

    stage("open session");
    let registry = BackendRegistry::with_builtin();
    let mut session = OccupancySession::open(config, &registry).context("opening session")?;

    stage("process frames");
    let reports_path = out_dir.join("reports.jsonl");
    let mut reports_file = fs::File::create(&reports_path)
        .with_context(|| format!("creating {}", reports_path.display()))?;

    let mut last_annotated = None;
    let mut report_count = 0u64;
    while let Some(analysis) = session.next_analysis().context("processing frame")? {
        serde_json::to_writer(&mut reports_file, &analysis.report)?;
        reports_file.write_all(b"\n")?;
        report_count += 1;
        last_annotated = Some(analysis.annotated);
    }
    let Some(annotated) = last_annotated else {
        return Err(anyhow!("source yielded no frames"));
    };

    stage("write annotated frame");
    let frame_path = out_dir.join("annotated.png");
    let image = image::RgbImage::from_raw(
        annotated.width,
        annotated.height,
        annotated.to_rgb_vec(),
    )
    .ok_or_else(|| anyhow!("annotated frame buffer has unexpected size"))?;
    image
        .save(&frame_path)
        .with_context(|| format!("writing {}", frame_path.display()))?;

    let stats = session.stats();
    stage("summary");
    println!("reports:      {} ({})", report_count, reports_path.display());
    println!("frame:        {}", frame_path.display());
    println!(
        "occupancy:    {} occupied / {} free ({:.0}%)",
        stats.last_occupied,
        stats.last_free,
        stats.occupancy_rate()
    );
    println!(
        "throughput:   {:.1} frames/s over {} processed frames",
        stats.fps(session.elapsed()),
        stats.frames_processed
    );
    Ok(())
}

fn stage(label: &str) {
    println!("--- {label}");
}
