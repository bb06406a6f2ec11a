use super::still::StillImageSource;
use crate::frame::Frame;
use crate::PipelineError;

const SYNTHETIC_WIDTH: u32 = 640;
const SYNTHETIC_HEIGHT: u32 = 480;

/// Frame source for one session.
pub struct FrameSource {
    backend: SourceBackend,
    locator: String,
}

impl std::fmt::Debug for FrameSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameSource")
            .field("locator", &self.locator)
            .finish_non_exhaustive()
    }
}

enum SourceBackend {
    Synthetic(SyntheticSource),
    Still(StillImageSource),
}

impl FrameSource {
    /// Open a source from its locator.
    ///
    /// Unsupported or unreadable locators fail here, once, with
    /// `SourceUnreadable`; nothing is retried per frame.
    pub fn open(locator: &str) -> Result<Self, PipelineError> {
        let trimmed = locator.trim();
        if trimmed.is_empty() {
            return Err(PipelineError::SourceUnreadable {
                locator: locator.to_string(),
                reason: "empty locator".to_string(),
            });
        }

        let backend = if let Some(rest) = trimmed.strip_prefix("stub://") {
            SourceBackend::Synthetic(SyntheticSource::from_spec(rest))
        } else if has_image_extension(trimmed) {
            SourceBackend::Still(StillImageSource::open(trimmed)?)
        } else {
            return Err(PipelineError::SourceUnreadable {
                locator: locator.to_string(),
                reason: "unsupported locator (expected stub:// or a .jpg/.png path)".to_string(),
            });
        };

        log::info!("frame source opened: {}", trimmed);
        Ok(Self {
            backend,
            locator: trimmed.to_string(),
        })
    }

    /// Next frame in stream order, or `None` once the source is exhausted.
    pub fn next_frame(&mut self) -> Option<Frame> {
        match &mut self.backend {
            SourceBackend::Synthetic(source) => source.next_frame(),
            SourceBackend::Still(source) => source.next_frame(),
        }
    }

    pub fn stats(&self) -> SourceStats {
        let frames_captured = match &self.backend {
            SourceBackend::Synthetic(source) => source.frame_count,
            SourceBackend::Still(source) => source.frames_captured(),
        };
        SourceStats {
            frames_captured,
            locator: self.locator.clone(),
        }
    }
}

/// Running counters for a source.
#[derive(Clone, Debug)]
pub struct SourceStats {
    pub frames_captured: u64,
    pub locator: String,
}

fn has_image_extension(path: &str) -> bool {
    let lower = path.to_lowercase();
    lower.ends_with(".jpg") || lower.ends_with(".jpeg") || lower.ends_with(".png")
}

// ----------------------------------------------------------------------------
// Synthetic source (stub://) for tests and the demo
// ----------------------------------------------------------------------------

/// Deterministic synthetic parking lot: a dark background, a 3x2 stall grid,
/// and filled vehicle boxes that rotate through the stalls over time. Pixel
/// content is a function of the frame index alone.
struct SyntheticSource {
    frame_count: u64,
    frame_limit: Option<u64>,
}

impl SyntheticSource {
    /// Parse the part after `stub://`: a name with an optional `?frames=N`.
    /// A malformed suffix just means an unbounded stream.
    fn from_spec(spec: &str) -> Self {
        let frame_limit = spec
            .split_once('?')
            .and_then(|(_, query)| query.strip_prefix("frames="))
            .and_then(|n| n.parse::<u64>().ok());
        Self {
            frame_count: 0,
            frame_limit,
        }
    }

    fn next_frame(&mut self) -> Option<Frame> {
        if let Some(limit) = self.frame_limit {
            if self.frame_count >= limit {
                return None;
            }
        }
        let index = self.frame_count;
        self.frame_count += 1;
        Some(Frame::new(
            synthetic_lot_pixels(index),
            SYNTHETIC_WIDTH,
            SYNTHETIC_HEIGHT,
            index,
        ))
    }
}

fn synthetic_lot_pixels(frame_index: u64) -> Vec<u8> {
    let (w, h) = (SYNTHETIC_WIDTH as usize, SYNTHETIC_HEIGHT as usize);
    let mut pixels = vec![0u8; w * h * 3];

    // Asphalt background.
    for chunk in pixels.chunks_exact_mut(3) {
        chunk.copy_from_slice(&[42, 42, 48]);
    }

    let cell_w = w / 3;
    let cell_h = h / 2;

    // Stall outlines.
    for row in 0..2 {
        for col in 0..3 {
            stroke_rect(
                &mut pixels,
                w,
                col * cell_w,
                row * cell_h,
                cell_w,
                cell_h,
                [200, 200, 200],
            );
        }
    }

    // Parked vehicles, rotating one stall free every 25 frames.
    let phase = frame_index / 25;
    for stall in 0..6u64 {
        if (phase + stall) % 6 == 0 {
            continue;
        }
        let col = (stall % 3) as usize;
        let row = (stall / 3) as usize;
        fill_rect(
            &mut pixels,
            w,
            col * cell_w + cell_w / 10,
            row * cell_h + cell_h / 10,
            cell_w * 8 / 10,
            cell_h * 8 / 10,
            [170, 46, 46],
        );
    }
    pixels
}

fn fill_rect(pixels: &mut [u8], stride: usize, x: usize, y: usize, w: usize, h: usize, rgb: [u8; 3]) {
    for row in y..y + h {
        for col in x..x + w {
            let offset = (row * stride + col) * 3;
            pixels[offset..offset + 3].copy_from_slice(&rgb);
        }
    }
}

fn stroke_rect(pixels: &mut [u8], stride: usize, x: usize, y: usize, w: usize, h: usize, rgb: [u8; 3]) {
    for col in x..x + w {
        for row in [y, y + h - 1] {
            let offset = (row * stride + col) * 3;
            pixels[offset..offset + 3].copy_from_slice(&rgb);
        }
    }
    for row in y..y + h {
        for col in [x, x + w - 1] {
            let offset = (row * stride + col) * 3;
            pixels[offset..offset + 3].copy_from_slice(&rgb);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_source_respects_frame_limit() {
        let mut source = FrameSource::open("stub://lot?frames=3").unwrap();
        assert!(source.next_frame().is_some());
        assert!(source.next_frame().is_some());
        let last = source.next_frame().unwrap();
        assert_eq!(last.index, 2);
        assert!(source.next_frame().is_none());
        assert_eq!(source.stats().frames_captured, 3);
    }

    #[test]
    fn stub_frames_are_deterministic() {
        let mut a = FrameSource::open("stub://a?frames=2").unwrap();
        let mut b = FrameSource::open("stub://b?frames=2").unwrap();
        let fa = a.next_frame().unwrap();
        let fb = b.next_frame().unwrap();
        assert_eq!(fa.pixels(), fb.pixels());
    }

    #[test]
    fn rejects_unsupported_locators() {
        assert!(matches!(
            FrameSource::open("rtsp://camera-1"),
            Err(PipelineError::SourceUnreadable { .. })
        ));
        assert!(matches!(
            FrameSource::open("   "),
            Err(PipelineError::SourceUnreadable { .. })
        ));
    }
}
