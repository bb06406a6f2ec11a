use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};

use super::backend::VehicleDetector;
use super::registry::BackendRegistry;
use super::result::Detection;
use crate::frame::Frame;
use crate::PipelineError;

/// Stable detection contract for the rest of the pipeline.
///
/// The adapter wraps whichever backend the session selected and applies the
/// two filters the occupancy logic relies on: detections below the configured
/// confidence threshold are dropped, and so are boxes that do not touch the
/// frame at all. Callers treat the returned sequence as a set; its order
/// carries no meaning.
pub struct DetectorAdapter {
    backend: Arc<Mutex<dyn VehicleDetector>>,
    backend_name: String,
    confidence_threshold: f32,
}

impl std::fmt::Debug for DetectorAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetectorAdapter")
            .field("backend_name", &self.backend_name)
            .field("confidence_threshold", &self.confidence_threshold)
            .finish_non_exhaustive()
    }
}

impl DetectorAdapter {
    /// Resolve `backend_name` in the registry and warm the backend up.
    ///
    /// A missing backend or a failed warm-up is `DetectorUnavailable`: fatal
    /// for the session, no per-frame fallback.
    pub fn from_registry(
        registry: &BackendRegistry,
        backend_name: &str,
        confidence_threshold: f32,
    ) -> Result<Self, PipelineError> {
        let backend =
            registry
                .get(backend_name)
                .ok_or_else(|| PipelineError::DetectorUnavailable {
                    backend: backend_name.to_string(),
                    reason: format!("not registered (available: {:?})", registry.list()),
                })?;

        {
            let mut guard = backend
                .lock()
                .map_err(|_| PipelineError::DetectorUnavailable {
                    backend: backend_name.to_string(),
                    reason: "backend lock poisoned".to_string(),
                })?;
            guard
                .warm_up()
                .map_err(|e| PipelineError::DetectorUnavailable {
                    backend: backend_name.to_string(),
                    reason: e.to_string(),
                })?;
        }

        Ok(Self {
            backend,
            backend_name: backend_name.to_string(),
            confidence_threshold,
        })
    }

    pub fn backend_name(&self) -> &str {
        &self.backend_name
    }

    /// Run detection on one frame and filter the output.
    ///
    /// The frame is borrowed read-only and never mutated. Errors here are
    /// per-frame: the orchestrator degrades them to zero detections rather
    /// than aborting the session.
    pub fn detect(&self, frame: &Frame) -> Result<Vec<Detection>> {
        let mut guard = self
            .backend
            .lock()
            .map_err(|_| anyhow!("backend '{}' lock poisoned", self.backend_name))?;
        let mut detections = guard.detect(frame.pixels(), frame.width, frame.height)?;
        let bounds = frame.bounds();
        detections.retain(|d| {
            d.confidence >= self.confidence_threshold && d.rect.intersection(&bounds).is_some()
        });
        Ok(detections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::result::VehicleClass;
    use crate::Rect;

    struct FixedBackend {
        boxes: Vec<Detection>,
    }

    impl VehicleDetector for FixedBackend {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn detect(&mut self, _pixels: &[u8], _w: u32, _h: u32) -> Result<Vec<Detection>> {
            Ok(self.boxes.clone())
        }
    }

    fn frame_640x480() -> Frame {
        Frame::new(vec![0u8; 640 * 480 * 3], 640, 480, 0)
    }

    #[test]
    fn filters_below_confidence_threshold() {
        let mut registry = BackendRegistry::new();
        registry.register(FixedBackend {
            boxes: vec![
                Detection {
                    rect: Rect::new(10, 10, 50, 50),
                    class: VehicleClass::Car,
                    confidence: 0.7,
                },
                Detection {
                    rect: Rect::new(100, 100, 50, 50),
                    class: VehicleClass::Truck,
                    confidence: 0.95,
                },
            ],
        });
        let adapter = DetectorAdapter::from_registry(&registry, "fixed", 0.9).unwrap();
        let detections = adapter.detect(&frame_640x480()).unwrap();
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].confidence, 0.95);
    }

    #[test]
    fn drops_boxes_entirely_off_frame() {
        let mut registry = BackendRegistry::new();
        registry.register(FixedBackend {
            boxes: vec![Detection {
                rect: Rect::new(700, 500, 50, 50),
                class: VehicleClass::Car,
                confidence: 0.99,
            }],
        });
        let adapter = DetectorAdapter::from_registry(&registry, "fixed", 0.5).unwrap();
        assert!(adapter.detect(&frame_640x480()).unwrap().is_empty());
    }

    #[test]
    fn unknown_backend_is_unavailable() {
        let registry = BackendRegistry::with_builtin();
        let err = DetectorAdapter::from_registry(&registry, "yolo", 0.5).unwrap_err();
        assert!(matches!(err, PipelineError::DetectorUnavailable { .. }));
    }

    #[test]
    fn failed_warm_up_is_unavailable() {
        struct ColdBackend;
        impl VehicleDetector for ColdBackend {
            fn name(&self) -> &'static str {
                "cold"
            }
            fn warm_up(&mut self) -> Result<()> {
                Err(anyhow!("model weights missing"))
            }
            fn detect(&mut self, _p: &[u8], _w: u32, _h: u32) -> Result<Vec<Detection>> {
                Ok(vec![])
            }
        }

        let mut registry = BackendRegistry::new();
        registry.register(ColdBackend);
        let err = DetectorAdapter::from_registry(&registry, "cold", 0.5).unwrap_err();
        match err {
            PipelineError::DetectorUnavailable { backend, reason } => {
                assert_eq!(backend, "cold");
                assert!(reason.contains("model weights missing"));
            }
            other => panic!("expected DetectorUnavailable, got {other:?}"),
        }
    }
}
