use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::backend::VehicleDetector;
use super::backends::StubBackend;

/// Thread-safe registry of detector backends, keyed by name.
///
/// Backends are wrapped in `Mutex` because `VehicleDetector::detect` takes
/// `&mut self`. A session resolves its configured backend name here once at
/// start; the registry itself is shared and immutable afterwards.
pub struct BackendRegistry {
    backends: HashMap<String, Arc<Mutex<dyn VehicleDetector>>>,
    default_name: Option<String>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self {
            backends: HashMap::new(),
            default_name: None,
        }
    }

    /// Registry pre-loaded with the built-in backends.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(StubBackend::new());
        registry
    }

    /// Register a backend. The first registered backend becomes the default.
    pub fn register<B: VehicleDetector + 'static>(&mut self, backend: B) {
        let name = backend.name().to_string();
        if self.default_name.is_none() {
            self.default_name = Some(name.clone());
        }
        self.backends.insert(name, Arc::new(Mutex::new(backend)));
    }

    /// Look up a backend by name.
    pub fn get(&self, name: &str) -> Option<Arc<Mutex<dyn VehicleDetector>>> {
        self.backends.get(name).cloned()
    }

    /// Name of the default backend, if any backend is registered.
    pub fn default_name(&self) -> Option<&str> {
        self.default_name.as_deref()
    }

    /// List registered backend names.
    pub fn list(&self) -> Vec<String> {
        self.backends.keys().cloned().collect()
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_resolves_stub() {
        let registry = BackendRegistry::with_builtin();
        assert!(registry.get("stub").is_some());
        assert_eq!(registry.default_name(), Some("stub"));
        assert!(registry.get("onnx").is_none());
    }
}
