mod adapter;
mod backend;
mod backends;
mod registry;
mod result;

pub use adapter::DetectorAdapter;
pub use backend::VehicleDetector;
pub use backends::StubBackend;
pub use registry::BackendRegistry;
pub use result::{Detection, VehicleClass};
