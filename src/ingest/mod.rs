//! Frame ingestion sources.
//!
//! A `FrameSource` yields sequential frames for exactly one analysis session:
//! - `stub://<name>` - synthetic parking-lot frames, deterministic, for tests
//!   and the demo; an optional `?frames=N` suffix bounds the stream
//! - a local `.jpg`/`.png` path - decoded once, yielding a single frame
//!
//! Sources that cannot be opened fail with `SourceUnreadable` at construction
//! time. A source that runs dry yields `None`, which is the normal
//! end-of-stream signal, not an error. Frames carry a monotonically
//! increasing index starting at 0; ordering is strict because the temporal
//! stabilizer depends on it.

mod source;
mod still;

pub use source::{FrameSource, SourceStats};
