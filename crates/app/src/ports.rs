//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod image_analysis;
pub mod status_listener;
pub mod storage;

pub use image_analysis::ImageAnalysis;
pub use status_listener::StatusListener;
pub use storage::SecurityRepository;
