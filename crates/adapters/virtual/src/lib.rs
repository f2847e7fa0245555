//! # catpoint-adapter-virtual
//!
//! Virtual/demo collaborators for running the security core without a
//! database or a real cat detector.
//!
//! ## Provided collaborators
//!
//! | Type | Port | Behaviour |
//! |------|------|-----------|
//! | [`InMemorySecurityRepository`] | `SecurityRepository` | Holds sensors and statuses in memory, commits each change atomically |
//! | [`FakeImageAnalysis`] | `ImageAnalysis` | Fixed, scripted, brightness-based, or always-failing verdicts |
//!
//! [`demo_sensors`] returns a small house (door, window, motion) to seed a
//! repository with.
//!
//! ## Dependency rule
//!
//! Depends on `catpoint-app` (port traits) and `catpoint-domain` only.

mod camera;
mod repository;

pub use camera::FakeImageAnalysis;
pub use repository::InMemorySecurityRepository;

use catpoint_domain::id::SensorId;
use catpoint_domain::sensor::{Sensor, SensorType};

/// One inactive sensor of each type.
#[must_use]
pub fn demo_sensors() -> Vec<Sensor> {
    [
        ("Front door", SensorType::Door),
        ("Living room window", SensorType::Window),
        ("Hallway motion", SensorType::Motion),
    ]
    .into_iter()
    .map(|(name, sensor_type)| Sensor {
        id: SensorId::new(),
        name: name.to_string(),
        sensor_type,
        active: false,
    })
    .collect()
}
