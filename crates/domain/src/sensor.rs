//! Sensor: one physical door, window, or motion sensor.
//!
//! Sensors are passive records. Their `active` flag is only flipped by the
//! alarm state machine when an activation change or an arming change is
//! processed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ParseEnumError, SecurityError, ValidationError};
use crate::id::SensorId;

/// Kind of physical sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SensorType {
    Door,
    Window,
    Motion,
}

impl SensorType {
    pub const ALL: [Self; 3] = [Self::Door, Self::Window, Self::Motion];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Door => "DOOR",
            Self::Window => "WINDOW",
            Self::Motion => "MOTION",
        }
    }
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SensorType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "sensor type",
                value: s.to_string(),
            })
    }
}

/// A named sensor with a binary active/inactive state.
///
/// Names are free-form and need not be unique; identity is the [`SensorId`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sensor {
    pub id: SensorId,
    pub name: String,
    pub sensor_type: SensorType,
    pub active: bool,
}

impl Sensor {
    /// Create a builder for constructing a [`Sensor`].
    #[must_use]
    pub fn builder() -> SensorBuilder {
        SensorBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SecurityError::Validation`] when `name` is empty.
    pub fn validate(&self) -> Result<(), SecurityError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }
}

/// Step-by-step builder for [`Sensor`].
#[derive(Debug, Default)]
pub struct SensorBuilder {
    id: Option<SensorId>,
    name: Option<String>,
    sensor_type: Option<SensorType>,
    active: bool,
}

impl SensorBuilder {
    #[must_use]
    pub fn id(mut self, id: SensorId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn sensor_type(mut self, sensor_type: SensorType) -> Self {
        self.sensor_type = Some(sensor_type);
        self
    }

    #[must_use]
    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Consume the builder, validate, and return a [`Sensor`].
    ///
    /// The sensor type defaults to [`SensorType::Door`] and the sensor
    /// starts inactive unless told otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`SecurityError::Validation`] if `name` is missing or blank.
    pub fn build(self) -> Result<Sensor, SecurityError> {
        let sensor = Sensor {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            sensor_type: self.sensor_type.unwrap_or(SensorType::Door),
            active: self.active,
        };
        sensor.validate()?;
        Ok(sensor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_build_inactive_sensor_by_default() {
        let sensor = Sensor::builder()
            .name("Front door")
            .sensor_type(SensorType::Door)
            .build()
            .unwrap();
        assert_eq!(sensor.name, "Front door");
        assert_eq!(sensor.sensor_type, SensorType::Door);
        assert!(!sensor.active);
    }

    #[test]
    fn should_return_validation_error_when_name_is_missing() {
        let result = Sensor::builder().sensor_type(SensorType::Motion).build();
        assert!(matches!(
            result,
            Err(SecurityError::Validation(ValidationError::EmptyName))
        ));
    }

    #[test]
    fn should_return_validation_error_when_name_is_blank() {
        let result = Sensor::builder().name("   ").build();
        assert!(matches!(
            result,
            Err(SecurityError::Validation(ValidationError::EmptyName))
        ));
    }

    #[test]
    fn should_allow_two_sensors_with_the_same_name() {
        let a = Sensor::builder().name("Hallway").build().unwrap();
        let b = Sensor::builder().name("Hallway").build().unwrap();
        assert_ne!(a.id, b.id);
        assert_ne!(a, b);
    }

    #[test]
    fn should_keep_given_id() {
        let id = SensorId::new();
        let sensor = Sensor::builder()
            .id(id)
            .name("Garage")
            .sensor_type(SensorType::Window)
            .active(true)
            .build()
            .unwrap();
        assert_eq!(sensor.id, id);
        assert!(sensor.active);
    }

    #[test]
    fn should_parse_sensor_type_names() {
        for kind in SensorType::ALL {
            assert_eq!(kind.as_str().parse::<SensorType>(), Ok(kind));
        }
        let err = "DOORBELL".parse::<SensorType>().unwrap_err();
        assert_eq!(err.kind, "sensor type");
        assert_eq!(err.to_string(), "unknown sensor type \"DOORBELL\"");
    }

    #[test]
    fn should_roundtrip_through_serde_json() {
        let sensor = Sensor::builder()
            .name("Kitchen motion")
            .sensor_type(SensorType::Motion)
            .build()
            .unwrap();
        let json = serde_json::to_string(&sensor).unwrap();
        assert!(json.contains("\"MOTION\""));
        let parsed: Sensor = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, sensor);
    }
}
