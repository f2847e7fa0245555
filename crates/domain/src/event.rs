//! Event: an immutable record of a status change observers were told about.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{EventId, SensorId};
use crate::sensor::Sensor;
use crate::status::AlarmStatus;

/// UTC timestamp attached to every event.
pub type Timestamp = DateTime<Utc>;

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SecurityEventKind {
    AlarmStatusChanged { status: AlarmStatus },
    CatDetected { present: bool },
    SensorStatusChanged { sensor_id: SensorId, active: bool },
}

/// A timestamped [`SecurityEventKind`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityEvent {
    pub id: EventId,
    pub timestamp: Timestamp,
    #[serde(flatten)]
    pub kind: SecurityEventKind,
}

impl SecurityEvent {
    /// Stamp `kind` with a fresh id and the current time.
    #[must_use]
    pub fn new(kind: SecurityEventKind) -> Self {
        Self {
            id: EventId::new(),
            timestamp: Utc::now(),
            kind,
        }
    }

    #[must_use]
    pub fn alarm_status_changed(status: AlarmStatus) -> Self {
        Self::new(SecurityEventKind::AlarmStatusChanged { status })
    }

    #[must_use]
    pub fn cat_detected(present: bool) -> Self {
        Self::new(SecurityEventKind::CatDetected { present })
    }

    #[must_use]
    pub fn sensor_status_changed(sensor: &Sensor) -> Self {
        Self::new(SecurityEventKind::SensorStatusChanged {
            sensor_id: sensor.id,
            active: sensor.active,
        })
    }
}
