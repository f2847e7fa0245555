//! Alarm state machine: the rules mapping events to alarm-status transitions.
//!
//! The machine is built from a snapshot of the persisted state (arming status,
//! alarm status, sensor set). Each handler applies one event to that snapshot
//! and returns the [`StateChange`] the caller must persist. Handlers are total:
//! they never fail, and an event that changes nothing yields an empty change.
//!
//! Rules, in short:
//!
//! | Event | Condition | Alarm status |
//! |-------|-----------|--------------|
//! | sensor activated | armed | one rung up the ladder (saturates at `ALARM`) |
//! | sensor activated | disarmed | unchanged |
//! | sensor deactivated | `PENDING_ALARM` and no sensor left active | `NO_ALARM` |
//! | cat present | `ARMED_HOME` | `ALARM` |
//! | cat absent | no sensor active | `NO_ALARM` |
//! | disarmed | always | `NO_ALARM` |
//! | armed (home/away) | always | unchanged, every sensor reset to inactive |
//!
//! Sensor events never lower `ALARM`; only disarming or camera evidence can.

use crate::id::SensorId;
use crate::sensor::Sensor;
use crate::status::{AlarmStatus, ArmingStatus};

/// Values an event handler asks to persist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateChange {
    /// New arming status, when the event sets one.
    pub arming_status: Option<ArmingStatus>,
    /// New alarm status. Only `Some` for a real transition.
    pub alarm_status: Option<AlarmStatus>,
    /// Sensors whose `active` flag changed, with their new value.
    pub sensors: Vec<Sensor>,
}

impl StateChange {
    /// `true` when there is nothing to persist.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arming_status.is_none() && self.alarm_status.is_none() && self.sensors.is_empty()
    }
}

/// Decision core over one snapshot of the security state.
#[derive(Debug, Clone)]
pub struct AlarmStateMachine {
    arming_status: ArmingStatus,
    alarm_status: AlarmStatus,
    sensors: Vec<Sensor>,
}

impl AlarmStateMachine {
    /// Build a machine from the persisted state.
    #[must_use]
    pub fn new(arming_status: ArmingStatus, alarm_status: AlarmStatus, sensors: Vec<Sensor>) -> Self {
        Self {
            arming_status,
            alarm_status,
            sensors,
        }
    }

    #[must_use]
    pub fn arming_status(&self) -> ArmingStatus {
        self.arming_status
    }

    #[must_use]
    pub fn alarm_status(&self) -> AlarmStatus {
        self.alarm_status
    }

    #[must_use]
    pub fn sensors(&self) -> &[Sensor] {
        &self.sensors
    }

    /// Look up a sensor of the snapshot by id.
    #[must_use]
    pub fn sensor(&self, id: SensorId) -> Option<&Sensor> {
        self.sensors.iter().find(|s| s.id == id)
    }

    /// Whether any sensor of the snapshot is currently active.
    #[must_use]
    pub fn any_sensor_active(&self) -> bool {
        self.sensors.iter().any(|s| s.active)
    }

    /// Mark a sensor active and escalate when armed.
    ///
    /// A sensor that re-activates while already active still escalates, so
    /// a second trigger during `PENDING_ALARM` raises `ALARM`.
    pub fn on_sensor_activated(&mut self, id: SensorId) -> StateChange {
        let mut change = StateChange::default();
        if !self.set_sensor_active(id, true, &mut change) {
            return change;
        }
        if self.arming_status.is_armed() {
            self.transition(self.alarm_status.escalated(), &mut change);
        }
        change
    }

    /// Mark a sensor inactive and stand down a pending alarm once every
    /// sensor is quiet.
    ///
    /// Deactivating a sensor that is already inactive changes nothing.
    pub fn on_sensor_deactivated(&mut self, id: SensorId) -> StateChange {
        let mut change = StateChange::default();
        let was_active = self.sensor(id).is_some_and(|s| s.active);
        if !was_active {
            return change;
        }
        self.set_sensor_active(id, false, &mut change);
        if self.alarm_status == AlarmStatus::PendingAlarm && !self.any_sensor_active() {
            self.transition(AlarmStatus::NoAlarm, &mut change);
        }
        change
    }

    /// Apply the camera verdict.
    ///
    /// A cat while armed-home raises `ALARM` whatever the sensors say. No cat
    /// with every sensor quiet clears the alarm status, `ALARM` included.
    pub fn on_cat_detected(&mut self, present: bool) -> StateChange {
        let mut change = StateChange::default();
        if present && self.arming_status == ArmingStatus::ArmedHome {
            self.transition(AlarmStatus::Alarm, &mut change);
        } else if !present && !self.any_sensor_active() {
            self.transition(AlarmStatus::NoAlarm, &mut change);
        }
        change
    }

    /// Switch the arming profile.
    ///
    /// Disarming always resets the alarm status to `NO_ALARM`, so later
    /// sensor events are evaluated from the bottom of the ladder. Arming
    /// resets every sensor to inactive and leaves the alarm status alone.
    pub fn on_arming_changed(&mut self, status: ArmingStatus) -> StateChange {
        let mut change = StateChange {
            arming_status: Some(status),
            ..StateChange::default()
        };
        self.arming_status = status;

        if status.is_armed() {
            for sensor in self.sensors.iter_mut().filter(|s| s.active) {
                sensor.active = false;
                change.sensors.push(sensor.clone());
            }
        } else {
            self.transition(AlarmStatus::NoAlarm, &mut change);
        }
        change
    }

    /// Set the flag of a known sensor, recording it when it flips.
    /// Returns `false` when the id is not part of the snapshot.
    fn set_sensor_active(&mut self, id: SensorId, active: bool, change: &mut StateChange) -> bool {
        let Some(sensor) = self.sensors.iter_mut().find(|s| s.id == id) else {
            return false;
        };
        if sensor.active != active {
            sensor.active = active;
            change.sensors.push(sensor.clone());
        }
        true
    }

    fn transition(&mut self, to: AlarmStatus, change: &mut StateChange) {
        if self.alarm_status != to {
            self.alarm_status = to;
            change.alarm_status = Some(to);
        }
    }
}
