//! Storage port: persistence of the sensor set and both statuses.
//!
//! Implementations must be last-write-wins and immediately read-consistent:
//! a value written by one call is what the next read returns.

use std::future::Future;

use catpoint_domain::alarm::StateChange;
use catpoint_domain::error::SecurityError;
use catpoint_domain::id::SensorId;
use catpoint_domain::sensor::Sensor;
use catpoint_domain::status::{AlarmStatus, ArmingStatus};

/// Persistence of the security state.
pub trait SecurityRepository: Send + Sync {
    /// Every registered sensor.
    fn get_sensors(&self) -> impl Future<Output = Result<Vec<Sensor>, SecurityError>> + Send;

    /// Register a sensor. Adding an id that is already stored replaces it.
    fn add_sensor(&self, sensor: Sensor) -> impl Future<Output = Result<Sensor, SecurityError>> + Send;

    /// Unregister a sensor. Removing an unknown id is not an error here.
    fn remove_sensor(&self, id: SensorId) -> impl Future<Output = Result<(), SecurityError>> + Send;

    /// Overwrite a stored sensor.
    fn update_sensor(
        &self,
        sensor: Sensor,
    ) -> impl Future<Output = Result<Sensor, SecurityError>> + Send;

    fn get_arming_status(&self) -> impl Future<Output = Result<ArmingStatus, SecurityError>> + Send;

    fn set_arming_status(
        &self,
        status: ArmingStatus,
    ) -> impl Future<Output = Result<(), SecurityError>> + Send;

    fn get_alarm_status(&self) -> impl Future<Output = Result<AlarmStatus, SecurityError>> + Send;

    fn set_alarm_status(
        &self,
        status: AlarmStatus,
    ) -> impl Future<Output = Result<(), SecurityError>> + Send;

    /// Persist every value of a [`StateChange`].
    ///
    /// The default writes sensors, then the arming status, then the alarm
    /// status, one call at a time. Adapters able to commit atomically should
    /// override it so that a failure leaves nothing written.
    fn apply(&self, change: StateChange) -> impl Future<Output = Result<(), SecurityError>> + Send {
        async move {
            for sensor in change.sensors {
                self.update_sensor(sensor).await?;
            }
            if let Some(status) = change.arming_status {
                self.set_arming_status(status).await?;
            }
            if let Some(status) = change.alarm_status {
                self.set_alarm_status(status).await?;
            }
            Ok(())
        }
    }
}

impl<T: SecurityRepository> SecurityRepository for std::sync::Arc<T> {
    fn get_sensors(&self) -> impl Future<Output = Result<Vec<Sensor>, SecurityError>> + Send {
        (**self).get_sensors()
    }

    fn add_sensor(&self, sensor: Sensor) -> impl Future<Output = Result<Sensor, SecurityError>> + Send {
        (**self).add_sensor(sensor)
    }

    fn remove_sensor(&self, id: SensorId) -> impl Future<Output = Result<(), SecurityError>> + Send {
        (**self).remove_sensor(id)
    }

    fn update_sensor(
        &self,
        sensor: Sensor,
    ) -> impl Future<Output = Result<Sensor, SecurityError>> + Send {
        (**self).update_sensor(sensor)
    }

    fn get_arming_status(&self) -> impl Future<Output = Result<ArmingStatus, SecurityError>> + Send {
        (**self).get_arming_status()
    }

    fn set_arming_status(
        &self,
        status: ArmingStatus,
    ) -> impl Future<Output = Result<(), SecurityError>> + Send {
        (**self).set_arming_status(status)
    }

    fn get_alarm_status(&self) -> impl Future<Output = Result<AlarmStatus, SecurityError>> + Send {
        (**self).get_alarm_status()
    }

    fn set_alarm_status(
        &self,
        status: AlarmStatus,
    ) -> impl Future<Output = Result<(), SecurityError>> + Send {
        (**self).set_alarm_status(status)
    }

    fn apply(&self, change: StateChange) -> impl Future<Output = Result<(), SecurityError>> + Send {
        (**self).apply(change)
    }
}
