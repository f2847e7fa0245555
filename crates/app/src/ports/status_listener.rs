//! Status-listener port: observers of the security state.
//!
//! Listeners are called synchronously from inside the operation that caused
//! the change, after it has been persisted. A listener error is logged and
//! skipped; it never reaches the caller and never undoes the change.

use catpoint_domain::error::BoxError;
use catpoint_domain::sensor::Sensor;
use catpoint_domain::status::AlarmStatus;

/// Receives status notifications from the
/// [`SecurityService`](crate::services::security_service::SecurityService).
pub trait StatusListener: Send + Sync {
    /// The alarm status transitioned to `status`.
    ///
    /// # Errors
    ///
    /// Any error is logged by the caller and otherwise ignored.
    fn on_alarm_status_changed(&self, status: AlarmStatus) -> Result<(), BoxError>;

    /// An image was analysed.
    ///
    /// # Errors
    ///
    /// Any error is logged by the caller and otherwise ignored.
    fn on_cat_detected(&self, _present: bool) -> Result<(), BoxError> {
        Ok(())
    }

    /// A sensor's activation flag flipped.
    ///
    /// # Errors
    ///
    /// Any error is logged by the caller and otherwise ignored.
    fn on_sensor_status_changed(&self, _sensor: &Sensor) -> Result<(), BoxError> {
        Ok(())
    }
}
