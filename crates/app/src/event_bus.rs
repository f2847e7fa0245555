//! In-process event bus backed by a tokio broadcast channel.

use tokio::sync::broadcast;

use catpoint_domain::error::BoxError;
use catpoint_domain::event::SecurityEvent;
use catpoint_domain::sensor::Sensor;
use catpoint_domain::status::AlarmStatus;

use crate::ports::StatusListener;

/// Status listener that republishes every notification as a
/// [`SecurityEvent`] on a tokio [`broadcast`] channel.
///
/// Publishing succeeds even when there are no active subscribers
/// (the event is simply dropped).
pub struct InProcessEventBus {
    sender: broadcast::Sender<SecurityEvent>,
}

impl InProcessEventBus {
    /// Create a new event bus with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events on this bus.
    ///
    /// Returns a receiver that will get all events published *after*
    /// the subscription is created.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SecurityEvent> {
        self.sender.subscribe()
    }

    fn publish(&self, event: SecurityEvent) {
        // Only fails when nobody is subscribed.
        let _ = self.sender.send(event);
    }
}

impl StatusListener for InProcessEventBus {
    fn on_alarm_status_changed(&self, status: AlarmStatus) -> Result<(), BoxError> {
        self.publish(SecurityEvent::alarm_status_changed(status));
        Ok(())
    }

    fn on_cat_detected(&self, present: bool) -> Result<(), BoxError> {
        self.publish(SecurityEvent::cat_detected(present));
        Ok(())
    }

    fn on_sensor_status_changed(&self, sensor: &Sensor) -> Result<(), BoxError> {
        self.publish(SecurityEvent::sensor_status_changed(sensor));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catpoint_domain::event::SecurityEventKind;

    #[tokio::test]
    async fn should_deliver_alarm_change_to_subscriber() {
        let bus = InProcessEventBus::new(16);
        let mut rx = bus.subscribe();

        bus.on_alarm_status_changed(AlarmStatus::PendingAlarm).unwrap();

        let received = rx.recv().await.unwrap();
        assert_eq!(
            received.kind,
            SecurityEventKind::AlarmStatusChanged {
                status: AlarmStatus::PendingAlarm
            }
        );
    }

    #[tokio::test]
    async fn should_deliver_event_to_multiple_subscribers() {
        let bus = InProcessEventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.on_cat_detected(true).unwrap();

        let r1 = rx1.recv().await.unwrap();
        let r2 = rx2.recv().await.unwrap();
        assert_eq!(r1.id, r2.id);
        assert_eq!(r1.kind, SecurityEventKind::CatDetected { present: true });
    }

    #[tokio::test]
    async fn should_succeed_when_no_subscribers() {
        let bus = InProcessEventBus::new(16);
        assert!(bus.on_alarm_status_changed(AlarmStatus::Alarm).is_ok());
    }

    #[tokio::test]
    async fn should_publish_sensor_flag() {
        let bus = InProcessEventBus::new(16);
        let mut rx = bus.subscribe();
        let sensor = Sensor::builder().name("Patio door").active(true).build().unwrap();

        bus.on_sensor_status_changed(&sensor).unwrap();

        let received = rx.recv().await.unwrap();
        assert_eq!(
            received.kind,
            SecurityEventKind::SensorStatusChanged {
                sensor_id: sensor.id,
                active: true,
            }
        );
    }

    #[tokio::test]
    async fn should_not_deliver_events_published_before_subscription() {
        let bus = InProcessEventBus::new(16);
        bus.on_cat_detected(false).unwrap();

        let mut rx = bus.subscribe();
        bus.on_alarm_status_changed(AlarmStatus::NoAlarm).unwrap();

        let received = rx.recv().await.unwrap();
        assert_eq!(
            received.kind,
            SecurityEventKind::AlarmStatusChanged {
                status: AlarmStatus::NoAlarm
            }
        );
    }
}
