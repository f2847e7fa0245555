//! In-memory [`SecurityRepository`].

use std::future::Future;

use tokio::sync::RwLock;

use catpoint_app::ports::SecurityRepository;
use catpoint_domain::alarm::StateChange;
use catpoint_domain::error::SecurityError;
use catpoint_domain::id::SensorId;
use catpoint_domain::sensor::Sensor;
use catpoint_domain::status::{AlarmStatus, ArmingStatus};

#[derive(Debug, Default)]
struct State {
    sensors: Vec<Sensor>,
    arming_status: ArmingStatus,
    alarm_status: AlarmStatus,
}

impl State {
    fn upsert(&mut self, sensor: Sensor) {
        match self.sensors.iter_mut().find(|s| s.id == sensor.id) {
            Some(slot) => *slot = sensor,
            None => self.sensors.push(sensor),
        }
    }
}

/// Process-local repository. Starts disarmed, with no alarm and no sensors.
#[derive(Debug, Default)]
pub struct InMemorySecurityRepository {
    state: RwLock<State>,
}

impl InMemorySecurityRepository {
    /// Repository pre-populated with `sensors`.
    #[must_use]
    pub fn with_sensors(sensors: impl IntoIterator<Item = Sensor>) -> Self {
        let mut state = State::default();
        for sensor in sensors {
            state.upsert(sensor);
        }
        Self {
            state: RwLock::new(state),
        }
    }
}

impl SecurityRepository for InMemorySecurityRepository {
    fn get_sensors(&self) -> impl Future<Output = Result<Vec<Sensor>, SecurityError>> + Send {
        async move { Ok(self.state.read().await.sensors.clone()) }
    }

    fn add_sensor(&self, sensor: Sensor) -> impl Future<Output = Result<Sensor, SecurityError>> + Send {
        async move {
            self.state.write().await.upsert(sensor.clone());
            Ok(sensor)
        }
    }

    fn remove_sensor(&self, id: SensorId) -> impl Future<Output = Result<(), SecurityError>> + Send {
        async move {
            self.state.write().await.sensors.retain(|s| s.id != id);
            Ok(())
        }
    }

    fn update_sensor(
        &self,
        sensor: Sensor,
    ) -> impl Future<Output = Result<Sensor, SecurityError>> + Send {
        async move {
            self.state.write().await.upsert(sensor.clone());
            Ok(sensor)
        }
    }

    fn get_arming_status(&self) -> impl Future<Output = Result<ArmingStatus, SecurityError>> + Send {
        async move { Ok(self.state.read().await.arming_status) }
    }

    fn set_arming_status(
        &self,
        status: ArmingStatus,
    ) -> impl Future<Output = Result<(), SecurityError>> + Send {
        async move {
            self.state.write().await.arming_status = status;
            Ok(())
        }
    }

    fn get_alarm_status(&self) -> impl Future<Output = Result<AlarmStatus, SecurityError>> + Send {
        async move { Ok(self.state.read().await.alarm_status) }
    }

    fn set_alarm_status(
        &self,
        status: AlarmStatus,
    ) -> impl Future<Output = Result<(), SecurityError>> + Send {
        async move {
            self.state.write().await.alarm_status = status;
            Ok(())
        }
    }

    fn apply(&self, change: StateChange) -> impl Future<Output = Result<(), SecurityError>> + Send {
        async move {
            let mut state = self.state.write().await;
            for sensor in change.sensors {
                state.upsert(sensor);
            }
            if let Some(status) = change.arming_status {
                state.arming_status = status;
            }
            if let Some(status) = change.alarm_status {
                state.alarm_status = status;
            }
            Ok(())
        }
    }
}
