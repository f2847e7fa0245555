//! End-to-end tests for the security core on real storage.
//!
//! Each test wires `SecurityService` to an in-memory `SQLite` database (real
//! migrations, real repository) and the fake image analysis, then drives it
//! through the public facade only.

use std::sync::{Arc, Mutex};

use catpoint_adapter_storage_sqlite_sqlx::{Config, SqliteSecurityRepository};
use catpoint_adapter_virtual::{FakeImageAnalysis, demo_sensors};
use catpoint_app::event_bus::InProcessEventBus;
use catpoint_app::ports::StatusListener;
use catpoint_app::services::security_service::SecurityService;
use catpoint_domain::error::{BoxError, SecurityError};
use catpoint_domain::event::SecurityEventKind;
use catpoint_domain::image::Image;
use catpoint_domain::sensor::{Sensor, SensorType};
use catpoint_domain::status::{AlarmStatus, ArmingStatus};

type Service = SecurityService<SqliteSecurityRepository, FakeImageAnalysis>;

async fn service(camera: FakeImageAnalysis) -> Service {
    let db = Config {
        database_url: "sqlite::memory:".to_string(),
    }
    .build()
    .await
    .expect("in-memory database should initialise");

    SecurityService::new(SqliteSecurityRepository::new(db.pool().clone()), camera)
}

async fn register(svc: &Service, sensors: Vec<Sensor>) -> Vec<Sensor> {
    let mut registered = Vec::new();
    for sensor in sensors {
        registered.push(svc.add_sensor(sensor).await.unwrap());
    }
    registered
}

#[derive(Default)]
struct AlarmLog(Mutex<Vec<AlarmStatus>>);

impl AlarmLog {
    fn entries(&self) -> Vec<AlarmStatus> {
        self.0.lock().unwrap().clone()
    }
}

impl StatusListener for AlarmLog {
    fn on_alarm_status_changed(&self, status: AlarmStatus) -> Result<(), BoxError> {
        self.0.lock().unwrap().push(status);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sensor escalation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_escalate_door_sensor_from_pending_to_alarm() {
    let svc = service(FakeImageAnalysis::always(false)).await;
    let door = Sensor::builder()
        .name("Front door")
        .sensor_type(SensorType::Door)
        .build()
        .unwrap();
    register(&svc, vec![door.clone()]).await;
    svc.set_arming_status(ArmingStatus::ArmedHome).await.unwrap();

    svc.change_sensor_activation_status(door.id, true).await.unwrap();
    assert_eq!(svc.get_alarm_status().await.unwrap(), AlarmStatus::PendingAlarm);

    svc.change_sensor_activation_status(door.id, true).await.unwrap();
    assert_eq!(svc.get_alarm_status().await.unwrap(), AlarmStatus::Alarm);
}

#[tokio::test]
async fn should_return_to_no_alarm_when_last_sensor_closes() {
    let svc = service(FakeImageAnalysis::always(false)).await;
    let sensors = register(&svc, demo_sensors()).await;
    svc.set_arming_status(ArmingStatus::ArmedAway).await.unwrap();

    svc.change_sensor_activation_status(sensors[0].id, true).await.unwrap();
    svc.change_sensor_activation_status(sensors[0].id, false).await.unwrap();

    assert_eq!(svc.get_alarm_status().await.unwrap(), AlarmStatus::NoAlarm);
    assert!(svc.get_sensors().await.unwrap().iter().all(|s| !s.active));
}

#[tokio::test]
async fn should_keep_alarm_through_sensor_changes() {
    let svc = service(FakeImageAnalysis::always(false)).await;
    let sensors = register(&svc, demo_sensors()).await;
    svc.set_arming_status(ArmingStatus::ArmedHome).await.unwrap();
    svc.change_sensor_activation_status(sensors[0].id, true).await.unwrap();
    svc.change_sensor_activation_status(sensors[1].id, true).await.unwrap();
    assert_eq!(svc.get_alarm_status().await.unwrap(), AlarmStatus::Alarm);

    for sensor in &sensors {
        svc.change_sensor_activation_status(sensor.id, false).await.unwrap();
    }

    assert_eq!(svc.get_alarm_status().await.unwrap(), AlarmStatus::Alarm);
}

// ---------------------------------------------------------------------------
// Arming
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_reset_five_active_sensors_when_armed_away() {
    let svc = service(FakeImageAnalysis::always(false)).await;
    let sensors: Vec<Sensor> = (0..5)
        .map(|_| {
            Sensor::builder()
                .name("Window")
                .sensor_type(SensorType::Window)
                .build()
                .unwrap()
        })
        .collect();
    let sensors = register(&svc, sensors).await;
    svc.set_arming_status(ArmingStatus::ArmedHome).await.unwrap();
    for sensor in &sensors {
        svc.change_sensor_activation_status(sensor.id, true).await.unwrap();
    }
    assert_eq!(svc.get_alarm_status().await.unwrap(), AlarmStatus::Alarm);

    svc.set_arming_status(ArmingStatus::Disarmed).await.unwrap();
    svc.set_arming_status(ArmingStatus::ArmedAway).await.unwrap();

    let stored = svc.get_sensors().await.unwrap();
    assert_eq!(stored.len(), 5);
    assert!(stored.iter().all(|s| !s.active));
    assert_eq!(svc.get_arming_status().await.unwrap(), ArmingStatus::ArmedAway);
    assert_eq!(svc.get_alarm_status().await.unwrap(), AlarmStatus::NoAlarm);
}

#[tokio::test]
async fn should_disarm_from_alarm_to_no_alarm() {
    let svc = service(FakeImageAnalysis::always(true)).await;
    svc.set_arming_status(ArmingStatus::ArmedHome).await.unwrap();
    svc.process_image(&Image::blank(16, 16).unwrap()).await.unwrap();
    assert_eq!(svc.get_alarm_status().await.unwrap(), AlarmStatus::Alarm);

    let status = svc.set_arming_status(ArmingStatus::Disarmed).await.unwrap();

    assert_eq!(status, AlarmStatus::NoAlarm);
    assert_eq!(svc.get_alarm_status().await.unwrap(), AlarmStatus::NoAlarm);
}

// ---------------------------------------------------------------------------
// Camera
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_raise_then_clear_alarm_from_camera_evidence() {
    let svc = service(FakeImageAnalysis::scripted([true, false])).await;
    register(&svc, demo_sensors()).await;
    svc.set_arming_status(ArmingStatus::ArmedHome).await.unwrap();
    let log = Arc::new(AlarmLog::default());
    svc.add_status_listener(log.clone()).await;

    let raised = svc.process_image(&Image::blank(16, 16).unwrap()).await.unwrap();
    let cleared = svc.process_image(&Image::blank(16, 16).unwrap()).await.unwrap();

    assert_eq!(raised, AlarmStatus::Alarm);
    assert_eq!(cleared, AlarmStatus::NoAlarm);
    assert_eq!(log.entries(), vec![AlarmStatus::Alarm, AlarmStatus::NoAlarm]);
}

#[tokio::test]
async fn should_use_threshold_with_brightness_detector() {
    let svc = service(FakeImageAnalysis::brightness()).await;
    svc.set_arming_status(ArmingStatus::ArmedHome).await.unwrap();

    let dark = svc.process_image(&Image::blank(4, 4).unwrap()).await.unwrap();
    assert_eq!(dark, AlarmStatus::NoAlarm);

    let bright = Image::rgb(4, 4, vec![250; 48]).unwrap();
    let status = svc.process_image(&bright).await.unwrap();
    assert_eq!(status, AlarmStatus::Alarm);
}

#[tokio::test]
async fn should_leave_state_untouched_when_camera_is_unavailable() {
    let svc = service(FakeImageAnalysis::unavailable()).await;
    svc.set_arming_status(ArmingStatus::ArmedHome).await.unwrap();

    let result = svc.process_image(&Image::blank(4, 4).unwrap()).await;

    assert!(matches!(result, Err(SecurityError::CollaboratorUnavailable(..))));
    assert_eq!(svc.get_alarm_status().await.unwrap(), AlarmStatus::NoAlarm);
}

// ---------------------------------------------------------------------------
// Observers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_broadcast_changes_on_event_bus() {
    let svc = service(FakeImageAnalysis::always(true)).await;
    let sensors = register(&svc, demo_sensors()).await;
    svc.set_arming_status(ArmingStatus::ArmedHome).await.unwrap();
    let bus = Arc::new(InProcessEventBus::new(16));
    let mut rx = bus.subscribe();
    svc.add_status_listener(bus.clone()).await;

    svc.change_sensor_activation_status(sensors[2].id, true).await.unwrap();

    let first = rx.recv().await.unwrap();
    let second = rx.recv().await.unwrap();
    assert_eq!(
        first.kind,
        SecurityEventKind::SensorStatusChanged {
            sensor_id: sensors[2].id,
            active: true,
        }
    );
    assert_eq!(
        second.kind,
        SecurityEventKind::AlarmStatusChanged {
            status: AlarmStatus::PendingAlarm
        }
    );
}

#[tokio::test]
async fn should_reject_unknown_sensor_without_side_effects() {
    let svc = service(FakeImageAnalysis::always(false)).await;
    register(&svc, demo_sensors()).await;
    let stranger = Sensor::builder().name("Neighbour's shed").build().unwrap();

    let change = svc.change_sensor_activation_status(stranger.id, true).await;
    let removal = svc.remove_sensor(stranger.id).await;

    assert!(matches!(change, Err(SecurityError::InvalidSensorReference(_))));
    assert!(matches!(removal, Err(SecurityError::InvalidSensorReference(_))));
    assert_eq!(svc.get_sensors().await.unwrap().len(), 3);
}
