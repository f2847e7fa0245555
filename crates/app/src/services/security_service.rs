//! Security service: the only entry point for sensor management, arming,
//! and image submission.
//!
//! Every mutating operation runs under one async mutex for its whole
//! read → decide → persist → notify sequence, so concurrent callers never
//! interleave on the sensor set or either status. Listeners are told about a
//! change only after the repository accepted it.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use catpoint_domain::alarm::{AlarmStateMachine, StateChange};
use catpoint_domain::error::{BoxError, InvalidSensorReference, SecurityError};
use catpoint_domain::id::SensorId;
use catpoint_domain::image::Image;
use catpoint_domain::sensor::Sensor;
use catpoint_domain::status::{AlarmStatus, ArmingStatus};

use crate::config::{ConfigError, DEFAULT_CONFIDENCE_THRESHOLD, SecurityConfig};
use crate::ports::{ImageAnalysis, SecurityRepository, StatusListener};

/// Application service owning the alarm rules, persistence sequencing, and
/// listener fan-out.
pub struct SecurityService<R, I> {
    repo: R,
    image_analysis: I,
    confidence_threshold: f32,
    listeners: RwLock<Vec<Arc<dyn StatusListener>>>,
    gate: Mutex<()>,
}

impl<R, I> SecurityService<R, I>
where
    R: SecurityRepository,
    I: ImageAnalysis,
{
    /// Create a service with the default confidence threshold.
    pub fn new(repo: R, image_analysis: I) -> Self {
        Self::build(repo, image_analysis, DEFAULT_CONFIDENCE_THRESHOLD)
    }

    /// Create a service using the threshold from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if the threshold is not a finite
    /// percentage.
    pub fn with_config(
        repo: R,
        image_analysis: I,
        config: &SecurityConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(repo, image_analysis, config.confidence_threshold))
    }

    fn build(repo: R, image_analysis: I, confidence_threshold: f32) -> Self {
        Self {
            repo,
            image_analysis,
            confidence_threshold,
            listeners: RwLock::new(Vec::new()),
            gate: Mutex::new(()),
        }
    }

    /// Threshold handed to the image-analysis collaborator.
    #[must_use]
    pub fn confidence_threshold(&self) -> f32 {
        self.confidence_threshold
    }

    // ── Listener registry ─────────────────────────────────────────

    /// Register a listener. Returns `false` if this exact listener was
    /// already registered.
    pub async fn add_status_listener(&self, listener: Arc<dyn StatusListener>) -> bool {
        let mut listeners = self.listeners.write().await;
        if listeners.iter().any(|l| Arc::ptr_eq(l, &listener)) {
            return false;
        }
        listeners.push(listener);
        true
    }

    /// Unregister a listener. Returns `false` if it was not registered.
    pub async fn remove_status_listener(&self, listener: &Arc<dyn StatusListener>) -> bool {
        let mut listeners = self.listeners.write().await;
        let before = listeners.len();
        listeners.retain(|l| !Arc::ptr_eq(l, listener));
        listeners.len() != before
    }

    // ── Reads ─────────────────────────────────────────────────────

    /// Every registered sensor.
    ///
    /// # Errors
    ///
    /// Returns a repository error propagated unchanged.
    pub async fn get_sensors(&self) -> Result<Vec<Sensor>, SecurityError> {
        let _guard = self.gate.lock().await;
        self.repo.get_sensors().await
    }

    /// Current alarm status.
    ///
    /// # Errors
    ///
    /// Returns a repository error propagated unchanged.
    pub async fn get_alarm_status(&self) -> Result<AlarmStatus, SecurityError> {
        let _guard = self.gate.lock().await;
        self.repo.get_alarm_status().await
    }

    /// Current arming status.
    ///
    /// # Errors
    ///
    /// Returns a repository error propagated unchanged.
    pub async fn get_arming_status(&self) -> Result<ArmingStatus, SecurityError> {
        let _guard = self.gate.lock().await;
        self.repo.get_arming_status().await
    }

    // ── Sensor management ─────────────────────────────────────────

    /// Register a sensor. Has no effect on the alarm status.
    ///
    /// Adding a sensor whose id is already registered changes nothing and
    /// returns the stored sensor.
    ///
    /// # Errors
    ///
    /// Returns [`SecurityError::Validation`] if the sensor is invalid, or a
    /// repository error.
    #[tracing::instrument(skip(self, sensor), fields(sensor_id = %sensor.id, sensor_name = %sensor.name))]
    pub async fn add_sensor(&self, sensor: Sensor) -> Result<Sensor, SecurityError> {
        sensor.validate()?;
        let _guard = self.gate.lock().await;
        let sensors = self.repo.get_sensors().await?;
        if let Some(existing) = sensors.into_iter().find(|s| s.id == sensor.id) {
            tracing::debug!("sensor already registered");
            return Ok(existing);
        }
        self.repo.add_sensor(sensor).await
    }

    /// Unregister a sensor. Has no effect on the alarm status.
    ///
    /// # Errors
    ///
    /// Returns [`SecurityError::InvalidSensorReference`] if no sensor with
    /// `id` is registered, or a repository error.
    #[tracing::instrument(skip(self))]
    pub async fn remove_sensor(&self, id: SensorId) -> Result<(), SecurityError> {
        let _guard = self.gate.lock().await;
        let sensors = self.repo.get_sensors().await?;
        if !sensors.iter().any(|s| s.id == id) {
            return Err(InvalidSensorReference { id }.into());
        }
        self.repo.remove_sensor(id).await
    }

    /// Activate or deactivate a registered sensor and apply the alarm rules.
    ///
    /// Returns the sensor as stored afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`SecurityError::InvalidSensorReference`] if no sensor with
    /// `id` is registered, or a repository error. Nothing is persisted and
    /// no listener is notified on error.
    #[tracing::instrument(skip(self))]
    pub async fn change_sensor_activation_status(
        &self,
        id: SensorId,
        active: bool,
    ) -> Result<Sensor, SecurityError> {
        let _guard = self.gate.lock().await;
        let mut machine = self.load_state().await?;
        if machine.sensor(id).is_none() {
            return Err(InvalidSensorReference { id }.into());
        }

        let change = if active {
            machine.on_sensor_activated(id)
        } else {
            machine.on_sensor_deactivated(id)
        };
        self.persist(&change).await?;
        self.notify_change(&change).await;

        machine
            .sensor(id)
            .cloned()
            .ok_or_else(|| InvalidSensorReference { id }.into())
    }

    // ── Arming ────────────────────────────────────────────────────

    /// Switch the arming profile and apply the arming rule.
    ///
    /// Returns the resulting alarm status.
    ///
    /// # Errors
    ///
    /// Returns a repository error. Nothing is persisted and no listener is
    /// notified on error.
    #[tracing::instrument(skip(self))]
    pub async fn set_arming_status(&self, status: ArmingStatus) -> Result<AlarmStatus, SecurityError> {
        let _guard = self.gate.lock().await;
        let mut machine = self.load_state().await?;
        let previous = machine.arming_status();

        let change = machine.on_arming_changed(status);
        self.persist(&change).await?;
        if previous == status {
            tracing::debug!(%status, "arming status unchanged");
        } else {
            tracing::info!(from = %previous, to = %status, "arming status changed");
        }
        self.notify_change(&change).await;

        Ok(machine.alarm_status())
    }

    // ── Camera ────────────────────────────────────────────────────

    /// Ask the image-analysis collaborator about `image` and apply the
    /// camera rules to its verdict.
    ///
    /// Returns the resulting alarm status.
    ///
    /// # Errors
    ///
    /// Returns the image-analysis or repository error unchanged. Nothing is
    /// persisted and no listener is notified on error.
    #[tracing::instrument(skip(self, image), fields(width = image.width(), height = image.height()))]
    pub async fn process_image(&self, image: &Image) -> Result<AlarmStatus, SecurityError> {
        let _guard = self.gate.lock().await;
        let present = self
            .image_analysis
            .image_contains_cat(image, self.confidence_threshold)
            .await?;
        tracing::debug!(present, "image analysed");

        let mut machine = self.load_state().await?;
        let change = machine.on_cat_detected(present);
        self.persist(&change).await?;
        self.notify(|l| l.on_cat_detected(present), "cat_detected").await;
        self.notify_change(&change).await;

        Ok(machine.alarm_status())
    }

    // ── Internals ─────────────────────────────────────────────────

    async fn load_state(&self) -> Result<AlarmStateMachine, SecurityError> {
        let arming_status = self.repo.get_arming_status().await?;
        let alarm_status = self.repo.get_alarm_status().await?;
        let sensors = self.repo.get_sensors().await?;
        Ok(AlarmStateMachine::new(arming_status, alarm_status, sensors))
    }

    async fn persist(&self, change: &StateChange) -> Result<(), SecurityError> {
        if change.is_empty() {
            tracing::debug!("no state change");
            return Ok(());
        }
        self.repo.apply(change.clone()).await?;
        if let Some(status) = change.alarm_status {
            tracing::info!(%status, "alarm status transitioned");
        }
        Ok(())
    }

    async fn notify_change(&self, change: &StateChange) {
        for sensor in &change.sensors {
            self.notify(|l| l.on_sensor_status_changed(sensor), "sensor_status_changed")
                .await;
        }
        if let Some(status) = change.alarm_status {
            self.notify(|l| l.on_alarm_status_changed(status), "alarm_status_changed")
                .await;
        }
    }

    /// Deliver one notification to every listener. A failing listener is
    /// logged and the remaining listeners still receive it.
    async fn notify<F>(&self, deliver: F, notification: &'static str)
    where
        F: Fn(&dyn StatusListener) -> Result<(), BoxError>,
    {
        let listeners = self.listeners.read().await.clone();
        for listener in &listeners {
            if let Err(err) = deliver(listener.as_ref()) {
                tracing::warn!(error = %err, notification, "status listener failed");
            }
        }
    }
}
