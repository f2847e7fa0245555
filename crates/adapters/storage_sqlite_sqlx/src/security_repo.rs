//! `SQLite` implementation of [`SecurityRepository`].

use std::future::Future;
use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, Sqlite, SqlitePool, Transaction};

use catpoint_app::ports::SecurityRepository;
use catpoint_domain::alarm::StateChange;
use catpoint_domain::error::SecurityError;
use catpoint_domain::id::SensorId;
use catpoint_domain::sensor::{Sensor, SensorType};
use catpoint_domain::status::{AlarmStatus, ArmingStatus};

use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`Sensor`].
struct Wrapper(Sensor);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let name: String = row.try_get("name")?;
        let sensor_type: String = row.try_get("sensor_type")?;
        let active: bool = row.try_get("active")?;

        let id = SensorId::from_str(&id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let sensor_type =
            SensorType::from_str(&sensor_type).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(Sensor {
            id,
            name,
            sensor_type,
            active,
        }))
    }
}

const SELECT_SENSORS: &str = "SELECT id, name, sensor_type, active FROM sensors ORDER BY rowid";
const UPSERT_SENSOR: &str = "INSERT INTO sensors (id, name, sensor_type, active) VALUES (?, ?, ?, ?) \
     ON CONFLICT(id) DO UPDATE SET name = excluded.name, sensor_type = excluded.sensor_type, active = excluded.active";
const UPDATE_SENSOR: &str = "UPDATE sensors SET name = ?, sensor_type = ?, active = ? WHERE id = ?";
const DELETE_SENSOR: &str = "DELETE FROM sensors WHERE id = ?";
const SELECT_ARMING: &str = "SELECT arming_status FROM security_status WHERE id = 1";
const SELECT_ALARM: &str = "SELECT alarm_status FROM security_status WHERE id = 1";
const UPDATE_ARMING: &str = "UPDATE security_status SET arming_status = ? WHERE id = 1";
const UPDATE_ALARM: &str = "UPDATE security_status SET alarm_status = ? WHERE id = 1";

/// `SQLite`-backed security repository.
pub struct SqliteSecurityRepository {
    pool: SqlitePool,
}

impl SqliteSecurityRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn read_status(&self, query: &'static str) -> Result<String, StorageError> {
        let row: Option<(String,)> = sqlx::query_as(query).fetch_optional(&self.pool).await?;
        row.map(|(value,)| value).ok_or(StorageError::MissingStatusRow)
    }

    async fn write_status(
        tx: &mut Transaction<'_, Sqlite>,
        query: &'static str,
        value: &str,
    ) -> Result<(), StorageError> {
        let result = sqlx::query(query).bind(value).execute(&mut **tx).await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::MissingStatusRow);
        }
        Ok(())
    }

    async fn update_sensor_in(
        tx: &mut Transaction<'_, Sqlite>,
        sensor: &Sensor,
    ) -> Result<(), StorageError> {
        sqlx::query(UPDATE_SENSOR)
            .bind(&sensor.name)
            .bind(sensor.sensor_type.as_str())
            .bind(sensor.active)
            .bind(sensor.id.to_string())
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    async fn commit(&self, change: StateChange) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await?;
        for sensor in &change.sensors {
            Self::update_sensor_in(&mut tx, sensor).await?;
        }
        if let Some(status) = change.arming_status {
            Self::write_status(&mut tx, UPDATE_ARMING, status.as_str()).await?;
        }
        if let Some(status) = change.alarm_status {
            Self::write_status(&mut tx, UPDATE_ALARM, status.as_str()).await?;
        }
        tx.commit().await?;
        Ok(())
    }
}

impl SecurityRepository for SqliteSecurityRepository {
    fn get_sensors(&self) -> impl Future<Output = Result<Vec<Sensor>, SecurityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_SENSORS)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn add_sensor(&self, sensor: Sensor) -> impl Future<Output = Result<Sensor, SecurityError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(UPSERT_SENSOR)
                .bind(sensor.id.to_string())
                .bind(&sensor.name)
                .bind(sensor.sensor_type.as_str())
                .bind(sensor.active)
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(sensor)
        }
    }

    fn remove_sensor(&self, id: SensorId) -> impl Future<Output = Result<(), SecurityError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(DELETE_SENSOR)
                .bind(id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }

    fn update_sensor(
        &self,
        sensor: Sensor,
    ) -> impl Future<Output = Result<Sensor, SecurityError>> + Send {
        async move {
            let mut tx = self.pool.begin().await.map_err(StorageError::from)?;
            Self::update_sensor_in(&mut tx, &sensor).await?;
            tx.commit().await.map_err(StorageError::from)?;
            Ok(sensor)
        }
    }

    fn get_arming_status(&self) -> impl Future<Output = Result<ArmingStatus, SecurityError>> + Send {
        async move {
            let value = self.read_status(SELECT_ARMING).await?;
            Ok(value.parse::<ArmingStatus>().map_err(StorageError::from)?)
        }
    }

    fn set_arming_status(
        &self,
        status: ArmingStatus,
    ) -> impl Future<Output = Result<(), SecurityError>> + Send {
        self.apply(StateChange {
            arming_status: Some(status),
            ..StateChange::default()
        })
    }

    fn get_alarm_status(&self) -> impl Future<Output = Result<AlarmStatus, SecurityError>> + Send {
        async move {
            let value = self.read_status(SELECT_ALARM).await?;
            Ok(value.parse::<AlarmStatus>().map_err(StorageError::from)?)
        }
    }

    fn set_alarm_status(
        &self,
        status: AlarmStatus,
    ) -> impl Future<Output = Result<(), SecurityError>> + Send {
        self.apply(StateChange {
            alarm_status: Some(status),
            ..StateChange::default()
        })
    }

    fn apply(&self, change: StateChange) -> impl Future<Output = Result<(), SecurityError>> + Send {
        async move { Ok(self.commit(change).await?) }
    }
}
