//! Data records consumed by the external persistence layer
//!
//! These are plain rows with table-name mappings. The crate never touches a
//! database; it only produces and consumes these shapes at the boundary. The
//! store is expected to handle keys, indices, and create/update timestamps.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::types::{Signal, Timestamp};

/// Mapping from a record type to the table the external store keeps it in.
pub trait Record {
    /// Table name used by the persistence layer.
    const TABLE: &'static str;
}

/// A stored signal row
///
/// Timestamp, vehicle id, and name together uniquely identify a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRecord {
    /// Unix milliseconds of the signal.
    pub timestamp: i64,
    /// Vehicle the signal came from.
    pub vehicle_id: String,
    /// Name of the signal.
    pub name: String,
    /// Value of the signal post-scaling.
    pub value: f64,
    /// Raw value of the signal before scaling.
    pub raw_value: i128,
    /// When the vehicle produced the signal.
    pub produced_at: Timestamp,
    /// When the signal was stored.
    pub created_at: Timestamp,
}

impl Record for SignalRecord {
    const TABLE: &'static str = "signal";
}

impl SignalRecord {
    /// Attach vehicle and time identity to a freshly exported signal.
    pub fn from_signal(
        signal: &Signal,
        vehicle_id: impl Into<String>,
        produced_at: Timestamp,
    ) -> Self {
        Self {
            timestamp: produced_at.timestamp_millis(),
            vehicle_id: vehicle_id.into(),
            name: signal.name.clone(),
            value: signal.value,
            raw_value: signal.raw_value,
            produced_at,
            created_at: Utc::now(),
        }
    }
}

/// A vehicle in the fleet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    /// Public-facing name of the vehicle.
    pub name: String,
    pub description: String,
    /// Authenticates the vehicle when processing uploaded data.
    pub upload_key: String,
    pub updated_at: Timestamp,
    pub created_at: Timestamp,
}

impl Record for Vehicle {
    const TABLE: &'static str = "vehicle";
}

/// A recorded outing of one vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: String,
    pub vehicle_id: String,
    pub name: String,
    /// Free-form notes and comments.
    pub description: String,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    /// Markers that split the trip into smaller segments.
    pub laps: Vec<Lap>,
}

impl Record for Trip {
    const TABLE: &'static str = "trip";
}

/// A lap marker within a trip
///
/// The lap's start is inferred from the previous lap's timestamp, or from
/// the beginning of the trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lap {
    pub id: String,
    pub trip_id: String,
    pub name: String,
    /// When the lap segment ended.
    pub timestamp: Timestamp,
}

impl Record for Lap {
    const TABLE: &'static str = "trip_lap";
}

/// One uplink latency measurement between a vehicle and the server
///
/// Only the uplink leg is stored; the vehicle sees the pong and may record
/// the round trip itself if it cares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ping {
    pub vehicle_id: String,
    /// Unix millis when the vehicle sent the ping.
    pub ping: i64,
    /// Unix millis when the server received it.
    pub pong: i64,
    /// Uplink latency in milliseconds.
    pub latency: i64,
}

impl Record for Ping {
    const TABLE: &'static str = "ping";
}

impl Ping {
    /// Build a measurement from the two observed timestamps.
    pub fn observed(vehicle_id: impl Into<String>, ping: i64, pong: i64) -> Self {
        Self {
            vehicle_id: vehicle_id.into(),
            ping,
            pong,
            latency: pong - ping,
        }
    }
}

/// A team member with access to the telemetry backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub subteam: String,
    pub updated_at: Timestamp,
    pub created_at: Timestamp,
    /// Resolved role names; stored separately as [`UserRole`] rows.
    pub roles: Vec<String>,
}

impl Record for User {
    const TABLE: &'static str = "user";
}

impl User {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// A single role grant for a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRole {
    pub user_id: String,
    pub role: String,
    #[serde(rename = "time")]
    pub created_at: Timestamp,
}

impl Record for UserRole {
    const TABLE: &'static str = "user_role";
}
