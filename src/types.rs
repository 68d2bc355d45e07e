//! # Core Types for the Fire Alert System
//!
//! This module defines the data structures shared by the camera registry, the
//! incident generator, the countdown controller and the provider board.
//!
//! ## Type Categories
//!
//! ### Identifiers
//! - [`CameraId`], [`IncidentId`], [`UserId`]: random v4 UUIDs
//!
//! ### Core Entities
//! - [`Camera`]: a registered camera and its monitoring flags
//! - [`Incident`]: a (simulated) fire detection and its lifecycle status
//! - [`User`]: the signed-in owner or fire-station provider
//! - [`Property`]: a location protected by a fire station
//!
//! ## Usage Examples
//!
//! ```rust
//! use firewatch::types::*;
//!
//! let camera = Camera::new(
//!     "Front Entrance".to_string(),
//!     CameraKind::Usb,
//! );
//! assert!(!camera.is_monitoring);
//! assert!(camera.url().is_none());
//!
//! assert!(IncidentStatus::Dispatched.is_terminal());
//! assert!(!IncidentStatus::Active.is_terminal());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Camera identifier
pub type CameraId = Uuid;

/// Incident identifier, fresh for every generated incident
pub type IncidentId = Uuid;

/// User identifier
pub type UserId = Uuid;

/// How a camera is connected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CameraKind {
    /// Local USB or built-in webcam
    Usb,
    /// Network camera reachable over RTSP
    Rtsp { url: String },
}

impl CameraKind {
    /// Short label used in listings ("USB", "RTSP")
    pub fn label(&self) -> &'static str {
        match self {
            Self::Usb => "USB",
            Self::Rtsp { .. } => "RTSP",
        }
    }
}

/// A camera registered by a property owner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub id: CameraId,
    pub name: String,
    pub kind: CameraKind,
    /// Feed is live
    pub is_active: bool,
    /// Feed is watched for fire; only monitoring cameras can raise incidents
    pub is_monitoring: bool,
}

impl Camera {
    /// Create an inactive, non-monitoring camera with a fresh id
    pub fn new(name: String, kind: CameraKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            kind,
            is_active: false,
            is_monitoring: false,
        }
    }

    /// Stream URL, present only for RTSP cameras
    pub fn url(&self) -> Option<&str> {
        match &self.kind {
            CameraKind::Rtsp { url } => Some(url),
            CameraKind::Usb => None,
        }
    }
}

/// Incident severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Low, Severity::Medium, Severity::High];
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        };
        f.write_str(label)
    }
}

/// Lifecycle status of an incident
///
/// ```text
/// active --(countdown reaches 0 | notify now)--> dispatched
/// active --(cancel)-----------------------------> cancelled
/// active --(resolve, provider side)-------------> resolved
/// ```
///
/// Every status other than `Active` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
    Active,
    Dispatched,
    Cancelled,
    Resolved,
}

impl IncidentStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Active)
    }
}

/// Geographic position of a property
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Contact details of the property where the incident happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerInfo {
    pub name: String,
    pub address: String,
    pub contact: String,
    pub coordinates: Coordinates,
}

/// A detected (simulated) fire incident
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub id: IncidentId,
    /// Camera that raised the incident. Provider-side incidents are raised
    /// per property and carry no camera.
    pub camera_id: Option<CameraId>,
    pub timestamp: DateTime<Utc>,
    pub severity: Severity,
    pub snapshot_ref: String,
    pub status: IncidentStatus,
    pub owner_info: OwnerInfo,
}

impl Incident {
    /// Create a new active incident stamped with the current time
    pub fn new(
        camera_id: Option<CameraId>,
        severity: Severity,
        snapshot_ref: impl Into<String>,
        owner_info: OwnerInfo,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            camera_id,
            timestamp: Utc::now(),
            severity,
            snapshot_ref: snapshot_ref.into(),
            status: IncidentStatus::Active,
            owner_info,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == IncidentStatus::Active
    }
}

/// Account role, chosen at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Property owner running cameras
    Owner,
    /// Fire station receiving incidents
    Provider,
}

/// A signed-in user, persisted as JSON in the session store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

/// A location protected by a fire station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub coordinates: Coordinates,
}

impl Property {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        coordinates: Coordinates,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            address: address.into(),
            coordinates,
        }
    }

    /// Properties covered by the demo fire station
    pub fn demo_properties() -> Vec<Property> {
        vec![
            Property::new("Smith Residence", "123 Main St", Coordinates::new(40.7128, -74.0060)),
            Property::new("Johnson House", "456 Oak Ave", Coordinates::new(40.7589, -73.9851)),
            Property::new("Brown Estate", "789 Pine Rd", Coordinates::new(40.7282, -74.0776)),
        ]
    }
}
