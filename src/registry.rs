//! Camera registry of a property owner
//!
//! Holds the owner's cameras in insertion order plus the camera currently
//! selected for live view. Monitoring cameras form the eligible set of the
//! owner-side incident generator.

use crate::types::{Camera, CameraId, CameraKind};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// User input for a new camera
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    pub name: String,
    pub kind: CameraKind,
}

impl CameraConfig {
    pub fn usb(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: CameraKind::Usb,
        }
    }

    pub fn rtsp(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: CameraKind::Rtsp { url: url.into() },
        }
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("name"));
        }

        if let CameraKind::Rtsp { url } = &self.kind {
            if url.trim().is_empty() {
                return Err(Error::validation("url"));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct CameraRegistry {
    cameras: Vec<Camera>,
    selected: Option<CameraId>,
}

impl CameraRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry seeded with the two demo cameras of a new owner account
    pub fn with_demo_cameras() -> Self {
        let mut front = Camera::new("Front Entrance".to_string(), CameraKind::Usb);
        front.is_active = true;

        let backyard = Camera::new(
            "Backyard".to_string(),
            CameraKind::Rtsp {
                url: "rtsp://192.168.1.100:554/stream".to_string(),
            },
        );

        Self {
            cameras: vec![front, backyard],
            selected: None,
        }
    }

    /// Register a camera; a blank name leaves the registry untouched
    pub fn add(&mut self, config: CameraConfig) -> Result<CameraId> {
        config.validate()?;

        let kind = match config.kind {
            CameraKind::Rtsp { url } => CameraKind::Rtsp {
                url: url.trim().to_string(),
            },
            CameraKind::Usb => CameraKind::Usb,
        };

        let camera = Camera::new(config.name.trim().to_string(), kind);
        let id = camera.id;

        tracing::info!(
            "📷 Camera added: id={}, name={}, type={}",
            id,
            camera.name,
            camera.kind.label()
        );
        self.cameras.push(camera);

        Ok(id)
    }

    /// Delete a camera, clearing the selection if it pointed at it
    pub fn remove(&mut self, id: &CameraId) -> Result<Camera> {
        let index = self
            .cameras
            .iter()
            .position(|c| c.id == *id)
            .ok_or_else(|| Error::not_found("Camera", id))?;

        let camera = self.cameras.remove(index);
        if self.selected == Some(*id) {
            self.selected = None;
        }

        tracing::info!("🗑️  Camera removed: id={}, name={}", id, camera.name);
        Ok(camera)
    }

    /// Flip monitoring for a camera and return the new value
    pub fn toggle_monitoring(&mut self, id: &CameraId) -> Result<bool> {
        let camera = self.get_mut(id)?;
        camera.is_monitoring = !camera.is_monitoring;

        tracing::info!(
            "👁️  Camera monitoring {}: id={}, name={}",
            if camera.is_monitoring { "started" } else { "stopped" },
            id,
            camera.name
        );
        Ok(camera.is_monitoring)
    }

    pub fn set_active(&mut self, id: &CameraId, active: bool) -> Result<()> {
        self.get_mut(id)?.is_active = active;
        Ok(())
    }

    pub fn select(&mut self, id: &CameraId) -> Result<()> {
        self.get(id)?;
        self.selected = Some(*id);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&Camera> {
        self.selected.and_then(|id| self.cameras.iter().find(|c| c.id == id))
    }

    pub fn get(&self, id: &CameraId) -> Result<&Camera> {
        self.cameras
            .iter()
            .find(|c| c.id == *id)
            .ok_or_else(|| Error::not_found("Camera", id))
    }

    fn get_mut(&mut self, id: &CameraId) -> Result<&mut Camera> {
        self.cameras
            .iter_mut()
            .find(|c| c.id == *id)
            .ok_or_else(|| Error::not_found("Camera", id))
    }

    pub fn cameras(&self) -> &[Camera] {
        &self.cameras
    }

    /// Snapshot of the generator's eligible set
    pub fn monitoring(&self) -> Vec<Camera> {
        self.cameras
            .iter()
            .filter(|c| c.is_monitoring)
            .cloned()
            .collect()
    }

    pub fn monitoring_count(&self) -> usize {
        self.cameras.iter().filter(|c| c.is_monitoring).count()
    }

    pub fn len(&self) -> usize {
        self.cameras.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cameras.is_empty()
    }
}
