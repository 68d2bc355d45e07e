//! Simulated fire detection
//!
//! There is no inference pipeline behind this crate. On every scan tick the
//! generator draws a Bernoulli trial over the eligible set (monitoring cameras
//! for owners, protected properties for providers) and, on success, picks one
//! entity uniformly and synthesizes an incident for it.

use crate::types::{Camera, Coordinates, Incident, OwnerInfo, Property, Severity, User};
use crate::{Error, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Snapshot attached to every simulated detection
pub const FIRE_SNAPSHOT_REF: &str = "snapshots/fire-emergency-detection.jpg";

/// Fallbacks when the signed-in owner has no address or contact on file
pub const DEFAULT_OWNER_ADDRESS: &str = "123 Main St";
pub const DEFAULT_OWNER_CONTACT: &str = "+1-555-0123";
pub const DEFAULT_OWNER_COORDINATES: Coordinates = Coordinates::new(40.7128, -74.0060);

/// Scan period and per-scan detection chance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub interval: Duration,
    pub probability: f64,
}

impl GeneratorConfig {
    /// Owner dashboard: 10% chance every 5 seconds
    pub fn owner_default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            probability: 0.1,
        }
    }

    /// Fire station dashboard: 15% chance every 10 seconds
    pub fn provider_default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            probability: 0.15,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.interval.is_zero() {
            return Err(Error::config("Scan interval must be greater than zero"));
        }

        if !(0.0..=1.0).contains(&self.probability) {
            return Err(Error::config(format!(
                "Detection probability must be within [0, 1], got {}",
                self.probability
            )));
        }

        Ok(())
    }
}

/// Random incident source
pub struct IncidentGenerator<R = StdRng> {
    probability: f64,
    rng: R,
}

impl IncidentGenerator<StdRng> {
    pub fn new(config: &GeneratorConfig) -> Result<Self> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Reproducible generator for tests and benchmarks
    pub fn seeded(config: &GeneratorConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> IncidentGenerator<R> {
    pub fn with_rng(config: &GeneratorConfig, rng: R) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            probability: config.probability,
            rng,
        })
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// One scan: Bernoulli trial, then a uniform pick among `eligible`
    pub fn roll<'a, T>(&mut self, eligible: &'a [T]) -> Option<&'a T> {
        if eligible.is_empty() {
            return None;
        }

        if !self.rng.gen_bool(self.probability) {
            return None;
        }

        eligible.choose(&mut self.rng)
    }

    /// Owner scan over the currently monitoring cameras
    pub fn generate_for_camera(&mut self, monitoring: &[Camera], owner: &User) -> Option<Incident> {
        self.roll(monitoring)
            .map(|camera| owner_incident(camera, owner))
    }

    /// Provider scan over the protected properties
    pub fn generate_for_property(&mut self, properties: &[Property]) -> Option<Incident> {
        let property = self.roll(properties)?;
        Some(self.provider_incident(property))
    }

    /// Property-level incident with random severity and contact number
    pub fn provider_incident(&mut self, property: &Property) -> Incident {
        let severity = Severity::ALL
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(Severity::High);

        let family = property
            .name
            .split_whitespace()
            .next()
            .unwrap_or(&property.name);

        let owner_info = OwnerInfo {
            name: format!("{family} Family"),
            address: property.address.clone(),
            contact: format!("+1-555-{}", self.rng.gen_range(1000..=9999)),
            coordinates: property.coordinates,
        };

        Incident::new(None, severity, FIRE_SNAPSHOT_REF, owner_info)
    }
}

/// High-severity incident raised by one of the owner's cameras
pub fn owner_incident(camera: &Camera, owner: &User) -> Incident {
    let owner_info = OwnerInfo {
        name: owner.name.clone(),
        address: owner
            .address
            .clone()
            .unwrap_or_else(|| DEFAULT_OWNER_ADDRESS.to_string()),
        contact: owner
            .contact
            .clone()
            .unwrap_or_else(|| DEFAULT_OWNER_CONTACT.to_string()),
        coordinates: DEFAULT_OWNER_COORDINATES,
    };

    Incident::new(Some(camera.id), Severity::High, FIRE_SNAPSHOT_REF, owner_info)
}
