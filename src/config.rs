//! Persisted configuration for a [`GeoreferenceService`].
//!
//! The configuration names where on earth the scene is pinned and which scene entity provides
//! the local tangent plane. It is stored in a versioned shape so that older scenes keep loading
//! after the format changes:
//!
//! ```json
//! {
//!   "version": 1,
//!   "originLatitude": 52.37,
//!   "originLongitude": 4.89,
//!   "originAltitude": 12.0,
//!   "anchorReference": 42
//! }
//! ```
//!
//! Latitude and longitude are in degrees, altitude in meters above the WGS84 ellipsoid.

use crate::error::{Error, Result};
use crate::geodetic::Wgs84;
use std::fmt;
use uom::si::{angle::degree, length::meter};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(doc)]
use crate::service::GeoreferenceService;

/// The schema version written by, and the only version accepted by, this crate.
pub const SCHEMA_VERSION: u32 = 1;

/// Opaque handle to a scene entity whose world pose defines the local tangent plane.
///
/// What the number refers to is up to the [`AnchorSource`](crate::AnchorSource) that resolves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AnchorId(pub u64);

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where the scene is pinned on earth, and by which anchor.
///
/// The fields are plain degrees and meters so the struct can be edited by hand. Use
/// [`GeoreferenceConfig::origin`] to get a validated [`Wgs84`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Persisted", into = "Persisted"))]
pub struct GeoreferenceConfig {
    /// Geodetic latitude of the origin, in degrees.
    pub origin_latitude: f64,
    /// Geodetic longitude of the origin, in degrees.
    pub origin_longitude: f64,
    /// Height of the origin above the WGS84 ellipsoid, in meters.
    pub origin_altitude: f64,
    /// The anchor whose pose becomes the local East/North/Up axes.
    pub anchor: AnchorId,
}

impl GeoreferenceConfig {
    /// Constructs a configuration that pins `anchor` at `origin`.
    #[must_use]
    pub fn new(origin: &Wgs84, anchor: AnchorId) -> Self {
        Self {
            origin_latitude: origin.latitude().get::<degree>(),
            origin_longitude: origin.longitude().get::<degree>(),
            origin_altitude: origin.altitude().get::<meter>(),
            anchor,
        }
    }

    /// Returns the configured origin.
    ///
    /// Fails with [`Error::InvalidLatitude`] if the latitude is outside [-90°, 90°] or is not a
    /// number. Longitudes outside (-180°, 180°] are accepted and wrapped.
    pub fn origin(&self) -> Result<Wgs84> {
        let degrees = self.origin_latitude;
        if !(-90.0..=90.0).contains(&degrees) {
            return Err(Error::InvalidLatitude { degrees });
        }
        Wgs84::from_degrees_and_meters(degrees, self.origin_longitude, self.origin_altitude)
            .ok_or(Error::InvalidLatitude { degrees })
    }
}

/// The on-disk shape of [`GeoreferenceConfig`].
#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Persisted {
    version: u32,
    origin_latitude: f64,
    origin_longitude: f64,
    origin_altitude: f64,
    anchor_reference: AnchorId,
}

#[cfg(feature = "serde")]
impl TryFrom<Persisted> for GeoreferenceConfig {
    type Error = Error;

    fn try_from(value: Persisted) -> Result<Self> {
        if value.version != SCHEMA_VERSION {
            return Err(Error::UnsupportedSchemaVersion {
                found: value.version,
                expected: SCHEMA_VERSION,
            });
        }
        Ok(Self {
            origin_latitude: value.origin_latitude,
            origin_longitude: value.origin_longitude,
            origin_altitude: value.origin_altitude,
            anchor: value.anchor_reference,
        })
    }
}

#[cfg(feature = "serde")]
impl From<GeoreferenceConfig> for Persisted {
    fn from(value: GeoreferenceConfig) -> Self {
        Self {
            version: SCHEMA_VERSION,
            origin_latitude: value.origin_latitude,
            origin_longitude: value.origin_longitude,
            origin_altitude: value.origin_altitude,
            anchor_reference: value.anchor,
        }
    }
}
