//! This library pins a simulated scene to a place on earth and converts between scene positions
//! and [WGS84](systems::Wgs84) latitude, longitude, and altitude.
//!
//! Positions are represented by [`Coordinate`] and displacements by [`Vector`]. Both are generic
//! over a [`CoordinateSystem`] so that a position in the [scene](systems::Scene) cannot be
//! mistaken for one in [ECEF](systems::Ecef) or in the [local East/North/Up
//! plane](systems::LocalEnu). The [`system!`] macro defines further systems when needed.
//!
//! The building blocks are:
//!
//! - [`geodetic`]: WGS84 locations and the exact conversions between them and ECEF;
//! - [`math`]: [rotations](math::Rotation) and [rigid body transforms](math::RigidBodyTransform)
//!   between coordinate systems, including ECEF to a local tangent plane;
//! - [`engineering`]: [poses](engineering::Pose) and [orientations](engineering::Orientation) of
//!   objects, such as the scene anchor;
//! - [`frame`]: a [`ReferenceFrame`] captured from an anchor pose and a geodetic origin;
//! - [`service`]: a [`GeoreferenceService`] holding the active frame;
//! - [`config`]: the persisted [`GeoreferenceConfig`].
//!
//! # Examples
//!
//! A scene contains an anchor entity that marks a survey point. The survey point's location is
//! known, and the anchor was placed so that its X axis points East and its Z axis points Up.
//!
//! ```
//! use geoanchor::{
//!     coordinate, engineering::{Orientation, Pose}, systems::Scene, AnchorId, Coordinate,
//!     GeoreferenceConfig, GeoreferenceService,
//! };
//! use uom::si::f64::{Angle, Length};
//! use uom::si::{angle::degree, length::meter};
//!
//! let survey_point = AnchorId(3);
//! let config = GeoreferenceConfig {
//!     origin_latitude: 46.5586,
//!     origin_longitude: 7.9797,
//!     origin_altitude: 3466.,
//!     anchor: survey_point,
//! };
//!
//! // however the scene stores its entities; here the anchor sits 10m along the scene's X axis,
//! // turned so that the scene's Y axis points East.
//! let anchors = |anchor: AnchorId| {
//!     (anchor == survey_point).then(|| {
//!         Pose::new(
//!             coordinate!(
//!                 x = Length::new::<meter>(10.),
//!                 y = Length::new::<meter>(0.),
//!                 z = Length::new::<meter>(0.);
//!                 in Scene
//!             ),
//!             Orientation::from_tait_bryan_angles(
//!                 Angle::new::<degree>(90.),
//!                 Angle::new::<degree>(0.),
//!                 Angle::new::<degree>(0.),
//!             ),
//!         )
//!     })
//! };
//!
//! let mut service = GeoreferenceService::new();
//! service.activate(&config, &anchors)?;
//!
//! // a hiker 200m East of the survey point, in scene coordinates
//! let hiker = coordinate!(
//!     x = Length::new::<meter>(10.),
//!     y = Length::new::<meter>(200.),
//!     z = Length::new::<meter>(0.);
//!     in Scene
//! );
//! let on_earth = service.to_geodetic(hiker)?;
//! assert!(on_earth.longitude() > Angle::new::<degree>(7.9797));
//!
//! // and back again
//! let back: Coordinate<Scene> = service.to_local(&on_earth)?;
//! assert!(back.distance_from(&hiker) < Length::new::<meter>(1e-3));
//! # Ok::<(), geoanchor::Error>(())
//! ```
//!
//! Conversions that do not involve a scene, such as moving between WGS84, ECEF, and a tangent
//! plane, are available without a frame:
//!
//! ```
//! use geoanchor::{systems::{Ecef, Wgs84}, Coordinate};
//! use uom::si::length::meter;
//!
//! let null_island = Wgs84::from_degrees_and_meters(0., 0., 0.).expect("valid latitude");
//! let ecef = Coordinate::<Ecef>::from_wgs84(&null_island);
//! assert_eq!(ecef.x().get::<meter>(), geoanchor::ellipsoid::SEMI_MAJOR_AXIS);
//! ```

#[macro_use]
mod coordinate_systems;

mod coordinates;
mod error;
mod util;
mod vectors;

pub mod config;
pub mod ellipsoid;
pub mod engineering;
pub mod frame;
pub mod geodetic;
pub mod math;
pub mod service;

pub(crate) type Point3 = nalgebra::Point3<f64>;
pub(crate) type Vector3 = nalgebra::Vector3<f64>;
pub(crate) type UnitQuaternion = nalgebra::UnitQuaternion<f64>;
pub(crate) type Isometry3 = nalgebra::Isometry3<f64>;

// re-structure our imports slightly to better match user expectation
/// Well-known coordinate systems and conventions.
pub mod systems {
    pub use super::coordinate_systems::{
        Ecef, EnuComponents, EnuLike, LocalEnu, RightHandedXyzLike, Scene, XyzComponents,
    };
    pub use super::geodetic::Wgs84;
}
pub use config::{AnchorId, GeoreferenceConfig};
pub use coordinate_systems::CoordinateSystem;
pub use coordinates::Coordinate;
pub use error::{Error, Result};
pub use frame::ReferenceFrame;
pub use service::{AnchorSource, GeoreferenceService};
pub use vectors::Vector;
