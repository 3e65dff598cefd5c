use uom::si::f64::Length;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(doc)]
use crate::{frame::ReferenceFrame, Coordinate, Vector};

/// Defines how a coordinate system behaves.
///
/// For example, two coordinate systems that implement `CoordinateSystem<Convention = EnuLike>`
/// both behave [`EnuLike`], and get appropriately-named accessors on types like [`Coordinate`]
/// and [`Vector`] (ie, `enu_east`, `enu_north`, and `enu_up`).
///
/// While you _can_ implement this trait directly, prefer using [`system!`](crate::system).
pub trait CoordinateSystem {
    /// What standard coordinate system convention this coordinate system conforms to.
    type Convention;
}

/// Links a coordinate system convention to the type holding the constituent parts under proper
/// names.
pub trait HasComponents {
    type Components: Into<[Length; 3]>;
}

/// Marks an ENU-like coordinate system where the axes are East, North, and Up.
///
/// ENUs are always right-handed coordinate systems, and have earth bounded axes:
///
/// - Positive X is East.
/// - Positive Y is North.
/// - Positive Z is away from the center of the earth ("Up").
///
/// Two ENU-like coordinate systems may have different "absolute" Earth-bound coordinates for
/// their origin. An object at, say, (10, 20, 30) in the ENU of one scene anchor has completely
/// different coordinates in the ENU of an anchor placed somewhere else on the globe.
///
/// <https://en.wikipedia.org/wiki/Local_tangent_plane_coordinates#Local_east,_north,_up_(ENU)_coordinates>
pub struct EnuLike;

/// Components for Cartesian points in an [`EnuLike`] coordinate system.
///
/// Usually provided to methods like [`Coordinate::build`] or [`Vector::build`].
#[derive(Debug, Clone, Copy)]
#[must_use]
pub struct EnuComponents {
    pub east: Length,
    pub north: Length,
    pub up: Length,
}

impl From<EnuComponents> for [Length; 3] {
    fn from(c: EnuComponents) -> [Length; 3] {
        [c.east, c.north, c.up]
    }
}

impl HasComponents for EnuLike {
    type Components = EnuComponents;
}

/// Marks a coordinate system whose axes are simply named X, Y, and Z.
///
/// Unlike [`EnuLike`], there is no intrinsic relationship between XYZ-like coordinate systems.
/// While two XYZ-like coordinate systems _may_ share definitions of X, Y, and Z, that shared
/// meaning is not communicated through this type.
pub struct RightHandedXyzLike;

/// Components for Cartesian points in an coordinate system without specific names for X, Y, and Z,
/// like [`RightHandedXyzLike`].
///
/// Usually provided to methods like [`Coordinate::build`] or [`Vector::build`].
#[derive(Debug, Clone, Copy)]
#[must_use]
pub struct XyzComponents {
    pub x: Length,
    pub y: Length,
    pub z: Length,
}

impl From<XyzComponents> for [Length; 3] {
    fn from(c: XyzComponents) -> [Length; 3] {
        [c.x, c.y, c.z]
    }
}

impl HasComponents for RightHandedXyzLike {
    type Components = XyzComponents;
}

/// Defines a new coordinate system and its conventions.
///
/// Note that the coordinate system is a zero-sized type used only to mark things like
/// [`Coordinate`] and [`Vector`] with what coordinate system they are in. A coordinate system does
/// not know its relation to any other coordinate system (or global positions like WGS84).
///
/// [`EnuLike`]
///
/// ```rust
/// # use geoanchor::system;
/// system!(pub struct ReceiverEnu using ENU);
/// ```
///
/// [`RightHandedXyzLike`]
///
/// ```rust
/// # use geoanchor::system;
/// system!(pub struct RobotBase using right-handed XYZ);
/// ```
///
/// You can include doc comments and attributes directly in the invocation of `system!`:
///
/// ```rust
/// geoanchor::system! {
///     #[derive(Hash)]
///     pub(crate) struct ReceiverEnu using ENU
/// }
/// ```
#[macro_export]
macro_rules! system {
    ($(#[$attr:meta])* $vis:vis struct $name:ident using right-handed XYZ) => {
        $crate::system!($(#[$attr])* $vis struct $name as RightHandedXyzLike);
    };
    ($(#[$attr:meta])* $vis:vis struct $name:ident using ENU) => {
        $crate::system!($(#[$attr])* $vis struct $name as EnuLike);
    };
    {
        $(#[$attr:meta])*
        $vis:vis struct $name:ident
        as $convention:ident
    } => {
        $(#[$attr])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq)]
        $vis struct $name;

        impl $crate::CoordinateSystem for $name {
            type Convention = $crate::systems::$convention;
        }
    };
}

system! {
    /// The [Earth-centered, Earth-fixed (ECEF)][ecef] coordinate system.
    ///
    /// This is a right-handed [`RightHandedXyzLike`] coordinate system whose origin is the center
    /// of the WGS84 ellipsoid. It has earth bounded axes:
    ///
    /// - Positive Z is towards the North pole (the international reference pole (IRP)).
    /// - Positive X is towards the prime meridian on the equator (0° lon).
    /// - Positive Y is towards 90°E on the equator.
    ///
    /// [ecef]: https://en.wikipedia.org/wiki/Earth-centered,_Earth-fixed_coordinate_system
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    #[allow(clippy::upper_case_acronyms)]
    pub struct Ecef using right-handed XYZ
}

system! {
    /// The Cartesian coordinate system of the simulated scene (the "level").
    ///
    /// Positions handed to and returned from [`ReferenceFrame`] and the georeference service are
    /// expressed in this system. It has no intrinsic relation to the Earth until a reference frame
    /// has been captured from a scene anchor.
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct Scene using right-handed XYZ
}

system! {
    /// The East-North-Up tangent plane anchored at a [`ReferenceFrame`]'s geodetic origin.
    ///
    /// Its origin is the scene anchor's position and its axes are the anchor's body axes, ie the
    /// anchor's X axis points East, Y points North and Z points Up.
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct LocalEnu using ENU
}
