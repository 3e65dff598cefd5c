//! Rotations and rigid body transforms between coordinate systems.
//!
//! [`RigidBodyTransform`] is the workhorse of this crate: it is what moves a [`Coordinate`] from
//! the scene into the anchor's ENU tangent plane, and from there into [`Ecef`]. [`Rotation`] is
//! its translation-free counterpart and is what a [`ReferenceFrame`] hands out for converting
//! headings.
//!
//! Both types are generic over the [`CoordinateSystem`] they transform _from_ and _to_, so that a
//! transform can only ever be applied to values that are in the right system:
//!
//! ```rust
//! use geoanchor::{coordinate, math::RigidBodyTransform, systems::{Ecef, LocalEnu, Wgs84}};
//! use uom::si::{f64::Length, length::meter};
//!
//! let origin = Wgs84::from_degrees_and_meters(48.1372, 11.5756, 519.).expect("valid latitude");
//!
//! // SAFETY: in this example, LocalEnu is the tangent plane at `origin`.
//! let ecef_to_enu = unsafe { RigidBodyTransform::<Ecef, LocalEnu>::ecef_to_enu_at(&origin) };
//!
//! let ten_up = coordinate!(
//!     e = Length::new::<meter>(0.),
//!     n = Length::new::<meter>(0.),
//!     u = Length::new::<meter>(10.);
//!     in LocalEnu
//! );
//! let in_ecef = ecef_to_enu.inverse_transform(ten_up);
//! let back = ecef_to_enu.transform(in_ecef);
//! assert!((back.enu_up().get::<meter>() - 10.).abs() < 1e-6);
//! ```

use crate::coordinate_systems::Ecef;
use crate::coordinates::Coordinate;
use crate::geodetic::Wgs84;
use crate::vectors::Vector;
use crate::{systems::EnuLike, CoordinateSystem, Isometry3, UnitQuaternion};
use nalgebra::{Matrix3, Rotation3, Translation3};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;
use std::ops::{Mul, Neg};
use uom::si::angle::radian;
use uom::si::f64::Angle;

#[cfg(any(test, feature = "approx"))]
use approx::{AbsDiffEq, RelativeEq};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(doc)]
use crate::{engineering, frame::ReferenceFrame};

/// A [rotation] from the [`CoordinateSystem`] `From` into `To`.
///
/// Usually obtained from [`ReferenceFrame::rotation`], [`RigidBodyTransform::rotation`], or
/// [`engineering::Orientation::map_as_zero_in`].
///
/// Rotations are applied with [`Rotation::transform`] (from `From` into `To`) and
/// [`Rotation::inverse_transform`] (back), or equivalently with `*`. With `*` the rotation goes on
/// the _right_ of the value when moving into `To` and on the _left_ when moving back into `From`,
/// so that the adjacent type parameters always match:
///
/// ```rust,ignore
/// let _: Coordinate<To> = Coordinate<From> * Rotation<From, To>;
/// let _: Coordinate<From> = Rotation<From, To> * Coordinate<To>;
/// ```
///
/// <div class="warning">
///
/// This type implements `Deserialize` even though its constructors are `unsafe`. The coordinate
/// systems of a deserialized value are _not_ checked.
///
/// </div>
///
/// [rotation]: https://en.wikipedia.org/wiki/Rotation_formalisms_in_three_dimensions
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
// don't require From/To: Serialize/Deserialize since we skip it anyway
#[cfg_attr(feature = "serde", serde(bound = ""))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Rotation<From, To> {
    /// The rotation of `To`'s axes expressed in `From`, ie the quaternion that takes components
    /// in `To` to components in `From`. Going `From` -> `To` therefore uses the _inverse_
    /// rotation (see the `Mul` impls below).
    pub(crate) inner: UnitQuaternion,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) from: PhantomData<From>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) to: PhantomData<To>,
}

// manual impls of Clone and Copy to avoid requiring From/To: Copy + Clone
impl<From, To> Clone for Rotation<From, To> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<From, To> Copy for Rotation<From, To> {}

impl<From, To> PartialEq<Self> for Rotation<From, To> {
    fn eq(&self, other: &Self) -> bool {
        self.inner.eq(&other.inner)
    }
}

impl<From, To> Display for Rotation<From, To> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Quaternion: {}", self.inner)
    }
}

impl<To> Rotation<Ecef, To>
where
    To: CoordinateSystem<Convention = EnuLike>,
{
    /// The rotation from [`Ecef`] into the ENU tangent plane at the given latitude and longitude.
    ///
    /// # Safety
    ///
    /// `To` must be the ENU system at this latitude and longitude. This only rotates; see
    /// [`RigidBodyTransform::ecef_to_enu_at`] for the full transform.
    unsafe fn ecef_to_enu_at(latitude: Angle, longitude: Angle) -> Self {
        let (sin_phi, cos_phi) = latitude.get::<radian>().sin_cos();
        let (sin_lambda, cos_lambda) = longitude.get::<radian>().sin_cos();

        // columns are the East, North, and Up unit vectors expressed in ECEF
        let matrix = Matrix3::new(
            -sin_lambda,
            -cos_lambda * sin_phi,
            cos_lambda * cos_phi,
            cos_lambda,
            -sin_lambda * sin_phi,
            sin_lambda * cos_phi,
            0.,
            cos_phi,
            sin_phi,
        );
        // orthonormal with determinant +1 for any phi and lambda
        let rot = Rotation3::from_matrix_unchecked(matrix);

        Self {
            inner: UnitQuaternion::from_rotation_matrix(&rot),
            from: PhantomData,
            to: PhantomData,
        }
    }
}

impl<From, To> Rotation<From, To> {
    /// Asserts that `From` and `To` share their axes.
    ///
    /// # Safety
    ///
    /// If `From` and `To` are in fact rotated relative to each other, values moved between them
    /// with the returned rotation will be typed as being in a system they are not in.
    #[must_use]
    pub unsafe fn identity() -> Self {
        Self {
            inner: UnitQuaternion::identity(),
            from: PhantomData::<From>,
            to: PhantomData::<To>,
        }
    }

    /// Constructs the rotation from `From` to `To` out of the components of a [unit quaternion],
    /// with `w` the real part.
    ///
    /// Scene anchors coming out of game engines and simulators are most commonly oriented this
    /// way. The quaternion is normalized if it is not already of unit length.
    ///
    /// # Safety
    ///
    /// The quaternion must be the correct rotation from `From` into `To`, and must not be zero.
    ///
    /// [unit quaternion]: https://en.wikipedia.org/wiki/Versor
    #[doc(alias = "from_versor")]
    #[must_use]
    pub unsafe fn from_quaternion(w: f64, i: f64, j: f64, k: f64) -> Self {
        debug_assert_ne!(
            [w, i, j, k],
            [0.0, 0.0, 0.0, 0.0],
            "quaternion must be non-zero"
        );
        let from_to = UnitQuaternion::new_normalize(nalgebra::Quaternion::new(w, i, j, k));
        Self {
            inner: from_to.inverse(),
            from: PhantomData::<From>,
            to: PhantomData::<To>,
        }
    }

    /// Returns the `(w, i, j, k)` components of the unit quaternion that rotates from `From` into
    /// `To`, matching [`Rotation::from_quaternion`].
    #[doc(alias = "to_versor")]
    #[must_use]
    pub fn to_quaternion(&self) -> (f64, f64, f64, f64) {
        let q = self.inner.inverse().into_inner();
        (q.w, q.i, q.j, q.k)
    }

    /// Returns the rotation from `To` back into `From`.
    #[must_use]
    pub fn inverse(&self) -> Rotation<To, From> {
        Rotation {
            inner: self.inner.inverse(),
            from: PhantomData::<To>,
            to: PhantomData::<From>,
        }
    }

    /// Rotates a value in `From` into `To`.
    #[doc(alias = "apply")]
    pub fn transform<T>(&self, in_from: T) -> <T as Mul<Self>>::Output
    where
        T: Mul<Self>,
    {
        in_from * *self
    }

    /// Rotates a value in `To` back into `From`.
    #[doc(alias = "undo")]
    pub fn inverse_transform<T>(&self, in_to: T) -> <Self as Mul<T>>::Output
    where
        Self: Mul<T>,
    {
        *self * in_to
    }
}

#[cfg(any(test, feature = "approx"))]
impl<From, To> AbsDiffEq<Self> for Rotation<From, To> {
    type Epsilon = <f64 as AbsDiffEq>::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        UnitQuaternion::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.inner.abs_diff_eq(&other.inner, epsilon)
    }
}

#[cfg(any(test, feature = "approx"))]
impl<From, To> RelativeEq for Rotation<From, To> {
    fn default_max_relative() -> Self::Epsilon {
        UnitQuaternion::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.inner.relative_eq(&other.inner, epsilon, max_relative)
    }
}

impl<From, To> Neg for Rotation<From, To> {
    type Output = Rotation<To, From>;

    fn neg(self) -> Self::Output {
        self.inverse()
    }
}

// Rotation<From, Over> * Rotation<Over, To> -> Rotation<From, To>
//
// `inner` maps components in the right-hand system to the left-hand one, so composing
// (To -> Over) with (Over -> From) is self.inner * rhs.inner.
impl<From, Over, To> Mul<Rotation<Over, To>> for Rotation<From, Over> {
    type Output = Rotation<From, To>;

    fn mul(self, rhs: Rotation<Over, To>) -> Self::Output {
        Self::Output {
            inner: self.inner * rhs.inner,
            from: self.from,
            to: rhs.to,
        }
    }
}

/// A [rigid body transform][isometry] (rotation plus translation, no scaling) from the
/// [`CoordinateSystem`] `From` into `To`.
///
/// The ways to get hold of one are
///
/// 1. [`engineering::Pose::map_as_zero_in`], eg. for the pose of a scene anchor;
/// 2. [`RigidBodyTransform::ecef_to_enu_at`], to get between [`Ecef`] and an ENU tangent plane;
/// 3. [`RigidBodyTransform::new`] from an arbitrary translation and rotation.
///
/// Transforms chain with `*` or [`RigidBodyTransform::and_then`], and are applied with
/// [`RigidBodyTransform::transform`] and [`RigidBodyTransform::inverse_transform`] (or `*`, with
/// the same operand order as for [`Rotation`]).
///
/// Coordinates are rotated _and_ translated. Vectors are displacements without an origin and are
/// only rotated.
///
/// <div class="warning">
///
/// This type implements `Deserialize` even though its constructors are `unsafe`. The coordinate
/// systems of a deserialized value are _not_ checked.
///
/// </div>
///
/// [isometry]: https://en.wikipedia.org/wiki/Rigid_transformation
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
// don't require From/To: Serialize/Deserialize since we skip it anyway
#[cfg_attr(feature = "serde", serde(bound = ""))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RigidBodyTransform<From, To> {
    /// The pose of `To` in `From`, ie the isometry taking values in `To` to `From`. As with
    /// [`Rotation`], `From` -> `To` applies the inverse.
    pub(crate) inner: Isometry3,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) from: PhantomData<From>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) to: PhantomData<To>,
}

// manual impls of Clone and Copy to avoid requiring From/To: Copy + Clone
impl<From, To> Clone for RigidBodyTransform<From, To> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<From, To> Copy for RigidBodyTransform<From, To> {}

impl<To> RigidBodyTransform<Ecef, To>
where
    To: CoordinateSystem<Convention = EnuLike>,
{
    /// Constructs the transform from [`Ecef`] into the [`EnuLike`] tangent plane whose origin is
    /// `reference`.
    ///
    /// The ECEF offset `(dx, dy, dz)` of a point from `reference` maps to
    ///
    /// ```text
    /// east  = -sin(lon) dx + cos(lon) dy
    /// north = -sin(lat) cos(lon) dx - sin(lat) sin(lon) dy + cos(lat) dz
    /// up    =  cos(lat) cos(lon) dx + cos(lat) sin(lon) dy + sin(lat) dz
    /// ```
    ///
    /// At the poles, East and North depend on the longitude of `reference`, which is arbitrary
    /// there. The result is deterministic but carries no meaningful heading.
    ///
    /// See also
    /// <https://en.wikipedia.org/wiki/Local_tangent_plane_coordinates#Local_east,_north,_up_(ENU)_coordinates>.
    ///
    /// # Safety
    ///
    /// [`Coordinate::<To>::origin()`](Coordinate::origin) must lie at `reference` with `To`'s
    /// axes pointing East, North, and Up. Otherwise the returned transform produces values that
    /// are typed as being in `To` but are not.
    #[must_use]
    pub unsafe fn ecef_to_enu_at(reference: &Wgs84) -> Self {
        let translation = Vector::from(Coordinate::<Ecef>::from_wgs84(reference));

        // SAFETY: same contract as ours, and we add the translation it is missing.
        let rotation = unsafe { Rotation::ecef_to_enu_at(reference.latitude, reference.longitude) };

        // SAFETY: translation and rotation together place To's origin and axes at `reference`.
        unsafe { Self::new(translation, rotation) }
    }
}

impl<From, To> RigidBodyTransform<From, To> {
    /// Constructs a transform from the position and rotation of `To` as observed in `From`.
    ///
    /// That is, `translation` is where `To`'s origin lies in `From`, and `rotation` is how `To`'s
    /// axes are rotated relative to `From`'s.
    ///
    /// # Safety
    ///
    /// Getting this wrong lets values move between coordinate systems without being correctly
    /// converted, the same as for [`engineering::Pose::map_as_zero_in`].
    #[must_use]
    pub unsafe fn new(translation: Vector<From>, rotation: Rotation<From, To>) -> Self {
        Self {
            inner: Isometry3::from_parts(Translation3::from(translation.inner), rotation.inner),
            from: PhantomData::<From>,
            to: PhantomData::<To>,
        }
    }

    /// Asserts that `From` and `To` coincide.
    ///
    /// # Safety
    ///
    /// See [`Rotation::identity`]; additionally, the two systems must share their origin.
    #[must_use]
    pub unsafe fn identity() -> Self {
        Self::new(Vector::zero(), Rotation::identity())
    }

    /// Chains this transform with one out of `To` to go straight from `From` into `NewTo`.
    ///
    /// ```rust
    /// use approx::assert_abs_diff_eq;
    /// use geoanchor::{
    ///     coordinate, system, Coordinate,
    ///     engineering::{Orientation, Pose},
    ///     math::RigidBodyTransform,
    ///     systems::{Ecef, LocalEnu, Wgs84},
    /// };
    /// use uom::si::{f64::Length, length::meter};
    ///
    /// system!(struct Forklift using right-handed XYZ);
    ///
    /// let depot = Wgs84::from_degrees_and_meters(53.5511, 9.9937, 8.).expect("valid latitude");
    /// // SAFETY: in this example, LocalEnu is the tangent plane at the depot.
    /// let ecef_to_enu = unsafe { RigidBodyTransform::<Ecef, LocalEnu>::ecef_to_enu_at(&depot) };
    ///
    /// let forklift_in_enu = Pose::new(
    ///     coordinate!(
    ///         e = Length::new::<meter>(25.),
    ///         n = Length::new::<meter>(-4.),
    ///         u = Length::new::<meter>(0.);
    ///         in LocalEnu
    ///     ),
    ///     Orientation::aligned(),
    /// );
    /// // SAFETY: Forklift is the system carried along by the forklift.
    /// let enu_to_forklift = unsafe { forklift_in_enu.map_as_zero_in::<Forklift>() };
    ///
    /// let ecef_to_forklift = ecef_to_enu.and_then(enu_to_forklift);
    /// let forklift_in_ecef = ecef_to_forklift.inverse_transform(Coordinate::<Forklift>::origin());
    /// assert_abs_diff_eq!(
    ///     forklift_in_ecef,
    ///     ecef_to_enu.inverse_transform(forklift_in_enu.position()),
    /// );
    /// ```
    pub fn and_then<NewTo, Transform>(self, rhs: Transform) -> RigidBodyTransform<From, NewTo>
    where
        Self: Mul<Transform, Output = RigidBodyTransform<From, NewTo>>,
    {
        self * rhs
    }

    /// Returns the transform from `To` back into `From`.
    #[must_use]
    pub fn inverse(&self) -> RigidBodyTransform<To, From> {
        RigidBodyTransform::<To, From> {
            inner: self.inner.inverse(),
            from: PhantomData,
            to: PhantomData,
        }
    }

    /// Returns where the origin of `To` lies in `From`.
    #[must_use]
    pub fn translation(&self) -> Vector<From> {
        Vector::from_nalgebra_vector(self.inner.translation.vector)
    }

    /// Returns the rotational part of this transform.
    #[must_use]
    pub fn rotation(&self) -> Rotation<From, To> {
        Rotation {
            inner: self.inner.rotation,
            from: self.from,
            to: self.to,
        }
    }

    /// Transforms a value in `From` into `To`.
    #[doc(alias = "apply")]
    pub fn transform<T>(&self, in_from: T) -> <T as Mul<Self>>::Output
    where
        T: Mul<Self>,
    {
        in_from * *self
    }

    /// Transforms a value in `To` back into `From`.
    ///
    /// Equivalent to, but cheaper than, `self.inverse().transform(in_to)`.
    #[doc(alias = "undo")]
    pub fn inverse_transform<T>(&self, in_to: T) -> <Self as Mul<T>>::Output
    where
        Self: Mul<T>,
    {
        *self * in_to
    }
}

impl<From, To> PartialEq<Self> for RigidBodyTransform<From, To> {
    fn eq(&self, other: &Self) -> bool {
        self.inner.eq(&other.inner)
    }
}

impl<From, To> Display for RigidBodyTransform<From, To> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Position: {}, Orientation: {}",
            self.translation(),
            self.rotation()
        )
    }
}

impl<From, To> Neg for RigidBodyTransform<From, To> {
    type Output = RigidBodyTransform<To, From>;

    fn neg(self) -> Self::Output {
        self.inverse()
    }
}

// From -> To applies the inverse of `inner`, To -> From applies `inner` itself.

impl<From, To> Mul<Rotation<From, To>> for Coordinate<From> {
    type Output = Coordinate<To>;

    fn mul(self, rhs: Rotation<From, To>) -> Self::Output {
        Coordinate::from_nalgebra_point(rhs.inner.inverse_transform_point(&self.point))
    }
}

impl<From, To> Mul<Coordinate<To>> for Rotation<From, To> {
    type Output = Coordinate<From>;

    fn mul(self, rhs: Coordinate<To>) -> Self::Output {
        Coordinate::from_nalgebra_point(self.inner.transform_point(&rhs.point))
    }
}

impl<From, To> Mul<Rotation<From, To>> for Vector<From> {
    type Output = Vector<To>;

    fn mul(self, rhs: Rotation<From, To>) -> Self::Output {
        Vector::from_nalgebra_vector(rhs.inner.inverse_transform_vector(&self.inner))
    }
}

impl<From, To> Mul<Vector<To>> for Rotation<From, To> {
    type Output = Vector<From>;

    fn mul(self, rhs: Vector<To>) -> Self::Output {
        Vector::from_nalgebra_vector(self.inner.transform_vector(&rhs.inner))
    }
}

impl<From, To> Mul<RigidBodyTransform<From, To>> for Coordinate<From> {
    type Output = Coordinate<To>;

    fn mul(self, rhs: RigidBodyTransform<From, To>) -> Self::Output {
        Coordinate::from_nalgebra_point(rhs.inner.inverse_transform_point(&self.point))
    }
}

impl<From, To> Mul<Coordinate<To>> for RigidBodyTransform<From, To> {
    type Output = Coordinate<From>;

    fn mul(self, rhs: Coordinate<To>) -> Self::Output {
        Coordinate::from_nalgebra_point(self.inner.transform_point(&rhs.point))
    }
}

impl<From, To> Mul<RigidBodyTransform<From, To>> for Vector<From> {
    type Output = Vector<To>;

    fn mul(self, rhs: RigidBodyTransform<From, To>) -> Self::Output {
        Vector::from_nalgebra_vector(rhs.inner.inverse_transform_vector(&self.inner))
    }
}

impl<From, To> Mul<Vector<To>> for RigidBodyTransform<From, To> {
    type Output = Vector<From>;

    fn mul(self, rhs: Vector<To>) -> Self::Output {
        Vector::from_nalgebra_vector(self.inner.transform_vector(&rhs.inner))
    }
}

// RigidBodyTransform<From, Over> * RigidBodyTransform<Over, To> -> RigidBodyTransform<From, To>
impl<From, Over, To> Mul<RigidBodyTransform<Over, To>> for RigidBodyTransform<From, Over> {
    type Output = RigidBodyTransform<From, To>;

    fn mul(self, rhs: RigidBodyTransform<Over, To>) -> Self::Output {
        Self::Output {
            inner: self.inner * rhs.inner,
            from: PhantomData::<From>,
            to: PhantomData::<To>,
        }
    }
}

#[cfg(any(test, feature = "approx"))]
impl<From, To> AbsDiffEq<Self> for RigidBodyTransform<From, To> {
    type Epsilon = <f64 as AbsDiffEq>::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        Isometry3::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.inner.abs_diff_eq(&other.inner, epsilon)
    }
}

#[cfg(any(test, feature = "approx"))]
impl<From, To> RelativeEq for RigidBodyTransform<From, To> {
    fn default_max_relative() -> Self::Epsilon {
        Isometry3::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.inner.relative_eq(&other.inner, epsilon, max_relative)
    }
}

#[cfg(test)]
mod tests {
    use super::{RigidBodyTransform, Rotation};
    use crate::coordinate_systems::{Ecef, LocalEnu, Scene};
    use crate::coordinates::Coordinate;
    use crate::geodetic::{Components, Wgs84};
    use crate::vectors::Vector;
    use crate::{coordinate, vector};
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use rstest::rstest;
    use uom::si::f64::{Angle, Length};
    use uom::si::{angle::degree, length::meter};

    fn m(meters: f64) -> Length {
        Length::new::<meter>(meters)
    }
    fn d(degrees: f64) -> Angle {
        Angle::new::<degree>(degrees)
    }

    #[rstest]
    #[case(d(47.9948211), d(7.8211606), m(1000.))]
    #[case(d(67.112282), d(19.880389), m(0.))]
    #[case(d(84.883074), d(-29.160550), m(2000.))]
    #[case(d(-27.270950), d(143.722880), m(100.))]
    fn ecef_to_enu_matches_nav_types(#[case] lat: Angle, #[case] lon: Angle, #[case] alt: Length) {
        let location = nav_types::WGS84::from_degrees_and_meters(
            lat.get::<degree>(),
            lon.get::<degree>(),
            alt.get::<meter>(),
        );
        let location_ecef = nav_types::ECEF::from(location);
        let nav_east = Coordinate::<Ecef>::from(&(location_ecef + nav_types::ENU::new(1., 0., 0.)));
        let nav_north =
            Coordinate::<Ecef>::from(&(location_ecef + nav_types::ENU::new(0., 1., 0.)));
        let nav_up = Coordinate::<Ecef>::from(&(location_ecef + nav_types::ENU::new(0., 0., 1.)));

        let reference = Wgs84::build(Components {
            latitude: lat,
            longitude: lon,
            altitude: alt,
        })
        .expect("latitude is in-range");
        // SAFETY: LocalEnu stands in for the tangent plane at `reference` in this test only.
        let ecef_to_enu =
            unsafe { RigidBodyTransform::<Ecef, LocalEnu>::ecef_to_enu_at(&reference) };

        let east = coordinate!(e = m(1.), n = m(0.), u = m(0.); in LocalEnu);
        let north = coordinate!(e = m(0.), n = m(1.), u = m(0.); in LocalEnu);
        let up = coordinate!(e = m(0.), n = m(0.), u = m(1.); in LocalEnu);
        assert_abs_diff_eq!(ecef_to_enu.inverse_transform(east), nav_east);
        assert_abs_diff_eq!(ecef_to_enu.inverse_transform(north), nav_north);
        assert_abs_diff_eq!(ecef_to_enu.inverse_transform(up), nav_up);

        // the rotation alone keeps the origin where it is
        let rotation = ecef_to_enu.rotation();
        assert_relative_eq!(
            rotation.inverse_transform(Coordinate::<LocalEnu>::origin()),
            Coordinate::<Ecef>::origin()
        );
        assert_abs_diff_eq!(
            rotation.inverse_transform(vector!(e = m(0.), n = m(0.), u = m(1.); in LocalEnu)),
            nav_up - Coordinate::<Ecef>::from(&location_ecef),
        );
    }

    #[test]
    fn enu_translation_is_the_reference_in_ecef() {
        let reference = Wgs84::from_degrees_and_meters(-33.8568, 151.2153, 4.).expect("valid");
        // SAFETY: LocalEnu stands in for the tangent plane at `reference` in this test only.
        let ecef_to_enu =
            unsafe { RigidBodyTransform::<Ecef, LocalEnu>::ecef_to_enu_at(&reference) };
        assert_eq!(
            ecef_to_enu.translation(),
            Vector::from(Coordinate::<Ecef>::from_wgs84(&reference))
        );
    }

    #[test]
    fn chaining_matches_stepwise_application() {
        // SAFETY: arbitrary transforms between test systems.
        let scene_to_enu = unsafe {
            RigidBodyTransform::<Scene, LocalEnu>::new(
                vector!(x = m(10.), y = m(-20.), z = m(3.); in Scene),
                Rotation::from_quaternion(0.9, 0.1, -0.3, 0.2),
            )
        };
        let reference = Wgs84::from_degrees_and_meters(10., 20., 30.).expect("valid");
        // SAFETY: LocalEnu stands in for the tangent plane at `reference` in this test only.
        let ecef_to_enu =
            unsafe { RigidBodyTransform::<Ecef, LocalEnu>::ecef_to_enu_at(&reference) };
        let scene_to_ecef = scene_to_enu.and_then(ecef_to_enu.inverse());

        let p = coordinate!(x = m(1.5), y = m(250.), z = m(-7.); in Scene);
        let stepwise = ecef_to_enu.inverse_transform(scene_to_enu.transform(p));
        assert_abs_diff_eq!(scene_to_ecef.transform(p), stepwise, epsilon = m(1e-6));
        assert_abs_diff_eq!(
            scene_to_ecef.inverse_transform(stepwise),
            p,
            epsilon = m(1e-6)
        );
    }

    #[test]
    fn vectors_are_only_rotated() {
        // SAFETY: arbitrary transform between test systems.
        let scene_to_enu = unsafe {
            RigidBodyTransform::<Scene, LocalEnu>::new(
                vector!(x = m(1000.), y = m(1000.), z = m(1000.); in Scene),
                // 90° about Z: what lies along the scene's X axis lies to the North
                Rotation::from_quaternion(
                    std::f64::consts::FRAC_1_SQRT_2,
                    0.,
                    0.,
                    std::f64::consts::FRAC_1_SQRT_2,
                ),
            )
        };
        let v = vector!(x = m(1.), y = m(0.), z = m(0.); in Scene);
        assert_abs_diff_eq!(
            scene_to_enu.transform(v),
            vector!(e = m(0.), n = m(1.), u = m(0.); in LocalEnu)
        );
        assert_abs_diff_eq!(scene_to_enu.inverse_transform(scene_to_enu.transform(v)), v);
        assert_abs_diff_eq!((-scene_to_enu).transform(scene_to_enu.transform(v)), v);
    }

    #[test]
    fn quaternion_components_roundtrip() {
        // SAFETY: arbitrary rotation between test systems.
        let rotation = unsafe { Rotation::<Scene, LocalEnu>::from_quaternion(2., 0., 0., 0.) };
        assert_eq!(rotation.to_quaternion(), (1., 0., 0., 0.));
        // SAFETY: as above.
        assert_eq!(rotation, unsafe { Rotation::identity() });

        let (w, i, j, k) = (0.5, 0.5, -0.5, 0.5);
        // SAFETY: as above.
        let rotation = unsafe { Rotation::<Scene, LocalEnu>::from_quaternion(w, i, j, k) };
        let (w2, i2, j2, k2) = rotation.to_quaternion();
        assert_relative_eq!(w2, w);
        assert_relative_eq!(i2, i);
        assert_relative_eq!(j2, j);
        assert_relative_eq!(k2, k);
        assert_relative_eq!(-rotation.inverse(), rotation);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn transform_serde() {
        // SAFETY: arbitrary transform between test systems.
        let transform = unsafe {
            RigidBodyTransform::<Scene, LocalEnu>::new(
                vector!(x = m(1.), y = m(2.), z = m(3.); in Scene),
                Rotation::from_quaternion(0.5, 0.5, 0.5, 0.5),
            )
        };
        let json = serde_json::to_string(&transform).expect("serializes");
        let back: RigidBodyTransform<Scene, LocalEnu> =
            serde_json::from_str(&json).expect("deserializes");
        assert_eq!(back, transform);
    }
}
