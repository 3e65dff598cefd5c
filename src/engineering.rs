//! Positions and orientations of objects in a scene.
//!
//! This module describes objects rather than coordinate systems: a [`Pose`] is where an object
//! is and which way it is turned, an [`Orientation`] is only the latter. Scene anchors are handed
//! to a [`ReferenceFrame`] as a `Pose<Scene>`.
//!
//! Every object is assumed to carry its own body axes. An object's orientation is the rotation
//! that turns the axes of the surrounding coordinate system onto the object's body axes. For a
//! scene anchor the body axes are what become East (X), North (Y), and Up (Z).
//!
//! [`Pose::map_as_zero_in`] and [`Orientation::map_as_zero_in`] turn an object into a coordinate
//! system of its own, which is how a scene anchor becomes the [`LocalEnu`] tangent plane.

use crate::coordinates::Coordinate;
use crate::math::{RigidBodyTransform, Rotation};
use crate::{Point3, UnitQuaternion, Vector};
use std::marker::PhantomData;
use std::ops::Mul;
use uom::si::angle::radian;
use uom::si::f64::Angle;

#[cfg(any(test, feature = "approx"))]
use approx::{AbsDiffEq, RelativeEq};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(doc)]
use crate::{
    frame::ReferenceFrame,
    systems::{LocalEnu, Scene},
    CoordinateSystem,
};

/// The implicit coordinate system spanned by an object's body axes.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ObjectCoordinateSystem;

/// The orientation of an object in the [`CoordinateSystem`] `In`, including roll.
///
/// <div class="warning">
///
/// When deserializing, the coordinate system of the deserialized value is _not_ checked.
///
/// </div>
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
// don't require In: Serialize/Deserialize since we skip it anyway
#[cfg_attr(feature = "serde", serde(bound = ""))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Orientation<In> {
    pub(crate) inner: Rotation<In, ObjectCoordinateSystem>,
}

// manual impls of Clone and Copy to avoid requiring In: Copy + Clone
impl<In> Clone for Orientation<In> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<In> Copy for Orientation<In> {}

impl<In> PartialEq<Self> for Orientation<In> {
    fn eq(&self, other: &Self) -> bool {
        self.inner.eq(&other.inner)
    }
}

impl<In> Orientation<In> {
    fn from_body_quaternion(body: UnitQuaternion) -> Self {
        Self {
            inner: Rotation {
                inner: body,
                from: PhantomData,
                to: PhantomData,
            },
        }
    }

    /// Constructs an orientation from [intrinsic] yaw, pitch, and roll [Tait-Bryan angles][tb].
    ///
    /// - yaw turns about the Z axis of `In`, and an object at 0° yaw faces along positive X;
    /// - pitch then turns about the object's (yawed) Y axis;
    /// - roll finally turns about the object's own X axis.
    ///
    /// Positive angles follow the [right-hand rule][rhrot]. In an ENU system that means a positive
    /// yaw turns counter-clockwise when seen from above, ie from East towards North.
    ///
    /// [intrinsic]: https://en.wikipedia.org/wiki/Davenport_chained_rotations#Intrinsic_rotations
    /// [tb]: https://en.wikipedia.org/wiki/Euler_angles#Tait%E2%80%93Bryan_angles
    /// [rhrot]: https://en.wikipedia.org/wiki/Right-hand_rule#Rotations
    #[doc(alias = "from_ypr")]
    #[must_use]
    pub fn from_tait_bryan_angles(
        yaw: impl Into<Angle>,
        pitch: impl Into<Angle>,
        roll: impl Into<Angle>,
    ) -> Self {
        // nalgebra composes these as z-y'-x'', which is the intrinsic yaw-pitch-roll sequence
        Self::from_body_quaternion(UnitQuaternion::from_euler_angles(
            roll.into().get::<radian>(),
            pitch.into().get::<radian>(),
            yaw.into().get::<radian>(),
        ))
    }

    /// Constructs an orientation from the [unit quaternion] that rotates the axes of `In` onto
    /// the object's body axes, with `w` the real part.
    ///
    /// This is the form in which most engines report the world rotation of a scene entity. The
    /// quaternion is normalized if needed, and must not be zero.
    ///
    /// [unit quaternion]: https://en.wikipedia.org/wiki/Versor
    #[doc(alias = "from_versor")]
    #[must_use]
    pub fn from_quaternion(w: f64, i: f64, j: f64, k: f64) -> Self {
        debug_assert_ne!(
            [w, i, j, k],
            [0.0, 0.0, 0.0, 0.0],
            "quaternion must be non-zero"
        );
        Self::from_body_quaternion(UnitQuaternion::new_normalize(nalgebra::Quaternion::new(
            w, i, j, k,
        )))
    }

    /// Returns the `(w, i, j, k)` components of the quaternion accepted by
    /// [`Orientation::from_quaternion`].
    #[doc(alias = "to_versor")]
    #[must_use]
    pub fn to_quaternion(&self) -> (f64, f64, f64, f64) {
        let q = self.inner.inner.into_inner();
        (q.w, q.i, q.j, q.k)
    }

    /// An orientation whose body axes coincide with the axes of `In`.
    #[must_use]
    pub fn aligned() -> Self {
        Self::from_body_quaternion(UnitQuaternion::identity())
    }

    /// Constructs the rotation into a coordinate system `To` in which this orientation is
    /// [`Orientation::aligned`].
    ///
    /// In other words, `To` is the system spanned by the object's body axes.
    ///
    /// # Safety
    ///
    /// The caller asserts that `To` is exactly that system, and that no translation is needed to
    /// get there from `In`. See also [`Pose::map_as_zero_in`].
    #[doc(alias = "as_transform_to")]
    #[must_use]
    pub unsafe fn map_as_zero_in<To>(self) -> Rotation<In, To> {
        Rotation {
            inner: self.inner.inner,
            from: self.inner.from,
            to: PhantomData::<To>,
        }
    }
}

impl<In> Default for Orientation<In> {
    fn default() -> Self {
        Self::aligned()
    }
}

#[cfg(any(test, feature = "approx"))]
impl<In> AbsDiffEq<Self> for Orientation<In> {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        UnitQuaternion::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.inner.abs_diff_eq(&other.inner, epsilon)
    }
}

#[cfg(any(test, feature = "approx"))]
impl<In> RelativeEq for Orientation<In> {
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

// Orientation<From> * Rotation<From, To> -> Orientation<To>
impl<From, To> Mul<Rotation<From, To>> for Orientation<From> {
    type Output = Orientation<To>;

    fn mul(self, rhs: Rotation<From, To>) -> Self::Output {
        // UnitQuaternion has no inv_mul, so this goes through the explicit inverse
        rhs.inverse() * self
    }
}

// Rotation<From, To> * Orientation<To> -> Orientation<From>
impl<From, To> Mul<Orientation<To>> for Rotation<From, To> {
    type Output = Orientation<From>;

    fn mul(self, rhs: Orientation<To>) -> Self::Output {
        Orientation {
            inner: self * rhs.inner,
        }
    }
}

// Orientation<From> * RigidBodyTransform<From, To> -> Orientation<To>
//
// orientations have no position, so only the rotational part applies
impl<From, To> Mul<RigidBodyTransform<From, To>> for Orientation<From> {
    type Output = Orientation<To>;

    fn mul(self, rhs: RigidBodyTransform<From, To>) -> Self::Output {
        self * rhs.rotation()
    }
}

/// The position and orientation of an object in the [`CoordinateSystem`] `In`.
///
/// <div class="warning">
///
/// When deserializing, the coordinate system of the deserialized value is _not_ checked.
///
/// </div>
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
// don't require In: Serialize/Deserialize since we skip it anyway
#[cfg_attr(feature = "serde", serde(bound = ""))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Pose<In> {
    pub(crate) inner: RigidBodyTransform<In, ObjectCoordinateSystem>,
}

// manual impls of Clone and Copy to avoid requiring In: Copy + Clone
impl<In> Clone for Pose<In> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<In> Copy for Pose<In> {}

impl<In> PartialEq<Self> for Pose<In> {
    fn eq(&self, other: &Self) -> bool {
        self.inner.eq(&other.inner)
    }
}

impl<In> Pose<In> {
    /// Constructs a pose from a position and orientation.
    #[must_use]
    pub fn new(position: Coordinate<In>, orientation: Orientation<In>) -> Self {
        Self {
            // SAFETY: the object coordinate system is whatever the object's body axes span, so
            // the given position and orientation define it.
            inner: unsafe {
                RigidBodyTransform::new(Vector::from(position), orientation.map_as_zero_in())
            },
        }
    }

    /// Constructs the transform into a coordinate system `To` whose origin is this pose's
    /// position and whose axes are this pose's body axes.
    ///
    /// Applying the returned transform to [`Pose::position`] yields
    /// [`Coordinate::origin`]; applying its inverse to [`Coordinate::origin`] gives back the
    /// position.
    ///
    /// ```rust
    /// use approx::assert_abs_diff_eq;
    /// use geoanchor::{coordinate, Coordinate, engineering::{Orientation, Pose}, systems::{LocalEnu, Scene}};
    /// use uom::si::{angle::degree, f64::{Angle, Length}, length::meter};
    ///
    /// // an anchor 5m along the scene's X axis, turned 90° about Z
    /// let anchor = Pose::new(
    ///     coordinate!(
    ///         x = Length::new::<meter>(5.),
    ///         y = Length::new::<meter>(0.),
    ///         z = Length::new::<meter>(0.);
    ///         in Scene
    ///     ),
    ///     Orientation::from_tait_bryan_angles(
    ///         Angle::new::<degree>(90.),
    ///         Angle::new::<degree>(0.),
    ///         Angle::new::<degree>(0.),
    ///     ),
    /// );
    ///
    /// // SAFETY: LocalEnu is the system spanned by the anchor in this example.
    /// let scene_to_enu = unsafe { anchor.map_as_zero_in::<LocalEnu>() };
    ///
    /// // a point 5m further along the scene's Y axis is 5m along the anchor's X axis, ie East
    /// let p = coordinate!(
    ///     x = Length::new::<meter>(5.),
    ///     y = Length::new::<meter>(5.),
    ///     z = Length::new::<meter>(0.);
    ///     in Scene
    /// );
    /// assert_abs_diff_eq!(
    ///     scene_to_enu.transform(p),
    ///     coordinate!(
    ///         e = Length::new::<meter>(5.),
    ///         n = Length::new::<meter>(0.),
    ///         u = Length::new::<meter>(0.);
    ///         in LocalEnu
    ///     ),
    /// );
    /// ```
    ///
    /// # Safety
    ///
    /// The caller asserts that `To` is exactly the system described above. Getting this wrong
    /// lets values be typed as being in `To` when they are not.
    #[doc(alias = "as_transform_to")]
    #[must_use]
    pub unsafe fn map_as_zero_in<To>(self) -> RigidBodyTransform<In, To> {
        RigidBodyTransform {
            inner: self.inner.inner,
            from: self.inner.from,
            to: PhantomData::<To>,
        }
    }

    /// Returns the position of the object with this pose.
    #[must_use]
    pub fn position(&self) -> Coordinate<In> {
        Coordinate::from_nalgebra_point(Point3::from(self.inner.translation().inner))
    }

    /// Returns the orientation of the object with this pose.
    #[must_use]
    pub fn orientation(&self) -> Orientation<In> {
        Orientation {
            inner: self.inner.rotation(),
        }
    }
}

impl<In> Default for Pose<In> {
    fn default() -> Self {
        Self::new(Coordinate::default(), Orientation::default())
    }
}

#[cfg(any(test, feature = "approx"))]
impl<In> AbsDiffEq<Self> for Pose<In> {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        crate::Isometry3::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.inner.abs_diff_eq(&other.inner, epsilon)
    }
}

// Pose<From> * RigidBodyTransform<From, To> -> Pose<To>
impl<From, To> Mul<RigidBodyTransform<From, To>> for Pose<From> {
    type Output = Pose<To>;

    fn mul(self, rhs: RigidBodyTransform<From, To>) -> Self::Output {
        // same as rhs.inverse() * self, without materializing the inverse
        Pose {
            inner: RigidBodyTransform {
                inner: rhs.inner.inv_mul(&self.inner.inner),
                from: rhs.to,
                to: self.inner.to,
            },
        }
    }
}

// RigidBodyTransform<From, To> * Pose<To> -> Pose<From>
impl<From, To> Mul<Pose<To>> for RigidBodyTransform<From, To> {
    type Output = Pose<From>;

    fn mul(self, rhs: Pose<To>) -> Self::Output {
        Pose {
            inner: self * rhs.inner,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::coordinate_systems::{LocalEnu, Scene};
    use crate::coordinates::Coordinate;
    use crate::engineering::{Orientation, Pose};
    use crate::math::RigidBodyTransform;
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
    #[case(d(90.), d(0.), d(0.), (0., 1., 0.))]
    #[case(d(-90.), d(0.), d(0.), (0., -1., 0.))]
    #[case(d(180.), d(0.), d(0.), (-1., 0., 0.))]
    #[case(d(0.), d(-90.), d(0.), (0., 0., 1.))]
    #[case(d(0.), d(0.), d(45.), (1., 0., 0.))]
    fn body_forward_axis_in_enu(
        #[case] yaw: Angle,
        #[case] pitch: Angle,
        #[case] roll: Angle,
        #[case] expected: (f64, f64, f64),
    ) {
        let orientation = Orientation::<LocalEnu>::from_tait_bryan_angles(yaw, pitch, roll);
        let pose = Pose::new(Coordinate::<LocalEnu>::origin(), orientation);

        system!(struct Body using right-handed XYZ);
        // SAFETY: Body is the system spanned by `pose` in this test.
        let enu_to_body = unsafe { pose.map_as_zero_in::<Body>() };
        let forward =
            enu_to_body.inverse_transform(vector!(x = m(1.), y = m(0.), z = m(0.); in Body));

        let (e, n, u) = expected;
        assert_abs_diff_eq!(forward, vector!(e = m(e), n = m(n), u = m(u); in LocalEnu));
    }

    #[test]
    fn quaternion_and_tait_bryan_agree() {
        let half = std::f64::consts::FRAC_1_SQRT_2;
        // 90° about Z
        let from_quaternion = Orientation::<Scene>::from_quaternion(half, 0., 0., half);
        let from_angles = Orientation::<Scene>::from_tait_bryan_angles(d(90.), d(0.), d(0.));
        assert_relative_eq!(from_quaternion, from_angles, epsilon = 1e-12);

        let (w, i, j, k) = from_quaternion.to_quaternion();
        assert_relative_eq!(w, half, epsilon = 1e-12);
        assert_relative_eq!(i, 0., epsilon = 1e-12);
        assert_relative_eq!(j, 0., epsilon = 1e-12);
        assert_relative_eq!(k, half, epsilon = 1e-12);
    }

    #[test]
    fn pose_accessors_return_what_was_given() {
        let position = coordinate!(x = m(3.), y = m(-4.), z = m(12.); in Scene);
        let orientation = Orientation::from_tait_bryan_angles(d(30.), d(10.), d(-5.));
        let pose = Pose::new(position, orientation);
        assert_abs_diff_eq!(pose.position(), position);
        assert_relative_eq!(pose.orientation(), orientation);
        assert_eq!(Pose::<Scene>::default().position(), Coordinate::origin());
        assert_eq!(
            Pose::<Scene>::default().orientation(),
            Orientation::aligned()
        );
    }

    #[test]
    fn mapping_a_pose_as_zero_moves_it_to_the_origin() {
        let pose = Pose::new(
            coordinate!(x = m(100.), y = m(50.), z = m(-2.); in Scene),
            Orientation::from_tait_bryan_angles(d(-35.), d(4.), d(1.)),
        );
        // SAFETY: LocalEnu is the system spanned by `pose` in this test.
        let scene_to_enu: RigidBodyTransform<Scene, LocalEnu> = unsafe { pose.map_as_zero_in() };

        let in_enu = pose * scene_to_enu;
        assert_abs_diff_eq!(in_enu.position(), Coordinate::<LocalEnu>::origin());
        assert_relative_eq!(
            in_enu.orientation(),
            Orientation::aligned(),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            pose.orientation() * scene_to_enu,
            Orientation::aligned(),
            epsilon = 1e-12
        );

        assert_abs_diff_eq!(scene_to_enu * in_enu, pose, epsilon = 1e-9);
    }
}
