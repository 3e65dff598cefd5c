use crate::ellipsoid::{ECCENTRICITY_SQ, SECOND_ECCENTRICITY_SQ, SEMI_MAJOR_AXIS, SEMI_MINOR_AXIS};
use crate::math::RigidBodyTransform;
use crate::systems::{Ecef, EnuLike};
use crate::{util::BoundedAngle, Coordinate, CoordinateSystem, Point3};
use std::fmt;
use std::fmt::Display;
use uom::si::f64::{Angle, Length};
use uom::si::{
    angle::{degree, radian},
    length::meter,
};

#[cfg(any(test, feature = "approx"))]
use approx::AbsDiffEq;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An Earth-bound location in the [World Geodetic System '84][wgs84].
///
/// Latitude is positive north of the equator, longitude is positive east of the IERS Reference
/// Meridian, and altitude is the height above the WGS84 reference ellipsoid (not above the geoid
/// or mean sea level).
///
/// [wgs84]: https://en.wikipedia.org/wiki/World_Geodetic_System#WGS_84
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Wgs84 {
    // NOTE: uom does not guarantee how these angles are normalized, so the accessors normalize
    // them on the way out.
    pub(crate) latitude: Angle,
    pub(crate) longitude: Angle,
    pub(crate) altitude: Length,
}

/// Argument type for [`Wgs84::build`].
#[derive(Debug, Default, Clone, Copy)]
#[must_use]
pub struct Components {
    /// Must be in [-90°,90°] modulo full turns.
    pub latitude: Angle,
    pub longitude: Angle,
    /// Height above the WGS84 reference ellipsoid.
    pub altitude: Length,
}

impl Wgs84 {
    /// Constructs a world location from latitude, longitude, and altitude.
    ///
    /// The latitude must be in [-90°,90°] % 360°. If it is not, this function returns `None`.
    /// Any longitude is accepted and is reported back in (-180°,180°].
    ///
    /// ```rust
    /// use geoanchor::{geodetic::Components, systems::Wgs84};
    /// use uom::si::f64::{Angle, Length};
    /// use uom::si::{angle::degree, length::meter};
    ///
    /// let zugspitze = Wgs84::build(Components {
    ///     latitude: Angle::new::<degree>(47.4211),
    ///     longitude: Angle::new::<degree>(10.9853),
    ///     altitude: Length::new::<meter>(2962.),
    /// });
    /// assert!(zugspitze.is_some());
    ///
    /// let nowhere = Wgs84::build(Components {
    ///     latitude: Angle::new::<degree>(91.),
    ///     ..Default::default()
    /// });
    /// assert!(nowhere.is_none());
    /// ```
    #[must_use]
    pub fn build(
        Components {
            latitude,
            longitude,
            altitude,
        }: Components,
    ) -> Option<Self> {
        let latitude_in_signed_radians = BoundedAngle::new(latitude).to_signed_range();
        if !(-std::f64::consts::FRAC_PI_2..=std::f64::consts::FRAC_PI_2)
            .contains(&latitude_in_signed_radians)
        {
            return None;
        }

        Some(Self {
            latitude,
            longitude,
            altitude,
        })
    }

    /// Constructs a world location from plain degrees and meters.
    ///
    /// This is the shape in which geodetic origins are usually configured. Returns `None` under
    /// the same conditions as [`Wgs84::build`], which includes a NaN latitude.
    #[must_use]
    pub fn from_degrees_and_meters(latitude: f64, longitude: f64, altitude: f64) -> Option<Self> {
        Self::build(Components {
            latitude: Angle::new::<degree>(latitude),
            longitude: Angle::new::<degree>(longitude),
            altitude: Length::new::<meter>(altitude),
        })
    }

    /// Computes the [great-circle distance] between the two locations on the surface of
    /// the earth.
    ///
    /// This treats the earth as a sphere with the WGS84 equatorial radius and ignores altitude,
    /// so it is an approximation. It is however well-conditioned for very short distances, which
    /// makes it suitable for checking how far two fixes drifted apart.
    ///
    /// [great-circle distance]: https://en.wikipedia.org/wiki/Great-circle_distance
    #[doc(alias = "great_circle_distance")]
    #[must_use]
    pub fn haversine_distance_on_surface(&self, other: &Wgs84) -> Length {
        central_angle_by_haversine(
            self.latitude,
            other.latitude,
            self.longitude,
            other.longitude,
        )
        .get::<radian>()
            * Length::new::<meter>(SEMI_MAJOR_AXIS)
    }

    /// Returns the angle north of the equator ("northing").
    ///
    /// The returned value is always in [-90°, 90°].
    #[must_use]
    pub fn latitude(&self) -> Angle {
        Angle::new::<radian>(BoundedAngle::new(self.latitude).to_signed_range())
    }

    /// Returns the angle east of the [IERS Reference Meridian] ("easting").
    ///
    /// The returned value is always in (-180°, 180°].
    ///
    /// [IERS Reference Meridian]: https://en.wikipedia.org/wiki/IERS_Reference_Meridian
    #[must_use]
    pub fn longitude(&self) -> Angle {
        Angle::new::<radian>(BoundedAngle::new(self.longitude).to_signed_range())
    }

    /// Returns the height above the WGS84 reference ellipsoid.
    ///
    /// The ellipsoid only approximates the geoid, so this is close to but not the same as height
    /// above mean sea level.
    #[must_use]
    pub fn altitude(&self) -> Length {
        self.altitude
    }
}

impl Display for Wgs84 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lat = self.latitude();
        let north = lat.is_sign_positive();
        let lat = lat.abs().get::<degree>();
        let lon = self.longitude();
        let east = lon.is_sign_positive();
        let lon = lon.abs().get::<degree>();
        let alt = self.altitude.get::<meter>();
        let ns = if north { 'N' } else { 'S' };
        let ew = if east { 'E' } else { 'W' };
        write!(f, "{lat}°{ns}, {lon}°{ew}, {alt}m")
    }
}

impl Coordinate<Ecef> {
    /// Converts latitude, longitude, and altitude to the Earth-Centered, Earth-Fixed coordinate
    /// system.
    ///
    /// See
    /// <https://en.wikipedia.org/wiki/Geographic_coordinate_conversion#From_geodetic_to_ECEF_coordinates>.
    #[must_use]
    pub fn from_wgs84(wgs84: &Wgs84) -> Self {
        let h = wgs84.altitude.get::<meter>();
        let (sin_phi, cos_phi) = wgs84.latitude.get::<radian>().sin_cos();
        let (sin_lambda, cos_lambda) = wgs84.longitude.get::<radian>().sin_cos();

        // prime vertical radius of curvature
        let n = SEMI_MAJOR_AXIS / (1. - ECCENTRICITY_SQ * sin_phi * sin_phi).sqrt();

        let x = (n + h) * cos_phi * cos_lambda;
        let y = (n + h) * cos_phi * sin_lambda;
        let z = (n * (1. - ECCENTRICITY_SQ) + h) * sin_phi;

        Self::from_nalgebra_point(Point3::new(x, y, z))
    }

    /// Converts an Earth-Centered, Earth-Fixed coordinate into latitude, longitude, and altitude.
    ///
    /// This uses the closed-form (non-iterative) solution due to [Heikkinen][heikkinen], which is
    /// accurate to well below a millimeter for points near the surface of the earth.
    ///
    /// On the polar axis longitude is undefined; this returns 0° there. The center of the earth
    /// has no defined latitude and produces NaN.
    ///
    /// [heikkinen]: https://en.wikipedia.org/wiki/Geographic_coordinate_conversion#The_application_of_Ferrari's_solution
    #[must_use]
    pub fn to_wgs84(&self) -> Wgs84 {
        let (x, y, z) = (self.point.x, self.point.y, self.point.z);

        let a = SEMI_MAJOR_AXIS;
        let b = SEMI_MINOR_AXIS;
        let e2 = ECCENTRICITY_SQ;
        let a2 = a * a;
        let b2 = b * b;
        let z2 = z * z;

        let radius_sq = x * x + y * y;
        let radius = radius_sq.sqrt();
        let big_e_sq = a2 - b2;
        let f = 54. * b2 * z2;
        let g = radius_sq + (1. - e2) * z2 - e2 * big_e_sq;
        let c = e2 * e2 * f * radius_sq / (g * g * g);
        let s = (1. + c + (c * c + 2. * c).sqrt()).cbrt();
        let p = f / (3. * (s + 1. / s + 1.).powi(2) * g * g);
        let q = (1. + 2. * e2 * e2 * p).sqrt();
        // NOTE: rounding can push the radicand just below zero right on the polar axis.
        let r0 = -(e2 * p * radius) / (1. + q)
            + (a2 / 2. * (1. + 1. / q) - (1. - e2) * p * z2 / (q * (1. + q)) - p * radius_sq / 2.)
                .max(0.)
                .sqrt();
        let tmp = (radius - e2 * r0).powi(2);
        let u = (tmp + z2).sqrt();
        let v = (tmp + (1. - e2) * z2).sqrt();
        let z0 = b2 * z / (a * v);

        let latitude = ((z + SECOND_ECCENTRICITY_SQ * z0) / radius).atan();
        let longitude = if x == 0. && y == 0. { 0. } else { y.atan2(x) };
        let altitude = u * (1. - b2 / (a * v));

        Wgs84 {
            latitude: Angle::new::<radian>(latitude),
            longitude: Angle::new::<radian>(longitude),
            altitude: Length::new::<meter>(altitude),
        }
    }

    /// Expresses this point in the ENU-like system `E` whose origin lies at `reference`.
    ///
    /// This is shorthand for applying [`RigidBodyTransform::ecef_to_enu_at`].
    ///
    /// At the poles the East and North axes depend on the longitude of `reference`, which is
    /// arbitrary there. Results are deterministic but should not be relied on for precision.
    ///
    /// # Safety
    ///
    /// `E`'s origin must lie at `reference`, with its axes pointing East, North, and Up there.
    /// See [`RigidBodyTransform::ecef_to_enu_at`].
    #[must_use]
    pub unsafe fn to_enu_at<E>(&self, reference: &Wgs84) -> Coordinate<E>
    where
        E: CoordinateSystem<Convention = EnuLike>,
    {
        // SAFETY: forwarded to the caller.
        let ecef_to_enu = unsafe { RigidBodyTransform::<Ecef, E>::ecef_to_enu_at(reference) };
        ecef_to_enu.transform(*self)
    }
}

impl<E> Coordinate<E>
where
    E: CoordinateSystem<Convention = EnuLike>,
{
    /// Expresses this point, given in the ENU-like system `E` anchored at `reference`, in
    /// [`Ecef`].
    ///
    /// The inverse of [`Coordinate::<Ecef>::to_enu_at`].
    ///
    /// # Safety
    ///
    /// `E`'s origin must lie at `reference`, with its axes pointing East, North, and Up there.
    #[must_use]
    pub unsafe fn to_ecef_at(&self, reference: &Wgs84) -> Coordinate<Ecef> {
        // SAFETY: forwarded to the caller.
        let ecef_to_enu = unsafe { RigidBodyTransform::<Ecef, E>::ecef_to_enu_at(reference) };
        ecef_to_enu.inverse_transform(*self)
    }
}

impl From<Coordinate<Ecef>> for Wgs84 {
    fn from(ecef: Coordinate<Ecef>) -> Self {
        ecef.to_wgs84()
    }
}

impl From<Wgs84> for Coordinate<Ecef> {
    fn from(wgs84: Wgs84) -> Self {
        Self::from_wgs84(&wgs84)
    }
}

/// Computes the central angle between the given lat/lon points with the [haversine formula].
///
/// [haversine formula]: https://en.wikipedia.org/wiki/Haversine_formula
fn central_angle_by_haversine(lat_a: Angle, lat_b: Angle, lon_a: Angle, lon_b: Angle) -> Angle {
    let phi_a = lat_a.get::<radian>();
    let phi_b = lat_b.get::<radian>();
    let delta_phi = phi_b - phi_a;
    let delta_lambda = lon_b.get::<radian>() - lon_a.get::<radian>();

    let hav = (delta_phi / 2.).sin().powi(2)
        + phi_a.cos() * phi_b.cos() * (delta_lambda / 2.).sin().powi(2);
    Angle::new::<radian>(2. * hav.sqrt().clamp(0., 1.).asin())
}

#[cfg(any(test, feature = "approx"))]
impl AbsDiffEq<Self> for Wgs84 {
    type Epsilon = Length;

    fn default_epsilon() -> Self::Epsilon {
        Length::new::<meter>(0.001)
    }

    /// Two locations are equal if they are within `epsilon` of each other along the surface and
    /// in altitude.
    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.haversine_distance_on_surface(other) <= epsilon
            && self
                .altitude
                .get::<meter>()
                .abs_diff_eq(&other.altitude.get::<meter>(), epsilon.get::<meter>())
    }
}
