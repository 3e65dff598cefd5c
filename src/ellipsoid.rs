//! Defining parameters of the WGS84 reference ellipsoid and the quantities derived from them.
//!
//! Values follow [NGA.STND.0036] table 3.1. All lengths are in meters.
//!
//! [NGA.STND.0036]: https://nsgreg.nga.mil/doc/view?i=4085

/// Semi-major axis of the ellipsoid, ie the equatorial radius.
#[doc(alias = "equatorial radius")]
#[doc(alias = "a")]
pub const SEMI_MAJOR_AXIS: f64 = 6_378_137.0;

/// Reciprocal of the flattening.
#[doc(alias = "1/f")]
pub const INVERSE_FLATTENING: f64 = 298.257_223_563;

/// Flattening of the ellipsoid, `(a - b) / a`.
#[doc(alias = "f")]
pub const FLATTENING: f64 = 1.0 / INVERSE_FLATTENING;

/// Semi-minor axis of the ellipsoid, ie the polar radius.
#[doc(alias = "polar radius")]
#[doc(alias = "b")]
// b/a = 1 - f
pub const SEMI_MINOR_AXIS: f64 = SEMI_MAJOR_AXIS * (1.0 - FLATTENING);

/// Square of the first eccentricity.
#[doc(alias = "e^2")]
// e^2 = 1 - b^2/a^2
//     = 1 - (1 - f)^2
//     = 2f - f^2
pub const ECCENTRICITY_SQ: f64 = 2.0 * FLATTENING - FLATTENING * FLATTENING;

/// Square of the second eccentricity.
#[doc(alias = "second eccentricity squared")]
// e'^2 = a^2/b^2 - 1
//      = e^2 / (1 - e^2)
pub const SECOND_ECCENTRICITY_SQ: f64 = ECCENTRICITY_SQ / (1.0 - ECCENTRICITY_SQ);
