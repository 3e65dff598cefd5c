use uom::si::angle::radian;
use uom::si::f64::Angle;

/// An angle that is only ever observed modulo a full turn.
///
/// Latitudes and longitudes are normalized through this on the way out of `Wgs84`, so that
/// 190°E and 170°W are reported the same.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct BoundedAngle {
    angle: Angle,
}

impl BoundedAngle {
    pub(crate) fn new(angle: impl Into<Angle>) -> Self {
        Self {
            // NOTE: uom may store the value differently-normalized, so the getters normalize
            // again on the way out.
            angle: Angle::new::<radian>(Self::into_bounds(angle.into())),
        }
    }

    /// Returns the angle in [0°, 360°) in radians.
    pub(crate) fn get_bounded(self) -> f64 {
        Self::into_bounds(self.angle)
    }

    fn into_bounds(angle: Angle) -> f64 {
        angle
            .get::<radian>()
            .rem_euclid(Angle::FULL_TURN.get::<radian>())
    }

    /// Returns the angle in (-180°, 180°] in radians.
    ///
    /// A half turn maps to +180° rather than -180°, matching how longitudes on the antimeridian
    /// are conventionally reported.
    pub(crate) fn to_signed_range(self) -> f64 {
        let angle = self.get_bounded();
        if angle <= Angle::HALF_TURN.get::<radian>() {
            angle
        } else {
            angle - Angle::FULL_TURN.get::<radian>()
        }
    }

    /// Returns the shortest unsigned angular distance to `other`, in radians.
    #[cfg(test)]
    pub(crate) fn separation(self, other: Self) -> f64 {
        Self::new(self.angle - other.angle).to_signed_range().abs()
    }
}

#[cfg(test)]
mod tests {
    use crate::util::BoundedAngle;
    use approx::assert_relative_eq;
    use rstest::rstest;
    use uom::si::angle::degree;
    use uom::si::f64::Angle;

    fn d(degrees: f64) -> Angle {
        Angle::new::<degree>(degrees)
    }

    #[test]
    fn negative_angles_wrap_into_the_full_turn() {
        let sut = BoundedAngle::new(d(-390.));
        assert_relative_eq!(sut.get_bounded(), 330.0_f64.to_radians(), epsilon = 1e-12);
    }

    #[rstest]
    #[case(d(0.), 0.)]
    #[case(d(180.), 180.)]
    #[case(d(-180.), 180.)]
    #[case(d(540.), 180.)]
    #[case(d(359.), -1.)]
    #[case(d(190.), -170.)]
    #[case(d(-190.), 170.)]
    #[case(d(270.), -90.)]
    #[case(d(-90.), -90.)]
    #[case(d(360. + 120.), 120.)]
    fn signed_range_is_half_open_below(#[case] input: Angle, #[case] expected_degrees: f64) {
        assert_relative_eq!(
            BoundedAngle::new(input).to_signed_range(),
            expected_degrees.to_radians(),
            epsilon = f64::EPSILON * 1000.
        );
    }

    #[rstest]
    #[case(d(179.5), d(-179.5), 1.)]
    #[case(d(10.), d(370.), 0.)]
    #[case(d(0.), d(90.), 90.)]
    fn separation_takes_the_short_way_round(
        #[case] a: Angle,
        #[case] b: Angle,
        #[case] expected_degrees: f64,
    ) {
        let separation = BoundedAngle::new(a).separation(BoundedAngle::new(b));
        assert_relative_eq!(separation, expected_degrees.to_radians(), epsilon = 1e-9);
    }
}
