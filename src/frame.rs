//! A scene pinned to a place on earth.
//!
//! A [`ReferenceFrame`] ties the [`Scene`] to the [`LocalEnu`] tangent plane at a geodetic origin
//! by way of an anchor: the anchor's position is the origin, and its body X, Y, and Z axes are
//! East, North, and Up respectively. Scene positions can then be turned into [`Wgs84`] locations
//! and back:
//!
//! ```text
//! Scene --anchor--> LocalEnu --tangent plane at origin--> Ecef --> Wgs84
//! ```

use crate::coordinate_systems::{Ecef, LocalEnu, Scene};
use crate::coordinates::Coordinate;
use crate::engineering::{Orientation, Pose};
use crate::geodetic::Wgs84;
use crate::math::{RigidBodyTransform, Rotation};

/// The mapping between scene coordinates and world locations, frozen at capture time.
///
/// The anchor's pose is sampled once in [`ReferenceFrame::capture`]. If the anchor moves
/// afterwards the frame keeps using the old pose; capture a new frame to pick up the change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceFrame {
    origin: Wgs84,
    anchor: Pose<Scene>,
    scene_to_enu: RigidBodyTransform<Scene, LocalEnu>,
    ecef_to_enu: RigidBodyTransform<Ecef, LocalEnu>,
}

impl ReferenceFrame {
    /// Pins `anchor` at `origin`.
    ///
    /// `anchor` is the anchor's world pose in the scene. Its position becomes the origin of the
    /// local tangent plane and its body axes become the East, North, and Up directions there.
    ///
    /// ```rust
    /// use approx::assert_abs_diff_eq;
    /// use geoanchor::{
    ///     coordinate,
    ///     engineering::Pose,
    ///     frame::ReferenceFrame,
    ///     systems::{Scene, Wgs84},
    /// };
    /// use uom::si::{f64::Length, length::meter};
    ///
    /// let origin = Wgs84::from_degrees_and_meters(48.8584, 2.2945, 35.).expect("valid latitude");
    /// let frame = ReferenceFrame::capture(origin, Pose::<Scene>::default());
    ///
    /// // the scene origin is where we pinned it
    /// assert_abs_diff_eq!(frame.from_local(frame.anchor().position()), origin);
    ///
    /// // and 300m up the scene's Z axis is 300m higher
    /// let top = frame.from_local(coordinate!(
    ///     x = Length::new::<meter>(0.),
    ///     y = Length::new::<meter>(0.),
    ///     z = Length::new::<meter>(300.);
    ///     in Scene
    /// ));
    /// assert_abs_diff_eq!(top.altitude().get::<meter>(), 335., epsilon = 1e-6);
    /// ```
    #[must_use]
    pub fn capture(origin: Wgs84, anchor: Pose<Scene>) -> Self {
        // SAFETY: a frame defines LocalEnu as the system spanned by its anchor, and places that
        // system's origin at `origin`. Both transforms below rely on that same definition.
        let scene_to_enu = unsafe { anchor.map_as_zero_in::<LocalEnu>() };
        let ecef_to_enu = unsafe { RigidBodyTransform::<Ecef, LocalEnu>::ecef_to_enu_at(&origin) };

        Self {
            origin,
            anchor,
            scene_to_enu,
            ecef_to_enu,
        }
    }

    /// Returns the geodetic location of the anchor.
    #[must_use]
    pub fn origin(&self) -> Wgs84 {
        self.origin
    }

    /// Returns the anchor pose that was sampled when the frame was captured.
    #[must_use]
    pub fn anchor(&self) -> Pose<Scene> {
        self.anchor
    }

    /// Converts a scene position into a world location.
    ///
    /// Positions far from the anchor pick up the curvature of the earth: a point 1km along the
    /// anchor's X axis is 1km East along the tangent plane, and therefore slightly above the
    /// ellipsoid.
    #[doc(alias = "local_to_geodetic")]
    #[must_use]
    pub fn from_local(&self, local: Coordinate<Scene>) -> Wgs84 {
        let in_enu = self.scene_to_enu.transform(local);
        self.ecef_to_enu.inverse_transform(in_enu).to_wgs84()
    }

    /// Converts a world location into a scene position.
    ///
    /// This is the inverse of [`ReferenceFrame::from_local`].
    #[doc(alias = "geodetic_to_local")]
    #[must_use]
    pub fn to_local(&self, world: &Wgs84) -> Coordinate<Scene> {
        let in_enu = self.ecef_to_enu.transform(Coordinate::<Ecef>::from_wgs84(world));
        self.scene_to_enu.inverse_transform(in_enu)
    }

    /// Expresses a scene position in the local tangent plane at the origin.
    #[must_use]
    pub fn to_enu(&self, local: Coordinate<Scene>) -> Coordinate<LocalEnu> {
        self.scene_to_enu.transform(local)
    }

    /// Returns the rotation from scene axes onto East/North/Up.
    ///
    /// Directions (as opposed to positions) only need this part of the frame, for example to
    /// turn a velocity in the scene into one over ground.
    #[must_use]
    pub fn rotation(&self) -> Rotation<Scene, LocalEnu> {
        self.scene_to_enu.rotation()
    }

    /// Expresses the orientation of a scene object relative to East/North/Up.
    ///
    /// An object whose forward (X) axis ends up pointing East has a yaw of 0°; one facing North
    /// has a yaw of 90°.
    #[must_use]
    pub fn orientation_in_enu(&self, orientation: Orientation<Scene>) -> Orientation<LocalEnu> {
        orientation * self.rotation()
    }
}

#[cfg(test)]
mod tests {
    use super::ReferenceFrame;
    use crate::coordinate_systems::{LocalEnu, Scene};
    use crate::coordinates::Coordinate;
    use crate::engineering::{Orientation, Pose};
    use crate::geodetic::Wgs84;
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

    fn zurich() -> Wgs84 {
        Wgs84::from_degrees_and_meters(47.3769, 8.5417, 408.).expect("valid latitude")
    }

    /// An anchor away from the scene origin, yawed so that its X axis (East) is the scene's Y.
    fn turned_anchor() -> Pose<Scene> {
        Pose::new(
            coordinate!(x = m(12.), y = m(-3.), z = m(1.5); in Scene),
            Orientation::from_tait_bryan_angles(d(90.), d(0.), d(0.)),
        )
    }

    #[rstest]
    #[case(coordinate!(x = m(0.), y = m(0.), z = m(0.); in Scene))]
    #[case(coordinate!(x = m(10.), y = m(20.), z = m(30.); in Scene))]
    #[case(coordinate!(x = m(-2500.), y = m(1200.), z = m(-15.); in Scene))]
    #[case(coordinate!(x = m(40_000.), y = m(-75_000.), z = m(3_000.); in Scene))]
    fn identity_anchor_roundtrips(#[case] local: Coordinate<Scene>) {
        let null_island = Wgs84::from_degrees_and_meters(0., 0., 0.).expect("valid latitude");
        for origin in [null_island, zurich()] {
            let frame = ReferenceFrame::capture(origin, Pose::default());
            let roundtripped = frame.to_local(&frame.from_local(local));
            assert_abs_diff_eq!(roundtripped, local, epsilon = m(1e-3));
        }
    }

    #[rstest]
    #[case(coordinate!(x = m(0.), y = m(0.), z = m(0.); in Scene))]
    #[case(coordinate!(x = m(150.), y = m(-42.), z = m(7.); in Scene))]
    fn turned_anchor_roundtrips(#[case] local: Coordinate<Scene>) {
        let frame = ReferenceFrame::capture(zurich(), turned_anchor());
        let roundtripped = frame.to_local(&frame.from_local(local));
        assert_abs_diff_eq!(roundtripped, local, epsilon = m(1e-3));
    }

    #[test]
    fn anchor_sits_at_the_origin() {
        let frame = ReferenceFrame::capture(zurich(), turned_anchor());
        assert_abs_diff_eq!(frame.from_local(turned_anchor().position()), zurich());
        assert_abs_diff_eq!(frame.to_local(&zurich()), turned_anchor().position());
        assert_abs_diff_eq!(
            frame.to_enu(turned_anchor().position()),
            Coordinate::<LocalEnu>::origin()
        );
    }

    #[test]
    fn anchor_z_is_up() {
        let anchor = Pose::new(
            coordinate!(x = m(-7.), y = m(3.), z = m(0.); in Scene),
            Orientation::aligned(),
        );
        let frame = ReferenceFrame::capture(zurich(), anchor);
        let above = frame.from_local(coordinate!(x = m(-7.), y = m(3.), z = m(100.); in Scene));
        assert_relative_eq!(
            above.altitude().get::<meter>(),
            zurich().altitude().get::<meter>() + 100.,
            epsilon = 1e-6
        );
        assert_relative_eq!(
            above.latitude().get::<degree>(),
            zurich().latitude().get::<degree>(),
            epsilon = 1e-9
        );
        assert_relative_eq!(
            above.longitude().get::<degree>(),
            zurich().longitude().get::<degree>(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn turned_anchor_maps_scene_y_to_east() {
        let frame = ReferenceFrame::capture(zurich(), turned_anchor());
        let local = coordinate!(x = m(12.), y = m(47.), z = m(1.5); in Scene);

        let in_enu = frame.to_enu(local);
        assert_abs_diff_eq!(in_enu, coordinate!(e = m(50.), n = m(0.), u = m(0.); in LocalEnu));

        // SAFETY: LocalEnu is the tangent plane at zurich() for this frame.
        let expected = unsafe { in_enu.to_ecef_at(&zurich()) }.to_wgs84();
        assert_abs_diff_eq!(frame.from_local(local), expected);
        assert!(frame.from_local(local).longitude() > zurich().longitude());
    }

    #[test]
    fn rotation_only_turns_directions() {
        let frame = ReferenceFrame::capture(zurich(), turned_anchor());
        let velocity = vector!(x = m(0.), y = m(2.), z = m(0.); in Scene);
        assert_abs_diff_eq!(
            frame.rotation().transform(velocity),
            vector!(e = m(2.), n = m(0.), u = m(0.); in LocalEnu)
        );
    }

    #[rstest]
    // facing along the scene's Y axis, which the anchor turned to East
    #[case(d(90.), d(0.))]
    // facing along the scene's -X axis, which is North
    #[case(d(180.), d(90.))]
    #[case(d(0.), d(-90.))]
    fn headings_are_relative_to_east(#[case] yaw_in_scene: Angle, #[case] yaw_in_enu: Angle) {
        let frame = ReferenceFrame::capture(zurich(), turned_anchor());
        let in_scene = Orientation::<Scene>::from_tait_bryan_angles(yaw_in_scene, d(0.), d(0.));
        assert_relative_eq!(
            frame.orientation_in_enu(in_scene),
            Orientation::<LocalEnu>::from_tait_bryan_angles(yaw_in_enu, d(0.), d(0.)),
            epsilon = 1e-12
        );
    }

    #[test]
    fn later_anchor_moves_are_not_picked_up() {
        let mut anchor = turned_anchor();
        let frame = ReferenceFrame::capture(zurich(), anchor);
        anchor = Pose::default();
        assert_ne!(frame.anchor(), anchor);
        assert_eq!(frame.anchor(), turned_anchor());
        assert_eq!(frame.origin(), zurich());
    }
}
