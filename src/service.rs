//! Owner of the active [`ReferenceFrame`].
//!
//! Applications typically keep one [`GeoreferenceService`] next to their scene. It starts out
//! without a frame, gets one from [`GeoreferenceService::activate`] once the anchor exists, and
//! answers conversion queries from then on. Queries made while no frame is active fail with
//! [`Error::FrameUnavailable`] rather than silently assuming an identity mapping.

use crate::config::{AnchorId, GeoreferenceConfig};
use crate::coordinate_systems::{LocalEnu, Scene};
use crate::coordinates::Coordinate;
use crate::engineering::Pose;
use crate::error::{Error, Result};
use crate::frame::ReferenceFrame;
use crate::geodetic::Wgs84;
use crate::math::Rotation;

/// Resolves anchors to their current world pose in the scene.
///
/// This is implemented for any `Fn(AnchorId) -> Option<Pose<Scene>>`, so a closure over the
/// scene graph is usually all that is needed.
pub trait AnchorSource {
    /// Returns the world pose of `anchor`, or `None` if the scene has no such anchor.
    fn world_pose(&self, anchor: AnchorId) -> Option<Pose<Scene>>;
}

impl<F> AnchorSource for F
where
    F: Fn(AnchorId) -> Option<Pose<Scene>>,
{
    fn world_pose(&self, anchor: AnchorId) -> Option<Pose<Scene>> {
        self(anchor)
    }
}

/// Holds at most one active [`ReferenceFrame`] and answers conversions against it.
///
/// ```rust
/// use geoanchor::{
///     engineering::Pose, systems::Scene, AnchorId, Error, GeoreferenceConfig,
///     GeoreferenceService, Coordinate,
/// };
///
/// let config = GeoreferenceConfig {
///     origin_latitude: 59.3293,
///     origin_longitude: 18.0686,
///     origin_altitude: 28.,
///     anchor: AnchorId(1),
/// };
///
/// let mut service = GeoreferenceService::new();
/// assert_eq!(
///     service.to_geodetic(Coordinate::<Scene>::origin()),
///     Err(Error::FrameUnavailable)
/// );
///
/// service.activate(&config, &|_: AnchorId| Some(Pose::<Scene>::default()))?;
/// let here = service.to_geodetic(Coordinate::<Scene>::origin())?;
/// assert!((here.altitude().value - 28.).abs() < 1e-6);
/// # Ok::<(), geoanchor::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct GeoreferenceService {
    frame: Option<ReferenceFrame>,
}

impl GeoreferenceService {
    /// Constructs a service with no active frame.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Captures a frame from `config` and makes it the active one.
    ///
    /// The configured anchor's pose is looked up in `anchors` exactly once. On failure the
    /// previously active frame, if any, stays active.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidLatitude`] if the configured origin is not on earth.
    /// - [`Error::AnchorUnavailable`] if `anchors` has no pose for the configured anchor.
    pub fn activate(
        &mut self,
        config: &GeoreferenceConfig,
        anchors: &impl AnchorSource,
    ) -> Result<&ReferenceFrame> {
        let origin = config.origin()?;
        let anchor = anchors
            .world_pose(config.anchor)
            .ok_or(Error::AnchorUnavailable(config.anchor))?;

        let frame = ReferenceFrame::capture(origin, anchor);
        tracing::info!(anchor = %config.anchor, %origin, "captured georeference frame");
        self.install(frame);
        self.frame()
    }

    /// Makes `frame` the active frame, returning the one it replaces.
    pub fn install(&mut self, frame: ReferenceFrame) -> Option<ReferenceFrame> {
        let previous = self.frame.replace(frame);
        if let Some(previous) = &previous {
            tracing::warn!(
                previous = %previous.origin(),
                current = %frame.origin(),
                "replaced active georeference frame"
            );
        }
        previous
    }

    /// Deactivates the current frame, returning it.
    ///
    /// Subsequent queries fail with [`Error::FrameUnavailable`] until a new frame is activated.
    pub fn tear_down(&mut self) -> Option<ReferenceFrame> {
        let frame = self.frame.take();
        if let Some(frame) = &frame {
            tracing::info!(origin = %frame.origin(), "tore down georeference frame");
        }
        frame
    }

    /// Returns true if a frame is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.frame.is_some()
    }

    /// Returns the active frame.
    ///
    /// # Errors
    ///
    /// [`Error::FrameUnavailable`] if no frame is active.
    pub fn frame(&self) -> Result<&ReferenceFrame> {
        self.frame.as_ref().ok_or_else(|| {
            tracing::debug!("georeference query without an active frame");
            Error::FrameUnavailable
        })
    }

    /// Converts a scene position into a world location using the active frame.
    ///
    /// See [`ReferenceFrame::from_local`].
    ///
    /// # Errors
    ///
    /// [`Error::FrameUnavailable`] if no frame is active.
    pub fn to_geodetic(&self, local: Coordinate<Scene>) -> Result<Wgs84> {
        Ok(self.frame()?.from_local(local))
    }

    /// Converts a world location into a scene position using the active frame.
    ///
    /// See [`ReferenceFrame::to_local`].
    ///
    /// # Errors
    ///
    /// [`Error::FrameUnavailable`] if no frame is active.
    pub fn to_local(&self, world: &Wgs84) -> Result<Coordinate<Scene>> {
        Ok(self.frame()?.to_local(world))
    }

    /// Returns the rotation from scene axes onto East/North/Up of the active frame.
    ///
    /// # Errors
    ///
    /// [`Error::FrameUnavailable`] if no frame is active.
    pub fn rotation(&self) -> Result<Rotation<Scene, LocalEnu>> {
        Ok(self.frame()?.rotation())
    }
}

#[cfg(test)]
mod tests {
    use super::{AnchorSource, GeoreferenceService};
    use crate::config::{AnchorId, GeoreferenceConfig};
    use crate::coordinate;
    use crate::coordinate_systems::Scene;
    use crate::coordinates::Coordinate;
    use crate::engineering::{Orientation, Pose};
    use crate::error::Error;
    use crate::frame::ReferenceFrame;
    use crate::geodetic::Wgs84;
    use approx::assert_abs_diff_eq;
    use std::cell::Cell;
    use uom::si::f64::{Angle, Length};
    use uom::si::{angle::degree, length::meter};

    fn m(meters: f64) -> Length {
        Length::new::<meter>(meters)
    }

    fn init_logging() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }

    const ANCHOR: AnchorId = AnchorId(17);

    fn config() -> GeoreferenceConfig {
        GeoreferenceConfig {
            origin_latitude: -33.856,
            origin_longitude: 151.215,
            origin_altitude: 4.,
            anchor: ANCHOR,
        }
    }

    fn anchor_pose() -> Pose<Scene> {
        Pose::new(
            coordinate!(x = m(2.), y = m(0.), z = m(-1.); in Scene),
            Orientation::from_tait_bryan_angles(
                Angle::new::<degree>(-20.),
                Angle::new::<degree>(0.),
                Angle::new::<degree>(0.),
            ),
        )
    }

    fn scene(anchor: AnchorId) -> Option<Pose<Scene>> {
        (anchor == ANCHOR).then(anchor_pose)
    }

    fn activated() -> GeoreferenceService {
        let mut service = GeoreferenceService::new();
        service.activate(&config(), &scene).expect("anchor exists");
        service
    }

    #[test]
    fn queries_fail_before_activation() {
        init_logging();
        let service = GeoreferenceService::new();
        assert!(!service.is_active());
        assert_eq!(
            service.to_geodetic(Coordinate::origin()),
            Err(Error::FrameUnavailable)
        );
        let somewhere = Wgs84::from_degrees_and_meters(0., 0., 0.).expect("valid latitude");
        assert_eq!(service.to_local(&somewhere), Err(Error::FrameUnavailable));
        assert_eq!(service.rotation(), Err(Error::FrameUnavailable));
        assert!(matches!(service.frame(), Err(Error::FrameUnavailable)));
    }

    #[test]
    fn activation_delegates_to_the_captured_frame() {
        init_logging();
        let service = activated();
        let expected = ReferenceFrame::capture(config().origin().expect("valid"), anchor_pose());
        assert_eq!(service.frame(), Ok(&expected));

        let p = coordinate!(x = m(30.), y = m(-8.), z = m(5.); in Scene);
        assert_eq!(service.to_geodetic(p), Ok(expected.from_local(p)));
        assert_eq!(service.rotation(), Ok(expected.rotation()));

        let world = service.to_geodetic(p).expect("active");
        assert_abs_diff_eq!(service.to_local(&world).expect("active"), p);
    }

    #[test]
    fn anchor_is_sampled_once() {
        init_logging();
        let lookups = Cell::new(0);
        let counting = |anchor| {
            lookups.set(lookups.get() + 1);
            scene(anchor)
        };
        let mut service = GeoreferenceService::new();
        service.activate(&config(), &counting).expect("anchor exists");
        let _ = service.to_geodetic(Coordinate::origin());
        let _ = service.rotation();
        assert_eq!(lookups.get(), 1);
    }

    #[test]
    fn missing_anchor_leaves_state_untouched() {
        init_logging();
        let missing = GeoreferenceConfig {
            anchor: AnchorId(99),
            ..config()
        };

        let mut service = GeoreferenceService::new();
        assert_eq!(
            service.activate(&missing, &scene).map(|_| ()),
            Err(Error::AnchorUnavailable(AnchorId(99)))
        );
        assert!(!service.is_active());

        let mut service = activated();
        let before = *service.frame().expect("active");
        assert!(service.activate(&missing, &scene).is_err());
        assert_eq!(service.frame(), Ok(&before));
    }

    #[test]
    fn invalid_origin_is_rejected_before_the_anchor_is_looked_up() {
        init_logging();
        let bad = GeoreferenceConfig {
            origin_latitude: 123.,
            ..config()
        };
        let unreachable = |_: AnchorId| -> Option<Pose<Scene>> {
            panic!("anchor should not be looked up")
        };
        let mut service = GeoreferenceService::new();
        assert_eq!(
            service.activate(&bad, &unreachable).map(|_| ()),
            Err(Error::InvalidLatitude { degrees: 123. })
        );
        assert!(!service.is_active());
    }

    #[test]
    fn install_replaces_and_returns_the_previous_frame() {
        init_logging();
        let mut service = activated();
        let first = *service.frame().expect("active");

        let elsewhere = Wgs84::from_degrees_and_meters(64.1466, -21.9426, 0.).expect("valid");
        let second = ReferenceFrame::capture(elsewhere, Pose::default());

        assert_eq!(service.install(second), Some(first));
        assert_eq!(service.frame(), Ok(&second));
        assert_eq!(service.install(second), Some(second));
    }

    #[test]
    fn tear_down_makes_queries_fail_again() {
        init_logging();
        let mut service = activated();
        assert!(service.tear_down().is_some());
        assert!(!service.is_active());
        assert_eq!(
            service.to_geodetic(Coordinate::origin()),
            Err(Error::FrameUnavailable)
        );
        assert_eq!(service.tear_down(), None);
    }

    #[test]
    fn closures_are_anchor_sources() {
        let source = |anchor: AnchorId| (anchor.0 % 2 == 1).then(Pose::<Scene>::default);
        assert!(source.world_pose(AnchorId(1)).is_some());
        assert!(source.world_pose(AnchorId(2)).is_none());
    }
}
