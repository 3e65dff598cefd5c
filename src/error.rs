use crate::config::AnchorId;

/// Result type alias for georeferencing operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Ways in which georeferencing can fail.
///
/// Coordinate math itself never fails; numeric edge cases such as the earth's centre surface as
/// `NaN` values instead. These errors cover the stateful parts of the crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A conversion was requested while no reference frame was active.
    #[error("no georeference frame is active")]
    FrameUnavailable,

    /// The anchor the frame should be captured from has no pose.
    #[error("anchor {0} has no world pose")]
    AnchorUnavailable(AnchorId),

    /// A configured latitude lies outside [-90°, 90°].
    #[error("latitude {degrees}° is outside [-90°, 90°]")]
    InvalidLatitude {
        /// The rejected latitude, in degrees.
        degrees: f64,
    },

    /// A persisted configuration was written with a schema this version cannot read.
    #[error("unsupported configuration schema version {found} (expected {expected})")]
    UnsupportedSchemaVersion {
        /// The version found in the persisted data.
        found: u32,
        /// The only version this crate reads.
        expected: u32,
    },
}
