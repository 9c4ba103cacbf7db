//! Configuration errors a scene author can run into.
//!
//! Only mistakes reachable from the public construction and wiring API get
//! a variant here; handing the simulation a handle it never created is a
//! programming error and panics instead.

use thiserror::Error;

use crate::voltage::LineDirection;
use crate::world::Gravity;

/// Errors raised while assembling a scene.
#[derive(Debug, Error)]
pub enum Error {
    /// Hollow ring with `outer_radius <= inner_radius`.
    #[error("invalid ring radii: outer {outer} must exceed inner {inner}")]
    InvalidRadii {
        /// Inner radius as given, meters.
        inner: f32,
        /// Outer radius as given, meters.
        outer: f32,
    },

    /// A body variant was created under a gravity model it does not support.
    #[error("{what} requires {required:?} gravity, world is {actual:?}")]
    UnsupportedGravity {
        /// The component being constructed.
        what: &'static str,
        /// Gravity model the component needs.
        required: Gravity,
        /// Gravity model the world was built with.
        actual: Gravity,
    },

    /// A dynamic body was given a zero or negative mass.
    #[error("dynamic body mass must be positive, got {0} kg")]
    NonPositiveMass(f32),

    /// A body shape with zero area, which leaves density undefined.
    #[error("body shape has zero area ({width} x {height} m)")]
    ZeroArea {
        /// Shape width as given, meters.
        width: f32,
        /// Shape height as given, meters.
        height: f32,
    },

    /// Hollow-ring bodies only exist as static arena walls.
    #[error("hollow-ring bodies must be static")]
    DynamicRing,

    /// A voltage line was wired into a pin slot of the opposite direction.
    #[error("pin declared {expected:?} but line is {actual:?}")]
    DirectionMismatch {
        /// Direction the pin slot was declared with.
        expected: LineDirection,
        /// Intrinsic direction of the offered line.
        actual: LineDirection,
    },

    /// Two lines were wired into the same microcontroller pin.
    #[error("pin {0} is already wired")]
    PinOccupied(&'static str),

    /// Geometry that the physics engine rejected as degenerate.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(&'static str),
}
