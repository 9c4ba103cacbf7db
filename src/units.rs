//! Conversions between real-world units and simulation units.
//!
//! The physics engine is happiest when moving shapes are in the rough
//! 0.1–10 range, but the robots this crate simulates are centimeter-scale.
//! Everything a scene author writes (robot dimensions, arena radii, start
//! positions, masses) is therefore in real-world meters and kilograms, and
//! body construction scales it into simulation units with the fixed linear
//! factors below. Sensor readings are converted back before they leave the
//! simulation.

use glam::Vec2;

/// Linear factor applied to lengths and positions (real meters → sim units).
const LENGTH_SCALE: f32 = 10.0;

/// Linear factor applied to masses (real kilograms → sim mass units).
const MASS_SCALE: f32 = 10.0;

/// Standard gravity, m/s².
pub const STANDARD_GRAVITY: f32 = 9.81;

/// Coefficient used for the synthetic top-view surface friction.
pub const FRICTION_COEFFICIENT: f32 = 0.1;

/// Interval of one fixed simulation step, seconds.
pub const FIXED_STEP_SECONDS: f32 = 1.0 / 60.0;

/// Scales a real-world length (meters) into simulation units.
#[inline]
pub fn scale_length(real_m: f32) -> f32 {
    real_m * LENGTH_SCALE
}

/// Inverse of [`scale_length`].
#[inline]
pub fn unscale_length(sim: f32) -> f32 {
    sim / LENGTH_SCALE
}

/// Scales a real-world position (meters) into simulation units.
#[inline]
pub fn scale_position(real_m: Vec2) -> Vec2 {
    real_m * LENGTH_SCALE
}

/// Inverse of [`scale_position`].
#[inline]
pub fn unscale_position(sim: Vec2) -> Vec2 {
    sim / LENGTH_SCALE
}

/// Scales a real-world mass (kilograms) into simulation mass units.
#[inline]
pub fn scale_mass(real_kg: f32) -> f32 {
    real_kg * MASS_SCALE
}

/// Force (N) pressing a resting body of `real_kg` against the ground.
///
/// Top-view worlds have no native gravity, so this is what the synthetic
/// friction rig uses as its normal force.
#[inline]
pub fn normal_force(real_kg: f32) -> f32 {
    real_kg * STANDARD_GRAVITY
}
