//! # sumosim
//!
//! A 2D robotics simulator core for teaching and testing embedded control
//! algorithms against a simulated world: physics-backed scene objects,
//! simulated analog sensors, and a microcontroller voltage-line bridge
//! that lets firmware-style control logic drive a simulated robot exactly
//! as it would drive real hardware.
//!
//! The crate covers the simulation core only. Rendering, windowing and
//! input are external collaborators consumed through small traits
//! ([`PrimitiveRenderer`], [`KeyEvent`] delivery, [`Field`]); the
//! rigid-body solver is `rapier2d` behind the [`PhysicsWorld`] wrapper.

pub mod arena;
pub mod body;
pub mod error;
pub mod microcontroller;
pub mod render;
pub mod scene;
pub mod scenes;
pub mod sensors;
pub mod sumobot;
pub mod transform;
pub mod units;
pub mod voltage;
pub mod world;

pub use arena::*;
pub use body::*;
pub use error::*;
pub use microcontroller::*;
pub use render::*;
pub use scene::*;
pub use scenes::*;
pub use sensors::*;
pub use sumobot::*;
pub use transform::*;
pub use units::*;
pub use voltage::*;
pub use world::*;
