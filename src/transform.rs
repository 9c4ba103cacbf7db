//! Renderable transforms shared between physics bodies and renderables.
//!
//! A transform is plain mutable state: a physics [`Body`](crate::Body)
//! writes its engine pose into it after every fixed step (the
//! "translator"), and any number of renderable components read it when
//! drawing. Positions carry a `z` component purely for draw layering; the
//! physics plane is `xy`.
//!
//! Scene authors fill transforms in real-world meters. Body construction
//! converts them to simulation units in place, so after a body is built
//! its transform (and everything rendered from it) lives in scaled units.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// An axis-aligned quad before rotation: center position, size, rotation.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct QuadTransform {
    /// Center of the quad; `z` selects the draw layer.
    pub position: Vec3,
    /// Full extents (width, height).
    pub size: Vec2,
    /// Rotation around the center, radians.
    pub rotation: f32,
}

/// A filled circle.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct CircleTransform {
    /// Center of the circle; `z` selects the draw layer.
    pub position: Vec3,
    pub radius: f32,
}

/// A ring between two radii, e.g. an arena wall.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct HollowCircleTransform {
    /// Center of the ring; `z` selects the draw layer.
    pub position: Vec3,
    pub inner_radius: f32,
    pub outer_radius: f32,
}

/// A line segment with a draw width.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct LineTransform {
    pub start: Vec2,
    pub end: Vec2,
    pub width: f32,
}

/// The transform slot of a scene object.
///
/// At most one physics body writes to a transform; which variants a body
/// accepts is decided at body construction.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub enum Transform {
    Quad(QuadTransform),
    Circle(CircleTransform),
    HollowCircle(HollowCircleTransform),
    Line(LineTransform),
}

impl Transform {
    /// The quad variant, if this is one.
    pub fn as_quad(&self) -> Option<&QuadTransform> {
        match self {
            Self::Quad(quad) => Some(quad),
            _ => None,
        }
    }

    /// Mutable access to the quad variant, if this is one.
    pub fn as_quad_mut(&mut self) -> Option<&mut QuadTransform> {
        match self {
            Self::Quad(quad) => Some(quad),
            _ => None,
        }
    }
}

impl From<QuadTransform> for Transform {
    fn from(t: QuadTransform) -> Self {
        Self::Quad(t)
    }
}

impl From<CircleTransform> for Transform {
    fn from(t: CircleTransform) -> Self {
        Self::Circle(t)
    }
}

impl From<HollowCircleTransform> for Transform {
    fn from(t: HollowCircleTransform) -> Self {
        Self::HollowCircle(t)
    }
}

impl From<LineTransform> for Transform {
    fn from(t: LineTransform) -> Self {
        Self::Line(t)
    }
}
