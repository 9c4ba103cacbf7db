//! The draw-primitive seam between the simulation and a rendering backend.
//!
//! The core never draws anything itself. Renderable components translate
//! their transform into primitive requests against a caller-supplied
//! [`PrimitiveRenderer`], and the backend behind that trait owns every GPU
//! concern.

use glam::Vec4;

use crate::transform::{CircleTransform, LineTransform, QuadTransform, Transform};

/// RGBA color, components in 0..=1.
pub type Color = Vec4;

/// Draw-primitive capability provided by the rendering backend.
pub trait PrimitiveRenderer {
    fn draw_quad(&mut self, transform: &QuadTransform, color: Color);
    fn draw_circle(&mut self, transform: &CircleTransform, color: Color);
    fn draw_line(&mut self, transform: &LineTransform, color: Color);
}

/// A renderable component: turns the owning object's transform into
/// primitive requests.
pub trait Renderable {
    fn draw(&self, transform: &Transform, renderer: &mut dyn PrimitiveRenderer);
}

/// Draws the object's quad transform as a colored quad.
#[derive(Clone, Copy, Debug)]
pub struct QuadComponent {
    pub color: Color,
}

impl QuadComponent {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl Renderable for QuadComponent {
    fn draw(&self, transform: &Transform, renderer: &mut dyn PrimitiveRenderer) {
        if let Transform::Quad(quad) = transform {
            renderer.draw_quad(quad, self.color);
        }
    }
}

/// Draws the object's circle transform as a filled circle.
#[derive(Clone, Copy, Debug)]
pub struct CircleComponent {
    pub color: Color,
}

impl CircleComponent {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl Renderable for CircleComponent {
    fn draw(&self, transform: &Transform, renderer: &mut dyn PrimitiveRenderer) {
        if let Transform::Circle(circle) = transform {
            renderer.draw_circle(circle, self.color);
        }
    }
}

/// Draws the object's line transform, with an enable switch for debug
/// overlays.
#[derive(Clone, Copy, Debug)]
pub struct LineComponent {
    pub color: Color,
    pub enabled: bool,
}

impl LineComponent {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            enabled: true,
        }
    }
}

impl Renderable for LineComponent {
    fn draw(&self, transform: &Transform, renderer: &mut dyn PrimitiveRenderer) {
        if !self.enabled {
            return;
        }
        if let Transform::Line(line) = transform {
            renderer.draw_line(line, self.color);
        }
    }
}
