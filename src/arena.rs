//! The circular sumo arena (dohyo).
//!
//! A static hollow-ring body for the border plus two overlapping circle
//! renderables (white border disc over a dark interior disc). The border
//! band doubles as the line marking that line detectors see, exposed as an
//! [`ArenaField`].

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::body::{Body, BodySpec};
use crate::error::Error;
use crate::render::{CircleComponent, Color};
use crate::scene::SceneObject;
use crate::sensors::Field;
use crate::transform::{CircleTransform, HollowCircleTransform};
use crate::units::{scale_length, scale_position};
use crate::world::PhysicsWorld;

/// Arena dimensions, real-world meters.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ArenaSpec {
    /// Radius where the border band starts.
    pub inner_radius: f32,
    /// Outer edge of the border band.
    pub outer_radius: f32,
}

impl Default for ArenaSpec {
    /// A regulation mini-sumo ring: 35 cm of floor, 2 cm of border.
    fn default() -> Self {
        Self {
            inner_radius: 0.35,
            outer_radius: 0.37,
        }
    }
}

/// Reflectance model of an arena: 1.0 on the border band, 0.0 elsewhere.
///
/// Cheap to copy; hand it to [`Scene::set_field`](crate::Scene::set_field)
/// so line detectors can see the border.
#[derive(Clone, Copy, Debug)]
pub struct ArenaField {
    center_m: Vec2,
    inner_radius_m: f32,
    outer_radius_m: f32,
}

impl Field for ArenaField {
    fn reflectance(&self, world_pos_m: Vec2) -> f32 {
        let distance = world_pos_m.distance(self.center_m);
        if distance >= self.inner_radius_m && distance <= self.outer_radius_m {
            1.0
        } else {
            0.0
        }
    }
}

/// An assembled arena: the wall body object plus its field model.
pub struct Arena {
    object: SceneObject,
    field: ArenaField,
}

impl Arena {
    /// Builds an arena centered at `center_m` (meters).
    ///
    /// Requires a top-view world; fails with the body layer's typed errors
    /// on a bad gravity model or radius ordering.
    pub fn build(
        world: &mut PhysicsWorld,
        spec: ArenaSpec,
        center_m: Vec2,
    ) -> Result<Self, Error> {
        let mut ring = HollowCircleTransform {
            position: Vec3::new(center_m.x, center_m.y, 0.0),
            inner_radius: spec.inner_radius,
            outer_radius: spec.outer_radius,
        };
        // The border is a marking, not an obstacle: sensor-only fixtures.
        let body = Body::from_hollow_circle(world, &mut ring, BodySpec::fixed().sensor_only())?;

        let scaled_center = scale_position(center_m);
        let border = CircleTransform {
            position: Vec3::new(scaled_center.x, scaled_center.y, 0.0),
            radius: scale_length(spec.outer_radius),
        };
        let floor = CircleTransform {
            position: Vec3::new(scaled_center.x, scaled_center.y, 0.1),
            radius: scale_length(spec.inner_radius),
        };

        let mut object = SceneObject::new().with_transform(ring).with_body(body);
        object.add_child(
            SceneObject::new()
                .with_transform(border)
                .with_renderable(CircleComponent::new(Color::new(1.0, 1.0, 1.0, 1.0))),
        );
        object.add_child(
            SceneObject::new()
                .with_transform(floor)
                .with_renderable(CircleComponent::new(Color::new(0.1, 0.1, 0.1, 1.0))),
        );

        Ok(Self {
            object,
            field: ArenaField {
                center_m,
                inner_radius_m: spec.inner_radius,
                outer_radius_m: spec.outer_radius,
            },
        })
    }

    /// The reflectance model for wiring into the scene.
    pub fn field(&self) -> ArenaField {
        self.field
    }

    /// The assembled scene object, ready for [`Scene::add_object`](crate::Scene::add_object).
    pub fn into_object(self) -> SceneObject {
        self.object
    }
}
