//! The physics component: couples an engine rigid body to a transform.
//!
//! A [`Body`] owns one primary rigid body in a [`PhysicsWorld`] (plus, for
//! dynamic bodies in top-view worlds, a synthetic friction rig) and knows
//! how to copy the engine pose back into the renderable transform after
//! each fixed step. Construction consumes real-world units and scales the
//! given transform in place; see [`crate::units`].
//!
//! Mass is never set on the engine directly. A body is given a real-world
//! mass and its collider density is derived as scaled mass over scaled
//! area, so the engine's own mass computation lands on the requested value.

use bevy_math::prelude::Measured2d;
use bevy_math::primitives::Rectangle;
use glam::Vec2;
use rapier2d::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Error;
use crate::transform::{HollowCircleTransform, QuadTransform, Transform};
use crate::units::{FRICTION_COEFFICIENT, normal_force, scale_length, scale_mass, scale_position};
use crate::world::{Gravity, PhysicsWorld};

/// Angular slices approximating a hollow ring.
const RING_SEGMENTS: usize = 180;

/// What a body should be, in real-world terms.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct BodySpec {
    /// Dynamic bodies move under forces; static ones never move.
    pub dynamic: bool,
    /// Whether the shape collides. Non-colliding shapes still detect
    /// overlap (sensor-only fixtures).
    pub collision: bool,
    /// Real-world mass, kilograms. Must be positive for dynamic bodies;
    /// ignored for static ones.
    pub mass: f32,
}

impl BodySpec {
    /// A dynamic colliding body of the given mass.
    pub fn dynamic(mass_kg: f32) -> Self {
        Self {
            dynamic: true,
            collision: true,
            mass: mass_kg,
        }
    }

    /// A static colliding body.
    pub fn fixed() -> Self {
        Self {
            dynamic: false,
            collision: true,
            mass: 0.0,
        }
    }

    /// Turns collision response off, leaving a sensor-only fixture.
    pub fn sensor_only(mut self) -> Self {
        self.collision = false;
        self
    }
}

struct FrictionRig {
    anchor: RigidBodyHandle,
    joint: ImpulseJointHandle,
}

enum Translator {
    /// Copy position and angle into a quad transform every fixed step.
    Quad,
    /// Static shapes never move; nothing to copy.
    None,
}

/// A physics component bound to one transform.
pub struct Body {
    handle: RigidBodyHandle,
    friction: Option<FrictionRig>,
    translator: Translator,
}

impl Body {
    /// Builds a body for `transform` according to `spec`.
    ///
    /// Dispatches on the transform variant: quads become box bodies,
    /// hollow circles become static ring walls. The transform is scaled to
    /// simulation units in place.
    pub fn new(
        world: &mut PhysicsWorld,
        transform: &mut Transform,
        spec: BodySpec,
    ) -> Result<Self, Error> {
        match transform {
            Transform::Quad(quad) => Self::from_quad(world, quad, spec),
            Transform::HollowCircle(ring) => Self::from_hollow_circle(world, ring, spec),
            Transform::Circle(_) | Transform::Line(_) => Err(Error::DegenerateGeometry(
                "no physics shape for this transform variant",
            )),
        }
    }

    /// Box body from a quad transform. `transform.position` is the center.
    pub fn from_quad(
        world: &mut PhysicsWorld,
        transform: &mut QuadTransform,
        spec: BodySpec,
    ) -> Result<Self, Error> {
        if transform.size.x <= 0.0 || transform.size.y <= 0.0 {
            return Err(Error::ZeroArea {
                width: transform.size.x,
                height: transform.size.y,
            });
        }
        if spec.dynamic && spec.mass <= 0.0 {
            return Err(Error::NonPositiveMass(spec.mass));
        }

        transform.size.x = scale_length(transform.size.x);
        transform.size.y = scale_length(transform.size.y);
        let scaled_pos = scale_position(Vec2::new(transform.position.x, transform.position.y));
        transform.position.x = scaled_pos.x;
        transform.position.y = scaled_pos.y;

        let builder = if spec.dynamic {
            RigidBodyBuilder::dynamic()
        } else {
            RigidBodyBuilder::fixed()
        };
        let body = builder
            .translation(vector![transform.position.x, transform.position.y])
            .rotation(transform.rotation)
            .build();
        let handle = world.create_body(body);

        let mut collider = ColliderBuilder::cuboid(transform.size.x / 2.0, transform.size.y / 2.0)
            .sensor(!spec.collision);
        if spec.dynamic {
            let area = Rectangle::new(transform.size.x, transform.size.y).area();
            collider = collider.density(scale_mass(spec.mass) / area);
        }
        world.create_collider(collider.build(), handle);

        let friction = (spec.dynamic && world.gravity() == Gravity::TopView)
            .then(|| add_top_view_friction(world, handle, normal_force(spec.mass)));

        debug!(dynamic = spec.dynamic, mass_kg = spec.mass, "created box body");
        Ok(Self {
            handle,
            friction,
            translator: Translator::Quad,
        })
    }

    /// Static ring wall from a hollow-circle transform.
    ///
    /// Only valid under [`Gravity::TopView`] and only as a static body.
    /// The ring is approximated by a fan of [`RING_SEGMENTS`] trapezoidal
    /// colliders spanning the band between the two radii.
    pub fn from_hollow_circle(
        world: &mut PhysicsWorld,
        transform: &mut HollowCircleTransform,
        spec: BodySpec,
    ) -> Result<Self, Error> {
        if spec.dynamic {
            return Err(Error::DynamicRing);
        }
        if world.gravity() != Gravity::TopView {
            return Err(Error::UnsupportedGravity {
                what: "hollow-ring body",
                required: Gravity::TopView,
                actual: world.gravity(),
            });
        }
        if transform.outer_radius <= transform.inner_radius {
            return Err(Error::InvalidRadii {
                inner: transform.inner_radius,
                outer: transform.outer_radius,
            });
        }

        transform.inner_radius = scale_length(transform.inner_radius);
        transform.outer_radius = scale_length(transform.outer_radius);
        let scaled_pos = scale_position(Vec2::new(transform.position.x, transform.position.y));
        transform.position.x = scaled_pos.x;
        transform.position.y = scaled_pos.y;

        let body = RigidBodyBuilder::fixed()
            .translation(vector![transform.position.x, transform.position.y])
            .build();
        let handle = world.create_body(body);

        let angle_per_segment = std::f32::consts::TAU / RING_SEGMENTS as f32;
        for segment in 0..RING_SEGMENTS {
            let near = segment as f32 * angle_per_segment;
            let far = near + angle_per_segment;
            let points = [
                point![
                    transform.inner_radius * near.cos(),
                    transform.inner_radius * near.sin()
                ],
                point![
                    transform.outer_radius * near.cos(),
                    transform.outer_radius * near.sin()
                ],
                point![
                    transform.outer_radius * far.cos(),
                    transform.outer_radius * far.sin()
                ],
                point![
                    transform.inner_radius * far.cos(),
                    transform.inner_radius * far.sin()
                ],
            ];
            let collider = ColliderBuilder::convex_hull(&points)
                .ok_or(Error::DegenerateGeometry("ring slice is not convex"))?
                .sensor(!spec.collision);
            world.create_collider(collider.build(), handle);
        }

        debug!(
            inner = transform.inner_radius,
            outer = transform.outer_radius,
            "created hollow-ring body"
        );
        Ok(Self {
            handle,
            friction: None,
            translator: Translator::None,
        })
    }

    /// Center-of-mass position, simulation units.
    pub fn position(&self, world: &PhysicsWorld) -> Vec2 {
        let translation = world.body(self.handle).translation();
        Vec2::new(translation.x, translation.y)
    }

    /// Rotation angle, radians.
    pub fn angle(&self, world: &PhysicsWorld) -> f32 {
        world.body(self.handle).rotation().angle()
    }

    /// The body's local +Y axis in world space.
    pub fn forward_normal(&self, world: &PhysicsWorld) -> Vec2 {
        let forward = world.body(self.handle).position().rotation * vector![0.0, 1.0];
        Vec2::new(forward.x, forward.y)
    }

    /// Velocity projected onto the forward normal.
    pub fn forward_speed(&self, world: &PhysicsWorld) -> f32 {
        let body = world.body(self.handle);
        let forward = body.position().rotation * vector![0.0, 1.0];
        forward.dot(body.linvel())
    }

    /// The sideways component of the velocity (projection onto local +X).
    pub fn lateral_velocity(&self, world: &PhysicsWorld) -> Vec2 {
        let body = world.body(self.handle);
        let right = body.position().rotation * vector![1.0, 0.0];
        let lateral = right * right.dot(body.linvel());
        Vec2::new(lateral.x, lateral.y)
    }

    /// Mass as computed by the engine from collider density.
    pub fn mass(&self, world: &PhysicsWorld) -> f32 {
        world.body(self.handle).mass()
    }

    /// Number of colliders attached to the primary body.
    pub fn collider_count(&self, world: &PhysicsWorld) -> usize {
        world.body(self.handle).colliders().len()
    }

    /// Density of the primary collider.
    pub fn density(&self, world: &PhysicsWorld) -> f32 {
        let collider = world.body(self.handle).colliders()[0];
        world.collider(collider).density()
    }

    /// The continuous force currently applied to the body.
    pub fn applied_force(&self, world: &PhysicsWorld) -> Vec2 {
        let force = world.body(self.handle).user_force();
        Vec2::new(force.x, force.y)
    }

    /// Applies a continuous force at the center of mass, replacing any
    /// force set earlier. Takes effect on the next fixed step.
    pub fn set_force(&self, world: &mut PhysicsWorld, direction: Vec2, magnitude: f32) {
        let body = world.body_mut(self.handle);
        body.reset_forces(true);
        body.add_force(vector![direction.x, direction.y] * magnitude, true);
    }

    /// Applies an instantaneous impulse at the center of mass.
    pub fn apply_impulse(&self, world: &mut PhysicsWorld, impulse: Vec2) {
        world
            .body_mut(self.handle)
            .apply_impulse(vector![impulse.x, impulse.y], true);
    }

    /// Couples `other` to this body with a rotation-locked revolute joint.
    ///
    /// `local_anchor_m` is the attach point on this body in unscaled
    /// meters, relative to its center; `other` is attached at its own
    /// center. The joint is freed with whichever body goes away first.
    pub fn attach_with_revolute_joint(
        &self,
        world: &mut PhysicsWorld,
        local_anchor_m: Vec2,
        other: &Body,
    ) {
        let anchor = scale_position(local_anchor_m);
        let joint = RevoluteJointBuilder::new()
            .local_anchor1(point![anchor.x, anchor.y])
            .local_anchor2(point![0.0, 0.0])
            .limits([0.0, 0.0])
            .contacts_enabled(false);
        world.create_joint(self.handle, other.handle, joint);
    }

    /// Rigidly welds `other` to this body at `local_anchor_m` (unscaled
    /// meters, relative to this body's center), preserving the relative
    /// rotation the two bodies have right now.
    pub fn attach_with_weld_joint(
        &self,
        world: &mut PhysicsWorld,
        local_anchor_m: Vec2,
        other: &Body,
    ) {
        let anchor = scale_position(local_anchor_m);
        let reference_angle = other.angle(world) - self.angle(world);
        let joint = FixedJointBuilder::new()
            .local_frame1(Isometry::new(vector![anchor.x, anchor.y], reference_angle))
            .local_frame2(Isometry::identity())
            .contacts_enabled(false);
        world.create_joint(self.handle, other.handle, joint);
    }

    /// Copies the engine pose back into `transform`. Static bodies have no
    /// translator and skip this.
    pub fn on_fixed_update(&self, world: &PhysicsWorld, transform: &mut Transform) {
        match self.translator {
            Translator::Quad => {
                if let Some(quad) = transform.as_quad_mut() {
                    let body = world.body(self.handle);
                    let translation = body.translation();
                    quad.position.x = translation.x;
                    quad.position.y = translation.y;
                    quad.rotation = body.rotation().angle();
                }
            }
            Translator::None => {}
        }
    }

    /// Removes the body and everything it owns from the world.
    ///
    /// Owned joints go first, then the friction anchor, then the primary
    /// body; joints attached by other bodies are released by the engine
    /// when the primary body goes.
    pub fn destroy(self, world: &mut PhysicsWorld) {
        if let Some(rig) = self.friction {
            world.destroy_joint(rig.joint);
            world.destroy_body(rig.anchor);
        }
        world.destroy_body(self.handle);
    }

    pub(crate) fn handle(&self) -> RigidBodyHandle {
        self.handle
    }
}

/// Ground friction for gravity-less top-view worlds.
///
/// A zero-geometry anchor body is joined to the moving body with velocity
/// motors that drag all three degrees of freedom toward rest, with force
/// and torque capped at `normal_force * FRICTION_COEFFICIENT` the way a
/// surface-friction joint would be.
fn add_top_view_friction(
    world: &mut PhysicsWorld,
    body: RigidBodyHandle,
    normal_force: f32,
) -> FrictionRig {
    let max_force = normal_force * FRICTION_COEFFICIENT;
    let anchor = world.create_body(RigidBodyBuilder::fixed().build());
    let joint = GenericJointBuilder::new(JointAxesMask::empty())
        .motor_model(JointAxis::LinX, MotorModel::ForceBased)
        .motor_model(JointAxis::LinY, MotorModel::ForceBased)
        .motor_model(JointAxis::AngX, MotorModel::ForceBased)
        .motor_velocity(JointAxis::LinX, 0.0, 1.0)
        .motor_velocity(JointAxis::LinY, 0.0, 1.0)
        .motor_velocity(JointAxis::AngX, 0.0, 1.0)
        .motor_max_force(JointAxis::LinX, max_force)
        .motor_max_force(JointAxis::LinY, max_force)
        .motor_max_force(JointAxis::AngX, max_force)
        .build();
    let joint = world.create_joint(anchor, body, joint);
    FrictionRig { anchor, joint }
}
