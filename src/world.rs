//! The physics world: an opaque rigid-body/joint engine behind one wrapper.
//!
//! [`PhysicsWorld`] owns every piece of `rapier2d` state and is the single
//! authoritative simulation clock: one [`PhysicsWorld::step`] advances all
//! bodies by exactly one fixed timestep. Bodies, colliders and joints are
//! created against the world and live in its arenas; dropping the world
//! drops all of them.
//!
//! Nothing outside this module and [`crate::body`] touches rapier types.

use glam::Vec2;
use rapier2d::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::units::{FIXED_STEP_SECONDS, STANDARD_GRAVITY};

/// Gravity model of a world, fixed at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gravity {
    /// Bird's-eye view: no native gravity. Ground friction is synthesized
    /// per body with capped friction joints.
    TopView,
    /// Side view: constant downward gravity.
    SideView,
}

/// Owns the rigid-body simulation context and advances it in fixed steps.
pub struct PhysicsWorld {
    gravity: Gravity,
    gravity_vector: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    pub(crate) bodies: RigidBodySet,
    pub(crate) colliders: ColliderSet,
    pub(crate) impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
}

impl PhysicsWorld {
    /// A new empty world under the given gravity model.
    pub fn new(gravity: Gravity) -> Self {
        let gravity_vector = match gravity {
            Gravity::TopView => vector![0.0, 0.0],
            Gravity::SideView => vector![0.0, -STANDARD_GRAVITY],
        };
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = FIXED_STEP_SECONDS;
        debug!(?gravity, "creating physics world");
        Self {
            gravity,
            gravity_vector,
            integration_parameters,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// The gravity model this world was built with.
    pub fn gravity(&self) -> Gravity {
        self.gravity
    }

    /// Seconds simulated by one call to [`step`](Self::step).
    pub fn step_seconds(&self) -> f32 {
        self.integration_parameters.dt
    }

    /// Advances every body by one fixed timestep.
    pub fn step(&mut self) {
        self.pipeline.step(
            &self.gravity_vector,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Registers a rigid body and returns its handle.
    pub(crate) fn create_body(&mut self, body: RigidBody) -> RigidBodyHandle {
        self.bodies.insert(body)
    }

    /// Attaches a collider to an existing body.
    pub(crate) fn create_collider(
        &mut self,
        collider: Collider,
        parent: RigidBodyHandle,
    ) -> ColliderHandle {
        self.colliders
            .insert_with_parent(collider, parent, &mut self.bodies)
    }

    /// Joins two bodies and returns the joint handle.
    pub(crate) fn create_joint(
        &mut self,
        first: RigidBodyHandle,
        second: RigidBodyHandle,
        joint: impl Into<GenericJoint>,
    ) -> ImpulseJointHandle {
        self.impulse_joints.insert(first, second, joint, true)
    }

    /// Removes a joint. Must happen before either of its bodies goes away
    /// when tearing down piecewise.
    pub(crate) fn destroy_joint(&mut self, joint: ImpulseJointHandle) {
        self.impulse_joints.remove(joint, true);
    }

    /// Removes a body together with its colliders and any joints still
    /// referencing it.
    pub(crate) fn destroy_body(&mut self, body: RigidBodyHandle) {
        self.bodies.remove(
            body,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    pub(crate) fn body(&self, handle: RigidBodyHandle) -> &RigidBody {
        &self.bodies[handle]
    }

    pub(crate) fn body_mut(&mut self, handle: RigidBodyHandle) -> &mut RigidBody {
        &mut self.bodies[handle]
    }

    pub(crate) fn collider(&self, handle: ColliderHandle) -> &Collider {
        &self.colliders[handle]
    }

    /// Distance (sim units) to the closest non-sensor collider hit by a ray,
    /// ignoring colliders attached to any body in `exclude`.
    ///
    /// Uses the query pipeline refreshed by the latest [`step`](Self::step);
    /// colliders added since then are not visible yet.
    pub(crate) fn cast_ray(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        exclude: &[RigidBodyHandle],
    ) -> Option<f32> {
        let allow = |_handle: ColliderHandle, collider: &Collider| {
            collider.parent().is_none_or(|p| !exclude.contains(&p))
        };
        let filter = QueryFilter::default().exclude_sensors().predicate(&allow);
        let ray = Ray::new(
            point![origin.x, origin.y],
            vector![direction.x, direction.y],
        );
        self.query_pipeline
            .cast_ray(&self.bodies, &self.colliders, &ray, max_distance, true, filter)
            .map(|(_, distance)| distance)
    }
}
