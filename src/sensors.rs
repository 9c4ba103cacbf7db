//! Simulated analog sensors: line detectors and range sensors.
//!
//! Sensors are stateless samplers. Each fixed step they derive a fresh
//! voltage from the current world state and write it into their output
//! cell; nothing is smoothed or carried over between steps. A sensor is
//! assembled as a small [`SceneObject`] (a non-colliding sensor body
//! welded to a chassis, plus the sampling controller) meant to be mounted
//! as a child of the robot that carries it.

use glam::{Vec2, Vec3};
use rapier2d::prelude::RigidBodyHandle;
use serde::{Deserialize, Serialize};

use crate::body::{Body, BodySpec};
use crate::error::Error;
use crate::render::{Color, QuadComponent};
use crate::scene::{Controller, SceneObject, StepContext};
use crate::transform::QuadTransform;
use crate::units::{scale_length, unscale_length, unscale_position};
use crate::voltage::{VoltageCell, VoltageLine};
use crate::world::PhysicsWorld;

/// Surface-marking collaborator sampled by line detectors.
///
/// Positions are unscaled world meters; implementations never see engine
/// units.
pub trait Field {
    /// Reflectance at `world_pos_m`: 0.0 over unmarked ground, 1.0 over a
    /// marked line. Continuous values are allowed for graded markings.
    fn reflectance(&self, world_pos_m: Vec2) -> f32;
}

/// Side length of the square sensor footprint, meters.
const SENSOR_SIZE_M: f32 = 0.004;

/// Mass of a sensor body, kilograms. Small enough not to disturb the
/// robot, positive so the body stays dynamic.
const SENSOR_MASS_KG: f32 = 0.005;

fn sensor_object(
    world: &mut PhysicsWorld,
    chassis: &Body,
    offset_m: Vec2,
    heading_rad: f32,
) -> Result<(SceneObject, Body), Error> {
    let chassis_pos_m = unscale_position(chassis.position(world));
    let chassis_angle = chassis.angle(world);
    let world_offset = Vec2::from_angle(chassis_angle).rotate(offset_m);
    let mut transform = QuadTransform {
        position: Vec3::new(
            chassis_pos_m.x + world_offset.x,
            chassis_pos_m.y + world_offset.y,
            0.0,
        ),
        size: Vec2::splat(SENSOR_SIZE_M),
        rotation: chassis_angle + heading_rad,
    };
    let body = Body::from_quad(
        world,
        &mut transform,
        BodySpec::dynamic(SENSOR_MASS_KG).sensor_only(),
    )?;
    chassis.attach_with_weld_joint(world, offset_m, &body);
    let object = SceneObject::new().with_transform(transform);
    Ok((object, body))
}

/// Samples the scene field under the sensor and writes 0/1 reflectance.
struct LineDetectorSampler {
    voltage: VoltageCell,
}

impl Controller for LineDetectorSampler {
    fn on_fixed_update(&mut self, ctx: &mut StepContext<'_>, body: Option<&Body>) {
        let Some(body) = body else { return };
        let value = match ctx.field {
            Some(field) => field.reflectance(unscale_position(body.position(ctx.world))),
            None => 0.0,
        };
        self.voltage.set(value);
    }
}

/// A downward-looking reflectance sensor.
///
/// Owns the voltage cell its measurements land in; wiring handles are
/// cheap clones of it.
pub struct LineDetector {
    voltage: VoltageCell,
}

impl LineDetector {
    /// Assembles a line detector welded to `chassis` at `offset_m`
    /// (meters, relative to the chassis center).
    ///
    /// With `debug_draw` the sensor footprint is rendered as a magenta
    /// quad overlay. Returns the scene object to mount as a child of the
    /// chassis object, plus the wiring handle.
    pub fn attach(
        world: &mut PhysicsWorld,
        chassis: &Body,
        offset_m: Vec2,
        debug_draw: bool,
    ) -> Result<(SceneObject, LineDetector), Error> {
        let voltage = VoltageCell::new(0.0);
        let (mut object, body) = sensor_object(world, chassis, offset_m, 0.0)?;
        object = object.with_body(body).with_controller(LineDetectorSampler {
            voltage: voltage.clone(),
        });
        if debug_draw {
            object = object.with_renderable(QuadComponent::new(Color::new(1.0, 0.0, 1.0, 1.0)));
        }
        Ok((object, LineDetector { voltage }))
    }

    /// The measurement line (an input, from the controller's view).
    pub fn voltage_line(&self) -> VoltageLine {
        VoltageLine::input(self.voltage.clone())
    }
}

/// Measuring range of a range sensor, meters.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct RangeSensorSpec {
    /// Readings below this clamp to it.
    pub min_range: f32,
    /// Readings beyond this (or no obstacle at all) clamp to it.
    pub max_range: f32,
}

impl Default for RangeSensorSpec {
    fn default() -> Self {
        Self {
            min_range: 0.01,
            max_range: 0.8,
        }
    }
}

/// Casts along the sensor's forward normal and writes clamped distance.
struct RangeSensorSampler {
    voltage: VoltageCell,
    spec: RangeSensorSpec,
    exclude: Vec<RigidBodyHandle>,
}

impl Controller for RangeSensorSampler {
    fn on_fixed_update(&mut self, ctx: &mut StepContext<'_>, body: Option<&Body>) {
        let Some(body) = body else { return };
        let origin = body.position(ctx.world);
        let direction = body.forward_normal(ctx.world);
        let distance_m = ctx
            .world
            .cast_ray(
                origin,
                direction,
                scale_length(self.spec.max_range),
                &self.exclude,
            )
            .map_or(self.spec.max_range, |d| {
                unscale_length(d).clamp(self.spec.min_range, self.spec.max_range)
            });
        self.voltage.set(distance_m);
    }
}

/// A forward-looking distance sensor.
pub struct RangeSensor {
    voltage: VoltageCell,
}

impl RangeSensor {
    /// Assembles a range sensor welded to `chassis` at `offset_m`, casting
    /// along `heading_rad` relative to the chassis forward axis.
    ///
    /// Bodies in `exclude` (the owning robot's chassis and wheels) are
    /// invisible to the ray, as are all sensor-only fixtures.
    pub fn attach(
        world: &mut PhysicsWorld,
        chassis: &Body,
        offset_m: Vec2,
        heading_rad: f32,
        spec: RangeSensorSpec,
        exclude: &[&Body],
    ) -> Result<(SceneObject, RangeSensor), Error> {
        let voltage = VoltageCell::new(spec.max_range);
        let (mut object, body) = sensor_object(world, chassis, offset_m, heading_rad)?;
        let mut exclude: Vec<RigidBodyHandle> = exclude.iter().map(|b| b.handle()).collect();
        exclude.push(body.handle());
        object = object.with_body(body).with_controller(RangeSensorSampler {
            voltage: voltage.clone(),
            spec,
            exclude,
        });
        Ok((object, RangeSensor { voltage }))
    }

    /// The measurement line (an input, from the controller's view).
    pub fn voltage_line(&self) -> VoltageLine {
        VoltageLine::input(self.voltage.clone())
    }
}
