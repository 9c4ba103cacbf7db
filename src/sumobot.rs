//! The four-wheel sumobot assembly.
//!
//! One chassis body, four wheel bodies on rotation-locked revolute joints,
//! four line detectors under the corners and five range sensors around the
//! front half. Every sensor and motor is reachable through a stable set of
//! named voltage lines, so the same robot can be driven by a keyboard
//! controller or wired pin-by-pin into a [`Microcontroller`] bridge.
//!
//! [`Microcontroller`]: crate::Microcontroller

use std::collections::HashMap;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::body::{Body, BodySpec};
use crate::error::Error;
use crate::render::{Color, QuadComponent};
use crate::scene::{Controller, KeyAction, KeyCode, KeyEvent, SceneObject, StepContext};
use crate::sensors::{LineDetector, RangeSensor, RangeSensorSpec};
use crate::transform::QuadTransform;
use crate::voltage::{VoltageCell, VoltageLine};
use crate::world::PhysicsWorld;

/// Share of the total mass carried by the chassis; the rest is split
/// evenly over the four wheels.
const CHASSIS_MASS_SHARE: f32 = 0.8;

/// Robot dimensions and drive constants, real-world units.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SumobotSpec {
    /// Chassis length (forward axis), meters.
    pub length: f32,
    /// Chassis width, meters.
    pub width: f32,
    /// Total mass, kilograms.
    pub mass: f32,
    /// Drive force a wheel applies per volt of motor command.
    pub motor_force_per_volt: f32,
}

impl Default for SumobotSpec {
    /// A 10 cm, 500 g mini-sumo class robot.
    fn default() -> Self {
        Self {
            length: 0.1,
            width: 0.1,
            mass: 0.5,
            motor_force_per_volt: 0.25,
        }
    }
}

/// The robot's named voltage lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SumobotLine {
    FrontLeftMotor,
    BackLeftMotor,
    FrontRightMotor,
    BackRightMotor,
    LeftRangeSensor,
    FrontLeftRangeSensor,
    FrontRangeSensor,
    FrontRightRangeSensor,
    RightRangeSensor,
    FrontLeftLineDetector,
    BackLeftLineDetector,
    FrontRightLineDetector,
    BackRightLineDetector,
}

impl SumobotLine {
    /// Every line, motors first.
    pub const ALL: [SumobotLine; 13] = [
        SumobotLine::FrontLeftMotor,
        SumobotLine::BackLeftMotor,
        SumobotLine::FrontRightMotor,
        SumobotLine::BackRightMotor,
        SumobotLine::LeftRangeSensor,
        SumobotLine::FrontLeftRangeSensor,
        SumobotLine::FrontRangeSensor,
        SumobotLine::FrontRightRangeSensor,
        SumobotLine::RightRangeSensor,
        SumobotLine::FrontLeftLineDetector,
        SumobotLine::BackLeftLineDetector,
        SumobotLine::FrontRightLineDetector,
        SumobotLine::BackRightLineDetector,
    ];
}

/// The stable name→line mapping of an assembled robot.
///
/// Lines are cheap clones of the robot's cells, so the map stays valid
/// after the robot's scene object has been moved into a scene.
#[derive(Clone)]
pub struct SumobotLines {
    map: HashMap<SumobotLine, VoltageLine>,
}

impl SumobotLines {
    /// The wiring handle for `line`.
    pub fn voltage_line(&self, line: SumobotLine) -> VoltageLine {
        self.map[&line].clone()
    }
}

/// Drives one wheel: continuous force along the wheel's forward axis
/// proportional to the motor voltage, after cancelling sideways slip the
/// way a tire would.
struct WheelMotor {
    voltage: VoltageCell,
    force_per_volt: f32,
}

impl Controller for WheelMotor {
    fn on_fixed_update(&mut self, ctx: &mut StepContext<'_>, body: Option<&Body>) {
        let Some(body) = body else { return };
        let lateral = body.lateral_velocity(ctx.world);
        let mass = body.mass(ctx.world);
        body.apply_impulse(ctx.world, -lateral * mass);
        let forward = body.forward_normal(ctx.world);
        body.set_force(ctx.world, forward, self.voltage.get() * self.force_per_volt);
    }
}

/// A fully assembled four-wheel sumobot.
pub struct Sumobot {
    object: SceneObject,
    lines: SumobotLines,
}

impl Sumobot {
    /// Assembles a robot at `start_pos_m` (meters), facing +Y.
    pub fn build(
        world: &mut PhysicsWorld,
        spec: &SumobotSpec,
        start_pos_m: Vec2,
    ) -> Result<Self, Error> {
        let wheel_mass = spec.mass * (1.0 - CHASSIS_MASS_SHARE) / 4.0;
        let wheel_size = Vec2::new(spec.width * 0.15, spec.length * 0.25);

        let mut chassis_transform = QuadTransform {
            position: Vec3::new(start_pos_m.x, start_pos_m.y, 1.0),
            size: Vec2::new(spec.width, spec.length),
            rotation: 0.0,
        };
        let chassis = Body::from_quad(
            world,
            &mut chassis_transform,
            BodySpec::dynamic(spec.mass * CHASSIS_MASS_SHARE),
        )?;

        let wheel_x = (spec.width + wheel_size.x) / 2.0;
        let wheel_y = spec.length / 4.0;
        let wheel_offsets = [
            (SumobotLine::FrontLeftMotor, Vec2::new(-wheel_x, wheel_y)),
            (SumobotLine::BackLeftMotor, Vec2::new(-wheel_x, -wheel_y)),
            (SumobotLine::FrontRightMotor, Vec2::new(wheel_x, wheel_y)),
            (SumobotLine::BackRightMotor, Vec2::new(wheel_x, -wheel_y)),
        ];
        let mut map = HashMap::new();
        let mut wheels = Vec::new();
        for (line, offset) in wheel_offsets {
            let mut transform = QuadTransform {
                position: Vec3::new(start_pos_m.x + offset.x, start_pos_m.y + offset.y, 0.9),
                size: wheel_size,
                rotation: 0.0,
            };
            let body = Body::from_quad(world, &mut transform, BodySpec::dynamic(wheel_mass))?;
            chassis.attach_with_revolute_joint(world, offset, &body);
            let voltage = VoltageCell::new(0.0);
            map.insert(line, VoltageLine::output(voltage.clone()));
            wheels.push((transform, body, voltage));
        }

        let detector_x = spec.width / 3.0;
        let detector_y = spec.length / 3.0;
        let detector_offsets = [
            (
                SumobotLine::FrontLeftLineDetector,
                Vec2::new(-detector_x, detector_y),
            ),
            (
                SumobotLine::BackLeftLineDetector,
                Vec2::new(-detector_x, -detector_y),
            ),
            (
                SumobotLine::FrontRightLineDetector,
                Vec2::new(detector_x, detector_y),
            ),
            (
                SumobotLine::BackRightLineDetector,
                Vec2::new(detector_x, -detector_y),
            ),
        ];
        let mut detector_objects = Vec::new();
        for (line, offset) in detector_offsets {
            let (object, detector) = LineDetector::attach(world, &chassis, offset, false)?;
            map.insert(line, detector.voltage_line());
            detector_objects.push(object);
        }

        let range_mounts = [
            (
                SumobotLine::LeftRangeSensor,
                Vec2::new(-spec.width / 2.0, 0.0),
                FRAC_PI_2,
            ),
            (
                SumobotLine::FrontLeftRangeSensor,
                Vec2::new(-spec.width / 2.0, spec.length / 2.0),
                FRAC_PI_4,
            ),
            (
                SumobotLine::FrontRangeSensor,
                Vec2::new(0.0, spec.length / 2.0),
                0.0,
            ),
            (
                SumobotLine::FrontRightRangeSensor,
                Vec2::new(spec.width / 2.0, spec.length / 2.0),
                -FRAC_PI_4,
            ),
            (
                SumobotLine::RightRangeSensor,
                Vec2::new(spec.width / 2.0, 0.0),
                -FRAC_PI_2,
            ),
        ];
        let mut range_objects = Vec::new();
        {
            let mut exclude: Vec<&Body> = vec![&chassis];
            exclude.extend(wheels.iter().map(|(_, body, _)| body));
            for (line, offset, heading) in range_mounts {
                let (object, sensor) = RangeSensor::attach(
                    world,
                    &chassis,
                    offset,
                    heading,
                    RangeSensorSpec::default(),
                    &exclude,
                )?;
                map.insert(line, sensor.voltage_line());
                range_objects.push(object);
            }
        }

        let mut root = SceneObject::new()
            .with_transform(chassis_transform)
            .with_body(chassis)
            .with_renderable(QuadComponent::new(Color::new(0.26, 0.26, 0.26, 1.0)));
        for (transform, body, voltage) in wheels {
            root.add_child(
                SceneObject::new()
                    .with_transform(transform)
                    .with_body(body)
                    .with_renderable(QuadComponent::new(Color::new(0.05, 0.05, 0.05, 1.0)))
                    .with_controller(WheelMotor {
                        voltage,
                        force_per_volt: spec.motor_force_per_volt,
                    }),
            );
        }
        for object in detector_objects {
            root.add_child(object);
        }
        for object in range_objects {
            root.add_child(object);
        }

        debug!(mass_kg = spec.mass, "assembled four-wheel sumobot");
        Ok(Self {
            object: root,
            lines: SumobotLines { map },
        })
    }

    /// The robot's line mapping.
    pub fn lines(&self) -> &SumobotLines {
        &self.lines
    }

    /// Shorthand for [`SumobotLines::voltage_line`].
    pub fn voltage_line(&self, line: SumobotLine) -> VoltageLine {
        self.lines.voltage_line(line)
    }

    /// Splits the assembly into its scene object and the line mapping.
    pub fn into_parts(self) -> (SceneObject, SumobotLines) {
        (self.object, self.lines)
    }
}

/// What the arrow keys ask the robot to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Drive {
    Stop,
    Forward,
    Backward,
    Left,
    Right,
}

/// Arrow-key drive: tank steering over the four motor lines.
pub struct SumobotKeyboardController {
    left_motors: [VoltageCell; 2],
    right_motors: [VoltageCell; 2],
    max_voltage: f32,
}

impl SumobotKeyboardController {
    /// A controller over the motor lines of `lines`, driving at
    /// `max_voltage` volts.
    pub fn new(lines: &SumobotLines, max_voltage: f32) -> Self {
        Self {
            left_motors: [
                lines.voltage_line(SumobotLine::FrontLeftMotor).cell,
                lines.voltage_line(SumobotLine::BackLeftMotor).cell,
            ],
            right_motors: [
                lines.voltage_line(SumobotLine::FrontRightMotor).cell,
                lines.voltage_line(SumobotLine::BackRightMotor).cell,
            ],
            max_voltage,
        }
    }

    fn set_drive(&self, drive: Drive) {
        let v = self.max_voltage;
        let (left, right) = match drive {
            Drive::Stop => (0.0, 0.0),
            Drive::Forward => (v, v),
            Drive::Backward => (-v, -v),
            Drive::Left => (-v, v),
            Drive::Right => (v, -v),
        };
        for cell in &self.left_motors {
            cell.set(left);
        }
        for cell in &self.right_motors {
            cell.set(right);
        }
    }
}

impl Controller for SumobotKeyboardController {
    fn on_key_event(&mut self, event: &KeyEvent) {
        let drive = match event.code {
            KeyCode::Up => Drive::Forward,
            KeyCode::Down => Drive::Backward,
            KeyCode::Left => Drive::Left,
            KeyCode::Right => Drive::Right,
            _ => return,
        };
        match event.action {
            KeyAction::Press => self.set_drive(drive),
            KeyAction::Release => self.set_drive(Drive::Stop),
        }
    }
}
