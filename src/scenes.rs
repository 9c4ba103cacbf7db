//! The scene catalogue.
//!
//! Prebuilt scenes wiring the crate's pieces together the way the
//! application shell would. Currently one scene: the four-wheel sumobot
//! test bout.

use glam::{Vec2, Vec3};

use crate::arena::{Arena, ArenaSpec};
use crate::body::{Body, BodySpec};
use crate::error::Error;
use crate::microcontroller::{ControlProgram, Microcontroller, Pin};
use crate::render::{Color, QuadComponent};
use crate::scene::Scene;
use crate::sumobot::{Sumobot, SumobotKeyboardController, SumobotLine, SumobotLines, SumobotSpec};
use crate::transform::{QuadTransform, Transform};
use crate::voltage::LineDirection;
use crate::world::{Gravity, PhysicsWorld};

/// The assembled test bout, with both robots' line mappings kept around
/// for inspection.
pub struct SumobotTestScene {
    pub scene: Scene,
    /// Lines of the keyboard-driven robot.
    pub keyboard_bot: SumobotLines,
    /// Lines of the microcontroller-driven robot.
    pub bridged_bot: SumobotLines,
}

/// A regulation arena with a pushable box, a keyboard-driven sumobot and a
/// second sumobot driven by `program` through a fully wired
/// [`Microcontroller`] bridge.
pub fn sumobot_test_scene(
    program: impl ControlProgram + 'static,
) -> Result<SumobotTestScene, Error> {
    let mut world = PhysicsWorld::new(Gravity::TopView);

    let arena = Arena::build(&mut world, ArenaSpec::default(), Vec2::ZERO)?;
    let field = arena.field();

    let mut box_obstacle = Transform::Quad(QuadTransform {
        position: Vec3::new(0.2, 0.2, 0.5),
        size: Vec2::splat(0.07),
        rotation: 0.0,
    });
    let box_body = Body::new(&mut world, &mut box_obstacle, BodySpec::dynamic(1.0))?;

    let keyboard_bot = Sumobot::build(&mut world, &SumobotSpec::default(), Vec2::new(-0.25, -0.25))?;
    let bridged_bot = Sumobot::build(&mut world, &SumobotSpec::default(), Vec2::ZERO)?;

    let mut bridge = Microcontroller::new(program);
    let wiring = [
        (Pin::A0, LineDirection::Output, SumobotLine::FrontLeftMotor),
        (Pin::A1, LineDirection::Output, SumobotLine::BackLeftMotor),
        (Pin::A2, LineDirection::Output, SumobotLine::FrontRightMotor),
        (Pin::A3, LineDirection::Output, SumobotLine::BackRightMotor),
        (Pin::A4, LineDirection::Input, SumobotLine::LeftRangeSensor),
        (
            Pin::A5,
            LineDirection::Input,
            SumobotLine::FrontLeftRangeSensor,
        ),
        (Pin::A6, LineDirection::Input, SumobotLine::FrontRangeSensor),
        (
            Pin::A7,
            LineDirection::Input,
            SumobotLine::FrontRightRangeSensor,
        ),
        (Pin::B0, LineDirection::Input, SumobotLine::RightRangeSensor),
        (
            Pin::B1,
            LineDirection::Input,
            SumobotLine::FrontLeftLineDetector,
        ),
        (
            Pin::B2,
            LineDirection::Input,
            SumobotLine::BackLeftLineDetector,
        ),
        (
            Pin::B3,
            LineDirection::Input,
            SumobotLine::FrontRightLineDetector,
        ),
        (
            Pin::B4,
            LineDirection::Input,
            SumobotLine::BackRightLineDetector,
        ),
    ];
    for (pin, direction, line) in wiring {
        bridge.wire(pin, direction, bridged_bot.voltage_line(line))?;
    }
    bridge.start();

    let mut scene = Scene::with_physics(world);
    scene.set_field(field);
    scene.add_object(arena.into_object());
    scene.create_object(
        Some(box_obstacle),
        Some(Box::new(QuadComponent::new(Color::new(0.5, 0.5, 0.5, 1.0)))),
        Some(box_body),
        None,
    );

    let (keyboard_object, keyboard_lines) = keyboard_bot.into_parts();
    scene.add_object(keyboard_object);
    scene.create_object(
        None,
        None,
        None,
        Some(Box::new(SumobotKeyboardController::new(
            &keyboard_lines,
            4.0,
        ))),
    );

    let (bridged_object, bridged_lines) = bridged_bot.into_parts();
    scene.add_object(bridged_object);
    scene.create_object(None, None, None, Some(Box::new(bridge)));

    Ok(SumobotTestScene {
        scene,
        keyboard_bot: keyboard_lines,
        bridged_bot: bridged_lines,
    })
}
