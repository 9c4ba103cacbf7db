// tests/microcontroller_bridge.rs
use approx::assert_relative_eq;
use glam::{Vec2, Vec3};
use sumosim::{
    Body, BodySpec, Error, Field, Gravity, LineDetector, LineDirection, Microcontroller,
    PhysicsWorld, Pin, Pins, QuadTransform, Scene, SceneObject, Sumobot, SumobotLine,
    SumobotSpec, VoltageCell, VoltageLine,
};

fn idle_program(_pins: &mut Pins<'_>) {}

#[test]
fn wiring_validates_direction_at_assembly_time() {
    let mut bridge = Microcontroller::new(idle_program);

    // A sensor line cannot drive an output slot.
    let sensor_line = VoltageLine::input(VoltageCell::new(0.0));
    let result = bridge.wire(Pin::A0, LineDirection::Output, sensor_line);
    assert!(matches!(result, Err(Error::DirectionMismatch { .. })));

    // A motor line cannot feed an input slot.
    let motor_line = VoltageLine::output(VoltageCell::new(0.0));
    let result = bridge.wire(Pin::A0, LineDirection::Input, motor_line);
    assert!(matches!(result, Err(Error::DirectionMismatch { .. })));

    // Matching directions wire fine, but only once per pin.
    let motor_line = VoltageLine::output(VoltageCell::new(0.0));
    bridge
        .wire(Pin::A0, LineDirection::Output, motor_line.clone())
        .expect("direction matches");
    let result = bridge.wire(Pin::A0, LineDirection::Output, motor_line);
    assert!(matches!(result, Err(Error::PinOccupied(_))));
}

fn copying_bridge(
    sensor: VoltageCell,
    motor: VoltageCell,
    seen_unwired: VoltageCell,
) -> Microcontroller {
    let mut bridge = Microcontroller::new(move |pins: &mut Pins<'_>| {
        // Copy the sensor to the motor; unwired pins float at zero.
        pins.write(Pin::A0, pins.read(Pin::A4));
        seen_unwired.set(pins.read(Pin::B5));
    });
    bridge
        .wire(Pin::A4, LineDirection::Input, VoltageLine::input(sensor))
        .expect("input wiring");
    bridge
        .wire(Pin::A0, LineDirection::Output, VoltageLine::output(motor))
        .expect("output wiring");
    bridge
}

#[test]
fn program_reads_inputs_and_drives_outputs() {
    let sensor = VoltageCell::new(0.42);
    let motor = VoltageCell::new(0.0);
    let seen_unwired = VoltageCell::new(-1.0);
    let mut bridge = copying_bridge(sensor.clone(), motor.clone(), seen_unwired.clone());
    bridge.start();

    let mut scene = Scene::with_physics(PhysicsWorld::new(Gravity::TopView));
    scene.create_object(None, None, None, Some(Box::new(bridge)));
    scene.on_update();

    assert_relative_eq!(motor.get(), 0.42);
    assert_relative_eq!(seen_unwired.get(), 0.0);
}

#[test]
fn a_bridge_that_was_never_started_stays_inert() {
    let sensor = VoltageCell::new(0.42);
    let motor = VoltageCell::new(0.0);
    let bridge = copying_bridge(sensor, motor.clone(), VoltageCell::new(0.0));

    let mut scene = Scene::with_physics(PhysicsWorld::new(Gravity::TopView));
    scene.create_object(None, None, None, Some(Box::new(bridge)));
    scene.on_update();

    assert_relative_eq!(motor.get(), 0.0);
}

#[test]
fn tick_period_decouples_control_cadence_from_fixed_steps() {
    let ticks = VoltageCell::new(0.0);
    let counter = ticks.clone();
    let mut bridge = Microcontroller::new(move |_pins: &mut Pins<'_>| {
        counter.set(counter.get() + 1.0);
    })
    .with_tick_period(2.0 / 60.0);
    bridge.start();

    let mut scene = Scene::with_physics(PhysicsWorld::new(Gravity::TopView));
    scene.create_object(None, None, None, Some(Box::new(bridge)));

    for _ in 0..4 {
        scene.on_update();
    }
    // Two control ticks over four 1/60 s steps.
    assert_relative_eq!(ticks.get(), 2.0);
}

#[test]
fn distinct_motor_voltages_become_distinct_wheel_forces() {
    let mut world = PhysicsWorld::new(Gravity::TopView);
    let spec = SumobotSpec::default();
    let bot = Sumobot::build(&mut world, &spec, Vec2::ZERO).expect("sumobot");

    let mut bridge = Microcontroller::new(|pins: &mut Pins<'_>| {
        pins.write(Pin::A0, 1.0);
        pins.write(Pin::A1, 2.0);
        pins.write(Pin::A2, 3.0);
        pins.write(Pin::A3, 4.0);
    });
    for (pin, line) in [
        (Pin::A0, SumobotLine::FrontLeftMotor),
        (Pin::A1, SumobotLine::BackLeftMotor),
        (Pin::A2, SumobotLine::FrontRightMotor),
        (Pin::A3, SumobotLine::BackRightMotor),
    ] {
        bridge
            .wire(pin, LineDirection::Output, bot.voltage_line(line))
            .expect("motor wiring");
    }
    bridge.start();

    let (robot_object, _lines) = bot.into_parts();
    let mut scene = Scene::with_physics(world);
    let robot = scene.add_object(robot_object);
    scene.create_object(None, None, None, Some(Box::new(bridge)));

    // Tick one: motors still see 0 V, the program writes the commands.
    // Tick two: each wheel drives with its own voltage.
    scene.on_update();
    scene.on_update();

    let world = scene.physics_world().expect("world");
    let wheels = &scene.object(robot).children()[..4];
    let forces: Vec<f32> = wheels
        .iter()
        .map(|wheel| wheel.body().expect("wheel body").applied_force(world).length())
        .collect();

    for (index, voltage) in [1.0f32, 2.0, 3.0, 4.0].into_iter().enumerate() {
        assert_relative_eq!(
            forces[index],
            voltage * spec.motor_force_per_volt,
            epsilon = 1e-4
        );
    }
}

#[test]
fn unassigned_wheels_contribute_no_force() {
    let mut world = PhysicsWorld::new(Gravity::TopView);
    let spec = SumobotSpec::default();
    let bot = Sumobot::build(&mut world, &spec, Vec2::ZERO).expect("sumobot");

    let mut bridge = Microcontroller::new(|pins: &mut Pins<'_>| {
        pins.write(Pin::A0, 2.5);
    });
    bridge
        .wire(
            Pin::A0,
            LineDirection::Output,
            bot.voltage_line(SumobotLine::FrontLeftMotor),
        )
        .expect("motor wiring");
    bridge.start();

    let (robot_object, _lines) = bot.into_parts();
    let mut scene = Scene::with_physics(world);
    let robot = scene.add_object(robot_object);
    scene.create_object(None, None, None, Some(Box::new(bridge)));

    scene.on_update();
    scene.on_update();

    let world = scene.physics_world().expect("world");
    let wheels = &scene.object(robot).children()[..4];
    let forces: Vec<f32> = wheels
        .iter()
        .map(|wheel| wheel.body().expect("wheel body").applied_force(world).length())
        .collect();

    assert_relative_eq!(forces[0], 2.5 * spec.motor_force_per_volt, epsilon = 1e-4);
    for force in &forces[1..] {
        assert_relative_eq!(*force, 0.0, epsilon = 1e-6);
    }
}

/// Marks everything at positive x.
struct StripeField;

impl Field for StripeField {
    fn reflectance(&self, world_pos_m: Vec2) -> f32 {
        if world_pos_m.x > 0.0 { 1.0 } else { 0.0 }
    }
}

fn chassis_with_detector(
    world: &mut PhysicsWorld,
    position: Vec2,
) -> (SceneObject, LineDetector) {
    let mut transform = QuadTransform {
        position: Vec3::new(position.x, position.y, 0.0),
        size: Vec2::splat(0.1),
        rotation: 0.0,
    };
    let chassis = Body::from_quad(world, &mut transform, BodySpec::dynamic(0.5)).expect("chassis");
    let (detector_object, detector) =
        LineDetector::attach(world, &chassis, Vec2::new(0.0, 0.03), false).expect("line detector");
    let mut object = SceneObject::new()
        .with_transform(transform)
        .with_body(chassis);
    object.add_child(detector_object);
    (object, detector)
}

#[test]
fn line_detector_samples_the_field_without_history() {
    let mut world = PhysicsWorld::new(Gravity::TopView);
    let (marked_object, marked) = chassis_with_detector(&mut world, Vec2::new(1.0, 0.0));
    let (unmarked_object, unmarked) = chassis_with_detector(&mut world, Vec2::new(-1.0, 0.0));

    let mut scene = Scene::with_physics(world);
    scene.set_field(StripeField);
    scene.add_object(marked_object);
    scene.add_object(unmarked_object);

    for _ in 0..3 {
        scene.on_update();
        // Fresh sample every step, no smoothing or carry-over.
        assert_relative_eq!(marked.voltage_line().cell.get(), 1.0);
        assert_relative_eq!(unmarked.voltage_line().cell.get(), 0.0);
    }
}

#[test]
fn line_detector_reads_zero_without_a_field() {
    let mut world = PhysicsWorld::new(Gravity::TopView);
    let (object, detector) = chassis_with_detector(&mut world, Vec2::new(1.0, 0.0));

    let mut scene = Scene::with_physics(world);
    scene.add_object(object);
    scene.on_update();

    assert_relative_eq!(detector.voltage_line().cell.get(), 0.0);
}
