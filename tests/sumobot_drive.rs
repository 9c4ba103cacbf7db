// tests/sumobot_drive.rs
use approx::assert_relative_eq;
use glam::{Vec2, Vec3};
use sumosim::{
    Body, BodySpec, Gravity, KeyAction, KeyCode, KeyEvent, PhysicsWorld, Pin, Pins,
    QuadTransform, Scene, Sumobot, SumobotKeyboardController, SumobotLine, SumobotSpec,
    Transform, sumobot_test_scene,
};

fn press(code: KeyCode) -> KeyEvent {
    KeyEvent {
        code,
        action: KeyAction::Press,
    }
}

fn release(code: KeyCode) -> KeyEvent {
    KeyEvent {
        code,
        action: KeyAction::Release,
    }
}

fn keyboard_scene() -> (Scene, sumosim::ObjectId) {
    let mut world = PhysicsWorld::new(Gravity::TopView);
    let bot = Sumobot::build(&mut world, &SumobotSpec::default(), Vec2::ZERO).expect("sumobot");
    let (object, lines) = bot.into_parts();

    let mut scene = Scene::with_physics(world);
    let robot = scene.add_object(object);
    scene.create_object(
        None,
        None,
        None,
        Some(Box::new(SumobotKeyboardController::new(&lines, 4.0))),
    );
    (scene, robot)
}

#[test]
fn arrow_keys_drive_the_robot_forward_and_friction_stops_it() {
    let (mut scene, robot) = keyboard_scene();

    scene.on_key_event(&press(KeyCode::Up));
    for _ in 0..30 {
        scene.on_update();
    }
    let speed_driving = {
        let world = scene.physics_world().expect("world");
        scene
            .object(robot)
            .body()
            .expect("chassis")
            .forward_speed(world)
    };
    assert!(
        speed_driving > 0.01,
        "forward drive should build forward speed, got {speed_driving}"
    );

    scene.on_key_event(&release(KeyCode::Up));
    for _ in 0..60 {
        scene.on_update();
    }
    let speed_coasting = {
        let world = scene.physics_world().expect("world");
        scene
            .object(robot)
            .body()
            .expect("chassis")
            .forward_speed(world)
    };
    assert!(
        speed_coasting < speed_driving,
        "surface friction should bleed speed off after release"
    );
}

#[test]
fn opposite_wheel_voltages_turn_the_robot() {
    let (mut scene, robot) = keyboard_scene();

    scene.on_key_event(&press(KeyCode::Left));
    for _ in 0..30 {
        scene.on_update();
    }
    let world = scene.physics_world().expect("world");
    let angle = scene.object(robot).body().expect("chassis").angle(world);
    assert!(angle > 0.005, "left turn should rotate counterclockwise, got {angle}");
}

#[test]
fn range_sensor_measures_distance_to_an_obstacle() {
    let mut world = PhysicsWorld::new(Gravity::TopView);
    let bot = Sumobot::build(&mut world, &SumobotSpec::default(), Vec2::ZERO).expect("sumobot");

    // A wall 0.3 m ahead of the robot center, 0.05 m thick: its near face
    // sits 0.275 m out, the front sensor 0.05 m out, so the sensor should
    // read about 0.225 m.
    let mut wall = Transform::Quad(QuadTransform {
        position: Vec3::new(0.0, 0.3, 0.0),
        size: Vec2::new(0.4, 0.05),
        rotation: 0.0,
    });
    let wall_body = Body::new(&mut world, &mut wall, BodySpec::fixed()).expect("wall");

    let (object, lines) = bot.into_parts();
    let mut scene = Scene::with_physics(world);
    scene.add_object(object);
    scene.create_object(Some(wall), None, Some(wall_body), None);

    scene.on_update();

    let front = lines.voltage_line(SumobotLine::FrontRangeSensor).cell.get();
    assert_relative_eq!(front, 0.225, epsilon = 0.02);

    // Nothing to the sides: both lateral sensors clamp to max range.
    let left = lines.voltage_line(SumobotLine::LeftRangeSensor).cell.get();
    let right = lines.voltage_line(SumobotLine::RightRangeSensor).cell.get();
    assert_relative_eq!(left, 0.8, epsilon = 1e-3);
    assert_relative_eq!(right, 0.8, epsilon = 1e-3);
}

#[test]
fn range_sensor_clamps_to_max_range_with_nothing_ahead() {
    let mut world = PhysicsWorld::new(Gravity::TopView);
    let bot = Sumobot::build(&mut world, &SumobotSpec::default(), Vec2::ZERO).expect("sumobot");
    let (object, lines) = bot.into_parts();

    let mut scene = Scene::with_physics(world);
    scene.add_object(object);
    scene.on_update();

    let front = lines.voltage_line(SumobotLine::FrontRangeSensor).cell.get();
    assert_relative_eq!(front, 0.8, epsilon = 1e-3);
}

#[test]
fn catalogue_scene_runs_a_control_program_against_live_sensors() {
    let mut bout = sumobot_test_scene(|pins: &mut Pins<'_>| {
        // Creep forward unless a border line shows up under the front
        // detectors.
        let on_line =
            pins.read(Pin::B1) > 0.5 || pins.read(Pin::B3) > 0.5;
        let drive = if on_line { 0.0 } else { 1.5 };
        pins.write(Pin::A0, drive);
        pins.write(Pin::A1, drive);
        pins.write(Pin::A2, drive);
        pins.write(Pin::A3, drive);
    })
    .expect("catalogue scene");

    for _ in 0..10 {
        bout.scene.on_update();
    }

    // The bridged robot's front sensor sees nothing dead ahead, while the
    // front-right one faces the pushable box.
    let front = bout
        .bridged_bot
        .voltage_line(SumobotLine::FrontRangeSensor)
        .cell
        .get();
    let front_right = bout
        .bridged_bot
        .voltage_line(SumobotLine::FrontRightRangeSensor)
        .cell
        .get();
    assert!(front > 0.7, "nothing straight ahead, got {front}");
    assert!(
        front_right < 0.4,
        "the box should show up on the front-right sensor, got {front_right}"
    );

    // The program keeps commanding the motors.
    let motor = bout
        .bridged_bot
        .voltage_line(SumobotLine::FrontLeftMotor)
        .cell
        .get();
    assert_relative_eq!(motor, 1.5);

    // The keyboard robot has not been driven.
    let idle_motor = bout
        .keyboard_bot
        .voltage_line(SumobotLine::FrontLeftMotor)
        .cell
        .get();
    assert_relative_eq!(idle_motor, 0.0);
}
