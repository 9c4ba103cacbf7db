//! Scene-object composition and the per-frame / fixed-step drive.
//!
//! A [`SceneObject`] is a container of independent optional slots: a
//! [`Transform`], a physics [`Body`], a renderable, a controller, and any
//! number of owned children. The [`Scene`] owns the physics world and the
//! root objects and drives everything: per-frame `update`, then one fixed
//! physics step, then the fixed-step pass in which bodies sync their
//! transforms and controllers read sensors and write actuator commands.
//!
//! Children live inside their parent, so the scene can only ever reach
//! them through the parent and no object is updated twice per tick.

use tracing::debug;

use crate::body::Body;
use crate::render::{PrimitiveRenderer, Renderable};
use crate::sensors::Field;
use crate::transform::Transform;
use crate::world::PhysicsWorld;

/// Whether a key went down or up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Press,
    Release,
}

/// Keys the simulator's controllers react to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCode {
    Up,
    Down,
    Left,
    Right,
    Space,
    Escape,
}

/// A discrete key transition delivered by the input collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub action: KeyAction,
}

/// Everything a controller may touch during the fixed-step pass.
pub struct StepContext<'a> {
    /// The world that was just stepped. Mutable so controllers can apply
    /// forces for the next step.
    pub world: &'a mut PhysicsWorld,
    /// Surface-marking lookup, if the scene has one.
    pub field: Option<&'a dyn Field>,
    /// Seconds covered by the step that just ran.
    pub step_seconds: f32,
}

/// The controller capability of a scene object.
///
/// Controllers hold the object's behavior: keyboard mappings, sensor
/// sampling routines, motor drives, microcontroller bridges. All hooks
/// default to no-ops so implementors pick what they need.
pub trait Controller {
    /// Per-frame logic, before the physics step.
    fn update(&mut self) {}

    /// Reacts to a discrete key transition.
    fn on_key_event(&mut self, _event: &KeyEvent) {}

    /// Fixed-step logic, after the physics step and transform sync.
    /// `body` is the body slot of the owning object, if any.
    fn on_fixed_update(&mut self, _ctx: &mut StepContext<'_>, _body: Option<&Body>) {}
}

/// A node of the scene graph: four optional component slots plus children.
#[derive(Default)]
pub struct SceneObject {
    transform: Option<Transform>,
    body: Option<Body>,
    renderable: Option<Box<dyn Renderable>>,
    controller: Option<Box<dyn Controller>>,
    children: Vec<SceneObject>,
}

impl SceneObject {
    /// An empty object; fill the slots with the `with_*` builders.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transform(mut self, transform: impl Into<Transform>) -> Self {
        self.transform = Some(transform.into());
        self
    }

    pub fn with_body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_renderable(mut self, renderable: impl Renderable + 'static) -> Self {
        self.renderable = Some(Box::new(renderable));
        self
    }

    pub fn with_controller(mut self, controller: impl Controller + 'static) -> Self {
        self.controller = Some(Box::new(controller));
        self
    }

    /// Moves `child` into this object. From now on the child is updated by
    /// this object, never by the scene directly.
    pub fn add_child(&mut self, child: SceneObject) {
        self.children.push(child);
    }

    pub fn transform(&self) -> Option<&Transform> {
        self.transform.as_ref()
    }

    pub fn body(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    pub fn children(&self) -> &[SceneObject] {
        &self.children
    }

    fn update(&mut self) {
        if let Some(controller) = &mut self.controller {
            controller.update();
        }
        for child in &mut self.children {
            child.update();
        }
    }

    fn on_key_event(&mut self, event: &KeyEvent) {
        if let Some(controller) = &mut self.controller {
            controller.on_key_event(event);
        }
        for child in &mut self.children {
            child.on_key_event(event);
        }
    }

    fn on_fixed_update(&mut self, ctx: &mut StepContext<'_>) {
        if let (Some(body), Some(transform)) = (&self.body, &mut self.transform) {
            body.on_fixed_update(ctx.world, transform);
        }
        if let Some(controller) = &mut self.controller {
            controller.on_fixed_update(ctx, self.body.as_ref());
        }
        for child in &mut self.children {
            child.on_fixed_update(ctx);
        }
    }

    fn render(&self, renderer: &mut dyn PrimitiveRenderer) {
        if let (Some(renderable), Some(transform)) = (&self.renderable, &self.transform) {
            renderable.draw(transform, renderer);
        }
        for child in &self.children {
            child.render(renderer);
        }
    }
}

/// Handle to a root object registered in a [`Scene`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObjectId(usize);

/// Owns the physics world and the root objects, and drives the tick.
#[derive(Default)]
pub struct Scene {
    world: Option<PhysicsWorld>,
    field: Option<Box<dyn Field>>,
    objects: Vec<SceneObject>,
}

impl Scene {
    /// A scene without physics; objects update but never fixed-step.
    pub fn new() -> Self {
        Self::default()
    }

    /// A scene owning `world`.
    pub fn with_physics(world: PhysicsWorld) -> Self {
        Self {
            world: Some(world),
            field: None,
            objects: Vec::new(),
        }
    }

    pub fn physics_world(&self) -> Option<&PhysicsWorld> {
        self.world.as_ref()
    }

    pub fn physics_world_mut(&mut self) -> Option<&mut PhysicsWorld> {
        self.world.as_mut()
    }

    /// Installs the surface-marking collaborator sampled by line detectors.
    pub fn set_field(&mut self, field: impl Field + 'static) {
        self.field = Some(Box::new(field));
    }

    /// Assembles a root object from its four optional slots.
    pub fn create_object(
        &mut self,
        transform: Option<Transform>,
        renderable: Option<Box<dyn Renderable>>,
        body: Option<Body>,
        controller: Option<Box<dyn Controller>>,
    ) -> ObjectId {
        let object = SceneObject {
            transform,
            body,
            renderable,
            controller,
            children: Vec::new(),
        };
        self.add_object(object)
    }

    /// Registers a prebuilt object (e.g. a robot assembly) as a root.
    pub fn add_object(&mut self, object: SceneObject) -> ObjectId {
        self.objects.push(object);
        debug!(roots = self.objects.len(), "registered scene object");
        ObjectId(self.objects.len() - 1)
    }

    pub fn object(&self, id: ObjectId) -> &SceneObject {
        &self.objects[id.0]
    }

    pub fn object_mut(&mut self, id: ObjectId) -> &mut SceneObject {
        &mut self.objects[id.0]
    }

    /// One frame: per-frame updates, then exactly one fixed physics step
    /// followed by the fixed-step pass over all roots.
    ///
    /// Per tick the data flows one way: physics integration, then body
    /// translators, then sensor sampling, then controller reads/writes
    /// whose effects feed the next tick's forces.
    pub fn on_update(&mut self) {
        for object in &mut self.objects {
            object.update();
        }
        if let Some(world) = &mut self.world {
            world.step();
            let step_seconds = world.step_seconds();
            let mut ctx = StepContext {
                world,
                field: self.field.as_deref(),
                step_seconds,
            };
            for object in &mut self.objects {
                object.on_fixed_update(&mut ctx);
            }
        }
    }

    /// Forwards a key transition to every root (and through parents to
    /// their children).
    pub fn on_key_event(&mut self, event: &KeyEvent) {
        for object in &mut self.objects {
            object.on_key_event(event);
        }
    }

    /// Walks the tree issuing draw-primitive requests.
    pub fn render(&self, renderer: &mut dyn PrimitiveRenderer) {
        for object in &self.objects {
            object.render(renderer);
        }
    }
}
