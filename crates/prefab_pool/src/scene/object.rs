//! Scene objects and the builder used to register them

use super::Spawnable;
use crate::foundation::collections::ObjectId;
use crate::foundation::math::{Quat, Transform, Vec3};
use bitflags::bitflags;

bitflags! {
    /// Optional capabilities of an object, resolved once per template
    ///
    /// An empty set is a plain object handled with the default active toggle.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u8 {
        /// Activation is delegated to a [`Spawnable`] behaviour
        const SPAWNABLE = 1 << 0;
        /// The object may request its own return to its pool
        const SELF_RETURN = 1 << 1;
    }
}

/// Mutable state of an object that behaviours are allowed to touch
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectState {
    /// World transform
    pub transform: Transform,
    pub(super) active: bool,
    pub(super) hidden: bool,
    pub(super) awake_count: u32,
    pub(super) enable_count: u32,
    pub(super) disable_count: u32,
}

impl ObjectState {
    fn new(transform: Transform, active: bool, hidden: bool) -> Self {
        Self {
            transform,
            active,
            hidden,
            awake_count: 0,
            enable_count: 0,
            disable_count: 0,
        }
    }

    /// Whether the object is active
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the object is hidden from the scene hierarchy
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// How many times the creation hook fired (0 or 1)
    pub fn awake_count(&self) -> u32 {
        self.awake_count
    }

    /// How many inactive → active transitions happened
    pub fn enable_count(&self) -> u32 {
        self.enable_count
    }

    /// How many active → inactive transitions happened
    pub fn disable_count(&self) -> u32 {
        self.disable_count
    }
}

/// An object living in a [`Scene`](super::Scene)
#[derive(Debug)]
pub struct SceneObject {
    pub(super) name: String,
    pub(super) state: ObjectState,
    pub(super) behaviour: Option<Box<dyn Spawnable>>,
    pub(super) capabilities: Capabilities,
    pub(super) origin: Option<ObjectId>,
    pub(super) persistent: bool,
    pub(super) awake: bool,
}

impl SceneObject {
    /// Object name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current state
    pub fn state(&self) -> &ObjectState {
        &self.state
    }

    /// Capabilities carried by this object
    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Template this object was instantiated from, if any
    pub fn origin(&self) -> Option<ObjectId> {
        self.origin
    }

    /// Whether the object survives scene unloads
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    /// Clone of this object as a fresh instance of `template`, starting inactive
    pub(super) fn instance_of(&self, template: ObjectId) -> Self {
        Self {
            name: format!("{}(Clone)", self.name),
            state: ObjectState::new(self.state.transform.clone(), false, self.state.hidden),
            behaviour: self.behaviour.clone(),
            capabilities: self.capabilities,
            origin: Some(template),
            persistent: false,
            awake: false,
        }
    }
}

/// Builder for objects added directly to a scene (templates, level objects)
#[derive(Debug)]
pub struct ObjectBuilder {
    name: String,
    transform: Transform,
    active: bool,
    hidden: bool,
    persistent: bool,
    behaviour: Option<Box<dyn Spawnable>>,
    capabilities: Capabilities,
}

impl ObjectBuilder {
    /// Start building an active, visible object
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::identity(),
            active: true,
            hidden: false,
            persistent: false,
            behaviour: None,
            capabilities: Capabilities::empty(),
        }
    }

    /// Set position and rotation
    pub fn with_pose(mut self, position: Vec3, rotation: Quat) -> Self {
        self.transform.set_pose(position, rotation);
        self
    }

    /// Set the full transform
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Set the initial active state
    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Hide from the scene hierarchy
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Survive scene unloads (prefab assets, managers)
    pub fn persistent(mut self) -> Self {
        self.persistent = true;
        self
    }

    /// Attach an activation behaviour
    pub fn with_spawnable(mut self, behaviour: impl Spawnable) -> Self {
        self.behaviour = Some(Box::new(behaviour));
        self.capabilities |= Capabilities::SPAWNABLE;
        self
    }

    /// Allow instances to return themselves to their pool
    pub fn self_returning(mut self) -> Self {
        self.capabilities |= Capabilities::SELF_RETURN;
        self
    }

    /// Finish the object; it is inserted inactive and activated by the scene
    pub(super) fn build(self) -> (SceneObject, bool) {
        let object = SceneObject {
            name: self.name,
            state: ObjectState::new(self.transform, false, self.hidden),
            behaviour: self.behaviour,
            capabilities: self.capabilities,
            origin: None,
            persistent: self.persistent,
            awake: false,
        };
        (object, self.active)
    }
}
