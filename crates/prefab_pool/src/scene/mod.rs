//! # Scene
//!
//! Minimal host world the pools clone into. Objects live in a slot map keyed by
//! [`ObjectId`], so identity is the key and never the contents: two objects
//! built from identical builders are distinct templates.
//!
//! The scene fires the lifecycle hooks an engine would: the awake hook the
//! first time an object becomes active, and enable/disable counters on every
//! active-state flip. Instantiating an active template fires the clone's hooks
//! immediately, which is why pools deactivate templates while cloning.

pub mod behaviour;
pub mod error;
pub mod object;

pub use behaviour::{BehaviourBase, CapabilityError, Spawnable};
pub use error::SceneError;
pub use object::{Capabilities, ObjectBuilder, ObjectState, SceneObject};

use crate::foundation::collections::{HandleMap, ObjectId};
use crate::foundation::math::{Quat, Transform, Vec3};
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
struct PendingReturn {
    object: ObjectId,
    remaining: Duration,
}

/// Container of every live object
#[derive(Debug)]
pub struct Scene {
    name: String,
    objects: HandleMap<SceneObject>,
    pending_returns: Vec<PendingReturn>,
}

impl Scene {
    /// Create an empty scene
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            objects: HandleMap::with_key(),
            pending_returns: Vec::new(),
        }
    }

    /// Scene name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of live objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the scene has no objects
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Add an object described by `builder`
    pub fn add(&mut self, builder: ObjectBuilder) -> ObjectId {
        let (object, active) = builder.build();
        let id = self.objects.insert(object);
        if active {
            self.set_active(id, true);
        }
        id
    }

    /// Clone `template` into a new object
    ///
    /// The clone starts in the template's active state, firing its hooks if
    /// that state is active. Returns `None` if the template no longer exists.
    pub fn instantiate(&mut self, template: ObjectId) -> Option<ObjectId> {
        let source = self.objects.get(template)?;
        let active = source.state.active;
        let clone = source.instance_of(template);
        let id = self.objects.insert(clone);
        if active {
            self.set_active(id, true);
        }
        Some(id)
    }

    /// Destroy an object, returning whether it existed
    pub fn destroy(&mut self, id: ObjectId) -> bool {
        self.cancel_return(id);
        self.objects.remove(id).is_some()
    }

    /// Whether the object is still alive
    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(id)
    }

    /// Look up an object
    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id)
    }

    /// First object with the given name
    pub fn find(&self, name: &str) -> Option<ObjectId> {
        self.objects
            .iter()
            .find(|(_, object)| object.name == name)
            .map(|(id, _)| id)
    }

    /// Whether the object exists and is active
    pub fn is_active(&self, id: ObjectId) -> bool {
        self.objects.get(id).map_or(false, |object| object.state.active)
    }

    /// Default enable/disable toggle
    ///
    /// The first activation fires the awake hook. Returns `false` if the object
    /// does not exist.
    pub fn set_active(&mut self, id: ObjectId, active: bool) -> bool {
        let Some(object) = self.objects.get_mut(id) else {
            return false;
        };
        if object.state.active == active {
            return true;
        }

        object.state.active = active;
        if active {
            object.state.enable_count += 1;
            if !object.awake {
                object.awake = true;
                object.state.awake_count += 1;
                if let Some(behaviour) = object.behaviour.as_mut() {
                    behaviour.on_awake(&mut object.state);
                }
            }
        } else {
            object.state.disable_count += 1;
        }
        true
    }

    /// Current transform
    pub fn transform(&self, id: ObjectId) -> Option<&Transform> {
        self.objects.get(id).map(|object| &object.state.transform)
    }

    /// Replace the whole transform, scale included
    pub fn set_transform(&mut self, id: ObjectId, transform: Transform) -> bool {
        self.objects
            .get_mut(id)
            .map(|object| object.state.transform = transform)
            .is_some()
    }

    /// Place an object, returning `false` if it does not exist
    pub fn set_pose(&mut self, id: ObjectId, position: Vec3, rotation: Quat) -> bool {
        match self.objects.get_mut(id) {
            Some(object) => {
                object.state.transform.set_pose(position, rotation);
                true
            }
            None => false,
        }
    }

    /// Whether the object is hidden from the hierarchy
    pub fn is_hidden(&self, id: ObjectId) -> bool {
        self.objects.get(id).map_or(false, |object| object.state.hidden)
    }

    /// Hide or show an object in the hierarchy without touching its active state
    pub fn set_hidden(&mut self, id: ObjectId, hidden: bool) {
        if let Some(object) = self.objects.get_mut(id) {
            object.state.hidden = hidden;
        }
    }

    /// Capabilities of an object (empty if it does not exist)
    pub fn capabilities(&self, id: ObjectId) -> Capabilities {
        self.objects
            .get(id)
            .map_or(Capabilities::empty(), |object| object.capabilities)
    }

    /// Template the object was instantiated from
    pub fn origin(&self, id: ObjectId) -> Option<ObjectId> {
        self.objects.get(id).and_then(|object| object.origin)
    }

    /// Typed access to an object's behaviour
    pub fn behaviour<T: Spawnable>(&self, id: ObjectId) -> Option<&T> {
        self.objects
            .get(id)?
            .behaviour
            .as_deref()?
            .as_any()
            .downcast_ref::<T>()
    }

    /// Typed mutable access to an object's behaviour
    pub fn behaviour_mut<T: Spawnable>(&mut self, id: ObjectId) -> Option<&mut T> {
        self.objects
            .get_mut(id)?
            .behaviour
            .as_deref_mut()?
            .as_any_mut()
            .downcast_mut::<T>()
    }

    /// Run the object's spawn hook, if it has a behaviour
    pub fn notify_spawn(&mut self, id: ObjectId, active: bool) -> Result<(), CapabilityError> {
        match self.objects.get_mut(id) {
            Some(SceneObject {
                behaviour: Some(behaviour),
                state,
                ..
            }) => behaviour.on_spawn(state, active),
            _ => Ok(()),
        }
    }

    /// Ask for `id` to be returned to its pool after `delay`
    ///
    /// Only objects with the [`Capabilities::SELF_RETURN`] capability may ask.
    /// A second request replaces the first. Requests are serviced by
    /// [`PoolRegistry::update`](crate::pooling::PoolRegistry::update).
    pub fn request_return(&mut self, id: ObjectId, delay: Option<Duration>) -> Result<(), SceneError> {
        let object = self.objects.get(id).ok_or(SceneError::UnknownObject(id))?;
        if !object.capabilities.contains(Capabilities::SELF_RETURN) {
            return Err(SceneError::SelfReturnUnsupported(id));
        }

        let remaining = delay.unwrap_or(Duration::ZERO);
        match self.pending_returns.iter_mut().find(|p| p.object == id) {
            Some(pending) => pending.remaining = remaining,
            None => self.pending_returns.push(PendingReturn { object: id, remaining }),
        }
        Ok(())
    }

    /// Drop a queued self-return request, returning whether one existed
    ///
    /// Pools call this when the object goes back by other means, so a stale
    /// timer never returns the object from its next holder.
    pub fn cancel_return(&mut self, id: ObjectId) -> bool {
        let before = self.pending_returns.len();
        self.pending_returns.retain(|pending| pending.object != id);
        before != self.pending_returns.len()
    }

    /// Number of queued self-return requests
    pub fn pending_returns(&self) -> usize {
        self.pending_returns.len()
    }

    /// Advance return timers by `dt` and take the requests that came due
    pub fn advance_returns(&mut self, dt: Duration) -> Vec<ObjectId> {
        let mut due = Vec::new();
        self.pending_returns.retain_mut(|pending| {
            if pending.remaining <= dt {
                due.push(pending.object);
                false
            } else {
                pending.remaining -= dt;
                true
            }
        });
        due
    }

    /// Destroy every non-persistent object, as an engine does on scene change
    pub fn unload(&mut self) -> usize {
        let before = self.objects.len();
        self.objects.retain(|_, object| object.persistent);
        let objects = &self.objects;
        self.pending_returns
            .retain(|pending| objects.contains_key(pending.object));

        let destroyed = before - self.objects.len();
        log::debug!("Unloaded scene '{}': destroyed {} objects", self.name, destroyed);
        destroyed
    }
}
