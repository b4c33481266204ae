//! Optional behaviours a template's clones can carry
//!
//! A behaviour is cloned along with its object. When a template has one, the
//! pool hands activation and deactivation to [`Spawnable::on_spawn`] instead of
//! toggling the object's active flag.

use super::ObjectState;
use std::any::Any;
use std::fmt;

/// Failure reported by a behaviour's spawn hook
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("spawn hook failed: {reason}")]
pub struct CapabilityError {
    /// What went wrong
    pub reason: String,
}

impl CapabilityError {
    /// Create a new capability error
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Object-safe plumbing for [`Spawnable`], implemented for every `Clone` behaviour
pub trait BehaviourBase: Any + fmt::Debug {
    /// Clone into a new box, used when the owning object is instantiated
    fn clone_box(&self) -> Box<dyn Spawnable>;
    /// Upcast for typed lookups
    fn as_any(&self) -> &dyn Any;
    /// Mutable upcast for typed lookups
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Spawnable + Clone> BehaviourBase for T {
    fn clone_box(&self) -> Box<dyn Spawnable> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Activation capability
///
/// Replaces the default enable/disable toggle for pooled objects. `active` is
/// `true` when the object is handed out and `false` when it is returned.
pub trait Spawnable: BehaviourBase {
    /// Called on every spawn (`true`) and despawn (`false`)
    fn on_spawn(&mut self, state: &mut ObjectState, active: bool) -> Result<(), CapabilityError>;

    /// Called the first time the owning object becomes active
    fn on_awake(&mut self, _state: &mut ObjectState) {}
}

impl Clone for Box<dyn Spawnable> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
