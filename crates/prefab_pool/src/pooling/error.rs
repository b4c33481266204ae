//! Pool error types

use crate::foundation::collections::ObjectId;
use crate::scene::SceneError;

/// Errors raised by pools and the pool registry
///
/// Everything here points at a caller mistake. Redundant despawns and failing
/// spawn hooks are not errors; see [`DespawnOutcome`](super::DespawnOutcome).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// The instance was never created by this pool
    #[error("object {instance:?} does not belong to the pool of template {template:?}")]
    NotOwned {
        /// Template of the pool that was asked
        template: ObjectId,
        /// The foreign instance
        instance: ObjectId,
    },

    /// No pool has ever been created for the template
    #[error("no pool exists for template {0:?}")]
    NoPool(ObjectId),

    /// The template was destroyed, so nothing can be cloned from it
    #[error("template {0:?} no longer exists in the scene")]
    MissingTemplate(ObjectId),

    /// The object is not alive in the scene
    #[error("object {0:?} does not exist in the scene")]
    UnknownObject(ObjectId),

    /// The object was not instantiated from a template
    #[error("object {0:?} has no recorded template")]
    NoOrigin(ObjectId),

    /// The object cannot request its own return
    #[error("object {0:?} does not have the self-return capability")]
    SelfReturnUnsupported(ObjectId),

    /// A typed spawn named a behaviour type the template does not carry
    #[error("template {template:?} does not carry a `{expected}` behaviour")]
    BehaviourMismatch {
        /// Template that was spawned
        template: ObjectId,
        /// Requested behaviour type
        expected: &'static str,
    },

    /// A warmup entry named a template the scene does not contain
    #[error("no template named '{0}' in the scene")]
    UnknownTemplate(String),
}

impl From<SceneError> for PoolError {
    fn from(err: SceneError) -> Self {
        match err {
            SceneError::UnknownObject(id) => Self::UnknownObject(id),
            SceneError::SelfReturnUnsupported(id) => Self::SelfReturnUnsupported(id),
        }
    }
}

/// Result alias for pool operations
pub type PoolResult<T> = Result<T, PoolError>;
