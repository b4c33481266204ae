//! Scene error types

use crate::foundation::collections::ObjectId;

/// Errors raised by scene operations
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneError {
    /// The object is not alive in the scene
    #[error("object {0:?} does not exist in the scene")]
    UnknownObject(ObjectId),

    /// The object cannot request its own return
    #[error("object {0:?} does not have the self-return capability")]
    SelfReturnUnsupported(ObjectId),
}
