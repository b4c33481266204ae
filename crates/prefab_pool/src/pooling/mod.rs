//! Object pooling
//!
//! Pools recycle deactivated clones of a template instead of destroying them.
//! [`ObjectPool`] manages the clones of one template, [`PoolRegistry`] owns a
//! pool per template and creates them on demand, and [`Warmup`] pre-fills
//! pools over several frames.

pub mod error;
pub mod object_pool;
pub mod registry;
pub mod warmup;

pub use error::{PoolError, PoolResult};
pub use object_pool::{DespawnOutcome, ObjectPool, Placement, PoolStats, PooledItem};
pub use registry::{PoolRegistry, PoolSummary};
pub use warmup::{Warmup, WarmupEntry, WarmupStatus};
