//! # Prefab Pool
//!
//! Object pooling for engine-managed scene objects. Instead of destroying a
//! projectile, particle or enemy and cloning its template again, pools keep the
//! deactivated clone and hand it out on the next spawn.
//!
//! ## Features
//!
//! - **On-demand pools**: the first spawn of a template creates its pool
//! - **Capability dispatch**: spawnable behaviours park and restore themselves
//!   instead of being toggled off and on
//! - **Self-return**: instances can send themselves back after a delay
//! - **Time-sliced warmup**: pre-fill pools across loading frames
//! - **Scene-change reconciliation**: destroyed clones are dropped from pools
//!
//! ## Quick Start
//!
//! ```rust
//! use prefab_pool::prelude::*;
//!
//! let mut scene = Scene::new("level_1");
//! let asteroid = scene.add(ObjectBuilder::new("Asteroid").persistent());
//! let mut pools = PoolRegistry::new();
//!
//! let rock = pools.spawn_at(&mut scene, asteroid, Vec3::new(4.0, 0.0, 0.0), Quat::identity())?;
//! assert!(scene.is_active(rock));
//!
//! pools.despawn(&mut scene, asteroid, rock)?;
//! assert!(!scene.is_active(rock));
//! # Ok::<(), PoolError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod core;
pub mod config;
pub mod foundation;
pub mod scene;
pub mod pooling;
pub mod events;

/// Common imports for pool users
pub mod prelude {
    pub use crate::{
        core::config::{PoolConfig, WarmupConfig, Config, ConfigError},
        events::{LifecycleEvent, LifecycleHandler, LifecycleQueue},
        foundation::{
            collections::{ObjectId, TypedHandle},
            math::{Quat, Transform, Vec3},
            time::{SliceTimer, Timer},
        },
        pooling::{
            DespawnOutcome, ObjectPool, Placement, PoolError, PoolRegistry, PoolResult,
            PoolSummary, Warmup, WarmupEntry, WarmupStatus,
        },
        scene::{
            Capabilities, CapabilityError, ObjectBuilder, ObjectState, Scene, SceneError, Spawnable,
        },
    };
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
