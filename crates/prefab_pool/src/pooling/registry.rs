//! Pool Registry
//!
//! Maps each template to its [`ObjectPool`] and routes every spawn, despawn and
//! fill request. Pools are created on first use and only ever removed in bulk.
//!
//! # Usage
//!
//! ```rust
//! use prefab_pool::prelude::*;
//!
//! let mut scene = Scene::new("level");
//! let bullet = scene.add(ObjectBuilder::new("Bullet").persistent());
//! let mut registry = PoolRegistry::new();
//!
//! let shot = registry.spawn(&mut scene, bullet)?;
//! registry.despawn(&mut scene, bullet, shot)?;
//! assert_eq!(registry.spawn(&mut scene, bullet)?, shot);
//! # Ok::<(), PoolError>(())
//! ```

use super::{DespawnOutcome, ObjectPool, Placement, PoolError, PoolResult};
use crate::core::config::PoolConfig;
use crate::events::{LifecycleEvent, LifecycleHandler};
use crate::foundation::collections::{ObjectId, TypedHandle};
use crate::foundation::math::{Quat, Vec3};
use crate::scene::{Scene, Spawnable};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::time::Duration;

/// Read-only view of one pool for debug displays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSummary {
    /// Template of the pool
    pub template: ObjectId,
    /// Template name, or `<destroyed>` if the template is gone
    pub name: String,
    /// Objects handed out
    pub active: usize,
    /// Objects waiting to be handed out
    pub inactive: usize,
}

/// Registry of every pool, keyed by template identity
///
/// Two templates with identical contents but different ids get separate pools.
#[derive(Debug)]
pub struct PoolRegistry {
    pools: HashMap<ObjectId, ObjectPool>,
    config: PoolConfig,
    pools_visible: bool,
}

impl Default for PoolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PoolRegistry {
    /// Create an empty registry with default configuration
    pub fn new() -> Self {
        Self::with_config(PoolConfig::default())
    }

    /// Create an empty registry
    pub fn with_config(config: PoolConfig) -> Self {
        Self {
            pools: HashMap::new(),
            pools_visible: config.pools_visible,
            config,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Pool of `template`, if one was created
    pub fn pool(&self, template: ObjectId) -> Option<&ObjectPool> {
        self.pools.get(&template)
    }

    /// Whether a pool exists for `template`
    pub fn has_pool(&self, template: ObjectId) -> bool {
        self.pools.contains_key(&template)
    }

    /// Number of pools
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    /// Whether no pool exists
    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// Objects owned by the pool of `template` (0 without a pool)
    pub fn pool_count(&self, template: ObjectId) -> usize {
        self.pools.get(&template).map_or(0, ObjectPool::count)
    }

    /// Hand out a clone of `template`
    pub fn spawn(&mut self, scene: &mut Scene, template: ObjectId) -> PoolResult<ObjectId> {
        self.spawn_sized(scene, template, None, self.config.default_initial_size)
    }

    /// Hand out a clone of `template` at the given position and orientation
    pub fn spawn_at(
        &mut self,
        scene: &mut Scene,
        template: ObjectId,
        position: Vec3,
        rotation: Quat,
    ) -> PoolResult<ObjectId> {
        self.spawn_sized(
            scene,
            template,
            Some(Placement::new(position, rotation)),
            self.config.default_initial_size,
        )
    }

    /// Hand out a clone, creating the pool with `initial_size` objects if needed
    pub fn spawn_sized(
        &mut self,
        scene: &mut Scene,
        template: ObjectId,
        placement: Option<Placement>,
        initial_size: usize,
    ) -> PoolResult<ObjectId> {
        if let Some(pool) = self.pools.get_mut(&template) {
            return pool.spawn_with(scene, placement);
        }

        let (pool, first) = ObjectPool::with_first_active(
            scene,
            template,
            initial_size,
            placement,
            self.pools_visible,
        )?;
        self.pools.insert(template, pool);
        Ok(first)
    }

    /// Hand out a clone of a template carrying behaviour `T`
    ///
    /// The returned handle refers to the clone's own `T`.
    pub fn spawn_typed<T: Spawnable>(
        &mut self,
        scene: &mut Scene,
        prefab: TypedHandle<T>,
    ) -> PoolResult<TypedHandle<T>> {
        let template = prefab.id();
        if scene.behaviour::<T>(template).is_none() {
            return Err(if scene.contains(template) {
                PoolError::BehaviourMismatch {
                    template,
                    expected: std::any::type_name::<T>(),
                }
            } else {
                PoolError::MissingTemplate(template)
            });
        }

        self.spawn(scene, template).map(TypedHandle::new)
    }

    /// Return `instance` to the pool of `template`
    pub fn despawn(
        &mut self,
        scene: &mut Scene,
        template: ObjectId,
        instance: ObjectId,
    ) -> PoolResult<DespawnOutcome> {
        self.pools
            .get_mut(&template)
            .ok_or(PoolError::NoPool(template))?
            .despawn(scene, instance)
    }

    /// Return `instance` to the pool of the template it was cloned from
    pub fn return_to_pool(&mut self, scene: &mut Scene, instance: ObjectId) -> PoolResult<DespawnOutcome> {
        let template = scene.origin(instance).ok_or(if scene.contains(instance) {
            PoolError::NoOrigin(instance)
        } else {
            PoolError::UnknownObject(instance)
        })?;
        self.despawn(scene, template, instance)
    }

    /// Service self-return requests that came due within `dt`
    ///
    /// Failed returns are logged and skipped. Returns how many objects went back.
    pub fn update(&mut self, scene: &mut Scene, dt: Duration) -> usize {
        let mut returned = 0;
        for instance in scene.advance_returns(dt) {
            match self.return_to_pool(scene, instance) {
                Ok(DespawnOutcome::Returned) => returned += 1,
                Ok(DespawnOutcome::AlreadyInactive) => {}
                Err(err) => log::warn!("Delayed return of {:?} failed: {}", instance, err),
            }
        }
        returned
    }

    /// Grow the pool of `template` to at least `target` objects
    pub fn fill(&mut self, scene: &mut Scene, template: ObjectId, target: usize) -> PoolResult<()> {
        self.pool_entry(scene, template)?.fill(scene, target)
    }

    /// Add `amount` objects to the pool of `template`
    pub fn create_objects(&mut self, scene: &mut Scene, template: ObjectId, amount: usize) -> PoolResult<()> {
        self.pool_entry(scene, template)?.create_objects(scene, amount)
    }

    /// Forget destroyed objects in every pool, keeping the pools
    pub fn clear_pools(&mut self, scene: &Scene) {
        for pool in self.pools.values_mut() {
            pool.clear(scene);
        }
        log::debug!("Cleared {} pools", self.pools.len());
    }

    /// Destroy every pooled object and drop every pool
    pub fn purge_pools(&mut self, scene: &mut Scene) {
        for pool in self.pools.values_mut() {
            pool.purge(scene);
        }
        log::info!("Purged {} pools", self.pools.len());
        self.pools.clear();
    }

    /// Whether pooled objects are shown in the hierarchy
    pub fn pools_visible(&self) -> bool {
        self.pools_visible
    }

    /// Show or hide every pooled object, now and for pools created later
    pub fn set_pools_visible(&mut self, scene: &mut Scene, visible: bool) {
        self.pools_visible = visible;
        for pool in self.pools.values_mut() {
            pool.set_visible(scene, visible);
        }
    }

    /// Per-pool counts, sorted by template name
    pub fn summaries(&self, scene: &Scene) -> Vec<PoolSummary> {
        let mut summaries: Vec<_> = self
            .pools
            .values()
            .map(|pool| PoolSummary {
                template: pool.template(),
                name: scene
                    .get(pool.template())
                    .map_or_else(|| "<destroyed>".to_string(), |o| o.name().to_string()),
                active: pool.active_count(),
                inactive: pool.inactive_count(),
            })
            .collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        summaries
    }

    fn pool_entry(&mut self, scene: &mut Scene, template: ObjectId) -> PoolResult<&mut ObjectPool> {
        let visible = self.pools_visible;
        match self.pools.entry(template) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let pool = ObjectPool::with_visibility(scene, template, 0, visible)?;
                Ok(entry.insert(pool))
            }
        }
    }
}

impl LifecycleHandler for PoolRegistry {
    fn on_event(&mut self, scene: &mut Scene, event: &LifecycleEvent) -> bool {
        match event {
            LifecycleEvent::ProcessStarted => {
                self.pools.clear();
                self.pools_visible = self.config.pools_visible;
            }
            LifecycleEvent::SceneUnloaded { name } => {
                log::debug!("Scene '{}' unloaded, reconciling pools", name);
                self.clear_pools(scene);
            }
        }
        false
    }
}
