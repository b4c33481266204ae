//! Per-template Object Pool
//!
//! Owns every clone of one template and recycles deactivated clones instead of
//! destroying them. Each clone lives in exactly one of three containers:
//!
//! ```text
//!   instantiate ──► fresh ──spawn──► active ──despawn──► available
//!                                      ▲                     │
//!                                      └───────spawn─────────┘
//! ```
//!
//! `fresh` holds clones that were never handed out, `available` holds clones
//! that were handed out at least once and came back. Both are served FIFO so
//! recycled clones wear evenly.

use super::{PoolError, PoolResult};
use crate::foundation::collections::ObjectId;
use crate::foundation::math::{Quat, Vec3};
use crate::scene::{Capabilities, Scene};
use std::collections::{HashMap, HashSet, VecDeque};

/// One clone tracked by a pool
///
/// Two items are equal when they refer to the same object.
#[derive(Debug, Clone, Copy)]
pub struct PooledItem {
    id: ObjectId,
    spawnable: bool,
}

impl PooledItem {
    /// Object this item refers to
    pub fn id(&self) -> ObjectId {
        self.id
    }
}

impl PartialEq for PooledItem {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PooledItem {}

impl std::hash::Hash for PooledItem {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Position and orientation applied to a spawned object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// World position
    pub position: Vec3,
    /// World orientation
    pub rotation: Quat,
}

impl Placement {
    /// Create a new placement
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }
}

/// Result of a successful despawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DespawnOutcome {
    /// The object was active and is now queued for reuse
    Returned,
    /// The object belongs to the pool but was already inactive; nothing changed
    AlreadyInactive,
}

/// Lifetime counters of a pool
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Objects handed out
    pub total_spawned: u64,
    /// Objects taken back
    pub total_despawned: u64,
    /// Clones created
    pub total_instantiated: u64,
    /// Largest number of simultaneously active objects
    pub peak_active: usize,
}

/// Pool of clones of a single template
#[derive(Debug)]
pub struct ObjectPool {
    template: ObjectId,
    capabilities: Capabilities,
    fresh: VecDeque<PooledItem>,
    available: VecDeque<PooledItem>,
    active: HashMap<ObjectId, PooledItem>,
    all: HashSet<ObjectId>,
    count: usize,
    visible: bool,
    stats: PoolStats,
}

impl ObjectPool {
    /// Create a pool holding `initial_count` inactive clones
    pub fn new(scene: &mut Scene, template: ObjectId, initial_count: usize) -> PoolResult<Self> {
        Self::with_visibility(scene, template, initial_count, true)
    }

    /// Create a pool whose clones are shown or hidden in the hierarchy
    pub fn with_visibility(
        scene: &mut Scene,
        template: ObjectId,
        initial_count: usize,
        visible: bool,
    ) -> PoolResult<Self> {
        if !scene.contains(template) {
            return Err(PoolError::MissingTemplate(template));
        }

        let mut pool = Self {
            template,
            capabilities: scene.capabilities(template),
            fresh: VecDeque::with_capacity(initial_count),
            available: VecDeque::new(),
            active: HashMap::new(),
            all: HashSet::with_capacity(initial_count),
            count: 0,
            visible,
            stats: PoolStats::default(),
        };
        pool.create_objects(scene, initial_count)?;

        log::debug!(
            "Created pool for template {:?} with {} objects ({:?})",
            template,
            initial_count,
            pool.capabilities
        );
        Ok(pool)
    }

    /// Create a pool and hand out its first object straight away
    ///
    /// At least one clone is created even when `initial_count` is zero. The
    /// returned object is active and, if `placement` is given, already placed.
    pub fn with_first_active(
        scene: &mut Scene,
        template: ObjectId,
        initial_count: usize,
        placement: Option<Placement>,
        visible: bool,
    ) -> PoolResult<(Self, ObjectId)> {
        let mut pool = Self::with_visibility(scene, template, initial_count.max(1), visible)?;
        let first = pool.spawn_with(scene, placement)?;
        Ok((pool, first))
    }

    /// Grow the pool to at least `target` objects
    pub fn fill(&mut self, scene: &mut Scene, target: usize) -> PoolResult<()> {
        if target > self.count {
            self.create_objects(scene, target - self.count)?;
        }
        Ok(())
    }

    /// Add `amount` inactive clones
    ///
    /// An active template is switched off while cloning so the clones start
    /// inactive without running their creation hooks, then switched back on.
    pub fn create_objects(&mut self, scene: &mut Scene, amount: usize) -> PoolResult<()> {
        if amount == 0 {
            return Ok(());
        }
        if !scene.contains(self.template) {
            return Err(PoolError::MissingTemplate(self.template));
        }

        let template_was_active = scene.is_active(self.template);
        if template_was_active {
            scene.set_active(self.template, false);
        }

        let created: PoolResult<()> = (0..amount).try_for_each(|_| {
            let item = self.instantiate(scene)?;
            self.fresh.push_back(item);
            Ok(())
        });

        if template_was_active {
            scene.set_active(self.template, true);
        }
        created
    }

    /// Hand out an object
    pub fn spawn(&mut self, scene: &mut Scene) -> PoolResult<ObjectId> {
        self.spawn_with(scene, None)
    }

    /// Hand out an object at the given position and orientation
    pub fn spawn_at(&mut self, scene: &mut Scene, position: Vec3, rotation: Quat) -> PoolResult<ObjectId> {
        self.spawn_with(scene, Some(Placement::new(position, rotation)))
    }

    /// Hand out an object, optionally placing it
    ///
    /// Reuses an available object first, then a fresh one, and only clones
    /// the template when both queues are empty.
    pub fn spawn_with(&mut self, scene: &mut Scene, placement: Option<Placement>) -> PoolResult<ObjectId> {
        let (item, first_use) = self.next_item(scene)?;

        if let Some(placement) = placement {
            scene.set_pose(item.id, placement.position, placement.rotation);
        }
        // Creation hooks run once on the raw object, before any behaviour sees it.
        if first_use {
            scene.set_active(item.id, true);
        }

        self.active.insert(item.id, item);
        Self::activate(scene, item);

        // A behaviour may move the object while activating; the caller's pose wins.
        if let (Some(placement), true) = (placement, item.spawnable) {
            scene.set_pose(item.id, placement.position, placement.rotation);
        }

        self.stats.total_spawned += 1;
        self.stats.peak_active = self.stats.peak_active.max(self.active.len());
        log::trace!("Spawned {:?} from template {:?}", item.id, self.template);
        Ok(item.id)
    }

    /// Take an object back
    ///
    /// Objects that belong to the pool but are not active are left alone.
    /// Objects the pool never created are rejected.
    pub fn despawn(&mut self, scene: &mut Scene, instance: ObjectId) -> PoolResult<DespawnOutcome> {
        if let Some(item) = self.active.remove(&instance) {
            // A pending self-return must not fire on the object's next holder.
            scene.cancel_return(instance);
            Self::deactivate(scene, item);
            self.available.push_back(item);
            self.stats.total_despawned += 1;
            log::trace!("Despawned {:?} to template {:?}", instance, self.template);
            Ok(DespawnOutcome::Returned)
        } else if self.all.contains(&instance) {
            log::warn!(
                "Ignoring despawn of {:?}: already inactive in pool of {:?}",
                instance,
                self.template
            );
            Ok(DespawnOutcome::AlreadyInactive)
        } else {
            Err(PoolError::NotOwned {
                template: self.template,
                instance,
            })
        }
    }

    /// Forget objects that were destroyed outside the pool
    ///
    /// Live objects are untouched, whatever their state.
    pub fn clear(&mut self, scene: &Scene) {
        self.fresh.retain(|item| scene.contains(item.id));
        self.available.retain(|item| scene.contains(item.id));
        self.active.retain(|id, _| scene.contains(*id));
        self.all.retain(|id| scene.contains(*id));

        let previous = self.count;
        self.count = self.fresh.len() + self.available.len() + self.active.len();
        if previous != self.count {
            log::debug!(
                "Pool of {:?} dropped {} destroyed objects",
                self.template,
                previous - self.count
            );
        }
    }

    /// Destroy every object this pool owns
    pub fn purge(&mut self, scene: &mut Scene) {
        let destroyed = self
            .all
            .drain()
            .filter(|&id| scene.destroy(id))
            .count();
        self.fresh.clear();
        self.available.clear();
        self.active.clear();
        self.count = 0;
        log::debug!("Purged pool of {:?}: destroyed {} objects", self.template, destroyed);
    }

    /// Show or hide every owned object in the hierarchy
    ///
    /// Applies to objects created later as well. Active state is unaffected.
    pub fn set_visible(&mut self, scene: &mut Scene, visible: bool) {
        self.visible = visible;
        for &id in &self.all {
            scene.set_hidden(id, !visible);
        }
    }

    /// Template this pool clones
    pub fn template(&self) -> ObjectId {
        self.template
    }

    /// Capabilities cached from the template
    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Total objects owned (fresh + available + active)
    pub fn count(&self) -> usize {
        self.count
    }

    /// Objects currently handed out
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Objects waiting to be handed out (fresh + available)
    pub fn inactive_count(&self) -> usize {
        self.fresh.len() + self.available.len()
    }

    /// Objects never handed out
    pub fn fresh_count(&self) -> usize {
        self.fresh.len()
    }

    /// Objects handed out before and returned
    pub fn available_count(&self) -> usize {
        self.available.len()
    }

    /// Whether the pool created `id`
    pub fn owns(&self, id: ObjectId) -> bool {
        self.all.contains(&id)
    }

    /// Whether `id` is currently handed out by this pool
    pub fn is_active(&self, id: ObjectId) -> bool {
        self.active.contains_key(&id)
    }

    /// Objects currently handed out, in no particular order
    pub fn active_objects(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.active.keys().copied()
    }

    /// Whether owned objects are shown in the hierarchy
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Lifetime counters
    pub fn stats(&self) -> &PoolStats {
        &self.stats
    }

    fn instantiate(&mut self, scene: &mut Scene) -> PoolResult<PooledItem> {
        let id = scene
            .instantiate(self.template)
            .ok_or(PoolError::MissingTemplate(self.template))?;
        if !self.visible {
            scene.set_hidden(id, true);
        }

        self.all.insert(id);
        self.count += 1;
        self.stats.total_instantiated += 1;
        Ok(PooledItem {
            id,
            spawnable: self.capabilities.contains(Capabilities::SPAWNABLE),
        })
    }

    /// Next object to hand out and whether it has never been used
    fn next_item(&mut self, scene: &mut Scene) -> PoolResult<(PooledItem, bool)> {
        while let Some(item) = self.available.pop_front() {
            if scene.contains(item.id) {
                return Ok((item, false));
            }
            self.forget(item.id);
        }
        while let Some(item) = self.fresh.pop_front() {
            if scene.contains(item.id) {
                return Ok((item, true));
            }
            self.forget(item.id);
        }

        self.create_objects(scene, 1)?;
        self.fresh
            .pop_front()
            .map(|item| (item, true))
            .ok_or(PoolError::MissingTemplate(self.template))
    }

    /// Drop a destroyed item popped from a queue; the only `count` decrease outside clear and purge
    fn forget(&mut self, id: ObjectId) {
        if self.all.remove(&id) {
            self.count -= 1;
        }
        log::debug!("Skipped destroyed object {:?} in pool of {:?}", id, self.template);
    }

    fn activate(scene: &mut Scene, item: PooledItem) {
        if item.spawnable {
            if let Err(err) = scene.notify_spawn(item.id, true) {
                log::error!("Activation of {:?} failed: {}", item.id, err);
            }
        } else {
            scene.set_active(item.id, true);
        }
    }

    fn deactivate(scene: &mut Scene, item: PooledItem) {
        if item.spawnable {
            if let Err(err) = scene.notify_spawn(item.id, false) {
                log::error!("Deactivation of {:?} failed: {}", item.id, err);
            }
        } else {
            scene.set_active(item.id, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{CapabilityError, ObjectBuilder, ObjectState, Spawnable};
    use approx::assert_relative_eq;

    fn offscreen() -> Vec3 {
        Vec3::new(10_000.0, 10_000.0, 0.0)
    }

    /// Parks itself off-screen when returned and comes back when spawned
    #[derive(Debug, Clone, Default)]
    struct Parking {
        home: Option<Vec3>,
    }

    impl Spawnable for Parking {
        fn on_spawn(&mut self, state: &mut ObjectState, active: bool) -> Result<(), CapabilityError> {
            if active {
                if let Some(home) = self.home.take() {
                    state.transform.position = home;
                }
            } else {
                self.home = Some(state.transform.position);
                state.transform.position = offscreen();
            }
            Ok(())
        }
    }

    #[derive(Debug, Clone)]
    struct Broken;

    impl Spawnable for Broken {
        fn on_spawn(&mut self, _state: &mut ObjectState, _active: bool) -> Result<(), CapabilityError> {
            Err(CapabilityError::new("broken on purpose"))
        }
    }

    fn assert_consistent(pool: &ObjectPool) {
        assert_eq!(
            pool.count(),
            pool.fresh_count() + pool.available_count() + pool.active_count()
        );
        assert!(pool.count() <= pool.all.len());
    }

    fn plain_scene() -> (Scene, ObjectId) {
        let mut scene = Scene::new("test");
        let template = scene.add(ObjectBuilder::new("Bullet").persistent());
        (scene, template)
    }

    #[test]
    fn test_new_pool_holds_inactive_fresh_objects() {
        let (mut scene, template) = plain_scene();
        let pool = ObjectPool::new(&mut scene, template, 3).expect("Should create pool");

        assert_eq!(pool.count(), 3);
        assert_eq!(pool.fresh_count(), 3);
        assert_eq!(pool.active_count(), 0);
        for item in &pool.fresh {
            let state = scene.get(item.id).expect("Clone should exist").state();
            assert!(!state.is_active());
            assert_eq!(state.awake_count(), 0);
        }
        assert!(scene.is_active(template), "Template state must be restored");
        assert_consistent(&pool);
    }

    #[test]
    fn test_new_pool_with_missing_template() {
        let (mut scene, template) = plain_scene();
        scene.destroy(template);
        let result = ObjectPool::new(&mut scene, template, 2);
        assert_eq!(result.err(), Some(PoolError::MissingTemplate(template)));
    }

    #[test]
    fn test_spawn_returns_active_tracked_object() {
        let (mut scene, template) = plain_scene();
        let mut pool = ObjectPool::new(&mut scene, template, 1).expect("Should create pool");

        let id = pool.spawn(&mut scene).expect("Should spawn");

        assert!(scene.is_active(id));
        assert!(pool.is_active(id));
        assert_eq!(pool.fresh_count(), 0);
        assert_eq!(scene.get(id).map(|o| o.state().awake_count()), Some(1));
        assert_consistent(&pool);
    }

    #[test]
    fn test_spawn_serves_fresh_objects_in_creation_order() {
        let (mut scene, template) = plain_scene();
        let mut pool = ObjectPool::new(&mut scene, template, 3).expect("Should create pool");
        let expected: Vec<_> = pool.fresh.iter().map(PooledItem::id).collect();

        let spawned: Vec<_> = (0..3)
            .map(|_| pool.spawn(&mut scene).expect("Should spawn"))
            .collect();

        assert_eq!(spawned, expected);
    }

    #[test]
    fn test_spawn_prefers_available_and_recycles_fifo() {
        let (mut scene, template) = plain_scene();
        let mut pool = ObjectPool::new(&mut scene, template, 4).expect("Should create pool");

        let a = pool.spawn(&mut scene).expect("Should spawn a");
        let b = pool.spawn(&mut scene).expect("Should spawn b");
        pool.despawn(&mut scene, b).expect("Should despawn b");
        pool.despawn(&mut scene, a).expect("Should despawn a");

        assert_eq!(pool.spawn(&mut scene).expect("Should spawn"), b);
        assert_eq!(pool.spawn(&mut scene).expect("Should spawn"), a);
        assert_eq!(pool.fresh_count(), 2, "Fresh objects are untouched while reuse is possible");
        assert_consistent(&pool);
    }

    #[test]
    fn test_spawn_despawn_spawn_reuses_same_object() {
        let (mut scene, template) = plain_scene();
        let mut pool = ObjectPool::new(&mut scene, template, 0).expect("Should create pool");

        let first = pool.spawn(&mut scene).expect("Should spawn");
        assert_eq!(
            pool.despawn(&mut scene, first),
            Ok(DespawnOutcome::Returned)
        );
        assert!(!scene.is_active(first));

        let second = pool.spawn(&mut scene).expect("Should spawn again");
        assert_eq!(first, second);
        assert_eq!(pool.count(), 1);
        assert_eq!(scene.get(second).map(|o| o.state().awake_count()), Some(1));
    }

    #[test]
    fn test_spawn_on_empty_pool_instantiates() {
        let (mut scene, template) = plain_scene();
        let mut pool = ObjectPool::new(&mut scene, template, 0).expect("Should create pool");

        let id = pool.spawn(&mut scene).expect("Should spawn");

        assert_eq!(pool.count(), 1);
        assert_eq!(pool.stats().total_instantiated, 1);
        assert_eq!(scene.origin(id), Some(template));
        let state = scene.get(id).expect("Clone should exist").state();
        assert_eq!(state.awake_count(), 1);
        assert_eq!(state.enable_count(), 1);
    }

    #[test]
    fn test_spawn_at_applies_exact_pose() {
        let (mut scene, template) = plain_scene();
        let mut pool = ObjectPool::new(&mut scene, template, 1).expect("Should create pool");
        let position = Vec3::new(3.5, -2.0, 7.25);
        let rotation = Quat::from_euler_angles(0.3, 1.2, -0.4);

        let id = pool.spawn_at(&mut scene, position, rotation).expect("Should spawn");
        let transform = scene.transform(id).expect("Should have transform");
        assert_eq!(transform.position, position);
        assert_eq!(transform.rotation, rotation);

        pool.despawn(&mut scene, id).expect("Should despawn");
        let again = pool
            .spawn_at(&mut scene, Vec3::zeros(), Quat::identity())
            .expect("Should spawn again");
        assert_eq!(again, id);
        assert_eq!(scene.transform(id).map(|t| t.position), Some(Vec3::zeros()));
    }

    #[test]
    fn test_spawn_at_wins_over_behaviour_placement() {
        let mut scene = Scene::new("test");
        let template = scene.add(ObjectBuilder::new("Drone").with_spawnable(Parking::default()));
        let mut pool = ObjectPool::new(&mut scene, template, 1).expect("Should create pool");

        let id = pool.spawn(&mut scene).expect("Should spawn");
        pool.despawn(&mut scene, id).expect("Should despawn");

        let target = Vec3::new(-4.0, 1.0, 9.0);
        let rotation = Quat::from_euler_angles(0.0, 0.5, 0.0);
        pool.spawn_at(&mut scene, target, rotation).expect("Should spawn");

        let transform = scene.transform(id).expect("Should have transform");
        assert_eq!(transform.position, target);
        assert_eq!(transform.rotation, rotation);
    }

    #[test]
    fn test_spawnable_behaviour_replaces_default_toggle() {
        let mut scene = Scene::new("test");
        let home = Vec3::new(1.0, 2.0, 0.0);
        let template = scene.add(
            ObjectBuilder::new("Drone")
                .with_pose(home, Quat::identity())
                .with_spawnable(Parking::default()),
        );
        let mut pool = ObjectPool::new(&mut scene, template, 1).expect("Should create pool");
        assert!(pool.capabilities().contains(Capabilities::SPAWNABLE));

        let id = pool.spawn(&mut scene).expect("Should spawn");
        for _ in 0..3 {
            assert_relative_eq!(scene.transform(id).expect("alive").position, home);
            pool.despawn(&mut scene, id).expect("Should despawn");
            assert_relative_eq!(scene.transform(id).expect("alive").position, offscreen());
            assert!(scene.is_active(id), "Behaviour objects stay enabled while parked");
            assert_eq!(pool.spawn(&mut scene).expect("Should respawn"), id);
        }

        let state = scene.get(id).expect("alive").state();
        assert_eq!(state.awake_count(), 1);
        assert_eq!(state.enable_count(), 1, "Default toggle runs only on first use");
        assert_eq!(state.disable_count(), 0);
    }

    #[test]
    fn test_failing_behaviour_keeps_pool_consistent() {
        let mut scene = Scene::new("test");
        let template = scene.add(ObjectBuilder::new("Glitch").with_spawnable(Broken));
        let mut pool = ObjectPool::new(&mut scene, template, 2).expect("Should create pool");

        let id = pool.spawn(&mut scene).expect("Failing hook must not fail spawn");
        assert!(pool.is_active(id));
        assert_consistent(&pool);

        assert_eq!(pool.despawn(&mut scene, id), Ok(DespawnOutcome::Returned));
        assert_eq!(pool.available_count(), 1);
        assert_consistent(&pool);
    }

    #[test]
    fn test_despawn_of_fresh_object_is_noop() {
        let (mut scene, template) = plain_scene();
        let mut pool = ObjectPool::new(&mut scene, template, 2).expect("Should create pool");
        let fresh = pool.fresh[0].id;

        assert_eq!(
            pool.despawn(&mut scene, fresh),
            Ok(DespawnOutcome::AlreadyInactive)
        );
        assert_eq!(pool.available_count(), 0);
        assert_eq!(pool.fresh_count(), 2);
        assert_consistent(&pool);
    }

    #[test]
    fn test_double_despawn_does_not_duplicate() {
        let (mut scene, template) = plain_scene();
        let mut pool = ObjectPool::new(&mut scene, template, 1).expect("Should create pool");
        let id = pool.spawn(&mut scene).expect("Should spawn");

        pool.despawn(&mut scene, id).expect("Should despawn");
        assert_eq!(
            pool.despawn(&mut scene, id),
            Ok(DespawnOutcome::AlreadyInactive)
        );
        assert_eq!(pool.available_count(), 1);
        assert_eq!(pool.stats().total_despawned, 1);
        assert_consistent(&pool);
    }

    #[test]
    fn test_despawn_of_foreign_object_fails() {
        let (mut scene, template) = plain_scene();
        let mut pool = ObjectPool::new(&mut scene, template, 1).expect("Should create pool");
        let stranger = scene.add(ObjectBuilder::new("Stranger"));

        assert_eq!(
            pool.despawn(&mut scene, stranger),
            Err(PoolError::NotOwned {
                template,
                instance: stranger
            })
        );
        assert!(scene.is_active(stranger));
    }

    #[test]
    fn test_fill_never_shrinks() {
        let (mut scene, template) = plain_scene();
        let mut pool = ObjectPool::new(&mut scene, template, 5).expect("Should create pool");

        pool.fill(&mut scene, 3).expect("Should fill");
        assert_eq!(pool.count(), 5);

        pool.fill(&mut scene, 8).expect("Should fill");
        assert_eq!(pool.count(), 8);
        assert_eq!(pool.fresh_count(), 8);

        pool.fill(&mut scene, 8).expect("Should fill");
        assert_eq!(pool.count(), 8);
        assert_consistent(&pool);
    }

    #[test]
    fn test_fill_keeps_inactive_template_inactive() {
        let mut scene = Scene::new("test");
        let template = scene.add(ObjectBuilder::new("Dormant").active(false));
        let mut pool = ObjectPool::new(&mut scene, template, 0).expect("Should create pool");

        pool.fill(&mut scene, 2).expect("Should fill");

        assert!(!scene.is_active(template));
        assert_eq!(scene.get(template).map(|o| o.state().enable_count()), Some(0));
    }

    #[test]
    fn test_create_objects_grows_by_amount() {
        let (mut scene, template) = plain_scene();
        let mut pool = ObjectPool::new(&mut scene, template, 4).expect("Should create pool");

        pool.create_objects(&mut scene, 3).expect("Should create");
        assert_eq!(pool.count(), 7);
    }

    #[test]
    fn test_clear_drops_only_destroyed_objects() {
        let (mut scene, template) = plain_scene();
        let mut pool = ObjectPool::new(&mut scene, template, 3).expect("Should create pool");
        let kept = pool.spawn(&mut scene).expect("Should spawn");
        let lost = pool.spawn(&mut scene).expect("Should spawn");
        scene.destroy(lost);
        let lost_fresh = pool.fresh[0].id;
        scene.destroy(lost_fresh);

        pool.clear(&scene);

        assert_eq!(pool.count(), 1);
        assert!(pool.is_active(kept));
        assert!(scene.is_active(kept));
        assert!(!pool.owns(lost));
        assert!(!pool.owns(lost_fresh));
        assert_consistent(&pool);
    }

    #[test]
    fn test_spawn_skips_destroyed_objects() {
        let (mut scene, template) = plain_scene();
        let mut pool = ObjectPool::new(&mut scene, template, 2).expect("Should create pool");
        let doomed = pool.fresh[0].id;
        let survivor = pool.fresh[1].id;
        scene.destroy(doomed);

        assert_eq!(pool.spawn(&mut scene).expect("Should spawn"), survivor);
        assert_eq!(pool.count(), 1);
        assert!(!pool.owns(doomed));
        assert_consistent(&pool);
    }

    #[test]
    fn test_purge_destroys_everything() {
        let (mut scene, template) = plain_scene();
        let mut pool = ObjectPool::new(&mut scene, template, 2).expect("Should create pool");
        let active = pool.spawn(&mut scene).expect("Should spawn");
        let returned = pool.spawn(&mut scene).expect("Should spawn");
        pool.despawn(&mut scene, returned).expect("Should despawn");
        pool.create_objects(&mut scene, 2).expect("Should create");

        pool.purge(&mut scene);

        assert_eq!(pool.count(), 0);
        assert_eq!(pool.inactive_count(), 0);
        assert_eq!(pool.active_count(), 0);
        assert!(!scene.contains(active));
        assert!(!scene.contains(returned));
        assert_eq!(scene.len(), 1, "Only the template survives");
    }

    #[test]
    fn test_first_active_creates_at_least_one() {
        let (mut scene, template) = plain_scene();
        let position = Vec3::new(0.0, 5.0, 0.0);
        let (pool, first) = ObjectPool::with_first_active(
            &mut scene,
            template,
            0,
            Some(Placement::new(position, Quat::identity())),
            true,
        )
        .expect("Should create pool");

        assert_eq!(pool.count(), 1);
        assert!(pool.is_active(first));
        assert!(scene.is_active(first));
        assert_eq!(scene.transform(first).map(|t| t.position), Some(position));

        let (pool, _) = ObjectPool::with_first_active(&mut scene, template, 4, None, true)
            .expect("Should create pool");
        assert_eq!(pool.count(), 4);
        assert_eq!(pool.active_count(), 1);
        assert_eq!(pool.fresh_count(), 3);
    }

    #[test]
    fn test_visibility_marks_objects_without_activation() {
        let (mut scene, template) = plain_scene();
        let mut pool = ObjectPool::new(&mut scene, template, 1).expect("Should create pool");
        let active = pool.spawn(&mut scene).expect("Should spawn");

        pool.set_visible(&mut scene, false);
        pool.create_objects(&mut scene, 1).expect("Should create");
        let later = pool.fresh[0].id;

        assert!(scene.is_hidden(active));
        assert!(scene.is_active(active));
        assert!(scene.is_hidden(later));
        assert!(!scene.is_hidden(template));

        pool.set_visible(&mut scene, true);
        assert!(!scene.is_hidden(active));
        assert!(!scene.is_hidden(later));
    }

    #[test]
    fn test_stats_track_peak() {
        let (mut scene, template) = plain_scene();
        let mut pool = ObjectPool::new(&mut scene, template, 0).expect("Should create pool");
        let a = pool.spawn(&mut scene).expect("Should spawn");
        let _b = pool.spawn(&mut scene).expect("Should spawn");
        pool.despawn(&mut scene, a).expect("Should despawn");
        pool.spawn(&mut scene).expect("Should spawn");

        let stats = pool.stats();
        assert_eq!(stats.total_spawned, 3);
        assert_eq!(stats.total_despawned, 1);
        assert_eq!(stats.total_instantiated, 2);
        assert_eq!(stats.peak_active, 2);
    }
}
