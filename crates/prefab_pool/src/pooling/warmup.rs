//! Warmup Driver
//!
//! Pre-fills pools before gameplay so the first spawns do not pay for cloning.
//! With a zero slice budget every entry is filled in a single [`Warmup::step`].
//! Otherwise each step stops once the budget is used up and the host calls
//! `step` again on a later frame:
//!
//! ```rust
//! use prefab_pool::prelude::*;
//! use std::time::Duration;
//!
//! let mut scene = Scene::new("boot");
//! let bullet = scene.add(ObjectBuilder::new("Bullet").persistent());
//! let mut registry = PoolRegistry::new();
//!
//! let mut warmup = Warmup::new(vec![WarmupEntry::new(bullet, 32)])
//!     .with_slice_budget(Duration::from_millis(2))
//!     .on_progress(|p| log::debug!("warmup {:.0}%", p * 100.0));
//!
//! while let WarmupStatus::Pending { .. } = warmup.step(&mut registry, &mut scene)? {
//!     // render a loading frame
//! }
//! assert_eq!(registry.pool_count(bullet), 32);
//! # Ok::<(), PoolError>(())
//! ```

use super::{PoolError, PoolRegistry, PoolResult};
use crate::core::config::WarmupConfig;
use crate::foundation::collections::ObjectId;
use crate::foundation::time::SliceTimer;
use crate::scene::Scene;
use std::fmt;
use std::time::Duration;

/// Fill the pool of `template` up to `amount` objects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarmupEntry {
    /// Template whose pool is filled
    pub template: ObjectId,
    /// Target pool size
    pub amount: usize,
}

impl WarmupEntry {
    /// Create an entry
    pub fn new(template: ObjectId, amount: usize) -> Self {
        Self { template, amount }
    }
}

/// Result of one warmup step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WarmupStatus {
    /// The slice budget ran out; call `step` again
    Pending {
        /// Fraction done, in [0, 1]
        progress: f32,
    },
    /// Every entry has been filled
    Complete,
}

/// Resumable pool pre-filler
pub struct Warmup {
    entries: Vec<WarmupEntry>,
    cursor: usize,
    slice_budget: Duration,
    on_progress: Option<Box<dyn FnMut(f32)>>,
    finished: bool,
}

impl fmt::Debug for Warmup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Warmup")
            .field("entries", &self.entries)
            .field("cursor", &self.cursor)
            .field("slice_budget", &self.slice_budget)
            .field("on_progress", &self.on_progress.is_some())
            .field("finished", &self.finished)
            .finish()
    }
}

impl Warmup {
    /// Create a driver that fills everything in one step
    pub fn new(entries: Vec<WarmupEntry>) -> Self {
        Self {
            entries,
            cursor: 0,
            slice_budget: Duration::ZERO,
            on_progress: None,
            finished: false,
        }
    }

    /// Resolve a configured manifest against the templates in `scene`
    pub fn from_config(scene: &Scene, config: &WarmupConfig) -> PoolResult<Self> {
        let entries = config
            .entries
            .iter()
            .map(|wanted| {
                scene
                    .find(&wanted.template)
                    .map(|template| WarmupEntry::new(template, wanted.amount))
                    .ok_or_else(|| PoolError::UnknownTemplate(wanted.template.clone()))
            })
            .collect::<PoolResult<Vec<_>>>()?;

        Ok(Self::new(entries).with_slice_budget(config.slice_budget()))
    }

    /// Limit how long a single step may run (zero = unlimited)
    pub fn with_slice_budget(mut self, budget: Duration) -> Self {
        self.slice_budget = budget;
        self
    }

    /// Report progress after every entry and at the end of every slice
    pub fn on_progress(mut self, callback: impl FnMut(f32) + 'static) -> Self {
        self.on_progress = Some(Box::new(callback));
        self
    }

    /// Whether every entry has been filled
    pub fn is_complete(&self) -> bool {
        self.cursor >= self.entries.len()
    }

    /// Fraction of entries done
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self) -> f32 {
        if self.entries.is_empty() {
            1.0
        } else {
            self.cursor as f32 / self.entries.len() as f32
        }
    }

    /// Fill pools until the slice budget runs out or all entries are done
    pub fn step(&mut self, registry: &mut PoolRegistry, scene: &mut Scene) -> PoolResult<WarmupStatus> {
        if self.finished {
            return Ok(WarmupStatus::Complete);
        }

        let slice = SliceTimer::start(self.slice_budget);
        while let Some(entry) = self.entries.get(self.cursor).copied() {
            // One object at a time so a large entry can span several slices.
            while slice.is_bounded() && registry.pool_count(entry.template) < entry.amount {
                let next = registry.pool_count(entry.template) + 1;
                registry.fill(scene, entry.template, next)?;

                if slice.is_exhausted() {
                    let progress = self.partial_progress(registry, entry);
                    self.report(progress);
                    return Ok(WarmupStatus::Pending { progress });
                }
            }
            // Unbounded slices fill the whole entry here; zero-sized entries still get a pool.
            registry.fill(scene, entry.template, entry.amount)?;
            self.cursor += 1;
            self.report(self.progress());
        }
        if self.entries.is_empty() {
            self.report(1.0);
        }
        self.finished = true;

        log::info!(
            "Warmup filled {} pools (last slice took {:?})",
            self.entries.len(),
            slice.elapsed()
        );
        Ok(WarmupStatus::Complete)
    }

    /// Step until complete, ignoring the slice budget's yields
    pub fn run_to_completion(&mut self, registry: &mut PoolRegistry, scene: &mut Scene) -> PoolResult<()> {
        while let WarmupStatus::Pending { .. } = self.step(registry, scene)? {}
        Ok(())
    }

    #[allow(clippy::cast_precision_loss)]
    fn partial_progress(&self, registry: &PoolRegistry, entry: WarmupEntry) -> f32 {
        let within = if entry.amount == 0 {
            1.0
        } else {
            (registry.pool_count(entry.template) as f32 / entry.amount as f32).min(1.0)
        };
        (self.cursor as f32 + within) / self.entries.len() as f32
    }

    fn report(&mut self, progress: f32) {
        if let Some(callback) = self.on_progress.as_mut() {
            callback(progress);
        }
    }
}
