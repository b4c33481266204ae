//! Pool demo application
//!
//! Runs a headless asteroid field: warms the pools up over a few loading
//! frames, then fires bullets that return themselves after a short lifetime
//! while asteroids are recycled as they get destroyed. Finishes with a scene
//! change and a purge.
//!
//! Usage: `pool_demo [config.toml|config.ron]`

use prefab_pool::foundation::logging;
use prefab_pool::prelude::*;
use rand::Rng;
use std::time::Duration;

/// Simulated frame length used for bullet lifetimes
const FRAME_TIME: Duration = Duration::from_millis(16);
const BULLET_LIFETIME: Duration = Duration::from_millis(250);
const GAMEPLAY_FRAMES: u64 = 120;
const FIRE_INTERVAL: u64 = 5;
const ASTEROID_FIELD: usize = 12;

#[derive(thiserror::Error, Debug)]
enum DemoError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("pool error: {0}")]
    Pool(#[from] PoolError),
    #[error("scene error: {0}")]
    Scene(#[from] SceneError),
}

/// Asteroid behaviour: drifts off-screen when despawned instead of disabling
#[derive(Debug, Clone, Default)]
struct Asteroid {
    launches: u32,
    recycled: u32,
}

impl Spawnable for Asteroid {
    fn on_spawn(&mut self, state: &mut ObjectState, active: bool) -> Result<(), CapabilityError> {
        if active {
            self.launches += 1;
        } else {
            self.recycled += 1;
            state.transform.position = Vec3::new(10_000.0, 10_000.0, 0.0);
        }
        Ok(())
    }
}

struct PoolDemoApp {
    scene: Scene,
    pools: PoolRegistry,
    events: LifecycleQueue,
    config: PoolConfig,
    timer: Timer,
    bullet: ObjectId,
    asteroid: TypedHandle<Asteroid>,
    asteroids: Vec<ObjectId>,
}

impl PoolDemoApp {
    fn new(config: PoolConfig) -> Self {
        let mut scene = Scene::new("asteroid_field");
        let bullet = scene.add(ObjectBuilder::new("Bullet").persistent().self_returning());
        let asteroid = scene.add(
            ObjectBuilder::new("Asteroid")
                .persistent()
                .active(false)
                .with_spawnable(Asteroid::default()),
        );

        Self {
            scene,
            pools: PoolRegistry::with_config(config.clone()),
            events: LifecycleQueue::new(),
            config,
            timer: Timer::new(),
            bullet,
            asteroid: TypedHandle::new(asteroid),
            asteroids: Vec::new(),
        }
    }

    fn run(&mut self) -> Result<(), DemoError> {
        self.events.send(LifecycleEvent::ProcessStarted);
        self.dispatch_events();

        self.warm_up()?;
        self.play()?;
        self.change_scene();

        for summary in self.pools.summaries(&self.scene) {
            log::info!(
                "Pool '{}': {} active, {} inactive",
                summary.name,
                summary.active,
                summary.inactive
            );
        }

        self.pools.purge_pools(&mut self.scene);
        log::info!("Scene holds {} objects after purge", self.scene.len());
        Ok(())
    }

    fn warm_up(&mut self) -> Result<(), DemoError> {
        let warmup = if self.config.warmup.entries.is_empty() {
            Warmup::new(vec![
                WarmupEntry::new(self.bullet, 32),
                WarmupEntry::new(self.asteroid.id(), ASTEROID_FIELD),
            ])
            .with_slice_budget(Duration::from_micros(50))
        } else {
            Warmup::from_config(&self.scene, &self.config.warmup)?
        };
        let mut warmup = warmup.on_progress(|progress| log::debug!("Warmup {:.0}%", progress * 100.0));

        let mut loading_frames = 0;
        while let WarmupStatus::Pending { progress } = warmup.step(&mut self.pools, &mut self.scene)? {
            loading_frames += 1;
            log::trace!("Loading frame {} at {:.2}", loading_frames, progress);
        }
        log::info!("Warmup finished after {} loading frames", loading_frames + 1);
        Ok(())
    }

    fn play(&mut self) -> Result<(), DemoError> {
        let mut rng = rand::thread_rng();

        for _ in 0..ASTEROID_FIELD {
            let rock = self.pools.spawn_typed(&mut self.scene, self.asteroid)?;
            let position = Vec3::new(rng.gen_range(-50.0..50.0), rng.gen_range(-50.0..50.0), 0.0);
            self.scene.set_pose(rock.id(), position, Quat::identity());
            self.asteroids.push(rock.id());
        }

        while self.timer.frame_count() < GAMEPLAY_FRAMES {
            self.timer.update();
            let frame = self.timer.frame_count();

            if frame % FIRE_INTERVAL == 0 {
                let heading = Quat::from_euler_angles(0.0, 0.0, rng.gen_range(0.0..std::f32::consts::TAU));
                let shot = self.pools.spawn_at(&mut self.scene, self.bullet, Vec3::zeros(), heading)?;
                self.scene.request_return(shot, Some(BULLET_LIFETIME))?;
            }

            // Occasionally a bullet hits and the asteroid respawns elsewhere.
            if rng.gen_bool(0.1) && !self.asteroids.is_empty() {
                let hit = self.asteroids.swap_remove(rng.gen_range(0..self.asteroids.len()));
                self.pools.despawn(&mut self.scene, self.asteroid.id(), hit)?;

                let position = Vec3::new(rng.gen_range(-50.0..50.0), 60.0, 0.0);
                let rock = self.pools.spawn_at(&mut self.scene, self.asteroid.id(), position, Quat::identity())?;
                self.asteroids.push(rock);
            }

            let returned = self.pools.update(&mut self.scene, FRAME_TIME);
            if returned > 0 {
                log::trace!("Frame {}: {} bullets returned", frame, returned);
            }
        }

        let (launches, recycled) = self
            .asteroids
            .iter()
            .filter_map(|&id| self.scene.behaviour::<Asteroid>(id))
            .fold((0, 0), |(l, r), asteroid| (l + asteroid.launches, r + asteroid.recycled));
        log::info!(
            "Played {} frames ({:?} last frame), live asteroids launched {} times, recycled {} times",
            self.timer.frame_count(),
            self.timer.delta(),
            launches,
            recycled
        );
        if let Some(pool) = self.pools.pool(self.bullet) {
            log::info!("Bullet pool stats: {:?}", pool.stats());
        }
        Ok(())
    }

    fn change_scene(&mut self) {
        let destroyed = self.scene.unload();
        log::info!("Scene change destroyed {} objects", destroyed);
        self.asteroids.clear();

        self.events.send(LifecycleEvent::SceneUnloaded {
            name: self.scene.name().to_string(),
        });
        self.dispatch_events();
    }

    fn dispatch_events(&mut self) {
        self.events
            .dispatch(&mut self.scene, &mut [&mut self.pools as &mut dyn LifecycleHandler]);
    }
}

fn load_config() -> Result<PoolConfig, DemoError> {
    let config = match std::env::args().nth(1) {
        Some(path) => PoolConfig::load_from_file(&path)?,
        None => PoolConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    logging::init_with_level(&config.log_level);

    log::info!("Starting pool demo");

    let mut app = PoolDemoApp::new(config);
    match app.run() {
        Ok(()) => {
            log::info!("Pool demo completed successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Pool demo failed: {}", e);
            Err(e.into())
        }
    }
}
