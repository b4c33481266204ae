//! Lifecycle events from the host
//!
//! The host reports process start and scene unloads; interested systems (the
//! pool registry) implement [`LifecycleHandler`]. Events are queued and then
//! dispatched in order to every handler until one consumes them.

use crate::scene::Scene;
use std::collections::VecDeque;

/// Lifecycle notification from the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// The process started; systems reset to their initial state
    ProcessStarted,
    /// A scene finished unloading and its objects were destroyed
    SceneUnloaded {
        /// Name of the scene that went away
        name: String,
    },
}

/// Receiver of lifecycle events
///
/// Returns true if the event was consumed (stops forwarding).
pub trait LifecycleHandler {
    /// Handle an event, return true if consumed
    fn on_event(&mut self, scene: &mut Scene, event: &LifecycleEvent) -> bool;
}

/// Queue of lifecycle events waiting to be delivered
#[derive(Debug, Default)]
pub struct LifecycleQueue {
    queue: VecDeque<LifecycleEvent>,
}

impl LifecycleQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event for the next dispatch
    pub fn send(&mut self, event: LifecycleEvent) {
        self.queue.push_back(event);
    }

    /// Number of queued events
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether nothing is queued
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Deliver every queued event, returning how many were delivered
    pub fn dispatch(&mut self, scene: &mut Scene, handlers: &mut [&mut dyn LifecycleHandler]) -> usize {
        let mut delivered = 0;
        while let Some(event) = self.queue.pop_front() {
            log::debug!("Dispatching lifecycle event {:?}", event);
            for handler in handlers.iter_mut() {
                if handler.on_event(scene, &event) {
                    break;
                }
            }
            delivered += 1;
        }
        delivered
    }
}
