//! Specialized collection types

use slotmap::new_key_type;
use std::marker::PhantomData;

pub use slotmap::SlotMap;

new_key_type! {
    /// Stable identity of an object living in a [`Scene`](crate::scene::Scene).
    ///
    /// Keys are never reused for a live object, so two objects with identical
    /// contents still have distinct ids.
    pub struct ObjectId;
}

/// Handle-based map using slot map for stable references
pub type HandleMap<T> = SlotMap<ObjectId, T>;

/// Typed handle for type-safe references to an object's behaviour
#[derive(Debug)]
pub struct TypedHandle<T> {
    id: ObjectId,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> TypedHandle<T> {
    /// Create a new typed handle from an object id
    pub fn new(id: ObjectId) -> Self {
        Self {
            id,
            _phantom: PhantomData,
        }
    }
    
    /// Get the underlying object id
    pub fn id(&self) -> ObjectId {
        self.id
    }
}

// Manual impls so `T` itself does not need to be Clone/Eq.
impl<T> Clone for TypedHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TypedHandle<T> {}

impl<T> PartialEq for TypedHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for TypedHandle<T> {}

impl<T> std::hash::Hash for TypedHandle<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
