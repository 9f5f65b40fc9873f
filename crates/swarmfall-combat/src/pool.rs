//! Entity pool: leases and reclaims simulation entities without reallocating.
//!
//! Instances are built once (at warm-up or when the pool runs dry) and then
//! recycled. Callers hold a generational `PoolHandle`; every release bumps the
//! slot generation, so a handle kept past its release can never reach the
//! next lease of the same slot.
//!
//! All operations complete within the call, so interleaved acquire/release
//! from many ability runs in one tick cannot corrupt the free list.

use std::fmt;

use serde::{Deserialize, Serialize};

use swarmfall_core::error::{ConfigError, Result};

/// An object that can live in an `EntityPool`.
pub trait Poolable {
    /// Bring the instance back to a fresh state. Called on every lease.
    fn reset(&mut self);

    /// Called when the instance returns to the free list.
    fn on_release(&mut self) {}
}

/// Generational handle to a pooled instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoolHandle {
    pub index: u32,
    pub generation: u32,
}

impl fmt::Display for PoolHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}g{}", self.index, self.generation)
    }
}

/// Builds new instances when the pool warms up or grows.
pub type Factory<T> = Box<dyn Fn() -> T + Send + Sync>;

struct Slot<T> {
    /// `None` once the instance was destroyed out of band.
    item: Option<T>,
    generation: u32,
    leased: bool,
}

/// Builder for `EntityPool`. A pool without a factory cannot exist.
pub struct PoolBuilder<T> {
    name: &'static str,
    warm: usize,
    factory: Option<Factory<T>>,
}

impl<T: Poolable> PoolBuilder<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            warm: 0,
            factory: None,
        }
    }

    /// Number of instances built up front.
    pub fn warm(mut self, count: usize) -> Self {
        self.warm = count;
        self
    }

    pub fn factory(mut self, factory: impl Fn() -> T + Send + Sync + 'static) -> Self {
        self.factory = Some(Box::new(factory));
        self
    }

    /// Build and warm the pool. Fails if no factory was configured.
    pub fn build(self) -> Result<EntityPool<T>> {
        let factory = self
            .factory
            .ok_or(ConfigError::MissingFactory { pool: self.name })?;

        let mut slots = Vec::with_capacity(self.warm);
        for _ in 0..self.warm {
            slots.push(Slot {
                item: Some(factory()),
                generation: 0,
                leased: false,
            });
        }
        // Reverse order so the lowest index is leased first.
        let free = (0..self.warm as u32).rev().collect();

        tracing::debug!(pool = self.name, warm = self.warm, "pool warmed");

        Ok(EntityPool {
            name: self.name,
            factory,
            slots,
            free,
            leased: 0,
            destroyed: false,
        })
    }
}

/// Reuse container for poolable simulation entities.
pub struct EntityPool<T> {
    name: &'static str,
    factory: Factory<T>,
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    leased: usize,
    destroyed: bool,
}

impl<T: Poolable> EntityPool<T> {
    /// Lease a reset instance, growing the pool if every slot is taken.
    ///
    /// Returns `None` only after `destroy_all`.
    pub fn acquire(&mut self) -> Option<PoolHandle> {
        if self.destroyed {
            tracing::warn!(pool = self.name, "acquire on destroyed pool");
            return None;
        }

        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    item: None,
                    generation: 0,
                    leased: false,
                });
                tracing::debug!(pool = self.name, capacity = index + 1, "pool grew");
                index
            }
        };

        let slot = &mut self.slots[index as usize];
        let item = slot.item.get_or_insert_with(|| (self.factory)());
        item.reset();
        slot.leased = true;
        self.leased += 1;

        Some(PoolHandle {
            index,
            generation: slot.generation,
        })
    }

    /// Return an instance to the free list.
    ///
    /// Releasing a free, stale or discarded handle is a no-op and returns
    /// `false`; two systems finishing the same entity in one tick is normal.
    pub fn release(&mut self, handle: PoolHandle) -> bool {
        if !self.validate(handle) {
            return false;
        }
        let slot = &mut self.slots[handle.index as usize];
        if let Some(item) = slot.item.as_mut() {
            item.on_release();
        }
        slot.leased = false;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.leased -= 1;
        true
    }

    /// Whether `handle` refers to a currently leased, intact instance.
    pub fn validate(&self, handle: PoolHandle) -> bool {
        self.slots
            .get(handle.index as usize)
            .is_some_and(|slot| {
                slot.leased && slot.generation == handle.generation && slot.item.is_some()
            })
    }

    /// Record that a leased instance was destroyed by something outside the
    /// pool. The slot is rebuilt from the factory on a later acquire.
    pub fn discard(&mut self, handle: PoolHandle) -> bool {
        if !self.validate(handle) {
            return false;
        }
        let slot = &mut self.slots[handle.index as usize];
        slot.item = None;
        slot.leased = false;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.leased -= 1;
        true
    }

    pub fn get(&self, handle: PoolHandle) -> Option<&T> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.leased && slot.generation == handle.generation {
            slot.item.as_ref()
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, handle: PoolHandle) -> Option<&mut T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.leased && slot.generation == handle.generation {
            slot.item.as_mut()
        } else {
            None
        }
    }

    /// Iterate over every leased instance.
    pub fn iter_leased(&self) -> impl Iterator<Item = (PoolHandle, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            if !slot.leased {
                return None;
            }
            let handle = PoolHandle {
                index: index as u32,
                generation: slot.generation,
            };
            slot.item.as_ref().map(|item| (handle, item))
        })
    }

    /// Handles of every leased instance, for systems that mutate while iterating.
    pub fn leased_handles(&self) -> Vec<PoolHandle> {
        self.iter_leased().map(|(handle, _)| handle).collect()
    }

    /// Release every leased instance.
    pub fn release_all(&mut self) -> usize {
        let handles = self.leased_handles();
        handles.into_iter().filter(|&h| self.release(h)).count()
    }

    /// Drop every instance. The pool refuses further leases.
    pub fn destroy_all(&mut self) {
        let count = self.slots.len();
        self.slots.clear();
        self.free.clear();
        self.leased = 0;
        self.destroyed = true;
        tracing::info!(pool = self.name, count, "pool destroyed");
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn leased_count(&self) -> usize {
        self.leased
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Total slots, leased or free.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

impl<T> fmt::Debug for EntityPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityPool")
            .field("name", &self.name)
            .field("capacity", &self.slots.len())
            .field("free", &self.free.len())
            .field("leased", &self.leased)
            .field("destroyed", &self.destroyed)
            .finish()
    }
}
