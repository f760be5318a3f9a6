//! Scoped local-slot pool.
//!
//! Reordering stack operands needs short-lived locals. [`LocalsPool::acquire`]
//! hands out a [`PooledLocal`] guard; dropping the guard puts the slot on a
//! per-type free list, so the slot is returned on every exit path of the
//! emitting function, `?` and unwinding included.

use std::cell::RefCell;
use std::rc::Rc;

use markup_core::TypeHash;
use rustc_hash::FxHashMap;
use tracing::trace;

#[derive(Debug)]
struct PoolState {
    base: u32,
    next_slot: u32,
    free: FxHashMap<TypeHash, Vec<u32>>,
    outstanding: usize,
}

/// Typed local slots starting at a base slot owned by the enclosing function.
#[derive(Debug)]
pub struct LocalsPool {
    state: Rc<RefCell<PoolState>>,
}

impl LocalsPool {
    /// Create a pool whose first slot is `base`.
    pub fn new(base: u32) -> Self {
        Self {
            state: Rc::new(RefCell::new(PoolState {
                base,
                next_slot: base,
                free: FxHashMap::default(),
                outstanding: 0,
            })),
        }
    }

    /// Acquire a slot able to hold a value of type `ty`.
    ///
    /// A previously released slot of the same type is reused first.
    pub fn acquire(&self, ty: TypeHash) -> PooledLocal {
        let mut state = self.state.borrow_mut();
        let slot = match state.free.get_mut(&ty).and_then(Vec::pop) {
            Some(slot) => slot,
            None => {
                let slot = state.next_slot;
                state.next_slot += 1;
                slot
            }
        };
        state.outstanding += 1;
        trace!(slot, ty = %ty, "local acquired");

        PooledLocal {
            state: Rc::clone(&self.state),
            slot,
            ty,
        }
    }

    /// Slots currently held by live guards.
    pub fn outstanding(&self) -> usize {
        self.state.borrow().outstanding
    }

    /// Distinct slots ever handed out.
    pub fn high_water(&self) -> u32 {
        let state = self.state.borrow();
        state.next_slot - state.base
    }

    /// First slot of the pool.
    pub fn base(&self) -> u32 {
        self.state.borrow().base
    }
}

/// A held local slot, released on drop.
#[derive(Debug)]
pub struct PooledLocal {
    state: Rc<RefCell<PoolState>>,
    slot: u32,
    ty: TypeHash,
}

impl PooledLocal {
    /// Slot index.
    pub fn slot(&self) -> u32 {
        self.slot
    }

    /// Type the slot was acquired for.
    pub fn ty(&self) -> TypeHash {
        self.ty
    }
}

impl Drop for PooledLocal {
    fn drop(&mut self) {
        let mut state = self.state.borrow_mut();
        state.free.entry(self.ty).or_default().push(self.slot);
        state.outstanding -= 1;
        trace!(slot = self.slot, ty = %self.ty, "local released");
    }
}
