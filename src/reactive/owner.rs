//! Reactive ownership for scoped resource cleanup.
//!
//! Effects and cleanup callbacks created inside [`with_owner`] belong to that
//! owner. Disposing the owner disposes its children first, then runs its
//! cleanup callbacks (last registered first), then disposes its effects.
//!
//! The controller mounts every page section inside its own owner: trigger
//! observers are effects of that owner, and unit cancellation is registered
//! with [`on_cleanup`], so unmounting a section detaches everything it
//! attached.
//!
//! # Example
//!
//! ```ignore
//! let (_, owner_id) = with_owner(|| {
//!     let viewport = viewport.clone();
//!     create_effect(move || observe(viewport.get()));
//!     on_cleanup(move || cancel_units());
//! });
//!
//! // Later: detach the observer and cancel the units
//! dispose_owner(owner_id);
//! ```

use std::cell::RefCell;

use super::runtime::{with_runtime, EffectId};

/// Unique identifier for an owner in the owner arena.
pub type OwnerId = usize;

struct Owner {
    effects: Vec<EffectId>,
    cleanups: Vec<Box<dyn FnOnce()>>,
    children: Vec<OwnerId>,
}

impl Owner {
    fn new() -> Self {
        Self {
            effects: Vec::new(),
            cleanups: Vec::new(),
            children: Vec::new(),
        }
    }
}

/// Arena-based storage for owners.
struct OwnerArena {
    owners: Vec<Option<Owner>>,
}

impl OwnerArena {
    fn new() -> Self {
        Self { owners: Vec::new() }
    }

    fn allocate(&mut self) -> OwnerId {
        self.owners.push(Some(Owner::new()));
        self.owners.len() - 1
    }

    fn get_mut(&mut self, id: OwnerId) -> Option<&mut Owner> {
        self.owners.get_mut(id).and_then(|o| o.as_mut())
    }

    fn take(&mut self, id: OwnerId) -> Option<Owner> {
        self.owners.get_mut(id).and_then(|o| o.take())
    }
}

thread_local! {
    static CURRENT_OWNER: RefCell<Option<OwnerId>> = const { RefCell::new(None) };
    static OWNERS: RefCell<OwnerArena> = RefCell::new(OwnerArena::new());
}

/// Execute a closure within a new owner scope.
///
/// Returns the closure's result and the new owner's id. The new owner is a
/// child of the current owner, if any.
pub fn with_owner<T>(f: impl FnOnce() -> T) -> (T, OwnerId) {
    let parent = current_owner();

    let owner_id = OWNERS.with(|owners| {
        let mut owners = owners.borrow_mut();
        let id = owners.allocate();
        if let Some(parent_owner) = parent.and_then(|p| owners.get_mut(p)) {
            parent_owner.children.push(id);
        }
        id
    });

    let prev_owner = CURRENT_OWNER.with(|current| current.replace(Some(owner_id)));
    let result = f();
    CURRENT_OWNER.with(|current| {
        *current.borrow_mut() = prev_owner;
    });

    (result, owner_id)
}

/// Get the current owner ID, if any.
pub fn current_owner() -> Option<OwnerId> {
    CURRENT_OWNER.with(|current| *current.borrow())
}

/// Dispose an owner and all its resources.
///
/// Disposing an owner twice is a no-op.
pub fn dispose_owner(id: OwnerId) {
    let Some(owner) = OWNERS.with(|owners| owners.borrow_mut().take(id)) else {
        return; // Already disposed
    };

    for child_id in owner.children {
        dispose_owner(child_id);
    }

    // LIFO, like drop order
    for cleanup in owner.cleanups.into_iter().rev() {
        cleanup();
    }

    for effect_id in owner.effects {
        with_runtime(|rt| rt.dispose_effect(effect_id));
    }
}

/// Check whether an owner is still alive
pub fn is_owner_alive(id: OwnerId) -> bool {
    OWNERS.with(|owners| owners.borrow().owners.get(id).is_some_and(|o| o.is_some()))
}

/// Register a cleanup callback to run when the current owner is disposed.
///
/// Does nothing when called outside an owner scope.
pub fn on_cleanup(f: impl FnOnce() + 'static) {
    if let Some(owner_id) = current_owner() {
        OWNERS.with(|owners| {
            if let Some(owner) = owners.borrow_mut().get_mut(owner_id) {
                owner.cleanups.push(Box::new(f));
            }
        });
    }
}

/// Register an effect with the current owner.
pub(crate) fn register_effect(id: EffectId) {
    if let Some(owner_id) = current_owner() {
        OWNERS.with(|owners| {
            if let Some(owner) = owners.borrow_mut().get_mut(owner_id) {
                owner.effects.push(id);
            }
        });
    }
}

/// Check if an effect is owned by any live owner.
pub(crate) fn effect_has_owner(id: EffectId) -> bool {
    OWNERS.with(|owners| {
        owners
            .borrow()
            .owners
            .iter()
            .flatten()
            .any(|owner| owner.effects.contains(&id))
    })
}
