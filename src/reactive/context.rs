//! Root-level context for sharing configuration objects.
//!
//! Values are keyed by their concrete type, one value per type. Storing a
//! `Signal<T>` gives subscribers change notification: this is how the
//! [`ThemeProvider`](crate::theme::ThemeProvider) is shared instead of
//! mutating global state.
//!
//! Storage is a `Vec<(TypeId, Box<dyn Any>)>` with linear scan; only a
//! handful of values (config, theme) are ever stored.

use std::any::{Any, TypeId};
use std::cell::RefCell;

thread_local! {
    static CONTEXTS: RefCell<Vec<(TypeId, Box<dyn Any>)>> = const { RefCell::new(Vec::new()) };
}

/// Store a value in the context, replacing any value of the same type.
pub fn provide_context<T: 'static>(value: T) {
    let type_id = TypeId::of::<T>();
    CONTEXTS.with(|ctx| {
        let mut ctx = ctx.borrow_mut();
        if let Some(entry) = ctx.iter_mut().find(|entry| entry.0 == type_id) {
            entry.1 = Box::new(value);
            return;
        }
        ctx.push((type_id, Box::new(value)));
    });
}

/// Retrieve a clone of a context value, or `None` if not provided.
pub fn use_context<T: Clone + 'static>() -> Option<T> {
    with_context::<T, _>(T::clone)
}

/// Borrow a context value without cloning.
pub fn with_context<T: 'static, R>(f: impl FnOnce(&T) -> R) -> Option<R> {
    let type_id = TypeId::of::<T>();
    CONTEXTS.with(|ctx| {
        let ctx = ctx.borrow();
        ctx.iter()
            .find(|entry| entry.0 == type_id)
            .and_then(|entry| entry.1.downcast_ref::<T>())
            .map(f)
    })
}

/// Remove every stored context value.
pub fn reset_contexts() {
    CONTEXTS.with(|ctx| ctx.borrow_mut().clear());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Settings {
        threshold: u32,
    }

    #[test]
    fn test_provide_and_use() {
        reset_contexts();
        assert_eq!(use_context::<Settings>(), None);
        provide_context(Settings { threshold: 3 });
        assert_eq!(use_context::<Settings>(), Some(Settings { threshold: 3 }));
    }

    #[test]
    fn test_provide_replaces() {
        reset_contexts();
        provide_context(Settings { threshold: 1 });
        provide_context(Settings { threshold: 2 });
        assert_eq!(with_context::<Settings, _>(|s| s.threshold), Some(2));
    }
}
