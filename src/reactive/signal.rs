use std::sync::{Arc, RwLock};

use super::runtime::{notify_write, try_with_runtime, with_runtime, SignalId};

struct SignalInner<T> {
    id: SignalId,
    value: RwLock<T>,
}

/// A reactive value.
///
/// Reading a signal inside an effect subscribes that effect; writing a
/// different value re-runs every subscriber synchronously (or at the end of
/// the enclosing [`batch`](super::batch)).
///
/// Cloning a signal yields another handle to the same value.
pub struct Signal<T> {
    inner: Arc<SignalInner<T>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Signal<T> {
    pub fn new(value: T) -> Self {
        let id = with_runtime(|rt| rt.allocate_signal());
        Self {
            inner: Arc::new(SignalInner {
                id,
                value: RwLock::new(value),
            }),
        }
    }

    /// Read-only handle sharing this signal's value
    pub fn read_only(&self) -> ReadSignal<T> {
        ReadSignal {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone> Signal<T> {
    pub fn get(&self) -> T {
        try_with_runtime(|rt| rt.track_read(self.inner.id));
        read_value(&self.inner)
    }

    pub fn get_untracked(&self) -> T {
        read_value(&self.inner)
    }
}

impl<T: PartialEq> Signal<T> {
    /// Sets the signal's value, only triggering updates if the value actually changed.
    pub fn set(&self, value: T) {
        write_value(&self.inner, value);
    }
}

impl<T: PartialEq + Clone> Signal<T> {
    /// Updates the signal's value using a closure, only triggering updates if the value changed.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        update_value(&self.inner, f);
    }
}

impl<T> Signal<T> {
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        try_with_runtime(|rt| rt.track_read(self.inner.id));
        with_value(&self.inner, f)
    }
}

/// Read-only handle to a signal.
pub struct ReadSignal<T> {
    inner: Arc<SignalInner<T>>,
}

impl<T> Clone for ReadSignal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone> ReadSignal<T> {
    pub fn get(&self) -> T {
        try_with_runtime(|rt| rt.track_read(self.inner.id));
        read_value(&self.inner)
    }

    pub fn get_untracked(&self) -> T {
        read_value(&self.inner)
    }
}

fn read_value<T: Clone>(inner: &SignalInner<T>) -> T {
    match inner.value.read() {
        Ok(guard) => (*guard).clone(),
        Err(poisoned) => (*poisoned.into_inner()).clone(),
    }
}

fn with_value<T, R>(inner: &SignalInner<T>, f: impl FnOnce(&T) -> R) -> R {
    match inner.value.read() {
        Ok(guard) => f(&guard),
        Err(poisoned) => f(&poisoned.into_inner()),
    }
}

fn write_value<T: PartialEq>(inner: &SignalInner<T>, value: T) {
    let Ok(mut guard) = inner.value.write() else {
        return; // Lock poisoned, skip update silently
    };
    if *guard != value {
        *guard = value;
        drop(guard);
        notify_write(inner.id);
    }
}

fn update_value<T: PartialEq + Clone>(inner: &SignalInner<T>, f: impl FnOnce(&mut T)) {
    let Ok(mut guard) = inner.value.write() else {
        return; // Lock poisoned, skip update silently
    };
    let old_value = guard.clone();
    f(&mut *guard);
    if *guard != old_value {
        drop(guard);
        notify_write(inner.id);
    }
}

pub fn create_signal<T>(value: T) -> Signal<T> {
    Signal::new(value)
}
