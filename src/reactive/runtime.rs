use std::cell::RefCell;
use std::collections::HashSet;

thread_local! {
    static RUNTIME: RefCell<Runtime> = RefCell::new(Runtime::new());
}

pub type SignalId = usize;
pub type EffectId = usize;

type EffectCallback = Box<dyn FnMut()>;

/// Where an effect's callback currently lives
enum EffectSlot {
    Idle(EffectCallback),
    /// Taken out of the runtime while it executes
    Running,
    Disposed,
}

#[derive(Default)]
pub struct Runtime {
    current_effect: Option<EffectId>,
    pending_effects: Vec<EffectId>,
    effects: Vec<EffectSlot>,
    effect_dependencies: Vec<HashSet<SignalId>>,
    signal_subscribers: Vec<HashSet<EffectId>>,
    batch_depth: usize,
    flushing: bool,
}

impl Runtime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate_signal(&mut self) -> SignalId {
        self.signal_subscribers.push(HashSet::new());
        self.signal_subscribers.len() - 1
    }

    pub fn allocate_effect(&mut self, callback: EffectCallback) -> EffectId {
        self.effects.push(EffectSlot::Idle(callback));
        self.effect_dependencies.push(HashSet::new());
        self.effects.len() - 1
    }

    pub fn track_read(&mut self, signal_id: SignalId) {
        // The signal may belong to another thread's runtime
        if signal_id >= self.signal_subscribers.len() {
            return;
        }

        if let Some(effect_id) = self.current_effect {
            self.signal_subscribers[signal_id].insert(effect_id);
            self.effect_dependencies[effect_id].insert(signal_id);
        }
    }

    /// Queue every subscriber of `signal_id`; returns true if a flush is due
    fn queue_subscribers(&mut self, signal_id: SignalId) -> bool {
        if signal_id >= self.signal_subscribers.len() {
            return false;
        }

        // Sorted so effects re-run in creation order
        let mut subscribers: Vec<_> = self.signal_subscribers[signal_id].iter().copied().collect();
        subscribers.sort_unstable();
        for effect_id in subscribers {
            if !self.pending_effects.contains(&effect_id) {
                self.pending_effects.push(effect_id);
            }
        }

        self.batch_depth == 0 && !self.flushing
    }

    /// Prepare an effect to run: drop its old dependencies and take its callback
    fn begin_effect(&mut self, effect_id: EffectId) -> Option<(EffectCallback, Option<EffectId>)> {
        let slot = std::mem::replace(self.effects.get_mut(effect_id)?, EffectSlot::Running);
        let callback = match slot {
            EffectSlot::Idle(callback) => callback,
            other => {
                self.effects[effect_id] = other;
                return None;
            }
        };

        let old_deps = std::mem::take(&mut self.effect_dependencies[effect_id]);
        for signal_id in old_deps {
            self.signal_subscribers[signal_id].remove(&effect_id);
        }

        let prev_effect = self.current_effect.replace(effect_id);
        Some((callback, prev_effect))
    }

    fn end_effect(
        &mut self,
        effect_id: EffectId,
        callback: EffectCallback,
        prev_effect: Option<EffectId>,
    ) {
        self.current_effect = prev_effect;
        // Put the callback back unless the effect disposed itself while running
        if matches!(self.effects[effect_id], EffectSlot::Running) {
            self.effects[effect_id] = EffectSlot::Idle(callback);
        }
    }

    pub fn dispose_effect(&mut self, effect_id: EffectId) {
        if effect_id >= self.effects.len() {
            return;
        }
        let deps = std::mem::take(&mut self.effect_dependencies[effect_id]);
        for signal_id in deps {
            if signal_id < self.signal_subscribers.len() {
                self.signal_subscribers[signal_id].remove(&effect_id);
            }
        }
        self.effects[effect_id] = EffectSlot::Disposed;
        self.pending_effects.retain(|id| *id != effect_id);
    }

    pub fn is_effect_alive(&self, effect_id: EffectId) -> bool {
        matches!(
            self.effects.get(effect_id),
            Some(EffectSlot::Idle(_)) | Some(EffectSlot::Running)
        )
    }
}

pub fn with_runtime<F, R>(f: F) -> R
where
    F: FnOnce(&mut Runtime) -> R,
{
    RUNTIME.with(|rt| f(&mut rt.borrow_mut()))
}

/// Try to access the runtime. Does nothing if it is already borrowed.
pub fn try_with_runtime<F>(f: F)
where
    F: FnOnce(&mut Runtime),
{
    RUNTIME.with(|rt| {
        if let Ok(mut runtime) = rt.try_borrow_mut() {
            f(&mut runtime);
        }
    });
}

/// Run an effect with dependency tracking.
///
/// The runtime is not borrowed while the callback executes, so the
/// callback can freely read and write signals.
pub fn run_effect(effect_id: EffectId) {
    let Some((mut callback, prev_effect)) = with_runtime(|rt| rt.begin_effect(effect_id)) else {
        return;
    };
    callback();
    with_runtime(|rt| rt.end_effect(effect_id, callback, prev_effect));
}

/// Run queued effects until none are pending
pub fn flush_effects() {
    let already_flushing = with_runtime(|rt| std::mem::replace(&mut rt.flushing, true));
    if already_flushing {
        return;
    }
    loop {
        let next = with_runtime(|rt| {
            if rt.pending_effects.is_empty() {
                None
            } else {
                Some(rt.pending_effects.remove(0))
            }
        });
        match next {
            Some(effect_id) => run_effect(effect_id),
            None => break,
        }
    }
    with_runtime(|rt| rt.flushing = false);
}

/// Notify subscribers that a signal changed
pub fn notify_write(signal_id: SignalId) {
    let should_flush = RUNTIME.with(|rt| match rt.try_borrow_mut() {
        Ok(mut runtime) => runtime.queue_subscribers(signal_id),
        Err(_) => false,
    });
    if should_flush {
        flush_effects();
    }
}

/// Group signal writes; effects run once after the outermost batch ends
pub fn batch<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    with_runtime(|rt| rt.batch_depth += 1);
    let result = f();
    let should_flush = with_runtime(|rt| {
        rt.batch_depth -= 1;
        rt.batch_depth == 0
    });
    if should_flush {
        flush_effects();
    }
    result
}
