use super::owner::{effect_has_owner, register_effect};
use super::runtime::{run_effect, with_runtime, EffectId};

/// A side effect that re-runs whenever a signal it read changes.
///
/// Effects created inside an owner scope belong to that owner and live
/// until it is disposed; otherwise the effect is disposed when this handle
/// is dropped.
pub struct Effect {
    id: EffectId,
}

impl Effect {
    pub fn new<F>(f: F) -> Self
    where
        F: FnMut() + 'static,
    {
        let id = with_runtime(|rt| rt.allocate_effect(Box::new(f)));
        register_effect(id);
        run_effect(id);
        Self { id }
    }

    pub fn id(&self) -> EffectId {
        self.id
    }

    pub fn is_alive(&self) -> bool {
        with_runtime(|rt| rt.is_effect_alive(self.id))
    }

    /// Stop the effect now, even if an owner scope still holds it
    pub(crate) fn dispose(&self) {
        with_runtime(|rt| rt.dispose_effect(self.id));
    }
}

impl Drop for Effect {
    fn drop(&mut self) {
        if !effect_has_owner(self.id) {
            with_runtime(|rt| rt.dispose_effect(self.id));
        }
    }
}

pub fn create_effect<F>(f: F) -> Effect
where
    F: FnMut() + 'static,
{
    Effect::new(f)
}
