pub mod context;
pub mod effect;
pub mod owner;
pub mod runtime;
pub mod signal;

pub use context::{provide_context, reset_contexts, use_context, with_context};
pub use effect::{create_effect, Effect};
pub use owner::{current_owner, dispose_owner, is_owner_alive, on_cleanup, with_owner, OwnerId};
pub use runtime::batch;
pub use signal::{create_signal, ReadSignal, Signal};
