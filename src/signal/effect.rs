use crate::runtime::{release_observer, ObserverFn, ReactiveGraph, ReactiveRuntime};
use std::sync::{Arc, Mutex, Weak};

/// A side effect that runs when its dependencies change.
///
/// Effects track every signal or memo read while they run and re-run after
/// any of them changes. The effect runs immediately on creation to
/// establish its dependencies, and stops for good when dropped.
///
/// # Examples
///
/// ```
/// use postboard::{Effect, Signal};
/// use std::sync::{Arc, atomic::{AtomicI32, Ordering}};
///
/// let signal = Signal::new(5);
/// let last_value = Arc::new(AtomicI32::new(0));
/// let last_value_clone = last_value.clone();
///
/// let _effect = Effect::new({
///     let signal = signal.clone();
///     move || last_value_clone.store(signal.get(), Ordering::SeqCst)
/// });
/// assert_eq!(last_value.load(Ordering::SeqCst), 5);
///
/// signal.set(10);
/// assert_eq!(last_value.load(Ordering::SeqCst), 10);
/// ```
#[must_use = "an effect stops running as soon as it is dropped"]
pub struct Effect {
    id: usize,
    graph: Weak<Mutex<ReactiveGraph>>,
}

impl Effect {
    /// Create an effect in the current runtime.
    pub fn new<F>(effect: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self::new_in(&ReactiveRuntime::current(), effect)
    }

    /// Create an effect bound to `runtime`.
    pub fn new_in<F>(runtime: &Arc<ReactiveRuntime>, effect: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = runtime.next_id();
        let effect: ObserverFn = Arc::new(effect);

        runtime.register_effect(id, Arc::clone(&effect));
        runtime.with_observer(id, || effect());

        Self {
            id,
            graph: runtime.downgrade(),
        }
    }

    /// Get the effect's unique ID.
    pub fn id(&self) -> usize {
        self.id
    }
}

impl Drop for Effect {
    fn drop(&mut self) {
        release_observer(&self.graph, self.id);
    }
}

/// Create a new effect in the current runtime.
///
/// The effect runs immediately and then again whenever anything it read
/// changes.
pub fn create_effect<F>(effect: F) -> Effect
where
    F: Fn() + Send + Sync + 'static,
{
    Effect::new(effect)
}
