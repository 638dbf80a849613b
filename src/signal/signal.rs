use crate::runtime::{self, ReactiveRuntime};
use std::sync::{Arc, RwLock};

/// A reactive signal that holds a value and notifies observers when changed.
///
/// A signal is bound to the runtime that was current when it was created
/// (or to the one passed to [`Signal::new_in`]). Clones share the value.
pub struct Signal<T> {
    value: Arc<RwLock<T>>,
    id: usize,
    runtime: Arc<ReactiveRuntime>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
            id: self.id,
            runtime: Arc::clone(&self.runtime),
        }
    }
}

impl<T: Send + Sync + 'static> Signal<T> {
    /// Create a new signal in the current runtime.
    pub fn new(initial: T) -> Self {
        Self::new_in(&ReactiveRuntime::current(), initial)
    }

    /// Create a new signal bound to `runtime`.
    pub fn new_in(runtime: &Arc<ReactiveRuntime>, initial: T) -> Self {
        Self {
            value: Arc::new(RwLock::new(initial)),
            id: runtime.next_id(),
            runtime: Arc::clone(runtime),
        }
    }

    /// Set a new value for the signal.
    pub fn set(&self, new_value: T) {
        *runtime::write(&self.value) = new_value;
        self.runtime.notify_observers(self.id);
    }

    /// Update the value in place.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let mut value = runtime::write(&self.value);
        f(&mut *value);
        drop(value); // Release the write lock before notifying
        self.runtime.notify_observers(self.id);
    }

    /// Read the value with a function without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.runtime.track_read(self.id);
        let value = runtime::read(&self.value);
        f(&*value)
    }

    /// Get the signal's unique ID.
    pub fn id(&self) -> usize {
        self.id
    }
}

impl<T: Clone + Send + Sync + 'static> Signal<T> {
    /// Get the current value of the signal.
    pub fn get(&self) -> T {
        self.with(T::clone)
    }
}

/// Read half of a signal, handed to code that must not write.
pub struct ReadSignal<T>(Signal<T>);

impl<T> Clone for ReadSignal<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: Send + Sync + 'static> ReadSignal<T> {
    /// Read the value with a function without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.0.with(f)
    }

    /// Get the underlying signal's unique ID.
    pub fn id(&self) -> usize {
        self.0.id()
    }
}

impl<T: Clone + Send + Sync + 'static> ReadSignal<T> {
    /// Get the current value of the signal.
    pub fn get(&self) -> T {
        self.0.get()
    }
}

/// Write half of a signal.
pub struct WriteSignal<T>(Signal<T>);

impl<T> Clone for WriteSignal<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: Send + Sync + 'static> WriteSignal<T> {
    /// Set a new value for the signal.
    pub fn set(&self, new_value: T) {
        self.0.set(new_value);
    }

    /// Update the value in place.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.0.update(f);
    }
}

/// Create a signal in the current runtime, split into read and write halves.
///
/// # Example
///
/// ```
/// use postboard::create_signal;
///
/// let (count, set_count) = create_signal(0);
/// set_count.update(|n| *n += 2);
/// assert_eq!(count.get(), 2);
/// ```
pub fn create_signal<T>(initial: T) -> (ReadSignal<T>, WriteSignal<T>)
where
    T: Send + Sync + 'static,
{
    create_signal_in(&ReactiveRuntime::current(), initial)
}

/// Create a split signal bound to `runtime`.
pub fn create_signal_in<T>(
    runtime: &Arc<ReactiveRuntime>,
    initial: T,
) -> (ReadSignal<T>, WriteSignal<T>)
where
    T: Send + Sync + 'static,
{
    let signal = Signal::new_in(runtime, initial);
    (ReadSignal(signal.clone()), WriteSignal(signal))
}
