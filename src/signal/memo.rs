use crate::runtime::{self, ReactiveRuntime};
use std::sync::{Arc, RwLock};

/// A memoized computed value that automatically tracks dependencies.
///
/// The computation runs lazily on the first read and again only after one
/// of the signals (or memos) it read has changed.
pub struct Memo<T> {
    cached_value: Arc<RwLock<Option<Arc<T>>>>,
    compute: Arc<dyn Fn() -> T + Send + Sync>,
    id: usize,
    runtime: Arc<ReactiveRuntime>,
}

impl<T> Clone for Memo<T> {
    fn clone(&self) -> Self {
        Self {
            cached_value: Arc::clone(&self.cached_value),
            compute: Arc::clone(&self.compute),
            id: self.id,
            runtime: Arc::clone(&self.runtime),
        }
    }
}

impl<T: Send + Sync + 'static> Memo<T> {
    /// Create a new memo in the current runtime.
    pub fn new<F>(compute: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::new_in(&ReactiveRuntime::current(), compute)
    }

    /// Create a new memo bound to `runtime`.
    pub fn new_in<F>(runtime: &Arc<ReactiveRuntime>, compute: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        let id = runtime.next_id();
        runtime.register_memo(id);

        Self {
            cached_value: Arc::new(RwLock::new(None)),
            compute: Arc::new(compute),
            id,
            runtime: Arc::clone(runtime),
        }
    }

    fn current(&self) -> Arc<T> {
        self.runtime.track_read(self.id);

        if !self.runtime.is_memo_dirty(self.id) {
            if let Some(value) = runtime::read(&self.cached_value).as_ref() {
                return Arc::clone(value);
            }
        }

        tracing::trace!(memo_id = self.id, "recomputing memo");
        let value = Arc::new(self.runtime.with_observer(self.id, || (self.compute)()));
        *runtime::write(&self.cached_value) = Some(Arc::clone(&value));
        self.runtime.mark_memo_clean(self.id);
        value
    }

    /// Read the memoized value with a function without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.current())
    }
}

impl<T: Clone + Send + Sync + 'static> Memo<T> {
    /// Get the current value, recomputing if necessary.
    pub fn get(&self) -> T {
        T::clone(&self.current())
    }
}

/// Create a new memoized computation in the current runtime.
///
/// # Example
///
/// ```
/// use postboard::{create_memo, create_signal};
///
/// let (count, set_count) = create_signal(5);
/// let doubled = create_memo(move || count.get() * 2);
/// assert_eq!(doubled.get(), 10);
///
/// set_count.set(10);
/// assert_eq!(doubled.get(), 20);
/// ```
pub fn create_memo<T, F>(compute: F) -> Memo<T>
where
    T: Send + Sync + 'static,
    F: Fn() -> T + Send + Sync + 'static,
{
    Memo::new(compute)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::Signal;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn memo_recomputes_only_after_a_change() {
        ReactiveRuntime::scope(|| {
            let runs = Arc::new(AtomicUsize::new(0));
            let count = Signal::new(5);
            let doubled = Memo::new({
                let runs = Arc::clone(&runs);
                let count = count.clone();
                move || {
                    runs.fetch_add(1, Ordering::SeqCst);
                    count.get() * 2
                }
            });

            assert_eq!(runs.load(Ordering::SeqCst), 0);
            assert_eq!(doubled.get(), 10);
            assert_eq!(doubled.get(), 10);
            assert_eq!(runs.load(Ordering::SeqCst), 1);

            count.set(10);
            assert_eq!(doubled.get(), 20);
            assert_eq!(runs.load(Ordering::SeqCst), 2);
        });
    }

    #[test]
    fn memo_of_memo_follows_source() {
        ReactiveRuntime::scope(|| {
            let input = Signal::new(1);
            let doubled = create_memo({
                let input = input.clone();
                move || input.get() * 2
            });
            let quadrupled = create_memo({
                let doubled = doubled.clone();
                move || doubled.get() * 2
            });

            assert_eq!(quadrupled.get(), 4);
            input.set(5);
            assert_eq!(quadrupled.get(), 20);
        });
    }

    #[test]
    fn with_borrows_without_clone() {
        let runtime = ReactiveRuntime::new();
        let words = Signal::new_in(&runtime, vec!["alpha", "beta"]);
        let joined = Memo::new_in(&runtime, {
            let words = words.clone();
            move || words.with(|w| w.join(","))
        });

        assert_eq!(joined.with(String::len), 10);
    }
}
