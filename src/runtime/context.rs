use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError, Weak};
use std::thread::{self, ThreadId};

use super::lock;

pub(crate) type ObserverFn = Arc<dyn Fn() + Send + Sync>;

/// Dependency graph between reactive sources and their observers.
#[derive(Default)]
pub(crate) struct ReactiveGraph {
    // observer currently running on each thread
    current_observer: HashMap<ThreadId, usize>,
    // source id -> observers that read it
    dependents: HashMap<usize, HashSet<usize>>,
    // observer id -> sources it read
    sources: HashMap<usize, HashSet<usize>>,
    // effect id -> effect body
    effects: HashMap<usize, ObserverFn>,
    // memo id -> dirty flag
    memo_dirty: HashMap<usize, bool>,
}

impl ReactiveGraph {
    fn unlink(&mut self, observer_id: usize) {
        if let Some(old_sources) = self.sources.remove(&observer_id) {
            for source_id in old_sources {
                if let Some(observers) = self.dependents.get_mut(&source_id) {
                    observers.remove(&observer_id);
                }
            }
        }
    }

    /// Forget `observer_id`, handing back its effect body so the caller
    /// can drop it after releasing the lock.
    pub(crate) fn remove_observer(&mut self, observer_id: usize) -> Option<ObserverFn> {
        self.memo_dirty.remove(&observer_id);
        self.unlink(observer_id);
        self.dependents.remove(&observer_id);
        self.effects.remove(&observer_id)
    }

    /// Mark every memo downstream of `source_id` dirty and collect the
    /// effects that have to re-run, keyed (and therefore ordered) by id.
    fn invalidate(&mut self, source_id: usize) -> BTreeMap<usize, ObserverFn> {
        let mut pending = BTreeMap::new();
        let mut stack = vec![source_id];

        while let Some(id) = stack.pop() {
            let Some(observers) = self.dependents.get(&id) else {
                continue;
            };
            for &observer_id in observers {
                if let Some(dirty) = self.memo_dirty.get_mut(&observer_id) {
                    // An already dirty memo has not been read since its last
                    // invalidation, so nothing downstream saw its value.
                    if !*dirty {
                        *dirty = true;
                        stack.push(observer_id);
                    }
                } else if let Some(effect) = self.effects.get(&observer_id) {
                    pending
                        .entry(observer_id)
                        .or_insert_with(|| Arc::clone(effect));
                }
            }
        }

        pending
    }
}

/// Reactive runtime owning one dependency graph.
///
/// Runtimes form a thread-local stack: [`ReactiveRuntime::current`] returns
/// the innermost scoped runtime, falling back to a process-wide global one.
/// Primitives created with the `*_in` constructors bind to an explicit
/// runtime instead, which is how each [`PostStore`](crate::PostStore) keeps
/// its reactive state isolated from every other store.
///
/// The running observer is tracked per thread, so reads made on one thread
/// are never recorded as dependencies of an effect running on another.
///
/// # Examples
///
/// ```
/// use postboard::runtime::ReactiveRuntime;
/// use postboard::Signal;
///
/// ReactiveRuntime::scope(|| {
///     let signal = Signal::new(0);
///     assert_eq!(signal.get(), 0);
/// });
/// ```
pub struct ReactiveRuntime {
    next_id: AtomicUsize,
    graph: Arc<Mutex<ReactiveGraph>>,
}

thread_local! {
    static RUNTIME_STACK: RefCell<Vec<Arc<ReactiveRuntime>>> = const { RefCell::new(Vec::new()) };
}

impl ReactiveRuntime {
    /// Create a new isolated runtime.
    pub fn new() -> Arc<Self> {
        Arc::new(ReactiveRuntime {
            next_id: AtomicUsize::new(0),
            graph: Arc::new(Mutex::new(ReactiveGraph::default())),
        })
    }

    /// Run a function with a fresh isolated runtime as the current one.
    ///
    /// The runtime and everything registered in it is dropped when the
    /// function returns, unless a primitive created inside escapes.
    pub fn scope<F, R>(f: F) -> R
    where
        F: FnOnce() -> R,
    {
        Self::with_runtime(Self::new(), f)
    }

    /// The process-wide fallback runtime.
    pub fn global() -> Arc<Self> {
        static RUNTIME: OnceLock<Arc<ReactiveRuntime>> = OnceLock::new();
        Arc::clone(RUNTIME.get_or_init(Self::new))
    }

    /// The innermost scoped runtime on this thread, or the global one.
    pub fn current() -> Arc<Self> {
        RUNTIME_STACK
            .with(|stack| stack.borrow().last().cloned())
            .unwrap_or_else(Self::global)
    }

    /// Run a function with `runtime` pushed as the current runtime.
    ///
    /// # Examples
    ///
    /// ```
    /// use postboard::runtime::ReactiveRuntime;
    /// use postboard::Signal;
    ///
    /// let runtime = ReactiveRuntime::new();
    /// ReactiveRuntime::with_runtime(runtime, || {
    ///     let signal = Signal::new(42);
    ///     assert_eq!(signal.get(), 42);
    /// });
    /// ```
    pub fn with_runtime<F, R>(runtime: Arc<Self>, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        RUNTIME_STACK.with(|stack| stack.borrow_mut().push(runtime));

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f));

        RUNTIME_STACK.with(|stack| {
            stack.borrow_mut().pop();
        });

        match result {
            Ok(r) => r,
            Err(e) => std::panic::resume_unwind(e),
        }
    }

    /// Drop every tracked dependency and observer.
    ///
    /// Ids keep counting up, so primitives created afterwards never collide
    /// with ones still alive from before the clear.
    pub fn clear(&self) {
        let old = std::mem::take(&mut *self.graph());
        drop(old);
    }

    fn graph(&self) -> MutexGuard<'_, ReactiveGraph> {
        self.graph.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn downgrade(&self) -> Weak<Mutex<ReactiveGraph>> {
        Arc::downgrade(&self.graph)
    }

    /// Generate the next unique id for a reactive primitive.
    pub fn next_id(&self) -> usize {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Record that the running observer (if any) read `source_id`.
    pub fn track_read(&self, source_id: usize) {
        let mut graph = self.graph();
        let observer = graph.current_observer.get(&thread::current().id()).copied();
        if let Some(observer_id) = observer {
            if observer_id == source_id {
                return;
            }
            graph
                .dependents
                .entry(source_id)
                .or_default()
                .insert(observer_id);
            graph
                .sources
                .entry(observer_id)
                .or_default()
                .insert(source_id);
        }
    }

    /// Propagate a change of `source_id`: dirty the memos first, then re-run
    /// affected effects in creation order.
    pub fn notify_observers(&self, source_id: usize) {
        let pending = self.graph().invalidate(source_id);
        if pending.is_empty() {
            return;
        }

        tracing::trace!(source_id, effects = pending.len(), "re-running effects");
        for (effect_id, effect) in pending {
            // The effect may have been dropped by an earlier one in this batch.
            if !self.graph().effects.contains_key(&effect_id) {
                continue;
            }
            self.with_observer(effect_id, || effect());
        }
    }

    /// Register an effect body under `observer_id`, forgetting any
    /// dependencies previously recorded for that id.
    pub(crate) fn register_effect(&self, observer_id: usize, f: ObserverFn) {
        let mut graph = self.graph();
        graph.unlink(observer_id);
        graph.effects.insert(observer_id, f);
    }

    /// Run `f` with `observer_id` as the observer receiving tracked reads
    /// made on the calling thread.
    pub fn with_observer<F, R>(&self, observer_id: usize, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let thread_id = thread::current().id();
        let prev = self.graph().current_observer.insert(thread_id, observer_id);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f));
        {
            let mut graph = self.graph();
            match prev {
                Some(prev) => graph.current_observer.insert(thread_id, prev),
                None => graph.current_observer.remove(&thread_id),
            };
        }

        match result {
            Ok(r) => r,
            Err(e) => std::panic::resume_unwind(e),
        }
    }

    /// Register a memo; it starts out dirty.
    pub fn register_memo(&self, memo_id: usize) {
        self.graph().memo_dirty.insert(memo_id, true);
    }

    /// Whether a memo needs recomputation.
    pub fn is_memo_dirty(&self, memo_id: usize) -> bool {
        self.graph().memo_dirty.get(&memo_id).copied().unwrap_or(true)
    }

    /// Mark a memo clean after recomputation.
    pub fn mark_memo_clean(&self, memo_id: usize) {
        self.graph().memo_dirty.insert(memo_id, false);
    }

    pub(crate) fn observer_count(&self) -> usize {
        self.graph().effects.len()
    }
}

/// Unregister `observer_id` from a runtime that may already be gone.
pub(crate) fn release_observer(graph: &Weak<Mutex<ReactiveGraph>>, observer_id: usize) {
    if let Some(graph) = graph.upgrade() {
        let removed = lock(&graph).remove_observer(observer_id);
        drop(removed);
    }
}
