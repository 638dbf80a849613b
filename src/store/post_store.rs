use std::sync::Arc;

use crate::config::{StoreConfig, DEFAULT_SEED_COUNT};
use crate::post::{HackerPostGenerator, Post, PostGenerator, SearchQuery};
use crate::runtime::ReactiveRuntime;
use crate::signal::{create_signal_in, Effect, Memo, ReadSignal, WriteSignal};

/// State container for a board of posts and the search applied to it.
///
/// The store owns its own [`ReactiveRuntime`], so stores never observe each
/// other. Cloning a store yields another handle to the same state; hand
/// clones to the parts of the UI that read or mutate the board.
///
/// # Examples
///
/// ```
/// use postboard::{Post, PostStore};
///
/// let store = PostStore::from_posts(vec![Post::new("Neural Matrix", "bypass the firewall")]);
///
/// store.set_filter("matrix");
/// assert_eq!(store.filtered_posts().len(), 1);
///
/// store.set_filter("xyz");
/// assert!(store.filtered_posts().is_empty());
/// ```
#[derive(Clone)]
pub struct PostStore {
    runtime: Arc<ReactiveRuntime>,
    posts: ReadSignal<Vec<Post>>,
    set_posts: WriteSignal<Vec<Post>>,
    query: ReadSignal<SearchQuery>,
    set_query: WriteSignal<SearchQuery>,
    searched: Memo<Vec<Post>>,
}

impl PostStore {
    /// A store seeded with [`DEFAULT_SEED_COUNT`] random posts.
    pub fn new() -> Self {
        Self::initialize(DEFAULT_SEED_COUNT, &mut HackerPostGenerator::new())
    }

    /// Seed the store with `count` posts from `generator`.
    pub fn initialize<G>(count: usize, generator: &mut G) -> Self
    where
        G: PostGenerator + ?Sized,
    {
        let store = Self::from_posts(generator.generate_many(count));
        tracing::debug!(count, "seeded post store");
        store
    }

    /// A store built from `config`: its fixed posts first, then
    /// `seed_count` generated ones.
    pub fn with_config(config: &StoreConfig) -> Self {
        let mut generator = match config.seed {
            Some(seed) => HackerPostGenerator::seeded(seed),
            None => HackerPostGenerator::new(),
        };

        let mut posts = config.posts.clone();
        posts.extend(generator.generate_many(config.seed_count));
        tracing::debug!(
            fixed = config.posts.len(),
            generated = config.seed_count,
            seed = ?config.seed,
            "building post store from config"
        );

        let store = Self::from_posts(posts);
        if !config.initial_filter.is_empty() {
            store.set_filter(config.initial_filter.clone());
        }
        store
    }

    /// A store holding exactly `posts`, newest first, with no filter.
    pub fn from_posts(posts: Vec<Post>) -> Self {
        let runtime = ReactiveRuntime::new();
        let (posts, set_posts) = create_signal_in(&runtime, posts);
        let (query, set_query) = create_signal_in(&runtime, SearchQuery::default());

        let searched = Memo::new_in(&runtime, {
            let posts = posts.clone();
            let query = query.clone();
            move || query.with(|query| posts.with(|posts| query.apply(posts)))
        });

        Self {
            runtime,
            posts,
            set_posts,
            query,
            set_query,
            searched,
        }
    }

    /// Prepend `post`. No validation is performed.
    pub fn add(&self, post: Post) {
        self.set_posts.update(|posts| posts.insert(0, post));
        tracing::debug!(len = self.len(), "added post");
    }

    /// Remove every post. Idempotent.
    pub fn clear(&self) {
        self.set_posts.update(Vec::clear);
        tracing::debug!("cleared posts");
    }

    /// Replace the whole sequence.
    pub fn set_posts(&self, posts: Vec<Post>) {
        let len = posts.len();
        self.set_posts.set(posts);
        tracing::debug!(len, "replaced posts");
    }

    /// Replace the filter; an empty string disables filtering.
    pub fn set_filter(&self, query: impl Into<String>) {
        let query = SearchQuery::new(query);
        tracing::debug!(query = query.as_str(), "search query changed");
        self.set_query.set(query);
    }

    /// The current filter string.
    pub fn filter(&self) -> String {
        self.query.with(|query| query.as_str().to_owned())
    }

    /// Reactive read handle to the current filter.
    ///
    /// The handle lives in the store's [`runtime`](Self::runtime); effects
    /// that should re-run on filter changes must be created there too.
    pub fn filter_signal(&self) -> ReadSignal<SearchQuery> {
        self.query.clone()
    }

    /// The runtime the store's signals and memo are bound to.
    ///
    /// ```
    /// use postboard::{Effect, PostStore};
    /// use std::sync::{Arc, Mutex};
    ///
    /// let store = PostStore::from_posts(Vec::new());
    /// let seen = Arc::new(Mutex::new(Vec::new()));
    /// let _effect = Effect::new_in(store.runtime(), {
    ///     let filter = store.filter_signal();
    ///     let seen = Arc::clone(&seen);
    ///     move || seen.lock().unwrap().push(filter.with(|q| q.as_str().to_owned()))
    /// });
    ///
    /// store.set_filter("matrix");
    /// assert_eq!(*seen.lock().unwrap(), ["", "matrix"]);
    /// ```
    pub fn runtime(&self) -> &Arc<ReactiveRuntime> {
        &self.runtime
    }

    /// Posts matching the filter, in store order.
    pub fn filtered_posts(&self) -> Vec<Post> {
        self.searched.get()
    }

    /// Borrow the filtered posts without cloning them.
    pub fn with_filtered_posts<R>(&self, f: impl FnOnce(&[Post]) -> R) -> R {
        self.searched.with(|posts| f(posts))
    }

    /// Every post, ignoring the filter.
    pub fn all_posts(&self) -> Vec<Post> {
        self.posts.get()
    }

    /// Number of posts, ignoring the filter.
    pub fn len(&self) -> usize {
        self.posts.with(Vec::len)
    }

    /// Whether the store holds no posts, ignoring the filter.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Call `callback` with the filtered posts now and after every change to
    /// the posts or the filter, until the returned subscription is dropped.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&[Post]) + Send + Sync + 'static,
    {
        let searched = self.searched.clone();
        let effect = Effect::new_in(&self.runtime, move || {
            searched.with(|posts| callback(posts));
        });
        tracing::debug!(subscriber = effect.id(), "subscribed to post store");
        Subscription { _effect: effect }
    }

    /// Number of live effects in the store's runtime, subscriptions included.
    pub fn subscriber_count(&self) -> usize {
        self.runtime.observer_count()
    }
}

impl Default for PostStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PostStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostStore")
            .field("len", &self.len())
            .field("filter", &self.filter())
            .finish_non_exhaustive()
    }
}

/// Keeps a [`PostStore::subscribe`] callback registered while alive.
#[must_use = "the subscription ends as soon as it is dropped"]
pub struct Subscription {
    _effect: Effect,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn numbered(count: usize) -> Vec<Post> {
        (0..count)
            .map(|n| Post::new(format!("post {n}"), format!("body {n}")))
            .collect()
    }

    #[test]
    fn new_store_holds_thirty_posts() {
        let store = PostStore::new();
        assert_eq!(store.len(), 30);
        assert_eq!(store.filter(), "");
        assert!(store
            .all_posts()
            .iter()
            .all(|post| !post.title.is_empty() && !post.body.is_empty()));
    }

    #[test]
    fn initialize_calls_generator_exactly_count_times() {
        let mut calls = 0;
        let store = PostStore::initialize(4, &mut || {
            calls += 1;
            Post::new("t", "b")
        });
        assert_eq!(calls, 4);
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn add_prepends_and_keeps_order() {
        let store = PostStore::from_posts(numbered(3));
        let before = store.all_posts();

        let post = Post::new("fresh", "news");
        store.add(post.clone());

        let after = store.all_posts();
        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(after[0], post);
        assert_eq!(&after[1..], &before[..]);
    }

    #[test]
    fn add_accepts_empty_post() {
        let store = PostStore::from_posts(Vec::new());
        store.add(Post::default());
        assert_eq!(store.all_posts(), vec![Post::default()]);
    }

    #[test]
    fn clear_is_idempotent() {
        let store = PostStore::from_posts(numbered(5));
        store.clear();
        assert!(store.is_empty());
        store.clear();
        assert!(store.is_empty());
        assert!(store.filtered_posts().is_empty());
    }

    #[test]
    fn empty_filter_shows_everything() {
        let store = PostStore::from_posts(numbered(5));
        store.set_filter("post 1");
        assert_eq!(store.filtered_posts().len(), 1);

        store.set_filter("");
        assert_eq!(store.filtered_posts(), store.all_posts());
    }

    #[test]
    fn filtered_view_follows_mutations() {
        let store = PostStore::from_posts(numbered(2));
        store.set_filter("MATRIX");
        assert!(store.filtered_posts().is_empty());

        store.add(Post::new("Neural Matrix", "bypass the firewall"));
        assert_eq!(store.with_filtered_posts(<[Post]>::len), 1);

        store.set_posts(numbered(3));
        assert!(store.filtered_posts().is_empty());
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn clones_share_state() {
        let store = PostStore::from_posts(Vec::new());
        let handle = store.clone();
        handle.add(Post::new("a", "b"));
        handle.set_filter("a");

        assert_eq!(store.len(), 1);
        assert_eq!(store.filter(), "a");
    }

    #[test]
    fn subscription_sees_every_change_until_dropped() {
        let store = PostStore::from_posts(numbered(3));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let subscription = store.subscribe({
            let seen = Arc::clone(&seen);
            move |posts| seen.lock().unwrap().push(posts.len())
        });
        assert_eq!(store.subscriber_count(), 1);

        store.add(Post::new("post 9", "body 9"));
        store.set_filter("post 9");
        store.clear();
        assert_eq!(*seen.lock().unwrap(), vec![3, 4, 1, 0]);

        drop(subscription);
        assert_eq!(store.subscriber_count(), 0);
        store.add(Post::new("late", "post"));
        assert_eq!(seen.lock().unwrap().len(), 4);
    }

    #[test]
    fn stores_are_isolated() {
        let first = PostStore::from_posts(Vec::new());
        let second = PostStore::from_posts(Vec::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let _subscription = first.subscribe({
            let calls = Arc::clone(&calls);
            move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
            }
        });
        second.add(Post::new("elsewhere", "entirely"));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(first.is_empty());
    }

    #[test]
    fn effect_in_store_runtime_follows_filter_signal() {
        let store = PostStore::from_posts(numbered(3));
        let filter = store.filter_signal();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let _effect = Effect::new_in(store.runtime(), {
            let seen = Arc::clone(&seen);
            move || {
                let query = filter.with(|query| query.as_str().to_owned());
                seen.lock().unwrap().push(query);
            }
        });
        store.set_filter("matrix");

        assert_eq!(*seen.lock().unwrap(), vec!["".to_string(), "matrix".to_string()]);
    }

    #[test]
    fn effect_scoped_to_store_runtime_follows_filtered_posts() {
        let store = PostStore::from_posts(Vec::new());
        let runs = Arc::new(AtomicUsize::new(0));

        let _effect = ReactiveRuntime::with_runtime(Arc::clone(store.runtime()), || {
            crate::signal::create_effect({
                let store = store.clone();
                let runs = Arc::clone(&runs);
                move || {
                    store.filtered_posts();
                    runs.fetch_add(1, Ordering::SeqCst);
                }
            })
        });
        store.add(Post::new("Neural Matrix", "bypass the firewall"));

        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn config_places_fixed_posts_first() {
        let config = StoreConfig {
            seed_count: 2,
            seed: Some(3),
            initial_filter: "neural matrix".into(),
            posts: vec![Post::new("Neural Matrix", "bypass the firewall")],
        };
        let store = PostStore::with_config(&config);

        assert_eq!(store.len(), 3);
        assert_eq!(store.all_posts()[0].title, "Neural Matrix");
        assert_eq!(store.filter(), "neural matrix");
        assert!(!store.filtered_posts().is_empty());
    }
}
