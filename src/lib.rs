//! # Postboard
//!
//! A reactive post store for demo blogging UIs.
//!
//! Postboard holds an ordered board of posts (newest first) together with a
//! search query, and derives the posts matching that query. It is built in
//! two layers:
//!
//! ## Signals (Low-level primitives)
//!
//! Fine-grained reactive primitives:
//! - `Signal<T>` - Reactive values that notify dependents when changed
//! - `Memo<T>` - Computed values that automatically track dependencies
//! - `Effect` - Side effects that run when dependencies change
//!
//! ## PostStore (High-level state management)
//!
//! - `PostStore` - Posts plus a case-insensitive search, with add, clear and
//!   filter operations and a memoized filtered view
//! - `PostGenerator` - Seed data source; `HackerPostGenerator` produces
//!   random tech-jargon posts
//! - `StoreConfig` - Seed count, RNG seed and fixed posts, loadable from TOML
//!
//! ```
//! use postboard::{Post, PostStore};
//!
//! let store = PostStore::new();
//! assert_eq!(store.len(), 30);
//!
//! store.add(Post::new("Neural Matrix", "bypass the firewall"));
//! store.set_filter("neural matrix");
//! assert_eq!(store.filtered_posts()[0].title, "Neural Matrix");
//! ```

pub mod config;
pub mod error;
pub mod post;
pub mod runtime;
pub mod signal;
pub mod store;

// Re-export main types for convenience
pub use config::StoreConfig;
pub use error::{Error, Result};
pub use post::{search_posts, HackerPostGenerator, Post, PostGenerator, SearchQuery};
pub use signal::{
    create_effect, create_memo, create_signal, Effect, Memo, ReadSignal, Signal, WriteSignal,
};
pub use store::{PostStore, Subscription};
