//! High-level state management for a board of posts.
//!
//! [`PostStore`] keeps the posts and the active search in signals and
//! derives the filtered view through a memo, so readers only pay for
//! filtering after something actually changed.

mod post_store;

pub use post_store::{PostStore, Subscription};
