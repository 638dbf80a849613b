//! Posts, the search applied to them, and seed-post generation.

mod generator;
mod post;
mod search;

pub use generator::{HackerPostGenerator, PostGenerator};
pub use post::Post;
pub use search::{search_posts, SearchQuery};
