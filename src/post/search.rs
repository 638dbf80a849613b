use super::Post;

/// A case-insensitive substring query over [`Post::searchable_text`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchQuery {
    raw: String,
    folded: String,
}

impl SearchQuery {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let folded = raw.to_lowercase();
        Self { raw, folded }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// An empty query matches everything.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn matches(&self, post: &Post) -> bool {
        self.is_empty() || post.searchable_text().to_lowercase().contains(&self.folded)
    }

    /// Keep the matching posts, in store order.
    pub fn apply(&self, posts: &[Post]) -> Vec<Post> {
        if self.is_empty() {
            return posts.to_vec();
        }
        posts.iter().filter(|post| self.matches(post)).cloned().collect()
    }
}

/// Filter `posts` by `query`; an empty query returns every post.
pub fn search_posts(posts: &[Post], query: &str) -> Vec<Post> {
    SearchQuery::new(query).apply(posts)
}
