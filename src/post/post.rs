use serde::{Deserialize, Serialize};

/// One blog entry: a title and a body.
///
/// Posts carry no identity; two posts with the same text are
/// indistinguishable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Post {
    pub title: String,
    pub body: String,
}

impl Post {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// The text searches run against: title and body joined by a space.
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.title, self.body)
    }
}
