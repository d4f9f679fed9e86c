use serde::Deserialize;
use serde::Serialize;

/// One raw search result as returned by the backend. Immutable once
/// received; the backend's output order is its relevance ranking.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Hit {
    /// Globally unique within one query response.
    pub id: String,
    /// Non-empty grouping key.
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<i64>,
}

impl Hit {
    pub fn new(id: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            author: None,
            modified_at: None,
        }
    }
}

/// A category bucket of hits. Within one grouping pass each category value
/// appears in exactly one group and `items` is sorted by id ascending.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Group {
    pub category: String,
    pub items: Vec<Hit>,
}

impl Group {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
