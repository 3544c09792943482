//! Cursor pagination and search parameters for list endpoints.

use url::Url;

use super::common::Query;

/// Largest page size the API accepts.
pub const MAX_LIMIT: u32 = 1000;

/// Query for cursor-paginated list endpoints.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CursorQuery {
    /// Cursor returned by the previous page.
    pub cursor: Option<String>,
    /// Page size. `None` uses the API default (100).
    pub limit: Option<u32>,
    /// Filter results by name.
    pub search: Option<String>,
}

impl CursorQuery {
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    /// Sets the page size, clamped to `1..=MAX_LIMIT`.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit.clamp(1, MAX_LIMIT));
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
}

impl Query for CursorQuery {
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        if let Some(cursor) = self.cursor.as_deref().filter(|c| !c.is_empty()) {
            url.query_pairs_mut().append_pair("cursor", cursor);
        }
        if let Some(limit) = self.limit {
            url.query_pairs_mut()
                .append_pair("limit", &limit.to_string());
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            url.query_pairs_mut().append_pair("search", search);
        }
        url
    }
}
