use serde::{Deserialize, Serialize};

/// Cursor pagination metadata returned by list endpoints.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    /// Opaque cursor for the next page. Absent on the last page.
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub total: Option<i64>,
}

impl Pagination {
    /// True when the server reported a further page.
    pub fn has_next(&self) -> bool {
        self.cursor.as_deref().is_some_and(|c| !c.is_empty())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

impl<T> PaginatedResponse<T> {
    /// Cursor to request the next page with, if there is one.
    pub fn next_cursor(&self) -> Option<&str> {
        self.pagination
            .as_ref()
            .filter(|p| p.has_next())
            .and_then(|p| p.cursor.as_deref())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Response<T> {
    pub data: T,
}
