//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Query parameters for the customer list (`?search=&page=&limit=`).
///
/// Paging values are clamped by [`crm_core::pagination::PageRequest`].
#[derive(Debug, Default, Deserialize)]
pub struct ListCustomersParams {
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl ListCustomersParams {
    /// The search term, trimmed, or `None` when blank.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_search_is_no_filter() {
        let params = ListCustomersParams {
            search: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(params.search_term(), None);

        let params = ListCustomersParams {
            search: Some(" ada ".into()),
            ..Default::default()
        };
        assert_eq!(params.search_term(), Some("ada"));
    }
}
