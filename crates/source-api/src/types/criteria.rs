use serde::{Deserialize, Serialize};

/// Filter handed to [`SelectorSource::search`](crate::SelectorSource::search).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchCriteria {
    query: String,
}

impl SearchCriteria {
    /// Build criteria for `query`. Surrounding whitespace is trimmed.
    pub fn new(query: impl AsRef<str>) -> Self {
        Self {
            query: query.as_ref().trim().to_string(),
        }
    }

    /// The trimmed query text. Empty means "no filter".
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        self.query.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_only_query_means_no_filter() {
        let criteria = SearchCriteria::new("   ");
        assert!(criteria.is_unfiltered());
        assert_eq!(SearchCriteria::new("  cat ").query(), "cat");
    }
}
