use lazypick_source_api::ResultItem;
use serde::Serialize;

/// What the caller receives when the user confirms a choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitSelection {
    pub item: ResultItem,
    /// The annotation, or `None` when it was left blank.
    pub annotation: Option<String>,
}

/// At most one selected item plus a free-text annotation.
#[derive(Debug, Clone, Default)]
pub(crate) struct SelectionState {
    item: Option<ResultItem>,
    annotation: String,
}

impl SelectionState {
    /// Replace the current selection with `item`.
    pub(crate) fn select(&mut self, item: ResultItem) {
        self.item = Some(item);
    }

    pub(crate) fn set_annotation(&mut self, text: impl Into<String>) {
        self.annotation = text.into();
    }

    /// Forget both the item and the annotation.
    pub(crate) fn clear(&mut self) {
        self.item = None;
        self.annotation.clear();
    }

    pub(crate) fn item(&self) -> Option<&ResultItem> {
        self.item.as_ref()
    }

    pub(crate) fn annotation(&self) -> &str {
        &self.annotation
    }

    pub(crate) fn composite(&self) -> Option<CommitSelection> {
        let item = self.item.clone()?;
        let annotation = if self.annotation.trim().is_empty() {
            None
        } else {
            Some(self.annotation.clone())
        };
        Some(CommitSelection { item, annotation })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selecting_replaces_previous_item() {
        let mut selection = SelectionState::default();
        selection.select(ResultItem::new("a", "alpha"));
        selection.select(ResultItem::new("b", "beta"));
        assert_eq!(selection.item().map(|item| item.id.as_str()), Some("b"));
    }

    #[test]
    fn annotation_survives_reselection() {
        let mut selection = SelectionState::default();
        selection.set_annotation("caption");
        selection.select(ResultItem::new("a", "alpha"));
        selection.select(ResultItem::new("b", "beta"));
        let composite = selection.composite().expect("composite");
        assert_eq!(composite.annotation.as_deref(), Some("caption"));
    }

    #[test]
    fn blank_annotation_is_omitted() {
        let mut selection = SelectionState::default();
        selection.select(ResultItem::new("a", "alpha"));
        selection.set_annotation("   ");
        assert_eq!(selection.composite().and_then(|c| c.annotation), None);
    }

    #[test]
    fn composite_requires_an_item() {
        let mut selection = SelectionState::default();
        selection.set_annotation("orphan");
        assert!(selection.composite().is_none());
        selection.clear();
        assert_eq!(selection.annotation(), "");
    }
}
