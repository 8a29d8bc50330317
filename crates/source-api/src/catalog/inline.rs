use std::collections::HashMap;

use super::{Catalog, PayloadLoader};
use crate::error::SourceError;
use crate::types::{ItemId, Payload, ResultItem};

/// Payloads held in memory alongside the catalog.
#[derive(Debug, Clone, Default)]
pub struct InlinePayloads {
    payloads: HashMap<ItemId, Payload>,
}

impl InlinePayloads {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<ItemId>, payload: Payload) {
        self.payloads.insert(id.into(), payload);
    }
}

impl PayloadLoader for InlinePayloads {
    fn load(&self, item: &ResultItem) -> Result<Option<Payload>, SourceError> {
        Ok(self.payloads.get(&item.id).cloned())
    }
}

/// A catalog whose payloads live in memory.
pub type MemoryCatalog = Catalog<InlinePayloads>;

impl Catalog<InlinePayloads> {
    /// Index items that carry no payloads.
    pub fn from_items<I>(items: I) -> Self
    where
        I: IntoIterator<Item = ResultItem>,
    {
        Self::new(items.into_iter().collect(), InlinePayloads::new())
    }

    /// Index items together with their optional payloads.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (ResultItem, Option<Payload>)>,
    {
        let mut payloads = InlinePayloads::new();
        let mut items = Vec::new();
        for (item, payload) in entries {
            if let Some(payload) = payload {
                payloads.insert(item.id.clone(), payload);
            }
            items.push(item);
        }
        Self::new(items, payloads)
    }
}
