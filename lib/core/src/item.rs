use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::fingerprint::Fingerprint;
use crate::price::PriceBucket;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Integer(u64),
    Uuid(Uuid),
    String(String),
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemId::String(s) => write!(f, "{}", s),
            ItemId::Uuid(u) => write!(f, "{}", u),
            ItemId::Integer(i) => write!(f, "{}", i),
        }
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        ItemId::String(s)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        ItemId::String(s.to_string())
    }
}

impl From<u64> for ItemId {
    fn from(i: u64) -> Self {
        ItemId::Integer(i)
    }
}

impl From<Uuid> for ItemId {
    fn from(u: Uuid) -> Self {
        ItemId::Uuid(u)
    }
}

/// A catalog entry with its stored fingerprint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: ItemId,
    pub fingerprint: Fingerprint,
    pub category: String,
    pub price: f64,
}

impl CatalogItem {
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<ItemId>, fingerprint: Fingerprint, category: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            fingerprint,
            category: category.into(),
            price,
        }
    }

    #[inline]
    pub fn price_bucket(&self) -> PriceBucket {
        PriceBucket::of(self.price)
    }

    /// Case-insensitive category comparison
    #[inline]
    pub fn in_category(&self, category: &str) -> bool {
        self.category.eq_ignore_ascii_case(category)
    }
}
