//! Recognized filter keys

use crate::plan::Column;
use super::relation::{Relation, ORDERS};

/// How values of a filter are validated before binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Values are coerced to integers; anything else is an error
    Integer,
    /// Values must pass the text allow-list; violators are dropped
    Text,
}

/// A membership filter a request may carry in its `filters` map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKey {
    StoreIds,
    Channels,
    ProductCategories,
    Status,
}

impl FilterKey {
    pub const ALL: [FilterKey; 4] = [
        FilterKey::StoreIds,
        FilterKey::Channels,
        FilterKey::ProductCategories,
        FilterKey::Status,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FilterKey::StoreIds => "store_ids",
            FilterKey::Channels => "channels",
            FilterKey::ProductCategories => "product_categories",
            FilterKey::Status => "status",
        }
    }

    pub fn lookup(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.name() == name)
    }

    pub fn kind(&self) -> FilterKind {
        match self {
            FilterKey::StoreIds => FilterKind::Integer,
            _ => FilterKind::Text,
        }
    }

    /// The column the membership test applies to
    pub fn column(&self) -> Column {
        match self {
            FilterKey::StoreIds => Column::new(ORDERS, "store_id"),
            FilterKey::Channels => Column::new(ORDERS, "channel"),
            FilterKey::ProductCategories => Column::new(Relation::Products.alias(), "category"),
            FilterKey::Status => Column::new(ORDERS, "status"),
        }
    }

    pub fn relations(&self) -> &'static [Relation] {
        match self {
            FilterKey::ProductCategories => &[Relation::Products],
            _ => &[],
        }
    }
}
