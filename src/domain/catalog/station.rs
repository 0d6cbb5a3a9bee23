//! Stations and product groupings.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::domain::foundation::{ProductId, ProductTypeId, StationId};

/// Reference data used to group products on screens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductType {
    pub id: ProductTypeId,
    pub name: String,
    pub title: String,
}

/// A fulfillment point and the products it prepares.
///
/// The assignment set decides which product and order events the
/// station's staff are allowed to observe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Station {
    id: StationId,
    name: String,
    products: BTreeSet<ProductId>,
}

impl Station {
    pub fn new(id: StationId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            products: BTreeSet::new(),
        }
    }

    pub fn reconstitute(
        id: StationId,
        name: String,
        products: impl IntoIterator<Item = ProductId>,
    ) -> Self {
        Self {
            id,
            name,
            products: products.into_iter().collect(),
        }
    }

    pub fn id(&self) -> StationId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn products(&self) -> &BTreeSet<ProductId> {
        &self.products
    }

    pub fn handles(&self, product_id: ProductId) -> bool {
        self.products.contains(&product_id)
    }

    /// Returns false when the product was already assigned.
    pub fn assign(&mut self, product_id: ProductId) -> bool {
        self.products.insert(product_id)
    }

    /// Returns false when the product was not assigned.
    pub fn unassign(&mut self, product_id: ProductId) -> bool {
        self.products.remove(&product_id)
    }
}
