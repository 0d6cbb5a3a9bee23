//! Product aggregate and the inputs that create or change it.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ProductId, ProductTypeId, ValidationError};

/// A sellable catalog item.
///
/// Products are never deleted. Discontinuing sets a flag so historical
/// order lines keep resolving.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    id: ProductId,
    name: String,
    price: f64,
    type_id: ProductTypeId,
    discontinued: bool,
    sold_out: bool,
}

impl Product {
    /// Rebuilds a product from stored fields.
    pub fn reconstitute(
        id: ProductId,
        name: String,
        price: f64,
        type_id: ProductTypeId,
        discontinued: bool,
        sold_out: bool,
    ) -> Self {
        Self {
            id,
            name,
            price,
            type_id,
            discontinued,
            sold_out,
        }
    }

    /// Materializes a validated draft under a store-assigned id.
    pub fn from_draft(id: ProductId, draft: NewProduct) -> Self {
        Self::reconstitute(id, draft.name, draft.price, draft.type_id, false, false)
    }

    pub fn id(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn type_id(&self) -> ProductTypeId {
        self.type_id
    }

    pub fn is_discontinued(&self) -> bool {
        self.discontinued
    }

    pub fn is_sold_out(&self) -> bool {
        self.sold_out
    }

    /// A product can be put on a new order only while it is listed and in stock.
    pub fn is_orderable(&self) -> bool {
        !self.discontinued && !self.sold_out
    }

    /// Applies a partial update, returning whether anything changed.
    pub fn apply(&mut self, changes: ProductChanges) -> Result<bool, ValidationError> {
        changes.validate()?;
        let before = self.clone();

        if let Some(name) = changes.name {
            self.name = name.trim().to_string();
        }
        if let Some(price) = changes.price {
            self.price = price;
        }
        if let Some(type_id) = changes.type_id {
            self.type_id = type_id;
        }
        if let Some(sold_out) = changes.sold_out {
            self.sold_out = sold_out;
        }

        Ok(*self != before)
    }

    /// Soft-deletes the product. Returns false when it was already discontinued.
    pub fn discontinue(&mut self) -> bool {
        if self.discontinued {
            return false;
        }
        self.discontinued = true;
        true
    }
}

/// Input for creating a product.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub type_id: ProductTypeId,
}

impl NewProduct {
    /// Validates and normalizes the draft.
    pub fn validated(mut self) -> Result<Self, ValidationError> {
        self.name = validate_name(&self.name)?;
        validate_price(self.price)?;
        Ok(self)
    }
}

/// Partial update of a product; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductChanges {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub type_id: Option<ProductTypeId>,
    pub sold_out: Option<bool>,
}

impl ProductChanges {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field("name"));
    }
    Ok(trimmed.to_string())
}

fn validate_price(price: f64) -> Result<(), ValidationError> {
    if !price.is_finite() {
        return Err(ValidationError::invalid_format("price", "must be a finite number"));
    }
    if price < 0.0 {
        return Err(ValidationError::below_minimum("price", 0, price));
    }
    Ok(())
}
