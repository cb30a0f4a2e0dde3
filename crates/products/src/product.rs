use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, DomainResult, ProductId};

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i64,
    pub category: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Incoming payload for creating a product.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i64>,
    pub category: Option<String>,
}

/// Incoming payload for updating a product. Absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i64>,
    pub category: Option<String>,
    pub is_active: Option<bool>,
}

impl Product {
    /// Create a product from a payload. New products are active.
    pub fn new(input: NewProduct) -> DomainResult<Self> {
        let (Some(name), Some(price), Some(stock)) = (input.name, input.price, input.stock)
        else {
            return Err(DomainError::validation("Name, price, and stock are required"));
        };
        if name.is_empty() {
            return Err(DomainError::validation("Name, price, and stock are required"));
        }
        if price < Decimal::ZERO {
            return Err(DomainError::validation("Price must be non-negative"));
        }
        if stock < 0 {
            return Err(DomainError::validation("Stock must be non-negative"));
        }

        let now = Utc::now();
        Ok(Self {
            id: ProductId::new(),
            name,
            description: input.description.unwrap_or_default(),
            price,
            stock,
            category: input.category,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a partial update.
    pub fn apply_update(&mut self, update: ProductUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(stock) = update.stock {
            self.stock = stock;
        }
        if let Some(category) = update.category {
            self.category = Some(category);
        }
        if let Some(is_active) = update.is_active {
            self.is_active = is_active;
        }
        self.updated_at = Utc::now();
    }

    /// Adjust stock by a signed delta. The adjustment is rejected when it
    /// would drive stock below zero.
    pub fn adjust_stock(&mut self, delta: i64) -> DomainResult<()> {
        let next = self
            .stock
            .checked_add(delta)
            .ok_or_else(|| DomainError::validation("Stock adjustment out of range"))?;
        if next < 0 {
            return Err(DomainError::validation("Insufficient stock"));
        }
        self.stock = next;
        self.updated_at = Utc::now();
        Ok(())
    }
}
