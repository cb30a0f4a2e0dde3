use core::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, DomainResult, OrderId, ProductId, UserId};

/// Order status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(DomainError::validation(format!("Invalid status: {other}"))),
        }
    }
}

/// One line of an order. Immutable once attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub price: Decimal,
}

/// Order-creation input. Not persisted until verification succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub user_id: UserId,
    pub items: Vec<OrderLineItem>,
    pub total_amount: Decimal,
}

impl OrderDraft {
    /// Collect every validation violation, in field order.
    pub fn violations(&self) -> Vec<String> {
        let mut violations = Vec::new();
        if self.items.is_empty() {
            violations.push("\"items\" must contain at least 1 items".to_string());
        }
        for (idx, item) in self.items.iter().enumerate() {
            if item.quantity < 1 {
                violations.push(format!(
                    "\"items[{idx}].quantity\" must be greater than or equal to 1"
                ));
            }
            if item.price < Decimal::ZERO {
                violations.push(format!(
                    "\"items[{idx}].price\" must be greater than or equal to 0"
                ));
            }
        }
        if self.total_amount < Decimal::ZERO {
            violations.push("\"totalAmount\" must be greater than or equal to 0".to_string());
        }
        violations
    }

    pub fn validate(&self) -> DomainResult<()> {
        match self.violations().into_iter().next() {
            Some(first) => Err(DomainError::validation(first)),
            None => Ok(()),
        }
    }
}

/// A persisted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<OrderLineItem>,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Build a pending order from a verified draft.
    pub fn from_draft(draft: OrderDraft) -> Self {
        let now = Utc::now();
        Self {
            id: OrderId::new(),
            user_id: draft.user_id,
            items: draft.items,
            total_amount: draft.total_amount,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the status. Every transition is permitted here; the only
    /// guarded operation is [`Order::cancel`].
    pub fn set_status(&mut self, status: OrderStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    /// Cancel the order. Completed orders are terminal and stay completed.
    pub fn cancel(&mut self) -> DomainResult<()> {
        if self.status == OrderStatus::Completed {
            return Err(DomainError::illegal_transition("Cannot cancel completed order"));
        }
        self.set_status(OrderStatus::Cancelled);
        Ok(())
    }
}
