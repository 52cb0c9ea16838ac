use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bookstore_core::{BookId, CustomerId, DomainError, DomainResult, Entity, OrderId, ValueObject};

/// One requested line of a purchase: book title + quantity.
///
/// Ephemeral; exists only for the duration of one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseLine {
    pub book_title: String,
    pub quantity: u32,
}

impl PurchaseLine {
    pub fn validate(&self) -> DomainResult<()> {
        if self.book_title.trim().is_empty() {
            return Err(DomainError::validation("book_title cannot be empty"));
        }
        if self.quantity == 0 {
            return Err(DomainError::validation("quantity must be at least 1"));
        }
        Ok(())
    }
}

/// Caller-supplied order metadata. The payment method is recorded, not
/// processed — there is no gateway behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderInstructions {
    pub payment_method: String,
    pub shipping_address: String,
    pub billing_address: String,
    pub delivery_date: DateTime<Utc>,
}

impl OrderInstructions {
    pub fn validate(&self) -> DomainResult<()> {
        if self.payment_method.trim().is_empty() || self.payment_method.len() > 50 {
            return Err(DomainError::validation("payment_method must be 1-50 characters"));
        }
        if self.shipping_address.trim().is_empty() || self.shipping_address.len() > 255 {
            return Err(DomainError::validation("shipping_address must be 1-255 characters"));
        }
        if self.billing_address.trim().is_empty() || self.billing_address.len() > 255 {
            return Err(DomainError::validation("billing_address must be 1-255 characters"));
        }
        Ok(())
    }
}

impl ValueObject for OrderInstructions {}

/// Order lifecycle status. The purchase path writes `Completed` records
/// only; `Cancelled` exists for admin housekeeping outside that path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Completed,
    Cancelled,
}

/// Entity: an order ledger entry.
///
/// Created exactly once per successful purchase line; the purchase path has
/// no update, so the struct exposes no mutators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    id: OrderId,
    customer_id: CustomerId,
    book_id: BookId,
    ordered_at: DateTime<Utc>,
    quantity: u32,
    /// Line total (unit price × quantity) in minor units.
    line_total: u64,
    status: OrderStatus,
    payment_method: String,
    shipping_address: String,
    billing_address: String,
    delivery_date: DateTime<Utc>,
}

impl OrderRecord {
    /// Build a completed ledger entry for one purchased line.
    pub fn completed(
        id: OrderId,
        customer_id: CustomerId,
        book_id: BookId,
        ordered_at: DateTime<Utc>,
        quantity: u32,
        line_total: u64,
        instructions: &OrderInstructions,
    ) -> DomainResult<Self> {
        if quantity == 0 {
            return Err(DomainError::validation("quantity must be at least 1"));
        }
        if line_total == 0 {
            return Err(DomainError::validation("line_total must be positive"));
        }
        instructions.validate()?;
        Ok(Self {
            id,
            customer_id,
            book_id,
            ordered_at,
            quantity,
            line_total,
            status: OrderStatus::Completed,
            payment_method: instructions.payment_method.clone(),
            shipping_address: instructions.shipping_address.clone(),
            billing_address: instructions.billing_address.clone(),
            delivery_date: instructions.delivery_date,
        })
    }

    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn book_id(&self) -> BookId {
        self.book_id
    }

    pub fn ordered_at(&self) -> DateTime<Utc> {
        self.ordered_at
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Line total in minor units.
    pub fn line_total(&self) -> u64 {
        self.line_total
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn payment_method(&self) -> &str {
        &self.payment_method
    }

    pub fn shipping_address(&self) -> &str {
        &self.shipping_address
    }

    pub fn billing_address(&self) -> &str {
        &self.billing_address
    }

    pub fn delivery_date(&self) -> DateTime<Utc> {
        self.delivery_date
    }
}

impl Entity for OrderRecord {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
