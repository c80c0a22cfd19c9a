//! Read-only views handed to the renderer.

use chrono::{DateTime, Utc};
use serde::Serialize;

use billdesk_billing::{Bill, BillId, StockPolicy};
use billdesk_catalog::{Product, ProductId};
use billdesk_core::{Entity, Money};
use billdesk_customers::CustomerName;

/// One row of the product list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub price: Money,
    pub stock: i64,
    pub category: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id().clone(),
            name: product.name().to_string(),
            price: product.price(),
            stock: product.stock(),
            category: product.category().to_string(),
        }
    }
}

/// One row of the bill-composition table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingLine {
    pub index: usize,
    pub product_id: ProductId,
    /// `None` once the product has been deleted from the catalog.
    pub product_name: Option<String>,
    pub quantity: i64,
    pub unit_price: Money,
    pub total: Money,
}

/// One entry of the bill history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BillSummary {
    pub id: BillId,
    pub customer: CustomerName,
    pub date: DateTime<Utc>,
    pub item_count: usize,
    pub total: Money,
}

impl From<&Bill> for BillSummary {
    fn from(bill: &Bill) -> Self {
        Self {
            id: bill.id(),
            customer: bill.customer().clone(),
            date: bill.date(),
            item_count: bill.items().len(),
            total: bill.total(),
        }
    }
}

/// Everything a renderer needs to draw the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeskSnapshot {
    pub stock_policy: StockPolicy,
    pub products: Vec<ProductView>,
    pub customers: Vec<CustomerName>,
    pub selected_customer: Option<CustomerName>,
    pub pending: Vec<PendingLine>,
    pub pending_total: Money,
    pub bills: Vec<BillSummary>,
}

impl DeskSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
