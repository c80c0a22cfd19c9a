use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use billdesk_catalog::{ProductId, StockDeduction};
use billdesk_core::{AggregateId, DomainError, DomainResult, Money};
use billdesk_customers::CustomerName;

/// Bill identifier, derived from the generation time (UUIDv7).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BillId(pub AggregateId);

impl BillId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }

    /// A fresh id for a bill generated now.
    pub fn generate() -> Self {
        Self(AggregateId::new())
    }
}

impl core::fmt::Display for BillId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl core::str::FromStr for BillId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// Bill line: product, quantity, unit price captured when the line was added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillItem {
    pub product_id: ProductId,
    pub quantity: i64,
    /// Price in smallest currency unit, snapshotted at add time.
    pub unit_price: Money,
}

impl BillItem {
    /// Line subtotal (`unit_price * quantity`).
    ///
    /// The draft refuses lines whose subtotal would overflow, so this never saturates
    /// for items that went through `AddItem`.
    pub fn total(&self) -> Money {
        self.unit_price
            .saturating_mul(u64::try_from(self.quantity).unwrap_or(0))
    }
}

/// A committed bill. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bill {
    id: BillId,
    items: Vec<BillItem>,
    date: DateTime<Utc>,
    customer: CustomerName,
}

impl Bill {
    pub fn new(
        id: BillId,
        items: Vec<BillItem>,
        customer: CustomerName,
        date: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if items.is_empty() {
            return Err(DomainError::validation("cannot create a bill without items"));
        }
        Ok(Self {
            id,
            items,
            date,
            customer,
        })
    }

    pub fn id(&self) -> BillId {
        self.id
    }

    pub fn items(&self) -> &[BillItem] {
        &self.items
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn customer(&self) -> &CustomerName {
        &self.customer
    }

    /// Sum of the line totals.
    pub fn total(&self) -> Money {
        self.items
            .iter()
            .fold(Money::ZERO, |acc, item| acc.saturating_add(item.total()))
    }

    /// Stock to take out of the catalog for this bill, one entry per product.
    pub fn deductions(&self) -> DomainResult<Vec<StockDeduction>> {
        let lines: Vec<StockDeduction> = self
            .items
            .iter()
            .map(|item| StockDeduction {
                product_id: item.product_id.clone(),
                quantity: item.quantity,
            })
            .collect();
        StockDeduction::merge(&lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, quantity: i64, price_minor: u64) -> BillItem {
        BillItem {
            product_id: ProductId::new(id).unwrap(),
            quantity,
            unit_price: Money::from_minor(price_minor),
        }
    }

    fn customer() -> CustomerName {
        CustomerName::new("Shivam").unwrap()
    }

    #[test]
    fn item_total_is_price_times_quantity() {
        assert_eq!(item("1", 3, 250).total(), Money::from_minor(750));
    }

    #[test]
    fn bill_total_is_sum_of_item_totals() {
        let bill = Bill::new(
            BillId::generate(),
            vec![item("1", 2, 100), item("2", 1, 999)],
            customer(),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(bill.total(), Money::from_minor(1_199));
    }

    #[test]
    fn bill_requires_items() {
        let err = Bill::new(BillId::generate(), Vec::new(), customer(), Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn deductions_merge_repeated_products() {
        let bill = Bill::new(
            BillId::generate(),
            vec![item("1", 2, 100), item("2", 1, 50), item("1", 3, 100)],
            customer(),
            Utc::now(),
        )
        .unwrap();

        let deductions = bill.deductions().unwrap();
        assert_eq!(deductions.len(), 2);
        assert_eq!(deductions[0].product_id.as_str(), "1");
        assert_eq!(deductions[0].quantity, 5);
        assert_eq!(deductions[1].quantity, 1);
    }

    #[test]
    fn bill_id_parses_from_display() {
        let id = BillId::generate();
        let parsed: BillId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("bill-1".parse::<BillId>().is_err());
    }

    #[test]
    fn serialized_bill_carries_customer_and_items() {
        let bill = Bill::new(BillId::generate(), vec![item("1", 1, 100)], customer(), Utc::now())
            .unwrap();
        let json = serde_json::to_value(&bill).unwrap();
        assert_eq!(json["customer"], "Shivam");
        assert_eq!(json["items"][0]["product_id"], "1");
        assert_eq!(json["items"][0]["unit_price"], 100);
    }
}
