use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use billdesk_core::{Aggregate, AggregateId, AggregateRoot, DomainError, DomainResult, Entity, Money};
use billdesk_events::Event;

use crate::product::{ensure_price, ensure_stock, Product, ProductId};

/// Aggregate root: the product catalog.
///
/// Products are kept in insertion order, which is the order the product list
/// and the product picker display them in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    id: AggregateId,
    products: Vec<Product>,
    version: u64,
}

impl Catalog {
    /// An empty catalog.
    pub fn empty(id: AggregateId) -> Self {
        Self {
            id,
            products: Vec::new(),
            version: 0,
        }
    }

    /// A catalog loaded from seed data. Product ids must be unique.
    pub fn seeded(id: AggregateId, products: impl IntoIterator<Item = Product>) -> DomainResult<Self> {
        let mut catalog = Self::empty(id);
        for product in products {
            if catalog.contains(product.id()) {
                return Err(DomainError::conflict(format!(
                    "duplicate product id {}",
                    product.id()
                )));
            }
            catalog.products.push(product);
        }
        Ok(catalog)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, product_id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id() == product_id)
    }

    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.get(product_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    fn get_mut(&mut self, product_id: &ProductId) -> Option<&mut Product> {
        self.products.iter_mut().find(|p| p.id() == product_id)
    }

    fn require(&self, product_id: &ProductId) -> DomainResult<&Product> {
        self.get(product_id)
            .ok_or_else(|| DomainError::not_found(format!("product {product_id}")))
    }
}

impl AggregateRoot for Catalog {
    type Id = AggregateId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Quantity of one product to take out of stock for a committed bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockDeduction {
    pub product_id: ProductId,
    pub quantity: i64,
}

impl StockDeduction {
    /// Collapse entries for the same product into one, summing quantities.
    ///
    /// Order of first appearance is preserved. A summed quantity that does not
    /// fit in an `i64` can never be covered by stock and is refused.
    pub fn merge(deductions: &[StockDeduction]) -> DomainResult<Vec<StockDeduction>> {
        let mut merged: Vec<StockDeduction> = Vec::with_capacity(deductions.len());
        for d in deductions {
            match merged.iter_mut().find(|m| m.product_id == d.product_id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.checked_add(d.quantity).ok_or_else(|| {
                        DomainError::invariant(format!(
                            "stock cannot go negative for product {} (deduction out of range)",
                            d.product_id
                        ))
                    })?;
                }
                None => merged.push(d.clone()),
            }
        }
        Ok(merged)
    }
}

/// Command: EditProduct (overwrite price and stock).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditProduct {
    pub product_id: ProductId,
    pub price: Money,
    pub stock: i64,
    pub occurred_at: DateTime<Utc>,
}

impl EditProduct {
    /// Build the command from raw form input.
    ///
    /// Non-numeric price or stock text is a validation failure.
    pub fn parse(
        product_id: ProductId,
        raw_price: &str,
        raw_stock: &str,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let price: Money = raw_price.parse()?;
        let stock: i64 = raw_stock
            .trim()
            .parse()
            .map_err(|_| DomainError::validation(format!("invalid stock: {:?}", raw_stock.trim())))?;

        Ok(Self {
            product_id,
            price,
            stock,
            occurred_at,
        })
    }
}

/// Command: DeleteProduct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteProduct {
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ApplyBillDeductions (once per committed bill).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyBillDeductions {
    pub bill_id: AggregateId,
    pub deductions: Vec<StockDeduction>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatalogCommand {
    EditProduct(EditProduct),
    DeleteProduct(DeleteProduct),
    ApplyBillDeductions(ApplyBillDeductions),
}

/// Event: ProductEdited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductEdited {
    pub product_id: ProductId,
    pub price: Money,
    pub stock: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ProductDeleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDeleted {
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: StockDeducted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockDeducted {
    pub bill_id: AggregateId,
    pub product_id: ProductId,
    pub quantity: i64,
    pub remaining: i64,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatalogEvent {
    ProductEdited(ProductEdited),
    ProductDeleted(ProductDeleted),
    StockDeducted(StockDeducted),
}

impl Event for CatalogEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CatalogEvent::ProductEdited(_) => "catalog.product.edited",
            CatalogEvent::ProductDeleted(_) => "catalog.product.deleted",
            CatalogEvent::StockDeducted(_) => "catalog.product.stock_deducted",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            CatalogEvent::ProductEdited(e) => e.occurred_at,
            CatalogEvent::ProductDeleted(e) => e.occurred_at,
            CatalogEvent::StockDeducted(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Catalog {
    type Command = CatalogCommand;
    type Event = CatalogEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            CatalogEvent::ProductEdited(e) => {
                if let Some(product) = self.get_mut(&e.product_id) {
                    product.set_price_and_stock(e.price, e.stock);
                }
            }
            CatalogEvent::ProductDeleted(e) => {
                self.products.retain(|p| p.id() != &e.product_id);
            }
            CatalogEvent::StockDeducted(e) => {
                if let Some(product) = self.get_mut(&e.product_id) {
                    product.set_stock(e.remaining);
                }
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            CatalogCommand::EditProduct(cmd) => self.handle_edit(cmd),
            CatalogCommand::DeleteProduct(cmd) => self.handle_delete(cmd),
            CatalogCommand::ApplyBillDeductions(cmd) => self.handle_deductions(cmd),
        }
    }
}

impl Catalog {
    fn handle_edit(&self, cmd: &EditProduct) -> Result<Vec<CatalogEvent>, DomainError> {
        self.require(&cmd.product_id)?;
        ensure_price(cmd.price)?;
        ensure_stock(cmd.stock)?;

        Ok(vec![CatalogEvent::ProductEdited(ProductEdited {
            product_id: cmd.product_id.clone(),
            price: cmd.price,
            stock: cmd.stock,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_delete(&self, cmd: &DeleteProduct) -> Result<Vec<CatalogEvent>, DomainError> {
        self.require(&cmd.product_id)?;

        Ok(vec![CatalogEvent::ProductDeleted(ProductDeleted {
            product_id: cmd.product_id.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    /// Sufficiency was already checked when the items were added; this only
    /// refuses deductions that would leave a product with negative stock.
    /// Products deleted since then are skipped.
    fn handle_deductions(
        &self,
        cmd: &ApplyBillDeductions,
    ) -> Result<Vec<CatalogEvent>, DomainError> {
        if cmd.deductions.is_empty() {
            return Err(DomainError::validation("no stock deductions given"));
        }

        if cmd.deductions.iter().any(|d| d.quantity <= 0) {
            return Err(DomainError::validation("deduction quantity must be positive"));
        }

        let mut events = Vec::new();
        for deduction in StockDeduction::merge(&cmd.deductions)? {
            let Some(product) = self.get(&deduction.product_id) else {
                continue;
            };

            let remaining = product.stock() - deduction.quantity;
            if remaining < 0 {
                return Err(DomainError::invariant(format!(
                    "stock cannot go negative for product {} (stock {}, deducting {})",
                    deduction.product_id,
                    product.stock(),
                    deduction.quantity
                )));
            }

            events.push(CatalogEvent::StockDeducted(StockDeducted {
                bill_id: cmd.bill_id,
                product_id: deduction.product_id,
                quantity: deduction.quantity,
                remaining,
                occurred_at: cmd.occurred_at,
            }));
        }

        Ok(events)
    }
}
