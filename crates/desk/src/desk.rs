//! Billing desk: orchestrates the catalog and the bill draft.
//!
//! Every user action maps to one method. A method either succeeds or returns
//! a [`DomainError`] and leaves the desk exactly as it was; the UI may ignore
//! the error.
//!
//! ## Commit flow
//!
//! ```text
//! commit(customer)
//!   ↓
//! 1. Resolve customer against the directory
//!   ↓
//! 2. Draft decides: BillCommitted { bill }        (no mutation yet)
//!   ↓
//! 3. Catalog decides: StockDeducted per product   (no mutation yet)
//!   ↓
//! 4. Apply catalog events, apply draft events, prepend bill to history
//! ```
//!
//! Steps 2 and 3 are pure, so a refusal at either one leaves stock, lines and
//! history untouched.

use chrono::Utc;
use tracing::{debug, info, warn};

use billdesk_billing::{
    AddItem, Bill, BillDraft, BillHistory, BillId, CommitBill, DraftCommand, DraftEvent, RemoveItem,
    StockPolicy,
};
use billdesk_catalog::{
    ApplyBillDeductions, Catalog, CatalogCommand, DeleteProduct, EditProduct, Product, ProductId,
};
use billdesk_core::{Aggregate, AggregateId, DomainError, DomainResult, Money};
use billdesk_customers::{CustomerDirectory, CustomerName};
use billdesk_events::Event;

use crate::config::DeskConfig;
use crate::view::{BillSummary, DeskSnapshot, PendingLine, ProductView};

#[derive(Debug, Clone)]
pub struct BillingDesk {
    catalog: Catalog,
    draft: BillDraft,
    customers: CustomerDirectory,
    history: BillHistory,
    selected_customer: Option<CustomerName>,
}

impl BillingDesk {
    pub fn new(catalog: Catalog, customers: CustomerDirectory, policy: StockPolicy) -> Self {
        Self {
            catalog,
            draft: BillDraft::new(AggregateId::new(), policy),
            customers,
            history: BillHistory::new(),
            selected_customer: None,
        }
    }

    /// Build a desk from the configured seed profile and stock policy.
    pub fn from_config(config: &DeskConfig) -> DomainResult<Self> {
        let catalog = config.seed.catalog()?;
        let customers = config.seed.customers()?;
        info!(
            products = catalog.len(),
            customers = customers.len(),
            stock_policy = %config.stock_policy,
            "billing desk seeded"
        );
        Ok(Self::new(catalog, customers, config.stock_policy))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn products(&self) -> &[Product] {
        self.catalog.products()
    }

    pub fn draft(&self) -> &BillDraft {
        &self.draft
    }

    pub fn customers(&self) -> &CustomerDirectory {
        &self.customers
    }

    pub fn bills(&self) -> &BillHistory {
        &self.history
    }

    pub fn selected_customer(&self) -> Option<&CustomerName> {
        self.selected_customer.as_ref()
    }

    // ---- catalog -------------------------------------------------------

    pub fn edit_product(&mut self, product_id: &ProductId, price: Money, stock: i64) -> DomainResult<()> {
        let cmd = EditProduct {
            product_id: product_id.clone(),
            price,
            stock,
            occurred_at: Utc::now(),
        };
        self.run_catalog(CatalogCommand::EditProduct(cmd))
            .inspect_err(|err| rejected("edit_product", err))?;
        info!(product_id = %product_id, price = %price, stock, "product edited");
        Ok(())
    }

    /// Edit from raw form text; non-numeric input is refused.
    pub fn edit_product_raw(
        &mut self,
        product_id: &ProductId,
        raw_price: &str,
        raw_stock: &str,
    ) -> DomainResult<()> {
        let cmd = EditProduct::parse(product_id.clone(), raw_price, raw_stock, Utc::now())
            .inspect_err(|err| rejected("edit_product", err))?;
        self.edit_product(product_id, cmd.price, cmd.stock)
    }

    /// Remove a product. The caller is responsible for asking the user first.
    ///
    /// Lines already on the bill for this product stay there.
    pub fn delete_product(&mut self, product_id: &ProductId) -> DomainResult<()> {
        let cmd = DeleteProduct {
            product_id: product_id.clone(),
            occurred_at: Utc::now(),
        };
        self.run_catalog(CatalogCommand::DeleteProduct(cmd))
            .inspect_err(|err| rejected("delete_product", err))?;
        info!(product_id = %product_id, "product deleted");
        Ok(())
    }

    // ---- bill composition ---------------------------------------------

    pub fn add_item(&mut self, product_id: &ProductId, quantity: i64) -> DomainResult<()> {
        let product = self
            .catalog
            .get(product_id)
            .ok_or_else(|| DomainError::not_found(format!("product {product_id}")))
            .inspect_err(|err| rejected("add_item", err))?;

        let cmd = AddItem::for_product(product, quantity, Utc::now());
        self.run_draft(DraftCommand::AddItem(cmd))
            .inspect_err(|err| rejected("add_item", err))?;
        debug!(product_id = %product_id, quantity, total = %self.total(), "item added");
        Ok(())
    }

    pub fn remove_item(&mut self, index: usize) -> DomainResult<()> {
        let cmd = RemoveItem {
            index,
            occurred_at: Utc::now(),
        };
        self.run_draft(DraftCommand::RemoveItem(cmd))
            .inspect_err(|err| rejected("remove_item", err))?;
        debug!(index, total = %self.total(), "item removed");
        Ok(())
    }

    /// Total of the bill under composition.
    pub fn total(&self) -> Money {
        self.draft.total()
    }

    /// Pick the customer for the next bill. An empty value clears the selection.
    pub fn select_customer(&mut self, raw: &str) -> DomainResult<()> {
        if raw.trim().is_empty() {
            self.selected_customer = None;
            return Ok(());
        }
        let customer = self
            .customers
            .resolve(raw)
            .inspect_err(|err| rejected("select_customer", err))?;
        self.selected_customer = Some(customer);
        Ok(())
    }

    /// Generate a bill for the selected customer.
    pub fn commit(&mut self) -> DomainResult<BillId> {
        let customer = self
            .selected_customer
            .clone()
            .ok_or_else(|| DomainError::validation("no customer selected"))
            .inspect_err(|err| rejected("commit", err))?;
        self.commit_as(customer)
    }

    /// Generate a bill for `customer` (must be in the directory).
    pub fn commit_for(&mut self, customer: &str) -> DomainResult<BillId> {
        let customer = self
            .customers
            .resolve(customer)
            .inspect_err(|err| rejected("commit", err))?;
        self.commit_as(customer)
    }

    fn commit_as(&mut self, customer: CustomerName) -> DomainResult<BillId> {
        let now = Utc::now();
        let bill_id = BillId::generate();

        let draft_events = self
            .draft
            .handle(&DraftCommand::CommitBill(CommitBill {
                bill_id,
                customer: customer.to_string(),
                occurred_at: now,
            }))
            .inspect_err(|err| rejected("commit", err))?;

        let bill = committed_bill(&draft_events)
            .ok_or_else(|| DomainError::invariant("commit produced no bill"))?
            .clone();
        let deductions = bill
            .deductions()
            .inspect_err(|err| rejected("commit", err))?;

        let catalog_events = self
            .catalog
            .handle(&CatalogCommand::ApplyBillDeductions(ApplyBillDeductions {
                bill_id: bill_id.0,
                deductions: deductions.clone(),
                occurred_at: now,
            }))
            .inspect_err(|err| rejected("commit", err))?;

        if catalog_events.len() < deductions.len() {
            warn!(
                bill_id = %bill_id,
                "bill references products no longer in the catalog; their stock was not deducted"
            );
        }

        for event in &catalog_events {
            self.catalog.apply(event);
            debug!(
                event_type = event.event_type(),
                schema_version = event.version(),
                occurred_at = %event.occurred_at(),
                "applied catalog event"
            );
        }
        for event in &draft_events {
            self.draft.apply(event);
            debug!(
                event_type = event.event_type(),
                schema_version = event.version(),
                occurred_at = %event.occurred_at(),
                "applied draft event"
            );
        }

        info!(
            bill_id = %bill_id,
            customer = %bill.customer(),
            items = bill.items().len(),
            total = %bill.total(),
            "bill generated"
        );
        self.history.record(bill);
        self.selected_customer = None;

        Ok(bill_id)
    }

    // ---- views ---------------------------------------------------------

    pub fn pending_lines(&self) -> Vec<PendingLine> {
        self.draft
            .items()
            .iter()
            .enumerate()
            .map(|(index, item)| PendingLine {
                index,
                product_id: item.product_id.clone(),
                product_name: self
                    .catalog
                    .get(&item.product_id)
                    .map(|p| p.name().to_string()),
                quantity: item.quantity,
                unit_price: item.unit_price,
                total: item.total(),
            })
            .collect()
    }

    pub fn bill_summaries(&self) -> Vec<BillSummary> {
        self.history.iter().map(BillSummary::from).collect()
    }

    pub fn snapshot(&self) -> DeskSnapshot {
        DeskSnapshot {
            stock_policy: self.draft.policy(),
            products: self.products().iter().map(ProductView::from).collect(),
            customers: self.customers.names().to_vec(),
            selected_customer: self.selected_customer.clone(),
            pending: self.pending_lines(),
            pending_total: self.total(),
            bills: self.bill_summaries(),
        }
    }

    // ---- helpers -------------------------------------------------------

    fn run_catalog(&mut self, command: CatalogCommand) -> DomainResult<()> {
        for event in self.catalog.execute(&command)? {
            debug!(
                event_type = event.event_type(),
                schema_version = event.version(),
                occurred_at = %event.occurred_at(),
                "applied catalog event"
            );
        }
        Ok(())
    }

    fn run_draft(&mut self, command: DraftCommand) -> DomainResult<()> {
        for event in self.draft.execute(&command)? {
            debug!(
                event_type = event.event_type(),
                schema_version = event.version(),
                occurred_at = %event.occurred_at(),
                "applied draft event"
            );
        }
        Ok(())
    }
}

fn committed_bill(events: &[DraftEvent]) -> Option<&Bill> {
    events.iter().find_map(|event| match event {
        DraftEvent::BillCommitted(e) => Some(&e.bill),
        _ => None,
    })
}

fn rejected(operation: &'static str, err: &DomainError) {
    debug!(operation, kind = err.kind(), error = %err, "operation rejected");
}
